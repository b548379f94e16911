//! Route handlers organized by resource

pub mod add_location;
pub mod farms;
pub mod health;
pub mod importance;
pub mod index;
pub mod locations;
