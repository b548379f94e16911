//! Repository implementations for database access

pub mod farms;

pub use farms::{DbError, Farm, FarmRepo, NewFarm};
