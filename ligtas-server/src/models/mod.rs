//! Request-side domain types with validation at construction
//!
//! Invalid input returns ValidationError, not panic.

pub mod farm;
pub mod pagination;
pub mod validation;

pub use farm::{City, FarmName, LocationField};
pub use pagination::{Paginated, Pagination, PaginationParams};
pub use validation::ValidationError;
