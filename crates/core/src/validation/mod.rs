//! Shared request-parameter checks used by the price query service.

mod date_validation;

pub use date_validation::{is_date, is_date_after, parse_date, QueryValidationError};
