//! Infrastructure error mapping

mod conversions;

pub use conversions::{persistence_error, InfraError};
