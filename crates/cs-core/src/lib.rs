//! cs-core: stable foundation for cellscope.
//!
//! Contains:
//! - units (uom SI types + constructors for cell quantities)
//! - numeric (Real + tolerances + axis helpers)
//! - timing (stage timers reported through tracing)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod timing;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CoreError, CoreResult};
pub use numeric::*;
pub use units::*;
