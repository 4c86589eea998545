//! Glucose classification core
//!
//! Maps sensor values in mmol/L onto five clinical risk bands and wraps
//! them into immutable timestamped readings. Everything here is pure and
//! synchronous; the monitor and API layers build on top of it.

pub mod reading;
pub mod status;

pub use reading::{GlucoseReading, ReadingError};
pub use status::{
    classify, GlucoseStatus, Severity, CRITICAL_HIGH_MMOL, CRITICAL_LOW_MMOL, WARNING_HIGH_MMOL,
    WARNING_LOW_MMOL,
};
