//! Adapter implementations of the review repository port.

pub mod memory;
pub mod postgres;
