//! Step definitions for pull request review scenarios.

mod given;
mod when;
pub mod world;
