//! Unit tests for the review core.
