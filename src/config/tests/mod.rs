//! Unit tests for configuration loading and precedence.
//!
//! Tests are organised into modules by functional area:
//! - `helpers`: Shared test utilities
//! - `cli`: Command-line flag parsing
//! - `precedence`: Layer precedence tests
//! - `resolution`: Base URL, timeout, mode and tag resolution tests

mod helpers;
