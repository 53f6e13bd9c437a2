//! Unit tests for configuration loading and precedence.
//!
//! - `helpers`: shared test utilities
//! - `precedence`: layer precedence tests
//! - `field_resolution`: token, repository, page size and resource resolution
//! - `loading`: end-to-end loading from the environment and CLI

mod field_resolution;
mod helpers;
