//! Example fixtures and demo flows for the storefront library.
//!
//! The `fixtures` module seeds an in-memory store with a small catalog so
//! the demo binary and the cross-crate test suites share one setup.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
