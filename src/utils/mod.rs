//! Utility functions and helpers.

pub mod logging;
