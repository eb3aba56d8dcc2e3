//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Math type aliases
//! - Logging utilities

pub mod math;
pub mod logging;
