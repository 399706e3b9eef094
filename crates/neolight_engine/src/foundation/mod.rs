//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Math types and 2D geometry
//! - Time management and scheduled tasks
//! - Logging utilities

pub mod math;
pub mod time;
pub mod logging;
