//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Math types and angle helpers for the screen-space (y-down) world
//! - Time management for host-driven periodic state
//! - Logging utilities

pub mod math;
pub mod time;
pub mod logging;
