//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the crate:
//! - Math types and operations
//! - Axis-aligned extents
//! - Handle-keyed collections
//! - Logging utilities

pub mod math;
pub mod extents;
pub mod collections;
pub mod logging;
