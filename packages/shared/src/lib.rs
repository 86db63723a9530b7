//! Shared utilities for Hiroba: logger setup and time helpers.

pub mod logger;
pub mod time;
