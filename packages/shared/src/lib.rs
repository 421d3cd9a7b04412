//! Shared utilities for Kodama server and client.

pub mod logger;
pub mod time;
