//! Utility modules.

/// Lenient deserializers for fields the API reports inconsistently.
pub mod lenient;

/// Log sanitization utilities to prevent sensitive data exposure.
pub mod log_sanitizer;
