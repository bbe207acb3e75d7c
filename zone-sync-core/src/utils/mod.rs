//! Utility function module

pub mod domain;
