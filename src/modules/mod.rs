//! Modules layer - Infrastructure components backing the features
//!
//! Contains adapters for external resources like the local uploads directory.

pub mod storage;
