//! Common Test Utilities
//!
//! Shared fixtures used across test modules:
//! - SRD-shaped stat blocks (`goblin_detail`, `ogre_detail`, ...)
//! - A scripted dice source for exact roll sequences

pub mod fixtures;

pub use fixtures::*;
