//! Shared foundational types used across the aot build orchestrator.
//!
//! This crate provides the content hash used to decide whether a parsed
//! source can be reused and whether a watched file changed.

#![warn(missing_docs)]

pub mod hash;

pub use hash::ContentHash;
