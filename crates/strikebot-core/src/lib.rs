//! Core types and definitions for the strikebot agent.
//!
//! This crate defines the vocabulary shared across all other crates:
//! geometric types, world snapshots, control output, and constants.
//! It has no dependency on any runtime framework.

pub mod constants;
pub mod control;
pub mod enums;
pub mod snapshot;
pub mod types;
