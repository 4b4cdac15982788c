//! Core shared types for hostlens.
//!
//! This crate is intentionally small: host versions, version ranges and the symbolic identifiers
//! callers use to name host types independently of any particular release.

#![forbid(unsafe_code)]

mod range;
mod symbol;
mod version;

pub use range::{InvalidVersionRange, VersionOutOfRange, VersionRange};
pub use symbol::SymbolicId;
pub use version::{HostVersion, VersionParseError};
