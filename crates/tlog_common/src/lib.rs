//! Shared foundational types used across the tlog crates.
//!
//! This crate provides path normalization (lexical absolutization and case
//! folding) and [`FileKey`], the case-insensitive identity under which both
//! dependency logs store their entries.

#![warn(missing_docs)]

pub mod key;
pub mod path;

pub use key::FileKey;
pub use path::{absolutize, clean, current_base, fold_case, PathError};
