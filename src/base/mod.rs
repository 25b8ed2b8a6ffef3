//! Foundation types for the Solva toolchain.
//!
//! This module provides fundamental types used throughout the engine:
//! - [`FileId`] - Interned file identifiers
//! - [`Position`], [`Span`], [`Location`] - Line/column coordinates
//! - Cursor word extraction ([`text`])
//!
//! This module has NO dependencies on other solva modules.

mod file_id;
mod position;
pub mod text;

pub use file_id::FileId;
pub use position::{Location, Position, Span};
