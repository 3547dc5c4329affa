//! Blockfall (workspace facade crate).
//!
//! This package exposes `blockfall::{core, types}` while the implementation lives in
//! dedicated crates under `crates/`.

pub use blockfall_core as core;
pub use blockfall_types as types;
