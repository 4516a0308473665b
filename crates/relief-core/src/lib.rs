//! Relief Core - Foundational types for the Relief terrain generator
//!
//! This crate provides the types that the other Relief crates depend on:
//! - `Vec3` - Vertex positions and normals
//! - Error types and Result alias

mod error;
mod types;

pub use error::{ReliefError, Result};
pub use types::Vec3;
