//! Core manual-assembly logic for unidoc.
//!
//! This crate ties definition loading, component resolution, and frontmatter
//! rendering into the end-to-end `run` over a docs tree.

pub mod assembler;
pub mod components;
pub mod definition;
pub mod pipeline;
