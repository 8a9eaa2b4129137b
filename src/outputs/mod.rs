//! Output generation for the files the stages hand to each other.
//!
//! # Submodules
//!
//! - [`json`]: Reads and writes the categorized and enhanced video files

pub mod json;
