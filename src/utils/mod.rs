//! Utility modules
//!
//! Small helpers shared by the content model and the provider adapters.

pub mod json_path;
pub mod media;

pub use json_path::*;
pub use media::*;
