//! Traits and capability classification
//!
//! - **`capabilities`** - operation markers, capability tags and `classify`
//! - **`adapter`** - the `ProviderAdapter` contract every vendor implements

pub mod adapter;
pub mod capabilities;

pub use adapter::*;
pub use capabilities::*;
