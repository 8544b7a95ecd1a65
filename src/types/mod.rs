//! Canonical content model
//!
//! Vendor-agnostic value types shared by every adapter:
//!
//! - **`part`** - `Part` tagged union and its payload structs
//! - **`parts`** - ordered `Parts` collection and `PartFilter`
//! - **`content`** - `Role` and `Content`
//! - **`candidate`** - `Candidate` and `Candidates`
//! - **`config`** - `GenerationConfig` and function declarations
//!
//! Every type round-trips through the canonical wire format with
//! `to_value()` / `from_value()`:
//!
//! ```text
//! Content  := { role: "user"|"model"|"system"|"function", parts: Part[] }
//! Part     := { text } | { inlineData } | { fileData } | { functionCall } | { functionResponse }
//! Candidate  := { content: Content, ...additionalVendorFields }
//! Candidates := Candidate[]
//! ```

pub mod candidate;
pub mod config;
pub mod content;
pub mod part;
pub mod parts;

pub use candidate::*;
pub use config::*;
pub use content::*;
pub use part::*;
pub use parts::*;

static_assertions::assert_impl_all!(Part: Send, Sync, Clone);
static_assertions::assert_impl_all!(Content: Send, Sync, Clone);
static_assertions::assert_impl_all!(Candidates: Send, Sync, Clone);
static_assertions::assert_impl_all!(GenerationConfig: Send, Sync, Clone);
