//! Streaming Aggregation
//!
//! Vendors stream a response as a sequence of chunk payloads. An adapter's
//! `parse_chunk` turns each payload into a *delta* (the fragment that chunk
//! contributed); this module drives that parsing and folds the deltas into
//! the final [`Candidates`](crate::types::Candidates).
//!
//! ## Structure
//! - `accumulator` - positional delta merge
//! - `processor` - sync payload parsing and the [`CandidatesStream`] iterator
//! - `async_candidates` - the same over `futures::Stream`
//!
//! One stream instance serves exactly one in-flight response. Cancelling is
//! simply dropping it.

mod accumulator;
mod async_candidates;
mod processor;

pub use accumulator::CandidatesAccumulator;
pub use async_candidates::{AsyncCandidatesStream, parse_chunk_stream, stream_candidates_async};
pub use processor::{CandidatesStream, ChunkParser, stream_candidates};
