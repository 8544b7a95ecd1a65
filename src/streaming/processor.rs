//! Synchronous stream processing
//!
//! [`ChunkParser`] turns deframed raw payloads into per-chunk deltas using an
//! adapter's `parse_chunk`; [`CandidatesStream`] folds those deltas into the
//! final result while handing each one to the caller.
//!
//! Both are single-pass: once drained (or failed) they cannot be replayed.

use serde_json::Value;

use super::accumulator::Aggregation;
use crate::error::LlmError;
use crate::traits::ProviderAdapter;
use crate::types::Candidates;

/// Terminal sentinel some vendors send as the last SSE data line
const DONE_SENTINEL: &str = "[DONE]";

/// Parses raw payloads one at a time, threading the previous delta.
#[derive(Debug)]
pub(crate) struct ChunkDecoder<'a> {
    adapter: &'a dyn ProviderAdapter,
    previous: Option<Candidates>,
}

impl<'a> ChunkDecoder<'a> {
    pub(crate) fn new(adapter: &'a dyn ProviderAdapter) -> Self {
        Self {
            adapter,
            previous: None,
        }
    }

    /// Parse one payload; blank payloads and the done sentinel yield nothing.
    pub(crate) fn decode(&mut self, payload: &str) -> Result<Option<Candidates>, LlmError> {
        let payload = payload.trim();
        if payload.is_empty() || payload == DONE_SENTINEL {
            tracing::trace!(provider = self.adapter.provider_id(), "skipping empty payload");
            return Ok(None);
        }

        let raw: Value = serde_json::from_str(payload)?;
        let delta = self.adapter.parse_chunk(&raw, self.previous.as_ref())?;
        self.previous = Some(delta.clone());
        Ok(Some(delta))
    }

    /// Report anything still buffered when the payloads run out.
    pub(crate) fn finish(&self) {
        let pending: usize = self
            .previous
            .iter()
            .flat_map(Candidates::iter)
            .map(|c| c.stream_state.partial_calls.len())
            .sum();
        if pending > 0 {
            tracing::warn!(
                provider = self.adapter.provider_id(),
                pending,
                "stream ended with unfinished function calls; dropping them"
            );
        }
    }
}

/// Iterator adapter from raw payloads to parsed deltas.
///
/// Stops after the first error.
#[derive(Debug)]
pub struct ChunkParser<'a, I> {
    decoder: ChunkDecoder<'a>,
    payloads: I,
    done: bool,
}

impl<'a, I> ChunkParser<'a, I> {
    pub fn new(adapter: &'a dyn ProviderAdapter, payloads: I) -> Self {
        Self {
            decoder: ChunkDecoder::new(adapter),
            payloads,
            done: false,
        }
    }
}

impl<I, S> Iterator for ChunkParser<'_, I>
where
    I: Iterator<Item = Result<S, LlmError>>,
    S: AsRef<str>,
{
    type Item = Result<Candidates, LlmError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            let Some(payload) = self.payloads.next() else {
                self.done = true;
                self.decoder.finish();
                return None;
            };
            match payload.and_then(|p| self.decoder.decode(p.as_ref())) {
                Ok(Some(delta)) => return Some(Ok(delta)),
                Ok(None) => {}
                Err(error) => {
                    self.done = true;
                    return Some(Err(error));
                }
            }
        }
        None
    }
}

/// Lazily aggregated sequence of deltas.
///
/// Iterating yields each delta as parsed; [`complete`](Self::complete) only
/// releases the merged result after the sequence is exhausted.
#[derive(Debug)]
pub struct CandidatesStream<I> {
    chunks: I,
    aggregation: Aggregation,
}

impl<I> CandidatesStream<I>
where
    I: Iterator<Item = Result<Candidates, LlmError>>,
{
    pub fn new(chunks: I) -> Self {
        Self {
            chunks,
            aggregation: Aggregation::new(),
        }
    }

    /// Drain the sequence and return the merged result.
    ///
    /// `Ok(None)` means the sequence produced no chunk at all.
    pub fn read_all(&mut self) -> Result<Option<Candidates>, LlmError> {
        self.read_all_with(|_| {})
    }

    /// Drain the sequence, handing every delta (not the running total) to
    /// `on_chunk` after it has been merged.
    pub fn read_all_with<F>(&mut self, mut on_chunk: F) -> Result<Option<Candidates>, LlmError>
    where
        F: FnMut(&Candidates),
    {
        if let Some(error) = self.aggregation.failure() {
            return Err(error.clone());
        }
        for delta in self.by_ref() {
            on_chunk(&delta?);
        }
        Ok(self.aggregation.complete().cloned())
    }

    /// `None` until the sequence has been fully drained.
    pub fn complete(&self) -> Option<&Candidates> {
        self.aggregation.complete()
    }

    pub fn into_complete(self) -> Option<Candidates> {
        self.aggregation.into_complete()
    }
}

impl<I> Iterator for CandidatesStream<I>
where
    I: Iterator<Item = Result<Candidates, LlmError>>,
{
    type Item = Result<Candidates, LlmError>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.aggregation.is_open() {
            return None;
        }
        let item = self.chunks.next();
        self.aggregation.observe(item)
    }
}

/// Aggregate a sequence of raw chunk payloads with `adapter`.
pub fn stream_candidates<'a, P, S>(
    adapter: &'a dyn ProviderAdapter,
    payloads: P,
) -> CandidatesStream<ChunkParser<'a, P::IntoIter>>
where
    P: IntoIterator<Item = Result<S, LlmError>>,
    S: AsRef<str>,
{
    CandidatesStream::new(ChunkParser::new(adapter, payloads.into_iter()))
}
