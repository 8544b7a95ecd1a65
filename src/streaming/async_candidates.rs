//! Async mirror of the synchronous stream processing
//!
//! For transports that hand over payloads as a `futures::Stream`. Semantics
//! match [`CandidatesStream`](super::CandidatesStream): per-chunk deltas are
//! yielded, the merged result is released only after exhaustion, and the
//! first error terminates the stream.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::{Stream, StreamExt};

use super::accumulator::Aggregation;
use super::processor::ChunkDecoder;
use crate::error::LlmError;
use crate::traits::ProviderAdapter;
use crate::types::Candidates;

/// Parse a stream of raw payloads into deltas with `adapter`.
pub fn parse_chunk_stream<'a, S, P>(
    adapter: &'a dyn ProviderAdapter,
    payloads: S,
) -> impl Stream<Item = Result<Candidates, LlmError>> + Send + 'a
where
    S: Stream<Item = Result<P, LlmError>> + Send + 'a,
    P: AsRef<str> + Send + 'a,
{
    async_stream::try_stream! {
        let mut decoder = ChunkDecoder::new(adapter);
        let mut payloads = Box::pin(payloads);
        while let Some(payload) = payloads.next().await {
            let payload = payload?;
            if let Some(delta) = decoder.decode(payload.as_ref())? {
                yield delta;
            }
        }
        decoder.finish();
    }
}

/// Aggregate a stream of raw payloads with `adapter`.
pub fn stream_candidates_async<'a, S, P>(
    adapter: &'a dyn ProviderAdapter,
    payloads: S,
) -> AsyncCandidatesStream<impl Stream<Item = Result<Candidates, LlmError>> + Send + 'a>
where
    S: Stream<Item = Result<P, LlmError>> + Send + 'a,
    P: AsRef<str> + Send + 'a,
{
    AsyncCandidatesStream::new(parse_chunk_stream(adapter, payloads))
}

/// Lazily aggregated async sequence of deltas.
pub struct AsyncCandidatesStream<S> {
    chunks: Pin<Box<S>>,
    aggregation: Aggregation,
}

impl<S> std::fmt::Debug for AsyncCandidatesStream<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncCandidatesStream")
            .field("aggregation", &self.aggregation)
            .finish_non_exhaustive()
    }
}

impl<S> AsyncCandidatesStream<S>
where
    S: Stream<Item = Result<Candidates, LlmError>>,
{
    pub fn new(chunks: S) -> Self {
        Self {
            chunks: Box::pin(chunks),
            aggregation: Aggregation::new(),
        }
    }

    pub async fn read_all(&mut self) -> Result<Option<Candidates>, LlmError> {
        self.read_all_with(|_| {}).await
    }

    /// Drain the stream, handing every delta to `on_chunk` after merging it.
    pub async fn read_all_with<F>(&mut self, mut on_chunk: F) -> Result<Option<Candidates>, LlmError>
    where
        F: FnMut(&Candidates),
    {
        if let Some(error) = self.aggregation.failure() {
            return Err(error.clone());
        }
        while let Some(delta) = self.next().await {
            on_chunk(&delta?);
        }
        Ok(self.aggregation.complete().cloned())
    }

    /// `None` until the stream has been fully drained.
    pub fn complete(&self) -> Option<&Candidates> {
        self.aggregation.complete()
    }

    pub fn into_complete(self) -> Option<Candidates> {
        self.aggregation.into_complete()
    }
}

impl<S> Stream for AsyncCandidatesStream<S>
where
    S: Stream<Item = Result<Candidates, LlmError>>,
{
    type Item = Result<Candidates, LlmError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if !this.aggregation.is_open() {
            return Poll::Ready(None);
        }
        match this.chunks.as_mut().poll_next(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(item) => Poll::Ready(this.aggregation.observe(item)),
        }
    }
}
