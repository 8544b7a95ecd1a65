//! Positional merge of streamed deltas
//!
//! Candidates merge by index, parts by position. Text fragments at the same
//! position are concatenated; any other part keeps the first value seen at
//! that position. Additional vendor fields from the newer delta win.

use crate::error::LlmError;
use crate::types::{Candidate, Candidates, Part};

#[derive(Debug, Clone, Default)]
pub struct CandidatesAccumulator {
    accumulated: Option<Candidates>,
    chunks: usize,
}

impl CandidatesAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one delta into the running result.
    pub fn add_chunk(&mut self, delta: Candidates) {
        self.chunks += 1;
        let Some(accumulated) = self.accumulated.as_mut() else {
            self.accumulated = Some(delta.into_iter().map(settled).collect());
            return;
        };

        for (index, candidate) in delta.into_iter().enumerate() {
            match accumulated.get_mut(index) {
                Some(existing) => merge_candidate(existing, candidate),
                None => {
                    tracing::trace!(index, "new candidate in stream");
                    accumulated.push(settled(candidate));
                }
            }
        }
    }

    /// Close the merge once the sequence is exhausted.
    ///
    /// Drops empty text parts from candidates that also carry other parts;
    /// a stream of tool calls only ends up with the calls alone.
    pub fn finish(&mut self) {
        if let Some(accumulated) = self.accumulated.take() {
            self.accumulated = Some(accumulated.into_iter().map(without_empty_text).collect());
        }
    }

    /// Merged result so far, `None` before the first chunk.
    pub fn accumulated(&self) -> Option<&Candidates> {
        self.accumulated.as_ref()
    }

    pub fn into_accumulated(self) -> Option<Candidates> {
        self.accumulated
    }

    /// Number of deltas folded in
    pub fn chunk_count(&self) -> usize {
        self.chunks
    }
}

fn merge_candidate(existing: &mut Candidate, delta: Candidate) {
    for (position, part) in delta.content.parts.into_iter().enumerate() {
        match existing.content.parts.get_mut(position) {
            None => existing.content.parts.push(part),
            Some(Part::Text(text)) => {
                if let Part::Text(fragment) = part {
                    text.push_str(&fragment);
                }
            }
            Some(_) => {}
        }
    }
    for (key, value) in delta.additional_data {
        existing.insert_additional(key, value);
    }
}

fn without_empty_text(mut candidate: Candidate) -> Candidate {
    let parts = &candidate.content.parts;
    if parts.iter().any(is_empty_text) && !parts.iter().all(is_empty_text) {
        candidate.content.parts = std::mem::take(&mut candidate.content.parts)
            .into_iter()
            .filter(|part| !is_empty_text(part))
            .collect();
    }
    candidate
}

fn is_empty_text(part: &Part) -> bool {
    matches!(part, Part::Text(text) if text.is_empty())
}

/// Drop in-flight parser bookkeeping from a candidate entering the result.
fn settled(mut candidate: Candidate) -> Candidate {
    candidate.stream_state = Default::default();
    candidate
}

#[derive(Debug, Clone, PartialEq)]
enum Phase {
    Open,
    Exhausted,
    Failed(LlmError),
}

/// Accumulator plus the lifecycle of the sequence feeding it.
///
/// Shared by the sync and async stream wrappers. An error poisons the
/// aggregation: later items are ignored and no result is ever released.
#[derive(Debug, Clone)]
pub(crate) struct Aggregation {
    accumulator: CandidatesAccumulator,
    phase: Phase,
}

impl Aggregation {
    pub(crate) fn new() -> Self {
        Self {
            accumulator: CandidatesAccumulator::new(),
            phase: Phase::Open,
        }
    }

    pub(crate) fn is_open(&self) -> bool {
        self.phase == Phase::Open
    }

    /// Record the next item pulled from the underlying sequence and pass it on.
    pub(crate) fn observe(
        &mut self,
        item: Option<Result<Candidates, LlmError>>,
    ) -> Option<Result<Candidates, LlmError>> {
        if !self.is_open() {
            return None;
        }
        match item {
            None => {
                tracing::debug!(
                    chunks = self.accumulator.chunk_count(),
                    "candidate stream exhausted"
                );
                self.accumulator.finish();
                self.phase = Phase::Exhausted;
                None
            }
            Some(Err(error)) => {
                tracing::debug!(%error, "candidate stream failed");
                self.phase = Phase::Failed(error.clone());
                Some(Err(error))
            }
            Some(Ok(delta)) => {
                self.accumulator.add_chunk(delta.clone());
                Some(Ok(delta))
            }
        }
    }

    /// The error that terminated the sequence, if any.
    pub(crate) fn failure(&self) -> Option<&LlmError> {
        match &self.phase {
            Phase::Failed(error) => Some(error),
            _ => None,
        }
    }

    /// Merged state regardless of phase
    #[cfg(test)]
    pub(crate) fn snapshot(&self) -> Option<&Candidates> {
        self.accumulator.accumulated()
    }

    pub(crate) fn complete(&self) -> Option<&Candidates> {
        match self.phase {
            Phase::Exhausted => self.accumulator.accumulated(),
            _ => None,
        }
    }

    pub(crate) fn into_complete(self) -> Option<Candidates> {
        match self.phase {
            Phase::Exhausted => self.accumulator.into_accumulated(),
            _ => None,
        }
    }
}
