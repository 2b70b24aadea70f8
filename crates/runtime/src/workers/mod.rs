//! Worker machinery backing the load pipeline.
//!
//! Decode runs on a bounded pool because packs share no mutable state before
//! merge; the sequencer turns those unordered completions back into the
//! resolver's order for the strictly sequential merge step.

mod sequencer;

pub use sequencer::MergeSequencer;
