//! Per-page feature extraction for separating paratext (front matter,
//! indexes, ads, tables of contents) from body text in OCR'd volumes.
//!
//! The pipeline is two passes per volume: page-local lexical and structural
//! features, then volume-relative enrichment (mean deltas, trailing-window
//! deltas, positional polynomials). The emitted matrix feeds an external
//! classifier trainer.

pub mod dunning;
pub mod features;
pub mod ids;
pub mod lexicon;
pub mod meta;
pub mod output;
pub mod paginate;
