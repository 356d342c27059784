//! Ranked password-mutation candidate generation.
//!
//! This crate provides the full mutation pipeline:
//! - A generic best-first search over implicit graphs ([`search`])
//! - Probability-event models and their lazy, exactly-once enumeration in
//!   non-increasing likelihood order ([`model`])
//! - The frequency data file format, its miner, loader and writer
//!   ([`freqdata`])
//! - Seed-word mutation tying model and enumeration together
//!   ([`mutation`])
//!
//! The combinatorial candidate set is never materialized: consumers pull
//! candidates one at a time and may stop at any point.

/// Error taxonomy: configuration errors and malformed frequency data.
pub mod error;

/// Frequency data: mining, in-memory model, text format.
pub mod freqdata;

/// I/O utilities (file loading, path helpers).
pub mod io;

/// Events, combinations and their ranked enumeration.
pub mod model;

/// Seed-word mutation built on top of [`model`].
pub mod mutation;

/// Generic implicit-graph best-first search engine.
pub mod search;
