//! Speech synthesis
//!
//! This module provides a trait-based architecture for turning extracted text
//! into an audio artifact. It supports CLI-based implementations (using an
//! external TTS binary) and a stub implementation for graceful degradation
//! when no TTS engine is available.
//!
//! ## Architecture
//!
//! The core abstraction is the [`SpeechSynthesizer`] trait. Synthesis is a
//! blocking, uninterruptible call; the pipeline runs it on a dedicated
//! blocking thread and supervises it from async. Implementations provided:
//!
//! - [`CliSynthesizer`]: Uses an external TTS binary (espeak-ng / espeak)
//! - [`NoOpSynthesizer`]: Stub implementation when no TTS engine is available

mod audio;
mod cli;
mod noop;
mod traits;

pub use audio::wav_duration_secs;
pub use cli::CliSynthesizer;
pub use noop::NoOpSynthesizer;
pub use traits::{SpeechSynthesizer, SynthesisCapabilities};
