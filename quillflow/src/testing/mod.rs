//! Testing utilities for quillflow pipelines.
//!
//! This module provides:
//! - Scripted stage collaborators with call counting
//! - An in-memory store that exposes what was recorded
//! - Simple response metrics

mod doubles;
mod metrics;

pub use doubles::{RecordingMemory, StubAnalysis, StubResearch, StubWriter};
pub use metrics::{keyword_coverage, response_tokens};
