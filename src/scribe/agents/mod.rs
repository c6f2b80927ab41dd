// SPDX-License-Identifier: MIT

//! The three pipeline agents
//!
//! Each agent is one bounded state machine: typed state record, a two-to-
//! three node graph, and a guard that short-circuits on missing or invalid
//! intermediate data. `run()` never returns an error; failures are captured
//! in the state's `error` field and inspected by the orchestrator.

pub mod analyzer;
pub mod blogger;
pub mod researcher;

pub use analyzer::{AnalyzerState, VideoAnalyzerAgent};
pub use blogger::{BlogState, BloggerAgent};
pub use researcher::{ResearchAgent, ResearchState};
