// SPDX-License-Identifier: MIT

//! scribeflow-rs - video-to-blog content pipeline
//!
//! Given a video URL, the pipeline extracts a transcript, summarizes it via
//! a language model, performs supplementary web research, and synthesizes a
//! blog post. Three agents (analyzer, researcher, blogger) each run a small
//! state machine with a guard step that short-circuits on missing or
//! invalid intermediate data; the orchestrator aborts on the first stage
//! failure.

pub mod flow;
pub mod scribe;
