// SPDX-License-Identifier: MIT

//! Video Analyzer agent
//!
//! Graph: fetch_transcript -> check_extraction -> analyze_transcript | end.

use async_trait::async_trait;
use std::sync::Arc;

use crate::flow::graph::{Graph, GraphBuilder, Verdict};
use crate::flow::{execute, GraphAgent};
use crate::scribe::collab::{CompletionModel, TranscriptFetcher};

/// Hard cap on the transcript prefix sent to the completion collaborator,
/// in characters, to respect downstream context limits.
const TRANSCRIPT_CHAR_LIMIT: usize = 15_000;

const ANALYST_SYSTEM_PROMPT: &str = "You are an expert video content analyst. \
    Your goal is to extract the core topics, key takeaways, and tone from video transcripts.";

/// Terminal snapshot of one analyzer run.
#[derive(Debug, Clone, Default)]
pub struct AnalyzerState {
    pub video_url: String,
    pub transcript: Option<String>,
    pub analysis: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalyzerNode {
    FetchTranscript,
    AnalyzeTranscript,
}

/// Guard: proceed to analysis only with a usable transcript and no error.
fn check_extraction(state: &AnalyzerState) -> Verdict<AnalyzerNode> {
    if state.error.is_some() {
        return Verdict::End;
    }
    match state.transcript.as_deref() {
        Some(t) if !t.is_empty() => Verdict::Continue(AnalyzerNode::AnalyzeTranscript),
        _ => Verdict::End,
    }
}

pub struct VideoAnalyzerAgent {
    transcripts: Arc<dyn TranscriptFetcher>,
    model: Arc<dyn CompletionModel>,
    graph: Graph<AnalyzerState, AnalyzerNode>,
}

impl VideoAnalyzerAgent {
    pub fn new(transcripts: Arc<dyn TranscriptFetcher>, model: Arc<dyn CompletionModel>) -> Self {
        let graph = GraphBuilder::new()
            .entry(AnalyzerNode::FetchTranscript)
            .conditional_edge(AnalyzerNode::FetchTranscript, check_extraction)
            .terminal(AnalyzerNode::AnalyzeTranscript)
            .compile()
            .expect("analyzer graph is statically valid");

        Self {
            transcripts,
            model,
            graph,
        }
    }

    async fn fetch_transcript(&self, state: &mut AnalyzerState) {
        match self.transcripts.fetch_transcript(&state.video_url).await {
            Ok(transcript) => state.transcript = Some(transcript),
            Err(e) => state.error = Some(e.to_string()),
        }
    }

    async fn analyze_transcript(&self, state: &mut AnalyzerState) {
        let Some(transcript) = state.transcript.as_deref() else {
            state.error = Some("No transcript available for analysis.".to_string());
            return;
        };

        // char-based truncation so multi-byte transcripts cannot split a
        // code point
        let truncated: String = transcript.chars().take(TRANSCRIPT_CHAR_LIMIT).collect();

        let user_prompt = format!(
            "Analyze the following YouTube Video Transcript.\n\
             \n\
             NOTE: The transcript might be in a foreign language.\n\
             You MUST translate the concepts and Output the final analysis in ENGLISH.\n\
             \n\
             Transcript (Truncated):\n\
             {}\n\
             \n\
             Output a structured summary containing:\n\
             1. Main Topic\n\
             2. Key Points (Bullet points)\n\
             3. The tone of the video\n\
             4. Important keywords",
            truncated
        );

        match self.model.complete(ANALYST_SYSTEM_PROMPT, &user_prompt).await {
            Ok(analysis) => state.analysis = Some(analysis),
            Err(e) => state.error = Some(e.to_string()),
        }
    }

    /// Entry point: builds fresh state, drives the graph to termination,
    /// and returns the final snapshot. Failures never escape; callers
    /// inspect `error` / `analysis`.
    pub async fn run(&self, video_url: &str) -> AnalyzerState {
        let mut state = AnalyzerState {
            video_url: video_url.to_string(),
            ..Default::default()
        };

        if let Err(e) = execute(self, &mut state).await {
            state.error.get_or_insert(e.to_string());
        }
        state
    }
}

#[async_trait]
impl GraphAgent for VideoAnalyzerAgent {
    type State = AnalyzerState;
    type Label = AnalyzerNode;

    fn name(&self) -> &str {
        "video-analyzer"
    }

    fn graph(&self) -> &Graph<AnalyzerState, AnalyzerNode> {
        &self.graph
    }

    async fn step(&self, label: AnalyzerNode, state: &mut AnalyzerState) {
        match label {
            AnalyzerNode::FetchTranscript => self.fetch_transcript(state).await,
            AnalyzerNode::AnalyzeTranscript => self.analyze_transcript(state).await,
        }
    }
}
