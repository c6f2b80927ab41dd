// SPDX-License-Identifier: MIT

//! Pipeline orchestrator
//!
//! Sequences Analyzer -> Researcher -> Blogger, feeding each stage's output
//! into the next, and aborts on the first failure with a stage-tagged error.
//! This is the only layer that turns an agent's `error` field into a
//! user-visible failure.

use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::scribe::agents::{BloggerAgent, ResearchAgent, VideoAnalyzerAgent};
use crate::scribe::collab::{CompletionModel, SearchProvider, TranscriptFetcher};

/// Pipeline stage, used to tag failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Analyzer,
    Researcher,
    Blogger,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Analyzer => write!(f, "Analyzer"),
            Stage::Researcher => write!(f, "Researcher"),
            Stage::Blogger => write!(f, "Blogger"),
        }
    }
}

/// First failure of a pipeline invocation
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A stage terminated with its `error` field set
    #[error("{stage} Error: {message}")]
    Stage { stage: Stage, message: String },

    /// A stage terminated cleanly but without its expected output
    #[error("Failed to generate {output}")]
    MissingOutput { stage: Stage, output: &'static str },
}

impl PipelineError {
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::Stage { stage, .. } => *stage,
            PipelineError::MissingOutput { stage, .. } => *stage,
        }
    }
}

/// Result of a successful pipeline run; the intermediates are kept for
/// observability.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutput {
    pub blog_post: String,
    pub video_analysis: String,
    pub research_summary: String,
}

/// The three-stage content pipeline.
pub struct Pipeline {
    analyzer: VideoAnalyzerAgent,
    researcher: ResearchAgent,
    blogger: BloggerAgent,
}

impl Pipeline {
    pub fn new(
        model: Arc<dyn CompletionModel>,
        transcripts: Arc<dyn TranscriptFetcher>,
        search: Arc<dyn SearchProvider>,
    ) -> Self {
        Self {
            analyzer: VideoAnalyzerAgent::new(transcripts, model.clone()),
            researcher: ResearchAgent::new(model.clone(), search),
            blogger: BloggerAgent::new(model),
        }
    }

    /// Run the full pipeline for one video URL.
    ///
    /// Stages run strictly sequentially; the first stage to fail aborts the
    /// invocation without invoking later stages.
    pub async fn run(&self, video_url: &str) -> Result<PipelineOutput, PipelineError> {
        let run_id = Uuid::new_v4();
        log::info!("[{}] pipeline started for {}", run_id, video_url);

        let analyze_state = self.analyzer.run(video_url).await;
        if let Some(message) = analyze_state.error {
            log::warn!("[{}] analyzer failed: {}", run_id, message);
            return Err(PipelineError::Stage {
                stage: Stage::Analyzer,
                message,
            });
        }
        let video_analysis = analyze_state.analysis.ok_or(PipelineError::MissingOutput {
            stage: Stage::Analyzer,
            output: "video analysis",
        })?;

        let research_state = self.researcher.run(&video_analysis).await;
        if let Some(message) = research_state.error {
            log::warn!("[{}] researcher failed: {}", run_id, message);
            return Err(PipelineError::Stage {
                stage: Stage::Researcher,
                message,
            });
        }
        let research_summary =
            research_state
                .research_summary
                .ok_or(PipelineError::MissingOutput {
                    stage: Stage::Researcher,
                    output: "research summary",
                })?;

        let blog_state = self.blogger.run(&video_analysis, &research_summary).await;
        if let Some(message) = blog_state.error {
            log::warn!("[{}] blogger failed: {}", run_id, message);
            return Err(PipelineError::Stage {
                stage: Stage::Blogger,
                message,
            });
        }
        let blog_post = blog_state.blog_post.ok_or(PipelineError::MissingOutput {
            stage: Stage::Blogger,
            output: "blog post",
        })?;

        log::info!("[{}] pipeline completed", run_id);
        Ok(PipelineOutput {
            blog_post,
            video_analysis,
            research_summary,
        })
    }
}
