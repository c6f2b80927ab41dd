// SPDX-License-Identifier: MIT

//! Blogger agent
//!
//! Graph: check_context routes straight from entry -> write_blog | end.

use async_trait::async_trait;
use std::sync::Arc;

use crate::flow::graph::{Graph, GraphBuilder, Verdict};
use crate::flow::{execute, GraphAgent};
use crate::scribe::collab::CompletionModel;

const BLOGGER_SYSTEM_PROMPT: &str = "You are a professional blog writer. \
    You write engaging, viral-ready, and SEO-optimized articles.";

/// Terminal snapshot of one blogger run.
#[derive(Debug, Clone, Default)]
pub struct BlogState {
    pub video_analysis: String,
    pub research_findings: String,
    pub blog_post: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlogNode {
    WriteBlog,
}

/// Guard evaluated before the first step: both inputs must be present.
fn check_context(state: &BlogState) -> Verdict<BlogNode> {
    if state.error.is_some() {
        return Verdict::End;
    }
    if state.video_analysis.is_empty() || state.research_findings.is_empty() {
        return Verdict::End;
    }
    Verdict::Continue(BlogNode::WriteBlog)
}

pub struct BloggerAgent {
    model: Arc<dyn CompletionModel>,
    graph: Graph<BlogState, BlogNode>,
}

impl BloggerAgent {
    pub fn new(model: Arc<dyn CompletionModel>) -> Self {
        let graph = GraphBuilder::new()
            .entry_router(check_context)
            .terminal(BlogNode::WriteBlog)
            .compile()
            .expect("blogger graph is statically valid");

        Self { model, graph }
    }

    async fn write_blog(&self, state: &mut BlogState) {
        let user_prompt = format!(
            "Create a high-quality blog post based on the following information.\n\
             \n\
             SOURCE 1: Video Analysis (Core Content)\n\
             {}\n\
             \n\
             SOURCE 2: External Research (Latest Context)\n\
             {}\n\
             \n\
             Requirements:\n\
             - Catchy Title (Make it click-worthy)\n\
             - Engaging Introduction (Hook the reader immediately)\n\
             - Well-structured body with clear headers\n\
             - Integrate the external research naturally to add value\n\
             - Conclusion with a call to action\n\
             - Use Markdown formatting\n\
             - Tone: Fun, informative, and accessible to general readers",
            state.video_analysis, state.research_findings
        );

        match self.model.complete(BLOGGER_SYSTEM_PROMPT, &user_prompt).await {
            Ok(blog_post) => state.blog_post = Some(blog_post),
            Err(e) => state.error = Some(e.to_string()),
        }
    }

    /// Entry point: returns the terminal snapshot, errors folded into state.
    pub async fn run(&self, video_analysis: &str, research_findings: &str) -> BlogState {
        let mut state = BlogState {
            video_analysis: video_analysis.to_string(),
            research_findings: research_findings.to_string(),
            ..Default::default()
        };

        if let Err(e) = execute(self, &mut state).await {
            state.error.get_or_insert(e.to_string());
        }
        state
    }
}

#[async_trait]
impl GraphAgent for BloggerAgent {
    type State = BlogState;
    type Label = BlogNode;

    fn name(&self) -> &str {
        "blogger"
    }

    fn graph(&self) -> &Graph<BlogState, BlogNode> {
        &self.graph
    }

    async fn step(&self, label: BlogNode, state: &mut BlogState) {
        match label {
            BlogNode::WriteBlog => self.write_blog(state).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::error::ScribeError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingModel {
        response: Result<String, String>,
        calls: AtomicUsize,
    }

    impl CountingModel {
        fn ok(response: &str) -> Self {
            Self {
                response: Ok(response.to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                response: Err(message.to_string()),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl CompletionModel for CountingModel {
        async fn complete(
            &self,
            _system_prompt: &str,
            _user_prompt: &str,
        ) -> Result<String, ScribeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.response.clone().map_err(ScribeError::other)
        }
    }

    #[tokio::test]
    async fn test_writes_blog_with_both_inputs() {
        let model = Arc::new(CountingModel::ok("# Title\n\nBody"));
        let agent = BloggerAgent::new(model.clone());

        let state = agent.run("the analysis", "the findings").await;

        assert!(state.error.is_none());
        assert_eq!(state.blog_post.as_deref(), Some("# Title\n\nBody"));
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_analysis_ends_without_model_call() {
        let model = Arc::new(CountingModel::ok("unused"));
        let agent = BloggerAgent::new(model.clone());

        let state = agent.run("", "the findings").await;

        assert!(state.blog_post.is_none());
        assert!(state.error.is_none());
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_findings_ends_without_model_call() {
        let model = Arc::new(CountingModel::ok("unused"));
        let agent = BloggerAgent::new(model.clone());

        let state = agent.run("the analysis", "").await;

        assert!(state.blog_post.is_none());
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_model_failure_lands_in_error() {
        let model = Arc::new(CountingModel::failing("completion unavailable"));
        let agent = BloggerAgent::new(model);

        let state = agent.run("the analysis", "the findings").await;

        assert_eq!(state.error.as_deref(), Some("completion unavailable"));
        assert!(state.blog_post.is_none());
    }
}
