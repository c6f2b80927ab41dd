// SPDX-License-Identifier: MIT

//! Research agent
//!
//! Graph: generate_queries -> check_queries -> perform_research | end.

use async_trait::async_trait;
use std::sync::Arc;

use crate::flow::graph::{Graph, GraphBuilder, Verdict};
use crate::flow::{execute, GraphAgent};
use crate::scribe::collab::{CompletionModel, SearchProvider};

const RESEARCHER_SYSTEM_PROMPT: &str =
    "You are a senior web researcher. Generate precise search queries.";

const RESEARCH_HEADER: &str = "External Research Findings:\n\n";

/// Queries at or below this length are considered malformed and skipped.
const MIN_QUERY_CHARS: usize = 2;

/// Terminal snapshot of one research run.
#[derive(Debug, Clone, Default)]
pub struct ResearchState {
    pub video_analysis: String,
    pub search_queries: Option<Vec<String>>,
    pub research_summary: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResearchNode {
    GenerateQueries,
    PerformResearch,
}

/// Guard: proceed to the searches only with a non-empty query list.
fn check_queries(state: &ResearchState) -> Verdict<ResearchNode> {
    if state.error.is_some() {
        return Verdict::End;
    }
    match &state.search_queries {
        Some(queries) if !queries.is_empty() => Verdict::Continue(ResearchNode::PerformResearch),
        _ => Verdict::End,
    }
}

/// Parse the query-generation response.
///
/// Ordered fallback: strip markdown code fences and parse as a JSON string
/// array; failing that, split into lines, keep lines longer than 5
/// characters, and strip leading list markers from each.
fn parse_queries(content: &str) -> Vec<String> {
    let cleaned = content.replace("```json", "").replace("```", "");
    if let Ok(queries) = serde_json::from_str::<Vec<String>>(cleaned.trim()) {
        return queries;
    }

    content
        .lines()
        .filter(|line| !line.trim().is_empty() && line.len() > 5)
        .map(|line| {
            line.trim()
                .trim_start_matches(|c: char| {
                    c.is_ascii_digit() || c == '.' || c == '-' || c == ' ' || c == '"'
                })
                .to_string()
        })
        .collect()
}

pub struct ResearchAgent {
    model: Arc<dyn CompletionModel>,
    search: Arc<dyn SearchProvider>,
    graph: Graph<ResearchState, ResearchNode>,
}

impl ResearchAgent {
    pub fn new(model: Arc<dyn CompletionModel>, search: Arc<dyn SearchProvider>) -> Self {
        let graph = GraphBuilder::new()
            .entry(ResearchNode::GenerateQueries)
            .conditional_edge(ResearchNode::GenerateQueries, check_queries)
            .terminal(ResearchNode::PerformResearch)
            .compile()
            .expect("research graph is statically valid");

        Self {
            model,
            search,
            graph,
        }
    }

    async fn generate_queries(&self, state: &mut ResearchState) {
        if state.video_analysis.is_empty() {
            state.error = Some("No video analysis provided for research context.".to_string());
            return;
        }

        let user_prompt = format!(
            "Based on the following video analysis, generate 3 specific, high-quality \
             search queries to find the latest updates, confirmed news, or verified facts.\n\
             \n\
             Video Analysis:\n\
             {}\n\
             \n\
             OUTPUT FORMAT:\n\
             Return ONLY a raw JSON list of strings. Do not use Markdown code blocks.\n\
             Example: [\"query 1\", \"query 2\", \"query 3\"]",
            state.video_analysis
        );

        let content = match self.model.complete(RESEARCHER_SYSTEM_PROMPT, &user_prompt).await {
            Ok(content) => content,
            Err(e) => {
                state.error = Some(e.to_string());
                return;
            }
        };

        let queries = parse_queries(&content);
        if queries.is_empty() {
            state.error =
                Some("Could not parse valid search queries from LLM response.".to_string());
            return;
        }

        log::info!("generated {} search queries", queries.len());
        state.search_queries = Some(queries);
    }

    async fn perform_research(&self, state: &mut ResearchState) {
        let queries = state.search_queries.clone().unwrap_or_default();
        if queries.is_empty() {
            state.error = Some("No queries to search.".to_string());
            return;
        }

        let mut summary = String::from(RESEARCH_HEADER);
        for query in &queries {
            if query.chars().count() <= MIN_QUERY_CHARS {
                log::debug!("skipping malformed query: '{}'", query);
                continue;
            }

            summary.push_str(&format!("--- Results for: {} ---\n", query));

            // Queries run strictly sequentially; a failed search degrades to
            // an inline note so partial research still reaches the blogger.
            match self.search.search(query).await {
                Ok(result) => summary.push_str(&result),
                Err(e) => {
                    log::warn!("search failed for '{}': {}", query, e);
                    summary.push_str(&format!("Search failed: {}", e));
                }
            }
            summary.push_str("\n\n");
        }

        state.research_summary = Some(summary);
    }

    /// Entry point: returns the terminal snapshot, errors folded into state.
    pub async fn run(&self, video_analysis: &str) -> ResearchState {
        let mut state = ResearchState {
            video_analysis: video_analysis.to_string(),
            ..Default::default()
        };

        if let Err(e) = execute(self, &mut state).await {
            state.error.get_or_insert(e.to_string());
        }
        state
    }
}

#[async_trait]
impl GraphAgent for ResearchAgent {
    type State = ResearchState;
    type Label = ResearchNode;

    fn name(&self) -> &str {
        "researcher"
    }

    fn graph(&self) -> &Graph<ResearchState, ResearchNode> {
        &self.graph
    }

    async fn step(&self, label: ResearchNode, state: &mut ResearchState) {
        match label {
            ResearchNode::GenerateQueries => self.generate_queries(state).await,
            ResearchNode::PerformResearch => self.perform_research(state).await,
        }
    }
}
