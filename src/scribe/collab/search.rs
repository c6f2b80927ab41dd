// SPDX-License-Identifier: MIT

//! Search collaborator - Brave Search API

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::env;

use crate::flow::error::ScribeError;

const RESULT_COUNT: u32 = 5;

/// Search collaborator: a query string in, plain text findings out.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str) -> Result<String, ScribeError>;
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    title: String,
    url: String,
    #[serde(default)]
    description: String,
}

/// Brave web search client
pub struct BraveSearch {
    client: Client,
    api_key: String,
}

impl BraveSearch {
    /// Create a new BraveSearch
    ///
    /// Requires `BRAVE_API_KEY` environment variable to be set.
    pub fn new() -> Result<Self, ScribeError> {
        let api_key = env::var("BRAVE_API_KEY")
            .map_err(|_| ScribeError::config("BRAVE_API_KEY must be set"))?;
        Ok(Self {
            client: Client::new(),
            api_key,
        })
    }
}

#[async_trait]
impl SearchProvider for BraveSearch {
    async fn search(&self, query: &str) -> Result<String, ScribeError> {
        let mut url = reqwest::Url::parse("https://api.search.brave.com/res/v1/web/search")
            .map_err(|e| ScribeError::other(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("count", &RESULT_COUNT.to_string());

        let resp = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .header("X-Subscription-Token", &self.api_key)
            .send()
            .await?;

        if !resp.status().is_success() {
            let text = resp.text().await?;
            return Err(ScribeError::api("Brave", text));
        }

        let body: serde_json::Value = resp.json().await?;
        let results_json = body
            .get("web")
            .and_then(|w| w.get("results"))
            .ok_or_else(|| {
                ScribeError::InvalidResponse("missing web.results in search response".to_string())
            })?;

        let results: Vec<SearchResult> = serde_json::from_value(results_json.clone())?;
        Ok(format_results(&results))
    }
}

/// Render search results as plain text suitable for prompt embedding.
fn format_results(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return "No results found.".to_string();
    }

    results
        .iter()
        .map(|r| format!("{}\n{}\n{}", r.title, r.url, r.description))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_results() {
        let results = vec![
            SearchResult {
                title: "First".to_string(),
                url: "https://a.example".to_string(),
                description: "one".to_string(),
            },
            SearchResult {
                title: "Second".to_string(),
                url: "https://b.example".to_string(),
                description: "two".to_string(),
            },
        ];

        let text = format_results(&results);
        assert!(text.contains("First\nhttps://a.example\none"));
        assert!(text.contains("Second"));
        assert!(text.contains("\n\n"));
    }

    #[test]
    fn test_format_results_empty() {
        assert_eq!(format_results(&[]), "No results found.");
    }

    #[test]
    fn test_result_description_defaults_empty() {
        let result: SearchResult =
            serde_json::from_value(serde_json::json!({"title": "t", "url": "u"})).unwrap();
        assert_eq!(result.description, "");
    }
}
