// SPDX-License-Identifier: MIT

//! External collaborators consumed by the agents
//!
//! Each collaborator is an opaque capability behind a trait seam:
//! - [completion] - language-model completion (Groq chat API)
//! - [search] - web search (Brave Search API)
//! - [transcript] - video transcript extraction (yt-dlp + timedtext)

pub mod completion;
pub mod search;
pub mod transcript;

pub use completion::{CompletionModel, GroqModel, DEFAULT_MODEL};
pub use search::{BraveSearch, SearchProvider};
pub use transcript::{TranscriptFetcher, YtDlpTranscripts};
