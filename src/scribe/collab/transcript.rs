// SPDX-License-Identifier: MIT

//! Transcript-fetch collaborator
//!
//! Video metadata comes from a `yt-dlp` subprocess; the selected caption
//! track is then downloaded and flattened into plain text. Caption-track
//! selection and timedtext parsing live here as pure helpers so the policy
//! is testable without network or subprocess.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::process::Stdio;
use tokio::process::Command;

use crate::flow::error::ScribeError;

/// Language preference for caption tracks, highest priority first.
const SUBTITLE_LANG_PRIORITY: [&str; 4] = ["en", "hi", "ja", "es"];

/// Machine-readable timedtext format preferred when the host offers it.
const PREFERRED_TRACK_EXT: &str = "json3";

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Transcript-fetch collaborator: video URL in, flat text transcript out.
#[async_trait]
pub trait TranscriptFetcher: Send + Sync {
    async fn fetch_transcript(&self, video_url: &str) -> Result<String, ScribeError>;
}

/// One caption track as reported by the video host.
#[derive(Debug, Clone, Deserialize)]
pub struct CaptionTrack {
    #[serde(default)]
    pub ext: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Subtitle metadata for a video: uploaded tracks and automatic captions,
/// both keyed by language code.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoCaptions {
    #[serde(default)]
    pub subtitles: HashMap<String, Vec<CaptionTrack>>,
    #[serde(default)]
    pub automatic_captions: HashMap<String, Vec<CaptionTrack>>,
}

#[derive(Debug, Default, Deserialize)]
struct TimedText {
    #[serde(default)]
    events: Vec<TimedEvent>,
}

#[derive(Debug, Default, Deserialize)]
struct TimedEvent {
    #[serde(default)]
    segs: Vec<TimedSeg>,
}

#[derive(Debug, Default, Deserialize)]
struct TimedSeg {
    #[serde(default)]
    utf8: String,
}

/// Fetches transcripts by asking `yt-dlp` for video metadata and downloading
/// the best caption track.
pub struct YtDlpTranscripts {
    client: Client,
}

impl YtDlpTranscripts {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Get subtitle metadata without downloading the video.
    async fn video_captions(&self, video_url: &str) -> Result<VideoCaptions, ScribeError> {
        log::info!("fetching video metadata: {}", video_url);

        let mut cmd = Command::new("yt-dlp");
        cmd.arg("--dump-single-json")
            .arg("--skip-download")
            .arg("--no-playlist")
            .arg("--no-warnings")
            .arg("--user-agent")
            .arg(BROWSER_USER_AGENT);

        // Cookie jar is collaborator configuration, not pipeline logic.
        if let Ok(cookies) = env::var("YTDLP_COOKIES_FILE") {
            if !cookies.is_empty() {
                cmd.arg("--cookies").arg(cookies);
            }
        }

        let output = cmd
            .arg(video_url)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                ScribeError::extraction(format!(
                    "Failed to execute yt-dlp: {}. Make sure yt-dlp is installed.",
                    e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            log::error!("yt-dlp error: {}", stderr);
            return Err(ScribeError::extraction(format!(
                "yt-dlp failed: {}",
                stderr.trim()
            )));
        }

        if output.stdout.iter().all(|b| b.is_ascii_whitespace()) {
            return Err(ScribeError::extraction("yt-dlp returned no information."));
        }

        serde_json::from_slice(&output.stdout).map_err(|e| {
            ScribeError::extraction(format!("Failed to parse yt-dlp JSON output: {}", e))
        })
    }
}

impl Default for YtDlpTranscripts {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TranscriptFetcher for YtDlpTranscripts {
    async fn fetch_transcript(&self, video_url: &str) -> Result<String, ScribeError> {
        let captions = self.video_captions(video_url).await?;
        let track_url = select_caption_url(&captions)?;

        let resp = self
            .client
            .get(&track_url)
            .header(reqwest::header::USER_AGENT, BROWSER_USER_AGENT)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(ScribeError::extraction(format!(
                "Failed to download subs. Status: {}",
                resp.status().as_u16()
            )));
        }

        let timed: TimedText = resp.json().await?;
        Ok(flatten_timed_text(&timed))
    }
}

/// Pick the URL of the caption track to download.
///
/// Uploaded subtitles take precedence over automatic captions for the same
/// language; languages are tried in the fixed priority order, falling back
/// to the alphabetically first available one.
pub fn select_caption_url(captions: &VideoCaptions) -> Result<String, ScribeError> {
    let mut merged: HashMap<&str, &[CaptionTrack]> = HashMap::new();
    for (lang, tracks) in &captions.automatic_captions {
        merged.insert(lang.as_str(), tracks.as_slice());
    }
    for (lang, tracks) in &captions.subtitles {
        merged.insert(lang.as_str(), tracks.as_slice());
    }

    if merged.is_empty() {
        return Err(ScribeError::extraction(
            "No subtitles found in video metadata.",
        ));
    }

    let chosen_lang = SUBTITLE_LANG_PRIORITY
        .iter()
        .copied()
        .find(|lang| merged.contains_key(lang))
        .or_else(|| merged.keys().min().copied())
        .unwrap_or_default();

    let tracks = merged.get(chosen_lang).copied().unwrap_or(&[]);
    log::debug!("selected caption language '{}'", chosen_lang);

    let preferred = tracks
        .iter()
        .find(|t| t.ext.as_deref() == Some(PREFERRED_TRACK_EXT) && t.url.is_some());
    let fallback = tracks.iter().find(|t| t.url.is_some());

    preferred
        .or(fallback)
        .and_then(|t| t.url.clone())
        .ok_or_else(|| ScribeError::extraction("Could not find a valid subtitle URL."))
}

/// Flatten timedtext caption events into a single whitespace-joined string.
fn flatten_timed_text(timed: &TimedText) -> String {
    timed
        .events
        .iter()
        .flat_map(|event| event.segs.iter())
        .map(|seg| seg.utf8.trim())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(ext: &str, url: &str) -> CaptionTrack {
        CaptionTrack {
            ext: Some(ext.to_string()),
            url: Some(url.to_string()),
        }
    }

    #[test]
    fn test_no_tracks_yields_exact_error() {
        let err = select_caption_url(&VideoCaptions::default()).unwrap_err();
        assert_eq!(err.to_string(), "No subtitles found in video metadata.");
    }

    #[test]
    fn test_language_priority_over_auto_captions() {
        let mut captions = VideoCaptions::default();
        captions
            .automatic_captions
            .insert("fr".to_string(), vec![track("json3", "https://fr.example")]);
        captions
            .automatic_captions
            .insert("hi".to_string(), vec![track("json3", "https://hi.example")]);

        let url = select_caption_url(&captions).unwrap();
        assert_eq!(url, "https://hi.example");
    }

    #[test]
    fn test_uploaded_subtitles_override_auto_for_same_language() {
        let mut captions = VideoCaptions::default();
        captions
            .automatic_captions
            .insert("en".to_string(), vec![track("json3", "https://auto.example")]);
        captions
            .subtitles
            .insert("en".to_string(), vec![track("json3", "https://sub.example")]);

        let url = select_caption_url(&captions).unwrap();
        assert_eq!(url, "https://sub.example");
    }

    #[test]
    fn test_fallback_to_first_available_language() {
        let mut captions = VideoCaptions::default();
        captions
            .automatic_captions
            .insert("fr".to_string(), vec![track("json3", "https://fr.example")]);
        captions
            .automatic_captions
            .insert("de".to_string(), vec![track("json3", "https://de.example")]);

        // No priority language present; alphabetically first wins.
        let url = select_caption_url(&captions).unwrap();
        assert_eq!(url, "https://de.example");
    }

    #[test]
    fn test_json3_track_preferred() {
        let mut captions = VideoCaptions::default();
        captions.subtitles.insert(
            "en".to_string(),
            vec![track("vtt", "https://vtt.example"), track("json3", "https://json3.example")],
        );

        let url = select_caption_url(&captions).unwrap();
        assert_eq!(url, "https://json3.example");
    }

    #[test]
    fn test_first_track_when_no_json3() {
        let mut captions = VideoCaptions::default();
        captions.subtitles.insert(
            "en".to_string(),
            vec![track("vtt", "https://vtt.example"), track("srv1", "https://srv1.example")],
        );

        let url = select_caption_url(&captions).unwrap();
        assert_eq!(url, "https://vtt.example");
    }

    #[test]
    fn test_tracks_without_urls_yield_exact_error() {
        let mut captions = VideoCaptions::default();
        captions.subtitles.insert(
            "en".to_string(),
            vec![CaptionTrack {
                ext: Some("json3".to_string()),
                url: None,
            }],
        );

        let err = select_caption_url(&captions).unwrap_err();
        assert_eq!(err.to_string(), "Could not find a valid subtitle URL.");
    }

    #[test]
    fn test_flatten_timed_text() {
        let timed: TimedText = serde_json::from_str(
            r#"{
                "events": [
                    { "segs": [ { "utf8": "Hello " }, { "utf8": "world" } ] },
                    { "segs": [ { "utf8": "\n" } ] },
                    { "segs": [ { "utf8": "again" } ] }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(flatten_timed_text(&timed), "Hello world again");
    }

    #[test]
    fn test_flatten_timed_text_empty_events() {
        let timed: TimedText = serde_json::from_str(r#"{ "events": [] }"#).unwrap();
        assert_eq!(flatten_timed_text(&timed), "");
    }
}
