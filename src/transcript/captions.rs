//! Remote captions retrieval.
//!
//! Talks to the captions provider over plain HTTP: the watch page embeds a
//! player-response JSON blob that says whether captions exist, and each
//! caption track points at a timed-text payload. The payload arrives in one
//! of several shapes depending on provider version and format parameter, so
//! decoding runs through an ordered chain of decoders rather than assuming
//! a single shape.

use super::{Transcript, TranscriptSegment};
use crate::error::CaptionError;
use crate::resolver::VideoId;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};

const PLAYER_RESPONSE_MARKER: &str = "ytInitialPlayerResponse = ";

// The provider serves a consent interstitial to clients without a browser
// user agent.
const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:109.0) Gecko/20100101 Firefox/117.0";

/// Fetches pre-existing captions for a video id.
pub struct CaptionSource {
    http: reqwest::Client,
    languages: Vec<String>,
}

impl CaptionSource {
    /// Create a caption source preferring the given language codes, in order.
    pub fn new(languages: &[String]) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            languages: languages.to_vec(),
        }
    }

    /// Fetch the caption track for a video and normalize it.
    ///
    /// Single attempt; retry policy, if any, belongs to the caller.
    #[instrument(skip(self), fields(video_id = %id))]
    pub async fn fetch(&self, id: &VideoId) -> Result<Transcript, CaptionError> {
        let html = self
            .http
            .get(id.watch_url())
            .send()
            .await
            .map_err(|e| CaptionError::Provider(format!("watch page request failed: {e}")))?
            .text()
            .await
            .map_err(|e| CaptionError::Provider(format!("watch page read failed: {e}")))?;

        let player = extract_player_response(&html)?;
        let track = select_track(&player, &self.languages)?;

        let base_url = track
            .get("baseUrl")
            .and_then(Value::as_str)
            .ok_or_else(|| CaptionError::Provider("caption track has no baseUrl".to_string()))?;
        let language = track
            .get("languageCode")
            .and_then(Value::as_str)
            .map(|s| s.to_string());

        let payload = self
            .http
            .get(format!("{base_url}&fmt=json3"))
            .send()
            .await
            .map_err(|e| CaptionError::Provider(format!("timed-text request failed: {e}")))?
            .text()
            .await
            .map_err(|e| CaptionError::Provider(format!("timed-text read failed: {e}")))?;

        let segments = decode_payload(&payload)?;
        debug!("Fetched {} caption segments", segments.len());

        Ok(Transcript::new(segments, language))
    }
}

/// Locate and parse the player-response JSON embedded in the watch page.
fn extract_player_response(html: &str) -> Result<Value, CaptionError> {
    let start = html
        .find(PLAYER_RESPONSE_MARKER)
        .ok_or_else(|| CaptionError::Provider("player response not found in page".to_string()))?
        + PLAYER_RESPONSE_MARKER.len();

    // The marker is followed by a JSON object and then more script text;
    // stop at the end of the first complete value.
    serde_json::Deserializer::from_str(&html[start..])
        .into_iter::<Value>()
        .next()
        .and_then(|r| r.ok())
        .ok_or_else(|| CaptionError::Provider("player response is not valid JSON".to_string()))
}

/// Map playability and track availability to the typed failure set, then
/// pick a track by language preference.
fn select_track<'a>(player: &'a Value, languages: &[String]) -> Result<&'a Value, CaptionError> {
    let status = player
        .pointer("/playabilityStatus/status")
        .and_then(Value::as_str)
        .unwrap_or("OK");
    if matches!(status, "ERROR" | "LOGIN_REQUIRED" | "UNPLAYABLE") {
        return Err(CaptionError::Unavailable);
    }

    let captions = player.get("captions").ok_or(CaptionError::Disabled)?;

    let tracks = captions
        .pointer("/playerCaptionsTracklistRenderer/captionTracks")
        .and_then(Value::as_array)
        .filter(|t| !t.is_empty())
        .ok_or(CaptionError::NotFound)?;

    for lang in languages {
        if let Some(track) = tracks.iter().find(|t| {
            t.get("languageCode").and_then(Value::as_str) == Some(lang.as_str())
        }) {
            return Ok(track);
        }
    }

    Ok(&tracks[0])
}

/// Decode a timed-text payload through the known shapes, first match wins.
fn decode_payload(payload: &str) -> Result<Vec<TranscriptSegment>, CaptionError> {
    let value: Value = serde_json::from_str(payload)
        .map_err(|e| CaptionError::Provider(format!("caption payload is not JSON: {e}")))?;

    type Decoder = fn(&Value) -> Option<Vec<TranscriptSegment>>;
    const DECODERS: &[Decoder] = &[decode_events, decode_entries];

    DECODERS
        .iter()
        .find_map(|decode| decode(&value))
        .ok_or_else(|| CaptionError::Provider("unrecognized caption payload shape".to_string()))
}

/// Modern shape: `{"events": [{"tStartMs", "dDurationMs", "segs": [{"utf8"}]}]}`.
fn decode_events(value: &Value) -> Option<Vec<TranscriptSegment>> {
    let events = value.get("events")?.as_array()?;

    Some(
        events
            .iter()
            .filter_map(|e| serde_json::from_value::<CaptionEvent>(e.clone()).ok())
            .filter_map(|e| e.into_segment())
            .collect(),
    )
}

/// Plain shape: `[{"text", "start", "duration"}]`.
fn decode_entries(value: &Value) -> Option<Vec<TranscriptSegment>> {
    let entries = value.as_array()?;

    entries.iter().map(segment_from_entry).collect()
}

/// Normalize a dict-shaped caption entry.
fn segment_from_entry(entry: &Value) -> Option<TranscriptSegment> {
    Some(TranscriptSegment::new(
        entry.get("text")?.as_str()?,
        entry.get("start").and_then(Value::as_f64).unwrap_or(0.0),
        entry.get("duration").and_then(Value::as_f64).unwrap_or(0.0),
    ))
}

/// One timed-text event from the modern payload shape.
#[derive(Debug, Deserialize)]
struct CaptionEvent {
    #[serde(rename = "tStartMs", default)]
    t_start_ms: f64,
    #[serde(rename = "dDurationMs", default)]
    d_duration_ms: f64,
    #[serde(default)]
    segs: Vec<CaptionSeg>,
}

#[derive(Debug, Deserialize)]
struct CaptionSeg {
    #[serde(default)]
    utf8: String,
}

impl CaptionEvent {
    /// Normalize to the canonical segment shape.
    ///
    /// Events without text are timing markers, not utterances.
    fn into_segment(self) -> Option<TranscriptSegment> {
        let text: String = self.segs.iter().map(|s| s.utf8.as_str()).collect();
        if text.trim().is_empty() {
            return None;
        }

        Some(TranscriptSegment::new(
            text,
            self.t_start_ms / 1000.0,
            self.d_duration_ms / 1000.0,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entry_and_event_normalize_identically() {
        let entry = json!({"text": "hi", "start": 0.0, "duration": 1.2});
        let from_entry = segment_from_entry(&entry).unwrap();

        let event = CaptionEvent {
            t_start_ms: 0.0,
            d_duration_ms: 1200.0,
            segs: vec![CaptionSeg {
                utf8: "hi".to_string(),
            }],
        };
        let from_event = event.into_segment().unwrap();

        assert_eq!(from_entry, from_event);
    }

    #[test]
    fn test_decode_events_payload() {
        let payload = r#"{"events":[
            {"tStartMs":0,"dDurationMs":1500,"segs":[{"utf8":"hello "},{"utf8":"there"}]},
            {"tStartMs":1500,"dDurationMs":2000},
            {"tStartMs":3500,"dDurationMs":1000,"segs":[{"utf8":"world"}]}
        ]}"#;

        let segments = decode_payload(payload).unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].text, "hello there");
        assert_eq!(segments[1].start, 3.5);
        assert_eq!(segments[1].duration, 1.0);
    }

    #[test]
    fn test_decode_entry_list_payload() {
        let payload = r#"[
            {"text": "one", "start": 0.0, "duration": 1.0},
            {"text": "two", "start": 1.0, "duration": 2.5}
        ]"#;

        let segments = decode_payload(payload).unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].text, "two");
        assert_eq!(segments[1].duration, 2.5);
    }

    #[test]
    fn test_decode_rejects_unknown_shape() {
        assert!(matches!(
            decode_payload(r#"{"unexpected": true}"#),
            Err(CaptionError::Provider(_))
        ));
        assert!(matches!(
            decode_payload("<transcript/>"),
            Err(CaptionError::Provider(_))
        ));
    }

    #[test]
    fn test_select_track_failure_mapping() {
        let unavailable = json!({"playabilityStatus": {"status": "ERROR"}});
        assert!(matches!(
            select_track(&unavailable, &[]),
            Err(CaptionError::Unavailable)
        ));

        let disabled = json!({"playabilityStatus": {"status": "OK"}});
        assert!(matches!(
            select_track(&disabled, &[]),
            Err(CaptionError::Disabled)
        ));

        let no_tracks = json!({
            "playabilityStatus": {"status": "OK"},
            "captions": {"playerCaptionsTracklistRenderer": {"captionTracks": []}}
        });
        assert!(matches!(
            select_track(&no_tracks, &[]),
            Err(CaptionError::NotFound)
        ));
    }

    #[test]
    fn test_select_track_prefers_language() {
        let player = json!({
            "playabilityStatus": {"status": "OK"},
            "captions": {"playerCaptionsTracklistRenderer": {"captionTracks": [
                {"baseUrl": "https://example.com/a", "languageCode": "de"},
                {"baseUrl": "https://example.com/b", "languageCode": "en"}
            ]}}
        });

        let track = select_track(&player, &["en".to_string()]).unwrap();
        assert_eq!(track["languageCode"], "en");

        // No preference match falls back to the first track.
        let track = select_track(&player, &["fr".to_string()]).unwrap();
        assert_eq!(track["languageCode"], "de");
    }

    #[test]
    fn test_extract_player_response() {
        let html = r#"<script>var ytInitialPlayerResponse = {"playabilityStatus":{"status":"OK"}};var other = 1;</script>"#;
        let player = extract_player_response(html).unwrap();
        assert_eq!(player["playabilityStatus"]["status"], "OK");
    }
}
