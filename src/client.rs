// HTTP client for the remote analysis service

use crate::error::{BehaviorLensError, Result};
use crate::models::RawAnalysisResult;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, error};

/// Client for `POST {base_url}/analyze`.
///
/// Two request shapes, one response contract: the service always returns the
/// raw classification fields (`emotion`, `age`, ...) and the caller always
/// runs the score mapping locally. One attempt per call; no retries.
pub struct AnalysisClient {
    agent: ureq::Agent,
    base_url: String,
}

impl AnalysisClient {
    /// Creates a client against the given service base URL
    pub fn new(base_url: &str) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().build(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn analyze_url(&self) -> String {
        format!("{}/analyze", self.base_url)
    }

    /// Analyzes a single still image, passed as base64 JPEG data
    pub fn analyze_image(&self, image_base64: &str) -> Result<RawAnalysisResult> {
        let url = self.analyze_url();
        let body = serde_json::json!({ "image": image_base64 }).to_string();
        debug!("POST {} ({} byte image payload)", url, body.len());

        let response = self
            .agent
            .post(&url)
            .set("content-type", "application/json")
            .send_string(&body)
            .map_err(map_request_error)?;

        let text = response
            .into_string()
            .map_err(|e| BehaviorLensError::RemoteAnalysis(format!("read response body: {e}")))?;
        parse_analysis_response(&text)
    }

    /// Analyzes an uploaded video file, sent as a single multipart file field
    pub fn analyze_video(&self, file_name: &str, bytes: &[u8]) -> Result<RawAnalysisResult> {
        let url = self.analyze_url();
        let boundary = multipart_boundary();
        let body = build_multipart_body(&boundary, "video", file_name, bytes);
        debug!("POST {} ({} byte video payload)", url, body.len());

        let response = self
            .agent
            .post(&url)
            .set(
                "content-type",
                &format!("multipart/form-data; boundary={boundary}"),
            )
            .send_bytes(&body)
            .map_err(map_request_error)?;

        let text = response
            .into_string()
            .map_err(|e| BehaviorLensError::RemoteAnalysis(format!("read response body: {e}")))?;
        parse_analysis_response(&text)
    }
}

fn map_request_error(err: ureq::Error) -> BehaviorLensError {
    match err {
        ureq::Error::Status(code, _) => {
            error!("Analysis service returned HTTP {}", code);
            BehaviorLensError::RemoteAnalysis(format!("service returned HTTP {code}"))
        }
        ureq::Error::Transport(transport) => {
            error!("Analysis request transport failure: {}", transport);
            BehaviorLensError::RemoteAnalysis(transport.to_string())
        }
    }
}

/// Validates the service response at the boundary. A body that is not JSON
/// or lacks the required classification fields is a `MalformedResponse`.
pub fn parse_analysis_response(body: &str) -> Result<RawAnalysisResult> {
    serde_json::from_str(body).map_err(|e| {
        BehaviorLensError::MalformedResponse(format!("{e} (body: {})", truncate(body, 120)))
    })
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn multipart_boundary() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    format!("----behavior-lens-{nanos:x}")
}

/// Builds an RFC 2046 multipart/form-data body with a single file field
fn build_multipart_body(boundary: &str, field: &str, file_name: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(bytes.len() + 256);
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_response() {
        let result = parse_analysis_response(
            r#"{"emotion": "happy", "age": 22, "gender": "Woman", "race": "asian"}"#,
        )
        .unwrap();
        assert_eq!(result.emotion, "happy");
        assert_eq!(result.age, 22.0);
        assert_eq!(result.gender.as_deref(), Some("Woman"));
        assert_eq!(result.race.as_deref(), Some("asian"));
    }

    #[test]
    fn missing_emotion_is_malformed() {
        let err = parse_analysis_response(r#"{"age": 22}"#).unwrap_err();
        assert!(matches!(err, BehaviorLensError::MalformedResponse(_)));
    }

    #[test]
    fn missing_age_is_malformed() {
        let err = parse_analysis_response(r#"{"emotion": "neutral"}"#).unwrap_err();
        assert!(matches!(err, BehaviorLensError::MalformedResponse(_)));
    }

    #[test]
    fn non_json_body_is_malformed() {
        let err = parse_analysis_response("<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, BehaviorLensError::MalformedResponse(_)));
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let client = AnalysisClient::new("http://localhost:5000/");
        assert_eq!(client.analyze_url(), "http://localhost:5000/analyze");
    }

    #[test]
    fn multipart_body_frames_the_file_field() {
        let body = build_multipart_body("XYZ", "video", "clip.mp4", b"abcd");
        let text = String::from_utf8_lossy(&body);
        assert!(text.starts_with("--XYZ\r\n"));
        assert!(text.contains("Content-Disposition: form-data; name=\"video\"; filename=\"clip.mp4\""));
        assert!(text.contains("abcd"));
        assert!(text.ends_with("\r\n--XYZ--\r\n"));
    }

    #[test]
    fn boundary_is_usable_in_a_header() {
        let boundary = multipart_boundary();
        assert!(boundary.starts_with("----behavior-lens-"));
        assert!(boundary.is_ascii());
    }
}
