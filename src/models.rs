// Core data models for the Behavior Lens application

use serde::Deserialize;
use std::path::PathBuf;

/// Represents a single video frame with RGB data
#[derive(Clone, Debug)]
pub struct Frame {
    /// Raw RGB pixel data (width * height * 3 bytes)
    pub data: Vec<u8>,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
}

impl Frame {
    /// Creates a new Frame with the given parameters
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            data,
            width,
            height,
        }
    }
}

/// The single active input bound to the preview surface.
///
/// At most one source is active at a time; switching sources releases the
/// previous one (camera tracks stopped, file reference dropped).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VideoSource {
    /// Live webcam stream
    Camera,
    /// A video file selected by the user
    File(PathBuf),
}

impl VideoSource {
    /// Short human-readable description for the preview area
    pub fn label(&self) -> String {
        match self {
            VideoSource::Camera => "Webcam".to_string(),
            VideoSource::File(path) => path
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string()),
        }
    }
}

/// Raw classification output from the remote analysis service.
///
/// `emotion` is an open string set (the service's emotion vocabulary is not
/// guaranteed to be exhaustive); unknown values fall through the mapper's
/// else branch. `gender` and `race` are reported by the service but unused
/// by the score mapping.
#[derive(Clone, Debug, Deserialize)]
pub struct RawAnalysisResult {
    pub emotion: String,
    pub age: f64,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub race: Option<String>,
}

/// The three derived presentation metrics, each in [0, 1].
///
/// Replaced wholesale on every successful analysis; never partially updated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoreTriple {
    pub laziness: f32,
    pub attentiveness: f32,
    pub concentration: f32,
}

impl ScoreTriple {
    /// Creates a new ScoreTriple
    pub fn new(laziness: f32, attentiveness: f32, concentration: f32) -> Self {
        Self {
            laziness,
            attentiveness,
            concentration,
        }
    }
}

/// Converts a [0, 1] score to a rounded integer percentage (0-100)
pub fn score_percent(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 100.0).round() as u8
}

/// Formats a [0, 1] score as a percent label, e.g. "42%"
pub fn percent_label(value: f32) -> String {
    format!("{}%", score_percent(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_label_rounds_to_nearest_integer() {
        assert_eq!(percent_label(0.42), "42%");
        assert_eq!(percent_label(0.0), "0%");
        assert_eq!(percent_label(1.0), "100%");
        assert_eq!(percent_label(0.875), "88%");
    }

    #[test]
    fn score_percent_is_monotonic() {
        let values = [0.0, 0.1, 0.25, 0.4999, 0.5, 0.75, 0.99, 1.0];
        for pair in values.windows(2) {
            assert!(score_percent(pair[0]) <= score_percent(pair[1]));
        }
    }

    #[test]
    fn score_percent_clamps_out_of_range_input() {
        assert_eq!(score_percent(-0.5), 0);
        assert_eq!(score_percent(1.5), 100);
    }

    #[test]
    fn video_source_label_uses_file_name() {
        let source = VideoSource::File(PathBuf::from("/tmp/clips/session.mp4"));
        assert_eq!(source.label(), "session.mp4");
        assert_eq!(VideoSource::Camera.label(), "Webcam");
    }

    #[test]
    fn raw_result_tolerates_missing_optional_fields() {
        let parsed: RawAnalysisResult =
            serde_json::from_str(r#"{"emotion": "happy", "age": 22}"#).unwrap();
        assert_eq!(parsed.emotion, "happy");
        assert_eq!(parsed.age, 22.0);
        assert!(parsed.gender.is_none());
        assert!(parsed.race.is_none());
    }
}
