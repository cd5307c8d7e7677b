// Error types for the Behavior Lens application

use thiserror::Error;

/// Main error type for Behavior Lens operations
#[derive(Debug, Error)]
pub enum BehaviorLensError {
    #[error("Camera initialization failed: {0}")]
    CameraInit(String),

    #[error("Camera access denied: {0}")]
    PermissionDenied(String),

    #[error("Frame processing failed: {0}")]
    FrameProcessing(String),

    #[error("No frame available: {0}")]
    NoFrameAvailable(String),

    #[error("Remote analysis failed: {0}")]
    RemoteAnalysis(String),

    #[error("Malformed analysis response: {0}")]
    MalformedResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    ImageEncode(#[from] image::ImageError),
}

/// Result type alias for Behavior Lens operations
pub type Result<T> = std::result::Result<T, BehaviorLensError>;

// Conversion from nokhwa errors
impl From<nokhwa::NokhwaError> for BehaviorLensError {
    fn from(err: nokhwa::NokhwaError) -> Self {
        match err {
            nokhwa::NokhwaError::OpenDeviceError(device, error) => {
                let lowered = error.to_lowercase();
                if lowered.contains("denied") || lowered.contains("permission") {
                    BehaviorLensError::PermissionDenied(format!("Device {device}: {error}"))
                } else {
                    BehaviorLensError::CameraInit(format!("Device {device}: {error}"))
                }
            }
            nokhwa::NokhwaError::StructureError { structure, error } => {
                BehaviorLensError::CameraInit(format!("{structure}: {error}"))
            }
            nokhwa::NokhwaError::ReadFrameError(error) => BehaviorLensError::FrameProcessing(error),
            _ => BehaviorLensError::CameraInit(err.to_string()),
        }
    }
}
