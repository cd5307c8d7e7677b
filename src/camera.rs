// Camera module for webcam capture

use crate::error::Result;
use crate::models::Frame;
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType};
use nokhwa::Camera;
use tracing::{error, info};

/// Owns the webcam handle and produces single-frame snapshots on demand.
///
/// The manager is the only owner of the device; stopping it (or dropping it)
/// releases the stream deterministically, and stopping twice is a no-op.
pub struct CameraManager {
    camera: Camera,
    is_streaming: bool,
}

impl CameraManager {
    /// Opens a camera, preferring the configured index and falling back to
    /// index 0 (some systems enumerate devices differently)
    pub fn new(preferred_index: u32) -> Result<Self> {
        // Request 640x480 at 30 FPS for better performance
        let requested_format = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(
            nokhwa::utils::CameraFormat::new(
                nokhwa::utils::Resolution::new(640, 480),
                nokhwa::utils::FrameFormat::YUYV,
                30,
            ),
        ));

        let camera = Self::try_open_camera(preferred_index, requested_format)
            .or_else(|first_err| {
                if preferred_index != 0 {
                    Self::try_open_camera(0, requested_format)
                } else {
                    Err(first_err)
                }
            })
            .map_err(|e| {
                error!("Failed to open camera: {}", e);
                e
            })?;

        info!("Opened camera: {}", camera.info().human_name());
        Ok(Self {
            camera,
            is_streaming: false,
        })
    }

    /// Helper to try opening a camera at a specific index
    fn try_open_camera(index: u32, requested_format: RequestedFormat) -> Result<Camera> {
        Ok(Camera::new(CameraIndex::Index(index), requested_format)?)
    }

    /// Opens the camera stream and verifies it delivers frames
    pub fn start_stream(&mut self) -> Result<()> {
        if self.is_streaming {
            return Ok(());
        }

        self.camera.open_stream()?;

        // Give the device a moment to deliver its first frame
        std::thread::sleep(std::time::Duration::from_millis(200));

        match self.camera.frame() {
            Ok(_) => {
                self.is_streaming = true;
                Ok(())
            }
            Err(e) => {
                error!("Camera stream not delivering frames: {}", e);
                let _ = self.camera.stop_stream();
                Err(e.into())
            }
        }
    }

    /// Snapshots the camera's current frame as raw RGB.
    /// Stream must be opened first with start_stream().
    pub fn current_frame(&mut self) -> Result<Frame> {
        let frame_data = self.camera.frame()?;
        let buffer = frame_data.decode_image::<RgbFormat>()?;

        let (width, height) = (buffer.width(), buffer.height());
        let data = buffer.into_raw();

        Ok(Frame::new(data, width, height))
    }

    /// Stops the camera stream. Idempotent: stopping an already-stopped
    /// camera does nothing.
    pub fn stop(&mut self) {
        if !self.is_streaming {
            return;
        }

        self.is_streaming = false;

        if let Err(e) = self.camera.stop_stream() {
            error!("Error stopping camera stream: {}", e);
        }
    }

}

impl Drop for CameraManager {
    fn drop(&mut self) {
        self.stop();
    }
}
