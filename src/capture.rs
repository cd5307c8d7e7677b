// Frame capture: rasterized RGB frame to base64 JPEG

use crate::error::{BehaviorLensError, Result};
use crate::models::Frame;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};
use std::io::Cursor;

/// Encodes a captured frame as a base64 JPEG string for the analysis request.
///
/// Each call produces an independent snapshot; nothing is cached between
/// calls. A frame with zero width or height means the media has not produced
/// a displayable frame yet, and the caller must abort the analysis before
/// contacting the remote service.
pub fn encode_frame(frame: &Frame, quality: u8) -> Result<String> {
    if frame.width == 0 || frame.height == 0 {
        return Err(BehaviorLensError::NoFrameAvailable(format!(
            "frame has zero dimensions ({}x{})",
            frame.width, frame.height
        )));
    }

    let expected_len = frame.width as usize * frame.height as usize * 3;
    if frame.data.len() != expected_len {
        return Err(BehaviorLensError::FrameProcessing(format!(
            "frame buffer length {} does not match {}x{} RGB",
            frame.data.len(),
            frame.width,
            frame.height
        )));
    }

    let mut jpeg = Vec::new();
    let encoder = JpegEncoder::new_with_quality(Cursor::new(&mut jpeg), quality);
    encoder.write_image(
        &frame.data,
        frame.width,
        frame.height,
        ExtendedColorType::Rgb8,
    )?;

    Ok(STANDARD.encode(&jpeg))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_frame(width: u32, height: u32) -> Frame {
        Frame::new(vec![128u8; (width * height * 3) as usize], width, height)
    }

    #[test]
    fn zero_width_frame_is_rejected() {
        let frame = Frame::new(Vec::new(), 0, 480);
        let err = encode_frame(&frame, 80).unwrap_err();
        assert!(matches!(err, BehaviorLensError::NoFrameAvailable(_)));
    }

    #[test]
    fn zero_height_frame_is_rejected() {
        let frame = Frame::new(Vec::new(), 640, 0);
        let err = encode_frame(&frame, 80).unwrap_err();
        assert!(matches!(err, BehaviorLensError::NoFrameAvailable(_)));
    }

    #[test]
    fn mismatched_buffer_length_is_rejected() {
        let frame = Frame::new(vec![0u8; 10], 640, 480);
        let err = encode_frame(&frame, 80).unwrap_err();
        assert!(matches!(err, BehaviorLensError::FrameProcessing(_)));
    }

    #[test]
    fn valid_frame_produces_base64_jpeg() {
        let frame = solid_frame(16, 16);
        let encoded = encode_frame(&frame, 80).unwrap();
        assert!(!encoded.is_empty());

        let jpeg = STANDARD.decode(&encoded).unwrap();
        // JPEG SOI marker
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn successive_captures_are_independent() {
        let bright = Frame::new(vec![250u8; 16 * 16 * 3], 16, 16);
        let dark = Frame::new(vec![5u8; 16 * 16 * 3], 16, 16);
        let first = encode_frame(&bright, 80).unwrap();
        let second = encode_frame(&dark, 80).unwrap();
        assert_ne!(first, second);
    }
}
