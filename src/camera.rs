//! Video sources.
//!
//! Camera lifecycle (permissions, device selection) belongs to the host; the
//! engine only needs frame dimensions and an RGB snapshot on demand.

use image::{ImageBuffer, Rgb, RgbImage};
use nokhwa::{
    pixel_format::RgbFormat,
    utils::{CameraIndex, RequestedFormat, RequestedFormatType},
    Camera,
};
use anyhow::{anyhow, Context};

use crate::error::{Error, Result};
use crate::types::FrameSize;

pub trait VideoSource: Send {
    fn frame_size(&self) -> FrameSize;

    /// Current frame as an RGB buffer. May fail transiently (device busy);
    /// callers treat that like a skipped cycle.
    fn snapshot(&mut self) -> Result<RgbImage>;
}

/// Webcam source over nokhwa, used by the demo binary.
pub struct CameraSource {
    camera: Camera,
}

impl CameraSource {
    pub fn new(index: usize) -> anyhow::Result<Self> {
        let cam_index = CameraIndex::Index(index as u32);
        let requested =
            RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate);
        let mut camera =
            Camera::new(cam_index, requested).context("Failed to create camera instance")?;

        camera
            .open_stream()
            .map_err(|e| anyhow!(e))
            .context("Failed to open camera stream")?;

        Ok(Self { camera })
    }

    pub fn name(&self) -> String {
        self.camera.info().human_name()
    }
}

impl VideoSource for CameraSource {
    fn frame_size(&self) -> FrameSize {
        let res = self.camera.resolution();
        FrameSize::new(res.width(), res.height())
    }

    fn snapshot(&mut self) -> Result<RgbImage> {
        let frame = self
            .camera
            .frame()
            .map_err(|e| Error::VideoSource(format!("failed to get frame: {e}")))?;
        frame
            .decode_image::<RgbFormat>()
            .map_err(|e| Error::VideoSource(format!("failed to decode frame: {e}")))
    }
}

/// Fixed-image source for tests and headless runs.
pub struct StaticSource {
    frame: RgbImage,
}

impl StaticSource {
    pub fn new(frame: RgbImage) -> Self {
        Self { frame }
    }

    pub fn flat(width: u32, height: u32, gray: u8) -> Self {
        Self::new(ImageBuffer::from_pixel(width, height, Rgb([gray, gray, gray])))
    }
}

impl VideoSource for StaticSource {
    fn frame_size(&self) -> FrameSize {
        FrameSize::new(self.frame.width(), self.frame.height())
    }

    fn snapshot(&mut self) -> Result<RgbImage> {
        Ok(self.frame.clone())
    }
}
