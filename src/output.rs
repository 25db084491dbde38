use anyhow::Result;
use image::RgbImage;

use tryon::lighting::LightingState;
use tryon::types::OverlayTransform;

/// Preview window for the demo binary: blits the camera frame and draws the
/// current overlay rectangle on top.
pub struct PreviewWindow {
    window: minifb::Window,
    buffer: Vec<u32>,
    width: usize,
    height: usize,
}

impl PreviewWindow {
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self> {
        let mut window = minifb::Window::new(
            title,
            width,
            height,
            minifb::WindowOptions {
                resize: true,
                ..minifb::WindowOptions::default()
            },
        )
        .map_err(|e| anyhow::anyhow!("Failed to create window: {}", e))?;

        window.limit_update_rate(Some(std::time::Duration::from_micros(16600))); // ~60 FPS

        Ok(Self {
            window,
            buffer: vec![0; width * height],
            width,
            height,
        })
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    pub fn is_key_down(&self, key: minifb::Key) -> bool {
        self.window.is_key_down(key)
    }

    pub fn update(
        &mut self,
        frame: &RgbImage,
        overlay: &OverlayTransform,
        lighting: &LightingState,
        color: u32,
    ) -> Result<()> {
        let target_w = frame.width() as usize;
        let target_h = frame.height() as usize;
        if target_w != self.width || target_h != self.height {
            self.width = target_w;
            self.height = target_h;
            self.buffer.resize(self.width * self.height, 0);
        }

        // RGB8 -> ARGB, with the lighting brightness factor applied so the
        // adaptation is visible in the preview.
        let gain = lighting.brightness;
        for (i, px) in frame.pixels().enumerate() {
            if i >= self.buffer.len() {
                break;
            }
            let r = ((px[0] as f32 * gain) as u32).min(255);
            let g = ((px[1] as f32 * gain) as u32).min(255);
            let b = ((px[2] as f32 * gain) as u32).min(255);
            self.buffer[i] = (r << 16) | (g << 8) | b;
        }

        self.draw_overlay_rect(overlay, color);

        self.window
            .update_with_buffer(&self.buffer, self.width, self.height)
            .map_err(|e| anyhow::anyhow!("Window update failed: {}", e))
    }

    /// Outline of the overlay rectangle. Position is center-based percent.
    fn draw_overlay_rect(&mut self, overlay: &OverlayTransform, color: u32) {
        let w = self.width as f32;
        let h = self.height as f32;
        let rect_w = overlay.position.width / 100.0 * w * overlay.scale;
        let rect_h = overlay.position.height / 100.0 * h * overlay.scale;
        let left = overlay.position.x / 100.0 * w - rect_w / 2.0;
        let top = overlay.position.y / 100.0 * h - rect_h / 2.0;

        let x0 = left.max(0.0) as usize;
        let y0 = top.max(0.0) as usize;
        let x1 = ((left + rect_w) as usize).min(self.width.saturating_sub(1));
        let y1 = ((top + rect_h) as usize).min(self.height.saturating_sub(1));

        for x in x0..=x1.max(x0) {
            self.draw_point(x, y0, color);
            self.draw_point(x, y1, color);
        }
        for y in y0..=y1.max(y0) {
            self.draw_point(x0, y, color);
            self.draw_point(x1, y, color);
        }
    }

    fn draw_point(&mut self, x: usize, y: usize, color: u32) {
        if x < self.width && y < self.height {
            let idx = y * self.width + x;
            if idx < self.buffer.len() {
                self.buffer[idx] = color;
            }
        }
    }
}

/// "#RRGGBB" -> packed ARGB, falling back to green on bad input.
pub fn parse_color_hex(hex: &str) -> u32 {
    let hex = hex.trim_start_matches('#');
    u32::from_str_radix(hex, 16).unwrap_or(0x00FF88)
}
