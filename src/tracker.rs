//! Tracking session coordination.
//!
//! One session owns one detect → extract → smooth → place → publish cycle,
//! running as a cooperative self-rescheduling tokio task. The lighting
//! adapter runs on its own lower-frequency timer task; the two share the
//! video source but publish disjoint state. All published values travel over
//! `watch` channels as complete snapshots, so a consumer mid-read never sees
//! a half-written transform.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::camera::VideoSource;
use crate::config::{LightingConfig, TrackingConfig};
use crate::detector::LandmarkDetector;
use crate::error::{Error, Result};
use crate::geometry;
use crate::lighting::{LightingAdapter, LightingState};
use crate::metrics::{FrameRateWindow, TrackingMetrics, TrackingQuality};
use crate::placement;
use crate::regions;
use crate::render::{self, SceneRenderer};
use crate::smoothing::SmoothingBuffer;
use crate::types::{FrameSize, LandmarkSet, OverlayAdjust, OverlayTransform, Product};

/// Session lifecycle. `Stopped` is terminal; a stopped session cannot be
/// restarted, only replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Initializing,
    Ready,
    Tracking,
    Stopped,
}

pub type SharedVideoSource = Arc<Mutex<dyn VideoSource>>;

pub struct TrackingSession {
    state: SessionState,
    product: Product,
    tracking_cfg: TrackingConfig,
    lighting_cfg: LightingConfig,

    // Capabilities handed to the loop task at start.
    detector: Option<Box<dyn LandmarkDetector>>,
    renderer: Option<Box<dyn SceneRenderer>>,
    video: SharedVideoSource,

    overlay_rx: watch::Receiver<OverlayTransform>,
    overlay_tx: Option<watch::Sender<OverlayTransform>>,
    lighting_rx: watch::Receiver<LightingState>,
    lighting_tx: Option<watch::Sender<LightingState>>,
    metrics_rx: watch::Receiver<TrackingMetrics>,
    metrics_tx: Option<watch::Sender<TrackingMetrics>>,
    quality_rx: watch::Receiver<TrackingQuality>,
    quality_tx: Option<watch::Sender<TrackingQuality>>,

    adjust_tx: watch::Sender<Option<OverlayAdjust>>,
    shutdown_tx: watch::Sender<bool>,

    tasks: Vec<JoinHandle<()>>,
}

impl TrackingSession {
    pub fn new(
        detector: Box<dyn LandmarkDetector>,
        video: SharedVideoSource,
        product: Product,
        tracking_cfg: TrackingConfig,
        lighting_cfg: LightingConfig,
    ) -> Self {
        // The overlay must show something plausible before the first
        // detection lands, so the channels start at the category default.
        let initial = placement::compute(
            None,
            FrameSize::new(1, 1),
            &product,
            None,
        );
        let (overlay_tx, overlay_rx) = watch::channel(initial);
        let (lighting_tx, lighting_rx) = watch::channel(LightingState::neutral());
        let (metrics_tx, metrics_rx) = watch::channel(TrackingMetrics::default());
        let (quality_tx, quality_rx) = watch::channel(TrackingQuality::Poor);
        let (adjust_tx, _) = watch::channel(None);
        let (shutdown_tx, _) = watch::channel(false);

        Self {
            state: SessionState::Uninitialized,
            product,
            tracking_cfg,
            lighting_cfg,
            detector: Some(detector),
            renderer: None,
            video,
            overlay_rx,
            overlay_tx: Some(overlay_tx),
            lighting_rx,
            lighting_tx: Some(lighting_tx),
            metrics_rx,
            metrics_tx: Some(metrics_tx),
            quality_rx,
            quality_tx: Some(quality_tx),
            adjust_tx,
            shutdown_tx,
            tasks: Vec::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Latest published overlay transform. Cheap to clone; `borrow()` always
    /// yields a complete snapshot.
    pub fn overlay(&self) -> watch::Receiver<OverlayTransform> {
        self.overlay_rx.clone()
    }

    pub fn lighting(&self) -> watch::Receiver<LightingState> {
        self.lighting_rx.clone()
    }

    pub fn metrics(&self) -> watch::Receiver<TrackingMetrics> {
        self.metrics_rx.clone()
    }

    pub fn quality(&self) -> watch::Receiver<TrackingQuality> {
        self.quality_rx.clone()
    }

    /// Install or clear the user's manual repositioning. Takes effect on the
    /// next cycle's composition.
    pub fn set_adjust(&self, adjust: Option<OverlayAdjust>) {
        let _ = self.adjust_tx.send(adjust);
    }

    /// Bind a 3D scene renderer before `start`. Without one the session runs
    /// in flat overlay mode and publishes transforms only.
    pub fn attach_renderer(&mut self, renderer: Box<dyn SceneRenderer>) {
        self.renderer = Some(renderer);
    }

    /// Acquire capabilities and begin the tracking loop.
    ///
    /// Fatal failures surface here once; after a successful return the loop
    /// is self-healing and absorbs per-cycle errors.
    pub async fn start(&mut self) -> Result<()> {
        match self.state {
            SessionState::Uninitialized => {}
            SessionState::Stopped => {
                return Err(Error::Initialization("session already stopped".into()))
            }
            _ => return Err(Error::Initialization("session already started".into())),
        }
        self.state = SessionState::Initializing;

        let mut detector = self
            .detector
            .take()
            .ok_or_else(|| Error::Initialization("detector already consumed".into()))?;

        detector
            .initialize()
            .await
            .map_err(|e| Error::Initialization(e.to_string()))?;
        if !detector.is_ready() {
            return Err(Error::Initialization(
                "detector reported not ready after initialize".into(),
            ));
        }
        info!("Detector ready: {}", detector.name());
        self.state = SessionState::Ready;

        // Re-seed the default placement now that real frame dims are known.
        let frame_size = self.video.lock().await.frame_size();
        let overlay_tx = self.overlay_tx.take().expect("start runs once");
        let _ = overlay_tx.send(placement::compute(None, frame_size, &self.product, None));

        // The render surface tracks the video frame, not the window.
        let mut renderer = self.renderer.take();
        if let Some(r) = renderer.as_mut() {
            r.resize(frame_size.width, frame_size.height);
        }

        let loop_task = tracking_loop(
            detector,
            renderer,
            Arc::clone(&self.video),
            self.product.clone(),
            self.tracking_cfg.clone(),
            overlay_tx,
            self.metrics_tx.take().expect("start runs once"),
            self.quality_tx.take().expect("start runs once"),
            self.adjust_tx.subscribe(),
            self.lighting_rx.clone(),
            self.shutdown_tx.subscribe(),
        );
        self.tasks.push(tokio::spawn(loop_task));

        let lighting_task = lighting_loop(
            Arc::clone(&self.video),
            self.lighting_cfg.clone(),
            self.lighting_tx.take().expect("start runs once"),
            self.shutdown_tx.subscribe(),
        );
        self.tasks.push(tokio::spawn(lighting_task));

        self.state = SessionState::Tracking;
        info!("Tracking started for {} ({})", self.product.name, self.product.category);
        Ok(())
    }

    /// Tear the session down. Cancels scheduled cycles; an in-flight
    /// detection may finish but its result is never published. Terminal.
    pub async fn stop(&mut self) {
        if self.state == SessionState::Stopped {
            return;
        }
        let _ = self.shutdown_tx.send(true);
        for task in self.tasks.drain(..) {
            let _ = task.await;
        }
        if let Some(mut detector) = self.detector.take() {
            detector.cleanup();
        }
        if let Some(mut renderer) = self.renderer.take() {
            renderer.dispose();
        }
        self.state = SessionState::Stopped;
        info!("Tracking stopped");
    }
}

/// The per-cycle tracking loop. Owns the detector and the smoothing buffer
/// for the whole session; nothing else touches either.
#[allow(clippy::too_many_arguments)]
async fn tracking_loop(
    mut detector: Box<dyn LandmarkDetector>,
    mut renderer: Option<Box<dyn SceneRenderer>>,
    video: SharedVideoSource,
    product: Product,
    cfg: TrackingConfig,
    overlay_tx: watch::Sender<OverlayTransform>,
    metrics_tx: watch::Sender<TrackingMetrics>,
    quality_tx: watch::Sender<TrackingQuality>,
    adjust_rx: watch::Receiver<Option<OverlayAdjust>>,
    lighting_rx: watch::Receiver<LightingState>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let min_interval = Duration::from_millis(cfg.detection_interval_ms);
    let mut buffer = SmoothingBuffer::new(cfg.buffer_capacity);
    let mut fps_window = FrameRateWindow::new(Duration::from_millis(cfg.frame_rate_window_ms));
    let mut metrics = TrackingMetrics::default();
    let mut last_detection = Instant::now() - min_interval;

    loop {
        // Throttle: wait out the remainder of the minimum interval, bailing
        // promptly on shutdown.
        let elapsed = last_detection.elapsed();
        if elapsed < min_interval {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        break;
                    }
                }
                _ = tokio::time::sleep(min_interval - elapsed) => {}
            }
        }
        if *shutdown_rx.borrow() {
            break;
        }
        last_detection = Instant::now();

        let frame = match video.lock().await.snapshot() {
            Ok(frame) => frame,
            Err(e) => {
                debug!("frame unavailable this cycle: {e}");
                continue;
            }
        };
        let frame_size = FrameSize::new(frame.width(), frame.height());

        // The detection may resolve well after a display refresh; the next
        // cycle is simply not scheduled until it does.
        let detect_start = Instant::now();
        let detection = detector.detect(&frame).await;
        metrics.detection_latency_ms = detect_start.elapsed().as_secs_f32() * 1000.0;

        let mut landmarks = None;
        let pushed = match detection {
            Ok(Some(set)) => match geometry::extract(&set) {
                Ok(geo) => {
                    buffer.push(geo);
                    landmarks = Some(set);
                    true
                }
                Err(Error::IncompleteLandmarks(what)) => {
                    debug!("incomplete landmarks, skipping cycle: {what}");
                    false
                }
                Err(e) => {
                    warn!("geometry extraction failed: {e}");
                    false
                }
            },
            Ok(None) => {
                debug!("detection miss");
                false
            }
            Err(e) => {
                // Expected to be rare; a bad frame must not kill the loop.
                warn!("detection error: {e}");
                false
            }
        };

        let place_start = Instant::now();
        if pushed {
            if let Some(smoothed) = buffer.current() {
                let adjust = *adjust_rx.borrow();
                // Body sessions carry clothing regions into placement.
                let body_regions = match landmarks.as_ref() {
                    Some(LandmarkSet::Body(body)) => Some(regions::clothing_regions(body)),
                    _ => None,
                };
                let transform = placement::compute_with_regions(
                    Some(&smoothed),
                    frame_size,
                    &product,
                    adjust.as_ref(),
                    body_regions.as_ref(),
                );
                metrics.tracking_confidence = smoothed.confidence;

                // A cycle resolving after stop must not publish.
                if *shutdown_rx.borrow() {
                    break;
                }
                let _ = overlay_tx.send(transform);
            }

            // 3D mode: rebuild the face mesh from this cycle's landmarks and
            // draw it under the frame's current lighting split.
            if let (Some(r), Some(LandmarkSet::Face(face))) =
                (renderer.as_mut(), landmarks.as_ref())
            {
                let mesh = render::face_mesh(face);
                let lighting = *lighting_rx.borrow();
                let (ambient, directional) = render::light_intensities(&lighting);
                if let Err(e) = r.render(&mesh, ambient, directional) {
                    warn!("scene render failed this cycle: {e}");
                }
            }
        }
        metrics.render_time_ms = place_start.elapsed().as_secs_f32() * 1000.0;

        if let Some(fps) = fps_window.tick() {
            metrics.frame_rate = fps;
        }
        if *shutdown_rx.borrow() {
            break;
        }
        let _ = metrics_tx.send(metrics);
        let _ = quality_tx.send(TrackingQuality::classify(
            metrics.tracking_confidence,
            metrics.frame_rate,
        ));
    }

    detector.cleanup();
    if let Some(mut r) = renderer {
        r.dispose();
    }
    debug!("tracking loop exited");
}

/// Independent lighting sampler. Failures publish neutral factors; lighting
/// is cosmetic and never blocks the overlay.
async fn lighting_loop(
    video: SharedVideoSource,
    cfg: LightingConfig,
    lighting_tx: watch::Sender<LightingState>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let adapter = LightingAdapter::new(cfg.sample_size);
    let mut ticker = tokio::time::interval(Duration::from_millis(cfg.sample_interval_ms.max(1)));

    loop {
        tokio::select! {
            _ = shutdown_rx.changed() => {
                if *shutdown_rx.borrow() {
                    break;
                }
            }
            _ = ticker.tick() => {}
        }
        if *shutdown_rx.borrow() {
            break;
        }

        let sampled = {
            let mut source = video.lock().await;
            adapter.sample_source(&mut *source)
        };
        let state = match sampled {
            Ok(state) => state,
            Err(e) => {
                debug!("{e}, publishing neutral");
                LightingState::neutral()
            }
        };
        if *shutdown_rx.borrow() {
            break;
        }
        let _ = lighting_tx.send(state);
    }
    debug!("lighting loop exited");
}
