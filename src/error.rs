use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Fatal: the session could not acquire its capabilities. Tracking never starts.
    #[error("initialization failed: {0}")]
    Initialization(String),

    /// The landmark set is missing the anchor points needed to derive geometry.
    /// Treated like a detection miss downstream.
    #[error("incomplete landmarks: missing {0}")]
    IncompleteLandmarks(&'static str),

    /// Unknown product category string. A caller/config error, rejected at the
    /// parse boundary before any placement runs.
    #[error("unsupported product category: {0:?}")]
    UnsupportedCategory(String),

    /// Non-fatal: frame sampling for lighting adaptation failed. The adapter
    /// publishes neutral factors instead of propagating this.
    #[error("lighting sample failed: {0}")]
    LightingSample(String),

    #[error("video source error: {0}")]
    VideoSource(String),
}

pub type Result<T> = std::result::Result<T, Error>;
