use thiserror::Error;

/// Failures raised while configuring or running the particle backdrop.
///
/// None of these are surfaced to the visitor: the host logs them and leaves
/// the page without a backdrop.
#[derive(Debug, Error)]
pub enum BackdropError {
    #[error("invalid field config: {0}")]
    InvalidConfig(&'static str),
    #[error("missing container element #{0}")]
    MissingContainer(String),
    #[error("canvas context unavailable: {0}")]
    NoContext(&'static str),
    #[error("renderer failure: {0}")]
    Renderer(String),
}
