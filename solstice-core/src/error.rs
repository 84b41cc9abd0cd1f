use thiserror::Error;

#[derive(Error, Debug)]
pub enum GalleryError {
    #[error("No async runtime available: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),

    #[error("Component disposed: {0}")]
    Disposed(&'static str),
}

pub type Result<T> = std::result::Result<T, GalleryError>;
