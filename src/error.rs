use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    #[error("Cannot resolve font {family:?} at size {size}")]
    FontResolution { family: String, size: f32 },

    #[error("Style has no image, texture or text to synthesize from")]
    SynthesisIncomplete,

    #[error("Style sets both an image and a texture")]
    ConflictingSources,

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
