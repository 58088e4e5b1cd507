//! Error type shared by the asset ports, the scene registry and bootstrap.
//!
//! Rendering itself never fails: bounds violations return sentinels and
//! missing assets render as transparent black. These errors only surface
//! at the edges (loading, configuration, discovery).

pub type Result<T> = std::result::Result<T, ImagerError>;

#[derive(thiserror::Error, Debug)]
pub enum ImagerError {
    #[error("failed to load image {path}: {reason}")]
    ImageLoad { path: String, reason: String },

    #[error("text rendering failed: {0}")]
    TextRender(String),

    #[error("platform not configured: missing {0}")]
    ConfigurationMissing(&'static str),

    #[error("failed to instantiate scene {name}: {reason}")]
    SceneInstantiation { name: String, reason: String },

    #[error("no scenes available to animate")]
    EmptySceneSet,

    #[error("invalid color: {0}")]
    InvalidColor(String),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ImagerError {
    pub fn image_load(path: impl Into<String>, reason: impl ToString) -> Self {
        Self::ImageLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn text_render(msg: impl Into<String>) -> Self {
        Self::TextRender(msg.into())
    }

    pub fn scene(name: impl Into<String>, reason: impl ToString) -> Self {
        Self::SceneInstantiation {
            name: name.into(),
            reason: reason.to_string(),
        }
    }
}
