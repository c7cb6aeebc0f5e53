pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Dataset load failed: {message}")]
    Load { message: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("Edge {edge_id} in scope {scope} references missing node {node_id}")]
    DanglingEdge {
        scope: String,
        edge_id: String,
        node_id: String,
    },

    #[error("Malformed canvas coordinate: ({x}, {y})")]
    MalformedCoordinate { x: f64, y: f64 },

    #[error("Invalid value for attribute `{key}`: {message}")]
    InvalidAttribute { key: String, message: String },

    #[error("No editable scope is active (building view without a floor)")]
    NoActiveScope,
}

impl Error {
    pub(crate) fn load(message: impl Into<String>) -> Self {
        Self::Load {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_attribute(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidAttribute {
            key: key.into(),
            message: message.into(),
        }
    }
}
