use crate::properties::NodeId;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("node `{id}` is not present in the {context}")]
    MissingNodeReference { id: NodeId, context: &'static str },

    #[error("malformed layout result: {message}")]
    MalformedLayoutResult { message: String },
}

impl Error {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedLayoutResult {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::malformed(err.to_string())
    }
}
