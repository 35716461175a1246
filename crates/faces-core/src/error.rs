use std::io;

use thiserror::Error;

use crate::NodeId;

/// Failures raised while building, walking or resolving against a component tree.
#[derive(Debug, Error)]
pub enum FacesError {
    /// Malformed expression or keyword argument.
    #[error("{message}")]
    Syntax { message: String },
    /// The tree does not have the shape an operation requires.
    #[error("{message}")]
    Structural { message: String },
    #[error("Cannot find component for expression \"{expression}\" referenced from \"{source_client_id}\".")]
    ComponentNotFound {
        expression: String,
        source_client_id: String,
    },
    #[error("{message}")]
    InvalidArgument { message: String },
    #[error(transparent)]
    Io(#[from] io::Error),
    /// An I/O failure surfaced while an iteration component was rendering rows.
    #[error("render failed: {source}")]
    Render {
        #[source]
        source: io::Error,
    },
    #[error("cannot evaluate {expression}: {message}")]
    Evaluation { expression: String, message: String },
    #[error("node {id} missing")]
    MissingNode { id: NodeId },
}

impl FacesError {
    pub fn syntax(message: impl Into<String>) -> Self {
        Self::Syntax {
            message: message.into(),
        }
    }

    pub fn structural(message: impl Into<String>) -> Self {
        Self::Structural {
            message: message.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn evaluation(expression: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Evaluation {
            expression: expression.into(),
            message: message.into(),
        }
    }

    /// Folds a raw I/O failure into [`FacesError::Render`]; other variants pass through.
    pub fn into_render(self) -> Self {
        match self {
            Self::Io(source) => Self::Render { source },
            other => other,
        }
    }
}

pub type Result<T, E = FacesError> = std::result::Result<T, E>;
