// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types and their exit-code taxonomy.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for the conversion pipeline
pub type Result<T> = std::result::Result<T, Error>;

/// Conversion errors; every one of them ends the run.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Loading transform parameters failed: {0}")]
    Parameters(#[from] obj_georef_core::Error),

    #[error(transparent)]
    Projection(#[from] obj_georef_projection::Error),

    #[error("Cannot access {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed vertex on line {line}: `{content}`")]
    MalformedVertex { line: usize, content: String },
}

impl Error {
    pub(crate) fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::FileAccess {
            path: path.into(),
            source,
        }
    }

    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        use obj_georef_projection::Error as ProjectionError;

        match self {
            Error::Parameters(_) => ErrorKind::ParameterResolution,
            Error::Projection(ProjectionError::Init { .. }) => ErrorKind::ProjectionInit,
            Error::Projection(ProjectionError::Domain { .. }) => ErrorKind::ProjectionDomain,
            Error::Projection(ProjectionError::Transform(_)) => ErrorKind::ProjectionTransform,
            Error::FileAccess { .. } => ErrorKind::FileAccess,
            Error::MalformedVertex { .. } => ErrorKind::MalformedVertex,
        }
    }
}

/// Failure categories of a conversion run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Wrong command-line arity
    Usage,
    ParameterResolution,
    FileAccess,
    ProjectionInit,
    ProjectionDomain,
    ProjectionTransform,
    MalformedVertex,
}

impl ErrorKind {
    /// Process exit code reported by the CLI
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorKind::Usage => 2,
            ErrorKind::ParameterResolution => 3,
            ErrorKind::FileAccess => 4,
            ErrorKind::ProjectionInit => 5,
            ErrorKind::ProjectionDomain => 6,
            ErrorKind::ProjectionTransform => 7,
            ErrorKind::MalformedVertex => 8,
        }
    }
}
