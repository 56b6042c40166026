// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for projection operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while projecting coordinates
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A projection definition could not be turned into a usable projection
    #[error("cannot initialize projection `{definition}`: {reason}")]
    Init { definition: String, reason: String },

    /// The source projection is geographic where a planar one is required
    #[error("projection `{definition}` is geographic; a planar source projection is required")]
    Domain { definition: String },

    /// The engine failed, or produced a result of the wrong kind
    #[error("projection transform failed: {0}")]
    Transform(String),
}

impl Error {
    pub(crate) fn init(definition: &str, reason: impl Into<String>) -> Self {
        Error::Init {
            definition: definition.to_string(),
            reason: reason.into(),
        }
    }
}
