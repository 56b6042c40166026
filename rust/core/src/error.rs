// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for parameter resolution
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading or resolving a parameter document.
///
/// Every variant is a parameter resolution failure; the variants only say
/// at which stage it was detected.
#[derive(Error, Debug)]
pub enum Error {
    #[error("cannot read parameter document {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed parameter document: {0}")]
    Xml(String),

    #[error("parameter document has no <{0}> root element")]
    MissingRoot(&'static str),

    #[error("no complete `{name}` {version} parameter block found")]
    NoMatchingModule {
        name: &'static str,
        version: &'static str,
    },
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Xml(err.to_string())
    }
}
