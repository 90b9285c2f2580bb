//! Failures of a WSDL refresh.
//!
//! A response that is not a 200 with well-formed XML is not an error: it is
//! reported as [`RejectReason`] and leaves the cached file alone.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::cache_clear::CacheClearError;
use crate::session::SessionError;
use crate::validate::XmlError;

#[derive(Debug, Error)]
pub enum RefreshError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("invalid base URL {url:?}: {source}")]
    Endpoint {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Connection, TLS, DNS or timeout failure. Not retried.
    #[error("GET {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: curl::Error,
    },

    #[error("failed to write WSDL to {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write progress output: {0}")]
    Output(#[source] io::Error),

    #[error("cache clear failed: {0}")]
    CacheClear(#[from] CacheClearError),
}

/// Why a fetched document was not written.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RejectReason {
    #[error("server answered HTTP {0}, expected 200")]
    Status(u32),
    #[error("response is not well-formed XML: {0}")]
    MalformedXml(#[from] XmlError),
}
