//! HTTP GET of the WSDL document.
//!
//! Uses the curl crate (libcurl). The whole body is held in memory; WSDLs
//! are a few MB at most.

use curl::easy::{Easy, List};
use std::time::Duration;

use crate::endpoint::SessionCookie;
use crate::error::RefreshError;

/// Status and body of the WSDL response.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub status: u32,
    pub body: Vec<u8>,
}

/// Timeouts for the request.
#[derive(Debug, Clone, Copy)]
pub struct HttpOptions {
    pub connect_timeout: Duration,
    pub timeout: Duration,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(15),
            timeout: Duration::from_secs(120),
        }
    }
}

impl From<&crate::config::HttpConfig> for HttpOptions {
    fn from(cfg: &crate::config::HttpConfig) -> Self {
        Self {
            connect_timeout: cfg.connect_timeout(),
            timeout: cfg.timeout(),
        }
    }
}

/// GET `url` with `Accept: application/xml` and the session cookie.
///
/// Redirects are not followed, so the session cookie is only ever sent to
/// the instance host. Any completed exchange is returned whatever its status;
/// only transport failures are errors.
pub fn fetch(
    url: &str,
    cookie: &SessionCookie,
    opts: HttpOptions,
) -> Result<FetchResult, RefreshError> {
    let network = |source: curl::Error| RefreshError::Network {
        url: url.to_string(),
        source,
    };

    let mut body: Vec<u8> = Vec::new();
    let mut easy = Easy::new();
    easy.url(url).map_err(network)?;
    easy.get(true).map_err(network)?;
    easy.follow_location(false).map_err(network)?;
    easy.connect_timeout(opts.connect_timeout).map_err(network)?;
    easy.timeout(opts.timeout).map_err(network)?;
    easy.cookie(&cookie.header_value()).map_err(network)?;

    let mut list = List::new();
    list.append("Accept: application/xml").map_err(network)?;
    easy.http_headers(list).map_err(network)?;

    {
        let mut transfer = easy.transfer();
        transfer
            .write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })
            .map_err(network)?;
        transfer.perform().map_err(network)?;
    }

    let status = easy.response_code().map_err(network)?;
    tracing::debug!(url, status, bytes = body.len(), "WSDL response received");
    Ok(FetchResult { status, body })
}
