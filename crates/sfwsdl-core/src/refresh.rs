//! Fetch the current WSDL for a session and replace the cached copy.
//!
//! Straight-line sequence: build URL and cookie, GET, require HTTP 200 and
//! well-formed XML, write the file, then optionally clear the cache. A bad
//! response never touches the cached file.

use std::io::Write;
use std::path::Path;

use crate::cache_clear::CacheClearer;
use crate::endpoint::WsdlEndpoint;
use crate::error::{RefreshError, RejectReason};
use crate::fetch::{self, HttpOptions};
use crate::persist;
use crate::session::SessionProvider;
use crate::validate;

/// What happened to the cached WSDL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    Updated(WsdlUpdate),
    /// Response was not usable; the file was left as it was.
    Rejected(RejectReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WsdlUpdate {
    pub bytes: usize,
    /// SHA-256 (hex) of the new content.
    pub sha256: String,
    /// False when the new content is identical to what was on disk.
    pub changed: bool,
    pub cache_cleared: bool,
}

pub struct WsdlRefresher {
    http: HttpOptions,
    endpoint: Option<WsdlEndpoint>,
    cache_clearer: Box<dyn CacheClearer>,
}

impl WsdlRefresher {
    pub fn new(http: HttpOptions, cache_clearer: Box<dyn CacheClearer>) -> Self {
        Self {
            http,
            endpoint: None,
            cache_clearer,
        }
    }

    /// Use a fixed endpoint instead of `https://{instance}.salesforce.com`.
    pub fn with_endpoint(mut self, endpoint: WsdlEndpoint) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    /// Refresh `destination` from the instance of `session`.
    ///
    /// Progress lines and the cache clear output are written to `out`.
    pub fn refresh(
        &self,
        session: &dyn SessionProvider,
        destination: &Path,
        clear_cache: bool,
        out: &mut dyn Write,
    ) -> Result<RefreshOutcome, RefreshError> {
        crate::session::validate(session)?;
        print(out, "Updating the WSDL file")?;

        let endpoint = match &self.endpoint {
            Some(ep) => ep.clone(),
            None => WsdlEndpoint::for_session(session),
        };
        let url = endpoint.wsdl_url();
        let cookie = endpoint.session_cookie(session);
        tracing::info!(%url, cookie_domain = %cookie.domain, "fetching WSDL");

        let response = fetch::fetch(&url, &cookie, self.http)?;

        if response.status != 200 {
            return Ok(reject(RejectReason::Status(response.status)));
        }
        if let Err(e) = validate::check_well_formed(&response.body) {
            return Ok(reject(RejectReason::MalformedXml(e)));
        }

        let sha256 = persist::sha256_hex(&response.body);
        let changed = persist::existing_digest(destination).as_deref() != Some(sha256.as_str());
        persist::replace_file(destination, &response.body).map_err(|source| {
            RefreshError::Write {
                path: destination.to_path_buf(),
                source,
            }
        })?;
        tracing::info!(
            path = %destination.display(),
            bytes = response.body.len(),
            %sha256,
            changed,
            "WSDL written"
        );
        print(
            out,
            &format!(
                "Wrote {} bytes to {}{}",
                response.body.len(),
                destination.display(),
                if changed { "" } else { " (unchanged)" }
            ),
        )?;

        if clear_cache {
            self.cache_clearer.clear(out)?;
            tracing::info!("cache cleared");
        } else {
            tracing::debug!("cache clear skipped");
        }

        Ok(RefreshOutcome::Updated(WsdlUpdate {
            bytes: response.body.len(),
            sha256,
            changed,
            cache_cleared: clear_cache,
        }))
    }
}

fn reject(reason: RejectReason) -> RefreshOutcome {
    tracing::warn!("WSDL not updated: {}", reason);
    RefreshOutcome::Rejected(reason)
}

fn print(out: &mut dyn Write, line: &str) -> Result<(), RefreshError> {
    writeln!(out, "{}", line).map_err(RefreshError::Output)
}
