//! `sfwsdl refresh-wsdl` – fetch the latest WSDL and store it locally.

use anyhow::{Context, Result};
use sfwsdl_core::cache_clear::{CacheClearer, CommandCacheClearer, NoCacheClear};
use sfwsdl_core::config::SfwsdlConfig;
use sfwsdl_core::endpoint::WsdlEndpoint;
use sfwsdl_core::fetch::HttpOptions;
use sfwsdl_core::{RefreshOutcome, Session, WsdlRefresher};
use std::io;

/// Refresh the configured WSDL file, clearing the cache afterwards unless
/// `no_cache_clear` is set. A rejected response is a warning, not a failure.
pub fn run_refresh_wsdl(cfg: &SfwsdlConfig, no_cache_clear: bool) -> Result<()> {
    let session = Session::resolve(cfg.session.as_ref(), |k| std::env::var(k).ok())?;
    let destination = cfg.resolve_wsdl_path()?;

    let mut refresher = WsdlRefresher::new(HttpOptions::from(&cfg.http), cache_clearer(cfg));
    if let Some(base_url) = &cfg.http.base_url {
        refresher = refresher.with_endpoint(WsdlEndpoint::with_base_url(base_url)?);
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let outcome = refresher
        .refresh(&session, &destination, !no_cache_clear, &mut out)
        .with_context(|| format!("refreshing {}", destination.display()))?;

    match outcome {
        RefreshOutcome::Updated(update) => {
            tracing::debug!(?update, "refresh-wsdl done");
        }
        RefreshOutcome::Rejected(reason) => {
            eprintln!(
                "warning: WSDL not updated ({}); keeping {}",
                reason,
                destination.display()
            );
        }
    }
    Ok(())
}

fn cache_clearer(cfg: &SfwsdlConfig) -> Box<dyn CacheClearer> {
    match cfg
        .cache_clear_command
        .as_deref()
        .and_then(CommandCacheClearer::from_argv)
    {
        Some(cmd) => Box::new(cmd),
        None => Box::new(NoCacheClear),
    }
}
