//! Redirect tracing.
//!
//! Resolves the final destination of a URL and records every intermediate
//! hop. Redirects are followed manually with a redirects-disabled client so
//! the full chain (source, Location target, status code) can be captured;
//! HEAD probes keep the trace lightweight, since no response body is needed.

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::header::LOCATION;
use serde_json::json;
use url::Url;

use crate::config::constants::{impact, MAX_REDIRECT_HOPS};
use crate::models::{CheckFinding, RedirectHop, TraceResult};
use crate::retry::{is_transient_http_error, retry_async, RetryPolicy};
use crate::Check;

const CHECK_NAME: &str = "Redirect Check";

/// Traces redirect chains and reports whether a URL forwards elsewhere.
pub struct RedirectCheck {
    client: reqwest::Client,
    retry: RetryPolicy,
    max_hops: usize,
}

impl RedirectCheck {
    /// Creates a redirect check around a client that must have automatic
    /// redirects disabled (see `initialization::init_probe_client`).
    pub fn new(client: reqwest::Client, retry: RetryPolicy) -> Self {
        RedirectCheck {
            client,
            retry,
            max_hops: MAX_REDIRECT_HOPS,
        }
    }

    /// Traces the redirect chain and builds the corresponding finding.
    ///
    /// The orchestrator needs the typed [`TraceResult`] (to decide whether
    /// downstream checks may run) as well as the finding, so both are
    /// returned together. Never errors: trace failures degrade to the
    /// terminal `chain_completed = false` result.
    pub async fn run_trace(&self, url: &Url) -> (TraceResult, CheckFinding) {
        let trace = match retry_async(&self.retry, is_transient_http_error, || {
            self.trace_once(url)
        })
        .await
        {
            Ok(trace) => trace,
            Err(e) => {
                warn!("Redirect trace for {url} failed: {e}");
                TraceResult::failed(url.as_str())
            }
        };

        let finding = CheckFinding::structured(
            CHECK_NAME,
            trace.was_redirected,
            if trace.was_redirected {
                impact::REDIRECTED
            } else {
                impact::ZERO
            },
            json!({
                "chain_completed": trace.chain_completed,
                "final_url": trace.final_url,
                "hops": trace.redirect_chain.len(),
            }),
        );
        (trace, finding)
    }

    /// Follows redirects once, hop by hop, up to the internal cap.
    async fn trace_once(&self, start_url: &Url) -> Result<TraceResult> {
        let mut chain: Vec<RedirectHop> = Vec::new();
        let mut current = start_url.clone();

        for _ in 0..self.max_hops {
            let resp = self
                .client
                .head(current.as_str())
                .send()
                .await
                .with_context(|| format!("HEAD request to {current} failed"))?;

            let status = resp.status();
            if !status.is_redirection() {
                debug!(
                    "Redirect trace for {start_url} resolved to {current} ({} hops)",
                    chain.len()
                );
                return Ok(TraceResult {
                    was_redirected: !chain.is_empty(),
                    chain_completed: true,
                    final_url: current.to_string(),
                    redirect_chain: chain,
                });
            }

            let location = resp
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);

            match location {
                Some(loc) => {
                    chain.push(RedirectHop {
                        source_url: current.to_string(),
                        target_url: loc.clone(),
                        status_code: status.as_u16(),
                    });
                    // Location may be relative; resolve against the current URL.
                    let next = Url::parse(&loc)
                        .or_else(|_| current.join(&loc))
                        .with_context(|| format!("unresolvable Location header: {loc}"))?;
                    current = next;
                }
                None => {
                    // Redirect status without a Location header; record the hop
                    // against its own URL and stop here.
                    warn!("Redirect status {status} for {current} but no Location header");
                    chain.push(RedirectHop {
                        source_url: current.to_string(),
                        target_url: current.to_string(),
                        status_code: status.as_u16(),
                    });
                    return Ok(TraceResult {
                        was_redirected: true,
                        chain_completed: true,
                        final_url: current.to_string(),
                        redirect_chain: chain,
                    });
                }
            }
        }

        anyhow::bail!("redirect chain for {start_url} exceeded {} hops", self.max_hops)
    }
}

#[async_trait]
impl Check for RedirectCheck {
    fn name(&self) -> &'static str {
        CHECK_NAME
    }

    async fn run(&self, url: &Url) -> CheckFinding {
        self.run_trace(url).await.1
    }
}
