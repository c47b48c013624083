//! Repository consistency probe
//!
//! Cross-checks two independently-reported views of each repository: the
//! per-repository summary in the state document against the repository's
//! own detail endpoint. The two must agree on tag count, and every tag
//! claiming a manifest must carry a digest.
//!
//! Each comparison that runs is one recorded operation - a mismatch is a
//! failed operation and an error log, a match is a successful one. Fetch
//! failures inside the loop are logged and skipped without touching the
//! tally; the tally tracks consistency outcomes here, not transport.
//!
//! ## Options
//!
//! - `interval`: poll cadence (default: 15s)

use async_trait::async_trait;
use std::time::Duration;
use tracing::{error, info};

use super::traits::{Probe, ProbeContext, ProbeError, ProbeOptions};
use crate::client::RepositorySummary;

const DEFAULT_INTERVAL: Duration = Duration::from_secs(15);

/// Consistency cross-check between state summary and repository detail
pub struct ConsistencyProbe;

/// Compare one repository's summary line against its detail document
///
/// Records one operation for the tag-count comparison and one per tag
/// for the manifest-digest check.
async fn check_repository(ctx: &ProbeContext, summary: &RepositorySummary) {
    let detail = match ctx.client.repository(&summary.name).await {
        Ok(detail) => detail,
        Err(e) => {
            error!(repository = %summary.name, error = %e, "Failed to fetch repository detail");
            return;
        }
    };

    if summary.tag_count != detail.tag_count {
        error!(
            repository = %summary.name,
            state_tags = summary.tag_count,
            detail_tags = detail.tag_count,
            "Inconsistent tag count"
        );
        ctx.tally.record(false);
    } else {
        ctx.tally.record(true);
    }

    for tag in &detail.tags {
        let digest_missing = tag.digest.as_deref().unwrap_or("").is_empty();
        if tag.has_manifest && digest_missing {
            error!(
                repository = %summary.name,
                tag = %tag.tag,
                "Manifest without digest"
            );
            ctx.tally.record(false);
        } else {
            ctx.tally.record(true);
        }
    }
}

#[async_trait]
impl Probe for ConsistencyProbe {
    fn name(&self) -> &'static str {
        "consistency"
    }

    fn description(&self) -> &'static str {
        "Cross-check state summaries against repository detail"
    }

    async fn run(&self, ctx: &ProbeContext, opts: &ProbeOptions) -> Result<(), ProbeError> {
        let interval = opts.interval_or(DEFAULT_INTERVAL);
        info!(
            interval_secs = interval.as_secs(),
            "Starting consistency checks"
        );

        while !ctx.expired() {
            match ctx.client.state().await {
                Ok(state) => {
                    let repositories = state.repositories.clone();
                    ctx.history.append(state);

                    for summary in &repositories {
                        check_repository(ctx, summary).await;
                    }
                }
                Err(e) => error!(error = %e, "Failed to fetch registry state"),
            }

            ctx.pause(interval).await;
        }

        Ok(())
    }

    fn default_options(&self) -> ProbeOptions {
        ProbeOptions {
            interval: Some(DEFAULT_INTERVAL),
            extra: Default::default(),
        }
    }
}
