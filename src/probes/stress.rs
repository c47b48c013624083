//! Stress test probe
//!
//! Runs a pool of concurrent workers, each hammering a randomly chosen
//! read endpoint with a randomized inter-operation delay. Every attempt
//! lands in the shared tally; the workers share nothing else and never
//! coordinate.
//!
//! This is deliberately not a saturating load generator - worker count is
//! bounded and delays keep per-worker request rates around one per half
//! second.
//!
//! ## Options
//!
//! - worker count comes from the run context (default: 10)

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use super::traits::{Probe, ProbeContext, ProbeError, ProbeOptions};

/// Inter-operation delay bounds in seconds, uniform in [0.1, 1.0)
const MIN_DELAY_SECS: f64 = 0.1;
const MAX_DELAY_SECS: f64 = 1.0;

/// One randomly selected stress operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StressOp {
    State,
    Health,
    Sessions,
    RepositoryDetail,
}

impl StressOp {
    fn pick(rng: &mut StdRng) -> Self {
        match rng.random_range(0..4u8) {
            0 => StressOp::State,
            1 => StressOp::Health,
            2 => StressOp::Sessions,
            _ => StressOp::RepositoryDetail,
        }
    }
}

/// Perform one stress operation, reporting whether it succeeded
///
/// The repository-detail variant needs a fresh state fetch to pick a
/// target; if that fetch fails or lists no repositories, the whole
/// attempt is one failure - no substitute operation is performed.
async fn perform(op: StressOp, ctx: &ProbeContext, rng: &mut StdRng, worker: usize) -> bool {
    match op {
        StressOp::State => match ctx.client.state().await {
            Ok(_) => true,
            Err(e) => {
                error!(worker = worker, error = %e, "State fetch failed");
                false
            }
        },
        StressOp::Health => match ctx.client.health().await {
            Ok(_) => true,
            Err(e) => {
                error!(worker = worker, error = %e, "Health fetch failed");
                false
            }
        },
        StressOp::Sessions => match ctx.client.sessions().await {
            Ok(_) => true,
            Err(e) => {
                error!(worker = worker, error = %e, "Session fetch failed");
                false
            }
        },
        StressOp::RepositoryDetail => match ctx.client.state().await {
            Ok(state) if !state.repositories.is_empty() => {
                let pick = rng.random_range(0..state.repositories.len());
                let name = &state.repositories[pick].name;
                match ctx.client.repository(name).await {
                    Ok(_) => true,
                    Err(e) => {
                        error!(
                            worker = worker,
                            repository = %name,
                            error = %e,
                            "Repository detail fetch failed"
                        );
                        false
                    }
                }
            }
            Ok(_) => {
                debug!(worker = worker, "No repositories to pick a detail target from");
                false
            }
            Err(e) => {
                error!(worker = worker, error = %e, "State fetch for detail target failed");
                false
            }
        },
    }
}

/// Concurrent random-read stress test
pub struct StressProbe;

#[async_trait]
impl Probe for StressProbe {
    fn name(&self) -> &'static str {
        "stress"
    }

    fn description(&self) -> &'static str {
        "Hammer read endpoints from concurrent randomized workers"
    }

    async fn run(&self, ctx: &ProbeContext, _opts: &ProbeOptions) -> Result<(), ProbeError> {
        let workers = ctx.workers.max(1);
        info!(workers = workers, "Starting stress test");

        let mut join_set = JoinSet::new();
        for worker in 0..workers {
            let ctx = ctx.clone();
            join_set.spawn(async move {
                let mut rng = StdRng::seed_from_u64(rand::random());

                while !ctx.expired() {
                    let op = StressOp::pick(&mut rng);
                    let success = perform(op, &ctx, &mut rng, worker).await;
                    ctx.tally.record(success);

                    let delay =
                        Duration::from_secs_f64(rng.random_range(MIN_DELAY_SECS..MAX_DELAY_SECS));
                    ctx.pause(delay).await;
                }
            });
        }

        while let Some(joined) = join_set.join_next().await {
            if let Err(e) = joined {
                warn!(error = %e, "Stress worker panicked");
            }
        }

        info!("Stress test complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::RegistryClient;
    use crate::report::{OperationTally, StateHistory};
    use quaymaster_testkit::mock::{MockRegistry, MockRepository};

    fn context(base_url: &str, workers: usize, window: Duration) -> ProbeContext {
        ProbeContext::new(
            RegistryClient::new(base_url).unwrap(),
            OperationTally::new(),
            StateHistory::new(),
            workers,
            window,
        )
    }

    #[test]
    fn test_probe_metadata() {
        let probe = StressProbe;
        assert_eq!(probe.name(), "stress");
        assert!(!probe.description().is_empty());
    }

    #[test]
    fn test_pick_covers_all_operations() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = [false; 4];

        for _ in 0..200 {
            match StressOp::pick(&mut rng) {
                StressOp::State => seen[0] = true,
                StressOp::Health => seen[1] = true,
                StressOp::Sessions => seen[2] = true,
                StressOp::RepositoryDetail => seen[3] = true,
            }
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[tokio::test]
    async fn test_detail_with_no_repositories_is_a_failure() {
        let mock = MockRegistry::new().spawn().await;
        let ctx = context(mock.base_url(), 1, Duration::from_secs(1));
        let mut rng = StdRng::seed_from_u64(1);

        assert!(!perform(StressOp::RepositoryDetail, &ctx, &mut rng, 0).await);
    }

    #[tokio::test]
    async fn test_detail_with_unavailable_state_is_a_failure() {
        let mock = MockRegistry::new().spawn().await;
        mock.update(|reg| reg.fail_state = true);

        let ctx = context(mock.base_url(), 1, Duration::from_secs(1));
        let mut rng = StdRng::seed_from_u64(1);

        assert!(!perform(StressOp::RepositoryDetail, &ctx, &mut rng, 0).await);
    }

    #[tokio::test]
    async fn test_detail_with_repositories_succeeds() {
        let mock = MockRegistry::new()
            .with_repository(MockRepository::new("app").with_tag("v1", Some("sha256:aa"), true))
            .spawn()
            .await;

        let ctx = context(mock.base_url(), 1, Duration::from_secs(1));
        let mut rng = StdRng::seed_from_u64(1);

        assert!(perform(StressOp::RepositoryDetail, &ctx, &mut rng, 0).await);
        assert!(perform(StressOp::State, &ctx, &mut rng, 0).await);
        assert!(perform(StressOp::Health, &ctx, &mut rng, 0).await);
        assert!(perform(StressOp::Sessions, &ctx, &mut rng, 0).await);
    }

    #[tokio::test]
    async fn test_workers_fill_the_tally() {
        let mock = MockRegistry::new()
            .with_repository(MockRepository::new("app").with_tag("v1", Some("sha256:aa"), true))
            .spawn()
            .await;

        let ctx = context(mock.base_url(), 4, Duration::from_millis(200));
        StressProbe
            .run(&ctx, &ProbeOptions::default())
            .await
            .unwrap();

        let (attempts, failures) = ctx.tally.counts();
        assert!(attempts >= 4);
        assert_eq!(failures, 0);
    }
}
