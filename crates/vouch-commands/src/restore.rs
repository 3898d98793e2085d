//! Re-posting a guild's vouch history.
//!
//! A restore reads the guild's ledger, resolves every distinct author once
//! and re-posts each vouch to the vouch channel with its original ordinal.
//! Both fan-outs are bounded and every call has a timeout. A failed lookup or
//! delivery only affects the vouches it touches.

use futures::stream::{self, StreamExt};
use std::collections::{BTreeSet, HashMap};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use vouch_common::{ActorProfile, GuildId, Result, UserId, Vouch, VouchError};
use vouch_config::DiscordConfig;
use vouch_embeds::{format_vouch, VouchEmbed};
use vouch_store::VouchStore;

use crate::traits::{ActorResolver, DestinationLookup, NotificationSink};

/// Concurrency bound and per-call timeout for Discord requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FanOut {
    /// Maximum number of requests in flight.
    pub max_concurrent: usize,
    /// Time allowed for each request.
    pub timeout: Duration,
}

impl FanOut {
    /// Creates fan-out settings.
    #[must_use]
    pub const fn new(max_concurrent: usize, timeout: Duration) -> Self {
        Self {
            max_concurrent,
            timeout,
        }
    }

    /// Reads the settings from the Discord configuration.
    #[must_use]
    pub const fn from_config(config: &DiscordConfig) -> Self {
        Self::new(config.max_concurrent_requests, config.request_timeout())
    }

    fn limit(self) -> usize {
        self.max_concurrent.max(1)
    }

    async fn run<T, F>(self, operation: &'static str, call: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        tokio::time::timeout(self.timeout, call)
            .await
            .unwrap_or_else(|_| Err(VouchError::timeout(operation, self.timeout)))
    }
}

/// What happened to one vouch during a restore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordOutcome {
    /// Posted to the vouch channel.
    Delivered,
    /// Skipped because its author could not be looked up.
    Unresolved,
    /// The author resolved but posting failed or timed out.
    DeliveryFailed,
}

/// Result of a restore. `outcomes[i]` belongs to the `i`-th vouch of the
/// ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreReport {
    /// Number of vouches in the ledger.
    pub total: usize,
    /// Per-vouch outcomes, in ledger order.
    pub outcomes: Vec<RecordOutcome>,
}

impl RestoreReport {
    /// Number of vouches that were posted.
    #[must_use]
    pub fn restored(&self) -> usize {
        self.count(RecordOutcome::Delivered)
    }

    /// Number of vouches with the given outcome.
    #[must_use]
    pub fn count(&self, outcome: RecordOutcome) -> usize {
        self.outcomes.iter().filter(|o| **o == outcome).count()
    }

    /// Whether the ledger was empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// Runs restores against a store. Never writes to it.
#[derive(Debug, Clone)]
pub struct RestoreHandler {
    store: Arc<VouchStore>,
    fan_out: FanOut,
}

impl RestoreHandler {
    /// Creates a handler reading from `store`.
    pub fn new(store: Arc<VouchStore>, fan_out: FanOut) -> Self {
        Self { store, fan_out }
    }

    /// Re-posts every vouch of `guild`.
    ///
    /// An empty ledger returns an empty report without looking up the
    /// destination. A missing destination fails the whole restore with
    /// [`VouchError::DestinationMissing`] before anything is posted.
    #[instrument(skip(self, lookup, resolver), fields(guild_id = %guild))]
    pub async fn restore(
        &self,
        guild: GuildId,
        lookup: &dyn DestinationLookup,
        resolver: &dyn ActorResolver,
    ) -> Result<RestoreReport> {
        let ledger = self.store.ledger(guild).await?;
        if ledger.is_empty() {
            info!("No vouches to restore");
            return Ok(RestoreReport::default());
        }

        let sink = lookup
            .locate(guild)
            .await
            .ok_or_else(|| VouchError::DestinationMissing {
                channel: lookup.destination(),
            })?;

        let profiles = self.resolve_actors(&ledger, resolver).await;
        debug!(
            resolved = profiles.len(),
            total = ledger.len(),
            "Resolved vouch authors"
        );

        let outcomes = self.deliver_all(&ledger, &profiles, sink.as_ref()).await;
        let report = RestoreReport {
            total: ledger.len(),
            outcomes,
        };

        info!(
            restored = report.restored(),
            total = report.total,
            unresolved = report.count(RecordOutcome::Unresolved),
            failed = report.count(RecordOutcome::DeliveryFailed),
            "Restore finished"
        );
        Ok(report)
    }

    async fn resolve_actors(
        &self,
        ledger: &[Vouch],
        resolver: &dyn ActorResolver,
    ) -> HashMap<UserId, ActorProfile> {
        let fan_out = self.fan_out;
        let distinct: BTreeSet<UserId> = ledger.iter().map(|v| v.user_id).collect();

        stream::iter(distinct)
            .map(|user| async move { (user, fan_out.run("user lookup", resolver.resolve(user)).await) })
            .buffer_unordered(fan_out.limit())
            .filter_map(|(user, result)| async move {
                match result {
                    Ok(profile) => Some((user, profile)),
                    Err(e) => {
                        warn!(user_id = %user, error = %e, "Could not resolve vouch author");
                        None
                    }
                }
            })
            .collect()
            .await
    }

    async fn deliver_all(
        &self,
        ledger: &[Vouch],
        profiles: &HashMap<UserId, ActorProfile>,
        sink: &dyn NotificationSink,
    ) -> Vec<RecordOutcome> {
        let fan_out = self.fan_out;
        let jobs: Vec<(usize, Option<VouchEmbed>)> = ledger
            .iter()
            .enumerate()
            .map(|(index, vouch)| {
                let embed = profiles
                    .get(&vouch.user_id)
                    .map(|actor| format_vouch(actor, vouch, index + 1));
                (index, embed)
            })
            .collect();

        let mut results: Vec<(usize, RecordOutcome)> = stream::iter(jobs)
            .map(|(index, embed)| async move {
                let Some(embed) = embed else {
                    return (index, RecordOutcome::Unresolved);
                };

                match fan_out.run("vouch delivery", sink.deliver(&embed)).await {
                    Ok(()) => (index, RecordOutcome::Delivered),
                    Err(e) => {
                        warn!(ordinal = index + 1, error = %e, "Failed to deliver vouch");
                        (index, RecordOutcome::DeliveryFailed)
                    }
                }
            })
            .buffer_unordered(fan_out.limit())
            .collect()
            .await;

        // Completion order is arbitrary; put outcomes back in ledger order.
        results.sort_unstable_by_key(|(index, _)| *index);
        results.into_iter().map(|(_, outcome)| outcome).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::MockActorResolver;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use vouch_common::test_utils::{discord_fixtures, vouch_fixtures};
    use vouch_common::{ChannelId, LoadPolicy};

    type Behaviour = Arc<dyn Fn(usize) -> (Duration, bool) + Send + Sync>;

    fn ordinal_of(embed: &VouchEmbed) -> usize {
        embed
            .title
            .split(' ')
            .next()
            .and_then(|n| n.parse().ok())
            .unwrap()
    }

    struct FakeSink {
        delivered: Arc<Mutex<Vec<usize>>>,
        behaviour: Behaviour,
    }

    #[async_trait]
    impl NotificationSink for FakeSink {
        async fn deliver(&self, embed: &VouchEmbed) -> Result<()> {
            let ordinal = ordinal_of(embed);
            let (delay, ok) = (self.behaviour)(ordinal);
            tokio::time::sleep(delay).await;
            if !ok {
                return Err(VouchError::discord("Missing Access"));
            }
            self.delivered.lock().unwrap().push(ordinal);
            Ok(())
        }
    }

    struct FakeLookup {
        present: bool,
        lookups: AtomicUsize,
        delivered: Arc<Mutex<Vec<usize>>>,
        behaviour: Behaviour,
    }

    impl FakeLookup {
        fn new(present: bool, behaviour: Behaviour) -> Self {
            Self {
                present,
                lookups: AtomicUsize::new(0),
                delivered: Arc::default(),
                behaviour,
            }
        }

        fn healthy() -> Self {
            Self::new(true, Arc::new(|_| (Duration::ZERO, true)))
        }

        fn delivered(&self) -> Vec<usize> {
            self.delivered.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl DestinationLookup for FakeLookup {
        fn destination(&self) -> ChannelId {
            ChannelId(10)
        }

        async fn locate(&self, _guild: GuildId) -> Option<Box<dyn NotificationSink>> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            self.present.then(|| {
                Box::new(FakeSink {
                    delivered: Arc::clone(&self.delivered),
                    behaviour: Arc::clone(&self.behaviour),
                }) as Box<dyn NotificationSink>
            })
        }
    }

    struct SlowResolver;

    #[async_trait]
    impl ActorResolver for SlowResolver {
        async fn resolve(&self, user: UserId) -> Result<ActorProfile> {
            if user == UserId(2) {
                tokio::time::sleep(Duration::from_secs(5)).await;
            }
            Ok(discord_fixtures::test_actor(user.get()))
        }
    }

    fn resolver_failing_for(bad: UserId) -> MockActorResolver {
        let mut resolver = MockActorResolver::new();
        resolver.expect_resolve().returning(move |user| {
            if user == bad {
                Err(VouchError::discord("Unknown User"))
            } else {
                Ok(discord_fixtures::test_actor(user.get()))
            }
        });
        resolver
    }

    async fn seeded(dir: &tempfile::TempDir, authors: &[u64]) -> RestoreHandler {
        let store = Arc::new(VouchStore::new(
            dir.path().join("vouches.json"),
            LoadPolicy::Strict,
        ));
        let guild = discord_fixtures::test_guild_id();
        for (n, author) in authors.iter().enumerate() {
            let actor = discord_fixtures::test_actor(*author);
            store
                .append(guild, vouch_fixtures::sample_vouch(&actor, n + 1))
                .await
                .unwrap();
        }
        RestoreHandler::new(store, FanOut::new(4, Duration::from_secs(1)))
    }

    #[tokio::test]
    async fn test_empty_ledger_skips_everything() {
        let dir = tempfile::tempdir().unwrap();
        let handler = seeded(&dir, &[]).await;
        let lookup = FakeLookup::healthy();
        let mut resolver = MockActorResolver::new();
        resolver.expect_resolve().never();

        let report = handler
            .restore(discord_fixtures::test_guild_id(), &lookup, &resolver)
            .await
            .unwrap();

        assert!(report.is_empty());
        assert_eq!(report.restored(), 0);
        assert_eq!(lookup.lookups.load(Ordering::SeqCst), 0);
        assert!(lookup.delivered().is_empty());
    }

    #[tokio::test]
    async fn test_missing_destination_posts_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let handler = seeded(&dir, &[1, 2]).await;
        let lookup = FakeLookup::new(false, Arc::new(|_| (Duration::ZERO, true)));
        let mut resolver = MockActorResolver::new();
        resolver.expect_resolve().never();

        let err = handler
            .restore(discord_fixtures::test_guild_id(), &lookup, &resolver)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            VouchError::DestinationMissing { channel } if channel == ChannelId(10)
        ));
        assert!(lookup.delivered().is_empty());
    }

    #[tokio::test]
    async fn test_unresolved_author_excludes_all_their_vouches() {
        let dir = tempfile::tempdir().unwrap();
        let handler = seeded(&dir, &[1, 2, 1]).await;
        let before = std::fs::read(dir.path().join("vouches.json")).unwrap();
        let lookup = FakeLookup::healthy();

        let mut resolver = MockActorResolver::new();
        resolver
            .expect_resolve()
            .times(2)
            .returning(|user| {
                if user == UserId(1) {
                    Err(VouchError::discord("Unknown User"))
                } else {
                    Ok(discord_fixtures::test_actor(user.get()))
                }
            });

        let report = handler
            .restore(discord_fixtures::test_guild_id(), &lookup, &resolver)
            .await
            .unwrap();

        assert_eq!(report.total, 3);
        assert_eq!(report.restored(), 1);
        assert_eq!(
            report.outcomes,
            [
                RecordOutcome::Unresolved,
                RecordOutcome::Delivered,
                RecordOutcome::Unresolved
            ]
        );
        assert_eq!(lookup.delivered(), [2]);

        let after = std::fs::read(dir.path().join("vouches.json")).unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_out_of_order_completion_keeps_ledger_positions() {
        let dir = tempfile::tempdir().unwrap();
        let handler = seeded(&dir, &[1, 2, 3, 4]).await;
        // Later vouches finish first; the second one fails.
        let lookup = FakeLookup::new(
            true,
            Arc::new(|ordinal| {
                let delay = Duration::from_millis(40 * (5 - ordinal as u64));
                (delay, ordinal != 2)
            }),
        );
        let resolver = resolver_failing_for(UserId(0));

        let report = handler
            .restore(discord_fixtures::test_guild_id(), &lookup, &resolver)
            .await
            .unwrap();

        assert_eq!(
            report.outcomes,
            [
                RecordOutcome::Delivered,
                RecordOutcome::DeliveryFailed,
                RecordOutcome::Delivered,
                RecordOutcome::Delivered
            ]
        );
        assert_eq!(lookup.delivered(), [4, 3, 1]);
    }

    #[tokio::test]
    async fn test_timeouts_count_as_failures() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(VouchStore::new(
            dir.path().join("vouches.json"),
            LoadPolicy::Strict,
        ));
        let guild = discord_fixtures::test_guild_id();
        for (n, author) in [1u64, 2, 3].iter().enumerate() {
            let actor = discord_fixtures::test_actor(*author);
            store
                .append(guild, vouch_fixtures::sample_vouch(&actor, n + 1))
                .await
                .unwrap();
        }
        let handler = RestoreHandler::new(store, FanOut::new(2, Duration::from_millis(50)));
        let lookup = FakeLookup::new(
            true,
            Arc::new(|ordinal| {
                if ordinal == 3 {
                    (Duration::from_secs(5), true)
                } else {
                    (Duration::ZERO, true)
                }
            }),
        );

        let report = handler.restore(guild, &lookup, &SlowResolver).await.unwrap();

        assert_eq!(
            report.outcomes,
            [
                RecordOutcome::Delivered,
                RecordOutcome::Unresolved,
                RecordOutcome::DeliveryFailed
            ]
        );
        assert_eq!(report.restored(), 1);
        assert_eq!(lookup.delivered(), [1]);
    }

    #[test]
    fn test_report_counts() {
        let report = RestoreReport {
            total: 4,
            outcomes: vec![
                RecordOutcome::Delivered,
                RecordOutcome::Unresolved,
                RecordOutcome::Delivered,
                RecordOutcome::DeliveryFailed,
            ],
        };
        assert_eq!(report.restored(), 2);
        assert_eq!(report.count(RecordOutcome::Unresolved), 1);
        assert!(!report.is_empty());
    }

    #[test]
    fn test_fan_out_limit_is_at_least_one() {
        assert_eq!(FanOut::new(0, Duration::from_secs(1)).limit(), 1);
        assert_eq!(FanOut::new(8, Duration::from_secs(1)).limit(), 8);
    }
}
