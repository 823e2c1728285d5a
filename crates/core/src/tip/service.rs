//! Tip validation entry point.
//!
//! Flow: authorize → validate input → cache lookup (unless forced) →
//! resolve cast → reconcile ledgers → write back with an outcome-dependent TTL.

use std::sync::Arc;
use std::time::Duration;

use super::reconcile::TipReconciler;
use super::resolver::CastResolver;
use super::types::{CacheEntry, CastReference, ValidationOutcome};
use crate::Error;
use crate::auth::Authorizer;
use crate::cache::{CacheAside, Lookup};

/// Cache expiry chosen by validation outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlPolicy {
    /// Entries carrying a validated amount.
    pub confirmed: Duration,
    /// "No cast found" and "no valid tip" entries, rechecked sooner.
    pub negative: Duration,
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self { confirmed: Duration::from_secs(7 * 24 * 60 * 60), negative: Duration::from_secs(10 * 60) }
    }
}

impl TtlPolicy {
    pub fn for_entry(&self, entry: &CacheEntry) -> Duration {
        if entry.data.is_some_and(|outcome| outcome.is_confirmed()) { self.confirmed } else { self.negative }
    }
}

/// Orchestrates cast resolution, ledger reconciliation and caching.
pub struct ValidationService {
    authorizer: Authorizer,
    resolver: Arc<dyn CastResolver>,
    reconciler: TipReconciler,
    cache: CacheAside,
    ttl: TtlPolicy,
}

impl ValidationService {
    pub fn new(
        authorizer: Authorizer, resolver: Arc<dyn CastResolver>, reconciler: TipReconciler, cache: CacheAside,
        ttl: TtlPolicy,
    ) -> Self {
        Self { authorizer, resolver, reconciler, cache, ttl }
    }

    pub fn authorizer(&self) -> &Authorizer {
        &self.authorizer
    }

    pub fn cache(&self) -> &CacheAside {
        &self.cache
    }

    /// Validate the tip on `cast_url` for a caller presenting `credential`.
    ///
    /// # Errors
    ///
    /// - [`Error::Unauthorized`] before any other work if the credential is rejected
    /// - [`Error::BadRequest`] if `cast_url` is empty
    /// - [`Error::NotFound`] if the cast cannot be resolved on this call
    /// - [`Error::UpstreamUnavailable`] if the resolver is down or unconfigured
    pub async fn validate(
        &self, credential: Option<&str>, cast_url: &str, force_refresh: bool,
    ) -> Result<ValidationOutcome, Error> {
        self.authorizer.check(credential)?;
        let cast = CastReference::parse(cast_url)?;
        self.validate_cast(&cast, force_refresh).await
    }

    /// Validate an already-authorized cast reference.
    ///
    /// A cached "not found" marker reads as "not a tip"; only a fresh
    /// resolution failure surfaces as [`Error::NotFound`].
    pub async fn validate_cast(&self, cast: &CastReference, force_refresh: bool) -> Result<ValidationOutcome, Error> {
        let key = cast.cache_key();
        let lookup = self
            .cache
            .get_or_compute(&key, force_refresh, || self.compute(cast), |entry| self.ttl.for_entry(entry))
            .await?;

        match lookup {
            Lookup::Hit(entry) => Ok(entry.outcome()),
            Lookup::Fresh(CacheEntry { data: Some(outcome), .. }) => Ok(outcome),
            Lookup::Fresh(CacheEntry { data: None, .. }) => Err(Error::NotFound(format!("Cast not found: {cast}"))),
        }
    }

    async fn compute(&self, cast: &CastReference) -> Result<CacheEntry, Error> {
        match self.resolver.resolve(cast).await {
            Ok(hash) => {
                let verdict = self.reconciler.reconcile(&hash).await;
                Ok(CacheEntry::resolved(verdict.into()))
            }
            Err(Error::NotFound(reason)) => {
                tracing::info!(cast = %cast, reason = %reason, "cast not found, caching negative result");
                Ok(CacheEntry::cast_not_found())
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheDb, KvStore};
    use crate::tip::{ContentHash, LedgerEntry, TipLedger};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const SECRET: &str = "test-secret";
    const CAST: &str = "https://example/cast/1";

    enum Resolution {
        Found(&'static str),
        Missing,
        Down,
    }

    struct MockResolver {
        resolution: Resolution,
        calls: AtomicUsize,
    }

    impl MockResolver {
        fn new(resolution: Resolution) -> Arc<Self> {
            Arc::new(Self { resolution, calls: AtomicUsize::new(0) })
        }
    }

    #[async_trait]
    impl CastResolver for MockResolver {
        async fn resolve(&self, cast: &CastReference) -> Result<ContentHash, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.resolution {
                Resolution::Found(hash) => Ok(ContentHash::new(hash)),
                Resolution::Missing => Err(Error::NotFound(cast.to_string())),
                Resolution::Down => Err(Error::UpstreamUnavailable("resolver down".into())),
            }
        }
    }

    struct MockLedger {
        entry: LedgerEntry,
        calls: AtomicUsize,
    }

    impl MockLedger {
        fn new(entry: LedgerEntry) -> Arc<Self> {
            Arc::new(Self { entry, calls: AtomicUsize::new(0) })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TipLedger for MockLedger {
        fn name(&self) -> &'static str {
            "mock"
        }

        async fn lookup_tip(&self, _hash: &ContentHash) -> LedgerEntry {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.entry
        }
    }

    #[derive(Default)]
    struct RecordingStore {
        entries: Mutex<HashMap<String, (String, Duration)>>,
    }

    impl RecordingStore {
        fn entry(&self, key: &str) -> Option<(CacheEntry, Duration)> {
            let entries = self.entries.lock().unwrap();
            entries.get(key).map(|(json, ttl)| (serde_json::from_str(json).unwrap(), *ttl))
        }
    }

    #[async_trait]
    impl KvStore for RecordingStore {
        fn name(&self) -> &'static str {
            "recording"
        }

        async fn get(&self, key: &str) -> Result<Option<String>, Error> {
            Ok(self.entries.lock().unwrap().get(key).map(|(json, _)| json.clone()))
        }

        async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), Error> {
            self.entries.lock().unwrap().insert(key.to_string(), (value.to_string(), ttl));
            Ok(())
        }
    }

    struct UnreachableStore;

    #[async_trait]
    impl KvStore for UnreachableStore {
        fn name(&self) -> &'static str {
            "unreachable"
        }

        async fn get(&self, _key: &str) -> Result<Option<String>, Error> {
            Err(Error::Store("connection refused".into()))
        }

        async fn set_ex(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<(), Error> {
            Err(Error::Store("connection refused".into()))
        }
    }

    struct Harness {
        service: ValidationService,
        resolver: Arc<MockResolver>,
        amounts: Arc<MockLedger>,
        status: Arc<MockLedger>,
    }

    fn harness(resolution: Resolution, a: LedgerEntry, b: LedgerEntry, store: Option<Arc<dyn KvStore>>) -> Harness {
        let resolver = MockResolver::new(resolution);
        let amounts = MockLedger::new(a);
        let status = MockLedger::new(b);
        let service = ValidationService::new(
            Authorizer::new(Some(SECRET.into())),
            resolver.clone(),
            TipReconciler::new(amounts.clone(), status.clone()),
            CacheAside::new(store),
            TtlPolicy::default(),
        );
        Harness { service, resolver, amounts, status }
    }

    fn cache_key() -> String {
        CastReference::parse(CAST).unwrap().cache_key()
    }

    #[tokio::test]
    async fn test_amount_ledger_amount_wins() {
        let store = Arc::new(RecordingStore::default());
        let h = harness(
            Resolution::Found("0xabc"),
            LedgerEntry::Valid { amount: 200 },
            LedgerEntry::Absent,
            Some(store.clone()),
        );

        let outcome = h.service.validate(Some(SECRET), CAST, false).await.unwrap();

        assert_eq!(outcome, ValidationOutcome::tipped(200));
        let (entry, ttl) = store.entry(&cache_key()).unwrap();
        assert_eq!(entry.data, Some(ValidationOutcome::tipped(200)));
        assert_eq!(ttl, TtlPolicy::default().confirmed);
    }

    #[tokio::test]
    async fn test_both_absent_caches_with_short_ttl() {
        let store = Arc::new(RecordingStore::default());
        let h = harness(Resolution::Found("0xabc"), LedgerEntry::Absent, LedgerEntry::Absent, Some(store.clone()));

        let outcome = h.service.validate(Some(SECRET), CAST, false).await.unwrap();

        assert_eq!(outcome.amount, None);
        let (entry, ttl) = store.entry(&cache_key()).unwrap();
        assert_eq!(entry.data, Some(ValidationOutcome::default()));
        assert_eq!(ttl, Duration::from_secs(600));
    }

    #[tokio::test]
    async fn test_recorded_without_amount_uses_short_ttl() {
        let store = Arc::new(RecordingStore::default());
        let h = harness(Resolution::Found("0xabc"), LedgerEntry::Absent, LedgerEntry::Invalid, Some(store.clone()));

        let outcome = h.service.validate(Some(SECRET), CAST, false).await.unwrap();

        assert_eq!(outcome.amount, None);
        assert_eq!(store.entry(&cache_key()).unwrap().1, TtlPolicy::default().negative);
    }

    #[tokio::test]
    async fn test_cached_lookup_makes_no_outbound_calls() {
        let store = Arc::new(RecordingStore::default());
        let h = harness(
            Resolution::Found("0xabc"),
            LedgerEntry::Valid { amount: 50 },
            LedgerEntry::Absent,
            Some(store),
        );

        let first = h.service.validate(Some(SECRET), CAST, false).await.unwrap();
        let second = h.service.validate(Some(SECRET), CAST, false).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(h.resolver.calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.amounts.calls(), 1);
        assert_eq!(h.status.calls(), 1);
    }

    #[tokio::test]
    async fn test_force_refresh_bypasses_fresh_hit() {
        let store = Arc::new(RecordingStore::default());
        let h = harness(
            Resolution::Found("0xabc"),
            LedgerEntry::Valid { amount: 75 },
            LedgerEntry::Absent,
            Some(store.clone()),
        );

        let stale = CacheEntry { data: Some(ValidationOutcome::default()), timestamp: 0 };
        store
            .set_ex(&cache_key(), &serde_json::to_string(&stale).unwrap(), Duration::from_secs(600))
            .await
            .unwrap();

        let cached = h.service.validate(Some(SECRET), CAST, false).await.unwrap();
        assert_eq!(cached.amount, None);
        assert_eq!(h.amounts.calls(), 0);

        let forced = h.service.validate(Some(SECRET), CAST, true).await.unwrap();
        assert_eq!(forced, ValidationOutcome::tipped(75));
        assert_eq!(h.resolver.calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.amounts.calls(), 1);
        assert_eq!(h.status.calls(), 1);

        let (entry, ttl) = store.entry(&cache_key()).unwrap();
        assert_eq!(entry.data, Some(ValidationOutcome::tipped(75)));
        assert_eq!(ttl, TtlPolicy::default().confirmed);
    }

    #[tokio::test]
    async fn test_not_found_is_cached_negatively() {
        let store = Arc::new(RecordingStore::default());
        let h = harness(Resolution::Missing, LedgerEntry::Absent, LedgerEntry::Absent, Some(store.clone()));

        let first = h.service.validate(Some(SECRET), CAST, false).await;
        assert!(matches!(first, Err(Error::NotFound(_))));

        let (entry, ttl) = store.entry(&cache_key()).unwrap();
        assert!(entry.data.is_none());
        assert_eq!(ttl, Duration::from_secs(600));

        let second = h.service.validate(Some(SECRET), CAST, false).await.unwrap();
        assert_eq!(second.amount, None);
        assert_eq!(h.resolver.calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.amounts.calls(), 0);
    }

    #[tokio::test]
    async fn test_resolver_unavailable_propagates_and_is_not_cached() {
        let store = Arc::new(RecordingStore::default());
        let h = harness(Resolution::Down, LedgerEntry::Absent, LedgerEntry::Absent, Some(store.clone()));

        let result = h.service.validate(Some(SECRET), CAST, false).await;

        assert!(matches!(result, Err(Error::UpstreamUnavailable(_))));
        assert!(store.entry(&cache_key()).is_none());
    }

    #[tokio::test]
    async fn test_unreachable_store_still_answers() {
        let h = harness(
            Resolution::Found("0xabc"),
            LedgerEntry::Valid { amount: 10 },
            LedgerEntry::Valid { amount: 10 },
            Some(Arc::new(UnreachableStore)),
        );

        let outcome = h.service.validate(Some(SECRET), CAST, false).await.unwrap();
        assert_eq!(outcome, ValidationOutcome::tipped(10));
    }

    #[tokio::test]
    async fn test_missing_credential_is_checked_first() {
        let h = harness(Resolution::Found("0xabc"), LedgerEntry::Absent, LedgerEntry::Absent, None);

        assert!(matches!(h.service.validate(None, CAST, false).await, Err(Error::Unauthorized)));
        assert!(matches!(h.service.validate(None, "", true).await, Err(Error::Unauthorized)));
        assert!(matches!(h.service.validate(Some("wrong"), CAST, false).await, Err(Error::Unauthorized)));
        assert_eq!(h.resolver.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_cast_url_is_bad_request() {
        let h = harness(Resolution::Found("0xabc"), LedgerEntry::Absent, LedgerEntry::Absent, None);

        let result = h.service.validate(Some(SECRET), "", false).await;
        assert!(matches!(result, Err(Error::BadRequest(_))));
        assert_eq!(h.resolver.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_sqlite_store_round_trip() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let h = harness(
            Resolution::Found("0xabc"),
            LedgerEntry::Invalid,
            LedgerEntry::Valid { amount: 300 },
            Some(Arc::new(db.clone())),
        );

        let first = h.service.validate(Some(SECRET), CAST, false).await.unwrap();
        let second = h.service.validate(Some(SECRET), CAST, false).await.unwrap();

        assert_eq!(first, ValidationOutcome::tipped(300));
        assert_eq!(second, first);
        assert_eq!(h.amounts.calls(), 1);

        let meta = db.get_entry_meta(&cache_key()).await.unwrap().unwrap();
        assert_eq!(meta.cache_key, "tip/v1/https://example/cast/1");
    }

    #[test]
    fn test_ttl_policy_for_entry() {
        let policy = TtlPolicy::default();
        assert_eq!(policy.for_entry(&CacheEntry::cast_not_found()), policy.negative);
        assert_eq!(policy.for_entry(&CacheEntry::resolved(ValidationOutcome::default())), policy.negative);
        assert_eq!(policy.for_entry(&CacheEntry::resolved(ValidationOutcome::tipped(1))), policy.confirmed);
    }
}
