use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::warn;

use crate::wizard::PlanDraft;

/// Server side of the plan cache, in production the save-current and
/// current endpoints. A trait seam so tests substitute a fake.
#[async_trait]
pub trait RemotePlans: Send + Sync {
    async fn save_current(&self, draft: &PlanDraft) -> anyhow::Result<()>;
    async fn fetch_current(&self) -> anyhow::Result<Option<PlanDraft>>;
}

/// Best-effort mirror of the current plan. The remote is attempted
/// exactly once per call, with no retry loop; the local copy answers
/// when the remote cannot.
pub struct PlanCache<R: RemotePlans> {
    remote: R,
    local: Mutex<Option<PlanDraft>>,
}

impl<R: RemotePlans> PlanCache<R> {
    pub fn new(remote: R) -> Self {
        Self {
            remote,
            local: Mutex::new(None),
        }
    }

    /// Stores the draft locally, then tries the remote once. A remote
    /// failure is swallowed; the local copy still reflects the draft.
    pub async fn save(&self, draft: &PlanDraft) {
        *self.local.lock().await = Some(draft.clone());
        if let Err(e) = self.remote.save_current(draft).await {
            warn!(error = %e, "remote plan save failed, keeping local copy only");
        }
    }

    /// Remote first, refreshing the local mirror on success; the
    /// local copy on remote failure or absence; the zero-valued
    /// default draft when neither side has a plan.
    pub async fn load(&self) -> PlanDraft {
        match self.remote.fetch_current().await {
            Ok(Some(draft)) => {
                *self.local.lock().await = Some(draft.clone());
                return draft;
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "remote plan load failed, falling back to local copy"),
        }
        self.local.lock().await.clone().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::{apply, WizardStep};
    use std::sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
    };

    #[derive(Clone, Default)]
    struct FakeRemote {
        inner: Arc<FakeInner>,
    }

    #[derive(Default)]
    struct FakeInner {
        fail: AtomicBool,
        stored: Mutex<Option<PlanDraft>>,
        save_calls: AtomicUsize,
        fetch_calls: AtomicUsize,
    }

    impl FakeRemote {
        fn set_failing(&self, fail: bool) {
            self.inner.fail.store(fail, Ordering::SeqCst);
        }

        async fn seed(&self, draft: PlanDraft) {
            *self.inner.stored.lock().await = Some(draft);
        }
    }

    #[async_trait]
    impl RemotePlans for FakeRemote {
        async fn save_current(&self, draft: &PlanDraft) -> anyhow::Result<()> {
            self.inner.save_calls.fetch_add(1, Ordering::SeqCst);
            if self.inner.fail.load(Ordering::SeqCst) {
                anyhow::bail!("remote unreachable");
            }
            *self.inner.stored.lock().await = Some(draft.clone());
            Ok(())
        }

        async fn fetch_current(&self) -> anyhow::Result<Option<PlanDraft>> {
            self.inner.fetch_calls.fetch_add(1, Ordering::SeqCst);
            if self.inner.fail.load(Ordering::SeqCst) {
                anyhow::bail!("remote unreachable");
            }
            Ok(self.inner.stored.lock().await.clone())
        }
    }

    fn draft(destination: &str) -> PlanDraft {
        PlanDraft {
            destination: destination.into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn save_writes_through_to_the_remote() {
        let remote = FakeRemote::default();
        let cache = PlanCache::new(remote.clone());

        cache.save(&draft("Paris")).await;

        let stored = remote.inner.stored.lock().await.clone();
        assert_eq!(stored.unwrap().destination, "Paris");
        assert_eq!(remote.inner.save_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn save_swallows_remote_failure_and_keeps_the_local_copy() {
        let remote = FakeRemote::default();
        remote.set_failing(true);
        let cache = PlanCache::new(remote.clone());

        cache.save(&draft("Goa")).await;

        // single attempt, no retry loop
        assert_eq!(remote.inner.save_calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.load().await.destination, "Goa");
    }

    #[tokio::test]
    async fn load_prefers_the_remote_plan() {
        let remote = FakeRemote::default();
        remote.seed(draft("Rome")).await;
        let cache = PlanCache::new(remote.clone());

        assert_eq!(cache.load().await.destination, "Rome");
        assert_eq!(remote.inner.fetch_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn load_falls_back_to_local_when_the_remote_has_no_plan() {
        let remote = FakeRemote::default();
        remote.set_failing(true);
        let cache = PlanCache::new(remote.clone());

        cache.save(&draft("Lisbon")).await;
        remote.set_failing(false);

        // remote is reachable again but empty
        assert_eq!(cache.load().await.destination, "Lisbon");
    }

    #[tokio::test]
    async fn load_defaults_when_neither_side_has_a_plan() {
        let cache = PlanCache::new(FakeRemote::default());

        let loaded = cache.load().await;
        assert_eq!(loaded, PlanDraft::default());
        assert_eq!(loaded.adults, 2);
        assert_eq!(loaded.total_cost, 0.0);
    }

    #[tokio::test]
    async fn remote_success_refreshes_the_local_mirror() {
        let remote = FakeRemote::default();
        remote.seed(draft("Kyoto")).await;
        let cache = PlanCache::new(remote.clone());

        cache.load().await;
        remote.set_failing(true);

        assert_eq!(cache.load().await.destination, "Kyoto");
    }

    #[tokio::test]
    async fn wizard_steps_round_trip_through_the_cache() {
        let remote = FakeRemote::default();
        let cache = PlanCache::new(remote.clone());

        let mut current = cache.load().await;
        current = apply(
            current,
            WizardStep::Destination {
                destination: "Paris".into(),
            },
        );
        cache.save(&current).await;
        current = apply(current, WizardStep::TotalCost { total_cost: 1800.0 });
        cache.save(&current).await;

        let loaded = cache.load().await;
        assert_eq!(loaded.destination, "Paris");
        assert_eq!(loaded.total_cost, 1800.0);
        assert_eq!(remote.inner.save_calls.load(Ordering::SeqCst), 2);
    }
}
