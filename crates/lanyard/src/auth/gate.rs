//! Single-flight refresh gate.

use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Notify;

/// Serializes token refresh attempts so concurrent 401s produce exactly one
/// refresh network call.
///
/// The gate is a non-reentrant flag with waiters. Callers follow a two-phase
/// protocol on receiving a 401:
///
/// 1. [`await_idle`](Self::await_idle) — don't race ahead of a refresh a
///    sibling request already started. A caller that had to wait here was a
///    follower of a completed episode and must NOT claim the gate: the
///    refresh it was waiting for already happened.
/// 2. [`try_enter`](Self::try_enter) — only callers that found the gate idle
///    contend; exactly one wins and becomes the leader. It performs the
///    refresh and calls [`exit`](Self::exit) regardless of the outcome.
/// 3. [`await_idle`](Self::await_idle) again — covers the caller whose
///    `try_enter` raced with a leader that had just entered; every caller
///    resumes only after the refresh episode has fully completed.
///
/// Waiters are released in no guaranteed order once the flag drops.
///
/// Each [`ApiClient`](crate::ApiClient) owns its gate, so the single-flight
/// guarantee is scoped to one client instance and tests get a fresh gate per
/// case.
#[derive(Default)]
pub struct RefreshGate {
    refreshing: AtomicBool,
    idle: Notify,
}

impl RefreshGate {
    /// Create a gate in the idle state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Suspend until no refresh is in flight. Returns `true` if the caller
    /// had to wait, `false` if the gate was already idle.
    ///
    /// A `true` return means a refresh episode completed while the caller
    /// was suspended; the caller must not [`try_enter`](Self::try_enter)
    /// afterwards, or it would start a second refresh for the same episode.
    pub async fn await_idle(&self) -> bool {
        let mut waited = false;
        loop {
            // Register interest before checking the flag, otherwise a
            // notify_waiters between the check and the await is lost.
            let released = self.idle.notified();
            if !self.refreshing.load(Ordering::Acquire) {
                return waited;
            }
            released.await;
            waited = true;
        }
    }

    /// Atomically claim the refresh. Returns `true` if the caller became the
    /// leader and is now responsible for performing the refresh and calling
    /// [`exit`](Self::exit); `false` if a refresh is already in flight.
    pub fn try_enter(&self) -> bool {
        self.refreshing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Mark the refresh episode finished and release all waiters.
    pub fn exit(&self) {
        self.refreshing.store(false, Ordering::Release);
        self.idle.notify_waiters();
    }
}

impl std::fmt::Debug for RefreshGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshGate")
            .field("refreshing", &self.refreshing.load(Ordering::Relaxed))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    #[tokio::test]
    async fn await_idle_returns_immediately_when_idle() {
        let gate = RefreshGate::new();
        assert!(!gate.await_idle().await);
    }

    #[tokio::test]
    async fn only_one_caller_enters() {
        let gate = RefreshGate::new();
        assert!(gate.try_enter());
        assert!(!gate.try_enter());

        gate.exit();
        assert!(gate.try_enter());
    }

    #[tokio::test]
    async fn exit_releases_waiters() {
        let gate = Arc::new(RefreshGate::new());
        assert!(gate.try_enter());

        let waiter = {
            let gate = Arc::clone(&gate);
            tokio::spawn(async move { gate.await_idle().await })
        };

        // Give the waiter a chance to park on the gate
        tokio::task::yield_now().await;
        gate.exit();

        let waited = tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should be released after exit")
            .unwrap();
        assert!(waited);
    }

    /// The full two-phase protocol: many concurrent callers, exactly one
    /// performs the refresh, and every caller resumes only after it finished.
    #[tokio::test(start_paused = true)]
    async fn concurrent_callers_elect_one_leader() {
        let gate = Arc::new(RefreshGate::new());
        let refreshes = Arc::new(AtomicUsize::new(0));
        let in_flight = Arc::new(AtomicBool::new(false));

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let gate = Arc::clone(&gate);
            let refreshes = Arc::clone(&refreshes);
            let in_flight = Arc::clone(&in_flight);

            tasks.push(tokio::spawn(async move {
                // A caller that had to wait was a follower of a completed
                // episode and may not contend for the gate
                let waited = gate.await_idle().await;
                if !waited && gate.try_enter() {
                    refreshes.fetch_add(1, Ordering::SeqCst);
                    in_flight.store(true, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    in_flight.store(false, Ordering::SeqCst);
                    gate.exit();
                }
                gate.await_idle().await;

                // No caller may proceed while the leader's refresh is running
                assert!(!in_flight.load(Ordering::SeqCst));
            }));
        }

        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(refreshes.load(Ordering::SeqCst), 1);
    }
}
