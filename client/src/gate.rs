//! Single-flight gate for token refreshes.
//!
//! The gate is either **Idle** or **`InFlight`** with an ordered list of parked
//! waiters. The first caller to enter an idle gate becomes the leader and
//! receives a [`RefreshLease`]; everyone entering while the lease is held
//! becomes a follower and receives a [`PendingRefresh`]. Settling the lease
//! moves the gate back to Idle and hands the outcome to every follower in the
//! order they joined.
//!
//! ```text
//!            enter()                     resolve(token) / reject(failure)
//!   Idle ───────────────▶ InFlight([]) ─────────────────────────────────▶ Idle
//!                           │  ▲                  (waiters drained in order)
//!                  enter()  │  │ push waiter
//!                           └──┘
//! ```
//!
//! Dropping an unsettled lease rejects the followers with
//! [`RefreshFailure::Abandoned`] so that nobody waits forever.

use eventhub_core::RefreshFailure;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::oneshot;

/// Outcome shared with every follower.
pub type RefreshOutcome = Result<String, RefreshFailure>;

type Waiter = oneshot::Sender<RefreshOutcome>;

#[derive(Debug)]
enum GateState {
    Idle,
    InFlight(Vec<Waiter>),
}

/// Result of entering the gate.
#[derive(Debug)]
pub enum Admission<'a> {
    /// No refresh was running; the caller must perform it.
    Leader(RefreshLease<'a>),
    /// A refresh is running; await its outcome.
    Follower(PendingRefresh),
}

/// Single-flight coordination point for token refreshes.
///
/// The state lock is never held across an `.await`.
#[derive(Debug)]
pub struct RefreshGate {
    state: Mutex<GateState>,
}

impl Default for RefreshGate {
    fn default() -> Self {
        Self::new()
    }
}

impl RefreshGate {
    /// Create an idle gate.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(GateState::Idle),
        }
    }

    fn lock(&self) -> MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Enter the gate, becoming leader if idle or follower otherwise.
    pub fn enter(&self) -> Admission<'_> {
        let mut state = self.lock();
        match &mut *state {
            GateState::InFlight(waiters) => {
                let (tx, rx) = oneshot::channel();
                waiters.push(tx);
                Admission::Follower(PendingRefresh { rx })
            }
            GateState::Idle => {
                *state = GateState::InFlight(Vec::new());
                Admission::Leader(RefreshLease {
                    gate: self,
                    settled: false,
                })
            }
        }
    }

    /// Whether a refresh is currently running.
    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        matches!(*self.lock(), GateState::InFlight(_))
    }

    /// Number of followers parked behind the running refresh.
    #[must_use]
    pub fn waiting(&self) -> usize {
        match &*self.lock() {
            GateState::InFlight(waiters) => waiters.len(),
            GateState::Idle => 0,
        }
    }

    fn settle(&self, outcome: &RefreshOutcome) -> usize {
        let waiters = match std::mem::replace(&mut *self.lock(), GateState::Idle) {
            GateState::InFlight(waiters) => waiters,
            GateState::Idle => Vec::new(),
        };

        let mut delivered = 0;
        for waiter in waiters {
            // A follower whose request was dropped is skipped.
            if waiter.send(outcome.clone()).is_ok() {
                delivered += 1;
            }
        }
        delivered
    }
}

/// Held by the leader while the refresh runs.
#[derive(Debug)]
#[must_use = "dropping the lease abandons the refresh"]
pub struct RefreshLease<'a> {
    gate: &'a RefreshGate,
    settled: bool,
}

impl RefreshLease<'_> {
    /// Release the gate with a new access token. Returns how many followers
    /// received it.
    pub fn resolve(mut self, token: String) -> usize {
        self.settled = true;
        self.gate.settle(&Ok(token))
    }

    /// Release the gate with a failure. Returns how many followers received it.
    pub fn reject(mut self, failure: RefreshFailure) -> usize {
        self.settled = true;
        self.gate.settle(&Err(failure))
    }
}

impl Drop for RefreshLease<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.gate.settle(&Err(RefreshFailure::Abandoned));
        }
    }
}

/// Held by a follower until the leader settles.
#[derive(Debug)]
pub struct PendingRefresh {
    rx: oneshot::Receiver<RefreshOutcome>,
}

impl PendingRefresh {
    /// Wait for the leader's outcome.
    ///
    /// # Errors
    ///
    /// Returns the leader's failure, or `RefreshFailure::Abandoned` if the
    /// leader went away without settling.
    pub async fn wait(self) -> RefreshOutcome {
        self.rx
            .await
            .unwrap_or_else(|_| Err(RefreshFailure::Abandoned))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]

    use super::*;

    fn leader(gate: &RefreshGate) -> RefreshLease<'_> {
        match gate.enter() {
            Admission::Leader(lease) => lease,
            Admission::Follower(_) => panic!("expected to lead"),
        }
    }

    fn follower(gate: &RefreshGate) -> PendingRefresh {
        match gate.enter() {
            Admission::Follower(pending) => pending,
            Admission::Leader(_) => panic!("expected to follow"),
        }
    }

    #[tokio::test]
    async fn only_first_entrant_leads() {
        let gate = RefreshGate::new();
        assert!(!gate.is_in_flight());

        let lease = leader(&gate);
        assert!(gate.is_in_flight());
        let a = follower(&gate);
        let b = follower(&gate);
        assert_eq!(gate.waiting(), 2);

        assert_eq!(lease.resolve("new".to_string()), 2);
        assert!(!gate.is_in_flight());
        assert_eq!(a.wait().await.unwrap(), "new");
        assert_eq!(b.wait().await.unwrap(), "new");
    }

    #[tokio::test]
    async fn rejection_reaches_every_follower() {
        let gate = RefreshGate::new();
        let lease = leader(&gate);
        let waiters: Vec<_> = (0..3).map(|_| follower(&gate)).collect();

        lease.reject(RefreshFailure::MissingAccessToken);
        for waiter in waiters {
            assert_eq!(waiter.wait().await, Err(RefreshFailure::MissingAccessToken));
        }
    }

    #[tokio::test]
    async fn followers_are_released_in_join_order() {
        let gate = RefreshGate::new();
        let lease = leader(&gate);
        let order = std::sync::Arc::new(Mutex::new(Vec::new()));

        let mut handles = Vec::new();
        for i in 0..5 {
            let pending = follower(&gate);
            let order = order.clone();
            handles.push(tokio::spawn(async move {
                pending.wait().await.unwrap();
                order.lock().unwrap().push(i);
            }));
        }
        // Park every follower before releasing.
        tokio::task::yield_now().await;

        lease.resolve("t".to_string());
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn dropped_lease_abandons_followers() {
        let gate = RefreshGate::new();
        let lease = leader(&gate);
        let pending = follower(&gate);

        drop(lease);
        assert!(!gate.is_in_flight());
        assert_eq!(pending.wait().await, Err(RefreshFailure::Abandoned));
    }

    #[tokio::test]
    async fn dropped_follower_is_skipped() {
        let gate = RefreshGate::new();
        let lease = leader(&gate);
        let kept = follower(&gate);
        drop(follower(&gate));

        assert_eq!(lease.resolve("t".to_string()), 1);
        assert_eq!(kept.wait().await.unwrap(), "t");
        let _next = leader(&gate);
    }
}
