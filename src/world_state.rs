//! World state snapshots for planning.
//!
//! A [`WorldState`] is an immutable, timestamped set of facts. The planner
//! never mutates one: hypothetical successor states produced while searching
//! are new snapshots built with [`WorldState::successor`].
//!
//! Snapshots come from a [`WorldStateDeterminer`], the single inbound
//! capability of the planner. [`WorldStateCache`] wraps a determiner so that
//! one planning episode reasons over exactly one snapshot, even though the
//! real world may change while the search runs.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use goap_planner::{Conditions, StaticDeterminer, WorldStateCache};
//!
//! let determiner = StaticDeterminer::new(Conditions::new().with("door_open", false));
//! let cache = WorldStateCache::new(Arc::new(determiner));
//!
//! let first = cache.current().unwrap();
//! let second = cache.current().unwrap();
//! assert!(Arc::ptr_eq(&first, &second));
//! ```

use std::fmt;
use std::ops::Deref;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;

use crate::{Conditions, PlannerError, Result};

/// How often a timed fetch wakes up to look at the cancellation token.
const CANCEL_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// An immutable snapshot of world facts taken at `timestamp`.
#[derive(Clone, Debug)]
pub struct WorldState {
    facts: Conditions,
    timestamp: DateTime<Utc>,
}

impl WorldState {
    /// Creates a snapshot of `facts` stamped with the current time.
    pub fn new(facts: Conditions) -> Self {
        Self::at(facts, Utc::now())
    }

    pub fn at(facts: Conditions, timestamp: DateTime<Utc>) -> Self {
        Self { facts, timestamp }
    }

    pub fn empty() -> Self {
        Self::new(Conditions::new())
    }

    pub fn facts(&self) -> &Conditions {
        &self.facts
    }

    /// When the determiner produced this snapshot.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Returns the hypothetical state after `effects` are applied.
    ///
    /// The successor keeps the parent's timestamp: it describes the same
    /// moment of observation, only with imagined changes on top.
    ///
    /// ```
    /// use goap_planner::{Conditions, WorldState};
    ///
    /// let now = WorldState::new(Conditions::new().with("lit", false));
    /// let after = now.successor(&Conditions::new().with("lit", true));
    ///
    /// assert!(after.satisfies(&Conditions::new().with("lit", true)));
    /// assert!(now.satisfies(&Conditions::new().with("lit", false)));
    /// ```
    pub fn successor(&self, effects: &Conditions) -> WorldState {
        Self {
            facts: self.facts.apply(effects),
            timestamp: self.timestamp,
        }
    }
}

impl Deref for WorldState {
    type Target = Conditions;

    fn deref(&self) -> &Self::Target {
        &self.facts
    }
}

impl From<Conditions> for WorldState {
    fn from(facts: Conditions) -> Self {
        Self::new(facts)
    }
}

/// Two snapshots are equal when they hold the same facts, whenever taken.
impl PartialEq for WorldState {
    fn eq(&self, other: &Self) -> bool {
        self.facts == other.facts
    }
}

impl Eq for WorldState {}

impl fmt::Display for WorldState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.facts, self.timestamp.to_rfc3339())
    }
}

/// Produces the current world state, or fails.
///
/// Implementations live outside the planner: sensors, a database, a model
/// call. A determiner that cannot answer should return
/// [`PlannerError::StateUnavailable`].
pub trait WorldStateDeterminer: Send + Sync {
    /// # Returns
    ///
    /// A fresh snapshot of the world. The planner caches it for the rest of
    /// the episode.
    ///
    /// # Errors
    ///
    /// [`PlannerError::StateUnavailable`] when the world cannot be observed.
    fn determine(&self) -> Result<WorldState>;
}

/// A determiner that always reports the same facts.
#[derive(Clone, Debug, Default)]
pub struct StaticDeterminer {
    facts: Conditions,
}

impl StaticDeterminer {
    pub fn new(facts: Conditions) -> Self {
        Self { facts }
    }
}

impl WorldStateDeterminer for StaticDeterminer {
    fn determine(&self) -> Result<WorldState> {
        Ok(WorldState::new(self.facts.clone()))
    }
}

/// A determiner backed by a closure.
///
/// ```
/// use goap_planner::{Conditions, FnDeterminer, WorldStateDeterminer};
///
/// let determiner = FnDeterminer::new(|| Ok(Conditions::new().with("battery", 80)));
/// let state = determiner.determine().unwrap();
/// assert!(state.satisfies(&Conditions::new().with("battery", 80)));
/// ```
pub struct FnDeterminer<F> {
    func: F,
}

impl<F> FnDeterminer<F>
where
    F: Fn() -> Result<Conditions> + Send + Sync,
{
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> WorldStateDeterminer for FnDeterminer<F>
where
    F: Fn() -> Result<Conditions> + Send + Sync,
{
    fn determine(&self) -> Result<WorldState> {
        (self.func)().map(WorldState::new)
    }
}

impl<F> fmt::Debug for FnDeterminer<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnDeterminer").finish_non_exhaustive()
    }
}

/// Caches one snapshot per planning episode.
///
/// The first call to [`current`](Self::current) asks the determiner; later
/// calls return the same `Arc` until [`new_episode`](Self::new_episode) is
/// called. Failed fetches are not cached.
///
/// Each episode gets its own [`CancellationToken`], a child of the cache-wide
/// token. Cancelling the episode token abandons that episode only; cancelling
/// the cache-wide token given to [`with_cancellation`](Self::with_cancellation)
/// abandons every episode, current and future.
pub struct WorldStateCache {
    determiner: Arc<dyn WorldStateDeterminer>,
    snapshot: Mutex<Option<Arc<WorldState>>>,
    timeout: Option<Duration>,
    root_cancel: CancellationToken,
    episode_cancel: Mutex<CancellationToken>,
}

impl WorldStateCache {
    pub fn new(determiner: Arc<dyn WorldStateDeterminer>) -> Self {
        Self::with_root(determiner, None, CancellationToken::new())
    }

    fn with_root(
        determiner: Arc<dyn WorldStateDeterminer>,
        timeout: Option<Duration>,
        root_cancel: CancellationToken,
    ) -> Self {
        let episode_cancel = Mutex::new(root_cancel.child_token());
        Self {
            determiner,
            snapshot: Mutex::new(None),
            timeout,
            root_cancel,
            episode_cancel,
        }
    }

    /// Bounds every fetch by `timeout`. The determiner then runs on a helper
    /// thread that is abandoned if it does not answer in time.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Ties every episode to `token`: cancelling it abandons the current
    /// episode and all later ones.
    pub fn with_cancellation(self, token: CancellationToken) -> Self {
        Self::with_root(self.determiner, self.timeout, token)
    }

    /// The token for the current episode.
    ///
    /// Cancelling it abandons this episode only; the next
    /// [`new_episode`](Self::new_episode) starts with a fresh token.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.episode_cancel
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Returns the episode snapshot, fetching it on first use.
    ///
    /// # Errors
    ///
    /// * [`PlannerError::StateUnavailable`] if the determiner fails or times out
    /// * [`PlannerError::Cancelled`] if the episode was cancelled
    pub fn current(&self) -> Result<Arc<WorldState>> {
        // Held across the fetch so concurrent callers never fetch twice.
        let mut slot = self.snapshot.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(state) = slot.as_ref() {
            return Ok(Arc::clone(state));
        }

        let cancel = self.cancellation_token();
        let state = Arc::new(self.fetch(&cancel)?);
        log::debug!("fetched world state for new episode: {}", state);
        *slot = Some(Arc::clone(&state));
        Ok(state)
    }

    /// Drops the cached snapshot and the episode token, so the next
    /// [`current`](Self::current) call fetches a fresh snapshot under a fresh
    /// token.
    pub fn new_episode(&self) {
        let mut slot = self.snapshot.lock().unwrap_or_else(|e| e.into_inner());
        *slot = None;
        let mut cancel = self
            .episode_cancel
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        *cancel = self.root_cancel.child_token();
    }

    fn fetch(&self, cancel: &CancellationToken) -> Result<WorldState> {
        if cancel.is_cancelled() {
            return Err(PlannerError::Cancelled);
        }

        let timeout = match self.timeout {
            Some(timeout) => timeout,
            None => return self.determiner.determine(),
        };

        let (tx, rx) = mpsc::channel();
        let determiner = Arc::clone(&self.determiner);
        thread::Builder::new()
            .name("world-state-fetch".to_string())
            .spawn(move || {
                // The receiver is gone if the episode was abandoned.
                let _ = tx.send(determiner.determine());
            })
            .map_err(|e| PlannerError::StateUnavailable(format!("cannot spawn fetch: {}", e)))?;

        let deadline = Instant::now() + timeout;
        loop {
            if cancel.is_cancelled() {
                return Err(PlannerError::Cancelled);
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(PlannerError::StateUnavailable(format!(
                    "determiner did not answer within {:?}",
                    timeout
                )));
            }
            match rx.recv_timeout(remaining.min(CANCEL_POLL_INTERVAL)) {
                Ok(result) => return result,
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(PlannerError::StateUnavailable(
                        "determiner exited without a snapshot".to_string(),
                    ))
                }
            }
        }
    }
}

impl fmt::Debug for WorldStateCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorldStateCache")
            .field("timeout", &self.timeout)
            .field("cancelled", &self.cancellation_token().is_cancelled())
            .finish_non_exhaustive()
    }
}
