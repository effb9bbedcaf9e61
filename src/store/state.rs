//! StateStore - explicit state container with wholesale snapshot replacement.

use std::ops::Deref;
use std::sync::Arc;

use tokio::sync::watch;

/// An immutable state value stamped with the generation that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<S> {
    generation: u64,
    state: S,
}

impl<S> Snapshot<S> {
    /// Generation of the newest cycle started against this store.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn state(&self) -> &S {
        &self.state
    }
}

impl<S> Deref for Snapshot<S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.state
    }
}

/// Thread-safe container holding one `Arc<Snapshot<S>>`.
///
/// Every write replaces the whole snapshot under the channel lock, so readers
/// and subscribers only ever observe complete states. Each cycle claims a
/// generation with [`begin`](Self::begin); [`settle`](Self::settle) applies
/// only while that generation is still the newest.
///
/// Clone-friendly: clones share the same channel.
#[derive(Debug)]
pub struct StateStore<S> {
    tx: Arc<watch::Sender<Arc<Snapshot<S>>>>,
}

impl<S> Clone for StateStore<S> {
    fn clone(&self) -> Self {
        Self {
            tx: Arc::clone(&self.tx),
        }
    }
}

impl<S: Send + Sync + 'static> StateStore<S> {
    /// Create a store at generation 0.
    pub fn new(initial: S) -> Self {
        let (tx, _rx) = watch::channel(Arc::new(Snapshot {
            generation: 0,
            state: initial,
        }));
        Self { tx: Arc::new(tx) }
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> Arc<Snapshot<S>> {
        self.tx.borrow().clone()
    }

    /// Subscribe to snapshot replacements.
    ///
    /// The receiver starts with the current snapshot marked as seen.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Snapshot<S>>> {
        self.tx.subscribe()
    }

    /// Start a new generation and replace the state with `f(current)`.
    ///
    /// Returns the generation the caller must present to `settle`.
    pub fn begin<F>(&self, f: F) -> u64
    where
        F: FnOnce(&S) -> S,
    {
        let mut generation = 0;
        self.tx.send_modify(|current| {
            generation = current.generation + 1;
            *current = Arc::new(Snapshot {
                generation,
                state: f(&current.state),
            });
        });
        generation
    }

    /// Replace the state with `f(current)` if `generation` is still the newest.
    ///
    /// Returns `false`, leaving state and subscribers untouched, when a newer
    /// cycle has begun since.
    pub fn settle<F>(&self, generation: u64, f: F) -> bool
    where
        F: FnOnce(&S) -> S,
    {
        self.tx.send_if_modified(|current| {
            if current.generation != generation {
                return false;
            }
            *current = Arc::new(Snapshot {
                generation,
                state: f(&current.state),
            });
            true
        })
    }
}
