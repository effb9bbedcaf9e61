//! DashboardStore - accounts and transactions behind one fetch-and-settle cycle.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use super::state::{Snapshot, StateStore};
use super::status::StoreStatus;
use crate::error::ClientError;
use crate::model::{Account, Transaction};
use crate::resource::ResourceClient;

/// Number of transactions shown by [`DashboardState::recent_transactions`].
pub const RECENT_TRANSACTIONS: usize = 5;

/// Message used when a failed cycle carries no error text.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch dashboard data";

/// Everything the dashboard renders, replaced wholesale on every update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    /// Accounts in server order.
    pub accounts: Vec<Account>,
    /// Transactions in server order. Not sorted locally.
    pub transactions: Vec<Transaction>,
    pub status: StoreStatus,
}

impl DashboardState {
    /// Sum of every account balance.
    pub fn total_balance(&self) -> f64 {
        self.accounts.iter().map(|account| account.balance).sum()
    }

    /// The first five transactions in store order, or all of them if fewer.
    pub fn recent_transactions(&self) -> &[Transaction] {
        let len = self.transactions.len().min(RECENT_TRANSACTIONS);
        &self.transactions[..len]
    }

    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }
}

/// What a single `fetch_all` call did to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Both collections were replaced and the status is `Ready`.
    Ready,
    /// The status is `Error(message)`; collections were left as they were.
    Failed(String),
    /// A newer cycle started first; results were discarded.
    Superseded,
}

/// Observable store for the dashboard scene.
///
/// Construct it once at application start and pass clones to whoever needs
/// it: clones share clients and state.
///
/// ## Example
///
/// ```ignore
/// let store = DashboardStore::new(api.accounts(), api.transactions());
/// let mut updates = store.subscribe();
/// store.fetch_all().await;
/// println!("{}", updates.borrow_and_update().total_balance());
/// ```
pub struct DashboardStore<A, T> {
    accounts: Arc<A>,
    transactions: Arc<T>,
    state: StateStore<DashboardState>,
}

impl<A, T> Clone for DashboardStore<A, T> {
    fn clone(&self) -> Self {
        Self {
            accounts: Arc::clone(&self.accounts),
            transactions: Arc::clone(&self.transactions),
            state: self.state.clone(),
        }
    }
}

impl<A, T> DashboardStore<A, T>
where
    A: ResourceClient<Account> + 'static,
    T: ResourceClient<Transaction> + 'static,
{
    /// Create an empty store in the `Idle` state.
    pub fn new(accounts: A, transactions: T) -> Self {
        Self {
            accounts: Arc::new(accounts),
            transactions: Arc::new(transactions),
            state: StateStore::new(DashboardState::default()),
        }
    }

    /// Client for the accounts collection.
    ///
    /// The store does not track mutations made through it; call
    /// [`fetch_all`](Self::fetch_all) afterwards to refresh.
    pub fn accounts_client(&self) -> &A {
        &self.accounts
    }

    /// Client for the transactions collection. See [`accounts_client`](Self::accounts_client).
    pub fn transactions_client(&self) -> &T {
        &self.transactions
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> Arc<Snapshot<DashboardState>> {
        self.state.snapshot()
    }

    /// Subscribe to snapshot replacements.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Snapshot<DashboardState>>> {
        self.state.subscribe()
    }

    pub fn status(&self) -> StoreStatus {
        self.snapshot().status.clone()
    }

    pub fn accounts(&self) -> Vec<Account> {
        self.snapshot().accounts.clone()
    }

    pub fn transactions(&self) -> Vec<Transaction> {
        self.snapshot().transactions.clone()
    }

    /// Computed from the current snapshot on every call.
    pub fn total_balance(&self) -> f64 {
        self.snapshot().total_balance()
    }

    /// Computed from the current snapshot on every call.
    pub fn recent_transactions(&self) -> Vec<Transaction> {
        self.snapshot().recent_transactions().to_vec()
    }

    /// Run one fetch-and-settle cycle.
    ///
    /// Marks the store `Loading`, lists both collections concurrently and
    /// settles all-or-nothing: on success both collections are replaced and
    /// the status becomes `Ready`; the first failure settles the status to
    /// `Error` at once, dropping the call still in flight, and the previous
    /// collections stay visible. Results of a cycle overtaken by a newer call
    /// are dropped.
    pub async fn fetch_all(&self) -> CycleOutcome {
        let generation = self.begin_cycle();
        self.run_cycle(generation).await
    }

    /// Bind a view to this store: subscribe, then run exactly one cycle in
    /// the background.
    ///
    /// The store is `Loading` by the time this returns. Must be called from
    /// within a tokio runtime.
    pub fn mount(&self) -> Mount {
        let updates = self.subscribe();
        let generation = self.begin_cycle();
        let store = self.clone();
        let cycle = tokio::spawn(async move { store.run_cycle(generation).await });
        Mount {
            updates,
            cycle,
            state: self.state.clone(),
            generation,
        }
    }

    fn begin_cycle(&self) -> u64 {
        self.state.begin(|current| DashboardState {
            status: StoreStatus::Loading,
            ..current.clone()
        })
    }

    #[instrument(name = "dashboard_fetch_all", skip(self))]
    async fn run_cycle(&self, generation: u64) -> CycleOutcome {
        debug!("fetch started");

        let fetched = tokio::try_join!(self.accounts.list(), self.transactions.list());

        match fetched {
            Ok((accounts, transactions)) => {
                let account_count = accounts.len();
                let transaction_count = transactions.len();
                let applied = self.state.settle(generation, move |_| DashboardState {
                    accounts,
                    transactions,
                    status: StoreStatus::Ready,
                });
                if !applied {
                    debug!("discarding results of superseded fetch");
                    return CycleOutcome::Superseded;
                }
                info!(account_count, transaction_count, "fetch settled");
                CycleOutcome::Ready
            }
            Err(err) => {
                let message = failure_message(&err);
                if !settle_error(&self.state, generation, &message) {
                    debug!(error = %err, "discarding failure of superseded fetch");
                    return CycleOutcome::Superseded;
                }
                warn!(error = %err, "fetch failed");
                CycleOutcome::Failed(message)
            }
        }
    }
}

/// Move the store to `Error(message)` if `generation` is still current.
fn settle_error(state: &StateStore<DashboardState>, generation: u64, message: &str) -> bool {
    state.settle(generation, |current| DashboardState {
        status: StoreStatus::Error(message.to_string()),
        ..current.clone()
    })
}

fn failure_message(err: &ClientError) -> String {
    let message = err.message();
    if message.trim().is_empty() {
        FETCH_FAILED_MESSAGE.to_string()
    } else {
        message
    }
}

/// A mounted view: snapshot updates plus the single cycle started for it.
pub struct Mount {
    updates: watch::Receiver<Arc<Snapshot<DashboardState>>>,
    cycle: JoinHandle<CycleOutcome>,
    state: StateStore<DashboardState>,
    generation: u64,
}

impl Mount {
    /// Receiver notified on every snapshot replacement.
    pub fn updates(&mut self) -> &mut watch::Receiver<Arc<Snapshot<DashboardState>>> {
        &mut self.updates
    }

    /// Wait for the mount's cycle to settle.
    ///
    /// If the cycle task panicked or was cancelled, its generation is settled
    /// to `Error` here. A `Mount` dropped without awaiting this leaves such a
    /// cycle `Loading` until the next `fetch_all`.
    pub async fn settled(self) -> CycleOutcome {
        let err = match self.cycle.await {
            Ok(outcome) => return outcome,
            Err(err) => err,
        };
        let message = format!("dashboard fetch aborted: {}", err);
        if !settle_error(&self.state, self.generation, &message) {
            return CycleOutcome::Superseded;
        }
        warn!(generation = self.generation, error = %err, "fetch task aborted");
        CycleOutcome::Failed(message)
    }
}
