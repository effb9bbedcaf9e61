//! Stores - observable state fed by resource clients.
//!
//! [`StateStore`] is the generic container: one immutable snapshot, replaced
//! wholesale, broadcast over a watch channel and stamped with a generation
//! so that superseded cycles cannot overwrite fresher state.
//! [`DashboardStore`] builds the dashboard scene on top of it.

mod dashboard;
mod state;
mod status;

pub use dashboard::{
    CycleOutcome, DashboardState, DashboardStore, Mount, FETCH_FAILED_MESSAGE, RECENT_TRANSACTIONS,
};
pub use state::{Snapshot, StateStore};
pub use status::StoreStatus;
