//! Terminal front end: fetches the dashboard once and prints a summary.
//!
//! Configuration comes from the environment (`CAPO_API_URL`,
//! `CAPO_API_TIMEOUT_MS`, `CAPO_API_TOKEN`, `CAPO_LOG_JSON`, `RUST_LOG`).

use std::env;
use std::process::ExitCode;

use capo_dashboard::http::{ClientConfig, HttpApi};
use capo_dashboard::{CycleOutcome, DashboardState, DashboardStore, StoreStatus};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn env_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) => matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        Err(_) => default,
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if env_bool("CAPO_LOG_JSON", false) {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn render(state: &DashboardState) -> String {
    let mut out = String::new();
    out.push_str("Dashboard\n");
    out.push_str(&format!("  Total balance:      {:.2}\n", state.total_balance()));
    out.push_str(&format!("  Total accounts:     {}\n", state.account_count()));
    out.push_str(&format!("  Total transactions: {}\n", state.transaction_count()));

    out.push_str("\nAccounts\n");
    if state.accounts.is_empty() {
        out.push_str("  No accounts found\n");
    }
    for account in &state.accounts {
        out.push_str(&format!(
            "  #{:<5} {:<30} {:>12.2}\n",
            account.id, account.name, account.balance
        ));
    }

    out.push_str("\nRecent transactions\n");
    let recent = state.recent_transactions();
    if recent.is_empty() {
        out.push_str("  No transactions found\n");
    }
    for tx in recent {
        out.push_str(&format!(
            "  {:<10} {:<8} {:<30} {:>12.2}\n",
            tx.date, tx.transaction_type, tx.description, tx.amount
        ));
    }
    out
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let api = match HttpApi::new(&config) {
        Ok(api) => api,
        Err(e) => {
            eprintln!("client setup failed: {}", e);
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(base_url = api.base_url(), "loading dashboard");

    let store = DashboardStore::new(api.accounts(), api.transactions());
    let outcome = store.mount().settled().await;

    let snapshot = store.snapshot();
    match (&outcome, &snapshot.status) {
        (CycleOutcome::Ready, _) | (_, StoreStatus::Ready) => {
            print!("{}", render(&snapshot));
            ExitCode::SUCCESS
        }
        _ => {
            let message = snapshot
                .status
                .error()
                .map(str::to_string)
                .unwrap_or_else(|| format!("{:?}", outcome));
            eprintln!("Error: {}", message);
            ExitCode::FAILURE
        }
    }
}
