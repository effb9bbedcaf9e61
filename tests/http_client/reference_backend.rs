//! Full round trips through the in-memory reference backend.

use capo_dashboard::http::{ClientConfig, HttpApi};
use capo_dashboard::server::{self, Backend};
use capo_dashboard::{
    Categorization, CategoryClient, ClientError, CreateAccount, CreateTransaction, CycleOutcome,
    DashboardStore, ResourceClient, StoreStatus, TransactionQueries, UpdateTransaction,
    DEFAULT_LIST_LIMIT,
};

async fn start(backend: Backend) -> HttpApi {
    let app = server::router(backend);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    HttpApi::new(&ClientConfig::new(format!("http://{addr}"))).unwrap()
}

fn deposit(account_id: i64, amount: f64, date: &str) -> CreateTransaction {
    CreateTransaction {
        account_id,
        transaction_type: "CREDIT".into(),
        amount,
        description: format!("Deposit {}", date),
        date: date.into(),
    }
}

fn purchase(description: &str, date: &str) -> CreateTransaction {
    CreateTransaction {
        account_id: 1,
        transaction_type: "DEBIT".into(),
        amount: -15.0,
        description: description.into(),
        date: date.into(),
    }
}

#[tokio::test]
async fn crud_round_trip() {
    let api = start(Backend::new()).await;
    let accounts = api.accounts();

    let created = accounts
        .create(CreateAccount::new("Checking").with_balance(500.0))
        .await
        .unwrap();
    assert_eq!(created.id, 1);
    assert!(!created.created_at.is_empty());

    assert_eq!(accounts.get(created.id).await.unwrap(), created);
    assert_eq!(accounts.list().await.unwrap(), vec![created.clone()]);

    accounts.delete(created.id).await.unwrap();
    assert!(matches!(
        accounts.get(created.id).await,
        Err(ClientError::NotFound { .. })
    ));
    assert!(accounts.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn partial_update_keeps_other_fields() {
    let api = start(Backend::new()).await;
    let transactions = api.transactions();
    let created = transactions.create(deposit(1, 20.0, "2024-05-01")).await.unwrap();

    let patch = UpdateTransaction {
        description: Some("Paycheck".into()),
        ..Default::default()
    };
    let updated = transactions.update(created.id, patch).await.unwrap();

    assert_eq!(updated.description, "Paycheck");
    assert_eq!(updated.amount, 20.0);
    assert_eq!(updated.date, "2024-05-01");
    assert_eq!(updated.created_at, created.created_at);
}

#[tokio::test]
async fn invalid_payload_is_rejected() {
    let api = start(Backend::new()).await;

    let err = api.accounts().create(CreateAccount::new("")).await.unwrap_err();

    assert!(matches!(err, ClientError::Validation(_)));
}

#[tokio::test]
async fn dashboard_loads_from_backend() {
    let backend = Backend::new();
    backend
        .accounts
        .insert(CreateAccount::new("Checking").with_balance(100.0))
        .unwrap();
    backend
        .accounts
        .insert(CreateAccount::new("Savings").with_balance(250.5))
        .unwrap();
    for day in 1..=7 {
        backend
            .transactions
            .insert(deposit(1, day as f64, &format!("2024-06-{:02}", day)))
            .unwrap();
    }
    let api = start(backend).await;
    let store = DashboardStore::new(api.accounts(), api.transactions());

    assert_eq!(store.mount().settled().await, CycleOutcome::Ready);

    let snapshot = store.snapshot();
    assert_eq!(snapshot.status, StoreStatus::Ready);
    assert_eq!(snapshot.account_count(), 2);
    assert_eq!(snapshot.total_balance(), 350.5);
    let recent: Vec<&str> = snapshot
        .recent_transactions()
        .iter()
        .map(|tx| tx.date.as_str())
        .collect();
    assert_eq!(
        recent,
        vec!["2024-06-01", "2024-06-02", "2024-06-03", "2024-06-04", "2024-06-05"]
    );
}

#[tokio::test]
async fn categorized_transaction_leaves_the_uncategorized_list() {
    let backend = Backend::new();
    for (description, date) in [
        ("Coffee", "2024-04-01"),
        ("Bakery", "2024-04-03"),
        ("Cinema", "2024-04-02"),
    ] {
        backend.transactions.insert(purchase(description, date)).unwrap();
    }
    let api = start(backend).await;
    let transactions = api.transactions();

    let pending: Vec<String> = transactions
        .uncategorized()
        .await
        .unwrap()
        .into_iter()
        .map(|tx| tx.description)
        .collect();
    assert_eq!(pending, vec!["Bakery", "Cinema", "Coffee"]);

    let updated = transactions
        .categorize(1, Categorization::category(4).with_notes("morning"))
        .await
        .unwrap();
    assert_eq!(updated.category_id, Some(4));
    assert_eq!(updated.notes.as_deref(), Some("morning"));
    assert_eq!(updated.description, "Coffee");

    let pending = transactions.uncategorized().await.unwrap();
    assert_eq!(pending.len(), 2);
    assert_eq!(transactions.get(1).await.unwrap().category_id, Some(4));
}

#[tokio::test]
async fn categorize_unknown_transaction_is_not_found() {
    let api = start(Backend::new()).await;

    let err = api
        .transactions()
        .categorize(9, Categorization::category(1))
        .await
        .unwrap_err();

    assert_eq!(err, ClientError::not_found("transactions", 9));
}

#[tokio::test]
async fn search_matches_descriptions_ignoring_case() {
    let backend = Backend::new();
    backend.transactions.insert(purchase("Uber to airport", "2024-04-01")).unwrap();
    backend.transactions.insert(purchase("Groceries", "2024-04-02")).unwrap();
    backend.transactions.insert(purchase("UBER EATS", "2024-04-03")).unwrap();
    let api = start(backend).await;

    let found: Vec<String> = api
        .transactions()
        .search("uber")
        .await
        .unwrap()
        .into_iter()
        .map(|tx| tx.description)
        .collect();

    assert_eq!(found, vec!["UBER EATS", "Uber to airport"]);
    assert!(api.transactions().search("rent").await.unwrap().is_empty());
}

#[tokio::test]
async fn search_without_query_is_bad_request() {
    let api = start(Backend::new()).await;

    let response = reqwest::get(format!("{}/transactions/search", api.base_url()))
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn listing_is_capped_unless_a_limit_is_given() {
    let backend = Backend::new();
    for day in 0..(DEFAULT_LIST_LIMIT + 5) {
        backend
            .transactions
            .insert(deposit(1, 1.0, &format!("2024-07-{:02}", day % 28 + 1)))
            .unwrap();
    }
    let api = start(backend).await;
    let transactions = api.transactions();

    assert_eq!(transactions.list().await.unwrap().len(), DEFAULT_LIST_LIMIT);
    assert_eq!(transactions.list_limited(3).await.unwrap().len(), 3);
    assert_eq!(transactions.list_limited(500).await.unwrap().len(), DEFAULT_LIST_LIMIT + 5);
}

#[tokio::test]
async fn categories_are_served_read_only() {
    let backend = Backend::new();
    let food = backend.categories.add_category("Food", "EXPENSE").unwrap();
    let salary = backend.categories.add_category("Salary", "INCOME").unwrap();
    backend.categories.add_subcategory(food.id, "Groceries").unwrap();
    backend.categories.add_subcategory(salary.id, "Bonus").unwrap();
    let api = start(backend).await;
    let catalog = api.categories();

    assert_eq!(catalog.categories().await.unwrap(), vec![food.clone(), salary]);
    assert_eq!(catalog.subcategories().await.unwrap().len(), 2);

    let groceries = catalog.subcategories_of(food.id).await.unwrap();
    assert_eq!(groceries.len(), 1);
    assert_eq!(groceries[0].category_name.as_deref(), Some("Food"));
    assert!(catalog.subcategories_of(42).await.unwrap().is_empty());
}
