//! HTTP client integration tests.
//!
//! Starts axum servers on ephemeral ports and drives them through
//! `HttpResourceClient`.

#![cfg(feature = "http")]


#[cfg(feature = "server")]
mod reference_backend;

use std::time::Duration;

use capo_dashboard::http::{ClientConfig, HttpApi};
use capo_dashboard::{
    Account, Categorization, CategoryClient, ClientError, CreateAccount, CycleOutcome,
    DashboardStore, ResourceClient, StoreStatus, TransactionQueries, UpdateAccount,
};
use serde_json::json;

use stub::{Recorded, MISSING_ID};

async fn api(recorded: &Recorded) -> HttpApi {
    let base = stub::start(recorded.clone()).await;
    HttpApi::new(&ClientConfig::new(base)).unwrap()
}

#[tokio::test]
async fn list_decodes_camel_case_records() {
    let api = api(&Recorded::default()).await;

    let accounts = api.accounts().list().await.unwrap();

    assert_eq!(accounts.len(), 2);
    assert_eq!(
        accounts[0],
        Account {
            id: 1,
            name: "Savings".into(),
            balance: 1250.75,
            created_at: "2024-03-01T10:00:00.000Z".into(),
        }
    );
}

#[tokio::test]
async fn get_by_id_returns_one_record() {
    let api = api(&Recorded::default()).await;

    let account = api.accounts().get(7).await.unwrap();

    assert_eq!(account.id, 7);
}

#[tokio::test]
async fn missing_record_is_not_found() {
    let api = api(&Recorded::default()).await;

    let err = api.accounts().get(MISSING_ID).await.unwrap_err();

    assert_eq!(
        err,
        ClientError::NotFound {
            collection: "accounts".into(),
            id: MISSING_ID,
        }
    );
}

#[tokio::test]
async fn create_posts_payload_and_returns_record() {
    let recorded = Recorded::default();
    let api = api(&recorded).await;

    let created = api
        .accounts()
        .create(CreateAccount::new("Travel").with_balance(80.0))
        .await
        .unwrap();

    assert_eq!(created.id, 3);
    assert_eq!(created.name, "Travel");
    assert_eq!(created.balance, 80.0);
    assert_eq!(recorded.bodies(), vec![json!({ "name": "Travel", "balance": 80.0 })]);
}

#[tokio::test]
async fn create_omits_missing_balance() {
    let recorded = Recorded::default();
    let api = api(&recorded).await;

    let created = api.accounts().create(CreateAccount::new("Cash")).await.unwrap();

    assert_eq!(created.balance, 0.0);
    assert_eq!(recorded.bodies(), vec![json!({ "name": "Cash" })]);
}

#[tokio::test]
async fn rejected_payload_is_validation_error() {
    let api = api(&Recorded::default()).await;

    let err = api.accounts().create(CreateAccount::new("  ")).await.unwrap_err();

    assert_eq!(err, ClientError::Validation("Name is required".into()));
}

#[tokio::test]
async fn update_sends_only_provided_fields() {
    let recorded = Recorded::default();
    let api = api(&recorded).await;
    let patch = UpdateAccount {
        balance: Some(10.5),
        ..Default::default()
    };

    let updated = api.accounts().update(5, patch).await.unwrap();

    assert_eq!(updated.id, 5);
    assert_eq!(updated.name, "Savings");
    assert_eq!(updated.balance, 10.5);
    assert_eq!(recorded.bodies(), vec![json!({ "balance": 10.5 })]);
}

#[tokio::test]
async fn update_of_missing_record_is_not_found() {
    let api = api(&Recorded::default()).await;

    let err = api
        .accounts()
        .update(MISSING_ID, UpdateAccount::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::NotFound { id: MISSING_ID, .. }));
}

#[tokio::test]
async fn delete_accepts_empty_response() {
    let api = api(&Recorded::default()).await;

    api.accounts().delete(2).await.unwrap();

    let err = api.accounts().delete(MISSING_ID).await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound { .. }));
}

#[tokio::test]
async fn server_error_is_transport_error() {
    let api = api(&Recorded::default()).await;

    let err = api.transactions().list().await.unwrap_err();

    match err {
        ClientError::Transport(message) => {
            assert!(message.contains("500"), "{message}");
            assert!(message.contains("database unavailable"), "{message}");
        }
        other => panic!("expected transport error, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_server_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let config =
        ClientConfig::new(format!("http://{addr}/api")).with_timeout(Duration::from_secs(2));
    let api = HttpApi::new(&config).unwrap();

    let err = api.accounts().list().await.unwrap_err();

    assert!(matches!(err, ClientError::Transport(_)));
}

#[tokio::test]
async fn bearer_token_is_sent_with_every_request() {
    let recorded = Recorded::default();
    let base = stub::start(recorded.clone()).await;
    let api = HttpApi::new(&ClientConfig::new(base).with_bearer_token("s3cret")).unwrap();

    api.accounts().list().await.unwrap();
    api.accounts().list().await.unwrap();

    assert_eq!(
        recorded.authorization(),
        vec![Some("Bearer s3cret".to_string()), Some("Bearer s3cret".to_string())]
    );
}

#[tokio::test]
async fn no_token_sends_no_authorization() {
    let recorded = Recorded::default();
    let api = api(&recorded).await;

    api.accounts().list().await.unwrap();

    assert_eq!(recorded.authorization(), vec![None]);
}

#[tokio::test]
async fn dashboard_reports_first_failure_over_http() {
    let api = api(&Recorded::default()).await;
    let store = DashboardStore::new(api.accounts(), api.transactions());

    let outcome = store.fetch_all().await;

    assert!(matches!(outcome, CycleOutcome::Failed(ref m) if m.contains("database unavailable")));
    assert!(matches!(store.status(), StoreStatus::Error(_)));
    assert!(store.accounts().is_empty());
}

#[tokio::test]
async fn list_limited_sends_the_limit() {
    let recorded = Recorded::default();
    let api = api(&recorded).await;

    let page = api.transactions().list_limited(25).await.unwrap();

    assert_eq!(page.len(), 1);
    assert_eq!(page[0].transaction_type, "DEBIT");
    assert_eq!(recorded.queries()[0]["limit"], "25");
}

#[tokio::test]
async fn search_sends_the_query_text() {
    let recorded = Recorded::default();
    let api = api(&recorded).await;

    let found = api.transactions().search("uber eats").await.unwrap();

    assert_eq!(found[0].id, 2);
    assert_eq!(recorded.queries()[0]["q"], "uber eats");
}

#[tokio::test]
async fn uncategorized_reads_its_own_route() {
    let api = api(&Recorded::default()).await;

    let pending = api.transactions().uncategorized().await.unwrap();

    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, 3);
    assert!(pending[0].is_uncategorized());
}

#[tokio::test]
async fn categorize_patches_only_provided_fields() {
    let recorded = Recorded::default();
    let api = api(&recorded).await;

    let updated = api
        .transactions()
        .categorize(8, Categorization::category(1).with_subcategory(3))
        .await
        .unwrap();

    assert_eq!(updated.id, 8);
    assert_eq!(updated.category_id, Some(1));
    assert_eq!(updated.subcategory_id, Some(3));
    assert_eq!(updated.notes, None);
    assert_eq!(recorded.bodies(), vec![json!({ "categoryId": 1, "subcategoryId": 3 })]);
}

#[tokio::test]
async fn categorize_missing_transaction_is_not_found() {
    let api = api(&Recorded::default()).await;

    let err = api
        .transactions()
        .categorize(MISSING_ID, Categorization::default().with_notes("lunch"))
        .await
        .unwrap_err();

    assert_eq!(err, ClientError::not_found("transactions", MISSING_ID));
}

#[tokio::test]
async fn categories_are_listed_with_their_type() {
    let api = api(&Recorded::default()).await;

    let categories = api.categories().categories().await.unwrap();

    assert_eq!(categories.len(), 2);
    assert_eq!(categories[0].name, "Food");
    assert_eq!(categories[0].description.as_deref(), Some("Eating in and out"));
    assert_eq!(categories[1].category_type, "INCOME");
}

#[tokio::test]
async fn subcategories_are_listed_overall_and_per_category() {
    let api = api(&Recorded::default()).await;
    let catalog = api.categories();

    assert_eq!(catalog.subcategories().await.unwrap().len(), 3);

    let food: Vec<String> = catalog
        .subcategories_of(1)
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(food, vec!["Groceries", "Restaurants"]);
}
