mod common;

use std::sync::atomic::Ordering;

use alloy::primitives::U256;

use common::{account, ether, LedgerState, MemoryLedger};
use local_store::store::{ProductForm, StoreClient, StoreError, ValidationError};

fn client(state: &std::sync::Arc<LedgerState>) -> StoreClient {
    let ledger = MemoryLedger::new(state.clone(), account(0xaa));
    StoreClient::new(std::sync::Arc::new(ledger), ether("1"))
}

#[tokio::test]
async fn test_add_then_list_then_purchase() {
    let state = LedgerState::new();
    state.fund(account(0xaa), ether("10000"));
    let store = client(&state);

    assert!(store.list_products().await.unwrap().is_empty());

    let form = ProductForm::new("Bread", "Fresh loaf", "0.01", "10", "Food");
    store.add_product(&form).await.unwrap();

    let products = store.list_products().await.unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].id, U256::ZERO);
    assert_eq!(products[0].name, "Bread");
    assert_eq!(products[0].price, ether("0.01"));
    assert_eq!(products[0].quantity, U256::from(10u8));

    store.purchase_product(U256::ZERO).await.unwrap();

    let products = store.list_products().await.unwrap();
    assert_eq!(products[0].quantity, U256::from(9u8));

    // The fixed amount is paid, not the listed price.
    let balances = store.balances().await.unwrap();
    assert_eq!(balances.store, ether("1"));
    assert_eq!(balances.account, ether("9999"));
}

#[tokio::test]
async fn test_invalid_form_never_reaches_ledger() {
    let state = LedgerState::new();
    let store = client(&state);

    let form = ProductForm::new("Bread", "Fresh loaf", "0", "10", "Food");
    let err = store.add_product(&form).await.unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(ValidationError::InvalidPrice(_))
    ));

    let form = ProductForm::new("Bread", "Fresh loaf", "0.5", "ten", "Food");
    assert!(store.add_product(&form).await.is_err());

    assert_eq!(state.writes(), 0);
    assert_eq!(state.reads(), 0);
}

#[tokio::test]
async fn test_purchase_failures_are_transaction_errors() {
    let state = LedgerState::new();
    state.seed("Apple", "0.5", 0);
    let store = client(&state);

    let err = store.purchase_product(U256::ZERO).await.unwrap_err();
    assert!(matches!(err, StoreError::Transaction(ref m) if m.contains("out of stock")));

    let err = store.purchase_product(U256::from(7u8)).await.unwrap_err();
    assert!(matches!(err, StoreError::Transaction(_)));
}

#[tokio::test]
async fn test_rejection_is_reported_as_such() {
    let state = LedgerState::new();
    state.seed("Apple", "0.5", 3);
    state.reject_writes.store(true, Ordering::SeqCst);
    let store = client(&state);

    assert_eq!(
        store.purchase_product(U256::ZERO).await,
        Err(StoreError::UserRejected)
    );
    let form = ProductForm::new("Pear", "Green", "0.2", "1", "Fruit");
    assert_eq!(store.add_product(&form).await, Err(StoreError::UserRejected));

    // Nothing changed on chain.
    assert_eq!(
        store.list_products().await.unwrap()[0].quantity,
        U256::from(3u8)
    );
}

#[tokio::test]
async fn test_partial_list_is_never_returned() {
    let state = LedgerState::new();
    state.seed("Apple", "0.5", 3);
    state.seed("Pear", "0.2", 1);
    state.seed("Plum", "0.1", 7);
    *state.fail_product_index.lock().unwrap() = Some(1);
    let store = client(&state);

    assert!(matches!(
        store.list_products().await,
        Err(StoreError::Read(_))
    ));
    // Index 0 was read successfully before index 1 failed; the read stops there.
    assert_eq!(state.product_calls(), 2);

    *state.fail_product_index.lock().unwrap() = None;
    assert_eq!(store.list_products().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_read_failure_differs_from_empty_list() {
    let state = LedgerState::new();
    let store = client(&state);
    assert_eq!(store.list_products().await, Ok(Vec::new()));

    state.fail_reads.store(true, Ordering::SeqCst);
    assert!(matches!(
        store.list_products().await,
        Err(StoreError::Read(_))
    ));
    assert!(store.balances().await.is_err());
}
