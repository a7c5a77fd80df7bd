//! Integration tests for the orders vertical slice
//!
//! Exercises order creation, the status transition graph, the stale-pending
//! sweep, and the cancelled-order purge.

mod test_helpers;

use aria_core::types::{OrderItem, OrderStatus, Role};
use aria_storage::StorageError;
use test_helpers::*;

#[tokio::test]
async fn create_order_persists_items() {
    let db = TestDb::new().await;
    let user = create_test_user(db.pool(), "buyer@example.com", Role::User).await;
    let first = create_test_album(db.pool(), "Boards of Canada", "Geogaddi", 1299).await;
    let second = create_test_album(db.pool(), "Boards of Canada", "MHTRTC", 1199).await;

    let items = vec![
        OrderItem {
            album_id: first,
            quantity: 1,
        },
        OrderItem {
            album_id: second,
            quantity: 2,
        },
    ];

    let order = aria_storage::orders::create(db.pool(), user, &items, 3697, 0.1, 4067)
        .await
        .unwrap();

    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.user_id, user);
    assert_eq!(order.subtotal_cents, 3697);
    assert_eq!(order.total_cents, 4067);
    assert_eq!(order.order_items.len(), 2);
    assert!(order.payment_intent_id.is_none());
}

#[tokio::test]
async fn create_order_rejects_empty_items() {
    let db = TestDb::new().await;
    let user = create_test_user(db.pool(), "buyer@example.com", Role::User).await;

    let err = aria_storage::orders::create(db.pool(), user, &[], 0, 0.0, 0)
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::InvalidInput(_)));
}

#[tokio::test]
async fn legal_transitions_are_applied() {
    let db = TestDb::new().await;
    let user = create_test_user(db.pool(), "buyer@example.com", Role::User).await;
    let album = create_test_album(db.pool(), "Four Tet", "Rounds", 999).await;
    let items = vec![OrderItem {
        album_id: album,
        quantity: 1,
    }];

    let order = aria_storage::orders::create(db.pool(), user, &items, 999, 0.0, 999)
        .await
        .unwrap();

    let order =
        aria_storage::orders::update_status(db.pool(), order.id, OrderStatus::PaymentSuccessful)
            .await
            .unwrap();
    assert_eq!(order.status, OrderStatus::PaymentSuccessful);

    let order = aria_storage::orders::update_status(db.pool(), order.id, OrderStatus::Complete)
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::Complete);
}

#[tokio::test]
async fn failed_payment_can_be_retried() {
    let db = TestDb::new().await;
    let user = create_test_user(db.pool(), "buyer@example.com", Role::User).await;
    let album = create_test_album(db.pool(), "Caribou", "Swim", 999).await;
    let items = vec![OrderItem {
        album_id: album,
        quantity: 1,
    }];

    let order = aria_storage::orders::create(db.pool(), user, &items, 999, 0.0, 999)
        .await
        .unwrap();

    aria_storage::orders::update_status(db.pool(), order.id, OrderStatus::PaymentFailed)
        .await
        .unwrap();
    let order = aria_storage::orders::update_status(db.pool(), order.id, OrderStatus::Pending)
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
}

#[tokio::test]
async fn illegal_transitions_are_rejected() {
    let db = TestDb::new().await;
    let user = create_test_user(db.pool(), "buyer@example.com", Role::User).await;
    let album = create_test_album(db.pool(), "Bonobo", "Black Sands", 999).await;
    let items = vec![OrderItem {
        album_id: album,
        quantity: 1,
    }];

    let order = aria_storage::orders::create(db.pool(), user, &items, 999, 0.0, 999)
        .await
        .unwrap();

    // pending cannot jump straight to complete
    let err = aria_storage::orders::update_status(db.pool(), order.id, OrderStatus::Complete)
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::InvalidInput(_)));

    // cancelled is terminal
    aria_storage::orders::update_status(db.pool(), order.id, OrderStatus::Cancelled)
        .await
        .unwrap();
    let err = aria_storage::orders::update_status(db.pool(), order.id, OrderStatus::Pending)
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::InvalidInput(_)));

    // and the stored status is untouched
    let order = aria_storage::orders::get(db.pool(), order.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(order.status, OrderStatus::Cancelled);
}

#[tokio::test]
async fn transition_on_missing_order_is_not_found() {
    let db = TestDb::new().await;
    let err = aria_storage::orders::update_status(db.pool(), 4242, OrderStatus::Cancelled)
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::NotFound { .. }));
}

#[tokio::test]
async fn cancel_stale_only_touches_old_pending_orders() {
    let db = TestDb::new().await;
    let user = create_test_user(db.pool(), "buyer@example.com", Role::User).await;
    let album = create_test_album(db.pool(), "Moderat", "II", 999).await;
    let items = vec![OrderItem {
        album_id: album,
        quantity: 1,
    }];

    let stale_pending = aria_storage::orders::create(db.pool(), user, &items, 999, 0.0, 999)
        .await
        .unwrap();
    let fresh_pending = aria_storage::orders::create(db.pool(), user, &items, 999, 0.0, 999)
        .await
        .unwrap();
    let stale_paid = aria_storage::orders::create(db.pool(), user, &items, 999, 0.0, 999)
        .await
        .unwrap();
    aria_storage::orders::update_status(db.pool(), stale_paid.id, OrderStatus::PaymentSuccessful)
        .await
        .unwrap();

    // Backdate two of them past a one-hour window
    let old = aria_storage::now_ts() - 7200;
    aria_storage::orders::set_created_at(db.pool(), stale_pending.id, old)
        .await
        .unwrap();
    aria_storage::orders::set_created_at(db.pool(), stale_paid.id, old)
        .await
        .unwrap();

    let cancelled = aria_storage::orders::cancel_stale(db.pool(), 3600).await.unwrap();
    assert_eq!(cancelled, vec![(stale_pending.id, user)]);

    let order = aria_storage::orders::get(db.pool(), stale_pending.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(order.status, OrderStatus::Cancelled);

    let order = aria_storage::orders::get(db.pool(), fresh_pending.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(order.status, OrderStatus::Pending);

    let order = aria_storage::orders::get(db.pool(), stale_paid.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(order.status, OrderStatus::PaymentSuccessful);
}

#[tokio::test]
async fn purge_removes_old_cancelled_orders_and_items() {
    let db = TestDb::new().await;
    let user = create_test_user(db.pool(), "buyer@example.com", Role::User).await;
    let album = create_test_album(db.pool(), "Jon Hopkins", "Immunity", 999).await;
    let items = vec![OrderItem {
        album_id: album,
        quantity: 1,
    }];

    let order = aria_storage::orders::create(db.pool(), user, &items, 999, 0.0, 999)
        .await
        .unwrap();
    aria_storage::orders::update_status(db.pool(), order.id, OrderStatus::Cancelled)
        .await
        .unwrap();
    aria_storage::orders::set_created_at(db.pool(), order.id, aria_storage::now_ts() - 100_000)
        .await
        .unwrap();

    let removed = aria_storage::orders::purge_cancelled(db.pool(), 86_400).await.unwrap();
    assert_eq!(removed, 1);
    assert!(aria_storage::orders::get(db.pool(), order.id)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn orders_are_listed_per_user() {
    let db = TestDb::new().await;
    let alice = create_test_user(db.pool(), "alice@example.com", Role::User).await;
    let bob = create_test_user(db.pool(), "bob@example.com", Role::User).await;
    let album = create_test_album(db.pool(), "Floating Points", "Crush", 999).await;
    let items = vec![OrderItem {
        album_id: album,
        quantity: 1,
    }];

    aria_storage::orders::create(db.pool(), alice, &items, 999, 0.0, 999)
        .await
        .unwrap();
    aria_storage::orders::create(db.pool(), alice, &items, 999, 0.0, 999)
        .await
        .unwrap();
    aria_storage::orders::create(db.pool(), bob, &items, 999, 0.0, 999)
        .await
        .unwrap();

    assert_eq!(
        aria_storage::orders::get_for_user(db.pool(), alice)
            .await
            .unwrap()
            .len(),
        2
    );
    assert_eq!(aria_storage::orders::get_all(db.pool()).await.unwrap().len(), 3);
}

#[tokio::test]
async fn payment_intent_id_round_trips() {
    let db = TestDb::new().await;
    let user = create_test_user(db.pool(), "buyer@example.com", Role::User).await;
    let album = create_test_album(db.pool(), "Tycho", "Dive", 999).await;
    let items = vec![OrderItem {
        album_id: album,
        quantity: 1,
    }];

    let order = aria_storage::orders::create(db.pool(), user, &items, 999, 0.0, 999)
        .await
        .unwrap();
    aria_storage::orders::set_payment_intent(db.pool(), order.id, "pi_123")
        .await
        .unwrap();

    let order = aria_storage::orders::get(db.pool(), order.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(order.payment_intent_id.as_deref(), Some("pi_123"));
}
