//! Submission pipeline tests with the real session actor and scripted
//! collaborators: a channel-mocked catalog and order log, plus a scripted
//! notifier. This isolates the orchestration itself (validation order,
//! fan-out, failure handling, the in-flight guard) from real actor state.

use std::sync::Arc;
use std::time::Duration;

use bakehouse::checkout::{self, CheckoutContext, CheckoutError, Clock};
use bakehouse::clients::CheckoutClient;
use bakehouse::mock::{self, expect_get, expect_record, MockNotifier};
use bakehouse::model::item::{ItemId, MenuItem, MenuItemSpec};
use bakehouse::model::order::{ContactUpdate, OrderId, PickupSlot, SubOrderKind};
use bakehouse::orderlog::OrderLogError;
use bakehouse::validate::FieldIssue;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tokio::sync::mpsc;

const CUSTOMER: &str = "avery@example.com";
const MAILBOX: &str = "orders@bakehouse.test";

/// Tuesday 2026-03-10 at 10:00.
fn tuesday_morning() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, 10)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap()
}

fn pinned_clock() -> Clock {
    Box::new(tuesday_morning)
}

fn march(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
}

fn at(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

fn bun() -> MenuItem {
    MenuItem::new(
        ItemId(1),
        MenuItemSpec::in_stock("Morning Bun", 3.75, "Pastries", 10),
    )
}

fn cake() -> MenuItem {
    MenuItem::new(
        ItemId(2),
        MenuItemSpec::made_to_order("Celebration Cake", 42.00, "Cakes"),
    )
}

struct Harness {
    checkout: CheckoutClient,
    catalog_rx: mpsc::Receiver<bakehouse::catalog::CatalogRequest>,
    orderlog_rx: mpsc::Receiver<bakehouse::orderlog::OrderLogRequest>,
    notifier: Arc<MockNotifier>,
}

/// Real session actor, everything around it scripted.
fn harness() -> Harness {
    let (catalog, catalog_rx) = mock::catalog_channel(8);
    let (orders, orderlog_rx) = mock::orderlog_channel(8);
    let notifier = Arc::new(MockNotifier::new());

    let (actor, checkout) = checkout::new(8, pinned_clock());
    tokio::spawn(actor.run(CheckoutContext {
        catalog,
        orders,
        notifier: notifier.clone(),
        mailbox: MAILBOX.to_string(),
    }));

    Harness {
        checkout,
        catalog_rx,
        orderlog_rx,
        notifier,
    }
}

/// Adds `item` to the cart, playing the catalog's role for the stock read.
async fn add_scripted(h: &mut Harness, item: MenuItem) {
    let client = h.checkout.clone();
    let id = item.id;
    let add_task = tokio::spawn(async move { client.add_item(id).await });

    let (asked, responder) = expect_get(&mut h.catalog_rx)
        .await
        .expect("Expected a catalog Get");
    assert_eq!(asked, id);
    responder.send(Ok(Some(item))).unwrap();

    add_task.await.unwrap().expect("Failed to add item");
}

async fn fill_contact(h: &Harness) {
    h.checkout
        .set_contact(ContactUpdate {
            name: Some("Avery Chen".to_string()),
            email: Some(CUSTOMER.to_string()),
            phone: Some("555-012-3456".to_string()),
        })
        .await
        .expect("Failed to set contact");
}

/// An empty cart is refused by validation before any collaborator is
/// touched.
#[tokio::test]
async fn test_empty_cart_is_refused_before_any_side_effect() {
    let mut h = harness();
    fill_contact(&h).await;

    let err = h.checkout.submit().await.unwrap_err();
    let CheckoutError::Invalid(report) = err else {
        panic!("expected a validation report");
    };
    assert!(report.contains(FieldIssue::EmptyCart));

    assert_eq!(h.notifier.attempts(), 0);
    assert!(h.catalog_rx.try_recv().is_err(), "no catalog traffic expected");
    assert!(h.orderlog_rx.try_recv().is_err(), "no order log traffic expected");
}

/// A made-to-order-only order renders placeholders for the in-stock half
/// and records no readiness estimate.
#[tokio::test]
async fn test_made_to_order_only_renders_placeholders() {
    let mut h = harness();
    add_scripted(&mut h, cake()).await;
    fill_contact(&h).await;
    h.checkout
        .set_pickup(SubOrderKind::MadeToOrder, PickupSlot::new(march(14), at(9, 0)))
        .await
        .expect("Saturday slot");

    let client = h.checkout.clone();
    let submit_task = tokio::spawn(async move { client.submit().await });

    let (order, responder) = expect_record(&mut h.orderlog_rx)
        .await
        .expect("Expected an order log Record");
    assert!(order.in_stock_lines.is_empty());
    assert_eq!(order.in_stock_pickup, None);
    assert_eq!(order.estimated_ready, None);
    assert_eq!(
        order.made_to_order_pickup,
        Some(PickupSlot::new(march(14), at(9, 0)))
    );
    responder.send(Ok(OrderId(1))).unwrap();

    let confirmation = submit_task.await.unwrap().expect("Failed to submit");
    assert_eq!(
        confirmation.summary,
        "made-to-order items ready Saturday, March 14 at 9:00 AM"
    );

    let sent = h.notifier.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].fields.in_stock_items, "None");
    assert_eq!(sent[0].fields.in_stock_pickup, "Not applicable");
    assert_eq!(
        sent[0].fields.made_to_order_items,
        "Celebration Cake x1 - $42.00"
    );
}

/// If the customer copy bounces, nothing is recorded and the session keeps
/// its state.
#[tokio::test]
async fn test_customer_send_failure_records_nothing() {
    let mut h = harness();
    add_scripted(&mut h, bun()).await;
    fill_contact(&h).await;
    h.checkout
        .set_pickup(SubOrderKind::InStock, PickupSlot::new(march(12), at(12, 0)))
        .await
        .expect("slot");

    h.notifier.fail_recipient(CUSTOMER);
    let err = h.checkout.submit().await.unwrap_err();
    assert!(matches!(err, CheckoutError::SubmissionFailed(_)));

    let attempted: Vec<String> = h
        .notifier
        .sent()
        .iter()
        .map(|m| m.recipient.clone())
        .collect();
    assert!(attempted.contains(&CUSTOMER.to_string()));
    assert!(h.orderlog_rx.try_recv().is_err(), "nothing may be recorded");

    let summary = h.checkout.partition().await.expect("partition");
    assert_eq!(summary.in_stock.len(), 1, "cart preserved for retry");
}

/// The bakery copy failing behaves the same way as the customer copy.
#[tokio::test]
async fn test_bakery_send_failure_records_nothing() {
    let mut h = harness();
    add_scripted(&mut h, bun()).await;
    fill_contact(&h).await;
    h.checkout
        .set_pickup(SubOrderKind::InStock, PickupSlot::new(march(12), at(12, 0)))
        .await
        .expect("slot");

    h.notifier.fail_recipient(MAILBOX);
    let err = h.checkout.submit().await.unwrap_err();
    assert!(matches!(err, CheckoutError::SubmissionFailed(_)));
    assert!(h.orderlog_rx.try_recv().is_err());

    let summary = h.checkout.partition().await.expect("partition");
    assert_eq!(summary.in_stock.len(), 1);
}

/// A refused order log write fails the submission after the sends, and a
/// retry runs the whole pipeline again.
#[tokio::test]
async fn test_log_write_failure_is_recoverable() {
    let mut h = harness();
    add_scripted(&mut h, bun()).await;
    fill_contact(&h).await;
    h.checkout
        .set_pickup(SubOrderKind::InStock, PickupSlot::new(march(12), at(12, 0)))
        .await
        .expect("slot");

    // First attempt: the log refuses the write
    let client = h.checkout.clone();
    let submit_task = tokio::spawn(async move { client.submit().await });
    let (_order, responder) = expect_record(&mut h.orderlog_rx)
        .await
        .expect("Expected an order log Record");
    responder
        .send(Err(OrderLogError::ActorCommunication(
            "log write refused".to_string(),
        )))
        .unwrap();

    let err = submit_task.await.unwrap().unwrap_err();
    assert!(matches!(err, CheckoutError::SubmissionFailed(_)));
    assert_eq!(h.notifier.attempts(), 2);

    let summary = h.checkout.partition().await.expect("partition");
    assert_eq!(summary.in_stock.len(), 1, "cart preserved for retry");

    // Second attempt: everything cooperates
    let client = h.checkout.clone();
    let submit_task = tokio::spawn(async move { client.submit().await });
    let (order, responder) = expect_record(&mut h.orderlog_rx)
        .await
        .expect("Expected a second Record");
    assert_eq!(order.in_stock_lines.len(), 1);
    responder.send(Ok(OrderId(7))).unwrap();

    let confirmation = submit_task.await.unwrap().expect("retry succeeds");
    assert_eq!(confirmation.order_id, OrderId(7));
    assert_eq!(h.notifier.attempts(), 4, "the retry sends fresh copies");

    let after = h.checkout.partition().await.expect("partition");
    assert!(after.is_empty(), "success clears the session");
}

/// While a submission is in flight the mailbox stays responsive, but a
/// second submit is refused until the first resolves.
#[tokio::test]
async fn test_one_submission_at_a_time() {
    let mut h = harness();
    add_scripted(&mut h, bun()).await;
    fill_contact(&h).await;
    h.checkout
        .set_pickup(SubOrderKind::InStock, PickupSlot::new(march(12), at(12, 0)))
        .await
        .expect("slot");

    // Hold both confirmation sends open mid-flight
    let gate = h.notifier.hold_sends();
    let client = h.checkout.clone();
    let first_submit = tokio::spawn(async move { client.submit().await });

    while h.notifier.attempts() < 2 {
        tokio::time::sleep(Duration::from_millis(2)).await;
    }

    // The actor is not blocked by its own submission
    let summary = h.checkout.partition().await.expect("partition");
    assert_eq!(summary.in_stock.len(), 1);

    // But a concurrent submit is refused outright
    let err = h.checkout.submit().await.unwrap_err();
    assert_eq!(err, CheckoutError::SubmissionInFlight);

    // Release the sends; the first submission completes normally
    gate.add_permits(2);
    let (_order, responder) = expect_record(&mut h.orderlog_rx)
        .await
        .expect("Expected an order log Record");
    responder.send(Ok(OrderId(1))).unwrap();

    let confirmation = first_submit.await.unwrap().expect("first submit");
    assert_eq!(confirmation.order_id, OrderId(1));

    let after = h.checkout.partition().await.expect("partition");
    assert!(after.is_empty());

    // With the session idle again, a new cycle may start
    add_scripted(&mut h, bun()).await;
    let summary = h.checkout.partition().await.expect("partition");
    assert_eq!(summary.in_stock.len(), 1);
}

/// An unknown item id is refused using the catalog's answer.
#[tokio::test]
async fn test_unknown_items_cannot_be_carted() {
    let mut h = harness();

    let client = h.checkout.clone();
    let add_task = tokio::spawn(async move { client.add_item(ItemId(404)).await });

    let (asked, responder) = expect_get(&mut h.catalog_rx)
        .await
        .expect("Expected a catalog Get");
    assert_eq!(asked, ItemId(404));
    responder.send(Ok(None)).unwrap();

    let err = add_task.await.unwrap().unwrap_err();
    assert_eq!(err, CheckoutError::UnknownItem(ItemId(404)));
}
