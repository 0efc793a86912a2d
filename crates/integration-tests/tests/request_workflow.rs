//! End-to-end request lifecycle: draft, cart edits, submission, and the
//! four workflow queues through to confirmation.

#![allow(clippy::unwrap_used)]

use almacen_core::{CompanyCode, ItemId, Quantity, RequestStatus, WarehouseCode};
use almacen_integration_tests::TestContext;
use almacen_web::store::{HeaderUpdate, StoreError};

#[tokio::test]
async fn draft_to_confirmed() {
    let ctx = TestContext::new();
    let code = ctx
        .store
        .create_draft(CompanyCode::new("CPL"), "RCHAVARRIA")
        .await;

    // Fill the header the way the form would.
    ctx.store
        .update_header(
            code,
            HeaderUpdate {
                company: CompanyCode::new("CPL"),
                origin_warehouse: Some(WarehouseCode::new("ALM001")),
                destination_warehouse: Some(WarehouseCode::new("ALM004")),
                project: Some("54354".to_string()),
                work_order: None,
                observations: String::new(),
            },
        )
        .await
        .unwrap();

    // Select the composite article and scale it up.
    let entry = ctx.catalog.get(&ItemId::new("2")).unwrap();
    ctx.store
        .add_item(code, entry.to_line_item(Quantity::ONE))
        .await
        .unwrap();
    ctx.store
        .update_quantity(code, &ItemId::new("2"), 3, None)
        .await
        .unwrap();

    let request = ctx.store.get(code).await.unwrap();
    assert_eq!(request.cart.total_quantity(), 60, "14*3 + 6*3");

    // Submit and walk every queue in order.
    ctx.store.submit(code).await.unwrap();
    for stage in [
        RequestStatus::PendingApproval,
        RequestStatus::Approved,
        RequestStatus::Prepared,
        RequestStatus::Delivered,
    ] {
        ctx.store.advance(code, stage).await.unwrap();
    }

    let request = ctx.store.get(code).await.unwrap();
    assert_eq!(request.status, RequestStatus::Confirmed);
    assert!(request.status.is_terminal());

    // Confirmed requests cannot move again.
    let result = ctx.store.advance(code, RequestStatus::Confirmed).await;
    assert!(matches!(result, Err(StoreError::Workflow(_))));
}

#[tokio::test]
async fn submitted_requests_leave_the_draft_behind() {
    let ctx = TestContext::new();
    let code = ctx
        .store
        .create_draft(CompanyCode::new("CPL"), "RCHAVARRIA")
        .await;

    let entry = ctx.catalog.get(&ItemId::new("1")).unwrap();
    ctx.store
        .add_item(code, entry.to_line_item(Quantity::clamp(2)))
        .await
        .unwrap();
    ctx.store.submit(code).await.unwrap();

    // The request is now queued for approval and frozen for editing.
    assert_eq!(
        ctx.store.count_by_status(RequestStatus::PendingApproval).await,
        1
    );
    let result = ctx
        .store
        .update_quantity(code, &ItemId::new("1"), 9, None)
        .await;
    assert_eq!(result, Err(StoreError::NotEditable(code)));

    let request = ctx.store.get(code).await.unwrap();
    assert_eq!(request.cart.total_quantity(), 2, "frozen cart unchanged");
}

#[tokio::test]
async fn queue_actions_check_the_stage() {
    let ctx = TestContext::new();
    ctx.store.seed_demo(&ctx.catalog).await;

    let pending = ctx.store.list_by_status(RequestStatus::PendingApproval).await;
    let code = pending.first().unwrap().code;

    // The delivery queue cannot act on a pending-approval request.
    let result = ctx.store.advance(code, RequestStatus::Prepared).await;
    assert_eq!(
        result,
        Err(StoreError::StageMismatch {
            code,
            expected: RequestStatus::Prepared
        })
    );

    // The approval queue can.
    let next = ctx
        .store
        .advance(code, RequestStatus::PendingApproval)
        .await
        .unwrap();
    assert_eq!(next, RequestStatus::Approved);
}

#[tokio::test]
async fn every_mutation_autosaves_exactly_once() {
    let ctx = TestContext::new();
    let code = ctx
        .store
        .create_draft(CompanyCode::new("CPL"), "RCHAVARRIA")
        .await;

    let entry = ctx.catalog.get(&ItemId::new("2")).unwrap();
    ctx.store
        .add_item(code, entry.to_line_item(Quantity::ONE))
        .await
        .unwrap();
    ctx.store
        .update_quantity(code, &ItemId::new("2"), 2, Some(0))
        .await
        .unwrap();
    ctx.store
        .remove_item(code, &ItemId::new("2"))
        .await
        .unwrap();

    assert_eq!(ctx.autosave.count(), 3);

    // A failed submit (empty cart) must not notify the collaborator.
    assert!(ctx.store.submit(code).await.is_err());
    assert_eq!(ctx.autosave.count(), 3);
}
