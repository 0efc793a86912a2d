//! Catalog-to-cart integration: the selection table's candidate
//! construction feeding the cart's merge rules.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use almacen_core::{CompanyCode, ItemId, Quantity};
use almacen_integration_tests::TestContext;
use almacen_web::catalog::CatalogSort;

#[tokio::test]
async fn adding_the_same_article_twice_merges_instead_of_duplicating() {
    let ctx = TestContext::new();
    let code = ctx
        .store
        .create_draft(CompanyCode::new("CPL"), "RCHAVARRIA")
        .await;

    let simple = ctx.catalog.get(&ItemId::new("1")).unwrap();
    ctx.store
        .add_item(code, simple.to_line_item(Quantity::clamp(2)))
        .await
        .unwrap();
    ctx.store
        .add_item(code, simple.to_line_item(Quantity::clamp(3)))
        .await
        .unwrap();

    let request = ctx.store.get(code).await.unwrap();
    assert_eq!(request.cart.len(), 1);
    assert_eq!(request.cart.total_quantity(), 5);
}

#[tokio::test]
async fn composite_candidates_arrive_seeded_and_merge_by_location_and_batch() {
    let ctx = TestContext::new();
    let code = ctx
        .store
        .create_draft(CompanyCode::new("CPL"), "RCHAVARRIA")
        .await;

    let composite = ctx.catalog.get(&ItemId::new("2")).unwrap();
    ctx.store
        .add_item(code, composite.to_line_item(Quantity::ONE))
        .await
        .unwrap();
    ctx.store
        .add_item(code, composite.to_line_item(Quantity::ONE))
        .await
        .unwrap();

    let request = ctx.store.get(code).await.unwrap();
    assert_eq!(request.cart.len(), 1, "same id merged");

    let item = request.cart.get(&ItemId::new("2")).unwrap();
    let quantities: Vec<u32> = item.sub_items().iter().map(|s| s.quantity.get()).collect();
    assert_eq!(quantities, [28, 12], "matching allocations summed");
    assert_eq!(item.multiplier().get(), 2, "multiplier accumulated");

    // A later parent edit rescales from the defaults, not the sums.
    ctx.store
        .update_quantity(code, &ItemId::new("2"), 3, None)
        .await
        .unwrap();
    let request = ctx.store.get(code).await.unwrap();
    let item = request.cart.get(&ItemId::new("2")).unwrap();
    let quantities: Vec<u32> = item.sub_items().iter().map(|s| s.quantity.get()).collect();
    assert_eq!(quantities, [42, 18]);
}

#[tokio::test]
async fn selection_order_survives_merging() {
    let ctx = TestContext::new();
    let code = ctx
        .store
        .create_draft(CompanyCode::new("CPL"), "RCHAVARRIA")
        .await;

    for id in ["1", "2", "1"] {
        let entry = ctx.catalog.get(&ItemId::new(id)).unwrap();
        ctx.store
            .add_item(code, entry.to_line_item(Quantity::ONE))
            .await
            .unwrap();
    }

    let request = ctx.store.get(code).await.unwrap();
    let codes: Vec<&str> = request
        .cart
        .items()
        .iter()
        .map(|item| item.code.as_str())
        .collect();
    assert_eq!(codes, ["2-1065", "2-2100"]);
}

#[test]
fn catalog_search_feeds_the_selection_table() {
    let ctx = TestContext::new();

    let results = ctx.catalog.search("grapa", CatalogSort::CodeAsc);
    assert_eq!(results.len(), 0, "batch text is not searched, location is");

    let results = ctx.catalog.search("2-2100", CatalogSort::CodeAsc);
    assert_eq!(results.len(), 1);
    assert!(results[0].is_composite());
}
