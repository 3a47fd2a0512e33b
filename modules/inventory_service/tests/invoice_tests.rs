//! Invoice lifecycle tests
//!
//! Cover the sale path end to end: line snapshots, stock decrements,
//! the all-or-nothing shortfall behavior, and deletion semantics.

use inventory_service::contract::error::InventoryError;
use inventory_service::contract::model::{InvoiceFilter, NewInvoice, NewInvoiceLine};

use service_tests::{create_test_service, new_item, test_actor};

fn line(item_id: i64, quantity: i64) -> NewInvoiceLine {
    NewInvoiceLine { item_id, quantity }
}

#[tokio::test]
async fn invoice_snapshots_lines_and_decrements_stock() {
    let (service, repos) = create_test_service();
    let actor = test_actor();

    let shop = service
        .create_shop(&actor, "Downtown branch")
        .await
        .expect("shop should be created");
    let keyboard = service
        .create_item(&actor, new_item("Wireless keyboard", None, 10, 49.9))
        .await
        .expect("item should be created");
    let hub = service
        .create_item(&actor, new_item("USB hub", None, 5, 15.0))
        .await
        .expect("item should be created");

    let invoice = service
        .create_invoice(
            &actor,
            NewInvoice {
                shop_id: Some(shop.id),
                lines: vec![line(keyboard.id, 2), line(hub.id, 1)],
            },
        )
        .await
        .expect("invoice should be created");

    assert_eq!(invoice.created_by, Some(actor.id));
    assert_eq!(invoice.shop_id, Some(shop.id));
    assert_eq!(invoice.shop_name.as_deref(), Some("Downtown branch"));
    assert_eq!(invoice.items.len(), 2);

    let first = &invoice.items[0];
    assert_eq!(first.item_id, Some(keyboard.id));
    assert_eq!(first.item_name.as_deref(), Some("Wireless keyboard"));
    assert_eq!(first.item_code.as_deref(), Some("000001"));
    assert_eq!(first.quantity, 2);
    assert!((first.amount.unwrap() - 99.8).abs() < 1e-9);

    // Stock moved, history did not.
    let keyboard = repos.items.get(keyboard.id).unwrap();
    assert_eq!(keyboard.remaining, Some(8));
    assert_eq!(keyboard.total, 10);
    let hub = repos.items.get(hub.id).unwrap();
    assert_eq!(hub.remaining, Some(4));

    assert_eq!(
        repos.accounts.actions().last().map(String::as_str),
        Some("added new invoice")
    );
}

#[tokio::test]
async fn oversell_fails_whole_invoice_and_touches_nothing() {
    let (service, repos) = create_test_service();
    let actor = test_actor();

    let plenty = service
        .create_item(&actor, new_item("Wireless keyboard", None, 10, 49.9))
        .await
        .expect("item should be created");
    let scarce = service
        .create_item(&actor, new_item("USB hub", None, 1, 15.0))
        .await
        .expect("item should be created");

    let result = service
        .create_invoice(
            &actor,
            NewInvoice {
                shop_id: None,
                lines: vec![line(plenty.id, 3), line(scarce.id, 2)],
            },
        )
        .await;

    match result {
        Err(err @ InventoryError::InsufficientStock { .. }) => {
            assert_eq!(
                err.to_string(),
                "Item with code 000002 does not have enough quantity!"
            );
        }
        other => panic!("expected insufficient stock, got {other:?}"),
    }

    // The earlier line's decrement must have been rolled back too.
    assert_eq!(repos.items.get(plenty.id).unwrap().remaining, Some(10));
    assert_eq!(repos.items.get(scarce.id).unwrap().remaining, Some(1));
    assert_eq!(repos.invoices.len(), 0);
    assert!(!repos
        .accounts
        .actions()
        .iter()
        .any(|action| action == "added new invoice"));
}

#[tokio::test]
async fn repeated_lines_draw_from_the_same_stock() {
    let (service, repos) = create_test_service();
    let actor = test_actor();

    let item = service
        .create_item(&actor, new_item("Wireless keyboard", None, 5, 49.9))
        .await
        .expect("item should be created");

    // 3 + 3 exceeds the 5 on hand even though each line alone fits.
    let oversell = service
        .create_invoice(
            &actor,
            NewInvoice {
                shop_id: None,
                lines: vec![line(item.id, 3), line(item.id, 3)],
            },
        )
        .await;
    assert!(matches!(
        oversell,
        Err(InventoryError::InsufficientStock { .. })
    ));
    assert_eq!(repos.items.get(item.id).unwrap().remaining, Some(5));

    let invoice = service
        .create_invoice(
            &actor,
            NewInvoice {
                shop_id: None,
                lines: vec![line(item.id, 2), line(item.id, 2)],
            },
        )
        .await
        .expect("invoice should be created");
    assert_eq!(invoice.items.len(), 2);
    assert_eq!(repos.items.get(item.id).unwrap().remaining, Some(1));
}

#[tokio::test]
async fn invoice_requires_lines_and_positive_quantities() {
    let (service, _repos) = create_test_service();
    let actor = test_actor();

    let empty = service
        .create_invoice(
            &actor,
            NewInvoice {
                shop_id: None,
                lines: Vec::new(),
            },
        )
        .await;
    match empty {
        Err(InventoryError::Validation { message }) => {
            assert_eq!(message, "invoice must contain at least one item");
        }
        other => panic!("expected validation error, got {other:?}"),
    }

    let item = service
        .create_item(&actor, new_item("Wireless keyboard", None, 5, 49.9))
        .await
        .expect("item should be created");
    let zero_quantity = service
        .create_invoice(
            &actor,
            NewInvoice {
                shop_id: None,
                lines: vec![line(item.id, 0)],
            },
        )
        .await;
    match zero_quantity {
        Err(InventoryError::Validation { message }) => {
            assert_eq!(message, "invoice line quantity must be at least 1");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn invoice_checks_shop_and_items_exist() {
    let (service, _repos) = create_test_service();
    let actor = test_actor();

    let item = service
        .create_item(&actor, new_item("Wireless keyboard", None, 5, 49.9))
        .await
        .expect("item should be created");

    let missing_shop = service
        .create_invoice(
            &actor,
            NewInvoice {
                shop_id: Some(404),
                lines: vec![line(item.id, 1)],
            },
        )
        .await;
    assert!(matches!(
        missing_shop,
        Err(InventoryError::NotFound { resource: "shop", .. })
    ));

    let missing_item = service
        .create_invoice(
            &actor,
            NewInvoice {
                shop_id: None,
                lines: vec![line(404, 1)],
            },
        )
        .await;
    assert!(matches!(
        missing_item,
        Err(InventoryError::NotFound { resource: "item", .. })
    ));
}

#[tokio::test]
async fn deleting_an_invoice_keeps_stock_decremented() {
    let (service, repos) = create_test_service();
    let actor = test_actor();

    let item = service
        .create_item(&actor, new_item("Wireless keyboard", None, 10, 49.9))
        .await
        .expect("item should be created");
    let invoice = service
        .create_invoice(
            &actor,
            NewInvoice {
                shop_id: None,
                lines: vec![line(item.id, 4)],
            },
        )
        .await
        .expect("invoice should be created");

    service
        .delete_invoice(&actor, invoice.id)
        .await
        .expect("delete should succeed");

    // The sale happened; deleting the receipt does not restock.
    assert_eq!(repos.items.get(item.id).unwrap().remaining, Some(6));
    assert_eq!(repos.invoices.len(), 0);
    assert_eq!(
        repos.accounts.actions().last().map(String::as_str),
        Some(format!("deleted invoice - \"{}\"", invoice.id).as_str())
    );

    let gone = service.get_invoice(invoice.id).await;
    assert!(matches!(
        gone,
        Err(InventoryError::NotFound { resource: "invoice", .. })
    ));
}

#[tokio::test]
async fn line_snapshots_survive_item_changes() {
    let (service, _repos) = create_test_service();
    let actor = test_actor();

    let item = service
        .create_item(&actor, new_item("Wireless keyboard", None, 10, 49.9))
        .await
        .expect("item should be created");
    let invoice = service
        .create_invoice(
            &actor,
            NewInvoice {
                shop_id: None,
                lines: vec![line(item.id, 1)],
            },
        )
        .await
        .expect("invoice should be created");

    service
        .update_item(
            &actor,
            item.id,
            inventory_service::contract::model::ItemUpdate {
                name: Some("Mechanical keyboard".to_string()),
                price: Some(89.0),
                ..Default::default()
            },
        )
        .await
        .expect("update should succeed");

    let receipt = service
        .get_invoice(invoice.id)
        .await
        .expect("invoice should still exist");
    let snapshot = &receipt.items[0];
    assert_eq!(snapshot.item_name.as_deref(), Some("Wireless keyboard"));
    assert!((snapshot.amount.unwrap() - 49.9).abs() < 1e-9);
}

#[tokio::test]
async fn invoices_list_by_shop() {
    let (service, _repos) = create_test_service();
    let actor = test_actor();

    let downtown = service
        .create_shop(&actor, "Downtown branch")
        .await
        .expect("shop should be created");
    let harbor = service
        .create_shop(&actor, "Harbor branch")
        .await
        .expect("shop should be created");
    let item = service
        .create_item(&actor, new_item("Wireless keyboard", None, 10, 49.9))
        .await
        .expect("item should be created");

    for shop_id in [downtown.id, downtown.id, harbor.id] {
        service
            .create_invoice(
                &actor,
                NewInvoice {
                    shop_id: Some(shop_id),
                    lines: vec![line(item.id, 1)],
                },
            )
            .await
            .expect("invoice should be created");
    }

    let (rows, total) = service
        .list_invoices(
            &InvoiceFilter {
                shop_id: Some(downtown.id),
                keyword: None,
            },
            1,
            10,
        )
        .await
        .expect("list should succeed");
    assert_eq!(total, 2);
    assert!(rows.iter().all(|i| i.shop_id == Some(downtown.id)));

    let (all, total) = service
        .list_invoices(&InvoiceFilter::default(), 1, 2)
        .await
        .expect("list should succeed");
    assert_eq!(total, 3);
    assert_eq!(all.len(), 2);
}
