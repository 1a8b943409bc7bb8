//! Demo walkthrough of the pre-order system.
//!
//! Seeds a small menu, builds a cart with both item kinds, schedules the two
//! pickups, and submits the order. Run with `RUST_LOG=info cargo run` to
//! watch the flow through the actors.

use std::sync::Arc;

use bakehouse::config::Config;
use bakehouse::lifecycle::{setup_tracing, PreorderSystem};
use bakehouse::model::item::{AllergenFlags, DietaryFlags, MenuItemSpec};
use bakehouse::model::order::{ContactUpdate, PickupSlot, SubOrderKind};
use bakehouse::notify::TracingNotifier;
use bakehouse::schedule;
use chrono::Local;
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    // Setup tracing once for the entire application
    setup_tracing();

    let config = Config::load();
    info!(mailbox = %config.orders_mailbox, "Starting bakehouse pre-order system");

    let system = PreorderSystem::new(&config, Arc::new(TracingNotifier));

    // Seed the menu
    let span = tracing::info_span!("menu_seeding");
    let (sourdough, croissant, cake, rye) = async {
        let sourdough = system
            .catalog
            .add_item(
                MenuItemSpec::in_stock("Sourdough Loaf", 8.50, "Breads", 6).with_dietary(
                    DietaryFlags {
                        vegan: true,
                        ..Default::default()
                    },
                ),
            )
            .await
            .map_err(|e| e.to_string())?;
        let croissant = system
            .catalog
            .add_item(
                MenuItemSpec::in_stock("Butter Croissant", 4.25, "Pastries", 12).with_allergens(
                    AllergenFlags {
                        dairy: true,
                        eggs: true,
                        ..Default::default()
                    },
                ),
            )
            .await
            .map_err(|e| e.to_string())?;
        let cake = system
            .catalog
            .add_item(MenuItemSpec::made_to_order("Celebration Cake", 42.00, "Cakes"))
            .await
            .map_err(|e| e.to_string())?;
        let rye = system
            .catalog
            .add_item(MenuItemSpec::in_stock("Seeded Rye", 7.00, "Breads", 0))
            .await
            .map_err(|e| e.to_string())?;
        Ok::<_, String>((sourdough, croissant, cake, rye))
    }
    .instrument(span)
    .await?;

    let menu = system.catalog.menu().await.map_err(|e| e.to_string())?;
    info!(
        categories = menu.categories.len(),
        items = menu.items.len(),
        "Menu ready"
    );

    // Build a mixed cart: two loaves, one croissant, one bespoke cake
    let span = tracing::info_span!("cart_building");
    async {
        system
            .checkout
            .add_item(sourdough)
            .await
            .map_err(|e| e.to_string())?;
        system
            .checkout
            .add_item(sourdough)
            .await
            .map_err(|e| e.to_string())?;
        system
            .checkout
            .add_item(croissant)
            .await
            .map_err(|e| e.to_string())?;
        let summary = system
            .checkout
            .add_item(cake)
            .await
            .map_err(|e| e.to_string())?;
        info!(total = summary.total, "Cart built");

        // The rye was seeded with zero stock; the refusal leaves the cart as is
        if let Err(notice) = system.checkout.add_item(rye).await {
            info!(notice = %notice, "Sold-out item refused");
        }
        Ok::<(), String>(())
    }
    .instrument(span)
    .await?;

    // Contact, pickup slots, and a note for the bakers
    system
        .checkout
        .set_contact(ContactUpdate {
            name: Some("Avery Chen".to_string()),
            email: Some("avery@example.com".to_string()),
            phone: Some("555-012-3456".to_string()),
        })
        .await
        .map_err(|e| e.to_string())?;

    let now = Local::now().naive_local();
    let weekday_slot = PickupSlot::new(
        schedule::earliest_in_stock_date(now),
        schedule::in_stock_slots()[0],
    );
    let saturday_slot = PickupSlot::new(
        schedule::made_to_order_saturday(now),
        schedule::made_to_order_slots()[0],
    );
    system
        .checkout
        .set_pickup(SubOrderKind::InStock, weekday_slot)
        .await
        .map_err(|e| e.to_string())?;
    system
        .checkout
        .set_pickup(SubOrderKind::MadeToOrder, saturday_slot)
        .await
        .map_err(|e| e.to_string())?;
    system
        .checkout
        .set_instructions(Some("Please slice one sourdough loaf.".to_string()))
        .await
        .map_err(|e| e.to_string())?;

    // Submit: two confirmations fan out, then the order is recorded
    let span = tracing::info_span!("order_submission");
    let result = async {
        info!("Submitting order");
        system.checkout.submit().await
    }
    .instrument(span)
    .await;

    match result {
        Ok(confirmation) => {
            info!(order_id = %confirmation.order_id, summary = %confirmation.summary, "Order confirmed")
        }
        Err(e) => error!(error = %e, "Order submission failed"),
    }

    let recorded = system.orders.recorded().await.map_err(|e| e.to_string())?;
    info!(recorded, "Orders on the log");

    // Shutdown system gracefully
    system.shutdown().await?;

    info!("Demo completed successfully");
    Ok(())
}
