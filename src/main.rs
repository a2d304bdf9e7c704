use rust_decimal::Decimal;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use order_lifecycle::domain::identifiers::{CustomerId, ProductId, ProductVersionId};
use order_lifecycle::domain::order::{Address, Item, RequestedOrder};
use order_lifecycle::domain::product::{Price, Product, ProductVersion};
use order_lifecycle::{OrderLifecycle, OrderLifecycleConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Default to INFO level, can be overridden with RUST_LOG env var
    // Example: RUST_LOG=debug cargo run
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,order_lifecycle=debug"))
        )
        .init();

    let config = OrderLifecycleConfig::from_env()?;
    tracing::info!(?config, "Starting order lifecycle demo");

    let (lifecycle, mut events) = OrderLifecycle::in_memory(&config, 64)?;

    // === 1. Event consumer ===
    let consumer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match serde_json::to_string(&event) {
                Ok(json) => tracing::info!(event_type = %event.event_type, payload = %json, "Consumed event"),
                Err(e) => tracing::error!(error = %e, "Failed to serialize event"),
            }
        }
    });

    // === 2. Stock the catalogue ===
    let product_id = ProductId::new();
    let version_id = ProductVersionId::new();
    lifecycle.catalogue.add_product(Product::new(product_id)).await;
    lifecycle
        .catalogue
        .add_product_version(ProductVersion {
            id: version_id,
            product_id,
            name: "Ceramic mug".to_string(),
            description: "350ml, dishwasher safe".to_string(),
            price: Price {
                amount: Decimal::new(1250, 2),
                unit: "piece".to_string(),
                currency: "EUR".to_string(),
            },
        })
        .await?;
    lifecycle.catalogue.set_current_version(product_id, version_id).await?;

    // === 3. Place an order ===
    let requested = RequestedOrder::new(
        CustomerId::new(),
        Address {
            street: "Keizersgracht 123".to_string(),
            city: "Amsterdam".to_string(),
            postal_code: "1015 CJ".to_string(),
            country: "NL".to_string(),
        },
        vec![Item::new(product_id, 2)],
    )?;
    let order = lifecycle.place_order.place_order(&requested).await?;
    tracing::info!(order_id = %order.id(), "✅ Order placed");

    // === 4. Walk the happy path ===
    let mut current = order;
    while let Some(next) = current.status().nominal_next() {
        current = lifecycle.update_status.update_order_status(current.id(), next).await?;
    }
    tracing::info!(order_id = %current.id(), status = %current.status(), "✅ Order completed");

    // === 5. A rejected transition ===
    if let Err(e) = lifecycle.cancel_order.cancel_order(current.id(), false).await {
        tracing::warn!(error = %e, kind = ?e.kind(), "Cancellation rejected as expected");
    }
    // Dropping the services closes the event channel
    drop(lifecycle.place_order);
    drop(lifecycle.cancel_order);
    drop(lifecycle.update_status);
    consumer.await?;

    println!("{}", lifecycle.metrics.encode_text()?);
    Ok(())
}
