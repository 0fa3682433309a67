use std::sync::Arc;

use chrono::Utc;
use rust_decimal_macros::dec;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use order_aggregate::domain::{Order, OrderItem, OrderStatus, Payment, User};
use order_aggregate::metrics::Metrics;
use order_aggregate::store::{InMemoryOrderStore, OrderStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Default to INFO level, can be overridden with RUST_LOG env var
    // Example: RUST_LOG=debug cargo run
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,order_aggregate=debug")),
        )
        .init();

    tracing::info!("Starting order lifecycle demo");

    let metrics = Arc::new(Metrics::new()?);
    let store = InMemoryOrderStore::new(metrics.clone());

    let client = Arc::new(User::new(
        Some(1),
        "Maria Brown",
        "maria@gmail.com",
        "988888888",
        "123456",
    ));

    // === 1. Place an order ===
    let mut order = Order::new(
        None,
        Some(Utc::now()),
        Some(client),
        Some(OrderStatus::WaitingPayment),
    );
    order.add_item(OrderItem::new(None, 1, 2, dec!(90.5)));
    order.add_item(OrderItem::new(None, 3, 1, dec!(1250.0)));
    let mut order = store.save(order).await?;
    let status = order.status()?;

    tracing::info!(
        order_id = ?order.id(),
        %status,
        total = %order.total(),
        "Order placed"
    );

    // === 2. Pay for it ===
    order.set_status(Some(OrderStatus::Paid));
    order.set_payment(Payment::new(None, Utc::now()));
    let order = store.save(order).await?;
    let status = order.status()?;

    tracing::info!(
        order_id = ?order.id(),
        %status,
        "Order paid"
    );
    tracing::info!("Order document: {}", serde_json::to_string_pretty(&order)?);

    // === 3. Delete it, cascading to the payment ===
    if let Some(id) = order.id() {
        store.delete(id).await?;
        tracing::info!(
            order_id = id,
            payment_left = store.find_payment(id).await.is_some(),
            "Order deleted"
        );
    }

    tracing::info!(
        "Metrics registry holds {} metric families",
        metrics.registry().gather().len()
    );
    tracing::info!("Demo complete");

    Ok(())
}
