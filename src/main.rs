use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use uuid::Uuid;

use order_fsm::config::AppConfig;
use order_fsm::domain::order::{
    AmendOrderLineCommand, Order, OrderCommand, OrderCommandHandler, OrderDetails, OrderError,
    OrderEvent, OrderIdentifier, OrderLine,
};
use order_fsm::event_sourcing::{serialize_event, EventSink, InMemoryEventLog};
use order_fsm::metrics::TransitionMetrics;
use order_fsm::provenance::{Anonymous, CurrentUserProvider, FixedUser, SystemClock};

fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;

    // RUST_LOG wins over the configured filter when set
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_filter))
        )
        .init();

    tracing::info!("🚀 Starting order lifecycle demo");

    // === 1. Wire collaborators ===
    let event_log = Arc::new(InMemoryEventLog::<OrderEvent>::new(&config.aggregate_type));
    let metrics = Arc::new(TransitionMetrics::new()?);
    let user_provider: Arc<dyn CurrentUserProvider> = match config.actor_id {
        Some(actor_id) => Arc::new(FixedUser(actor_id)),
        None => Arc::new(Anonymous),
    };

    let handler = OrderCommandHandler::new(event_log.clone(), Arc::new(SystemClock), user_provider)
        .with_metrics(metrics.clone())
        .with_aggregate_type(config.aggregate_type.clone());

    let correlation_id = Uuid::new_v4();

    // === 2. Draft, open and amend an order ===
    let mut order = Order::builder()
        .new_order()
        .with_identifier(OrderIdentifier::new())
        .with_details(OrderDetails::default())
        .build()?;

    tracing::info!("📝 Created order {}", order.identifier());

    let first_line = OrderLine::new(Uuid::new_v4(), 2);
    let second_line = OrderLine::new(Uuid::new_v4(), 1);

    handler.handle(
        &mut order,
        OrderCommand::Update { details: OrderDetails::new(vec![first_line.clone()]) },
        correlation_id,
    )?;
    handler.handle(&mut order, OrderCommand::Open, correlation_id)?;
    handler.handle(
        &mut order,
        OrderCommand::AmendOrderLine { command: AmendOrderLineCommand::add(second_line.clone()) },
        correlation_id,
    )?;
    handler.handle(
        &mut order,
        OrderCommand::AmendOrderLine { command: AmendOrderLineCommand::remove(first_line.identifier) },
        correlation_id,
    )?;

    tracing::info!(
        "✅ Order {} has {} line(s) after {} amendment(s)",
        order.identifier(),
        order.details().order_lines().len(),
        order.order_line_amendments().len()
    );

    // === 3. Pause, resume and cancel ===
    handler.handle(&mut order, OrderCommand::Suspend { reason: "stockout".to_string() }, correlation_id)?;
    handler.handle(&mut order, OrderCommand::Resume, correlation_id)?;
    handler.handle(
        &mut order,
        OrderCommand::Cancel { reason: "customer request".to_string() },
        correlation_id,
    )?;

    // === 4. Terminal status refuses further work ===
    match handler.handle(&mut order, OrderCommand::Close, correlation_id) {
        Ok(_) => anyhow::bail!("cancelled order unexpectedly accepted close"),
        Err(err) => match err.downcast_ref::<OrderError>() {
            Some(order_error) => tracing::info!("🛑 Rejected as expected: {}", order_error),
            None => return Err(err),
        },
    }

    // === 5. Report ===
    for envelope in event_log.load_events(order.identifier().as_uuid())? {
        println!("{}", serialize_event(&envelope)?);
    }
    print!("{}", metrics.render()?);

    tracing::info!("🎉 Demo complete! Final status: {}", order.status());

    Ok(())
}
