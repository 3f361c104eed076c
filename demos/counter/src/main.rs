//! Counter example binary
//!
//! Mounts a counter container with the `tracing` devtools extension registered,
//! so every dispatch is reported as a structured event.

use bridged_store_core::selector::SelectorCache;
use bridged_store_runtime::devtools::{TracingExtension, register_extension};
use counter::{CounterAction, count, counter_container, is_even};
use futures::StreamExt;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "counter=debug,bridged_store_runtime=debug,bridged_store::devtools=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("=== Counter Example: Bridged Store ===\n");

    // No recorder is installed here; counters become no-ops.
    bridged_store_runtime::metrics::describe();
    register_extension(Arc::new(TracingExtension::new()));

    let container = counter_container("counter");
    let provider = container.provider();

    // Observe every published state from a separate task.
    let watcher = tokio::spawn({
        let changes = container.changes();
        async move {
            changes
                .for_each(|state| async move {
                    tracing::debug!(count = state.count, changes = state.changes, "State published");
                })
                .await;
        }
    });

    let count = count();
    let is_even = is_even();
    let mut count_slot = SelectorCache::new();
    let mut parity_slot = SelectorCache::new();

    println!("Initial count: {}", container.use_selector(&mut count_slot, &count));

    let dispatch = container.use_dispatch();
    for action in [
        CounterAction::Increment,
        CounterAction::Increment,
        CounterAction::Add(40),
        CounterAction::Decrement,
    ] {
        println!("\n>>> Dispatching: {action:?}");
        dispatch.dispatch(action)?;

        // The selector identity never changes, so a reused slot keeps
        // returning its first value until cleared.
        count_slot.clear();
        parity_slot.clear();
        println!(
            "Count: {} (even: {})",
            container.use_selector(&mut count_slot, &count),
            container.use_selector(&mut parity_slot, &is_even)
        );
    }

    println!("\n>>> Dispatching: Add(i64::MAX)");
    if let Err(error) = dispatch.dispatch(CounterAction::Add(i64::MAX)) {
        println!("Rejected: {error}");
    }
    println!("Count is still {}", provider.state().count);

    println!("\n>>> Dispatching: Reset");
    dispatch.dispatch(CounterAction::Reset)?;
    println!("Count after Reset: {}", provider.state().count);

    // Unmounting closes the change stream; the dispatcher we still hold is
    // detached and discards anything sent to it.
    drop(provider);
    watcher.await?;
    dispatch.dispatch(CounterAction::Increment)?;

    println!("\nAfter unmount, consumers see the initial state: {:?}", container.use_state());
    Ok(())
}
