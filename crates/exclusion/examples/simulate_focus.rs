//! Example: Replay a short focus session and print exclusion decisions.
//!
//! Run with: cargo run -p clipkeep-exclusion --example simulate_focus

use clipkeep_context::{CaptureSettings, WindowDescriptor};
use clipkeep_events::InMemoryEventBus;
use clipkeep_exclusion::{
    Clock, ExclusionEngine, InMemoryAccessibilityBus, ManualClock, Role, StaticNode,
};
use std::sync::Arc;
use std::time::Duration;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("clipkeep_exclusion=debug")
        .init();

    let bus = Arc::new(InMemoryAccessibilityBus::new());
    let events = Arc::new(InMemoryEventBus::new());
    let clock = Arc::new(ManualClock::new());

    let desktop = StaticNode::named("main", Role::Unknown);
    let browser = desktop.add_child(StaticNode::named("Firefox", Role::Application));
    let frame = browser.add_child(StaticNode::named("Mozilla Firefox", Role::Frame));
    let bank = frame.add_child(StaticNode::named("MyBank Online", Role::DocumentWeb));
    let password = bank.add_child(StaticNode::named("Password", Role::PasswordText));
    let news = frame.add_child(StaticNode::named("Daily News", Role::DocumentWeb));
    bus.set_root(Some(desktop.as_node()));

    let mut engine = ExclusionEngine::builder(bus.clone())
        .events(events.clone())
        .clock(clock.clone())
        .build();

    let settings = CaptureSettings::new(["bank"]);
    let window = WindowDescriptor::new()
        .with_title("Mozilla Firefox")
        .with_class("firefox");

    let steps: [(&str, Option<&Arc<StaticNode>>, u64); 5] = [
        ("browser opened", None, 0),
        ("password field focused", Some(&password), 100),
        ("switched to news tab", Some(&news), 100),
        ("200ms later", None, 200),
        ("another 300ms", None, 300),
    ];

    println!("=== Exclusion Replay ===\n");
    for (label, focus, advance_ms) in steps {
        clock.advance(Duration::from_millis(advance_ms));
        if let Some(node) = focus {
            bus.emit_focus(&**node, clock.now());
        }
        let excluded = engine.is_excluded(Some(&window), &settings);
        println!(
            "{:<24} | excluded: {:5} | {}",
            label,
            excluded,
            serde_json::to_string(&engine.snapshot())?
        );
    }

    engine.destroy();
    println!("\n{} events published.", events.len());
    Ok(())
}
