//! `observer hooks` - list hook subscriptions.

use anyhow::Result;
use observer_audit::{Callback, RequestContext, SubscriptionRegistry};
use observer_core::ObserverConfig;

use super::build_observer;

pub fn run(
    config: &ObserverConfig,
    session_user: Option<u64>,
    network_admin: bool,
    all: bool,
) -> Result<()> {
    let registry = if all {
        SubscriptionRegistry::all()
    } else {
        let observer = build_observer(config)?;
        let mut ctx = RequestContext::new().with_network_admin(network_admin);
        ctx.session_user_id = session_user;
        observer.registry(&ctx)
    };

    println!("{:<28} {:>5}  {:<14} CALLBACK", "HOOK", "ARGS", "TIER");
    for subscription in registry.iter() {
        let callback = match subscription.callback {
            Callback::StatusPage => "status page".to_string(),
            Callback::Record(action) => format!("record {action}"),
        };
        println!(
            "{:<28} {:>5}  {:<14} {}",
            subscription.hook, subscription.arity, subscription.tier.to_string(), callback
        );
    }
    println!();
    println!("{} hook(s)", registry.len());

    Ok(())
}
