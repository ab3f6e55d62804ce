//! `observer status` - show the log file and any problem with it.

use anyhow::Result;
use observer_core::{ObserverConfig, LOG_PATH_ENV};

use super::build_observer;

pub fn run(config: &ObserverConfig) -> Result<()> {
    let observer = build_observer(config)?;
    let status = observer.status();

    println!("Observer {}", observer_audit::VERSION);
    println!("Network super admin logging");
    println!();

    if !observer.is_enabled() {
        println!("{status}");
        return Ok(());
    }

    if status.is_ok() {
        println!("✔ {status}");
        println!("  Change it with the {LOG_PATH_ENV} environment variable or audit.log_path.");
        return Ok(());
    }

    println!("✗ {status}");
    println!();
    println!("  To start logging, set {LOG_PATH_ENV} to the absolute path of the log file:");
    println!("    export {LOG_PATH_ENV}=/var/log/observer.log");
    println!("  The file should exist and be writable, or its directory must be writable");
    println!("  so the file can be created on the first event.");

    anyhow::bail!("log file is not usable")
}
