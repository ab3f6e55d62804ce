//! `observer record` - feed one hook firing through the audit trail.

use anyhow::{Context, Result};
use observer_audit::{Outcome, RequestContext};
use observer_core::ObserverConfig;
use serde_json::Value;

use super::build_observer;

/// Request details passed on the command line.
#[derive(Debug, Clone, Default)]
pub struct RequestArgs {
    pub session_user: Option<u64>,
    pub network: u64,
    pub site: u64,
    pub forwarded_for: Option<String>,
    pub remote_addr: Option<String>,
}

impl RequestArgs {
    fn into_context(self) -> RequestContext {
        RequestContext {
            session_user_id: self.session_user,
            network_id: self.network,
            site_id: self.site,
            forwarded_for: self.forwarded_for,
            remote_addr: self.remote_addr,
            network_admin: false,
        }
    }
}

/// Parse `--args`: a JSON array, or a single JSON value taken as one argument.
pub fn parse_args(raw: &str) -> Result<Vec<Value>> {
    let value: Value = serde_json::from_str(raw).context("--args must be JSON")?;
    Ok(match value {
        Value::Array(items) => items,
        other => vec![other],
    })
}

pub fn run(
    config: &ObserverConfig,
    hook: &str,
    raw_args: &str,
    request: RequestArgs,
) -> Result<()> {
    let observer = build_observer(config)?;
    let args = parse_args(raw_args)?;
    let ctx = request.into_context();

    let outcome = observer
        .dispatch(hook, &args, &ctx)
        .with_context(|| format!("Failed to record {hook}"))?;

    match outcome {
        Outcome::Recorded(record) => println!("{record}"),
        Outcome::Skipped(reason) => println!("Skipped: {reason:?}"),
        Outcome::NotSubscribed => {
            println!("{hook} is not bound for this request (is the session user a super admin?)")
        }
        Outcome::StatusPage(status) => println!("{status}"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;

    #[test]
    fn test_parse_args() {
        assert_eq!(parse_args("[5, true]").unwrap(), vec![json!(5), json!(true)]);
        assert_eq!(parse_args("7").unwrap(), vec![json!(7)]);
        assert!(parse_args("[5,").is_err());
    }

    #[test]
    fn test_record_appends_line() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("observer.log");
        let directory = dir.path().join("directory.yaml");
        fs::write(&directory, "users:\n  1: admin\nsuper_admins: [1]\n").unwrap();

        let mut config = ObserverConfig::default();
        config.audit.log_path = Some(log.to_string_lossy().into_owned());
        config.directory = Some(directory);

        let request = RequestArgs {
            session_user: Some(1),
            network: 1,
            site: 1,
            remote_addr: Some("10.0.0.1".into()),
            ..Default::default()
        };
        run(&config, "archive_blog", "[5]", request).unwrap();

        let content = fs::read_to_string(&log).unwrap();
        assert_eq!(content.lines().count(), 1);
        assert!(content.contains("[admin:1] [archive_blog] [5] [] [] [10.0.0.1]"));
    }
}
