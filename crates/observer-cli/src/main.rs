use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "observer", version, about = "Observer audit trail CLI")]
struct Cli {
    /// Path to observer.yaml. OBSERVER_LOG overrides its log path.
    #[arg(long, short, global = true, env = "OBSERVER_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the configured log file and whether it can be written.
    Status,

    /// List the hooks bound for a request.
    Hooks {
        /// Session user id; super admins get the privileged hooks.
        #[arg(long)]
        session_user: Option<u64>,

        /// Pretend the host exposes a network admin area.
        #[arg(long, default_value_t = false)]
        network_admin: bool,

        /// List every declared hook, ignoring tier conditions.
        #[arg(long, default_value_t = false)]
        all: bool,
    },

    /// Record one hook firing, e.g. `observer record archive_blog --args '[5]'`.
    Record {
        /// Hook name.
        hook: String,

        /// Positional hook arguments as a JSON array.
        #[arg(long, default_value = "[]")]
        args: String,

        /// Authenticated session user id.
        #[arg(long)]
        session_user: Option<u64>,

        /// Current network id.
        #[arg(long, default_value_t = 1)]
        network: u64,

        /// Current site id.
        #[arg(long, default_value_t = 1)]
        site: u64,

        /// X-Forwarded-For header value.
        #[arg(long)]
        forwarded_for: Option<String>,

        /// Direct peer address.
        #[arg(long)]
        remote_addr: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = commands::load_config(cli.config.as_deref())?;

    match cli.cmd {
        Command::Status => commands::status::run(&config)?,

        Command::Hooks {
            session_user,
            network_admin,
            all,
        } => commands::hooks::run(&config, session_user, network_admin, all)?,

        Command::Record {
            hook,
            args,
            session_user,
            network,
            site,
            forwarded_for,
            remote_addr,
        } => {
            let request = commands::record::RequestArgs {
                session_user,
                network,
                site,
                forwarded_for,
                remote_addr,
            };
            commands::record::run(&config, &hook, &args, request)?
        }
    }

    Ok(())
}
