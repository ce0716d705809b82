//! LandChain registry driver.
//!
//! Runs an in-process registry against the in-memory ledger. Everything is
//! reported through the log; there is no other output.
//!
//! # Usage
//!
//! ```bash
//! # Scripted walkthrough of registration, transfer and the access rules
//! landchain demo
//!
//! # Seed the demo records, then query them
//! landchain --seed-demo scan --role admin --presented-id ADMIN123 --term 0x9ef
//! landchain --seed-demo lookup 1004
//!
//! # Custom identities and timing
//! landchain --admin-id ROOT --owner ALICE=0xA11CE --owner BOB=0xB0B --latency-ms 0 demo
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod demo;
mod fixtures;
mod notifier;
mod system_env;

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use fixtures::sample_records;
use landchain_core::{Account, Credential, Registry, RegistryConfig, Role};
use system_env::SystemEnv;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Number of records `--seed-demo` registers.
const DEMO_RECORDS: usize = 10;

/// LandChain land-title registry
#[derive(Parser, Debug)]
#[command(name = "landchain")]
#[command(about = "LandChain land-title registry driver")]
#[command(version)]
struct Args {
    /// Reserved administrator id
    #[arg(long)]
    admin_id: Option<String>,

    /// Principal address of the administrator
    #[arg(long)]
    admin_address: Option<String>,

    /// Owner identity as ID=ADDRESS (repeatable; replaces the demo owners)
    #[arg(long = "owner", value_parser = parse_account)]
    owners: Vec<Account>,

    /// Simulated ledger confirmation latency in milliseconds
    #[arg(long)]
    latency_ms: Option<u64>,

    /// Upper bound on a single register or transfer, in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// How long success and failure notifications stay visible, in milliseconds
    #[arg(long)]
    notify_ms: Option<u64>,

    /// Register the demo records before running the command
    #[arg(long)]
    seed_demo: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scripted walkthrough of registration, transfer and the access rules
    Demo,

    /// Look up one record
    Lookup {
        /// Land id
        id: String,

        #[command(flatten)]
        identity: IdentityArgs,
    },

    /// List records whose id or owner contains a term
    Scan {
        /// Search term; empty lists everything
        #[arg(long, default_value = "")]
        term: String,

        #[command(flatten)]
        identity: IdentityArgs,
    },
}

/// Identity to connect as; anonymous when omitted.
#[derive(ClapArgs, Debug)]
struct IdentityArgs {
    /// Role to claim
    #[arg(long, value_enum, requires = "presented_id")]
    role: Option<RoleArg>,

    /// Identifier presented for the role
    #[arg(long, requires = "role")]
    presented_id: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum RoleArg {
    Admin,
    Owner,
}

impl IdentityArgs {
    fn credential(self) -> Option<Credential> {
        let role = match self.role? {
            RoleArg::Admin => Role::Admin,
            RoleArg::Owner => Role::Owner,
        };
        Some(Credential::new(role, self.presented_id?))
    }
}

fn parse_account(raw: &str) -> Result<Account, String> {
    let (id, address) =
        raw.split_once('=').ok_or_else(|| format!("expected ID=ADDRESS, got {raw:?}"))?;
    Ok(Account::new(id, address))
}

fn build_config(args: &Args) -> RegistryConfig {
    let mut config = RegistryConfig::default();
    if let Some(id) = &args.admin_id {
        config.admin.id.clone_from(id);
    }
    if let Some(address) = &args.admin_address {
        config.admin.address.clone_from(address);
    }
    if !args.owners.is_empty() {
        config.owners.clone_from(&args.owners);
    }
    if let Some(ms) = args.latency_ms {
        config.confirmation_latency_ms = ms;
    }
    if let Some(ms) = args.timeout_ms {
        config.operation_timeout_ms = ms;
    }
    if let Some(ms) = args.notify_ms {
        config.notification_window_ms = ms;
    }
    config
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    tracing::info!("LandChain registry starting");

    let config = build_config(&args);
    let registry = Registry::in_memory(config, SystemEnv::new())?;
    let notifications = tokio::spawn(notifier::drive(
        registry.subscribe(),
        registry.projector(),
        registry.env().clone(),
    ));

    if args.seed_demo {
        let records = sample_records(DEMO_RECORDS, registry.config());
        demo::seed(&registry, records).await?;
    }

    match args.command {
        Command::Demo => demo::run(&registry).await?,
        Command::Lookup { id, identity } => {
            demo::lookup(&registry, identity.credential(), &id)?;
        },
        Command::Scan { term, identity } => {
            demo::scan(&registry, identity.credential(), &term)?;
        },
    }

    // Closing the registry closes the event channel, which stops the driver.
    drop(registry);
    notifications.await?;

    tracing::info!("LandChain registry stopped");
    Ok(())
}
