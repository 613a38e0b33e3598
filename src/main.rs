use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sitelens_cli::app_context::AppContext;
use sitelens_cli::sim;
use sitelens_core_types::TabId;
use sitelens_lookup::{default_policy, domain, load_policy, LookupPolicy};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "sitelens", version, about = "Per-tab company profile lookup engine")]
struct Cli {
    /// Optional policy file (YAML: endpoints, region, denylist)
    #[arg(long, global = true)]
    policy: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a JSONL stream of browser events and print final tab states
    Simulate {
        /// One browser event per line: committed navigations and tab removals
        events: PathBuf,
    },
    /// Print the normalized domain a URL resolves to
    Resolve { url: String },
    /// Run one live lookup for a domain and print the stored result
    Lookup { domain: String },
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn resolve_policy(path: Option<&PathBuf>) -> Result<LookupPolicy> {
    match path {
        Some(path) => load_policy(path)
            .with_context(|| format!("failed to load policy from {}", path.display())),
        None => Ok(default_policy()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let policy = resolve_policy(cli.policy.as_ref())?;

    match cli.command {
        Commands::Simulate { events } => {
            let context = AppContext::new(policy);
            let events = sim::read_events(&events)?;
            info!(count = events.len(), "replaying browser events");
            let reports = sim::replay(&context, events).await?;
            for report in reports {
                println!("{}", serde_json::to_string(&report)?);
            }
        }
        Commands::Resolve { url } => {
            let domain = domain::resolve(&url)?;
            println!("{domain}");
        }
        Commands::Lookup { domain } => {
            let context = AppContext::new(policy);
            let tab = TabId(1);
            context.tabs().set_domain(tab, &domain).await?;
            let outcome = context.engine().run_lookup(tab, &domain).await?;
            let (status, profile) = context.tabs().status_and_profile(tab).await?;
            info!(?outcome, "lookup finished");
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "domain": domain,
                    "status": status,
                    "profile": profile,
                }))?
            );
        }
    }
    Ok(())
}
