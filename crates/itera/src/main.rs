use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use console::style;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use itera_proto::Name;
use itera_resolver::{random_root, Hop, IterativeResolver, ResolverConfig, UdpTransport};

/// Resolve a domain name to IPv4 addresses by walking the DNS
/// delegation tree, starting at a root server.
#[derive(Debug, Parser)]
#[command(name = "itera", version, about)]
struct Cli {
    /// Domain name to resolve.
    domain: Name,

    /// Server to start from. Defaults to a random root hint.
    root: Option<Ipv4Addr>,

    /// Seconds to wait for each response.
    #[arg(long, default_value_t = 5)]
    timeout: u64,

    /// Total query budget for the resolution.
    #[arg(long, default_value_t = 30)]
    max_referrals: u32,

    /// Log level: trace, debug, info, warn, or error.
    #[arg(short = 'l', long, default_value = "warn")]
    log_level: Level,

    /// Print only the resolved addresses, no per-hop transcript.
    #[arg(short, long)]
    quiet: bool,
}

fn init_tracing(level: Level) -> anyhow::Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init()
        .context("failed to initialize logging")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level)?;

    let start = IpAddr::V4(cli.root.unwrap_or_else(random_root));
    let config = ResolverConfig {
        query_timeout: Duration::from_secs(cli.timeout),
        max_referrals: cli.max_referrals,
        ..ResolverConfig::default()
    };

    let mut resolver = IterativeResolver::with_config(UdpTransport::new(), config);
    if !cli.quiet {
        println!(
            "{}",
            style(format!("; resolving {} starting at {start}", cli.domain)).dim()
        );
        resolver = resolver.with_reporter(Arc::new(|hop: &Hop| {
            println!();
            println!("{}", style(format!(";; response from {}", hop.server)).cyan().bold());
            print!("{}", hop.message);
        }));
    }

    let resolution = resolver
        .resolve(&cli.domain, start)
        .await
        .with_context(|| format!("failed to resolve {}", cli.domain))?;

    if !cli.quiet {
        println!();
        println!("{}", style(format!("{} resolves to:", resolution.name)).green().bold());
    }
    for address in &resolution.addresses {
        println!("{address}");
    }
    Ok(())
}
