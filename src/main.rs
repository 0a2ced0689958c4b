use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use route_quotes::config::{REPORT_AMOUNTS, REPORT_NETWORKS};
use route_quotes::report::{render, run_report, save_to_file};
use route_quotes::{http, server, Aggregator, Config, LifiMetadata, ProviderSet, Resolver};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "route-quotes")]
#[command(about = "Compare swap and bridge quotes across routing APIs")]
struct Cli {
    #[command(flatten)]
    config: Config,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Quote one route and print the ranked list as JSON
    Quote {
        origin_chain: String,
        destination_chain: String,
        origin_token: String,
        destination_token: String,
        /// Whole units of the origin token
        amount: f64,
    },
    /// Same-chain quotes over a grid of networks and amounts
    Report {
        /// Networks to quote (default: all report networks)
        #[arg(long, value_delimiter = ',')]
        networks: Vec<String>,
        /// Amounts in whole sell-token units
        #[arg(long, value_delimiter = ',')]
        amounts: Vec<f64>,
        #[arg(long, default_value = "USDC")]
        sell_token: String,
        #[arg(long, default_value = "WETH")]
        buy_token: String,
        /// Also save the report as JSON
        #[arg(long)]
        output: Option<String>,
    },
    /// Serve GET /get_quote
    Serve {
        #[arg(short, long, env = "QUOTE_LISTEN", default_value = "127.0.0.1:5001")]
        listen: SocketAddr,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "route_quotes=info,info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let client = http::build_client().context("building HTTP client")?;
    let metadata = LifiMetadata::new(client.clone(), cli.config.lifi_api_key.clone());
    let providers = ProviderSet::from_config(&cli.config, &client);
    info!(
        same_chain = providers.same_chain.len(),
        cross_chain = providers.cross_chain.len(),
        timeout_ms = cli.config.timeout_ms,
        "providers registered"
    );
    let aggregator = Aggregator::new(Resolver::new(Arc::new(metadata)), providers).with_timeout(cli.config.timeout());

    match cli.command {
        Command::Quote {
            origin_chain,
            destination_chain,
            origin_token,
            destination_token,
            amount,
        } => {
            let list = aggregator
                .get_quotes_for_amount(&origin_chain, &destination_chain, &origin_token, &destination_token, amount)
                .await?;
            println!("{}", serde_json::to_string_pretty(&list.into_records())?);
        }
        Command::Report {
            networks,
            amounts,
            sell_token,
            buy_token,
            output,
        } => {
            let networks = if networks.is_empty() {
                REPORT_NETWORKS.iter().map(|name| name.to_string()).collect()
            } else {
                networks
            };
            let amounts = if amounts.is_empty() { REPORT_AMOUNTS.to_vec() } else { amounts };

            let entries = run_report(&aggregator, &networks, &amounts, &sell_token, &buy_token).await;
            render(&entries, &mut std::io::stdout().lock())?;
            if let Some(path) = output {
                save_to_file(&entries, &path)?;
                info!("saved report to {}", path);
            }
        }
        Command::Serve { listen } => server::serve(aggregator, listen).await?,
    }

    Ok(())
}
