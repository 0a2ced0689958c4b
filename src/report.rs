use std::fs::File;
use std::io::{BufWriter, Write};
use std::time::Duration;

use anyhow::{anyhow, Result};
use serde::Serialize;
use tracing::{info, warn};

use crate::aggregator::Aggregator;
use crate::config::REPORT_NETWORKS;
use crate::models::QuoteRecord;

/// Pause between networks to stay inside public rate limits.
const NETWORK_PAUSE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportEntry {
    pub network: String,
    pub amount: f64,
    pub sell_token: String,
    pub buy_token: String,
    pub quotes: Vec<QuoteRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Same-chain `sell_token -> buy_token` quotes for every network and amount.
/// Unknown networks are skipped; a failed resolution is recorded and the run
/// continues.
pub async fn run_report(
    aggregator: &Aggregator,
    networks: &[String],
    amounts: &[f64],
    sell_token: &str,
    buy_token: &str,
) -> Vec<ReportEntry> {
    let mut entries = Vec::with_capacity(networks.len() * amounts.len());

    for (i, network) in networks.iter().enumerate() {
        if !REPORT_NETWORKS.iter().any(|name| name.eq_ignore_ascii_case(network)) {
            warn!(network = %network, "skipping unknown network");
            continue;
        }
        if i > 0 {
            tokio::time::sleep(NETWORK_PAUSE).await;
        }

        for &amount in amounts {
            let result = aggregator
                .get_quotes_for_amount(network, network, sell_token, buy_token, amount)
                .await;
            let (quotes, error) = match result {
                Ok(list) => (list.into_records(), None),
                Err(e) => {
                    warn!(network = %network, amount, error = %e, "report row failed");
                    (Vec::new(), Some(e.to_string()))
                }
            };
            entries.push(ReportEntry {
                network: network.clone(),
                amount,
                sell_token: sell_token.to_string(),
                buy_token: buy_token.to_string(),
                quotes,
                error,
            });
        }
    }

    info!(rows = entries.len(), "report complete");
    entries
}

/// Plain-text rendering, one block per (network, amount).
pub fn render(entries: &[ReportEntry], out: &mut impl Write) -> std::io::Result<()> {
    for entry in entries {
        writeln!(
            out,
            "\nQuotes for {} for amount {} {} -> {}:",
            entry.network, entry.amount, entry.sell_token, entry.buy_token
        )?;
        if let Some(err) = &entry.error {
            writeln!(out, "  error: {}", err)?;
        } else if entry.quotes.is_empty() {
            writeln!(out, "  no quotes")?;
        } else {
            writeln!(
                out,
                "  {:<10} {:>24} {:>24} {:>12} {:>8}",
                "project", "expectedAmount", "minAmount", "efficiency", "time"
            )?;
            for q in &entry.quotes {
                let min_amount = q
                    .min_amount
                    .map(|min| format!("{:.8}", min))
                    .unwrap_or_else(|| "-".to_string());
                writeln!(
                    out,
                    "  {:<10} {:>24.8} {:>24} {:>12} {:>8}",
                    q.project, q.expected_amount, min_amount, q.efficiency, q.time
                )?;
            }
        }
        writeln!(out, "\n{}", "=".repeat(50))?;
    }
    Ok(())
}

/// Save a report as pretty JSON.
pub fn save_to_file<T: Serialize>(data: &T, path: &str) -> Result<()> {
    let file = File::create(path).map_err(|e| anyhow!("Failed to create report file {}: {}", path, e))?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, data).map_err(|e| anyhow!("Failed to write report to {}: {}", path, e))?;
    Ok(())
}
