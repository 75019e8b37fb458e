use anyhow::{Context, Result};
use clap::Parser;
use ra_adjust::{AdjustSummary, ReportAdjuster};
use ra_core::AdjustConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "report-adjust")]
#[command(about = "Decompress an analysis report, drop unbacked functions and prune flows, in place")]
#[command(version)]
struct Cli {
    /// The report location
    report: PathBuf,

    /// Discard flows touching a file path that matches this pattern (case-insensitive, anchored at start)
    #[arg(short, long, default_value = ".*test.*")]
    pattern: String,

    /// Discard flows with a path longer than this many steps
    #[arg(
        short = 'm',
        long = "max_stack",
        visible_alias = "max-stack",
        default_value_t = 20,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    max_stack: u32,

    /// Copy the original report to original_report.json next to it before overwriting
    #[arg(long)]
    backup: bool,

    /// Pretty-print the rewritten report
    #[arg(long)]
    pretty: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn config(&self) -> AdjustConfig {
        AdjustConfig::default()
            .with_pattern(self.pattern.clone())
            .with_max_stack(self.max_stack as usize)
            .with_backup(self.backup)
            .with_pretty(self.pretty)
    }
}

fn render(summary: &AdjustSummary) {
    for diagnostic in &summary.diagnostics {
        if diagnostic.is_warning() {
            tracing::warn!("{diagnostic}");
        } else {
            tracing::info!("{diagnostic}");
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    let adjuster = ReportAdjuster::new(cli.config()).context("invalid arguments")?;
    let summary = adjuster
        .run(&cli.report)
        .with_context(|| format!("failed to adjust {}", cli.report.display()))?;
    render(&summary);

    Ok(())
}
