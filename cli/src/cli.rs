use std::io::BufRead;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};

use zigzag::{Bar, LabelCommand, ZigZagConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[clap(name = "zigzag-replay", version)]
pub struct Cli {
    /// Emit logs as JSON instead of human-readable lines
    #[clap(long, global = true)]
    pub json_logs: bool,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Replay a bar file through a detector and print label commands
    Replay(ReplayArgs),
}

#[derive(Debug, Args)]
pub struct ReplayArgs {
    /// JSON-lines file of `{"index":..,"high":..,"low":..}` records, `-` for stdin
    #[clap(long)]
    pub input: PathBuf,

    /// Reversal threshold in percent (overrides ZIGZAG_PERCENTAGE_MOVE)
    #[clap(long)]
    pub percentage_move: Option<f64>,

    /// Observations required before bars are evaluated
    #[clap(long)]
    pub warmup_bars: Option<usize>,

    /// Include the swing price in label text
    #[clap(long)]
    pub show_price: bool,

    /// Leave the percent change out of label text
    #[clap(long)]
    pub hide_percent: bool,

    #[clap(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Environment first, then command-line overrides.
pub(crate) fn build_config(
    args: &ReplayArgs,
    base: ZigZagConfig,
) -> anyhow::Result<ZigZagConfig> {
    let mut cfg = base;

    if let Some(pct) = args.percentage_move {
        cfg.detector.percentage_move = pct;
    }
    if let Some(n) = args.warmup_bars {
        cfg.detector.warmup_bars = n;
    }
    if args.show_price {
        cfg.labels.show_price = true;
    }
    if args.hide_percent {
        cfg.labels.show_percent_change = false;
    }

    cfg.detector.validate().context("invalid detector configuration")?;
    Ok(cfg)
}

/// Parse JSON-lines bars. Blank lines are skipped; errors carry the line number.
pub(crate) fn read_bars<R: BufRead>(reader: R) -> anyhow::Result<Vec<Bar>> {
    let mut bars = Vec::new();

    for (n, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("reading line {}", n + 1))?;
        if line.trim().is_empty() {
            continue;
        }

        let bar: Bar = serde_json::from_str(&line)
            .with_context(|| format!("parsing bar on line {}", n + 1))?;
        bars.push(bar);
    }

    Ok(bars)
}

/// One output line per command.
pub(crate) fn render(cmd: &LabelCommand, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string(cmd)?),
        OutputFormat::Text => Ok(match cmd {
            LabelCommand::Draw(label) => format!(
                "draw   {} @ bar {} price {} [{:?}] {}",
                label.id,
                label.bar_index,
                label.price,
                label.style.color,
                label.text.replace('\n', " | ")
            ),
            LabelCommand::Remove { id } => format!("remove {id}"),
        }),
    }
}
