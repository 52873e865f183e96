pub mod cli;

use std::fs::File;
use std::io::{self, BufReader};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use cli::*;
use common::logger::{LogFormat, TraceId, child_span, init_logger, root_span};
use zigzag::{LabelCommand, SwingEvent, SwingRegistry, ZigZag, ZigZagConfig};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_format = if cli.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    init_logger("zigzag", log_format);

    match cli.command {
        Command::Replay(args) => replay(&args),
    }
}

fn replay(args: &ReplayArgs) -> anyhow::Result<()> {
    let trace_id = TraceId::default();
    let _run = root_span("replay", &trace_id).entered();

    let cfg = build_config(args, ZigZagConfig::from_env()?)?;

    let bars = child_span("read_bars").in_scope(|| -> anyhow::Result<_> {
        if args.input.as_os_str() == "-" {
            return read_bars(io::stdin().lock());
        }
        let file = File::open(&args.input)
            .with_context(|| format!("opening {}", args.input.display()))?;
        read_bars(BufReader::new(file))
    })?;

    tracing::info!(
        bars = bars.len(),
        percentage_move = cfg.detector.percentage_move,
        "replay started"
    );

    let mut registry = SwingRegistry::new(ZigZag::new(cfg.detector)?);

    let labels = cfg.labels;
    let format = args.format;
    registry.register_handler(Arc::new(move |event: &SwingEvent| {
        let cmd = LabelCommand::from_event(&labels, event);
        match render(&cmd, format) {
            Ok(line) => println!("{line}"),
            Err(e) => tracing::error!(error = %e, "failed to render label command"),
        }
    }));

    for bar in bars {
        registry
            .process_bar(bar)
            .with_context(|| format!("processing bar {}", bar.index))?;
    }

    let history = registry.detector().history();
    tracing::info!(
        swings = history.len(),
        direction = ?registry.detector().direction(),
        "replay finished"
    );

    Ok(())
}
