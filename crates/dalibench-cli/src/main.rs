use clap::Parser;
use dalibench::{Bench, BenchConfig, run_startup};
use dalibench_model::ControlGear;
use miette::{IntoDiagnostic, Result};
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dalibench", about = "DALI control-gear startup conformance bench")]
struct Cli {
    /// Waveform trace output path
    #[arg(long, default_value = "startup.vcd")]
    vcd: PathBuf,

    /// Optional TOML timing configuration (clock_hz, bit_rate)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Skip waveform capture
    #[arg(long)]
    no_trace: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path).into_diagnostic()?;
            BenchConfig::from_toml(&text).into_diagnostic()?
        }
        None => BenchConfig::default(),
    };
    let bit_time = config.bit_time().into_diagnostic()?;
    log::info!(
        "clock {} Hz, line rate {} bit/s, {bit_time} cycles per bit",
        config.clock_hz,
        config.bit_rate
    );

    let gear = ControlGear::new(bit_time);
    let mut bench = Bench::new(gear, &config).into_diagnostic()?;
    if !cli.no_trace {
        bench.record_vcd(&cli.vcd).into_diagnostic()?;
        log::info!("recording waveform to {}", cli.vcd.display());
    }

    run_startup(&mut bench).into_diagnostic()?;
    bench.finish().into_diagnostic()?;
    Ok(())
}
