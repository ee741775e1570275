// Command line entry point: load bars from a local file and print indicators as JSON
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use engine::config::IndicatorSettings;
use engine::data::{parse_klines, BarCsvParser};
use engine::services::{calculate_indicator, IndicatorReport, TradingAdvice};
use engine::BarSeries;
use shared::models::TimeFrame;
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum InputFormat {
    /// Delimited text with a timestamp,open,high,low,close header
    Csv,
    /// Provider kline JSON array
    Klines,
}

#[derive(Parser, Debug)]
#[command(name = "signal-engine", about = "Technical indicators over a bar series")]
struct Cli {
    /// Bar file to read.
    input: PathBuf,

    /// Input format. Defaults to klines for .json files and csv otherwise.
    #[arg(long, value_enum)]
    format: Option<InputFormat>,

    /// CSV field delimiter.
    #[arg(long, default_value_t = ',')]
    delimiter: char,

    /// Compute a single indicator (sma, ema, bollinger, rsi, kd, macd) instead of the full report.
    #[arg(long)]
    indicator: Option<String>,

    /// JSON parameters for --indicator, e.g. '{"period": 9}'.
    #[arg(long)]
    params: Option<String>,

    /// Expected bar interval (1h, 4h, 1d, 1w, 1M); bars off that spacing are reported.
    #[arg(long)]
    interval: Option<TimeFrame>,

    /// JSON settings file for the full report and the advice snapshot.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the RSI trading-advice snapshot.
    #[arg(long, default_value_t = false)]
    advice: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => IndicatorSettings::load_from_file(path)?,
        None => IndicatorSettings::default(),
    };

    let series = load_series(&cli)?;
    info!(bars = series.len(), input = %cli.input.display(), "Loaded bar series");
    if let Some(interval) = cli.interval {
        let irregular = series.irregular_spacing(interval);
        if !irregular.is_empty() {
            warn!(
                %interval,
                count = irregular.len(),
                first = irregular[0],
                "Bars are not evenly spaced"
            );
        }
    }

    let output = if cli.advice {
        serde_json::to_value(TradingAdvice::evaluate(&series, &settings.rsi)?)?
    } else if let Some(indicator) = &cli.indicator {
        let params = match &cli.params {
            Some(raw) => serde_json::from_str(raw).context("--params must be valid JSON")?,
            None => serde_json::Value::Null,
        };
        calculate_indicator(indicator, &params, &series)?
    } else {
        serde_json::to_value(IndicatorReport::build(&series, &settings)?)?
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn load_series(cli: &Cli) -> Result<BarSeries> {
    let extension = cli.input.extension().and_then(|e| e.to_str());
    let format = cli.format.unwrap_or_else(|| match extension {
        Some("json") => InputFormat::Klines,
        _ => InputFormat::Csv,
    });

    let bars = match format {
        InputFormat::Csv => {
            let delimiter = u8::try_from(cli.delimiter)
                .context("--delimiter must be a single ASCII character")?;
            BarCsvParser::with_delimiter(delimiter).load_bars_from_csv(&cli.input)?
        }
        InputFormat::Klines => {
            let json = fs::read_to_string(&cli.input)
                .with_context(|| format!("Failed to read {}", cli.input.display()))?;
            parse_klines(&json)?
        }
    };
    Ok(BarSeries::new(bars)?)
}
