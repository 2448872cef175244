use std::io::Write;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use nextbus_acquire::client::{
    ClientConfig, StopBoardClient, DEFAULT_BASE_URL, DEFAULT_PAGE_SIZE, DEFAULT_TIMEOUT_SECS,
};
use nextbus_acquire::preflight::{self, DEFAULT_PREFLIGHT_URL};
use nextbus_acquire::Report;
use nextbus_model::StopTarget;

#[derive(Parser)]
#[command(name = "nextbus")]
#[command(about = "Print the next bus arrival estimates for EMT Madrid stops")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUILD_HASH"), ")"))]
struct Cli {
    /// Log level: error, warn, info, debug, trace
    #[arg(long, default_value = "info", value_enum)]
    log_level: LogLevel,

    /// Use UTC timestamps instead of local time
    #[arg(long)]
    utc: bool,

    /// Stops to query in order, as "<id>" or "<label>=<id>" (e.g., "home=1490")
    #[arg(value_name = "STOP", default_values = ["home=1490", "gym=1778"])]
    stops: Vec<StopTarget>,

    /// Stop board endpoint
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Number of estimates to request per stop
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE, value_parser = clap::value_parser!(u32).range(1..))]
    size: u32,

    /// Request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: u64,

    /// URL fetched once at startup to check outbound HTTP
    #[arg(long, default_value = DEFAULT_PREFLIGHT_URL)]
    preflight_url: String,

    /// Skip the startup connectivity check
    #[arg(long)]
    skip_preflight: bool,

    /// Ignore HTTP(S)_PROXY and connect directly
    #[arg(long)]
    no_proxy: bool,
}

#[derive(Clone, clap::ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl Cli {
    fn client_config(&self) -> ClientConfig {
        let config = ClientConfig::new()
            .with_base_url(&self.base_url)
            .with_page_size(self.size)
            .with_timeout(Duration::from_secs(self.timeout));
        if self.no_proxy {
            config.without_proxy()
        } else {
            config
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Map log level, suppressing noisy HTML-parsing crates at debug/trace
    let level = match cli.log_level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug,selectors=warn,html5ever=warn",
        LogLevel::Trace => "trace,selectors=warn,html5ever=warn",
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    // Timestamp format: 2026-02-14 19:44:09.123 -08:00
    let time_format = "%Y-%m-%d %H:%M:%S%.3f %:z";

    if cli.utc {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_timer(tracing_subscriber::fmt::time::ChronoUtc::new(time_format.to_string()))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_timer(tracing_subscriber::fmt::time::ChronoLocal::new(time_format.to_string()))
            .init();
    }

    run(&cli).await
}

/// Check connectivity, then report every stop to stdout.
async fn run(cli: &Cli) -> Result<()> {
    let client = StopBoardClient::new(cli.client_config())?;

    if !cli.skip_preflight {
        preflight::probe(client.http(), &cli.preflight_url).await;
    }

    report_stops(&client, &cli.stops, std::io::stdout()).await?;

    Ok(())
}

/// Report each stop in turn. A stop's section, including any errors logged
/// for it, is finished before the next starts.
async fn report_stops<W: Write>(
    client: &StopBoardClient,
    stops: &[StopTarget],
    out: W,
) -> Result<W> {
    let mut report = Report::new(out);

    for target in stops {
        report.begin_stop(target)?;
        tracing::debug!(stop = %target.stop, url = %client.board_url(target.stop), "Querying stop");

        let estimates = client.fetch_estimates(target.stop).await;
        if estimates.is_empty() {
            tracing::info!(stop = %target.stop, "No estimates for stop");
        }
        report.estimates(target.stop, &estimates)?;
    }

    Ok(report.into_inner())
}
