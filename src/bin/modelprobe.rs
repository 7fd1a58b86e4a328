//! modelprobe CLI: probe every cataloged Workers AI model via MCP.
//!
//! # Environment Variables
//!
//! - `MCP_URL` — MCP endpoint URL (used when no positional argument is given)
//! - `MCP_AUTH_TOKEN` — bearer token for the endpoint (default: empty)
//! - `RUST_LOG` — log filter (default: "info")
//!
//! # Usage
//!
//! ```bash
//! modelprobe https://worker.example.dev/mcp
//! modelprobe --suite quick --threshold 100 https://worker.example.dev/mcp
//! ```
//!
//! Exits 0 when the success rate over attempted probes meets the threshold,
//! 1 when it does not, 2 on a usage or configuration error.

use std::time::Duration;

use modelprobe::{
    Catalog, FixtureRegistry, HttpTransport, IntervalPacer, ProbeRunner, RunReport,
};

/// Parsed command line.
struct Args {
    url: String,
    suite: Suite,
    threshold_percent: f64,
    delay_ms: u64,
    timeout_secs: u64,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Suite {
    Full,
    Quick,
}

const USAGE: &str = "Usage: modelprobe [OPTIONS] [MCP_URL]

Probes every cataloged Workers AI model behind an MCP endpoint.
The endpoint comes from the positional argument or the MCP_URL
environment variable; the bearer token from MCP_AUTH_TOKEN.

Options:
  --suite <full|quick>    Model suite to probe (default: full)
  --threshold <percent>   Minimum success rate for exit code 0 (default: 50)
  --delay-ms <millis>     Pause between calls (default: 200)
  --timeout <secs>        Per-call timeout (default: 120)
  -h, --help              Show this help";

fn parse_args() -> Result<Args, String> {
    let mut url = None;
    let mut suite = Suite::Full;
    let mut threshold_percent = 50.0;
    let mut delay_ms = modelprobe::probe::DEFAULT_PACE_MS;
    let mut timeout_secs = modelprobe::transport::DEFAULT_TIMEOUT_SECS;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Err(String::new()),
            "--suite" => {
                let value = args.next().ok_or("--suite requires a value")?;
                suite = match value.as_str() {
                    "full" => Suite::Full,
                    "quick" => Suite::Quick,
                    other => return Err(format!("unknown suite: {other}")),
                };
            }
            "--threshold" => {
                let value = args.next().ok_or("--threshold requires a value")?;
                threshold_percent = value
                    .parse()
                    .map_err(|_| format!("invalid threshold: {value}"))?;
            }
            "--delay-ms" => {
                let value = args.next().ok_or("--delay-ms requires a value")?;
                delay_ms = value
                    .parse()
                    .map_err(|_| format!("invalid delay: {value}"))?;
            }
            "--timeout" => {
                let value = args.next().ok_or("--timeout requires a value")?;
                timeout_secs = value
                    .parse()
                    .map_err(|_| format!("invalid timeout: {value}"))?;
            }
            other if other.starts_with('-') => {
                return Err(format!("unknown option: {other}"));
            }
            positional => {
                if url.replace(positional.to_string()).is_some() {
                    return Err("more than one endpoint URL given".to_string());
                }
            }
        }
    }

    let url = url
        .or_else(|| std::env::var("MCP_URL").ok().filter(|v| !v.is_empty()))
        .ok_or("no endpoint: pass an MCP URL or set MCP_URL")?;

    Ok(Args {
        url,
        suite,
        threshold_percent,
        delay_ms,
        timeout_secs,
    })
}

async fn run(args: Args) -> anyhow::Result<bool> {
    let catalog = match args.suite {
        Suite::Full => Catalog::full(),
        Suite::Quick => Catalog::quick(),
    };

    let transport =
        HttpTransport::from_env(&args.url).with_timeout_secs(args.timeout_secs);
    let pacer = IntervalPacer::new(Duration::from_millis(args.delay_ms));
    let mut runner =
        ProbeRunner::new(transport, FixtureRegistry::defaults()).with_pacer(pacer);

    let results = runner.run(&catalog).await?;
    let report = RunReport::summarize(&results);

    println!("{}", modelprobe::report::render(&report));

    Ok(report.meets_threshold(args.threshold_percent))
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(message) => {
            if !message.is_empty() {
                eprintln!("modelprobe: {message}\n");
            }
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    };

    match run(args).await {
        Ok(true) => std::process::exit(0),
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("modelprobe: {err}");
            std::process::exit(2);
        }
    }
}
