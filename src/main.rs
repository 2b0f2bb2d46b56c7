use std::process;

use clap::error::ErrorKind;
use clap::Parser;

use container_healthcheck::{ProbeConfig, ProbeExecutor};

const PROGRAM_NAME: &str = "Container Health Check";
const PROGRAM_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Single-shot HTTP health probe for container runtimes.
///
/// Performs exactly one request, never retries, and imposes no timeout of
/// its own; the invoking supervisor is expected to enforce one.
#[derive(Parser, Debug)]
#[command(name = "healthcheck", version, about = "Single-shot HTTP health probe for container runtimes")]
struct Args {
    /// Target URL to probe
    url: String,

    /// Expected status code (strict mode)
    #[arg(short = 'e', long = "expect", default_value_t = 200)]
    expect: u16,

    /// Treat any 2xx status as success instead of an exact match
    #[arg(long = "any-success")]
    any_success: bool,

    /// HTTP method to use
    #[arg(short = 'X', long = "method", default_value = "GET")]
    method: String,

    /// SOCKS5 proxy endpoint as IP:PORT
    #[arg(short = 'p', long = "proxy")]
    proxy: Option<String>,
}

#[tokio::main]
async fn main() {
    env_logger::init();
    process::exit(run().await);
}

// Every failure path maps to exit code 1, a matched probe to 0. The exit
// code is the whole machine-readable surface; the single output line is
// only for humans reading container logs.
async fn run() -> i32 {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                print!("{}", err);
                return 0;
            }
            _ => {
                eprintln!("{}, v{}", PROGRAM_NAME, PROGRAM_VERSION);
                eprint!("{}", err);
                return 1;
            }
        },
    };

    let config = match ProbeConfig::from_args(
        &args.url,
        &args.method,
        args.expect,
        args.any_success,
        args.proxy.as_deref(),
    ) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err);
            return 1;
        }
    };

    let policy = config.policy;
    let executor = ProbeExecutor::new(config);

    match executor.execute().await {
        Ok(report) => {
            println!("{}", report.render(policy));
            if report.matched {
                0
            } else {
                1
            }
        }
        Err(err) => {
            eprintln!("{}", err);
            1
        }
    }
}
