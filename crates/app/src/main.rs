use std::fmt;

use api::ApiConfig;
use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::{AppServices, Clock};
use tracing_subscriber::EnvFilter;
use ui::{App, MarkupPolicy, build_app_context};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidApiUrl { raw: String, reason: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidApiUrl { raw, reason } => {
                write!(f, "invalid --api-url value {raw}: {reason}")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--api-url <url>] [--sanitize-markup] [--verbose]");
    eprintln!("  cargo run -p app -- --demo   # in-memory backend, no server needed");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --api-url http://localhost:8000/api");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  MATELOG_API_URL, MATELOG_HTTP_TIMEOUT_SECS, RUST_LOG");
}

#[derive(Debug, Default)]
struct Args {
    api_url: Option<String>,
    demo: bool,
    markup: MarkupPolicy,
    verbose: bool,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut parsed = Self::default();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--api-url" => parsed.api_url = Some(require_value(args, "--api-url")?),
                "--demo" => parsed.demo = true,
                "--sanitize-markup" => parsed.markup = MarkupPolicy::Sanitized,
                "--verbose" | "-v" => parsed.verbose = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }
        Ok(parsed)
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn build_services(args: &Args) -> Result<AppServices, Box<dyn std::error::Error>> {
    let clock = Clock::default();
    if args.demo {
        return Ok(AppServices::demo(clock));
    }

    let mut config = ApiConfig::from_env()?;
    if let Some(raw) = &args.api_url {
        config = config
            .with_base_url(raw)
            .map_err(|err| ArgsError::InvalidApiUrl {
                raw: raw.clone(),
                reason: err.to_string(),
            })?;
    }
    Ok(AppServices::http(config, clock)?)
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let args = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    init_tracing(args.verbose);
    let services = build_services(&args)?;
    let context = build_app_context(services, args.markup);
    tracing::info!(demo = args.demo, markup = ?args.markup, "launching desktop window");

    // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("MateLog")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &[&str]) -> Result<Args, ArgsError> {
        let mut iter = raw.iter().map(|s| (*s).to_string());
        Args::parse(&mut iter)
    }

    #[test]
    fn flags_are_parsed() {
        let args = parse(&["--api-url", "https://matelog.test/api", "--sanitize-markup", "-v"])
            .expect("valid flags");
        assert_eq!(args.api_url.as_deref(), Some("https://matelog.test/api"));
        assert_eq!(args.markup, MarkupPolicy::Sanitized);
        assert!(args.verbose);
        assert!(!args.demo);
    }

    #[test]
    fn missing_value_and_unknown_flag_are_rejected() {
        assert!(matches!(
            parse(&["--api-url"]),
            Err(ArgsError::MissingValue { flag: "--api-url" })
        ));
        assert!(matches!(parse(&["--db"]), Err(ArgsError::UnknownArg(arg)) if arg == "--db"));
    }

    #[test]
    fn demo_services_need_no_server() {
        let args = parse(&["--demo", "--api-url", "not a url"]).expect("valid flags");
        assert!(build_services(&args).is_ok());
    }

    #[test]
    fn bad_api_url_is_reported() {
        let args = parse(&["--api-url", "ftp://matelog.test"]).expect("valid flags");
        let err = build_services(&args).err().expect("rejected url");
        assert!(err.to_string().contains("invalid --api-url"), "{err}");
    }
}
