//! tdash - command line front end for the test results dashboard.
//!
//! Usage:
//!   tdash stats
//!   tdash trends [--days N]
//!   tdash runs [--status S] [--suite-id ID] [--from DATE] [--to DATE] [--q TEXT] [--limit N] [--offset N]
//!   tdash run --id <run-id>
//!   tdash suites
//!   tdash suite --id <suite-id>
//!   tdash trigger --suite-id <suite-id>
//!   tdash dashboard

use std::env;

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::json;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;
use uuid::Uuid;

use tdash_lib::api::ApiClient;
use tdash_lib::config::Config;
use tdash_lib::error::DashboardResult;
use tdash_lib::metrics;
use tdash_lib::models::RunStatus;
use tdash_lib::query::{QueryChange, RunsQuery};
use tdash_lib::services::DashboardSnapshot;

/// Parsed command line.
#[derive(Debug, PartialEq)]
enum Command {
    Stats,
    Trends { days: Option<u32> },
    Runs(QueryChange),
    Run { id: Uuid },
    Suites,
    Suite { id: Uuid },
    Trigger { suite_id: Uuid },
    Dashboard,
    Help,
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout stays valid JSON
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }

    let args: Vec<String> = env::args().collect();
    let command = match parse_command(args.get(1..).unwrap_or_default()) {
        Ok(command) => command,
        Err(message) => {
            eprintln!("Error: {}", message);
            print_usage();
            std::process::exit(2);
        }
    };

    if command == Command::Help {
        print_usage();
        return;
    }

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    if config.is_development() {
        warn!("Running in DEVELOPMENT mode against {}", config.api_url);
    }

    let client = match ApiClient::new(&config.api()) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create API client: {}", e);
            std::process::exit(1);
        }
    };
    info!(api_url = %client.base_url(), environment = %config.environment, "client ready");

    if let Err(e) = run(command, &client, &config).await {
        eprintln!("Error: {}", e.user_message());
        std::process::exit(1);
    }
}

async fn run(command: Command, client: &ApiClient, config: &Config) -> DashboardResult<()> {
    match command {
        Command::Stats => {
            let stats = client.get_dashboard_stats().await?;
            print_json(&json!({
                "stats": stats,
                "distribution": stats.distribution(),
                "pass_rate_tone": stats.pass_rate_tone(),
            }))
        }
        Command::Trends { days } => {
            let trends = client
                .get_dashboard_trends(days.unwrap_or(config.trend_days))
                .await?;
            print_json(&trends.series()?)
        }
        Command::Runs(change) => {
            let query = RunsQuery::new(config.page_size, 0)?.with_change(change)?;
            let page = client.list_test_runs(&query).await?;
            print_json(&json!({
                "showing": page.showing_range(),
                "has_next": page.has_next(),
                "has_previous": page.has_previous(),
                "page": page,
            }))
        }
        Command::Run { id } => {
            let detail = client.get_test_run(id).await?;
            print_json(&json!({
                "progress_percentage": detail.progress_percentage(),
                "case_counts": metrics::count_cases(&detail.test_cases),
                "run": detail,
            }))
        }
        Command::Suites => print_json(&client.list_test_suites().await?),
        Command::Suite { id } => print_json(&client.get_test_suite(id).await?),
        Command::Trigger { suite_id } => {
            let detail = client.trigger_test_run(suite_id).await?;
            info!(run_id = %detail.id, status = %detail.status, "test run triggered");
            print_json(&detail)
        }
        Command::Dashboard => {
            let snapshot = DashboardSnapshot::load(client, config.trend_days).await?;
            print_json(&json!({
                "trend_series": snapshot.trend_series()?,
                "distribution": snapshot.distribution(),
                "pass_rate_tone": snapshot.pass_rate_tone(),
                "snapshot": snapshot,
            }))
        }
        Command::Help => {
            print_usage();
            Ok(())
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> DashboardResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Parse arguments after the program name.
fn parse_command(args: &[String]) -> Result<Command, String> {
    let Some(name) = args.first() else {
        return Err("missing command".to_string());
    };
    let flags = parse_flags(&args[1..])?;

    let command = match name.as_str() {
        "stats" => Command::Stats,
        "trends" => Command::Trends {
            days: flag_value(&flags, "--days", parse_number::<u32>)?,
        },
        "runs" | "ls" => Command::Runs(parse_runs_change(&flags)?),
        "run" => Command::Run {
            id: required(&flags, "--id")?,
        },
        "suites" => Command::Suites,
        "suite" => Command::Suite {
            id: required(&flags, "--id")?,
        },
        "trigger" => Command::Trigger {
            suite_id: required(&flags, "--suite-id")?,
        },
        "dashboard" => Command::Dashboard,
        "help" | "--help" | "-h" => Command::Help,
        other => return Err(format!("unknown command: {}", other)),
    };

    Ok(command)
}

/// Split `--flag value` pairs.
fn parse_flags(args: &[String]) -> Result<Vec<(String, String)>, String> {
    let mut flags = Vec::new();
    let mut i = 0;
    while i < args.len() {
        let flag = &args[i];
        if !flag.starts_with("--") {
            return Err(format!("unexpected argument: {}", flag));
        }
        match args.get(i + 1) {
            Some(value) => flags.push((flag.clone(), value.clone())),
            None => return Err(format!("{} requires a value", flag)),
        }
        i += 2;
    }
    Ok(flags)
}

fn flag_value<T>(
    flags: &[(String, String)],
    name: &str,
    parse: fn(&str, &str) -> Result<T, String>,
) -> Result<Option<T>, String> {
    flags
        .iter()
        .rev()
        .find(|(flag, _)| flag == name)
        .map(|(_, value)| parse(name, value))
        .transpose()
}

fn required(flags: &[(String, String)], name: &str) -> Result<Uuid, String> {
    flag_value(flags, name, parse_uuid)?.ok_or_else(|| format!("{} is required", name))
}

fn parse_runs_change(flags: &[(String, String)]) -> Result<QueryChange, String> {
    const KNOWN: [&str; 7] = [
        "--status",
        "--suite-id",
        "--from",
        "--to",
        "--q",
        "--limit",
        "--offset",
    ];
    if let Some((flag, _)) = flags.iter().find(|(flag, _)| !KNOWN.contains(&flag.as_str())) {
        return Err(format!("unknown option for runs: {}", flag));
    }

    let mut change = QueryChange::new();
    if let Some(status) = flag_value(flags, "--status", parse_status)? {
        change = change.status(Some(status));
    }
    if let Some(suite_id) = flag_value(flags, "--suite-id", parse_uuid)? {
        change = change.suite_id(Some(suite_id));
    }
    if let Some(from) = flag_value(flags, "--from", parse_date)? {
        change = change.start_date(Some(from));
    }
    if let Some(to) = flag_value(flags, "--to", parse_date)? {
        change = change.end_date(Some(to));
    }
    if let Some((_, q)) = flags.iter().rev().find(|(flag, _)| flag == "--q") {
        change = change.search(Some(q));
    }
    if let Some(limit) = flag_value(flags, "--limit", parse_number::<u32>)? {
        change = change.limit(limit);
    }
    if let Some(offset) = flag_value(flags, "--offset", parse_number::<u64>)? {
        change = change.offset(offset);
    }
    Ok(change)
}

fn parse_uuid(name: &str, value: &str) -> Result<Uuid, String> {
    Uuid::parse_str(value).map_err(|_| format!("{} must be a UUID, got '{}'", name, value))
}

fn parse_status(name: &str, value: &str) -> Result<RunStatus, String> {
    RunStatus::parse(value).ok_or_else(|| {
        format!(
            "{} must be one of running, passed, failed; got '{}'",
            name, value
        )
    })
}

fn parse_date(name: &str, value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| format!("{} must be a date (YYYY-MM-DD), got '{}'", name, value))
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, String> {
    value
        .parse::<T>()
        .map_err(|_| format!("{} must be a number, got '{}'", name, value))
}

fn print_usage() {
    eprintln!(
        r#"tdash - test results dashboard client

Usage:
  tdash <command> [options]

Commands:
  stats                          Show dashboard statistics
  trends [--days N]              Show daily pass/fail trend (1-30 days)
  runs [options]                 List test runs
      --status <running|passed|failed>
      --suite-id <ID>
      --from <YYYY-MM-DD>
      --to <YYYY-MM-DD>
      --q <TEXT>                 Match run id or suite name
      --limit <N>                Rows per page (1-100)
      --offset <N>
  run --id <ID>                  Show a test run with its test cases
  suites                         List test suites
  suite --id <ID>                Show a test suite with recent runs
  trigger --suite-id <ID>        Run a test suite
  dashboard                      Load the full overview
  help                           Show this help message

Environment:
  TDASH_API_URL                  API base URL (default: http://localhost:8000)
  TDASH_HTTP_TIMEOUT_SECS        Request timeout in seconds
  RUST_LOG                       Log filter (logs go to stderr)"#
    );
}
