mod auth;
mod cli;
mod domain;
mod error;
mod http;
mod report;
mod session;
mod storage;
mod suites;
mod testing;

use std::io::{self, Write};
use std::process::ExitCode;
use std::time::Instant;

use chrono::Local;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{CliConfig, OutputFormat};
use error::AppError;
use http::client::ApiClient;
use report::RunReport;
use session::{Session, TestUser};
use testing::Ledger;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let config = CliConfig::parse();
    init_tracing(&config.log_level);

    let outcome = run(&config, &mut io::stdout()).await;
    if let Err(err) = &outcome {
        tracing::error!(error = %err, "smoke run aborted");
        eprintln!("error: {err}");
    }
    ExitCode::from(exit_status(&outcome))
}

/// 0 when every check passed, 1 when any failed, the error's code otherwise.
fn exit_status(outcome: &Result<bool, AppError>) -> u8 {
    match outcome {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(err) => err.exit_code(),
    }
}

fn init_tracing(directive: &str) {
    let filter = EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Run every group once and write the summary to `out`; `Ok(true)` when no
/// check failed.
async fn run(config: &CliConfig, out: &mut dyn Write) -> Result<bool, AppError> {
    let client = ApiClient::new(&config.base_url, config.timeout())?
        .with_default_headers(config.headers.clone());
    let text = config.output_format == OutputFormat::Text;

    let now = Local::now();
    let user = TestUser::generate(&now);
    let user_email = user.email.clone();
    let mut ledger = Ledger::new().with_echo(text).with_strict(config.strict);

    if text {
        let banner = writeln!(out, "🚀 Starting EduQuest Backend API Tests...")
            .and_then(|()| writeln!(out, "Base URL: {}", client.base_url()))
            .and_then(|()| out.flush());
        if let Err(err) = banner {
            tracing::warn!(error = %err, "failed to write banner");
        }
    }
    tracing::info!(base_url = %client.base_url(), email = %user_email, "smoke run starting");

    let started = Instant::now();
    suites::run_all(&client, &mut ledger, Session::new(user)).await;
    let duration_ms = started.elapsed().as_millis();

    let report = RunReport::from_ledger(
        &ledger,
        client.base_url(),
        &user_email,
        now.to_rfc3339(),
        duration_ms,
    );
    tracing::info!(
        passed = report.total_passed,
        failed = report.total_failed,
        duration_ms = duration_ms as u64,
        "smoke run finished"
    );

    let success = report
        .render(config.output_format, out)
        .unwrap_or_else(|err| {
            tracing::warn!(error = %err, "failed to write summary");
            report.success
        });

    if let Some(path) = &config.report_path {
        storage::save_report(path, &report)?;
    }

    Ok(success)
}
