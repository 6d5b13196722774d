use crate::cli::{Action, Parsed};
use crate::config::Config;
use crate::error::{AppError, ConfigError};
use crate::log::Logger;
use crate::notify::{Notifier, Outcome};
use anyhow::Result;
use serde_json::Value;
use std::panic::{catch_unwind, AssertUnwindSafe};

mod cli;
mod config;
mod error;
mod issue;
mod log;
mod message;
mod notify;
mod payload;
mod report;
mod whatsapp;

fn main() -> Result<()> {
    let action = match cli::parse(std::env::args_os()) {
        Parsed::Run(action) => action,
        Parsed::Exit { output, code } => {
            println!("{}", output);
            std::process::exit(code);
        }
    };

    let log = log::get_logger(config::log_file());

    std::panic::set_hook(Box::new(|info| {
        // The hook must be 'static, so it opens its own sink.
        let log = log::get_logger(config::log_file());
        log.panic(info);
    }));

    log.start();

    if let Action::Confirm { extra, .. } | Action::Alert { extra, .. } = &action {
        if !extra.is_empty() {
            log.warning(&format!("Ignoring extra arguments: {}", extra.join(" ")));
        }
    }

    let result = run(&action, &log, Config::from_env);

    println!("{}", report::render(&result));

    Ok(())
}

/// Runs one action and always comes back with the JSON document to print.
fn run<F>(action: &Action, log: &dyn Logger, load_config: F) -> Value
where
    F: FnOnce() -> Result<Config, ConfigError>,
{
    let result = catch_unwind(AssertUnwindSafe(|| execute(action, log, load_config)))
        .unwrap_or_else(|panic| Err(AppError::Internal(panic_message(panic.as_ref()))));

    match result {
        Ok(outcome) => report::outcome(&outcome),
        Err(e) => {
            log.error(&format!("{}: {}", failure_message(action), e));
            report::error(&e, failure_message(action))
        }
    }
}

fn execute<F>(action: &Action, log: &dyn Logger, load_config: F) -> Result<Outcome, AppError>
where
    F: FnOnce() -> Result<Config, ConfigError>,
{
    match action {
        Action::Confirm {
            phone_number,
            issue,
            ..
        } => {
            let issue = payload::resolve_issue(issue)?;
            let user = issue.reporter(phone_number);
            let config = load_config()?;

            Ok(Notifier::new(&config, log).send_issue_confirmation(&issue, &user))
        }
        Action::Alert { issue, .. } => {
            let issue = payload::resolve_issue(issue)?;
            let config = load_config()?;

            Ok(Notifier::new(&config, log).send_authority_alert(&issue))
        }
    }
}

fn failure_message(action: &Action) -> &'static str {
    match action {
        Action::Confirm { .. } => "Failed to send WhatsApp confirmation",
        Action::Alert { .. } => "Failed to send authority alert",
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with a non-string payload".to_string()
    }
}
