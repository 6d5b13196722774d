//! Command-line argument parsing.
//!
//! Argument-count mistakes and unknown actions are the only failures reported
//! as plain text with a non-zero exit code. Everything after parsing answers
//! with a JSON document.

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use std::ffi::OsString;

pub const USAGE: &str = "Usage: issue-notifier confirm <phone_number> <issue_json_or_path>
       issue-notifier alert <issue_json_or_path>
Actions: confirm, alert
Example: issue-notifier confirm +919923410767 '{\"id\":\"TEST-001\",\"category\":\"roads-transport\"}'";

/// Relays civic issue notifications over WhatsApp.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub action: Action,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Action {
    /// Send a submission confirmation to the reporter's WhatsApp number.
    Confirm {
        /// Reporter's phone number, with country code.
        phone_number: String,
        /// Issue record as inline JSON or a path to a JSON file.
        issue: String,
        /// Ignored.
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
        extra: Vec<String>,
    },
    /// Send a new-issue alert to the configured authority number.
    Alert {
        /// Issue record as inline JSON or a path to a JSON file.
        issue: String,
        /// Ignored.
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
        extra: Vec<String>,
    },
}

/// What the process should do after looking at its arguments.
#[derive(Debug, PartialEq, Eq)]
pub enum Parsed {
    Run(Action),
    Exit { output: String, code: i32 },
}

pub fn parse<I, T>(args: I) -> Parsed
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();

    match Cli::try_parse_from(&args) {
        Ok(cli) => Parsed::Run(cli.action),
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => Parsed::Exit {
                output: e.to_string().trim_end().to_string(),
                code: 0,
            },
            ErrorKind::InvalidSubcommand => {
                let action = args
                    .get(1)
                    .map(|a| a.to_string_lossy().into_owned())
                    .unwrap_or_default();

                Parsed::Exit {
                    output: format!(
                        "Unknown action: {}\nAvailable actions: confirm, alert",
                        action
                    ),
                    code: 1,
                }
            }
            _ => Parsed::Exit {
                output: missing_arguments(args.get(1)),
                code: 1,
            },
        },
    }
}

fn missing_arguments(action: Option<&OsString>) -> String {
    match action.and_then(|a| a.to_str()) {
        Some("confirm") => {
            "Error: Phone number and issue data required for confirmation".to_string()
        }
        Some("alert") => "Error: Issue data required for authority alert".to_string(),
        _ => USAGE.to_string(),
    }
}
