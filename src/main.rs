use clap::{Parser, Subcommand};
use nextdate::{next_date_with, Date, DateError, NextDateError, Rule, RuleError, Strictness};

#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    LibraryError(#[from] NextDateError),

    #[error("{0}")]
    RuleError(#[from] RuleError),

    #[error("invalid 'now' date format")]
    InvalidNow(#[source] DateError),
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log what is being computed to stderr. `RUST_LOG` takes precedence.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
#[command(arg_required_else_help(true))]
enum Commands {
    /// Prints the next date after `--now` for a task starting on `--date` that repeats by
    /// `--repeat`.
    ///
    /// Rules are `d <N>` (every N days, 1-400), `y` (yearly), `w <W,...>` (weekdays, 1=Monday to
    /// 7=Sunday) and `m <D,...> [<M,...>]` (days of month 1-31, -1 for last, -2 for
    /// second-to-last, optionally only in months 1-12).
    Next {
        /// The task's start date
        #[arg(short, long, value_name = "YYYYMMDD")]
        date: String,

        /// The repeat rule
        #[arg(short, long, value_name = "RULE")]
        repeat: String,

        /// The reference date. Defaults to today's local date.
        #[arg(short, long, env = "NEXTDATE_NOW", value_name = "YYYYMMDD")]
        now: Option<String>,

        /// Reject rule tokens that carry no meaning instead of ignoring them
        #[arg(short, long, env = "NEXTDATE_STRICT")]
        strict: bool,
    },

    /// Validates a repeat rule and prints it in canonical form
    Check {
        /// The repeat rule
        rule: String,

        /// Reject rule tokens that carry no meaning instead of ignoring them
        #[arg(short, long, env = "NEXTDATE_STRICT")]
        strict: bool,
    },
}

fn strictness(strict: bool) -> Strictness {
    if strict {
        Strictness::Strict
    } else {
        Strictness::Lenient
    }
}

type Output = (String, i32);

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(?cli, "parsed arguments");

    match do_work(cli) {
        Ok((output, exit_code)) => {
            println!("{output}");
            std::process::exit(exit_code);
        }
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}

fn do_work(cli: Cli) -> Result<Output, CliError> {
    match cli.command {
        Some(Commands::Next {
            date,
            repeat,
            now,
            strict,
        }) => {
            let now = match now {
                Some(now) => now.parse::<Date>().map_err(CliError::InvalidNow)?,
                None => Date::local_today(),
            };
            let next = next_date_with(&now, &date, &repeat, strictness(strict))?;
            Ok((next, 0))
        }
        Some(Commands::Check { rule, strict }) => {
            let rule = Rule::parse(&rule, strictness(strict))?;
            Ok((rule.to_string(), 0))
        }
        None => unreachable!("clap should catch this no-subcommand case"),
    }
}
