use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use client_logging::LogDestination;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    /// Log to ./news_report.log only
    File,
    /// Log to the terminal
    Terminal,
    /// Log to both the terminal and ./news_report.log
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::File => LogDestination::File,
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "news-report")]
#[command(about = "Request an AI financial-news report and follow it until it is emailed", long_about = None)]
pub struct Args {
    /// Search requirement, e.g. "台積電新聞" (asked interactively when omitted)
    #[arg(long)]
    pub prompt: Option<String>,

    /// Recipient email address (asked interactively when omitted)
    #[arg(long)]
    pub email: Option<String>,

    /// RON configuration file (defaults to ./news_report.ron when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override the task endpoint base, e.g. http://localhost:8000/api/tasks
    #[arg(long)]
    pub tasks_base: Option<String>,

    /// Give up tracking the task after this many seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Where log output goes
    #[arg(long, value_enum, default_value = "file")]
    pub log: LogTarget,

    /// Log at debug level
    #[arg(long)]
    pub verbose: bool,
}

/// Returns the flag value, or asks for it on stdin.
pub fn value_or_ask(value: Option<String>, label: &str) -> io::Result<String> {
    if let Some(value) = value {
        return Ok(value);
    }
    let stdin = io::stdin();
    ask(&mut stdin.lock(), &mut io::stdout(), label)
}

fn ask(input: &mut impl BufRead, output: &mut impl Write, label: &str) -> io::Result<String> {
    write!(output, "{label}: ")?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_parse_with_defaults() {
        let args = Args::parse_from([
            "news-report",
            "--prompt",
            "台積電新聞",
            "--email",
            "a@b.com",
            "--timeout-secs",
            "60",
        ]);
        assert_eq!(args.prompt.as_deref(), Some("台積電新聞"));
        assert_eq!(args.email.as_deref(), Some("a@b.com"));
        assert_eq!(args.timeout_secs, Some(60));
        assert_eq!(args.log, LogTarget::File);
        assert!(!args.verbose);
    }

    #[test]
    fn ask_prints_label_and_strips_newline() {
        let mut input = io::Cursor::new("a@b.com\r\n");
        let mut output = Vec::new();
        let value = ask(&mut input, &mut output, "Email").unwrap();
        assert_eq!(value, "a@b.com");
        assert_eq!(String::from_utf8(output).unwrap(), "Email: ");
    }

    #[test]
    fn flag_value_skips_prompt() {
        assert_eq!(
            value_or_ask(Some("x".to_string()), "Prompt").unwrap(),
            "x"
        );
    }
}
