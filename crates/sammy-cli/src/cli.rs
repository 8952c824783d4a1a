use std::path::PathBuf;

use clap::Parser;
use sammy_core::TimeWindow;
use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime};

/// Window length when `--from` is not given
const DEFAULT_SPAN: Duration = Duration::hours(24);

#[derive(Parser, Debug)]
#[command(name = "sammy")]
#[command(about = "Summarize a GitHub user's recent activity", long_about = None)]
#[command(version)]
pub struct Cli {
    /// GitHub user to summarize (default from config: default_user)
    #[arg(long)]
    pub user: Option<String>,

    /// Only include public events
    #[arg(long)]
    pub public: bool,

    /// Window start, RFC 3339 (default: 24 hours before --to)
    #[arg(long, value_parser = parse_timestamp)]
    pub from: Option<OffsetDateTime>,

    /// Window end, RFC 3339 (default: now)
    #[arg(long, value_parser = parse_timestamp)]
    pub to: Option<OffsetDateTime>,

    /// Maximum summary length in tokens (default from config: 200)
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Config file (default: platform config dir)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the masked feed instead of summarizing it
    #[arg(long)]
    pub feed_only: bool,

    /// Verbose logging to stderr
    #[arg(short, long)]
    pub verbose: bool,

    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: String,

    #[arg(long, env = "OPEN_AI_TOKEN", hide_env_values = true)]
    pub openai_token: Option<String>,
}

impl Cli {
    pub fn window(&self, now: OffsetDateTime) -> sammy_core::Result<TimeWindow> {
        let end = self.to.unwrap_or(now);
        match self.from {
            Some(start) => TimeWindow::new(start, end),
            None => TimeWindow::ending_at(end, DEFAULT_SPAN),
        }
    }
}

fn parse_timestamp(value: &str) -> Result<OffsetDateTime, String> {
    OffsetDateTime::parse(value, &Rfc3339)
        .map_err(|e| format!("expected an RFC 3339 timestamp like 2024-03-01T12:00:00Z: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use time::macros::datetime;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["sammy", "--github-token", "ghp_test"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags() {
        let cli = parse(&[
            "--user",
            "octocat",
            "--public",
            "--max-tokens",
            "50",
            "--feed-only",
        ]);
        assert_eq!(cli.user.as_deref(), Some("octocat"));
        assert!(cli.public);
        assert_eq!(cli.max_tokens, Some(50));
        assert!(cli.feed_only);
        assert_eq!(cli.github_token, "ghp_test");
    }

    #[test]
    fn test_default_window_is_last_day() {
        let now = datetime!(2024-03-02 08:30 UTC);
        let window = parse(&[]).window(now).unwrap();
        assert_eq!(window.end(), now);
        assert_eq!(window.start(), datetime!(2024-03-01 08:30 UTC));
    }

    #[test]
    fn test_explicit_window() {
        let cli = parse(&[
            "--from",
            "2024-03-01T00:00:00Z",
            "--to",
            "2024-03-01T06:00:00+02:00",
        ]);
        let window = cli.window(OffsetDateTime::now_utc()).unwrap();
        assert_eq!(window.start(), datetime!(2024-03-01 00:00 UTC));
        assert_eq!(window.end(), datetime!(2024-03-01 04:00 UTC));
    }

    #[test]
    fn test_from_only_ends_now() {
        let now = datetime!(2024-03-02 00:00 UTC);
        let cli = parse(&["--from", "2024-03-01T00:00:00Z"]);
        let window = cli.window(now).unwrap();
        assert_eq!(window.end(), now);
    }

    #[test]
    fn test_inverted_window() {
        let cli = parse(&[
            "--from",
            "2024-03-02T00:00:00Z",
            "--to",
            "2024-03-01T00:00:00Z",
        ]);
        assert!(cli.window(OffsetDateTime::now_utc()).is_err());
    }

    #[test]
    fn test_bad_timestamp() {
        let result = Cli::try_parse_from([
            "sammy",
            "--github-token",
            "x",
            "--from",
            "yesterday",
        ]);
        assert!(result.is_err());
    }
}
