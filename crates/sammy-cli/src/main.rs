mod cli;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use sammy_config::Config;
use sammy_engine::{FeedAssembler, OpenAiBackend, SummaryRequest};
use sammy_sources::{EventFetcher, GithubClient};
use time::OffsetDateTime;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::Cli::parse();

    // Initialize tracing; stdout is reserved for the summary
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: cli::Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let user = cli
        .user
        .clone()
        .or_else(|| config.default_user.clone())
        .context("No user given: pass --user or set default_user in the config file")?;
    let window = cli.window(OffsetDateTime::now_utc())?;

    let openai_token = match (&cli.openai_token, cli.feed_only) {
        (Some(token), _) => token.clone(),
        (None, true) => String::new(),
        (None, false) => anyhow::bail!("OPEN_AI_TOKEN is not set"),
    };

    let github = GithubClient::new(config.github.api_url.as_str(), cli.github_token.as_str())?;
    let fetcher = EventFetcher::new(Arc::new(github), config.github.fetch_options());
    let backend = OpenAiBackend::new(openai_token)?
        .with_api_url(config.summarizer.api_url.as_str())
        .with_model(config.summarizer.model.as_str())
        .with_temperature(config.summarizer.temperature);
    let mut options = config.summarizer.summarize_options(config.masking.on_duplicate);
    if let Some(max_tokens) = cli.max_tokens {
        options.max_tokens = max_tokens;
    }
    let assembler = FeedAssembler::new(fetcher, Arc::new(backend), options);

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling");
            on_signal.cancel();
        }
    });

    let request = SummaryRequest {
        user,
        public_only: cli.public,
        window,
    };
    info!(
        user = %request.user,
        from = %window.start(),
        to = %window.end(),
        public_only = request.public_only,
        "Generating report"
    );

    if cli.feed_only {
        let feed = assembler
            .build_feed(&request, &cancel)
            .await
            .context("Failed to build feed")?;
        info!(events = feed.event_count, tokens = feed.token_count, "Feed ready");
        print!("{}", feed.masked_text);
    } else {
        let summary = assembler
            .summarize(&request, &cancel)
            .await
            .context("Failed to summarize")?;
        println!("{}", summary);
    }

    Ok(())
}
