//! Feed assembly and summarization
//!
//! One run: fetch -> render -> register tokens -> mask -> summarize -> unmask.
//! Every step needs the complete output of the one before it, so the run is
//! strictly sequential. The mask table lives for exactly one run.

pub mod summarizer;

use std::sync::Arc;

use sammy_core::{DuplicatePolicy, Error, Result, Service, TimeWindow};
use sammy_security::{Masker, NamesGenerator, PseudonymGenerator};
use sammy_sources::EventFetcher;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

pub use summarizer::{OpenAiBackend, SummaryBackend, build_prompt};

/// Summary length used when none is configured
pub const DEFAULT_MAX_TOKENS: u32 = 200;

/// What to summarize
#[derive(Debug, Clone)]
pub struct SummaryRequest {
    pub user: String,
    pub public_only: bool,
    pub window: TimeWindow,
}

/// Per-run settings, resolved from configuration once
#[derive(Debug, Clone, Copy)]
pub struct SummarizeOptions {
    /// Output budget handed to the backend
    pub max_tokens: u32,
    pub on_duplicate: DuplicatePolicy,
}

impl Default for SummarizeOptions {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
            on_duplicate: DuplicatePolicy::default(),
        }
    }
}

/// The masked activity feed of one run
#[derive(Debug, Clone)]
pub struct Feed {
    pub masked_text: String,
    pub event_count: usize,
    /// Distinct tokens registered for masking
    pub token_count: usize,
}

pub struct FeedAssembler {
    fetcher: EventFetcher,
    backend: Arc<dyn SummaryBackend>,
    pseudonyms: Arc<dyn PseudonymGenerator>,
    options: SummarizeOptions,
}

impl FeedAssembler {
    pub fn new(
        fetcher: EventFetcher,
        backend: Arc<dyn SummaryBackend>,
        options: SummarizeOptions,
    ) -> Self {
        Self {
            fetcher,
            backend,
            pseudonyms: Arc::new(NamesGenerator::new()),
            options,
        }
    }

    pub fn with_pseudonyms(mut self, pseudonyms: Arc<dyn PseudonymGenerator>) -> Self {
        self.pseudonyms = pseudonyms;
        self
    }

    /// Fetch, render and mask the feed without contacting the summarizer
    pub async fn build_feed(
        &self,
        request: &SummaryRequest,
        cancel: &CancellationToken,
    ) -> Result<Feed> {
        let (feed, _) = self.assemble(request, cancel).await?;
        Ok(feed)
    }

    /// Summarize `request.user`'s activity inside `request.window`
    pub async fn summarize(
        &self,
        request: &SummaryRequest,
        cancel: &CancellationToken,
    ) -> Result<String> {
        let (feed, masker) = self.assemble(request, cancel).await?;
        let prompt = build_prompt(&feed.masked_text);

        info!(
            events = feed.event_count,
            max_tokens = self.options.max_tokens,
            "Requesting summary"
        );

        let candidates = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(Error::Cancelled),
            result = self.backend.complete(&prompt, self.options.max_tokens) => result?,
        };

        let summary = candidates
            .into_iter()
            .next()
            .ok_or(Error::EmptyResult(Service::Summarizer))?;

        Ok(masker.unmask_string(summary.trim()))
    }

    async fn assemble(
        &self,
        request: &SummaryRequest,
        cancel: &CancellationToken,
    ) -> Result<(Feed, Masker)> {
        let events = self
            .fetcher
            .fetch_events(
                &request.user,
                request.public_only,
                &request.window,
                cancel,
            )
            .await?;

        info!(events = events.len(), "Making feed");

        let mut masker = Masker::new(self.pseudonyms.clone(), self.options.on_duplicate);
        let mut text = String::new();
        for event in &events {
            let rendered = sammy_core::render::render(event);
            debug!(
                kind = event.kind(),
                tokens = rendered.tokens.len(),
                "Rendered event"
            );
            for token in &rendered.tokens {
                masker.register(token)?;
            }
            text.push_str(&rendered.body);
        }

        let feed = Feed {
            masked_text: masker.mask_string(&text),
            event_count: events.len(),
            token_count: masker.len(),
        };
        Ok((feed, masker))
    }
}
