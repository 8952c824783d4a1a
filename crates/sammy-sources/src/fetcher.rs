//! Event fetcher - paginated retrieval bounded by a time window
//!
//! Pages arrive newest first. Events newer than the window are skipped, and
//! the first event older than the window ends the whole scan: everything
//! after it on the page, and every later page, is older still.

use std::sync::Arc;

use sammy_core::{ActivityEvent, Error, Placement, Result, TimeWindow};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::source::{EventSource, PageRequest};

/// Page size used when none is configured
pub const DEFAULT_PER_PAGE: u32 = 30;

/// GitHub keeps at most this many events per user
pub const EVENT_HISTORY_LIMIT: u32 = 300;

/// Pagination limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    pub per_page: u32,
    /// Pages requested before the fetch fails with [`Error::PageLimit`]
    pub max_pages: u32,
}

impl FetchOptions {
    /// Page `per_page` events at a time, far enough to cover the whole history
    pub fn new(per_page: u32) -> Self {
        let per_page = per_page.max(1);
        Self {
            per_page,
            max_pages: EVENT_HISTORY_LIMIT.div_ceil(per_page),
        }
    }

    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self::new(DEFAULT_PER_PAGE)
    }
}

/// Outcome of scanning a single page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scan {
    /// Every event was newer than or inside the window
    Continue,
    /// An event older than the window was reached
    Exhausted,
}

/// Collect the in-window events of one page into `out`
pub fn scan_page(
    events: Vec<ActivityEvent>,
    window: &TimeWindow,
    public_only: bool,
    out: &mut Vec<ActivityEvent>,
) -> Scan {
    for event in events {
        if public_only && !event.public {
            continue;
        }
        match window.place(event.created_at) {
            Placement::After => continue,
            Placement::Within => out.push(event),
            Placement::Before => return Scan::Exhausted,
        }
    }
    Scan::Continue
}

pub struct EventFetcher {
    source: Arc<dyn EventSource>,
    options: FetchOptions,
}

impl EventFetcher {
    pub fn new(source: Arc<dyn EventSource>, options: FetchOptions) -> Self {
        Self { source, options }
    }

    /// Fetch `user`'s events inside `window`, newest first
    pub async fn fetch_events(
        &self,
        user: &str,
        public_only: bool,
        window: &TimeWindow,
        cancel: &CancellationToken,
    ) -> Result<Vec<ActivityEvent>> {
        let mut collected = Vec::new();
        let mut page = 1;

        loop {
            if page > self.options.max_pages {
                warn!(
                    max_pages = self.options.max_pages,
                    collected = collected.len(),
                    "Page limit reached while the window was still open"
                );
                return Err(Error::PageLimit {
                    pages: self.options.max_pages,
                });
            }

            let request = PageRequest {
                user: user.to_string(),
                public_only,
                page,
                per_page: self.options.per_page,
            };

            let batch = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(Error::Cancelled),
                result = self.source.list_page(&request) => result?,
            };

            debug!(
                page,
                received = batch.events.len(),
                has_next = batch.has_next,
                "Scanning activity page"
            );

            if scan_page(batch.events, window, public_only, &mut collected) == Scan::Exhausted {
                debug!(page, "Reached event older than window start");
                break;
            }
            if !batch.has_next {
                break;
            }
            page += 1;
        }

        info!(user, events = collected.len(), "Fetched activity");
        Ok(collected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::EventPage;
    use async_trait::async_trait;
    use sammy_core::activity::{EventPayload, WatchPayload};
    use sammy_core::Service;
    use std::sync::Mutex;
    use time::macros::datetime;
    use time::{Duration, OffsetDateTime};

    const NOW: OffsetDateTime = datetime!(2024-03-01 12:00 UTC);

    fn star(id: &str, created_at: OffsetDateTime, public: bool) -> ActivityEvent {
        ActivityEvent {
            id: id.to_string(),
            actor: "octocat".to_string(),
            repo: Some("octocat/hello".to_string()),
            public,
            created_at,
            payload: EventPayload::Watch(WatchPayload { action: None }),
        }
    }

    struct PagedSource {
        pages: Vec<Vec<ActivityEvent>>,
        requested: Mutex<Vec<u32>>,
        fail_on: Option<u32>,
    }

    impl PagedSource {
        fn new(pages: Vec<Vec<ActivityEvent>>) -> Self {
            Self {
                pages,
                requested: Mutex::new(Vec::new()),
                fail_on: None,
            }
        }

        fn requested(&self) -> Vec<u32> {
            self.requested.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl EventSource for PagedSource {
        async fn list_page(&self, request: &PageRequest) -> Result<EventPage> {
            self.requested.lock().unwrap().push(request.page);
            if self.fail_on == Some(request.page) {
                return Err(Error::BadResponse {
                    service: Service::EventSource,
                    status: 502,
                    body: String::new(),
                });
            }
            let index = (request.page - 1) as usize;
            Ok(EventPage {
                events: self.pages.get(index).cloned().unwrap_or_default(),
                has_next: index + 1 < self.pages.len(),
            })
        }
    }

    fn ids(events: &[ActivityEvent]) -> Vec<&str> {
        events.iter().map(|e| e.id.as_str()).collect()
    }

    async fn fetch(
        source: Arc<PagedSource>,
        public_only: bool,
        window: TimeWindow,
    ) -> Result<Vec<ActivityEvent>> {
        EventFetcher::new(source, FetchOptions::default())
            .fetch_events("octocat", public_only, &window, &CancellationToken::new())
            .await
    }

    #[tokio::test]
    async fn test_inclusive_window_newest_first() {
        let source = Arc::new(PagedSource::new(vec![vec![
            star("30m", NOW - Duration::minutes(30), true),
            star("1h", NOW - Duration::hours(1), true),
            star("2h", NOW - Duration::hours(2), true),
            star("3h", NOW - Duration::hours(3), true),
        ]]));
        let window = TimeWindow::new(NOW - Duration::hours(2), NOW - Duration::hours(1)).unwrap();

        let events = fetch(source, false, window).await.unwrap();
        assert_eq!(ids(&events), vec!["1h", "2h"]);
    }

    #[tokio::test]
    async fn test_follows_pages_until_window_start() {
        let source = Arc::new(PagedSource::new(vec![
            vec![
                star("a", NOW - Duration::minutes(10), true),
                star("b", NOW - Duration::minutes(20), true),
            ],
            vec![
                star("c", NOW - Duration::minutes(40), true),
                star("d", NOW - Duration::hours(5), true),
                star("e", NOW - Duration::hours(6), true),
            ],
            vec![star("f", NOW - Duration::hours(7), true)],
        ]));
        let window = TimeWindow::ending_at(NOW, Duration::hours(1)).unwrap();

        let events = fetch(source.clone(), false, window).await.unwrap();
        assert_eq!(ids(&events), vec!["a", "b", "c"]);
        assert_eq!(source.requested(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_stops_when_source_is_exhausted() {
        let source = Arc::new(PagedSource::new(vec![
            vec![star("a", NOW - Duration::minutes(10), true)],
            vec![star("b", NOW - Duration::minutes(20), true)],
        ]));
        let window = TimeWindow::ending_at(NOW, Duration::hours(24)).unwrap();

        let events = fetch(source.clone(), false, window).await.unwrap();
        assert_eq!(ids(&events), vec!["a", "b"]);
        assert_eq!(source.requested(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_skips_events_newer_than_window() {
        let source = Arc::new(PagedSource::new(vec![
            vec![star("future", NOW + Duration::hours(1), true)],
            vec![
                star("newer", NOW + Duration::minutes(1), true),
                star("inside", NOW - Duration::minutes(1), true),
            ],
        ]));
        let window = TimeWindow::ending_at(NOW, Duration::hours(1)).unwrap();

        let events = fetch(source, false, window).await.unwrap();
        assert_eq!(ids(&events), vec!["inside"]);
    }

    #[tokio::test]
    async fn test_public_only_drops_private_events() {
        let source = Arc::new(PagedSource::new(vec![vec![
            star("pub", NOW - Duration::minutes(5), true),
            star("priv", NOW - Duration::minutes(6), false),
            star("pub2", NOW - Duration::minutes(7), true),
        ]]));
        let window = TimeWindow::ending_at(NOW, Duration::hours(1)).unwrap();

        let events = fetch(source.clone(), true, window).await.unwrap();
        assert_eq!(ids(&events), vec!["pub", "pub2"]);

        let events = fetch(source, false, window).await.unwrap();
        assert_eq!(events.len(), 3);
    }

    #[test]
    fn test_default_limit_covers_event_history() {
        assert_eq!(FetchOptions::default().max_pages, 10);
        assert_eq!(FetchOptions::new(10).max_pages, 30);
        assert_eq!(FetchOptions::new(100).max_pages, 3);
        assert_eq!(FetchOptions::new(7).max_pages, 43);
        assert_eq!(FetchOptions::new(0), FetchOptions::new(1));
    }

    #[tokio::test]
    async fn test_page_limit_with_open_window_fails() {
        let pages = (0..5)
            .map(|i| vec![star(&i.to_string(), NOW - Duration::minutes(i), true)])
            .collect();
        let source = Arc::new(PagedSource::new(pages));
        let window = TimeWindow::ending_at(NOW, Duration::hours(1)).unwrap();
        let options = FetchOptions::new(1).with_max_pages(3);

        let err = EventFetcher::new(source.clone(), options)
            .fetch_events("octocat", false, &window, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::PageLimit { pages: 3 }));
        assert_eq!(source.requested(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_window_closed_on_last_allowed_page() {
        let source = Arc::new(PagedSource::new(vec![
            vec![star("a", NOW - Duration::minutes(1), true)],
            vec![
                star("b", NOW - Duration::minutes(2), true),
                star("old", NOW - Duration::hours(2), true),
            ],
            vec![star("older", NOW - Duration::hours(3), true)],
        ]));
        let window = TimeWindow::ending_at(NOW, Duration::hours(1)).unwrap();
        let options = FetchOptions::new(2).with_max_pages(2);

        let events = EventFetcher::new(source.clone(), options)
            .fetch_events("octocat", false, &window, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(ids(&events), vec!["a", "b"]);
        assert_eq!(source.requested(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_page_error_fails_the_fetch() {
        let mut source = PagedSource::new(vec![
            vec![star("a", NOW - Duration::minutes(1), true)],
            vec![star("b", NOW - Duration::minutes(2), true)],
        ]);
        source.fail_on = Some(2);
        let window = TimeWindow::ending_at(NOW, Duration::hours(1)).unwrap();

        let err = fetch(Arc::new(source), false, window).await.unwrap_err();
        assert!(matches!(err, Error::BadResponse { status: 502, .. }));
    }

    #[tokio::test]
    async fn test_cancelled_before_first_page() {
        let source = Arc::new(PagedSource::new(vec![vec![star(
            "a",
            NOW - Duration::minutes(1),
            true,
        )]]));
        let window = TimeWindow::ending_at(NOW, Duration::hours(1)).unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = EventFetcher::new(source.clone(), FetchOptions::default())
            .fetch_events("octocat", false, &window, &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Cancelled));
        assert!(source.requested().is_empty());
    }
}
