//! Event source trait

use async_trait::async_trait;
use sammy_core::{ActivityEvent, Result};

/// One page request against an activity feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub user: String,
    pub public_only: bool,
    /// 1-indexed
    pub page: u32,
    pub per_page: u32,
}

/// A page of events, newest first
#[derive(Debug, Clone, Default)]
pub struct EventPage {
    pub events: Vec<ActivityEvent>,
    pub has_next: bool,
}

/// Paginated, reverse-chronological listing of a user's activity
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Fetch a single page of events
    async fn list_page(&self, request: &PageRequest) -> Result<EventPage>;
}
