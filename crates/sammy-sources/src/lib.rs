pub mod fetcher;
pub mod github;
pub mod source;

pub use fetcher::{DEFAULT_PER_PAGE, EventFetcher, FetchOptions};
pub use github::GithubClient;
pub use source::{EventPage, EventSource, PageRequest};
