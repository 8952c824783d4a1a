use async_trait::async_trait;
use reqwest::Url;
use reqwest::header::{ACCEPT, HeaderMap, LINK};
use sammy_core::activity::RawActivityEvent;
use sammy_core::{ActivityEvent, Error, Result, Service};
use tracing::debug;

use crate::source::{EventPage, EventSource, PageRequest};

pub const DEFAULT_API_URL: &str = "https://api.github.com";
const API_VERSION: &str = "2022-11-28";
const MAX_ERROR_BODY: usize = 512;

/// GitHub REST client for `/users/{user}/events`
pub struct GithubClient {
    client: reqwest::Client,
    api_url: Url,
    token: Option<String>,
}

impl GithubClient {
    /// Create a client. An empty `token` sends unauthenticated requests.
    pub fn new(api_url: impl AsRef<str>, token: impl Into<String>) -> Result<Self> {
        let api_url = Url::parse(api_url.as_ref())
            .map_err(|e| Error::transport(Service::EventSource, e))?;
        if api_url.cannot_be_a_base() {
            return Err(Error::transport(
                Service::EventSource,
                format!("{} cannot be used as an API base URL", api_url),
            ));
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("sammy/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::transport(Service::EventSource, e))?;

        let token = token.into();
        Ok(Self {
            client,
            api_url,
            token: (!token.is_empty()).then_some(token),
        })
    }

    /// The user name is pushed as one path segment, so it is percent-encoded
    fn events_url(&self, request: &PageRequest) -> Url {
        let mut url = self.api_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["users", request.user.as_str(), "events"]);
            if request.public_only {
                segments.push("public");
            }
        }
        url
    }

    /// Whether a `Link` header advertises a `rel="next"` page
    fn has_next_link(headers: &HeaderMap) -> bool {
        headers
            .get_all(LINK)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(','))
            .any(|link| {
                link.split(';')
                    .skip(1)
                    .any(|param| param.trim().eq_ignore_ascii_case(r#"rel="next""#))
            })
    }
}

#[async_trait]
impl EventSource for GithubClient {
    async fn list_page(&self, request: &PageRequest) -> Result<EventPage> {
        let url = self.events_url(request);
        debug!(url = %url, page = request.page, "Fetching activity page");

        let mut builder = self
            .client
            .get(url)
            .header(ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
            .query(&[("per_page", request.per_page), ("page", request.page)]);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Error::transport(Service::EventSource, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::BadResponse {
                service: Service::EventSource,
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY).collect(),
            });
        }

        let has_next = Self::has_next_link(response.headers());
        let body = response
            .text()
            .await
            .map_err(|e| Error::transport(Service::EventSource, e))?;

        let raw: Vec<RawActivityEvent> =
            serde_json::from_str(&body).map_err(|source| Error::Decode {
                service: Service::EventSource,
                source,
            })?;

        let events = raw
            .into_iter()
            .map(ActivityEvent::from_raw)
            .collect::<Result<Vec<_>>>()?;

        Ok(EventPage { events, has_next })
    }
}
