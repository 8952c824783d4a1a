//! Event renderer - activity events to prose
//!
//! Every identifying string that ends up in a sentence (titles, URLs,
//! repository names) is also returned as a token so it can be masked before
//! the feed leaves the process.

use tracing::debug;

use crate::activity::{
    ActivityEvent, EventPayload, ForkPayload, IssueCommentPayload, IssuesPayload, PullRequest,
    PullRequestPayload, PullRequestReviewCommentPayload, PullRequestReviewPayload, PushPayload,
};
use crate::Event;

const AN_ISSUE: &str = "an issue";
const A_PULL_REQUEST: &str = "a pull request";
const A_REPOSITORY: &str = "a repository";

/// Render one activity event into a sentence and its sensitive tokens
pub fn render(event: &ActivityEvent) -> Event {
    let mut sentence = Sentence::new(&event.actor);
    let repo = event.repo.as_deref();

    match &event.payload {
        EventPayload::Issues(p) => issues(&mut sentence, repo, p),
        EventPayload::IssueComment(p) => issue_comment(&mut sentence, repo, p),
        EventPayload::PullRequest(p) => pull_request(&mut sentence, repo, p),
        EventPayload::PullRequestReview(p) => pull_request_review(&mut sentence, repo, p),
        EventPayload::PullRequestReviewComment(p) => {
            pull_request_review_comment(&mut sentence, repo, p)
        }
        EventPayload::Push(p) => push(&mut sentence, repo, p),
        EventPayload::Watch(_) => watch(&mut sentence, repo),
        EventPayload::Fork(p) => fork(&mut sentence, repo, p),
        EventPayload::Unknown { kind } => {
            debug!(kind = %kind, event_id = %event.id, "Rendering unhandled event kind");
            return Event::new(
                event.created_at,
                format!("unhandled event {}\n", kind),
                Vec::new(),
            );
        }
    }

    let (body, tokens) = sentence.finish();
    Event::new(event.created_at, body, tokens)
}

fn issues(s: &mut Sentence, repo: Option<&str>, p: &IssuesPayload) {
    s.action(&p.action);
    s.subject("issue", AN_ISSUE, p.issue.title.as_deref());
    s.location(repo, p.issue.html_url.as_deref());
}

fn issue_comment(s: &mut Sentence, repo: Option<&str>, p: &IssueCommentPayload) {
    s.action("commented on");
    if p.issue.pull_request.is_some() {
        s.subject("pull request", A_PULL_REQUEST, p.issue.title.as_deref());
    } else {
        s.subject("issue", AN_ISSUE, p.issue.title.as_deref());
    }
    let url = p
        .comment
        .as_ref()
        .and_then(|c| c.html_url.as_deref())
        .or(p.issue.html_url.as_deref());
    s.location(repo, url);
}

fn pull_request(s: &mut Sentence, repo: Option<&str>, p: &PullRequestPayload) {
    let verb = match p.action.as_str() {
        "closed" if p.pull_request.merged == Some(true) => "merged",
        other => other,
    };
    s.action(verb);
    pull_request_subject(s, repo, &p.pull_request, None);
}

fn pull_request_review(s: &mut Sentence, repo: Option<&str>, p: &PullRequestReviewPayload) {
    let state = p.review.state.as_deref().unwrap_or_default();
    let verb = if state.eq_ignore_ascii_case("approved") {
        "approved"
    } else if state.eq_ignore_ascii_case("changes_requested") {
        "requested changes on"
    } else {
        "reviewed"
    };
    s.action(verb);
    pull_request_subject(s, repo, &p.pull_request, p.review.html_url.as_deref());
}

fn pull_request_review_comment(
    s: &mut Sentence,
    repo: Option<&str>,
    p: &PullRequestReviewCommentPayload,
) {
    s.action("left a review comment on");
    let url = p.comment.as_ref().and_then(|c| c.html_url.as_deref());
    pull_request_subject(s, repo, &p.pull_request, url);
}

fn pull_request_subject(
    s: &mut Sentence,
    repo: Option<&str>,
    pr: &PullRequest,
    url_override: Option<&str>,
) {
    s.subject("pull request", A_PULL_REQUEST, pr.title.as_deref());
    s.location(repo, url_override.or(pr.html_url.as_deref()));
}

fn push(s: &mut Sentence, repo: Option<&str>, p: &PushPayload) {
    let count = p
        .size
        .or_else(|| (!p.commits.is_empty()).then_some(p.commits.len() as u64));
    s.action("pushed");
    match count {
        Some(1) => s.text("1 commit"),
        Some(n) => s.text(&format!("{} commits", n)),
        None => s.text("new commits"),
    }
    s.text(" to ");
    s.repo(repo);
}

fn watch(s: &mut Sentence, repo: Option<&str>) {
    s.action("starred");
    s.repo(repo);
}

fn fork(s: &mut Sentence, repo: Option<&str>, p: &ForkPayload) {
    s.action("forked");
    s.repo(repo);
    if let Some(name) = non_empty(p.forkee.full_name.as_deref()) {
        s.text(" into ");
        s.token(name);
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Accumulates `"<actor> has <action> <subject>"` alongside its tokens
struct Sentence {
    body: String,
    tokens: Vec<String>,
}

impl Sentence {
    fn new(actor: &str) -> Self {
        Self {
            body: format!("{} has", actor),
            tokens: Vec::new(),
        }
    }

    fn action(&mut self, verb: &str) {
        self.body.push(' ');
        self.body.push_str(verb);
        self.body.push(' ');
    }

    fn text(&mut self, text: &str) {
        self.body.push_str(text);
    }

    fn token(&mut self, token: &str) {
        self.body.push_str(token);
        if !self.tokens.iter().any(|t| t == token) {
            self.tokens.push(token.to_string());
        }
    }

    fn subject(&mut self, noun: &str, placeholder: &str, title: Option<&str>) {
        match non_empty(title) {
            Some(title) => {
                self.body.push_str(noun);
                self.body.push_str(" \"");
                self.token(title);
                self.body.push('"');
            }
            None => self.body.push_str(placeholder),
        }
    }

    fn repo(&mut self, repo: Option<&str>) {
        match non_empty(repo) {
            Some(repo) => self.token(repo),
            None => self.body.push_str(A_REPOSITORY),
        }
    }

    fn location(&mut self, repo: Option<&str>, url: Option<&str>) {
        if let Some(repo) = non_empty(repo) {
            self.body.push_str(" in ");
            self.token(repo);
        }
        if let Some(url) = non_empty(url) {
            self.body.push_str(", available at ");
            self.token(url);
        }
    }

    fn finish(mut self) -> (String, Vec<String>) {
        self.body.push('\n');
        (self.body, self.tokens)
    }
}
