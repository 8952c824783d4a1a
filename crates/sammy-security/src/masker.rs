//! Masker - reversible token substitution table

use std::collections::HashMap;
use std::sync::Arc;

use sammy_core::{DuplicatePolicy, Error, Result};
use tracing::debug;

use crate::NamesGenerator;

/// Attempts made to find an unused pseudonym before giving up
pub const MAX_ATTEMPTS: u32 = 8;

/// Produces a replacement string for a token.
///
/// `attempt` starts at 0 and grows each time the previous candidate collided
/// with something already in the table.
pub trait PseudonymGenerator: Send + Sync {
    fn generate(&self, token: &str, attempt: u32) -> String;
}

impl<F> PseudonymGenerator for F
where
    F: Fn(&str, u32) -> String + Send + Sync,
{
    fn generate(&self, token: &str, attempt: u32) -> String {
        self(token, attempt)
    }
}

/// Bidirectional token <-> pseudonym table for a single run
pub struct Masker {
    forward: HashMap<String, String>,
    reverse: HashMap<String, String>,
    generator: Arc<dyn PseudonymGenerator>,
    policy: DuplicatePolicy,
}

impl Masker {
    pub fn new(generator: Arc<dyn PseudonymGenerator>, policy: DuplicatePolicy) -> Self {
        Self {
            forward: HashMap::new(),
            reverse: HashMap::new(),
            generator,
            policy,
        }
    }

    pub fn with_fn<F>(generator: F, policy: DuplicatePolicy) -> Self
    where
        F: Fn(&str, u32) -> String + Send + Sync + 'static,
    {
        Self::new(Arc::new(generator), policy)
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Register `token` and return its pseudonym.
    ///
    /// A token already in the table keeps its pseudonym. Under
    /// [`DuplicatePolicy::Fail`] re-registration is rejected instead.
    pub fn register(&mut self, token: &str) -> Result<String> {
        if token.is_empty() {
            return Err(Error::EmptyToken);
        }

        if let Some(existing) = self.forward.get(token) {
            return match self.policy {
                DuplicatePolicy::Ignore => Ok(existing.clone()),
                DuplicatePolicy::Fail => Err(Error::AlreadyMasked(token.to_string())),
            };
        }

        for attempt in 0..MAX_ATTEMPTS {
            let candidate = self.generator.generate(token, attempt);
            if self.is_usable(token, &candidate) {
                debug!(
                    pseudonym = %candidate,
                    attempt,
                    registered = self.forward.len() + 1,
                    "Registered masking token"
                );
                self.forward.insert(token.to_string(), candidate.clone());
                self.reverse.insert(candidate.clone(), token.to_string());
                return Ok(candidate);
            }
        }

        Err(Error::PseudonymCollision {
            token: token.to_string(),
            attempts: MAX_ATTEMPTS,
        })
    }

    /// Replace every registered token in `text` with its pseudonym
    pub fn mask_string(&self, text: &str) -> String {
        substitute(text, &self.forward)
    }

    /// Replace every pseudonym in `text` with its original token
    pub fn unmask_string(&self, text: &str) -> String {
        substitute(text, &self.reverse)
    }

    fn is_usable(&self, token: &str, candidate: &str) -> bool {
        !candidate.is_empty()
            && candidate != token
            && !self.reverse.contains_key(candidate)
            && !self.forward.contains_key(candidate)
    }
}

impl Default for Masker {
    fn default() -> Self {
        Self::new(Arc::new(NamesGenerator::new()), DuplicatePolicy::default())
    }
}

/// Substitute every key of `table` found in `text` with its value.
///
/// Keys are matched against the original text only, longest key first, and a
/// byte range claimed by one key is never matched again by another. Ties in
/// length are broken lexicographically so the result does not depend on map
/// iteration order.
fn substitute(text: &str, table: &HashMap<String, String>) -> String {
    if table.is_empty() || text.is_empty() {
        return text.to_string();
    }

    let mut keys: Vec<&str> = table.keys().map(String::as_str).collect();
    keys.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

    let mut claimed = vec![false; text.len()];
    let mut hits: Vec<(usize, usize, &str)> = Vec::new();

    for key in keys {
        let mut from = 0;
        while let Some(offset) = text[from..].find(key) {
            let start = from + offset;
            let end = start + key.len();
            if claimed[start..end].iter().any(|c| *c) {
                // A later occurrence may start inside this one
                from = next_boundary(text, start);
                continue;
            }
            claimed[start..end].iter_mut().for_each(|c| *c = true);
            hits.push((start, end, table[key].as_str()));
            from = end;
        }
    }

    hits.sort_by_key(|(start, _, _)| *start);

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for (start, end, replacement) in hits {
        out.push_str(&text[cursor..start]);
        out.push_str(replacement);
        cursor = end;
    }
    out.push_str(&text[cursor..]);
    out
}

fn next_boundary(text: &str, index: usize) -> usize {
    text[index..]
        .chars()
        .next()
        .map_or(text.len(), |c| index + c.len_utf8())
}
