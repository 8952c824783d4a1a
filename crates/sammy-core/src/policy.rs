//! Masking policy

use serde::{Deserialize, Serialize};

/// What registering an already-masked token does
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Return the existing pseudonym
    #[default]
    Ignore,
    /// Reject with `Error::AlreadyMasked`
    Fail,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Wrapper {
        on_duplicate: DuplicatePolicy,
    }

    #[test]
    fn test_policy_names() {
        let w: Wrapper = serde_json::from_str(r#"{"on_duplicate":"fail"}"#).unwrap();
        assert_eq!(w.on_duplicate, DuplicatePolicy::Fail);
        let w: Wrapper = serde_json::from_str(r#"{"on_duplicate":"ignore"}"#).unwrap();
        assert_eq!(w.on_duplicate, DuplicatePolicy::Ignore);
        assert_eq!(DuplicatePolicy::default(), DuplicatePolicy::Ignore);
    }
}
