//! Shared value types: track selector, outcomes and the request envelope.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SpamError;

/// Result string returned for an unrecognised track selector.
pub const INVALID_TYPE: &str = "Invalid type selected";

/// Which trained pipeline handles a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Track {
    Message,
    Email,
}

impl Track {
    pub const ALL: [Track; 2] = [Track::Message, Track::Email];

    pub fn as_str(self) -> &'static str {
        match self {
            Track::Message => "message",
            Track::Email => "email",
        }
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Track {
    type Err = SpamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "message" => Ok(Track::Message),
            "email" => Ok(Track::Email),
            other => Err(SpamError::InvalidTrack(other.to_string())),
        }
    }
}

/// Final label, identical across tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassOutcome {
    Spam,
    NotSpam,
}

impl ClassOutcome {
    pub fn is_spam(self) -> bool {
        self == ClassOutcome::Spam
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ClassOutcome::Spam => "Spam",
            ClassOutcome::NotSpam => "Not Spam",
        }
    }
}

impl fmt::Display for ClassOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw class value produced by a classifier, before label resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassIndex(pub usize);

/// Request body: `{"type": "message", "input": "..."}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyRequest {
    #[serde(rename = "type")]
    pub kind: String,
    pub input: String,
}

impl ClassifyRequest {
    pub fn new(kind: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            input: input.into(),
        }
    }
}

/// Response body: `{"result": "Spam" | "Not Spam" | "Invalid type selected"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifyResponse {
    pub result: String,
}

impl ClassifyResponse {
    pub fn invalid_type() -> Self {
        Self {
            result: INVALID_TYPE.to_string(),
        }
    }
}

impl From<ClassOutcome> for ClassifyResponse {
    fn from(outcome: ClassOutcome) -> Self {
        Self {
            result: outcome.as_str().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_parses_known_selectors_only() {
        assert_eq!("message".parse::<Track>().unwrap(), Track::Message);
        assert_eq!("email".parse::<Track>().unwrap(), Track::Email);
        assert!(matches!(
            "Message".parse::<Track>(),
            Err(SpamError::InvalidTrack(s)) if s == "Message"
        ));
        assert!("".parse::<Track>().is_err());
    }

    #[test]
    fn request_uses_type_field_on_the_wire() {
        let req: ClassifyRequest =
            serde_json::from_str(r#"{"type": "email", "input": "hi"}"#).unwrap();
        assert_eq!(req.kind, "email");
        assert_eq!(req.input, "hi");

        let resp = ClassifyResponse::from(ClassOutcome::NotSpam);
        assert_eq!(
            serde_json::to_string(&resp).unwrap(),
            r#"{"result":"Not Spam"}"#
        );
    }
}
