use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;
use crate::structs::link_request::PutShortcut;

pub const SLUG_MAX_LEN: u64 = 64;

/// 9999-01-01T00:00:00Z, stands in for a missing end of the validity window.
pub const UNBOUNDED_UNTIL: i64 = 253_370_764_800_000;

/// A short link as entered by the administrator. Window bounds and the
/// approval flag are optional until the record is validated.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ShortLinkRecord {
    pub slug: String,
    pub target_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requires_approval: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GateState {
    Countdown,
    Blocked,
    Reachable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrustState {
    Untrusted,
    Trusted,
}

impl fmt::Display for GateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateState::Countdown => write!(f, "countdown"),
            GateState::Blocked => write!(f, "blocked"),
            GateState::Reachable => write!(f, "reachable"),
        }
    }
}

impl fmt::Display for TrustState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrustState::Untrusted => write!(f, "untrusted"),
            TrustState::Trusted => write!(f, "trusted"),
        }
    }
}

impl TrustState {
    pub fn from_approval(approval: bool) -> Self {
        if approval {
            TrustState::Untrusted
        } else {
            TrustState::Trusted
        }
    }

    /// Parses the `status` column of seed and backup files.
    pub fn parse(status: &str) -> Option<Self> {
        match status.trim() {
            "untrusted" => Some(TrustState::Untrusted),
            "trusted" => Some(TrustState::Trusted),
            _ => None,
        }
    }

    pub fn requires_approval(&self) -> bool {
        matches!(self, TrustState::Untrusted)
    }
}

/// Classifies a validity window at `now` (epoch milliseconds).
pub fn gate_state(since: Option<i64>, until: Option<i64>, now: i64) -> GateState {
    match since {
        Some(since) if now < since => GateState::Countdown,
        _ if now > until.unwrap_or(UNBOUNDED_UNTIL) => GateState::Blocked,
        _ => GateState::Reachable,
    }
}

pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

impl ShortLinkRecord {
    pub fn new(slug: impl Into<String>, target_url: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            target_url: target_url.into(),
            valid_from: None,
            valid_until: None,
            requires_approval: None,
        }
    }

    pub fn valid_from(mut self, since: i64) -> Self {
        self.valid_from = Some(since);
        self
    }

    pub fn valid_until(mut self, until: i64) -> Self {
        self.valid_until = Some(until);
        self
    }

    pub fn requires_approval(mut self, approval: bool) -> Self {
        self.requires_approval = Some(approval);
        self
    }

    pub fn validate(&self) -> Result<PutShortcut, ValidationError> {
        self.validate_at(now_millis())
    }

    /// Checks slug and URL and fills the window defaults, taking `now` as
    /// the creation time.
    pub fn validate_at(&self, now: i64) -> Result<PutShortcut, ValidationError> {
        PutShortcut {
            slug: self.slug.clone(),
            url: self.target_url.trim().to_string(),
            approval: self.requires_approval.unwrap_or(false),
            since: self.valid_from.unwrap_or(now),
            until: self.valid_until.unwrap_or(UNBOUNDED_UNTIL),
        }
        .checked()
    }

    pub fn gate_state(&self, now: i64) -> GateState {
        gate_state(self.valid_from, self.valid_until, now)
    }

    pub fn trust_state(&self) -> TrustState {
        TrustState::from_approval(self.requires_approval.unwrap_or(false))
    }
}
