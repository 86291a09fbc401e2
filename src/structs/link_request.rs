use serde::{Deserialize, Serialize};
use url::Url;
use validator::Validate;

use crate::error::ValidationError;
use crate::models::link::{GateState, ShortLinkRecord, TrustState, gate_state};

/// Body of `PUT /s`. Also the shape of an acknowledged listing row.
#[derive(Serialize, Deserialize, Validate, Debug, Clone, PartialEq, Eq)]
pub struct PutShortcut {
    #[validate(length(min = 1, max = 64))]
    pub slug: String,
    #[validate(url(message = "Invalid URL format"))]
    pub url: String,
    pub approval: bool,
    pub since: i64,
    pub until: i64,
}

/// Body of `DELETE /s`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DeleteShortcut {
    pub slug: String,
}

/// Optional acknowledgement of `PUT /s`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PutShortcutAnswer {
    pub slug: String,
}

/// Optional acknowledgement of `DELETE /s`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DeleteShortcutAnswer {
    pub rows_affected: u64,
}

impl PutShortcut {
    /// Runs the field rules and normalizes the URL to its serialized form.
    pub fn checked(mut self) -> Result<Self, ValidationError> {
        if let Err(errors) = self.validate() {
            if errors.field_errors().contains_key("slug") {
                return Err(ValidationError::SlugLength(self.slug.chars().count()));
            }
            return Err(ValidationError::InvalidUrl(self.url));
        }

        let parsed = Url::parse(&self.url)
            .map_err(|e| ValidationError::InvalidUrl(format!("{} ({})", self.url, e)))?;
        self.url = parsed.to_string();
        Ok(self)
    }

    pub fn gate_state(&self, now: i64) -> GateState {
        gate_state(Some(self.since), Some(self.until), now)
    }

    pub fn trust_state(&self) -> TrustState {
        TrustState::from_approval(self.approval)
    }

    pub fn to_record(&self) -> ShortLinkRecord {
        ShortLinkRecord::new(self.slug.clone(), self.url.clone())
            .valid_from(self.since)
            .valid_until(self.until)
            .requires_approval(self.approval)
    }
}
