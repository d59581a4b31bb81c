use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AppError, Result};

/// Contact form as posted to `/contact`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactSubmission {
    /// Trim every field, lowercase the email, and reject blanks.
    pub fn normalized(&self) -> Result<Self> {
        let normalized = Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            subject: self.subject.trim().to_string(),
            message: self.message.trim().to_string(),
        };

        for (field, value) in [
            ("name", &normalized.name),
            ("email", &normalized.email),
            ("subject", &normalized.subject),
            ("message", &normalized.message),
        ] {
            if value.is_empty() {
                return Err(AppError::validation(field, "is required"));
            }
        }

        let well_formed = normalized
            .email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
        if !well_formed {
            return Err(AppError::validation("email", "is not an email address"));
        }

        Ok(normalized)
    }
}

/// Server reply to a successful submission
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContactReceipt {
    pub message: String,
    #[serde(default)]
    pub data: Option<StoredContact>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredContact {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
}
