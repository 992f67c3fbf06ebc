use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A resume as accepted into the store: raw extracted text, before cleaning.
#[derive(Debug, Clone, Serialize)]
pub struct StoredResume {
    pub id: Uuid,
    pub filename: String,
    #[serde(skip)]
    pub raw_text: String,
    pub uploaded_at: DateTime<Utc>,
}

impl StoredResume {
    pub fn new(filename: impl Into<String>, raw_text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            filename: filename.into(),
            raw_text: raw_text.into(),
            uploaded_at: Utc::now(),
        }
    }
}

/// A member of the active corpus. `cleaned_text` is never empty.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    pub id: Uuid,
    pub filename: String,
    #[serde(skip)]
    pub raw_text: String,
    #[serde(skip)]
    pub cleaned_text: String,
}
