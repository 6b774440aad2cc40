//! Homepage model. A homepage is a named set of widgets; the default one
//! is what the widget API serves.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Homepage {
    pub id: Uuid,
    pub name: String,
    pub is_default: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Homepage {
    #[must_use]
    pub fn new(name: &str, is_default: bool) -> Self {
        let now = OffsetDateTime::now_utc();
        Self { id: Uuid::new_v4(), name: name.to_owned(), is_default, created_at: now, updated_at: now }
    }
}

/// Request body for `POST /api/homepages`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewHomepage {
    pub name: String,
    #[serde(default)]
    pub is_default: bool,
}
