//! Widget entity model shared by the HTTP service and the grid client.
//!
//! DESIGN
//! ======
//! `Widget` is both the wire shape and the stored shape. Its `properties`
//! stay an opaque JSON map so the ordering core never depends on what a
//! widget renders. `WidgetProperties` is the typed view of that map, used
//! at the presentation boundary (dialogs and the CLI) where the per-type
//! fields actually matter.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::OffsetDateTime;
use uuid::Uuid;

/// Opaque per-widget property bag.
pub type Properties = Map<String, Value>;

// =============================================================================
// KIND
// =============================================================================

/// Widget type tag. Immutable after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetKind {
    Iframe,
    Shortcut,
    Query,
}

impl WidgetKind {
    pub const ALL: [Self; 3] = [Self::Iframe, Self::Shortcut, Self::Query];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Iframe => "iframe",
            Self::Shortcut => "shortcut",
            Self::Query => "query",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "iframe" => Some(Self::Iframe),
            "shortcut" => Some(Self::Shortcut),
            "query" => Some(Self::Query),
            _ => None,
        }
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// WIDGET
// =============================================================================

/// A single homepage tile as returned by the widget API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: WidgetKind,
    /// Sort key among widgets of the same kind. Not assumed dense.
    pub position: u32,
    #[serde(default)]
    pub properties: Properties,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Widget {
    /// The `title` property, if the widget carries one.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.properties.get("title").and_then(Value::as_str)
    }
}

/// Request body for `POST /api/widgets`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewWidget {
    #[serde(rename = "type")]
    pub kind: WidgetKind,
    #[serde(default)]
    pub properties: Properties,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
}

// =============================================================================
// TYPED PROPERTIES
// =============================================================================

pub const IFRAME_MIN_SIZE: u32 = 100;
pub const IFRAME_MAX_SIZE: u32 = 2000;
pub const IFRAME_MIN_REFRESH_SECS: u32 = 5;
pub const QUERY_PLACEHOLDER: &str = "{query}";

#[derive(Debug, thiserror::Error)]
pub enum PropertiesError {
    #[error("invalid properties: {0}")]
    Invalid(#[from] serde_json::Error),
    #[error("{field} out of range: {value} (expected {min}..={max})")]
    OutOfRange { field: &'static str, value: u32, min: u32, max: u32 },
    #[error("refresh_interval must be at least 5 seconds, got {0}")]
    RefreshTooShort(u32),
    #[error("url_template must contain the {{query}} placeholder")]
    MissingQueryPlaceholder,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IframeProperties {
    pub url: String,
    pub title: String,
    #[serde(default = "default_iframe_width")]
    pub width: u32,
    #[serde(default = "default_iframe_height")]
    pub height: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_interval: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortcutProperties {
    pub url: String,
    pub title: String,
    #[serde(default = "default_shortcut_icon")]
    pub icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryProperties {
    pub url_template: String,
    pub title: String,
    #[serde(default = "default_query_icon")]
    pub icon: String,
    #[serde(default = "default_query_placeholder")]
    pub placeholder: String,
}

fn default_iframe_width() -> u32 {
    400
}

fn default_iframe_height() -> u32 {
    300
}

fn default_shortcut_icon() -> String {
    "🔗".to_owned()
}

fn default_query_icon() -> String {
    "🔍".to_owned()
}

fn default_query_placeholder() -> String {
    "Search...".to_owned()
}

/// Typed property record, one variant per widget kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetProperties {
    Iframe(IframeProperties),
    Shortcut(ShortcutProperties),
    Query(QueryProperties),
}

impl WidgetProperties {
    /// Parse and validate an opaque property map for `kind`.
    ///
    /// # Errors
    ///
    /// Returns an error if required fields are missing, have the wrong
    /// shape, or fail per-kind validation.
    pub fn from_map(kind: WidgetKind, properties: &Properties) -> Result<Self, PropertiesError> {
        let value = Value::Object(properties.clone());
        let parsed = match kind {
            WidgetKind::Iframe => Self::Iframe(serde_json::from_value(value)?),
            WidgetKind::Shortcut => Self::Shortcut(serde_json::from_value(value)?),
            WidgetKind::Query => Self::Query(serde_json::from_value(value)?),
        };
        parsed.validate()?;
        Ok(parsed)
    }

    /// Check per-kind constraints.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), PropertiesError> {
        match self {
            Self::Iframe(props) => {
                check_size("width", props.width)?;
                check_size("height", props.height)?;
                if let Some(secs) = props.refresh_interval
                    && secs < IFRAME_MIN_REFRESH_SECS
                {
                    return Err(PropertiesError::RefreshTooShort(secs));
                }
                Ok(())
            }
            Self::Shortcut(_) => Ok(()),
            Self::Query(props) => {
                if props.url_template.contains(QUERY_PLACEHOLDER) {
                    Ok(())
                } else {
                    Err(PropertiesError::MissingQueryPlaceholder)
                }
            }
        }
    }

    #[must_use]
    pub fn kind(&self) -> WidgetKind {
        match self {
            Self::Iframe(_) => WidgetKind::Iframe,
            Self::Shortcut(_) => WidgetKind::Shortcut,
            Self::Query(_) => WidgetKind::Query,
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Iframe(props) => &props.title,
            Self::Shortcut(props) => &props.title,
            Self::Query(props) => &props.title,
        }
    }

    /// Convert back into the opaque map sent over the wire.
    #[must_use]
    pub fn into_map(self) -> Properties {
        let value = match self {
            Self::Iframe(props) => serde_json::to_value(props),
            Self::Shortcut(props) => serde_json::to_value(props),
            Self::Query(props) => serde_json::to_value(props),
        };
        match value {
            Ok(Value::Object(map)) => map,
            _ => Properties::new(),
        }
    }

    /// One-line textual rendering used by the CLI.
    #[must_use]
    pub fn summary(&self) -> String {
        match self {
            Self::Iframe(props) => {
                format!("{} <{}> {}x{}", props.title, props.url, props.width, props.height)
            }
            Self::Shortcut(props) => match props.description.as_deref() {
                Some(description) => format!("{} {} <{}> ({description})", props.icon, props.title, props.url),
                None => format!("{} {} <{}>", props.icon, props.title, props.url),
            },
            Self::Query(props) => format!("{} {} <{}>", props.icon, props.title, props.url_template),
        }
    }
}

fn check_size(field: &'static str, value: u32) -> Result<(), PropertiesError> {
    if (IFRAME_MIN_SIZE..=IFRAME_MAX_SIZE).contains(&value) {
        Ok(())
    } else {
        Err(PropertiesError::OutOfRange { field, value, min: IFRAME_MIN_SIZE, max: IFRAME_MAX_SIZE })
    }
}

#[cfg(test)]
#[path = "widget_test.rs"]
mod tests;
