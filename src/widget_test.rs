use super::*;
use serde_json::json;

fn map(value: Value) -> Properties {
    match value {
        Value::Object(map) => map,
        _ => panic!("expected object"),
    }
}

fn sample_widget(kind: WidgetKind) -> Widget {
    let now = OffsetDateTime::now_utc();
    Widget {
        id: Uuid::new_v4(),
        kind,
        position: 2,
        properties: map(json!({"title": "Docs", "url": "https://docs.rs"})),
        created_at: now,
        updated_at: now,
    }
}

// =============================================================
// WidgetKind
// =============================================================

#[test]
fn kind_parse_accepts_known_tags() {
    assert_eq!(WidgetKind::parse("iframe"), Some(WidgetKind::Iframe));
    assert_eq!(WidgetKind::parse("Shortcut"), Some(WidgetKind::Shortcut));
    assert_eq!(WidgetKind::parse(" query "), Some(WidgetKind::Query));
    assert_eq!(WidgetKind::parse("weather"), None);
}

#[test]
fn kind_as_str_matches_serde_tag() {
    for kind in WidgetKind::ALL {
        let encoded = serde_json::to_value(kind).unwrap();
        assert_eq!(encoded, json!(kind.as_str()));
        assert_eq!(kind.to_string(), kind.as_str());
    }
}

// =============================================================
// Widget wire shape
// =============================================================

#[test]
fn widget_serializes_kind_as_type_field() {
    let widget = sample_widget(WidgetKind::Shortcut);
    let value = serde_json::to_value(&widget).unwrap();
    assert_eq!(value["type"], "shortcut");
    assert_eq!(value["position"], 2);
    assert!(value["created_at"].is_string());
    assert!(value.get("kind").is_none());
}

#[test]
fn widget_deserializes_from_api_payload() {
    let raw = json!({
        "id": "6f1c1a2e-4f7c-4b8e-9a63-0d6f5b0a9e11",
        "type": "iframe",
        "position": 0,
        "properties": {"url": "https://example.com", "title": "Example"},
        "created_at": "2025-01-02T03:04:05Z",
        "updated_at": "2025-01-02T03:04:05Z"
    });
    let widget: Widget = serde_json::from_value(raw).unwrap();
    assert_eq!(widget.kind, WidgetKind::Iframe);
    assert_eq!(widget.title(), Some("Example"));
}

#[test]
fn widget_title_is_none_without_title_property() {
    let mut widget = sample_widget(WidgetKind::Query);
    widget.properties.remove("title");
    assert_eq!(widget.title(), None);
}

#[test]
fn new_widget_omits_absent_position() {
    let body = NewWidget { kind: WidgetKind::Query, properties: Properties::new(), position: None };
    let value = serde_json::to_value(&body).unwrap();
    assert!(value.get("position").is_none());
    assert_eq!(value["type"], "query");
}

// =============================================================
// Typed properties
// =============================================================

#[test]
fn iframe_properties_apply_defaults() {
    let props = map(json!({"url": "https://grafana.local", "title": "Grafana"}));
    let typed = WidgetProperties::from_map(WidgetKind::Iframe, &props).unwrap();
    let WidgetProperties::Iframe(iframe) = typed else {
        panic!("expected iframe properties");
    };
    assert_eq!(iframe.width, 400);
    assert_eq!(iframe.height, 300);
    assert_eq!(iframe.refresh_interval, None);
}

#[test]
fn iframe_properties_reject_out_of_range_width() {
    let props = map(json!({"url": "https://a", "title": "A", "width": 50}));
    let err = WidgetProperties::from_map(WidgetKind::Iframe, &props).unwrap_err();
    assert!(matches!(err, PropertiesError::OutOfRange { field: "width", value: 50, .. }));
}

#[test]
fn iframe_properties_reject_short_refresh() {
    let props = map(json!({"url": "https://a", "title": "A", "refresh_interval": 2}));
    let err = WidgetProperties::from_map(WidgetKind::Iframe, &props).unwrap_err();
    assert!(matches!(err, PropertiesError::RefreshTooShort(2)));
}

#[test]
fn shortcut_properties_require_url() {
    let props = map(json!({"title": "No url"}));
    let err = WidgetProperties::from_map(WidgetKind::Shortcut, &props).unwrap_err();
    assert!(matches!(err, PropertiesError::Invalid(_)));
}

#[test]
fn shortcut_properties_default_icon() {
    let props = map(json!({"url": "https://news.ycombinator.com", "title": "HN"}));
    let typed = WidgetProperties::from_map(WidgetKind::Shortcut, &props).unwrap();
    assert_eq!(typed.kind(), WidgetKind::Shortcut);
    assert_eq!(typed.summary(), "🔗 HN <https://news.ycombinator.com>");
}

#[test]
fn query_properties_require_placeholder() {
    let props = map(json!({"url_template": "https://google.com/search", "title": "Search"}));
    let err = WidgetProperties::from_map(WidgetKind::Query, &props).unwrap_err();
    assert!(matches!(err, PropertiesError::MissingQueryPlaceholder));
}

#[test]
fn query_properties_into_map_keeps_all_fields() {
    let typed = WidgetProperties::Query(QueryProperties {
        url_template: "https://duckduckgo.com/?q={query}".into(),
        title: "DuckDuckGo".into(),
        icon: "🦆".into(),
        placeholder: "Search DuckDuckGo...".into(),
    });
    assert_eq!(typed.title(), "DuckDuckGo");
    let props = typed.into_map();
    assert_eq!(props.get("url_template"), Some(&json!("https://duckduckgo.com/?q={query}")));
    assert_eq!(props.get("icon"), Some(&json!("🦆")));
    assert_eq!(props.get("placeholder"), Some(&json!("Search DuckDuckGo...")));
}

#[test]
fn into_map_skips_absent_optionals() {
    let typed = WidgetProperties::Shortcut(ShortcutProperties {
        url: "https://example.com".into(),
        title: "Example".into(),
        icon: "🔗".into(),
        description: None,
    });
    let props = typed.into_map();
    assert!(!props.contains_key("description"));
}
