use super::*;
use serde_json::json;

#[test]
fn assignment_values_parse_as_json_first() {
    assert_eq!(parse_assignment("width=640").unwrap(), ("width".to_owned(), json!(640)));
    assert_eq!(parse_assignment("title=Hacker News").unwrap(), ("title".to_owned(), json!("Hacker News")));
    assert_eq!(
        parse_assignment("url=https://a.example/?q=1").unwrap(),
        ("url".to_owned(), json!("https://a.example/?q=1"))
    );
}

#[test]
fn assignment_requires_key_and_equals() {
    assert!(matches!(parse_assignment("title"), Err(CliError::InvalidAssignment(_))));
    assert!(matches!(parse_assignment(" =x"), Err(CliError::InvalidAssignment(_))));
}

#[test]
fn build_properties_fills_defaults_and_skips_missing() {
    let properties = build_properties(
        WidgetKind::Shortcut,
        vec![
            ("title", Some(json!("Docs"))),
            ("url", Some(json!("https://docs.rs"))),
            ("description", None),
        ],
    )
    .unwrap();

    assert_eq!(properties.get("icon"), Some(&json!("🔗")));
    assert!(!properties.contains_key("description"));
}

#[test]
fn build_properties_rejects_invalid_iframe_size() {
    let err = build_properties(
        WidgetKind::Iframe,
        vec![
            ("title", Some(json!("Tiny"))),
            ("url", Some(json!("https://a.example"))),
            ("width", Some(json!(50))),
        ],
    )
    .unwrap_err();
    assert!(matches!(err, CliError::Properties(PropertiesError::OutOfRange { field: "width", .. })));
}

#[test]
fn group_kinds_parse_or_fail() {
    assert_eq!(parse_kind("Query").unwrap(), WidgetKind::Query);
    assert!(matches!(parse_kind("clock"), Err(CliError::UnknownKind(_))));
}

#[test]
fn move_command_parses_after_flag() {
    let dragged = Uuid::new_v4();
    let target = Uuid::new_v4();
    let (dragged_arg, target_arg) = (dragged.to_string(), target.to_string());
    let cli = Cli::try_parse_from([
        "neighbor",
        "--base-url",
        "http://localhost:9000",
        "move",
        dragged_arg.as_str(),
        target_arg.as_str(),
        "--after",
    ])
    .unwrap();

    assert_eq!(cli.base_url, "http://localhost:9000");
    match cli.command {
        Command::Move { dragged: d, target: t, after } => {
            assert_eq!((d, t), (dragged, target));
            assert_eq!(drop_position(after), DropPosition::After);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn edit_requires_at_least_one_assignment() {
    let id = Uuid::new_v4().to_string();
    assert!(Cli::try_parse_from(["neighbor", "edit", id.as_str()]).is_err());

    let cli = Cli::try_parse_from(["neighbor", "edit", id.as_str(), "--set", "title=x", "--set", "icon=y"]).unwrap();
    assert!(matches!(cli.command, Command::Edit { ref assignments, .. } if assignments.len() == 2));
}
