use espora_core::Role;
use espora_hub::commands::{execute, parse_args, Command};
use espora_hub::config::{HubConfig, LogConfig, UserConfig};
use espora_hub::HubError;
use espora_storage::{JsonFileKvStore, KvStore, LocalStore, StorageKey};
use espora_test_utils::fixtures;
use std::path::Path;
use std::sync::Arc;

fn config_for(store_path: &Path, current_user: &str) -> HubConfig {
    let user = |id: &str, name: &str, role: Role| UserConfig {
        id: id.to_string(),
        name: name.to_string(),
        role,
    };
    HubConfig {
        store_path: store_path.to_path_buf(),
        refresh_interval_ms: 100,
        current_user: current_user.to_string(),
        log: LogConfig {
            format: "pretty".to_string(),
            filter: "info".to_string(),
        },
        users: vec![
            user("U1", "Ana", Role::Admin),
            user("U3", "Luis", Role::Capturista),
            user("U9", "Valeria", Role::Operador),
        ],
    }
}

fn seed(path: &Path) {
    let store = LocalStore::new(Arc::new(JsonFileKvStore::open(path)));
    store
        .save(
            StorageKey::SelectedItems,
            &fixtures::selected(&[("A1", true), ("D1", true)]),
        )
        .unwrap();
    store
        .save(
            StorageKey::FormData,
            &fixtures::form_data(vec![
                ("difusion", vec![("D1", "Publish schedule")]),
                ("estrategia", vec![("A1", "Do X")]),
            ]),
        )
        .unwrap();
}

fn run(config: &HubConfig, words: &[&str]) -> Result<String, HubError> {
    let args = words.iter().map(|w| w.to_string());
    let invocation = parse_args(args)?;
    let mut out = Vec::new();
    execute(&invocation.command, config, &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

#[test]
fn checklist_command_prints_sections_and_progress() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hub.json");
    seed(&path);
    let config = config_for(&path, "U1");

    let text = run(&config, &["checklist"]).unwrap();
    let estrategia = text.find("Set Up Estrategia Digital").unwrap();
    let difusion = text.find("Set Up Difusión").unwrap();
    assert!(estrategia < difusion);
    assert!(text.contains("[ ] A1  Do X"));
    assert!(text.contains("Progress: 0/2 (0%)"));
}

#[test]
fn mutations_persist_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hub.json");
    seed(&path);
    let config = config_for(&path, "U1");

    assert_eq!(run(&config, &["assign", "A1", "U9"]).unwrap(), "assign: A1 ok\n");
    assert_eq!(run(&config, &["due", "A1", "2025-06-12"]).unwrap(), "due: A1 ok\n");
    assert_eq!(run(&config, &["toggle", "A1"]).unwrap(), "toggle: A1 ok\n");

    let text = run(&config, &["checklist"]).unwrap();
    assert!(text.contains("[x] A1  Do X  (Valeria, 2025-06-12)"));

    let kv = JsonFileKvStore::open(&path);
    let assignments = kv.get("taskAssignments").unwrap().unwrap();
    assert!(assignments.contains("\"userId\": \"U9\"") || assignments.contains("\"userId\":\"U9\""));

    let tasks = run(&config, &["tasks"]).unwrap();
    assert!(tasks.starts_with("all 1 |"));
    assert!(tasks.contains("Valeria"));
}

#[test]
fn denied_command_reports_and_keeps_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hub.json");
    seed(&path);
    let before = std::fs::read_to_string(&path).unwrap();
    let config = config_for(&path, "U3");

    let text = run(&config, &["assign", "A1", "U9"]).unwrap();
    assert_eq!(text, "Access denied: assign on A1\n");
    assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn delete_command_removes_item() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hub.json");
    seed(&path);
    let config = config_for(&path, "U1");

    run(&config, &["field", "A1", "kpi", "leads"]).unwrap();
    assert_eq!(run(&config, &["delete", "A1"]).unwrap(), "delete: A1 ok\n");
    assert_eq!(run(&config, &["delete", "A1"]).unwrap(), "Item not found: A1\n");

    let text = run(&config, &["checklist"]).unwrap();
    assert!(!text.contains("A1"));
    let fields = JsonFileKvStore::open(&path).get("fieldValues").unwrap().unwrap();
    assert!(!fields.contains("A1-"));
}

#[test]
fn assign_to_unknown_user_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hub.json");
    seed(&path);
    let config = config_for(&path, "U1");

    let result = run(&config, &["assign", "A1", "U404"]);
    assert!(matches!(result, Err(HubError::UnknownUser(_))));
}

#[test]
fn assigned_user_field_follows_assignment_rules() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hub.json");
    seed(&path);

    let capturista = config_for(&path, "U3");
    assert_eq!(
        run(&capturista, &["field", "A1", "assignedUser", "U9"]).unwrap(),
        "Access denied: field on A1\n"
    );
    run(&capturista, &["toggle", "A1"]).unwrap();
    assert!(run(&capturista, &["tasks"]).unwrap().starts_with("all 0 |"));

    let admin = config_for(&path, "U1");
    assert!(matches!(
        run(&admin, &["field", "A1", "assignedUser", "U404"]),
        Err(HubError::UnknownUser(_))
    ));
    assert_eq!(
        run(&admin, &["field", "A1", "assignedUser", "U9"]).unwrap(),
        "field: A1 ok\n"
    );
    let tasks = run(&admin, &["tasks"]).unwrap();
    assert!(tasks.starts_with("all 1 |"));
    assert!(tasks.contains("[x] A1"));
    assert!(tasks.contains("Valeria"));
}

#[test]
fn invalid_due_date_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hub.json");
    seed(&path);
    let config = config_for(&path, "U1");
    assert!(matches!(
        run(&config, &["due", "A1", "next tuesday"]),
        Err(HubError::Usage(_))
    ));
}

#[test]
fn users_command_lists_directory() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(&dir.path().join("hub.json"), "U1");
    let text = run(&config, &["users"]).unwrap();
    assert_eq!(text.lines().count(), 3);
    assert!(text.contains("U9  Valeria  operador"));
}

#[test]
fn missing_store_gives_empty_checklist() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(&dir.path().join("nested/hub.json"), "U1");
    let text = run(&config, &["checklist"]).unwrap();
    assert_eq!(text, "Progress: 0/0 (0%)\n");
}

#[test]
fn watch_is_not_a_sync_command() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(&dir.path().join("hub.json"), "U1");
    let result = execute(&Command::Watch, &config, &mut Vec::<u8>::new());
    assert!(matches!(result, Err(HubError::Usage(_))));
}
