//! Session integration tests
//!
//! Tests for the session store: persistence, listing, id resolution and
//! active-session rules.

use scribe_core::error::Error;
use scribe_core::provider::{Message, ToolCall};
use scribe_core::session::{Session, SessionContext, SessionStore, DEFAULT_SESSION_NAME};
use scribe_core::tools::ToolParams;
use serde_json::json;
use std::fs;
use tempfile::TempDir;

/// Store rooted in a temp dir, with a small Rust project as the workspace
fn setup_store() -> (TempDir, SessionStore) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let workspace = dir.path().join("project");
    fs::create_dir_all(workspace.join("src")).unwrap();
    fs::write(workspace.join("Cargo.toml"), "[package]\nname = \"demo\"\n").unwrap();
    fs::write(workspace.join("src/main.rs"), "fn main() {}\n").unwrap();

    let store = SessionStore::new(dir.path().join("sessions"), workspace).unwrap();
    (dir, store)
}

fn stored_session(id: &str, name: &str) -> Session {
    let mut session = Session::new(name, SessionContext::default());
    session.id = id.to_string();
    session
}

mod session_type_tests {
    use super::*;

    #[test]
    fn test_appends_are_counted_and_monotonic() {
        let mut session = Session::new("test", SessionContext::default());
        let mut last = session.updated_at;

        for i in 0..5 {
            session.add_message(Message::user(format!("message {}", i)));
            assert!(session.updated_at >= last);
            last = session.updated_at;
        }
        assert_eq!(session.messages.len(), 5);
    }

    #[test]
    fn test_wire_field_names() {
        let mut session = Session::new("wire", SessionContext::default());
        session.add_message(Message::tool_result("call_1", "ok"));

        let value = serde_json::to_value(&session).unwrap();
        for key in ["id", "name", "created_at", "updated_at", "messages", "context"] {
            assert!(value.get(key).is_some(), "missing {}", key);
        }
        assert_eq!(value["messages"][0]["role"], "tool");
        assert_eq!(value["messages"][0]["tool_call_id"], "call_1");
        assert!(value["messages"][0].get("tool_calls").is_none());
    }
}

mod session_store_tests {
    use super::*;

    #[test]
    fn test_create_captures_context() {
        let (_dir, mut store) = setup_store();
        let session = store.create("work");

        assert_eq!(session.name, "work");
        assert!(session.context.working_directory.ends_with("project"));
        assert_eq!(session.context.project_info.name, "demo");
        assert_eq!(session.context.project_info.language, "Rust");
        assert!(session.context.project_info.files.contains(&"src/main.rs".to_string()));
    }

    #[test]
    fn test_save_load_round_trip() {
        let (_dir, mut store) = setup_store();
        let session = store.create("round-trip");
        session.add_message(Message::user("read the readme"));
        session.add_message(Message::assistant_with_tool_calls(
            "",
            vec![ToolCall::function("call_1", "read_file", json!("{\"file_path\":\"README.md\"}"))],
        ));
        session.add_message(Message::tool_result("call_1", "# Readme"));
        session.add_message(Message::assistant("It is a readme."));
        let session = session.clone();

        store.save(&session).unwrap();
        let loaded = store.load(&session.id).unwrap();

        assert_eq!(loaded.messages, session.messages);
        assert_eq!(loaded.context, session.context);
        assert_eq!(loaded, session);
    }

    #[test]
    fn test_object_arguments_reload_as_wire_string() {
        let (_dir, mut store) = setup_store();
        let session = store.create("object-args");
        session.add_message(Message::assistant_with_tool_calls(
            "",
            vec![ToolCall::function("call_1", "read_file", json!({"file_path": "README.md"}))],
        ));
        let session = session.clone();

        store.save(&session).unwrap();
        let loaded = store.load(&session.id).unwrap();

        let arguments = &loaded.messages[0].tool_calls[0].function.arguments;
        let text = arguments.as_str().expect("arguments stored as a string");
        assert_eq!(serde_json::from_str::<serde_json::Value>(text).unwrap(), json!({"file_path": "README.md"}));
        assert_eq!(
            ToolParams::from_arguments(arguments.clone()).unwrap().require_str("file_path").unwrap(),
            "README.md"
        );
    }

    #[test]
    fn test_load_missing_and_corrupt() {
        let (_dir, store) = setup_store();
        assert!(matches!(store.load("nope"), Err(Error::SessionNotFound(_))));

        fs::write(store.dir().join("broken.json"), "{ not json").unwrap();
        assert!(matches!(store.load("broken"), Err(Error::Session(_))));
    }

    #[test]
    fn test_list_skips_corrupt_and_sorts() {
        let (_dir, store) = setup_store();
        let mut older = stored_session("older-id", "older");
        older.updated_at = older.updated_at - chrono::Duration::hours(1);
        let newer = stored_session("newer-id", "newer");
        store.save(&older).unwrap();
        store.save(&newer).unwrap();
        fs::write(store.dir().join("corrupt.json"), "garbage").unwrap();
        fs::write(store.dir().join("notes.txt"), "ignored").unwrap();

        let sessions = store.list().unwrap();
        let names: Vec<&str> = sessions.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["newer", "older"]);
    }

    #[test]
    fn test_resolve_by_prefix() {
        let (_dir, store) = setup_store();
        store
            .save(&stored_session("abcdef12-0000-4000-8000-000000000000", "first"))
            .unwrap();
        store
            .save(&stored_session("abc99999-0000-4000-8000-000000000000", "second"))
            .unwrap();

        assert_eq!(
            store.resolve("abcdef12").unwrap(),
            "abcdef12-0000-4000-8000-000000000000"
        );
        assert!(matches!(store.resolve("abc"), Err(Error::Session(_))));
        assert!(matches!(store.resolve("zzz"), Err(Error::SessionNotFound(_))));
    }

    #[test]
    fn test_switch_loads_session() {
        let (_dir, mut store) = setup_store();
        let mut saved = stored_session("abcdef12-1111-4000-8000-000000000000", "saved");
        saved.add_message(Message::user("hi"));
        store.save(&saved).unwrap();

        store.create("scratch");
        let active = store.switch("abcdef12").unwrap();
        assert_eq!(active.name, "saved");
        assert_eq!(active.messages.len(), 1);
        assert_eq!(store.current().id, saved.id);
    }

    #[test]
    fn test_delete_rules() {
        let (_dir, mut store) = setup_store();
        let active_id = store.create("active").id.clone();
        store.save_current().unwrap();
        store.save(&stored_session("other-id", "other")).unwrap();

        assert!(matches!(store.delete(&active_id), Err(Error::ActiveSessionDelete(_))));
        assert!(matches!(store.delete("missing"), Err(Error::SessionNotFound(_))));

        assert_eq!(store.delete("other").unwrap(), "other-id");
        assert!(store.load("other-id").is_err());
        assert!(store.load(&active_id).is_ok());
    }

    #[test]
    fn test_current_created_lazily() {
        let (_dir, mut store) = setup_store();
        assert!(!store.has_current());

        let id = store.current().id.clone();
        assert!(store.has_current());
        assert_eq!(store.current().name, DEFAULT_SESSION_NAME);
        assert_eq!(store.current_mut().id, id);

        // the lazy default goes through create, so it captures the workspace
        let context = &store.current().context;
        assert!(context.working_directory.ends_with("project"));
        assert_eq!(context.project_info.name, "demo");
    }
}
