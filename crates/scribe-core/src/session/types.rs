//! Session data types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::context::{analyze_project, ProjectInfo};
use crate::provider::Message;

/// Length of the id prefix shown to users
pub const SHORT_ID_LEN: usize = 8;

/// Environment captured when a session is created
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionContext {
    pub working_directory: PathBuf,
    #[serde(default)]
    pub environment: HashMap<String, String>,
    #[serde(default)]
    pub project_info: ProjectInfo,
}

impl SessionContext {
    /// Snapshot `dir`: platform facts and a best-effort project scan
    pub fn capture(dir: &Path) -> Self {
        let mut environment = HashMap::new();
        environment.insert("os".to_string(), std::env::consts::OS.to_string());
        environment.insert("arch".to_string(), std::env::consts::ARCH.to_string());
        for name in ["SHELL", "LANG"] {
            if let Ok(value) = std::env::var(name) {
                environment.insert(name.to_lowercase(), value);
            }
        }

        Self {
            working_directory: dir.to_path_buf(),
            environment,
            project_info: analyze_project(dir),
        }
    }
}

/// A persisted conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub context: SessionContext,
}

impl Session {
    pub fn new(name: impl Into<String>, context: SessionContext) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            created_at: now,
            updated_at: now,
            messages: Vec::new(),
            context,
        }
    }

    /// Append a message; `updated_at` never moves backwards
    pub fn add_message(&mut self, message: Message) {
        self.messages.push(message);
        self.touch();
    }

    pub fn touch(&mut self) {
        self.updated_at = self.updated_at.max(Utc::now());
    }

    pub fn clear_messages(&mut self) {
        self.messages.clear();
        self.touch();
    }

    pub fn short_id(&self) -> &str {
        self.id.get(..SHORT_ID_LEN).unwrap_or(&self.id)
    }
}
