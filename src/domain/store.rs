//! Store catalog entries.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::*;

/// A physical store whose daily cash closings feed the reports.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Store {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}

impl Store {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            nickname: None,
            code: None,
            icon: None,
            is_default: false,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = Some(nickname.into());
        self
    }
}

impl Identifiable for Store {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for Store {
    fn display_label(&self) -> String {
        match (&self.code, &self.nickname) {
            (Some(code), _) => format!("{} ({})", self.name, code),
            (None, Some(nickname)) => format!("{} ({})", self.name, nickname),
            (None, None) => self.name.clone(),
        }
    }
}
