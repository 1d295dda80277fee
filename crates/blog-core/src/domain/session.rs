//! Per-request session context and the logged-in check.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Session key holding the logged-in flag.
pub const LOGGED_IN_KEY: &str = "is_logged_in";

/// Key/value state attached to a single request.
///
/// The session is passed explicitly to whatever needs it; nothing in the
/// domain reads ambient state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Session {
    values: HashMap<String, Value>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// A session carrying the logged-in flag.
    pub fn logged_in() -> Self {
        let mut session = Self::new();
        session.insert(LOGGED_IN_KEY, true);
        session
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn is_logged_in(&self) -> bool {
        is_logged_in(self)
    }
}

/// Whether the session carries a truthy logged-in flag.
pub fn is_logged_in(session: &Session) -> bool {
    session.get(LOGGED_IN_KEY).is_some_and(is_truthy)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
