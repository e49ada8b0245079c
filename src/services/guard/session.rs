/*
 * Responsibility
 * - authenticator から見たユーザー 1 人分のセッション (読み取り専用)
 * - 外部のセッション層が request extensions に載せる Session ハンドル
 *
 * 保存・永続化・書き込みは外部のセッション層の責務
 */
use std::sync::{Arc, RwLock};

use serde_json::{Map, Value};

pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<Value>;
}

impl SessionStore for Map<String, Value> {
    fn get(&self, key: &str) -> Option<Value> {
        Map::get(self, key).cloned()
    }
}

/// Shared, externally mutated session. A poisoned lock reads as empty.
impl SessionStore for RwLock<Map<String, Value>> {
    fn get(&self, key: &str) -> Option<Value> {
        self.read().ok()?.get(key).cloned()
    }
}

/// Request extension holding the current session.
#[derive(Clone)]
pub struct Session(Arc<dyn SessionStore>);

impl Session {
    pub fn new(store: impl SessionStore + 'static) -> Self {
        Self(Arc::new(store))
    }

    pub fn shared(store: Arc<dyn SessionStore>) -> Self {
        Self(store)
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.0.get(key)
    }
}

impl From<Map<String, Value>> for Session {
    fn from(map: Map<String, Value>) -> Self {
        Self::new(map)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Session(..)")
    }
}
