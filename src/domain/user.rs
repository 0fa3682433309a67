use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

// ============================================================================
// User - the client who places orders
// ============================================================================
//
// Orders hold a shared reference to their client and never manage its
// lifecycle.
//
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct User {
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing, default)]
    pub password: String,
}

impl User {
    pub fn new(
        id: Option<i64>,
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            password: password.into(),
        }
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        matches!((self.id, other.id), (Some(a), Some(b)) if a == b)
    }
}

impl Eq for User {}

impl Hash for User {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.unwrap_or(0).hash(state);
    }
}
