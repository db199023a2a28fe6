use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const LOGIN_PLACEHOLDER_NAME: &str = "Usuario";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub email: String,
    pub full_name: String,
    pub id: String,
}

impl UserProfile {
    pub fn new(email: &str, full_name: &str) -> Self {
        Self {
            email: email.to_string(),
            full_name: full_name.to_string(),
            id: short_id(),
        }
    }

    pub fn display_name(&self) -> &str {
        if self.full_name.is_empty() {
            &self.email
        } else {
            &self.full_name
        }
    }
}

/// Nine lowercase alphanumeric characters, used for user and prediction ids.
pub fn short_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(9);
    id
}
