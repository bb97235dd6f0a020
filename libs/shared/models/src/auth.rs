use serde::{Deserialize, Serialize};

/// Profile of the signed-in patient as persisted by the login flow.
/// Every field is optional because the login flow may store a partial record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl UserProfile {
    /// Name to show in a call, or `fallback` when no usable name is stored.
    pub fn display_name_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => fallback,
        }
    }
}
