use std::sync::Arc;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::UserProfile;

use crate::storage::{LocalStorage, MemoryStorage, TOKEN_KEY, USER_KEY};

pub struct TestConfig {
    pub api_base_url: String,
    pub jitsi_script_url: String,
    pub storage_path: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000".to_string(),
            jitsi_script_url: "http://localhost:5001/external_api.js".to_string(),
            storage_path: "target/test-local-storage.json".to_string(),
        }
    }
}

impl TestConfig {
    pub fn with_api_base_url(api_base_url: &str) -> Self {
        Self {
            api_base_url: api_base_url.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            api_base_url: self.api_base_url.clone(),
            jitsi_script_url: self.jitsi_script_url.clone(),
            storage_path: self.storage_path.clone(),
            ..AppConfig::default()
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct TestUser {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub role: String,
}

impl Default for TestUser {
    fn default() -> Self {
        Self {
            name: "Asha Verma".to_string(),
            phone: "+91 98765 43210".to_string(),
            email: "asha@example.com".to_string(),
            role: "patient".to_string(),
        }
    }
}

impl TestUser {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn to_profile(&self) -> UserProfile {
        UserProfile {
            name: Some(self.name.clone()),
            phone: Some(self.phone.clone()),
            email: Some(self.email.clone()),
            role: Some(self.role.clone()),
        }
    }
}

/// Storage pre-populated the way the login flow leaves it.
pub fn signed_in_storage(token: &str, user: &TestUser) -> Arc<MemoryStorage> {
    let storage = MemoryStorage::new();
    storage
        .set_item(TOKEN_KEY, token)
        .expect("memory storage accepts writes");
    let profile = serde_json::to_string(&user.to_profile()).expect("profile serializes");
    storage
        .set_item(USER_KEY, &profile)
        .expect("memory storage accepts writes");
    Arc::new(storage)
}

pub fn signed_out_storage() -> Arc<MemoryStorage> {
    Arc::new(MemoryStorage::new())
}

pub struct MockBackendResponses;

impl MockBackendResponses {
    pub fn timestamp(at: DateTime<Utc>) -> String {
        at.to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    pub fn consultation(id: &str, status: &str, scheduled_date: &str) -> Value {
        json!({
            "_id": id,
            "status": status,
            "scheduledDate": scheduled_date,
            "doctorId": { "name": "Sharma" },
            "type": "video"
        })
    }

    pub fn upcoming_consultation(status: &str) -> Value {
        let id = Uuid::new_v4().to_string();
        Self::consultation(&id, status, &Self::timestamp(Utc::now() + Duration::days(2)))
    }

    pub fn past_consultation(status: &str) -> Value {
        let id = Uuid::new_v4().to_string();
        Self::consultation(&id, status, &Self::timestamp(Utc::now() - Duration::days(2)))
    }

    pub fn doctor(id: &str, name: &str) -> Value {
        json!({
            "_id": id,
            "name": name
        })
    }

    pub fn doctors(count: usize) -> Value {
        Value::Array(
            (0..count)
                .map(|i| Self::doctor(&format!("doc-{}", i), &format!("Doctor {}", i)))
                .collect(),
        )
    }

    pub fn error_response(message: &str) -> Value {
        json!({
            "message": message
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{read_token, read_user};

    #[test]
    fn test_config_creation() {
        let config = TestConfig::with_api_base_url("http://127.0.0.1:1234").to_app_config();

        assert_eq!(config.api_base_url, "http://127.0.0.1:1234");
        assert_eq!(config.jitsi_domain, "meet.jit.si");
        assert!(config.is_configured());
    }

    #[test]
    fn test_signed_in_storage_holds_token_and_profile() {
        let storage = signed_in_storage("tok", &TestUser::named("Ravi"));

        assert_eq!(read_token(storage.as_ref()).as_deref(), Some("tok"));
        assert_eq!(read_user(storage.as_ref()).unwrap().name.as_deref(), Some("Ravi"));
    }

    #[test]
    fn test_doctor_fixture_count() {
        let doctors = MockBackendResponses::doctors(8);
        assert_eq!(doctors.as_array().unwrap().len(), 8);
        assert_eq!(doctors[0]["_id"], "doc-0");
    }
}
