use std::env;
use tracing::warn;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_STORAGE_PATH: &str = ".niramya/local_storage.json";
pub const DEFAULT_JITSI_DOMAIN: &str = "meet.jit.si";
pub const DEFAULT_JITSI_SCRIPT_URL: &str = "https://meet.jit.si/external_api.js";
pub const DEFAULT_MEDICINE_MARKETPLACE_URL: &str = "https://www.1mg.com/drugs-all-medicines";
pub const DEFAULT_EMERGENCY_DIAL_URL: &str = "tel:101";
pub const DEFAULT_GET_STARTED_URL: &str = "http://localhost:5173/";
pub const DEFAULT_FALLBACK_DISPLAY_NAME: &str = "Patient";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub storage_path: String,
    pub jitsi_domain: String,
    pub jitsi_script_url: String,
    pub medicine_marketplace_url: String,
    pub emergency_dial_url: String,
    pub get_started_url: String,
    pub fallback_display_name: String,
    pub bind_addr: String,
}

fn env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| {
        warn!("{} not set, using default", key);
        default.to_string()
    })
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            api_base_url: env_or_default("NIRAMYA_API_BASE_URL", DEFAULT_API_BASE_URL),
            storage_path: env_or_default("NIRAMYA_STORAGE_PATH", DEFAULT_STORAGE_PATH),
            jitsi_domain: env_or_default("JITSI_DOMAIN", DEFAULT_JITSI_DOMAIN),
            jitsi_script_url: env_or_default("JITSI_SCRIPT_URL", DEFAULT_JITSI_SCRIPT_URL),
            medicine_marketplace_url: env_or_default(
                "MEDICINE_MARKETPLACE_URL",
                DEFAULT_MEDICINE_MARKETPLACE_URL,
            ),
            emergency_dial_url: env_or_default("EMERGENCY_DIAL_URL", DEFAULT_EMERGENCY_DIAL_URL),
            get_started_url: env_or_default("GET_STARTED_URL", DEFAULT_GET_STARTED_URL),
            fallback_display_name: env_or_default(
                "FALLBACK_DISPLAY_NAME",
                DEFAULT_FALLBACK_DISPLAY_NAME,
            ),
            bind_addr: env_or_default("PORTAL_BIND_ADDR", DEFAULT_BIND_ADDR),
        };

        if !config.is_configured() {
            warn!("Portal not fully configured - backend URL or storage path is empty");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.api_base_url.is_empty() && !self.storage_path.is_empty()
    }

    pub fn is_video_conferencing_configured(&self) -> bool {
        !self.jitsi_domain.is_empty() && !self.jitsi_script_url.is_empty()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            storage_path: DEFAULT_STORAGE_PATH.to_string(),
            jitsi_domain: DEFAULT_JITSI_DOMAIN.to_string(),
            jitsi_script_url: DEFAULT_JITSI_SCRIPT_URL.to_string(),
            medicine_marketplace_url: DEFAULT_MEDICINE_MARKETPLACE_URL.to_string(),
            emergency_dial_url: DEFAULT_EMERGENCY_DIAL_URL.to_string(),
            get_started_url: DEFAULT_GET_STARTED_URL.to_string(),
            fallback_display_name: DEFAULT_FALLBACK_DISPLAY_NAME.to_string(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }
}
