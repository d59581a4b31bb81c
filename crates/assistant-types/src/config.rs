use serde::{Deserialize, Serialize};

/// Top-level application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub gateway: GatewayConfig,
    pub user_data: UserDataConfig,
    pub storage: StorageConfig,
    pub retry: RetryPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            gateway: GatewayConfig::default(),
            user_data: UserDataConfig::default(),
            storage: StorageConfig::default(),
            retry: RetryPolicy::default(),
        }
    }
}

impl AppConfig {
    /// Fill in a per-install user id when none has been set yet.
    /// Returns true if the config changed and should be saved.
    pub fn ensure_user_id(&mut self) -> bool {
        if !self.user_data.user_id.trim().is_empty() {
            return false;
        }
        self.user_data.user_id = uuid::Uuid::new_v4().to_string();
        true
    }
}

pub const DEFAULT_SERVER_URL: &str = "http://localhost:5002";

/// Chat service (`/chat`, `/documents`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub base_url: String,
    /// Upper bound for a single request, in milliseconds.
    pub timeout_ms: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SERVER_URL.to_string(),
            timeout_ms: 30_000,
        }
    }
}

/// User-data and contact endpoints (`/api/user/:id`, `/contact`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserDataConfig {
    pub base_url: String,
    pub user_id: String,
    /// Push the session to the user-data service after each answered query.
    pub sync_after_turn: bool,
}

impl Default for UserDataConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SERVER_URL.to_string(),
            user_id: String::new(),
            sync_after_turn: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackendType,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackendType::Auto,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageBackendType {
    /// localStorage when available, memory otherwise
    Auto,
    Local,
    Memory,
}

impl StorageBackendType {
    pub fn all() -> &'static [StorageBackendType] {
        &[
            StorageBackendType::Auto,
            StorageBackendType::Local,
            StorageBackendType::Memory,
        ]
    }

    pub fn label(&self) -> &str {
        match self {
            StorageBackendType::Auto => "Auto",
            StorageBackendType::Local => "Browser (localStorage)",
            StorageBackendType::Memory => "Memory (this tab only)",
        }
    }
}

/// Bounded exponential backoff for pending queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 2_000,
            max_delay_ms: 30_000,
        }
    }
}

impl RetryPolicy {
    /// Delay before the given attempt (1-based).
    pub fn delay_ms(&self, attempt: u32) -> u64 {
        let exp = attempt.saturating_sub(1).min(20);
        self.base_delay_ms
            .saturating_mul(1u64 << exp)
            .min(self.max_delay_ms)
    }
}
