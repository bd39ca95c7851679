//! Application-wide constants
//!
//! Centralized location for magic strings and configuration values
//! that are used across multiple modules.

/// Fixed name of the durable storage record
pub const STORAGE_NAME: &str = "georgie-app-storage";

/// Version written into the storage envelope
pub const STORAGE_VERSION: u32 = 0;

/// Directory under the platform data dir used when no data dir is configured
pub const DATA_DIR_NAME: &str = "georgie";

// Settings bounds
pub const MIN_MAX_TOKENS: u32 = 100;
pub const MAX_MAX_TOKENS: u32 = 8192;
pub const MIN_TEMPERATURE: f64 = 0.0;
pub const MAX_TEMPERATURE: f64 = 2.0;

// Settings defaults
pub const DEFAULT_MAX_TOKENS: u32 = 2048;
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Models offered on the admin surface
pub const AVAILABLE_MODELS: &[&str] = &[
    "gpt-4o-mini",
    "gpt-4o",
    "claude-3.5-sonnet",
    "llama-3.3-70b",
    "gemini-2.5-flash",
    "deepseek-r1",
    "qwen-3-235b",
];

// Conversation defaults
pub const DEFAULT_CATEGORY_ID: &str = "general";
pub const DEFAULT_SYSTEM_PROMPT_ID: &str = "default";

/// Titles derived from a first chat message are cut to this many characters
pub const DERIVED_TITLE_MAX_CHARS: usize = 50;

/// Fixed latency of the mock assistant
pub const MOCK_RESPONSE_DELAY_MS: u64 = 1000;
