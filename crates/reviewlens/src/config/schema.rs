use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
}

fn default_batch_size() -> usize {
    20
}

impl Default for Config {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            service: ServiceConfig::default(),
            retry: RetryConfig::default(),
            dataset: DatasetConfig::default(),
            output: OutputConfig::default(),
            analytics: AnalyticsConfig::default(),
        }
    }
}

/// Connection settings for the chat completions endpoint.
///
/// The API key is resolved through [`crate::secrets::resolve_secret`] from
/// `api_key`, then `api_key_file`, then the `api_key_env_var` variable.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_key_file: Option<String>,
    #[serde(default = "default_api_key_env_var")]
    pub api_key_env_var: Option<String>,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_model() -> String {
    "llama-3.1-8b-instant".to_string()
}

fn default_api_key_env_var() -> Option<String> {
    Some("GROQ_API_KEY".to_string())
}

fn default_max_tokens() -> u32 {
    150
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key: None,
            api_key_file: None,
            api_key_env_var: default_api_key_env_var(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

// Keeps a direct API key out of debug output.
impl std::fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "****"))
            .field("api_key_file", &self.api_key_file)
            .field("api_key_env_var", &self.api_key_env_var)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_backoff_base_secs")]
    pub backoff_base_secs: u64,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_backoff_base_secs() -> u64 {
    2
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_base_secs: default_backoff_base_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetConfig {
    #[serde(default = "default_text_column")]
    pub text_column: String,
    #[serde(default = "default_category_column")]
    pub category_column: String,
    /// Rows kept from the raw dataset; `null` keeps every row.
    #[serde(default = "default_row_limit")]
    pub row_limit: Option<usize>,
}

fn default_text_column() -> String {
    "Review Text".to_string()
}

fn default_category_column() -> String {
    "Class Name".to_string()
}

fn default_row_limit() -> Option<usize> {
    Some(200)
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            text_column: default_text_column(),
            category_column: default_category_column(),
            row_limit: default_row_limit(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_directory")]
    pub directory: String,
    /// Mark the processed table read-only once written.
    #[serde(default = "default_true")]
    pub protect: bool,
}

fn default_output_directory() -> String {
    "output".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
            protect: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Count `error` and `none` rows in per-category totals.
    #[serde(default = "default_true")]
    pub include_sentinels: bool,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            include_sentinels: true,
        }
    }
}
