use crate::utils::error::{Result, ResultsError};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_ENDPOINT: &str = "https://firestore.googleapis.com/v1";
pub const DEFAULT_DATABASE: &str = "(default)";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub firebase: FirebaseConfig,
}

/// Firebase 專案設定；只有 `project_id` 為必填
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirebaseConfig {
    pub project_id: String,
    pub api_key: Option<String>,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_database")]
    pub database: String,
    pub auth_domain: Option<String>,
    pub storage_bucket: Option<String>,
    pub messaging_sender_id: Option<String>,
    pub app_id: Option<String>,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_database() -> String {
    DEFAULT_DATABASE.to_string()
}

impl Default for FirebaseConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            api_key: None,
            endpoint: default_endpoint(),
            database: default_database(),
            auth_domain: None,
            storage_bucket: None,
            messaging_sender_id: None,
            app_id: None,
        }
    }
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ResultsError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ResultsError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${FIREBASE_API_KEY})，未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ResultsError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl Validate for FirebaseConfig {
    fn validate(&self) -> Result<()> {
        if self.project_id.trim().is_empty() {
            return Err(ResultsError::MissingConfigError {
                field: "firebase.project_id".to_string(),
            });
        }
        validation::validate_path_segment("firebase.project_id", &self.project_id)?;
        validation::validate_path_segment("firebase.database", &self.database)?;
        validation::validate_url("firebase.endpoint", &self.endpoint)?;

        if let Some(key) = &self.api_key {
            if key.contains("${") {
                return Err(ResultsError::InvalidConfigValueError {
                    field: "firebase.api_key".to_string(),
                    value: key.clone(),
                    reason: "Environment variable was not set".to_string(),
                });
            }
        }

        Ok(())
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.firebase.validate()
    }
}
