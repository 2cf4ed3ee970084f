use crate::config::MAX_TIMEOUT_SECONDS;
use crate::core::ConfigProvider;
use crate::utils::error::{ConfigError, ConfigResult};
use crate::utils::validation::{validate_endpoint, validate_finite, validate_range, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub client: Option<ClientConfig>,
    pub calculator: EndpointConfig,
    pub employees: EndpointConfig,
    pub demo: Option<DemoConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    pub endpoint: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoConfig {
    pub a: Option<f64>,
    pub b: Option<f64>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ConfigError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${EMPLOYEES_ENDPOINT})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> ConfigResult<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ConfigError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    pub fn timeout_seconds(&self) -> u64 {
        self.client
            .as_ref()
            .and_then(|c| c.timeout_seconds)
            .unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }
}

impl ConfigProvider for TomlConfig {
    fn calculator_endpoint(&self) -> &str {
        &self.calculator.endpoint
    }

    fn employees_endpoint(&self) -> &str {
        &self.employees.endpoint
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_endpoint("calculator.endpoint", &self.calculator.endpoint)?;
        validate_endpoint("employees.endpoint", &self.employees.endpoint)?;
        validate_range(
            "client.timeout_seconds",
            self.timeout_seconds(),
            1,
            MAX_TIMEOUT_SECONDS,
        )?;

        if let Some(demo) = &self.demo {
            if let Some(a) = demo.a {
                validate_finite("demo.a", a)?;
            }
            if let Some(b) = demo.b {
                validate_finite("demo.b", b)?;
            }
        }
        Ok(())
    }
}
