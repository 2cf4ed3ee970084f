pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::ConfigResult;
use crate::utils::validation::{validate_endpoint, validate_finite, validate_range, Validate};
use std::time::Duration;

#[cfg(feature = "cli")]
use clap::{Parser, ValueEnum};

pub const DEFAULT_CALCULATOR_ENDPOINT: &str = "http://localhost:8080/calculator";
pub const DEFAULT_EMPLOYEES_ENDPOINT: &str = "http://localhost:8080/employees";
pub const MAX_TIMEOUT_SECONDS: u64 = 600;

#[cfg_attr(feature = "cli", derive(ValueEnum))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoSelection {
    All,
    Calculator,
    Employees,
}

impl DemoSelection {
    pub fn includes_calculator(&self) -> bool {
        matches!(self, DemoSelection::All | DemoSelection::Calculator)
    }

    pub fn includes_employees(&self) -> bool {
        matches!(self, DemoSelection::All | DemoSelection::Employees)
    }
}

#[cfg_attr(feature = "cli", derive(Parser))]
#[cfg_attr(feature = "cli", command(name = "rpc-directory"))]
#[cfg_attr(
    feature = "cli",
    command(about = "Drive the calculator and employee directory services")
)]
#[derive(Debug, Clone)]
pub struct CliConfig {
    #[cfg_attr(feature = "cli", arg(long, default_value = DEFAULT_CALCULATOR_ENDPOINT))]
    pub calculator_endpoint: String,

    #[cfg_attr(feature = "cli", arg(long, default_value = DEFAULT_EMPLOYEES_ENDPOINT))]
    pub employees_endpoint: String,

    #[cfg_attr(feature = "cli", arg(long, default_value = "30"))]
    pub timeout_seconds: u64,

    /// TOML file whose values override the endpoint and timeout flags
    #[cfg_attr(feature = "cli", arg(short, long))]
    pub config: Option<String>,

    /// Serve both contracts in process instead of calling remote endpoints
    #[cfg_attr(feature = "cli", arg(long))]
    pub offline: bool,

    #[cfg_attr(feature = "cli", arg(long, value_enum, default_value = "all"))]
    pub demo: DemoSelection,

    #[cfg_attr(feature = "cli", arg(long, default_value = "9.45", allow_hyphen_values = true))]
    pub operand_a: f64,

    #[cfg_attr(feature = "cli", arg(long, default_value = "5.63", allow_hyphen_values = true))]
    pub operand_b: f64,

    #[cfg_attr(feature = "cli", arg(short, long, help = "Enable verbose output"))]
    pub verbose: bool,

    #[cfg_attr(feature = "cli", arg(long, help = "Emit logs as JSON lines"))]
    pub log_json: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            calculator_endpoint: DEFAULT_CALCULATOR_ENDPOINT.to_string(),
            employees_endpoint: DEFAULT_EMPLOYEES_ENDPOINT.to_string(),
            timeout_seconds: 30,
            config: None,
            offline: false,
            demo: DemoSelection::All,
            operand_a: 9.45,
            operand_b: 5.63,
            verbose: false,
            log_json: false,
        }
    }
}

impl CliConfig {
    /// Apply values from a TOML file on top of the command line.
    pub fn merge_toml(&mut self, file: &toml_config::TomlConfig) {
        self.calculator_endpoint = file.calculator.endpoint.clone();
        self.employees_endpoint = file.employees.endpoint.clone();
        if let Some(timeout) = file.client.as_ref().and_then(|c| c.timeout_seconds) {
            self.timeout_seconds = timeout;
        }
        if let Some(demo) = &file.demo {
            self.operand_a = demo.a.unwrap_or(self.operand_a);
            self.operand_b = demo.b.unwrap_or(self.operand_b);
        }
    }
}

impl ConfigProvider for CliConfig {
    fn calculator_endpoint(&self) -> &str {
        &self.calculator_endpoint
    }

    fn employees_endpoint(&self) -> &str {
        &self.employees_endpoint
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_range("timeout_seconds", self.timeout_seconds, 1, MAX_TIMEOUT_SECONDS)?;
        validate_finite("operand_a", self.operand_a)?;
        validate_finite("operand_b", self.operand_b)?;

        // 離線模式不需要遠端端點
        if !self.offline {
            validate_endpoint("calculator_endpoint", &self.calculator_endpoint)?;
            validate_endpoint("employees_endpoint", &self.employees_endpoint)?;
        }
        Ok(())
    }
}
