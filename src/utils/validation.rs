use crate::utils::error::{ConfigError, ConfigResult};
use url::Url;

pub trait Validate {
    fn validate(&self) -> ConfigResult<()>;
}

pub fn validate_endpoint(field_name: &str, url_str: &str) -> ConfigResult<()> {
    if url_str.is_empty() {
        return Err(ConfigError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(ConfigError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(ConfigError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> ConfigResult<()> {
    if value < min || value > max {
        return Err(ConfigError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

pub fn validate_finite(field_name: &str, value: f64) -> ConfigResult<()> {
    if !value.is_finite() {
        return Err(ConfigError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value must be a finite number".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_endpoint() {
        assert!(validate_endpoint("calculator.endpoint", "https://example.com/calc").is_ok());
        assert!(validate_endpoint("calculator.endpoint", "http://localhost:8080").is_ok());
        assert!(validate_endpoint("calculator.endpoint", "").is_err());
        assert!(validate_endpoint("calculator.endpoint", "invalid-url").is_err());
        assert!(validate_endpoint("calculator.endpoint", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("client.timeout_seconds", 30u64, 1, 600).is_ok());
        assert!(validate_range("client.timeout_seconds", 0u64, 1, 600).is_err());
        assert!(validate_range("client.timeout_seconds", 601u64, 1, 600).is_err());
    }

    #[test]
    fn test_validate_finite() {
        assert!(validate_finite("demo.a", 9.45).is_ok());
        assert!(validate_finite("demo.a", f64::NAN).is_err());
    }
}
