use crate::utils::error::RemoteError;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::time::Duration;

/// The two remote service contracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    Calculator,
    Employees,
}

impl Service {
    pub fn name(&self) -> &'static str {
        match self {
            Service::Calculator => "calculator",
            Service::Employees => "employees",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One remote round trip. Implementations must not retry or buffer.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn call(
        &self,
        service: Service,
        operation: &str,
        args: &[Value],
    ) -> Result<Value, RemoteError>;
}

pub trait ConfigProvider: Send + Sync {
    fn calculator_endpoint(&self) -> &str;
    fn employees_endpoint(&self) -> &str;
    fn timeout(&self) -> Duration;
}
