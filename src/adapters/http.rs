use crate::core::gateway::DEFAULT_TIMEOUT;
use crate::domain::ports::{ConfigProvider, Service, Transport};
use crate::utils::error::RemoteError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// JSON over HTTP: one POST per operation to the service's endpoint.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    calculator_endpoint: String,
    employees_endpoint: String,
    timeout: Duration,
}

#[derive(Serialize)]
struct Envelope<'a> {
    operation: &'a str,
    args: &'a [Value],
}

#[derive(Deserialize)]
struct Reply {
    #[serde(rename = "return", default)]
    value: Value,
    #[serde(default)]
    fault: Option<FaultBody>,
}

#[derive(Deserialize)]
struct FaultBody {
    #[serde(default = "default_fault_code")]
    code: String,
    message: String,
}

fn default_fault_code() -> String {
    "Receiver".to_string()
}

impl From<FaultBody> for RemoteError {
    fn from(fault: FaultBody) -> Self {
        RemoteError::Fault {
            code: fault.code,
            message: fault.message,
        }
    }
}

impl HttpTransport {
    pub fn new(calculator_endpoint: impl Into<String>, employees_endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            calculator_endpoint: calculator_endpoint.into(),
            employees_endpoint: employees_endpoint.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Self {
        Self::new(config.calculator_endpoint(), config.employees_endpoint()).with_timeout(config.timeout())
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn endpoint(&self, service: Service) -> &str {
        match service {
            Service::Calculator => &self.calculator_endpoint,
            Service::Employees => &self.employees_endpoint,
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn call(
        &self,
        service: Service,
        operation: &str,
        args: &[Value],
    ) -> Result<Value, RemoteError> {
        let endpoint = self.endpoint(service);
        tracing::debug!("📡 POST {} ({})", endpoint, operation);

        let response = self
            .client
            .post(endpoint)
            .json(&Envelope { operation, args })
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;
        tracing::debug!("📡 {} answered {} ({} bytes)", operation, status, body.len());

        if !status.is_success() {
            // 服務端錯誤通常仍帶有 fault 內容
            if let Ok(Reply { fault: Some(fault), .. }) = serde_json::from_str::<Reply>(&body) {
                return Err(fault.into());
            }
            return Err(RemoteError::Status {
                status: status.as_u16(),
                body,
            });
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        let reply: Reply = serde_json::from_str(&body)?;
        match reply.fault {
            Some(fault) => Err(fault.into()),
            None => Ok(reply.value),
        }
    }
}

impl HttpTransport {
    fn transport_error(&self, error: reqwest::Error) -> RemoteError {
        if error.is_timeout() {
            RemoteError::Timeout(self.timeout)
        } else {
            RemoteError::Transport(error)
        }
    }
}
