use crate::core::translator::classify;
use crate::domain::ports::{Service, Transport};
use crate::utils::error::{DomainError, RemoteError, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// The fixed set of remote operations across both services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Add,
    Subtract,
    Divide,
    Multiply,
    Modulo,
    GetIdentities,
    LookupEmployee,
    FindEmployee,
    DumpEmployees,
    AddEmployee,
    UpdateEmployee,
    DeleteEmployee,
    HasEmployee,
    GetBoss,
    GetCompany,
    GetJob,
}

impl Operation {
    pub const ALL: [Operation; 16] = [
        Operation::Add,
        Operation::Subtract,
        Operation::Divide,
        Operation::Multiply,
        Operation::Modulo,
        Operation::GetIdentities,
        Operation::LookupEmployee,
        Operation::FindEmployee,
        Operation::DumpEmployees,
        Operation::AddEmployee,
        Operation::UpdateEmployee,
        Operation::DeleteEmployee,
        Operation::HasEmployee,
        Operation::GetBoss,
        Operation::GetCompany,
        Operation::GetJob,
    ];

    pub fn wire_name(&self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Subtract => "subtract",
            Operation::Divide => "divide",
            Operation::Multiply => "multiply",
            Operation::Modulo => "modulo",
            Operation::GetIdentities => "getIdentities",
            Operation::LookupEmployee => "lookupEmployee",
            Operation::FindEmployee => "findEmployee",
            Operation::DumpEmployees => "dumpEmployees",
            Operation::AddEmployee => "addEmployee",
            Operation::UpdateEmployee => "updateEmployee",
            Operation::DeleteEmployee => "deleteEmployee",
            Operation::HasEmployee => "hasEmployee",
            Operation::GetBoss => "getBoss",
            Operation::GetCompany => "getCompany",
            Operation::GetJob => "getJob",
        }
    }

    pub fn from_wire_name(name: &str) -> Option<Operation> {
        Self::ALL.iter().copied().find(|op| op.wire_name() == name)
    }

    /// Number of positional arguments the operation takes.
    pub fn arity(&self) -> usize {
        match self {
            Operation::Add
            | Operation::Subtract
            | Operation::Divide
            | Operation::Multiply
            | Operation::Modulo
            | Operation::AddEmployee
            | Operation::UpdateEmployee => 2,
            Operation::GetIdentities | Operation::DumpEmployees => 0,
            Operation::LookupEmployee
            | Operation::FindEmployee
            | Operation::DeleteEmployee
            | Operation::HasEmployee
            | Operation::GetBoss
            | Operation::GetCompany
            | Operation::GetJob => 1,
        }
    }

    pub fn service(&self) -> Service {
        match self {
            Operation::Add
            | Operation::Subtract
            | Operation::Divide
            | Operation::Multiply
            | Operation::Modulo => Service::Calculator,
            _ => Service::Employees,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Issues exactly one remote invocation per call against one service.
///
/// Holds no state besides its wiring, so clones can be shared freely
/// between concurrent callers.
#[derive(Clone)]
pub struct RemoteGateway {
    service: Service,
    transport: Arc<dyn Transport>,
    timeout: Duration,
}

impl RemoteGateway {
    pub fn new(service: Service, transport: Arc<dyn Transport>) -> Self {
        Self {
            service,
            transport,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn service(&self) -> Service {
        self.service
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn invoke(
        &self,
        operation: Operation,
        args: &[Value],
    ) -> std::result::Result<Value, RemoteError> {
        // 先做本地檢查，不發出任何網路請求
        if operation.service() != self.service {
            return Err(RemoteError::WrongService {
                operation: operation.wire_name(),
                service: self.service.name(),
            });
        }
        if args.len() != operation.arity() {
            return Err(RemoteError::Arity {
                operation: operation.wire_name(),
                expected: operation.arity(),
                actual: args.len(),
            });
        }

        tracing::debug!("📡 {}: invoking {} with {} arg(s)", self.service, operation, args.len());

        // 逾時後 future 被丟棄，進行中的請求隨之取消
        let call = self.transport.call(self.service, operation.wire_name(), args);
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(RemoteError::Timeout(self.timeout)),
        }
    }

    /// Invoke, classify any failure and decode the returned value.
    pub async fn call<T: DeserializeOwned>(&self, operation: Operation, args: &[Value]) -> Result<T> {
        let value = self.invoke(operation, args).await.map_err(|e| {
            let error = classify(e);
            tracing::warn!("⚠️ {}: {} failed: {}", self.service, operation, error);
            error
        })?;

        serde_json::from_value(value).map_err(|e| {
            tracing::warn!("⚠️ {}: {} returned an unexpected payload: {}", self.service, operation, e);
            DomainError::remote_failure(format!(
                "Unexpected {} response payload: {}",
                operation, e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::ErrorKind;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct RecordingTransport {
        calls: AtomicUsize,
        reply: Value,
        delay: Option<Duration>,
    }

    impl RecordingTransport {
        fn new(reply: Value) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                reply,
                delay: None,
            }
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn call(
            &self,
            _service: Service,
            _operation: &str,
            _args: &[Value],
        ) -> std::result::Result<Value, RemoteError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            Ok(self.reply.clone())
        }
    }

    #[test]
    fn test_wire_names_round_trip_and_services() {
        for op in Operation::ALL {
            assert_eq!(Operation::from_wire_name(op.wire_name()), Some(op));
        }
        assert_eq!(Operation::from_wire_name("substract"), None);
        assert_eq!(Operation::Modulo.service(), Service::Calculator);
        assert_eq!(Operation::GetJob.service(), Service::Employees);
        assert_eq!(Operation::DumpEmployees.arity(), 0);
        assert_eq!(Operation::UpdateEmployee.arity(), 2);
    }

    #[tokio::test]
    async fn test_invoke_issues_exactly_one_call() {
        let transport = Arc::new(RecordingTransport::new(json!(15.08)));
        let gateway = RemoteGateway::new(Service::Calculator, transport.clone());

        let value = gateway.invoke(Operation::Add, &[json!(9.45), json!(5.63)]).await.unwrap();

        assert_eq!(value, json!(15.08));
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_arity_mismatch_fails_before_network() {
        let transport = Arc::new(RecordingTransport::new(json!(null)));
        let gateway = RemoteGateway::new(Service::Calculator, transport.clone());

        let err = gateway.call::<f64>(Operation::Divide, &[json!(1.0)]).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_operation_of_other_service_is_rejected_locally() {
        let transport = Arc::new(RecordingTransport::new(json!(true)));
        let gateway = RemoteGateway::new(Service::Calculator, transport.clone());

        let err = gateway.invoke(Operation::HasEmployee, &[json!("eva")]).await.unwrap_err();

        assert!(matches!(err, RemoteError::WrongService { .. }));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_timeout_becomes_remote_failure() {
        let transport =
            Arc::new(RecordingTransport::new(json!(1.0)).with_delay(Duration::from_millis(200)));
        let gateway = RemoteGateway::new(Service::Calculator, transport)
            .with_timeout(Duration::from_millis(20));

        let err = gateway.call::<f64>(Operation::Add, &[json!(1.0), json!(2.0)]).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::RemoteFailure);
        assert!(err.message().contains("timed out"));
    }

    #[tokio::test]
    async fn test_undecodable_payload_is_remote_failure() {
        let transport = Arc::new(RecordingTransport::new(json!("not a number")));
        let gateway = RemoteGateway::new(Service::Calculator, transport);

        let err = gateway.call::<f64>(Operation::Add, &[json!(1.0), json!(2.0)]).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::RemoteFailure);
    }
}
