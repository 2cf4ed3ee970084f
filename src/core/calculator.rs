use crate::core::gateway::{Operation, RemoteGateway};
use crate::domain::ports::{Service, Transport};
use crate::utils::error::{DomainError, Result};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    Add,
    Subtract,
    Divide,
    Multiply,
    Modulo,
}

impl ArithmeticOp {
    /// Demonstration order.
    pub const SEQUENCE: [ArithmeticOp; 5] = [
        ArithmeticOp::Add,
        ArithmeticOp::Subtract,
        ArithmeticOp::Divide,
        ArithmeticOp::Multiply,
        ArithmeticOp::Modulo,
    ];

    pub fn operation(&self) -> Operation {
        match self {
            ArithmeticOp::Add => Operation::Add,
            ArithmeticOp::Subtract => Operation::Subtract,
            ArithmeticOp::Divide => Operation::Divide,
            ArithmeticOp::Multiply => Operation::Multiply,
            ArithmeticOp::Modulo => Operation::Modulo,
        }
    }
}

impl fmt::Display for ArithmeticOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.operation().wire_name())
    }
}

/// One entry of a sequence run, in call order.
#[derive(Debug, Clone, PartialEq)]
pub struct Calculation {
    pub op: ArithmeticOp,
    pub a: f64,
    pub b: f64,
    pub outcome: Result<f64>,
}

/// Type-safe front for the calculator service.
///
/// A zero divisor is forwarded as is: rejecting it is the remote
/// service's job, and its fault comes back as `InvalidArgument`.
#[derive(Clone)]
pub struct ArithmeticInvoker {
    gateway: RemoteGateway,
}

impl ArithmeticInvoker {
    pub fn new(gateway: RemoteGateway) -> Self {
        Self { gateway }
    }

    pub fn from_transport(transport: Arc<dyn Transport>) -> Self {
        Self::new(RemoteGateway::new(Service::Calculator, transport))
    }

    pub async fn add(&self, a: f64, b: f64) -> Result<f64> {
        self.apply(ArithmeticOp::Add, a, b).await
    }

    pub async fn subtract(&self, a: f64, b: f64) -> Result<f64> {
        self.apply(ArithmeticOp::Subtract, a, b).await
    }

    pub async fn divide(&self, a: f64, b: f64) -> Result<f64> {
        self.apply(ArithmeticOp::Divide, a, b).await
    }

    pub async fn multiply(&self, a: f64, b: f64) -> Result<f64> {
        self.apply(ArithmeticOp::Multiply, a, b).await
    }

    pub async fn modulo(&self, a: f64, b: f64) -> Result<f64> {
        self.apply(ArithmeticOp::Modulo, a, b).await
    }

    pub async fn apply(&self, op: ArithmeticOp, a: f64, b: f64) -> Result<f64> {
        // NaN/inf 無法以 JSON 數字傳遞
        if !a.is_finite() || !b.is_finite() {
            return Err(DomainError::invalid_argument(format!(
                "{} operands must be finite numbers, got ({}, {})",
                op, a, b
            )));
        }

        let result = self
            .gateway
            .call::<f64>(op.operation(), &[Value::from(a), Value::from(b)])
            .await?;
        tracing::debug!("🧮 {}({}, {}) = {}", op, a, b, result);
        Ok(result)
    }

    /// Runs all five operations on the same operands, one after the other.
    pub async fn run_sequence(&self, a: f64, b: f64) -> Vec<Calculation> {
        let mut calculations = Vec::with_capacity(ArithmeticOp::SEQUENCE.len());
        for op in ArithmeticOp::SEQUENCE {
            let outcome = self.apply(op, a, b).await;
            calculations.push(Calculation { op, a, b, outcome });
        }
        calculations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::{ErrorKind, RemoteError};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Echoes the operation name back and records it.
    struct ScriptedCalculator {
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Transport for ScriptedCalculator {
        async fn call(
            &self,
            _service: Service,
            operation: &str,
            args: &[Value],
        ) -> std::result::Result<Value, RemoteError> {
            self.seen.lock().unwrap().push(operation.to_string());
            let b = args[1].as_f64().unwrap_or_default();
            if operation == "divide" && b == 0.0 {
                return Err(RemoteError::Fault {
                    code: "Receiver".to_string(),
                    message: "Division by zero.".to_string(),
                });
            }
            Ok(Value::from(42.0))
        }
    }

    fn invoker() -> (ArithmeticInvoker, Arc<ScriptedCalculator>) {
        let transport = Arc::new(ScriptedCalculator {
            seen: Mutex::new(Vec::new()),
        });
        (ArithmeticInvoker::from_transport(transport.clone()), transport)
    }

    #[tokio::test]
    async fn test_sequence_reports_in_call_order() {
        let (invoker, transport) = invoker();

        let calculations = invoker.run_sequence(9.45, 5.63).await;

        let ops: Vec<ArithmeticOp> = calculations.iter().map(|c| c.op).collect();
        assert_eq!(ops, ArithmeticOp::SEQUENCE.to_vec());
        assert_eq!(
            *transport.seen.lock().unwrap(),
            vec!["add", "subtract", "divide", "multiply", "modulo"]
        );
        assert!(calculations.iter().all(|c| c.outcome.is_ok()));
    }

    #[tokio::test]
    async fn test_zero_divisor_is_forwarded_to_the_service() {
        let (invoker, transport) = invoker();

        let err = invoker.divide(9.45, 0.0).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(err.message(), "Division by zero.");
        assert_eq!(*transport.seen.lock().unwrap(), vec!["divide"]);
    }

    #[tokio::test]
    async fn test_non_finite_operand_fails_locally() {
        let (invoker, transport) = invoker();

        let err = invoker.add(f64::NAN, 1.0).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(transport.seen.lock().unwrap().is_empty());
    }
}
