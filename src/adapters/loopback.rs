use crate::core::gateway::Operation;
use crate::domain::model::{Employee, EmployeeList};
use crate::domain::ports::{Service, Transport};
use crate::utils::error::RemoteError;
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

const SEED_EMPLOYEES: &str = include_str!("seed_employees.json");

/// In-process stand-in for both remote services.
///
/// Faults carry the same codes and messages the hosted services send, so
/// the whole translate-and-classify path is exercised without a network.
#[derive(Debug, Default)]
pub struct LoopbackTransport {
    // 保留插入順序，與遠端服務一致
    directory: Mutex<Vec<Employee>>,
}

impl LoopbackTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_employees(list: EmployeeList) -> Self {
        Self {
            directory: Mutex::new(list.into_iter().collect()),
        }
    }

    /// Seed from a JSON array of employee records carrying their identity.
    pub fn from_seed_json(json: &str) -> Result<Self, serde_json::Error> {
        let employees: Vec<Employee> = serde_json::from_str(json)?;
        Ok(Self::with_employees(EmployeeList::new(employees)))
    }

    /// The directory shipped with the crate.
    pub fn seeded() -> Result<Self, serde_json::Error> {
        Self::from_seed_json(SEED_EMPLOYEES)
    }

    pub async fn snapshot(&self) -> EmployeeList {
        EmployeeList::new(self.directory.lock().await.clone())
    }

    fn calculate(&self, operation: &str, args: &[Value]) -> Result<Value, RemoteError> {
        let (a, b) = match args {
            [a, b] => match (a.as_f64(), b.as_f64()) {
                (Some(a), Some(b)) => (a, b),
                _ => return Err(sender_fault("Expected two numeric operands.")),
            },
            _ => return Err(sender_fault("Expected two numeric operands.")),
        };

        let result = match operation {
            "add" => a + b,
            "subtract" => a - b,
            "multiply" => a * b,
            "divide" if b == 0.0 => return Err(receiver_fault("Division by zero.")),
            "divide" => a / b,
            "modulo" if b == 0.0 => return Err(receiver_fault("Modulo by zero.")),
            "modulo" => a % b,
            other => return Err(sender_fault(&format!("Unknown operation {}.", other))),
        };
        Ok(Value::from(result))
    }

    async fn serve_directory(&self, operation: &str, args: &[Value]) -> Result<Value, RemoteError> {
        let mut directory = self.directory.lock().await;

        match operation {
            "getIdentities" => Ok(Value::from(
                directory.iter().map(|e| e.identity.clone()).collect::<Vec<_>>(),
            )),
            "dumpEmployees" => Ok(serde_json::to_value(&*directory)?),
            "lookupEmployee" => {
                let identity = text_arg(args, 0)?;
                match position(&directory, identity) {
                    Some(i) => Ok(serde_json::to_value(&directory[i])?),
                    None => Ok(Value::Null),
                }
            }
            "findEmployee" => {
                let name = text_arg(args, 0)?;
                let matches: Vec<&Employee> = directory.iter().filter(|e| e.name == name).collect();
                Ok(serde_json::to_value(matches)?)
            }
            "hasEmployee" => {
                let identity = text_arg(args, 0)?;
                Ok(Value::from(position(&directory, identity).is_some()))
            }
            "getCompany" | "getJob" => {
                let identity = text_arg(args, 0)?;
                match position(&directory, identity) {
                    Some(i) if operation == "getCompany" => Ok(serde_json::to_value(&directory[i].company)?),
                    Some(i) => Ok(serde_json::to_value(&directory[i].job)?),
                    None => Ok(Value::Null),
                }
            }
            "getBoss" => {
                let identity = text_arg(args, 0)?;
                let boss = position(&directory, identity)
                    .and_then(|i| directory[i].boss.clone())
                    .and_then(|boss| position(&directory, &boss));
                match boss {
                    Some(i) => Ok(serde_json::to_value(&directory[i])?),
                    None => Ok(Value::Null),
                }
            }
            "addEmployee" => {
                let identity = text_arg(args, 0)?;
                if position(&directory, identity).is_some() {
                    return Err(receiver_fault("The employee already exist."));
                }
                let employee = record_arg(args, identity)?;
                directory.push(employee);
                Ok(Value::Null)
            }
            "updateEmployee" => {
                let identity = text_arg(args, 0)?;
                let Some(i) = position(&directory, identity) else {
                    return Err(receiver_fault("The employee don't exist."));
                };
                directory[i] = record_arg(args, identity)?;
                Ok(Value::Null)
            }
            "deleteEmployee" => {
                let identity = text_arg(args, 0)?;
                let Some(i) = position(&directory, identity) else {
                    return Err(receiver_fault("The employee don't exist."));
                };
                directory.remove(i);
                Ok(Value::Null)
            }
            other => Err(sender_fault(&format!("Unknown operation {}.", other))),
        }
    }
}

#[async_trait]
impl Transport for LoopbackTransport {
    async fn call(
        &self,
        service: Service,
        operation: &str,
        args: &[Value],
    ) -> Result<Value, RemoteError> {
        tracing::debug!("🔁 loopback {}::{}", service, operation);
        match Operation::from_wire_name(operation) {
            Some(op) if op.service() == service => {}
            _ => return Err(sender_fault(&format!("Unknown operation {}.", operation))),
        }
        match service {
            Service::Calculator => self.calculate(operation, args),
            Service::Employees => self.serve_directory(operation, args).await,
        }
    }
}

fn position(directory: &[Employee], identity: &str) -> Option<usize> {
    directory.iter().position(|e| e.identity == identity)
}

fn text_arg(args: &[Value], index: usize) -> Result<&str, RemoteError> {
    args.get(index)
        .and_then(Value::as_str)
        .ok_or_else(|| sender_fault("Expected a string argument."))
}

fn record_arg(args: &[Value], identity: &str) -> Result<Employee, RemoteError> {
    let value = args
        .get(1)
        .cloned()
        .ok_or_else(|| sender_fault("Expected an employee record."))?;
    let mut employee: Employee =
        serde_json::from_value(value).map_err(|e| sender_fault(&format!("Invalid employee record: {}", e)))?;
    employee.identity = identity.to_string();
    Ok(employee)
}

fn sender_fault(message: &str) -> RemoteError {
    RemoteError::Fault {
        code: "Sender".to_string(),
        message: message.to_string(),
    }
}

fn receiver_fault(message: &str) -> RemoteError {
    RemoteError::Fault {
        code: "Receiver".to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_seed_parses() {
        let transport = LoopbackTransport::seeded().unwrap();
        let directory = transport.directory.try_lock().unwrap();
        assert_eq!(directory.len(), 5);
        assert_eq!(directory[1].boss.as_deref(), Some("adam"));
        assert_eq!(directory[4].boss, None);
    }

    #[tokio::test]
    async fn test_calculator_faults() {
        let transport = LoopbackTransport::new();

        let err = transport
            .call(Service::Calculator, "divide", &[json!(1.0), json!(0.0)])
            .await
            .unwrap_err();
        assert!(matches!(err, RemoteError::Fault { ref message, .. } if message == "Division by zero."));

        let err = transport
            .call(Service::Calculator, "modulo", &[json!(1.0), json!(0)])
            .await
            .unwrap_err();
        assert!(matches!(err, RemoteError::Fault { ref message, .. } if message == "Modulo by zero."));

        let value = transport
            .call(Service::Calculator, "modulo", &[json!(7.5), json!(2.0)])
            .await
            .unwrap();
        assert_eq!(value, json!(1.5));
    }

    #[tokio::test]
    async fn test_add_existing_and_delete_missing_fault() {
        let transport = LoopbackTransport::seeded().unwrap();
        let record = json!({"name": "Eva", "company": {"name": "X"}, "job": {"title": "Y"}});

        let err = transport
            .call(Service::Employees, "addEmployee", &[json!("eva"), record])
            .await
            .unwrap_err();
        assert!(matches!(err, RemoteError::Fault { ref message, .. } if message == "The employee already exist."));

        let err = transport
            .call(Service::Employees, "deleteEmployee", &[json!("nobody")])
            .await
            .unwrap_err();
        assert!(matches!(err, RemoteError::Fault { ref message, .. } if message == "The employee don't exist."));
    }

    #[tokio::test]
    async fn test_unknown_or_misrouted_operation_is_sender_fault() {
        let transport = LoopbackTransport::new();

        for (service, operation) in [(Service::Calculator, "substract"), (Service::Employees, "add")] {
            let err = transport
                .call(service, operation, &[json!(1.0), json!(2.0)])
                .await
                .unwrap_err();
            assert!(matches!(err, RemoteError::Fault { ref code, .. } if code == "Sender"));
        }
    }

    #[tokio::test]
    async fn test_get_boss_null_for_unknown_and_top_level() {
        let transport = LoopbackTransport::seeded().unwrap();

        let unknown = transport.call(Service::Employees, "getBoss", &[json!("nobody")]).await.unwrap();
        let top = transport.call(Service::Employees, "getBoss", &[json!("adam")]).await.unwrap();
        let boss = transport.call(Service::Employees, "getBoss", &[json!("olle")]).await.unwrap();

        assert_eq!(unknown, Value::Null);
        assert_eq!(top, Value::Null);
        assert_eq!(boss["identity"], json!("eva"));
    }
}
