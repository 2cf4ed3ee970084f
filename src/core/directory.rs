use crate::core::gateway::{Operation, RemoteGateway};
use crate::core::hierarchy::OrgGraph;
use crate::domain::model::{AsIdentity, Company, Employee, EmployeeList, Job};
use crate::domain::ports::{Service, Transport};
use crate::utils::error::{DomainError, Result};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;

/// Client-side logic for the employee directory.
///
/// Keeps no cache: every operation goes to the remote side, so a caller
/// issuing add → lookup → delete → lookup always observes its own writes.
#[derive(Clone)]
pub struct DirectoryResolver {
    gateway: RemoteGateway,
}

impl DirectoryResolver {
    pub fn new(gateway: RemoteGateway) -> Self {
        Self { gateway }
    }

    pub fn from_transport(transport: Arc<dyn Transport>) -> Self {
        Self::new(RemoteGateway::new(Service::Employees, transport))
    }

    /// Identities currently known to the directory, in remote order.
    pub async fn list_identities(&self) -> Result<Vec<String>> {
        let identities: Option<Vec<String>> =
            self.gateway.call(Operation::GetIdentities, &[]).await?;
        Ok(identities.unwrap_or_default())
    }

    /// Fetch one record. Accepts a raw identity or an already resolved
    /// `Employee`, which is re-fetched by its identity.
    pub async fn lookup_employee<K>(&self, key: &K) -> Result<Employee>
    where
        K: AsIdentity + ?Sized,
    {
        let identity = require_identity(key.as_identity())?;
        let found: Option<Employee> = self
            .gateway
            .call(Operation::LookupEmployee, &[Value::from(identity)])
            .await?;

        match found {
            Some(employee) => attach_identity(employee, identity),
            None => Err(unknown_identity(identity)),
        }
    }

    /// All records whose display name equals `name` exactly.
    pub async fn find_employee(&self, name: &str) -> Result<Vec<Employee>> {
        let found: Option<Vec<Employee>> = self
            .gateway
            .call(Operation::FindEmployee, &[Value::from(name)])
            .await?;

        let mut matches = found.unwrap_or_default();
        let before = matches.len();
        matches.retain(|e| e.name == name);
        if matches.len() != before {
            tracing::debug!(
                "🔎 findEmployee({}): dropped {} record(s) with a different name",
                name,
                before - matches.len()
            );
        }
        Ok(matches)
    }

    pub async fn get_company(&self, identity: &str) -> Result<Company> {
        let identity = require_identity(identity)?;
        let company: Option<Company> = self
            .gateway
            .call(Operation::GetCompany, &[Value::from(identity)])
            .await?;
        company.ok_or_else(|| unknown_identity(identity))
    }

    pub async fn get_job(&self, identity: &str) -> Result<Job> {
        let identity = require_identity(identity)?;
        let job: Option<Job> = self
            .gateway
            .call(Operation::GetJob, &[Value::from(identity)])
            .await?;
        job.ok_or_else(|| unknown_identity(identity))
    }

    /// The superior of `identity`, `None` when the record has no boss.
    ///
    /// The remote side answers null both for an unknown identity and for a
    /// record without a boss, so a null answer is settled with a lookup.
    pub async fn get_boss(&self, identity: &str) -> Result<Option<Employee>> {
        let identity = require_identity(identity)?;
        let boss: Option<Employee> = self
            .gateway
            .call(Operation::GetBoss, &[Value::from(identity)])
            .await?;

        if let Some(boss) = boss {
            if !boss.identity.is_empty() {
                return Ok(Some(boss));
            }
            // 回應沒有帶 identity，從下屬的 boss 欄位補上
            let subject = self.lookup_employee(identity).await?;
            return match subject.boss {
                Some(boss_identity) => attach_identity(boss, &boss_identity).map(Some),
                None => Err(DomainError::remote_failure(format!(
                    "getBoss returned a record for '{}' which has no boss",
                    identity
                ))),
            };
        }

        let subject = self.lookup_employee(identity).await?;
        match subject.boss {
            None => Ok(None),
            Some(boss_identity) => self.lookup_employee(&boss_identity).await.map(Some),
        }
    }

    /// Full snapshot, all or nothing.
    pub async fn dump_employees(&self) -> Result<EmployeeList> {
        let value: Value = self.gateway.call(Operation::DumpEmployees, &[]).await?;
        decode_dump(value)
    }

    pub async fn add_employee(&self, identity: &str, employee: &Employee) -> Result<()> {
        let record = outgoing_record(identity, employee)?;
        let _: Value = self
            .gateway
            .call(Operation::AddEmployee, &[Value::from(identity), record])
            .await?;
        tracing::debug!("➕ added employee {}", identity);
        Ok(())
    }

    /// Replaces the whole record; no field-level merge.
    pub async fn update_employee(&self, identity: &str, employee: &Employee) -> Result<()> {
        let record = outgoing_record(identity, employee)?;
        let _: Value = self
            .gateway
            .call(Operation::UpdateEmployee, &[Value::from(identity), record])
            .await?;
        tracing::debug!("✏️ updated employee {}", identity);
        Ok(())
    }

    pub async fn delete_employee(&self, identity: &str) -> Result<()> {
        let identity = require_identity(identity)?;
        let _: Value = self
            .gateway
            .call(Operation::DeleteEmployee, &[Value::from(identity)])
            .await?;
        tracing::debug!("🗑️ deleted employee {}", identity);
        Ok(())
    }

    /// Absence is `Ok(false)`; only a remote fault is an error.
    pub async fn has_employee(&self, identity: &str) -> Result<bool> {
        let identity = require_identity(identity)?;
        self.gateway
            .call(Operation::HasEmployee, &[Value::from(identity)])
            .await
    }

    /// Superiors of `identity`, nearest first, ending with a record that
    /// has no boss. Fails with `CycleDetected` instead of looping.
    pub async fn boss_chain(&self, identity: &str) -> Result<Vec<Employee>> {
        let start = self.lookup_employee(identity).await?;

        let mut path = vec![start.identity.clone()];
        let mut visited: HashSet<String> = path.iter().cloned().collect();
        let mut chain = Vec::new();
        let mut next = start.boss;

        while let Some(boss_identity) = next {
            if !visited.insert(boss_identity.clone()) {
                path.push(boss_identity.clone());
                return Err(DomainError::CycleDetected {
                    message: format!(
                        "Boss chain of '{}' loops back to '{}': {}",
                        start.identity,
                        boss_identity,
                        path.join(" -> ")
                    ),
                    chain: path,
                });
            }

            let boss = self.lookup_employee(&boss_identity).await?;
            path.push(boss_identity);
            next = boss.boss.clone();
            chain.push(boss);
        }

        tracing::debug!("🧭 boss chain of {}: {} hop(s)", start.identity, chain.len());
        Ok(chain)
    }

    /// Dump the directory and assemble it into a validated graph.
    pub async fn organisation(&self) -> Result<OrgGraph> {
        let list = self.dump_employees().await?;
        OrgGraph::from_list(list)
    }
}

fn require_identity(identity: &str) -> Result<&str> {
    if identity.trim().is_empty() {
        return Err(DomainError::invalid_argument(
            "Employee identity cannot be empty",
        ));
    }
    Ok(identity)
}

fn unknown_identity(identity: &str) -> DomainError {
    DomainError::not_found(format!("No employee with identity '{}'", identity))
}

fn attach_identity(mut employee: Employee, identity: &str) -> Result<Employee> {
    if employee.identity.is_empty() {
        employee.identity = identity.to_string();
    } else if employee.identity != identity {
        return Err(DomainError::remote_failure(format!(
            "Asked for employee '{}' but received '{}'",
            identity, employee.identity
        )));
    }
    Ok(employee)
}

fn outgoing_record(identity: &str, employee: &Employee) -> Result<Value> {
    let identity = require_identity(identity)?;
    if !employee.identity.is_empty() && employee.identity != identity {
        return Err(DomainError::invalid_argument(format!(
            "Record identity '{}' does not match target identity '{}'",
            employee.identity, identity
        )));
    }

    let mut record = employee.clone();
    record.identity = identity.to_string();
    serde_json::to_value(&record).map_err(|e| DomainError::invalid_argument(e.to_string()))
}

fn decode_dump(value: Value) -> Result<EmployeeList> {
    let malformed =
        |e: serde_json::Error| DomainError::remote_failure(format!("Malformed employee dump: {}", e));

    let employees = match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| serde_json::from_value::<Employee>(item).map_err(malformed))
            .collect::<Result<Vec<_>>>()?,
        Value::Object(entries) => entries
            .into_iter()
            .map(|(key, item)| {
                let employee = serde_json::from_value::<Employee>(item).map_err(malformed)?;
                attach_identity(employee, &key)
            })
            .collect::<Result<Vec<_>>>()?,
        other => {
            return Err(DomainError::remote_failure(format!(
                "Malformed employee dump: expected a list or a map, got {}",
                other
            )))
        }
    };

    Ok(EmployeeList::new(employees))
}
