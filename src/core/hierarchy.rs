use crate::domain::model::{Employee, EmployeeList};
use crate::utils::error::{DomainError, Result};
use std::collections::{HashMap, HashSet};

/// Employee graph assembled from a dump: boss references resolved to
/// identities that are known to be present, with no cycles.
#[derive(Debug, Clone)]
pub struct OrgGraph {
    order: Vec<String>,
    employees: HashMap<String, Employee>,
    reports: HashMap<String, Vec<String>>,
}

impl OrgGraph {
    pub fn from_list(list: EmployeeList) -> Result<Self> {
        let mut order = Vec::with_capacity(list.len());
        let mut employees = HashMap::with_capacity(list.len());

        for employee in list {
            if employee.identity.trim().is_empty() {
                return Err(DomainError::invalid_argument(format!(
                    "Directory entry '{}' has no identity",
                    employee.name
                )));
            }
            if employees.contains_key(&employee.identity) {
                return Err(DomainError::invalid_argument(format!(
                    "Identity '{}' appears more than once",
                    employee.identity
                )));
            }
            order.push(employee.identity.clone());
            employees.insert(employee.identity.clone(), employee);
        }

        let mut reports: HashMap<String, Vec<String>> = HashMap::new();
        for identity in &order {
            if let Some(boss) = employees[identity].boss.as_ref() {
                if !employees.contains_key(boss) {
                    return Err(DomainError::not_found(format!(
                        "Boss '{}' of '{}' is not in the directory",
                        boss, identity
                    )));
                }
                reports.entry(boss.clone()).or_default().push(identity.clone());
            }
        }

        let graph = Self {
            order,
            employees,
            reports,
        };
        graph.reject_cycles()?;
        Ok(graph)
    }

    fn reject_cycles(&self) -> Result<()> {
        let mut settled: HashSet<&str> = HashSet::new();

        for start in &self.order {
            let mut path: Vec<&str> = Vec::new();
            let mut on_path: HashSet<&str> = HashSet::new();
            let mut current = Some(start.as_str());

            while let Some(identity) = current {
                if settled.contains(identity) {
                    break;
                }
                if !on_path.insert(identity) {
                    let first = path.iter().position(|p| *p == identity).unwrap_or(0);
                    let mut chain: Vec<String> = path[first..].iter().map(|p| p.to_string()).collect();
                    chain.push(identity.to_string());
                    return Err(DomainError::CycleDetected {
                        message: format!("Boss references form a cycle: {}", chain.join(" -> ")),
                        chain,
                    });
                }
                path.push(identity);
                current = self.employees[identity].boss.as_deref();
            }

            settled.extend(path);
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get(&self, identity: &str) -> Option<&Employee> {
        self.employees.get(identity)
    }

    pub fn boss_of(&self, identity: &str) -> Option<&Employee> {
        self.get(identity)?
            .boss
            .as_deref()
            .and_then(|boss| self.employees.get(boss))
    }

    /// Superiors, nearest first.
    pub fn chain(&self, identity: &str) -> Vec<&Employee> {
        let mut chain = Vec::new();
        let mut current = self.boss_of(identity);
        while let Some(boss) = current {
            chain.push(boss);
            current = self.boss_of(&boss.identity);
        }
        chain
    }

    /// Direct reports in dump order.
    pub fn subordinates(&self, identity: &str) -> Vec<&Employee> {
        self.reports
            .get(identity)
            .map(|ids| ids.iter().filter_map(|id| self.employees.get(id)).collect())
            .unwrap_or_default()
    }

    /// Records without a boss.
    pub fn roots(&self) -> Vec<&Employee> {
        self.iter().filter(|e| !e.has_boss()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Employee> + '_ {
        self.order.iter().filter_map(|id| self.employees.get(id))
    }
}
