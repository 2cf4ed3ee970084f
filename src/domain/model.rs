use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// One directory record. The boss is a lookup key, never a nested record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub identity: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub company: Company,
    #[serde(default)]
    pub job: Job,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub boss: Option<String>,
}

impl Employee {
    pub fn new(identity: impl Into<String>, name: impl Into<String>, company: Company, job: Job) -> Self {
        Self {
            identity: identity.into(),
            name: name.into(),
            company,
            job,
            boss: None,
        }
    }

    pub fn with_boss(mut self, boss: impl Into<String>) -> Self {
        self.boss = Some(boss.into());
        self
    }

    pub fn has_boss(&self) -> bool {
        self.boss.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Company {
    #[serde(default)]
    pub name: String,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub address: Option<String>,
}

impl Company {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: None,
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Job {
    #[serde(default)]
    pub title: String,
    /// Monthly salary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<i64>,
}

impl Job {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            salary: None,
        }
    }

    pub fn with_salary(mut self, salary: i64) -> Self {
        self.salary = Some(salary);
        self
    }
}

/// Ordered, read-only result of a bulk dump.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmployeeList {
    employees: Vec<Employee>,
}

impl EmployeeList {
    pub fn new(employees: Vec<Employee>) -> Self {
        Self { employees }
    }

    pub fn len(&self) -> usize {
        self.employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Employee> {
        self.employees.iter()
    }

    pub fn get(&self, identity: &str) -> Option<&Employee> {
        self.employees.iter().find(|e| e.identity == identity)
    }

    pub fn identities(&self) -> Vec<&str> {
        self.employees.iter().map(|e| e.identity.as_str()).collect()
    }

    pub fn as_slice(&self) -> &[Employee] {
        &self.employees
    }
}

impl From<Vec<Employee>> for EmployeeList {
    fn from(employees: Vec<Employee>) -> Self {
        Self::new(employees)
    }
}

impl IntoIterator for EmployeeList {
    type Item = Employee;
    type IntoIter = std::vec::IntoIter<Employee>;

    fn into_iter(self) -> Self::IntoIter {
        self.employees.into_iter()
    }
}

impl<'a> IntoIterator for &'a EmployeeList {
    type Item = &'a Employee;
    type IntoIter = std::slice::Iter<'a, Employee>;

    fn into_iter(self) -> Self::IntoIter {
        self.employees.iter()
    }
}

/// Anything that can address an employee: a raw identity or a resolved record.
pub trait AsIdentity {
    fn as_identity(&self) -> &str;
}

impl AsIdentity for str {
    fn as_identity(&self) -> &str {
        self
    }
}

impl AsIdentity for String {
    fn as_identity(&self) -> &str {
        self
    }
}

impl AsIdentity for Employee {
    fn as_identity(&self) -> &str {
        &self.identity
    }
}

// 舊服務以 false 或空字串表示「沒有值」
fn deserialize_optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Flag(bool),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Text(text)) if !text.trim().is_empty() => Ok(Some(text)),
        Some(Raw::Flag(true)) => Err(D::Error::custom("expected a string, null or false")),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_boss_absent_null_false_and_empty_mean_no_superior() {
        for boss in [json!(null), json!(false), json!("")] {
            let employee: Employee = serde_json::from_value(json!({
                "name": "Adam Svensson",
                "company": {"name": "Acme"},
                "job": {"title": "CEO"},
                "boss": boss
            }))
            .unwrap();
            assert_eq!(employee.boss, None);
        }

        let employee: Employee = serde_json::from_value(json!({
            "name": "Adam Svensson",
            "company": {"name": "Acme"},
            "job": {"title": "CEO"}
        }))
        .unwrap();
        assert!(!employee.has_boss());
    }

    #[test]
    fn test_boss_identity_is_kept_as_key() {
        let employee: Employee = serde_json::from_value(json!({
            "identity": "eva",
            "name": "Eva Marklund",
            "company": {"name": "Acme", "address": "Storgatan 1"},
            "job": {"title": "Accountant", "salary": 32000},
            "boss": "adam"
        }))
        .unwrap();

        assert_eq!(employee.identity, "eva");
        assert_eq!(employee.boss.as_deref(), Some("adam"));
        assert_eq!(employee.company.address.as_deref(), Some("Storgatan 1"));
        assert_eq!(employee.job.salary, Some(32000));
    }

    #[test]
    fn test_boss_true_is_rejected() {
        let result: Result<Employee, _> = serde_json::from_value(json!({
            "name": "X",
            "boss": true
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_skips_missing_optionals() {
        let employee = Employee::new("anders", "Anders", Company::new("Nowise"), Job::new("Programmer"));
        let value = serde_json::to_value(&employee).unwrap();
        assert_eq!(
            value,
            json!({
                "identity": "anders",
                "name": "Anders",
                "company": {"name": "Nowise"},
                "job": {"title": "Programmer"}
            })
        );
    }

    #[test]
    fn test_employee_list_lookup_by_identity() {
        let list = EmployeeList::from(vec![
            Employee::new("adam", "Adam", Company::new("Acme"), Job::new("CEO")),
            Employee::new("eva", "Eva", Company::new("Acme"), Job::new("CFO")).with_boss("adam"),
        ]);
        assert_eq!(list.len(), 2);
        assert_eq!(list.identities(), vec!["adam", "eva"]);
        assert_eq!(list.get("eva").and_then(|e| e.boss.as_deref()), Some("adam"));
        assert!(list.get("olle").is_none());
    }
}
