//! Stable, field-ordered text form of directory entities.
//!
//! Field order is fixed: identity and name, company fields, job fields,
//! then the boss identity when present. Strings are quoted with Rust's
//! escaping rules so the output never depends on locale.

use crate::domain::model::{Company, Employee, EmployeeList, Job};
use std::fmt::Write;

pub trait Diagnostic {
    fn write_diagnostic(&self, out: &mut String);

    fn diagnostic(&self) -> String {
        let mut out = String::new();
        self.write_diagnostic(&mut out);
        out
    }
}

pub fn to_string<T: Diagnostic + ?Sized>(entity: &T) -> String {
    entity.diagnostic()
}

impl Diagnostic for Company {
    fn write_diagnostic(&self, out: &mut String) {
        let _ = write!(out, "Company{{name={:?}", self.name);
        if let Some(address) = &self.address {
            let _ = write!(out, ", address={:?}", address);
        }
        out.push('}');
    }
}

impl Diagnostic for Job {
    fn write_diagnostic(&self, out: &mut String) {
        let _ = write!(out, "Job{{title={:?}", self.title);
        if let Some(salary) = self.salary {
            let _ = write!(out, ", salary={}", salary);
        }
        out.push('}');
    }
}

impl Diagnostic for Employee {
    fn write_diagnostic(&self, out: &mut String) {
        let _ = write!(out, "Employee{{identity={:?}, name={:?}, company=", self.identity, self.name);
        self.company.write_diagnostic(out);
        out.push_str(", job=");
        self.job.write_diagnostic(out);
        if let Some(boss) = &self.boss {
            let _ = write!(out, ", boss={:?}", boss);
        }
        out.push('}');
    }
}

impl Diagnostic for EmployeeList {
    fn write_diagnostic(&self, out: &mut String) {
        out.push_str("EmployeeList[");
        for (i, employee) in self.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            employee.write_diagnostic(out);
        }
        out.push(']');
    }
}

impl Diagnostic for [Employee] {
    fn write_diagnostic(&self, out: &mut String) {
        out.push('[');
        for (i, employee) in self.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            employee.write_diagnostic(out);
        }
        out.push(']');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_employee_field_order() {
        let employee = Employee::new(
            "eva",
            "Eva Marklund",
            Company::new("Acme AB").with_address("Storgatan 1, Umeå"),
            Job::new("Accountant").with_salary(32000),
        )
        .with_boss("adam");

        assert_eq!(
            to_string(&employee),
            "Employee{identity=\"eva\", name=\"Eva Marklund\", \
             company=Company{name=\"Acme AB\", address=\"Storgatan 1, Umeå\"}, \
             job=Job{title=\"Accountant\", salary=32000}, boss=\"adam\"}"
        );
    }

    #[test]
    fn test_optional_fields_are_omitted() {
        let employee = Employee::new("adam", "Adam Svensson", Company::new("Acme AB"), Job::new("CEO"));

        assert_eq!(
            employee.diagnostic(),
            "Employee{identity=\"adam\", name=\"Adam Svensson\", \
             company=Company{name=\"Acme AB\"}, job=Job{title=\"CEO\"}}"
        );
    }

    #[test]
    fn test_quotes_are_escaped() {
        let company = Company::new("The \"Best\" Co");
        assert_eq!(to_string(&company), "Company{name=\"The \\\"Best\\\" Co\"}");
    }

    #[test]
    fn test_list_and_slice_forms() {
        let list = EmployeeList::from(vec![
            Employee::new("a", "A", Company::new("C"), Job::new("J")),
            Employee::new("b", "B", Company::new("C"), Job::new("J")).with_boss("a"),
        ]);
        let text = to_string(&list);
        assert!(text.starts_with("EmployeeList[Employee{identity=\"a\""));
        assert!(text.ends_with("boss=\"a\"}]"));
        assert_eq!(to_string(list.as_slice()), format!("[{}]", &text["EmployeeList[".len()..text.len() - 1]));
        assert_eq!(to_string::<[Employee]>(&[]), "[]");
    }
}
