pub mod calculator;
pub mod diagnostic;
pub mod directory;
pub mod gateway;
pub mod hierarchy;
pub mod translator;

pub use crate::domain::model::{AsIdentity, Company, Employee, EmployeeList, Job};
pub use crate::domain::ports::{ConfigProvider, Service, Transport};
pub use crate::utils::error::Result;
