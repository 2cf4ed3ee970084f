pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{HttpTransport, LoopbackTransport};
pub use config::{toml_config::TomlConfig, CliConfig, DemoSelection};
pub use core::{
    calculator::ArithmeticInvoker,
    diagnostic::{to_string, Diagnostic},
    directory::DirectoryResolver,
    gateway::{Operation, RemoteGateway},
    hierarchy::OrgGraph,
    translator::classify,
};
pub use domain::model::{AsIdentity, Company, Employee, EmployeeList, Job};
pub use domain::ports::{ConfigProvider, Service, Transport};
pub use utils::error::{DomainError, ErrorKind, RemoteError, Result};
