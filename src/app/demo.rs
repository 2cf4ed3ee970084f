use crate::core::calculator::ArithmeticInvoker;
use crate::core::diagnostic::to_string;
use crate::core::directory::DirectoryResolver;
use crate::domain::model::{Company, Employee, Job};
use crate::utils::error::{DomainError, ErrorKind, ErrorSeverity, Result};

/// Outcome of a demonstration run. Every step is independent: a failure
/// is logged and recorded, then the run moves on.
#[derive(Debug, Clone, Default)]
pub struct DemoReport {
    pub succeeded: usize,
    pub failures: Vec<(String, DomainError)>,
}

impl DemoReport {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn worst_severity(&self) -> Option<ErrorSeverity> {
        self.failures
            .iter()
            .map(|(_, e)| e.severity())
            .max_by_key(|s| match s {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 1,
                ErrorSeverity::High => 2,
                ErrorSeverity::Critical => 3,
            })
    }

    pub fn merge(&mut self, other: DemoReport) {
        self.succeeded += other.succeeded;
        self.failures.extend(other.failures);
    }

    fn record<T>(&mut self, step: &str, outcome: Result<T>) -> Option<T> {
        match outcome {
            Ok(value) => {
                self.succeeded += 1;
                Some(value)
            }
            Err(e) => {
                tracing::warn!("❌ {}: {}", step, e);
                tracing::warn!("💡 {}", e.recovery_suggestion());
                self.failures.push((step.to_string(), e));
                None
            }
        }
    }

    /// A step that is meant to fail with `expected`.
    fn record_expected_failure<T>(&mut self, step: &str, outcome: Result<T>, expected: ErrorKind) {
        match outcome {
            Err(e) if e.kind() == expected => {
                tracing::info!("✅ {} failed as expected: {}", step, e.message());
                self.succeeded += 1;
            }
            Err(e) => {
                tracing::warn!("❌ {}: expected {} but got {}", step, expected, e);
                self.failures.push((step.to_string(), e));
            }
            Ok(_) => {
                tracing::warn!("❌ {}: expected {} but the call succeeded", step, expected);
                self.failures.push((
                    step.to_string(),
                    DomainError::remote_failure(format!("{} unexpectedly succeeded", step)),
                ));
            }
        }
    }
}

/// add, subtract, divide, multiply, modulo on (a, b), then divide by zero.
pub async fn run_calculator_demo(invoker: &ArithmeticInvoker, a: f64, b: f64) -> DemoReport {
    let mut report = DemoReport::default();

    for calculation in invoker.run_sequence(a, b).await {
        let step = format!("{}({}, {})", calculation.op, a, b);
        if let Some(result) = report.record(&step, calculation.outcome) {
            tracing::info!("Result ({}): {}", calculation.op, result);
        }
    }

    // 服務端應拒絕除以零
    let outcome = invoker.divide(a, 0.0).await;
    report.record_expected_failure(&format!("divide({}, 0)", a), outcome, ErrorKind::InvalidArgument);

    report
}

/// Replays the directory walkthrough: lookups, projections, search, dump,
/// then an add → update → delete round on a scratch identity.
pub async fn run_employees_demo(resolver: &DirectoryResolver) -> DemoReport {
    let mut report = DemoReport::default();

    tracing::info!("+++ Simple listing of all identities:");
    if let Some(identities) = report.record("getIdentities", resolver.list_identities().await) {
        tracing::info!("Employees (get->identities): {:?}", identities);
    }

    tracing::info!("+++ Lookup employees from identity:");
    let mut eva = None;
    for identity in ["olle", "carl", "adam", "eva"] {
        let step = format!("lookupEmployee({})", identity);
        if let Some(employee) = report.record(&step, resolver.lookup_employee(identity).await) {
            tracing::info!("Employees (lookup->employee): {}", to_string(&employee));
            eva = Some(employee);
        }
    }

    if let Some(eva) = eva.filter(|e| e.identity == "eva") {
        tracing::info!("Employees (lookup->company): {}", to_string(&eva.company));
        tracing::info!("Employees (lookup->job): {}", to_string(&eva.job));

        if let Some(boss) = eva.boss.as_deref() {
            let step = format!("lookupEmployee({})", boss);
            if let Some(boss) = report.record(&step, resolver.lookup_employee(boss).await) {
                tracing::info!("Employees (lookup->boss): {}", to_string(&boss));
            }
        }
    }

    if let Some(boss) = report.record("getBoss(eva)", resolver.get_boss("eva").await) {
        match boss {
            Some(boss) => {
                tracing::info!("Employees (get->boss): {}", to_string(&boss));
                // 以已解析的紀錄重新查詢
                let outcome = resolver.lookup_employee(&boss).await;
                if let Some(fresh) = report.record("lookupEmployee(boss record)", outcome) {
                    tracing::info!("Employees (lookup->boss record): {}", to_string(&fresh));
                }
            }
            None => tracing::info!("Employees (get->boss): eva has no boss"),
        }
    }
    if let Some(company) = report.record("getCompany(eva)", resolver.get_company("eva").await) {
        tracing::info!("Employees (get->company): {}", to_string(&company));
    }
    if let Some(job) = report.record("getJob(eva)", resolver.get_job("eva").await) {
        tracing::info!("Employees (get->job): {}", to_string(&job));
    }
    if let Some(chain) = report.record("bossChain(olle)", resolver.boss_chain("olle").await) {
        tracing::info!("Employees (chain->olle): {}", to_string(chain.as_slice()));
    }

    tracing::info!("+++ Find employee records by name:");
    for name in ["Adam Svensson", "Eva Marklund"] {
        let step = format!("findEmployee({})", name);
        if let Some(found) = report.record(&step, resolver.find_employee(name).await) {
            for employee in &found {
                tracing::info!("Employees (find->employee): {}", to_string(employee));
            }
        }
    }

    tracing::info!("+++ Dump all employees:");
    if let Some(list) = report.record("dumpEmployees", resolver.dump_employees().await) {
        tracing::info!("Employees (dump): {} record(s)", list.len());
    }
    if let Some(graph) = report.record("organisation", resolver.organisation().await) {
        let roots: Vec<&str> = graph.roots().into_iter().map(|e| e.identity.as_str()).collect();
        tracing::info!("Employees (graph->roots): {:?}", roots);
    }

    tracing::info!("+++ Add, update and delete employee:");
    run_crud_round(resolver, &mut report).await;

    report
}

async fn run_crud_round(resolver: &DirectoryResolver, report: &mut DemoReport) {
    const IDENTITY: &str = "anders";

    log_identities(report, resolver.list_identities().await);

    let employee = Employee::new(
        IDENTITY,
        "Anders Lövgren",
        Company::new("Nowise Systems"),
        Job::new("Programmer"),
    );
    report.record("addEmployee(anders)", resolver.add_employee(IDENTITY, &employee).await);
    log_identities(report, resolver.list_identities().await);

    if let Some(added) = report.record("lookupEmployee(anders)", resolver.lookup_employee(IDENTITY).await) {
        tracing::info!("Employees (lookup->employee): {}", to_string(&added));
    }

    let updated = Employee::new(
        IDENTITY,
        "Anders S Lövgren",
        Company::new("BMC-IT, Uppsala University").with_address("Husargata 3, Uppsala"),
        Job::new("System Developer"),
    );
    report.record("updateEmployee(anders)", resolver.update_employee(IDENTITY, &updated).await);
    log_identities(report, resolver.list_identities().await);

    if let Some(fetched) = report.record("lookupEmployee(anders)", resolver.lookup_employee(IDENTITY).await) {
        tracing::info!("Employees (lookup->employee): {}", to_string(&fetched));
    }

    report.record("deleteEmployee(anders)", resolver.delete_employee(IDENTITY).await);
    log_identities(report, resolver.list_identities().await);

    report.record_expected_failure(
        "lookupEmployee(anders) after delete",
        resolver.lookup_employee(IDENTITY).await,
        ErrorKind::NotFound,
    );

    if let Some(exists) = report.record("hasEmployee(anders)", resolver.has_employee(IDENTITY).await) {
        tracing::info!("Employees (has->employee): {}", exists);
    }
}

fn log_identities(report: &mut DemoReport, outcome: Result<Vec<String>>) {
    if let Some(identities) = report.record("getIdentities", outcome) {
        tracing::info!("Employees (get->identities): {:?}", identities);
    }
}
