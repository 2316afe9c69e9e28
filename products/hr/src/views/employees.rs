use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::{
    error::HrResult,
    filter::{EmployeeCriteria, filter},
    model::{Department, Employee, EmployeeStatus},
    service::EmployeeService,
    workflow::{ActionOutcome, Confirm},
};

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this employee?";
const DELETE_FAILED: &str = "Failed to delete employee";

pub struct EmployeesView {
    service: EmployeeService,
    pub employees: Vec<Employee>,
    pub filtered: Vec<Employee>,
    criteria: EmployeeCriteria,
    pub loading: bool,
    pub notice: Option<String>,
}

impl EmployeesView {
    pub fn new(service: EmployeeService) -> Self {
        Self {
            service,
            employees: Vec::new(),
            filtered: Vec::new(),
            criteria: EmployeeCriteria::default(),
            loading: false,
            notice: None,
        }
    }

    pub fn criteria(&self) -> &EmployeeCriteria {
        &self.criteria
    }

    /// Re-fetch the full list. On failure the previous list is kept.
    pub async fn load(&mut self) -> HrResult<()> {
        self.loading = true;
        let result = self.service.list().await;
        self.loading = false;
        match result {
            Ok(employees) => {
                self.employees = employees;
                self.apply();
                Ok(())
            }
            Err(err) => {
                error!(error = %err, "failed to load employees");
                Err(err)
            }
        }
    }

    pub fn set_criteria(&mut self, criteria: EmployeeCriteria) {
        self.criteria = criteria;
        self.apply();
    }

    pub fn set_term(&mut self, term: Option<String>) {
        self.criteria.term = term;
        self.apply();
    }

    pub fn set_department(&mut self, department: Option<Department>) {
        self.criteria.department = department;
        self.apply();
    }

    pub fn set_status(&mut self, status: Option<EmployeeStatus>) {
        self.criteria.status = status;
        self.apply();
    }

    fn apply(&mut self) {
        self.filtered = filter(&self.employees, &self.criteria);
    }

    /// Delete after confirmation, then re-fetch.
    #[instrument(name = "hr.employees.remove", skip_all, fields(id = %id))]
    pub async fn delete(&mut self, id: Uuid, confirm: &impl Confirm) -> HrResult<ActionOutcome> {
        if !confirm.confirm(DELETE_PROMPT) {
            return Ok(ActionOutcome::Declined);
        }
        if let Err(err) = self.service.delete(id).await {
            error!(error = %err, "failed to delete employee");
            self.notice = Some(DELETE_FAILED.to_string());
            return Err(err);
        }
        info!("employee deleted");
        self.notice = None;
        self.load().await?;
        Ok(ActionOutcome::Applied)
    }
}
