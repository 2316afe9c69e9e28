use tracing::{error, instrument};
use uuid::Uuid;

use crate::{
    error::{HrError, HrResult},
    model::{Employee, EmployeePatch},
    service::EmployeeService,
    validation::{EmployeeForm, ValidationErrors},
};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FormMode {
    Create,
    Edit(Uuid),
}

pub struct EmployeeFormView {
    service: EmployeeService,
    pub form: EmployeeForm,
    pub mode: FormMode,
    pub submitting: bool,
    pub errors: ValidationErrors,
    pub notice: Option<String>,
}

impl EmployeeFormView {
    pub fn create(service: EmployeeService) -> Self {
        Self {
            service,
            form: EmployeeForm::default(),
            mode: FormMode::Create,
            submitting: false,
            errors: ValidationErrors::default(),
            notice: None,
        }
    }

    /// Pre-fill from an existing record; submitting updates it.
    pub fn edit(service: EmployeeService, employee: &Employee) -> Self {
        Self {
            form: EmployeeForm::from_employee(employee),
            mode: FormMode::Edit(employee.id),
            ..Self::create(service)
        }
    }

    /// Validate and send. Returns the saved record; the caller closes the
    /// form and re-fetches its list.
    #[instrument(name = "hr.employees.submit", skip_all, fields(mode = ?self.mode))]
    pub async fn submit(&mut self) -> HrResult<Employee> {
        let employee = match self.form.validate() {
            Ok(employee) => employee,
            Err(errors) => {
                self.errors = errors.clone();
                return Err(HrError::Validation(errors));
            }
        };
        self.errors = ValidationErrors::default();
        self.submitting = true;
        let result = match self.mode {
            FormMode::Create => self.service.create(&employee).await,
            FormMode::Edit(id) => {
                self.service
                    .update(id, &EmployeePatch::from(employee))
                    .await
            }
        };
        self.submitting = false;
        match result {
            Ok(saved) => {
                self.notice = None;
                Ok(saved)
            }
            Err(err) => {
                let notice = match self.mode {
                    FormMode::Create => "Failed to create employee",
                    FormMode::Edit(_) => "Failed to update employee",
                };
                error!(error = %err, "{notice}");
                self.notice = Some(notice.to_string());
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::{Department, EmployeeStatus},
        service::EMPLOYEES,
        validation::Issue,
    };
    use platform_gateway::{MemoryGateway, Operation};
    use std::sync::Arc;

    fn fill(form: &mut EmployeeForm) {
        form.first_name = "Noor".into();
        form.last_name = "Haddad".into();
        form.email = "noor@acme.test".into();
        form.phone = "555-0123".into();
        form.department = "Marketing".into();
        form.position = "Manager".into();
        form.hire_date = "2024-02-12".into();
        form.salary = "88000".into();
    }

    #[tokio::test]
    async fn invalid_form_blocks_submission() {
        let gateway = Arc::new(MemoryGateway::new());
        let mut view = EmployeeFormView::create(EmployeeService::new(gateway.clone()));
        view.form.email = "nope".into();
        let err = view.submit().await.unwrap_err();
        assert!(matches!(err, HrError::Validation(_)));
        assert_eq!(view.errors.issue("email"), Some(Issue::Email));
        assert!(view.errors.has("first_name"));
        assert!(!view.submitting);
        assert!(gateway.calls().await.is_empty());
    }

    #[tokio::test]
    async fn create_then_edit_round_trip() {
        let gateway = Arc::new(MemoryGateway::new());
        let service = EmployeeService::new(gateway.clone());
        let mut view = EmployeeFormView::create(service.clone());
        fill(&mut view.form);
        let created = view.submit().await.unwrap();
        assert_eq!(created.department, Department::Marketing);
        assert_eq!(created.status, EmployeeStatus::Active);

        let mut edit = EmployeeFormView::edit(service, &created);
        assert_eq!(edit.mode, FormMode::Edit(created.id));
        assert_eq!(edit.form.first_name, "Noor");
        edit.form.status = "on_leave".into();
        let saved = edit.submit().await.unwrap();
        assert_eq!(saved.id, created.id);
        assert_eq!(saved.status, EmployeeStatus::OnLeave);
        assert_eq!(gateway.rows(EMPLOYEES).await.len(), 1);
    }

    #[tokio::test]
    async fn gateway_failure_sets_notice_and_clears_submitting() {
        let gateway = Arc::new(MemoryGateway::new());
        gateway.fail_next(EMPLOYEES, Operation::Create).await;
        let mut view = EmployeeFormView::create(EmployeeService::new(gateway));
        fill(&mut view.form);
        assert!(view.submit().await.is_err());
        assert!(!view.submitting);
        assert_eq!(view.notice.as_deref(), Some("Failed to create employee"));
    }
}
