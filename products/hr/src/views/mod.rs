//! Per-screen state driven through explicit load and action calls.
//!
//! A view owns transient copies of the collections it shows. Fetch failures
//! are logged and leave the previous copy in place; no view stays loading
//! once a fetch has resolved.

mod attendance;
mod dashboard;
mod employee_form;
mod employees;
mod leave;

use chrono::{NaiveDate, Utc};

pub use attendance::AttendanceView;
pub use dashboard::{DashboardView, RECENT_EMPLOYEES};
pub use employee_form::{EmployeeFormView, FormMode};
pub use employees::{DELETE_PROMPT, EmployeesView};
pub use leave::LeaveRequestsView;

/// Current calendar day in UTC.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}
