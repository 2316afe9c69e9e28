use chrono::NaiveDate;
use tracing::{Instrument, error, info_span};

use crate::{
    model::Employee,
    service::HrServices,
    stats::{AttendanceStats, EmployeeStats, LeaveStats},
};

pub const RECENT_EMPLOYEES: usize = 5;

pub struct DashboardView {
    services: HrServices,
    pub employee_stats: EmployeeStats,
    pub leave_stats: LeaveStats,
    pub attendance_stats: AttendanceStats,
    pub recent_employees: Vec<Employee>,
    pub loading: bool,
}

impl DashboardView {
    pub fn new(services: HrServices) -> Self {
        Self {
            services,
            employee_stats: EmployeeStats::default(),
            leave_stats: LeaveStats::default(),
            attendance_stats: AttendanceStats::default(),
            recent_employees: Vec::new(),
            loading: false,
        }
    }

    /// Fetch all four panels at once. A failed panel is logged and zeroed;
    /// the others still fill in.
    pub async fn load(&mut self, today: NaiveDate) {
        self.loading = true;
        let services = &self.services;
        let span = info_span!("hr.dashboard.load", %today);
        let (employee_stats, leave_stats, attendance_stats, employees) = async {
            tokio::join!(
                services.employees.stats(),
                services.leave.stats(),
                services.attendance.stats_for(today),
                services.employees.list(),
            )
        }
        .instrument(span)
        .await;

        self.employee_stats = employee_stats.unwrap_or_else(|err| {
            error!(error = %err, "failed to load employee stats");
            EmployeeStats::default()
        });
        self.leave_stats = leave_stats.unwrap_or_else(|err| {
            error!(error = %err, "failed to load leave stats");
            LeaveStats::default()
        });
        self.attendance_stats = attendance_stats.unwrap_or_else(|err| {
            error!(error = %err, "failed to load attendance stats");
            AttendanceStats::default()
        });
        self.recent_employees = match employees {
            Ok(mut employees) => {
                employees.truncate(RECENT_EMPLOYEES);
                employees
            }
            Err(err) => {
                error!(error = %err, "failed to load recent employees");
                Vec::new()
            }
        };
        self.loading = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::{ATTENDANCE, EMPLOYEES, LEAVE_REQUESTS};
    use platform_gateway::{MemoryGateway, Operation};
    use serde_json::json;
    use std::sync::Arc;
    use uuid::Uuid;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 20).unwrap()
    }

    async fn populated() -> Arc<MemoryGateway> {
        let gateway = Arc::new(MemoryGateway::new());
        let employees = (0..7)
            .map(|n| {
                json!({
                    "id": Uuid::new_v4(), "first_name": format!("E{n}"), "last_name": "Staff",
                    "email": format!("e{n}@acme.test"), "phone": "555-0100",
                    "department": if n % 2 == 0 { "Sales" } else { "Finance" },
                    "position": "Clerk", "hire_date": "2022-01-03", "salary": 40000,
                    "status": "active", "created_at": format!("2024-01-0{}T08:00:00Z", n + 1)
                })
            })
            .collect();
        gateway.insert_rows(EMPLOYEES, employees).await;
        gateway
            .insert_rows(
                ATTENDANCE,
                vec![
                    json!({"id": Uuid::new_v4(), "employee_id": Uuid::new_v4(), "date": "2024-05-20", "check_in": "09:00:00", "status": "present"}),
                    json!({"id": Uuid::new_v4(), "employee_id": Uuid::new_v4(), "date": "2024-05-19", "check_in": "09:00:00", "status": "absent"}),
                ],
            )
            .await;
        gateway
            .insert_rows(
                LEAVE_REQUESTS,
                vec![json!({
                    "id": Uuid::new_v4(), "employee_id": Uuid::new_v4(), "leave_type": "sick",
                    "start_date": "2024-05-21", "end_date": "2024-05-22", "reason": "",
                    "status": "pending"
                })],
            )
            .await;
        gateway
    }

    #[tokio::test]
    async fn load_fills_every_panel() {
        let mut view = DashboardView::new(HrServices::new(populated().await));
        view.load(day()).await;
        assert!(!view.loading);
        assert_eq!(view.employee_stats.total, 7);
        assert_eq!(view.leave_stats.pending, 1);
        assert_eq!(view.attendance_stats.total, 1);
        assert_eq!(view.attendance_stats.present, 1);
        assert_eq!(view.recent_employees.len(), RECENT_EMPLOYEES);
        assert_eq!(view.recent_employees[0].first_name, "E6");
    }

    #[tokio::test]
    async fn failed_panel_is_zeroed_without_touching_others() {
        let gateway = populated().await;
        gateway.fail_next(LEAVE_REQUESTS, Operation::List).await;
        let mut view = DashboardView::new(HrServices::new(gateway));
        view.load(day()).await;
        assert!(!view.loading);
        assert_eq!(view.leave_stats, LeaveStats::default());
        assert_eq!(view.employee_stats.total, 7);
    }

    #[tokio::test]
    async fn empty_backend_gives_zero_stats() {
        let mut view = DashboardView::new(HrServices::new(Arc::new(MemoryGateway::new())));
        view.load(day()).await;
        assert_eq!(view.employee_stats, EmployeeStats::default());
        assert_eq!(view.attendance_stats, AttendanceStats::default());
        assert!(view.recent_employees.is_empty());
        assert!(!view.loading);
    }
}
