use async_graphql::{Enum, ID, InputObject, SimpleObject};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use products_hr::{
    display::format_salary,
    filter::{EmployeeCriteria, LeaveCriteria},
    model::{self, AttendanceRecord, Employee, LeaveRequest},
    stats,
    validation::EmployeeForm,
    workflow,
};

macro_rules! mirror_enum {
    ($gql:ident, $module:ident::$domain:ident, { $($variant:ident),+ $(,)? }) => {
        impl From<$module::$domain> for $gql {
            fn from(value: $module::$domain) -> Self {
                match value {
                    $($module::$domain::$variant => $gql::$variant,)+
                }
            }
        }

        impl From<$gql> for $module::$domain {
            fn from(value: $gql) -> Self {
                match value {
                    $($gql::$variant => $module::$domain::$variant,)+
                }
            }
        }
    };
}

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
pub enum Department {
    Engineering,
    #[graphql(name = "HR")]
    Hr,
    Sales,
    Marketing,
    Finance,
    Operations,
    Unknown,
}

mirror_enum!(Department, model::Department, {
    Engineering, Hr, Sales, Marketing, Finance, Operations, Unknown
});

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq, Default)]
pub enum EmployeeStatus {
    #[default]
    Active,
    OnLeave,
    Inactive,
    Unknown,
}

mirror_enum!(EmployeeStatus, model::EmployeeStatus, {
    Active, OnLeave, Inactive, Unknown
});

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
    HalfDay,
    Unknown,
}

mirror_enum!(AttendanceStatus, model::AttendanceStatus, {
    Present, Absent, Late, HalfDay, Unknown
});

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
pub enum LeaveType {
    Vacation,
    Sick,
    Personal,
    Other,
    Unknown,
}

mirror_enum!(LeaveType, model::LeaveType, {
    Vacation, Sick, Personal, Other, Unknown
});

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
    Unknown,
}

mirror_enum!(LeaveStatus, model::LeaveStatus, {
    Pending, Approved, Rejected, Unknown
});

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
pub enum ActionOutcome {
    Applied,
    Declined,
}

mirror_enum!(ActionOutcome, workflow::ActionOutcome, { Applied, Declined });

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "Employee")]
pub struct EmployeeNode {
    pub id: ID,
    #[graphql(name = "firstName")]
    pub first_name: String,
    #[graphql(name = "lastName")]
    pub last_name: String,
    #[graphql(name = "fullName")]
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub department: Department,
    pub position: String,
    #[graphql(name = "hireDate")]
    pub hire_date: NaiveDate,
    pub salary: f64,
    #[graphql(name = "salaryDisplay")]
    pub salary_display: String,
    pub status: EmployeeStatus,
    #[graphql(name = "statusBadge")]
    pub status_badge: String,
    #[graphql(name = "avatarUrl")]
    pub avatar_url: Option<String>,
    #[graphql(name = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<Employee> for EmployeeNode {
    fn from(employee: Employee) -> Self {
        Self {
            id: ID::from(employee.id.to_string()),
            full_name: employee.full_name(),
            salary_display: format_salary(employee.salary),
            status_badge: employee.status.badge().css_class().to_string(),
            first_name: employee.first_name,
            last_name: employee.last_name,
            email: employee.email,
            phone: employee.phone,
            department: employee.department.into(),
            position: employee.position,
            hire_date: employee.hire_date,
            salary: employee.salary,
            status: employee.status.into(),
            avatar_url: employee.avatar_url,
            created_at: employee.created_at,
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "AttendanceRecord")]
pub struct AttendanceNode {
    pub id: ID,
    #[graphql(name = "employeeId")]
    pub employee_id: ID,
    #[graphql(name = "employeeName")]
    pub employee_name: String,
    pub date: NaiveDate,
    #[graphql(name = "checkIn")]
    pub check_in: NaiveTime,
    #[graphql(name = "checkOut")]
    pub check_out: Option<NaiveTime>,
    pub status: AttendanceStatus,
    #[graphql(name = "statusBadge")]
    pub status_badge: String,
    #[graphql(name = "statusIcon")]
    pub status_icon: String,
}

impl From<AttendanceRecord> for AttendanceNode {
    fn from(record: AttendanceRecord) -> Self {
        Self {
            id: ID::from(record.id.to_string()),
            employee_id: ID::from(record.employee_id.to_string()),
            employee_name: record.employee_name,
            date: record.date,
            check_in: record.check_in,
            check_out: record.check_out,
            status: record.status.into(),
            status_badge: record.status.badge().css_class().to_string(),
            status_icon: record.status.icon().to_string(),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "LeaveRequest")]
pub struct LeaveRequestNode {
    pub id: ID,
    #[graphql(name = "employeeId")]
    pub employee_id: ID,
    #[graphql(name = "employeeName")]
    pub employee_name: String,
    #[graphql(name = "leaveType")]
    pub leave_type: LeaveType,
    #[graphql(name = "startDate")]
    pub start_date: NaiveDate,
    #[graphql(name = "endDate")]
    pub end_date: NaiveDate,
    #[graphql(name = "durationDays")]
    pub duration_days: i64,
    pub reason: String,
    pub status: LeaveStatus,
    #[graphql(name = "statusBadge")]
    pub status_badge: String,
    #[graphql(name = "typeBadge")]
    pub type_badge: String,
    #[graphql(name = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<LeaveRequest> for LeaveRequestNode {
    fn from(request: LeaveRequest) -> Self {
        Self {
            id: ID::from(request.id.to_string()),
            employee_id: ID::from(request.employee_id.to_string()),
            duration_days: request.duration_days(),
            employee_name: request.employee_name,
            leave_type: request.leave_type.into(),
            start_date: request.start_date,
            end_date: request.end_date,
            reason: request.reason,
            status: request.status.into(),
            status_badge: request.status.badge().css_class().to_string(),
            type_badge: request.leave_type.badge().css_class().to_string(),
            created_at: request.created_at,
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct DepartmentCount {
    pub department: Department,
    pub count: i64,
}

#[derive(Clone, Debug, SimpleObject)]
pub struct EmployeeStats {
    pub total: i64,
    pub active: i64,
    #[graphql(name = "onLeave")]
    pub on_leave: i64,
    pub inactive: i64,
    pub departments: Vec<DepartmentCount>,
}

impl From<stats::EmployeeStats> for EmployeeStats {
    fn from(value: stats::EmployeeStats) -> Self {
        Self {
            total: value.total as i64,
            active: value.active as i64,
            on_leave: value.on_leave as i64,
            inactive: value.inactive as i64,
            departments: value
                .departments
                .into_iter()
                .map(|entry| DepartmentCount {
                    department: entry.department.into(),
                    count: entry.count as i64,
                })
                .collect(),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct AttendanceStats {
    pub total: i64,
    pub present: i64,
    pub absent: i64,
    pub late: i64,
    #[graphql(name = "halfDay")]
    pub half_day: i64,
}

impl From<stats::AttendanceStats> for AttendanceStats {
    fn from(value: stats::AttendanceStats) -> Self {
        Self {
            total: value.total as i64,
            present: value.present as i64,
            absent: value.absent as i64,
            late: value.late as i64,
            half_day: value.half_day as i64,
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct LeaveStats {
    pub total: i64,
    pub pending: i64,
    pub approved: i64,
    pub rejected: i64,
}

impl From<stats::LeaveStats> for LeaveStats {
    fn from(value: stats::LeaveStats) -> Self {
        Self {
            total: value.total as i64,
            pending: value.pending as i64,
            approved: value.approved as i64,
            rejected: value.rejected as i64,
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct Dashboard {
    #[graphql(name = "employeeStats")]
    pub employee_stats: EmployeeStats,
    #[graphql(name = "leaveStats")]
    pub leave_stats: LeaveStats,
    #[graphql(name = "attendanceStats")]
    pub attendance_stats: AttendanceStats,
    #[graphql(name = "recentEmployees")]
    pub recent_employees: Vec<EmployeeNode>,
}

#[derive(Clone, Debug, SimpleObject)]
pub struct ActionPayload {
    pub outcome: ActionOutcome,
}

#[derive(Clone, Debug, SimpleObject)]
pub struct LeaveActionPayload {
    pub outcome: ActionOutcome,
    /// The request as re-fetched after the update; absent when declined.
    pub request: Option<LeaveRequestNode>,
}

#[derive(InputObject, Default, Clone)]
pub struct EmployeeFilter {
    pub q: Option<String>,
    pub department: Option<Department>,
    pub status: Option<EmployeeStatus>,
}

impl From<EmployeeFilter> for EmployeeCriteria {
    fn from(value: EmployeeFilter) -> Self {
        Self {
            term: value.q,
            department: value.department.map(Into::into),
            status: value.status.map(Into::into),
        }
    }
}

#[derive(InputObject, Default, Clone)]
pub struct LeaveFilter {
    pub status: Option<LeaveStatus>,
    #[graphql(name = "leaveType")]
    pub leave_type: Option<LeaveType>,
}

impl From<LeaveFilter> for LeaveCriteria {
    fn from(value: LeaveFilter) -> Self {
        Self {
            status: value.status.map(Into::into),
            leave_type: value.leave_type.map(Into::into),
        }
    }
}

#[derive(InputObject, Clone)]
pub struct EmployeeInput {
    #[graphql(name = "firstName")]
    pub first_name: String,
    #[graphql(name = "lastName")]
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub department: Department,
    pub position: String,
    #[graphql(name = "hireDate")]
    pub hire_date: NaiveDate,
    pub salary: f64,
    #[graphql(default)]
    pub status: EmployeeStatus,
}

impl From<EmployeeInput> for EmployeeForm {
    fn from(input: EmployeeInput) -> Self {
        let department: model::Department = input.department.into();
        let status: model::EmployeeStatus = input.status.into();
        Self {
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            phone: input.phone,
            department: department.as_str().to_string(),
            position: input.position,
            hire_date: input.hire_date.to_string(),
            salary: input.salary.to_string(),
            status: status.as_str().to_string(),
        }
    }
}
