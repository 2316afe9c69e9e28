//! Records and inputs for the three HR collections.
//!
//! Enumerated columns carry an `Unknown` catch-all so a value added on the
//! backend does not break a whole fetch.

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Department {
    Engineering,
    #[serde(rename = "HR")]
    Hr,
    Sales,
    Marketing,
    Finance,
    Operations,
    #[serde(other)]
    Unknown,
}

impl Department {
    pub const ALL: [Department; 6] = [
        Department::Engineering,
        Department::Hr,
        Department::Sales,
        Department::Marketing,
        Department::Finance,
        Department::Operations,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Department::Engineering => "Engineering",
            Department::Hr => "HR",
            Department::Sales => "Sales",
            Department::Marketing => "Marketing",
            Department::Finance => "Finance",
            Department::Operations => "Operations",
            Department::Unknown => "Unknown",
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeStatus {
    Active,
    OnLeave,
    Inactive,
    #[serde(other)]
    Unknown,
}

impl EmployeeStatus {
    pub const ALL: [EmployeeStatus; 3] = [
        EmployeeStatus::Active,
        EmployeeStatus::OnLeave,
        EmployeeStatus::Inactive,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EmployeeStatus::Active => "active",
            EmployeeStatus::OnLeave => "on_leave",
            EmployeeStatus::Inactive => "inactive",
            EmployeeStatus::Unknown => "unknown",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EmployeeStatus::Active => "Active",
            EmployeeStatus::OnLeave => "On Leave",
            EmployeeStatus::Inactive => "Inactive",
            EmployeeStatus::Unknown => "Unknown",
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
    HalfDay,
    #[serde(other)]
    Unknown,
}

impl AttendanceStatus {
    pub const ALL: [AttendanceStatus; 4] = [
        AttendanceStatus::Present,
        AttendanceStatus::Absent,
        AttendanceStatus::Late,
        AttendanceStatus::HalfDay,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Absent => "absent",
            AttendanceStatus::Late => "late",
            AttendanceStatus::HalfDay => "half_day",
            AttendanceStatus::Unknown => "unknown",
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveType {
    Vacation,
    Sick,
    Personal,
    Other,
    #[serde(other)]
    Unknown,
}

impl LeaveType {
    pub const ALL: [LeaveType; 4] = [
        LeaveType::Vacation,
        LeaveType::Sick,
        LeaveType::Personal,
        LeaveType::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LeaveType::Vacation => "vacation",
            LeaveType::Sick => "sick",
            LeaveType::Personal => "personal",
            LeaveType::Other => "other",
            LeaveType::Unknown => "unknown",
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
    #[serde(other)]
    Unknown,
}

impl LeaveStatus {
    pub const ALL: [LeaveStatus; 3] = [
        LeaveStatus::Pending,
        LeaveStatus::Approved,
        LeaveStatus::Rejected,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LeaveStatus::Pending => "pending",
            LeaveStatus::Approved => "approved",
            LeaveStatus::Rejected => "rejected",
            LeaveStatus::Unknown => "unknown",
        }
    }
}

/// Error returned when a string names no known enumeration value.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("invalid {kind}: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! text_enum {
    ($ty:ident, $kind:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                $ty::ALL
                    .into_iter()
                    .find(|candidate| candidate.as_str().eq_ignore_ascii_case(trimmed))
                    .ok_or_else(|| ParseEnumError {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }
    };
}

text_enum!(Department, "department");
text_enum!(EmployeeStatus, "employee status");
text_enum!(AttendanceStatus, "attendance status");
text_enum!(LeaveType, "leave type");
text_enum!(LeaveStatus, "leave status");

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub department: Department,
    #[serde(default)]
    pub position: String,
    pub hire_date: NaiveDate,
    pub salary: f64,
    pub status: EmployeeStatus,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewEmployee {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub department: Department,
    pub position: String,
    pub hire_date: NaiveDate,
    pub salary: f64,
    pub status: EmployeeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// Partial employee update; only present fields are sent.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct EmployeePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<Department>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hire_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<EmployeeStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl EmployeePatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl From<NewEmployee> for EmployeePatch {
    fn from(value: NewEmployee) -> Self {
        Self {
            first_name: Some(value.first_name),
            last_name: Some(value.last_name),
            email: Some(value.email),
            phone: Some(value.phone),
            department: Some(value.department),
            position: Some(value.position),
            hire_date: Some(value.hire_date),
            salary: Some(value.salary),
            status: Some(value.status),
            avatar_url: value.avatar_url,
        }
    }
}

/// Name columns of the joined employee relation.
#[derive(Clone, Debug, Deserialize)]
pub struct EmployeeName {
    pub first_name: String,
    pub last_name: String,
}

pub const UNKNOWN_EMPLOYEE: &str = "Unknown";

/// `"<first> <last>"` for a joined employee, `"Unknown"` when the relation is missing.
pub fn display_name(relation: Option<&EmployeeName>) -> String {
    relation
        .map(|name| format!("{} {}", name.first_name, name.last_name))
        .unwrap_or_else(|| UNKNOWN_EMPLOYEE.to_string())
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AttendanceRecord {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub employee_name: String,
    pub date: NaiveDate,
    pub check_in: NaiveTime,
    pub check_out: Option<NaiveTime>,
    pub status: AttendanceStatus,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct AttendanceRow {
    id: Uuid,
    employee_id: Uuid,
    date: NaiveDate,
    check_in: NaiveTime,
    #[serde(default)]
    check_out: Option<NaiveTime>,
    status: AttendanceStatus,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    employees: Option<EmployeeName>,
}

impl From<AttendanceRow> for AttendanceRecord {
    fn from(row: AttendanceRow) -> Self {
        Self {
            id: row.id,
            employee_id: row.employee_id,
            employee_name: display_name(row.employees.as_ref()),
            date: row.date,
            check_in: row.check_in,
            check_out: row.check_out,
            status: row.status,
            created_at: row.created_at,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewAttendance {
    pub employee_id: Uuid,
    pub date: NaiveDate,
    pub check_in: NaiveTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_out: Option<NaiveTime>,
    pub status: AttendanceStatus,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AttendancePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_in: Option<NaiveTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_out: Option<NaiveTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AttendanceStatus>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LeaveRequest {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub employee_name: String,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
    pub status: LeaveStatus,
    pub created_at: Option<DateTime<Utc>>,
}

impl LeaveRequest {
    pub fn duration_days(&self) -> i64 {
        duration_days(self.start_date, self.end_date)
    }
}

/// Inclusive number of calendar days between two dates, in either order.
pub fn duration_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days().abs() + 1
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct LeaveRow {
    id: Uuid,
    employee_id: Uuid,
    leave_type: LeaveType,
    start_date: NaiveDate,
    end_date: NaiveDate,
    #[serde(default)]
    reason: String,
    status: LeaveStatus,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    employees: Option<EmployeeName>,
}

impl From<LeaveRow> for LeaveRequest {
    fn from(row: LeaveRow) -> Self {
        Self {
            id: row.id,
            employee_id: row.employee_id,
            employee_name: display_name(row.employees.as_ref()),
            leave_type: row.leave_type,
            start_date: row.start_date,
            end_date: row.end_date,
            reason: row.reason,
            status: row.status,
            created_at: row.created_at,
        }
    }
}

/// A new leave request. Always stored as pending.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewLeaveRequest {
    pub employee_id: Uuid,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn duration_is_inclusive() {
        assert_eq!(duration_days(date(2024, 1, 1), date(2024, 1, 3)), 3);
        assert_eq!(duration_days(date(2024, 1, 5), date(2024, 1, 5)), 1);
        assert_eq!(duration_days(date(2024, 1, 3), date(2024, 1, 1)), 3);
    }

    #[test]
    fn unknown_enum_values_do_not_fail_decoding() {
        let status: LeaveStatus = serde_json::from_value(json!("escalated")).unwrap();
        assert_eq!(status, LeaveStatus::Unknown);
        let dept: Department = serde_json::from_value(json!("Legal")).unwrap();
        assert_eq!(dept, Department::Unknown);
        let dept: Department = serde_json::from_value(json!("HR")).unwrap();
        assert_eq!(dept, Department::Hr);
    }

    #[test]
    fn enums_parse_case_insensitively() {
        assert_eq!("on_leave".parse::<EmployeeStatus>(), Ok(EmployeeStatus::OnLeave));
        assert_eq!("hr".parse::<Department>(), Ok(Department::Hr));
        assert!("unknown".parse::<LeaveStatus>().is_err());
    }

    #[test]
    fn joined_rows_synthesize_display_names() {
        let row: AttendanceRow = serde_json::from_value(json!({
            "id": Uuid::new_v4(),
            "employee_id": Uuid::new_v4(),
            "date": "2024-03-01",
            "check_in": "09:05:00",
            "check_out": null,
            "status": "late",
            "employees": {"first_name": "Grace", "last_name": "Hopper"}
        }))
        .unwrap();
        assert_eq!(AttendanceRecord::from(row).employee_name, "Grace Hopper");

        let row: LeaveRow = serde_json::from_value(json!({
            "id": Uuid::new_v4(),
            "employee_id": Uuid::new_v4(),
            "leave_type": "sick",
            "start_date": "2024-03-01",
            "end_date": "2024-03-02",
            "reason": "flu",
            "status": "pending",
            "employees": null
        }))
        .unwrap();
        assert_eq!(LeaveRequest::from(row).employee_name, UNKNOWN_EMPLOYEE);
    }

    #[test]
    fn patch_serializes_only_present_fields() {
        let patch = EmployeePatch {
            status: Some(EmployeeStatus::OnLeave),
            ..EmployeePatch::default()
        };
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({"status": "on_leave"}));
    }
}
