//! Badge classes, icons and money formatting for rendered records.

use serde::Serialize;

use crate::model::{AttendanceStatus, EmployeeStatus, LeaveStatus, LeaveType};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Badge {
    Success,
    Warning,
    Danger,
    Info,
}

impl Badge {
    pub fn css_class(self) -> &'static str {
        match self {
            Badge::Success => "badge-success",
            Badge::Warning => "badge-warning",
            Badge::Danger => "badge-danger",
            Badge::Info => "badge-info",
        }
    }
}

impl EmployeeStatus {
    pub fn badge(self) -> Badge {
        match self {
            EmployeeStatus::Active => Badge::Success,
            EmployeeStatus::OnLeave => Badge::Warning,
            EmployeeStatus::Inactive => Badge::Danger,
            EmployeeStatus::Unknown => Badge::Info,
        }
    }
}

impl AttendanceStatus {
    pub fn badge(self) -> Badge {
        match self {
            AttendanceStatus::Present => Badge::Success,
            AttendanceStatus::Late => Badge::Warning,
            AttendanceStatus::Absent => Badge::Danger,
            AttendanceStatus::HalfDay | AttendanceStatus::Unknown => Badge::Info,
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            AttendanceStatus::Present => "✓",
            AttendanceStatus::Late => "⏰",
            AttendanceStatus::Absent => "✗",
            AttendanceStatus::HalfDay => "⏱️",
            AttendanceStatus::Unknown => "?",
        }
    }
}

impl LeaveStatus {
    pub fn badge(self) -> Badge {
        match self {
            LeaveStatus::Pending => Badge::Warning,
            LeaveStatus::Approved => Badge::Success,
            LeaveStatus::Rejected => Badge::Danger,
            LeaveStatus::Unknown => Badge::Info,
        }
    }
}

impl LeaveType {
    pub fn badge(self) -> Badge {
        match self {
            LeaveType::Sick => Badge::Danger,
            LeaveType::Personal => Badge::Warning,
            LeaveType::Vacation | LeaveType::Other | LeaveType::Unknown => Badge::Info,
        }
    }
}

/// Whole US dollars with thousands separators: `85000.0 -> "$85,000"`.
pub fn format_salary(amount: f64) -> String {
    let rounded = amount.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}${grouped}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn salary_is_whole_dollars_with_separators() {
        assert_eq!(format_salary(85_000.0), "$85,000");
        assert_eq!(format_salary(0.0), "$0");
        assert_eq!(format_salary(999.5), "$1,000");
        assert_eq!(format_salary(1_234_567.2), "$1,234,567");
        assert_eq!(format_salary(120.0), "$120");
    }

    #[test]
    fn unknown_values_fall_back_to_info() {
        assert_eq!(EmployeeStatus::Unknown.badge().css_class(), "badge-info");
        assert_eq!(AttendanceStatus::Unknown.badge(), Badge::Info);
        assert_eq!(LeaveStatus::Unknown.badge(), Badge::Info);
        assert_eq!(LeaveType::Unknown.badge(), Badge::Info);
        assert_eq!(AttendanceStatus::Unknown.icon(), "?");
    }

    #[test]
    fn known_statuses_map_to_expected_badges() {
        assert_eq!(EmployeeStatus::OnLeave.badge(), Badge::Warning);
        assert_eq!(AttendanceStatus::HalfDay.badge(), Badge::Info);
        assert_eq!(AttendanceStatus::Late.icon(), "⏰");
        assert_eq!(LeaveStatus::Rejected.badge().css_class(), "badge-danger");
        assert_eq!(LeaveType::Sick.badge(), Badge::Danger);
    }
}
