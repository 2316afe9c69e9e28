//! Client-side narrowing of fetched collections.
//!
//! Every criterion is optional; an absent criterion matches everything and
//! provided criteria are combined with AND. Filtering never reorders.

use crate::model::{
    AttendanceRecord, AttendanceStatus, Department, Employee, EmployeeStatus, LeaveRequest,
    LeaveStatus, LeaveType,
};

pub trait Criteria<T> {
    fn matches(&self, record: &T) -> bool;
}

pub fn filter<T, C>(records: &[T], criteria: &C) -> Vec<T>
where
    T: Clone,
    C: Criteria<T> + ?Sized,
{
    records
        .iter()
        .filter(|record| criteria.matches(record))
        .cloned()
        .collect()
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EmployeeCriteria {
    pub term: Option<String>,
    pub department: Option<Department>,
    pub status: Option<EmployeeStatus>,
}

impl EmployeeCriteria {
    /// Lowercased search term, or `None` when blank.
    fn needle(&self) -> Option<String> {
        self.term
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(str::to_lowercase)
    }
}

impl Criteria<Employee> for EmployeeCriteria {
    fn matches(&self, employee: &Employee) -> bool {
        let term_ok = match self.needle() {
            Some(needle) => [&employee.first_name, &employee.last_name, &employee.email]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle)),
            None => true,
        };
        term_ok
            && self.department.is_none_or(|d| employee.department == d)
            && self.status.is_none_or(|s| employee.status == s)
    }
}

/// Date equality is applied when fetching, so only status is filtered here.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttendanceCriteria {
    pub status: Option<AttendanceStatus>,
}

impl Criteria<AttendanceRecord> for AttendanceCriteria {
    fn matches(&self, record: &AttendanceRecord) -> bool {
        self.status.is_none_or(|s| record.status == s)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LeaveCriteria {
    pub status: Option<LeaveStatus>,
    pub leave_type: Option<LeaveType>,
}

impl Criteria<LeaveRequest> for LeaveCriteria {
    fn matches(&self, request: &LeaveRequest) -> bool {
        self.status.is_none_or(|s| request.status == s)
            && self.leave_type.is_none_or(|t| request.leave_type == t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Department, EmployeeStatus};
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use uuid::Uuid;

    fn employee(first: &str, last: &str, email: &str) -> Employee {
        Employee {
            id: Uuid::new_v4(),
            first_name: first.into(),
            last_name: last.into(),
            email: email.into(),
            phone: "555-0100".into(),
            department: Department::Engineering,
            position: "Engineer".into(),
            hire_date: NaiveDate::from_ymd_opt(2022, 5, 1).unwrap(),
            salary: 90_000.0,
            status: EmployeeStatus::Active,
            avatar_url: None,
            created_at: None,
        }
    }

    fn leave(status: LeaveStatus, leave_type: LeaveType) -> LeaveRequest {
        let day = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        LeaveRequest {
            id: Uuid::new_v4(),
            employee_id: Uuid::new_v4(),
            employee_name: "Unknown".into(),
            leave_type,
            start_date: day,
            end_date: day,
            reason: String::new(),
            status,
            created_at: None,
        }
    }

    #[test]
    fn search_is_case_insensitive_across_name_and_email() {
        let staff = vec![
            employee("Ann", "Smith", "ann@acme.test"),
            employee("Bob", "Annley", "bob@acme.test"),
            employee("Cy", "Young", "cy@annex.test"),
            employee("Dee", "Moss", "dee@acme.test"),
        ];
        let criteria = EmployeeCriteria {
            term: Some("  ANN ".into()),
            ..Default::default()
        };
        let names: Vec<_> = filter(&staff, &criteria)
            .into_iter()
            .map(|e| e.first_name)
            .collect();
        assert_eq!(names, vec!["Ann", "Bob", "Cy"]);
    }

    #[test]
    fn blank_term_matches_everything() {
        let staff = vec![employee("Ann", "Smith", "ann@acme.test")];
        let criteria = EmployeeCriteria {
            term: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(filter(&staff, &criteria), staff);
    }

    #[test]
    fn employee_criteria_combine_with_and() {
        let mut sales = employee("Ann", "Smith", "ann@acme.test");
        sales.department = Department::Sales;
        let mut away = employee("Ann", "Jones", "aj@acme.test");
        away.department = Department::Sales;
        away.status = EmployeeStatus::OnLeave;
        let staff = vec![sales.clone(), away, employee("Ann", "Lee", "al@acme.test")];

        let criteria = EmployeeCriteria {
            term: Some("ann".into()),
            department: Some(Department::Sales),
            status: Some(EmployeeStatus::Active),
        };
        assert_eq!(filter(&staff, &criteria), vec![sales]);
    }

    #[test]
    fn leave_criteria_require_both_status_and_type() {
        let requests = vec![
            leave(LeaveStatus::Pending, LeaveType::Sick),
            leave(LeaveStatus::Pending, LeaveType::Vacation),
            leave(LeaveStatus::Approved, LeaveType::Sick),
        ];
        let criteria = LeaveCriteria {
            status: Some(LeaveStatus::Pending),
            leave_type: Some(LeaveType::Sick),
        };
        assert_eq!(filter(&requests, &criteria), vec![requests[0].clone()]);
    }

    #[test]
    fn empty_input_gives_empty_output() {
        let none: Vec<LeaveRequest> = Vec::new();
        assert!(filter(&none, &LeaveCriteria::default()).is_empty());
    }

    fn leave_status() -> impl Strategy<Value = LeaveStatus> {
        prop_oneof![
            Just(LeaveStatus::Pending),
            Just(LeaveStatus::Approved),
            Just(LeaveStatus::Rejected),
        ]
    }

    fn leave_type() -> impl Strategy<Value = LeaveType> {
        prop_oneof![
            Just(LeaveType::Vacation),
            Just(LeaveType::Sick),
            Just(LeaveType::Personal),
            Just(LeaveType::Other),
        ]
    }

    proptest! {
        #[test]
        fn empty_criteria_is_identity(
            rows in prop::collection::vec((leave_status(), leave_type()), 0..40)
        ) {
            let requests: Vec<_> = rows.into_iter().map(|(s, t)| leave(s, t)).collect();
            prop_assert_eq!(filter(&requests, &LeaveCriteria::default()), requests);
        }

        #[test]
        fn status_filter_keeps_only_matching_subsequence(
            rows in prop::collection::vec((leave_status(), leave_type()), 0..40),
            wanted in leave_status(),
        ) {
            let requests: Vec<_> = rows.into_iter().map(|(s, t)| leave(s, t)).collect();
            let criteria = LeaveCriteria { status: Some(wanted), leave_type: None };
            let kept = filter(&requests, &criteria);
            prop_assert!(kept.len() <= requests.len());
            prop_assert!(kept.iter().all(|r| r.status == wanted));
            let expected: Vec<_> = requests.iter().filter(|r| r.status == wanted).cloned().collect();
            prop_assert_eq!(kept, expected);
        }
    }
}
