//! Count summaries shown on the dashboard.
//!
//! Records with an `Unknown` status count toward `total` only.

use serde::Serialize;

use crate::model::{
    AttendanceRecord, AttendanceStatus, Department, Employee, EmployeeStatus, LeaveRequest,
    LeaveStatus,
};

pub trait Aggregate<T>: Sized {
    fn aggregate(records: &[T]) -> Self;
}

pub fn aggregate<T, S: Aggregate<T>>(records: &[T]) -> S {
    S::aggregate(records)
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DepartmentCount {
    pub department: Department,
    pub count: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct EmployeeStats {
    pub total: usize,
    pub active: usize,
    pub on_leave: usize,
    pub inactive: usize,
    /// Headcount per department, in the order departments first appear.
    pub departments: Vec<DepartmentCount>,
}

impl EmployeeStats {
    pub fn department(&self, department: Department) -> usize {
        self.departments
            .iter()
            .find(|entry| entry.department == department)
            .map_or(0, |entry| entry.count)
    }
}

impl Aggregate<Employee> for EmployeeStats {
    fn aggregate(employees: &[Employee]) -> Self {
        employees.iter().fold(
            EmployeeStats {
                total: employees.len(),
                ..Default::default()
            },
            |mut stats, employee| {
                match employee.status {
                    EmployeeStatus::Active => stats.active += 1,
                    EmployeeStatus::OnLeave => stats.on_leave += 1,
                    EmployeeStatus::Inactive => stats.inactive += 1,
                    EmployeeStatus::Unknown => {}
                }
                match stats
                    .departments
                    .iter_mut()
                    .find(|entry| entry.department == employee.department)
                {
                    Some(entry) => entry.count += 1,
                    None => stats.departments.push(DepartmentCount {
                        department: employee.department,
                        count: 1,
                    }),
                }
                stats
            },
        )
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AttendanceStats {
    pub total: usize,
    pub present: usize,
    pub absent: usize,
    pub late: usize,
    pub half_day: usize,
}

impl Aggregate<AttendanceRecord> for AttendanceStats {
    fn aggregate(records: &[AttendanceRecord]) -> Self {
        let mut stats = AttendanceStats {
            total: records.len(),
            ..Default::default()
        };
        for record in records {
            match record.status {
                AttendanceStatus::Present => stats.present += 1,
                AttendanceStatus::Absent => stats.absent += 1,
                AttendanceStatus::Late => stats.late += 1,
                AttendanceStatus::HalfDay => stats.half_day += 1,
                AttendanceStatus::Unknown => {}
            }
        }
        stats
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LeaveStats {
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
}

impl Aggregate<LeaveRequest> for LeaveStats {
    fn aggregate(requests: &[LeaveRequest]) -> Self {
        let mut stats = LeaveStats {
            total: requests.len(),
            ..Default::default()
        };
        for request in requests {
            match request.status {
                LeaveStatus::Pending => stats.pending += 1,
                LeaveStatus::Approved => stats.approved += 1,
                LeaveStatus::Rejected => stats.rejected += 1,
                LeaveStatus::Unknown => {}
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use proptest::prelude::*;
    use uuid::Uuid;

    fn employee(department: Department, status: EmployeeStatus) -> Employee {
        Employee {
            id: Uuid::new_v4(),
            first_name: "Sam".into(),
            last_name: "Doe".into(),
            email: "sam@acme.test".into(),
            phone: "555-0101".into(),
            department,
            position: "Analyst".into(),
            hire_date: NaiveDate::from_ymd_opt(2021, 1, 4).unwrap(),
            salary: 50_000.0,
            status,
            avatar_url: None,
            created_at: None,
        }
    }

    fn attendance(status: AttendanceStatus) -> AttendanceRecord {
        AttendanceRecord {
            id: Uuid::new_v4(),
            employee_id: Uuid::new_v4(),
            employee_name: "Sam Doe".into(),
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            check_in: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            check_out: None,
            status,
            created_at: None,
        }
    }

    #[test]
    fn employee_stats_count_status_and_departments_in_first_seen_order() {
        let staff = vec![
            employee(Department::Sales, EmployeeStatus::Active),
            employee(Department::Engineering, EmployeeStatus::OnLeave),
            employee(Department::Sales, EmployeeStatus::Inactive),
            employee(Department::Engineering, EmployeeStatus::Active),
        ];
        let stats: EmployeeStats = aggregate(&staff);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.active, 2);
        assert_eq!(stats.on_leave, 1);
        assert_eq!(stats.inactive, 1);
        assert_eq!(
            stats.departments,
            vec![
                DepartmentCount {
                    department: Department::Sales,
                    count: 2
                },
                DepartmentCount {
                    department: Department::Engineering,
                    count: 2
                },
            ]
        );
        assert_eq!(stats.department(Department::Finance), 0);
    }

    #[test]
    fn empty_collections_give_zero_stats() {
        assert_eq!(aggregate::<Employee, EmployeeStats>(&[]), EmployeeStats::default());
        assert_eq!(
            aggregate::<AttendanceRecord, AttendanceStats>(&[]),
            AttendanceStats::default()
        );
        assert_eq!(aggregate::<LeaveRequest, LeaveStats>(&[]), LeaveStats::default());
    }

    #[test]
    fn unknown_status_counts_only_toward_total() {
        let stats: AttendanceStats = aggregate(&[
            attendance(AttendanceStatus::Late),
            attendance(AttendanceStatus::Unknown),
        ]);
        assert_eq!(stats.total, 2);
        assert_eq!(stats.late, 1);
        assert_eq!(stats.present + stats.absent + stats.late + stats.half_day, 1);
    }

    fn attendance_status() -> impl Strategy<Value = AttendanceStatus> {
        prop::sample::select(AttendanceStatus::ALL.to_vec())
    }

    fn employee_status() -> impl Strategy<Value = EmployeeStatus> {
        prop::sample::select(EmployeeStatus::ALL.to_vec())
    }

    fn department() -> impl Strategy<Value = Department> {
        prop::sample::select(Department::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn attendance_partition_sums_to_total(
            statuses in prop::collection::vec(attendance_status(), 0..60)
        ) {
            let records: Vec<_> = statuses.into_iter().map(attendance).collect();
            let stats: AttendanceStats = aggregate(&records);
            prop_assert_eq!(
                stats.present + stats.absent + stats.late + stats.half_day,
                stats.total
            );
        }

        #[test]
        fn employee_partitions_sum_to_total(
            rows in prop::collection::vec((department(), employee_status()), 0..60)
        ) {
            let staff: Vec<_> = rows.into_iter().map(|(d, s)| employee(d, s)).collect();
            let stats: EmployeeStats = aggregate(&staff);
            prop_assert_eq!(stats.active + stats.on_leave + stats.inactive, stats.total);
            prop_assert_eq!(
                stats.departments.iter().map(|entry| entry.count).sum::<usize>(),
                stats.total
            );
        }
    }
}
