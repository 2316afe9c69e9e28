//! Demo dataset used by `--demo` mode and the `seed` command.

use chrono::{Days, NaiveDate, NaiveTime};
use tracing::info;

use crate::{
    error::HrResult,
    model::{
        AttendanceRecord, AttendanceStatus, Department, Employee, EmployeeStatus, LeaveRequest,
        LeaveType, NewAttendance, NewEmployee, NewLeaveRequest,
    },
    service::HrServices,
    workflow::LeaveDecision,
};

pub struct SeededHrRecords {
    pub employees: Vec<Employee>,
    pub attendance: Vec<AttendanceRecord>,
    pub leave_requests: Vec<LeaveRequest>,
}

impl SeededHrRecords {
    pub fn employee_email(&self, email: &str) -> Option<&Employee> {
        self.employees.iter().find(|e| e.email == email)
    }

    pub fn leave_for(&self, email: &str) -> Vec<&LeaveRequest> {
        match self.employee_email(email) {
            Some(employee) => self
                .leave_requests
                .iter()
                .filter(|r| r.employee_id == employee.id)
                .collect(),
            None => Vec::new(),
        }
    }
}

struct SeedEmployee {
    first: &'static str,
    last: &'static str,
    department: Department,
    position: &'static str,
    hired: (i32, u32, u32),
    salary: f64,
    status: EmployeeStatus,
}

const STAFF: [SeedEmployee; 8] = [
    SeedEmployee {
        first: "Ada",
        last: "Lovelace",
        department: Department::Engineering,
        position: "Principal Engineer",
        hired: (2019, 3, 11),
        salary: 165_000.0,
        status: EmployeeStatus::Active,
    },
    SeedEmployee {
        first: "Grace",
        last: "Hopper",
        department: Department::Engineering,
        position: "Engineering Manager",
        hired: (2018, 9, 3),
        salary: 172_000.0,
        status: EmployeeStatus::Active,
    },
    SeedEmployee {
        first: "Maya",
        last: "Patel",
        department: Department::Hr,
        position: "HR Business Partner",
        hired: (2021, 1, 18),
        salary: 92_000.0,
        status: EmployeeStatus::Active,
    },
    SeedEmployee {
        first: "Luis",
        last: "Ortega",
        department: Department::Sales,
        position: "Account Executive",
        hired: (2022, 5, 2),
        salary: 78_000.0,
        status: EmployeeStatus::OnLeave,
    },
    SeedEmployee {
        first: "Hana",
        last: "Kim",
        department: Department::Marketing,
        position: "Content Lead",
        hired: (2020, 11, 9),
        salary: 85_000.0,
        status: EmployeeStatus::Active,
    },
    SeedEmployee {
        first: "Tomas",
        last: "Novak",
        department: Department::Finance,
        position: "Controller",
        hired: (2017, 6, 26),
        salary: 118_000.0,
        status: EmployeeStatus::Active,
    },
    SeedEmployee {
        first: "Zara",
        last: "Okafor",
        department: Department::Operations,
        position: "Operations Analyst",
        hired: (2023, 2, 13),
        salary: 67_500.0,
        status: EmployeeStatus::Active,
    },
    SeedEmployee {
        first: "Erik",
        last: "Lund",
        department: Department::Sales,
        position: "Sales Director",
        hired: (2016, 4, 4),
        salary: 140_000.0,
        status: EmployeeStatus::Inactive,
    },
];

fn email_for(first: &str, last: &str) -> String {
    format!("{}.{}@acme.test", first.to_lowercase(), last.to_lowercase())
}

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap_or(NaiveTime::MIN)
}

/// Insert a small demo organisation around `today`. Employees already
/// present (matched by email) are reused rather than duplicated.
pub async fn seed_hr_demo(services: &HrServices, today: NaiveDate) -> HrResult<SeededHrRecords> {
    let existing = services.employees.list().await?;
    let mut employees = Vec::with_capacity(STAFF.len());
    for seed in &STAFF {
        let email = email_for(seed.first, seed.last);
        if let Some(found) = existing.iter().find(|e| e.email == email) {
            employees.push(found.clone());
            continue;
        }
        let hire_date = NaiveDate::from_ymd_opt(seed.hired.0, seed.hired.1, seed.hired.2)
            .unwrap_or(today);
        let created = services
            .employees
            .create(&NewEmployee {
                first_name: seed.first.to_string(),
                last_name: seed.last.to_string(),
                email,
                phone: format!("555-01{:02}", employees.len()),
                department: seed.department,
                position: seed.position.to_string(),
                hire_date,
                salary: seed.salary,
                status: seed.status,
                avatar_url: None,
            })
            .await?;
        employees.push(created);
    }

    let statuses = [
        (AttendanceStatus::Present, time(8, 55), Some(time(17, 5))),
        (AttendanceStatus::Present, time(9, 0), Some(time(17, 30))),
        (AttendanceStatus::Late, time(9, 42), Some(time(18, 0))),
        (AttendanceStatus::HalfDay, time(9, 0), Some(time(13, 0))),
        (AttendanceStatus::Present, time(8, 30), None),
        (AttendanceStatus::Absent, time(0, 0), None),
    ];
    let mut attendance = Vec::new();
    for (employee, (status, check_in, check_out)) in employees
        .iter()
        .filter(|e| e.status == EmployeeStatus::Active)
        .zip(statuses)
    {
        attendance.push(
            services
                .attendance
                .record(&NewAttendance {
                    employee_id: employee.id,
                    date: today,
                    check_in,
                    check_out,
                    status,
                })
                .await?,
        );
    }

    let plans = [
        (0, LeaveType::Vacation, 14, 18, "Family trip", None),
        (3, LeaveType::Sick, 0, 2, "Recovering from surgery", Some(LeaveDecision::Approve)),
        (4, LeaveType::Personal, 7, 7, "Moving apartments", None),
        (5, LeaveType::Other, 21, 22, "Conference", Some(LeaveDecision::Reject)),
    ];
    let mut leave_requests = Vec::new();
    for (idx, leave_type, from, to, reason, decision) in plans {
        let Some(employee) = employees.get(idx) else {
            continue;
        };
        let start_date = today.checked_add_days(Days::new(from)).unwrap_or(today);
        let end_date = today.checked_add_days(Days::new(to)).unwrap_or(start_date);
        let mut request = services
            .leave
            .submit(&NewLeaveRequest {
                employee_id: employee.id,
                leave_type,
                start_date,
                end_date,
                reason: reason.to_string(),
            })
            .await?;
        if let Some(decision) = decision {
            request.status = services.leave.decide(&request, decision).await?;
        }
        leave_requests.push(request);
    }

    info!(
        employees = employees.len(),
        attendance = attendance.len(),
        leave_requests = leave_requests.len(),
        "hr demo data seeded"
    );
    Ok(SeededHrRecords {
        employees,
        attendance,
        leave_requests,
    })
}
