//! One-shot CLI commands. Tables go to stdout, logs to stderr.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result, bail};
use products_hr::{
    HrError, HrServices,
    display::format_salary,
    filter::EmployeeCriteria,
    model::{AttendanceRecord, Employee, LeaveRequest},
    seed_hr_demo,
    validation::EmployeeForm,
    views::{AttendanceView, DashboardView, EmployeeFormView, EmployeesView, LeaveRequestsView, today},
    workflow::{ActionOutcome, Answer, Confirm},
};

use crate::{AddEmployee, AttendanceCommand, EmployeesCommand, LeaveCommand};

/// Asks on the terminal unless `--yes` was given.
struct TerminalConfirm {
    assume_yes: bool,
}

impl Confirm for TerminalConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return Answer(true).confirm(prompt);
        }
        let mut stderr = io::stderr();
        if write!(stderr, "{prompt} [y/N] ").and_then(|_| stderr.flush()).is_err() {
            return false;
        }
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(_) => matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            Err(_) => false,
        }
    }
}

pub async fn dashboard(services: &HrServices) -> Result<()> {
    let mut view = DashboardView::new(services.clone());
    view.load(today()).await;

    let employees = &view.employee_stats;
    println!(
        "Employees   {:>4} total  {:>4} active  {:>4} on leave  {:>4} inactive",
        employees.total, employees.active, employees.on_leave, employees.inactive
    );
    let attendance = &view.attendance_stats;
    println!(
        "Today       {:>4} total  {:>4} present {:>4} late      {:>4} absent  {:>4} half day",
        attendance.total, attendance.present, attendance.late, attendance.absent, attendance.half_day
    );
    let leave = &view.leave_stats;
    println!(
        "Leave       {:>4} total  {:>4} pending {:>4} approved  {:>4} rejected",
        leave.total, leave.pending, leave.approved, leave.rejected
    );
    if !employees.departments.is_empty() {
        println!();
        for entry in &employees.departments {
            println!("  {:<12} {:>4}", entry.department.as_str(), entry.count);
        }
    }
    if !view.recent_employees.is_empty() {
        println!("\nRecent hires");
        print_employees(&view.recent_employees);
    }
    Ok(())
}

pub async fn employees(services: &HrServices, cmd: EmployeesCommand) -> Result<()> {
    match cmd {
        EmployeesCommand::List {
            search,
            department,
            status,
        } => {
            let mut view = EmployeesView::new(services.employees.clone());
            view.load().await.context("failed to load employees")?;
            view.set_criteria(EmployeeCriteria {
                term: search,
                department,
                status,
            });
            print_employees(&view.filtered);
            Ok(())
        }
        EmployeesCommand::Show { id } => {
            let employee = services
                .employees
                .get(id)
                .await
                .with_context(|| format!("failed to fetch employee {id}"))?;
            print_employee_detail(&employee);
            Ok(())
        }
        EmployeesCommand::Add(args) => add_employee(services, args).await,
        EmployeesCommand::Delete { id, yes } => {
            let mut view = EmployeesView::new(services.employees.clone());
            let result = view.delete(id, &TerminalConfirm { assume_yes: yes }).await;
            let outcome = result.with_context(|| notice_or(&view.notice, "failed to delete employee"))?;
            report(outcome, "Employee deleted");
            Ok(())
        }
    }
}

async fn add_employee(services: &HrServices, args: AddEmployee) -> Result<()> {
    let mut view = EmployeeFormView::create(services.employees.clone());
    view.form = EmployeeForm {
        first_name: args.first_name,
        last_name: args.last_name,
        email: args.email,
        phone: args.phone,
        department: args.department,
        position: args.position,
        hire_date: args.hire_date,
        salary: args.salary,
        status: args.status,
    };
    let result = view.submit().await;
    match result {
        Ok(saved) => {
            println!("Created {} ({})", saved.full_name(), saved.id);
            Ok(())
        }
        Err(HrError::Validation(errors)) => {
            for field in &errors.fields {
                eprintln!("  --{}: {}", field.field.replace('_', "-"), field.issue.message());
            }
            bail!("employee not created: {errors}")
        }
        Err(err) => Err(err).context(notice_or(&view.notice, "failed to save employee")),
    }
}

pub async fn attendance(services: &HrServices, cmd: AttendanceCommand) -> Result<()> {
    match cmd {
        AttendanceCommand::List { date, status } => {
            let mut view = AttendanceView::new(services.attendance.clone(), date.unwrap_or_else(today));
            let loaded = view.load().await;
            loaded.with_context(|| format!("failed to load attendance for {}", view.date))?;
            view.set_status(status);
            print_attendance(&view.filtered);
            let stats = view.stats();
            println!(
                "\n{}: {} present, {} late, {} absent, {} half day",
                view.date, stats.present, stats.late, stats.absent, stats.half_day
            );
            Ok(())
        }
    }
}

pub async fn leave(services: &HrServices, cmd: LeaveCommand) -> Result<()> {
    let mut view = LeaveRequestsView::new(services.leave.clone());
    view.load().await.context("failed to load leave requests")?;
    match cmd {
        LeaveCommand::List { status, leave_type } => {
            view.set_status(status);
            view.set_leave_type(leave_type);
            print_leave(&view.filtered);
            Ok(())
        }
        LeaveCommand::Approve { id, yes } => {
            let outcome = view.approve(id, &TerminalConfirm { assume_yes: yes }).await;
            finish_decision(&view, outcome, "Leave request approved")
        }
        LeaveCommand::Reject { id, yes } => {
            let outcome = view.reject(id, &TerminalConfirm { assume_yes: yes }).await;
            finish_decision(&view, outcome, "Leave request rejected")
        }
    }
}

fn finish_decision(
    view: &LeaveRequestsView,
    outcome: Result<ActionOutcome, HrError>,
    applied: &str,
) -> Result<()> {
    match outcome {
        Ok(outcome) => {
            report(outcome, applied);
            Ok(())
        }
        Err(err @ (HrError::Transition(_) | HrError::NotFound { .. })) => Err(err.into()),
        Err(err) => Err(err).context(notice_or(&view.notice, "leave decision failed")),
    }
}

pub async fn seed(services: &HrServices, demo: bool) -> Result<()> {
    if demo {
        println!("Demo tables are seeded at startup; nothing is persisted.");
        return Ok(());
    }
    let seeded = seed_hr_demo(services, today())
        .await
        .context("failed to seed HR tables")?;
    println!(
        "Seeded {} employees, {} attendance records, {} leave requests",
        seeded.employees.len(),
        seeded.attendance.len(),
        seeded.leave_requests.len()
    );
    Ok(())
}

fn notice_or(notice: &Option<String>, fallback: &str) -> String {
    notice.clone().unwrap_or_else(|| fallback.to_string())
}

fn report(outcome: ActionOutcome, applied: &str) {
    match outcome {
        ActionOutcome::Applied => println!("{applied}"),
        ActionOutcome::Declined => println!("Cancelled"),
    }
}

fn print_employees(rows: &[Employee]) {
    println!(
        "{:<36}  {:<22} {:<28} {:<12} {:<10} {:>10}",
        "ID", "NAME", "EMAIL", "DEPARTMENT", "STATUS", "SALARY"
    );
    for employee in rows {
        println!(
            "{:<36}  {:<22} {:<28} {:<12} {:<10} {:>10}",
            employee.id,
            employee.full_name(),
            employee.email,
            employee.department.as_str(),
            employee.status.label(),
            format_salary(employee.salary)
        );
    }
}

fn print_employee_detail(employee: &Employee) {
    println!("{}", employee.full_name());
    println!("  id          {}", employee.id);
    println!("  email       {}", employee.email);
    println!("  phone       {}", employee.phone);
    println!("  department  {}", employee.department.as_str());
    println!("  position    {}", employee.position);
    println!("  hired       {}", employee.hire_date);
    println!("  salary      {}", format_salary(employee.salary));
    println!("  status      {}", employee.status.label());
}

fn print_attendance(rows: &[AttendanceRecord]) {
    println!(
        "{:<36}  {:<22} {:<8} {:<8} {}",
        "ID", "EMPLOYEE", "IN", "OUT", "STATUS"
    );
    for record in rows {
        let check_out = record
            .check_out
            .map(|time| time.format("%H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<36}  {:<22} {:<8} {:<8} {} {}",
            record.id,
            record.employee_name,
            record.check_in.format("%H:%M").to_string(),
            check_out,
            record.status.icon(),
            record.status
        );
    }
}

fn print_leave(rows: &[LeaveRequest]) {
    println!(
        "{:<36}  {:<22} {:<9} {:<10} {:<10} {:>4}  {}",
        "ID", "EMPLOYEE", "TYPE", "FROM", "TO", "DAYS", "STATUS"
    );
    for request in rows {
        println!(
            "{:<36}  {:<22} {:<9} {:<10} {:<10} {:>4}  {}",
            request.id,
            request.employee_name,
            request.leave_type.as_str(),
            request.start_date.to_string(),
            request.end_date.to_string(),
            request.duration_days(),
            request.status
        );
    }
}
