use async_graphql::{Context, ID, Object};
use chrono::NaiveDate;
use products_hr::{
    filter::{EmployeeCriteria, LeaveCriteria},
    views::{
        AttendanceView, DashboardView, EmployeeFormView, EmployeesView, LeaveRequestsView, today,
    },
    workflow::{self, Answer},
};
use tracing::{Instrument, info_span};

use super::{
    hr_error, parse_uuid, services,
    types::{
        ActionPayload, AttendanceNode, AttendanceStatus, Dashboard, EmployeeFilter, EmployeeInput,
        EmployeeNode, LeaveActionPayload, LeaveFilter, LeaveRequestNode,
    },
};

#[derive(Default)]
pub struct HrQuery;

#[derive(Default)]
pub struct HrMutation;

#[Object]
impl HrQuery {
    async fn dashboard(&self, ctx: &Context<'_>) -> async_graphql::Result<Dashboard> {
        let mut view = DashboardView::new(services(ctx)?.clone());
        view.load(today()).await;
        Ok(Dashboard {
            employee_stats: view.employee_stats.into(),
            leave_stats: view.leave_stats.into(),
            attendance_stats: view.attendance_stats.into(),
            recent_employees: view.recent_employees.into_iter().map(Into::into).collect(),
        })
    }

    async fn employees(
        &self,
        ctx: &Context<'_>,
        filter: Option<EmployeeFilter>,
    ) -> async_graphql::Result<Vec<EmployeeNode>> {
        let criteria: EmployeeCriteria = filter.unwrap_or_default().into();
        let span = info_span!(
            "hr.employees.query",
            has_q = criteria.term.as_deref().is_some_and(|q| !q.trim().is_empty()),
            department = criteria.department.map(|d| d.as_str()).unwrap_or(""),
            status = criteria.status.map(|s| s.as_str()).unwrap_or("")
        );
        let mut view = EmployeesView::new(services(ctx)?.employees.clone());
        view.load().instrument(span).await.map_err(hr_error)?;
        view.set_criteria(criteria);
        Ok(view.filtered.into_iter().map(Into::into).collect())
    }

    async fn employee(
        &self,
        ctx: &Context<'_>,
        id: ID,
    ) -> async_graphql::Result<Option<EmployeeNode>> {
        let id = parse_uuid(&id)?;
        match services(ctx)?.employees.get(id).await {
            Ok(employee) => Ok(Some(employee.into())),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(hr_error(err)),
        }
    }

    /// Attendance for one day (today when omitted), optionally narrowed by status.
    async fn attendance(
        &self,
        ctx: &Context<'_>,
        date: Option<NaiveDate>,
        status: Option<AttendanceStatus>,
    ) -> async_graphql::Result<Vec<AttendanceNode>> {
        let mut view = AttendanceView::new(
            services(ctx)?.attendance.clone(),
            date.unwrap_or_else(today),
        );
        view.load().await.map_err(hr_error)?;
        view.set_status(status.map(Into::into));
        Ok(view.filtered.into_iter().map(Into::into).collect())
    }

    #[graphql(name = "leaveRequests")]
    async fn leave_requests(
        &self,
        ctx: &Context<'_>,
        filter: Option<LeaveFilter>,
    ) -> async_graphql::Result<Vec<LeaveRequestNode>> {
        let criteria: LeaveCriteria = filter.unwrap_or_default().into();
        let mut view = LeaveRequestsView::new(services(ctx)?.leave.clone());
        view.load().await.map_err(hr_error)?;
        view.set_status(criteria.status);
        view.set_leave_type(criteria.leave_type);
        Ok(view.filtered.into_iter().map(Into::into).collect())
    }
}

#[Object]
impl HrMutation {
    #[graphql(name = "createEmployee")]
    async fn create_employee(
        &self,
        ctx: &Context<'_>,
        input: EmployeeInput,
    ) -> async_graphql::Result<EmployeeNode> {
        let mut view = EmployeeFormView::create(services(ctx)?.employees.clone());
        view.form = input.into();
        let saved = view.submit().await.map_err(hr_error)?;
        Ok(saved.into())
    }

    /// Replace every editable field of an existing employee.
    #[graphql(name = "updateEmployee")]
    async fn update_employee(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: EmployeeInput,
    ) -> async_graphql::Result<EmployeeNode> {
        let id = parse_uuid(&id)?;
        let service = services(ctx)?.employees.clone();
        let existing = service.get(id).await.map_err(hr_error)?;
        let mut view = EmployeeFormView::edit(service, &existing);
        view.form = input.into();
        let saved = view.submit().await.map_err(hr_error)?;
        Ok(saved.into())
    }

    /// `confirm: false` is a declined outcome and sends nothing.
    #[graphql(name = "deleteEmployee")]
    async fn delete_employee(
        &self,
        ctx: &Context<'_>,
        id: ID,
        confirm: bool,
    ) -> async_graphql::Result<ActionPayload> {
        let id = parse_uuid(&id)?;
        let mut view = EmployeesView::new(services(ctx)?.employees.clone());
        let outcome = view.delete(id, &Answer(confirm)).await.map_err(hr_error)?;
        Ok(ActionPayload {
            outcome: outcome.into(),
        })
    }

    #[graphql(name = "approveLeave")]
    async fn approve_leave(
        &self,
        ctx: &Context<'_>,
        id: ID,
        confirm: bool,
    ) -> async_graphql::Result<LeaveActionPayload> {
        decide_leave(ctx, id, confirm, workflow::LeaveDecision::Approve).await
    }

    #[graphql(name = "rejectLeave")]
    async fn reject_leave(
        &self,
        ctx: &Context<'_>,
        id: ID,
        confirm: bool,
    ) -> async_graphql::Result<LeaveActionPayload> {
        decide_leave(ctx, id, confirm, workflow::LeaveDecision::Reject).await
    }
}

async fn decide_leave(
    ctx: &Context<'_>,
    id: ID,
    confirm: bool,
    decision: workflow::LeaveDecision,
) -> async_graphql::Result<LeaveActionPayload> {
    let id = parse_uuid(&id)?;
    if !confirm {
        return Ok(LeaveActionPayload {
            outcome: workflow::ActionOutcome::Declined.into(),
            request: None,
        });
    }
    let mut view = LeaveRequestsView::new(services(ctx)?.leave.clone());
    view.load().await.map_err(hr_error)?;
    let answer = Answer(confirm);
    let outcome = match decision {
        workflow::LeaveDecision::Approve => view.approve(id, &answer).await,
        workflow::LeaveDecision::Reject => view.reject(id, &answer).await,
    }
    .map_err(hr_error)?;
    let request = match outcome {
        workflow::ActionOutcome::Applied => view
            .requests
            .iter()
            .find(|request| request.id == id)
            .cloned()
            .map(Into::into),
        workflow::ActionOutcome::Declined => None,
    };
    Ok(LeaveActionPayload {
        outcome: outcome.into(),
        request,
    })
}
