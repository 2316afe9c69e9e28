//! Typed access to the three HR tables through a [`Gateway`].

use std::sync::Arc;

use chrono::NaiveDate;
use platform_gateway::{Direction, Gateway, GatewayError, Query};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Value, json};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::{
    error::{HrError, HrResult},
    model::{
        AttendancePatch, AttendanceRecord, AttendanceRow, Employee, EmployeePatch, LeaveRequest,
        LeaveRow, LeaveStatus, NewAttendance, NewEmployee, NewLeaveRequest,
    },
    stats::{AttendanceStats, EmployeeStats, LeaveStats, aggregate},
    validation::{Issue, ValidationErrors},
    workflow::{LeaveDecision, LeaveStatusUpdate, transition},
};

pub const EMPLOYEES: &str = "employees";
pub const ATTENDANCE: &str = "attendance";
pub const LEAVE_REQUESTS: &str = "leave_requests";

/// Projection that joins the owning employee's name onto a row.
const WITH_EMPLOYEE_NAME: &str = "*, employees(first_name, last_name)";

fn decode<T: DeserializeOwned>(table: &str, row: Value) -> HrResult<T> {
    serde_json::from_value(row).map_err(|err| HrError::from(GatewayError::decode(table, err)))
}

fn decode_all<T: DeserializeOwned>(table: &str, rows: Vec<Value>) -> HrResult<Vec<T>> {
    rows.into_iter().map(|row| decode(table, row)).collect()
}

fn encode<T: Serialize>(table: &str, value: &T) -> HrResult<Value> {
    serde_json::to_value(value).map_err(|err| HrError::from(GatewayError::decode(table, err)))
}

#[derive(Clone)]
pub struct EmployeeService {
    gateway: Arc<dyn Gateway>,
}

impl EmployeeService {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }

    /// Newest first.
    #[instrument(name = "hr.employees.list", skip_all)]
    pub async fn list(&self) -> HrResult<Vec<Employee>> {
        let query = Query::new().order("created_at", Direction::Desc);
        let rows = self.gateway.list(EMPLOYEES, &query).await?;
        debug!(rows = rows.len(), "employees fetched");
        decode_all(EMPLOYEES, rows)
    }

    #[instrument(name = "hr.employees.get", skip_all, fields(id = %id))]
    pub async fn get(&self, id: Uuid) -> HrResult<Employee> {
        match self.gateway.get(EMPLOYEES, id).await? {
            Some(row) => decode(EMPLOYEES, row),
            None => Err(HrError::NotFound {
                collection: EMPLOYEES,
                id,
            }),
        }
    }

    #[instrument(name = "hr.employees.create", skip_all)]
    pub async fn create(&self, employee: &NewEmployee) -> HrResult<Employee> {
        let row = self
            .gateway
            .create(EMPLOYEES, encode(EMPLOYEES, employee)?)
            .await?;
        decode(EMPLOYEES, row)
    }

    #[instrument(name = "hr.employees.update", skip_all, fields(id = %id))]
    pub async fn update(&self, id: Uuid, patch: &EmployeePatch) -> HrResult<Employee> {
        let row = self
            .gateway
            .update(EMPLOYEES, id, encode(EMPLOYEES, patch)?)
            .await?;
        decode(EMPLOYEES, row)
    }

    #[instrument(name = "hr.employees.delete", skip_all, fields(id = %id))]
    pub async fn delete(&self, id: Uuid) -> HrResult<()> {
        self.gateway.delete(EMPLOYEES, id).await?;
        Ok(())
    }

    pub async fn stats(&self) -> HrResult<EmployeeStats> {
        Ok(aggregate(&self.list().await?))
    }
}

#[derive(Clone)]
pub struct AttendanceService {
    gateway: Arc<dyn Gateway>,
}

impl AttendanceService {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }

    /// Records for one day, or every day when `date` is `None`; latest day first.
    #[instrument(name = "hr.attendance.list", skip_all, fields(date = ?date))]
    pub async fn list(&self, date: Option<NaiveDate>) -> HrResult<Vec<AttendanceRecord>> {
        let mut query = Query::new()
            .select(WITH_EMPLOYEE_NAME)
            .order("date", Direction::Desc);
        if let Some(date) = date {
            query = query.eq("date", date);
        }
        let rows = self.gateway.list(ATTENDANCE, &query).await?;
        debug!(rows = rows.len(), "attendance fetched");
        let rows: Vec<AttendanceRow> = decode_all(ATTENDANCE, rows)?;
        Ok(rows.into_iter().map(AttendanceRecord::from).collect())
    }

    pub async fn stats_for(&self, date: NaiveDate) -> HrResult<AttendanceStats> {
        Ok(aggregate(&self.list(Some(date)).await?))
    }

    #[instrument(name = "hr.attendance.get", skip_all, fields(id = %id))]
    pub async fn get(&self, id: Uuid) -> HrResult<AttendanceRecord> {
        let query = Query::new().select(WITH_EMPLOYEE_NAME).eq("id", id);
        let row = self
            .gateway
            .list(ATTENDANCE, &query)
            .await?
            .into_iter()
            .next()
            .ok_or(HrError::NotFound {
                collection: ATTENDANCE,
                id,
            })?;
        Ok(decode::<AttendanceRow>(ATTENDANCE, row)?.into())
    }

    /// Store a record and return it with the employee name joined in.
    #[instrument(name = "hr.attendance.record", skip_all)]
    pub async fn record(&self, entry: &NewAttendance) -> HrResult<AttendanceRecord> {
        let row = self
            .gateway
            .create(ATTENDANCE, encode(ATTENDANCE, entry)?)
            .await?;
        self.get(created_id(ATTENDANCE, &row)?).await
    }

    #[instrument(name = "hr.attendance.update", skip_all, fields(id = %id))]
    pub async fn update(&self, id: Uuid, patch: &AttendancePatch) -> HrResult<AttendanceRecord> {
        self.gateway
            .update(ATTENDANCE, id, encode(ATTENDANCE, patch)?)
            .await?;
        self.get(id).await
    }
}

#[derive(Clone)]
pub struct LeaveService {
    gateway: Arc<dyn Gateway>,
}

impl LeaveService {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }

    /// Newest first.
    #[instrument(name = "hr.leave.list", skip_all)]
    pub async fn list(&self) -> HrResult<Vec<LeaveRequest>> {
        let query = Query::new()
            .select(WITH_EMPLOYEE_NAME)
            .order("created_at", Direction::Desc);
        let rows = self.gateway.list(LEAVE_REQUESTS, &query).await?;
        debug!(rows = rows.len(), "leave requests fetched");
        let rows: Vec<LeaveRow> = decode_all(LEAVE_REQUESTS, rows)?;
        Ok(rows.into_iter().map(LeaveRequest::from).collect())
    }

    #[instrument(name = "hr.leave.get", skip_all, fields(id = %id))]
    pub async fn get(&self, id: Uuid) -> HrResult<LeaveRequest> {
        let query = Query::new().select(WITH_EMPLOYEE_NAME).eq("id", id);
        let row = self
            .gateway
            .list(LEAVE_REQUESTS, &query)
            .await?
            .into_iter()
            .next()
            .ok_or(HrError::NotFound {
                collection: LEAVE_REQUESTS,
                id,
            })?;
        Ok(decode::<LeaveRow>(LEAVE_REQUESTS, row)?.into())
    }

    /// File a new request; it always starts out pending.
    #[instrument(name = "hr.leave.submit", skip_all)]
    pub async fn submit(&self, request: &NewLeaveRequest) -> HrResult<LeaveRequest> {
        if request.end_date < request.start_date {
            return Err(ValidationErrors::single("end_date", Issue::Range).into());
        }
        let record = json!({
            "employee_id": request.employee_id,
            "leave_type": request.leave_type,
            "start_date": request.start_date,
            "end_date": request.end_date,
            "reason": request.reason,
            "status": LeaveStatus::Pending,
        });
        let row = self.gateway.create(LEAVE_REQUESTS, record).await?;
        self.get(created_id(LEAVE_REQUESTS, &row)?).await
    }

    /// Apply a decision to a loaded request.
    ///
    /// The caller's copy is checked first, then the stored status is re-read
    /// so a stale copy can never move a decided request. Only `status` is
    /// written.
    #[instrument(name = "hr.leave.decide", skip_all, fields(id = %request.id, decision = decision.verb()))]
    pub async fn decide(
        &self,
        request: &LeaveRequest,
        decision: LeaveDecision,
    ) -> HrResult<LeaveStatus> {
        transition(request.status, decision)?;
        let stored = self.stored_status(request.id).await?;
        let status = transition(stored, decision)?;
        let update = LeaveStatusUpdate { status };
        self.gateway
            .update(LEAVE_REQUESTS, request.id, encode(LEAVE_REQUESTS, &update)?)
            .await?;
        Ok(status)
    }

    pub async fn stats(&self) -> HrResult<LeaveStats> {
        Ok(aggregate(&self.list().await?))
    }

    async fn stored_status(&self, id: Uuid) -> HrResult<LeaveStatus> {
        let row = self
            .gateway
            .get(LEAVE_REQUESTS, id)
            .await?
            .ok_or(HrError::NotFound {
                collection: LEAVE_REQUESTS,
                id,
            })?;
        Ok(decode::<StatusOnly>(LEAVE_REQUESTS, row)?.status)
    }
}

#[derive(Deserialize)]
struct StatusOnly {
    status: LeaveStatus,
}

fn created_id(table: &str, row: &Value) -> HrResult<Uuid> {
    row["id"]
        .as_str()
        .and_then(|raw| Uuid::parse_str(raw).ok())
        .ok_or_else(|| GatewayError::decode(table, "created row has no id").into())
}

/// One handle per collection, sharing a gateway.
#[derive(Clone)]
pub struct HrServices {
    pub employees: EmployeeService,
    pub attendance: AttendanceService,
    pub leave: LeaveService,
}

impl HrServices {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self {
            employees: EmployeeService::new(gateway.clone()),
            attendance: AttendanceService::new(gateway.clone()),
            leave: LeaveService::new(gateway),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Department, EmployeeStatus, LeaveType};
    use platform_gateway::{MemoryGateway, Operation};

    const ADA: &str = "0b5d2c3a-1f4e-4c6b-9a7d-2e8f1a3b4c5d";

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn gateway() -> Arc<MemoryGateway> {
        let gateway = Arc::new(MemoryGateway::new());
        gateway
            .insert_rows(
                EMPLOYEES,
                vec![
                    json!({
                        "id": ADA, "first_name": "Ada", "last_name": "Lovelace",
                        "email": "ada@acme.test", "phone": "555-0100",
                        "department": "Engineering", "position": "Engineer",
                        "hire_date": "2020-01-06", "salary": 120000, "status": "active",
                        "created_at": "2020-01-06T09:00:00Z"
                    }),
                    json!({
                        "id": Uuid::new_v4(), "first_name": "Bo", "last_name": "Chen",
                        "email": "bo@acme.test", "phone": "555-0101",
                        "department": "Sales", "position": "Rep",
                        "hire_date": "2023-04-03", "salary": 60000, "status": "on_leave",
                        "created_at": "2023-04-03T09:00:00Z"
                    }),
                ],
            )
            .await;
        gateway
    }

    #[tokio::test]
    async fn employees_are_listed_newest_first() {
        let services = HrServices::new(gateway().await);
        let staff = services.employees.list().await.unwrap();
        assert_eq!(staff[0].first_name, "Bo");
        assert_eq!(staff[1].department, Department::Engineering);

        let stats = services.employees.stats().await.unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.on_leave, 1);
    }

    #[tokio::test]
    async fn missing_employee_is_not_found() {
        let services = HrServices::new(gateway().await);
        let err = services.employees.get(Uuid::new_v4()).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn attendance_joins_names_and_filters_by_date() {
        let gateway = gateway().await;
        let services = HrServices::new(gateway.clone());
        let ada = Uuid::parse_str(ADA).unwrap();
        services
            .attendance
            .record(&NewAttendance {
                employee_id: ada,
                date: date(2024, 3, 1),
                check_in: chrono::NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                check_out: None,
                status: crate::model::AttendanceStatus::Present,
            })
            .await
            .unwrap();
        gateway
            .insert_rows(
                ATTENDANCE,
                vec![json!({
                    "id": Uuid::new_v4(), "employee_id": Uuid::new_v4(),
                    "date": "2024-03-02", "check_in": "10:15:00", "status": "late"
                })],
            )
            .await;

        let all = services.attendance.list(None).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].employee_name, "Unknown");
        assert_eq!(all[1].employee_name, "Ada Lovelace");

        let stats = services.attendance.stats_for(date(2024, 3, 1)).await.unwrap();
        assert_eq!(stats.total, 1);
        assert_eq!(stats.present, 1);
    }

    #[tokio::test]
    async fn submitted_leave_starts_pending_and_decides_once() {
        let gateway = gateway().await;
        let services = HrServices::new(gateway.clone());
        let request = services
            .leave
            .submit(&NewLeaveRequest {
                employee_id: Uuid::parse_str(ADA).unwrap(),
                leave_type: LeaveType::Vacation,
                start_date: date(2024, 7, 1),
                end_date: date(2024, 7, 5),
                reason: "Summer".into(),
            })
            .await
            .unwrap();
        assert_eq!(request.status, LeaveStatus::Pending);
        assert_eq!(request.employee_name, "Ada Lovelace");
        assert_eq!(request.duration_days(), 5);

        let status = services
            .leave
            .decide(&request, LeaveDecision::Approve)
            .await
            .unwrap();
        assert_eq!(status, LeaveStatus::Approved);

        let decided = services.leave.get(request.id).await.unwrap();
        let before = gateway.calls().await.len();
        let err = services
            .leave
            .decide(&decided, LeaveDecision::Reject)
            .await
            .unwrap_err();
        assert!(matches!(err, HrError::Transition(_)));
        assert_eq!(gateway.calls().await.len(), before);
    }

    #[tokio::test]
    async fn stale_pending_copy_cannot_redecide() {
        let gateway = gateway().await;
        let services = HrServices::new(gateway.clone());
        let request = services
            .leave
            .submit(&NewLeaveRequest {
                employee_id: Uuid::parse_str(ADA).unwrap(),
                leave_type: LeaveType::Personal,
                start_date: date(2024, 9, 2),
                end_date: date(2024, 9, 2),
                reason: "Errand".into(),
            })
            .await
            .unwrap();
        services
            .leave
            .decide(&request, LeaveDecision::Approve)
            .await
            .unwrap();

        let err = services
            .leave
            .decide(&request, LeaveDecision::Reject)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            HrError::Transition(ref t) if t.current == LeaveStatus::Approved
        ));
        let updates = gateway
            .calls()
            .await
            .into_iter()
            .filter(|(_, op)| *op == Operation::Update)
            .count();
        assert_eq!(updates, 1);
        assert_eq!(
            services.leave.get(request.id).await.unwrap().status,
            LeaveStatus::Approved
        );
    }

    #[tokio::test]
    async fn leave_with_end_before_start_is_rejected_locally() {
        let gateway = gateway().await;
        let services = HrServices::new(gateway.clone());
        let err = services
            .leave
            .submit(&NewLeaveRequest {
                employee_id: Uuid::parse_str(ADA).unwrap(),
                leave_type: LeaveType::Sick,
                start_date: date(2024, 7, 5),
                end_date: date(2024, 7, 1),
                reason: String::new(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, HrError::Validation(ref v) if v.has("end_date")));
        assert!(gateway.calls().await.is_empty());
    }

    #[tokio::test]
    async fn employee_update_sends_only_patched_fields() {
        let gateway = gateway().await;
        let services = HrServices::new(gateway.clone());
        let id = Uuid::parse_str(ADA).unwrap();
        let updated = services
            .employees
            .update(
                id,
                &EmployeePatch {
                    status: Some(EmployeeStatus::Inactive),
                    ..EmployeePatch::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status, EmployeeStatus::Inactive);
        assert_eq!(updated.email, "ada@acme.test");
    }

    #[tokio::test]
    async fn gateway_failures_surface_as_errors() {
        let gateway = gateway().await;
        gateway.fail_next(EMPLOYEES, Operation::Delete).await;
        let services = HrServices::new(gateway.clone());
        let err = services
            .employees
            .delete(Uuid::parse_str(ADA).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, HrError::Gateway(GatewayError::Unavailable(_))));
        assert_eq!(gateway.rows(EMPLOYEES).await.len(), 2);
    }
}
