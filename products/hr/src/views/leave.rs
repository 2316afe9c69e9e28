use tracing::{Instrument, error, info, info_span};
use uuid::Uuid;

use crate::{
    error::{HrError, HrResult},
    filter::{LeaveCriteria, filter},
    model::{LeaveRequest, LeaveStatus, LeaveType},
    service::{LEAVE_REQUESTS, LeaveService},
    workflow::{ActionOutcome, Confirm, LeaveDecision, transition},
};

pub struct LeaveRequestsView {
    service: LeaveService,
    pub requests: Vec<LeaveRequest>,
    pub filtered: Vec<LeaveRequest>,
    criteria: LeaveCriteria,
    pub loading: bool,
    pub notice: Option<String>,
}

impl LeaveRequestsView {
    pub fn new(service: LeaveService) -> Self {
        Self {
            service,
            requests: Vec::new(),
            filtered: Vec::new(),
            criteria: LeaveCriteria::default(),
            loading: false,
            notice: None,
        }
    }

    pub async fn load(&mut self) -> HrResult<()> {
        self.loading = true;
        let result = self.service.list().await;
        self.loading = false;
        match result {
            Ok(requests) => {
                self.requests = requests;
                self.apply();
                Ok(())
            }
            Err(err) => {
                error!(error = %err, "failed to load leave requests");
                Err(err)
            }
        }
    }

    pub fn criteria(&self) -> &LeaveCriteria {
        &self.criteria
    }

    pub fn set_status(&mut self, status: Option<LeaveStatus>) {
        self.criteria.status = status;
        self.apply();
    }

    pub fn set_leave_type(&mut self, leave_type: Option<LeaveType>) {
        self.criteria.leave_type = leave_type;
        self.apply();
    }

    fn apply(&mut self) {
        self.filtered = filter(&self.requests, &self.criteria);
    }

    pub async fn approve(&mut self, id: Uuid, confirm: &impl Confirm) -> HrResult<ActionOutcome> {
        let span = info_span!("hr.leave.approve", id = %id);
        self.decide(id, LeaveDecision::Approve, confirm)
            .instrument(span)
            .await
    }

    pub async fn reject(&mut self, id: Uuid, confirm: &impl Confirm) -> HrResult<ActionOutcome> {
        let span = info_span!("hr.leave.reject", id = %id);
        self.decide(id, LeaveDecision::Reject, confirm)
            .instrument(span)
            .await
    }

    /// Check the transition against the loaded copy, ask, send the status
    /// update, then re-fetch. Nothing reaches the gateway unless the request
    /// is pending and the user agreed. Once the update is stored the outcome
    /// is `Applied` even if the re-fetch fails.
    async fn decide(
        &mut self,
        id: Uuid,
        decision: LeaveDecision,
        confirm: &impl Confirm,
    ) -> HrResult<ActionOutcome> {
        let request = self
            .requests
            .iter()
            .find(|request| request.id == id)
            .cloned()
            .ok_or(HrError::NotFound {
                collection: LEAVE_REQUESTS,
                id,
            })?;
        transition(request.status, decision)?;
        if !confirm.confirm(decision.prompt()) {
            return Ok(ActionOutcome::Declined);
        }
        let status = match self.service.decide(&request, decision).await {
            Ok(status) => status,
            Err(err) => {
                error!(error = %err, "failed to {} leave request", decision.verb());
                self.notice = Some(decision.failure_notice());
                return Err(err);
            }
        };
        info!(%status, "leave request decided");
        self.notice = None;
        if self.load().await.is_err() {
            // Keep the local copy in step with what was written.
            if let Some(local) = self.requests.iter_mut().find(|request| request.id == id) {
                local.status = status;
            }
            self.apply();
        }
        Ok(ActionOutcome::Applied)
    }
}
