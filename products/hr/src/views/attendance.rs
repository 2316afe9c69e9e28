use chrono::NaiveDate;
use tracing::{error, instrument};
use uuid::Uuid;

use crate::{
    error::HrResult,
    filter::{AttendanceCriteria, filter},
    model::{AttendancePatch, AttendanceRecord, AttendanceStatus, NewAttendance},
    service::AttendanceService,
    stats::{AttendanceStats, aggregate},
};

pub struct AttendanceView {
    service: AttendanceService,
    pub date: NaiveDate,
    pub records: Vec<AttendanceRecord>,
    pub filtered: Vec<AttendanceRecord>,
    criteria: AttendanceCriteria,
    pub loading: bool,
    pub notice: Option<String>,
}

impl AttendanceView {
    /// `date` is normally [`super::today`].
    pub fn new(service: AttendanceService, date: NaiveDate) -> Self {
        Self {
            service,
            date,
            records: Vec::new(),
            filtered: Vec::new(),
            criteria: AttendanceCriteria::default(),
            loading: false,
            notice: None,
        }
    }

    /// Fetch the selected day's records.
    pub async fn load(&mut self) -> HrResult<()> {
        self.loading = true;
        let result = self.service.list(Some(self.date)).await;
        self.loading = false;
        match result {
            Ok(records) => {
                self.records = records;
                self.apply();
                Ok(())
            }
            Err(err) => {
                error!(error = %err, date = %self.date, "failed to load attendance");
                Err(err)
            }
        }
    }

    /// Switch days; this always re-fetches.
    pub async fn set_date(&mut self, date: NaiveDate) -> HrResult<()> {
        self.date = date;
        self.load().await
    }

    pub fn set_status(&mut self, status: Option<AttendanceStatus>) {
        self.criteria.status = status;
        self.apply();
    }

    pub fn status(&self) -> Option<AttendanceStatus> {
        self.criteria.status
    }

    /// Summary over the whole day, not just the filtered rows.
    pub fn stats(&self) -> AttendanceStats {
        aggregate(&self.records)
    }

    fn apply(&mut self) {
        self.filtered = filter(&self.records, &self.criteria);
    }

    #[instrument(name = "hr.attendance.mark", skip_all)]
    pub async fn record(&mut self, entry: NewAttendance) -> HrResult<AttendanceRecord> {
        let created = match self.service.record(&entry).await {
            Ok(created) => created,
            Err(err) => {
                error!(error = %err, "failed to record attendance");
                self.notice = Some("Failed to record attendance".to_string());
                return Err(err);
            }
        };
        self.notice = None;
        self.load().await?;
        Ok(created)
    }

    /// Attendance status is set directly; any declared value is accepted.
    #[instrument(name = "hr.attendance.update", skip_all, fields(id = %id))]
    pub async fn update(&mut self, id: Uuid, patch: AttendancePatch) -> HrResult<AttendanceRecord> {
        let updated = match self.service.update(id, &patch).await {
            Ok(updated) => updated,
            Err(err) => {
                error!(error = %err, "failed to update attendance");
                self.notice = Some("Failed to update attendance".to_string());
                return Err(err);
            }
        };
        self.notice = None;
        self.load().await?;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::ATTENDANCE;
    use chrono::NaiveTime;
    use platform_gateway::{MemoryGateway, Operation};
    use serde_json::json;
    use std::sync::Arc;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, d).unwrap()
    }

    async fn gateway() -> Arc<MemoryGateway> {
        let gateway = Arc::new(MemoryGateway::new());
        let row = |date: &str, status: &str| {
            json!({
                "id": Uuid::new_v4(), "employee_id": Uuid::new_v4(), "date": date,
                "check_in": "09:00:00", "check_out": "17:00:00", "status": status
            })
        };
        gateway
            .insert_rows(
                ATTENDANCE,
                vec![
                    row("2024-04-01", "present"),
                    row("2024-04-01", "late"),
                    row("2024-04-01", "half_day"),
                    row("2024-04-02", "absent"),
                ],
            )
            .await;
        gateway
    }

    #[tokio::test]
    async fn date_change_refetches_and_status_refilters() {
        let gateway = gateway().await;
        let mut view = AttendanceView::new(AttendanceService::new(gateway.clone()), day(1));
        view.load().await.unwrap();
        assert_eq!(view.records.len(), 3);
        assert_eq!(view.stats().half_day, 1);

        view.set_status(Some(AttendanceStatus::Late));
        assert_eq!(view.filtered.len(), 1);
        assert_eq!(view.filtered[0].employee_name, "Unknown");

        let before = gateway.calls().await.len();
        view.set_date(day(2)).await.unwrap();
        assert_eq!(gateway.calls().await.len(), before + 1);
        assert_eq!(view.records.len(), 1);
        assert!(view.filtered.is_empty());
    }

    #[tokio::test]
    async fn recording_refreshes_the_day() {
        let gateway = gateway().await;
        let mut view = AttendanceView::new(AttendanceService::new(gateway), day(2));
        view.load().await.unwrap();
        let created = view
            .record(NewAttendance {
                employee_id: Uuid::new_v4(),
                date: day(2),
                check_in: NaiveTime::from_hms_opt(8, 30, 0).unwrap(),
                check_out: None,
                status: AttendanceStatus::Present,
            })
            .await
            .unwrap();
        assert_eq!(created.status, AttendanceStatus::Present);
        assert_eq!(view.records.len(), 2);

        let updated = view
            .update(
                created.id,
                AttendancePatch {
                    status: Some(AttendanceStatus::HalfDay),
                    ..AttendancePatch::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status, AttendanceStatus::HalfDay);
    }

    #[tokio::test]
    async fn failed_fetch_is_not_left_loading() {
        let gateway = gateway().await;
        gateway.fail_next(ATTENDANCE, Operation::List).await;
        let mut view = AttendanceView::new(AttendanceService::new(gateway), day(1));
        assert!(view.load().await.is_err());
        assert!(!view.loading);
        assert!(view.records.is_empty());
        assert_eq!(view.stats(), AttendanceStats::default());
    }
}
