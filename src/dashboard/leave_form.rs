use crate::dashboard::{Backend, SERVER_ERROR, ToastService, leaves::LeavesService};
use crate::model::leave::{Leave, LeaveType};
use crate::policy::{Clock, LeaveDraft, LeaveError, validate_submission};
use chrono::NaiveDate;

pub const LEAVE_ADDED: &str = "Leave added successfully";

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Submitted(Leave),
    Invalid(LeaveError),
    NotLoggedIn,
    Failed,
}

/// The "apply for leave" form on the leaves page.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaveForm {
    pub draft: LeaveDraft,
    pub show_form: bool,
}

impl LeaveForm {
    /// Starts as a sick leave for today.
    pub fn new(today: NaiveDate) -> Self {
        let mut form = Self {
            draft: LeaveDraft::default(),
            show_form: false,
        };
        form.reset(today);
        form
    }

    pub fn reset(&mut self, today: NaiveDate) {
        self.draft = LeaveDraft {
            leave_type: LeaveType::Sick.to_string(),
            ..LeaveDraft::default()
        };
        self.on_type_change(today);
    }

    pub fn toggle(&mut self) {
        self.show_form = !self.show_form;
    }

    pub fn set_type(&mut self, leave_type: &str, today: NaiveDate) {
        self.draft.leave_type = leave_type.to_string();
        self.on_type_change(today);
    }

    /// Sick pins both dates to today. Casual pulls a past or missing start up
    /// to today and keeps the end no earlier than the start.
    pub fn on_type_change(&mut self, today: NaiveDate) {
        let draft = &mut self.draft;
        match draft.leave_type() {
            Some(LeaveType::Sick) => {
                draft.from_date = Some(today);
                draft.to_date = Some(today);
            }
            Some(LeaveType::Casual) => {
                let from = match draft.from_date {
                    Some(from) if from >= today => from,
                    _ => today,
                };
                draft.from_date = Some(from);
                if draft.to_date.is_none_or(|to| to < from) {
                    draft.to_date = Some(from);
                }
            }
            None => {}
        }
    }

    /// Validates against the cached leaves, submits, and reports through
    /// toasts. The draft stays populated on every failure.
    pub async fn submit<B: Backend>(
        &mut self,
        leaves: &LeavesService<B>,
        toasts: &ToastService,
        clock: &dyn Clock,
    ) -> SubmitOutcome {
        let today = clock.today();
        let submission = match validate_submission(&self.draft, &leaves.leaves(), today) {
            Ok(submission) => submission,
            Err(e) => {
                toasts.error(e.to_string());
                return SubmitOutcome::Invalid(e);
            }
        };

        match leaves.apply_leave(submission).await {
            Ok(Some(created)) => {
                toasts.success(LEAVE_ADDED);
                self.reset(today);
                self.show_form = false;
                SubmitOutcome::Submitted(created)
            }
            Ok(None) => SubmitOutcome::NotLoggedIn,
            Err(e) => {
                tracing::error!(error = %e, "Leave submission failed");
                toasts.error(SERVER_ERROR);
                SubmitOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::{MemoryCookieStore, Session, ToastKind, testing::*};
    use crate::model::{leave::LeaveStatus, role::Role};
    use crate::policy::{FixedClock, LeaveRuleViolation};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    const TODAY: (i32, u32, u32) = (2025, 10, 8);

    fn today() -> NaiveDate {
        day(TODAY.0, TODAY.1, TODAY.2)
    }

    fn service(backend: Arc<FakeBackend>) -> LeavesService<FakeBackend> {
        let session = Session::restore(MemoryCookieStore::new());
        session.set_user(user(2, "jane@company.com", Role::Employee)).unwrap();
        LeavesService::new(backend, Arc::new(session))
    }

    #[test]
    fn new_form_is_sick_leave_for_today() {
        let form = LeaveForm::new(today());
        assert_eq!(form.draft.leave_type, "Sick");
        assert_eq!(form.draft.from_date, Some(today()));
        assert_eq!(form.draft.to_date, Some(today()));
        assert!(!form.show_form);
    }

    #[test]
    fn casual_pulls_past_start_to_today_and_keeps_end_after_start() {
        let mut form = LeaveForm::new(today());
        form.draft.from_date = Some(day(2025, 10, 1));
        form.draft.to_date = Some(day(2025, 10, 3));

        form.set_type("Casual", today());

        assert_eq!(form.draft.from_date, Some(today()));
        assert_eq!(form.draft.to_date, Some(today()));
    }

    #[test]
    fn casual_keeps_future_dates() {
        let mut form = LeaveForm::new(today());
        form.draft.from_date = Some(day(2025, 10, 20));
        form.draft.to_date = Some(day(2025, 10, 22));

        form.set_type("Casual", today());

        assert_eq!(form.draft.from_date, Some(day(2025, 10, 20)));
        assert_eq!(form.draft.to_date, Some(day(2025, 10, 22)));
    }

    #[test]
    fn switching_to_sick_pins_both_dates_to_today() {
        let mut form = LeaveForm::new(today());
        form.set_type("Casual", today());
        form.draft.from_date = Some(day(2025, 12, 1));
        form.draft.to_date = Some(day(2025, 12, 5));

        form.set_type("Sick", today());

        assert_eq!(form.draft.from_date, Some(today()));
        assert_eq!(form.draft.to_date, Some(today()));
    }

    #[test]
    fn unknown_type_leaves_dates_alone() {
        let mut form = LeaveForm::new(today());
        form.draft.from_date = None;

        form.set_type("Vacation", today());

        assert_eq!(form.draft.from_date, None);
        assert_eq!(form.draft.to_date, Some(today()));
    }

    #[actix_web::test]
    async fn valid_submission_toasts_resets_and_hides() {
        let backend = Arc::new(FakeBackend::new());
        let leaves = service(backend.clone());
        let toasts = ToastService::new();
        let mut form = LeaveForm::new(today());
        form.show_form = true;
        form.set_type("Casual", today());
        form.draft.from_date = Some(day(2025, 12, 1));
        form.draft.to_date = Some(day(2025, 12, 5));
        form.draft.reason = "Family trip".into();

        let outcome = form.submit(&leaves, &toasts, &FixedClock(today())).await;

        assert!(matches!(outcome, SubmitOutcome::Submitted(ref l) if l.status == LeaveStatus::Pending));
        assert_eq!(toasts.messages(), vec![(ToastKind::Success, LEAVE_ADDED.to_string())]);
        assert_eq!(form, LeaveForm::new(today()));
        assert_eq!(leaves.leaves().len(), 1);
    }

    #[actix_web::test]
    async fn overlap_with_cached_leave_is_refused_locally() {
        let backend = Arc::new(FakeBackend::new().with_leave(leave(
            7,
            2,
            day(2025, 10, 8),
            day(2025, 10, 9),
            LeaveStatus::Rejected,
        )));
        let leaves = service(backend.clone());
        leaves.load_leaves().await.unwrap();
        let toasts = ToastService::new();
        let mut form = LeaveForm::new(today());
        form.draft.reason = "Flu symptoms".into();

        let outcome = form.submit(&leaves, &toasts, &FixedClock(today())).await;

        assert_eq!(
            outcome,
            SubmitOutcome::Invalid(LeaveError::Rule(LeaveRuleViolation::Overlap { leave_id: 7 }))
        );
        assert_eq!(
            toasts.messages(),
            vec![(ToastKind::Error, "You already have leave during these dates.".to_string())]
        );
        assert!(!backend.calls().contains(&"create_leave".to_string()));
        assert_eq!(form.draft.reason, "Flu symptoms");
    }

    #[actix_web::test]
    async fn structural_errors_use_the_generic_message() {
        let leaves = service(Arc::new(FakeBackend::new()));
        let toasts = ToastService::new();
        let mut form = LeaveForm::new(today());

        let outcome = form.submit(&leaves, &toasts, &FixedClock(today())).await;

        assert!(matches!(outcome, SubmitOutcome::Invalid(LeaveError::Structural(_))));
        assert_eq!(
            toasts.messages(),
            vec![(ToastKind::Error, "Please fix errors before submitting".to_string())]
        );
    }

    #[actix_web::test]
    async fn sick_leave_for_another_day_names_the_rule() {
        let leaves = service(Arc::new(FakeBackend::new()));
        let toasts = ToastService::new();
        let mut form = LeaveForm::new(today());
        form.draft.reason = "Flu symptoms".into();

        let outcome = form
            .submit(&leaves, &toasts, &FixedClock(day(2025, 10, 9)))
            .await;

        assert_eq!(
            outcome,
            SubmitOutcome::Invalid(LeaveError::Rule(LeaveRuleViolation::SickNotToday))
        );
    }

    #[actix_web::test]
    async fn server_failure_keeps_the_form() {
        let backend = Arc::new(FakeBackend::new());
        backend.fail(true);
        let leaves = service(backend);
        let toasts = ToastService::new();
        let mut form = LeaveForm::new(today());
        form.show_form = true;
        form.draft.reason = "Flu symptoms".into();

        let outcome = form.submit(&leaves, &toasts, &FixedClock(today())).await;

        assert_eq!(outcome, SubmitOutcome::Failed);
        assert_eq!(toasts.messages(), vec![(ToastKind::Error, SERVER_ERROR.to_string())]);
        assert!(form.show_form);
        assert_eq!(form.draft.reason, "Flu symptoms");
    }
}
