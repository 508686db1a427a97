use crate::dashboard::{Backend, Error, Session, signal::Signal};
use crate::model::leave::{LeaveStatus, LeaveWithUser};
use crate::policy::{
    ReviewDecision,
    review::{ensure_reviewable, join_with_users},
};
use std::sync::Arc;
use tokio::sync::watch;

/// Admin review of everyone else's leave requests.
pub struct LeaveManagementService<B> {
    backend: Arc<B>,
    session: Arc<Session>,
    leaves: Signal<Vec<LeaveWithUser>>,
}

impl<B: Backend> LeaveManagementService<B> {
    pub fn new(backend: Arc<B>, session: Arc<Session>) -> Self {
        Self {
            backend,
            session,
            leaves: Signal::default(),
        }
    }

    /// All leaves except the admin's own, each joined with its submitter's email.
    pub async fn load_leaves(&self) -> Result<(), Error> {
        let Some(admin_id) = self.session.user_id() else {
            return Ok(());
        };
        let leaves = self.backend.all_leaves().await?;
        let users = self.backend.users().await?;
        self.leaves.set(join_with_users(leaves, &users, admin_id));
        Ok(())
    }

    pub async fn approve_leave(&self, leave_id: u64) -> Result<bool, Error> {
        self.update_leave_status(leave_id, ReviewDecision::Approve).await
    }

    /// A blank reason is refused before anything is sent.
    pub async fn reject_leave(&self, leave_id: u64, reason: &str) -> Result<bool, Error> {
        let decision = ReviewDecision::reject(reason)?;
        self.update_leave_status(leave_id, decision).await
    }

    /// Returns `false` without calling the backend when nobody is logged in
    /// or the leave is not in the loaded list. Decided leaves are refused
    /// locally. On success the server's record replaces the local one.
    pub async fn update_leave_status(
        &self,
        leave_id: u64,
        decision: ReviewDecision,
    ) -> Result<bool, Error> {
        let Some(admin_id) = self.session.user_id() else {
            return Ok(false);
        };
        let reviewable = self.leaves.with(|leaves| {
            leaves
                .iter()
                .find(|l| l.leave.id == leave_id)
                .map(|entry| ensure_reviewable(&entry.leave, admin_id))
        });
        match reviewable {
            None => return Ok(false),
            Some(check) => check?,
        }

        let updated = self
            .backend
            .patch_leave(leave_id, &decision.to_patch())
            .await?;
        tracing::info!(leave_id, status = %updated.status, "Leave reviewed");

        self.leaves.update(|leaves| {
            if let Some(entry) = leaves.iter_mut().find(|l| l.leave.id == leave_id) {
                entry.leave = updated;
            }
        });
        Ok(true)
    }

    pub fn leaves(&self) -> Vec<LeaveWithUser> {
        self.leaves.get()
    }

    pub fn pending_count(&self) -> usize {
        self.leaves.with(|leaves| {
            leaves
                .iter()
                .filter(|l| l.leave.status == LeaveStatus::Pending)
                .count()
        })
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<LeaveWithUser>> {
        self.leaves.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::{MemoryCookieStore, testing::*};
    use crate::model::role::Role;
    use crate::policy::ReviewError;
    use pretty_assertions::assert_eq;

    async fn loaded() -> (Arc<FakeBackend>, LeaveManagementService<FakeBackend>) {
        let backend = Arc::new(
            FakeBackend::new()
                .with_user(user(1, "admin@company.com", Role::Admin), "pw")
                .with_user(user(2, "jane@company.com", Role::Employee), "pw")
                .with_leave(leave(10, 1, day(2025, 10, 1), day(2025, 10, 2), LeaveStatus::Pending))
                .with_leave(leave(11, 2, day(2025, 10, 3), day(2025, 10, 4), LeaveStatus::Pending))
                .with_leave(leave(12, 9, day(2025, 10, 5), day(2025, 10, 6), LeaveStatus::Approved)),
        );
        let session = Session::restore(MemoryCookieStore::new());
        session.set_user(user(1, "admin@company.com", Role::Admin)).unwrap();
        let service = LeaveManagementService::new(backend.clone(), Arc::new(session));
        service.load_leaves().await.unwrap();
        (backend, service)
    }

    #[actix_web::test]
    async fn list_excludes_own_leaves_and_joins_emails() {
        let (_, service) = loaded().await;

        let rows: Vec<(u64, String)> = service
            .leaves()
            .into_iter()
            .map(|l| (l.leave.id, l.user_email))
            .collect();

        assert_eq!(rows, vec![(11, "jane@company.com".to_string()), (12, String::new())]);
        assert_eq!(service.pending_count(), 1);
    }

    #[actix_web::test]
    async fn approve_merges_the_server_record() {
        let (_, service) = loaded().await;

        assert!(service.approve_leave(11).await.unwrap());

        let entry = service.leaves().into_iter().find(|l| l.leave.id == 11).unwrap();
        assert_eq!(entry.leave.status, LeaveStatus::Approved);
        assert_eq!(entry.leave.reject_reason, None);
        assert_eq!(entry.user_email, "jane@company.com");
    }

    #[actix_web::test]
    async fn reject_sends_the_trimmed_reason() {
        let (backend, service) = loaded().await;

        assert!(service.reject_leave(11, "  Team is short-staffed ").await.unwrap());

        let stored = backend.leaves().into_iter().find(|l| l.id == 11).unwrap();
        assert_eq!(stored.status, LeaveStatus::Rejected);
        assert_eq!(stored.reject_reason.as_deref(), Some("Team is short-staffed"));
    }

    #[actix_web::test]
    async fn blank_reject_reason_sends_nothing() {
        let (backend, service) = loaded().await;
        let before = backend.calls().len();

        let err = service.reject_leave(11, "   ").await.unwrap_err();

        assert!(matches!(err, Error::Review(ReviewError::ReasonRequired)));
        assert_eq!(backend.calls().len(), before);
    }

    #[actix_web::test]
    async fn decided_leaves_are_not_reviewed_again() {
        let (backend, service) = loaded().await;
        service.approve_leave(11).await.unwrap();
        let before = backend.calls().len();

        let err = service.reject_leave(11, "changed my mind").await.unwrap_err();
        assert!(matches!(err, Error::Review(ReviewError::AlreadyProcessed)));

        let err = service.approve_leave(12).await.unwrap_err();
        assert!(matches!(err, Error::Review(ReviewError::AlreadyProcessed)));

        assert_eq!(backend.calls().len(), before);
        let stored = backend.leaves().into_iter().find(|l| l.id == 11).unwrap();
        assert_eq!(stored.status, LeaveStatus::Approved);
        assert_eq!(stored.reject_reason, None);
    }

    #[actix_web::test]
    async fn unknown_id_is_a_no_op() {
        let (backend, service) = loaded().await;
        let before = backend.calls().len();

        assert!(!service.approve_leave(10).await.unwrap());
        assert!(!service.approve_leave(999).await.unwrap());
        assert_eq!(backend.calls().len(), before);
    }
}
