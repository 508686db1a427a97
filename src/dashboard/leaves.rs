use crate::dashboard::{Backend, Error, Session, signal::Signal};
use crate::model::leave::Leave;
use crate::policy::LeaveSubmission;
use std::sync::Arc;
use tokio::sync::watch;

/// The signed-in user's own leave requests.
pub struct LeavesService<B> {
    backend: Arc<B>,
    session: Arc<Session>,
    leaves: Signal<Vec<Leave>>,
}

impl<B: Backend> LeavesService<B> {
    pub fn new(backend: Arc<B>, session: Arc<Session>) -> Self {
        Self {
            backend,
            session,
            leaves: Signal::default(),
        }
    }

    /// No-op when nobody is logged in.
    pub async fn load_leaves(&self) -> Result<(), Error> {
        let Some(user_id) = self.session.user_id() else {
            return Ok(());
        };
        let leaves = self.backend.leaves_for_user(user_id).await?;
        tracing::debug!(user_id, count = leaves.len(), "Loaded leaves");
        self.leaves.set(leaves);
        Ok(())
    }

    /// Submits an already validated request as `Pending` for the current user
    /// and appends the stored record. `Ok(None)` when nobody is logged in.
    pub async fn apply_leave(&self, submission: LeaveSubmission) -> Result<Option<Leave>, Error> {
        let Some(user_id) = self.session.user_id() else {
            return Ok(None);
        };
        let created = self
            .backend
            .create_leave(&submission.into_new_leave(user_id))
            .await?;
        self.leaves.update(|leaves| leaves.push(created.clone()));
        Ok(Some(created))
    }

    pub fn leaves(&self) -> Vec<Leave> {
        self.leaves.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Leave>> {
        self.leaves.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::{MemoryCookieStore, testing::*};
    use crate::model::{
        leave::{LeaveStatus, LeaveType},
        role::Role,
    };

    fn session_for(id: u64) -> Arc<Session> {
        let session = Session::restore(MemoryCookieStore::new());
        session.set_user(user(id, "jane@company.com", Role::Employee)).unwrap();
        Arc::new(session)
    }

    fn submission() -> LeaveSubmission {
        LeaveSubmission {
            from_date: day(2025, 12, 1),
            to_date: day(2025, 12, 5),
            leave_type: LeaveType::Casual,
            reason: "Family trip".into(),
        }
    }

    #[actix_web::test]
    async fn loads_only_the_current_users_leaves() {
        let backend = Arc::new(
            FakeBackend::new()
                .with_leave(leave(1, 2, day(2025, 10, 1), day(2025, 10, 2), LeaveStatus::Approved))
                .with_leave(leave(2, 3, day(2025, 10, 1), day(2025, 10, 2), LeaveStatus::Pending)),
        );
        let service = LeavesService::new(backend, session_for(2));

        service.load_leaves().await.unwrap();

        let ids: Vec<u64> = service.leaves().iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[actix_web::test]
    async fn apply_appends_a_pending_leave() {
        let backend = Arc::new(FakeBackend::new());
        let service = LeavesService::new(backend.clone(), session_for(2));

        let created = service.apply_leave(submission()).await.unwrap().unwrap();

        assert_eq!(created.status, LeaveStatus::Pending);
        assert_eq!(created.user_id, 2);
        assert_eq!(service.leaves(), vec![created]);
        assert_eq!(backend.leaves().len(), 1);
    }

    #[actix_web::test]
    async fn logged_out_calls_touch_nothing() {
        let backend = Arc::new(FakeBackend::new());
        let session = Arc::new(Session::restore(MemoryCookieStore::new()));
        let service = LeavesService::new(backend.clone(), session);

        service.load_leaves().await.unwrap();
        assert_eq!(service.apply_leave(submission()).await.unwrap(), None);
        assert!(backend.calls().is_empty());
    }

    #[actix_web::test]
    async fn failed_create_leaves_local_list_unchanged() {
        let backend = Arc::new(FakeBackend::new());
        backend.fail(true);
        let service = LeavesService::new(backend, session_for(2));

        assert!(service.apply_leave(submission()).await.is_err());
        assert!(service.leaves().is_empty());
    }
}
