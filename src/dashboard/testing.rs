//! In-memory `Backend` for the dashboard tests.

use crate::dashboard::client::{Backend, ClientError};
use crate::model::{
    leave::{Leave, LeaveStatus, LeaveStatusPatch, NewLeave},
    role::Role,
    task::{NewTask, Task},
    user::User,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::{
    Mutex,
    atomic::{AtomicBool, Ordering},
};

#[derive(Default)]
pub struct FakeState {
    pub users: Vec<(User, String)>,
    pub leaves: Vec<Leave>,
    pub tasks: Vec<Task>,
    pub next_id: u64,
    pub calls: Vec<String>,
    pub token: Option<String>,
}

#[derive(Default)]
pub struct FakeBackend {
    pub state: Mutex<FakeState>,
    pub failing: AtomicBool,
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn user(id: u64, email: &str, role: Role) -> User {
    User {
        id,
        email: email.into(),
        role,
        token: None,
    }
}

pub fn leave(id: u64, user_id: u64, from: NaiveDate, to: NaiveDate, status: LeaveStatus) -> Leave {
    Leave {
        id,
        from_date: from,
        to_date: to,
        leave_type: crate::model::leave::LeaveType::Casual,
        reason: "Family trip".into(),
        status,
        user_id,
        reject_reason: None,
    }
}

pub fn task(id: u64, user_id: u64, title: &str, completed: bool) -> Task {
    Task {
        id,
        title: title.into(),
        completed,
        user_id,
    }
}

impl FakeBackend {
    pub fn new() -> Self {
        let backend = Self::default();
        backend.state.lock().unwrap().next_id = 100;
        backend
    }

    pub fn with_user(self, user: User, password: &str) -> Self {
        self.state.lock().unwrap().users.push((user, password.into()));
        self
    }

    pub fn with_leave(self, leave: Leave) -> Self {
        self.state.lock().unwrap().leaves.push(leave);
        self
    }

    pub fn with_task(self, task: Task) -> Self {
        self.state.lock().unwrap().tasks.push(task);
        self
    }

    pub fn fail(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn token(&self) -> Option<String> {
        self.state.lock().unwrap().token.clone()
    }

    pub fn leaves(&self) -> Vec<Leave> {
        self.state.lock().unwrap().leaves.clone()
    }

    fn record(&self, call: &str) -> Result<std::sync::MutexGuard<'_, FakeState>, ClientError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call.to_string());
        if self.failing.load(Ordering::SeqCst) {
            return Err(ClientError::Status {
                status: 500,
                message: "boom".into(),
            });
        }
        Ok(state)
    }
}

fn not_found() -> ClientError {
    ClientError::Status {
        status: 404,
        message: "not found".into(),
    }
}

#[async_trait]
impl Backend for FakeBackend {
    fn authorize(&self, token: Option<String>) {
        self.state.lock().unwrap().token = token;
    }

    async fn find_users(&self, email: &str, password: &str) -> Result<Vec<User>, ClientError> {
        let state = self.record("find_users")?;
        Ok(state
            .users
            .iter()
            .filter(|(u, p)| u.email == email && p == password)
            .map(|(u, _)| User {
                token: Some(format!("token-{}", u.id)),
                ..u.clone()
            })
            .collect())
    }

    async fn users(&self) -> Result<Vec<User>, ClientError> {
        let state = self.record("users")?;
        Ok(state.users.iter().map(|(u, _)| u.clone()).collect())
    }

    async fn leaves_for_user(&self, user_id: u64) -> Result<Vec<Leave>, ClientError> {
        let state = self.record("leaves_for_user")?;
        Ok(state.leaves.iter().filter(|l| l.user_id == user_id).cloned().collect())
    }

    async fn all_leaves(&self) -> Result<Vec<Leave>, ClientError> {
        let state = self.record("all_leaves")?;
        Ok(state.leaves.clone())
    }

    async fn create_leave(&self, leave: &NewLeave) -> Result<Leave, ClientError> {
        let mut state = self.record("create_leave")?;
        state.next_id += 1;
        let created = Leave {
            id: state.next_id,
            from_date: leave.from_date,
            to_date: leave.to_date,
            leave_type: leave.leave_type,
            reason: leave.reason.clone(),
            status: leave.status,
            user_id: leave.user_id,
            reject_reason: None,
        };
        state.leaves.push(created.clone());
        Ok(created)
    }

    async fn patch_leave(&self, leave_id: u64, patch: &LeaveStatusPatch) -> Result<Leave, ClientError> {
        let mut state = self.record("patch_leave")?;
        let leave = state
            .leaves
            .iter_mut()
            .find(|l| l.id == leave_id)
            .ok_or_else(not_found)?;
        leave.status = patch.status;
        leave.reject_reason = match patch.status {
            LeaveStatus::Rejected => patch.reject_reason.clone(),
            _ => None,
        };
        Ok(leave.clone())
    }

    async fn tasks_for_user(&self, user_id: u64) -> Result<Vec<Task>, ClientError> {
        let state = self.record("tasks_for_user")?;
        Ok(state.tasks.iter().filter(|t| t.user_id == user_id).cloned().collect())
    }

    async fn create_task(&self, task: &NewTask) -> Result<Task, ClientError> {
        let mut state = self.record("create_task")?;
        state.next_id += 1;
        let created = Task {
            id: state.next_id,
            title: task.title.clone(),
            completed: task.completed,
            user_id: task.user_id.unwrap_or_default(),
        };
        state.tasks.push(created.clone());
        Ok(created)
    }

    async fn update_task(&self, task: &Task) -> Result<Task, ClientError> {
        let mut state = self.record("update_task")?;
        let stored = state
            .tasks
            .iter_mut()
            .find(|t| t.id == task.id)
            .ok_or_else(not_found)?;
        *stored = task.clone();
        Ok(stored.clone())
    }

    async fn delete_task(&self, task_id: u64) -> Result<(), ClientError> {
        let mut state = self.record("delete_task")?;
        state.tasks.retain(|t| t.id != task_id);
        Ok(())
    }
}
