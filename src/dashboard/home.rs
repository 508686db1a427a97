use crate::dashboard::{Backend, leaves::LeavesService, tasks::TaskService};
use crate::model::{
    leave::{Leave, LeaveStatus},
    task::Task,
};

/// Counts shown on the home page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub tasks_completed: usize,
    pub tasks_pending: usize,
    pub leaves_approved: usize,
    pub leaves_pending: usize,
}

impl Summary {
    pub fn compute(tasks: &[Task], leaves: &[Leave]) -> Self {
        let leaves_with = |status: LeaveStatus| leaves.iter().filter(|l| l.status == status).count();
        let tasks_completed = tasks.iter().filter(|t| t.completed).count();
        Self {
            tasks_completed,
            tasks_pending: tasks.len() - tasks_completed,
            leaves_approved: leaves_with(LeaveStatus::Approved),
            leaves_pending: leaves_with(LeaveStatus::Pending),
        }
    }

    /// Task counts follow the active task filter.
    pub fn from_services<B: Backend>(tasks: &TaskService<B>, leaves: &LeavesService<B>) -> Self {
        Self::compute(&tasks.filtered_tasks(), &leaves.leaves())
    }
}
