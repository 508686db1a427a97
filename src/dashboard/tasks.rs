use crate::dashboard::{Backend, Error, Session, signal::Signal};
use crate::model::task::{NewTask, Task, TaskFilter};
use std::sync::Arc;
use tokio::sync::watch;

/// The signed-in user's tasks plus a filtered view that follows both the
/// collection and the active filter.
pub struct TaskService<B> {
    backend: Arc<B>,
    session: Arc<Session>,
    tasks: Signal<Vec<Task>>,
    filter: Signal<TaskFilter>,
    filtered: Signal<Vec<Task>>,
}

impl<B: Backend> TaskService<B> {
    pub fn new(backend: Arc<B>, session: Arc<Session>) -> Self {
        Self {
            backend,
            session,
            tasks: Signal::default(),
            filter: Signal::default(),
            filtered: Signal::default(),
        }
    }

    pub async fn load_tasks(&self) -> Result<(), Error> {
        let Some(user_id) = self.session.user_id() else {
            return Ok(());
        };
        let tasks = self.backend.tasks_for_user(user_id).await?;
        self.tasks.set(tasks);
        self.refresh();
        Ok(())
    }

    /// `Ok(None)` when nobody is logged in.
    pub async fn add_task(&self, title: &str) -> Result<Option<Task>, Error> {
        let Some(user_id) = self.session.user_id() else {
            return Ok(None);
        };
        let new_task = NewTask {
            title: title.to_string(),
            completed: false,
            user_id: Some(user_id),
        };
        let created = self.backend.create_task(&new_task).await?;
        self.tasks.update(|tasks| tasks.push(created.clone()));
        self.refresh();
        Ok(Some(created))
    }

    pub async fn update_task(&self, task: &Task) -> Result<Task, Error> {
        let updated = self.backend.update_task(task).await?;
        self.tasks.update(|tasks| {
            if let Some(slot) = tasks.iter_mut().find(|t| t.id == updated.id) {
                *slot = updated.clone();
            }
        });
        self.refresh();
        Ok(updated)
    }

    pub async fn delete_task(&self, task_id: u64) -> Result<(), Error> {
        self.backend.delete_task(task_id).await?;
        self.tasks.update(|tasks| tasks.retain(|t| t.id != task_id));
        self.refresh();
        Ok(())
    }

    /// Marks a pending task completed. Completed tasks never flip back, so
    /// this returns `Ok(None)` for them without a request.
    pub async fn toggle_task(&self, task: &Task) -> Result<Option<Task>, Error> {
        if task.completed {
            return Ok(None);
        }
        let done = Task {
            completed: true,
            ..task.clone()
        };
        self.update_task(&done).await.map(Some)
    }

    pub fn set_filter(&self, filter: TaskFilter) {
        self.filter.set(filter);
        self.refresh();
    }

    pub fn filter(&self) -> TaskFilter {
        self.filter.get()
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.tasks.get()
    }

    pub fn filtered_tasks(&self) -> Vec<Task> {
        self.filtered.get()
    }

    pub fn subscribe_filtered(&self) -> watch::Receiver<Vec<Task>> {
        self.filtered.subscribe()
    }

    fn refresh(&self) {
        let filter = self.filter.get();
        let visible = self.tasks.with(|tasks| filter.apply(tasks));
        self.filtered.set(visible);
    }
}
