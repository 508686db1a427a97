use crate::dashboard::{Backend, Error, ToastService, tasks::TaskService};
use crate::model::task::Task;

/// Add/edit/delete state of the tasks page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskBoard {
    pub new_task: String,
    pub edit_task_id: Option<u64>,
    pub delete_task_id: Option<u64>,
}

impl TaskBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates the title of the task being edited, otherwise adds a task.
    /// A blank title does nothing.
    pub async fn add_or_update<B: Backend>(
        &mut self,
        tasks: &TaskService<B>,
        toasts: &ToastService,
    ) -> Result<(), Error> {
        let title = self.new_task.trim().to_string();
        if title.is_empty() {
            return Ok(());
        }

        let result = match self.edit_task_id {
            Some(id) => match tasks.tasks().into_iter().find(|t| t.id == id) {
                Some(task) => tasks
                    .update_task(&Task { title, ..task })
                    .await
                    .map(|_| Some("Task updated successfully")),
                // edited task is gone from the list
                None => Ok(None),
            },
            None => tasks
                .add_task(&title)
                .await
                .map(|_| Some("Task added successfully")),
        };

        if let Some(message) = report(result, toasts)? {
            toasts.success(message);
        }
        self.new_task.clear();
        self.edit_task_id = None;
        Ok(())
    }

    pub fn start_edit(&mut self, task: &Task) {
        if task.completed {
            return;
        }
        self.edit_task_id = Some(task.id);
        self.new_task = task.title.clone();
    }

    pub fn cancel_edit(&mut self) {
        self.edit_task_id = None;
        self.new_task.clear();
    }

    pub fn confirm_delete(&mut self, task: &Task) {
        if task.completed {
            return;
        }
        self.delete_task_id = Some(task.id);
    }

    pub fn cancel_delete(&mut self) {
        self.delete_task_id = None;
    }

    pub async fn delete_confirmed<B: Backend>(
        &mut self,
        tasks: &TaskService<B>,
        toasts: &ToastService,
    ) -> Result<(), Error> {
        let Some(id) = self.delete_task_id.take() else {
            return Ok(());
        };
        report(tasks.delete_task(id).await, toasts)?;
        toasts.success("Task deleted successfully");
        Ok(())
    }

    /// The toast names the opposite of the state the task had when clicked.
    pub async fn toggle<B: Backend>(
        &self,
        tasks: &TaskService<B>,
        toasts: &ToastService,
        task: &Task,
    ) -> Result<(), Error> {
        report(tasks.toggle_task(task).await, toasts)?;
        let state = if task.completed { "pending" } else { "completed" };
        toasts.info(format!("Task marked {state}"));
        Ok(())
    }
}

fn report<T>(result: Result<T, Error>, toasts: &ToastService) -> Result<T, Error> {
    result.inspect_err(|e| {
        tracing::error!(error = %e, "Task request failed");
        toasts.error(e.user_message());
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::{MemoryCookieStore, SERVER_ERROR, Session, ToastKind, testing::*};
    use crate::model::role::Role;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    async fn setup() -> (Arc<FakeBackend>, TaskService<FakeBackend>, ToastService) {
        let backend = Arc::new(
            FakeBackend::new()
                .with_task(task(1, 2, "Write report", false))
                .with_task(task(2, 2, "Book travel", true)),
        );
        let session = Session::restore(MemoryCookieStore::new());
        session.set_user(user(2, "jane@company.com", Role::Employee)).unwrap();
        let service = TaskService::new(backend.clone(), Arc::new(session));
        service.load_tasks().await.unwrap();
        (backend, service, ToastService::new())
    }

    fn last_toast(toasts: &ToastService) -> (ToastKind, String) {
        toasts.messages().pop().unwrap()
    }

    #[actix_web::test]
    async fn adds_trimmed_title_and_clears_input() {
        let (_, tasks, toasts) = setup().await;
        let mut board = TaskBoard {
            new_task: "  Plan offsite ".into(),
            ..TaskBoard::new()
        };

        board.add_or_update(&tasks, &toasts).await.unwrap();

        assert!(tasks.tasks().iter().any(|t| t.title == "Plan offsite"));
        assert_eq!(board, TaskBoard::new());
        assert_eq!(
            last_toast(&toasts),
            (ToastKind::Success, "Task added successfully".to_string())
        );
    }

    #[actix_web::test]
    async fn blank_title_is_ignored() {
        let (backend, tasks, toasts) = setup().await;
        let calls = backend.calls().len();
        let mut board = TaskBoard {
            new_task: "   ".into(),
            ..TaskBoard::new()
        };

        board.add_or_update(&tasks, &toasts).await.unwrap();

        assert_eq!(backend.calls().len(), calls);
        assert!(toasts.toasts().is_empty());
    }

    #[actix_web::test]
    async fn editing_updates_the_title() {
        let (_, tasks, toasts) = setup().await;
        let mut board = TaskBoard::new();
        board.start_edit(&task(1, 2, "Write report", false));
        assert_eq!(board.new_task, "Write report");
        board.new_task = "Write final report".into();

        board.add_or_update(&tasks, &toasts).await.unwrap();

        let edited = tasks.tasks().into_iter().find(|t| t.id == 1).unwrap();
        assert_eq!(edited.title, "Write final report");
        assert_eq!(board.edit_task_id, None);
        assert_eq!(
            last_toast(&toasts),
            (ToastKind::Success, "Task updated successfully".to_string())
        );
    }

    #[test]
    fn completed_tasks_cannot_be_edited_or_deleted() {
        let mut board = TaskBoard::new();
        let done = task(2, 2, "Book travel", true);

        board.start_edit(&done);
        board.confirm_delete(&done);

        assert_eq!(board, TaskBoard::new());
    }

    #[actix_web::test]
    async fn delete_requires_confirmation() {
        let (_, tasks, toasts) = setup().await;
        let mut board = TaskBoard::new();

        board.delete_confirmed(&tasks, &toasts).await.unwrap();
        assert_eq!(tasks.tasks().len(), 2);

        board.confirm_delete(&task(1, 2, "Write report", false));
        board.delete_confirmed(&tasks, &toasts).await.unwrap();

        assert_eq!(tasks.tasks().len(), 1);
        assert_eq!(board.delete_task_id, None);
        assert_eq!(
            last_toast(&toasts),
            (ToastKind::Success, "Task deleted successfully".to_string())
        );
    }

    #[actix_web::test]
    async fn toggle_toasts_the_new_state() {
        let (_, tasks, toasts) = setup().await;
        let board = TaskBoard::new();

        board
            .toggle(&tasks, &toasts, &task(1, 2, "Write report", false))
            .await
            .unwrap();

        assert_eq!(
            last_toast(&toasts),
            (ToastKind::Info, "Task marked completed".to_string())
        );
    }

    #[actix_web::test]
    async fn editing_a_vanished_task_only_resets_the_board() {
        let (backend, tasks, toasts) = setup().await;
        let mut board = TaskBoard::new();
        board.start_edit(&task(1, 2, "Write report", false));
        tasks.delete_task(1).await.unwrap();
        let calls = backend.calls().len();
        board.new_task = "Write final report".into();

        board.add_or_update(&tasks, &toasts).await.unwrap();

        assert_eq!(board, TaskBoard::new());
        assert_eq!(backend.calls().len(), calls);
        assert!(toasts.toasts().is_empty());
    }

    #[actix_web::test]
    async fn backend_failure_shows_server_error_and_keeps_input() {
        let (backend, tasks, toasts) = setup().await;
        backend.fail(true);
        let mut board = TaskBoard {
            new_task: "Plan offsite".into(),
            ..TaskBoard::new()
        };

        assert!(board.add_or_update(&tasks, &toasts).await.is_err());

        assert_eq!(board.new_task, "Plan offsite");
        assert_eq!(last_toast(&toasts), (ToastKind::Error, SERVER_ERROR.to_string()));
    }
}
