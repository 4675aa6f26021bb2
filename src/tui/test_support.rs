//! Shared fixtures for TUI tests: an in-memory `TasksApi` stub and app
//! builders, so controller and render logic test without a server or a
//! terminal.

use std::cell::{Cell, RefCell};

use chrono::{TimeZone, Utc};

use crate::client::{ClientError, TasksApi};
use crate::model::Task;

use super::app::App;

pub fn stub_task(id: i64, text: &str, completed: bool) -> Task {
    Task {
        id,
        text: text.to_string(),
        completed,
        created_at: Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap(),
    }
}

/// In-memory fake of the task API. Mirrors server semantics: newest first,
/// 404 for unknown ids, and a `fail` switch that makes every call error.
pub struct StubApi {
    pub tasks: RefCell<Vec<Task>>,
    pub next_id: Cell<i64>,
    pub fail: Cell<bool>,
}

impl StubApi {
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let next_id = tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        StubApi {
            tasks: RefCell::new(tasks),
            next_id: Cell::new(next_id),
            fail: Cell::new(false),
        }
    }

    fn check_fail(&self) -> Result<(), ClientError> {
        if self.fail.get() {
            return Err(ClientError::Api {
                status: 500,
                message: "stub failure".to_string(),
            });
        }
        Ok(())
    }

    fn not_found() -> ClientError {
        ClientError::Api {
            status: 404,
            message: "Task not found".to_string(),
        }
    }
}

impl TasksApi for StubApi {
    fn list(&self) -> Result<Vec<Task>, ClientError> {
        self.check_fail()?;
        Ok(self.tasks.borrow().clone())
    }

    fn create(&self, text: &str) -> Result<Task, ClientError> {
        self.check_fail()?;
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        let task = Task {
            id,
            text: text.to_string(),
            completed: false,
            created_at: Utc::now(),
        };
        self.tasks.borrow_mut().insert(0, task.clone());
        Ok(task)
    }

    fn edit(&self, id: i64, text: &str) -> Result<Task, ClientError> {
        self.check_fail()?;
        let mut tasks = self.tasks.borrow_mut();
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(Self::not_found)?;
        task.text = text.to_string();
        Ok(task.clone())
    }

    fn toggle(&self, id: i64) -> Result<Task, ClientError> {
        self.check_fail()?;
        let mut tasks = self.tasks.borrow_mut();
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(Self::not_found)?;
        task.completed = !task.completed;
        Ok(task.clone())
    }

    fn delete(&self, id: i64) -> Result<(), ClientError> {
        self.check_fail()?;
        let mut tasks = self.tasks.borrow_mut();
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        if tasks.len() == before {
            return Err(Self::not_found());
        }
        Ok(())
    }
}

/// Build an App whose stub and in-memory list both start with `tasks`.
pub fn app_with_tasks(tasks: Vec<Task>) -> App {
    let api = StubApi::with_tasks(tasks.clone());
    let mut app = App::new(Box::new(api));
    app.tasks = tasks;
    app
}
