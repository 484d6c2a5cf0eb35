//! Task command handlers.

use anyhow::{Result, bail};
use chrono::Local;
use comfy_table::{ContentArrangement, Table};
use taskdeck_core::api::{ApiClient, ApiError};
use taskdeck_core::dashboard::check_new_due_date;
use taskdeck_core::filter::TaskFilter;
use taskdeck_core::session::Session;
use taskdeck_core::task::{Task, TaskDraft, TaskId, TaskPriority, TaskStatus, parse_due_date};

/// How a command changes the due date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DueChange {
    Set(String),
    Clear,
}

/// Field overrides from the command line. `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due: Option<DueChange>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
}

impl TaskChanges {
    /// Applies the overrides on top of `draft`.
    ///
    /// # Errors
    /// Returns a display message when the due date does not parse.
    pub fn apply(self, mut draft: TaskDraft) -> Result<TaskDraft, String> {
        if let Some(title) = self.title {
            draft.title = title;
        }
        if let Some(description) = self.description {
            draft.description = description;
        }
        match self.due {
            Some(DueChange::Set(raw)) => draft.due_date = parse_due_date(&raw)?,
            Some(DueChange::Clear) => draft.due_date = None,
            None => {}
        }
        if let Some(status) = self.status {
            draft.status = status;
        }
        if let Some(priority) = self.priority {
            draft.priority = priority;
        }
        Ok(draft)
    }
}

/// API client plus the session whose token authenticates every call.
pub struct TaskContext<'a> {
    api: &'a ApiClient,
    session: &'a mut Session,
}

impl<'a> TaskContext<'a> {
    pub fn new(api: &'a ApiClient, session: &'a mut Session) -> Self {
        Self { api, session }
    }

    pub async fn list(&mut self, filter: &TaskFilter) -> Result<()> {
        let tasks = self.fetch().await?;
        let visible: Vec<&Task> = filter.apply(&tasks).collect();
        if visible.is_empty() {
            println!("No tasks found.");
            return Ok(());
        }
        println!("{}", task_table(&visible));
        Ok(())
    }

    pub async fn add(&mut self, changes: TaskChanges) -> Result<()> {
        let draft = match changes.apply(TaskDraft::default()) {
            Ok(draft) => draft,
            Err(message) => bail!(message),
        };
        if !draft.has_title() {
            bail!("Title is required.");
        }
        if let Err(message) = check_new_due_date(draft.due_date, Local::now().date_naive()) {
            bail!(message);
        }

        let result = match self.api.authorized(self.session.token()) {
            Ok(client) => client.create_task(&draft).await,
            Err(err) => Err(err),
        };
        let task = self.settle(result)?;
        println!("Created task {}: {}", task.id, task.title);
        Ok(())
    }

    pub async fn update(&mut self, id: TaskId, changes: TaskChanges) -> Result<()> {
        let tasks = self.fetch().await?;
        let Some(current) = tasks.iter().find(|t| t.id == id) else {
            bail!("Task {id} not found.");
        };
        let draft = match changes.apply(current.to_draft()) {
            Ok(draft) => draft,
            Err(message) => bail!(message),
        };

        let result = match self.api.authorized(self.session.token()) {
            Ok(client) => client.update_task(id, &draft).await,
            Err(err) => Err(err),
        };
        let task = self.settle(result)?;
        println!("Updated task {}: {}", task.id, task.title);
        Ok(())
    }

    pub async fn delete(&mut self, id: TaskId) -> Result<()> {
        let result = match self.api.authorized(self.session.token()) {
            Ok(client) => client.delete_task(id).await,
            Err(err) => Err(err),
        };
        self.settle(result)?;
        println!("Deleted task {id}.");
        Ok(())
    }

    async fn fetch(&mut self) -> Result<Vec<Task>> {
        let result = match self.api.authorized(self.session.token()) {
            Ok(client) => client.list_tasks().await,
            Err(err) => Err(err),
        };
        self.settle(result)
    }

    /// Turns an API result into a command result. A rejected token ends the
    /// session before the error is reported.
    fn settle<T>(&mut self, result: Result<T, ApiError>) -> Result<T> {
        match result {
            Ok(value) => Ok(value),
            Err(err) => {
                if err.is_session_expired()
                    && let Err(clear_err) = self.session.clear()
                {
                    tracing::warn!(error = %clear_err, "failed to clear session token");
                }
                Err(err.into())
            }
        }
    }
}

fn task_table(tasks: &[&Task]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "ID",
        "Title",
        "Status",
        "Priority",
        "Due",
        "Description",
    ]);
    for task in tasks {
        table.add_row(vec![
            task.id.to_string(),
            task.title.clone(),
            task.status.to_string(),
            task.priority.to_string(),
            task.due_label(),
            task.description.clone(),
        ]);
    }
    table
}
