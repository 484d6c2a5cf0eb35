//! Dashboard state: the cached task list and the edits in progress.
//!
//! UI-agnostic. The terminal UI and the CLI both drive it; only server
//! responses ever patch the list.

use chrono::NaiveDate;

use crate::api::ApiError;
use crate::filter::TaskFilter;
use crate::task::{Task, TaskDraft, TaskId, TaskPriority, TaskStatus, parse_due_date};

pub const PAST_DUE_MESSAGE: &str = "Due date cannot be in the past.";
pub const UNSAVED_CHANGES_MESSAGE: &str =
    "Unsaved changes. Select the task again to discard them.";

/// Text-level form fields for a draft. The due date stays raw until submit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftForm {
    pub title: String,
    pub description: String,
    pub due: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
}

impl DraftForm {
    pub fn from_draft(draft: &TaskDraft) -> Self {
        Self {
            title: draft.title.clone(),
            description: draft.description.clone(),
            due: draft
                .due_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            status: draft.status,
            priority: draft.priority,
        }
    }

    /// Parses the form into a draft.
    ///
    /// # Errors
    /// Returns the display message for an unparsable due date.
    pub fn to_draft(&self) -> Result<TaskDraft, String> {
        Ok(TaskDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            due_date: parse_due_date(&self.due)?,
            status: self.status,
            priority: self.priority,
        })
    }

    pub fn has_title(&self) -> bool {
        !self.title.trim().is_empty()
    }
}

/// Rejects a due date before `today`. Only creation is constrained.
///
/// # Errors
/// Returns [`PAST_DUE_MESSAGE`].
pub fn check_new_due_date(due: Option<NaiveDate>, today: NaiveDate) -> Result<(), String> {
    match due {
        Some(date) if date < today => Err(PAST_DUE_MESSAGE.to_string()),
        _ => Ok(()),
    }
}

/// The single task in edit mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub id: TaskId,
    pub form: DraftForm,
    original: DraftForm,
    /// Target of a refused switch; selecting it again discards this edit.
    switch_warned: Option<TaskId>,
}

impl EditSession {
    fn new(task: &Task) -> Self {
        let form = DraftForm::from_draft(&task.to_draft());
        Self {
            id: task.id,
            original: form.clone(),
            form,
            switch_warned: None,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.form != self.original
    }
}

/// Result of asking to edit a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditStart {
    Started,
    /// Another task has unsaved changes; nothing changed except the warning.
    UnsavedChanges,
    /// No cached task has that id.
    NotFound,
}

/// Outcome of validating the create form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateCheck {
    /// Empty title: nothing to do, no request.
    Skip,
    Ready(TaskDraft),
    Invalid(String),
}

#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    tasks: Vec<Task>,
    pub filter: TaskFilter,
    pub new_task: DraftForm,
    editing: Option<EditSession>,
    loading: bool,
    error: Option<String>,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Tasks passing the current filter, in list order.
    pub fn visible(&self) -> Vec<&Task> {
        self.filter.apply(&self.tasks).collect()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn editing(&self) -> Option<&EditSession> {
        self.editing.as_ref()
    }

    pub fn editing_mut(&mut self) -> Option<&mut EditSession> {
        self.editing.as_mut()
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Marks a request as started. Returns false (and changes nothing) when
    /// one is already in flight.
    pub fn begin_request(&mut self) -> bool {
        if self.loading {
            return false;
        }
        self.loading = true;
        self.error = None;
        true
    }

    /// Ends the in-flight request without touching the list.
    pub fn end_request(&mut self) {
        self.loading = false;
    }

    /// Records a failed request. Session expiry is handled by the caller and
    /// never shown here.
    pub fn fail(&mut self, err: &ApiError) {
        self.loading = false;
        if !err.is_session_expired() {
            self.error = Some(err.user_message());
        }
    }

    /// Session guard on mount: no token means no network activity.
    pub fn missing_token(&mut self) {
        self.loading = false;
        self.error = Some(ApiError::MISSING_TOKEN_MESSAGE.to_string());
    }

    /// Replaces the whole list with the server's collection.
    pub fn apply_fetched(&mut self, tasks: Vec<Task>) {
        self.loading = false;
        self.tasks = tasks;
        // An edit of a task the server no longer has cannot be saved.
        if let Some(edit) = &self.editing
            && !self.tasks.iter().any(|t| t.id == edit.id)
        {
            self.editing = None;
        }
    }

    /// Validates the create form against `today`.
    pub fn prepare_create(&self, today: NaiveDate) -> CreateCheck {
        if !self.new_task.has_title() {
            return CreateCheck::Skip;
        }
        let draft = match self.new_task.to_draft() {
            Ok(draft) => draft,
            Err(message) => return CreateCheck::Invalid(message),
        };
        match check_new_due_date(draft.due_date, today) {
            Ok(()) => CreateCheck::Ready(draft),
            Err(message) => CreateCheck::Invalid(message),
        }
    }

    /// Appends the server's created task and resets the create form.
    pub fn apply_created(&mut self, task: Task) {
        self.loading = false;
        self.tasks.push(task);
        self.new_task = DraftForm::default();
    }

    /// Replaces the entry with the server's version and leaves edit mode.
    pub fn apply_updated(&mut self, task: Task) {
        self.loading = false;
        if self.editing.as_ref().is_some_and(|e| e.id == task.id) {
            self.editing = None;
        }
        if let Some(slot) = self.tasks.iter_mut().find(|t| t.id == task.id) {
            *slot = task;
        }
    }

    /// Drops the entry; the others keep their order.
    pub fn apply_deleted(&mut self, id: TaskId) {
        self.loading = false;
        self.tasks.retain(|t| t.id != id);
        if self.editing.as_ref().is_some_and(|e| e.id == id) {
            self.editing = None;
        }
    }

    /// Enters edit mode for `id`.
    ///
    /// Switching away from a task with unsaved changes warns once; asking for
    /// the same target again discards those changes.
    pub fn begin_edit(&mut self, id: TaskId) -> EditStart {
        let Some(task) = self.tasks.iter().find(|t| t.id == id) else {
            return EditStart::NotFound;
        };

        if let Some(current) = &mut self.editing {
            if current.id == id {
                return EditStart::Started;
            }
            if current.is_dirty() && current.switch_warned != Some(id) {
                current.switch_warned = Some(id);
                self.error = Some(UNSAVED_CHANGES_MESSAGE.to_string());
                return EditStart::UnsavedChanges;
            }
        }

        self.editing = Some(EditSession::new(task));
        self.error = None;
        EditStart::Started
    }

    /// Leaves edit mode and discards the draft. No request.
    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Parsed edit draft for submission.
    ///
    /// # Errors
    /// Returns a display message when nothing is being edited or the due date
    /// does not parse.
    pub fn prepare_update(&self) -> Result<(TaskId, TaskDraft), String> {
        let edit = self
            .editing
            .as_ref()
            .ok_or_else(|| "No task is being edited.".to_string())?;
        Ok((edit.id, edit.form.to_draft()?))
    }

    /// Drops every cached value. Used on logout and session expiry.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: u64, title: &str) -> Task {
        Task {
            id: TaskId(id),
            title: title.to_string(),
            description: String::new(),
            due_date: None,
            status: TaskStatus::Pending,
            priority: TaskPriority::Medium,
        }
    }

    fn loaded(tasks: Vec<Task>) -> Dashboard {
        let mut dashboard = Dashboard::new();
        dashboard.apply_fetched(tasks);
        dashboard
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
    }

    #[test]
    fn test_create_with_blank_title_is_skipped() {
        let mut dashboard = loaded(vec![task(1, "A")]);
        dashboard.new_task.title = "   ".into();
        assert_eq!(dashboard.prepare_create(today()), CreateCheck::Skip);
        assert_eq!(dashboard.tasks().len(), 1);
    }

    #[test]
    fn test_create_rejects_past_due_date() {
        let mut dashboard = Dashboard::new();
        dashboard.new_task.title = "Late".into();
        dashboard.new_task.due = "2026-03-09".into();
        assert_eq!(
            dashboard.prepare_create(today()),
            CreateCheck::Invalid(PAST_DUE_MESSAGE.to_string())
        );

        dashboard.new_task.due = "2026-03-10".into();
        assert!(matches!(dashboard.prepare_create(today()), CreateCheck::Ready(_)));
    }

    #[test]
    fn test_create_rejects_unparsable_due_date() {
        let mut dashboard = Dashboard::new();
        dashboard.new_task.title = "X".into();
        dashboard.new_task.due = "tomorrow".into();
        assert_eq!(
            dashboard.prepare_create(today()),
            CreateCheck::Invalid("Due date must be YYYY-MM-DD.".to_string())
        );
    }

    #[test]
    fn test_created_task_is_appended_once_and_form_resets() {
        let mut dashboard = loaded(vec![task(1, "A"), task(2, "B")]);
        dashboard.new_task.title = "C".into();
        dashboard.new_task.priority = TaskPriority::High;
        assert!(dashboard.begin_request());

        dashboard.apply_created(task(3, "C"));

        let ids: Vec<_> = dashboard.tasks().iter().map(|t| t.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(dashboard.new_task, DraftForm::default());
        assert!(!dashboard.is_loading());
    }

    #[test]
    fn test_update_replaces_matching_entry_and_exits_edit() {
        let mut dashboard = loaded(vec![task(4, "A"), task(5, "B"), task(6, "C")]);
        assert_eq!(dashboard.begin_edit(TaskId(5)), EditStart::Started);

        let mut server = task(5, "B edited");
        server.status = TaskStatus::Completed;
        dashboard.apply_updated(server.clone());

        let matching: Vec<_> = dashboard.tasks().iter().filter(|t| t.id == TaskId(5)).collect();
        assert_eq!(matching, vec![&server]);
        assert_eq!(dashboard.tasks()[0], task(4, "A"));
        assert_eq!(dashboard.tasks()[2], task(6, "C"));
        assert!(dashboard.editing().is_none());
    }

    #[test]
    fn test_delete_removes_entry_keeping_order() {
        let mut dashboard = loaded(vec![task(6, "A"), task(7, "B"), task(8, "C")]);
        dashboard.apply_deleted(TaskId(7));
        let ids: Vec<_> = dashboard.tasks().iter().map(|t| t.id.0).collect();
        assert_eq!(ids, vec![6, 8]);
    }

    #[test]
    fn test_filter_hides_non_matching_status() {
        let mut t = task(1, "X");
        t.priority = TaskPriority::Low;
        let mut dashboard = loaded(vec![t]);
        dashboard.filter.status = Some(TaskStatus::Completed);
        assert!(dashboard.visible().is_empty());
    }

    #[test]
    fn test_second_request_is_refused_while_loading() {
        let mut dashboard = Dashboard::new();
        assert!(dashboard.begin_request());
        assert!(!dashboard.begin_request());
        dashboard.end_request();
        assert!(dashboard.begin_request());
    }

    #[test]
    fn test_failure_keeps_list_and_sets_message() {
        let mut dashboard = loaded(vec![task(1, "A")]);
        assert!(dashboard.begin_request());
        dashboard.fail(&ApiError::status(crate::api::ApiAction::CreateTask, 500, ""));
        assert_eq!(dashboard.error(), Some("Failed to create task"));
        assert_eq!(dashboard.tasks().len(), 1);
        assert!(!dashboard.is_loading());
    }

    #[test]
    fn test_unauthorized_failure_shows_nothing() {
        let mut dashboard = Dashboard::new();
        assert!(dashboard.begin_request());
        dashboard.fail(&ApiError::Unauthorized);
        assert_eq!(dashboard.error(), None);
    }

    #[test]
    fn test_edit_copies_fields_and_cancel_discards() {
        let mut t = task(2, "Original");
        t.due_date = NaiveDate::from_ymd_opt(2020, 1, 1);
        let mut dashboard = loaded(vec![t]);

        dashboard.begin_edit(TaskId(2));
        let edit = dashboard.editing_mut().unwrap();
        assert_eq!(edit.form.due, "2020-01-01");
        edit.form.title = "Changed".into();

        dashboard.cancel_edit();
        assert!(dashboard.editing().is_none());
        assert_eq!(dashboard.tasks()[0].title, "Original");
    }

    #[test]
    fn test_edit_allows_past_due_date() {
        let mut t = task(2, "Old");
        t.due_date = NaiveDate::from_ymd_opt(2020, 1, 1);
        let mut dashboard = loaded(vec![t]);
        dashboard.begin_edit(TaskId(2));

        let (id, draft) = dashboard.prepare_update().unwrap();
        assert_eq!(id, TaskId(2));
        assert_eq!(draft.due_date, NaiveDate::from_ymd_opt(2020, 1, 1));
    }

    #[test]
    fn test_switch_with_unsaved_changes_warns_then_discards() {
        let mut dashboard = loaded(vec![task(1, "A"), task(2, "B")]);
        dashboard.begin_edit(TaskId(1));
        dashboard.editing_mut().unwrap().form.title = "A!".into();

        assert_eq!(dashboard.begin_edit(TaskId(2)), EditStart::UnsavedChanges);
        assert_eq!(dashboard.editing().unwrap().id, TaskId(1));
        assert_eq!(dashboard.error(), Some(UNSAVED_CHANGES_MESSAGE));

        assert_eq!(dashboard.begin_edit(TaskId(2)), EditStart::Started);
        assert_eq!(dashboard.editing().unwrap().id, TaskId(2));
        assert_eq!(dashboard.error(), None);
    }

    #[test]
    fn test_switch_without_changes_is_immediate() {
        let mut dashboard = loaded(vec![task(1, "A"), task(2, "B")]);
        dashboard.begin_edit(TaskId(1));
        assert_eq!(dashboard.begin_edit(TaskId(2)), EditStart::Started);
        assert_eq!(dashboard.begin_edit(TaskId(9)), EditStart::NotFound);
    }

    #[test]
    fn test_refetch_drops_edit_of_vanished_task() {
        let mut dashboard = loaded(vec![task(1, "A")]);
        dashboard.begin_edit(TaskId(1));
        dashboard.apply_fetched(vec![task(2, "B")]);
        assert!(dashboard.editing().is_none());
    }
}
