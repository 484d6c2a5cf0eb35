use taskdeck_core::dashboard::{Dashboard, DraftForm};
use taskdeck_core::task::{Task, TaskId};

use crate::common::TextCursor;

/// Fields of the create and edit forms, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Title,
    Description,
    Due,
    Status,
    Priority,
}

impl DraftField {
    pub const ALL: [DraftField; 5] = [
        DraftField::Title,
        DraftField::Description,
        DraftField::Due,
        DraftField::Status,
        DraftField::Priority,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DraftField::Title => "Title",
            DraftField::Description => "Description",
            DraftField::Due => "Due date",
            DraftField::Status => "Status",
            DraftField::Priority => "Priority",
        }
    }

    pub fn is_text(self) -> bool {
        matches!(
            self,
            DraftField::Title | DraftField::Description | DraftField::Due
        )
    }

    #[must_use]
    pub fn next(self) -> Self {
        match self {
            DraftField::Title => DraftField::Description,
            DraftField::Description => DraftField::Due,
            DraftField::Due => DraftField::Status,
            DraftField::Status => DraftField::Priority,
            DraftField::Priority => DraftField::Title,
        }
    }

    #[must_use]
    pub fn prev(self) -> Self {
        match self {
            DraftField::Title => DraftField::Priority,
            DraftField::Description => DraftField::Title,
            DraftField::Due => DraftField::Description,
            DraftField::Status => DraftField::Due,
            DraftField::Priority => DraftField::Status,
        }
    }

    /// The text backing this field, if it is a text field.
    pub fn text(self, form: &DraftForm) -> Option<&str> {
        match self {
            DraftField::Title => Some(&form.title),
            DraftField::Description => Some(&form.description),
            DraftField::Due => Some(&form.due),
            DraftField::Status | DraftField::Priority => None,
        }
    }

    pub fn text_mut(self, form: &mut DraftForm) -> Option<&mut String> {
        match self {
            DraftField::Title => Some(&mut form.title),
            DraftField::Description => Some(&mut form.description),
            DraftField::Due => Some(&mut form.due),
            DraftField::Status | DraftField::Priority => None,
        }
    }
}

/// Where keyboard input goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    List,
    Create(DraftField),
    Edit(DraftField),
    Search,
}

#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub model: Dashboard,
    pub focus: Focus,
    /// Index into the visible (filtered) rows.
    pub selected: usize,
    pub cursor: TextCursor,
    /// One-shot confirmation, cleared by the next key.
    pub notice: Option<String>,
}

impl DashboardState {
    pub fn visible(&self) -> Vec<&Task> {
        self.model.visible()
    }

    pub fn selected_id(&self) -> Option<TaskId> {
        self.visible().get(self.selected).map(|t| t.id)
    }

    /// Keeps the selection inside the visible rows.
    pub fn clamp_selection(&mut self) {
        let len = self.visible().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.visible().len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// The form the panel shows: the create form unless an edit is active
    /// and focus is not on the create form.
    pub fn shown_form(&self) -> (Option<TaskId>, &DraftForm) {
        match (self.focus, self.model.editing()) {
            (Focus::Create(_), _) | (_, None) => (None, &self.model.new_task),
            (_, Some(edit)) => (Some(edit.id), &edit.form),
        }
    }

    pub fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
        let text = match focus {
            Focus::List => None,
            Focus::Search => Some(self.model.filter.search.as_str()),
            Focus::Create(field) => field.text(&self.model.new_task),
            Focus::Edit(field) => self
                .model
                .editing()
                .and_then(|edit| field.text(&edit.form)),
        };
        self.cursor = text.map(TextCursor::at_end).unwrap_or_default();
    }

    /// The focused text field plus its cursor.
    pub fn focused_text_mut(&mut self) -> Option<(&mut String, &mut TextCursor)> {
        let text = match self.focus {
            Focus::List => None,
            Focus::Search => Some(&mut self.model.filter.search),
            Focus::Create(field) => field.text_mut(&mut self.model.new_task),
            Focus::Edit(field) => self
                .model
                .editing_mut()
                .and_then(|edit| field.text_mut(&mut edit.form)),
        };
        text.map(|text| (text, &mut self.cursor))
    }

    /// The form behind the focus, for status/priority cycling.
    pub fn focused_form_mut(&mut self) -> Option<&mut DraftForm> {
        match self.focus {
            Focus::Create(_) => Some(&mut self.model.new_task),
            Focus::Edit(_) => self.model.editing_mut().map(|edit| &mut edit.form),
            Focus::List | Focus::Search => None,
        }
    }
}
