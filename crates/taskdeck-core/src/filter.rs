//! Client-side filter and search over the cached task list.

use crate::task::{Task, TaskPriority, TaskStatus};

/// Transient filter criteria. `None` and an empty search term are wildcards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub search: String,
}

impl TaskFilter {
    /// Returns true if the task passes every clause.
    ///
    /// Clauses are AND-ed: status, priority, then a case-insensitive substring
    /// match of the search term against title OR description.
    pub fn matches(&self, task: &Task) -> bool {
        let matches_status = self.status.is_none_or(|s| s == task.status);
        let matches_priority = self.priority.is_none_or(|p| p == task.priority);
        matches_status && matches_priority && self.matches_search(task)
    }

    fn matches_search(&self, task: &Task) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        task.title.to_lowercase().contains(&needle)
            || task.description.to_lowercase().contains(&needle)
    }

    /// Filters a slice, preserving order.
    pub fn apply<'a>(&'a self, tasks: &'a [Task]) -> impl Iterator<Item = &'a Task> + 'a {
        tasks.iter().filter(move |t| self.matches(t))
    }

    /// Cycles the status filter: All → Pending → In Progress → Completed → All.
    pub fn cycle_status(&mut self) {
        self.status = match self.status {
            None => Some(TaskStatus::Pending),
            Some(TaskStatus::Completed) => None,
            Some(s) => Some(s.next()),
        };
    }

    /// Cycles the priority filter: All → Low → Medium → High → All.
    pub fn cycle_priority(&mut self) {
        self.priority = match self.priority {
            None => Some(TaskPriority::Low),
            Some(TaskPriority::High) => None,
            Some(p) => Some(p.next()),
        };
    }

    pub fn status_label(&self) -> &'static str {
        self.status.map_or("All Status", TaskStatus::label)
    }

    pub fn priority_label(&self) -> &'static str {
        self.priority.map_or("All Priorities", TaskPriority::label)
    }

    pub fn is_active(&self) -> bool {
        self.status.is_some() || self.priority.is_some() || !self.search.is_empty()
    }
}
