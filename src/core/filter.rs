use std::fmt;

use serde::{Deserialize, Serialize};

use super::category::{Category, tag_category};
use super::entity::EntityIndex;
use super::item::{ItemKind, MemberId, ScheduledItem, TaskType};
use crate::error::KeywordError;

/// A task-type filter value: a concrete type, or `OTHER` for anything that
/// is not a plain task or appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TaskTypeFilter {
    Type(TaskType),
    Other,
}

impl TaskTypeFilter {
    pub fn from_keyword(s: &str) -> Option<Self> {
        match s {
            "OTHER" => Some(Self::Other),
            _ => TaskType::from_keyword(s).map(Self::Type),
        }
    }

    pub fn as_keyword(&self) -> &'static str {
        match self {
            Self::Type(t) => t.as_keyword(),
            Self::Other => "OTHER",
        }
    }
}

impl TryFrom<String> for TaskTypeFilter {
    type Error = KeywordError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_keyword(&s).ok_or(KeywordError::UnknownTaskType(s))
    }
}

impl From<TaskTypeFilter> for String {
    fn from(filter: TaskTypeFilter) -> Self {
        filter.as_keyword().to_string()
    }
}

impl fmt::Display for TaskTypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_keyword())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompletionFilter {
    Complete,
    Incomplete,
}

/// The active filter dimensions. An empty dimension restricts nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    #[serde(default)]
    pub filtered_users: Vec<MemberId>,
    #[serde(default)]
    pub filtered_categories: Vec<Category>,
    #[serde(default)]
    pub filtered_task_types: Vec<TaskTypeFilter>,
    #[serde(default)]
    pub completion_filters: Vec<CompletionFilter>,
}

impl FilterState {
    pub fn is_empty(&self) -> bool {
        self.filtered_users.is_empty()
            && self.filtered_categories.is_empty()
            && self.filtered_task_types.is_empty()
            && self.completion_filters.is_empty()
    }
}

/// Lookup data the filters resolve item references against.
#[derive(Debug, Clone, Copy)]
pub struct FilterContext<'a> {
    pub entities: &'a EntityIndex,
}

impl<'a> FilterContext<'a> {
    pub fn new(entities: &'a EntityIndex) -> Self {
        Self { entities }
    }
}

/// Whether `item` survives every active filter dimension.
pub fn passes_filters(item: &ScheduledItem, filters: &FilterState, ctx: &FilterContext) -> bool {
    member_matches(item, &filters.filtered_users)
        && category_matches(item, &filters.filtered_categories, ctx)
        && task_type_matches(item, &filters.filtered_task_types)
        && completion_matches(item, &filters.completion_filters)
}

fn member_matches(item: &ScheduledItem, users: &[MemberId]) -> bool {
    users.is_empty() || item.members.iter().any(|m| users.contains(m))
}

fn category_matches(item: &ScheduledItem, categories: &[Category], ctx: &FilterContext) -> bool {
    if categories.is_empty() || Category::is_full_set(categories) {
        return true;
    }
    let selected = |c: Option<Category>| c.is_some_and(|c| categories.contains(&c));

    let own = match &item.kind {
        ItemKind::SchoolYearStart { .. }
        | ItemKind::SchoolYearEnd { .. }
        | ItemKind::SchoolTerm { .. }
        | ItemKind::SchoolTermStart { .. }
        | ItemKind::SchoolTermEnd { .. }
        | ItemKind::SchoolBreak { .. } => categories.contains(&Category::Education),
        ItemKind::Entity { entity_type } => selected(
            ctx.entities
                .category_of(item.id)
                .or_else(|| entity_type.default_category()),
        ),
        ItemKind::Task { .. } | ItemKind::Period { .. } => false,
    };

    own || selected(item.category)
        || item.entities.iter().any(|e| selected(ctx.entities.category_of(*e)))
        || item.tags.iter().any(|t| selected(tag_category(t)))
}

fn task_type_matches(item: &ScheduledItem, types: &[TaskTypeFilter]) -> bool {
    if types.is_empty() {
        return true;
    }
    let task_type = item.kind.task_type();
    if let Some(t) = task_type {
        if types.contains(&TaskTypeFilter::Type(t)) {
            return true;
        }
    }
    types.contains(&TaskTypeFilter::Other)
        && !matches!(task_type, Some(TaskType::Task | TaskType::Appointment))
}

fn completion_matches(item: &ScheduledItem, filters: &[CompletionFilter]) -> bool {
    let complete = filters.contains(&CompletionFilter::Complete);
    let incomplete = filters.contains(&CompletionFilter::Incomplete);
    if complete == incomplete {
        // Neither or both selected
        return true;
    }
    if complete {
        item.is_complete
    } else {
        !item.is_complete && item.is_actionable()
    }
}
