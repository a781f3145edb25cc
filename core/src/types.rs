//! List parameters and query-string encoding.
//!
//! # Design
//! Request and response bodies belong to the services and pass through as
//! `serde_json::Value` / `impl Serialize`. The one shape the client owns is
//! the list query: pagination is always sent, filters only when set, and
//! each resource decides which filters it understands and where they go.

use url::form_urlencoded;

pub const DEFAULT_SKIP: u32 = 0;
pub const DEFAULT_LIMIT: u32 = 50;

/// Pagination and filters for `list_*` operations.
///
/// Filters a resource does not recognize are ignored for that resource.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    pub skip: Option<u32>,
    pub limit: Option<u32>,
    pub task_list_id: Option<String>,
    pub milestone_id: Option<String>,
    pub assignee_id: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    /// Sent as `type`.
    pub kind: Option<String>,
    pub category: Option<String>,
    pub visibility: Option<String>,
}

/// A filter a list endpoint may accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    TaskListId,
    MilestoneId,
    AssigneeId,
    Status,
    Priority,
    Type,
    Category,
    Visibility,
}

impl Filter {
    /// Query parameter name on the wire.
    pub fn key(&self) -> &'static str {
        match self {
            Filter::TaskListId => "task_list_id",
            Filter::MilestoneId => "milestone_id",
            Filter::AssigneeId => "assignee_id",
            Filter::Status => "status",
            Filter::Priority => "priority",
            Filter::Type => "type",
            Filter::Category => "category",
            Filter::Visibility => "visibility",
        }
    }
}

impl ListParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value for `filter`, treating an empty string as unset.
    pub fn filter(&self, filter: Filter) -> Option<&str> {
        let value = match filter {
            Filter::TaskListId => &self.task_list_id,
            Filter::MilestoneId => &self.milestone_id,
            Filter::AssigneeId => &self.assignee_id,
            Filter::Status => &self.status,
            Filter::Priority => &self.priority,
            Filter::Type => &self.kind,
            Filter::Category => &self.category,
            Filter::Visibility => &self.visibility,
        };
        value.as_deref().filter(|v| !v.is_empty())
    }

    /// Encode as `leading filters, skip, limit, trailing filters`.
    ///
    /// A zero limit is sent as the default.
    pub fn to_query(&self, leading: &[Filter], trailing: &[Filter]) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        self.append_filters(&mut query, leading);
        query.append_pair("skip", &self.skip.unwrap_or(DEFAULT_SKIP).to_string());
        let limit = self.limit.filter(|l| *l != 0).unwrap_or(DEFAULT_LIMIT);
        query.append_pair("limit", &limit.to_string());
        self.append_filters(&mut query, trailing);
        query.finish()
    }

    fn append_filters(&self, query: &mut form_urlencoded::Serializer<'_, String>, filters: &[Filter]) {
        for filter in filters {
            if let Some(value) = self.filter(*filter) {
                query.append_pair(filter.key(), value);
            }
        }
    }
}
