//! Work service operations: workspaces, tasks, goals, bookmarks.
//!
//! Updates use `PUT`.

use serde::Serialize;

use crate::client::{ApiClient, ApiResult, Service};
use crate::http::HttpMethod;
use crate::types::{Filter, ListParams};

const TASK_FILTERS: &[Filter] = &[Filter::TaskListId, Filter::MilestoneId, Filter::AssigneeId];
const GOAL_FILTERS: &[Filter] = &[Filter::AssigneeId, Filter::Status];

impl ApiClient {
    pub fn check_work_health(&self) -> ApiResult {
        self.get(Service::Work, "/health")
    }

    // --- workspaces ---

    pub fn list_workspaces(&self, params: &ListParams) -> ApiResult {
        let query = params.to_query(&[], &[]);
        self.get(Service::Work, &format!("/workspaces?{query}"))
    }

    pub fn create_workspace<T: Serialize + ?Sized>(&self, data: &T) -> ApiResult {
        self.send_json(Service::Work, HttpMethod::Post, "/workspaces", data)
    }

    pub fn get_workspace(&self, workspace_id: &str) -> ApiResult {
        self.get(Service::Work, &format!("/workspaces/{workspace_id}"))
    }

    pub fn update_workspace<T: Serialize + ?Sized>(&self, workspace_id: &str, data: &T) -> ApiResult {
        let endpoint = format!("/workspaces/{workspace_id}");
        self.send_json(Service::Work, HttpMethod::Put, &endpoint, data)
    }

    pub fn delete_workspace(&self, workspace_id: &str) -> ApiResult {
        self.delete(Service::Work, &format!("/workspaces/{workspace_id}"))
    }

    // --- tasks ---

    /// Tasks in `workspace_id`, or across all workspaces when `None`.
    pub fn list_tasks(&self, workspace_id: Option<&str>, params: &ListParams) -> ApiResult {
        let query = params.to_query(TASK_FILTERS, &[]);
        let endpoint = match workspace_id {
            Some(ws) => format!("/workspaces/{ws}/tasks?{query}"),
            None => format!("/tasks?{query}"),
        };
        self.get(Service::Work, &endpoint)
    }

    pub fn create_task<T: Serialize + ?Sized>(&self, workspace_id: &str, data: &T) -> ApiResult {
        let endpoint = format!("/workspaces/{workspace_id}/tasks");
        self.send_json(Service::Work, HttpMethod::Post, &endpoint, data)
    }

    pub fn get_task(&self, workspace_id: &str, task_id: &str) -> ApiResult {
        self.get(Service::Work, &format!("/workspaces/{workspace_id}/tasks/{task_id}"))
    }

    pub fn update_task<T: Serialize + ?Sized>(
        &self,
        workspace_id: &str,
        task_id: &str,
        data: &T,
    ) -> ApiResult {
        let endpoint = format!("/workspaces/{workspace_id}/tasks/{task_id}");
        self.send_json(Service::Work, HttpMethod::Put, &endpoint, data)
    }

    pub fn delete_task(&self, workspace_id: &str, task_id: &str) -> ApiResult {
        self.delete(Service::Work, &format!("/workspaces/{workspace_id}/tasks/{task_id}"))
    }

    // --- goals ---

    pub fn list_goals(&self, workspace_id: &str, params: &ListParams) -> ApiResult {
        let query = params.to_query(GOAL_FILTERS, &[]);
        self.get(Service::Work, &format!("/workspaces/{workspace_id}/goals?{query}"))
    }

    pub fn create_goal<T: Serialize + ?Sized>(&self, workspace_id: &str, data: &T) -> ApiResult {
        let endpoint = format!("/workspaces/{workspace_id}/goals");
        self.send_json(Service::Work, HttpMethod::Post, &endpoint, data)
    }

    pub fn get_goal(&self, workspace_id: &str, goal_id: &str) -> ApiResult {
        self.get(Service::Work, &format!("/workspaces/{workspace_id}/goals/{goal_id}"))
    }

    pub fn update_goal<T: Serialize + ?Sized>(
        &self,
        workspace_id: &str,
        goal_id: &str,
        data: &T,
    ) -> ApiResult {
        let endpoint = format!("/workspaces/{workspace_id}/goals/{goal_id}");
        self.send_json(Service::Work, HttpMethod::Put, &endpoint, data)
    }

    pub fn delete_goal(&self, workspace_id: &str, goal_id: &str) -> ApiResult {
        self.delete(Service::Work, &format!("/workspaces/{workspace_id}/goals/{goal_id}"))
    }

    // --- bookmarks (no get or update on the service) ---

    pub fn list_bookmarks(&self, workspace_id: &str, params: &ListParams) -> ApiResult {
        let query = params.to_query(&[], &[]);
        self.get(Service::Work, &format!("/workspaces/{workspace_id}/bookmarks?{query}"))
    }

    pub fn create_bookmark<T: Serialize + ?Sized>(&self, workspace_id: &str, data: &T) -> ApiResult {
        let endpoint = format!("/workspaces/{workspace_id}/bookmarks");
        self.send_json(Service::Work, HttpMethod::Post, &endpoint, data)
    }

    pub fn delete_bookmark(&self, workspace_id: &str, bookmark_id: &str) -> ApiResult {
        self.delete(Service::Work, &format!("/workspaces/{workspace_id}/bookmarks/{bookmark_id}"))
    }
}
