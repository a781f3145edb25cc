//! Comms service operations.
//!
//! Announcements are listed and created under a workspace; memos, decisions,
//! celebrations, newsletters and shares under the configured organization.
//! Single items of every kind live at a top-level path. Updates use `PATCH`.

use serde::Serialize;

use crate::client::{ApiClient, ApiResult, RequestOptions, Service};
use crate::http::HttpMethod;
use crate::types::{Filter, ListParams};

impl ApiClient {
    pub fn check_comms_health(&self) -> ApiResult {
        self.get(Service::Comms, "/health")
    }

    // --- announcements ---

    pub fn list_announcements(&self, workspace_id: &str, params: &ListParams) -> ApiResult {
        let query = params.to_query(&[], &[Filter::Priority]);
        self.get(
            Service::Comms,
            &format!("/workspaces/{workspace_id}/announcements?{query}"),
        )
    }

    pub fn create_announcement<T: Serialize + ?Sized>(&self, workspace_id: &str, data: &T) -> ApiResult {
        let endpoint = format!("/workspaces/{workspace_id}/announcements");
        self.send_json(Service::Comms, HttpMethod::Post, &endpoint, data)
    }

    pub fn get_announcement(&self, announcement_id: &str) -> ApiResult {
        self.get_item("announcements", announcement_id)
    }

    pub fn update_announcement<T: Serialize + ?Sized>(&self, announcement_id: &str, data: &T) -> ApiResult {
        self.patch_item("announcements", announcement_id, data)
    }

    pub fn delete_announcement(&self, announcement_id: &str) -> ApiResult {
        self.delete_item("announcements", announcement_id)
    }

    // --- memos ---

    pub fn list_memos(&self, params: &ListParams) -> ApiResult {
        self.list_in_org("memos", params, &[Filter::Type, Filter::Visibility])
    }

    pub fn create_memo<T: Serialize + ?Sized>(&self, data: &T) -> ApiResult {
        self.create_in_org("memos", data)
    }

    pub fn get_memo(&self, memo_id: &str) -> ApiResult {
        self.get_item("memos", memo_id)
    }

    pub fn update_memo<T: Serialize + ?Sized>(&self, memo_id: &str, data: &T) -> ApiResult {
        self.patch_item("memos", memo_id, data)
    }

    pub fn delete_memo(&self, memo_id: &str) -> ApiResult {
        self.delete_item("memos", memo_id)
    }

    // --- decision records ---

    pub fn list_decisions(&self, params: &ListParams) -> ApiResult {
        self.list_in_org("decisions", params, &[Filter::Status])
    }

    pub fn create_decision<T: Serialize + ?Sized>(&self, data: &T) -> ApiResult {
        self.create_in_org("decisions", data)
    }

    pub fn get_decision(&self, decision_id: &str) -> ApiResult {
        self.get_item("decisions", decision_id)
    }

    pub fn update_decision<T: Serialize + ?Sized>(&self, decision_id: &str, data: &T) -> ApiResult {
        self.patch_item("decisions", decision_id, data)
    }

    pub fn delete_decision(&self, decision_id: &str) -> ApiResult {
        self.delete_item("decisions", decision_id)
    }

    // --- celebrations ---

    pub fn list_celebrations(&self, params: &ListParams) -> ApiResult {
        self.list_in_org("celebrations", params, &[Filter::Type])
    }

    pub fn create_celebration<T: Serialize + ?Sized>(&self, data: &T) -> ApiResult {
        self.create_in_org("celebrations", data)
    }

    pub fn get_celebration(&self, celebration_id: &str) -> ApiResult {
        self.get_item("celebrations", celebration_id)
    }

    pub fn update_celebration<T: Serialize + ?Sized>(&self, celebration_id: &str, data: &T) -> ApiResult {
        self.patch_item("celebrations", celebration_id, data)
    }

    pub fn delete_celebration(&self, celebration_id: &str) -> ApiResult {
        self.delete_item("celebrations", celebration_id)
    }

    // --- newsletters ---

    pub fn list_newsletters(&self, params: &ListParams) -> ApiResult {
        self.list_in_org("newsletters", params, &[Filter::Status])
    }

    pub fn create_newsletter<T: Serialize + ?Sized>(&self, data: &T) -> ApiResult {
        self.create_in_org("newsletters", data)
    }

    pub fn get_newsletter(&self, newsletter_id: &str) -> ApiResult {
        self.get_item("newsletters", newsletter_id)
    }

    pub fn update_newsletter<T: Serialize + ?Sized>(&self, newsletter_id: &str, data: &T) -> ApiResult {
        self.patch_item("newsletters", newsletter_id, data)
    }

    pub fn delete_newsletter(&self, newsletter_id: &str) -> ApiResult {
        self.delete_item("newsletters", newsletter_id)
    }

    // --- shares ---

    pub fn list_shares(&self, params: &ListParams) -> ApiResult {
        self.list_in_org("shares", params, &[Filter::Category])
    }

    pub fn create_share<T: Serialize + ?Sized>(&self, data: &T) -> ApiResult {
        self.create_in_org("shares", data)
    }

    pub fn get_share(&self, share_id: &str) -> ApiResult {
        self.get_item("shares", share_id)
    }

    pub fn update_share<T: Serialize + ?Sized>(&self, share_id: &str, data: &T) -> ApiResult {
        self.patch_item("shares", share_id, data)
    }

    pub fn delete_share(&self, share_id: &str) -> ApiResult {
        self.delete_item("shares", share_id)
    }

    // --- shared path shapes ---

    fn list_in_org(&self, collection: &str, params: &ListParams, filters: &[Filter]) -> ApiResult {
        let config = self.config();
        let query = params.to_query(&[], filters);
        let endpoint = format!("/orgs/{}/{collection}?{query}", config.org_id);
        self.request_with(&config, Service::Comms, &endpoint, RequestOptions::default())
    }

    fn create_in_org<T: Serialize + ?Sized>(&self, collection: &str, data: &T) -> ApiResult {
        let config = self.config();
        let endpoint = format!("/orgs/{}/{collection}", config.org_id);
        let options = RequestOptions::json(HttpMethod::Post, data)?;
        self.request_with(&config, Service::Comms, &endpoint, options)
    }

    fn get_item(&self, collection: &str, id: &str) -> ApiResult {
        self.get(Service::Comms, &format!("/{collection}/{id}"))
    }

    fn patch_item<T: Serialize + ?Sized>(&self, collection: &str, id: &str, data: &T) -> ApiResult {
        let endpoint = format!("/{collection}/{id}");
        self.send_json(Service::Comms, HttpMethod::Patch, &endpoint, data)
    }

    fn delete_item(&self, collection: &str, id: &str) -> ApiResult {
        self.delete(Service::Comms, &format!("/{collection}/{id}"))
    }
}
