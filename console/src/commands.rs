//! Dispatch of parsed commands onto `ApiClient`.

use anyhow::{anyhow, Result};
use rundesk_core::{ApiClient, ApiResult, ListParams, RequestOptions};
use serde_json::Value;

use crate::cli::{Command, ConfigCommand, Resource};

/// Run `command` and return the text to print.
pub fn run(client: &ApiClient, command: Command) -> Result<String> {
    match command {
        Command::Config(ConfigCommand::Show) => render(&serde_json::to_value(client.config())?),
        Command::Config(ConfigCommand::Set {
            work_url,
            comms_url,
            org_id,
            user_id,
        }) => {
            let current = client.config();
            client.save_config(
                work_url.as_deref().unwrap_or(&current.work_base_url),
                comms_url.as_deref().unwrap_or(&current.comms_base_url),
                org_id.as_deref().unwrap_or(&current.org_id),
                user_id.as_deref().unwrap_or(&current.user_id),
            )?;
            render(&serde_json::to_value(client.config())?)
        }
        Command::Status => Ok(status(client)),
        Command::List { resource, filters } => {
            let value = list(client, resource, filters.workspace.as_deref(), &filters.params())?;
            render(&value)
        }
        Command::Get {
            resource,
            id,
            workspace,
        } => render(&get(client, resource, &id, workspace.as_deref())?),
        Command::Create {
            resource,
            data,
            workspace,
        } => render(&create(client, resource, &data, workspace.as_deref())?),
        Command::Update {
            resource,
            id,
            data,
            workspace,
        } => render(&update(client, resource, &id, &data, workspace.as_deref())?),
        Command::Delete {
            resource,
            id,
            workspace,
        } => render(&delete(client, resource, &id, workspace.as_deref())?),
        Command::Request {
            service,
            endpoint,
            method,
            data,
            headers,
        } => {
            let options = RequestOptions {
                method,
                headers,
                body: data.map(|d| d.to_string()),
            };
            render(&client.request(service, &endpoint, options)?)
        }
    }
}

fn render(value: &Value) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// One line per service; an unreachable service is reported, not an error.
fn status(client: &ApiClient) -> String {
    let line = |name: &str, result: ApiResult| match result {
        Ok(body) => format!("{name}: online ({body})"),
        Err(e) => format!("{name}: offline ({e})"),
    };
    [
        line("work", client.check_work_health()),
        line("comms", client.check_comms_health()),
    ]
    .join("\n")
}

fn workspace(resource: Resource, workspace: Option<&str>) -> Result<&str> {
    workspace.ok_or_else(|| anyhow!("{resource} operations need --workspace"))
}

fn unsupported(resource: Resource, operation: &str) -> anyhow::Error {
    anyhow!("{resource} does not support {operation}")
}

fn list(client: &ApiClient, resource: Resource, ws: Option<&str>, params: &ListParams) -> Result<Value> {
    let result = match resource {
        Resource::Workspace => client.list_workspaces(params),
        Resource::Task => client.list_tasks(ws, params),
        Resource::Goal => client.list_goals(workspace(resource, ws)?, params),
        Resource::Bookmark => client.list_bookmarks(workspace(resource, ws)?, params),
        Resource::Announcement => client.list_announcements(workspace(resource, ws)?, params),
        Resource::Memo => client.list_memos(params),
        Resource::Decision => client.list_decisions(params),
        Resource::Celebration => client.list_celebrations(params),
        Resource::Newsletter => client.list_newsletters(params),
        Resource::Share => client.list_shares(params),
    };
    Ok(result?)
}

fn get(client: &ApiClient, resource: Resource, id: &str, ws: Option<&str>) -> Result<Value> {
    let result = match resource {
        Resource::Workspace => client.get_workspace(id),
        Resource::Task => client.get_task(workspace(resource, ws)?, id),
        Resource::Goal => client.get_goal(workspace(resource, ws)?, id),
        Resource::Bookmark => return Err(unsupported(resource, "get")),
        Resource::Announcement => client.get_announcement(id),
        Resource::Memo => client.get_memo(id),
        Resource::Decision => client.get_decision(id),
        Resource::Celebration => client.get_celebration(id),
        Resource::Newsletter => client.get_newsletter(id),
        Resource::Share => client.get_share(id),
    };
    Ok(result?)
}

fn create(client: &ApiClient, resource: Resource, data: &Value, ws: Option<&str>) -> Result<Value> {
    let result = match resource {
        Resource::Workspace => client.create_workspace(data),
        Resource::Task => client.create_task(workspace(resource, ws)?, data),
        Resource::Goal => client.create_goal(workspace(resource, ws)?, data),
        Resource::Bookmark => client.create_bookmark(workspace(resource, ws)?, data),
        Resource::Announcement => client.create_announcement(workspace(resource, ws)?, data),
        Resource::Memo => client.create_memo(data),
        Resource::Decision => client.create_decision(data),
        Resource::Celebration => client.create_celebration(data),
        Resource::Newsletter => client.create_newsletter(data),
        Resource::Share => client.create_share(data),
    };
    Ok(result?)
}

fn update(client: &ApiClient, resource: Resource, id: &str, data: &Value, ws: Option<&str>) -> Result<Value> {
    let result = match resource {
        Resource::Workspace => client.update_workspace(id, data),
        Resource::Task => client.update_task(workspace(resource, ws)?, id, data),
        Resource::Goal => client.update_goal(workspace(resource, ws)?, id, data),
        Resource::Bookmark => return Err(unsupported(resource, "update")),
        Resource::Announcement => client.update_announcement(id, data),
        Resource::Memo => client.update_memo(id, data),
        Resource::Decision => client.update_decision(id, data),
        Resource::Celebration => client.update_celebration(id, data),
        Resource::Newsletter => client.update_newsletter(id, data),
        Resource::Share => client.update_share(id, data),
    };
    Ok(result?)
}

fn delete(client: &ApiClient, resource: Resource, id: &str, ws: Option<&str>) -> Result<Value> {
    let result = match resource {
        Resource::Workspace => client.delete_workspace(id),
        Resource::Task => client.delete_task(workspace(resource, ws)?, id),
        Resource::Goal => client.delete_goal(workspace(resource, ws)?, id),
        Resource::Bookmark => client.delete_bookmark(workspace(resource, ws)?, id),
        Resource::Announcement => client.delete_announcement(id),
        Resource::Memo => client.delete_memo(id),
        Resource::Decision => client.delete_decision(id),
        Resource::Celebration => client.delete_celebration(id),
        Resource::Newsletter => client.delete_newsletter(id),
        Resource::Share => client.delete_share(id),
    };
    Ok(result?)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use rundesk_core::{HttpMethod, HttpRequest, HttpResponse, MemoryStore, Transport, TransportError};

    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    struct Recorder {
        status: u16,
        body: &'static str,
        seen: Mutex<Vec<HttpRequest>>,
    }

    impl Transport for Recorder {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            self.seen.lock().unwrap().push(request.clone());
            Ok(HttpResponse {
                status: self.status,
                headers: Vec::new(),
                body: self.body.to_string(),
            })
        }
    }

    fn setup(status: u16, body: &'static str) -> (ApiClient, Arc<Recorder>) {
        let recorder = Arc::new(Recorder {
            status,
            body,
            seen: Mutex::new(Vec::new()),
        });
        (ApiClient::new(Arc::new(MemoryStore::new()), recorder.clone()), recorder)
    }

    fn exec(client: &ApiClient, args: &[&str]) -> Result<String> {
        let cli = Cli::try_parse_from(std::iter::once("rundesk").chain(args.iter().copied()))?;
        run(client, cli.command)
    }

    #[test]
    fn config_set_keeps_unspecified_values() {
        let (client, _) = setup(200, "{}");
        let out = exec(&client, &["config", "set", "--org-id", "acme"]).unwrap();
        let config = client.config();
        assert_eq!(config.org_id, "acme");
        assert_eq!(config.user_id, "1");
        assert_eq!(config.work_base_url, "http://localhost:8001/api/v1");
        assert!(out.contains("\"org_id\": \"acme\""));
    }

    #[test]
    fn list_dispatches_to_resource_path() {
        let (client, recorder) = setup(200, "[]");
        exec(&client, &["list", "goal", "--workspace", "ws1", "--status", "open"]).unwrap();
        let req = recorder.seen.lock().unwrap().last().cloned().unwrap();
        assert_eq!(
            req.url,
            "http://localhost:8001/api/v1/workspaces/ws1/goals?status=open&skip=0&limit=50"
        );
    }

    #[test]
    fn workspace_scoped_resources_require_workspace() {
        let (client, recorder) = setup(200, "{}");
        let err = exec(&client, &["get", "task", "t1"]).unwrap_err();
        assert_eq!(err.to_string(), "task operations need --workspace");
        assert!(recorder.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn bookmark_get_is_unsupported() {
        let (client, _) = setup(200, "{}");
        let err = exec(&client, &["get", "bookmark", "b1", "--workspace", "ws1"]).unwrap_err();
        assert_eq!(err.to_string(), "bookmark does not support get");
        let err = exec(&client, &["update", "bookmark", "b1", "--data", "{}"]).unwrap_err();
        assert_eq!(err.to_string(), "bookmark does not support update");
    }

    #[test]
    fn update_uses_service_verb() {
        let (client, recorder) = setup(200, "{}");
        exec(&client, &["update", "share", "s1", "--data", r#"{"title":"x"}"#]).unwrap();
        let req = recorder.seen.lock().unwrap().last().cloned().unwrap();
        assert_eq!(req.method, HttpMethod::Patch);
        assert_eq!(req.body.as_deref(), Some(r#"{"title":"x"}"#));
    }

    #[test]
    fn api_errors_carry_server_message() {
        let (client, _) = setup(404, r#"{"detail":"not found"}"#);
        let err = exec(&client, &["get", "memo", "m1"]).unwrap_err();
        assert_eq!(err.to_string(), "not found");
    }

    #[test]
    fn status_reports_each_service() {
        let (client, _) = setup(503, "");
        let out = exec(&client, &["status"]).unwrap();
        assert_eq!(
            out,
            "work: offline (Request failed: 503)\ncomms: offline (Request failed: 503)"
        );
    }
}
