//! Command-line surface of the console.

use std::fmt;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use rundesk_core::{HttpMethod, ListParams, Service};
use serde_json::Value;

#[derive(Debug, Parser)]
#[command(name = "rundesk", version, about = "Manual test console for the rundesk work and comms services")]
pub struct Cli {
    /// Settings file (defaults to <config dir>/rundesk/settings.json)
    #[arg(long, global = true, env = "RUNDESK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log every request and response
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show or change connection settings
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Check whether both services answer their health endpoint
    Status,

    /// List a resource
    List {
        resource: Resource,
        #[command(flatten)]
        filters: ListArgs,
    },

    /// Fetch one item
    Get {
        resource: Resource,
        id: String,
        #[arg(long)]
        workspace: Option<String>,
    },

    /// Create an item from a JSON body
    Create {
        resource: Resource,
        #[arg(long, value_parser = parse_json)]
        data: Value,
        #[arg(long)]
        workspace: Option<String>,
    },

    /// Update an item with a JSON body
    Update {
        resource: Resource,
        id: String,
        #[arg(long, value_parser = parse_json)]
        data: Value,
        #[arg(long)]
        workspace: Option<String>,
    },

    /// Delete an item
    Delete {
        resource: Resource,
        id: String,
        #[arg(long)]
        workspace: Option<String>,
    },

    /// Send an arbitrary request to one service
    Request {
        service: Service,
        /// Path and optional query, appended to the service base URL
        endpoint: String,
        #[arg(long, short = 'X', default_value = "GET")]
        method: HttpMethod,
        #[arg(long, value_parser = parse_json)]
        data: Option<Value>,
        /// Extra header as `name:value`; may repeat
        #[arg(short = 'H', long = "header", value_parser = parse_header)]
        headers: Vec<(String, String)>,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the current settings
    Show,
    /// Change settings; omitted values are kept
    Set {
        #[arg(long)]
        work_url: Option<String>,
        #[arg(long)]
        comms_url: Option<String>,
        #[arg(long)]
        org_id: Option<String>,
        #[arg(long)]
        user_id: Option<String>,
    },
}

#[derive(Debug, Clone, Default, Args)]
pub struct ListArgs {
    #[arg(long)]
    pub workspace: Option<String>,
    #[arg(long)]
    pub skip: Option<u32>,
    #[arg(long)]
    pub limit: Option<u32>,
    #[arg(long)]
    pub task_list_id: Option<String>,
    #[arg(long)]
    pub milestone_id: Option<String>,
    #[arg(long)]
    pub assignee_id: Option<String>,
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long)]
    pub priority: Option<String>,
    #[arg(long = "type")]
    pub kind: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub visibility: Option<String>,
}

impl ListArgs {
    pub fn params(&self) -> ListParams {
        ListParams {
            skip: self.skip,
            limit: self.limit,
            task_list_id: self.task_list_id.clone(),
            milestone_id: self.milestone_id.clone(),
            assignee_id: self.assignee_id.clone(),
            status: self.status.clone(),
            priority: self.priority.clone(),
            kind: self.kind.clone(),
            category: self.category.clone(),
            visibility: self.visibility.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Resource {
    Workspace,
    Task,
    Goal,
    Bookmark,
    Announcement,
    Memo,
    Decision,
    Celebration,
    Newsletter,
    Share,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self
            .to_possible_value()
            .map(|v| v.get_name().to_string())
            .unwrap_or_default();
        f.write_str(&name)
    }
}

fn parse_json(raw: &str) -> Result<Value, String> {
    serde_json::from_str(raw).map_err(|e| format!("invalid JSON: {e}"))
}

fn parse_header(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected name:value, got {raw:?}"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("empty header name in {raw:?}"));
    }
    Ok((name.to_string(), value.trim().to_string()))
}
