//! In-memory stand-ins for the work and comms services.
//!
//! Every resource is a JSON object with a generated `id` plus the field naming
//! its scope (`workspace_id` or `org_id`). Bodies are stored as sent; the mock
//! only owns ids, scoping, pagination and the error shape `{"detail": ...}`.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, Request, State},
    http::{HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, MethodFilter, MethodRouter},
    Json, Router,
};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const API_PREFIX: &str = "/api/v1";

const DEFAULT_SKIP: usize = 0;
const DEFAULT_LIMIT: usize = 50;

pub type Record = Map<String, Value>;

#[derive(Debug, Default)]
pub struct Store {
    collections: HashMap<&'static str, Vec<Record>>,
}

pub type Db = Arc<RwLock<Store>>;

/// A resource family and how its records are scoped.
#[derive(Debug, Clone, Copy)]
pub struct Kind {
    pub collection: &'static str,
    pub label: &'static str,
    pub scope: Option<&'static str>,
}

pub const WORKSPACES: Kind = Kind { collection: "workspaces", label: "workspace", scope: None };
pub const TASKS: Kind = Kind { collection: "tasks", label: "task", scope: Some("workspace_id") };
pub const GOALS: Kind = Kind { collection: "goals", label: "goal", scope: Some("workspace_id") };
pub const BOOKMARKS: Kind = Kind { collection: "bookmarks", label: "bookmark", scope: Some("workspace_id") };
pub const ANNOUNCEMENTS: Kind = Kind {
    collection: "announcements",
    label: "announcement",
    scope: Some("workspace_id"),
};
pub const MEMOS: Kind = Kind { collection: "memos", label: "memo", scope: Some("org_id") };
pub const DECISIONS: Kind = Kind { collection: "decisions", label: "decision", scope: Some("org_id") };
pub const CELEBRATIONS: Kind = Kind { collection: "celebrations", label: "celebration", scope: Some("org_id") };
pub const NEWSLETTERS: Kind = Kind { collection: "newsletters", label: "newsletter", scope: Some("org_id") };
pub const SHARES: Kind = Kind { collection: "shares", label: "share", scope: Some("org_id") };

/// Error reply in the services' `{"detail": ...}` shape.
#[derive(Debug)]
pub struct Failure(StatusCode, String);

impl Failure {
    fn not_found(kind: Kind) -> Self {
        Failure(StatusCode::NOT_FOUND, format!("{} not found", kind.label))
    }
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        (self.0, Json(json!({ "detail": self.1 }))).into_response()
    }
}

/// The work service: workspaces, tasks, goals, bookmarks. Updates are `PUT`.
pub fn work_app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    let api = Router::new()
        .route("/workspaces", collection(WORKSPACES))
        .route("/workspaces/{workspace_id}", item(WORKSPACES, MethodFilter::PUT))
        .route("/tasks", get(move |State(db): State<Db>, Query(q): Query<HashMap<String, String>>| async move {
            list(&db, TASKS, None, q).await
        }))
        .route("/workspaces/{workspace_id}/tasks", scoped_collection(TASKS))
        .route("/workspaces/{workspace_id}/tasks/{id}", scoped_item(TASKS, MethodFilter::PUT))
        .route("/workspaces/{workspace_id}/goals", scoped_collection(GOALS))
        .route("/workspaces/{workspace_id}/goals/{id}", scoped_item(GOALS, MethodFilter::PUT))
        .route("/workspaces/{workspace_id}/bookmarks", scoped_collection(BOOKMARKS))
        .route(
            "/workspaces/{workspace_id}/bookmarks/{id}",
            delete(move |State(db): State<Db>, Path((scope, id)): Path<(String, String)>| async move {
                remove(&db, BOOKMARKS, Some(scope), id).await
            }),
        )
        .route_layer(middleware::from_fn(require_identity))
        .route("/health", get(|| async { Json(json!({ "status": "ok", "service": "work" })) }))
        .with_state(db);
    Router::new().nest(API_PREFIX, api)
}

/// The comms service. Announcements hang off workspaces, everything else
/// off organizations; items are addressed by id alone. Updates are `PATCH`.
pub fn comms_app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    let mut api = Router::new()
        .route("/workspaces/{workspace_id}/announcements", scoped_collection(ANNOUNCEMENTS))
        .route("/announcements/{id}", item(ANNOUNCEMENTS, MethodFilter::PATCH));
    for kind in [MEMOS, DECISIONS, CELEBRATIONS, NEWSLETTERS, SHARES] {
        api = api
            .route(&format!("/orgs/{{org_id}}/{}", kind.collection), scoped_collection(kind))
            .route(&format!("/{}/{{id}}", kind.collection), item(kind, MethodFilter::PATCH));
    }
    let api = api
        .route_layer(middleware::from_fn(require_identity))
        .route("/health", get(|| async { Json(json!({ "status": "ok", "service": "comms" })) }))
        .with_state(db);
    Router::new().nest(API_PREFIX, api)
}

pub async fn run(listener: TcpListener, app: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, app).await
}

async fn require_identity(request: Request, next: Next) -> Response {
    for header in ["X-Org-Id", "X-User-Id"] {
        if !request.headers().contains_key(header) {
            return Failure(StatusCode::BAD_REQUEST, format!("missing {header} header")).into_response();
        }
    }
    next.run(request).await
}

// --- route shapes ---

/// `GET` list / `POST` create on an unscoped collection.
fn collection(kind: Kind) -> MethodRouter<Db> {
    get(move |State(db): State<Db>, Query(q): Query<HashMap<String, String>>| async move {
        list(&db, kind, None, q).await
    })
    .post(move |State(db): State<Db>, headers: HeaderMap, Json(body): Json<Record>| async move {
        create(&db, kind, None, &headers, body).await
    })
}

/// `GET` list / `POST` create under a scope id taken from the path.
fn scoped_collection(kind: Kind) -> MethodRouter<Db> {
    get(
        move |State(db): State<Db>, Path(scope): Path<String>, Query(q): Query<HashMap<String, String>>| async move {
            list(&db, kind, Some(scope), q).await
        },
    )
    .post(
        move |State(db): State<Db>, Path(scope): Path<String>, headers: HeaderMap, Json(body): Json<Record>| async move {
            create(&db, kind, Some(scope), &headers, body).await
        },
    )
}

/// `GET` / update / `DELETE` on an item addressed by id alone.
fn item(kind: Kind, update_verb: MethodFilter) -> MethodRouter<Db> {
    get(move |State(db): State<Db>, Path(id): Path<String>| async move { fetch(&db, kind, None, id).await })
        .on(
            update_verb,
            move |State(db): State<Db>, Path(id): Path<String>, Json(patch): Json<Record>| async move {
                update(&db, kind, None, id, patch).await
            },
        )
        .delete(move |State(db): State<Db>, Path(id): Path<String>| async move { remove(&db, kind, None, id).await })
}

/// `GET` / update / `DELETE` on an item that must belong to the path's scope.
fn scoped_item(kind: Kind, update_verb: MethodFilter) -> MethodRouter<Db> {
    get(move |State(db): State<Db>, Path((scope, id)): Path<(String, String)>| async move {
        fetch(&db, kind, Some(scope), id).await
    })
    .on(
        update_verb,
        move |State(db): State<Db>, Path((scope, id)): Path<(String, String)>, Json(patch): Json<Record>| async move {
            update(&db, kind, Some(scope), id, patch).await
        },
    )
    .delete(move |State(db): State<Db>, Path((scope, id)): Path<(String, String)>| async move {
        remove(&db, kind, Some(scope), id).await
    })
}

// --- handlers ---

async fn list(
    db: &Db,
    kind: Kind,
    scope: Option<String>,
    mut query: HashMap<String, String>,
) -> Result<Json<Vec<Value>>, Failure> {
    let skip = page_param(&mut query, "skip", DEFAULT_SKIP)?;
    let limit = page_param(&mut query, "limit", DEFAULT_LIMIT)?;

    let store = db.read().await;
    let records = store.collections.get(kind.collection).map(Vec::as_slice).unwrap_or_default();
    let page = records
        .iter()
        .filter(|r| in_scope(r, kind, scope.as_deref()))
        .filter(|r| query.iter().all(|(k, v)| field_matches(r.get(k), v)))
        .skip(skip)
        .take(limit)
        .map(|r| Value::Object(r.clone()))
        .collect();
    Ok(Json(page))
}

async fn create(
    db: &Db,
    kind: Kind,
    scope: Option<String>,
    headers: &HeaderMap,
    body: Record,
) -> (StatusCode, Json<Value>) {
    let mut record = body;
    record.insert("id".to_string(), Value::String(Uuid::new_v4().to_string()));
    if let (Some(field), Some(scope)) = (kind.scope, scope) {
        record.insert(field.to_string(), Value::String(scope));
    }
    if let Some(user) = headers.get("X-User-Id").and_then(|v| v.to_str().ok()) {
        record.insert("created_by".to_string(), Value::String(user.to_string()));
    }

    let mut store = db.write().await;
    store.collections.entry(kind.collection).or_default().push(record.clone());
    (StatusCode::CREATED, Json(Value::Object(record)))
}

async fn fetch(db: &Db, kind: Kind, scope: Option<String>, id: String) -> Result<Json<Value>, Failure> {
    let store = db.read().await;
    store
        .collections
        .get(kind.collection)
        .and_then(|records| records.iter().find(|r| is_target(r, kind, scope.as_deref(), &id)))
        .map(|r| Json(Value::Object(r.clone())))
        .ok_or(Failure::not_found(kind))
}

async fn update(
    db: &Db,
    kind: Kind,
    scope: Option<String>,
    id: String,
    patch: Record,
) -> Result<Json<Value>, Failure> {
    let mut store = db.write().await;
    let record = store
        .collections
        .get_mut(kind.collection)
        .and_then(|records| records.iter_mut().find(|r| is_target(r, kind, scope.as_deref(), &id)))
        .ok_or(Failure::not_found(kind))?;
    for (key, value) in patch {
        if key != "id" {
            record.insert(key, value);
        }
    }
    Ok(Json(Value::Object(record.clone())))
}

async fn remove(db: &Db, kind: Kind, scope: Option<String>, id: String) -> Result<StatusCode, Failure> {
    let mut store = db.write().await;
    let records = store.collections.get_mut(kind.collection).ok_or(Failure::not_found(kind))?;
    let position = records
        .iter()
        .position(|r| is_target(r, kind, scope.as_deref(), &id))
        .ok_or(Failure::not_found(kind))?;
    records.remove(position);
    Ok(StatusCode::NO_CONTENT)
}

// --- helpers ---

fn page_param(query: &mut HashMap<String, String>, name: &str, default: usize) -> Result<usize, Failure> {
    match query.remove(name) {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| Failure(StatusCode::UNPROCESSABLE_ENTITY, format!("invalid {name}: {raw}"))),
    }
}

fn in_scope(record: &Record, kind: Kind, scope: Option<&str>) -> bool {
    match (kind.scope, scope) {
        (Some(field), Some(scope)) => record.get(field).and_then(Value::as_str) == Some(scope),
        _ => true,
    }
}

fn is_target(record: &Record, kind: Kind, scope: Option<&str>, id: &str) -> bool {
    record.get("id").and_then(Value::as_str) == Some(id) && in_scope(record, kind, scope)
}

/// Compare a stored field with a query-string value by its string form.
fn field_matches(field: Option<&Value>, expected: &str) -> bool {
    match field {
        Some(Value::String(s)) => s == expected,
        Some(Value::Null) | None => false,
        Some(other) => other.to_string() == expected,
    }
}
