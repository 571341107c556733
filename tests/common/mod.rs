//! In-process tracking backend for integration tests.
//!
//! Records are kept as JSON in one mutex; every request is counted by
//! `"METHOD /path"` so tests can observe deduplication and refetches.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Path, Request, State},
    http::{header, HeaderMap, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::task::JoinHandle;

use tracking_console::{ConsoleApi, HttpClient, MemoryTokenStore};

pub const ACME_ID: i64 = 1;
pub const ALICE_ID: i64 = 7;
pub const BOB_ID: i64 = 8;
pub const LONER_ID: i64 = 9;
pub const STATUS_API_ID: i64 = 3;
pub const CATALOGUE_ID: i64 = 4;
pub const PASSWORD: &str = "Secret#123";

pub struct MockState {
    next_id: i64,
    pub users: Vec<Value>,
    pub passwords: HashMap<String, String>,
    pub sessions: HashMap<String, i64>,
    pub companies: Vec<Value>,
    pub resources: Vec<Value>,
    pub tasks: Vec<Value>,
    pub settings: Vec<Value>,
    pub hits: HashMap<String, usize>,
    pub get_delay: Option<Duration>,
}

impl MockState {
    fn seeded() -> Self {
        let user = |id: i64, username: &str, role: &str, company: Option<i64>| {
            json!({
                "id": id,
                "username": username,
                "firstName": format!("{}-first", username),
                "lastName": format!("{}-last", username),
                "patronymic": "",
                "email": format!("{}@example.com", username),
                "role": role,
                "companyId": company,
            })
        };
        let passwords = ["alice", "bob", "loner"]
            .into_iter()
            .map(|u| (u.to_string(), PASSWORD.to_string()))
            .collect();

        Self {
            next_id: 100,
            users: vec![
                user(ALICE_ID, "alice", "Admin", Some(ACME_ID)),
                user(BOB_ID, "bob", "User", Some(ACME_ID)),
                user(LONER_ID, "loner", "User", None),
            ],
            passwords,
            sessions: HashMap::new(),
            companies: vec![json!({"id": ACME_ID, "companyName": "Acme"})],
            resources: vec![
                json!({
                    "id": STATUS_API_ID,
                    "name": "Status API",
                    "type": "API",
                    "source": "https://status.acme.test/health",
                    "companyId": ACME_ID,
                    "resourceStatus": "Active",
                }),
                json!({
                    "id": CATALOGUE_ID,
                    "name": "Public DNS",
                    "type": "Web",
                    "source": "https://dns.example.test",
                    "companyId": null,
                    "resourceStatus": "Active",
                }),
            ],
            tasks: Vec::new(),
            settings: Vec::new(),
            hits: HashMap::new(),
            get_delay: None,
        }
    }

    fn allocate(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

type Shared = Arc<Mutex<MockState>>;

pub struct MockBackend {
    pub base_url: String,
    state: Shared,
    server: JoinHandle<()>,
}

impl MockBackend {
    pub async fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(MockState::seeded()));
        let app = router(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self {
            base_url: format!("http://{}", addr),
            state,
            server,
        }
    }

    /// Fresh API handle with an empty in-memory token store
    pub fn api(&self) -> (ConsoleApi, Arc<MemoryTokenStore>) {
        let tokens = Arc::new(MemoryTokenStore::new());
        let client = HttpClient::new(self.base_url.clone(), tokens.clone());
        (ConsoleApi::from_client(client), tokens)
    }

    /// API handle already holding a valid session for `user_id`
    pub fn api_for(&self, user_id: i64) -> ConsoleApi {
        let token = format!("token-{}", user_id);
        self.with_state(|s| s.sessions.insert(token.clone(), user_id));
        let tokens = Arc::new(MemoryTokenStore::with_token(token));
        ConsoleApi::from_client(HttpClient::new(self.base_url.clone(), tokens))
    }

    pub fn with_state<R>(&self, f: impl FnOnce(&mut MockState) -> R) -> R {
        let mut state = self.state.lock().unwrap();
        f(&mut state)
    }

    /// Requests seen for `"METHOD /path"`
    pub fn hits(&self, key: &str) -> usize {
        self.with_state(|s| s.hits.get(key).copied().unwrap_or(0))
    }

    pub fn set_get_delay(&self, delay: Duration) {
        self.with_state(|s| s.get_delay = Some(delay));
    }

    pub fn company_names(&self) -> Vec<String> {
        self.with_state(|s| {
            s.companies
                .iter()
                .filter_map(|c| c["companyName"].as_str().map(str::to_string))
                .collect()
        })
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/Auth/login", post(login))
        .route("/Auth/register", post(register))
        .route("/Auth/logout", post(|| async { StatusCode::OK }))
        .route("/User", get(list_users).post(create_user).put(update_user))
        .route("/User/UserInfo", get(user_info))
        .route("/User/{id}", get(get_user).delete(delete_user))
        .route(
            "/Company",
            get(list_companies).post(create_company).put(update_company),
        )
        .route("/Company/{id}", get(get_company).delete(delete_company))
        .route("/Company/GetCompanyUsers/{id}", get(company_users))
        .route("/Company/AddUserToCompany/{a}/{b}", post(add_user_to_company))
        .route(
            "/Company/DeleteUserFromCompany/{a}/{b}",
            axum::routing::delete(remove_user_from_company),
        )
        .route("/Resource", get(list_resources).post(create_resource))
        .route("/Resource/{a}", post(add_company_resource))
        .route(
            "/Resource/{a}/{b}",
            put(update_company_resource).delete(delete_company_resource),
        )
        .route("/Resource/GetCompanyResources/{id}", get(company_resources))
        .route("/Task", post(create_task).put(update_task))
        .route("/Task/{id}", get(get_task).delete(delete_task))
        .route("/Task/GetAllUserTasks/{id}", get(user_tasks))
        .route("/Task/GetAllCompanyTasks/{id}", get(company_tasks))
        .route("/Task/AssignTaskToUser/{a}/{b}", post(assign_task))
        .route("/Task/ReassignTaskToUser/{a}/{b}", put(assign_task))
        .route(
            "/MonitoringSetting",
            post(create_setting).put(update_setting),
        )
        .route(
            "/MonitoringSetting/{id}",
            get(setting_by_resource).delete(delete_setting),
        )
        .layer(middleware::from_fn_with_state(state.clone(), observe))
        .with_state(state)
}

async fn observe(State(state): State<Shared>, req: Request, next: Next) -> Response {
    let key = format!("{} {}", req.method(), req.uri().path());
    let delay = {
        let mut s = state.lock().unwrap();
        *s.hits.entry(key).or_default() += 1;
        s.get_delay
    };
    if req.method() == Method::GET {
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
    next.run(req).await
}

fn ok(body: Value) -> Response {
    (StatusCode::OK, Json(body)).into_response()
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

fn id_of(v: &Value) -> i64 {
    v["id"].as_i64().unwrap_or_default()
}

fn find(list: &[Value], id: i64) -> Option<&Value> {
    list.iter().find(|v| id_of(v) == id)
}

fn find_mut(list: &mut [Value], id: i64) -> Option<&mut Value> {
    list.iter_mut().find(|v| id_of(v) == id)
}

/// Copy the non-null fields of `patch` onto `target`
fn merge(target: &mut Value, patch: &Value, renames: &[(&str, &str)]) {
    let (Some(target), Some(patch)) = (target.as_object_mut(), patch.as_object()) else {
        return;
    };
    for (key, value) in patch {
        if value.is_null() || key == "id" {
            continue;
        }
        let key = renames
            .iter()
            .find(|(from, _)| from == key)
            .map(|(_, to)| to.to_string())
            .unwrap_or_else(|| key.clone());
        target.insert(key, value.clone());
    }
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

async fn login(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut s = state.lock().unwrap();
    let username = body["username"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();
    if s.passwords.get(username).map(String::as_str) != Some(password) {
        return error(StatusCode::UNAUTHORIZED, "Unauthorized");
    }
    let Some(id) = s
        .users
        .iter()
        .find(|u| u["username"] == username)
        .map(id_of)
    else {
        return error(StatusCode::UNAUTHORIZED, "Unauthorized");
    };
    let token = format!("token-{}", id);
    s.sessions.insert(token.clone(), id);
    ok(json!({ "token": token }))
}

async fn register(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut s = state.lock().unwrap();
    let username = body["username"].as_str().unwrap_or_default().to_string();
    if s.passwords.contains_key(&username) {
        return error(StatusCode::BAD_REQUEST, "Username already taken");
    }
    let id = s.allocate();
    let mut user = json!({ "id": id, "role": "User", "companyId": null });
    merge(&mut user, &body, &[]);
    if let Some(map) = user.as_object_mut() {
        map.remove("password");
        map.remove("passwordConfirmation");
    }
    s.passwords
        .insert(username, body["password"].as_str().unwrap_or_default().to_string());
    s.users.push(user);
    StatusCode::OK.into_response()
}

async fn user_info(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let s = state.lock().unwrap();
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    match token.and_then(|t| s.sessions.get(t)).and_then(|id| find(&s.users, *id)) {
        Some(user) => ok(user.clone()),
        None => error(StatusCode::UNAUTHORIZED, "Unauthorized"),
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

async fn list_users(State(state): State<Shared>) -> Response {
    ok(Value::Array(state.lock().unwrap().users.clone()))
}

async fn get_user(State(state): State<Shared>, Path(id): Path<i64>) -> Response {
    match find(&state.lock().unwrap().users, id) {
        Some(user) => ok(user.clone()),
        None => error(StatusCode::NOT_FOUND, "User not found"),
    }
}

async fn create_user(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut s = state.lock().unwrap();
    let id = s.allocate();
    let mut user = json!({ "id": id, "companyId": null });
    merge(&mut user, &body, &[]);
    if let Some(map) = user.as_object_mut() {
        map.remove("password");
    }
    let username = body["username"].as_str().unwrap_or_default().to_string();
    let password = body["password"].as_str().unwrap_or_default().to_string();
    s.passwords.insert(username, password);
    s.users.push(user);
    ok(json!({ "id": id }))
}

async fn update_user(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut s = state.lock().unwrap();
    match find_mut(&mut s.users, id_of(&body)) {
        Some(user) => {
            merge(user, &body, &[]);
            if let Some(map) = user.as_object_mut() {
                map.remove("password");
            }
            StatusCode::OK.into_response()
        }
        None => error(StatusCode::NOT_FOUND, "User not found"),
    }
}

async fn delete_user(State(state): State<Shared>, Path(id): Path<i64>) -> Response {
    let mut s = state.lock().unwrap();
    s.users.retain(|u| id_of(u) != id);
    StatusCode::OK.into_response()
}

// ---------------------------------------------------------------------------
// Companies
// ---------------------------------------------------------------------------

async fn list_companies(State(state): State<Shared>) -> Response {
    ok(Value::Array(state.lock().unwrap().companies.clone()))
}

async fn get_company(State(state): State<Shared>, Path(id): Path<i64>) -> Response {
    match find(&state.lock().unwrap().companies, id) {
        Some(company) => ok(company.clone()),
        None => error(StatusCode::NOT_FOUND, "Company not found"),
    }
}

async fn create_company(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut s = state.lock().unwrap();
    let id = s.allocate();
    s.companies
        .push(json!({ "id": id, "companyName": body["companyName"].clone() }));
    ok(json!({ "id": id }))
}

async fn update_company(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut s = state.lock().unwrap();
    match find_mut(&mut s.companies, id_of(&body)) {
        Some(company) => {
            merge(company, &body, &[]);
            StatusCode::OK.into_response()
        }
        None => error(StatusCode::NOT_FOUND, "Company not found"),
    }
}

async fn delete_company(State(state): State<Shared>, Path(id): Path<i64>) -> Response {
    let mut s = state.lock().unwrap();
    s.companies.retain(|c| id_of(c) != id);
    StatusCode::OK.into_response()
}

async fn company_users(State(state): State<Shared>, Path(id): Path<i64>) -> Response {
    let s = state.lock().unwrap();
    let users: Vec<Value> = s
        .users
        .iter()
        .filter(|u| u["companyId"].as_i64() == Some(id))
        .cloned()
        .collect();
    ok(Value::Array(users))
}

async fn add_user_to_company(
    State(state): State<Shared>,
    Path((user_id, company_id)): Path<(i64, i64)>,
) -> Response {
    let mut s = state.lock().unwrap();
    if find(&s.companies, company_id).is_none() {
        return error(StatusCode::NOT_FOUND, "Company not found");
    }
    match find_mut(&mut s.users, user_id) {
        Some(user) => {
            user["companyId"] = json!(company_id);
            StatusCode::OK.into_response()
        }
        None => error(StatusCode::NOT_FOUND, "User not found"),
    }
}

async fn remove_user_from_company(
    State(state): State<Shared>,
    Path((user_id, company_id)): Path<(i64, i64)>,
) -> Response {
    let mut s = state.lock().unwrap();
    match find_mut(&mut s.users, user_id) {
        Some(user) if user["companyId"].as_i64() == Some(company_id) => {
            user["companyId"] = Value::Null;
            StatusCode::OK.into_response()
        }
        _ => error(StatusCode::NOT_FOUND, "User is not a member of this company"),
    }
}

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

const RESOURCE_RENAMES: &[(&str, &str)] = &[("status", "resourceStatus")];

async fn list_resources(State(state): State<Shared>) -> Response {
    ok(Value::Array(state.lock().unwrap().resources.clone()))
}

async fn company_resources(State(state): State<Shared>, Path(id): Path<i64>) -> Response {
    let s = state.lock().unwrap();
    let resources: Vec<Value> = s
        .resources
        .iter()
        .filter(|r| r["companyId"].as_i64() == Some(id))
        .cloned()
        .collect();
    ok(Value::Array(resources))
}

async fn create_resource(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut s = state.lock().unwrap();
    let id = s.allocate();
    let mut resource = json!({ "id": id, "resourceStatus": "Active" });
    merge(&mut resource, &body, RESOURCE_RENAMES);
    s.resources.push(resource);
    ok(json!({ "id": id }))
}

/// Attach an existing resource (body carries its id) or create one owned by
/// the company
async fn add_company_resource(
    State(state): State<Shared>,
    Path(company_id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    let mut s = state.lock().unwrap();
    if let Some(existing) = find_mut(&mut s.resources, id_of(&body)) {
        existing["companyId"] = json!(company_id);
        return ok(json!({ "id": id_of(existing) }));
    }
    let id = s.allocate();
    let mut resource = json!({ "id": id, "resourceStatus": "Active" });
    merge(&mut resource, &body, RESOURCE_RENAMES);
    resource["companyId"] = json!(company_id);
    s.resources.push(resource);
    ok(json!({ "id": id }))
}

async fn update_company_resource(
    State(state): State<Shared>,
    Path((company_id, resource_id)): Path<(i64, i64)>,
    Json(body): Json<Value>,
) -> Response {
    let mut s = state.lock().unwrap();
    match find_mut(&mut s.resources, resource_id) {
        Some(resource)
            if resource["companyId"].is_null()
                || resource["companyId"].as_i64() == Some(company_id) =>
        {
            merge(resource, &body, RESOURCE_RENAMES);
            resource["companyId"] = json!(company_id);
            StatusCode::OK.into_response()
        }
        _ => error(StatusCode::NOT_FOUND, "Resource not found"),
    }
}

async fn delete_company_resource(
    State(state): State<Shared>,
    Path((resource_id, company_id)): Path<(i64, i64)>,
) -> Response {
    let mut s = state.lock().unwrap();
    let before = s.resources.len();
    s.resources
        .retain(|r| !(id_of(r) == resource_id && r["companyId"].as_i64() == Some(company_id)));
    if s.resources.len() == before {
        return error(StatusCode::NOT_FOUND, "Resource not found");
    }
    StatusCode::OK.into_response()
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

const TASK_RENAMES: &[(&str, &str)] = &[("status", "taskStatus")];

async fn create_task(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut s = state.lock().unwrap();
    let id = s.allocate();
    let mut task = json!({ "id": id, "taskStatus": "Opened" });
    merge(&mut task, &body, TASK_RENAMES);
    s.tasks.push(task);
    ok(json!({ "id": id }))
}

async fn update_task(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut s = state.lock().unwrap();
    match find_mut(&mut s.tasks, id_of(&body)) {
        Some(task) => {
            merge(task, &body, TASK_RENAMES);
            StatusCode::OK.into_response()
        }
        None => error(StatusCode::NOT_FOUND, "Task not found"),
    }
}

async fn get_task(State(state): State<Shared>, Path(id): Path<i64>) -> Response {
    match find(&state.lock().unwrap().tasks, id) {
        Some(task) => ok(task.clone()),
        None => error(StatusCode::NOT_FOUND, "Task not found"),
    }
}

async fn delete_task(State(state): State<Shared>, Path(id): Path<i64>) -> Response {
    let mut s = state.lock().unwrap();
    s.tasks.retain(|t| id_of(t) != id);
    StatusCode::OK.into_response()
}

async fn user_tasks(State(state): State<Shared>, Path(id): Path<i64>) -> Response {
    let s = state.lock().unwrap();
    let tasks: Vec<Value> = s
        .tasks
        .iter()
        .filter(|t| t["assignedUserId"].as_i64() == Some(id) || t["createdById"].as_i64() == Some(id))
        .cloned()
        .collect();
    ok(Value::Array(tasks))
}

async fn company_tasks(State(state): State<Shared>, Path(id): Path<i64>) -> Response {
    let s = state.lock().unwrap();
    let owned: Vec<i64> = s
        .resources
        .iter()
        .filter(|r| r["companyId"].as_i64() == Some(id))
        .map(id_of)
        .collect();
    let tasks: Vec<Value> = s
        .tasks
        .iter()
        .filter(|t| t["resourceId"].as_i64().map(|r| owned.contains(&r)).unwrap_or(false))
        .cloned()
        .collect();
    ok(Value::Array(tasks))
}

async fn assign_task(
    State(state): State<Shared>,
    Path((user_id, task_id)): Path<(i64, i64)>,
) -> Response {
    let mut s = state.lock().unwrap();
    if find(&s.users, user_id).is_none() {
        return error(StatusCode::NOT_FOUND, "User not found");
    }
    match find_mut(&mut s.tasks, task_id) {
        Some(task) => {
            task["assignedUserId"] = json!(user_id);
            StatusCode::OK.into_response()
        }
        None => error(StatusCode::NOT_FOUND, "Task not found"),
    }
}

// ---------------------------------------------------------------------------
// Monitoring settings
// ---------------------------------------------------------------------------

async fn create_setting(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut s = state.lock().unwrap();
    let id = s.allocate();
    let mut setting = json!({ "id": id });
    merge(&mut setting, &body, &[]);
    s.settings.push(setting);
    ok(json!({ "id": id }))
}

async fn update_setting(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut s = state.lock().unwrap();
    match find_mut(&mut s.settings, id_of(&body)) {
        Some(setting) => {
            merge(setting, &body, &[]);
            StatusCode::OK.into_response()
        }
        None => error(StatusCode::NOT_FOUND, "Monitoring setting not found"),
    }
}

async fn delete_setting(State(state): State<Shared>, Path(id): Path<i64>) -> Response {
    let mut s = state.lock().unwrap();
    s.settings.retain(|m| id_of(m) != id);
    StatusCode::OK.into_response()
}

async fn setting_by_resource(State(state): State<Shared>, Path(resource_id): Path<i64>) -> Response {
    let s = state.lock().unwrap();
    match s
        .settings
        .iter()
        .find(|m| m["resourceId"].as_i64() == Some(resource_id))
    {
        Some(setting) => ok(setting.clone()),
        None => error(StatusCode::NOT_FOUND, "Monitoring setting not found"),
    }
}
