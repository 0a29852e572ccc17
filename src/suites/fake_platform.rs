//! In-process EduQuest API used by the whole-run tests.
//!
//! Keeps users, enrollments and chat sessions in memory and exposes a few
//! fault toggles so the harness can be driven through its failure paths.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::{Path, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::Json;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Fault toggles for the fake platform.
#[derive(Debug, Clone, Copy)]
pub struct PlatformOptions {
    pub mentor_online: bool,
    /// Store the latest XP award instead of adding it.
    pub overwrite_xp: bool,
    pub empty_catalog: bool,
}

impl Default for PlatformOptions {
    fn default() -> Self {
        Self {
            mentor_online: true,
            overwrite_xp: false,
            empty_catalog: false,
        }
    }
}

#[derive(Debug, Clone)]
struct User {
    id: String,
    name: String,
    email: String,
    password: String,
}

#[derive(Debug, Clone)]
struct EnrollmentRow {
    id: String,
    user_id: String,
    course_id: String,
    xp: i64,
    missions: Vec<i64>,
}

#[derive(Debug, Default)]
struct Store {
    next_id: u64,
    users: Vec<User>,
    tokens: HashMap<String, String>,
    enrollments: Vec<EnrollmentRow>,
    chats: HashMap<String, Vec<Value>>,
}

impl Store {
    fn next(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }

    fn issue_token(&mut self, user_id: &str) -> String {
        let token = self.next("token");
        self.tokens.insert(token.clone(), user_id.to_string());
        token
    }
}

#[derive(Clone)]
struct PlatformState {
    options: PlatformOptions,
    store: Arc<Mutex<Store>>,
}

pub struct FakePlatform {
    base_url: String,
    server: JoinHandle<()>,
}

impl FakePlatform {
    pub async fn start(options: PlatformOptions) -> Self {
        let state = PlatformState {
            options,
            store: Arc::new(Mutex::new(Store::default())),
        };
        let api = Router::new()
            .route("/auth/signup", post(signup))
            .route("/auth/login", post(login))
            .route("/auth/me", get(me))
            .route("/courses", get(list_courses))
            .route("/courses/{id}", get(course_by_id))
            .route("/enrollments", post(enroll).get(list_enrollments))
            .route("/progress", put(update_progress))
            .route("/chat/session", post(create_chat))
            .route("/chat/{id}", get(get_chat).post(post_chat))
            .with_state(state);
        let app = Router::new().nest("/api", api);

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind fake platform");
        let addr = listener.local_addr().expect("fake platform address");
        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base_url: format!("http://{addr}/api"),
            server,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Drop for FakePlatform {
    fn drop(&mut self) {
        self.server.abort();
    }
}

const COURSES: [(&str, &str); 2] = [
    ("course-web", "Web Development Quest"),
    ("course-rust", "Systems Programming Quest"),
];

fn course_json(id: &str) -> Option<Value> {
    COURSES
        .iter()
        .find(|(course_id, _)| *course_id == id)
        .map(|(id, title)| json!({ "id": id, "title": title }))
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn authenticate(store: &Store, headers: &HeaderMap) -> Result<User, Response> {
    let user_id = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .and_then(|token| store.tokens.get(token))
        .ok_or_else(|| error(StatusCode::UNAUTHORIZED, "Unauthorized"))?;
    store
        .users
        .iter()
        .find(|user| &user.id == user_id)
        .cloned()
        .ok_or_else(|| error(StatusCode::UNAUTHORIZED, "Unauthorized"))
}

fn field<'a>(body: &'a Value, name: &str) -> Option<&'a str> {
    body.get(name).and_then(Value::as_str)
}

fn auth_payload(user: &User, token: String) -> Response {
    Json(json!({
        "user": { "id": user.id, "name": user.name, "email": user.email },
        "token": token,
    }))
    .into_response()
}

async fn signup(State(state): State<PlatformState>, Json(body): Json<Value>) -> Response {
    let (Some(name), Some(email), Some(password)) =
        (field(&body, "name"), field(&body, "email"), field(&body, "password"))
    else {
        return error(StatusCode::BAD_REQUEST, "Missing required fields");
    };

    let mut store = state.store.lock().unwrap();
    if store.users.iter().any(|user| user.email == email) {
        return error(StatusCode::BAD_REQUEST, "User already exists");
    }
    let user = User {
        id: store.next("user"),
        name: name.to_string(),
        email: email.to_string(),
        password: password.to_string(),
    };
    store.users.push(user.clone());
    let token = store.issue_token(&user.id);
    auth_payload(&user, token)
}

async fn login(State(state): State<PlatformState>, Json(body): Json<Value>) -> Response {
    let mut store = state.store.lock().unwrap();
    let user = store
        .users
        .iter()
        .find(|user| {
            Some(user.email.as_str()) == field(&body, "email")
                && Some(user.password.as_str()) == field(&body, "password")
        })
        .cloned();
    match user {
        Some(user) => {
            let token = store.issue_token(&user.id);
            auth_payload(&user, token)
        }
        None => error(StatusCode::UNAUTHORIZED, "Invalid credentials"),
    }
}

async fn me(State(state): State<PlatformState>, headers: HeaderMap) -> Response {
    let store = state.store.lock().unwrap();
    match authenticate(&store, &headers) {
        Ok(user) => Json(json!({ "id": user.id, "name": user.name, "email": user.email })).into_response(),
        Err(response) => response,
    }
}

async fn list_courses(State(state): State<PlatformState>) -> Response {
    if state.options.empty_catalog {
        return Json(json!([])).into_response();
    }
    let courses: Vec<Value> = COURSES.iter().filter_map(|(id, _)| course_json(id)).collect();
    Json(Value::Array(courses)).into_response()
}

async fn course_by_id(Path(id): Path<String>) -> Response {
    match course_json(&id) {
        Some(course) => Json(course).into_response(),
        None => error(StatusCode::NOT_FOUND, "Course not found"),
    }
}

async fn enroll(
    State(state): State<PlatformState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut store = state.store.lock().unwrap();
    let user = match authenticate(&store, &headers) {
        Ok(user) => user,
        Err(response) => return response,
    };
    let Some(course_id) = field(&body, "courseId").filter(|id| course_json(id).is_some()) else {
        return error(StatusCode::NOT_FOUND, "Course not found");
    };
    if store
        .enrollments
        .iter()
        .any(|row| row.user_id == user.id && row.course_id == course_id)
    {
        return error(StatusCode::BAD_REQUEST, "Already enrolled in this course");
    }

    let row = EnrollmentRow {
        id: store.next("enrollment"),
        user_id: user.id,
        course_id: course_id.to_string(),
        xp: 0,
        missions: Vec::new(),
    };
    store.enrollments.push(row.clone());
    Json(json!({ "id": row.id, "course_id": row.course_id, "user_id": row.user_id, "xp": 0 }))
        .into_response()
}

async fn list_enrollments(State(state): State<PlatformState>, headers: HeaderMap) -> Response {
    let store = state.store.lock().unwrap();
    let user = match authenticate(&store, &headers) {
        Ok(user) => user,
        Err(response) => return response,
    };
    let rows: Vec<Value> = store
        .enrollments
        .iter()
        .filter(|row| row.user_id == user.id)
        .map(|row| {
            json!({
                "id": row.id,
                "course_id": row.course_id,
                "course": course_json(&row.course_id),
                "progress": { "xp": row.xp, "completedMissions": row.missions },
            })
        })
        .collect();
    Json(Value::Array(rows)).into_response()
}

async fn update_progress(
    State(state): State<PlatformState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut store = state.store.lock().unwrap();
    let user = match authenticate(&store, &headers) {
        Ok(user) => user,
        Err(response) => return response,
    };
    let enrollment_id = field(&body, "enrollmentId").unwrap_or_default().to_string();
    let mission_id = body.get("missionId").and_then(Value::as_i64).unwrap_or_default();
    let xp_earned = body.get("xpEarned").and_then(Value::as_i64).unwrap_or_default();

    let overwrite = state.options.overwrite_xp;
    let Some(row) = store
        .enrollments
        .iter_mut()
        .find(|row| row.id == enrollment_id && row.user_id == user.id)
    else {
        return error(StatusCode::NOT_FOUND, "Enrollment not found");
    };
    row.xp = if overwrite { xp_earned } else { row.xp + xp_earned };
    if !row.missions.contains(&mission_id) {
        row.missions.push(mission_id);
    }

    Json(json!({
        "success": true,
        "newXp": row.xp,
        "newLevel": row.xp / 100 + 1,
        "progress": row.missions.len() * 10,
    }))
    .into_response()
}

async fn create_chat(
    State(state): State<PlatformState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut store = state.store.lock().unwrap();
    if let Err(response) = authenticate(&store, &headers) {
        return response;
    }
    let Some(course_id) = field(&body, "courseId").filter(|id| course_json(id).is_some()) else {
        return error(StatusCode::NOT_FOUND, "Course not found");
    };

    let id = store.next("chat");
    let messages = vec![json!({ "role": "assistant", "content": "Welcome, adventurer!" })];
    store.chats.insert(id.clone(), messages.clone());
    Json(json!({ "id": id, "course_id": course_id, "messages": messages })).into_response()
}

async fn get_chat(
    State(state): State<PlatformState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let store = state.store.lock().unwrap();
    if let Err(response) = authenticate(&store, &headers) {
        return response;
    }
    match store.chats.get(&id) {
        Some(messages) => Json(json!({ "id": id, "messages": messages })).into_response(),
        None => error(StatusCode::NOT_FOUND, "Chat session not found"),
    }
}

async fn post_chat(
    State(state): State<PlatformState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut store = state.store.lock().unwrap();
    if let Err(response) = authenticate(&store, &headers) {
        return response;
    }
    let Some(messages) = store.chats.get_mut(&id) else {
        return error(StatusCode::NOT_FOUND, "Chat session not found");
    };
    if !state.options.mentor_online {
        return error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "AI mentor unavailable: LLM key not configured",
        );
    }

    let reply = "Web development starts with HTML for structure, CSS for style and JavaScript for behavior.";
    messages.push(json!({ "role": "user", "content": field(&body, "message") }));
    messages.push(json!({ "role": "assistant", "content": reply }));
    Json(json!({ "message": reply })).into_response()
}
