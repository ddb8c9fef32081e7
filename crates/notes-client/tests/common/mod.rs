//! In-process stub of the notes API for integration tests.
//!
//! Serves the same routes and envelope as the real API on an ephemeral
//! port, keeps everything in memory, and counts the requests it receives.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Path, Request, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    middleware::{self, Next},
    response::Response,
    routing::{delete, post},
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use notes_client::notes_core::{Note, NoteId, User};
use notes_client::{ApiClient, AppContext, MemoryTokenStore, TokenStore};
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

pub const PASSWORD: &str = "secret123";

type Reply = (StatusCode, Json<Value>);

// ============================================================================
// State
// ============================================================================

struct Account {
    user: User,
    password: String,
}

struct OwnedNote {
    owner: String,
    note: Note,
}

#[derive(Default)]
struct Inner {
    accounts: Vec<Account>,
    tokens: HashMap<String, String>,
    notes: Vec<OwnedNote>,
    tick: i64,
    logouts: usize,
    force_unauthorized: bool,
    reject_user_lookup: bool,
    user_lookup_bad_gateway: bool,
    fail_with_500: bool,
}

impl Inner {
    fn now(&mut self) -> DateTime<Utc> {
        self.tick += 1;
        epoch() + Duration::seconds(self.tick)
    }

    fn user_for(&self, headers: &HeaderMap) -> Option<String> {
        if self.force_unauthorized {
            return None;
        }
        let token = headers.get(AUTHORIZATION)?.to_str().ok()?;
        self.tokens.get(token).cloned()
    }
}

#[derive(Clone, Default)]
struct Shared {
    inner: Arc<Mutex<Inner>>,
    requests: Arc<AtomicUsize>,
}

pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

fn ok(body: Value) -> Reply {
    (StatusCode::OK, Json(body))
}

fn fail(status: StatusCode, message: &str) -> Reply {
    (status, Json(json!({ "success": false, "message": message })))
}

fn unauthorized() -> Reply {
    fail(StatusCode::UNAUTHORIZED, "Unauthorized")
}

// ============================================================================
// Handlers
// ============================================================================

#[derive(Deserialize)]
struct LoginBody {
    email: String,
    password: String,
}

#[derive(Deserialize)]
struct SignUpBody {
    name: String,
    email: String,
    password: String,
}

#[derive(Deserialize)]
struct NoteBody {
    title: String,
    content: String,
}

async fn count_requests(State(shared): State<Shared>, request: Request, next: Next) -> Response {
    shared.requests.fetch_add(1, Ordering::SeqCst);
    let fail_with_500 = shared.inner.lock().unwrap().fail_with_500;
    if fail_with_500 {
        return Response::builder()
            .status(StatusCode::INTERNAL_SERVER_ERROR)
            .body("boom".into())
            .unwrap();
    }
    next.run(request).await
}

async fn login(State(shared): State<Shared>, Json(body): Json<LoginBody>) -> Reply {
    let mut inner = shared.inner.lock().unwrap();
    let Some(user_id) = inner
        .accounts
        .iter()
        .find(|a| a.user.email == body.email && a.password == body.password)
        .map(|a| a.user.id.clone())
    else {
        return fail(StatusCode::BAD_REQUEST, "Invalid credentials");
    };

    let token = Uuid::new_v4().to_string();
    inner.tokens.insert(token.clone(), user_id);
    ok(json!({ "success": true, "token": token }))
}

async fn signup(State(shared): State<Shared>, Json(body): Json<SignUpBody>) -> Reply {
    let mut inner = shared.inner.lock().unwrap();
    if inner.accounts.iter().any(|a| a.user.email == body.email) {
        return fail(StatusCode::BAD_REQUEST, "User already exists");
    }
    inner.accounts.push(Account {
        user: User {
            id: Uuid::new_v4().to_string(),
            name: body.name,
            email: body.email,
        },
        password: body.password,
    });
    (
        StatusCode::CREATED,
        Json(json!({ "success": true, "message": "User created successfully" })),
    )
}

async fn logout(State(shared): State<Shared>, headers: HeaderMap) -> Reply {
    let mut inner = shared.inner.lock().unwrap();
    inner.logouts += 1;
    if let Some(token) = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        inner.tokens.remove(token);
    }
    ok(json!({ "success": true, "message": "Logged out" }))
}

async fn current_user(State(shared): State<Shared>, headers: HeaderMap) -> Reply {
    let inner = shared.inner.lock().unwrap();
    if inner.reject_user_lookup {
        return fail(StatusCode::BAD_REQUEST, "User lookup disabled");
    }
    if inner.user_lookup_bad_gateway {
        return fail(StatusCode::BAD_GATEWAY, "Upstream unavailable");
    }
    let Some(user_id) = inner.user_for(&headers) else {
        return fail(StatusCode::UNAUTHORIZED, "Invalid token");
    };
    let user = inner
        .accounts
        .iter()
        .find(|a| a.user.id == user_id)
        .map(|a| a.user.clone());
    match user {
        Some(user) => ok(json!({ "success": true, "user": user })),
        None => fail(StatusCode::NOT_FOUND, "User not found"),
    }
}

async fn list_notes(State(shared): State<Shared>, headers: HeaderMap) -> Reply {
    let inner = shared.inner.lock().unwrap();
    let Some(owner) = inner.user_for(&headers) else {
        return unauthorized();
    };
    let notes: Vec<&Note> = inner
        .notes
        .iter()
        .filter(|n| n.owner == owner)
        .map(|n| &n.note)
        .collect();
    ok(json!({ "success": true, "notes": notes }))
}

async fn create_note(
    State(shared): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<NoteBody>,
) -> Reply {
    let mut inner = shared.inner.lock().unwrap();
    let Some(owner) = inner.user_for(&headers) else {
        return unauthorized();
    };
    if body.title.is_empty() || body.content.is_empty() {
        return fail(StatusCode::BAD_REQUEST, "Title and content are required");
    }
    let now = inner.now();
    inner.notes.push(OwnedNote {
        owner,
        note: Note {
            id: NoteId::new(Uuid::new_v4().to_string()),
            title: body.title,
            content: body.content,
            created_at: now,
            updated_at: now,
        },
    });
    (StatusCode::CREATED, Json(json!({ "success": true })))
}

async fn update_note(
    State(shared): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<NoteBody>,
) -> Reply {
    let mut inner = shared.inner.lock().unwrap();
    let Some(owner) = inner.user_for(&headers) else {
        return unauthorized();
    };
    let now = inner.now();
    let Some(entry) = inner
        .notes
        .iter_mut()
        .find(|n| n.owner == owner && n.note.id.as_str() == id)
    else {
        return fail(StatusCode::NOT_FOUND, "Note not found");
    };
    entry.note.title = body.title;
    entry.note.content = body.content;
    entry.note.updated_at = now;
    ok(json!({ "success": true }))
}

async fn delete_notes(
    State(shared): State<Shared>,
    Path(ids): Path<String>,
    headers: HeaderMap,
) -> Reply {
    let mut inner = shared.inner.lock().unwrap();
    let Some(owner) = inner.user_for(&headers) else {
        return unauthorized();
    };
    let ids: Vec<&str> = ids.split(',').collect();
    let before = inner.notes.len();
    inner
        .notes
        .retain(|n| !(n.owner == owner && ids.contains(&n.note.id.as_str())));
    if inner.notes.len() == before {
        return fail(StatusCode::NOT_FOUND, "Note not found");
    }
    ok(json!({ "success": true }))
}

// ============================================================================
// Harness
// ============================================================================

/// A running stub API.
pub struct StubApi {
    pub base_url: String,
    shared: Shared,
}

impl StubApi {
    pub async fn spawn() -> Self {
        let shared = Shared::default();

        let app = Router::new()
            .route("/login", post(login))
            .route("/signup", post(signup))
            .route("/logout", post(logout))
            .route("/user", post(current_user))
            .route("/note", post(create_note).get(list_notes))
            .route("/note/{ids}", delete(delete_notes).put(update_note))
            .layer(middleware::from_fn_with_state(shared.clone(), count_requests))
            .with_state(shared.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            shared,
        }
    }

    pub fn api(&self) -> ApiClient {
        ApiClient::new(&self.base_url).unwrap()
    }

    /// A context backed by `store`.
    pub fn context_with(&self, store: Arc<dyn TokenStore>) -> AppContext {
        AppContext::new(self.api(), store)
    }

    /// A context backed by a fresh in-memory token store.
    pub fn context(&self) -> (AppContext, Arc<MemoryTokenStore>) {
        let store = Arc::new(MemoryTokenStore::new());
        (self.context_with(store.clone()), store)
    }

    /// Register an account directly on the server.
    pub fn seed_user(&self, name: &str, email: &str) -> User {
        let user = User {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
        };
        self.shared.inner.lock().unwrap().accounts.push(Account {
            user: user.clone(),
            password: PASSWORD.to_string(),
        });
        user
    }

    /// Issue a server-side token without going through `/login`.
    pub fn issue_token(&self, user: &User) -> String {
        let token = Uuid::new_v4().to_string();
        self.shared
            .inner
            .lock()
            .unwrap()
            .tokens
            .insert(token.clone(), user.id.clone());
        token
    }

    /// Store a note for `owner` whose timestamps are `updated_secs` after the epoch.
    pub fn seed_note(&self, owner: &User, id: &str, title: &str, updated_secs: i64) -> Note {
        let note = Note {
            id: NoteId::new(id),
            title: title.to_string(),
            content: format!("{title} body"),
            created_at: epoch(),
            updated_at: epoch() + Duration::seconds(updated_secs),
        };
        let mut inner = self.shared.inner.lock().unwrap();
        inner.tick = inner.tick.max(updated_secs);
        inner.notes.push(OwnedNote {
            owner: owner.id.clone(),
            note: note.clone(),
        });
        note
    }

    pub fn server_note(&self, id: &str) -> Option<Note> {
        self.shared
            .inner
            .lock()
            .unwrap()
            .notes
            .iter()
            .find(|n| n.note.id.as_str() == id)
            .map(|n| n.note.clone())
    }

    pub fn token_is_live(&self, token: &str) -> bool {
        self.shared.inner.lock().unwrap().tokens.contains_key(token)
    }

    pub fn request_count(&self) -> usize {
        self.shared.requests.load(Ordering::SeqCst)
    }

    pub fn logouts(&self) -> usize {
        self.shared.inner.lock().unwrap().logouts
    }

    pub fn set_force_unauthorized(&self, on: bool) {
        self.shared.inner.lock().unwrap().force_unauthorized = on;
    }

    pub fn set_reject_user_lookup(&self, on: bool) {
        self.shared.inner.lock().unwrap().reject_user_lookup = on;
    }

    pub fn set_user_lookup_bad_gateway(&self, on: bool) {
        self.shared.inner.lock().unwrap().user_lookup_bad_gateway = on;
    }

    pub fn set_fail_with_500(&self, on: bool) {
        self.shared.inner.lock().unwrap().fail_with_500 = on;
    }
}

/// Spawn a stub with one account and return a context signed in to it.
pub async fn signed_in() -> (StubApi, AppContext, User) {
    let stub = StubApi::spawn().await;
    let user = stub.seed_user("Ada", "ada@example.com");
    let (ctx, _store) = stub.context();
    ctx.session()
        .sign_in("ada@example.com", PASSWORD)
        .await
        .unwrap();
    (stub, ctx, user)
}
