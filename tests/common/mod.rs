//! A local stand-in for the Trello REST API, recording every call.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Form, Json, Router,
};
use serde_json::{json, Value};

pub const TEST_KEY: &str = "test-key";
pub const TEST_TOKEN: &str = "test-token";

#[derive(Debug, Clone, PartialEq)]
pub struct MockCard {
    pub id: String,
    pub list_id: String,
    pub name: String,
    pub desc: String,
}

#[derive(Debug, Default)]
pub struct MockState {
    /// `"METHOD /path"` for every request received, in order.
    pub calls: Vec<String>,
    /// (id, name, shortUrl)
    pub boards: Vec<(String, String, String)>,
    /// (id, board id, name)
    pub lists: Vec<(String, String, String)>,
    pub cards: Vec<MockCard>,
    pub fail_cards: bool,
    pub fail_board_lookup: bool,
    pub fail_list_lookup: bool,
    next_id: u32,
}

impl MockState {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}{}", prefix, self.next_id)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MockTrello {
    state: Arc<Mutex<MockState>>,
}

impl MockTrello {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_board(self, name: &str, short_url: &str) -> (Self, String) {
        let id = {
            let mut state = self.lock();
            let id = state.next_id("board");
            state
                .boards
                .push((id.clone(), name.to_string(), short_url.to_string()));
            id
        };
        (self, id)
    }

    pub fn with_list(self, board_id: &str, name: &str) -> (Self, String) {
        let id = {
            let mut state = self.lock();
            let id = state.next_id("list");
            state
                .lists
                .push((id.clone(), board_id.to_string(), name.to_string()));
            id
        };
        (self, id)
    }

    pub fn with_card(self, list_id: &str, name: &str) -> Self {
        {
            let mut state = self.lock();
            let id = state.next_id("card");
            state.cards.push(MockCard {
                id,
                list_id: list_id.to_string(),
                name: name.to_string(),
                desc: String::new(),
            });
        }
        self
    }

    pub fn failing_cards(self) -> Self {
        self.lock().fail_cards = true;
        self
    }

    pub fn failing_board_lookup(self) -> Self {
        self.lock().fail_board_lookup = true;
        self
    }

    pub fn failing_list_lookup(self) -> Self {
        self.lock().fail_list_lookup = true;
        self
    }

    pub fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().expect("mock state lock poisoned")
    }

    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.lock().calls.iter().filter(|c| *c == call).count()
    }

    pub fn cards(&self) -> Vec<MockCard> {
        self.lock().cards.clone()
    }

    /// Serve on an ephemeral local port and return the base URL.
    pub async fn start(&self) -> String {
        let app = Router::new()
            .route("/members/me", get(member))
            .route("/members/me/boards", get(boards))
            .route("/boards/", post(create_board))
            .route("/boards/{id}/lists", get(lists))
            .route("/lists", post(create_list))
            .route("/lists/{id}/cards", get(cards))
            .route("/cards", post(create_card))
            .with_state(self.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock Trello");
        let addr = listener.local_addr().expect("Failed to read mock address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Mock Trello crashed");
        });
        format!("http://{}", addr)
    }

    fn record(&self, call: String) {
        self.lock().calls.push(call);
    }
}

type Params = Query<HashMap<String, String>>;

fn authorized(params: &HashMap<String, String>) -> bool {
    params.get("key").map(String::as_str) == Some(TEST_KEY)
        && params.get("token").map(String::as_str) == Some(TEST_TOKEN)
}

async fn member(State(mock): State<MockTrello>, Query(params): Params) -> (StatusCode, Json<Value>) {
    mock.record("GET /members/me".to_string());
    if authorized(&params) {
        (StatusCode::OK, Json(json!({ "id": "me" })))
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({ "message": "invalid token" })))
    }
}

fn lookup_failed() -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "message": "lookup unavailable" })),
    )
}

async fn boards(State(mock): State<MockTrello>) -> (StatusCode, Json<Value>) {
    mock.record("GET /members/me/boards".to_string());
    let state = mock.lock();
    if state.fail_board_lookup {
        return lookup_failed();
    }
    let boards: Vec<Value> = state
        .boards
        .iter()
        .map(|(id, name, url)| json!({ "id": id, "name": name, "shortUrl": url }))
        .collect();
    (StatusCode::OK, Json(Value::Array(boards)))
}

async fn create_board(
    State(mock): State<MockTrello>,
    Form(form): Form<HashMap<String, String>>,
) -> Json<Value> {
    mock.record("POST /boards/".to_string());
    let mut state = mock.lock();
    let id = state.next_id("board");
    let name = form.get("name").cloned().unwrap_or_default();
    let url = format!("https://trello.com/b/{}", id);
    state.boards.push((id.clone(), name.clone(), url.clone()));
    Json(json!({ "id": id, "name": name, "shortUrl": url }))
}

async fn lists(
    State(mock): State<MockTrello>,
    Path(board_id): Path<String>,
) -> (StatusCode, Json<Value>) {
    mock.record(format!("GET /boards/{}/lists", board_id));
    let state = mock.lock();
    if state.fail_list_lookup {
        return lookup_failed();
    }
    let lists: Vec<Value> = state
        .lists
        .iter()
        .filter(|(_, board, _)| *board == board_id)
        .map(|(id, _, name)| json!({ "id": id, "name": name }))
        .collect();
    (StatusCode::OK, Json(Value::Array(lists)))
}

async fn create_list(
    State(mock): State<MockTrello>,
    Form(form): Form<HashMap<String, String>>,
) -> Json<Value> {
    mock.record("POST /lists".to_string());
    let mut state = mock.lock();
    let id = state.next_id("list");
    let name = form.get("name").cloned().unwrap_or_default();
    let board = form.get("idBoard").cloned().unwrap_or_default();
    state.lists.push((id.clone(), board, name.clone()));
    Json(json!({ "id": id, "name": name }))
}

async fn cards(State(mock): State<MockTrello>, Path(list_id): Path<String>) -> Json<Value> {
    mock.record(format!("GET /lists/{}/cards", list_id));
    let cards: Vec<Value> = mock
        .lock()
        .cards
        .iter()
        .filter(|card| card.list_id == list_id)
        .map(|card| json!({ "id": card.id, "name": card.name }))
        .collect();
    Json(Value::Array(cards))
}

async fn create_card(
    State(mock): State<MockTrello>,
    Form(form): Form<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    mock.record("POST /cards".to_string());
    let mut state = mock.lock();
    if state.fail_cards {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "card service down" })),
        );
    }
    let id = state.next_id("card");
    let card = MockCard {
        id: id.clone(),
        list_id: form.get("idList").cloned().unwrap_or_default(),
        name: form.get("name").cloned().unwrap_or_default(),
        desc: form.get("desc").cloned().unwrap_or_default(),
    };
    let name = card.name.clone();
    state.cards.push(card);
    (StatusCode::OK, Json(json!({ "id": id, "name": name })))
}
