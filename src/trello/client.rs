//! HTTP client for the Trello REST API.
//!
//! Every request carries the `key` and `token` query parameters. Timeouts are
//! short and nothing is retried. Board and list lookups are best effort: a
//! failed lookup reads as "not found" and leads to creation.

use std::collections::HashSet;
use std::time::Duration;

use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::models::{RemoteBoard, RemoteCard, RemoteList};

/// Production API root.
pub const DEFAULT_BASE_URL: &str = "https://api.trello.com/1";

/// Card descriptions are cut to this many characters plus `...`.
pub const MAX_DESCRIPTION_CHARS: usize = 4000;

const VERIFY_TIMEOUT: Duration = Duration::from_secs(5);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const CREATE_BOARD_TIMEOUT: Duration = Duration::from_secs(15);

/// HTTP client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: Trello key or token rejected")]
    Unauthorized,

    #[error("Server error: {0}")]
    Server(String),
}

/// The two credential fields sent with every request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub token: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            token: token.into(),
        }
    }

    /// Both fields present and non-blank.
    pub fn is_complete(&self) -> bool {
        !self.api_key.trim().is_empty() && !self.token.trim().is_empty()
    }
}

/// HTTP client for the Trello API.
#[derive(Debug, Clone)]
pub struct TrelloClient {
    base_url: String,
    credentials: Credentials,
    client: Client,
}

impl TrelloClient {
    /// Client against the production API.
    pub fn new(credentials: Credentials) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, credentials)
    }

    /// Client against another API root (a local stand-in in tests).
    pub fn with_base_url(base_url: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
            client: Client::new(),
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Build a request carrying the credential parameters.
    fn request(&self, method: Method, path: &str, timeout: Duration) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client
            .request(method, &url)
            .timeout(timeout)
            .query(&[
                ("key", self.credentials.api_key.as_str()),
                ("token", self.credentials.token.as_str()),
            ])
    }

    /// Handle response, converting HTTP errors to ClientError.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let body = response.text().await.unwrap_or_default();
            match status {
                StatusCode::NOT_FOUND => Err(ClientError::NotFound(body)),
                StatusCode::BAD_REQUEST => Err(ClientError::BadRequest(body)),
                StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized),
                _ => Err(ClientError::Server(format!("{}: {}", status, body))),
            }
        }
    }

    // ============================================================
    // Member
    // ============================================================

    /// `Ok(true)` iff the service answers 200 for the current member. A
    /// transport failure is an error, any other status is `Ok(false)`.
    pub async fn verify_credentials(&self) -> Result<bool, ClientError> {
        let response = self
            .request(Method::GET, "/members/me", VERIFY_TIMEOUT)
            .send()
            .await?;
        let valid = response.status() == StatusCode::OK;
        if !valid {
            tracing::info!("Credential check answered {}", response.status());
        }
        Ok(valid)
    }

    // ============================================================
    // Boards
    // ============================================================

    /// Board with exactly this name among the member's boards.
    pub async fn find_board(&self, name: &str) -> Option<RemoteBoard> {
        match self.list_boards().await {
            Ok(boards) => boards.into_iter().find(|b| b.name == name),
            Err(e) => {
                tracing::warn!("Board lookup failed, will create '{}': {}", name, e);
                None
            }
        }
    }

    pub async fn list_boards(&self) -> Result<Vec<RemoteBoard>, ClientError> {
        let response = self
            .request(Method::GET, "/members/me/boards", REQUEST_TIMEOUT)
            .query(&[("fields", "name,shortUrl")])
            .send()
            .await?;
        self.handle_response(response).await
    }

    pub async fn create_board(&self, name: &str) -> Result<RemoteBoard, ClientError> {
        let response = self
            .request(Method::POST, "/boards/", CREATE_BOARD_TIMEOUT)
            .form(&[
                ("name", name),
                ("defaultLists", "false"),
                ("prefs_background", "blue"),
            ])
            .send()
            .await?;
        let mut board: RemoteBoard = self.handle_response(response).await?;
        if board.name.is_empty() {
            board.name = name.to_string();
        }
        tracing::info!("Created board: {}", board.url);
        Ok(board)
    }

    /// Reuse the board named `name`, or create it.
    pub async fn ensure_board(&self, name: &str) -> Result<RemoteBoard, ClientError> {
        match self.find_board(name).await {
            Some(board) => {
                tracing::info!("Reusing board '{}' ({})", name, board.id);
                Ok(board)
            }
            None => self.create_board(name).await,
        }
    }

    // ============================================================
    // Lists
    // ============================================================

    /// List with exactly this name on the board.
    pub async fn find_list(&self, board_id: &str, name: &str) -> Option<RemoteList> {
        match self.list_lists(board_id).await {
            Ok(lists) => lists.into_iter().find(|l| l.name == name),
            Err(e) => {
                tracing::warn!("List lookup failed, will create '{}': {}", name, e);
                None
            }
        }
    }

    pub async fn list_lists(&self, board_id: &str) -> Result<Vec<RemoteList>, ClientError> {
        let response = self
            .request(
                Method::GET,
                &format!("/boards/{}/lists", board_id),
                REQUEST_TIMEOUT,
            )
            .query(&[("fields", "name")])
            .send()
            .await?;
        self.handle_response(response).await
    }

    pub async fn create_list(&self, board_id: &str, name: &str) -> Result<RemoteList, ClientError> {
        let response = self
            .request(Method::POST, "/lists", REQUEST_TIMEOUT)
            .form(&[("name", name), ("idBoard", board_id), ("pos", "bottom")])
            .send()
            .await?;
        let mut list: RemoteList = self.handle_response(response).await?;
        if list.name.is_empty() {
            list.name = name.to_string();
        }
        Ok(list)
    }

    /// Reuse the list named `name` on the board, or create it.
    pub async fn ensure_list(&self, board_id: &str, name: &str) -> Result<RemoteList, ClientError> {
        match self.find_list(board_id, name).await {
            Some(list) => Ok(list),
            None => self.create_list(board_id, name).await,
        }
    }

    // ============================================================
    // Cards
    // ============================================================

    /// Names of the cards already in a list.
    pub async fn list_card_names(&self, list_id: &str) -> Result<HashSet<String>, ClientError> {
        let response = self
            .request(
                Method::GET,
                &format!("/lists/{}/cards", list_id),
                REQUEST_TIMEOUT,
            )
            .query(&[("fields", "name")])
            .send()
            .await?;
        let cards: Vec<RemoteCard> = self.handle_response(response).await?;
        Ok(cards.into_iter().map(|c| c.name).collect())
    }

    pub async fn create_card(
        &self,
        list_id: &str,
        name: &str,
        description: &str,
    ) -> Result<RemoteCard, ClientError> {
        let description = truncate_description(description);
        let response = self
            .request(Method::POST, "/cards", REQUEST_TIMEOUT)
            .form(&[
                ("idList", list_id),
                ("name", name),
                ("desc", description.as_str()),
                ("pos", "bottom"),
            ])
            .send()
            .await?;
        self.handle_response(response).await
    }
}

/// Cut a description to [`MAX_DESCRIPTION_CHARS`] plus `...`.
pub fn truncate_description(text: &str) -> String {
    if text.chars().count() > MAX_DESCRIPTION_CHARS {
        let head: String = text.chars().take(MAX_DESCRIPTION_CHARS).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}
