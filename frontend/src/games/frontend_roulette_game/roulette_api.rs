use std::future::Future;
use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use roulette_shared::constants::PLAY_REQUEST_FAILED_MESSAGE;
use roulette_shared::shared_roulette_game::{
    BalanceResponse, CatalogResponse, GameResult, PlayGameRequest, PlayGameResponse, Prize,
};

// Futures are `Send` so a game can be driven from a spawned task.

/// Supplies the prize catalog of a game.
pub trait CatalogSource {
    fn fetch_catalog(
        &self,
        game_id: &str,
    ) -> impl Future<Output = Result<Vec<Prize>, String>> + Send;
}

/// Plays one round server-side. Called exactly once per spin attempt.
/// Implementations own the request timeout.
pub trait PlayService {
    fn play_game(
        &self,
        game_id: &str,
        token: &str,
    ) -> impl Future<Output = Result<GameResult, String>> + Send;
}

/// Fetches the player's balance after a spin.
pub trait BalanceService {
    fn refresh_balance(&self, token: &str) -> impl Future<Output = Result<f64, String>> + Send;
}

/// Game server client speaking JSON over HTTP.
#[derive(Debug, Clone)]
pub struct HttpRouletteApi {
    client: Client,
    base_url: String,
}

impl HttpRouletteApi {
    /// Every request gives up after `timeout`, connect time included.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn catalog_url(&self, game_id: &str) -> String {
        format!("{}/games/{}/prizes", self.base_url, game_id)
    }

    pub fn play_url(&self, game_id: &str) -> String {
        format!("{}/games/{}/play", self.base_url, game_id)
    }

    pub fn balance_url(&self) -> String {
        format!("{}/users/me/balance", self.base_url)
    }
}

impl CatalogSource for HttpRouletteApi {
    async fn fetch_catalog(&self, game_id: &str) -> Result<Vec<Prize>, String> {
        let response = self
            .client
            .get(self.catalog_url(game_id))
            .send()
            .await
            .map_err(|e| format!("Network error: {}", e))?;

        let catalog = ok_or_status(response)
            .await?
            .json::<CatalogResponse>()
            .await
            .map_err(|e| format!("Error parsing catalog response: {}", e))?;
        Ok(catalog.prizes)
    }
}

impl PlayService for HttpRouletteApi {
    async fn play_game(&self, game_id: &str, token: &str) -> Result<GameResult, String> {
        let request = PlayGameRequest {
            game_id: game_id.to_string(),
        };
        let response = self
            .client
            .post(self.play_url(game_id))
            .bearer_auth(token)
            .json(&request)
            .send()
            .await
            .map_err(|e| format!("Network error: {}", e))?;

        let play = ok_or_status(response)
            .await?
            .json::<PlayGameResponse>()
            .await
            .map_err(|e| format!("Error parsing play response: {}", e))?;
        play_outcome(play)
    }
}

impl BalanceService for HttpRouletteApi {
    async fn refresh_balance(&self, token: &str) -> Result<f64, String> {
        let response = self
            .client
            .get(self.balance_url())
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| format!("Network error: {}", e))?;

        let balance = ok_or_status(response)
            .await?
            .json::<BalanceResponse>()
            .await
            .map_err(|e| format!("Error parsing balance response: {}", e))?;
        Ok(balance.balance)
    }
}

/// A `success: false` body is a business error carrying the server message.
pub fn play_outcome(play: PlayGameResponse) -> Result<GameResult, String> {
    match (play.success, play.result) {
        (true, Some(result)) => Ok(result),
        (true, None) => Err("Play response carried no result".to_string()),
        (false, _) => Err(play
            .message
            .unwrap_or_else(|| PLAY_REQUEST_FAILED_MESSAGE.to_string())),
    }
}

async fn ok_or_status(response: Response) -> Result<Response, String> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(error_message(status, &body))
}

/// Prefers the server's `{"error": ...}` body over the bare status line.
fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("error")
                .or_else(|| value.get("message"))
                .and_then(|v| v.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| format!("Error status: {}", status))
}
