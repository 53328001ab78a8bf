use std::str::FromStr;
use std::time::Duration;

use roulette_shared::shared_roulette_game::SpinSettings;
use tracing::warn;

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:3000";
pub const DEFAULT_GAME_ID: &str = "roulette";
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(50);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub api_base_url: String,
    pub game_id: String,
    /// Bearer token for the play and balance calls. `None` means logged out.
    pub auth_token: Option<String>,
    pub spin: SpinSettings,
    /// Step between animation frames while the reel is spinning.
    pub frame_interval: Duration,
    /// Upper bound on each call to the game server.
    pub request_timeout: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            game_id: DEFAULT_GAME_ID.to_string(),
            auth_token: None,
            spin: SpinSettings::default(),
            frame_interval: DEFAULT_FRAME_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl GameConfig {
    /// Reads `ROULETTE_*` variables, after loading `.env` if there is one.
    pub fn from_env() -> Self {
        dotenvy::from_path(".env").ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let api_base_url = non_empty("ROULETTE_API_BASE_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_base_url);
        let game_id = non_empty("ROULETTE_GAME_ID").unwrap_or(defaults.game_id);
        let auth_token = non_empty("ROULETTE_AUTH_TOKEN");

        let spin = SpinSettings {
            cell_width: parse_or(&lookup, "ROULETTE_CELL_WIDTH", defaults.spin.cell_width),
            track_width: parse_or(&lookup, "ROULETTE_TRACK_WIDTH", defaults.spin.track_width),
            pre_roll_laps: parse_or(&lookup, "ROULETTE_PRE_ROLL_LAPS", defaults.spin.pre_roll_laps),
            duration: Duration::from_millis(parse_or(
                &lookup,
                "ROULETTE_SPIN_DURATION_MS",
                defaults.spin.duration.as_millis() as u64,
            )),
        };
        let frame_interval = Duration::from_millis(parse_or(
            &lookup,
            "ROULETTE_FRAME_INTERVAL_MS",
            defaults.frame_interval.as_millis() as u64,
        ));
        let request_timeout = Duration::from_millis(parse_or(
            &lookup,
            "ROULETTE_REQUEST_TIMEOUT_MS",
            defaults.request_timeout.as_millis() as u64,
        ));

        Self {
            api_base_url,
            game_id,
            auth_token,
            spin,
            frame_interval,
            request_timeout,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth_token.is_some()
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: FromStr + Copy,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring unparseable {}={:?}, using default", key, raw);
            default
        }),
        None => default,
    }
}
