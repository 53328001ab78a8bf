use std::process::ExitCode;

use roulette_frontend::config::GameConfig;
use roulette_frontend::{logging, HttpRouletteApi, RouletteGame, TerminalView};
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    logging::setup();

    let config = GameConfig::from_env();
    if let Err(e) = config.spin.validate() {
        error!("{}", e);
        return ExitCode::FAILURE;
    }

    let api = match HttpRouletteApi::new(&config.api_base_url, config.request_timeout) {
        Ok(api) => api,
        Err(e) => {
            error!("Failed to build HTTP client: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let mut game = RouletteGame::new(api, TerminalView::default(), config);

    if let Err(e) = game.load_catalog().await {
        error!("{}", e);
        return ExitCode::FAILURE;
    }
    if !game.can_spin() {
        error!("Spinning is unavailable: log in and make sure the game has active prizes");
        return ExitCode::FAILURE;
    }

    match game.spin().await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Spin failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
