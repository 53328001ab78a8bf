pub mod config;
pub mod games;
pub mod logging;

pub use games::frontend_roulette_game::{
    BalanceService, CatalogSource, HttpRouletteApi, PlayService, RouletteGame, RouletteView,
    TerminalView,
};
