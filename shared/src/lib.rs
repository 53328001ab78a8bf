pub mod constants;
pub mod error;
pub mod shared_roulette_game;

pub use error::RouletteError;
