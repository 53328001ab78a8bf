pub mod frontend_roulette_game;
