use std::io::Write;

use roulette_shared::shared_roulette_game::{
    format_amount, GameState, ReelCell, SpinPlan, SpinSummary,
};
use roulette_shared::RouletteError;

/// Render side of the game. Receives every transition and what it needs to
/// animate the reel.
pub trait RouletteView {
    fn on_state(&mut self, state: GameState);

    /// The reel is built and the landing cell chosen; the animation starts.
    fn on_spin(&mut self, reel: &[ReelCell], landing: &ReelCell, plan: &SpinPlan);

    /// Reel offset for one animation frame.
    fn on_frame(&mut self, _offset: f64) {}

    fn on_completed(&mut self, summary: &SpinSummary);

    fn on_error(&mut self, error: &RouletteError);

    fn on_balance(&mut self, _balance: f64) {}
}

/// Draws the game as plain text on stdout.
#[derive(Debug, Default)]
pub struct TerminalView {
    reel: Vec<ReelCell>,
    plan: Option<SpinPlan>,
    last_cell: Option<usize>,
}

impl TerminalView {
    fn cell_label(cell: &ReelCell) -> String {
        format!("[{} {} · {}]", cell.name, format_amount(cell.value), cell.rarity)
    }
}

impl RouletteView for TerminalView {
    fn on_state(&mut self, state: GameState) {
        match state {
            GameState::Idle => {}
            GameState::Loading => println!("🎰 Requesting spin..."),
            GameState::Spinning => println!("🎰 Spinning..."),
            GameState::Completed => println!(),
        }
    }

    fn on_spin(&mut self, reel: &[ReelCell], _landing: &ReelCell, plan: &SpinPlan) {
        self.reel = reel.to_vec();
        self.plan = Some(*plan);
        self.last_cell = None;
    }

    fn on_frame(&mut self, offset: f64) {
        let Some(plan) = self.plan.as_ref() else {
            return;
        };
        let index = plan.cell_under_pointer(offset);
        if self.last_cell == Some(index) {
            return;
        }
        self.last_cell = Some(index);
        if let Some(cell) = self.reel.get(index) {
            print!("\r{:<48}", Self::cell_label(cell));
            let _ = std::io::stdout().flush();
        }
    }

    fn on_completed(&mut self, summary: &SpinSummary) {
        println!("▶ {}", Self::cell_label(&summary.landing));
        if summary.is_winner {
            let prize = summary.prize_name.as_deref().unwrap_or("a prize");
            println!("🎉 You won {} ({})!", prize, summary.display_amount());
        } else {
            println!("No win this time.");
        }
    }

    fn on_error(&mut self, error: &RouletteError) {
        println!("⚠️ {}", error.user_message());
    }

    fn on_balance(&mut self, balance: f64) {
        println!("💰 Balance: {}", format_amount(balance));
    }
}
