use std::time::Duration;

use log::debug;
use rand::Rng;

use super::{
    expand, reconcile, GameResult, GameState, Prize, ReelCell, RevealTimer, SpinPlan,
    SpinSettings, SpinSummary,
};
use crate::RouletteError;

/// State machine for one game session.
///
/// `idle -> loading -> spinning -> completed`, with `completed -> loading` on
/// replay and `loading -> idle` when the play request fails. Every mutation
/// goes through the transition methods. A spin in flight cannot be
/// restarted or reset, only run out or [`abandon`](Self::abandon)ed.
#[derive(Debug, Clone)]
pub struct RouletteSession {
    state: GameState,
    settings: SpinSettings,
    reel: Vec<ReelCell>,
    landing: Option<usize>,
    plan: Option<SpinPlan>,
    result: Option<GameResult>,
    timer: Option<RevealTimer>,
    summary: Option<SpinSummary>,
}

impl RouletteSession {
    pub fn new(settings: SpinSettings) -> Self {
        Self {
            state: GameState::Idle,
            settings,
            reel: Vec::new(),
            landing: None,
            plan: None,
            result: None,
            timer: None,
            summary: None,
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn settings(&self) -> &SpinSettings {
        &self.settings
    }

    pub fn reel(&self) -> &[ReelCell] {
        &self.reel
    }

    pub fn landing(&self) -> Option<&ReelCell> {
        self.landing.and_then(|index| self.reel.get(index))
    }

    pub fn plan(&self) -> Option<&SpinPlan> {
        self.plan.as_ref()
    }

    pub fn result(&self) -> Option<&GameResult> {
        self.result.as_ref()
    }

    pub fn summary(&self) -> Option<&SpinSummary> {
        self.summary.as_ref()
    }

    /// Time left before the outcome may be revealed.
    pub fn reveal_remaining(&self) -> Option<Duration> {
        self.timer.as_ref().map(RevealTimer::remaining)
    }

    /// Current eased reel offset while spinning.
    pub fn current_offset(&self) -> Option<f64> {
        match (self.state, self.plan.as_ref(), self.timer.as_ref()) {
            (GameState::Spinning, Some(plan), Some(timer)) => Some(plan.offset_at(timer.elapsed())),
            (GameState::Completed, Some(plan), _) => Some(plan.target_offset),
            _ => None,
        }
    }

    /// `idle|completed -> loading`. Checked before any network call is made.
    pub fn request_spin(
        &mut self,
        authenticated: bool,
        catalog: Option<&[Prize]>,
    ) -> Result<(), RouletteError> {
        if !self.state.accepts_spin() {
            return Err(self.invalid("spin"));
        }
        if !authenticated {
            return Err(RouletteError::NotAuthenticated);
        }
        match catalog {
            Some(prizes) if prizes.iter().any(|prize| prize.is_active) => {}
            _ => return Err(RouletteError::CatalogUnavailable),
        }
        self.settings.validate()?;

        self.clear_spin();
        self.transition(GameState::Loading);
        Ok(())
    }

    /// `loading -> spinning` once the authoritative result is in. Builds the
    /// reel, picks the landing cell and arms the reveal timer. On failure the
    /// session drops back to idle.
    pub fn begin_spin<R: Rng + ?Sized>(
        &mut self,
        result: GameResult,
        catalog: &[Prize],
        rng: &mut R,
    ) -> Result<&SpinPlan, RouletteError> {
        if self.state != GameState::Loading {
            return Err(self.invalid("start spinning"));
        }

        let mut reel = expand(catalog, rng);
        let planned = reconcile(&result, &mut reel, rng)
            .and_then(|index| SpinPlan::compute(index, reel.len(), &self.settings));
        let plan = match planned {
            Ok(plan) => plan,
            Err(err) => {
                self.clear_spin();
                self.transition(GameState::Idle);
                return Err(err);
            }
        };

        self.reel = reel;
        self.landing = Some(plan.landing_index);
        self.result = Some(result);
        self.timer = Some(RevealTimer::new(plan.duration));
        self.transition(GameState::Spinning);
        Ok(self.plan.insert(plan))
    }

    /// `loading -> idle` when the play request did not produce a result.
    pub fn fail_request(&mut self) -> Result<(), RouletteError> {
        if self.state != GameState::Loading {
            return Err(self.invalid("abort the play request"));
        }
        self.clear_spin();
        self.transition(GameState::Idle);
        Ok(())
    }

    /// Advances the reveal timer. Returns the summary on the step that moves
    /// the session to `completed`.
    pub fn advance(&mut self, step: Duration) -> Result<Option<SpinSummary>, RouletteError> {
        if self.state != GameState::Spinning {
            return Err(self.invalid("advance the reveal"));
        }
        let elapsed = match self.timer.as_mut() {
            Some(timer) => timer.advance(step),
            None => true,
        };
        if !elapsed {
            return Ok(None);
        }

        let (Some(result), Some(landing)) = (self.result.as_ref(), self.landing()) else {
            return Err(RouletteError::NoLandingCellFound);
        };
        let summary = SpinSummary {
            is_winner: result.is_winner,
            amount_won: result.amount_won,
            prize_name: result.prize.as_ref().map(|prize| prize.name.clone()),
            landing: landing.clone(),
        };
        self.summary = Some(summary.clone());
        self.transition(GameState::Completed);
        Ok(Some(summary))
    }

    /// Back to `idle`, e.g. when the player navigates away. Refused while a
    /// request or spin is in flight.
    pub fn reset(&mut self) -> Result<(), RouletteError> {
        if !self.state.accepts_spin() {
            return Err(self.invalid("reset"));
        }
        self.clear_spin();
        self.transition(GameState::Idle);
        Ok(())
    }

    /// Drops an in-flight request or spin and goes back to `idle` without
    /// revealing anything. For when whoever was driving the spin went away.
    pub fn abandon(&mut self) {
        if matches!(self.state, GameState::Loading | GameState::Spinning) {
            self.clear_spin();
            self.transition(GameState::Idle);
        }
    }

    fn clear_spin(&mut self) {
        self.reel.clear();
        self.landing = None;
        self.plan = None;
        self.result = None;
        self.timer = None;
        self.summary = None;
    }

    fn transition(&mut self, next: GameState) {
        debug!("Roulette session {} -> {}", self.state, next);
        self.state = next;
    }

    fn invalid(&self, action: &'static str) -> RouletteError {
        RouletteError::InvalidTransition {
            from: self.state,
            action,
        }
    }
}

impl Default for RouletteSession {
    fn default() -> Self {
        Self::new(SpinSettings::default())
    }
}
