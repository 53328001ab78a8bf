mod roulette_api;
mod roulette_view;

use rand::rngs::StdRng;
use rand::SeedableRng;
use roulette_shared::shared_roulette_game::{GameState, Prize, RouletteSession, SpinSummary};
use roulette_shared::RouletteError;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::config::GameConfig;

pub use roulette_api::{play_outcome, BalanceService, CatalogSource, HttpRouletteApi, PlayService};
pub use roulette_view::{RouletteView, TerminalView};

/// Drives one game session: catalog, play call, reveal and balance refresh.
///
/// Methods take `&mut self`, so a session never runs two of them at once;
/// the session state machine rejects spins while one is still in flight.
/// A `spin` future dropped part way (timeout, `select!`) leaves the session
/// `loading` or `spinning`; the next `spin`, `resume` or `reset` settles it.
pub struct RouletteGame<A, V> {
    api: A,
    view: V,
    config: GameConfig,
    session: RouletteSession,
    catalog: Option<Vec<Prize>>,
    balance: Option<f64>,
    rng: StdRng,
    reveal_deadline: Option<Instant>,
}

impl<A, V> RouletteGame<A, V>
where
    A: CatalogSource + PlayService + BalanceService,
    V: RouletteView,
{
    pub fn new(api: A, view: V, config: GameConfig) -> Self {
        Self::with_rng(api, view, config, StdRng::from_entropy())
    }

    /// Uses the given random source for reel shuffling and loss placement.
    pub fn with_rng(api: A, view: V, config: GameConfig, rng: StdRng) -> Self {
        let session = RouletteSession::new(config.spin);
        Self {
            api,
            view,
            config,
            session,
            catalog: None,
            balance: None,
            rng,
            reveal_deadline: None,
        }
    }

    pub fn state(&self) -> GameState {
        self.session.state()
    }

    pub fn session(&self) -> &RouletteSession {
        &self.session
    }

    pub fn catalog(&self) -> Option<&[Prize]> {
        self.catalog.as_deref()
    }

    pub fn balance(&self) -> Option<f64> {
        self.balance
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Whether the spin affordance should be enabled. No spin is running
    /// while `&self` is borrowed, so a `loading` or `spinning` state seen here
    /// is a dropped one that `spin` settles first.
    pub fn can_spin(&self) -> bool {
        self.session.settings().validate().is_ok()
            && self.config.is_authenticated()
            && self
                .catalog
                .as_ref()
                .is_some_and(|prizes| prizes.iter().any(|prize| prize.is_active))
    }

    pub async fn load_catalog(&mut self) -> Result<(), RouletteError> {
        match self.api.fetch_catalog(&self.config.game_id).await {
            Ok(prizes) => {
                info!(
                    "Loaded {} prizes for game {}",
                    prizes.len(),
                    self.config.game_id
                );
                self.catalog = Some(prizes);
                Ok(())
            }
            Err(message) => {
                error!("Failed to load catalog for game {}: {}", self.config.game_id, message);
                self.catalog = None;
                Err(RouletteError::CatalogUnavailable)
            }
        }
    }

    /// Plays one round and reveals it. Resolves once the reel has stopped and
    /// the balance refresh has been attempted.
    pub async fn spin(&mut self) -> Result<SpinSummary, RouletteError> {
        self.resume().await?;
        self.session
            .request_spin(self.config.is_authenticated(), self.catalog.as_deref())?;
        self.view.on_state(GameState::Loading);

        let token = self.config.auth_token.clone().unwrap_or_default();
        let result = match self.api.play_game(&self.config.game_id, &token).await {
            Ok(result) => result,
            Err(message) => {
                warn!("Play request for game {} failed: {}", self.config.game_id, message);
                self.session.fail_request()?;
                return Err(self.surface(RouletteError::PlayRequestFailed(message)));
            }
        };
        info!(
            "Play result for game {}: winner={} amount={}",
            self.config.game_id, result.is_winner, result.amount_won
        );

        let catalog = self.catalog.as_deref().unwrap_or_default();
        let begun = self
            .session
            .begin_spin(result, catalog, &mut self.rng)
            .map(|plan| (plan.target_offset, plan.duration));
        match begun {
            Ok((offset, duration)) => {
                debug!("Spin planned, target offset {:.1}", offset);
                self.reveal_deadline = Some(Instant::now() + duration);
            }
            Err(err) => {
                error!("Could not place the result on the reel: {}", err);
                let err = self.surface(err);
                // The round was still played server-side.
                self.refresh_balance().await;
                return Err(err);
            }
        }

        if let (Some(landing), Some(plan)) = (self.session.landing(), self.session.plan()) {
            self.view.on_spin(self.session.reel(), landing, plan);
        }
        self.view.on_state(GameState::Spinning);

        self.finish_reveal().await
    }

    /// Settles a spin whose `spin` call was dropped before it finished. A
    /// pending play request goes back to idle; a started reveal waits out
    /// whatever is left of its delay and completes. Returns the summary in
    /// that last case.
    pub async fn resume(&mut self) -> Result<Option<SpinSummary>, RouletteError> {
        match self.session.state() {
            GameState::Loading => {
                warn!("Dropping interrupted play request for game {}", self.config.game_id);
                self.session.fail_request()?;
                self.view.on_state(GameState::Idle);
                // The round may have been played before the call was dropped.
                self.refresh_balance().await;
                Ok(None)
            }
            GameState::Spinning => {
                info!("Resuming interrupted reveal for game {}", self.config.game_id);
                self.finish_reveal().await.map(Some)
            }
            GameState::Idle | GameState::Completed => Ok(None),
        }
    }

    /// Leaves the game, clearing the finished spin. A spin left behind by a
    /// dropped `spin` call is abandoned without being revealed.
    pub fn reset(&mut self) -> Result<(), RouletteError> {
        if !self.session.state().accepts_spin() {
            warn!("Abandoning interrupted spin for game {}", self.config.game_id);
            self.session.abandon();
        }
        self.reveal_deadline = None;
        self.session.reset()?;
        self.view.on_state(GameState::Idle);
        Ok(())
    }

    async fn finish_reveal(&mut self) -> Result<SpinSummary, RouletteError> {
        let summary = self.reveal().await?;
        self.reveal_deadline = None;
        self.view.on_state(GameState::Completed);
        self.view.on_completed(&summary);

        self.refresh_balance().await;
        Ok(summary)
    }

    /// Waits out the reveal delay in frame steps. Only the timer decides
    /// when the session completes; it is kept level with the clock so time
    /// spent without a driver still counts.
    async fn reveal(&mut self) -> Result<SpinSummary, RouletteError> {
        let frame = self.config.frame_interval;
        let deadline = match self.reveal_deadline {
            Some(deadline) => deadline,
            None => {
                let remaining = self.session.reveal_remaining().unwrap_or_default();
                *self.reveal_deadline.insert(Instant::now() + remaining)
            }
        };
        loop {
            let left = deadline.saturating_duration_since(Instant::now());
            let step = if frame.is_zero() { left } else { frame.min(left) };
            tokio::time::sleep(step).await;

            let left = deadline.saturating_duration_since(Instant::now());
            let behind = self
                .session
                .reveal_remaining()
                .unwrap_or_default()
                .saturating_sub(left);
            if let Some(summary) = self.session.advance(behind)? {
                debug!("Reveal finished for game {}", self.config.game_id);
                return Ok(summary);
            }
            if let Some(offset) = self.session.current_offset() {
                self.view.on_frame(offset);
            }
        }
    }

    async fn refresh_balance(&mut self) {
        let Some(token) = self.config.auth_token.as_deref() else {
            return;
        };
        match self.api.refresh_balance(token).await {
            Ok(balance) => {
                self.balance = Some(balance);
                self.view.on_balance(balance);
            }
            Err(message) => {
                let err = RouletteError::BalanceRefreshFailed(message);
                warn!("{}", err);
            }
        }
    }

    fn surface(&mut self, err: RouletteError) -> RouletteError {
        self.view.on_state(self.session.state());
        self.view.on_error(&err);
        err
    }
}
