use std::time::Duration;

// Rarity thresholds, closed lower bounds.
pub const LEGENDARY_MIN_VALUE: f64 = 1000.0;
pub const EPIC_MIN_VALUE: f64 = 100.0;
pub const RARE_MIN_VALUE: f64 = 10.0;

// Reel cells per prize for each rarity tier.
pub const COMMON_REPETITIONS: u32 = 8;
pub const RARE_REPETITIONS: u32 = 4;
pub const EPIC_REPETITIONS: u32 = 2;
pub const LEGENDARY_REPETITIONS: u32 = 1;

// Presentation defaults for the spin animation
pub const DEFAULT_CELL_WIDTH: f64 = 120.0;
pub const DEFAULT_TRACK_WIDTH: f64 = 600.0;
pub const DEFAULT_PRE_ROLL_LAPS: u32 = 3;
pub const DEFAULT_SPIN_DURATION: Duration = Duration::from_millis(4000);

pub const PLAY_REQUEST_FAILED_MESSAGE: &str = "Failed to process spin";
pub const NOT_AUTHENTICATED_MESSAGE: &str = "Please log in to play";
pub const CATALOG_UNAVAILABLE_MESSAGE: &str = "Prizes are not available right now";
