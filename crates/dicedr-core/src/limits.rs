//! Fixed limits and timings shared across methods and the engine.

use std::time::Duration;

/// Maximum number of history entries kept; older entries are evicted.
pub const HISTORY_MAX_ITEMS: usize = 20;

/// Minimum number of options a choice-based method needs.
pub const MIN_ITEMS: usize = 2;

/// Maximum number of options a list editor accepts.
pub const MAX_ITEMS: usize = 100;

/// Bounds for the random list pick count.
pub const MIN_PICK_COUNT: u32 = 1;
/// Upper bound for the random list pick count.
pub const MAX_PICK_COUNT: u32 = 10;

/// Bounds applied to dice faces before rolling.
pub const MIN_DICE_VALUE: i64 = -999;
/// Upper bound applied to dice faces before rolling.
pub const MAX_DICE_VALUE: i64 = 999;

/// Wheel spins before settling, as a `[MIN, MAX)` interval.
pub const WHEEL_MIN_SPINS: f64 = 4.0;
/// Upper end of the wheel spin interval.
pub const WHEEL_MAX_SPINS: f64 = 6.0;

/// Number of reels shown by the slot machine.
pub const SLOT_REEL_COUNT: usize = 3;
/// Number of options drawn onto each reel.
pub const SLOT_ITEMS_PER_REEL: usize = 6;

/// Short reveal animation (coin, dice, list picks).
pub const ANIMATION_SHORT: Duration = Duration::from_millis(800);
/// Long spin animation (wheel).
pub const ANIMATION_LONG: Duration = Duration::from_millis(2200);
/// Base spin time of the first slot reel.
pub const SLOT_BASE_DURATION: Duration = Duration::from_millis(1600);
/// Extra spin time added per subsequent slot reel.
pub const SLOT_STAGGER: Duration = Duration::from_millis(200);
/// Time after which the slot machine reports its outcome.
pub const SLOT_SETTLE: Duration = Duration::from_millis(2000);
