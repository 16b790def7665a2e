//! Centralized rule and tuning constants for encumbrance calculations.
//!
//! These values define the carrying-capacity math and the settings surface
//! shared with the host. Keeping them together means the rules can only be
//! adjusted through reviewed code changes.

// Settings namespace -------------------------------------------------------
pub const MODULE_ID: &str = "custom-variant-encumbrance";
pub const SETTING_ENCUMBERED_THRESHOLD: &str = "encumberedThresholdImperial";
pub const SETTING_HEAVILY_ENCUMBERED_THRESHOLD: &str = "heavilyEncumberedThresholdImperial";
pub const SETTING_MAXIMUM_THRESHOLD: &str = "maximumThresholdImperial";
pub const SETTING_COUNT_UNEQUIPPED: &str = "countUnequippedItems";
pub const SETTING_SCOPE_WORLD: &str = "world";

// Setting defaults (pounds) ------------------------------------------------
pub const DEFAULT_ENCUMBERED_THRESHOLD: f64 = 5.0;
pub const DEFAULT_HEAVILY_ENCUMBERED_THRESHOLD: f64 = 10.0;
pub const DEFAULT_MAXIMUM_THRESHOLD: f64 = 15.0;
pub const DEFAULT_COUNT_UNEQUIPPED: bool = true;

// Carrying capacity --------------------------------------------------------
pub const CARRY_CAPACITY_PER_STRENGTH: f64 = 15.0;
pub const DEFAULT_STRENGTH: f64 = 10.0;
pub const POWERFUL_BUILD_BONUS: f64 = 1.0;
pub const DEFAULT_CAPACITY_MULTIPLIER: f64 = 1.0;

// Size capacity multipliers ------------------------------------------------
pub(crate) const CAPACITY_TINY: f64 = 0.5;
pub(crate) const CAPACITY_SMALL: f64 = 1.0;
pub(crate) const CAPACITY_MEDIUM: f64 = 1.0;
pub(crate) const CAPACITY_LARGE: f64 = 2.0;
pub(crate) const CAPACITY_HUGE: f64 = 4.0;
pub(crate) const CAPACITY_GARGANTUAN: f64 = 8.0;

// Units and display --------------------------------------------------------
pub const LBS_PER_KG: f64 = 2.20462;
pub const WEIGHT_DISPLAY_PLACES: u32 = 1;
pub const METRIC_DISPLAY_PLACES: u32 = 2;
pub const PERCENT_MIN: f64 = 0.0;
pub const PERCENT_MAX: f64 = 100.0;

// Item property tags -------------------------------------------------------
pub const WEIGHTLESS_CONTENTS_TAG: &str = "weightlessContents";

// Status tags --------------------------------------------------------------
pub const STATUS_ENCUMBERED: &str = "encumbered";
pub const STATUS_HEAVILY_ENCUMBERED: &str = "heavilyEncumbered";
pub const STATUS_EXCEEDING_CAPACITY: &str = "exceedingCarryingCapacity";

// Logging targets ----------------------------------------------------------
pub(crate) const LOG_TARGET: &str = "encumbrance";
