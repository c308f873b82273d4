use std::time::Duration;

/// Time between two scheduled refresh passes
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Wait inserted after each holding within a pass
pub const DEFAULT_PACING_DELAY: Duration = Duration::from_secs(1);

/// Decimal precision for display
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;
