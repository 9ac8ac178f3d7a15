/// Elapsed time counts this many times over when fast mode is on.
pub const FAST_MODE_MULTIPLIER: u64 = 10;

/// One difficulty tier.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Level {
    pub name: &'static str,
    pub delay_ms: u64,
    pub line_points: u32,
    pub block_points: u32,
    pub tick_points: u32,
    /// Seconds of play after which this level becomes current.
    pub unlock_after: u64,
}

/// Ordered by `unlock_after`, ascending.
pub static LEVELS: [Level; 5] = [
    Level {
        name: "A",
        delay_ms: 250,
        line_points: 100,
        block_points: 10,
        tick_points: 0,
        unlock_after: 0,
    },
    Level {
        name: "B",
        delay_ms: 200,
        line_points: 200,
        block_points: 20,
        tick_points: 1,
        unlock_after: 180,
    },
    Level {
        name: "C",
        delay_ms: 150,
        line_points: 300,
        block_points: 30,
        tick_points: 2,
        unlock_after: 360,
    },
    Level {
        name: "D",
        delay_ms: 100,
        line_points: 500,
        block_points: 50,
        tick_points: 3,
        unlock_after: 720,
    },
    Level {
        name: "E",
        delay_ms: 50,
        line_points: 1000,
        block_points: 100,
        tick_points: 4,
        unlock_after: 1500,
    },
];

/// Last level in the table whose threshold has passed. Elapsed seconds are
/// floored before the fast-mode multiplier applies.
pub fn level_for(elapsed: f64, fast: bool) -> &'static Level {
    let mut effective = elapsed.max(0.0).floor() as u64;
    if fast {
        effective *= FAST_MODE_MULTIPLIER;
    }
    LEVELS
        .iter()
        .filter(|level| level.unlock_after <= effective)
        .last()
        .unwrap_or(&LEVELS[0])
}
