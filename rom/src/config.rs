/// Inclusive ranges of tile indices that count as solid ground.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SolidTiles(pub &'static [(u16, u16)]);

impl SolidTiles {
    pub fn contains(&self, tile: u16) -> bool {
        self.0.iter().any(|&(lo, hi)| (lo..=hi).contains(&tile))
    }
}

/// Ground and brick tiles of the demo tile set.
pub const DEFAULT_SOLID_TILES: SolidTiles = SolidTiles(&[(1, 6), (12, 17)]);

/// Tuning for one build of the game.
///
/// Velocities and gravity are 8.8 fixed point: a vertical velocity of 256
/// moves one pixel per tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GameConfig {
    pub gravity: i32,
    pub jump_impulse: i32,

    /// Ticks between animation frames while moving.
    pub animation_delay: u32,
    /// Tile-index distance between consecutive animation frames.
    pub animation_stride: u16,
    pub animation_frames: u16,

    /// Gap kept between the player and the screen edge; walking into it scrolls the camera.
    pub player_border: i32,
    pub enemy_border: i32,

    pub starting_health: u8,
    /// Horizontal reach of an attack, in pixels either side.
    pub strike_range: i32,
    /// Ticks of contact between two enemy hits on the player.
    pub enemy_strike_interval: u32,

    /// Busy-wait after each frame.
    pub frame_delay: u32,
    /// Busy-wait between the end of a round and the next one.
    pub round_over_delay: u32,

    pub solid_tiles: SolidTiles,

    pub player_spawn: (i32, i32),
    pub enemy_spawn: (i32, i32),
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            gravity: 50,
            jump_impulse: 1500,
            animation_delay: 8,
            animation_stride: 16,
            animation_frames: 2,
            player_border: 40,
            enemy_border: 0,
            starting_health: 5,
            strike_range: 24,
            enemy_strike_interval: 30,
            frame_delay: 300,
            round_over_delay: 50_000,
            solid_tiles: DEFAULT_SOLID_TILES,
            player_spawn: (100, 40),
            enemy_spawn: (180, 104),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solid_ranges_are_inclusive() {
        let solid = DEFAULT_SOLID_TILES;
        assert!(!solid.contains(0));
        assert!(solid.contains(1));
        assert!(solid.contains(6));
        assert!(!solid.contains(7));
        assert!(!solid.contains(11));
        assert!(solid.contains(12));
        assert!(solid.contains(17));
        assert!(!solid.contains(18));
    }
}
