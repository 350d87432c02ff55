//! # Tile Map Query
//!
//! Maps larger than 32×32 tiles are stored as consecutive 32×32 screen
//! blocks ("pages"), each 0x400 entries:
//!
//! ```text
//! 64×32:  [ 0 | 1 ]          32×64:  [ 0 ]
//!                                    [ 1 ]
//! 64×64:  [ 0 | 1 ]
//!         [ 2 | 3 ]
//! ```
//!
//! [`lookup_tile`] turns a screen pixel plus scroll into the tile under it,
//! wrapping around the map in both directions. It is the collision oracle:
//! callers decide which tile values are solid.

use log::warn;
use tilebrawl_hal::MapSize;

pub const TILE_SIZE: i64 = 8;
/// Tiles along one side of a screen block.
pub const PAGE_TILES: usize = 32;
/// Entries in one screen block.
pub const PAGE_ENTRIES: usize = PAGE_TILES * PAGE_TILES;

/// Read-only tile grid in screen-block order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TileMap<'a> {
    tiles: &'a [u16],
    size: MapSize,
}

impl<'a> TileMap<'a> {
    /// `None` unless the dimensions are a screen-block layout and `tiles`
    /// holds every entry.
    pub fn new(tiles: &'a [u16], width: usize, height: usize) -> Option<Self> {
        let size = MapSize::from_tiles(width, height)?;
        if tiles.len() < width * height {
            warn!(
                "tile map has {} entries, {}x{} needs {}",
                tiles.len(),
                width,
                height,
                width * height
            );
            return None;
        }
        Some(Self { tiles, size })
    }

    /// Const constructor for statically known maps; fails to compile (or
    /// panics) when `tiles` is too short.
    pub const fn with_size(tiles: &'a [u16], size: MapSize) -> Self {
        assert!(tiles.len() >= size.width_tiles() * size.height_tiles());
        Self { tiles, size }
    }

    pub const fn width_tiles(&self) -> usize {
        self.size.width_tiles()
    }

    pub const fn height_tiles(&self) -> usize {
        self.size.height_tiles()
    }

    /// Size code for the layer control word.
    pub const fn map_size(&self) -> MapSize {
        self.size
    }

    /// 2 KiB blocks needed to hold the whole map.
    pub const fn screen_blocks(&self) -> usize {
        self.size.screen_blocks()
    }

    /// Every entry, in the order they are uploaded to screen blocks.
    pub fn tiles(&self) -> &'a [u16] {
        &self.tiles[..self.width_tiles() * self.height_tiles()]
    }

    pub fn lookup(&self, pixel_x: i32, pixel_y: i32, scroll_x: i32, scroll_y: i32) -> u16 {
        lookup_tile(
            pixel_x,
            pixel_y,
            scroll_x,
            scroll_y,
            self.tiles,
            self.width_tiles(),
            self.height_tiles(),
        )
    }
}

/// Entry index of tile `(tile_x, tile_y)`, both already wrapped into the map.
pub const fn page_index(
    mut tile_x: usize,
    mut tile_y: usize,
    width: usize,
    height: usize,
) -> usize {
    let mut offset = 0;

    if width == 64 && tile_x >= PAGE_TILES {
        tile_x -= PAGE_TILES;
        offset += PAGE_ENTRIES;
    }

    if height == 64 && tile_y >= PAGE_TILES {
        tile_y -= PAGE_TILES;
        // the lower row sits after both upper pages on a double-wide map
        offset += if width == 64 { 2 * PAGE_ENTRIES } else { PAGE_ENTRIES };
    }

    tile_y * PAGE_TILES + tile_x + offset
}

/// Tile under screen pixel `(pixel_x, pixel_y)` with the layer scrolled by
/// `(scroll_x, scroll_y)`.
///
/// Coordinates wrap around the map, so any integer input is valid and the
/// result repeats every `width * 8` pixels horizontally and `height * 8`
/// vertically.
pub fn lookup_tile(
    pixel_x: i32,
    pixel_y: i32,
    scroll_x: i32,
    scroll_y: i32,
    map: &[u16],
    width: usize,
    height: usize,
) -> u16 {
    debug_assert!(width > 0 && height > 0);

    // widen first so pixel + scroll cannot overflow
    let x = (i64::from(pixel_x) + i64::from(scroll_x)).div_euclid(TILE_SIZE);
    let y = (i64::from(pixel_y) + i64::from(scroll_y)).div_euclid(TILE_SIZE);

    let tile_x = x.rem_euclid(width as i64) as usize;
    let tile_y = y.rem_euclid(height as i64) as usize;

    let index = page_index(tile_x, tile_y, width, height);
    debug_assert!(index < map.len(), "tile {index} outside a {}-entry map", map.len());
    map.get(index).copied().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng, rngs::StdRng};

    use super::*;

    /// A map whose every entry holds its own index.
    fn indexed(width: usize, height: usize) -> Vec<u16> {
        (0..width * height).map(|i| i as u16).collect()
    }

    #[test]
    fn single_page_is_row_major() {
        let map = indexed(32, 32);
        assert_eq!(lookup_tile(0, 0, 0, 0, &map, 32, 32), 0);
        assert_eq!(lookup_tile(8, 0, 0, 0, &map, 32, 32), 1);
        assert_eq!(lookup_tile(7, 7, 0, 0, &map, 32, 32), 0);
        assert_eq!(lookup_tile(3 * 8, 2 * 8, 0, 0, &map, 32, 32), 2 * 32 + 3);
    }

    #[test]
    fn scroll_is_added_before_division() {
        let map = indexed(32, 32);
        assert_eq!(lookup_tile(4, 0, 4, 0, &map, 32, 32), 1);
        assert_eq!(lookup_tile(0, 0, 0, 8, &map, 32, 32), 32);
    }

    #[test]
    fn negative_coordinates_wrap() {
        let map = indexed(32, 32);
        // one pixel left of the origin is the last column
        assert_eq!(lookup_tile(-1, 0, 0, 0, &map, 32, 32), 31);
        assert_eq!(lookup_tile(0, -1, 0, 0, &map, 32, 32), 31 * 32);
        assert_eq!(lookup_tile(10, 0, -20, 0, &map, 32, 32), 30);
    }

    #[test]
    fn double_wide_routes_right_half_to_second_page() {
        let map = indexed(64, 32);
        assert_eq!(lookup_tile(31 * 8, 0, 0, 0, &map, 64, 32), 31);
        assert_eq!(lookup_tile(32 * 8, 0, 0, 0, &map, 64, 32), 0x400);
        assert_eq!(lookup_tile(40 * 8, 5 * 8, 0, 0, &map, 64, 32), 0x400 + 5 * 32 + 8);
    }

    #[test]
    fn double_tall_pages() {
        let map = indexed(32, 64);
        assert_eq!(lookup_tile(0, 32 * 8, 0, 0, &map, 32, 64), 0x400);
        assert_eq!(lookup_tile(8, 40 * 8, 0, 0, &map, 32, 64), 0x400 + 8 * 32 + 1);
    }

    #[test]
    fn quad_page_layout() {
        let map = indexed(64, 64);
        assert_eq!(page_index(33, 0, 64, 64), 0x400 + 1);
        assert_eq!(page_index(0, 32, 64, 64), 0x800);
        assert_eq!(page_index(5, 33, 64, 64), 0x800 + 32 + 5);
        assert_eq!(page_index(63, 63, 64, 64), 0xC00 + 31 * 32 + 31);
        assert_eq!(lookup_tile(32 * 8, 32 * 8, 0, 0, &map, 64, 64), 0xC00);
    }

    #[test]
    fn lookup_is_periodic() {
        let mut rng = StdRng::seed_from_u64(11);
        for (width, height) in [(32, 32), (64, 32), (32, 64), (64, 64)] {
            let map = indexed(width, height);
            for _ in 0..200 {
                let x = rng.gen_range(-2000..2000);
                let y = rng.gen_range(-2000..2000);
                let k = rng.gen_range(-50..50);
                let shifted = x + k * width as i32 * 8;
                assert_eq!(
                    lookup_tile(shifted, y, 0, 0, &map, width, height),
                    lookup_tile(x, y, 0, 0, &map, width, height),
                );
                let shifted = y + k * height as i32 * 8;
                assert_eq!(
                    lookup_tile(x, shifted, 0, 0, &map, width, height),
                    lookup_tile(x, y, 0, 0, &map, width, height),
                );
            }
        }
    }

    #[test]
    fn extreme_inputs_terminate() {
        let map = indexed(64, 64);
        let tile = lookup_tile(i32::MAX, i32::MIN, i32::MAX, i32::MIN, &map, 64, 64);
        assert!((tile as usize) < map.len());
    }

    #[test]
    fn constructor_checks_layout() {
        let map = indexed(64, 32);
        assert!(TileMap::new(&map, 64, 32).is_some());
        assert!(TileMap::new(&map, 64, 64).is_none());
        assert!(TileMap::new(&map, 48, 32).is_none());

        let map = TileMap::new(&map, 64, 32).unwrap();
        assert_eq!(map.map_size(), MapSize::S64x32);
        assert_eq!(map.screen_blocks(), 2);
        assert_eq!(map.tiles().len(), 2048);
        assert_eq!(map.lookup(32 * 8, 0, 0, 0), 0x400);
    }
}
