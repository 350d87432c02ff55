//! # Entities
//!
//! The player and the enemy share one body model:
//!
//! ```text
//!            directional input                 tile under feet solid
//!   Idle  ─────────────────────▶  Moving       Falling ───────────▶ Grounded
//!         ◀─────────────────────                       ◀───────────
//!            no input this tick                 tile under feet empty
//! ```
//!
//! Horizontal motion and vertical motion are independent. Positions are
//! screen pixels; vertical velocity and gravity are 8.8 fixed point.

use tilebrawl_hal::SCREEN_WIDTH;

use crate::{
    config::{GameConfig, SolidTiles},
    game::Scroll,
    sprite::{SpriteRef, SpriteSize, SpriteTable},
    tilemap::TileMap,
};

/// Health lost per hit.
pub const HIT_DAMAGE: u8 = 1;

pub const ENTITY_SIZE: SpriteSize = SpriteSize::S16x32;

/// Health after one hit; never below zero.
pub fn damage(health: u8) -> u8 {
    health.saturating_sub(HIT_DAMAGE)
}

/// A round ends the tick either side's health reaches zero.
pub fn is_over(player_health: u8, enemy_health: u8) -> bool {
    player_health == 0 || enemy_health == 0
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Motion {
    Idle,
    Moving,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    pub const fn turned(self) -> Self {
        match self {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        }
    }
}

/// Result of a one-pixel horizontal step.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Step {
    Moved,
    /// At the border; the entity stayed put. The player's camera scrolls instead.
    Blocked,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entity {
    pub x: i32,
    pub y: i32,
    /// 8.8 fixed point, positive is down.
    pub velocity: i32,
    pub gravity: i32,

    /// Tile offset of the visible animation frame, relative to `base_tile`.
    pub frame: u16,
    pub animation_delay: u32,
    pub counter: u32,
    pub motion: Motion,

    pub border: i32,
    pub falling: bool,
    pub health: u8,
    pub facing: Facing,

    pub size: SpriteSize,
    pub base_tile: u16,
    pub sprite: SpriteRef,

    animation_stride: u16,
    animation_frames: u16,
}

impl Entity {
    /// Fresh entity with a newly allocated sprite.
    pub fn spawn(
        sprites: &mut SpriteTable,
        config: &GameConfig,
        (x, y): (i32, i32),
        base_tile: u16,
        border: i32,
    ) -> Self {
        let sprite = sprites.allocate(x, y, ENTITY_SIZE, false, false, base_tile, 0);
        Self {
            x,
            y,
            velocity: 0,
            gravity: config.gravity,
            frame: 0,
            animation_delay: config.animation_delay,
            counter: 0,
            motion: Motion::Idle,
            border,
            falling: false,
            health: config.starting_health,
            facing: Facing::Right,
            size: ENTITY_SIZE,
            base_tile,
            sprite,
            animation_stride: config.animation_stride,
            animation_frames: config.animation_frames.max(1),
        }
    }

    /// Leftmost x the entity may reach.
    pub fn left_limit(&self) -> i32 {
        self.border
    }

    /// Rightmost x the entity may reach.
    pub fn right_limit(&self) -> i32 {
        SCREEN_WIDTH - self.size.width() - self.border
    }

    /// Screen pixel just below the middle of the sprite.
    pub fn feet(&self) -> (i32, i32) {
        (self.x + self.size.width() / 2, self.y + self.size.height())
    }

    pub fn left(&mut self, sprites: &mut SpriteTable) -> Step {
        self.face(sprites, Facing::Left);
        if self.x <= self.left_limit() {
            return Step::Blocked;
        }
        self.x -= 1;
        Step::Moved
    }

    pub fn right(&mut self, sprites: &mut SpriteTable) -> Step {
        self.face(sprites, Facing::Right);
        if self.x >= self.right_limit() {
            return Step::Blocked;
        }
        self.x += 1;
        Step::Moved
    }

    fn face(&mut self, sprites: &mut SpriteTable, facing: Facing) {
        self.facing = facing;
        sprites.set_horizontal_flip(self.sprite, facing == Facing::Left);
        if self.motion == Motion::Idle {
            self.frame = 0;
            // one tick short of the delay, so the walk cycle starts next tick
            self.counter = self.animation_delay.saturating_sub(1);
        }
        self.motion = Motion::Moving;
    }

    /// Back to idle on the standing frame.
    pub fn stop(&mut self, sprites: &mut SpriteTable) {
        self.motion = Motion::Idle;
        self.frame = 0;
        self.counter = self.animation_delay.saturating_sub(1);
        sprites.set_tile_offset(self.sprite, self.base_tile);
    }

    /// Leave the ground with the configured impulse. Ignored mid-air.
    pub fn jump(&mut self, impulse: i32) {
        if !self.falling {
            self.velocity = -impulse;
            self.falling = true;
        }
    }

    /// Advance the walk cycle while moving.
    pub fn animate(&mut self, sprites: &mut SpriteTable) {
        if self.motion != Motion::Moving {
            return;
        }
        self.counter += 1;
        if self.counter >= self.animation_delay {
            let cycle = self.animation_stride * self.animation_frames;
            self.frame = (self.frame + self.animation_stride) % cycle.max(1);
            self.counter = 0;
            sprites.set_tile_offset(self.sprite, self.base_tile + self.frame);
        }
    }

    /// Integrate one tick of free fall.
    pub fn fall(&mut self) {
        if self.falling {
            self.velocity += self.gravity;
            self.y += self.velocity >> 8;
        }
    }

    /// Land on `tile` if it is solid, otherwise start (or keep) falling.
    pub fn ground(&mut self, tile: u16, solid: &SolidTiles) {
        if solid.contains(tile) {
            self.falling = false;
            self.velocity = 0;
            self.y &= !0b11;
        } else {
            self.falling = true;
        }
    }

    pub fn tile_under_feet(&self, map: &TileMap<'_>, scroll: Scroll) -> u16 {
        let (x, y) = self.feet();
        map.lookup(x, y, scroll.x, scroll.y)
    }

    /// Copy the position into the sprite descriptor.
    pub fn sync_sprite(&self, sprites: &mut SpriteTable) {
        sprites.set_position(self.sprite, self.x, self.y);
    }

    pub fn take_hit(&mut self) {
        self.health = damage(self.health);
    }

    /// Attack reach: within `range` pixels horizontally, with this entity's
    /// feet at or below the other's head.
    pub fn can_reach(&self, other: &Entity, range: i32) -> bool {
        (self.x - other.x).abs() <= range && self.feet().1 >= other.y
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    pub entity: Entity,
}

impl Player {
    pub const BASE_TILE: u16 = 0;

    pub fn spawn(sprites: &mut SpriteTable, config: &GameConfig) -> Self {
        Self {
            entity: Entity::spawn(
                sprites,
                config,
                config.player_spawn,
                Self::BASE_TILE,
                config.player_border,
            ),
        }
    }

    /// Gravity, then ground check against the collision layer.
    pub fn update_vertical(&mut self, map: &TileMap<'_>, scroll: Scroll, solid: &SolidTiles) {
        // a ledge walked off this tick is seen by ground(); gravity starts next tick
        self.entity.fall();
        let tile = self.entity.tile_under_feet(map, scroll);
        self.entity.ground(tile, solid);
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Enemy {
    pub entity: Entity,
    /// Ticks spent in contact with the player since the last strike.
    pub strike_timer: u32,
}

impl Enemy {
    pub const BASE_TILE: u16 = 32;

    pub fn spawn(sprites: &mut SpriteTable, config: &GameConfig) -> Self {
        let mut entity = Entity::spawn(
            sprites,
            config,
            config.enemy_spawn,
            Self::BASE_TILE,
            config.enemy_border,
        );
        entity.facing = Facing::Left;
        sprites.set_horizontal_flip(entity.sprite, true);
        Self {
            entity,
            strike_timer: 0,
        }
    }

    /// Ground check only; the enemy never free-falls.
    pub fn settle(&mut self, map: &TileMap<'_>, scroll: Scroll, solid: &SolidTiles) {
        let tile = self.entity.tile_under_feet(map, scroll);
        self.entity.ground(tile, solid);
    }

    /// Walk one pixel in the facing direction, turning around at either edge.
    pub fn pace(&mut self, sprites: &mut SpriteTable) {
        let facing = self.entity.facing;
        let step = match facing {
            Facing::Left => self.entity.left(sprites),
            Facing::Right => self.entity.right(sprites),
        };

        let at_edge = match facing {
            Facing::Left => self.entity.x <= self.entity.left_limit(),
            Facing::Right => self.entity.x >= self.entity.right_limit(),
        };

        if step == Step::Blocked || at_edge {
            let turned = facing.turned();
            self.entity.facing = turned;
            sprites.set_horizontal_flip(self.entity.sprite, turned == Facing::Left);
        }
    }

    /// Count a tick of contact; returns true when the enemy lands a hit.
    pub fn strike(&mut self, in_contact: bool, interval: u32) -> bool {
        if !in_contact {
            self.strike_timer = 0;
            return false;
        }
        self.strike_timer += 1;
        if self.strike_timer >= interval.max(1) {
            self.strike_timer = 0;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_SOLID_TILES;

    fn spawn_at(x: i32, y: i32, border: i32) -> (SpriteTable, Entity) {
        let mut sprites = SpriteTable::new();
        let config = GameConfig::default();
        let entity = Entity::spawn(&mut sprites, &config, (x, y), 0, border);
        (sprites, entity)
    }

    #[test]
    fn damage_saturates() {
        assert_eq!(damage(5), 4);
        assert_eq!(damage(1), 0);
        assert_eq!(damage(0), 0);
    }

    #[test]
    fn round_over_when_either_side_is_out() {
        assert!(!is_over(1, 5));
        assert!(is_over(0, 5));
        assert!(is_over(5, 0));
        assert!(is_over(0, 0));
    }

    #[test]
    fn left_at_border_is_blocked() {
        let (mut sprites, mut e) = spawn_at(40, 0, 40);
        assert_eq!(e.left(&mut sprites), Step::Blocked);
        assert_eq!(e.x, 40);
        assert_eq!(e.motion, Motion::Moving);
        assert!(sprites.get(e.sprite).horizontal_flip());
    }

    #[test]
    fn left_one_inside_border_moves() {
        let (mut sprites, mut e) = spawn_at(41, 0, 40);
        assert_eq!(e.left(&mut sprites), Step::Moved);
        assert_eq!(e.x, 40);
    }

    #[test]
    fn right_limit_accounts_for_width() {
        let (mut sprites, mut e) = spawn_at(240 - 16 - 40, 0, 40);
        assert_eq!(e.right(&mut sprites), Step::Blocked);
        assert_eq!(e.x, 184);
        assert!(!sprites.get(e.sprite).horizontal_flip());

        e.x = 183;
        assert_eq!(e.right(&mut sprites), Step::Moved);
        assert_eq!(e.x, 184);
    }

    #[test]
    fn walk_cycle() {
        let (mut sprites, mut e) = spawn_at(100, 0, 40);
        let _ = e.right(&mut sprites);
        // counter primed one short of the delay: first tick advances
        e.animate(&mut sprites);
        assert_eq!(e.frame, 16);
        assert_eq!(sprites.get(e.sprite).tile_index(), 16);

        for _ in 0..7 {
            e.animate(&mut sprites);
        }
        assert_eq!(e.frame, 16);
        e.animate(&mut sprites);
        assert_eq!(e.frame, 0);
        assert_eq!(sprites.get(e.sprite).tile_index(), 0);
    }

    #[test]
    fn stop_resets_to_standing_frame() {
        let (mut sprites, mut e) = spawn_at(100, 0, 40);
        let _ = e.right(&mut sprites);
        e.animate(&mut sprites);
        e.stop(&mut sprites);
        assert_eq!(e.motion, Motion::Idle);
        assert_eq!(e.frame, 0);
        assert_eq!(sprites.get(e.sprite).tile_index(), 0);

        // idle entities do not animate
        e.animate(&mut sprites);
        assert_eq!(sprites.get(e.sprite).tile_index(), 0);
    }

    #[test]
    fn landing_snaps_to_four_pixels() {
        let (_, mut e) = spawn_at(100, 107, 40);
        e.falling = true;
        e.velocity = 900;
        e.ground(3, &DEFAULT_SOLID_TILES);
        assert!(!e.falling);
        assert_eq!(e.velocity, 0);
        assert_eq!(e.y, 104);
    }

    #[test]
    fn gravity_is_fixed_point() {
        let (_, mut e) = spawn_at(100, 0, 40);
        e.ground(0, &DEFAULT_SOLID_TILES);
        assert!(e.falling);
        e.fall();
        assert_eq!(e.velocity, 50);
        assert_eq!(e.y, 0);
        e.velocity = 250;
        e.fall();
        assert_eq!(e.velocity, 300);
        assert_eq!(e.y, 1);
    }

    #[test]
    fn walking_off_a_ledge_falls_from_the_next_tick() {
        let tiles = [0u16; 32 * 32];
        let map = TileMap::new(&tiles, 32, 32).unwrap();
        let mut sprites = SpriteTable::new();
        let mut player = Player::spawn(&mut sprites, &GameConfig::default());
        player.entity.falling = false;
        player.entity.velocity = 0;

        player.update_vertical(&map, Scroll::default(), &DEFAULT_SOLID_TILES);
        assert!(player.entity.falling);
        assert_eq!(player.entity.velocity, 0);

        player.update_vertical(&map, Scroll::default(), &DEFAULT_SOLID_TILES);
        assert_eq!(player.entity.velocity, 50);
    }

    #[test]
    fn jump_only_from_ground() {
        let (_, mut e) = spawn_at(100, 104, 40);
        e.jump(1500);
        assert!(e.falling);
        assert_eq!(e.velocity, -1500);
        e.velocity = -200;
        e.jump(1500);
        assert_eq!(e.velocity, -200);
    }

    #[test]
    fn reach_window() {
        let (mut sprites, a) = spawn_at(100, 104, 40);
        let config = GameConfig::default();
        let mut b = Entity::spawn(&mut sprites, &config, (124, 104), 32, 0);
        assert!(a.can_reach(&b, 24));
        b.x = 125;
        assert!(!a.can_reach(&b, 24));
        b.x = 76;
        assert!(a.can_reach(&b, 24));
        // player high above the enemy's head
        b.x = 100;
        b.y = 104 + 33;
        assert!(!a.can_reach(&b, 24));
    }

    #[test]
    fn enemy_turns_at_left_edge() {
        let mut sprites = SpriteTable::new();
        let config = GameConfig::default();
        let mut enemy = Enemy::spawn(&mut sprites, &config);
        enemy.entity.x = 0;
        assert_eq!(enemy.entity.facing, Facing::Left);

        enemy.pace(&mut sprites);
        assert_eq!(enemy.entity.x, 0);
        assert_eq!(enemy.entity.facing, Facing::Right);
        assert!(!sprites.get(enemy.entity.sprite).horizontal_flip());

        enemy.pace(&mut sprites);
        assert_eq!(enemy.entity.x, 1);
    }

    #[test]
    fn enemy_turns_on_reaching_right_edge() {
        let mut sprites = SpriteTable::new();
        let config = GameConfig::default();
        let mut enemy = Enemy::spawn(&mut sprites, &config);
        enemy.entity.facing = Facing::Right;
        enemy.entity.x = enemy.entity.right_limit() - 1;

        enemy.pace(&mut sprites);
        assert_eq!(enemy.entity.x, 224);
        assert_eq!(enemy.entity.facing, Facing::Left);
        assert!(sprites.get(enemy.entity.sprite).horizontal_flip());
    }

    #[test]
    fn enemy_strike_cadence() {
        let mut sprites = SpriteTable::new();
        let mut enemy = Enemy::spawn(&mut sprites, &GameConfig::default());
        assert!(!enemy.strike(true, 3));
        assert!(!enemy.strike(true, 3));
        assert!(enemy.strike(true, 3));
        assert!(!enemy.strike(true, 3));
        assert!(!enemy.strike(false, 3));
        assert_eq!(enemy.strike_timer, 0);
    }
}
