//! # Frame Loop
//!
//! One [`Game::tick`] is one displayed frame:
//!
//! ```text
//!  1. player gravity + ground check      ┐
//!  2. input: walk / jump / camera scroll │ simulation, any time
//!  3. enemy ground check + pacing        │
//!  4. combat                             │
//!  5. round over? hold, clear, respawn   ┘
//!  6. wait for vblank                    ┐
//!  7. commit scroll (layer 1 at 2x)      │ inside vblank
//!  8. flush sprite table                 ┘
//!  9. pacing delay
//! ```
//!
//! Scroll registers and sprite attributes are only written between steps
//! 6 and 8. Everything before that works on RAM state owned by [`Game`].

use log::{debug, info};
use tilebrawl_hal::{BgControl, Buttons, Device, DisplayControl, Gamepad, Region, Register};

use crate::{
    assets::Assets,
    config::GameConfig,
    entity::{Enemy, Motion, Player, Step, is_over},
    sprite::SpriteTable,
};

/// Character block holding the background tile images.
pub const BG_CHAR_BLOCK: u8 = 0;
/// First screen block of each layer's map. Layer 0 is 64×32 and takes two.
pub const LAYER_SCREEN_BLOCKS: [u8; 2] = [16, 24];

/// Camera offset in pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Scroll {
    pub x: i32,
    pub y: i32,
}

impl Scroll {
    /// Offset of the backdrop layer, which moves twice as fast.
    pub const fn parallax(self) -> Scroll {
        Scroll {
            x: self.x.wrapping_mul(2),
            y: self.y.wrapping_mul(2),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    Running,
    /// The round just ended; held for `round_over_delay` before respawning.
    RoundOver,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RoundOutcome {
    PlayerWon,
    EnemyWon,
    /// Both fell on the same tick.
    Draw,
}

impl RoundOutcome {
    fn decide(player_health: u8, enemy_health: u8) -> Self {
        match (player_health, enemy_health) {
            (0, 0) => RoundOutcome::Draw,
            (_, 0) => RoundOutcome::PlayerWon,
            _ => RoundOutcome::EnemyWon,
        }
    }
}

/// What happened during one tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TickReport {
    /// Frame number of the tick, counting from 0.
    pub frame: u32,
    pub phase: Phase,
    pub outcome: Option<RoundOutcome>,
    /// Rounds finished so far, including one ending this tick.
    pub round: u32,
}

pub struct Game<'a> {
    pub config: GameConfig,
    pub assets: &'a Assets<'a>,
    pub sprites: SpriteTable,
    pub player: Player,
    pub enemy: Enemy,
    pub scroll: Scroll,
    pub gamepad: Gamepad,
    pub phase: Phase,
    pub round: u32,
    pub frame: u32,
}

impl<'a> Game<'a> {
    pub fn new(assets: &'a Assets<'a>, config: GameConfig) -> Self {
        let mut sprites = SpriteTable::new();
        let player = Player::spawn(&mut sprites, &config);
        let enemy = Enemy::spawn(&mut sprites, &config);
        Self {
            config,
            assets,
            sprites,
            player,
            enemy,
            scroll: Scroll::default(),
            gamepad: Gamepad::new(),
            phase: Phase::Running,
            round: 0,
            frame: 0,
        }
    }

    pub fn display_control() -> DisplayControl {
        DisplayControl::MODE_0
            | DisplayControl::OBJ_MAP_1D
            | DisplayControl::bg(0)
            | DisplayControl::bg(1)
            | DisplayControl::OBJ
    }

    /// Upload assets, configure both layers and show the first frame.
    pub fn setup<D: Device>(&mut self, device: &mut D) {
        let assets = self.assets;
        device.write_register(Register::DisplayControl, DisplayControl::FORCED_BLANK.bits());

        debug!(
            "uploading {} bg tiles, {} obj words",
            assets.bg_tile_count(),
            assets.obj_tiles.len()
        );
        device.bulk_copy(Region::BgPalette, assets.bg_palette);
        device.bulk_copy(Region::ObjPalette, assets.obj_palette);
        device.bulk_copy(Region::CharBlock(BG_CHAR_BLOCK), assets.bg_tiles);
        device.bulk_copy(Region::ObjTiles, assets.obj_tiles);

        for (layer, (map, block)) in assets.layers.iter().zip(LAYER_SCREEN_BLOCKS).enumerate() {
            let layer = layer as u8;
            device.bulk_copy(Region::ScreenBlock(block), map.tiles());

            let control = BgControl::new()
                .priority(layer)
                .char_block(BG_CHAR_BLOCK)
                .color_256(true)
                .screen_block(block)
                .wrap(true)
                .size(map.map_size());
            device.write_register(Register::BgControl(layer), control.bits());
            debug!(
                "layer {layer}: {:?} map in screen blocks {}..{}",
                map.map_size(),
                block,
                block as usize + map.screen_blocks()
            );
        }

        self.respawn();

        device.wait_vblank();
        self.commit_scroll(device);
        self.sprites.flush(device);
        device.write_register(Register::DisplayControl, Self::display_control().bits());
        info!("setup done, {} sprites live", self.sprites.len());
    }

    /// Never returns; the round cycle is the whole program.
    pub fn run<D: Device>(&mut self, device: &mut D) -> ! {
        loop {
            self.tick(device);
        }
    }

    pub fn tick<D: Device>(&mut self, device: &mut D) -> TickReport {
        let frame = self.frame;
        let assets = self.assets;
        let map = assets.collision_layer();
        let solid = self.config.solid_tiles;

        self.player.update_vertical(map, self.scroll, &solid);

        self.gamepad.update(device.poll_input());
        self.steer_player();

        self.enemy.settle(map, self.scroll, &solid);
        self.enemy.pace(&mut self.sprites);
        self.enemy.entity.animate(&mut self.sprites);
        self.enemy.entity.sync_sprite(&mut self.sprites);

        self.resolve_combat();

        let mut phase = Phase::Running;
        let mut outcome = None;
        if is_over(self.player.entity.health, self.enemy.entity.health) {
            phase = Phase::RoundOver;
            outcome = Some(self.finish_round(device));
        }

        device.wait_vblank();
        self.commit_scroll(device);
        self.sprites.flush(device);

        device.delay(self.config.frame_delay);
        self.frame = self.frame.wrapping_add(1);

        TickReport {
            frame,
            phase,
            outcome,
            round: self.round,
        }
    }

    fn steer_player(&mut self) {
        let entity = &mut self.player.entity;

        if self.gamepad.is_pressed(Buttons::LEFT) {
            if entity.left(&mut self.sprites) == Step::Blocked {
                self.scroll.x = self.scroll.x.wrapping_sub(1);
                debug!("left border, scroll {}", self.scroll.x);
            }
        } else if self.gamepad.is_pressed(Buttons::RIGHT) {
            if entity.right(&mut self.sprites) == Step::Blocked {
                self.scroll.x = self.scroll.x.wrapping_add(1);
                debug!("right border, scroll {}", self.scroll.x);
            }
        } else if entity.motion == Motion::Moving {
            entity.stop(&mut self.sprites);
        }

        if self.gamepad.just_pressed(Buttons::UP) {
            entity.jump(self.config.jump_impulse);
        }

        entity.animate(&mut self.sprites);
        entity.sync_sprite(&mut self.sprites);
    }

    fn resolve_combat(&mut self) {
        let in_contact = self
            .player
            .entity
            .can_reach(&self.enemy.entity, self.config.strike_range);

        if in_contact && self.gamepad.is_pressed(Buttons::A) {
            self.enemy.entity.take_hit();
            debug!("player hits, enemy health {}", self.enemy.entity.health);
        }

        if self.enemy.strike(in_contact, self.config.enemy_strike_interval) {
            self.player.entity.take_hit();
            debug!("enemy hits, player health {}", self.player.entity.health);
        }
    }

    fn finish_round<D: Device>(&mut self, device: &mut D) -> RoundOutcome {
        self.phase = Phase::RoundOver;
        let outcome = RoundOutcome::decide(self.player.entity.health, self.enemy.entity.health);
        info!("round {} over: {:?}", self.round + 1, outcome);

        self.enemy.entity.stop(&mut self.sprites);
        device.delay(self.config.round_over_delay);

        self.respawn();
        self.round += 1;
        self.phase = Phase::Running;
        outcome
    }

    /// Empty the sprite pool and start both fighters over. Scroll is kept.
    pub fn respawn(&mut self) {
        self.sprites.clear_all();
        self.player = Player::spawn(&mut self.sprites, &self.config);
        self.enemy = Enemy::spawn(&mut self.sprites, &self.config);
    }

    fn commit_scroll<D: Device>(&self, device: &mut D) {
        let layers = [self.scroll, self.scroll.parallax()];
        for (layer, scroll) in layers.into_iter().enumerate() {
            let layer = layer as u8;
            device.write_register(Register::BgHScroll(layer), scroll.x as u16);
            device.write_register(Register::BgVScroll(layer), scroll.y as u16);
        }
    }
}
