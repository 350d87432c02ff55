use tilebrawl::{DEMO_ASSETS, Game, GameConfig};
use tilebrawl_hal::{BgControl, Register};
use tilebrawl_sim::{InputScript, InputSource, RunSummary, SimDevice, run_frames};

fn start(config: GameConfig, input: InputSource) -> (Game<'static>, SimDevice) {
    let mut device = SimDevice::new(input);
    let mut game = Game::new(&DEMO_ASSETS, config);
    game.setup(&mut device);
    (game, device)
}

fn scripted(script: &str) -> InputSource {
    let script: InputScript = script.parse().unwrap();
    InputSource::Script(script)
}

fn one_hit_config() -> GameConfig {
    GameConfig {
        starting_health: 1,
        ..GameConfig::default()
    }
}

#[test]
fn setup_uploads_assets_and_enables_display() {
    let (_, device) = start(GameConfig::default(), InputSource::Idle);

    assert_eq!(device.register(Register::DisplayControl), Game::display_control().bits());
    assert_eq!(device.bg_palette(), &DEMO_ASSETS.bg_palette[..]);
    assert_eq!(device.obj_palette(), &DEMO_ASSETS.obj_palette[..]);

    let ground = DEMO_ASSETS.layers[0];
    let layer0 = BgControl(device.register(Register::BgControl(0)));
    assert_eq!(layer0.get_size(), ground.map_size());
    let block = tilebrawl_hal::Region::ScreenBlock(layer0.get_screen_block());
    assert_eq!(&device.region(block)[..ground.tiles().len()], ground.tiles());

    assert_eq!(device.visible_sprites(), 2);
    assert_eq!(device.stats().tearing, 0);
}

#[test]
fn sprite_table_is_flushed_once_per_vblank() {
    let (mut game, mut device) = start(GameConfig::default(), InputSource::mash(3));
    let summary = run_frames(&mut game, &mut device, 300);

    assert_eq!(summary.stats.oam_flushes, 301);
    assert_eq!(summary.stats.vblanks, 301);
    assert_eq!(summary.stats.tearing, 0);
    assert_eq!(summary.stats.double_flushes, 0);
    assert_eq!(summary.stats.overruns, 0);
}

#[test]
fn player_falls_onto_the_grass() {
    let (mut game, mut device) = start(GameConfig::default(), InputSource::Idle);
    let summary = run_frames(&mut game, &mut device, 60);

    let y = summary.player.y;
    assert_eq!(y % 4, 0);
    assert!((104..=108).contains(&y), "player at y={y}");
    assert!(!game.player.entity.falling);

    let sprite = device.sprite(game.player.entity.sprite.index());
    assert_eq!((sprite.x(), sprite.y()), (summary.player.x, y));
}

#[test]
fn holding_left_past_the_border_scrolls_with_parallax() {
    let (mut game, mut device) = start(GameConfig::default(), scripted("0-199:LEFT"));
    let summary = run_frames(&mut game, &mut device, 200);

    // 60 frames to walk from 100 to the border at 40, then 140 of scrolling
    assert_eq!(summary.player.x, 40);
    assert_eq!(summary.scroll_x, -140);
    assert_eq!(device.scroll(0), ((-140i32) as u16, 0));
    assert_eq!(device.scroll(1), ((-280i32) as u16, 0));
    assert!(device.sprite(0).horizontal_flip());
}

#[test]
fn enemy_turns_around_at_the_left_edge() {
    let config = GameConfig {
        starting_health: 50,
        ..GameConfig::default()
    };
    let (mut game, mut device) = start(config, InputSource::Idle);
    let summary = run_frames(&mut game, &mut device, 200);

    // reaches x=0 on frame 179, then walks back right
    assert_eq!(summary.rounds, 0);
    assert_eq!(summary.enemy.x, 20);
    assert!(!device.sprite(game.enemy.entity.sprite.index()).horizontal_flip());
}

#[test]
fn attack_in_range_wins_the_round() {
    // the enemy walks into reach around frame 55
    let (mut game, mut device) = start(one_hit_config(), scripted("60:A"));
    let summary = run_frames(&mut game, &mut device, 61);

    assert_eq!(summary.rounds, 1);
    assert_eq!(summary.player_wins, 1);
    assert_eq!((summary.player.x, summary.player.y), game.config.player_spawn);
    assert_eq!(summary.enemy.health, 1);
    assert_eq!(game.sprites.len(), 2);
    assert_eq!(device.visible_sprites(), 2);
    assert!(summary.stats.delay_units >= u64::from(game.config.round_over_delay));
}

#[test]
fn attack_out_of_range_misses() {
    let (mut game, mut device) = start(one_hit_config(), scripted("30:A"));
    let summary = run_frames(&mut game, &mut device, 40);
    assert_eq!(summary.rounds, 0);
    assert_eq!(summary.enemy.health, 1);
}

#[test]
fn idle_player_is_beaten_by_contact() {
    let (mut game, mut device) = start(one_hit_config(), InputSource::Idle);
    let summary = run_frames(&mut game, &mut device, 100);

    assert_eq!(summary.rounds, 1);
    assert_eq!(summary.enemy_wins, 1);
    assert_eq!(summary.player.health, 1);
}

#[test]
fn mashing_is_deterministic() {
    let run = |seed| -> RunSummary {
        let (mut game, mut device) = start(GameConfig::default(), InputSource::mash(seed));
        run_frames(&mut game, &mut device, 500)
    };
    assert_eq!(run(9), run(9));
}

#[test]
fn holding_attack_in_reach_hits_every_frame() {
    let (mut game, mut device) = start(GameConfig::default(), scripted("60-63:A"));
    run_frames(&mut game, &mut device, 60);
    assert_eq!(game.enemy.entity.health, 5);

    game.enemy.entity.x = game.player.entity.x;
    let summary = run_frames(&mut game, &mut device, 4);
    assert_eq!(summary.rounds, 0);
    assert_eq!(summary.enemy.health, 1);
    assert_eq!(summary.player.health, 5);
}
