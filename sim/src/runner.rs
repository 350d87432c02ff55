use std::fmt;

use log::info;
use tilebrawl::{Game, RoundOutcome};

use crate::device::{SimDevice, SimStats};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FighterState {
    pub x: i32,
    pub y: i32,
    pub health: u8,
}

/// Totals of a headless run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub rounds: u32,
    pub player_wins: u32,
    pub enemy_wins: u32,
    pub draws: u32,
    pub player: FighterState,
    pub enemy: FighterState,
    pub scroll_x: i32,
    pub stats: SimStats,
}

impl RunSummary {
    fn record(&mut self, outcome: RoundOutcome) {
        match outcome {
            RoundOutcome::PlayerWon => self.player_wins += 1,
            RoundOutcome::EnemyWon => self.enemy_wins += 1,
            RoundOutcome::Draw => self.draws += 1,
        }
    }
}

/// Tick `game` for `frames` frames against `device`. Call
/// [`Game::setup`] first.
pub fn run_frames(game: &mut Game<'_>, device: &mut SimDevice, frames: u64) -> RunSummary {
    let mut summary = RunSummary::default();

    for _ in 0..frames {
        let report = game.tick(device);
        if let Some(outcome) = report.outcome {
            info!("frame {}: round {} {:?}", report.frame, report.round, outcome);
            summary.record(outcome);
        }
        summary.frames += 1;
    }

    summary.rounds = game.round;
    summary.player = FighterState {
        x: game.player.entity.x,
        y: game.player.entity.y,
        health: game.player.entity.health,
    };
    summary.enemy = FighterState {
        x: game.enemy.entity.x,
        y: game.enemy.entity.y,
        health: game.enemy.entity.health,
    };
    summary.scroll_x = game.scroll.x;
    summary.stats = *device.stats();
    summary
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "frames      {}", self.frames)?;
        writeln!(
            f,
            "rounds      {} (player {}, enemy {}, draw {})",
            self.rounds, self.player_wins, self.enemy_wins, self.draws
        )?;
        writeln!(
            f,
            "player      x={} y={} health={}",
            self.player.x, self.player.y, self.player.health
        )?;
        writeln!(
            f,
            "enemy       x={} y={} health={}",
            self.enemy.x, self.enemy.y, self.enemy.health
        )?;
        writeln!(f, "scroll      {}", self.scroll_x)?;
        write!(
            f,
            "hardware    {} flushes, {} torn, {} doubled, {} overruns",
            self.stats.oam_flushes,
            self.stats.tearing,
            self.stats.double_flushes,
            self.stats.overruns
        )
    }
}

#[cfg(test)]
mod tests {
    use tilebrawl::{DEMO_ASSETS, GameConfig};

    use super::*;
    use crate::script::InputSource;

    #[test]
    fn idle_run_has_no_rounds() {
        let mut device = SimDevice::new(InputSource::Idle);
        let mut game = Game::new(&DEMO_ASSETS, GameConfig::default());
        game.setup(&mut device);

        let summary = run_frames(&mut game, &mut device, 20);
        assert_eq!(summary.frames, 20);
        assert_eq!(summary.rounds, 0);
        assert_eq!(summary.player.health, 5);
        assert_eq!(summary.stats.oam_flushes, 21);

        let text = summary.to_string();
        assert!(text.contains("frames      20"));
        assert!(text.contains("0 torn"));
    }
}
