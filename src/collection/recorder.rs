//! Gameplay recording
//!
//! Every episode becomes one JSON line holding its seed and the world after
//! each tick. A recorded run can be replayed against a fresh environment,
//! since the seed fixes the food sequence and the actions fix the rest.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::game::{Engine, Grid, GridEngine, OutcomeReason, RelativeAction};
use crate::rl::{SnakeEnv, Transition};

/// One step of a recorded run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickRecord {
    /// Relative action index (0, 1 or 2)
    pub action: usize,
    pub reward: f32,
    pub food_eaten: bool,
    pub reason: OutcomeReason,
    /// World after the tick, row-major
    pub world: Vec<i32>,
}

/// A complete recorded episode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub episode: usize,
    pub seed: u64,
    pub grid_height: usize,
    pub grid_width: usize,
    pub ticks: Vec<TickRecord>,
    /// `None` when the step cap ended the run
    pub ending: Option<OutcomeReason>,
}

impl RunRecord {
    /// Replay the recorded actions and check every tick reproduces its world
    pub fn replay(&self, env: &mut SnakeEnv<GridEngine>) -> Result<()> {
        let world = env.engine().world();
        if (world.height(), world.width()) != (self.grid_height, self.grid_width) {
            bail!(
                "run {} was recorded on a {}x{} grid, environment is {}x{}",
                self.episode,
                self.grid_height,
                self.grid_width,
                world.height(),
                world.width()
            );
        }

        env.reset(Some(self.seed))?;
        for (tick, record) in self.ticks.iter().enumerate() {
            let transition = env.step(record.action)?;
            if transition.reason != record.reason
                || env.engine().world().cells() != record.world.as_slice()
            {
                bail!("run {} diverged from the recording at tick {}", self.episode, tick);
            }
        }
        Ok(())
    }
}

/// Appends finished runs to a JSON lines file
pub struct RunRecorder {
    writer: BufWriter<File>,
    current: Option<RunRecord>,
    runs_written: usize,
}

impl RunRecorder {
    /// Create (or truncate) the output file, creating parent directories
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
        let file = File::create(path)
            .with_context(|| format!("Failed to create recording at {:?}", path))?;
        Ok(Self {
            writer: BufWriter::new(file),
            current: None,
            runs_written: 0,
        })
    }

    /// Start a new run; an unfinished previous run is discarded
    pub fn begin_run(&mut self, episode: usize, seed: u64, grid: &Grid) {
        self.current = Some(RunRecord {
            episode,
            seed,
            grid_height: grid.height(),
            grid_width: grid.width(),
            ticks: Vec::new(),
            ending: None,
        });
    }

    /// Record a tick of the current run; ignored when no run is open
    pub fn record_tick(&mut self, action: RelativeAction, transition: &Transition, world: &Grid) {
        if let Some(run) = self.current.as_mut() {
            run.ticks.push(TickRecord {
                action: action.index(),
                reward: transition.reward,
                food_eaten: transition.info.food_eaten,
                reason: transition.reason,
                world: world.cells().to_vec(),
            });
        }
    }

    /// Write the current run as one line and flush it
    pub fn finish_run(&mut self, ending: Option<OutcomeReason>) -> Result<()> {
        let Some(mut run) = self.current.take() else {
            bail!("no run in progress");
        };
        run.ending = ending;

        serde_json::to_writer(&mut self.writer, &run).context("Failed to serialize run")?;
        writeln!(self.writer).context("Failed to write run")?;
        self.writer.flush().context("Failed to flush recording")?;
        self.runs_written += 1;
        Ok(())
    }

    pub fn runs_written(&self) -> usize {
        self.runs_written
    }
}

/// Read every run from a JSON lines recording
pub fn read_runs(path: &Path) -> Result<Vec<RunRecord>> {
    let file =
        File::open(path).with_context(|| format!("Failed to open recording {:?}", path))?;

    let mut runs = Vec::new();
    for (number, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read {:?}", path))?;
        if line.trim().is_empty() {
            continue;
        }
        let run = serde_json::from_str(&line)
            .with_context(|| format!("Malformed run on line {} of {:?}", number + 1, path))?;
        runs.push(run);
    }
    Ok(runs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameConfig;
    use tempfile::TempDir;

    fn record_run(recorder: &mut RunRecorder, env: &mut SnakeEnv, seed: u64) {
        env.reset(Some(seed)).unwrap();
        recorder.begin_run(0, seed, env.engine().world());

        let actions = [
            RelativeAction::Straight,
            RelativeAction::TurnLeft,
            RelativeAction::Straight,
            RelativeAction::TurnRight,
            RelativeAction::Straight,
        ];
        let mut ending = None;
        for action in actions {
            let transition = env.step_action(action).unwrap();
            recorder.record_tick(action, &transition, env.engine().world());
            if transition.terminated {
                ending = Some(transition.reason);
                break;
            }
        }
        recorder.finish_run(ending).unwrap();
    }

    #[test]
    fn test_record_and_read_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("runs").join("snake.jsonl");
        let mut env = SnakeEnv::new(GameConfig::small()).unwrap();

        let mut recorder = RunRecorder::create(&path).unwrap();
        record_run(&mut recorder, &mut env, 11);
        record_run(&mut recorder, &mut env, 12);
        assert_eq!(recorder.runs_written(), 2);

        let runs = read_runs(&path).unwrap();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].seed, 11);
        assert_eq!(runs[1].seed, 12);
        assert_eq!((runs[0].grid_height, runs[0].grid_width), (10, 10));
        assert_eq!(runs[0].ticks.len(), 5);
        assert_eq!(runs[0].ticks[1].action, 0);
        assert!(runs[0].ticks.iter().all(|tick| tick.world.len() == 100));
        assert_eq!(runs[0].ending, None);
    }

    #[test]
    fn test_replay_reproduces_recording() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("snake.jsonl");
        let mut env = SnakeEnv::new(GameConfig::small()).unwrap();

        let mut recorder = RunRecorder::create(&path).unwrap();
        record_run(&mut recorder, &mut env, 5);

        let runs = read_runs(&path).unwrap();
        let mut fresh = SnakeEnv::new(GameConfig::small()).unwrap();
        runs[0].replay(&mut fresh).unwrap();
    }

    #[test]
    fn test_replay_detects_divergence() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("snake.jsonl");
        let mut env = SnakeEnv::new(GameConfig::small()).unwrap();

        let mut recorder = RunRecorder::create(&path).unwrap();
        record_run(&mut recorder, &mut env, 5);

        let mut run = read_runs(&path).unwrap().remove(0);
        run.ticks[2].world[0] = 7;
        assert!(run.replay(&mut env).is_err());

        let mut other_size = SnakeEnv::new(GameConfig::new(8, 8)).unwrap();
        let run = read_runs(&path).unwrap().remove(0);
        assert!(run.replay(&mut other_size).is_err());
    }

    #[test]
    fn test_finish_without_run_fails() {
        let dir = TempDir::new().unwrap();
        let mut recorder = RunRecorder::create(&dir.path().join("snake.jsonl")).unwrap();

        assert!(recorder.finish_run(None).is_err());
        assert_eq!(recorder.runs_written(), 0);
    }

    #[test]
    fn test_malformed_line_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("snake.jsonl");
        std::fs::write(&path, "\n{not json}\n").unwrap();

        let err = read_runs(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("line 2"));
    }
}
