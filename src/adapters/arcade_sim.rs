//! In-process snake arcade.
//!
//! Turn-based stand-in for the browser game: every dispatched move is one
//! tick. The rules mirror what the controller can observe from outside:
//! reversals are ignored, leaving the grid or biting the body ends the run,
//! and eating the target scores points.

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use tracing::{debug, trace};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Direction, LifecycleControl, Move, Observation, SimulatorConfig};
use crate::domain::ports::{ActionPort, ControlPort, ObservationPort};

/// Length of a freshly spawned snake.
const INITIAL_LENGTH: i32 = 3;

/// Smallest grid the simulator accepts.
pub const MIN_GRID: u32 = 5;

/// Largest grid side the simulator accepts.
pub const MAX_GRID: u32 = 1024;

type Cell = (i32, i32);

/// Simulated snake game implementing every environment port.
#[derive(Debug)]
pub struct GridArcade {
    width: i32,
    height: i32,
    points_per_target: u64,
    rng: StdRng,
    /// Head at the front
    body: VecDeque<Cell>,
    heading: Direction,
    target: Cell,
    score: u64,
    high_score: u64,
    running: bool,
    paused: bool,
    terminated: bool,
    ticks: u64,
}

impl GridArcade {
    pub fn new(config: &SimulatorConfig) -> DomainResult<Self> {
        if config.width < MIN_GRID || config.height < MIN_GRID {
            return Err(DomainError::InvalidParameters(format!(
                "simulator grid {}x{} is smaller than {MIN_GRID}x{MIN_GRID}",
                config.width, config.height
            )));
        }

        if config.width > MAX_GRID || config.height > MAX_GRID {
            return Err(DomainError::InvalidParameters(format!(
                "simulator grid {}x{} is larger than {MAX_GRID}x{MAX_GRID}",
                config.width, config.height
            )));
        }

        let width = i32::try_from(config.width)
            .map_err(|_| DomainError::InvalidParameters("grid width too large".to_string()))?;
        let height = i32::try_from(config.height)
            .map_err(|_| DomainError::InvalidParameters("grid height too large".to_string()))?;

        let mut arcade = Self {
            width,
            height,
            points_per_target: config.points_per_target,
            rng: StdRng::seed_from_u64(config.seed),
            body: VecDeque::new(),
            heading: Direction::Right,
            target: (0, 0),
            score: 0,
            high_score: 0,
            running: false,
            paused: false,
            terminated: false,
            ticks: 0,
        };
        arcade.respawn();
        Ok(arcade)
    }

    pub fn head(&self) -> Cell {
        self.body.front().copied().unwrap_or((0, 0))
    }

    pub const fn target(&self) -> Cell {
        self.target
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub const fn heading(&self) -> Direction {
        self.heading
    }

    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Move the target, e.g. to set up a deterministic scenario.
    pub fn place_target(&mut self, cell: Cell) {
        self.target = cell;
    }

    /// Fresh snake at the centre heading right, new target, score cleared.
    fn respawn(&mut self) {
        let (cx, cy) = (self.width / 2, self.height / 2);
        self.body = (0..INITIAL_LENGTH).map(|i| (cx - i, cy)).collect();
        self.heading = Direction::Right;
        self.score = 0;
        self.paused = false;
        self.terminated = false;
        self.spawn_target();
    }

    fn spawn_target(&mut self) {
        let cells = (self.width.unsigned_abs() as usize)
            .saturating_mul(self.height.unsigned_abs() as usize);
        if cells <= self.body.len() {
            return;
        }
        loop {
            let cell = (
                self.rng.gen_range(0..self.width),
                self.rng.gen_range(0..self.height),
            );
            if !self.body.contains(&cell) {
                self.target = cell;
                return;
            }
        }
    }

    const fn in_bounds(&self, (x, y): Cell) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    fn end_run(&mut self, reason: &str) {
        self.running = false;
        self.terminated = true;
        debug!(reason, score = self.score, ticks = self.ticks, "run ended");
    }

    /// Advance one tick in `direction`.
    fn step(&mut self, direction: Direction) {
        if !self.running || self.paused || self.terminated {
            return;
        }
        self.ticks += 1;

        if direction != self.heading.opposite() {
            self.heading = direction;
        }

        let (dx, dy) = self.heading.delta();
        let (hx, hy) = self.head();
        let next = (hx + dx, hy + dy);

        if !self.in_bounds(next) {
            self.end_run("wall");
            return;
        }

        let eating = next == self.target;
        if !eating {
            self.body.pop_back();
        }
        if self.body.contains(&next) {
            self.end_run("self");
            return;
        }
        self.body.push_front(next);

        if eating {
            self.score += self.points_per_target;
            self.high_score = self.high_score.max(self.score);
            trace!(score = self.score, "target consumed");
            self.spawn_target();
        }
    }
}

#[async_trait]
impl ObservationPort for GridArcade {
    async fn observe(&self) -> Observation {
        Observation {
            score: self.score,
            high_score: self.high_score,
            running: self.running,
            paused: self.paused,
            render_surface_valid: true,
            terminated: self.terminated,
            readings_valid: true,
        }
    }
}

#[async_trait]
impl ActionPort for GridArcade {
    async fn dispatch(&mut self, mv: Move) -> DomainResult<()> {
        self.step(mv.direction);
        Ok(())
    }
}

#[async_trait]
impl ControlPort for GridArcade {
    async fn press(&mut self, control: LifecycleControl) -> DomainResult<()> {
        match control {
            LifecycleControl::Start => {
                if !self.running && !self.terminated {
                    self.running = true;
                }
            }
            LifecycleControl::PauseToggle => {
                if self.running {
                    self.paused = !self.paused;
                }
            }
            LifecycleControl::Reset => {
                self.running = false;
                self.respawn();
            }
            LifecycleControl::Restart => {
                self.respawn();
                self.running = true;
            }
        }
        debug!(%control, running = self.running, paused = self.paused, "control pressed");
        Ok(())
    }
}
