use std::{thread::sleep, time::{Duration, Instant}};

use anyhow::Result;
use log::{debug, info, trace};
use rand::Rng;

use crate::config::Config;
use crate::food::Food;
use crate::input::{dispatch, Flow, InputSource};
use crate::render::{Drawable, Renderer};
use crate::snake::{MoveResult, Snake};

pub trait Clock {
    /// Blocks until the next tick boundary.
    fn tick(&mut self);
}

/// Caps the loop at one iteration per `interval`, measured from the start
/// of the previous tick.
pub struct FixedRateClock {
    interval: Duration,
    last_tick: Option<Instant>,
}

impl FixedRateClock {
    pub fn new(interval: Duration) -> Self {
        FixedRateClock { interval, last_tick: None }
    }
}

impl Clock for FixedRateClock {
    fn tick(&mut self) {
        if let Some(last) = self.last_tick {
            let elapsed = last.elapsed();
            if elapsed < self.interval {
                sleep(self.interval - elapsed);
            }
        }

        self.last_tick = Some(Instant::now());
    }
}

pub struct SnakeGame<R: Rng> {
    config: Config,
    snake: Snake,
    food: Food,
    rng: R,
    ticks: u64,
}

impl<R: Rng> SnakeGame<R> {
    pub fn new(config: Config, mut rng: R) -> Self {
        let grid = config.grid();
        let food = Food::new(grid, &mut rng);
        SnakeGame { config, snake: Snake::new(grid), food, rng, ticks: 0 }
    }

    #[cfg(test)]
    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    /// Runs until a quit event arrives. There is no win or lose state.
    pub fn run<D, I, C>(&mut self, renderer: &mut D, input: &mut I, clock: &mut C) -> Result<()>
    where
        D: Renderer,
        I: InputSource,
        C: Clock,
    {
        let grid = self.config.grid();
        info!(
            "starting on a {}x{} grid at {} ticks/s",
            grid.columns(),
            grid.rows(),
            self.config.ticks_per_second
        );

        loop {
            clock.tick();
            if self.tick(renderer, input)? == Flow::Quit {
                break;
            }
        }

        info!("stopped after {} ticks, final length {}", self.ticks, self.snake.body().len());
        Ok(())
    }

    /// One iteration of the loop, minus the frame pacing.
    pub fn tick<D, I>(&mut self, renderer: &mut D, input: &mut I) -> Result<Flow>
    where
        D: Renderer,
        I: InputSource,
    {
        let palette = self.config.palette;
        renderer.clear(palette.background)?;

        let events = input.poll_events()?;
        if dispatch(&events, &mut self.snake) == Flow::Quit {
            return Ok(Flow::Quit);
        }

        self.snake.resolve_direction();
        match self.snake.advance(&mut self.rng) {
            MoveResult::Collided => {
                debug!("reset on tick {}, now heading {:?}", self.ticks, self.snake.direction())
            }
            MoveResult::Moved { new_head, old_tail } => {
                trace!("head at {:?}, vacated {:?}", new_head, old_tail)
            }
        }

        if self.snake.head_position() == self.food.position() {
            self.snake.grow();
            self.food.relocate(&mut self.rng);
            debug!(
                "food eaten, target length {}, food now at {:?}",
                self.snake.target_length(),
                self.food.position()
            );
        }

        self.snake.draw(renderer, &palette)?;
        self.food.draw(renderer, &palette)?;
        renderer.present()?;

        self.ticks += 1;
        Ok(Flow::Continue)
    }

    #[cfg(test)]
    fn parts_mut(&mut self) -> (&mut Snake, &mut Food) {
        (&mut self.snake, &mut self.food)
    }
}
