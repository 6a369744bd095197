use anyhow::Result;
use log::info;

use crate::snake::{Direction, Snake};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Quit,
    Key(Direction),
    Other,
}

/// A source of pending input events. `poll_events` must never block.
pub trait InputSource {
    fn poll_events(&mut self) -> Result<Vec<InputEvent>>;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Feeds a tick's worth of events to the snake. Stops at the first quit.
pub fn dispatch(events: &[InputEvent], snake: &mut Snake) -> Flow {
    for event in events {
        match event {
            InputEvent::Quit => {
                info!("quit requested");
                return Flow::Quit;
            }
            InputEvent::Key(dir) => snake.set_pending_direction(*dir),
            InputEvent::Other => {}
        }
    }

    Flow::Continue
}

#[cfg(test)]
pub mod testing {
    use std::collections::VecDeque;

    use super::*;

    /// Hands out one scripted batch per poll, then nothing.
    #[derive(Default)]
    pub struct ScriptedInput {
        pub batches: VecDeque<Vec<InputEvent>>,
    }

    impl ScriptedInput {
        pub fn new(batches: Vec<Vec<InputEvent>>) -> Self {
            ScriptedInput { batches: batches.into() }
        }
    }

    impl InputSource for ScriptedInput {
        fn poll_events(&mut self) -> Result<Vec<InputEvent>> {
            Ok(self.batches.pop_front().unwrap_or_default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use crate::snake::Direction::*;

    fn snake() -> Snake {
        Snake::new(Grid::new(640, 480, 20))
    }

    #[test]
    fn direction_keys_set_pending_direction() {
        let mut snake = snake();
        let flow = dispatch(&[InputEvent::Key(Up), InputEvent::Other], &mut snake);

        assert_eq!(flow, Flow::Continue);
        snake.resolve_direction();
        assert_eq!(snake.direction(), Up);
    }

    #[test]
    fn quit_stops_dispatch() {
        let mut snake = snake();
        let flow = dispatch(&[InputEvent::Quit, InputEvent::Key(Down)], &mut snake);

        assert_eq!(flow, Flow::Quit);
        snake.resolve_direction();
        assert_eq!(snake.direction(), Right);
    }

    #[test]
    fn no_events_is_a_no_op() {
        let mut snake = snake();
        assert_eq!(dispatch(&[], &mut snake), Flow::Continue);
        snake.resolve_direction();
        assert_eq!(snake.direction(), Right);
    }
}
