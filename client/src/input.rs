//! Keyboard state and fixed-interval movement resolution.

use macroquad::prelude::*;
use shared::Direction;
use std::time::{Duration, Instant};

/// Interval between resolved movement commands while keys are held.
pub const RESOLVE_INTERVAL: Duration = Duration::from_millis(100);

/// Which movement directions are physically held this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeldDirections {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl HeldDirections {
    pub fn any(&self) -> bool {
        self.up || self.down || self.left || self.right
    }

    /// Samples the movement keys from the window (WASD and arrow aliases).
    pub fn sample() -> Self {
        Self {
            up: is_key_down(KeyCode::W) || is_key_down(KeyCode::Up),
            down: is_key_down(KeyCode::S) || is_key_down(KeyCode::Down),
            left: is_key_down(KeyCode::A) || is_key_down(KeyCode::Left),
            right: is_key_down(KeyCode::D) || is_key_down(KeyCode::Right),
        }
    }
}

/// Turns raw held keys into at most one direction per resolution tick.
///
/// The wire protocol carries a single cardinal direction per command, so a
/// held diagonal is time-multiplexed: consecutive ticks alternate between
/// the vertical and horizontal axis, which walks a staircase path.
pub struct InputController {
    held: HeldDirections,
    last_resolved: Option<Direction>,
    interval: Duration,
    next_tick: Option<Instant>,
}

impl InputController {
    pub fn new() -> Self {
        Self::with_interval(RESOLVE_INTERVAL)
    }

    pub fn with_interval(interval: Duration) -> Self {
        Self {
            held: HeldDirections::default(),
            last_resolved: None,
            interval,
            next_tick: None,
        }
    }

    /// Records this frame's held keys. The resolution timer arms when the
    /// held set becomes non-empty (first tick fires immediately) and stops
    /// as soon as it empties.
    pub fn set_held(&mut self, held: HeldDirections, now: Instant) {
        if held.any() {
            if self.next_tick.is_none() {
                self.next_tick = Some(now);
            }
        } else {
            self.next_tick = None;
        }
        self.held = held;
    }

    /// Fires at most one resolution tick. A late frame resolves once and
    /// re-arms from `now`, so missed ticks are skipped rather than bursted.
    pub fn poll(&mut self, now: Instant) -> Option<Direction> {
        let due = self.next_tick?;
        if now < due {
            return None;
        }
        self.next_tick = Some(now + self.interval);
        let direction = self.resolve()?;
        self.last_resolved = Some(direction);
        Some(direction)
    }

    /// Collapses the held set to one direction. Vertical wins a same-axis
    /// conflict (up over down, left over right); a diagonal alternates with
    /// the previous tick's result, starting on the vertical axis.
    fn resolve(&self) -> Option<Direction> {
        let held = self.held;
        if held.up {
            if held.right {
                Some(self.alternate(Direction::Up, Direction::Right))
            } else if held.left {
                Some(self.alternate(Direction::Up, Direction::Left))
            } else {
                Some(Direction::Up)
            }
        } else if held.down {
            if held.right {
                Some(self.alternate(Direction::Down, Direction::Right))
            } else if held.left {
                Some(self.alternate(Direction::Down, Direction::Left))
            } else {
                Some(Direction::Down)
            }
        } else if held.left {
            Some(Direction::Left)
        } else if held.right {
            Some(Direction::Right)
        } else {
            None
        }
    }

    fn alternate(&self, primary: Direction, secondary: Direction) -> Direction {
        if self.last_resolved == Some(primary) {
            secondary
        } else {
            primary
        }
    }
}

impl Default for InputController {
    fn default() -> Self {
        Self::new()
    }
}
