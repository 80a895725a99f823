//! Client-side movement prediction.
//!
//! The predicted position is the player's authoritative view of itself: it
//! moves the instant a command is issued and is never overwritten by server
//! broadcasts, so local motion stays smooth regardless of what the server
//! echoes back.

use shared::{Direction, MOVE_STEP, WORLD_HEIGHT, WORLD_WIDTH};
use std::time::Instant;

/// Locally predicted position of our own player.
#[derive(Debug, Clone, Copy)]
pub struct LocalPrediction {
    pub x: f32,
    pub y: f32,
    pub last_update: Instant,
}

pub struct MovementPredictor {
    prediction: Option<LocalPrediction>,
    step: f32,
    world_width: f32,
    world_height: f32,
}

impl MovementPredictor {
    pub fn new() -> Self {
        Self::with_world(WORLD_WIDTH, WORLD_HEIGHT)
    }

    pub fn with_world(world_width: f32, world_height: f32) -> Self {
        Self {
            prediction: None,
            step: MOVE_STEP,
            world_width,
            world_height,
        }
    }

    pub fn prediction(&self) -> Option<LocalPrediction> {
        self.prediction
    }

    pub fn position(&self) -> Option<(f32, f32)> {
        self.prediction.map(|p| (p.x, p.y))
    }

    /// Initializes the prediction from the server's join position. Later
    /// calls are ignored; once seeded, only local commands move it.
    pub fn seed(&mut self, x: f32, y: f32, now: Instant) {
        if self.prediction.is_some() {
            return;
        }
        self.prediction = Some(LocalPrediction {
            x: x.clamp(0.0, self.world_width),
            y: y.clamp(0.0, self.world_height),
            last_update: now,
        });
    }

    /// Steps the prediction one fixed increment, clamped to the world.
    /// Returns false (and does nothing) before the session is seeded.
    pub fn advance_by(&mut self, direction: Direction, now: Instant) -> bool {
        if let Some(p) = self.prediction.as_mut() {
            let (dx, dy) = direction.delta();
            p.x = (p.x + dx * self.step).clamp(0.0, self.world_width);
            p.y = (p.y + dy * self.step).clamp(0.0, self.world_height);
            p.last_update = now;
            true
        } else {
            false
        }
    }

    /// Jumps the prediction to an absolute world position (click-to-move).
    /// Returns the clamped position rounded to integers for the wire.
    pub fn set_target(&mut self, x: f32, y: f32, now: Instant) -> Option<(i32, i32)> {
        let p = self.prediction.as_mut()?;
        p.x = x.clamp(0.0, self.world_width);
        p.y = y.clamp(0.0, self.world_height);
        p.last_update = now;
        Some((p.x.round() as i32, p.y.round() as i32))
    }
}

impl Default for MovementPredictor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_unseeded_ignores_commands() {
        let mut predictor = MovementPredictor::new();
        let now = Instant::now();
        assert!(!predictor.advance_by(Direction::Up, now));
        assert_eq!(predictor.set_target(10.0, 10.0, now), None);
        assert!(predictor.position().is_none());
    }

    #[test]
    fn test_seed_applies_once() {
        let mut predictor = MovementPredictor::new();
        let now = Instant::now();
        predictor.seed(100.0, 100.0, now);
        predictor.seed(500.0, 500.0, now);
        assert_eq!(predictor.position(), Some((100.0, 100.0)));
    }

    #[test]
    fn test_seed_clamps_to_world() {
        let mut predictor = MovementPredictor::new();
        predictor.seed(-20.0, 9999.0, Instant::now());
        assert_eq!(predictor.position(), Some((0.0, WORLD_HEIGHT)));
    }

    #[test]
    fn test_advance_steps_by_fixed_increment() {
        let mut predictor = MovementPredictor::new();
        let now = Instant::now();
        predictor.seed(100.0, 100.0, now);
        assert!(predictor.advance_by(Direction::Up, now));
        assert_eq!(predictor.position(), Some((100.0, 100.0 - MOVE_STEP)));
        assert!(predictor.advance_by(Direction::Right, now));
        assert_eq!(
            predictor.position(),
            Some((100.0 + MOVE_STEP, 100.0 - MOVE_STEP))
        );
    }

    #[test]
    fn test_advance_clamps_at_boundaries() {
        let mut predictor = MovementPredictor::new();
        let now = Instant::now();
        predictor.seed(10.0, 10.0, now);
        for _ in 0..5 {
            predictor.advance_by(Direction::Up, now);
            predictor.advance_by(Direction::Left, now);
        }
        assert_eq!(predictor.position(), Some((0.0, 0.0)));

        for _ in 0..200 {
            predictor.advance_by(Direction::Down, now);
            predictor.advance_by(Direction::Right, now);
        }
        assert_eq!(predictor.position(), Some((WORLD_WIDTH, WORLD_HEIGHT)));
    }

    #[test]
    fn test_set_target_clamps_and_rounds() {
        let mut predictor = MovementPredictor::new();
        let now = Instant::now();
        predictor.seed(0.0, 0.0, now);

        assert_eq!(predictor.set_target(100.4, 100.6, now), Some((100, 101)));
        let p = predictor.prediction().unwrap();
        assert_approx_eq!(p.x, 100.4);
        assert_approx_eq!(p.y, 100.6);

        assert_eq!(
            predictor.set_target(-50.0, 3000.0, now),
            Some((0, WORLD_HEIGHT as i32))
        );
    }

    #[test]
    fn test_updates_stamp_time() {
        let mut predictor = MovementPredictor::new();
        let t0 = Instant::now();
        let t1 = t0 + std::time::Duration::from_millis(100);
        predictor.seed(50.0, 50.0, t0);
        predictor.advance_by(Direction::Down, t1);
        assert_eq!(predictor.prediction().unwrap().last_update, t1);
    }
}
