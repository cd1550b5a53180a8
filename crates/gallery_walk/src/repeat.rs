use core::time::Duration;

use bevy::prelude::Resource;
use bevy::time::{Timer, TimerMode};

use crate::movement::Direction;

/// Re-emits the held direction at a fixed period until released.
///
/// Lives as long as the gallery view; removing the resource stops it.
#[derive(Resource, Debug)]
pub struct HoldRepeat {
    held: Option<Direction>,
    timer: Timer,
    // The frame delta of the press happened before it
    skip_next_tick: bool,
}

impl HoldRepeat {
    pub fn new(period: Duration) -> Self {
        Self {
            held: None,
            timer: Timer::new(period, TimerMode::Repeating),
            skip_next_tick: false,
        }
    }

    /// Starts repeating `direction`. The caller emits the first event right away.
    pub fn press(&mut self, direction: Direction) -> Direction {
        self.held = Some(direction);
        self.timer.reset();
        self.skip_next_tick = true;
        direction
    }

    pub fn release(&mut self) -> Option<Direction> {
        self.held.take()
    }

    /// Releases only if `direction` is the one being repeated.
    pub fn release_if(&mut self, direction: Direction) -> bool {
        if self.held == Some(direction) {
            self.held = None;
            true
        } else {
            false
        }
    }

    pub const fn held(&self) -> Option<Direction> {
        self.held
    }

    /// Advances the timer and returns the held direction with the number of
    /// periods that elapsed. The first tick after a press only starts the clock.
    pub fn tick(&mut self, delta: Duration) -> Option<(Direction, u32)> {
        let direction = self.held?;
        if core::mem::take(&mut self.skip_next_tick) {
            return None;
        }
        self.timer.tick(delta);
        let repeats = self.timer.times_finished_this_tick();
        (repeats > 0).then_some((direction, repeats))
    }
}
