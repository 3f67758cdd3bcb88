//! Animation Tweens
//!
//! Presentation timing for the external render loop. Structural state
//! changes are applied synchronously in the input handlers; these
//! objects only describe how the change is shown. All timing is integer
//! milliseconds fed through
//! [`GameEngine::tick`](crate::game::engine::GameEngine::tick) — never a
//! wall-clock read — so the animation lifetime is deterministic in the
//! accumulated delta.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::core::point::Point;
use crate::core::projection::{IsoProjection, ScreenPoint};
use crate::game::player::PlayerSeat;
use crate::game::tile::Direction;

/// Walk cycle frames per direction in the character sheet.
pub const WALK_FRAME_COUNT: u8 = 4;
/// Milliseconds per walk-cycle frame.
pub const WALK_FRAME_MS: u32 = 150;
/// Milliseconds a player spends crossing one tile.
pub const WALK_MS_PER_HOP: u32 = 180;
/// Milliseconds a lane slide takes to settle.
pub const SLIDE_MS: u32 = 240;

/// Linear interpolation between two screen points over a fixed
/// duration.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Tween {
    start: ScreenPoint,
    end: ScreenPoint,
    duration_ms: u32,
    elapsed_ms: u32,
}

impl Tween {
    /// Create a tween; a zero duration completes on the first tick.
    pub fn new(start: ScreenPoint, end: ScreenPoint, duration_ms: u32) -> Self {
        Self {
            start,
            end,
            duration_ms,
            elapsed_ms: 0,
        }
    }

    /// Advance by `dt_ms`; returns true once the end is reached.
    pub fn tick(&mut self, dt_ms: u32) -> bool {
        self.elapsed_ms = (self.elapsed_ms.saturating_add(dt_ms)).min(self.duration_ms);
        self.is_done()
    }

    /// Whether the tween has converged.
    pub fn is_done(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }

    /// Interpolated position for the current elapsed time.
    pub fn current(&self) -> ScreenPoint {
        if self.duration_ms == 0 {
            return self.end;
        }
        let num = i64::from(self.elapsed_ms);
        let den = i64::from(self.duration_ms);
        let lerp = |a: i32, b: i32| (i64::from(a) + (i64::from(b) - i64::from(a)) * num / den) as i32;
        ScreenPoint::new(lerp(self.start.x, self.end.x), lerp(self.start.y, self.end.y))
    }
}

/// One straight leg of a walk: a facing and its pixel tween.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct WalkLeg {
    /// Facing while crossing this leg
    pub direction: Direction,
    /// Pixel interpolation for the leg
    pub tween: Tween,
}

/// A player walking a compressed path, leg by leg.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WalkAnimation {
    seat: PlayerSeat,
    legs: VecDeque<WalkLeg>,
    frame: u8,
    frame_clock_ms: u32,
}

impl WalkAnimation {
    /// Build from precomputed legs.
    pub fn new(seat: PlayerSeat, legs: Vec<WalkLeg>) -> Self {
        Self {
            seat,
            legs: legs.into(),
            frame: 0,
            frame_clock_ms: 0,
        }
    }

    /// Seat being animated.
    pub fn seat(&self) -> PlayerSeat {
        self.seat
    }

    /// Current walk-cycle frame.
    pub fn frame(&self) -> u8 {
        self.frame
    }

    /// Facing of the active leg, if one remains.
    pub fn direction(&self) -> Option<Direction> {
        self.legs.front().map(|leg| leg.direction)
    }

    /// Pixel position of the active leg, if one remains.
    pub fn position(&self) -> Option<ScreenPoint> {
        self.legs.front().map(|leg| leg.tween.current())
    }

    /// Advance by `dt_ms`; returns true when every leg has settled.
    pub fn tick(&mut self, dt_ms: u32) -> bool {
        self.frame_clock_ms += dt_ms;
        while self.frame_clock_ms >= WALK_FRAME_MS {
            self.frame_clock_ms -= WALK_FRAME_MS;
            self.frame = (self.frame + 1) % WALK_FRAME_COUNT;
        }

        if let Some(leg) = self.legs.front_mut() {
            if leg.tween.tick(dt_ms) {
                self.legs.pop_front();
            }
        }

        if self.legs.is_empty() {
            self.frame = 0;
            true
        } else {
            false
        }
    }
}

/// A lane of tiles sliding one cell after an insertion.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SlideAnimation {
    direction: Direction,
    moved: Vec<Point>,
    elapsed_ms: u32,
}

impl SlideAnimation {
    /// Start a slide covering the moved cells (their settled
    /// positions).
    pub fn new(direction: Direction, moved: Vec<Point>) -> Self {
        Self {
            direction,
            moved,
            elapsed_ms: 0,
        }
    }

    /// Push direction of the shift.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Cells drawn with the slide offset, at their settled positions.
    pub fn moved(&self) -> &[Point] {
        &self.moved
    }

    /// Advance by `dt_ms`; returns true once settled.
    pub fn tick(&mut self, dt_ms: u32) -> bool {
        self.elapsed_ms = (self.elapsed_ms.saturating_add(dt_ms)).min(SLIDE_MS);
        self.elapsed_ms >= SLIDE_MS
    }

    /// Pixel offset to add to each moved tile's settled anchor.
    ///
    /// Starts at minus one full hop and shrinks to zero as the slide
    /// completes.
    pub fn pixel_offset(&self, projection: &IsoProjection) -> ScreenPoint {
        let settled = projection.grid_to_screen(Point::ZERO);
        let hopped = projection.grid_to_screen(self.direction.step(Point::ZERO));
        let remaining = i64::from(SLIDE_MS - self.elapsed_ms);
        let den = i64::from(SLIDE_MS);
        ScreenPoint::new(
            (i64::from(settled.x - hopped.x) * remaining / den) as i32,
            (i64::from(settled.y - hopped.y) * remaining / den) as i32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tween_converges() {
        let mut tween = Tween::new(ScreenPoint::new(0, 0), ScreenPoint::new(100, 50), 200);
        assert!(!tween.is_done());
        assert_eq!(tween.current(), ScreenPoint::new(0, 0));

        assert!(!tween.tick(100));
        assert_eq!(tween.current(), ScreenPoint::new(50, 25));

        assert!(tween.tick(500)); // overshoot clamps
        assert_eq!(tween.current(), ScreenPoint::new(100, 50));
    }

    #[test]
    fn test_zero_duration_tween() {
        let mut tween = Tween::new(ScreenPoint::new(3, 3), ScreenPoint::new(9, 9), 0);
        assert_eq!(tween.current(), ScreenPoint::new(9, 9));
        assert!(tween.tick(1));
    }

    #[test]
    fn test_walk_legs_settle_in_order() {
        let legs = vec![
            WalkLeg {
                direction: Direction::East,
                tween: Tween::new(ScreenPoint::new(0, 0), ScreenPoint::new(50, 25), 180),
            },
            WalkLeg {
                direction: Direction::South,
                tween: Tween::new(ScreenPoint::new(50, 25), ScreenPoint::new(0, 50), 180),
            },
        ];
        let mut walk = WalkAnimation::new(PlayerSeat(0), legs);

        assert_eq!(walk.direction(), Some(Direction::East));
        assert!(!walk.tick(180)); // first leg done, second pending
        assert_eq!(walk.direction(), Some(Direction::South));
        assert!(walk.tick(180));
        assert_eq!(walk.direction(), None);
        assert_eq!(walk.frame(), 0); // frame resets on settle
    }

    #[test]
    fn test_walk_frames_cycle() {
        let legs = vec![WalkLeg {
            direction: Direction::North,
            tween: Tween::new(ScreenPoint::new(0, 0), ScreenPoint::new(0, 100), 10_000),
        }];
        let mut walk = WalkAnimation::new(PlayerSeat(1), legs);

        walk.tick(WALK_FRAME_MS);
        assert_eq!(walk.frame(), 1);
        walk.tick(WALK_FRAME_MS * 3);
        assert_eq!(walk.frame(), 0); // wrapped past 4 frames
    }

    #[test]
    fn test_empty_walk_settles_immediately() {
        let mut walk = WalkAnimation::new(PlayerSeat(0), Vec::new());
        assert!(walk.tick(1));
    }

    #[test]
    fn test_slide_offset_shrinks_to_zero() {
        let projection = IsoProjection::new(100, 900);
        let mut slide = SlideAnimation::new(Direction::South, vec![Point::new(2, 1)]);

        let start = slide.pixel_offset(&projection);
        // One hop south projects to (-50, +25), so the offset starts at
        // the negation of that.
        assert_eq!(start, ScreenPoint::new(50, -25));

        assert!(slide.tick(SLIDE_MS));
        assert_eq!(slide.pixel_offset(&projection), ScreenPoint::new(0, 0));
    }
}
