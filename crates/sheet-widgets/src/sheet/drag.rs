#![forbid(unsafe_code)]

//! Drag gesture tracking for the sheet handle.
//!
//! ```text
//! Idle --press--> Dragging --move--> Dragging --release/cancel--> Idle
//! ```
//!
//! While dragging, the tracker converts the vertical pointer delta into a
//! *distance-open*: how close, in percent of the sheet's height, the sheet is
//! to its resting open position. `100` is fully open, `0` is fully dragged
//! off. On release the final distance decides whether the sheet is
//! dismissed.
//!
//! # Invariants
//!
//! 1. Every distance the tracker computes lies in `[0, 100]`.
//! 2. Move, release and cancel while `Idle` are no-ops.
//! 3. A release always restores the surface (cursor, resizing marker, inline
//!    transform), whatever the outcome.
//! 4. A surface with no usable height produces no updates; a release then
//!    counts as no movement.
//!
//! # Dismissal policy
//!
//! A single threshold: releasing with distance-open below
//! [`DISMISS_THRESHOLD_PERCENT`] dismisses, anything else springs back to the
//! open position.

use web_time::{Duration, Instant};

use super::surface::{Cursor, DEFAULT_SCALE_DOWN, SheetSurface, SheetTransform};

/// Releasing below this distance-open dismisses the sheet.
pub const DISMISS_THRESHOLD_PERCENT: f32 = 75.0;

/// Distance-open for a drag from `start` to `current` on a sheet of `height`.
///
/// Dragging down lowers the distance; dragging up past the start is clamped
/// at fully open. Returns `None` when `height` is zero, negative, or not
/// finite, or when either coordinate is not finite.
#[must_use]
pub fn distance_open(start: f32, current: f32, height: f32) -> Option<f32> {
    if !(height.is_finite() && height > 0.0 && start.is_finite() && current.is_finite()) {
        return None;
    }
    let delta = start - current;
    Some((100.0 + delta / height * 100.0).clamp(0.0, 100.0))
}

/// Visual transform for a given distance-open.
///
/// Translation is the distance still to travel; scale interpolates from
/// `scale_down` (fully dragged off) to `1.0` (fully open).
#[must_use]
pub fn drag_transform(distance: f32, scale_down: f32) -> SheetTransform {
    let distance = distance.clamp(0.0, 100.0);
    SheetTransform {
        translate_y_percent: 100.0 - distance,
        scale: scale_down + (1.0 - scale_down) * distance / 100.0,
    }
}

fn sanitize_scale_down(factor: f32) -> f32 {
    if factor.is_finite() && factor > 0.0 {
        factor.min(1.0)
    } else {
        DEFAULT_SCALE_DOWN
    }
}

/// What a release decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragOutcome {
    /// Below the threshold with drag-dismiss enabled: request a close.
    Dismiss,
    /// Return to the open position.
    Restore,
}

/// Summary of a finished drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragRelease {
    /// Final distance-open in `[0, 100]`.
    pub distance: f32,
    pub outcome: DragOutcome,
    /// Time from press to release.
    pub elapsed: Duration,
}

/// An in-progress drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    start_position: f32,
    distance: f32,
    scale_down: f32,
    started: Instant,
}

impl DragSession {
    /// Vertical coordinate of the press.
    #[must_use]
    pub fn start_position(&self) -> f32 {
        self.start_position
    }

    /// Distance-open after the last applied move.
    #[must_use]
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Scale-down factor sampled from the surface at press time.
    #[must_use]
    pub fn scale_down(&self) -> f32 {
        self.scale_down
    }
}

/// Tracker state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

/// Press/move/release state machine for the sheet handle.
#[derive(Debug, Clone, Default)]
pub struct DragTracker {
    state: DragState,
}

impl DragTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> DragState {
        self.state
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    #[must_use]
    pub fn session(&self) -> Option<&DragSession> {
        match &self.state {
            DragState::Dragging(session) => Some(session),
            DragState::Idle => None,
        }
    }

    /// Start a drag at `position`. Returns `false` if a drag is already in
    /// progress or the coordinate is unusable.
    pub fn press(&mut self, position: f32, surface: &dyn SheetSurface) -> bool {
        if self.is_dragging() || !position.is_finite() {
            return false;
        }
        surface.set_resizing(true);
        surface.set_cursor(Cursor::Grabbing);
        let scale_down = sanitize_scale_down(surface.scale_down_factor());

        #[cfg(feature = "tracing")]
        tracing::trace!(target: "sheet::drag", position, scale_down, "drag start");

        self.state = DragState::Dragging(DragSession {
            start_position: position,
            distance: 100.0,
            scale_down,
            started: Instant::now(),
        });
        true
    }

    /// Follow the pointer to `position`, applying the resulting transform.
    ///
    /// Returns the applied transform, or `None` when idle or when the
    /// surface has no usable height.
    pub fn drag_to(
        &mut self,
        position: f32,
        surface: &dyn SheetSurface,
    ) -> Option<SheetTransform> {
        let DragState::Dragging(session) = &mut self.state else {
            return None;
        };
        let distance = distance_open(session.start_position, position, surface.height())?;
        session.distance = distance;
        let transform = drag_transform(distance, session.scale_down);
        surface.apply_drag_transform(transform);
        Some(transform)
    }

    /// Finish the drag at `position` and classify it.
    ///
    /// Returns `None` when idle (a stray release).
    pub fn release(
        &mut self,
        position: f32,
        surface: &dyn SheetSurface,
        close_on_dragging_down: bool,
    ) -> Option<DragRelease> {
        let DragState::Dragging(session) = std::mem::take(&mut self.state) else {
            return None;
        };
        let distance = distance_open(session.start_position, position, surface.height())
            .unwrap_or(session.distance);
        let outcome = if close_on_dragging_down && distance < DISMISS_THRESHOLD_PERCENT {
            DragOutcome::Dismiss
        } else {
            DragOutcome::Restore
        };
        restore(surface);

        #[cfg(feature = "tracing")]
        tracing::debug!(target: "sheet::drag", distance, ?outcome, "drag release");

        Some(DragRelease {
            distance,
            outcome,
            elapsed: session.started.elapsed(),
        })
    }

    /// Abandon the drag without a decision. Returns `false` when idle.
    pub fn cancel(&mut self, surface: &dyn SheetSurface) -> bool {
        if !self.is_dragging() {
            return false;
        }
        self.state = DragState::Idle;
        restore(surface);
        true
    }
}

fn restore(surface: &dyn SheetSurface) {
    surface.set_cursor(Cursor::Auto);
    surface.set_resizing(false);
    surface.clear_drag_transform();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::testing::RecordingSurface;
    use proptest::prelude::*;

    const HEIGHT: f32 = 400.0;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn no_movement_is_fully_open() {
        assert_eq!(distance_open(100.0, 100.0, HEIGHT), Some(100.0));
    }

    #[test]
    fn dragging_down_lowers_distance() {
        let d = distance_open(100.0, 260.0, HEIGHT).expect("usable height");
        assert!(approx(d, 60.0));
    }

    #[test]
    fn dragging_up_clamps_at_open() {
        assert_eq!(distance_open(300.0, 0.0, HEIGHT), Some(100.0));
    }

    #[test]
    fn dragging_past_bottom_clamps_at_zero() {
        assert_eq!(distance_open(0.0, 10_000.0, HEIGHT), Some(0.0));
    }

    #[test]
    fn unusable_height_yields_none() {
        assert_eq!(distance_open(0.0, 10.0, 0.0), None);
        assert_eq!(distance_open(0.0, 10.0, -5.0), None);
        assert_eq!(distance_open(0.0, 10.0, f32::NAN), None);
        assert_eq!(distance_open(0.0, 10.0, f32::INFINITY), None);
        assert_eq!(distance_open(f32::NAN, 10.0, HEIGHT), None);
    }

    #[test]
    fn transform_endpoints() {
        let open = drag_transform(100.0, 0.9);
        assert!(approx(open.translate_y_percent, 0.0));
        assert!(approx(open.scale, 1.0));

        let gone = drag_transform(0.0, 0.9);
        assert!(approx(gone.translate_y_percent, 100.0));
        assert!(approx(gone.scale, 0.9));

        let half = drag_transform(50.0, 0.9);
        assert!(approx(half.translate_y_percent, 50.0));
        assert!(approx(half.scale, 0.95));
    }

    #[test]
    fn press_marks_surface() {
        let surface = RecordingSurface::new(HEIGHT);
        let mut tracker = DragTracker::new();
        assert!(tracker.press(50.0, &surface));
        assert!(surface.resizing());
        assert_eq!(surface.cursor(), Cursor::Grabbing);
        assert_eq!(tracker.session().map(DragSession::start_position), Some(50.0));
    }

    #[test]
    fn second_press_is_ignored() {
        let surface = RecordingSurface::new(HEIGHT);
        let mut tracker = DragTracker::new();
        assert!(tracker.press(50.0, &surface));
        assert!(!tracker.press(80.0, &surface));
        assert_eq!(tracker.session().map(DragSession::start_position), Some(50.0));
    }

    #[test]
    fn press_samples_scale_down() {
        let surface = RecordingSurface::new(HEIGHT).with_scale_down(0.8);
        let mut tracker = DragTracker::new();
        tracker.press(0.0, &surface);
        assert_eq!(tracker.session().map(DragSession::scale_down), Some(0.8));

        let bogus = RecordingSurface::new(HEIGHT).with_scale_down(f32::NAN);
        let mut tracker = DragTracker::new();
        tracker.press(0.0, &bogus);
        assert_eq!(
            tracker.session().map(DragSession::scale_down),
            Some(DEFAULT_SCALE_DOWN)
        );
    }

    #[test]
    fn move_applies_transform() {
        let surface = RecordingSurface::new(HEIGHT).with_scale_down(0.9);
        let mut tracker = DragTracker::new();
        tracker.press(100.0, &surface);
        let t = tracker.drag_to(300.0, &surface).expect("dragging");
        assert!(approx(t.translate_y_percent, 50.0));
        assert!(approx(t.scale, 0.95));
        assert_eq!(surface.transform(), Some(t));
        assert!(approx(tracker.session().map_or(0.0, DragSession::distance), 50.0));
    }

    #[test]
    fn move_while_idle_is_noop() {
        let surface = RecordingSurface::new(HEIGHT);
        let mut tracker = DragTracker::new();
        assert!(tracker.drag_to(300.0, &surface).is_none());
        assert!(surface.transform().is_none());
    }

    #[test]
    fn zero_height_skips_updates() {
        let surface = RecordingSurface::new(0.0);
        let mut tracker = DragTracker::new();
        tracker.press(100.0, &surface);
        assert!(tracker.drag_to(300.0, &surface).is_none());
        assert!(surface.transform().is_none());

        let release = tracker.release(390.0, &surface, true).expect("was dragging");
        assert_eq!(release.distance, 100.0);
        assert_eq!(release.outcome, DragOutcome::Restore);
    }

    #[test]
    fn release_below_threshold_dismisses() {
        let surface = RecordingSurface::new(HEIGHT);
        let mut tracker = DragTracker::new();
        tracker.press(100.0, &surface);
        tracker.drag_to(200.0, &surface);
        let release = tracker.release(260.0, &surface, true).expect("was dragging");
        assert!(approx(release.distance, 60.0));
        assert_eq!(release.outcome, DragOutcome::Dismiss);
    }

    #[test]
    fn release_above_threshold_restores() {
        let surface = RecordingSurface::new(HEIGHT);
        let mut tracker = DragTracker::new();
        tracker.press(100.0, &surface);
        let release = tracker.release(180.0, &surface, true).expect("was dragging");
        assert!(approx(release.distance, 80.0));
        assert_eq!(release.outcome, DragOutcome::Restore);
    }

    #[test]
    fn release_exactly_at_threshold_restores() {
        let surface = RecordingSurface::new(HEIGHT);
        let mut tracker = DragTracker::new();
        tracker.press(0.0, &surface);
        let release = tracker.release(100.0, &surface, true).expect("was dragging");
        assert_eq!(release.distance, 75.0);
        assert_eq!(release.outcome, DragOutcome::Restore);
    }

    #[test]
    fn disabled_drag_dismiss_always_restores() {
        let surface = RecordingSurface::new(HEIGHT);
        let mut tracker = DragTracker::new();
        tracker.press(0.0, &surface);
        let release = tracker.release(360.0, &surface, false).expect("was dragging");
        assert!(approx(release.distance, 10.0));
        assert_eq!(release.outcome, DragOutcome::Restore);
    }

    #[test]
    fn release_restores_surface() {
        let surface = RecordingSurface::new(HEIGHT);
        let mut tracker = DragTracker::new();
        tracker.press(0.0, &surface);
        tracker.drag_to(100.0, &surface);
        tracker.release(100.0, &surface, true);

        assert!(!tracker.is_dragging());
        assert!(!surface.resizing());
        assert_eq!(surface.cursor(), Cursor::Auto);
        assert!(surface.transform().is_none());
    }

    #[test]
    fn non_finite_release_uses_last_distance() {
        let surface = RecordingSurface::new(HEIGHT);
        let mut tracker = DragTracker::new();
        tracker.press(0.0, &surface);
        tracker.drag_to(200.0, &surface);
        let release = tracker.release(f32::NAN, &surface, true).expect("was dragging");
        assert!(approx(release.distance, 50.0));
        assert_eq!(release.outcome, DragOutcome::Dismiss);
    }

    #[test]
    fn stray_release_is_noop() {
        let surface = RecordingSurface::new(HEIGHT);
        let mut tracker = DragTracker::new();
        assert!(tracker.release(300.0, &surface, true).is_none());
        assert_eq!(surface.restore_count(), 0);
    }

    #[test]
    fn cancel_restores_without_decision() {
        let surface = RecordingSurface::new(HEIGHT);
        let mut tracker = DragTracker::new();
        assert!(!tracker.cancel(&surface));
        tracker.press(0.0, &surface);
        tracker.drag_to(300.0, &surface);
        assert!(tracker.cancel(&surface));
        assert!(!tracker.is_dragging());
        assert!(surface.transform().is_none());
        assert!(tracker.release(300.0, &surface, true).is_none());
    }

    proptest! {
        #[test]
        fn distance_always_within_bounds(
            start in any::<f32>(),
            current in any::<f32>(),
            height in any::<f32>(),
        ) {
            if let Some(d) = distance_open(start, current, height) {
                prop_assert!((0.0..=100.0).contains(&d));
            }
        }

        #[test]
        fn applied_transforms_stay_in_range(
            start in -2_000.0f32..2_000.0,
            moves in proptest::collection::vec(-5_000.0f32..5_000.0, 1..20),
            height in 1.0f32..2_000.0,
            scale_down in 0.5f32..1.0,
        ) {
            let surface = RecordingSurface::new(height).with_scale_down(scale_down);
            let mut tracker = DragTracker::new();
            tracker.press(start, &surface);
            for y in moves {
                let t = tracker.drag_to(y, &surface).expect("dragging with usable height");
                prop_assert!((0.0..=100.0).contains(&t.translate_y_percent));
                prop_assert!(t.scale >= scale_down - 1e-5 && t.scale <= 1.0 + 1e-5);
                let d = tracker.session().map_or(-1.0, DragSession::distance);
                prop_assert!((0.0..=100.0).contains(&d));
            }
        }
    }
}
