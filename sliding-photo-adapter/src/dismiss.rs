use sliding_photo::{InnerScroll, Velocity};

use crate::{Driver, Easing, OwnerToken, TransitionGate, Tween};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DismissDirection {
    Up,
    Down,
}

impl DismissDirection {
    fn sign(self) -> f32 {
        match self {
            Self::Up => -1.0,
            Self::Down => 1.0,
        }
    }

    fn of(value: f32) -> Self {
        if value < 0.0 { Self::Up } else { Self::Down }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DismissPhase {
    Idle,
    Dragging,
    /// Transient: the release is being classified.
    Deciding,
    Dismissing(DismissDirection),
    SnappingBack,
}

/// Outcome of releasing a dismiss drag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Release {
    Dismiss(DismissDirection),
    SnapBack,
}

/// Emitted by [`DismissController::tick`] when a follow-through animation finishes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DismissEvent {
    Dismissed(DismissDirection),
    SnappedBack,
}

/// Thresholds and timings for the interactive dismiss gesture.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DismissOptions {
    /// Release speed (points/s) above which the drag dismisses.
    pub dismiss_velocity: f32,
    /// Release displacement (points) above which the drag dismisses.
    pub dismiss_distance: f32,
    /// Below this speed the displacement decides the direction.
    pub direction_velocity_floor: f32,
    /// Minimum speed to leave a vertically scrollable image at its top/bottom edge.
    pub boundary_velocity: f32,
    /// Duration of a full-height dismiss; shorter when part of the way is already covered.
    pub base_duration_ms: u64,
    pub snap_back_duration_ms: u64,
    pub snap_back_easing: Easing,
}

impl Default for DismissOptions {
    fn default() -> Self {
        Self {
            dismiss_velocity: 1000.0,
            dismiss_distance: 100.0,
            direction_velocity_floor: 50.0,
            boundary_velocity: 250.0,
            base_duration_ms: 250,
            snap_back_duration_ms: 250,
            snap_back_easing: Easing::Spring,
        }
    }
}

impl DismissOptions {
    pub fn with_thresholds(mut self, dismiss_velocity: f32, dismiss_distance: f32) -> Self {
        self.dismiss_velocity = dismiss_velocity;
        self.dismiss_distance = dismiss_distance;
        self
    }

    pub fn with_durations(mut self, base_duration_ms: u64, snap_back_duration_ms: u64) -> Self {
        self.base_duration_ms = base_duration_ms;
        self.snap_back_duration_ms = snap_back_duration_ms;
        self
    }

    pub fn with_snap_back_easing(mut self, easing: Easing) -> Self {
        self.snap_back_easing = easing;
        self
    }
}

/// Decides whether a pan may start a dismiss drag.
///
/// Vertical motion must dominate (horizontal drags belong to paging), the focused cell must be
/// at rest, and a vertically scrollable image only lets go at its edges when flicked past
/// `boundary_velocity` away from the content.
pub fn should_begin(velocity: Velocity, inner: Option<InnerScroll>, options: &DismissOptions) -> bool {
    if velocity.y.abs() <= velocity.x.abs() {
        return false;
    }
    let Some(inner) = inner else {
        return false;
    };
    if !inner.is_at_rest() {
        return false;
    }
    if !inner.is_vertically_scrollable() {
        return true;
    }
    if inner.is_at_top() {
        return velocity.y > options.boundary_velocity;
    }
    if inner.is_at_bottom() {
        return velocity.y < -options.boundary_velocity;
    }
    false
}

/// Classifies a released drag.
///
/// Dismisses when the release is fast or far enough. The direction follows the velocity,
/// except when the velocity is tiny or points against the displacement; then the displacement
/// decides.
pub fn classify_release(velocity_y: f32, translation_y: f32, options: &DismissOptions) -> Release {
    let speed = velocity_y.abs();
    if speed <= options.dismiss_velocity && translation_y.abs() <= options.dismiss_distance {
        return Release::SnapBack;
    }
    let opposes = translation_y != 0.0 && velocity_y.signum() != translation_y.signum();
    let direction = if speed < options.direction_velocity_floor || opposes {
        DismissDirection::of(translation_y)
    } else {
        DismissDirection::of(velocity_y)
    };
    Release::Dismiss(direction)
}

#[derive(Clone, Copy, Debug)]
struct Motion {
    translation: Tween,
    alpha_from: f32,
    alpha_to: f32,
}

/// Drag-to-dismiss state machine.
///
/// The controller does not hold UI objects. Adapters feed it pan samples and ticks and read
/// back the surface translation and backdrop alpha.
#[derive(Debug)]
pub struct DismissController {
    options: DismissOptions,
    phase: DismissPhase,
    translation_y: f32,
    backdrop_alpha: f32,
    container_height: f32,
    motion: Option<Motion>,
    token: Option<OwnerToken>,
}

impl DismissController {
    pub fn new(options: DismissOptions) -> Self {
        Self {
            options,
            phase: DismissPhase::Idle,
            translation_y: 0.0,
            backdrop_alpha: 1.0,
            container_height: 0.0,
            motion: None,
            token: None,
        }
    }

    pub fn options(&self) -> &DismissOptions {
        &self.options
    }

    pub fn phase(&self) -> DismissPhase {
        self.phase
    }

    pub fn translation_y(&self) -> f32 {
        self.translation_y
    }

    pub fn backdrop_alpha(&self) -> f32 {
        self.backdrop_alpha
    }

    pub fn is_animating(&self) -> bool {
        self.motion.is_some()
    }

    /// Whether this controller currently owns the shared surface state.
    pub fn owns(&self, gate: &TransitionGate) -> bool {
        self.token.as_ref().is_some_and(|t| gate.is_current(t))
    }

    pub fn set_container_height(&mut self, height: f32) {
        self.container_height = height.max(0.0);
    }

    /// Gesture began. Returns whether the drag is accepted.
    ///
    /// A snap-back still in flight is superseded from its current position; a committed
    /// transition blocks the gesture.
    pub fn begin(
        &mut self,
        velocity: Velocity,
        inner: Option<InnerScroll>,
        gate: &mut TransitionGate,
    ) -> bool {
        if gate.holder() == Some(Driver::Transition) {
            return false;
        }
        if matches!(self.phase, DismissPhase::Dismissing(_)) && self.owns(gate) {
            return false;
        }
        if !should_begin(velocity, inner, &self.options) {
            return false;
        }
        self.token = Some(gate.preempt(Driver::Gesture));
        self.motion = None;
        self.phase = DismissPhase::Dragging;
        atrace!(vx = velocity.x, vy = velocity.y, "DismissController::begin");
        true
    }

    /// Applies the current vertical translation of the drag.
    pub fn update(&mut self, translation_y: f32, gate: &TransitionGate) {
        if self.phase != DismissPhase::Dragging || !self.owns(gate) {
            return;
        }
        self.translation_y = translation_y;
        self.backdrop_alpha = if self.container_height > 0.0 {
            (1.0 - (translation_y / self.container_height).abs()).clamp(0.0, 1.0)
        } else {
            1.0
        };
    }

    /// Gesture ended: classifies the release and starts the follow-through animation.
    pub fn end(
        &mut self,
        velocity_y: f32,
        translation_y: f32,
        now_ms: u64,
        gate: &TransitionGate,
    ) -> Option<Release> {
        if self.phase != DismissPhase::Dragging || !self.owns(gate) {
            return None;
        }
        self.update(translation_y, gate);
        self.phase = DismissPhase::Deciding;
        let release = classify_release(velocity_y, translation_y, &self.options);
        adebug!(velocity_y, translation_y, ?release, "DismissController::end");

        match release {
            Release::Dismiss(direction) => {
                let height = self.container_height;
                let remaining = if height > 0.0 {
                    ((height - translation_y.abs()) / height).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let duration = (self.options.base_duration_ms as f32 * remaining) as u64;
                self.motion = Some(Motion {
                    translation: Tween::new(
                        self.translation_y,
                        height * direction.sign(),
                        now_ms,
                        duration,
                        Easing::EaseOut,
                    ),
                    alpha_from: self.backdrop_alpha,
                    alpha_to: 0.0,
                });
                self.phase = DismissPhase::Dismissing(direction);
            }
            Release::SnapBack => {
                self.motion = Some(Motion {
                    translation: Tween::new(
                        self.translation_y,
                        0.0,
                        now_ms,
                        self.options.snap_back_duration_ms,
                        self.options.snap_back_easing,
                    ),
                    alpha_from: self.backdrop_alpha,
                    alpha_to: 1.0,
                });
                self.phase = DismissPhase::SnappingBack;
            }
        }
        Some(release)
    }

    /// Gesture cancelled or failed: jump back to identity.
    pub fn cancel(&mut self, gate: &mut TransitionGate) {
        if self.phase != DismissPhase::Dragging {
            return;
        }
        self.reset();
        if let Some(token) = self.token.take() {
            gate.release(token);
        }
    }

    /// Advances the follow-through animation.
    ///
    /// When another driver preempted the gate, the animation is abandoned without an event.
    pub fn tick(&mut self, now_ms: u64, gate: &mut TransitionGate) -> Option<DismissEvent> {
        let motion = self.motion?;
        if !self.owns(gate) {
            atrace!("DismissController: preempted; abandoning animation");
            self.motion = None;
            self.token = None;
            self.phase = DismissPhase::Idle;
            return None;
        }

        self.translation_y = motion.translation.sample(now_ms);
        let p = if motion.translation.is_done(now_ms) {
            1.0
        } else {
            motion.translation.progress(now_ms)
        };
        self.backdrop_alpha =
            (motion.alpha_from + (motion.alpha_to - motion.alpha_from) * p).clamp(0.0, 1.0);

        if !motion.translation.is_done(now_ms) {
            return None;
        }

        self.motion = None;
        if let Some(token) = self.token.take() {
            gate.release(token);
        }
        let event = match self.phase {
            DismissPhase::Dismissing(direction) => DismissEvent::Dismissed(direction),
            _ => {
                self.reset();
                DismissEvent::SnappedBack
            }
        };
        self.phase = DismissPhase::Idle;
        adebug!(?event, "DismissController: finished");
        Some(event)
    }

    /// Restores identity translation and an opaque backdrop.
    pub fn reset(&mut self) {
        self.phase = DismissPhase::Idle;
        self.translation_y = 0.0;
        self.backdrop_alpha = 1.0;
        self.motion = None;
    }
}
