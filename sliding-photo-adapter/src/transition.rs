use sliding_photo::{ContentMode, PhotoImage, Point, Presentation, Rect, Thumbnail};

use crate::{Driver, Easing, OwnerToken, TransitionGate, Tween};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransitionKind {
    Present,
    Dismiss,
}

/// The host's side of a present/dismiss transition.
///
/// Every transition that starts ends with exactly one call to
/// [`TransitionContext::complete_transition`], even when it could not animate.
pub trait TransitionContext {
    /// Bounds of the container the transition runs in, or `None` when it is gone.
    fn container_bounds(&self) -> Option<Rect>;

    fn is_cancelled(&self) -> bool {
        false
    }

    fn complete_transition(&mut self, finished: bool);
}

impl<T: TransitionContext + ?Sized> TransitionContext for Box<T> {
    fn container_bounds(&self) -> Option<Rect> {
        (**self).container_bounds()
    }

    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }

    fn complete_transition(&mut self, finished: bool) {
        (**self).complete_transition(finished)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransitionOptions {
    pub duration_ms: u64,
    pub easing: Easing,
}

impl Default for TransitionOptions {
    fn default() -> Self {
        Self {
            duration_ms: 250,
            easing: Easing::EaseOut,
        }
    }
}

impl TransitionOptions {
    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }
}

/// Unit-space contents rect for a proxy laid out at `frame`.
///
/// `aspect` is the image's `height / width`. A top-clipped presentation reveals more of the
/// image as the frame grows taller, so the crop expands downward instead of stretching. An
/// aspect-fill presentation crops around the center. Anything else shows the whole image.
pub fn contents_rect_for(frame: Rect, aspect: Option<f32>, presentation: &Presentation) -> Rect {
    if presentation.is_clipped_to_top() {
        let image_height = aspect
            .map(|r| frame.width * r)
            .filter(|h| h.is_finite() && *h > 0.0)
            .unwrap_or(frame.height);
        let visible = (frame.height / image_height).min(1.0);
        return Rect::new(0.0, 0.0, 1.0, if visible.is_finite() { visible } else { 1.0 });
    }

    if presentation.content_mode == ContentMode::AspectFill {
        let Some(image_ratio) = aspect else {
            return Rect::UNIT;
        };
        let Some(frame_ratio) = frame.size().aspect_ratio() else {
            return Rect::UNIT;
        };
        if image_ratio <= 0.0 || frame_ratio <= 0.0 {
            return Rect::UNIT;
        }
        if frame_ratio > image_ratio {
            let w = image_ratio / frame_ratio;
            return Rect::new((1.0 - w) * 0.5, 0.0, w, 1.0);
        }
        let h = frame_ratio / image_ratio;
        return Rect::new(0.0, (1.0 - h) * 0.5, 1.0, h);
    }

    Rect::UNIT
}

/// The transient view that flies between the thumbnail and the full-screen image.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProxyState<I> {
    pub frame: Rect,
    pub contents_rect: Rect,
    pub content_mode: ContentMode,
    /// Unit-space point that stays fixed while the proxy scales; top-center for top crops.
    pub anchor: Point,
    pub image: Option<I>,
}

/// Source and destination frames of the proxy, in container coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProxyGeometry {
    pub from: Rect,
    pub to: Rect,
    pub presentation: Presentation,
    pub aspect: Option<f32>,
}

impl ProxyGeometry {
    pub fn frame_at(&self, progress: f32) -> Rect {
        self.from.lerp(self.to, progress)
    }

    fn anchor(&self) -> Point {
        if self.presentation.is_clipped_to_top() {
            Point::new(0.5, 0.0)
        } else {
            Point::new(0.5, 0.5)
        }
    }
}

/// One sampled frame of a running transition.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransitionFrame<I> {
    pub proxy: Option<ProxyState<I>>,
    pub backdrop_alpha: f32,
    /// Alpha of the real full-screen display; hidden while the proxy stands in for it.
    pub display_alpha: f32,
    pub surface_translation_y: f32,
    pub finished: bool,
}

/// Drives one present or dismiss transition.
///
/// Construction takes the gate for [`Driver::Transition`]; the token is released when the
/// transition completes.
#[derive(Debug)]
pub struct TransitionAnimator<I, C> {
    kind: TransitionKind,
    context: C,
    progress: Tween,
    geometry: Option<ProxyGeometry>,
    image: Option<I>,
    backdrop_from: f32,
    backdrop_to: f32,
    slide_distance: f32,
    token: Option<OwnerToken>,
    finished: bool,
}

impl<I: PhotoImage, C: TransitionContext> TransitionAnimator<I, C> {
    /// Starts presenting: the proxy flies from `thumbnail` to `destination`.
    ///
    /// Without a thumbnail or a destination only the backdrop fades in. Without a container
    /// the transition is completed as unfinished right away and `None` is returned.
    pub fn present(
        mut context: C,
        thumbnail: Option<Thumbnail<I>>,
        destination: Option<Rect>,
        options: TransitionOptions,
        gate: &mut TransitionGate,
        now_ms: u64,
    ) -> Option<Self> {
        if context.container_bounds().is_none() {
            awarn!("TransitionAnimator::present: no container; completing");
            context.complete_transition(false);
            return None;
        }

        let (geometry, image) = match (thumbnail, destination) {
            (Some(thumbnail), Some(to)) => {
                let aspect = thumbnail
                    .image
                    .as_ref()
                    .and_then(|image| image.size().aspect_ratio())
                    .or_else(|| to.size().aspect_ratio());
                let geometry = ProxyGeometry {
                    from: thumbnail.frame,
                    to,
                    presentation: thumbnail.presentation,
                    aspect,
                };
                (Some(geometry), thumbnail.image)
            }
            _ => (None, None),
        };
        adebug!(has_proxy = geometry.is_some(), "TransitionAnimator::present");

        Some(Self {
            kind: TransitionKind::Present,
            context,
            progress: Tween::new(0.0, 1.0, now_ms, options.duration_ms, options.easing),
            geometry,
            image,
            backdrop_from: 0.0,
            backdrop_to: 1.0,
            slide_distance: 0.0,
            token: Some(gate.preempt(Driver::Transition)),
            finished: false,
        })
    }

    /// Starts dismissing: the proxy flies from the displayed image back to `thumbnail`.
    ///
    /// `display` is the current display rect and image of the focused page. Pass a freshly
    /// queried thumbnail, since the source list may have scrolled since presentation. Without
    /// either the whole surface slides down by the container height.
    pub fn dismiss(
        mut context: C,
        display: Option<(Rect, Option<I>)>,
        thumbnail: Option<Thumbnail<I>>,
        options: TransitionOptions,
        gate: &mut TransitionGate,
        now_ms: u64,
    ) -> Option<Self> {
        let Some(bounds) = context.container_bounds() else {
            awarn!("TransitionAnimator::dismiss: no container; completing");
            context.complete_transition(false);
            return None;
        };

        let (geometry, image) = match (display, thumbnail) {
            (Some((from, displayed)), Some(thumbnail)) => {
                let image = displayed.or(thumbnail.image);
                let aspect = image
                    .as_ref()
                    .and_then(|image| image.size().aspect_ratio())
                    .or_else(|| from.size().aspect_ratio());
                let geometry = ProxyGeometry {
                    from,
                    to: thumbnail.frame,
                    presentation: thumbnail.presentation,
                    aspect,
                };
                (Some(geometry), image)
            }
            _ => (None, None),
        };
        let slide_distance = if geometry.is_some() { 0.0 } else { bounds.height };
        adebug!(has_proxy = geometry.is_some(), "TransitionAnimator::dismiss");

        Some(Self {
            kind: TransitionKind::Dismiss,
            context,
            progress: Tween::new(0.0, 1.0, now_ms, options.duration_ms, options.easing),
            geometry,
            image,
            backdrop_from: 1.0,
            backdrop_to: 0.0,
            slide_distance,
            token: Some(gate.preempt(Driver::Transition)),
            finished: false,
        })
    }

    pub fn kind(&self) -> TransitionKind {
        self.kind
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn has_proxy(&self) -> bool {
        self.geometry.is_some()
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    /// Samples the transition at `now_ms` without side effects.
    pub fn frame(&self, now_ms: u64) -> TransitionFrame<I> {
        let done = self.finished || self.progress.is_done(now_ms);
        let p = self.progress.sample(now_ms);
        let backdrop_alpha = self.backdrop_from + (self.backdrop_to - self.backdrop_from) * p;

        let proxy = if done {
            None
        } else {
            self.geometry.map(|geometry| {
                let frame = geometry.frame_at(p);
                ProxyState {
                    frame,
                    contents_rect: contents_rect_for(frame, geometry.aspect, &geometry.presentation),
                    content_mode: ContentMode::ScaleToFill,
                    anchor: geometry.anchor(),
                    image: self.image.clone(),
                }
            })
        };

        let display_alpha = match self.kind {
            TransitionKind::Present if self.geometry.is_some() && !done => 0.0,
            TransitionKind::Present => 1.0,
            TransitionKind::Dismiss if self.geometry.is_some() => 0.0,
            TransitionKind::Dismiss => 1.0,
        };

        TransitionFrame {
            proxy,
            backdrop_alpha: backdrop_alpha.clamp(0.0, 1.0),
            display_alpha,
            surface_translation_y: self.slide_distance * p,
            finished: done,
        }
    }

    /// Advances the transition, completing it once the duration has elapsed.
    pub fn tick(&mut self, now_ms: u64, gate: &mut TransitionGate) -> TransitionFrame<I> {
        if !self.finished && self.progress.is_done(now_ms) {
            self.finish(gate);
        }
        self.frame(now_ms)
    }

    /// Completes the transition immediately, e.g. when a newer one replaces it.
    pub fn complete_now(&mut self, gate: &mut TransitionGate) {
        if !self.finished {
            self.finish(gate);
        }
    }

    /// Whether the host finished the transition (as opposed to cancelling it).
    pub fn completed_successfully(&self) -> bool {
        self.finished && !self.context.is_cancelled()
    }

    fn finish(&mut self, gate: &mut TransitionGate) {
        self.finished = true;
        let finished = !self.context.is_cancelled();
        if let Some(token) = self.token.take() {
            if !gate.release(token) {
                atrace!("TransitionAnimator: gate already moved on");
            }
        }
        adebug!(kind = ?self.kind, finished, "TransitionAnimator: complete");
        self.context.complete_transition(finished);
    }
}
