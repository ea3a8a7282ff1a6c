use sliding_photo::{
    ImageSink, Pager, PagerDataSource, PagerDelegate, PagerOptions, Size, Velocity,
};

use crate::{
    DismissController, DismissEvent, DismissOptions, Easing, ProxyState, Release,
    TransitionAnimator, TransitionContext, TransitionGate, TransitionKind, TransitionOptions,
    Tween,
};

/// Image type shown by the cells of data source `S`.
pub type ImageOf<S> = <<S as PagerDataSource>::Display as ImageSink>::Image;

type BoxedAnimator<S> = TransitionAnimator<ImageOf<S>, Box<dyn TransitionContext>>;

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GalleryOptions {
    pub pager: PagerOptions,
    pub dismiss: DismissOptions,
    pub transition: TransitionOptions,
    /// How long a removed item shrinks before the data set is reindexed.
    pub removal_delay_ms: u64,
    pub scroll_duration_ms: u64,
    pub scroll_easing: Easing,
}

impl Default for GalleryOptions {
    fn default() -> Self {
        Self {
            pager: PagerOptions::default(),
            dismiss: DismissOptions::default(),
            transition: TransitionOptions::default(),
            removal_delay_ms: 300,
            scroll_duration_ms: 300,
            scroll_easing: Easing::EaseInOutCubic,
        }
    }
}

impl GalleryOptions {
    pub fn with_pager(mut self, pager: PagerOptions) -> Self {
        self.pager = pager;
        self
    }

    pub fn with_dismiss(mut self, dismiss: DismissOptions) -> Self {
        self.dismiss = dismiss;
        self
    }

    pub fn with_transition(mut self, transition: TransitionOptions) -> Self {
        self.transition = transition;
        self
    }

    pub fn with_removal_delay(mut self, removal_delay_ms: u64) -> Self {
        self.removal_delay_ms = removal_delay_ms;
        self
    }

    pub fn with_scroll_animation(mut self, duration_ms: u64, easing: Easing) -> Self {
        self.scroll_duration_ms = duration_ms;
        self.scroll_easing = easing;
        self
    }
}

/// Notifications produced by [`GalleryController::tick`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GalleryEvent {
    /// A present transition completed. `finished` is `false` when the host cancelled it.
    Presented { finished: bool },
    /// The gallery left the screen, by gesture or by a dismiss transition.
    DidDismiss,
    /// A dismiss transition was cancelled by the host; the gallery stays up.
    DismissCancelled,
    /// The item was removed from the data source and the pager reindexed.
    ItemRemoved { index: usize },
}

/// Everything a renderer needs to draw one frame of the gallery.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GalleryFrame<I> {
    pub scroll_offset: f32,
    pub current_page: Option<usize>,
    pub surface_translation_y: f32,
    pub backdrop_alpha: f32,
    /// Alpha of the focused cell's display.
    pub display_alpha: f32,
    pub proxy: Option<ProxyState<I>>,
}

#[derive(Clone, Copy, Debug)]
struct PendingRemoval {
    index: usize,
    shrink: Tween,
}

/// A framework-neutral gallery that composes the pager, the interactive dismiss gesture and
/// present/dismiss transitions.
///
/// This type does not hold any UI objects. Adapters drive it by calling:
/// - `set_view_size` / `on_scroll` when UI events occur
/// - `pan_*` for vertical drags on the focused page
/// - `tick(now_ms)` each frame/timer tick (for animations and delayed removal)
///
/// and render from [`GalleryController::frame`].
pub struct GalleryController<S: PagerDataSource, G = ()> {
    pager: Pager<S, G>,
    options: GalleryOptions,
    gate: TransitionGate,
    dismiss: DismissController,
    transition: Option<BoxedAnimator<S>>,
    scroll: Option<Tween>,
    removal: Option<PendingRemoval>,
    on_screen: bool,
}

impl<S: PagerDataSource, G> core::fmt::Debug for GalleryController<S, G> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GalleryController")
            .field("options", &self.options)
            .field("gate", &self.gate)
            .field("dismiss", &self.dismiss)
            .field("transition", &self.transition.as_ref().map(|t| t.kind()))
            .field("scroll", &self.scroll)
            .field("removal", &self.removal)
            .field("on_screen", &self.on_screen)
            .finish_non_exhaustive()
    }
}

impl<S> GalleryController<S, ()>
where
    S: PagerDataSource,
    S::Display: Default,
{
    pub fn new(options: GalleryOptions) -> Self {
        Self::with_delegate(options, ())
    }
}

impl<S, G> GalleryController<S, G>
where
    S: PagerDataSource,
    S::Display: Default,
    G: PagerDelegate<S::Display>,
{
    pub fn with_delegate(options: GalleryOptions, delegate: G) -> Self {
        Self::from_pager(Pager::with_delegate(options.pager, delegate), options)
    }

    pub fn from_pager(pager: Pager<S, G>, options: GalleryOptions) -> Self {
        let mut dismiss = DismissController::new(options.dismiss);
        dismiss.set_container_height(pager.view_size().height);
        Self {
            pager,
            options,
            gate: TransitionGate::new(),
            dismiss,
            transition: None,
            scroll: None,
            removal: None,
            on_screen: true,
        }
    }

    pub fn options(&self) -> &GalleryOptions {
        &self.options
    }

    pub fn pager(&self) -> &Pager<S, G> {
        &self.pager
    }

    pub fn pager_mut(&mut self) -> &mut Pager<S, G> {
        &mut self.pager
    }

    pub fn into_pager(self) -> Pager<S, G> {
        self.pager
    }

    pub fn dismiss_controller(&self) -> &DismissController {
        &self.dismiss
    }

    pub fn gate(&self) -> &TransitionGate {
        &self.gate
    }

    pub fn is_on_screen(&self) -> bool {
        self.on_screen
    }

    pub fn is_animating(&self) -> bool {
        self.scroll.is_some()
            || self.removal.is_some()
            || self.transition.is_some()
            || self.dismiss.is_animating()
    }

    pub fn set_data_source(&mut self, data_source: Option<S>) -> Option<S> {
        self.scroll = None;
        self.removal = None;
        self.pager.set_data_source(data_source)
    }

    pub fn set_view_size(&mut self, size: Size) {
        self.pager.set_view_size(size);
        self.dismiss.set_container_height(size.height);
    }

    pub fn cancel_scroll_animation(&mut self) {
        self.scroll = None;
    }

    /// Call this when the UI reports a horizontal scroll offset change (e.g. user drag).
    ///
    /// This cancels any active scroll tween.
    pub fn on_scroll(&mut self, offset: f32) {
        self.cancel_scroll_animation();
        self.pager.on_scroll(offset);
    }

    /// Scrolls to page `index`, optionally animated. Returns the target offset.
    ///
    /// The current page changes immediately in both cases. An animated scroll then replays the
    /// scroll handler on every tick, binding the pages it passes while the focus stays on the
    /// target.
    pub fn scroll_to_page(&mut self, index: usize, animated: bool, now_ms: u64) -> f32 {
        self.cancel_scroll_animation();
        let count = self.pager.item_count();
        if !animated || count == 0 {
            return self.pager.scroll_to_page(index);
        }

        debug_assert!(index < count, "page {index} out of range for {count} items");
        let index = index.min(count - 1);
        let to = (index as f32 * self.pager.page_width()).clamp(0.0, self.pager.max_content_offset());
        let from = self.pager.content_offset();
        self.pager.set_current_page(index);
        adebug!(index, from, to, "GalleryController::scroll_to_page");
        self.scroll = Some(Tween::new(
            from,
            to,
            now_ms,
            self.options.scroll_duration_ms,
            self.options.scroll_easing,
        ));
        to
    }

    /// A vertical pan began on the focused page. Returns whether the dismiss drag took it.
    pub fn pan_began(&mut self, velocity: Velocity) -> bool {
        if !self.on_screen || self.transition.is_some() {
            return false;
        }
        let inner = self.pager.focused_inner_scroll();
        self.dismiss.begin(velocity, inner, &mut self.gate)
    }

    pub fn pan_changed(&mut self, translation_y: f32) {
        self.dismiss.update(translation_y, &self.gate);
    }

    pub fn pan_ended(&mut self, velocity_y: f32, translation_y: f32, now_ms: u64) -> Option<Release> {
        self.dismiss
            .end(velocity_y, translation_y, now_ms, &self.gate)
    }

    pub fn pan_cancelled(&mut self) {
        self.dismiss.cancel(&mut self.gate);
    }

    /// Starts the present transition from the focused page's thumbnail.
    ///
    /// A transition already in flight is completed first so its host handshake resolves.
    pub fn present(&mut self, context: impl TransitionContext + 'static, now_ms: u64) {
        self.complete_transition_now();
        self.dismiss.reset();

        let page = self.pager.current_page();
        let thumbnail = page.and_then(|page| self.pager.thumbnail_for_page(page));
        let destination = page.and_then(|page| self.pager.display_rect_for_page(page));
        let context: Box<dyn TransitionContext> = Box::new(context);

        self.transition = TransitionAnimator::present(
            context,
            thumbnail,
            destination,
            self.options.transition,
            &mut self.gate,
            now_ms,
        );
        if self.transition.is_some() {
            self.on_screen = true;
            self.apply_display_alpha(now_ms);
        }
    }

    /// Starts the dismiss transition back to the (re-queried) thumbnail of the focused page.
    pub fn dismiss(&mut self, context: impl TransitionContext + 'static, now_ms: u64) {
        self.complete_transition_now();
        self.dismiss.reset();

        let page = self.pager.current_page();
        let display = page.and_then(|page| {
            let rect = self.pager.display_rect_for_page(page)?;
            let image = self
                .pager
                .cell_for_page(page)
                .and_then(|cell| cell.image().cloned());
            Some((rect, image))
        });
        let thumbnail = page.and_then(|page| self.pager.thumbnail_for_page(page));
        let context: Box<dyn TransitionContext> = Box::new(context);

        self.transition = TransitionAnimator::dismiss(
            context,
            display,
            thumbnail,
            self.options.transition,
            &mut self.gate,
            now_ms,
        );
        if self.transition.is_some() {
            self.apply_display_alpha(now_ms);
        }
    }

    /// Removes item `index` after shrinking its cell for the removal delay.
    ///
    /// Returns `false` for an out-of-range index or while another removal is pending.
    pub fn remove_item(&mut self, index: usize, now_ms: u64) -> bool {
        if self.removal.is_some() {
            awarn!(index, "GalleryController::remove_item: removal already pending");
            return false;
        }
        let count = self.pager.item_count();
        debug_assert!(index < count, "item {index} out of range for {count} items");
        if index >= count {
            awarn!(index, "GalleryController::remove_item: index out of range");
            return false;
        }
        adebug!(index, "GalleryController::remove_item");
        self.removal = Some(PendingRemoval {
            index,
            shrink: Tween::new(
                1.0,
                0.0,
                now_ms,
                self.options.removal_delay_ms,
                Easing::EaseOut,
            ),
        });
        true
    }

    /// Advances every running animation and reports finished workflows through `on_event`.
    ///
    /// Returns the scroll offset applied by an active scroll tween, if any.
    pub fn tick(&mut self, now_ms: u64, mut on_event: impl FnMut(GalleryEvent)) -> Option<f32> {
        let offset = self.tick_scroll(now_ms);

        if let Some(removal) = self.removal {
            let scale = removal.shrink.sample(now_ms);
            if let Some(cell) = self.pager.cell_for_page_mut(removal.index) {
                cell.set_scale(scale);
            }
            if removal.shrink.is_done(now_ms) {
                self.removal = None;
                if self.pager.remove_item(removal.index) {
                    on_event(GalleryEvent::ItemRemoved {
                        index: removal.index,
                    });
                } else if let Some(cell) = self.pager.cell_for_page_mut(removal.index) {
                    cell.set_scale(1.0);
                }
            }
        }

        if let Some(DismissEvent::Dismissed(_)) = self.dismiss.tick(now_ms, &mut self.gate) {
            adebug!("GalleryController: dismissed by gesture");
            self.on_screen = false;
            on_event(GalleryEvent::DidDismiss);
        }

        if let Some(event) = self.tick_transition(now_ms) {
            on_event(event);
        }

        offset
    }

    /// Samples the current visual state.
    pub fn frame(&self, now_ms: u64) -> GalleryFrame<ImageOf<S>> {
        let scroll_offset = self.pager.content_offset();
        let current_page = self.pager.current_page();

        if let Some(transition) = &self.transition {
            let tf = transition.frame(now_ms);
            return GalleryFrame {
                scroll_offset,
                current_page,
                surface_translation_y: tf.surface_translation_y,
                backdrop_alpha: tf.backdrop_alpha,
                display_alpha: tf.display_alpha,
                proxy: tf.proxy,
            };
        }

        let (backdrop_alpha, display_alpha) = if self.on_screen {
            let display = self.pager.focused_cell().map_or(1.0, |cell| cell.display_alpha());
            (self.dismiss.backdrop_alpha(), display)
        } else {
            (0.0, 0.0)
        };
        GalleryFrame {
            scroll_offset,
            current_page,
            surface_translation_y: self.dismiss.translation_y(),
            backdrop_alpha,
            display_alpha,
            proxy: None,
        }
    }

    fn tick_scroll(&mut self, now_ms: u64) -> Option<f32> {
        let tween = self.scroll?;
        let offset = tween.sample(now_ms);
        if tween.is_done(now_ms) {
            self.scroll = None;
            self.pager.on_scroll(offset);
        } else {
            self.pager.on_scroll_holding_focus(offset);
        }
        Some(self.pager.content_offset())
    }

    fn tick_transition(&mut self, now_ms: u64) -> Option<GalleryEvent> {
        let transition = self.transition.as_mut()?;
        let tf = transition.tick(now_ms, &mut self.gate);
        if let Some(cell) = self.pager.focused_cell_mut() {
            cell.set_display_alpha(tf.display_alpha);
        }
        if !tf.finished {
            return None;
        }
        let kind = transition.kind();
        let finished = transition.completed_successfully();
        self.transition = None;
        Some(self.finish_transition(kind, finished))
    }

    fn finish_transition(&mut self, kind: TransitionKind, finished: bool) -> GalleryEvent {
        match kind {
            TransitionKind::Present => {
                if let Some(cell) = self.pager.focused_cell_mut() {
                    cell.set_display_alpha(1.0);
                }
                GalleryEvent::Presented { finished }
            }
            TransitionKind::Dismiss if finished => {
                self.on_screen = false;
                GalleryEvent::DidDismiss
            }
            TransitionKind::Dismiss => {
                if let Some(cell) = self.pager.focused_cell_mut() {
                    cell.set_display_alpha(1.0);
                }
                GalleryEvent::DismissCancelled
            }
        }
    }

    fn complete_transition_now(&mut self) {
        if let Some(mut transition) = self.transition.take() {
            transition.complete_now(&mut self.gate);
        }
    }

    fn apply_display_alpha(&mut self, now_ms: u64) {
        let Some(transition) = &self.transition else {
            return;
        };
        let alpha = transition.frame(now_ms).display_alpha;
        if let Some(cell) = self.pager.focused_cell_mut() {
            cell.set_display_alpha(alpha);
        }
    }
}
