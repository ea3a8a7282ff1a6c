use crate::pool::{CellId, CellPool, RecycleWindow};
use crate::source::ThumbnailOf;
use crate::{
    InnerScroll, PageRange, PagerDataSource, PagerDelegate, PagerOptions, PhotoCell, Point, Rect,
    Size,
};

/// Content-space frame of the cell for `index`.
fn slot_frame(view: Size, spacing: f32, index: usize) -> Rect {
    let page_width = view.width + spacing;
    Rect::new(
        index as f32 * page_width + spacing * 0.5,
        0.0,
        view.width,
        view.height,
    )
}

/// The nearest page for a horizontal offset.
///
/// Rounds rather than floors so a mid-drag offset resolves to whichever page covers more of
/// the viewport.
pub fn page_for_offset(offset: f32, page_width: f32) -> i64 {
    if page_width <= 0.0 {
        return 0;
    }
    (offset / page_width).round() as i64
}

/// A headless, horizontally paginated photo surface.
///
/// The pager does not hold UI objects. Your adapter drives it by:
/// - reporting the view size (`set_view_size`)
/// - reporting every horizontal scroll offset change (`on_scroll`)
/// - forwarding taps (`single_tap`, `double_tap`, `long_press`)
///
/// In return it keeps a small pool of [`PhotoCell`]s bound to the visible pages, asks the data
/// source for content exactly once per binding, and tells the delegate when the focused page
/// changes.
pub struct Pager<S: PagerDataSource, G = ()> {
    options: PagerOptions,
    view_size: Size,
    content_offset: f32,
    pool: CellPool<S::Display>,
    data_source: Option<S>,
    delegate: G,
    current_page: Option<usize>,
    pending_page: usize,
    visible: PageRange,
}

impl<S: PagerDataSource, G> core::fmt::Debug for Pager<S, G> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Pager")
            .field("options", &self.options)
            .field("view_size", &self.view_size)
            .field("content_offset", &self.content_offset)
            .field("pool", &self.pool)
            .field("has_data_source", &self.data_source.is_some())
            .field("current_page", &self.current_page)
            .field("visible", &self.visible)
            .finish_non_exhaustive()
    }
}

impl<S> Pager<S, ()>
where
    S: PagerDataSource,
    S::Display: Default,
{
    pub fn new(options: PagerOptions) -> Self {
        Self::with_delegate(options, ())
    }
}

impl<S, G> Pager<S, G>
where
    S: PagerDataSource,
    S::Display: Default,
    G: PagerDelegate<S::Display>,
{
    pub fn with_delegate(options: PagerOptions, delegate: G) -> Self {
        pdebug!(
            page_spacing = options.page_spacing,
            initial_page = options.initial_page,
            "Pager::new"
        );
        Self {
            pool: CellPool::new(options.min_zoom_scale, options.max_zoom_scale),
            pending_page: options.initial_page,
            options,
            view_size: Size::ZERO,
            content_offset: 0.0,
            data_source: None,
            delegate,
            current_page: None,
            visible: PageRange::EMPTY,
        }
    }

    pub fn options(&self) -> &PagerOptions {
        &self.options
    }

    pub fn set_page_spacing(&mut self, page_spacing: f32) {
        let page_spacing = page_spacing.max(0.0);
        if self.options.page_spacing == page_spacing {
            return;
        }
        self.options.page_spacing = page_spacing;
        self.relayout_cells();
        self.reload_data();
    }

    pub fn data_source(&self) -> Option<&S> {
        self.data_source.as_ref()
    }

    pub fn data_source_mut(&mut self) -> Option<&mut S> {
        self.data_source.as_mut()
    }

    /// Replaces the data source and reloads. Returns the previous source.
    ///
    /// Existing bindings belong to the old source, so they are all recycled first.
    pub fn set_data_source(&mut self, data_source: Option<S>) -> Option<S> {
        let delegate = &mut self.delegate;
        self.pool
            .release_all(|cell| delegate.did_end_displaying(cell));
        let prev = core::mem::replace(&mut self.data_source, data_source);
        self.current_page = None;
        self.visible = PageRange::EMPTY;
        self.reload_data();
        prev
    }

    pub fn delegate(&self) -> &G {
        &self.delegate
    }

    pub fn delegate_mut(&mut self) -> &mut G {
        &mut self.delegate
    }

    /// Registers the factory for display surfaces of new cells. See [`CellPool::register_factory`].
    pub fn register_display_factory(
        &mut self,
        factory: impl Fn() -> S::Display + Send + Sync + 'static,
    ) -> bool {
        self.pool.register_factory(factory)
    }

    pub fn view_size(&self) -> Size {
        self.view_size
    }

    /// Applies a layout pass of the hosting view.
    pub fn set_view_size(&mut self, size: Size) {
        if self.view_size == size {
            return;
        }
        self.view_size = size;
        self.relayout_cells();
        self.reload_data();
    }

    /// Width of one page including spacing; this is the width of the scrolling viewport.
    pub fn page_width(&self) -> f32 {
        self.view_size.width + self.options.page_spacing
    }

    pub fn item_count(&self) -> usize {
        self.data_source
            .as_ref()
            .map_or(0, |source| source.number_of_items())
    }

    pub fn content_size(&self) -> Size {
        Size::new(
            self.item_count() as f32 * self.page_width(),
            self.view_size.height,
        )
    }

    pub fn content_offset(&self) -> f32 {
        self.content_offset
    }

    pub fn max_content_offset(&self) -> f32 {
        (self.content_size().width - self.page_width()).max(0.0)
    }

    /// The focused page, or `None` while there are no items.
    pub fn current_page(&self) -> Option<usize> {
        self.current_page
    }

    pub fn visible_range(&self) -> PageRange {
        self.visible
    }

    /// Number of cells ever created (bound or pooled).
    pub fn cell_count(&self) -> usize {
        self.pool.len()
    }

    pub fn cells(&self) -> impl Iterator<Item = (CellId, &PhotoCell<S::Display>)> {
        self.pool.iter()
    }

    /// Pages in the visible range that have a bound, prepared cell.
    pub fn visible_pages(&self) -> impl Iterator<Item = usize> + '_ {
        self.visible.iter().filter(|&index| {
            self.cell_for_page(index)
                .is_some_and(|cell| cell.is_prepared())
        })
    }

    pub fn cell_for_page(&self, index: usize) -> Option<&PhotoCell<S::Display>> {
        self.pool.loaded(index).and_then(|id| self.pool.get(id))
    }

    pub fn cell_for_page_mut(&mut self, index: usize) -> Option<&mut PhotoCell<S::Display>> {
        let id = self.pool.loaded(index)?;
        self.pool.get_mut(id)
    }

    pub fn focused_cell(&self) -> Option<&PhotoCell<S::Display>> {
        self.current_page.and_then(|page| self.cell_for_page(page))
    }

    pub fn focused_cell_mut(&mut self) -> Option<&mut PhotoCell<S::Display>> {
        let page = self.current_page?;
        self.cell_for_page_mut(page)
    }

    /// Inner scroll state of the focused cell, used to gate dismiss gestures.
    pub fn focused_inner_scroll(&self) -> Option<InnerScroll> {
        self.focused_cell().map(|cell| cell.inner_scroll())
    }

    /// Content-space frame of the slot for `index`.
    pub fn cell_frame(&self, index: usize) -> Rect {
        slot_frame(self.view_size, self.options.page_spacing, index)
    }

    /// Where the image of page `index` currently appears, in the pager's view coordinates.
    pub fn display_rect_for_page(&self, index: usize) -> Option<Rect> {
        let cell = self.cell_for_page(index)?;
        let visible = cell.visible_display_rect();
        let cell_x = cell.frame().x - self.content_offset - self.options.page_spacing * 0.5;
        Some(visible.offset_by(cell_x, cell.frame().y))
    }

    /// Asks the data source for the transition thumbnail of page `index`.
    pub fn thumbnail_for_page(&self, index: usize) -> Option<ThumbnailOf<S>> {
        let source = self.data_source.as_ref()?;
        let cell = self.cell_for_page(index)?;
        source.thumbnail_for(cell)
    }

    /// Re-aligns the scroll offset to the current page and rebinds the visible cells.
    ///
    /// No-op without a data source or before the first non-empty layout.
    pub fn reload_data(&mut self) {
        if self.data_source.is_none() || !self.view_size.is_positive() {
            return;
        }
        pdebug!(count = self.item_count(), "Pager::reload_data");

        let page = self.current_page.unwrap_or(self.pending_page);
        let offset = (page as f32 * self.page_width()).clamp(0.0, self.max_content_offset());
        self.on_scroll(offset);
    }

    /// Recycles every binding and reloads. Use after the data set was reindexed.
    ///
    /// The focused page is clamped to the new item count and re-announced to the delegate.
    pub fn reload_items(&mut self) {
        let delegate = &mut self.delegate;
        self.pool
            .release_all(|cell| delegate.did_end_displaying(cell));

        let count = self.item_count();
        let page = self.current_page.unwrap_or(self.pending_page);
        self.pending_page = page.min(count.saturating_sub(1));
        self.current_page = None;
        self.visible = PageRange::EMPTY;
        self.reload_data();
    }

    /// Removes the item at `index` from the data source and reindexes.
    ///
    /// Returns `false` when there is no data source or it does not support removal.
    pub fn remove_item(&mut self, index: usize) -> bool {
        let Some(source) = self.data_source.as_mut() else {
            return false;
        };
        if !source.remove_item(index) {
            return false;
        }
        pdebug!(index, "Pager::remove_item");
        self.reload_items();
        true
    }

    /// Jumps to page `index` without animation and returns the applied offset.
    ///
    /// The current page is updated synchronously. Out-of-range indexes are clamped.
    pub fn scroll_to_page(&mut self, index: usize) -> f32 {
        let count = self.item_count();
        if count == 0 {
            self.pending_page = index;
            return self.content_offset;
        }
        let index = self.clamp_page(index, count);
        let offset = index as f32 * self.page_width();
        self.on_scroll(offset);
        self.set_current_page(index);
        offset
    }

    /// Focuses page `index`, notifying the delegate if it changed.
    ///
    /// Used when an animated scroll starts: the focus moves before the offset arrives.
    pub fn set_current_page(&mut self, index: usize) {
        let count = self.item_count();
        if count == 0 {
            self.pending_page = index;
            return;
        }
        let index = self.clamp_page(index, count);
        self.pending_page = index;
        if self.current_page == Some(index) {
            return;
        }
        self.current_page = Some(index);
        pdebug!(index, "Pager: focus changed");

        let frame = self.cell_frame(index);
        let id = self.pool.acquire(index, frame);
        if let Some(cell) = self.pool.get(id) {
            self.delegate.did_update_focus(cell);
        }
    }

    /// Handles a horizontal scroll offset change.
    ///
    /// Call this for every offset the UI reports, whether from dragging, momentum, or an
    /// animation tick.
    pub fn on_scroll(&mut self, offset: f32) {
        self.apply_scroll(offset, true);
    }

    /// Like [`Pager::on_scroll`], but keeps the current page.
    ///
    /// Used while an animated scroll passes intermediate pages on its way to a page that was
    /// already focused when the animation started.
    pub fn on_scroll_holding_focus(&mut self, offset: f32) {
        self.apply_scroll(offset, false);
    }

    fn apply_scroll(&mut self, offset: f32, update_focus: bool) {
        self.content_offset = offset;
        if !self.view_size.is_positive() {
            return;
        }
        let Some(source) = self.data_source.as_mut() else {
            return;
        };

        let count = source.number_of_items();
        let page_width = self.view_size.width + self.options.page_spacing;
        let page = page_for_offset(offset, page_width);
        let range = PageRange::around(page, count);
        ptrace!(offset, page, count, "Pager::on_scroll");
        self.visible = range;

        let delegate = &mut self.delegate;
        self.pool.release_stale(
            range,
            RecycleWindow {
                offset,
                page_width,
                count,
            },
            |cell| delegate.did_end_displaying(cell),
        );

        for index in range.iter() {
            let frame = slot_frame(self.view_size, self.options.page_spacing, index);
            let id = self.pool.acquire(index, frame);
            let Some(cell) = self.pool.get_mut(id) else {
                continue;
            };
            if !cell.is_prepared() {
                cell.mark_prepared();
                source.prepare_for_display(cell);
            }
        }

        if count == 0 {
            self.current_page = None;
        } else if update_focus && (0..count as i64).contains(&page) {
            self.set_current_page(page as usize);
        }
    }

    /// Single tap on the focused cell: resets zoom, then notifies the delegate.
    pub fn single_tap(&mut self, location: Point) {
        let Some(page) = self.current_page else {
            return;
        };
        let Some(id) = self.pool.loaded(page) else {
            return;
        };
        let Some(cell) = self.pool.get_mut(id) else {
            return;
        };
        if cell.zoom_scale() != 1.0 {
            cell.set_zoom_scale(1.0);
        }
        self.delegate.did_single_tap(location, cell);
    }

    /// Double tap on the focused cell toggles its zoom around `location`.
    pub fn double_tap(&mut self, location: Point) {
        if let Some(cell) = self.focused_cell_mut() {
            cell.toggle_zoom(location);
        }
    }

    pub fn long_press(&mut self, location: Point) {
        let Some(page) = self.current_page else {
            return;
        };
        let Some(id) = self.pool.loaded(page) else {
            return;
        };
        if let Some(cell) = self.pool.get(id) {
            self.delegate.did_long_press(location, cell);
        }
    }

    fn clamp_page(&self, index: usize, count: usize) -> usize {
        debug_assert!(index < count, "page {index} out of range for {count} items");
        if index >= count {
            pwarn!(index, count, "Pager: page out of range; clamping");
            return count - 1;
        }
        index
    }

    fn relayout_cells(&mut self) {
        let view = self.view_size;
        let spacing = self.options.page_spacing;
        self.pool
            .relayout(|index| slot_frame(view, spacing, index));
    }
}
