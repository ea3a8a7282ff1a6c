use crate::{ContentMode, EdgeInsets, ImageSink, PhotoImage, Point, Presentation, Rect, Size};

/// A snapshot of a cell's inner zoom/scroll region, used to arbitrate dismiss gestures.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InnerScroll {
    pub zoom_scale: f32,
    pub is_dragging: bool,
    pub is_decelerating: bool,
    pub content_height: f32,
    pub bounds_height: f32,
    pub offset_y: f32,
}

impl InnerScroll {
    /// Not zoomed and not moving on its own.
    pub fn is_at_rest(&self) -> bool {
        self.zoom_scale == 1.0 && !self.is_dragging && !self.is_decelerating
    }

    pub fn is_vertically_scrollable(&self) -> bool {
        self.content_height > self.bounds_height
    }

    pub fn is_at_top(&self) -> bool {
        self.offset_y <= 0.0
    }

    pub fn is_at_bottom(&self) -> bool {
        self.offset_y + self.bounds_height >= self.content_height
    }
}

/// The zoomable region inside a cell.
///
/// Offsets follow scroll-view conventions: a content point `p` appears at `p - content_offset`
/// in cell coordinates, and at rest the offset equals `(-inset.left, -inset.top)`.
#[derive(Clone, Debug, PartialEq)]
struct ZoomRegion {
    bounds: Size,
    base_content: Size,
    content_offset: Point,
    content_inset: EdgeInsets,
    zoom_scale: f32,
    min_zoom_scale: f32,
    max_zoom_scale: f32,
    is_dragging: bool,
    is_decelerating: bool,
}

impl ZoomRegion {
    fn new(min_zoom_scale: f32, max_zoom_scale: f32) -> Self {
        Self {
            bounds: Size::ZERO,
            base_content: Size::ZERO,
            content_offset: Point::ZERO,
            content_inset: EdgeInsets::default(),
            zoom_scale: 1.0,
            min_zoom_scale,
            max_zoom_scale: max_zoom_scale.max(min_zoom_scale),
            is_dragging: false,
            is_decelerating: false,
        }
    }

    fn content_size(&self) -> Size {
        Size::new(
            self.base_content.width * self.zoom_scale,
            self.base_content.height * self.zoom_scale,
        )
    }

    fn center(&mut self) {
        let content = self.content_size();
        let top = ((self.bounds.height - content.height) * 0.5).max(0.0);
        let left = ((self.bounds.width - content.width) * 0.5).max(0.0);
        self.content_inset = EdgeInsets {
            top,
            left,
            bottom: top,
            right: left,
        };
        self.clamp_offset();
    }

    fn clamp_offset(&mut self) {
        let content = self.content_size();
        let inset = self.content_inset;
        let min_x = -inset.left;
        let min_y = -inset.top;
        let max_x = (content.width + inset.right - self.bounds.width).max(min_x);
        let max_y = (content.height + inset.bottom - self.bounds.height).max(min_y);
        self.content_offset = Point::new(
            self.content_offset.x.clamp(min_x, max_x),
            self.content_offset.y.clamp(min_y, max_y),
        );
    }

    fn set_zoom_scale(&mut self, scale: f32) {
        self.zoom_scale = scale.clamp(self.min_zoom_scale, self.max_zoom_scale);
        self.center();
    }

    /// Zooms so that `rect` (in unzoomed content coordinates) fills the bounds.
    fn zoom_to(&mut self, rect: Rect) {
        if !rect.size().is_positive() {
            return;
        }
        let scale = (self.bounds.width / rect.width).min(self.bounds.height / rect.height);
        self.zoom_scale = scale.clamp(self.min_zoom_scale, self.max_zoom_scale);
        let z = self.zoom_scale;
        let visible = Size::new(self.bounds.width / z, self.bounds.height / z);
        let cx = rect.x + rect.width * 0.5;
        let cy = rect.y + rect.height * 0.5;
        self.content_offset = Point::new((cx - visible.width * 0.5) * z, (cy - visible.height * 0.5) * z);
        self.center();
    }
}

/// A reusable page cell.
///
/// A cell is bound to at most one page at a time. The pool owns every cell; cells never refer
/// back to the pool or the pager.
#[derive(Clone, Debug)]
pub struct PhotoCell<D> {
    index: Option<usize>,
    prepared: bool,
    frame: Rect,
    display: D,
    display_frame: Rect,
    zoom: ZoomRegion,
    display_alpha: f32,
    scale: f32,
}

impl<D: ImageSink> PhotoCell<D> {
    pub fn new(display: D, min_zoom_scale: f32, max_zoom_scale: f32) -> Self {
        Self {
            index: None,
            prepared: false,
            frame: Rect::ZERO,
            display,
            display_frame: Rect::ZERO,
            zoom: ZoomRegion::new(min_zoom_scale, max_zoom_scale),
            display_alpha: 1.0,
            scale: 1.0,
        }
    }

    /// The page this cell is bound to, or `None` while it sits in the reuse pool.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Whether content has been requested for the current binding.
    pub fn is_prepared(&self) -> bool {
        self.prepared
    }

    pub fn frame(&self) -> Rect {
        self.frame
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn image(&self) -> Option<&D::Image> {
        self.display.image()
    }

    /// Assigns an image to the display surface and lays the contents out again.
    ///
    /// Data sources call this when content finishes loading, synchronously or later.
    pub fn set_image(&mut self, image: Option<D::Image>) {
        let view = self.frame.size();
        let presentation = image
            .as_ref()
            .map(|image| Presentation::for_image(image.size(), view, ContentMode::AspectFit));
        self.display.set_image(image);
        if let Some(presentation) = presentation {
            self.display.set_presentation(presentation);
        }
        self.layout_contents();
    }

    /// Alpha of the real display surface; hidden while a transition proxy stands in for it.
    pub fn display_alpha(&self) -> f32 {
        self.display_alpha
    }

    pub fn set_display_alpha(&mut self, alpha: f32) {
        self.display_alpha = alpha.clamp(0.0, 1.0);
    }

    /// Uniform visual scale of the cell, used by removal animations.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale.max(0.0);
    }

    pub fn zoom_scale(&self) -> f32 {
        self.zoom.zoom_scale
    }

    pub fn is_zoomed(&self) -> bool {
        self.zoom.zoom_scale > 1.0
    }

    pub fn set_zoom_scale(&mut self, scale: f32) {
        self.zoom.set_zoom_scale(scale);
    }

    pub fn content_size(&self) -> Size {
        self.zoom.content_size()
    }

    pub fn content_inset(&self) -> EdgeInsets {
        self.zoom.content_inset
    }

    pub fn content_offset(&self) -> Point {
        self.zoom.content_offset
    }

    /// Mirrors the inner scroll position reported by the host (clamped to the content).
    pub fn set_content_offset(&mut self, offset: Point) {
        self.zoom.content_offset = offset;
        self.zoom.clamp_offset();
    }

    /// Mirrors the host's inner drag/momentum state.
    pub fn set_inner_scrolling(&mut self, is_dragging: bool, is_decelerating: bool) {
        self.zoom.is_dragging = is_dragging;
        self.zoom.is_decelerating = is_decelerating;
    }

    pub fn inner_scroll(&self) -> InnerScroll {
        InnerScroll {
            zoom_scale: self.zoom.zoom_scale,
            is_dragging: self.zoom.is_dragging,
            is_decelerating: self.zoom.is_decelerating,
            content_height: self.zoom.content_size().height,
            bounds_height: self.zoom.bounds.height,
            offset_y: self.zoom.content_offset.y,
        }
    }

    /// The unzoomed frame of the display surface inside the zoom region.
    pub fn display_frame(&self) -> Rect {
        self.display_frame
    }

    /// Where the displayed image currently appears, in cell coordinates.
    pub fn visible_display_rect(&self) -> Rect {
        let content = self.zoom.content_size();
        let offset = self.zoom.content_offset;
        Rect::new(-offset.x, -offset.y, content.width, content.height)
    }

    /// Double-tap behavior: reset when zoomed, otherwise zoom to the maximum scale around
    /// `location` (in cell coordinates).
    pub fn toggle_zoom(&mut self, location: Point) {
        if self.zoom.zoom_scale > 1.0 {
            self.zoom.set_zoom_scale(1.0);
            return;
        }
        let visible = self.visible_display_rect();
        let z = self.zoom.zoom_scale;
        let touch = Point::new((location.x - visible.x) / z, (location.y - visible.y) / z);
        let scale = self.zoom.max_zoom_scale;
        let width = self.frame.width / scale;
        let height = self.frame.height / scale;
        self.zoom.zoom_to(Rect::new(
            touch.x - width * 0.5,
            touch.y - height * 0.5,
            width,
            height,
        ));
    }

    /// Re-lays out the display surface for the current frame and image.
    ///
    /// The display keeps the cell's width and the image's aspect ratio; it falls back to the
    /// cell's height when the ratio is not finite.
    pub fn layout_contents(&mut self) {
        let bounds = self.frame.size();
        self.zoom.bounds = bounds;
        self.zoom.zoom_scale = 1.0;

        let height = self
            .display
            .image()
            .and_then(|image| image.size().aspect_ratio())
            .map(|ratio| ratio * bounds.width)
            .filter(|h| h.is_finite())
            .unwrap_or(bounds.height);
        let size = Size::new(bounds.width, height);
        self.display_frame = Rect::from_size(size);
        self.display.set_bounds(size);
        self.zoom.base_content = size;
        self.zoom.content_offset = Point::ZERO;
        self.zoom.center();
        self.zoom.content_offset = Point::new(-self.zoom.content_inset.left, -self.zoom.content_inset.top);
    }

    pub(crate) fn bind(&mut self, index: usize, frame: Rect) {
        self.index = Some(index);
        self.prepared = false;
        self.place(frame);
    }

    /// Moves the cell to `frame`, laying the contents out again when the frame changed.
    pub(crate) fn place(&mut self, frame: Rect) {
        if self.frame != frame {
            self.frame = frame;
            self.layout_contents();
        }
    }

    pub(crate) fn mark_prepared(&mut self) {
        self.prepared = true;
    }

    /// Clears the content ahead of recycling. The index stays set until [`Self::unbind`].
    pub(crate) fn clear_content(&mut self) {
        self.display.set_image(None);
        self.display_alpha = 1.0;
        self.scale = 1.0;
        self.layout_contents();
    }

    pub(crate) fn unbind(&mut self) {
        self.prepared = false;
        self.index = None;
    }
}
