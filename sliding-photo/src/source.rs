use crate::{ImageSink, PhotoCell, Point, Thumbnail};

/// Thumbnail type produced for a data source's display surface.
pub type ThumbnailOf<S> = Thumbnail<<<S as PagerDataSource>::Display as ImageSink>::Image>;

/// Supplies items to a [`crate::Pager`].
///
/// Optional capabilities have default implementations that report "not supported".
pub trait PagerDataSource {
    type Display: ImageSink;

    fn number_of_items(&self) -> usize;

    /// Requests content for a freshly bound cell.
    ///
    /// Called at most once per binding. The source may set the image right away (via
    /// [`PhotoCell::set_image`]) or remember `cell.index()` and fill the cell later through
    /// [`crate::Pager::cell_for_page_mut`].
    fn prepare_for_display(&mut self, cell: &mut PhotoCell<Self::Display>);

    /// Thumbnail view used to animate presentation and dismissal of `cell`.
    fn thumbnail_for(&self, _cell: &PhotoCell<Self::Display>) -> Option<ThumbnailOf<Self>> {
        None
    }

    /// Removes the item at `index`. Returns `false` when removal is unsupported.
    fn remove_item(&mut self, _index: usize) -> bool {
        false
    }
}

/// Observes pager events. Every hook defaults to a no-op.
pub trait PagerDelegate<D> {
    fn did_update_focus(&mut self, _cell: &PhotoCell<D>) {}

    fn did_end_displaying(&mut self, _cell: &mut PhotoCell<D>) {}

    /// `location` is in the focused cell's coordinate space.
    fn did_single_tap(&mut self, _location: Point, _cell: &PhotoCell<D>) {}

    fn did_long_press(&mut self, _location: Point, _cell: &PhotoCell<D>) {}
}

impl<D> PagerDelegate<D> for () {}
