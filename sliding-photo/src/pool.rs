use std::sync::Arc;

use crate::{ImageSink, PageRange, PhotoCell, Rect};

/// Builds the display surface for a freshly created cell.
pub type DisplayFactory<D> = Arc<dyn Fn() -> D + Send + Sync>;

/// A stable handle to a cell slot in a [`CellPool`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(usize);

impl CellId {
    pub fn slot(self) -> usize {
        self.0
    }
}

/// The viewport used to decide whether an out-of-range cell is far enough to recycle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RecycleWindow {
    pub offset: f32,
    pub page_width: f32,
    /// Cells bound at or beyond this index are recycled regardless of distance.
    pub count: usize,
}

impl RecycleWindow {
    /// A cell is far once it lies more than one page beyond either viewport edge.
    fn is_far(&self, frame: Rect) -> bool {
        frame.min_x() > self.offset + 2.0 * self.page_width
            || frame.max_x() < self.offset - self.page_width
    }
}

/// Arena of reusable cells, indexed by slot.
///
/// The pool is the sole owner of every cell. Cells are created lazily, reused indefinitely and
/// only dropped with the pool.
pub struct CellPool<D> {
    cells: Vec<PhotoCell<D>>,
    factory: Option<DisplayFactory<D>>,
    min_zoom_scale: f32,
    max_zoom_scale: f32,
}

impl<D> core::fmt::Debug for CellPool<D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CellPool")
            .field("len", &self.cells.len())
            .field("has_factory", &self.factory.is_some())
            .finish_non_exhaustive()
    }
}

impl<D: ImageSink + Default> CellPool<D> {
    pub fn new(min_zoom_scale: f32, max_zoom_scale: f32) -> Self {
        Self {
            cells: Vec::new(),
            factory: None,
            min_zoom_scale,
            max_zoom_scale,
        }
    }

    /// Registers the display factory used for new cells.
    ///
    /// Registration is one-time configuration: it is ignored when a factory is already set or
    /// cells already exist. Returns whether the factory was accepted.
    pub fn register_factory(&mut self, factory: impl Fn() -> D + Send + Sync + 'static) -> bool {
        if self.factory.is_some() || !self.cells.is_empty() {
            pwarn!(
                cells = self.cells.len(),
                "CellPool: display factory already registered or cells exist; ignoring"
            );
            return false;
        }
        self.factory = Some(Arc::new(factory));
        true
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, id: CellId) -> Option<&PhotoCell<D>> {
        self.cells.get(id.0)
    }

    pub fn get_mut(&mut self, id: CellId) -> Option<&mut PhotoCell<D>> {
        self.cells.get_mut(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (CellId, &PhotoCell<D>)> {
        self.cells.iter().enumerate().map(|(i, c)| (CellId(i), c))
    }

    /// Returns the cell currently bound to `index`, if any.
    pub fn loaded(&self, index: usize) -> Option<CellId> {
        self.cells
            .iter()
            .position(|c| c.index() == Some(index))
            .map(CellId)
    }

    /// Returns the cell bound to `index`, binding a free or new cell at `frame` if needed.
    ///
    /// A newly bound cell is unprepared: its content has not been requested yet.
    pub fn acquire(&mut self, index: usize, frame: Rect) -> CellId {
        if let Some(id) = self.loaded(index) {
            self.cells[id.0].place(frame);
            return id;
        }

        let slot = match self.cells.iter().position(|c| !c.is_prepared()) {
            Some(slot) => slot,
            None => {
                let display = match &self.factory {
                    Some(factory) => factory(),
                    None => D::default(),
                };
                self.cells.push(PhotoCell::new(
                    display,
                    self.min_zoom_scale,
                    self.max_zoom_scale,
                ));
                ptrace!(cells = self.cells.len(), "CellPool: created cell");
                self.cells.len() - 1
            }
        };

        ptrace!(index, slot, "CellPool: bind");
        self.cells[slot].bind(index, frame);
        CellId(slot)
    }

    /// Unbinds prepared cells outside `range` that have scrolled far from the viewport.
    ///
    /// For each recycled cell the content is cleared, `on_end` observes it (still carrying its
    /// old index), and then the index is reset.
    pub fn release_stale(
        &mut self,
        range: PageRange,
        window: RecycleWindow,
        mut on_end: impl FnMut(&mut PhotoCell<D>),
    ) {
        for cell in self.cells.iter_mut() {
            let Some(index) = cell.index() else {
                continue;
            };
            if range.contains(index) || !cell.is_prepared() {
                continue;
            }
            if index >= window.count || window.is_far(cell.frame()) {
                ptrace!(index, "CellPool: recycle");
                cell.clear_content();
                on_end(cell);
                cell.unbind();
            }
        }
    }

    /// Moves every bound cell to the frame `frame_for(index)` returns, e.g. after a resize.
    pub fn relayout(&mut self, frame_for: impl Fn(usize) -> Rect) {
        for cell in self.cells.iter_mut() {
            if let Some(index) = cell.index() {
                cell.place(frame_for(index));
            }
        }
    }

    /// Unbinds every bound cell, e.g. after the data set was reindexed.
    pub fn release_all(&mut self, mut on_end: impl FnMut(&mut PhotoCell<D>)) {
        for cell in self.cells.iter_mut() {
            if cell.index().is_none() {
                continue;
            }
            if cell.is_prepared() {
                cell.clear_content();
                on_end(cell);
            }
            cell.unbind();
        }
    }
}
