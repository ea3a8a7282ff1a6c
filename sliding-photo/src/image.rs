use crate::Size;

/// An image the engine can lay out.
///
/// The engine never decodes or draws pixels; it only needs the natural size to compute content
/// geometry. Adapters implement this for whatever handle their toolkit uses.
pub trait PhotoImage: Clone {
    fn size(&self) -> Size;
}

impl PhotoImage for Size {
    fn size(&self) -> Size {
        *self
    }
}

impl<T: PhotoImage> PhotoImage for std::sync::Arc<T> {
    fn size(&self) -> Size {
        (**self).size()
    }
}
