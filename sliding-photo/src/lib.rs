//! A headless paging photo viewer engine.
//!
//! For gesture-driven dismissal and present/dismiss transitions, see the `sliding-photo-adapter`
//! crate.
//!
//! This crate focuses on the parts of a swipeable, zoomable photo gallery that are independent
//! of any toolkit: a small pool of recycled page cells, nearest-page tracking from a horizontal
//! scroll offset, per-cell zoom geometry, and the image presentation rules used for thumbnails.
//!
//! It is UI-agnostic. A GUI layer is expected to provide:
//! - the view size
//! - horizontal scroll offsets (dragging, momentum, animations)
//! - tap locations and inner scroll state of the focused cell
#![forbid(unsafe_code)]

#[macro_use]
mod macros;

mod cell;
mod display;
mod image;
mod options;
mod pager;
mod pool;
mod source;
mod types;

#[cfg(test)]
mod tests;

pub use cell::{InnerScroll, PhotoCell};
pub use display::{ContentMode, DisplaySurface, ImageSink, Presentation, Thumbnail};
pub use image::PhotoImage;
pub use options::PagerOptions;
pub use pager::{Pager, page_for_offset};
pub use pool::{CellId, CellPool, DisplayFactory, RecycleWindow};
pub use source::{PagerDataSource, PagerDelegate, ThumbnailOf};
pub use types::{EdgeInsets, PageRange, Point, Rect, Size, Velocity};
