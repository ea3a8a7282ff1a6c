//! Adapter workflows for the `sliding-photo` crate.
//!
//! The `sliding-photo` crate is UI-agnostic and focuses on paging, cell recycling and zoom
//! geometry. This crate provides the framework-neutral, time-driven parts a photo gallery
//! adapter needs on top of it:
//!
//! - Drag-to-dismiss classification and follow-through (`DismissController`)
//! - Present/dismiss transitions between a thumbnail and the full-screen image
//!   (`TransitionAnimator`)
//! - A single-owner gate so only one animation driver mutates the shared surface at a time
//! - Tween-based animated paging and delayed item removal (`GalleryController`)
//!
//! Nothing here holds UI objects; adapters feed events and `now_ms` timestamps and render the
//! returned frame snapshots.
#![forbid(unsafe_code)]

#[macro_use]
mod macros;

mod controller;
mod dismiss;
mod gate;
mod transition;
mod tween;


pub use controller::{GalleryController, GalleryEvent, GalleryFrame, GalleryOptions, ImageOf};
pub use dismiss::{
    DismissController, DismissDirection, DismissEvent, DismissOptions, DismissPhase, Release,
    classify_release, should_begin,
};
pub use gate::{Driver, OwnerToken, TransitionGate};
pub use transition::{
    ProxyGeometry, ProxyState, TransitionAnimator, TransitionContext, TransitionFrame,
    TransitionKind, TransitionOptions, contents_rect_for,
};
pub use tween::{Easing, Tween};
