use crate::{PhotoImage, Rect, Size};

/// How a surface maps its image onto its bounds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ContentMode {
    /// Stretch the (possibly cropped) contents to the bounds.
    ScaleToFill,
    /// Fit the whole image inside the bounds.
    AspectFit,
    /// Cover the bounds, cropping around the center.
    #[default]
    AspectFill,
}

/// The content mode plus the unit-space contents rect a surface displays.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Presentation {
    pub content_mode: ContentMode,
    /// Portion of the image shown, in unit coordinates (`Rect::UNIT` is the whole image).
    pub contents_rect: Rect,
}

impl Default for Presentation {
    fn default() -> Self {
        Self {
            content_mode: ContentMode::default(),
            contents_rect: Rect::UNIT,
        }
    }
}

impl Presentation {
    /// Computes how `image` should be shown in a surface of size `view`.
    ///
    /// When the image is relatively taller than the view, only its top part is shown: the
    /// contents rect is cropped to the view's aspect ratio and stretched to fill ("contents
    /// clipped to top"). Otherwise the whole image is shown using `otherwise`.
    pub fn for_image(image: Size, view: Size, otherwise: ContentMode) -> Self {
        let image_ratio = image.height / image.width;
        let view_ratio = view.height / view.width;
        let scale = image_ratio / view_ratio;
        if scale.is_finite() && scale > 1.0 {
            Self {
                content_mode: ContentMode::ScaleToFill,
                contents_rect: Rect::new(0.0, 0.0, 1.0, view_ratio / image_ratio),
            }
        } else {
            Self {
                content_mode: otherwise,
                contents_rect: Rect::UNIT,
            }
        }
    }

    pub fn is_clipped_to_top(&self) -> bool {
        self.content_mode == ContentMode::ScaleToFill && self.contents_rect.height < 1.0
    }
}

/// A displayable surface that can receive an image.
///
/// Every surface type (plain layers, image views, animated views) implements this single
/// interface, so image assignment never has to inspect the concrete type.
pub trait ImageSink {
    type Image: PhotoImage;

    fn image(&self) -> Option<&Self::Image>;

    /// Stores the image without touching the presentation. Prefer [`ImageSink::assign`].
    fn set_image(&mut self, image: Option<Self::Image>);

    fn bounds(&self) -> Size;

    fn set_bounds(&mut self, bounds: Size);

    fn presentation(&self) -> Presentation;

    fn set_presentation(&mut self, presentation: Presentation);

    /// Content mode used when the image does not need a top crop.
    fn fallback_content_mode(&self) -> ContentMode {
        ContentMode::AspectFill
    }

    /// Assigns an image and recomputes the presentation for the current bounds.
    fn assign(&mut self, image: Option<Self::Image>) {
        let presentation = image.as_ref().map(|image| {
            Presentation::for_image(image.size(), self.bounds(), self.fallback_content_mode())
        });
        self.set_image(image);
        if let Some(presentation) = presentation {
            self.set_presentation(presentation);
        }
    }
}

/// The stock surface used by cells when no custom factory is registered.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplaySurface<I> {
    image: Option<I>,
    bounds: Size,
    presentation: Presentation,
    fallback: ContentMode,
}

impl<I> DisplaySurface<I> {
    pub fn new(fallback: ContentMode) -> Self {
        Self {
            image: None,
            bounds: Size::ZERO,
            presentation: Presentation {
                content_mode: fallback,
                contents_rect: Rect::UNIT,
            },
            fallback,
        }
    }
}

impl<I> Default for DisplaySurface<I> {
    fn default() -> Self {
        Self::new(ContentMode::AspectFill)
    }
}

impl<I: PhotoImage> ImageSink for DisplaySurface<I> {
    type Image = I;

    fn image(&self) -> Option<&I> {
        self.image.as_ref()
    }

    fn set_image(&mut self, image: Option<I>) {
        self.image = image;
    }

    fn bounds(&self) -> Size {
        self.bounds
    }

    fn set_bounds(&mut self, bounds: Size) {
        self.bounds = bounds;
    }

    fn presentation(&self) -> Presentation {
        self.presentation
    }

    fn set_presentation(&mut self, presentation: Presentation) {
        self.presentation = presentation;
    }

    fn fallback_content_mode(&self) -> ContentMode {
        self.fallback
    }
}

/// A snapshot of an external view used as the geometry and image source of a transition.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Thumbnail<I> {
    /// Frame in the presenting container's coordinate space.
    pub frame: Rect,
    pub image: Option<I>,
    pub presentation: Presentation,
}

impl<I: PhotoImage> Thumbnail<I> {
    /// Captures a thumbnail from any image sink placed at `frame`.
    pub fn capture<S: ImageSink<Image = I>>(frame: Rect, sink: &S) -> Self {
        Self {
            frame,
            image: sink.image().cloned(),
            presentation: sink.presentation(),
        }
    }
}
