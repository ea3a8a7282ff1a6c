/// Configuration for [`crate::Pager`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PagerOptions {
    /// Gap between adjacent pages. Each page occupies `view width + page_spacing`.
    pub page_spacing: f32,
    pub min_zoom_scale: f32,
    pub max_zoom_scale: f32,
    /// Page focused on the first reload.
    pub initial_page: usize,
}

impl Default for PagerOptions {
    fn default() -> Self {
        Self {
            page_spacing: 20.0,
            min_zoom_scale: 1.0,
            max_zoom_scale: 3.0,
            initial_page: 0,
        }
    }
}

impl PagerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page_spacing(mut self, page_spacing: f32) -> Self {
        self.page_spacing = page_spacing.max(0.0);
        self
    }

    pub fn with_zoom_scales(mut self, min_zoom_scale: f32, max_zoom_scale: f32) -> Self {
        self.min_zoom_scale = min_zoom_scale;
        self.max_zoom_scale = max_zoom_scale.max(min_zoom_scale);
        self
    }

    pub fn with_initial_page(mut self, initial_page: usize) -> Self {
        self.initial_page = initial_page;
        self
    }
}
