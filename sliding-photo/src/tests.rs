use crate::*;

use std::collections::BTreeSet;
use std::vec::Vec;

const VIEW: Size = Size::new(300.0, 600.0);
const PAGE: f32 = 320.0; // VIEW.width + default spacing

#[derive(Clone, Copy, Debug)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        // Deterministic, dependency-free PRNG for tests.
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn gen_f32(&mut self, start: f32, end: f32) -> f32 {
        let unit = (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32;
        start + (end - start) * unit
    }
}

#[derive(Debug, Default)]
struct Photos {
    sizes: Vec<Size>,
    loads: Vec<usize>,
}

impl Photos {
    fn uniform(count: usize, size: Size) -> Self {
        Self {
            sizes: vec![size; count],
            loads: Vec::new(),
        }
    }
}

impl PagerDataSource for Photos {
    type Display = DisplaySurface<Size>;

    fn number_of_items(&self) -> usize {
        self.sizes.len()
    }

    fn prepare_for_display(&mut self, cell: &mut PhotoCell<Self::Display>) {
        let Some(index) = cell.index() else {
            return;
        };
        self.loads.push(index);
        cell.set_image(Some(self.sizes[index]));
    }

    fn remove_item(&mut self, index: usize) -> bool {
        if index >= self.sizes.len() {
            return false;
        }
        self.sizes.remove(index);
        true
    }
}

#[derive(Debug, Default)]
struct Events {
    focus: Vec<usize>,
    ended: Vec<(usize, bool)>,
    taps: Vec<(Point, usize)>,
    long_presses: usize,
}

impl<D: ImageSink> PagerDelegate<D> for Events {
    fn did_update_focus(&mut self, cell: &PhotoCell<D>) {
        self.focus.extend(cell.index());
    }

    fn did_end_displaying(&mut self, cell: &mut PhotoCell<D>) {
        if let Some(index) = cell.index() {
            self.ended.push((index, cell.image().is_some()));
        }
    }

    fn did_single_tap(&mut self, location: Point, cell: &PhotoCell<D>) {
        self.taps.extend(cell.index().map(|i| (location, i)));
    }

    fn did_long_press(&mut self, _location: Point, _cell: &PhotoCell<D>) {
        self.long_presses += 1;
    }
}

fn pager(count: usize) -> Pager<Photos, Events> {
    let mut p = Pager::with_delegate(PagerOptions::default(), Events::default());
    p.set_view_size(VIEW);
    p.set_data_source(Some(Photos::uniform(count, Size::new(300.0, 200.0))));
    p
}

fn bound_set(p: &Pager<Photos, Events>) -> BTreeSet<usize> {
    p.visible_pages().collect()
}

#[test]
fn page_range_around_clamps_to_count() {
    assert_eq!(PageRange::around(0, 10), PageRange { start: 0, end: 1 });
    assert_eq!(PageRange::around(5, 10), PageRange { start: 4, end: 6 });
    assert_eq!(PageRange::around(9, 10), PageRange { start: 8, end: 9 });
    assert_eq!(PageRange::around(0, 1), PageRange { start: 0, end: 0 });
    assert!(PageRange::around(0, 0).is_empty());
    assert!(PageRange::around(-5, 3).is_empty());
    assert!(PageRange::around(12, 3).is_empty());
    assert_eq!(PageRange::around(-1, 3), PageRange { start: 0, end: 0 });
    assert_eq!(PageRange::EMPTY.iter().count(), 0);
    assert_eq!(PageRange::EMPTY.len(), 0);
}

#[test]
fn page_for_offset_rounds_to_nearest() {
    assert_eq!(page_for_offset(0.0, PAGE), 0);
    assert_eq!(page_for_offset(PAGE * 0.49, PAGE), 0);
    assert_eq!(page_for_offset(PAGE * 0.6, PAGE), 1);
    assert_eq!(page_for_offset(PAGE * 3.4, PAGE), 3);
    assert_eq!(page_for_offset(-PAGE * 0.6, PAGE), -1);
    assert_eq!(page_for_offset(100.0, 0.0), 0);
}

#[test]
fn bound_pages_match_visible_window_for_random_offsets() {
    let count = 10usize;
    let mut p = pager(count);
    let mut rng = Lcg::new(7);

    for _ in 0..2_000 {
        let offset = rng.gen_f32(-400.0, count as f32 * PAGE + 400.0);
        p.on_scroll(offset);

        let page = (offset / PAGE).round() as i64;
        let expected = PageRange::around(page, count);
        assert_eq!(p.visible_range(), expected, "offset={offset}");

        let want: BTreeSet<usize> = expected.iter().collect();
        assert_eq!(bound_set(&p), want, "offset={offset}");

        // At most one out-of-range page may linger, and only right next to the window.
        let lingering: Vec<usize> = p
            .cells()
            .filter_map(|(_, c)| c.index().filter(|i| !expected.contains(*i)))
            .collect();
        assert!(lingering.len() <= 1, "lingering={lingering:?}");
    }
}

#[test]
fn rebinding_within_visible_range_loads_once() {
    let mut p = pager(5);
    p.data_source_mut().unwrap().loads.clear();

    let mut offset = 0.0;
    while offset < PAGE * 0.45 {
        p.on_scroll(offset);
        offset += 7.5;
    }
    p.on_scroll(0.0);

    assert!(p.data_source().unwrap().loads.is_empty());
}

#[test]
fn each_binding_requests_content_exactly_once() {
    let mut p = pager(6);
    let mut offset = 0.0;
    while offset <= 5.0 * PAGE {
        p.on_scroll(offset);
        offset += 13.0;
    }

    let loads = &p.data_source().unwrap().loads;
    let unique: BTreeSet<usize> = loads.iter().copied().collect();
    assert_eq!(loads.len(), unique.len(), "loads={loads:?}");
    assert_eq!(unique, (0..6).collect());
}

#[test]
fn pool_size_is_bounded_by_window_plus_one() {
    let mut p = pager(1000);
    let mut offset = 0.0;
    while offset <= 999.0 * PAGE {
        p.on_scroll(offset);
        assert!(p.cell_count() <= 4, "cells={} at {offset}", p.cell_count());
        offset += 37.0;
    }
    while offset >= 0.0 {
        p.on_scroll(offset);
        assert!(p.cell_count() <= 4);
        offset -= 53.0;
    }

    let mut rng = Lcg::new(42);
    for _ in 0..1_000 {
        p.on_scroll(rng.gen_f32(0.0, 999.0 * PAGE));
        assert!(p.cell_count() <= 4);
    }
}

#[test]
fn focus_notifies_only_on_page_change() {
    let mut p = pager(5);
    assert_eq!(p.delegate().focus, vec![0]);
    assert_eq!(p.current_page(), Some(0));

    for step in 0..16 {
        p.on_scroll(step as f32 * 10.0);
    }
    assert_eq!(p.delegate().focus, vec![0]);

    p.on_scroll(PAGE * 0.6);
    assert_eq!(p.current_page(), Some(1));
    p.on_scroll(PAGE * 0.9);
    p.on_scroll(PAGE);
    assert_eq!(p.delegate().focus, vec![0, 1]);

    p.on_scroll(PAGE * 0.2);
    assert_eq!(p.delegate().focus, vec![0, 1, 0]);
}

#[test]
fn overscroll_keeps_current_page() {
    let mut p = pager(3);
    p.scroll_to_page(2);
    p.on_scroll(3.0 * PAGE);
    assert_eq!(p.current_page(), Some(2));
    assert_eq!(p.visible_range(), PageRange { start: 2, end: 2 });
}

#[test]
fn scroll_to_page_updates_current_page_synchronously() {
    let mut p = pager(8);
    let offset = p.scroll_to_page(5);
    assert_eq!(offset, 5.0 * PAGE);
    assert_eq!(p.current_page(), Some(5));
    assert_eq!(p.content_offset(), 5.0 * PAGE);
    assert_eq!(bound_set(&p), [4, 5, 6].into_iter().collect());
    assert_eq!(p.delegate().focus, vec![0, 5]);
}

#[test]
#[cfg_attr(debug_assertions, should_panic(expected = "out of range"))]
fn out_of_range_page_asserts_in_debug_and_clamps_in_release() {
    let mut p = pager(3);
    p.scroll_to_page(7);
    assert_eq!(p.current_page(), Some(2));
    assert_eq!(p.content_offset(), 2.0 * PAGE);
}

#[test]
fn scrolling_while_holding_focus_binds_without_refocusing() {
    let mut p = pager(6);
    p.set_current_page(4);
    assert_eq!(p.delegate().focus, vec![0, 4]);

    p.on_scroll_holding_focus(PAGE * 2.0);
    assert_eq!(p.current_page(), Some(4));
    assert_eq!(p.visible_range(), PageRange { start: 1, end: 3 });
    assert_eq!(bound_set(&p), [1, 2, 3].into_iter().collect());
    assert_eq!(p.delegate().focus, vec![0, 4]);

    p.on_scroll(PAGE * 2.0);
    assert_eq!(p.current_page(), Some(2));
    assert_eq!(p.delegate().focus, vec![0, 4, 2]);
}

#[test]
fn initial_page_is_applied_on_first_layout() {
    let mut p: Pager<Photos, Events> = Pager::with_delegate(
        PagerOptions::default().with_initial_page(3),
        Events::default(),
    );
    p.set_data_source(Some(Photos::uniform(6, Size::new(10.0, 10.0))));
    assert_eq!(p.current_page(), None);
    assert_eq!(p.cell_count(), 0);

    p.set_view_size(VIEW);
    assert_eq!(p.current_page(), Some(3));
    assert_eq!(p.content_offset(), 3.0 * PAGE);
    assert_eq!(p.delegate().focus, vec![3]);
}

#[test]
fn missing_data_source_is_a_no_op() {
    let mut p: Pager<Photos> = Pager::new(PagerOptions::default());
    p.set_view_size(VIEW);
    p.on_scroll(500.0);
    p.reload_data();
    p.single_tap(Point::new(1.0, 1.0));
    p.double_tap(Point::new(1.0, 1.0));
    assert_eq!(p.cell_count(), 0);
    assert_eq!(p.current_page(), None);
    assert_eq!(p.item_count(), 0);
    assert!(!p.remove_item(0));
}

#[test]
fn zero_items_yields_empty_range() {
    let p = pager(0);
    assert!(p.visible_range().is_empty());
    assert_eq!(p.current_page(), None);
    assert_eq!(p.cell_count(), 0);
}

#[test]
fn removing_last_item_empties_the_pager() {
    let mut p = pager(1);
    assert_eq!(bound_set(&p), [0].into_iter().collect());

    assert!(p.remove_item(0));
    assert_eq!(p.item_count(), 0);
    assert!(p.visible_range().is_empty());
    assert_eq!(p.current_page(), None);
    assert!(p.cells().all(|(_, c)| c.index().is_none()));
    assert_eq!(p.delegate().ended, vec![(0, false)]);

    p.on_scroll(0.0);
    assert!(p.visible_range().is_empty());
}

#[test]
fn removing_focused_item_reindexes_and_refocuses() {
    let mut p = pager(4);
    p.scroll_to_page(3);
    p.data_source_mut().unwrap().loads.clear();

    assert!(p.remove_item(3));
    assert_eq!(p.item_count(), 3);
    assert_eq!(p.current_page(), Some(2));
    assert_eq!(bound_set(&p), [1, 2].into_iter().collect());
    assert_eq!(p.delegate().focus.last(), Some(&2));

    let loads: BTreeSet<usize> = p.data_source().unwrap().loads.iter().copied().collect();
    assert_eq!(loads, [1, 2].into_iter().collect());
}

#[test]
fn recycled_cells_are_cleared_before_notification() {
    let mut p = pager(10);
    p.scroll_to_page(5);

    let ended: BTreeSet<usize> = p.delegate().ended.iter().map(|(i, _)| *i).collect();
    assert_eq!(ended, [0, 1].into_iter().collect());
    assert!(p.delegate().ended.iter().all(|(_, has_image)| !has_image));
}

#[test]
fn factory_registration_is_one_time() {
    let mut p: Pager<Photos> = Pager::new(PagerOptions::default());
    assert!(p.register_display_factory(|| DisplaySurface::new(ContentMode::AspectFit)));
    assert!(!p.register_display_factory(DisplaySurface::default));

    p.set_view_size(VIEW);
    p.set_data_source(Some(Photos::uniform(3, Size::new(10.0, 10.0))));
    assert!(
        p.cells()
            .all(|(_, c)| c.display().fallback_content_mode() == ContentMode::AspectFit)
    );

    let mut late = pager(3);
    assert!(!late.register_display_factory(DisplaySurface::default));
}

#[test]
fn page_spacing_offsets_cell_frames() {
    let p = pager(3);
    assert_eq!(p.cell_frame(0), Rect::new(10.0, 0.0, 300.0, 600.0));
    assert_eq!(p.cell_frame(2), Rect::new(650.0, 0.0, 300.0, 600.0));
    assert_eq!(p.content_size(), Size::new(960.0, 600.0));
    assert_eq!(p.max_content_offset(), 640.0);
}

#[test]
fn resize_relayouts_bound_cells() {
    let mut p = pager(4);
    p.scroll_to_page(1);
    p.set_view_size(Size::new(400.0, 800.0));

    assert_eq!(p.page_width(), 420.0);
    assert_eq!(p.content_offset(), 420.0);
    let cell = p.cell_for_page(1).unwrap();
    assert_eq!(cell.frame(), Rect::new(430.0, 0.0, 400.0, 800.0));
}

#[test]
fn presentation_clips_tall_images_to_top() {
    let tall = Presentation::for_image(
        Size::new(100.0, 400.0),
        Size::new(100.0, 100.0),
        ContentMode::AspectFill,
    );
    assert_eq!(tall.content_mode, ContentMode::ScaleToFill);
    assert_eq!(tall.contents_rect, Rect::new(0.0, 0.0, 1.0, 0.25));
    assert!(tall.is_clipped_to_top());

    let wide = Presentation::for_image(
        Size::new(400.0, 100.0),
        Size::new(100.0, 100.0),
        ContentMode::AspectFill,
    );
    assert_eq!(wide.content_mode, ContentMode::AspectFill);
    assert_eq!(wide.contents_rect, Rect::UNIT);
    assert!(!wide.is_clipped_to_top());

    let degenerate = Presentation::for_image(
        Size::new(0.0, 100.0),
        Size::new(100.0, 100.0),
        ContentMode::AspectFit,
    );
    assert_eq!(degenerate.content_mode, ContentMode::AspectFit);
}

#[test]
fn image_sink_assign_is_polymorphic() {
    #[derive(Default)]
    struct Layer {
        contents: Option<Size>,
        bounds: Size,
        presentation: Presentation,
        assignments: usize,
    }

    impl ImageSink for Layer {
        type Image = Size;

        fn image(&self) -> Option<&Size> {
            self.contents.as_ref()
        }

        fn set_image(&mut self, image: Option<Size>) {
            self.assignments += 1;
            self.contents = image;
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
            ContentMode::ScaleToFill
        }
    }

    fn show<S: ImageSink<Image = Size>>(sink: &mut S, image: Size) {
        sink.assign(Some(image));
    }

    let mut layer = Layer {
        bounds: Size::new(50.0, 50.0),
        ..Layer::default()
    };
    show(&mut layer, Size::new(10.0, 40.0));
    assert!(layer.presentation().is_clipped_to_top());
    assert_eq!(layer.assignments, 1);

    let mut surface: DisplaySurface<Size> = DisplaySurface::default();
    surface.set_bounds(Size::new(50.0, 50.0));
    show(&mut surface, Size::new(40.0, 10.0));
    assert_eq!(surface.presentation().content_mode, ContentMode::AspectFill);

    let thumb = Thumbnail::capture(Rect::new(10.0, 10.0, 50.0, 50.0), &layer);
    assert_eq!(thumb.image, Some(Size::new(10.0, 40.0)));
    assert!(thumb.presentation.is_clipped_to_top());
}

#[test]
fn cell_layout_centers_short_images() {
    let mut cell: PhotoCell<DisplaySurface<Size>> =
        PhotoCell::new(DisplaySurface::default(), 1.0, 3.0);
    cell.bind(0, Rect::from_size(VIEW));
    assert_eq!(cell.display_frame(), Rect::from_size(VIEW));

    cell.set_image(Some(Size::new(300.0, 150.0)));
    assert_eq!(cell.display_frame(), Rect::new(0.0, 0.0, 300.0, 150.0));
    assert_eq!(cell.content_inset().top, 225.0);
    assert_eq!(cell.visible_display_rect(), Rect::new(0.0, 225.0, 300.0, 150.0));
    assert_eq!(cell.display().presentation().content_mode, ContentMode::AspectFit);

    // Degenerate images fall back to the cell height.
    cell.set_image(Some(Size::new(0.0, 150.0)));
    assert_eq!(cell.display_frame().height, 600.0);
}

#[test]
fn double_tap_toggles_zoom() {
    let mut p = pager(2);
    p.double_tap(Point::new(150.0, 300.0));
    let cell = p.focused_cell().unwrap();
    assert_eq!(cell.zoom_scale(), 3.0);
    assert!(cell.is_zoomed());
    assert!(!cell.inner_scroll().is_at_rest());
    assert_eq!(cell.content_size(), Size::new(900.0, 600.0));

    p.double_tap(Point::new(150.0, 300.0));
    let cell = p.focused_cell().unwrap();
    assert_eq!(cell.zoom_scale(), 1.0);
    assert!(cell.inner_scroll().is_at_rest());
}

#[test]
fn single_tap_resets_zoom_and_notifies() {
    let mut p = pager(2);
    p.double_tap(Point::new(10.0, 10.0));
    assert!(p.focused_cell().unwrap().is_zoomed());

    p.single_tap(Point::new(5.0, 6.0));
    assert_eq!(p.focused_cell().unwrap().zoom_scale(), 1.0);
    assert_eq!(p.delegate().taps, vec![(Point::new(5.0, 6.0), 0)]);

    p.long_press(Point::new(1.0, 1.0));
    assert_eq!(p.delegate().long_presses, 1);
}

#[test]
fn tall_images_scroll_vertically_inside_the_cell() {
    let mut p = pager(0);
    p.set_data_source(Some(Photos::uniform(2, Size::new(300.0, 1200.0))));
    let inner = p.focused_inner_scroll().unwrap();
    assert!(inner.is_vertically_scrollable());
    assert!(inner.is_at_top());
    assert!(!inner.is_at_bottom());

    let cell = p.focused_cell_mut().unwrap();
    cell.set_content_offset(Point::new(0.0, 10_000.0));
    let inner = cell.inner_scroll();
    assert_eq!(inner.offset_y, 600.0);
    assert!(inner.is_at_bottom());
}

#[test]
fn display_rect_is_reported_in_view_coordinates() {
    let mut p = pager(3);
    p.scroll_to_page(1);
    let rect = p.display_rect_for_page(1).unwrap();
    assert_eq!(rect, Rect::new(0.0, 200.0, 300.0, 200.0));
    assert!(p.display_rect_for_page(2).unwrap().x >= 300.0);
    assert!(p.thumbnail_for_page(1).is_none());
}
