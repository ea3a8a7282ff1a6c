// Example: page through a photo list and watch the cell pool stay small.
use sliding_photo::{
    DisplaySurface, Pager, PagerDataSource, PagerDelegate, PagerOptions, PhotoCell, Point, Size,
};

struct Photos(Vec<Size>);

impl PagerDataSource for Photos {
    type Display = DisplaySurface<Size>;

    fn number_of_items(&self) -> usize {
        self.0.len()
    }

    fn prepare_for_display(&mut self, cell: &mut PhotoCell<Self::Display>) {
        // A real source would start a (possibly async) image load here.
        if let Some(index) = cell.index() {
            cell.set_image(self.0.get(index).copied());
        }
    }
}

struct Log;

impl PagerDelegate<DisplaySurface<Size>> for Log {
    fn did_update_focus(&mut self, cell: &PhotoCell<DisplaySurface<Size>>) {
        println!("  focus -> {:?}", cell.index());
    }

    fn did_single_tap(&mut self, location: Point, cell: &PhotoCell<DisplaySurface<Size>>) {
        println!("  tap at {location:?} on {:?}", cell.index());
    }
}

fn main() {
    let sizes = (0..1_000)
        .map(|i| Size::new(1200.0, 800.0 + (i % 7) as f32 * 150.0))
        .collect();

    let mut p = Pager::with_delegate(PagerOptions::default().with_initial_page(2), Log);
    p.set_data_source(Some(Photos(sizes)));
    p.set_view_size(Size::new(390.0, 844.0));
    println!(
        "page_width={} content_size={:?}",
        p.page_width(),
        p.content_size()
    );

    // Drag across a few pages, sampling the offset like a scroll view would.
    let start = p.content_offset();
    for step in 0..=40 {
        p.on_scroll(start + step as f32 * 40.0);
    }
    println!(
        "after drag: page={:?} visible={:?} cells={}",
        p.current_page(),
        p.visible_range(),
        p.cell_count()
    );

    let off = p.scroll_to_page(999);
    println!("scroll_to_page(999): offset={off} page={:?}", p.current_page());
    println!("display rect: {:?}", p.display_rect_for_page(999));

    p.double_tap(Point::new(195.0, 422.0));
    println!("zoomed={:?}", p.focused_cell().map(|c| c.zoom_scale()));
    p.single_tap(Point::new(10.0, 10.0));
    println!("after tap: zoom={:?}", p.focused_cell().map(|c| c.zoom_scale()));
}
