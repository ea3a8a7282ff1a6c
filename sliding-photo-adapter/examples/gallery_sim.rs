use std::cell::Cell;
use std::rc::Rc;

use sliding_photo::{
    ContentMode, DisplaySurface, PagerDataSource, PhotoCell, Presentation, Rect, Size, Thumbnail,
    Velocity,
};
use sliding_photo_adapter::{GalleryController, GalleryOptions, TransitionContext};

// Example: a framework adapter driving the gallery with a 60 Hz timer.
//
// An adapter would:
// - forward layout, scroll and pan events
// - call tick(now_ms) every frame and react to events
// - render from frame(now_ms)
struct Photos(Vec<Size>);

impl PagerDataSource for Photos {
    type Display = DisplaySurface<Size>;

    fn number_of_items(&self) -> usize {
        self.0.len()
    }

    fn prepare_for_display(&mut self, cell: &mut PhotoCell<Self::Display>) {
        if let Some(index) = cell.index() {
            cell.set_image(self.0.get(index).copied());
        }
    }

    fn thumbnail_for(&self, cell: &PhotoCell<Self::Display>) -> Option<Thumbnail<Size>> {
        // Grid of 3 columns with 130pt squares.
        let index = cell.index()?;
        let image = *cell.image()?;
        let frame = Rect::new(
            (index % 3) as f32 * 130.0,
            100.0 + (index / 3) as f32 * 130.0,
            128.0,
            128.0,
        );
        Some(Thumbnail {
            frame,
            image: Some(image),
            presentation: Presentation::for_image(image, frame.size(), ContentMode::AspectFill),
        })
    }

    fn remove_item(&mut self, index: usize) -> bool {
        if index >= self.0.len() {
            return false;
        }
        self.0.remove(index);
        true
    }
}

struct Host {
    done: Rc<Cell<bool>>,
}

impl TransitionContext for Host {
    fn container_bounds(&self) -> Option<Rect> {
        Some(Rect::new(0.0, 0.0, 390.0, 844.0))
    }

    fn complete_transition(&mut self, finished: bool) {
        println!("  host: complete_transition({finished})");
        self.done.set(true);
    }
}

fn run(g: &mut GalleryController<Photos>, now_ms: &mut u64, frames: u32) {
    for _ in 0..frames {
        *now_ms += 16;
        g.tick(*now_ms, |e| println!("  t={now_ms} event={e:?}"));
    }
}

fn main() {
    let sizes = vec![
        Size::new(1200.0, 800.0),
        Size::new(800.0, 2400.0),
        Size::new(1000.0, 1000.0),
        Size::new(1600.0, 900.0),
    ];
    let mut g = GalleryController::new(GalleryOptions::default());
    g.set_view_size(Size::new(390.0, 844.0));
    g.set_data_source(Some(Photos(sizes)));
    let mut now_ms = 0u64;

    println!("present");
    let done = Rc::new(Cell::new(false));
    g.present(Host { done: done.clone() }, now_ms);
    let f = g.frame(now_ms);
    println!("  proxy={:?} backdrop={}", f.proxy.map(|p| p.frame), f.backdrop_alpha);
    run(&mut g, &mut now_ms, 20);
    println!("  done={}", done.get());

    println!("animated scroll to page 2");
    g.scroll_to_page(2, true, now_ms);
    run(&mut g, &mut now_ms, 25);
    println!("  offset={} page={:?}", g.pager().content_offset(), g.pager().current_page());

    println!("remove page 2");
    g.remove_item(2, now_ms);
    run(&mut g, &mut now_ms, 20);
    println!("  count={} page={:?}", g.pager().item_count(), g.pager().current_page());

    println!("drag down and release fast");
    if g.pan_began(Velocity::new(0.0, 600.0)) {
        for step in 1..=8 {
            g.pan_changed(step as f32 * 15.0);
        }
        println!("  release={:?}", g.pan_ended(1400.0, 120.0, now_ms));
    }
    run(&mut g, &mut now_ms, 20);
    let f = g.frame(now_ms);
    println!(
        "  on_screen={} translation={} backdrop={}",
        g.is_on_screen(),
        f.surface_translation_y,
        f.backdrop_alpha
    );
}
