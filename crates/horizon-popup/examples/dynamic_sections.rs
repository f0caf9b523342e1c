//! Horizon Popup Dynamic Sections Example
//!
//! Headless walk-through of a "loading → loaded" popup:
//! - A menu is shown with a single "Loading" row
//! - A `DynamicSectionUpdater` swaps in the loaded rows two seconds later
//! - Picking an item dismisses the popup through its surface
//!
//! Time is driven by a `ManualClock`, so the example finishes instantly.
//!
//! Run with: cargo run -p horizon-popup --example dynamic_sections

use std::time::Duration;

use horizon_popup::{
    Clock, CustomItem, DismissHandle, DynamicSectionUpdater, Gravity, LabelItem, LayoutRef,
    ManualClock, MenuBuilder, PopupController, PopupElement, PopupHost, PopupSurface, Rect,
    SchedulerHandle, Section, SectionBuilder, Size, StyleAttribute, StyleId, SurfaceRequest,
};
use horizon_popup_core::popup_debug;

const ROW_HEIGHT: i32 = 48;
const ROW_WIDTH: i32 = 240;

/// Prints what a real renderer would draw.
struct ConsoleSurface;

impl PopupSurface for ConsoleSurface {
    fn set_sections(&mut self, sections: &[Section]) {
        println!("  surface: content replaced");
        print_sections(sections);
    }

    fn set_element_visible(&mut self, element: PopupElement, visible: bool) {
        println!("  surface: {element:?} visible = {visible}");
    }

    fn close(&mut self) {
        println!("  surface: closed");
    }
}

/// A 400x800 screen with a dark theme.
struct ConsoleHost {
    last_dismiss: Option<DismissHandle>,
}

impl PopupHost for ConsoleHost {
    fn screen_bounds(&self) -> Rect {
        Rect::new(0, 0, 400, 800)
    }

    fn resolve_style(&self, attribute: StyleAttribute) -> Option<StyleId> {
        match attribute {
            StyleAttribute::PopupMenuStyle => Some(StyleId::DARK_MENU),
        }
    }

    fn measure_content(&mut self, sections: &[Section], _style: StyleId) -> Size {
        let rows: usize = sections.iter().map(|s| s.len() + usize::from(s.title().is_some())).sum();
        Size::new(ROW_WIDTH, rows as i32 * ROW_HEIGHT)
    }

    fn create_surface(&mut self, request: SurfaceRequest) -> Box<dyn PopupSurface> {
        let p = request.placement;
        println!(
            "  surface: created at ({}, {}) size {}x{} style {:?} haptics {}",
            p.x, p.y, p.width, p.height, request.style.id, request.haptic_feedback_enabled
        );
        print_sections(&request.sections);
        self.last_dismiss = Some(request.dismiss);
        Box::new(ConsoleSurface)
    }
}

fn print_sections(sections: &[Section]) {
    for section in sections {
        if let Some(title) = section.title() {
            println!("    [{title}]");
        }
        println!("    {} item(s)", section.len());
    }
}

fn loaded_sections() -> Vec<SectionBuilder> {
    let mut names = SectionBuilder::new(None);
    for i in 0..5 {
        names.add_custom_item(
            CustomItem::new(LayoutRef(1)).with_callback(move || println!("  item: Click {i}")),
        );
    }

    let mut actions = SectionBuilder::new(Some("Actions"));
    actions.add_label_item(LabelItem::new("Refresh").with_dismiss_on_select(false));
    actions.add_label_item(LabelItem::new("Close"));

    vec![names, actions]
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let clock = ManualClock::new();
    let scheduler = SchedulerHandle::new(clock.clone());
    let mut host = ConsoleHost { last_dismiss: None };

    let spec = MenuBuilder::new()
        .with_dropdown_gravity(Gravity::END | Gravity::BOTTOM)
        .section(None, |s| {
            s.add_label_item(LabelItem::new("Loading…").with_dismiss_on_select(false));
        })
        .build()?;

    let controller = PopupController::new(spec);
    controller.set_on_dismiss_listener(|| println!("  listener: popup dismissed"));

    let updater = DynamicSectionUpdater::new(&controller, scheduler.clone());

    println!("Showing popup");
    let anchor = Rect::new(100, 200, 50, 20);
    controller.show(&mut host, anchor, None, None)?;
    updater.schedule(Duration::from_millis(2000), loaded_sections())?;

    for _ in 0..4 {
        clock.advance(Duration::from_millis(500));
        let ran = scheduler.process_ready();
        popup_debug!(now_ms = clock.now().as_millis() as u64, ran, "tick");
    }

    println!("Selecting the first loaded item");
    let spec = controller.spec();
    if let (Some(handle), Some(item)) = (
        host.last_dismiss.as_ref(),
        spec.sections().first().and_then(|s| s.items().first()),
    ) {
        item.select(handle);
    }

    println!(
        "Visible: {}, last dismiss reason: {:?}",
        controller.is_visible(),
        controller.dismiss_reason_of_last_episode()
    );
    Ok(())
}
