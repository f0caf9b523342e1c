//! Recording host and surface shared by the integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use horizon_popup::{
    DismissHandle, LabelItem, PopupElement, PopupHost, PopupSurface, Rect, Section,
    SectionBuilder, Size, StyleAttribute, StyleId, SurfaceRequest,
};

pub const ROW_HEIGHT: i32 = 48;
pub const CONTENT_WIDTH: i32 = 120;

/// Everything the host and its surfaces were asked to do, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Measured { rows: usize, style: StyleId },
    Created { x: i32, y: i32, width: i32, height: i32 },
    SectionsSet { titles: Vec<Option<String>>, items: usize },
    ElementVisible(PopupElement, bool),
    Closed,
}

#[derive(Default)]
pub struct Recorder {
    pub events: RefCell<Vec<Event>>,
    pub requests: RefCell<Vec<SurfaceRecord>>,
}

/// What a surface was created with.
#[derive(Debug, Clone)]
pub struct SurfaceRecord {
    pub style: StyleId,
    pub haptics: bool,
    pub sections: Vec<Section>,
    pub dismiss: DismissHandle,
}

impl Recorder {
    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    pub fn count(&self, matches: impl Fn(&Event) -> bool) -> usize {
        self.events.borrow().iter().filter(|e| matches(e)).count()
    }

    pub fn last_dismiss_handle(&self) -> DismissHandle {
        self.requests
            .borrow()
            .last()
            .map(|r| r.dismiss.clone())
            .unwrap_or_else(DismissHandle::detached)
    }

    fn push(&self, event: Event) {
        self.events.borrow_mut().push(event);
    }
}

pub struct RecordingSurface {
    recorder: Rc<Recorder>,
}

impl PopupSurface for RecordingSurface {
    fn set_sections(&mut self, sections: &[Section]) {
        self.recorder.push(Event::SectionsSet {
            titles: sections.iter().map(|s| s.title().map(str::to_owned)).collect(),
            items: sections.iter().map(Section::len).sum(),
        });
    }

    fn set_element_visible(&mut self, element: PopupElement, visible: bool) {
        self.recorder.push(Event::ElementVisible(element, visible));
    }

    fn close(&mut self) {
        self.recorder.push(Event::Closed);
    }
}

/// A 400x800 screen. Each item is one 48px row, 120px wide.
pub struct RecordingHost {
    pub recorder: Rc<Recorder>,
    pub screen: Rect,
    pub theme_style: Option<StyleId>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self {
            recorder: Rc::new(Recorder::default()),
            screen: Rect::new(0, 0, 400, 800),
            theme_style: None,
        }
    }
}

impl PopupHost for RecordingHost {
    fn screen_bounds(&self) -> Rect {
        self.screen
    }

    fn resolve_style(&self, _attribute: StyleAttribute) -> Option<StyleId> {
        self.theme_style
    }

    fn measure_content(&mut self, sections: &[Section], style: StyleId) -> Size {
        let rows: usize = sections.iter().map(Section::len).sum();
        self.recorder.push(Event::Measured { rows, style });
        Size::new(CONTENT_WIDTH, rows as i32 * ROW_HEIGHT)
    }

    fn create_surface(&mut self, request: SurfaceRequest) -> Box<dyn PopupSurface> {
        let p = request.placement;
        self.recorder.push(Event::Created {
            x: p.x,
            y: p.y,
            width: p.width,
            height: p.height,
        });
        self.recorder.requests.borrow_mut().push(SurfaceRecord {
            style: request.style.id,
            haptics: request.haptic_feedback_enabled,
            sections: request.sections,
            dismiss: request.dismiss,
        });
        Box::new(RecordingSurface {
            recorder: self.recorder.clone(),
        })
    }
}

/// A section of `count` label items named "`prefix` i".
pub fn section(title: Option<&str>, prefix: &str, count: usize) -> SectionBuilder {
    let mut section = SectionBuilder::new(title);
    for i in 0..count {
        section.add_label_item(LabelItem::new(format!("{prefix} {i}")));
    }
    section
}

/// Install a test subscriber so `RUST_LOG` output shows up with `--nocapture`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
