//! Show/update/dismiss flows through a recording host.

mod common;

use std::cell::Cell;
use std::rc::Rc;

use common::{CONTENT_WIDTH, Event, RecordingHost, init_tracing, section};
use horizon_popup::{
    AdditionalViewModel, DismissReason, Gravity, Insets, LabelItem, MenuBuilder, MenuSpec,
    PopupConfig, PopupController, PopupError, PopupState, Rect, SectionBuilder, StyleId,
    ValidationError,
};

fn three_item_menu() -> MenuSpec {
    MenuBuilder::new()
        .with_dropdown_gravity(Gravity::END | Gravity::BOTTOM)
        .with_vertical_offset(0)
        .with_horizontal_offset(0)
        .section(None, |s| {
            s.add_label_item(LabelItem::new("One"));
            s.add_label_item(LabelItem::new("Two"));
            s.add_label_item(LabelItem::new("Three"));
        })
        .build()
        .unwrap()
}

fn counting_listener(controller: &PopupController) -> Rc<Cell<u32>> {
    let count = Rc::new(Cell::new(0));
    let counter = count.clone();
    controller.set_on_dismiss_listener(move || counter.set(counter.get() + 1));
    count
}

#[test]
fn test_end_bottom_scenario() {
    init_tracing();
    let controller = PopupController::new(three_item_menu());
    let mut host = RecordingHost::new();
    let dismissed = counting_listener(&controller);

    let placement = controller
        .show(&mut host, Rect::new(100, 200, 50, 20), None, None)
        .unwrap();

    assert_eq!(placement.width, CONTENT_WIDTH);
    assert_eq!(placement.x, 150 - CONTENT_WIDTH);
    assert_eq!(placement.y, 220);
    assert!(host.screen.contains_rect(&placement.rect()));

    controller.dismiss();
    assert_eq!(dismissed.get(), 1);
    assert_eq!(
        host.recorder.events(),
        vec![
            Event::Measured {
                rows: 3,
                style: StyleId::DEFAULT_MENU
            },
            Event::Created {
                x: 30,
                y: 220,
                width: 120,
                height: 144
            },
            Event::Closed,
        ]
    );
}

#[test]
fn test_double_dismiss_fires_listener_once() {
    let controller = PopupController::new(three_item_menu());
    let mut host = RecordingHost::new();
    let dismissed = counting_listener(&controller);

    controller.show(&mut host, Rect::new(10, 10, 50, 20), None, None).unwrap();
    assert!(controller.dismiss());
    assert!(!controller.dismiss());

    assert_eq!(dismissed.get(), 1);
    assert_eq!(host.recorder.count(|e| *e == Event::Closed), 1);
}

#[test]
fn test_show_twice_without_dismiss() {
    let controller = PopupController::new(three_item_menu());
    let mut host = RecordingHost::new();

    controller.show(&mut host, Rect::new(10, 10, 50, 20), None, None).unwrap();
    let err = controller
        .show(&mut host, Rect::new(10, 10, 50, 20), None, None)
        .unwrap_err();

    assert!(matches!(err, PopupError::AlreadyVisible));
    assert!(controller.is_visible());
    assert_eq!(
        host.recorder.count(|e| matches!(e, Event::Created { .. })),
        1
    );
}

#[test]
fn test_update_while_hidden_never_reaches_surface() {
    let controller = PopupController::new(three_item_menu());
    let mut host = RecordingHost::new();

    controller.show(&mut host, Rect::new(10, 10, 50, 20), None, None).unwrap();
    controller.dismiss();
    let before = host.recorder.events();

    assert!(!controller.update_sections([section(None, "Name", 4)]).unwrap());
    assert_eq!(host.recorder.events(), before);
    assert_eq!(controller.state(), PopupState::Hidden);
    assert_eq!(controller.spec().item_count(), 3);
}

#[test]
fn test_update_while_visible_replaces_in_place() {
    let controller = PopupController::new(three_item_menu());
    let mut host = RecordingHost::new();

    let placement = controller
        .show(&mut host, Rect::new(10, 10, 50, 20), None, None)
        .unwrap();
    assert!(controller
        .update_sections([section(Some("People"), "Name", 5), section(None, "Extra", 1)])
        .unwrap());

    assert_eq!(
        host.recorder.events().last(),
        Some(&Event::SectionsSet {
            titles: vec![Some("People".into()), None],
            items: 6
        })
    );
    assert_eq!(controller.placement(), Some(placement));
    assert_eq!(host.recorder.count(|e| matches!(e, Event::Created { .. })), 1);

    let spec = controller.spec();
    assert_eq!(spec.item_count(), 6);
    assert_eq!(spec.dropdown_gravity(), Gravity::END | Gravity::BOTTOM);
}

#[test]
fn test_invalid_update_is_rejected() {
    let controller = PopupController::new(three_item_menu());
    let mut host = RecordingHost::new();
    controller.show(&mut host, Rect::new(10, 10, 50, 20), None, None).unwrap();

    let err = controller.update_sections(Vec::<SectionBuilder>::new()).unwrap_err();
    assert!(matches!(err, PopupError::Validation(ValidationError::EmptyMenu)));
    assert_eq!(controller.spec().item_count(), 3);
}

#[test]
fn test_every_exit_path_closes_surface_once() {
    let reasons = [
        DismissReason::TouchOutside,
        DismissReason::BackPressed,
        DismissReason::ItemSelected,
    ];
    for reason in reasons {
        let controller = PopupController::new(three_item_menu());
        let mut host = RecordingHost::new();
        let dismissed = counting_listener(&controller);

        controller.show(&mut host, Rect::new(10, 10, 50, 20), None, None).unwrap();
        let handle = host.recorder.last_dismiss_handle();
        assert!(handle.dismiss(reason));
        assert!(!handle.dismiss(reason));
        assert!(!controller.dismiss());

        assert_eq!(dismissed.get(), 1, "{reason:?}");
        assert_eq!(host.recorder.count(|e| *e == Event::Closed), 1, "{reason:?}");
        assert_eq!(controller.dismiss_reason_of_last_episode(), Some(reason));
    }
}

#[test]
fn test_item_selection_dismisses_through_surface() {
    let picked = Rc::new(Cell::new(0));
    let spec = {
        let a = picked.clone();
        let b = picked.clone();
        MenuBuilder::new()
            .section(None, |s| {
                s.add_label_item(
                    LabelItem::new("Stay")
                        .with_dismiss_on_select(false)
                        .with_callback(move || a.set(a.get() + 1)),
                );
                s.add_label_item(LabelItem::new("Go").with_callback(move || b.set(b.get() + 10)));
            })
            .build()
            .unwrap()
    };
    let controller = PopupController::new(spec);
    let mut host = RecordingHost::new();
    controller.show(&mut host, Rect::new(10, 10, 50, 20), None, None).unwrap();

    let record = host.recorder.requests.borrow()[0].clone();
    let items = record.sections[0].items();

    assert!(!items[0].select(&record.dismiss));
    assert!(controller.is_visible());
    assert!(items[1].select(&record.dismiss));
    assert!(!controller.is_visible());
    assert_eq!(picked.get(), 11);
    assert_eq!(
        controller.dismiss_reason_of_last_episode(),
        Some(DismissReason::ItemSelected)
    );
}

#[test]
fn test_listener_replaced_while_visible() {
    let controller = PopupController::new(three_item_menu());
    let mut host = RecordingHost::new();
    let first = counting_listener(&controller);

    controller.show(&mut host, Rect::new(10, 10, 50, 20), None, None).unwrap();
    let second = counting_listener(&controller);
    controller.dismiss();

    assert_eq!(first.get(), 0);
    assert_eq!(second.get(), 1);
}

#[test]
fn test_touch_outside_listener_runs_before_dismissal() {
    let controller = PopupController::new(three_item_menu());
    let mut host = RecordingHost::new();
    let order = Rc::new(std::cell::RefCell::new(Vec::new()));

    let weak = controller.downgrade();
    let touch_order = order.clone();
    controller.set_touch_outside_listener(move || {
        let visible = weak.upgrade().is_some_and(|c| c.is_visible());
        touch_order.borrow_mut().push(("touch", visible));
    });
    let dismiss_order = order.clone();
    controller.set_on_dismiss_listener(move || dismiss_order.borrow_mut().push(("dismiss", false)));

    controller.show(&mut host, Rect::new(10, 10, 50, 20), None, None).unwrap();
    host.recorder
        .last_dismiss_handle()
        .on_external_dismiss(DismissReason::TouchOutside);

    assert_eq!(*order.borrow(), vec![("touch", true), ("dismiss", false)]);
}

#[test]
fn test_config_insets_and_haptics_reach_host() {
    let config = PopupConfig {
        screen_insets: Insets::new(24, 48, 0, 0),
        haptic_feedback_enabled: false,
        default_style: StyleId::DARK_COLORED_MENU,
        clamp_horizontally: true,
    };
    let spec = MenuBuilder::new()
        .section(None, |s| {
            for i in 0..40 {
                s.add_label_item(LabelItem::new(format!("Row {i}")));
            }
        })
        .build()
        .unwrap();
    let controller = PopupController::with_config(spec, config);
    let mut host = RecordingHost::new();

    let placement = controller
        .show(&mut host, Rect::new(10, 10, 50, 20), None, None)
        .unwrap();

    assert!(placement.content_clipped);
    assert_eq!(placement.height, 800 - 24 - 48);
    assert_eq!(placement.y, 24);
    let record = host.recorder.requests.borrow()[0].clone();
    assert!(!record.haptics);
    assert_eq!(record.style, StyleId::DARK_COLORED_MENU);
}

#[test]
fn test_style_override_and_theme() {
    let controller = PopupController::new(three_item_menu());
    let mut host = RecordingHost::new();
    host.theme_style = Some(StyleId(77));

    controller
        .show(&mut host, Rect::new(10, 10, 50, 20), Some(StyleId::DARK_MENU), None)
        .unwrap();
    controller.dismiss();
    controller.show(&mut host, Rect::new(10, 10, 50, 20), None, None).unwrap();

    let styles: Vec<StyleId> = host.recorder.requests.borrow().iter().map(|r| r.style).collect();
    assert_eq!(styles, vec![StyleId::DARK_MENU, StyleId(77)]);
}

#[test]
fn test_menu_style_wins_over_override() {
    let spec = MenuBuilder::new()
        .with_style(StyleId(5))
        .section(None, |s| {
            s.add_label_item(LabelItem::new("x"));
        })
        .build()
        .unwrap();
    let controller = PopupController::new(spec);
    let mut host = RecordingHost::new();

    controller
        .show(&mut host, Rect::new(10, 10, 50, 20), Some(StyleId::DARK_MENU), None)
        .unwrap();
    assert_eq!(controller.style().map(|s| s.id), Some(StyleId(5)));
}

#[test]
fn test_additional_view_band() {
    let controller = PopupController::new(three_item_menu());
    let mut host = RecordingHost::new();
    let view = AdditionalViewModel::new(Rc::new(String::from("footer")), 60);

    let placement = controller
        .show(&mut host, Rect::new(100, 200, 50, 20), None, Some(view))
        .unwrap();

    assert_eq!(placement.height, 144 + 60);
    assert_eq!(
        placement.additional_view,
        Some(Rect::new(placement.x, 220 + 144, CONTENT_WIDTH, 60))
    );
    assert!(controller.set_visible_additional_view(false));
    assert_eq!(
        host.recorder.events().last(),
        Some(&Event::ElementVisible(
            horizon_popup::PopupElement::AdditionalView,
            false
        ))
    );
    assert!(controller.is_visible());
}

#[test]
fn test_surface_may_dismiss_during_update() {
    use horizon_popup::{
        DismissHandle, PopupHost, PopupSurface, Section, Size, StyleAttribute, SurfaceRequest,
    };

    struct SelfClosing {
        handle: DismissHandle,
        closed: Rc<Cell<u32>>,
    }

    impl PopupSurface for SelfClosing {
        fn set_sections(&mut self, _sections: &[Section]) {
            self.handle.on_external_dismiss(DismissReason::BackPressed);
        }

        fn set_element_visible(&mut self, _element: horizon_popup::PopupElement, _visible: bool) {}

        fn close(&mut self) {
            self.closed.set(self.closed.get() + 1);
        }
    }

    struct Host {
        closed: Rc<Cell<u32>>,
    }

    impl PopupHost for Host {
        fn screen_bounds(&self) -> Rect {
            Rect::new(0, 0, 400, 800)
        }

        fn resolve_style(&self, _attribute: StyleAttribute) -> Option<StyleId> {
            None
        }

        fn measure_content(&mut self, _sections: &[Section], _style: StyleId) -> Size {
            Size::new(100, 100)
        }

        fn create_surface(&mut self, request: SurfaceRequest) -> Box<dyn PopupSurface> {
            Box::new(SelfClosing {
                handle: request.dismiss,
                closed: self.closed.clone(),
            })
        }
    }

    let closed = Rc::new(Cell::new(0));
    let mut host = Host {
        closed: closed.clone(),
    };
    let controller = PopupController::new(three_item_menu());
    let dismissed = counting_listener(&controller);

    controller.show(&mut host, Rect::new(10, 10, 50, 20), None, None).unwrap();
    assert!(controller.update_sections([section(None, "Name", 1)]).unwrap());

    assert!(!controller.is_visible());
    assert_eq!(dismissed.get(), 1);
    assert_eq!(closed.get(), 1);
}
