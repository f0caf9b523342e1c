//! Deferred section replacement.
//!
//! A [`DynamicSectionUpdater`] swaps a popup's sections after a delay, for
//! "loading → loaded" transitions. It holds only a weak reference to the
//! controller, and the replacement goes through
//! [`PopupController::replace_sections`], so a popup dismissed in the
//! meantime simply discards it.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use horizon_popup_core::logging::targets;
use horizon_popup_core::{ScheduledTaskId, SchedulerHandle};

use crate::controller::{PopupController, WeakPopupController};
use crate::error::Result;
use crate::menu::{SectionBuilder, build_sections};

/// Schedules one pending section replacement for a controller.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use horizon_popup::{
///     DynamicSectionUpdater, LabelItem, ManualClock, MenuBuilder, PopupController,
///     SchedulerHandle, SectionBuilder,
/// };
///
/// let spec = MenuBuilder::new()
///     .section(None, |s| {
///         s.add_label_item(LabelItem::new("Loading…"));
///     })
///     .build()
///     .unwrap();
/// let controller = PopupController::new(spec);
///
/// let clock = ManualClock::new();
/// let scheduler = SchedulerHandle::new(clock.clone());
/// let updater = DynamicSectionUpdater::new(&controller, scheduler.clone());
///
/// let mut loaded = SectionBuilder::new(None);
/// loaded.add_label_item(LabelItem::new("Name 0"));
/// updater.schedule(Duration::from_millis(2000), [loaded]).unwrap();
/// assert!(updater.is_pending());
///
/// clock.advance(Duration::from_millis(1000));
/// assert!(updater.cancel());
/// clock.advance(Duration::from_millis(1000));
/// assert_eq!(scheduler.process_ready(), 0);
/// ```
pub struct DynamicSectionUpdater {
    controller: WeakPopupController,
    scheduler: SchedulerHandle,
    pending: Rc<Cell<Option<ScheduledTaskId>>>,
}

impl DynamicSectionUpdater {
    pub fn new(controller: &PopupController, scheduler: SchedulerHandle) -> Self {
        Self::from_weak(controller.downgrade(), scheduler)
    }

    pub fn from_weak(controller: WeakPopupController, scheduler: SchedulerHandle) -> Self {
        Self {
            controller,
            scheduler,
            pending: Rc::new(Cell::new(None)),
        }
    }

    /// Replace the controller's sections after `delay`.
    ///
    /// Cancels any replacement scheduled earlier. The sections are validated
    /// first; on error nothing is cancelled or scheduled.
    pub fn schedule(
        &self,
        delay: Duration,
        sections: impl IntoIterator<Item = SectionBuilder>,
    ) -> Result<ScheduledTaskId> {
        let sections = build_sections(sections)?;
        self.cancel();

        let controller = self.controller.clone();
        let pending = self.pending.clone();
        let id_slot = Rc::new(Cell::new(None::<ScheduledTaskId>));
        let own_id = id_slot.clone();

        let id = self.scheduler.schedule_once(delay, move || {
            if pending.get() == own_id.get() {
                pending.set(None);
            }
            match controller.upgrade() {
                Some(controller) => {
                    let applied = controller.replace_sections(sections);
                    tracing::debug!(
                        target: targets::UPDATER,
                        applied,
                        "scheduled section update fired"
                    );
                }
                None => {
                    tracing::trace!(
                        target: targets::UPDATER,
                        "controller gone, section update dropped"
                    );
                }
            }
        });
        id_slot.set(Some(id));
        self.pending.set(Some(id));

        tracing::debug!(
            target: targets::UPDATER,
            delay_ms = delay.as_millis() as u64,
            "section update scheduled"
        );
        Ok(id)
    }

    /// [`schedule`](Self::schedule) with the delay in milliseconds.
    pub fn schedule_ms(
        &self,
        delay_ms: u64,
        sections: impl IntoIterator<Item = SectionBuilder>,
    ) -> Result<ScheduledTaskId> {
        self.schedule(Duration::from_millis(delay_ms), sections)
    }

    /// Cancel the pending replacement. Returns `false` if nothing was
    /// pending (never scheduled, already fired or already cancelled).
    pub fn cancel(&self) -> bool {
        let Some(id) = self.pending.take() else {
            return false;
        };
        let cancelled = self.scheduler.cancel(id);
        if cancelled {
            tracing::debug!(target: targets::UPDATER, "section update cancelled");
        }
        cancelled
    }

    /// Whether a replacement is scheduled and has not fired yet.
    pub fn is_pending(&self) -> bool {
        self.pending
            .get()
            .is_some_and(|id| self.scheduler.is_active(id))
    }
}

impl std::fmt::Debug for DynamicSectionUpdater {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamicSectionUpdater")
            .field("pending", &self.is_pending())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::{LabelItem, MenuBuilder};
    use horizon_popup_core::ManualClock;

    fn setup() -> (PopupController, ManualClock, SchedulerHandle) {
        let spec = MenuBuilder::new()
            .section(None, |s| {
                s.add_label_item(LabelItem::new("Loading"));
            })
            .build()
            .unwrap();
        let clock = ManualClock::new();
        let scheduler = SchedulerHandle::new(clock.clone());
        (PopupController::new(spec), clock, scheduler)
    }

    fn loaded(count: usize) -> SectionBuilder {
        let mut section = SectionBuilder::new(None);
        for i in 0..count {
            section.add_label_item(LabelItem::new(format!("Name {i}")));
        }
        section
    }

    #[test]
    fn test_fire_clears_pending() {
        let (controller, clock, scheduler) = setup();
        let updater = DynamicSectionUpdater::new(&controller, scheduler.clone());

        updater.schedule_ms(2000, [loaded(2)]).unwrap();
        clock.advance(Duration::from_millis(2000));
        assert_eq!(scheduler.process_ready(), 1);

        assert!(!updater.is_pending());
        assert!(!updater.cancel());
        // Hidden controller: the update was discarded.
        assert_eq!(controller.spec().sections()[0].len(), 1);
    }

    #[test]
    fn test_reschedule_cancels_previous() {
        let (controller, clock, scheduler) = setup();
        let updater = DynamicSectionUpdater::new(&controller, scheduler.clone());

        let first = updater.schedule_ms(1000, [loaded(1)]).unwrap();
        let second = updater.schedule_ms(3000, [loaded(2)]).unwrap();
        assert!(!scheduler.is_active(first));
        assert!(scheduler.is_active(second));
        assert_eq!(scheduler.active_count(), 1);

        clock.advance(Duration::from_millis(1000));
        assert_eq!(scheduler.process_ready(), 0);
        assert!(updater.is_pending());
    }

    #[test]
    fn test_invalid_sections_keep_previous_schedule() {
        let (controller, _clock, scheduler) = setup();
        let updater = DynamicSectionUpdater::new(&controller, scheduler);

        updater.schedule_ms(1000, [loaded(1)]).unwrap();
        assert!(updater.schedule_ms(1000, Vec::<SectionBuilder>::new()).is_err());
        assert!(updater.is_pending());
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let (controller, _clock, scheduler) = setup();
        let updater = DynamicSectionUpdater::new(&controller, scheduler);

        assert!(!updater.cancel());
        updater.schedule_ms(500, [loaded(1)]).unwrap();
        assert!(updater.cancel());
        assert!(!updater.cancel());
    }

    #[test]
    fn test_dropped_controller_is_not_resurrected() {
        let (controller, clock, scheduler) = setup();
        let updater = DynamicSectionUpdater::new(&controller, scheduler.clone());
        let weak = controller.downgrade();

        updater.schedule_ms(100, [loaded(1)]).unwrap();
        drop(controller);
        assert!(weak.upgrade().is_none());

        clock.advance(Duration::from_millis(100));
        assert_eq!(scheduler.process_ready(), 1);
        assert!(weak.upgrade().is_none());
    }
}
