//! Carousel navigation engine.
//!
//! Presents an ordered item list through a fixed-size sliding window that
//! loops seamlessly in both directions.  When there are more items than fit
//! on one page the display list is the item list laid out twice; the index
//! equal to `total` (the *wrap sentinel*) sits on the duplicate of item 0,
//! which looks exactly like item 0 itself.
//!
//! * Forward wrap: animate onto the sentinel, then once the host reports
//!   the transition finished, snap back to 0 with zero duration.
//! * Backward wrap from 0: snap to the sentinel with zero duration, then on
//!   the next frame animate one step back to `total - 1`.
//!
//! Navigation calls are serialised by a transition lock.  A call that
//! arrives while locked is dropped.  The lock is released by a timer, not by
//! the host's completion callback, so a host that never reports completion
//! cannot stall the engine.

use std::fmt;
use std::hash::Hash;

use super::scheduler::{Scheduler, TimerId, Wakeup};
use super::transition::{Timing, TransitionSpec};
use super::viewport::ViewportPolicy;

/// Anything the carousel can show.  The engine only ever looks at the key.
pub trait CarouselItem {
    type Key: Clone + Eq + Hash + fmt::Debug;

    fn key(&self) -> Self::Key;
}

/// Where the strip is parked, with the sentinel made explicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Real(usize),
    WrapSentinel,
}

/// Render key for one display slot.  `lap` is 0 for the real copy of an
/// item and 1 for its duplicate, so both copies get distinct keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SlotKey<K> {
    pub item: K,
    pub lap: usize,
}

/// One slot of the display list.
#[derive(Debug)]
pub struct Slot<'a, T: CarouselItem> {
    pub key: SlotKey<T::Key>,
    pub item: &'a T,
}

/// Everything the rendering host needs for one frame.
#[derive(Debug)]
pub struct CarouselFrame<'a, T: CarouselItem> {
    /// Laid out side by side, each `100 / slots.len()` percent of the strip.
    pub slots: Vec<Slot<'a, T>>,
    pub offset_percent: f64,
    pub transition: TransitionSpec,
    pub current_index: usize,
    pub position: Position,
    pub current_slide: usize,
    pub num_slides: usize,
    /// Slots visible in the viewport at once.
    pub effective_visible: usize,
    /// Arrows and dots are shown only when true.
    pub can_navigate: bool,
    pub autoplay: bool,
}

#[derive(Debug, Clone, Copy)]
struct PendingStep {
    epoch: u64,
    target: usize,
}

/// The navigation state machine.
pub struct CarouselEngine<T: CarouselItem, S: Scheduler> {
    items: Vec<T>,
    /// Indices into `items`; the display list.  Rebuilt only when the items
    /// or the visible count change.
    display: Vec<usize>,
    viewport: ViewportPolicy,
    width: u32,
    visible: usize,
    current_index: usize,
    autoplay: bool,
    instant: bool,
    locked: bool,
    timing: Timing,
    scheduler: S,
    lock_timer: Option<TimerId>,
    lock_epoch: u64,
    autoplay_timer: Option<TimerId>,
    autoplay_epoch: u64,
    pending_step: Option<PendingStep>,
    step_epoch: u64,
    mounted: bool,
    revision: u64,
}

impl<T: CarouselItem, S: Scheduler> CarouselEngine<T, S> {
    /// Mount the engine with an initial item list and viewport width.
    pub fn new(items: Vec<T>, viewport: ViewportPolicy, width: u32, timing: Timing, scheduler: S) -> Self {
        let visible = viewport.visible_for(width);
        let mut engine = Self {
            items,
            display: Vec::new(),
            viewport,
            width,
            visible,
            current_index: 0,
            autoplay: false,
            instant: true,
            locked: false,
            timing,
            scheduler,
            lock_timer: None,
            lock_epoch: 0,
            autoplay_timer: None,
            autoplay_epoch: 0,
            pending_step: None,
            step_epoch: 0,
            mounted: true,
            revision: 0,
        };
        engine.rebuild_display();
        engine
    }

    /// Start with autoplay armed (or not).
    pub fn with_autoplay(mut self, on: bool) -> Self {
        self.autoplay = on;
        self.sync_autoplay();
        self
    }

    // ── derived state ──────────────────────────────────────────

    pub fn total(&self) -> usize {
        self.items.len()
    }

    pub fn visible(&self) -> usize {
        self.visible
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn position(&self) -> Position {
        if self.needs_loop() && self.current_index == self.total() {
            Position::WrapSentinel
        } else {
            Position::Real(self.current_index)
        }
    }

    /// Index into the real item list, with the sentinel folded onto 0.
    pub fn logical_index(&self) -> usize {
        if self.current_index == self.total() {
            0
        } else {
            self.current_index
        }
    }

    pub fn is_autoplaying(&self) -> bool {
        self.autoplay
    }

    #[cfg(test)]
    pub fn is_instant(&self) -> bool {
        self.instant
    }

    #[cfg(test)]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn needs_loop(&self) -> bool {
        self.visible > 0 && self.total() > self.visible
    }

    /// True when the arrows and dots do anything.
    pub fn can_navigate(&self) -> bool {
        self.mounted && self.needs_loop()
    }

    pub fn effective_visible(&self) -> usize {
        self.visible.min(self.total())
    }

    pub fn num_slides(&self) -> usize {
        if self.needs_loop() {
            self.total().div_ceil(self.visible)
        } else {
            1
        }
    }

    /// Page the pagination dots should highlight.
    pub fn current_slide(&self) -> usize {
        if self.visible == 0 {
            return 0;
        }
        (self.logical_index() / self.visible).min(self.num_slides() - 1)
    }

    #[cfg(test)]
    pub fn display_len(&self) -> usize {
        self.display.len()
    }

    pub fn offset_percent(&self) -> f64 {
        if self.display.is_empty() {
            return 0.0;
        }
        -(self.current_index as f64 * 100.0) / self.display.len() as f64
    }

    pub fn transition(&self) -> TransitionSpec {
        if self.instant {
            TransitionSpec::Instant
        } else {
            self.timing.step()
        }
    }

    pub fn timing(&self) -> Timing {
        self.timing
    }

    /// Bumped on every change the host should react to.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    #[cfg(test)]
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn frame(&self) -> CarouselFrame<'_, T> {
        let total = self.total();
        let slots = self
            .display
            .iter()
            .enumerate()
            .map(|(pos, &idx)| {
                let item = &self.items[idx];
                Slot {
                    key: SlotKey {
                        item: item.key(),
                        lap: if total == 0 { 0 } else { pos / total },
                    },
                    item,
                }
            })
            .collect();

        CarouselFrame {
            slots,
            offset_percent: self.offset_percent(),
            transition: self.transition(),
            current_index: self.current_index,
            current_slide: self.current_slide(),
            num_slides: self.num_slides(),
            effective_visible: self.effective_visible(),
            position: self.position(),
            can_navigate: self.can_navigate(),
            autoplay: self.autoplay,
        }
    }

    // ── navigation ─────────────────────────────────────────────

    /// Step one item forward.  Returns `false` when the call was dropped.
    pub fn next(&mut self) -> bool {
        if !self.accepts_navigation("next") {
            return false;
        }
        let total = self.total();

        if self.current_index == total {
            // The host never reported the last forward transition; do the
            // snap now and take the step on the next frame.
            tracing::debug!("next: correcting stale wrap sentinel");
            self.instant = true;
            self.current_index = 0;
            self.defer_step(1);
        } else {
            self.instant = false;
            self.current_index = (self.current_index + 1).min(total);
        }

        self.acquire_lock();
        self.touch();
        true
    }

    /// Step one item back.  Returns `false` when the call was dropped.
    pub fn previous(&mut self) -> bool {
        if !self.accepts_navigation("previous") {
            return false;
        }
        let total = self.total();

        if self.current_index == 0 {
            self.instant = true;
            self.current_index = total;
            self.defer_step(total - 1);
        } else {
            self.instant = false;
            self.current_index -= 1;
        }

        self.acquire_lock();
        self.touch();
        true
    }

    /// Jump straight to the first item of page `slide`.  The target index is
    /// clamped to the last item, so out-of-range pages land there.  Returns `false` when dropped or already there.
    pub fn go_to_slide(&mut self, slide: usize) -> bool {
        if !self.accepts_navigation("go_to_slide") {
            return false;
        }
        let target = slide.saturating_mul(self.visible).min(self.total() - 1);
        if target == self.current_index && self.pending_step.is_none() {
            return false;
        }

        self.pending_step = None;
        self.instant = false;
        self.current_index = target;
        self.acquire_lock();
        self.touch();
        true
    }

    /// Completion callback from the rendering host.
    ///
    /// Only meaningful when parked on the sentinel after a forward step:
    /// the index snaps back to 0 with zero duration.
    pub fn on_transition_end(&mut self) -> bool {
        if !self.needs_loop() || self.current_index != self.total() || self.pending_step.is_some() {
            return false;
        }
        tracing::trace!("forward wrap: snapping sentinel back to 0");
        self.instant = true;
        self.current_index = 0;
        self.touch();
        true
    }

    // ── autoplay ───────────────────────────────────────────────

    /// Flip autoplay; returns the new state.
    pub fn toggle_autoplay(&mut self) -> bool {
        self.set_autoplay(!self.autoplay);
        self.autoplay
    }

    pub fn set_autoplay(&mut self, on: bool) {
        if self.autoplay == on {
            return;
        }
        self.autoplay = on;
        self.sync_autoplay();
        self.touch();
    }

    /// Whether the autoplay timer is currently armed.
    #[cfg(test)]
    pub fn autoplay_armed(&self) -> bool {
        self.autoplay_timer.is_some()
    }

    // ── inputs ─────────────────────────────────────────────────

    /// Viewport width changed.
    pub fn on_resize(&mut self, width: u32) {
        self.width = width;
        self.set_visible(self.viewport.visible_for(width));
    }

    /// Change the wide-layout card count and re-apply the policy.
    pub fn set_default_visible(&mut self, default_visible: usize) {
        self.viewport.default_visible = default_visible;
        self.set_visible(self.viewport.visible_for(self.width));
    }

    /// Replace the item list.
    pub fn on_items_changed(&mut self, items: Vec<T>) {
        self.items = items;
        self.rebuild_display();
        self.reconcile_index();
        self.sync_autoplay();
        self.touch();
    }

    /// Swap timing; a running autoplay timer is re-armed at the new interval.
    pub fn set_timing(&mut self, timing: Timing) {
        let interval_changed = timing.autoplay_interval != self.timing.autoplay_interval;
        self.timing = timing;
        if interval_changed {
            self.disarm_autoplay();
            self.sync_autoplay();
        }
        self.touch();
    }

    /// Deliver a fired timer or frame request.
    pub fn dispatch(&mut self, wake: Wakeup) {
        match wake {
            Wakeup::ReleaseLock { epoch } => {
                if epoch == self.lock_epoch && self.locked {
                    self.locked = false;
                    self.lock_timer = None;
                }
            }
            Wakeup::AutoplayTick { epoch } => {
                if epoch == self.autoplay_epoch && self.autoplay_timer.is_some() {
                    self.next();
                }
            }
            Wakeup::DeferredStep { epoch } => {
                let Some(step) = self.pending_step else {
                    return;
                };
                if step.epoch != epoch {
                    return;
                }
                self.pending_step = None;
                if !self.needs_loop() {
                    return;
                }
                self.instant = false;
                self.current_index = step.target.min(self.total());
                self.touch();
            }
        }
    }

    /// Tear down timers.  The engine is inert afterwards.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        if let Some(id) = self.lock_timer.take() {
            self.scheduler.cancel(id);
        }
        self.disarm_autoplay();
        self.pending_step = None;
        self.locked = false;
    }

    // ── internals ──────────────────────────────────────────────

    fn accepts_navigation(&self, op: &str) -> bool {
        if !self.can_navigate() {
            return false;
        }
        if self.locked {
            tracing::trace!(op, "navigation dropped: transition in flight");
            return false;
        }
        true
    }

    fn set_visible(&mut self, visible: usize) {
        if visible == self.visible {
            return;
        }
        tracing::debug!(from = self.visible, to = visible, "visible count changed");
        self.visible = visible;
        self.rebuild_display();
        self.reconcile_index();
        self.sync_autoplay();
        self.touch();
    }

    /// Rebuild the display list.  A length change moves every slot's
    /// offset, so the next frame snaps instead of animating the drift.
    fn rebuild_display(&mut self) {
        let total = self.total();
        let before = self.display.len();
        self.display = if self.visible == 0 {
            Vec::new()
        } else if self.needs_loop() {
            (0..total).chain(0..total).collect()
        } else {
            (0..total).collect()
        };
        if self.display.len() != before {
            self.instant = true;
        }
    }

    /// Keep the index in range after the item list or page size changed.
    fn reconcile_index(&mut self) {
        let before = self.current_index;
        if self.needs_loop() {
            self.current_index = self.current_index.min(self.total());
        } else {
            self.current_index = 0;
            self.pending_step = None;
        }
        if self.current_index != before {
            self.instant = true;
        }
    }

    fn defer_step(&mut self, target: usize) {
        self.step_epoch += 1;
        self.pending_step = Some(PendingStep {
            epoch: self.step_epoch,
            target,
        });
        self.scheduler.request_frame(Wakeup::DeferredStep {
            epoch: self.step_epoch,
        });
    }

    fn acquire_lock(&mut self) {
        if let Some(id) = self.lock_timer.take() {
            self.scheduler.cancel(id);
        }
        self.locked = true;
        self.lock_epoch += 1;
        let window = self.timing.lock_window(self.timing.step());
        self.lock_timer = Some(
            self.scheduler
                .schedule_once(window, Wakeup::ReleaseLock { epoch: self.lock_epoch }),
        );
    }

    fn sync_autoplay(&mut self) {
        let should_run = self.mounted && self.autoplay && self.needs_loop() && self.num_slides() > 1;
        match (should_run, self.autoplay_timer.is_some()) {
            (true, false) => {
                self.autoplay_epoch += 1;
                let id = self.scheduler.schedule_repeating(
                    self.timing.autoplay_interval,
                    Wakeup::AutoplayTick {
                        epoch: self.autoplay_epoch,
                    },
                );
                self.autoplay_timer = Some(id);
                tracing::debug!(interval = ?self.timing.autoplay_interval, "autoplay armed");
            }
            (false, true) => {
                self.disarm_autoplay();
                tracing::debug!("autoplay disarmed");
            }
            _ => {}
        }
    }

    fn disarm_autoplay(&mut self) {
        if let Some(id) = self.autoplay_timer.take() {
            self.scheduler.cancel(id);
        }
        self.autoplay_epoch += 1;
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

impl<T: CarouselItem, S: Scheduler> Drop for CarouselEngine<T, S> {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl<T: CarouselItem, S: Scheduler> fmt::Debug for CarouselEngine<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CarouselEngine")
            .field("total", &self.total())
            .field("visible", &self.visible)
            .field("current_index", &self.current_index)
            .field("autoplay", &self.autoplay)
            .field("instant", &self.instant)
            .field("locked", &self.locked)
            .finish()
    }
}
