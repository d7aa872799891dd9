//! Pointer attraction ("magnetic" elements).
//!
//! While the pointer moves over an element, its content is pulled toward
//! the pointer by an offset proportional to the pointer's distance from the
//! element's center. The offset is recomputed from scratch on every move and
//! snaps back to zero when the pointer leaves.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use lodestone_model::{MagneticConfig, OffsetVector, PointerSample, Region};

use crate::element::{Element, Listener, ListenerKind, PointerEvent};

/// Offset for a pointer sample over a region.
///
/// Linear, center-relative, normalized by the region's size and then scaled
/// by `strength`: the center yields zero and an edge yields `±strength / 2`.
/// Returns `None` when the region has no measurable area.
pub fn magnetic_offset(
    region: &Region,
    sample: PointerSample,
    strength: f64,
) -> Option<OffsetVector> {
    if !region.has_area() {
        return None;
    }
    let (mid_x, mid_y) = region.center();
    let offset = OffsetVector::new(
        ((sample.client_x - mid_x) / region.width) * strength,
        ((sample.client_y - mid_y) / region.height) * strength,
    );
    offset.is_finite().then_some(offset)
}

type Observer = Box<dyn FnMut(OffsetVector)>;

/// State shared between the tracker and its listener closures.
#[derive(Default)]
struct Shared {
    offset: Cell<OffsetVector>,
    observers: RefCell<Vec<Observer>>,
    skipped_moves: Cell<u64>,
}

impl Shared {
    fn publish(&self, offset: OffsetVector) {
        if self.offset.get() == offset {
            return;
        }
        self.offset.set(offset);

        // Observers may subscribe more observers while being notified.
        let mut observers = self.observers.take();
        for observer in observers.iter_mut() {
            observer(offset);
        }
        let mut slot = self.observers.borrow_mut();
        let added = std::mem::take(&mut *slot);
        *slot = observers;
        slot.extend(added);
    }
}

struct Binding {
    element: Element,
    _on_move: Listener,
    _on_leave: Listener,
}

/// Tracks the pointer over one element and exposes the magnetic offset.
///
/// Listeners are bound by [`start`](Self::start) and released by
/// [`stop`](Self::stop), by a strength change (which rebinds), or when the
/// tracker is dropped.
pub struct PointerAttraction {
    strength: f64,
    shared: Rc<Shared>,
    binding: Option<Binding>,
}

impl std::fmt::Debug for PointerAttraction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PointerAttraction")
            .field("strength", &self.strength)
            .field("offset", &self.offset())
            .field("bound", &self.is_bound())
            .finish()
    }
}

impl Default for PointerAttraction {
    fn default() -> Self {
        Self::new(MagneticConfig::default())
    }
}

impl PointerAttraction {
    pub fn new(config: MagneticConfig) -> Self {
        let strength = if config.strength.is_finite() {
            config.strength
        } else {
            tracing::warn!(strength = config.strength, "Non-finite strength, using default");
            MagneticConfig::default().strength
        };
        Self {
            strength,
            shared: Rc::new(Shared::default()),
            binding: None,
        }
    }

    pub fn strength(&self) -> f64 {
        self.strength
    }

    /// The current offset. `(0, 0)` while the pointer is not over the element.
    pub fn offset(&self) -> OffsetVector {
        self.shared.offset.get()
    }

    pub fn is_bound(&self) -> bool {
        self.binding.is_some()
    }

    /// Moves ignored because the element had no measurable area.
    pub fn skipped_moves(&self) -> u64 {
        self.shared.skipped_moves.get()
    }

    /// Call `observer` with the new offset every time it changes.
    pub fn subscribe(&self, observer: impl FnMut(OffsetVector) + 'static) {
        self.shared.observers.borrow_mut().push(Box::new(observer));
    }

    /// Bind move/leave listeners to `element`. Rebinding to another element
    /// releases the previous one first.
    pub fn start(&mut self, element: &Element) {
        self.binding = None;
        self.binding = Some(self.bind(element.clone()));
        tracing::debug!(strength = self.strength, "Pointer attraction bound");
    }

    /// Release listeners and return to rest. No handler of this tracker
    /// runs after `stop` returns.
    pub fn stop(&mut self) {
        if self.binding.take().is_some() {
            self.shared.publish(OffsetVector::ZERO);
            tracing::debug!("Pointer attraction released");
        }
    }

    /// Change the strength. A bound tracker rebinds so the next move uses
    /// the new value. Non-finite values are ignored.
    pub fn set_strength(&mut self, strength: f64) {
        if !strength.is_finite() {
            tracing::warn!(strength, "Ignoring non-finite strength");
            return;
        }
        if strength == self.strength {
            return;
        }
        self.strength = strength;

        if let Some(binding) = self.binding.take() {
            let element = binding.element.clone();
            drop(binding);
            self.binding = Some(self.bind(element));
            tracing::debug!(strength, "Pointer attraction rebound");
        }
    }

    fn bind(&self, element: Element) -> Binding {
        let strength = self.strength;

        let shared = self.shared.clone();
        let on_move = element.add_listener(ListenerKind::PointerMove, move |event, rect| {
            let PointerEvent::Move(sample) = *event else {
                return;
            };
            match magnetic_offset(rect, sample, strength) {
                Some(offset) => shared.publish(offset),
                None => {
                    shared.skipped_moves.set(shared.skipped_moves.get() + 1);
                    tracing::trace!(?rect, "Skipping move over unmeasured element");
                }
            }
        });

        let shared = self.shared.clone();
        let on_leave = element.add_listener(ListenerKind::PointerLeave, move |_, _| {
            shared.publish(OffsetVector::ZERO);
        });

        Binding {
            element,
            _on_move: on_move,
            _on_leave: on_leave,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn button() -> Element {
        Element::with_layout(Region::new(0.0, 0.0, 200.0, 100.0))
    }

    fn move_to(element: &Element, x: f64, y: f64) {
        element.dispatch(PointerEvent::Move(PointerSample::new(x, y)));
    }

    #[test]
    fn test_bottom_right_corner() {
        let element = button();
        let mut tracker = PointerAttraction::default();
        tracker.start(&element);

        move_to(&element, 200.0, 100.0);
        assert_eq!(tracker.offset(), OffsetVector::new(20.0, 20.0));
    }

    #[test]
    fn test_center_is_rest() {
        let element = Element::with_layout(Region::new(37.0, 91.0, 64.0, 32.0));
        let mut tracker = PointerAttraction::default();
        tracker.start(&element);

        move_to(&element, 69.0, 107.0);
        assert_eq!(tracker.offset(), OffsetVector::ZERO);
    }

    #[test]
    fn test_leave_resets() {
        let element = button();
        let mut tracker = PointerAttraction::default();
        tracker.start(&element);

        move_to(&element, 10.0, 90.0);
        assert_ne!(tracker.offset(), OffsetVector::ZERO);
        element.dispatch(PointerEvent::Leave);
        assert_eq!(tracker.offset(), OffsetVector::ZERO);
    }

    #[test]
    fn test_moves_do_not_accumulate() {
        let element = button();
        let mut tracker = PointerAttraction::default();
        tracker.start(&element);

        for _ in 0..50 {
            move_to(&element, 150.0, 75.0);
        }
        assert_eq!(tracker.offset(), OffsetVector::new(10.0, 10.0));
    }

    #[test]
    fn test_move_off_element_returns_to_rest() {
        let element = button();
        let mut tracker = PointerAttraction::default();
        tracker.start(&element);

        move_to(&element, 1_000.0, 1_000.0);
        assert_eq!(tracker.offset(), OffsetVector::ZERO);

        move_to(&element, 200.0, 100.0);
        assert_eq!(tracker.offset(), OffsetVector::new(20.0, 20.0));
        move_to(&element, 201.0, 100.0);
        assert_eq!(tracker.offset(), OffsetVector::ZERO);
    }

    #[test]
    fn test_element_moving_away_from_pointer_returns_to_rest() {
        let element = button();
        let mut tracker = PointerAttraction::default();
        tracker.start(&element);
        move_to(&element, 200.0, 100.0);

        element.set_layout(Region::new(5_000.0, 5_000.0, 200.0, 100.0));
        assert_eq!(tracker.offset(), OffsetVector::ZERO);

        move_to(&element, 200.0, 100.0);
        assert_eq!(tracker.offset(), OffsetVector::ZERO);
    }

    #[test]
    fn test_unmeasured_element_leaves_offset_unchanged() {
        let element = button();
        let mut tracker = PointerAttraction::default();
        tracker.start(&element);
        move_to(&element, 200.0, 100.0);

        element.set_layout(Region::new(0.0, 0.0, 0.0, 100.0));
        move_to(&element, 0.0, 0.0);

        assert_eq!(tracker.offset(), OffsetVector::new(20.0, 20.0));
        assert_eq!(tracker.skipped_moves(), 1);
    }

    #[test]
    fn test_layout_is_remeasured_each_move() {
        let element = button();
        let mut tracker = PointerAttraction::default();
        tracker.start(&element);

        element.set_layout(Region::new(100.0, 0.0, 200.0, 100.0));
        move_to(&element, 200.0, 50.0);
        assert_eq!(tracker.offset(), OffsetVector::ZERO);
    }

    #[test]
    fn test_strength_change_rebinds() {
        let element = button();
        let mut tracker = PointerAttraction::default();
        tracker.start(&element);

        tracker.set_strength(80.0);
        assert_eq!(element.listener_count(ListenerKind::PointerMove), 1);
        assert_eq!(element.listener_count(ListenerKind::PointerLeave), 1);

        move_to(&element, 200.0, 100.0);
        assert_eq!(tracker.offset(), OffsetVector::new(40.0, 40.0));
    }

    #[test]
    fn test_non_finite_strength_is_ignored() {
        let mut tracker = PointerAttraction::default();
        tracker.set_strength(f64::NAN);
        assert_eq!(tracker.strength(), 40.0);

        let tracker = PointerAttraction::new(MagneticConfig::with_strength(f64::INFINITY));
        assert_eq!(tracker.strength(), 40.0);
    }

    #[test]
    fn test_stop_releases_listeners() {
        let element = button();
        let mut tracker = PointerAttraction::default();
        tracker.start(&element);
        move_to(&element, 200.0, 100.0);

        tracker.stop();
        assert!(!tracker.is_bound());
        assert_eq!(tracker.offset(), OffsetVector::ZERO);
        assert_eq!(element.listener_count(ListenerKind::PointerMove), 0);

        move_to(&element, 200.0, 100.0);
        assert_eq!(tracker.offset(), OffsetVector::ZERO);
    }

    #[test]
    fn test_drop_releases_listeners() {
        let element = button();
        {
            let mut tracker = PointerAttraction::default();
            tracker.start(&element);
            assert_eq!(element.listener_count(ListenerKind::PointerLeave), 1);
        }
        assert_eq!(element.listener_count(ListenerKind::PointerMove), 0);
        assert_eq!(element.listener_count(ListenerKind::PointerLeave), 0);
        assert_eq!(element.dispatch(PointerEvent::Leave), 0);
    }

    #[test]
    fn test_start_on_new_element_releases_old() {
        let first = button();
        let second = button();
        let mut tracker = PointerAttraction::default();
        tracker.start(&first);
        tracker.start(&second);

        assert_eq!(first.listener_count(ListenerKind::PointerMove), 0);
        assert_eq!(second.listener_count(ListenerKind::PointerMove), 1);
    }

    #[test]
    fn test_observer_sees_changes_only() {
        let element = button();
        let mut tracker = PointerAttraction::default();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_in = seen.clone();
        tracker.subscribe(move |offset| seen_in.borrow_mut().push(offset));
        tracker.start(&element);

        move_to(&element, 200.0, 100.0);
        move_to(&element, 200.0, 100.0);
        element.dispatch(PointerEvent::Leave);
        element.dispatch(PointerEvent::Leave);

        assert_eq!(
            *seen.borrow(),
            vec![OffsetVector::new(20.0, 20.0), OffsetVector::ZERO]
        );
    }

    proptest! {
        #[test]
        fn prop_center_yields_zero(
            left in -2_000.0f64..2_000.0,
            top in -2_000.0f64..2_000.0,
            width in 1.0f64..2_000.0,
            height in 1.0f64..2_000.0,
            strength in -200.0f64..200.0,
        ) {
            let region = Region::new(left, top, width, height);
            let (cx, cy) = region.center();
            let offset = magnetic_offset(&region, PointerSample::new(cx, cy), strength).unwrap();
            prop_assert_eq!(offset.x, 0.0);
            prop_assert_eq!(offset.y, 0.0);
        }

        #[test]
        fn prop_edges_yield_half_strength(
            width in 1.0f64..2_000.0,
            height in 1.0f64..2_000.0,
            strength in 0.0f64..200.0,
        ) {
            let region = Region::new(0.0, 0.0, width, height);
            let top_left = magnetic_offset(&region, PointerSample::new(0.0, 0.0), strength).unwrap();
            let bottom_right =
                magnetic_offset(&region, PointerSample::new(width, height), strength).unwrap();

            prop_assert_eq!(top_left.x, -strength / 2.0);
            prop_assert_eq!(top_left.y, -strength / 2.0);
            prop_assert_eq!(bottom_right.x, strength / 2.0);
            prop_assert_eq!(bottom_right.y, strength / 2.0);
        }

        #[test]
        fn prop_offset_is_linear_in_strength(
            left in -500.0f64..500.0,
            width in 1.0f64..1_000.0,
            height in 1.0f64..1_000.0,
            px in -1_000.0f64..1_000.0,
            py in -1_000.0f64..1_000.0,
            strength in 0.0f64..200.0,
        ) {
            let region = Region::new(left, 0.0, width, height);
            let sample = PointerSample::new(px, py);
            let single = magnetic_offset(&region, sample, strength).unwrap();
            let double = magnetic_offset(&region, sample, strength * 2.0).unwrap();
            prop_assert_eq!(double.x, single.x * 2.0);
            prop_assert_eq!(double.y, single.y * 2.0);
        }

        #[test]
        fn prop_offset_is_resolution_independent(
            width in 10.0f64..1_000.0,
            height in 10.0f64..1_000.0,
            fx in 0.0f64..1.0,
            fy in 0.0f64..1.0,
            scale in 0.25f64..8.0,
        ) {
            let region = Region::new(0.0, 0.0, width, height);
            let sample = PointerSample::new(fx * width, fy * height);
            let scaled = region.scaled(scale);
            let scaled_sample = PointerSample::new(fx * scaled.width, fy * scaled.height);

            let a = magnetic_offset(&region, sample, 40.0).unwrap();
            let b = magnetic_offset(&scaled, scaled_sample, 40.0).unwrap();
            prop_assert!((a.x - b.x).abs() < 1e-9);
            prop_assert!((a.y - b.y).abs() < 1e-9);
        }

        #[test]
        fn prop_pointer_outside_region_is_rest(
            px in -1_000.0f64..1_000.0,
            py in -1_000.0f64..1_000.0,
            entered in any::<bool>(),
        ) {
            let element = button();
            let sample = PointerSample::new(px, py);
            prop_assume!(!element.bounding_client_rect().contains(sample));

            let mut tracker = PointerAttraction::default();
            tracker.start(&element);
            if entered {
                move_to(&element, 150.0, 75.0);
            }
            move_to(&element, px, py);
            prop_assert_eq!(tracker.offset(), OffsetVector::ZERO);
        }

        #[test]
        fn prop_leave_always_resets(
            px in -500.0f64..500.0,
            py in -500.0f64..500.0,
        ) {
            let element = button();
            let mut tracker = PointerAttraction::default();
            tracker.start(&element);
            move_to(&element, px, py);
            element.dispatch(PointerEvent::Leave);
            prop_assert_eq!(tracker.offset(), OffsetVector::ZERO);
        }
    }
}
