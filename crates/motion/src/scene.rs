//! Per-frame composition of raw targets and springs.
//!
//! Input handlers only write raw targets. Once per rendered frame the
//! drivers copy those targets into their springs and advance them, so input
//! arriving faster than the frame rate never causes extra integration.

use lodestone_model::{EventKind, MagneticConfig, OffsetVector, PointerSample, Region, SpringParams};
use serde::Serialize;

use crate::attraction::PointerAttraction;
use crate::element::{Element, PointerEvent};
use crate::remap::parallax;
use crate::scroll::ScrollProgress;
use crate::spring::SmoothedMotion;

/// A magnetic element: pointer attraction followed by a spring.
#[derive(Debug)]
pub struct MagneticDriver {
    attraction: PointerAttraction,
    motion: SmoothedMotion<OffsetVector>,
}

impl MagneticDriver {
    pub fn new(config: MagneticConfig, spring: SpringParams) -> Self {
        Self {
            attraction: PointerAttraction::new(config),
            motion: SmoothedMotion::new(OffsetVector::ZERO, spring),
        }
    }

    /// Mount on an element.
    pub fn attach(&mut self, element: &Element) {
        self.attraction.start(element);
    }

    /// Unmount. The spring keeps animating back to rest.
    pub fn detach(&mut self) {
        self.attraction.stop();
    }

    pub fn attraction(&self) -> &PointerAttraction {
        &self.attraction
    }

    pub fn attraction_mut(&mut self) -> &mut PointerAttraction {
        &mut self.attraction
    }

    /// Latest unsmoothed offset.
    pub fn raw(&self) -> OffsetVector {
        self.attraction.offset()
    }

    /// Offset to render.
    pub fn value(&self) -> OffsetVector {
        self.motion.value()
    }

    pub fn is_settled(&self) -> bool {
        self.motion.is_settled()
    }

    /// Advance one frame. Returns the new offset if it changed.
    pub fn frame(&mut self, dt: f64) -> Option<OffsetVector> {
        self.motion.set_target(self.attraction.offset());
        self.motion.tick(dt).then(|| self.motion.value())
    }
}

/// A scroll-tracked section rendered with parallax.
#[derive(Debug, Clone)]
pub struct ScrollDriver {
    tracker: ScrollProgress,
    motion: SmoothedMotion<f64>,
    distance: f64,
    raw: f64,
}

impl ScrollDriver {
    pub fn new(tracker: ScrollProgress, spring: SpringParams, distance: f64) -> Self {
        Self {
            tracker,
            motion: SmoothedMotion::new(0.0, spring),
            distance,
            raw: 0.0,
        }
    }

    /// Feed the tracked element's current rectangle. A degenerate layout
    /// leaves the raw progress unchanged.
    pub fn update(&mut self, rect: &Region, viewport_height: f64) -> Option<f64> {
        let progress = self.tracker.progress(rect, viewport_height)?;
        self.raw = progress;
        self.motion.set_target(progress);
        Some(progress)
    }

    /// Latest unsmoothed progress.
    pub fn raw_progress(&self) -> f64 {
        self.raw
    }

    /// Smoothed progress.
    pub fn progress(&self) -> f64 {
        self.motion.value()
    }

    /// Parallax offset for the smoothed progress.
    pub fn parallax(&self) -> f64 {
        parallax(self.motion.value(), self.distance)
    }

    pub fn is_settled(&self) -> bool {
        self.motion.is_settled()
    }

    /// Advance one frame. Returns the new parallax offset if it changed.
    pub fn frame(&mut self, dt: f64) -> Option<f64> {
        self.motion.tick(dt).then(|| self.parallax())
    }
}

/// Geometry of the scroll-tracked section, in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollSection {
    /// Section top relative to the document.
    pub page_top: f64,
    pub height: f64,
    pub viewport_height: f64,
}

impl ScrollSection {
    /// Viewport-relative rectangle at scroll offset `scroll_y`.
    pub fn rect_at(&self, scroll_y: f64) -> Region {
        Region::new(0.0, self.page_top - scroll_y, 0.0, self.height)
    }
}

/// One rendered frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameSample {
    pub frame: u64,
    pub t_ns: u64,
    /// Unsmoothed magnetic offset.
    pub raw: OffsetVector,
    /// Smoothed magnetic offset to render.
    pub offset: OffsetVector,
    /// Parallax translation, when a scroll section is tracked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallax: Option<f64>,
    /// Whether anything rendered differs from the previous frame.
    pub changed: bool,
    pub settled: bool,
}

/// A magnetic element plus an optional scroll-tracked section.
#[derive(Debug)]
pub struct Scene {
    element: Element,
    magnetic: MagneticDriver,
    scroll: Option<(ScrollSection, ScrollDriver)>,
    frame: u64,
}

impl Scene {
    /// Mount a magnetic driver on a fresh element with `layout`.
    pub fn new(layout: Region, config: MagneticConfig, spring: SpringParams) -> Self {
        let element = Element::with_layout(layout);
        let mut magnetic = MagneticDriver::new(config, spring);
        magnetic.attach(&element);
        Self {
            element,
            magnetic,
            scroll: None,
            frame: 0,
        }
    }

    /// Track a section for parallax, starting at scroll offset 0.
    pub fn with_scroll(mut self, section: ScrollSection, driver: ScrollDriver) -> Self {
        let mut driver = driver;
        if let Some(progress) = driver.update(&section.rect_at(0.0), section.viewport_height) {
            driver.motion.jump(progress);
        }
        self.scroll = Some((section, driver));
        self
    }

    pub fn element(&self) -> &Element {
        &self.element
    }

    pub fn magnetic(&self) -> &MagneticDriver {
        &self.magnetic
    }

    pub fn magnetic_mut(&mut self) -> &mut MagneticDriver {
        &mut self.magnetic
    }

    pub fn scroll(&self) -> Option<&ScrollDriver> {
        self.scroll.as_ref().map(|(_, driver)| driver)
    }

    /// Apply one input event. Called between frames, as often as input
    /// arrives.
    pub fn apply(&mut self, event: &EventKind) {
        match *event {
            EventKind::PointerMove { x, y } => {
                self.element
                    .dispatch(PointerEvent::Move(PointerSample::new(x, y)));
            }
            EventKind::PointerLeave => {
                self.element.dispatch(PointerEvent::Leave);
            }
            EventKind::Layout {
                left,
                top,
                width,
                height,
            } => {
                self.element
                    .set_layout(Region::new(left, top, width, height));
            }
            EventKind::Scroll { y } => match self.scroll.as_mut() {
                Some((section, driver)) => {
                    driver.update(&section.rect_at(y), section.viewport_height);
                }
                None => tracing::trace!(y, "Scroll event without a tracked section"),
            },
        }
    }

    /// Whether every spring rests on its target.
    pub fn is_settled(&self) -> bool {
        self.magnetic.is_settled()
            && self
                .scroll
                .as_ref()
                .map_or(true, |(_, driver)| driver.is_settled())
    }

    /// Render one frame at `t_ns`, `dt` seconds after the previous one.
    pub fn frame(&mut self, t_ns: u64, dt: f64) -> FrameSample {
        let offset_changed = self.magnetic.frame(dt).is_some();
        let parallax_changed = self
            .scroll
            .as_mut()
            .map_or(false, |(_, driver)| driver.frame(dt).is_some());

        let sample = FrameSample {
            frame: self.frame,
            t_ns,
            raw: self.magnetic.raw(),
            offset: self.magnetic.value(),
            parallax: self.scroll.as_ref().map(|(_, driver)| driver.parallax()),
            changed: offset_changed || parallax_changed,
            settled: self.is_settled(),
        };
        self.frame += 1;
        sample
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: f64 = 1.0 / 60.0;

    fn scene() -> Scene {
        Scene::new(
            Region::new(0.0, 0.0, 200.0, 100.0),
            MagneticConfig::default(),
            SpringParams::magnetic(),
        )
    }

    #[test]
    fn test_magnetic_driver_lags_then_reaches_target() {
        let mut scene = scene();
        scene.apply(&EventKind::PointerMove { x: 200.0, y: 100.0 });
        assert_eq!(scene.magnetic().raw(), OffsetVector::new(20.0, 20.0));

        let first = scene.frame(0, FRAME);
        assert!(first.changed);
        assert!(first.offset.x > 0.0 && first.offset.x < 20.0);

        for i in 1..300 {
            scene.frame(i, FRAME);
        }
        assert!(scene.is_settled());
        assert_eq!(scene.magnetic().value(), OffsetVector::new(20.0, 20.0));
    }

    #[test]
    fn test_burst_of_moves_uses_latest_only() {
        let mut a = scene();
        let mut b = scene();

        for x in [10.0, 50.0, 120.0, 180.0] {
            a.apply(&EventKind::PointerMove { x, y: 50.0 });
        }
        b.apply(&EventKind::PointerMove { x: 180.0, y: 50.0 });

        assert_eq!(a.frame(0, FRAME).offset, b.frame(0, FRAME).offset);
    }

    #[test]
    fn test_detach_springs_back_to_rest() {
        let mut scene = scene();
        scene.apply(&EventKind::PointerMove { x: 0.0, y: 0.0 });
        for i in 0..30 {
            scene.frame(i, FRAME);
        }
        scene.magnetic_mut().detach();

        let sample = scene.frame(30, FRAME);
        assert_eq!(sample.raw, OffsetVector::ZERO);
        assert_ne!(sample.offset, OffsetVector::ZERO);

        for i in 31..400 {
            scene.frame(i, FRAME);
        }
        assert_eq!(scene.magnetic().value(), OffsetVector::ZERO);
    }

    #[test]
    fn test_pointer_off_element_targets_rest() {
        let mut scene = scene();
        scene.apply(&EventKind::PointerMove {
            x: 1_000.0,
            y: 1_000.0,
        });
        assert_eq!(scene.magnetic().raw(), OffsetVector::ZERO);

        scene.apply(&EventKind::PointerMove { x: 200.0, y: 100.0 });
        assert_eq!(scene.magnetic().raw(), OffsetVector::new(20.0, 20.0));

        scene.apply(&EventKind::Layout {
            left: 5_000.0,
            top: 5_000.0,
            width: 200.0,
            height: 100.0,
        });
        assert_eq!(scene.magnetic().raw(), OffsetVector::ZERO);

        scene.apply(&EventKind::PointerMove { x: 200.0, y: 100.0 });
        assert_eq!(scene.magnetic().raw(), OffsetVector::ZERO);
    }

    #[test]
    fn test_settled_frames_report_unchanged() {
        let mut scene = scene();
        let sample = scene.frame(0, FRAME);
        assert!(!sample.changed);
        assert!(sample.settled);
    }

    #[test]
    fn test_scroll_parallax() {
        let section = ScrollSection {
            page_top: 1_000.0,
            height: 400.0,
            viewport_height: 800.0,
        };
        let driver = ScrollDriver::new(ScrollProgress::default(), SpringParams::scroll(), 300.0);
        let mut scene = scene().with_scroll(section, driver);
        assert_eq!(scene.scroll().unwrap().progress(), 0.0);

        // Section top at 200 → progress 0.5
        scene.apply(&EventKind::Scroll { y: 800.0 });
        assert_eq!(scene.scroll().unwrap().raw_progress(), 0.5);

        let first = scene.frame(0, FRAME);
        let parallax = first.parallax.unwrap();
        assert!(parallax > 0.0 && parallax < 150.0);

        for i in 1..600 {
            scene.frame(i, FRAME);
        }
        assert!(scene.is_settled());
        assert_eq!(scene.scroll().unwrap().parallax(), 150.0);
    }

    #[test]
    fn test_sample_serializes_without_parallax() {
        let mut scene = scene();
        let json = serde_json::to_string(&scene.frame(0, FRAME)).unwrap();
        assert!(json.contains("\"offset\":{\"x\":0.0,\"y\":0.0}"));
        assert!(!json.contains("parallax"));
    }
}
