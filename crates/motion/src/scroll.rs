//! Scroll-linked progress and viewport reveal.
//!
//! Progress is expressed through two intersection points between an
//! element and the viewport: tracking starts when the first one is reached
//! and completes at the second. `"start end"` means "the element's start
//! meets the viewport's end".

use std::fmt;
use std::str::FromStr;

use lodestone_model::Region;

/// Where along an axis an intersection point sits, as a fraction.
fn parse_edge(token: &str) -> Option<f64> {
    match token {
        "start" => Some(0.0),
        "center" => Some(0.5),
        "end" => Some(1.0),
        other => other.parse::<f64>().ok().filter(|v| v.is_finite()),
    }
}

/// Write a fraction back as its edge name where it has one.
fn write_edge(f: &mut fmt::Formatter<'_>, fraction: f64) -> fmt::Result {
    match fraction {
        v if v == 0.0 => f.write_str("start"),
        v if v == 0.5 => f.write_str("center"),
        v if v == 1.0 => f.write_str("end"),
        v => write!(f, "{v}"),
    }
}

/// An intersection between a point on the element and a point on the
/// viewport, each a fraction of its height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollOffset {
    pub element: f64,
    pub viewport: f64,
}

impl ScrollOffset {
    /// Element top meets viewport bottom.
    pub const START_END: ScrollOffset = ScrollOffset {
        element: 0.0,
        viewport: 1.0,
    };

    /// Element bottom meets viewport top.
    pub const END_START: ScrollOffset = ScrollOffset {
        element: 1.0,
        viewport: 0.0,
    };

    pub fn new(element: f64, viewport: f64) -> Self {
        Self { element, viewport }
    }

    /// Element top position (viewport-relative) at which this
    /// intersection holds.
    fn element_top(&self, element_height: f64, viewport_height: f64) -> f64 {
        self.viewport * viewport_height - self.element * element_height
    }
}

impl fmt::Display for ScrollOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_edge(f, self.element)?;
        f.write_str(" ")?;
        write_edge(f, self.viewport)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid scroll offset `{0}`: expected two of start|center|end|<fraction>")]
pub struct ParseScrollOffsetError(String);

impl FromStr for ScrollOffset {
    type Err = ParseScrollOffsetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split_whitespace();
        let parsed = match (tokens.next(), tokens.next(), tokens.next()) {
            (Some(element), Some(viewport), None) => parse_edge(element).zip(parse_edge(viewport)),
            _ => None,
        };
        parsed
            .map(|(element, viewport)| ScrollOffset::new(element, viewport))
            .ok_or_else(|| ParseScrollOffsetError(s.to_string()))
    }
}

/// Maps an element's position in the viewport to a progress in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollProgress {
    pub start: ScrollOffset,
    pub end: ScrollOffset,
}

impl Default for ScrollProgress {
    /// Tracks from the element entering the bottom of the viewport until
    /// it leaves through the top.
    fn default() -> Self {
        Self {
            start: ScrollOffset::START_END,
            end: ScrollOffset::END_START,
        }
    }
}

impl ScrollProgress {
    pub fn new(start: ScrollOffset, end: ScrollOffset) -> Self {
        Self { start, end }
    }

    /// Progress for the element's current rectangle.
    ///
    /// `None` if the start and end positions coincide or the inputs are
    /// not finite.
    pub fn progress(&self, rect: &Region, viewport_height: f64) -> Option<f64> {
        let top_start = self.start.element_top(rect.height, viewport_height);
        let top_end = self.end.element_top(rect.height, viewport_height);
        let span = top_start - top_end;
        if span == 0.0 || !span.is_finite() {
            return None;
        }
        let progress = (top_start - rect.top) / span;
        progress.is_finite().then(|| progress.clamp(0.0, 1.0))
    }
}

/// Fires when enough of an element is inside the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InViewTrigger {
    /// Visible fraction of the element's area required, in `[0, 1]`.
    /// Zero means any overlap counts.
    pub threshold: f64,

    /// Stay in view forever after the first trigger.
    pub once: bool,

    in_view: bool,
}

impl Default for InViewTrigger {
    fn default() -> Self {
        Self::new(0.2, true)
    }
}

impl InViewTrigger {
    pub fn new(threshold: f64, once: bool) -> Self {
        Self {
            threshold: if threshold.is_finite() {
                threshold.clamp(0.0, 1.0)
            } else {
                0.0
            },
            once,
            in_view: false,
        }
    }

    pub fn in_view(&self) -> bool {
        self.in_view
    }

    /// Re-evaluate against the current layout. Returns the in-view state.
    pub fn update(&mut self, rect: &Region, viewport: &Region) -> bool {
        if self.once && self.in_view {
            return true;
        }
        let visible = if rect.has_area() {
            let fraction = rect.intersection_area(viewport) / rect.area();
            if self.threshold == 0.0 {
                fraction > 0.0
            } else {
                fraction >= self.threshold
            }
        } else {
            false
        };
        if visible != self.in_view {
            tracing::trace!(visible, threshold = self.threshold, "In-view state changed");
        }
        self.in_view = visible;
        visible
    }
}
