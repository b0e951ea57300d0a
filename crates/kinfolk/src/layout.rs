//! Node placement for family charts.
//!
//! The [`Engine`] assigns a top-left position to every person reachable from
//! a root and returns the result as a [`Layout`]. Placement is
//! generation-major: people are bucketed by depth, each depth keeps a
//! right-edge watermark, and within a depth people are visited in store order.
//!
//! For each unplaced person the first rule that applies decides the position:
//!
//! 1. **Spouse-anchored**: next to an already placed spouse, left of it when
//!    the person is first in that spouse's declared order, otherwise right of
//!    the spouse and any of its earlier partners already placed.
//! 2. **Children-anchored**: the person and their unplaced spouses are
//!    centered over the span of their placed children.
//! 3. **Fallback**: one family gap right of the depth's watermark, or at the
//!    origin for an empty depth.
//!
//! After a person is placed, their unplaced spouses follow to the right in
//! declared order. No placement ever starts inside an occupied span, so
//! same-depth nodes never overlap whatever order [`PlacementOrder`] selects.
//! Finally the chart is translated to be centered in the canvas width.

mod chart;
mod engine;
mod watermark;

pub use chart::{Layout, PositionedPerson};
pub use engine::{Engine, PlacementOrder};
