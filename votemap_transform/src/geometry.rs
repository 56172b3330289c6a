// Copyright 2025 the Votemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Viewport and box geometry.
//!
//! Boxes are axis-aligned [`Rect`]s in map space. When the map is rotated the
//! screen maps to a diamond in map space, represented here as a [`Quad`]; its
//! [`envelope`](Quad::envelope) is the conservative axis-aligned box used for
//! fetching and label placement.

use kurbo::{Point, Rect, Size};

use crate::error::DegenerateTransformError;
use crate::transform::Transform;

/// Four corners of a possibly rotated box, in winding order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quad(pub [Point; 4]);

impl Quad {
    /// Corners of `rect` in the order top-left, bottom-left, bottom-right, top-right.
    #[must_use]
    pub fn from_rect(rect: Rect) -> Self {
        Self([
            Point::new(rect.x0, rect.y0),
            Point::new(rect.x0, rect.y1),
            Point::new(rect.x1, rect.y1),
            Point::new(rect.x1, rect.y0),
        ])
    }

    /// Axis-aligned bounding box of the four corners.
    #[must_use]
    pub fn envelope(&self) -> Rect {
        envelope(&self.0)
    }

    /// Project every corner from map space to screen space.
    #[must_use]
    pub fn to_screen(&self, transform: &Transform) -> Self {
        Self(self.0.map(|p| transform.apply(p)))
    }

    /// Project every corner from screen space back to map space.
    pub fn to_map(&self, transform: &Transform) -> Result<Self, DegenerateTransformError> {
        let [a, b, c, d] = self.0;
        Ok(Self([
            transform.inverse(a)?,
            transform.inverse(b)?,
            transform.inverse(c)?,
            transform.inverse(d)?,
        ]))
    }
}

/// Axis-aligned bounding box of a set of points.
///
/// Returns [`Rect::ZERO`] for an empty slice.
#[must_use]
pub fn envelope(points: &[Point]) -> Rect {
    let Some((first, rest)) = points.split_first() else {
        return Rect::ZERO;
    };
    rest.iter().fold(
        Rect::new(first.x, first.y, first.x, first.y),
        |acc, p| Rect::new(acc.x0.min(p.x), acc.y0.min(p.y), acc.x1.max(p.x), acc.y1.max(p.y)),
    )
}

/// The screen's four corners in map space.
pub fn map_corners(screen: Size, transform: &Transform) -> Result<Quad, DegenerateTransformError> {
    Quad::from_rect(screen.to_rect()).to_map(transform)
}

/// Map-space envelope of everything currently on screen.
pub fn visible_region(screen: Size, transform: &Transform) -> Result<Rect, DegenerateTransformError> {
    Ok(map_corners(screen, transform)?.envelope())
}

/// The transform that fits `inner` centered inside `outer`, preserving aspect ratio.
///
/// The result has no rotation. When `inner` is relatively taller than `outer`
/// the heights are matched, otherwise the widths are. An `inner` box that is
/// empty along one axis is fitted along the other; one that is empty along
/// both keeps unit scale and is simply centered.
#[must_use]
pub fn fit_box(inner: Rect, outer: Rect) -> Transform {
    let (iw, ih) = (inner.width(), inner.height());
    let (ow, oh) = (outer.width(), outer.height());

    let scale = match (iw > 0.0, ih > 0.0) {
        (false, false) => 1.0,
        (true, false) => ow / iw,
        (false, true) => oh / ih,
        (true, true) => {
            if iw / ih < ow / oh {
                oh / ih
            } else {
                ow / iw
            }
        }
    };

    Transform::new(
        scale,
        0.0,
        outer.x0 - scale * inner.x0 + (ow - scale * iw) / 2.0,
        outer.y0 - scale * inner.y0 + (oh - scale * ih) / 2.0,
    )
}

/// Result of [`combine_boxes`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Combined<'a> {
    /// One input contains the other; this is that input, borrowed rather than copied.
    Contained(&'a Rect),
    /// Neither contains the other; this is the smallest box enclosing both.
    Enclosing(Rect),
}

impl Combined<'_> {
    /// The combined box.
    #[must_use]
    pub fn rect(&self) -> Rect {
        match self {
            Self::Contained(r) => **r,
            Self::Enclosing(r) => *r,
        }
    }

    /// Whether one input contained the other.
    #[must_use]
    pub fn is_contained(&self) -> bool {
        matches!(self, Self::Contained(_))
    }
}

/// Combine two boxes.
///
/// If one box contains the other, that box is returned by reference so callers
/// can cheaply tell the nested case apart (`core::ptr::eq`). Otherwise the
/// minimal box enclosing both is returned.
#[must_use]
pub fn combine_boxes<'a>(a: &'a Rect, b: &'a Rect) -> Combined<'a> {
    if contains_box(a, b) {
        Combined::Contained(a)
    } else if contains_box(b, a) {
        Combined::Contained(b)
    } else {
        Combined::Enclosing(a.union(*b))
    }
}

/// Whether `outer` fully contains `inner`; shared edges count as contained.
#[must_use]
pub fn contains_box(outer: &Rect, inner: &Rect) -> bool {
    outer.x0 <= inner.x0 && outer.y0 <= inner.y0 && inner.x1 <= outer.x1 && inner.y1 <= outer.y1
}

/// Whether two boxes overlap; shared edges count as overlapping.
///
/// Used for clipping, such as a label footprint against the occlusion grid.
/// Jump planning asks for containment instead, through [`combine_boxes`].
#[must_use]
pub fn boxes_overlap(a: &Rect, b: &Rect) -> bool {
    a.x0 <= b.x1 && a.x1 >= b.x0 && a.y0 <= b.y1 && a.y1 >= b.y0
}
