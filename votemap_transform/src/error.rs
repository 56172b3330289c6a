// Copyright 2025 the Votemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.

/// A transform with zero (or NaN) scale cannot be inverted.
///
/// Scale is normally clamped to a positive range by the camera, so seeing this
/// means a caller skipped the clamp. Geometry built on top of an inverse
/// (visible regions, label placement, tile queries) propagates it rather than
/// guessing a fallback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("cannot invert a map transform with zero scale")]
pub struct DegenerateTransformError;
