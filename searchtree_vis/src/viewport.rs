// Copyright 2025 the Searchtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pan/zoom state mapping layout space onto the screen.

use core::time::Duration;

use kurbo::{Affine, Point, Size, Vec2};

/// Uniform scale plus translation from layout space to screen space.
///
/// Rotation and skew never enter the transform, so `screen = k * p + t`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    extent: Size,
    scale: f64,
    translation: Vec2,
    /// Smallest allowed zoom.
    pub min_scale: f64,
    /// Largest allowed zoom.
    pub max_scale: f64,
}

impl Viewport {
    /// Identity viewport over a screen area of `extent`.
    pub fn new(extent: Size) -> Self {
        Self {
            extent,
            scale: 1.0,
            translation: Vec2::ZERO,
            min_scale: 0.05,
            max_scale: 20.0,
        }
    }

    /// Screen area the viewport covers.
    pub fn extent(&self) -> Size {
        self.extent
    }

    /// Resize the screen area; the transform is kept.
    pub fn set_extent(&mut self, extent: Size) {
        self.extent = extent;
    }

    /// Current zoom factor.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Current screen-space offset of the layout origin.
    pub fn translation(&self) -> Vec2 {
        self.translation
    }

    /// Layout → screen transform.
    pub fn transform(&self) -> Affine {
        Self::compose(self.scale, self.translation)
    }

    /// Replace the transform with one of the form produced by this type.
    ///
    /// Only the uniform scale and translation are read; the scale is clamped.
    pub fn set_transform(&mut self, transform: Affine) {
        let [a, _, _, _, e, f] = transform.as_coeffs();
        self.scale = a.clamp(self.min_scale, self.max_scale);
        self.translation = Vec2::new(e, f);
    }

    /// Shift the view by `delta` screen units.
    pub fn pan_by(&mut self, delta: Vec2) {
        self.translation += delta;
    }

    /// Multiply the zoom by `factor`, keeping `anchor` (in screen space) fixed.
    pub fn zoom_about(&mut self, factor: f64, anchor: Point) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let next = (self.scale * factor).clamp(self.min_scale, self.max_scale);
        let ratio = next / self.scale;
        let a = anchor.to_vec2();
        self.translation = a - (a - self.translation) * ratio;
        self.scale = next;
    }

    /// The transform that centres layout point `p` in the extent at the
    /// current zoom.
    pub fn translate_to(&self, p: Point) -> Affine {
        let center = self.extent.to_vec2() / 2.0;
        Self::compose(self.scale, center - p.to_vec2() * self.scale)
    }

    /// Animation from the current transform to one centred on `p`.
    pub fn focus_on(&self, p: Point, duration: Duration) -> ViewportTransition {
        ViewportTransition {
            from: self.transform(),
            to: self.translate_to(p),
            duration,
        }
    }

    /// Map a screen point into layout space.
    pub fn screen_to_layout(&self, p: Point) -> Point {
        ((p.to_vec2() - self.translation) / self.scale).to_point()
    }

    /// Map a layout point onto the screen.
    pub fn layout_to_screen(&self, p: Point) -> Point {
        (p.to_vec2() * self.scale + self.translation).to_point()
    }

    fn compose(scale: f64, translation: Vec2) -> Affine {
        Affine::new([scale, 0.0, 0.0, scale, translation.x, translation.y])
    }
}

/// A viewport animation between two transforms.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ViewportTransition {
    /// Transform at `t = 0`.
    pub from: Affine,
    /// Transform at `t = 1`.
    pub to: Affine,
    /// How long the animation runs.
    pub duration: Duration,
}

impl ViewportTransition {
    /// Transform at normalized time `t`, clamped to `[0, 1]`.
    ///
    /// The endpoints are returned exactly.
    pub fn sample(&self, t: f64) -> Affine {
        if t.is_nan() || t >= 1.0 {
            return self.to;
        }
        if t <= 0.0 {
            return self.from;
        }
        let a = self.from.as_coeffs();
        let b = self.to.as_coeffs();
        Affine::new(core::array::from_fn(|i| a[i] + (b[i] - a[i]) * t))
    }

    /// Transform after `elapsed` of the animation.
    pub fn at(&self, elapsed: Duration) -> Affine {
        if self.duration.is_zero() {
            return self.to;
        }
        self.sample(elapsed.as_secs_f64() / self.duration.as_secs_f64())
    }
}
