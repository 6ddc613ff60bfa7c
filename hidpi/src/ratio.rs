//! Device pixel ratio and the sources it is read from

use std::sync::Arc;
use winit::{event_loop::EventLoopWindowTarget, window::Window};

/// Physical pixels per logical pixel. Always finite and greater than zero.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct PixelRatio(f64);

impl PixelRatio {
    /// Identity scaling, used whenever no usable ratio is reported.
    pub const ONE: Self = Self(1.0);

    pub fn new(ratio: f64) -> Option<Self> {
        (ratio.is_finite() && ratio > 0.0).then_some(Self(ratio))
    }

    /// Read `source`, falling back to [`PixelRatio::ONE`] when it reports nothing usable.
    pub fn resolve<S: PixelRatioSource + ?Sized>(source: &S) -> Self {
        source
            .pixel_ratio()
            .and_then(Self::new)
            .unwrap_or(Self::ONE)
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl Default for PixelRatio {
    fn default() -> Self {
        Self::ONE
    }
}

/// Anything that can report the display's current pixel ratio.
///
/// Returning `None` means the environment has no notion of a display (headless runs,
/// Wayland before a window exists, ...).
pub trait PixelRatioSource {
    fn pixel_ratio(&self) -> Option<f64>;
}

impl<T: PixelRatioSource + ?Sized> PixelRatioSource for &T {
    fn pixel_ratio(&self) -> Option<f64> {
        (**self).pixel_ratio()
    }
}

impl<T: PixelRatioSource + ?Sized> PixelRatioSource for Arc<T> {
    fn pixel_ratio(&self) -> Option<f64> {
        (**self).pixel_ratio()
    }
}

/// A constant ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fixed(pub f64);

impl PixelRatioSource for Fixed {
    fn pixel_ratio(&self) -> Option<f64> {
        Some(self.0)
    }
}

/// A source that never reports a ratio.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unavailable;

impl PixelRatioSource for Unavailable {
    fn pixel_ratio(&self) -> Option<f64> {
        None
    }
}

/// Adapts a closure into a [`PixelRatioSource`].
#[derive(Debug, Clone, Copy)]
pub struct FromFn<F>(pub F);

pub fn from_fn<F: Fn() -> Option<f64>>(f: F) -> FromFn<F> {
    FromFn(f)
}

impl<F: Fn() -> Option<f64>> PixelRatioSource for FromFn<F> {
    fn pixel_ratio(&self) -> Option<f64> {
        (self.0)()
    }
}

/// Reports `ratio` when set to a usable value, otherwise asks `inner`.
#[derive(Debug, Clone)]
pub struct Override<S> {
    pub ratio: Option<f64>,
    pub inner: S,
}

impl<S> Override<S> {
    pub fn new(ratio: Option<f64>, inner: S) -> Self {
        Self { ratio, inner }
    }
}

impl<S: PixelRatioSource> PixelRatioSource for Override<S> {
    fn pixel_ratio(&self) -> Option<f64> {
        self.ratio
            .filter(|ratio| PixelRatio::new(*ratio).is_some())
            .or_else(|| self.inner.pixel_ratio())
    }
}

impl PixelRatioSource for Window {
    fn pixel_ratio(&self) -> Option<f64> {
        Some(self.scale_factor())
    }
}

// Before any window exists the primary monitor is the best guess.
impl<T: 'static> PixelRatioSource for EventLoopWindowTarget<T> {
    fn pixel_ratio(&self) -> Option<f64> {
        self.primary_monitor().map(|monitor| monitor.scale_factor())
    }
}
