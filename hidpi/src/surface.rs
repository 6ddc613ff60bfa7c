//! The seams between the scaling helper and a rendering engine

use winit::dpi::{LogicalSize, PhysicalSize};

/// A renderer handle with a resizable backing buffer and an independent on-screen size.
pub trait HiDpiSurface {
    /// Size of the buffer actually drawn into, in physical pixels.
    fn backing_size(&self) -> PhysicalSize<u32>;

    fn set_backing_size(&mut self, size: PhysicalSize<u32>);

    /// Size the backing buffer is displayed at, in logical pixels.
    fn presentation_size(&self) -> LogicalSize<f64>;

    fn set_presentation_size(&mut self, size: LogicalSize<f64>);
}

/// What a backend is asked to create: a physically sized buffer plus the caller's
/// pass-through options.
#[derive(Debug, Clone, PartialEq)]
pub struct RendererOptions<O> {
    pub width: u32,
    pub height: u32,
    pub extra: O,
}

/// A rendering engine able to create renderers for a simulation engine of type `E`.
pub trait RenderBackend<E: ?Sized> {
    /// Where the renderer gets attached (a window target, a DOM element, ...).
    type Mount: ?Sized;
    /// Backend specific options, forwarded untouched.
    type Options;
    type Renderer: HiDpiSurface;
    type Error;

    fn create(
        &mut self,
        mount: &Self::Mount,
        engine: &E,
        options: RendererOptions<Self::Options>,
    ) -> Result<Self::Renderer, Self::Error>;
}
