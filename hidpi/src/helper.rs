//! Creating and resizing renderers at the display's pixel ratio

use winit::dpi::LogicalSize;

use crate::{
    ratio::{PixelRatio, PixelRatioSource},
    scale::ScaleContext,
    surface::{HiDpiSurface, RenderBackend, RendererOptions},
};

/// Everything needed to create a high-DPI renderer.
///
/// `width` and `height` are logical; `options` is handed to the backend as is.
#[derive(Debug)]
pub struct HiDpiOptions<'a, M: ?Sized, E: ?Sized, O> {
    pub mount: &'a M,
    pub engine: &'a E,
    pub width: f64,
    pub height: f64,
    pub options: O,
}

/// A freshly configured renderer together with the ratio it was sized for.
///
/// `ratio` is always equal to `scale.ratio()`; `scale` is the copy callers keep and
/// hand to [`resize`].
#[derive(Debug)]
pub struct HiDpiRender<R> {
    pub renderer: R,
    pub ratio: PixelRatio,
    pub scale: ScaleContext,
}

/// Create a renderer whose backing buffer is `width × height` multiplied by the pixel
/// ratio reported by `source`, displayed at `width × height`.
///
/// Errors from the backend are returned unchanged.
pub fn configure<B, E, S>(
    backend: &mut B,
    source: &S,
    options: HiDpiOptions<'_, B::Mount, E, B::Options>,
) -> Result<HiDpiRender<B::Renderer>, B::Error>
where
    B: RenderBackend<E> + ?Sized,
    E: ?Sized,
    S: PixelRatioSource + ?Sized,
{
    let HiDpiOptions {
        mount,
        engine,
        width,
        height,
        options,
    } = options;

    let ratio = PixelRatio::resolve(source);
    let scale = ScaleContext::new(ratio);
    let logical = LogicalSize::new(width, height);
    let physical = scale.physical_size(logical);

    log::debug!(
        "configuring renderer at ratio {}: {}x{} logical, {}x{} backing",
        ratio.get(),
        width,
        height,
        physical.width,
        physical.height
    );

    let mut renderer = backend.create(
        mount,
        engine,
        RendererOptions {
            width: physical.width,
            height: physical.height,
            extra: options,
        },
    )?;
    renderer.set_presentation_size(logical);

    Ok(HiDpiRender {
        renderer,
        ratio,
        scale,
    })
}

/// Re-read the pixel ratio and size `renderer` for the new logical dimensions.
///
/// `scale` is updated in place; anything scaled with its previous ratio is stale.
pub fn resize<R, S>(renderer: &mut R, width: f64, height: f64, scale: &mut ScaleContext, source: &S)
where
    R: HiDpiSurface + ?Sized,
    S: PixelRatioSource + ?Sized,
{
    let ratio = PixelRatio::resolve(source);
    if ratio != scale.ratio() {
        log::debug!("pixel ratio changed: {} -> {}", scale.ratio().get(), ratio.get());
    }
    scale.set_ratio(ratio);

    let logical = LogicalSize::new(width, height);
    let physical = scale.physical_size(logical);
    log::debug!(
        "resizing renderer: {}x{} logical, {}x{} backing",
        width,
        height,
        physical.width,
        physical.height
    );

    renderer.set_backing_size(physical);
    renderer.set_presentation_size(logical);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ratio::{Fixed, Unavailable};
    use std::cell::Cell;
    use winit::dpi::PhysicalSize;

    #[derive(Debug, Clone, PartialEq)]
    struct CanvasOptions {
        background: &'static str,
        wireframes: bool,
    }

    #[derive(Debug)]
    struct Canvas {
        backing: PhysicalSize<u32>,
        presentation: LogicalSize<f64>,
        options: RendererOptions<CanvasOptions>,
        engine_bodies: usize,
    }

    impl HiDpiSurface for Canvas {
        fn backing_size(&self) -> PhysicalSize<u32> {
            self.backing
        }

        fn set_backing_size(&mut self, size: PhysicalSize<u32>) {
            self.backing = size;
        }

        fn presentation_size(&self) -> LogicalSize<f64> {
            self.presentation
        }

        fn set_presentation_size(&mut self, size: LogicalSize<f64>) {
            self.presentation = size;
        }
    }

    struct World {
        bodies: usize,
    }

    #[derive(Default)]
    struct CanvasBackend {
        created: usize,
    }

    impl RenderBackend<World> for CanvasBackend {
        type Mount = str;
        type Options = CanvasOptions;
        type Renderer = Canvas;
        type Error = String;

        fn create(
            &mut self,
            mount: &str,
            engine: &World,
            options: RendererOptions<CanvasOptions>,
        ) -> Result<Canvas, String> {
            if mount.is_empty() {
                return Err("mount target does not exist".to_string());
            }
            self.created += 1;
            Ok(Canvas {
                // A fresh canvas is displayed at its backing size until styled.
                backing: PhysicalSize::new(options.width, options.height),
                presentation: LogicalSize::new(options.width.into(), options.height.into()),
                options,
                engine_bodies: engine.bodies,
            })
        }
    }

    fn options(width: f64, height: f64) -> HiDpiOptions<'static, str, World, CanvasOptions> {
        HiDpiOptions {
            mount: "canvas-container",
            engine: &World { bodies: 3 },
            width,
            height,
            options: CanvasOptions {
                background: "black",
                wireframes: false,
            },
        }
    }

    #[test]
    fn test_configure_sizes_backing_and_presentation() {
        let mut backend = CanvasBackend::default();
        let render = configure(&mut backend, &Fixed(2.0), options(800.0, 600.0)).unwrap();

        assert_eq!(render.ratio.get(), 2.0);
        assert_eq!(render.scale.ratio(), render.ratio);
        assert_eq!(render.renderer.backing_size(), PhysicalSize::new(1600, 1200));
        assert_eq!(render.renderer.presentation_size(), LogicalSize::new(800.0, 600.0));
        assert_eq!(render.scale.scale(400.0), 800.0);
        assert_eq!(backend.created, 1);
    }

    #[test]
    fn test_configure_forwards_options_and_engine() {
        let mut backend = CanvasBackend::default();
        let render = configure(&mut backend, &Fixed(1.5), options(200.0, 100.0)).unwrap();

        assert_eq!(
            render.renderer.options,
            RendererOptions {
                width: 300,
                height: 150,
                extra: CanvasOptions {
                    background: "black",
                    wireframes: false,
                },
            }
        );
        assert_eq!(render.renderer.engine_bodies, 3);
    }

    #[test]
    fn test_configure_without_ratio_is_identity() {
        let mut backend = CanvasBackend::default();
        let render = configure(&mut backend, &Unavailable, options(800.0, 600.0)).unwrap();

        assert_eq!(render.ratio, PixelRatio::ONE);
        assert_eq!(render.renderer.backing_size(), PhysicalSize::new(800, 600));
        assert_eq!(render.scale.scale(42.0), 42.0);
    }

    #[test]
    fn test_configure_propagates_backend_errors() {
        let mut backend = CanvasBackend::default();
        let mut missing = options(800.0, 600.0);
        missing.mount = "";

        let err = configure(&mut backend, &Fixed(2.0), missing).unwrap_err();
        assert_eq!(err, "mount target does not exist");
        assert_eq!(backend.created, 0);
    }

    #[test]
    fn test_resize() {
        let mut backend = CanvasBackend::default();
        let source = Fixed(2.0);
        let HiDpiRender {
            renderer: mut canvas,
            mut scale,
            ..
        } = configure(&mut backend, &source, options(800.0, 600.0)).unwrap();

        resize(&mut canvas, 1024.0, 768.0, &mut scale, &source);

        assert_eq!(canvas.backing_size(), PhysicalSize::new(2048, 1536));
        assert_eq!(canvas.presentation_size(), LogicalSize::new(1024.0, 768.0));
        assert_eq!(scale.scale(10.0), 20.0);
    }

    #[test]
    fn test_resize_is_idempotent() {
        let mut canvas = Canvas {
            backing: PhysicalSize::new(1, 1),
            presentation: LogicalSize::new(1.0, 1.0),
            options: RendererOptions {
                width: 1,
                height: 1,
                extra: CanvasOptions {
                    background: "white",
                    wireframes: true,
                },
            },
            engine_bodies: 0,
        };
        let mut scale = ScaleContext::default();

        resize(&mut canvas, 640.0, 480.0, &mut scale, &Fixed(1.25));
        let first = (canvas.backing_size(), canvas.presentation_size(), scale);
        resize(&mut canvas, 640.0, 480.0, &mut scale, &Fixed(1.25));

        assert_eq!((canvas.backing_size(), canvas.presentation_size(), scale), first);
        assert_eq!(canvas.backing_size(), PhysicalSize::new(800, 600));
    }

    #[test]
    fn test_fractional_backing_drops_partial_pixels() {
        let mut backend = CanvasBackend::default();
        let source = Fixed(1.5);
        let mut render = configure(&mut backend, &source, options(801.0, 601.0)).unwrap();
        assert_eq!(render.renderer.backing_size(), PhysicalSize::new(1201, 901));

        resize(&mut render.renderer, 333.0, 111.0, &mut render.scale, &source);
        assert_eq!(render.renderer.backing_size(), PhysicalSize::new(499, 166));
        assert_eq!(render.renderer.presentation_size(), LogicalSize::new(333.0, 111.0));
    }

    #[test]
    fn test_resize_invalidates_previous_scale() {
        let ratio = Cell::new(1.0);
        let source = crate::ratio::from_fn(|| Some(ratio.get()));

        let mut backend = CanvasBackend::default();
        let mut render = configure(&mut backend, &source, options(800.0, 600.0)).unwrap();
        let stale = render.scale.scale(100.0);
        assert_eq!(stale, 100.0);

        // Window dragged onto a denser display.
        ratio.set(2.0);
        resize(&mut render.renderer, 800.0, 600.0, &mut render.scale, &source);

        assert_eq!(render.scale.scale(100.0), 200.0);
        assert_ne!(render.scale.scale(100.0), stale);
        assert_eq!(render.renderer.backing_size(), PhysicalSize::new(1600, 1200));
        assert_eq!(render.renderer.presentation_size(), LogicalSize::new(800.0, 600.0));
    }

    #[test]
    fn test_independent_contexts() {
        let mut backend = CanvasBackend::default();
        let dense = configure(&mut backend, &Fixed(3.0), options(100.0, 100.0)).unwrap();
        let plain = configure(&mut backend, &Fixed(1.0), options(100.0, 100.0)).unwrap();

        assert_eq!(dense.scale.scale(10.0), 30.0);
        assert_eq!(plain.scale.scale(10.0), 10.0);
        assert_eq!(backend.created, 2);
    }
}
