//! wgpu/winit rendering backend

use std::sync::Arc;
use thiserror::Error;
use winit::{
    dpi::{LogicalSize, PhysicalSize},
    event_loop::EventLoopWindowTarget,
    window::{Window, WindowBuilder},
};

use crate::surface::{HiDpiSurface, RenderBackend, RendererOptions};

/// Errors that can occur while creating a [`GraphicsContext`].
#[derive(Error, Debug)]
pub enum GraphicsError {
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter found")]
    NoAdapter,

    #[error("failed to create device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
}

/// Options forwarded untouched from the caller to the renderer.
#[derive(Debug, Clone)]
pub struct SurfaceOptions {
    pub title: String,
    pub background: wgpu::Color,
    pub wireframes: bool,
    pub present_mode: wgpu::PresentMode,
}

impl Default for SurfaceOptions {
    fn default() -> Self {
        Self {
            title: String::from("hidpi"),
            background: wgpu::Color::BLACK,
            wireframes: false,
            present_mode: wgpu::PresentMode::AutoVsync,
        }
    }
}

/// Creates a window with a wgpu surface for any simulation engine.
#[derive(Debug)]
pub struct WgpuBackend {
    pub power_preference: wgpu::PowerPreference,
}

impl WgpuBackend {
    pub fn new() -> Self {
        Self {
            power_preference: wgpu::PowerPreference::HighPerformance,
        }
    }
}

impl Default for WgpuBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: ?Sized> RenderBackend<E> for WgpuBackend {
    type Mount = EventLoopWindowTarget<()>;
    type Options = SurfaceOptions;
    type Renderer = GraphicsContext;
    type Error = GraphicsError;

    fn create(
        &mut self,
        mount: &EventLoopWindowTarget<()>,
        _engine: &E,
        options: RendererOptions<SurfaceOptions>,
    ) -> Result<GraphicsContext, GraphicsError> {
        pollster::block_on(GraphicsContext::new(mount, self.power_preference, options))
    }
}

/// Holds all GPU resources needed for rendering into a window
pub struct GraphicsContext {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub window: Arc<Window>,
    presentation: LogicalSize<f64>,
    options: SurfaceOptions,
}

impl std::fmt::Debug for GraphicsContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphicsContext")
            .field("config", &self.config)
            .field("presentation", &self.presentation)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl GraphicsContext {
    async fn new(
        target: &EventLoopWindowTarget<()>,
        power_preference: wgpu::PowerPreference,
        options: RendererOptions<SurfaceOptions>,
    ) -> Result<Self, GraphicsError> {
        let RendererOptions {
            width,
            height,
            extra: options,
        } = options;

        // The window starts at the backing size; the caller then sets its logical size.
        let window = Arc::new(
            WindowBuilder::new()
                .with_title(options.title.as_str())
                .with_inner_size(PhysicalSize::new(width, height))
                .build(target)?,
        );

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GraphicsError::NoAdapter)?;
        log::info!("using adapter: {:?}", adapter.get_info());

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    label: None,
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .unwrap_or(wgpu::TextureFormat::Bgra8UnormSrgb);
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        log::info!("surface format: {:?}", surface_format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: options.present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        let presentation = window.inner_size().to_logical(window.scale_factor());
        let context = Self {
            surface,
            device,
            queue,
            config,
            window,
            presentation,
            options,
        };
        context.reconfigure();

        Ok(context)
    }

    /// Re-apply the current surface configuration, e.g. after the surface was lost.
    pub fn reconfigure(&self) {
        if self.config.width > 0 && self.config.height > 0 {
            self.surface.configure(&self.device, &self.config);
        }
    }

    pub fn options(&self) -> &SurfaceOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut SurfaceOptions {
        &mut self.options
    }
}

impl HiDpiSurface for GraphicsContext {
    fn backing_size(&self) -> PhysicalSize<u32> {
        PhysicalSize::new(self.config.width, self.config.height)
    }

    fn set_backing_size(&mut self, size: PhysicalSize<u32>) {
        self.config.width = size.width;
        self.config.height = size.height;
        self.reconfigure();
    }

    fn presentation_size(&self) -> LogicalSize<f64> {
        self.presentation
    }

    fn set_presentation_size(&mut self, size: LogicalSize<f64>) {
        self.presentation = size;

        // Only ask for a new window size when it differs. Resize events feed back here.
        let current: LogicalSize<f64> = self.window.inner_size().to_logical(self.window.scale_factor());
        if (current.width - size.width).abs() >= 0.5 || (current.height - size.height).abs() >= 0.5 {
            let _ = self.window.request_inner_size(size);
        }
    }
}

