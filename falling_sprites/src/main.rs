//! Falling sprites on a high-DPI canvas
//!
//! Two sprite boxes, one textured at 1x and one at 2x density, fall onto a static
//! floor. The window's backing surface is sized at the display's pixel ratio, and
//! every coordinate is scaled into backing-store pixels, so the 2x texture renders
//! visibly finer on dense displays.
//!
//! Controls:
//! - Space: Pause/resume simulation
//! - R: Reset the scene
//! - B: Drop a random box
//! - W: Toggle wireframes
//!
//! Environment:
//! - `FALLING_SPRITES_WIDTH` / `FALLING_SPRITES_HEIGHT`: logical window size
//! - `FALLING_SPRITES_WIREFRAMES`: `true` to start in wireframe mode
//! - `HIDPI_PIXEL_RATIO`: force a pixel ratio instead of asking the display

mod config;
mod physics;
mod renderer;
mod scene;

use std::{sync::Arc, time::Instant};

use anyhow::{Context, Result};
use config::DemoConfig;
use glam::Vec2;
use hidpi::{
    GraphicsContext, HiDpiOptions, HiDpiRender, HiDpiSurface, Override, ScaleContext, WgpuBackend,
};
use physics::Engine;
use rand::rngs::ThreadRng;
use renderer::Renderer;
use winit::{
    dpi::PhysicalSize,
    event::{ElementState, Event, KeyEvent, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

const MAX_BODIES: usize = 512;

/// Fixed physics timestep
const STEP: f32 = 1.0 / 60.0;

struct App {
    ctx: GraphicsContext,
    renderer: Renderer,
    engine: Engine,
    scale: ScaleContext,
    ratio_source: Override<Arc<Window>>,
    paused: bool,
    accumulator: f32,
    rng: ThreadRng,
}

impl App {
    fn new(ctx: GraphicsContext, engine: Engine, scale: ScaleContext, pixel_ratio: Option<f64>) -> Self {
        let renderer = Renderer::new(&ctx, MAX_BODIES);
        let ratio_source = Override::new(pixel_ratio, ctx.window.clone());

        let mut app = Self {
            ctx,
            renderer,
            engine,
            scale,
            ratio_source,
            paused: false,
            accumulator: 0.0,
            rng: rand::thread_rng(),
        };
        app.reset();
        app
    }

    /// Rebuild every body from its logical description at the current ratio.
    fn reset(&mut self) {
        self.engine.clear();
        self.engine.gravity = scene::gravity(&self.scale);
        self.engine.add(scene::build_scene(&self.scale));
        self.accumulator = 0.0;

        log::info!("scene built at pixel ratio {}", self.scale.ratio().get());
        for sprite in self.engine.bodies.iter().filter_map(|b| b.render.sprite) {
            log::debug!(
                "sprite {} drawn at {}x{} texel scale",
                sprite.texture,
                sprite.x_scale,
                sprite.y_scale
            );
        }
    }

    fn resize(&mut self, width: f64, height: f64) {
        let previous = self.scale.ratio();
        hidpi::resize(&mut self.ctx, width, height, &mut self.scale, &self.ratio_source);

        // Scaled positions are stale once the ratio moves.
        if self.scale.ratio() != previous {
            self.reset();
        }
    }

    fn window_resized(&mut self, size: PhysicalSize<u32>) {
        let logical = size.to_logical::<f64>(self.ctx.window.scale_factor());
        self.resize(logical.width, logical.height);
    }

    fn scale_factor_changed(&mut self) {
        let logical = self.ctx.presentation_size();
        self.resize(logical.width, logical.height);
    }

    fn update(&mut self, dt: f32) {
        if self.paused {
            return;
        }

        self.accumulator += dt;
        while self.accumulator >= STEP {
            self.engine.step(STEP);
            self.accumulator -= STEP;
        }
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let backing = self.ctx.backing_size();
        if backing.width == 0 || backing.height == 0 {
            return Ok(());
        }

        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let options = self.ctx.options();
        self.renderer.update_view(&self.ctx.queue, backing);
        let count = self
            .renderer
            .update_instances(&self.ctx.queue, &self.engine.bodies, options.wireframes);

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.renderer
            .render(&mut encoder, &view, options.background, count);

        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode, state: ElementState) {
        if state != ElementState::Pressed {
            return;
        }

        match key {
            KeyCode::Space => self.paused = !self.paused,
            KeyCode::KeyR => self.reset(),
            KeyCode::KeyB => self.drop_box(),
            KeyCode::KeyW => {
                let options = self.ctx.options_mut();
                options.wireframes = !options.wireframes;
            }
            _ => {}
        }
    }

    fn drop_box(&mut self) {
        if self.engine.bodies.len() >= MAX_BODIES {
            log::warn!("body limit of {} reached", MAX_BODIES);
            return;
        }
        let width = self.ctx.presentation_size().width as f32;
        let body = scene::random_box(&self.scale, width, &mut self.rng);
        self.engine.add([body]);
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let config = DemoConfig::from_env();
    log::debug!("{:?}", config);

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    let engine = Engine::new(Vec2::ZERO);

    let HiDpiRender { renderer: ctx, ratio, scale } = hidpi::configure(
        &mut WgpuBackend::new(),
        &Override::new(config.pixel_ratio, &*event_loop),
        HiDpiOptions {
            mount: &*event_loop,
            engine: &engine,
            width: config.width,
            height: config.height,
            options: config.surface_options(),
        },
    )
    .context("failed to create renderer")?;
    log::info!("device pixel ratio: {}", ratio.get());
    log::info!("controls: Space pause, R reset, B drop box, W wireframes");

    let mut app = App::new(ctx, engine, scale, config.pixel_ratio);
    let mut last_time = Instant::now();

    event_loop
        .run(move |event, elwt| {
            elwt.set_control_flow(ControlFlow::Poll);

            match event {
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested => elwt.exit(),
                    WindowEvent::Resized(size) => app.window_resized(size),
                    WindowEvent::ScaleFactorChanged { .. } => app.scale_factor_changed(),
                    WindowEvent::KeyboardInput {
                        event:
                            KeyEvent {
                                physical_key: PhysicalKey::Code(key),
                                state,
                                ..
                            },
                        ..
                    } => app.handle_key(key, state),
                    WindowEvent::RedrawRequested => {
                        let now = Instant::now();
                        let dt = (now - last_time).as_secs_f32().min(0.1);
                        last_time = now;

                        app.update(dt);
                        match app.render() {
                            Ok(_) => {}
                            Err(wgpu::SurfaceError::Lost) => app.ctx.reconfigure(),
                            Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
                            Err(e) => log::error!("render error: {:?}", e),
                        }
                    }
                    _ => {}
                },
                Event::AboutToWait => {
                    app.ctx.window.request_redraw();
                }
                _ => {}
            }
        })
        .context("event loop error")?;

    Ok(())
}
