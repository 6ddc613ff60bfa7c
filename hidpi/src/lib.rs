//! High-DPI renderer setup for physics simulations
//!
//! This crate sizes a renderer's backing surface in physical pixels while keeping its
//! on-screen size at the logical resolution, and hands back a [`ScaleContext`] used to
//! convert logical simulation units into backing-store pixels.
//!
//! ```no_run
//! # use hidpi::{configure, resize, Fixed, HiDpiOptions};
//! # fn demo<B: hidpi::RenderBackend<(), Mount = ()>>(backend: &mut B, options: B::Options) -> Result<(), B::Error> {
//! let source = Fixed(2.0);
//! let mut render = configure(backend, &source, HiDpiOptions {
//!     mount: &(),
//!     engine: &(),
//!     width: 800.0,
//!     height: 600.0,
//!     options,
//! })?;
//! assert_eq!(render.scale.scale(400.0), 800.0);
//!
//! // On window resize:
//! resize(&mut render.renderer, 1024.0, 768.0, &mut render.scale, &source);
//! # Ok(())
//! # }
//! ```

pub mod graphics;
pub mod helper;
pub mod ratio;
pub mod scale;
pub mod surface;

pub use graphics::*;
pub use helper::*;
pub use ratio::*;
pub use scale::*;
pub use surface::*;
