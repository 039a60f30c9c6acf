//! PixelFE: a pixel-art raster editing engine.
//!
//! The drawing core (`ops`, `canvas`, `gpu::batch`, `camera`, `components`)
//! is infallible and single-threaded; [`app::Editor`] is the pointer-event
//! facade a windowing layer drives. `io`, `settings` and `cli` are the
//! file-facing collaborators.

pub mod logger;

pub mod app;
pub mod camera;
pub mod canvas;
pub mod cli;
pub mod components;
pub mod error;
pub mod gpu;
pub mod io;
pub mod ops;
pub mod settings;

pub use app::Editor;
pub use camera::{Camera, CanvasBounds, ZoomDirection, ZoomSettings};
pub use canvas::{Canvas, CellChange, Layer, Pixel, PixelGrid};
pub use components::colors::{ColorsPanel, Palette};
pub use components::tools::{PointerButton, Tool, ToolsPanel};
pub use error::PixelFeError;
pub use gpu::{QuadHandle, QuadVertex, RenderBatch};
pub use settings::EditorSettings;
