// ============================================================================
// OPS: stateless rasterization used by the canvas tools
// ============================================================================

pub mod fill;
pub mod shapes;

pub use fill::flood_fill;
pub use shapes::{bresenham_line, ellipse_outline, rectangle_outline};
