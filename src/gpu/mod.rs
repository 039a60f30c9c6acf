// ============================================================================
// GPU MODULE: display-side mirror of the pixel layers
// ============================================================================
//
// Architecture:
//   batch.rs: RenderBatch: cell-keyed unit quads + recycled display list
//
// The batches are drawn verbatim by whatever renderer hosts the editor:
// committed layer first, preview layer on top.
// ============================================================================

pub mod batch;

pub use batch::{Quad, QuadHandle, QuadVertex, RenderBatch};
