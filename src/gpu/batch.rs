// ============================================================================
// RENDER BATCH: per-cell quads mirroring one pixel layer
// ============================================================================
//
// The batch keeps a display list of unit quads (one per non-empty cell) plus
// a cell → handle table so a single cell edit touches a single quad. Freed
// display-list slots are recycled, mirroring the texture pool's
// acquire/release pattern.

use bytemuck::{Pod, Zeroable};
use image::Rgba;

/// One corner of a cell quad, laid out for direct upload to a vertex buffer.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 2],
    pub color: [u8; 4],
}

/// Four corners, counter-clockwise from the bottom-left.
pub type Quad = [QuadVertex; 4];

/// Opaque handle to a quad in a batch's display list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct QuadHandle(u32);

pub struct RenderBatch {
    width: u32,
    height: u32,
    /// World position of the canvas' bottom-left corner.
    origin: [f32; 2],
    /// Row-major (row 0 = top) handle table, one slot per cell.
    cells: Vec<Option<QuadHandle>>,
    /// Display list slots; `None` once released.
    quads: Vec<Option<Quad>>,
    free: Vec<u32>,
    live: usize,
}

impl RenderBatch {
    pub fn new(width: u32, height: u32, origin: [f32; 2]) -> Self {
        Self {
            width,
            height,
            origin,
            cells: vec![None; width as usize * height as usize],
            quads: Vec::new(),
            free: Vec::new(),
            live: 0,
        }
    }

    fn index(&self, pos: (u32, u32)) -> Option<usize> {
        if pos.0 < self.width && pos.1 < self.height {
            Some(pos.1 as usize * self.width as usize + pos.0 as usize)
        } else {
            None
        }
    }

    /// Install a quad for `pos` (grid space), releasing any quad already
    /// there first. Returns the new handle, or `None` when `pos` is outside
    /// the batch.
    pub fn upsert(&mut self, pos: (u32, u32), color: Rgba<u8>) -> Option<QuadHandle> {
        let idx = self.index(pos)?;
        if let Some(old) = self.cells[idx].take() {
            self.release(old);
        }
        let quad = self.quad_for(pos, color);
        let handle = self.allocate(quad);
        self.cells[idx] = Some(handle);
        Some(handle)
    }

    /// Release the quad at `pos`, if any. Removing an absent cell is a no-op.
    pub fn remove(&mut self, pos: (u32, u32)) {
        let Some(idx) = self.index(pos) else { return };
        if let Some(old) = self.cells[idx].take() {
            self.release(old);
        }
    }

    /// Drop every quad, keeping the cell table dimensions.
    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|c| *c = None);
        self.quads.clear();
        self.free.clear();
        self.live = 0;
    }

    pub fn handle_at(&self, pos: (u32, u32)) -> Option<QuadHandle> {
        self.index(pos).and_then(|idx| self.cells[idx])
    }

    pub fn quad(&self, handle: QuadHandle) -> Option<&Quad> {
        self.quads.get(handle.0 as usize).and_then(|q| q.as_ref())
    }

    /// Number of live quads.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Live quads in display-list order.
    pub fn quads(&self) -> impl Iterator<Item = &Quad> {
        self.quads.iter().flatten()
    }

    /// Flat vertex data for every live quad, ready for a vertex buffer.
    pub fn vertex_bytes(&self) -> Vec<u8> {
        let vertices: Vec<QuadVertex> = self.quads().flat_map(|q| q.iter().copied()).collect();
        bytemuck::cast_slice(&vertices).to_vec()
    }

    /// Unit quad for a grid cell. Grid rows run top-down while world y runs
    /// up, so row `r` spans world y `origin + height - r - 1 ..= origin + height - r`.
    fn quad_for(&self, pos: (u32, u32), color: Rgba<u8>) -> Quad {
        let x = pos.0 as f32 + self.origin[0];
        let y = (self.height - pos.1) as f32 + self.origin[1];
        let color = color.0;
        [
            QuadVertex { position: [x, y - 1.0], color },
            QuadVertex { position: [x + 1.0, y - 1.0], color },
            QuadVertex { position: [x + 1.0, y], color },
            QuadVertex { position: [x, y], color },
        ]
    }

    fn allocate(&mut self, quad: Quad) -> QuadHandle {
        self.live += 1;
        match self.free.pop() {
            Some(slot) => {
                self.quads[slot as usize] = Some(quad);
                QuadHandle(slot)
            }
            None => {
                self.quads.push(Some(quad));
                QuadHandle((self.quads.len() - 1) as u32)
            }
        }
    }

    fn release(&mut self, handle: QuadHandle) {
        if let Some(slot) = self.quads.get_mut(handle.0 as usize)
            && slot.take().is_some()
        {
            self.live -= 1;
            self.free.push(handle.0);
        }
    }
}
