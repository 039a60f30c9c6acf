use image::Rgba;

use crate::gpu::RenderBatch;
use crate::ops::{bresenham_line, ellipse_outline, flood_fill, rectangle_outline};
use crate::{log_info, log_warn};

/// Largest canvas side accepted anywhere (settings, CLI, project files).
pub const MAX_CANVAS_DIM: u32 = 4096;

// ============================================================================
// PIXELS & LAYERS
// ============================================================================

/// Content of one grid cell. `Empty` is a distinct state, never a colour
/// value, so every RGBA quadruple (including `0,0,0,0`) stays paintable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Pixel {
    #[default]
    Empty,
    Color(Rgba<u8>),
}

impl Pixel {
    pub fn color(self) -> Option<Rgba<u8>> {
        match self {
            Pixel::Empty => None,
            Pixel::Color(c) => Some(c),
        }
    }

    pub fn is_empty(self) -> bool {
        matches!(self, Pixel::Empty)
    }
}

/// Which of the two grids an edit targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Layer {
    /// The persisted drawing.
    Committed,
    /// Tentative shape feedback, merged into `Committed` on release.
    Preview,
}

/// A cell whose stored pixel changed, in grid space, with its new value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellChange {
    pub pos: (u32, u32),
    pub layer: Layer,
    pub pixel: Pixel,
}

// ============================================================================
// PIXEL GRID: committed + preview layers
// ============================================================================

/// Fixed-size two-layer pixel store, row-major with row 0 at the top.
///
/// Every accessor is bounds-checked: reads outside the grid return
/// `Pixel::Empty` and writes outside it are dropped.
#[derive(Clone, Debug)]
pub struct PixelGrid {
    width: u32,
    height: u32,
    committed: Vec<Pixel>,
    preview: Vec<Pixel>,
    /// Indices that went Empty → Color in `preview` since the last
    /// commit/discard, so neither has to scan the whole layer.
    preview_touched: Vec<usize>,
}

impl PixelGrid {
    pub fn new(width: u32, height: u32) -> Self {
        let clamped = (width.clamp(1, MAX_CANVAS_DIM), height.clamp(1, MAX_CANVAS_DIM));
        if clamped != (width, height) {
            log_warn!(
                "PixelGrid::new: grid {}x{} clamped to {}x{}",
                width,
                height,
                clamped.0,
                clamped.1
            );
        }
        let (width, height) = clamped;
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            committed: vec![Pixel::Empty; len],
            preview: vec![Pixel::Empty; len],
            preview_touched: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    fn pos_of(&self, idx: usize) -> (u32, u32) {
        let w = self.width as usize;
        ((idx % w) as u32, (idx / w) as u32)
    }

    fn layer_mut(&mut self, layer: Layer) -> &mut Vec<Pixel> {
        match layer {
            Layer::Committed => &mut self.committed,
            Layer::Preview => &mut self.preview,
        }
    }

    /// Whole layer, row-major.
    pub fn pixels(&self, layer: Layer) -> &[Pixel] {
        match layer {
            Layer::Committed => &self.committed,
            Layer::Preview => &self.preview,
        }
    }

    pub fn get(&self, x: i32, y: i32, layer: Layer) -> Pixel {
        self.index(x, y)
            .map(|idx| self.pixels(layer)[idx])
            .unwrap_or(Pixel::Empty)
    }

    /// Store `color` at `(x, y)`. Returns the change, or `None` when the cell
    /// is out of range or already holds exactly this colour.
    pub fn set(&mut self, x: i32, y: i32, layer: Layer, color: Rgba<u8>) -> Option<CellChange> {
        let idx = self.index(x, y)?;
        let new = Pixel::Color(color);
        let old = std::mem::replace(&mut self.layer_mut(layer)[idx], new);
        if old == new {
            return None;
        }
        if layer == Layer::Preview && old.is_empty() {
            self.preview_touched.push(idx);
        }
        Some(CellChange { pos: self.pos_of(idx), layer, pixel: new })
    }

    /// Reset `(x, y)` to `Empty`. Returns the change, or `None` when the cell
    /// is out of range or already empty.
    pub fn clear(&mut self, x: i32, y: i32, layer: Layer) -> Option<CellChange> {
        let idx = self.index(x, y)?;
        let old = std::mem::take(&mut self.layer_mut(layer)[idx]);
        if old.is_empty() {
            return None;
        }
        Some(CellChange { pos: self.pos_of(idx), layer, pixel: Pixel::Empty })
    }

    /// Move every preview pixel into the committed layer and empty the
    /// preview. Reports both the committed writes and the preview resets.
    pub fn commit_preview(&mut self) -> Vec<CellChange> {
        let mut changes = Vec::new();
        for idx in std::mem::take(&mut self.preview_touched) {
            let Pixel::Color(color) = std::mem::take(&mut self.preview[idx]) else {
                continue;
            };
            let pos = self.pos_of(idx);
            if self.committed[idx] != Pixel::Color(color) {
                self.committed[idx] = Pixel::Color(color);
                changes.push(CellChange { pos, layer: Layer::Committed, pixel: Pixel::Color(color) });
            }
            changes.push(CellChange { pos, layer: Layer::Preview, pixel: Pixel::Empty });
        }
        changes
    }

    /// Empty the preview layer without touching the committed layer.
    pub fn discard_preview(&mut self) -> Vec<CellChange> {
        let mut changes = Vec::new();
        for idx in std::mem::take(&mut self.preview_touched) {
            if std::mem::take(&mut self.preview[idx]).is_empty() {
                continue;
            }
            changes.push(CellChange { pos: self.pos_of(idx), layer: Layer::Preview, pixel: Pixel::Empty });
        }
        changes
    }

    pub fn preview_is_empty(&self) -> bool {
        self.preview_touched.iter().all(|&idx| self.preview[idx].is_empty())
    }
}

// ============================================================================
// CANVAS: grid + render batches + tool primitives
// ============================================================================

/// The editable canvas: a [`PixelGrid`] mirrored into one [`RenderBatch`]
/// per layer.
///
/// Tool methods take canvas cells, which are y-up (row 0 at the bottom) like
/// world space; each cell is flipped into grid space exactly once on entry.
/// Every grid mutation is forwarded to the matching batch before the call
/// returns, so a batch holds a quad for a cell iff the grid cell is non-empty.
pub struct Canvas {
    grid: PixelGrid,
    pixel_batch: RenderBatch,
    preview_batch: RenderBatch,
    /// World position of the bottom-left corner.
    origin: [f32; 2],
}

impl Canvas {
    pub fn new(width: u32, height: u32, origin: [f32; 2]) -> Self {
        let grid = PixelGrid::new(width, height);
        let (w, h) = (grid.width(), grid.height());
        Self {
            grid,
            pixel_batch: RenderBatch::new(w, h, origin),
            preview_batch: RenderBatch::new(w, h, origin),
            origin,
        }
    }

    pub fn width(&self) -> u32 {
        self.grid.width()
    }

    pub fn height(&self) -> u32 {
        self.grid.height()
    }

    pub fn origin(&self) -> [f32; 2] {
        self.origin
    }

    pub fn grid(&self) -> &PixelGrid {
        &self.grid
    }

    pub fn batch(&self, layer: Layer) -> &RenderBatch {
        match layer {
            Layer::Committed => &self.pixel_batch,
            Layer::Preview => &self.preview_batch,
        }
    }

    /// Status-bar text, e.g. `"64 x 64 px"`.
    pub fn size_label(&self) -> String {
        format!("{} x {} px", self.width(), self.height())
    }

    pub fn contains_cell(&self, cell: (i32, i32)) -> bool {
        cell.0 >= 0
            && cell.1 >= 0
            && (cell.0 as u32) < self.width()
            && (cell.1 as u32) < self.height()
    }

    /// Canvas cell (y-up) → grid position (y-down). Not bounds-checked; the
    /// grid does that. Saturates, so extreme cells stay out of range.
    fn to_grid(&self, cell: (i32, i32)) -> (i32, i32) {
        (cell.0, (self.height() as i32 - 1).saturating_sub(cell.1))
    }

    /// Pull a shape endpoint into `[-w, 2w] x [-h, 2h]`. Everything that can
    /// land on the canvas stays within this margin, and the rasterizers never
    /// see spans wider than three canvases.
    fn clamp_to_margin(&self, cell: (i32, i32)) -> (i32, i32) {
        let (w, h) = (self.width() as i32, self.height() as i32);
        (cell.0.clamp(-w, 2 * w), cell.1.clamp(-h, 2 * h))
    }

    /// Read a cell in canvas space.
    pub fn pixel(&self, cell: (i32, i32), layer: Layer) -> Pixel {
        let (x, y) = self.to_grid(cell);
        self.grid.get(x, y, layer)
    }

    fn apply(&mut self, change: CellChange) {
        let batch = match change.layer {
            Layer::Committed => &mut self.pixel_batch,
            Layer::Preview => &mut self.preview_batch,
        };
        match change.pixel {
            Pixel::Color(color) => {
                batch.upsert(change.pos, color);
            }
            Pixel::Empty => batch.remove(change.pos),
        }
    }

    /// Paint one cell. Cells off the canvas are ignored.
    pub fn add_pixel(&mut self, cell: (i32, i32), color: Rgba<u8>, layer: Layer) {
        let (x, y) = self.to_grid(cell);
        if let Some(change) = self.grid.set(x, y, layer, color) {
            self.apply(change);
        }
    }

    /// Clear one committed cell. Cells off the canvas are ignored.
    pub fn delete_pixel(&mut self, cell: (i32, i32)) {
        let (x, y) = self.to_grid(cell);
        if let Some(change) = self.grid.clear(x, y, Layer::Committed) {
            self.apply(change);
        }
    }

    fn add_pixels(&mut self, cells: &[(i32, i32)], color: Rgba<u8>, layer: Layer) {
        for &cell in cells {
            self.add_pixel(cell, color, layer);
        }
    }

    pub fn draw_point(&mut self, cell: (i32, i32), color: Rgba<u8>, layer: Layer) {
        self.add_pixel(cell, color, layer);
    }

    pub fn draw_line(&mut self, from: (i32, i32), to: (i32, i32), color: Rgba<u8>, layer: Layer) {
        let (from, to) = (self.clamp_to_margin(from), self.clamp_to_margin(to));
        self.add_pixels(&bresenham_line(from, to), color, layer);
    }

    pub fn draw_rectangle(&mut self, from: (i32, i32), to: (i32, i32), color: Rgba<u8>, layer: Layer) {
        let (from, to) = (self.clamp_to_margin(from), self.clamp_to_margin(to));
        self.add_pixels(&rectangle_outline(from, to), color, layer);
    }

    pub fn draw_ellipse(&mut self, from: (i32, i32), to: (i32, i32), color: Rgba<u8>, layer: Layer) {
        let (from, to) = (self.clamp_to_margin(from), self.clamp_to_margin(to));
        self.add_pixels(&ellipse_outline(from, to), color, layer);
    }

    pub fn erase_point(&mut self, cell: (i32, i32)) {
        self.delete_pixel(cell);
    }

    pub fn erase_line(&mut self, from: (i32, i32), to: (i32, i32)) {
        let (from, to) = (self.clamp_to_margin(from), self.clamp_to_margin(to));
        for cell in bresenham_line(from, to) {
            self.delete_pixel(cell);
        }
    }

    /// Paint-bucket fill of the committed region connected to `cell`.
    /// Returns the number of cells in the region (0 when off canvas).
    pub fn fill(&mut self, cell: (i32, i32), color: Rgba<u8>) -> usize {
        if !self.contains_cell(cell) {
            return 0;
        }
        let (x, y) = self.to_grid(cell);
        let area = flood_fill(&self.grid, Layer::Committed, (x as u32, y as u32));
        for &(ax, ay) in &area {
            if let Some(change) = self.grid.set(ax as i32, ay as i32, Layer::Committed, color) {
                self.apply(change);
            }
        }
        log_info!("Fill at ({}, {}) recoloured {} cells", cell.0, cell.1, area.len());
        area.len()
    }

    /// Committed colour under `cell`; `None` for empty or off-canvas cells.
    pub fn color_pick(&self, cell: (i32, i32)) -> Option<Rgba<u8>> {
        self.pixel(cell, Layer::Committed).color()
    }

    /// Merge the preview layer into the committed layer.
    pub fn commit_preview(&mut self) {
        let changes = self.grid.commit_preview();
        for change in changes {
            self.apply(change);
        }
    }

    /// Drop the preview layer.
    pub fn discard_preview(&mut self) {
        let changes = self.grid.discard_preview();
        for change in changes {
            self.apply(change);
        }
    }

    /// Replace the committed layer wholesale (project load). `pixels` is
    /// row-major grid order; missing trailing cells are treated as empty.
    pub fn load_committed(&mut self, pixels: &[Pixel]) {
        self.discard_preview();
        let (w, h) = (self.width() as i32, self.height() as i32);
        for y in 0..h {
            for x in 0..w {
                let idx = (y * w + x) as usize;
                let change = match pixels.get(idx).copied().unwrap_or_default() {
                    Pixel::Color(c) => self.grid.set(x, y, Layer::Committed, c),
                    Pixel::Empty => self.grid.clear(x, y, Layer::Committed),
                };
                if let Some(change) = change {
                    self.apply(change);
                }
            }
        }
    }

    /// Visit every committed cell exactly once, empty cells included as
    /// `Pixel::Empty`. Cells are reported in canvas space (y-up) like every
    /// other `Canvas` method; the visiting order is top row first.
    pub fn for_each_pixel(&self, mut f: impl FnMut((u32, u32), Pixel)) {
        let (w, h) = (self.width() as usize, self.height() as usize);
        for (idx, &pixel) in self.grid.pixels(Layer::Committed).iter().enumerate() {
            f(((idx % w) as u32, (h - 1 - idx / w) as u32), pixel);
        }
    }
}
