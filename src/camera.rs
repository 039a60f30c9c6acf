// ============================================================================
// CAMERA: device ↔ world ↔ canvas-cell transform with zoom and pan
// ============================================================================
//
// Device coordinates are window pixels with the origin at the bottom-left.
// World space is the logical window extent the canvas is centred in; the
// camera's view rectangle (left/right/bottom/top) selects which part of it
// the window shows. `zoom_level` is world units per device pixel, so 1.0 is
// 100% and the zoom percentage shown to the user is `100 / zoom_level`.

use crate::{log_info, log_warn};

/// World-space rectangle occupied by the canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasBounds {
    /// Bottom-left corner.
    pub origin: (f64, f64),
    pub width: f64,
    pub height: f64,
}

impl CanvasBounds {
    /// A `canvas_w × canvas_h` canvas centred in a `world_w × world_h` extent.
    pub fn centered(world_w: f64, world_h: f64, canvas_w: u32, canvas_h: u32) -> Self {
        let (cw, ch) = (canvas_w as f64, canvas_h as f64);
        Self {
            origin: (world_w / 2.0 - cw / 2.0, world_h / 2.0 - ch / 2.0),
            width: cw,
            height: ch,
        }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.origin.0 + self.width / 2.0, self.origin.1 + self.height / 2.0)
    }

    /// Strict containment; the canvas border itself counts as outside.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.origin.0 < x
            && x < self.origin.0 + self.width
            && self.origin.1 < y
            && y < self.origin.1 + self.height
    }
}

/// Zoom step factors and the allowed `zoom_level` range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomSettings {
    pub in_factor: f64,
    pub out_factor: f64,
    pub limit_low: f64,
    pub limit_high: f64,
}

impl ZoomSettings {
    /// Limits must be positive, finite and ordered.
    pub fn is_valid(&self) -> bool {
        self.limit_low.is_finite()
            && self.limit_high.is_finite()
            && 0.0 < self.limit_low
            && self.limit_low <= self.limit_high
    }
}

impl Default for ZoomSettings {
    fn default() -> Self {
        Self {
            in_factor: 1.25,
            out_factor: 0.8,
            limit_low: 0.02,
            limit_high: 4.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoomDirection {
    /// Multiplies `zoom_level` by `in_factor`.
    In,
    /// Multiplies `zoom_level` by `out_factor`.
    Out,
}

impl ZoomDirection {
    /// Scroll wheel mapping: negative deltas step `In`, positive step `Out`.
    pub fn from_scroll(delta: f64) -> Option<Self> {
        if delta < 0.0 {
            Some(ZoomDirection::In)
        } else if delta > 0.0 {
            Some(ZoomDirection::Out)
        } else {
            None
        }
    }
}

#[derive(Clone, Debug)]
pub struct Camera {
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub top: f64,
    pub zoom_level: f64,
    pub zoomed_width: f64,
    pub zoomed_height: f64,
    viewport_width: f64,
    viewport_height: f64,
    canvas: CanvasBounds,
    zoom: ZoomSettings,
}

impl Camera {
    /// Camera centred on world `0..viewport_w × 0..viewport_h`, at 100% when
    /// the limits allow it and at the nearest limit otherwise.
    pub fn new(viewport_w: u32, viewport_h: u32, canvas: CanvasBounds, zoom: ZoomSettings) -> Self {
        let zoom = if zoom.is_valid() {
            zoom
        } else {
            log_warn!("Invalid zoom limits {:?}, using defaults", zoom);
            ZoomSettings::default()
        };
        let (w, h) = (viewport_w.max(1) as f64, viewport_h.max(1) as f64);
        let level = 1.0_f64.clamp(zoom.limit_low, zoom.limit_high);
        let mut camera = Self {
            left: 0.0,
            right: w,
            bottom: 0.0,
            top: h,
            zoom_level: level,
            zoomed_width: w * level,
            zoomed_height: h * level,
            viewport_width: w,
            viewport_height: h,
            canvas,
            zoom,
        };
        camera.anchor_view(w / 2.0, h / 2.0, 0.5, 0.5);
        camera
    }

    pub fn canvas_bounds(&self) -> &CanvasBounds {
        &self.canvas
    }

    pub fn viewport_size(&self) -> (f64, f64) {
        (self.viewport_width, self.viewport_height)
    }

    /// Zoom as a whole percentage, rounded down.
    pub fn zoom_percent(&self) -> u32 {
        (100.0 / self.zoom_level).floor() as u32
    }

    // ---- transforms ---------------------------------------------------------

    pub fn device_to_world(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.left + (x / self.viewport_width) * self.zoomed_width,
            self.bottom + (y / self.viewport_height) * self.zoomed_height,
        )
    }

    pub fn world_to_device(&self, x: f64, y: f64) -> (f64, f64) {
        (
            (x - self.left) / self.zoomed_width * self.viewport_width,
            (y - self.bottom) / self.zoomed_height * self.viewport_height,
        )
    }

    /// World point → canvas cell (y-up). May lie outside the canvas, but is
    /// clamped to `[-w, 2w] × [-h, 2h]` so far-off (or non-finite) pointers
    /// stay cheap to rasterize.
    pub fn world_to_cell(&self, x: f64, y: f64) -> (i32, i32) {
        let (w, h) = (self.canvas.width, self.canvas.height);
        let cx = (x - self.canvas.origin.0).floor().clamp(-w, 2.0 * w);
        let cy = (y - self.canvas.origin.1).floor().clamp(-h, 2.0 * h);
        (cx as i32, cy as i32)
    }

    pub fn device_to_cell(&self, x: f64, y: f64) -> (i32, i32) {
        let (wx, wy) = self.device_to_world(x, y);
        self.world_to_cell(wx, wy)
    }

    /// Bottom-left world corner of a canvas cell, for cursor placement.
    pub fn cell_to_world(&self, cell: (i32, i32)) -> (f64, f64) {
        (
            self.canvas.origin.0 + cell.0 as f64,
            self.canvas.origin.1 + cell.1 as f64,
        )
    }

    pub fn is_on_canvas(&self, device_x: f64, device_y: f64) -> bool {
        let (wx, wy) = self.device_to_world(device_x, device_y);
        self.canvas.contains(wx, wy)
    }

    // ---- view changes -------------------------------------------------------

    /// Place the view so world `(wx, wy)` sits at viewport fraction `(fx, fy)`.
    fn anchor_view(&mut self, wx: f64, wy: f64, fx: f64, fy: f64) {
        self.left = wx - fx * self.zoomed_width;
        self.right = wx + (1.0 - fx) * self.zoomed_width;
        self.bottom = wy - fy * self.zoomed_height;
        self.top = wy + (1.0 - fy) * self.zoomed_height;
    }

    /// Drag the view by a device-space pointer delta; the content follows the
    /// pointer. Refused (returns `false`) if the canvas centre would leave
    /// the view.
    pub fn pan(&mut self, dx: f64, dy: f64) -> bool {
        let (wdx, wdy) = (dx * self.zoom_level, dy * self.zoom_level);
        let (left, right) = (self.left - wdx, self.right - wdx);
        let (bottom, top) = (self.bottom - wdy, self.top - wdy);

        let (cx, cy) = self.canvas.center();
        if !(left <= cx && cx <= right && bottom <= cy && cy <= top) {
            return false;
        }
        self.left = left;
        self.right = right;
        self.bottom = bottom;
        self.top = top;
        true
    }

    /// One zoom step around the device point `anchor`, keeping the world
    /// point under it fixed. Anchors off the canvas snap to the canvas
    /// centre. The level is clamped to the configured limits; returns
    /// `false` when already pinned at the limit.
    pub fn zoom(&mut self, anchor: (f64, f64), direction: ZoomDirection) -> bool {
        let factor = match direction {
            ZoomDirection::In => self.zoom.in_factor,
            ZoomDirection::Out => self.zoom.out_factor,
        };
        let new_level = (self.zoom_level * factor).clamp(self.zoom.limit_low, self.zoom.limit_high);
        if new_level == self.zoom_level {
            return false;
        }
        if new_level != self.zoom_level * factor {
            log_info!("Zoom clamped to {:.3}", new_level);
        }
        let applied = new_level / self.zoom_level;

        let mut fx = anchor.0 / self.viewport_width;
        let mut fy = anchor.1 / self.viewport_height;
        let (mut wx, mut wy) = self.device_to_world(anchor.0, anchor.1);

        if !self.canvas.contains(wx, wy) {
            (wx, wy) = self.canvas.center();
            fx = (wx - self.left) / self.zoomed_width;
            fy = (wy - self.bottom) / self.zoomed_height;
        }

        self.zoom_level = new_level;
        self.zoomed_width *= applied;
        self.zoomed_height *= applied;
        self.anchor_view(wx, wy, fx, fy);
        true
    }

    /// Follow a window resize, keeping the world point at the viewport
    /// centre in place. Zero-sized (minimised) windows are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        let (w, h) = (width as f64, height as f64);
        let fx = w / self.viewport_width;
        let fy = h / self.viewport_height;

        let (wx, wy) = self.device_to_world(self.viewport_width * 0.5, self.viewport_height * 0.5);

        self.zoomed_width *= fx;
        self.zoomed_height *= fy;
        self.anchor_view(wx, wy, 0.5, 0.5);

        self.viewport_width = w;
        self.viewport_height = h;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        // 32x32 canvas centred in an 800x600 world: origin (384, 284).
        let bounds = CanvasBounds::centered(800.0, 600.0, 32, 32);
        Camera::new(800, 600, bounds, ZoomSettings::default())
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_identity_transform() {
        let cam = camera();
        assert_eq!(cam.device_to_world(100.0, 50.0), (100.0, 50.0));
        assert_eq!(cam.device_to_cell(384.0, 284.0), (0, 0));
        assert_eq!(cam.device_to_cell(415.9, 315.9), (31, 31));
        assert_eq!(cam.device_to_cell(383.5, 284.0), (-1, 0));
        assert_eq!(cam.zoom_percent(), 100);
    }

    #[test]
    fn test_cell_to_world_inverts() {
        let cam = camera();
        let (wx, wy) = cam.cell_to_world((5, 7));
        assert_eq!((wx, wy), (389.0, 291.0));
        assert_eq!(cam.world_to_cell(wx + 0.5, wy + 0.5), (5, 7));
        let (dx, dy) = cam.world_to_device(wx, wy);
        assert!(approx(dx, 389.0) && approx(dy, 291.0));
    }

    #[test]
    fn test_view_extent_invariant() {
        let mut cam = camera();
        cam.zoom((400.0, 300.0), ZoomDirection::Out);
        cam.resize(1024, 300);
        cam.zoom((10.0, 10.0), ZoomDirection::In);
        cam.pan(5.0, -3.0);
        assert!(approx(cam.right - cam.left, cam.zoomed_width));
        assert!(approx(cam.top - cam.bottom, cam.zoomed_height));
    }

    #[test]
    fn test_zoom_keeps_anchor_fixed() {
        let mut cam = camera();
        let anchor = (390.0, 290.0); // on the canvas
        let before = cam.device_to_world(anchor.0, anchor.1);
        assert!(cam.zoom(anchor, ZoomDirection::Out));
        let after = cam.device_to_world(anchor.0, anchor.1);
        assert!(approx(before.0, after.0) && approx(before.1, after.1));
        assert!(approx(cam.zoom_level, 0.8));
        assert_eq!(cam.zoom_percent(), 125);
    }

    #[test]
    fn test_zoom_off_canvas_snaps_to_centre() {
        let mut cam = camera();
        let center = cam.canvas_bounds().center();
        let device_center = cam.world_to_device(center.0, center.1);
        assert!(cam.zoom((10.0, 10.0), ZoomDirection::Out));
        let still = cam.device_to_world(device_center.0, device_center.1);
        assert!(approx(still.0, center.0) && approx(still.1, center.1));

        // Same rule in the other direction.
        let mut cam = camera();
        assert!(cam.zoom((790.0, 590.0), ZoomDirection::In));
        let still = cam.device_to_world(device_center.0, device_center.1);
        assert!(approx(still.0, center.0) && approx(still.1, center.1));
    }

    #[test]
    fn test_zoom_in_pins_at_high_limit() {
        let mut cam = camera();
        for _ in 0..50 {
            cam.zoom((400.0, 300.0), ZoomDirection::In);
        }
        assert_eq!(cam.zoom_level, ZoomSettings::default().limit_high);
        assert!(!cam.zoom((400.0, 300.0), ZoomDirection::In));
        assert_eq!(cam.zoom_level, ZoomSettings::default().limit_high);
        assert!(approx(cam.zoomed_width, 800.0 * cam.zoom_level));
    }

    #[test]
    fn test_zoom_out_pins_at_low_limit() {
        let mut cam = camera();
        for _ in 0..100 {
            cam.zoom((400.0, 300.0), ZoomDirection::Out);
        }
        assert_eq!(cam.zoom_level, ZoomSettings::default().limit_low);
        assert!(approx(cam.zoomed_height, 600.0 * cam.zoom_level));
    }

    #[test]
    fn test_pan_moves_view() {
        let mut cam = camera();
        assert!(cam.pan(10.0, 20.0));
        assert_eq!((cam.left, cam.bottom), (-10.0, -20.0));
        assert_eq!(cam.device_to_world(10.0, 20.0), (0.0, 0.0));
    }

    #[test]
    fn test_pan_refuses_to_lose_canvas() {
        let mut cam = camera();
        let before = (cam.left, cam.right, cam.bottom, cam.top);
        // Canvas centre is (400, 300); dragging 500 device px right would
        // push the left edge past it.
        assert!(!cam.pan(-500.0, 0.0));
        assert_eq!(before, (cam.left, cam.right, cam.bottom, cam.top));
    }

    #[test]
    fn test_resize_preserves_centre() {
        let mut cam = camera();
        let center = cam.device_to_world(400.0, 300.0);
        cam.resize(1600, 300);
        assert_eq!(cam.viewport_size(), (1600.0, 300.0));
        let after = cam.device_to_world(800.0, 150.0);
        assert!(approx(center.0, after.0) && approx(center.1, after.1));
        assert!(approx(cam.zoomed_width, 1600.0) && approx(cam.zoomed_height, 300.0));
        // World units per device pixel are unchanged.
        assert_eq!(cam.zoom_level, 1.0);
        cam.resize(0, 10);
        assert_eq!(cam.viewport_size(), (1600.0, 300.0));
    }

    #[test]
    fn test_initial_level_respects_limits() {
        let bounds = CanvasBounds::centered(800.0, 600.0, 32, 32);
        let zoom = ZoomSettings { limit_high: 0.5, ..ZoomSettings::default() };
        let cam = Camera::new(800, 600, bounds, zoom);
        assert_eq!(cam.zoom_level, 0.5);
        assert_eq!((cam.zoomed_width, cam.zoomed_height), (400.0, 300.0));
        assert!(approx(cam.right - cam.left, cam.zoomed_width));
        // The window centre still shows the world centre.
        let centre = cam.device_to_world(400.0, 300.0);
        assert!(approx(centre.0, 400.0) && approx(centre.1, 300.0));

        let zoom = ZoomSettings { limit_low: 2.0, limit_high: 3.0, ..ZoomSettings::default() };
        let cam = Camera::new(800, 600, bounds, zoom);
        assert_eq!(cam.zoom_level, 2.0);
        assert_eq!(cam.zoom_percent(), 50);
    }

    #[test]
    fn test_invalid_limits_fall_back() {
        let bounds = CanvasBounds::centered(800.0, 600.0, 32, 32);
        let zoom = ZoomSettings { limit_low: 5.0, limit_high: 1.0, ..ZoomSettings::default() };
        let mut cam = Camera::new(800, 600, bounds, zoom);
        assert_eq!(cam.zoom_level, 1.0);
        assert!(cam.zoom((400.0, 300.0), ZoomDirection::In));
    }

    #[test]
    fn test_far_pointer_cells_are_clamped() {
        let cam = camera();
        assert_eq!(cam.device_to_cell(400.0, -1.0e12), (16, -32));
        assert_eq!(cam.device_to_cell(f64::INFINITY, f64::INFINITY), (64, 64));
        assert_eq!(cam.device_to_cell(f64::NEG_INFINITY, 300.0), (-32, 16));
    }

    #[test]
    fn test_from_scroll() {
        assert_eq!(ZoomDirection::from_scroll(-1.0), Some(ZoomDirection::In));
        assert_eq!(ZoomDirection::from_scroll(2.0), Some(ZoomDirection::Out));
        assert_eq!(ZoomDirection::from_scroll(0.0), None);
    }
}
