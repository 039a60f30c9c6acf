use image::Rgba;

use crate::camera::{Camera, CanvasBounds, ZoomDirection};
use crate::canvas::{Canvas, Pixel};
use crate::components::colors::{ColorsPanel, Palette};
use crate::components::tools::{PointerButton, Tool, ToolsPanel};
use crate::log_info;
use crate::settings::EditorSettings;

// ============================================================================
// EDITOR: pointer-event facade over camera, canvas, tools and colours
// ============================================================================

/// One open drawing. The windowing layer forwards raw device-space events
/// here; everything below runs synchronously inside the call.
pub struct Editor {
    camera: Camera,
    canvas: Canvas,
    tools: ToolsPanel,
    colors: ColorsPanel,
    /// Last device position reported by a pointer event.
    hover: Option<(f64, f64)>,
}

impl Editor {
    pub fn new(settings: &EditorSettings) -> Self {
        Self::with_palette(settings, Palette::default())
    }

    pub fn with_palette(settings: &EditorSettings, palette: Palette) -> Self {
        let bounds = CanvasBounds::centered(
            settings.window_width as f64,
            settings.window_height as f64,
            settings.canvas_width,
            settings.canvas_height,
        );
        let canvas = Canvas::new(
            settings.canvas_width,
            settings.canvas_height,
            [bounds.origin.0 as f32, bounds.origin.1 as f32],
        );
        let camera = Camera::new(settings.window_width, settings.window_height, bounds, settings.zoom);
        let colors = ColorsPanel {
            primary_color: settings.primary_color,
            secondary_color: settings.secondary_color,
            palette,
        };
        log_info!(
            "Editor created: {}, window {}x{}",
            canvas.size_label(),
            settings.window_width,
            settings.window_height
        );
        Self {
            camera,
            canvas,
            tools: ToolsPanel::default(),
            colors,
            hover: None,
        }
    }

    // ---- accessors ----------------------------------------------------------

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn colors(&self) -> &ColorsPanel {
        &self.colors
    }

    pub fn colors_mut(&mut self) -> &mut ColorsPanel {
        &mut self.colors
    }

    pub fn current_primary_color(&self) -> Rgba<u8> {
        self.colors.primary_color
    }

    pub fn current_secondary_color(&self) -> Rgba<u8> {
        self.colors.secondary_color
    }

    pub fn active_tool(&self) -> Tool {
        self.tools.active_tool
    }

    pub fn set_active_tool(&mut self, tool: Tool) {
        self.tools.set_tool(tool);
    }

    /// Assign palette entry `index` to the slot for `button`.
    pub fn select_swatch(&mut self, index: usize, button: PointerButton) -> bool {
        self.colors.select_swatch(index, button)
    }

    /// Committed-layer snapshot for export; see [`Canvas::for_each_pixel`].
    pub fn for_each_pixel(&self, f: impl FnMut((u32, u32), Pixel)) {
        self.canvas.for_each_pixel(f);
    }

    // ---- pointer events -----------------------------------------------------

    pub fn on_pointer_down(&mut self, x: f64, y: f64, button: PointerButton) {
        self.hover = Some((x, y));
        let cell = self.camera.device_to_cell(x, y);
        self.tools.on_press(&mut self.canvas, &mut self.colors, cell, button);
    }

    pub fn on_pointer_drag(&mut self, x: f64, y: f64, button: PointerButton) {
        self.hover = Some((x, y));
        let cell = self.camera.device_to_cell(x, y);
        self.tools.on_drag(&mut self.canvas, &self.colors, cell, button);
    }

    pub fn on_pointer_up(&mut self, button: PointerButton) {
        self.tools.on_release(&mut self.canvas, button);
    }

    /// Hover without a button held; only moves the cursor.
    pub fn on_pointer_move(&mut self, x: f64, y: f64) {
        self.hover = Some((x, y));
    }

    pub fn on_pointer_leave(&mut self) {
        self.hover = None;
    }

    /// Wheel step at device `(x, y)`. Returns whether the zoom changed.
    pub fn on_scroll(&mut self, x: f64, y: f64, delta: f64) -> bool {
        match ZoomDirection::from_scroll(delta) {
            Some(direction) => self.camera.zoom((x, y), direction),
            None => false,
        }
    }

    pub fn on_resize(&mut self, width: u32, height: u32) {
        self.camera.resize(width, height);
    }

    /// Drag the view by a device-space delta. Returns `false` when refused.
    pub fn pan(&mut self, dx: f64, dy: f64) -> bool {
        self.camera.pan(dx, dy)
    }

    // ---- cursor / status ----------------------------------------------------

    /// Canvas cell under the pointer, if the pointer is over the canvas.
    pub fn cursor_cell(&self) -> Option<(i32, i32)> {
        let (x, y) = self.hover?;
        let cell = self.camera.device_to_cell(x, y);
        self.canvas.contains_cell(cell).then_some(cell)
    }

    /// World-space bottom-left corner of the cursor square.
    pub fn cursor_world(&self) -> Option<(f64, f64)> {
        self.cursor_cell().map(|cell| self.camera.cell_to_world(cell))
    }

    /// Status-bar text, e.g. `"64 x 64 px | 125% | Pencil"`.
    pub fn status_line(&self) -> String {
        format!(
            "{} | {}% | {}",
            self.canvas.size_label(),
            self.camera.zoom_percent(),
            self.tools.active_tool.label()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Layer;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

    /// 4x4 canvas in a 100x100 window: canvas origin at world (48, 48).
    fn editor() -> Editor {
        let settings = EditorSettings {
            canvas_width: 4,
            canvas_height: 4,
            window_width: 100,
            window_height: 100,
            primary_color: RED,
            ..EditorSettings::default()
        };
        Editor::new(&settings)
    }

    #[test]
    fn test_settings_seed_colors() {
        let ed = editor();
        assert_eq!(ed.current_primary_color(), RED);
        assert_eq!(ed.current_secondary_color(), Rgba([255, 0, 0, 255]));
        assert_eq!(ed.canvas().origin(), [48.0, 48.0]);
        assert_eq!(ed.active_tool(), Tool::Pencil);
    }

    #[test]
    fn test_pointer_routes_through_camera() {
        let mut ed = editor();
        ed.on_pointer_down(48.5, 48.5, PointerButton::Left);
        ed.on_pointer_drag(51.5, 51.5, PointerButton::Left);
        ed.on_pointer_up(PointerButton::Left);
        for i in 0..4 {
            assert_eq!(ed.canvas().pixel((i, i), Layer::Committed), Pixel::Color(RED));
        }
        assert_eq!(ed.canvas().batch(Layer::Committed).len(), 4);
    }

    #[test]
    fn test_cursor_cell() {
        let mut ed = editor();
        assert_eq!(ed.cursor_cell(), None);
        ed.on_pointer_move(50.2, 49.9);
        assert_eq!(ed.cursor_cell(), Some((2, 1)));
        assert_eq!(ed.cursor_world(), Some((50.0, 49.0)));
        ed.on_pointer_move(10.0, 10.0);
        assert_eq!(ed.cursor_cell(), None);
        ed.on_pointer_move(50.2, 49.9);
        ed.on_pointer_leave();
        assert_eq!(ed.cursor_cell(), None);
    }

    #[test]
    fn test_scroll_zooms() {
        let mut ed = editor();
        assert!(!ed.on_scroll(50.0, 50.0, 0.0));
        assert!(ed.on_scroll(50.0, 50.0, 1.0));
        assert_eq!(ed.camera().zoom_percent(), 125);
        assert_eq!(ed.status_line(), "4 x 4 px | 125% | Pencil");
    }

    #[test]
    fn test_swatch_selection() {
        let mut ed = editor();
        assert!(ed.select_swatch(0, PointerButton::Left));
        assert_eq!(ed.current_primary_color(), Rgba([0, 0, 0, 255]));
        assert!(!ed.select_swatch(1000, PointerButton::Right));
    }
}
