use crate::canvas::{Canvas, Layer};
use crate::components::colors::ColorsPanel;
use crate::log_info;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Tool {
    #[default]
    Pencil,
    Eraser,
    ColorPicker,
    Line,
    Rectangle,
    Ellipse,
    Fill,
}

impl Tool {
    pub fn all() -> &'static [Tool] {
        &[
            Tool::Pencil,
            Tool::Eraser,
            Tool::ColorPicker,
            Tool::Line,
            Tool::Rectangle,
            Tool::Ellipse,
            Tool::Fill,
        ]
    }

    /// Stable identifier used in settings, scripts and the CLI.
    pub fn name(&self) -> &'static str {
        match self {
            Tool::Pencil => "pencil",
            Tool::Eraser => "eraser",
            Tool::ColorPicker => "dropper",
            Tool::Line => "line",
            Tool::Rectangle => "rectangle",
            Tool::Ellipse => "ellipse",
            Tool::Fill => "fill",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tool::Pencil => "Pencil",
            Tool::Eraser => "Eraser",
            Tool::ColorPicker => "Color Picker",
            Tool::Line => "Line",
            Tool::Rectangle => "Rectangle",
            Tool::Ellipse => "Ellipse",
            Tool::Fill => "Fill",
        }
    }

    pub fn from_name(name: &str) -> Option<Tool> {
        let name = name.trim().to_ascii_lowercase();
        match name.as_str() {
            "picker" | "colorpicker" | "color_picker" => Some(Tool::ColorPicker),
            "rect" => Some(Tool::Rectangle),
            "bucket" => Some(Tool::Fill),
            _ => Tool::all().iter().copied().find(|t| t.name() == name),
        }
    }

    /// Tools that draw a rubber-band preview and commit on release.
    pub fn is_shape(&self) -> bool {
        matches!(self, Tool::Line | Tool::Rectangle | Tool::Ellipse)
    }
}

/// Pointer button driving a stroke. Left paints with the primary colour,
/// right with the secondary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Left,
    Right,
}

impl PointerButton {
    pub fn from_name(name: &str) -> Option<PointerButton> {
        match name.trim().to_ascii_lowercase().as_str() {
            "left" | "l" | "primary" => Some(PointerButton::Left),
            "right" | "r" | "secondary" => Some(PointerButton::Right),
            _ => None,
        }
    }
}

/// One press-to-release interaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Stroke {
    button: PointerButton,
    /// Cell where the press landed (shape anchor).
    start: (i32, i32),
    /// Most recent cell seen by the stroke.
    last: (i32, i32),
}

/// Active tool plus the in-flight stroke, translating pointer events on canvas
/// cells into canvas edits.
#[derive(Debug, Default)]
pub struct ToolsPanel {
    pub active_tool: Tool,
    stroke: Option<Stroke>,
}

impl ToolsPanel {
    pub fn set_tool(&mut self, tool: Tool) {
        if self.active_tool != tool {
            log_info!("Tool switched: {} -> {}", self.active_tool.name(), tool.name());
        }
        self.active_tool = tool;
    }

    pub fn is_stroking(&self) -> bool {
        self.stroke.is_some()
    }

    /// Pointer pressed over `cell`. Cells off the canvas still start a
    /// stroke; their edits are clipped by the canvas.
    pub fn on_press(
        &mut self,
        canvas: &mut Canvas,
        colors: &mut ColorsPanel,
        cell: (i32, i32),
        button: PointerButton,
    ) {
        let color = colors.color_for(button);
        self.stroke = Some(Stroke { button, start: cell, last: cell });

        match self.active_tool {
            Tool::Pencil => canvas.draw_point(cell, color, Layer::Committed),
            Tool::Eraser => {
                if button == PointerButton::Left {
                    canvas.erase_point(cell);
                }
            }
            Tool::Line | Tool::Rectangle | Tool::Ellipse => {
                // A new drag replaces any shape still hanging in the preview.
                canvas.discard_preview();
                canvas.draw_point(cell, color, Layer::Preview);
            }
            Tool::Fill => {
                canvas.fill(cell, color);
            }
            Tool::ColorPicker => {
                if let Some(picked) = canvas.color_pick(cell) {
                    colors.set_color(button, picked);
                }
            }
        }
    }

    /// Pointer dragged to `cell` with `button` held. Drags without a
    /// matching press are ignored.
    pub fn on_drag(
        &mut self,
        canvas: &mut Canvas,
        colors: &ColorsPanel,
        cell: (i32, i32),
        button: PointerButton,
    ) {
        let Some(stroke) = self.stroke.as_mut() else { return };
        if stroke.button != button || stroke.last == cell {
            return;
        }
        let color = colors.color_for(button);

        match self.active_tool {
            Tool::Pencil => canvas.draw_line(stroke.last, cell, color, Layer::Committed),
            Tool::Eraser => {
                if button == PointerButton::Left {
                    canvas.erase_line(stroke.last, cell);
                }
            }
            Tool::Line => {
                canvas.discard_preview();
                canvas.draw_line(stroke.start, cell, color, Layer::Preview);
            }
            Tool::Rectangle => {
                canvas.discard_preview();
                canvas.draw_rectangle(stroke.start, cell, color, Layer::Preview);
            }
            Tool::Ellipse => {
                canvas.discard_preview();
                canvas.draw_ellipse(stroke.start, cell, color, Layer::Preview);
            }
            Tool::Fill | Tool::ColorPicker => {}
        }
        stroke.last = cell;
    }

    /// Pointer released: the stroke ends and any preview is committed.
    pub fn on_release(&mut self, canvas: &mut Canvas, button: PointerButton) {
        match self.stroke {
            Some(stroke) if stroke.button != button => return,
            _ => {}
        }
        self.stroke = None;
        if !canvas.grid().preview_is_empty() {
            canvas.commit_preview();
            log_info!("Committed {} preview", self.active_tool.name());
        }
    }
}
