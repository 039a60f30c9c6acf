use image::Rgba;

use crate::components::tools::PointerButton;
use crate::error::PixelFeError;

// ============================================================================
// PALETTE
// ============================================================================

/// Built-in 16-colour palette used when no `.hex` file is configured.
const DEFAULT_PALETTE_HEX: &str = "\
000000
1D2B53
7E2553
008751
AB5236
5F574F
C2C3C7
FFF1E8
FF004D
FFA300
FFEC27
00E436
29ADFF
83769C
FF77A8
FFCCAA
";

/// Fixed, ordered list of opaque swatches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    pub colors: Vec<Rgba<u8>>,
}

impl Default for Palette {
    fn default() -> Self {
        // The embedded table is well-formed; fall back to black just in case.
        Self::parse_hex(DEFAULT_PALETTE_HEX)
            .unwrap_or_else(|_| Self { colors: vec![Rgba([0, 0, 0, 255])] })
    }
}

impl Palette {
    /// Parse `.hex` palette text: one `RRGGBB` per line, optional leading
    /// `#`, blank lines skipped. Every entry is fully opaque.
    pub fn parse_hex(text: &str) -> Result<Self, PixelFeError> {
        let mut colors = Vec::new();
        for (line_no, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let hex = line.strip_prefix('#').unwrap_or(line);
            let parsed = (hex.len() == 6 && hex.bytes().all(|b| b.is_ascii_hexdigit()))
                .then(|| u32::from_str_radix(hex, 16).ok())
                .flatten();
            let Some(val) = parsed else {
                return Err(PixelFeError::InvalidPalette(format!(
                    "line {}: expected RRGGBB, got '{}'",
                    line_no + 1,
                    line
                )));
            };
            colors.push(Rgba([(val >> 16) as u8, (val >> 8) as u8, val as u8, 255]));
        }
        if colors.is_empty() {
            return Err(PixelFeError::InvalidPalette("no colours found".into()));
        }
        Ok(Self { colors })
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Rgba<u8>> {
        self.colors.get(index).copied()
    }
}

// ============================================================================
// COLOR SLOTS
// ============================================================================

/// Primary / secondary colour selection plus the swatch palette.
#[derive(Clone, Debug)]
pub struct ColorsPanel {
    pub primary_color: Rgba<u8>,
    pub secondary_color: Rgba<u8>,
    pub palette: Palette,
}

impl Default for ColorsPanel {
    fn default() -> Self {
        Self {
            primary_color: Rgba([0, 0, 0, 255]),
            secondary_color: Rgba([255, 0, 0, 255]),
            palette: Palette::default(),
        }
    }
}

impl ColorsPanel {
    pub fn color_for(&self, button: PointerButton) -> Rgba<u8> {
        match button {
            PointerButton::Left => self.primary_color,
            PointerButton::Right => self.secondary_color,
        }
    }

    pub fn set_color(&mut self, button: PointerButton, color: Rgba<u8>) {
        match button {
            PointerButton::Left => self.primary_color = color,
            PointerButton::Right => self.secondary_color = color,
        }
    }

    /// Assign palette entry `index` to the slot for `button`. Returns
    /// `false` (and changes nothing) for an index past the palette end.
    pub fn select_swatch(&mut self, index: usize, button: PointerButton) -> bool {
        match self.palette.get(index) {
            Some(color) => {
                self.set_color(button, color);
                true
            }
            None => false,
        }
    }

    pub fn swap(&mut self) {
        std::mem::swap(&mut self.primary_color, &mut self.secondary_color);
    }
}

/// Parse `"r,g,b,a"` (as written by the settings file).
pub fn parse_rgba(s: &str) -> Option<Rgba<u8>> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 4 {
        return None;
    }
    let r = parts[0].trim().parse::<u8>().ok()?;
    let g = parts[1].trim().parse::<u8>().ok()?;
    let b = parts[2].trim().parse::<u8>().ok()?;
    let a = parts[3].trim().parse::<u8>().ok()?;
    Some(Rgba([r, g, b, a]))
}

pub fn format_rgba(c: Rgba<u8>) -> String {
    format!("{},{},{},{}", c[0], c[1], c[2], c[3])
}
