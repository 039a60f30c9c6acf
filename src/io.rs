use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder, Rgba, RgbaImage};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::canvas::{Canvas, Layer, MAX_CANVAS_DIM, Pixel};
use crate::components::colors::Palette;
use crate::error::PixelFeError;
use crate::log_info;

// ============================================================================
// PNG EXPORT
// ============================================================================

/// Flatten the committed layer into an image, row 0 at the top. Empty cells
/// become fully transparent black.
pub fn flatten_committed(canvas: &Canvas) -> RgbaImage {
    let (w, h) = (canvas.width(), canvas.height());
    let stride = w as usize * 4;
    let pixels = canvas.grid().pixels(Layer::Committed);
    let mut raw = vec![0u8; stride * h as usize];

    raw.par_chunks_mut(stride).enumerate().for_each(|(y, row_out)| {
        let row_in = &pixels[y * w as usize..(y + 1) * w as usize];
        for (out, pixel) in row_out.chunks_exact_mut(4).zip(row_in) {
            let Rgba(c) = pixel.color().unwrap_or(Rgba([0, 0, 0, 0]));
            out.copy_from_slice(&c);
        }
    });

    // The buffer length always matches w*h*4.
    RgbaImage::from_raw(w, h, raw).unwrap_or_else(|| RgbaImage::new(w, h))
}

/// Encode the committed layer as PNG at `path`.
pub fn export_png(canvas: &Canvas, path: &Path) -> Result<(), PixelFeError> {
    let image = flatten_committed(canvas);
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    let encoder = PngEncoder::new(&mut writer);
    encoder.write_image(image.as_raw(), image.width(), image.height(), ColorType::Rgba8)?;
    log_info!("Exported {} to {}", canvas.size_label(), path.display());
    Ok(())
}

/// First unused name in `dir` out of `image.png`, `image1.png`, `image2.png`, ...
pub fn next_export_path(dir: &Path) -> PathBuf {
    let first = dir.join("image.png");
    if !first.exists() {
        return first;
    }
    (1u32..)
        .map(|n| dir.join(format!("image{}.png", n)))
        .find(|p| !p.exists())
        .unwrap_or(first)
}

// ============================================================================
// PALETTE FILES
// ============================================================================

pub fn load_palette(path: &Path) -> Result<Palette, PixelFeError> {
    let text = std::fs::read_to_string(path)?;
    let palette = Palette::parse_hex(&text)?;
    log_info!("Loaded palette {} ({} colours)", path.display(), palette.len());
    Ok(palette)
}

// ============================================================================
// PROJECT FILES (.pxf)
// ============================================================================

const PXF_MAGIC: &str = "PXF1";

/// Serializable committed layer, grid order (row 0 at the top).
#[derive(Serialize, Deserialize)]
struct ProjectFile {
    magic: String,
    width: u32,
    height: u32,
    pixels: Vec<Option<[u8; 4]>>,
}

/// Decoded project contents, ready for [`Canvas::load_committed`].
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectData {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Pixel>,
}

pub fn save_project(canvas: &Canvas, path: &Path) -> Result<(), PixelFeError> {
    let mut pixels = Vec::with_capacity(canvas.width() as usize * canvas.height() as usize);
    canvas.for_each_pixel(|_, pixel| pixels.push(pixel.color().map(|c| c.0)));
    let project = ProjectFile {
        magic: PXF_MAGIC.to_string(),
        width: canvas.width(),
        height: canvas.height(),
        pixels,
    };

    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    bincode::serialize_into(writer, &project)?;
    log_info!("Saved project {} ({})", path.display(), canvas.size_label());
    Ok(())
}

pub fn load_project(path: &Path) -> Result<ProjectData, PixelFeError> {
    let raw = std::fs::read(path)?;
    let project: ProjectFile = bincode::deserialize(&raw)?;

    if project.magic != PXF_MAGIC {
        return Err(PixelFeError::InvalidFormat(format!(
            "Unknown magic '{}'",
            project.magic
        )));
    }
    if project.width == 0
        || project.height == 0
        || project.width > MAX_CANVAS_DIM
        || project.height > MAX_CANVAS_DIM
    {
        return Err(PixelFeError::InvalidFormat(format!(
            "Canvas size {}x{} out of range",
            project.width, project.height
        )));
    }
    let expected = project.width as usize * project.height as usize;
    if project.pixels.len() != expected {
        return Err(PixelFeError::InvalidFormat(format!(
            "Expected {} cells, found {}",
            expected,
            project.pixels.len()
        )));
    }

    log_info!("Loaded project {} ({}x{})", path.display(), project.width, project.height);
    Ok(ProjectData {
        width: project.width,
        height: project.height,
        pixels: project
            .pixels
            .into_iter()
            .map(|c| c.map_or(Pixel::Empty, |c| Pixel::Color(Rgba(c))))
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("pixelfe_{}_{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_flatten_orientation() {
        let mut canvas = Canvas::new(3, 2, [0.0, 0.0]);
        // Bottom-left canvas cell lands on the last image row.
        canvas.add_pixel((0, 0), RED, Layer::Committed);
        canvas.add_pixel((2, 1), RED, Layer::Preview);
        let img = flatten_committed(&canvas);
        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(*img.get_pixel(0, 1), RED);
        assert_eq!(*img.get_pixel(0, 0), Rgba([0, 0, 0, 0]));
        // Preview is not exported.
        assert_eq!(*img.get_pixel(2, 0), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn test_export_png_round_trip() {
        let dir = scratch_dir("export");
        let mut canvas = Canvas::new(4, 4, [0.0, 0.0]);
        canvas.draw_line((0, 0), (3, 3), RED, Layer::Committed);
        let path = next_export_path(&dir);
        assert_eq!(path.file_name().unwrap(), "image.png");
        export_png(&canvas, &path).unwrap();

        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!(*img.get_pixel(0, 3), RED);
        assert_eq!(*img.get_pixel(3, 0), RED);
        assert_eq!(img.pixels().filter(|p| p[3] != 0).count(), 4);

        assert_eq!(next_export_path(&dir).file_name().unwrap(), "image1.png");
        std::fs::write(dir.join("image1.png"), b"").unwrap();
        assert_eq!(next_export_path(&dir).file_name().unwrap(), "image2.png");
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_project_round_trip() {
        let dir = scratch_dir("project");
        let path = dir.join("drawing.pxf");
        let mut canvas = Canvas::new(5, 3, [0.0, 0.0]);
        canvas.draw_rectangle((0, 0), (4, 2), RED, Layer::Committed);
        save_project(&canvas, &path).unwrap();

        let data = load_project(&path).unwrap();
        assert_eq!((data.width, data.height), (5, 3));
        let mut restored = Canvas::new(data.width, data.height, [0.0, 0.0]);
        restored.load_committed(&data.pixels);
        assert_eq!(
            restored.grid().pixels(Layer::Committed),
            canvas.grid().pixels(Layer::Committed)
        );
        assert_eq!(restored.batch(Layer::Committed).len(), 12);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_project_rejects_bad_files() {
        let dir = scratch_dir("badproject");
        let path = dir.join("bad.pxf");

        let wrong_magic = ProjectFile {
            magic: "NOPE".into(),
            width: 1,
            height: 1,
            pixels: vec![None],
        };
        std::fs::write(&path, bincode::serialize(&wrong_magic).unwrap()).unwrap();
        assert!(matches!(load_project(&path), Err(PixelFeError::InvalidFormat(_))));

        let short = ProjectFile {
            magic: PXF_MAGIC.into(),
            width: 2,
            height: 2,
            pixels: vec![None],
        };
        std::fs::write(&path, bincode::serialize(&short).unwrap()).unwrap();
        assert!(matches!(load_project(&path), Err(PixelFeError::InvalidFormat(_))));

        std::fs::write(&path, b"xx").unwrap();
        assert!(matches!(load_project(&path), Err(PixelFeError::Serialize(_))));

        assert!(matches!(
            load_project(&dir.join("missing.pxf")),
            Err(PixelFeError::Io(_))
        ));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_load_palette_file() {
        let dir = scratch_dir("palette");
        let path = dir.join("mini.hex");
        std::fs::write(&path, "ff0000\n00ff00\n").unwrap();
        let palette = load_palette(&path).unwrap();
        assert_eq!(palette.len(), 2);
        assert_eq!(palette.get(0), Some(RED));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
