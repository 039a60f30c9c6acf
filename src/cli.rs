// ============================================================================
// PixelFE CLI: headless replay of pointer-event scripts
// ============================================================================
//
// Usage examples:
//   pixelfe --replay strokes.txt --output drawing.png
//   pixelfe --replay strokes.txt --width 16 --height 16 --palette db32.hex
//   pixelfe --replay touchup.txt --project drawing.pxf --output fixed.png
//
// Script format, one event per line (`#` starts a comment):
//   tool rectangle
//   color primary 255,0,0,255
//   palette secondary 3
//   down 640 360 left
//   drag 650 370 left
//   up left
//   scroll 640 360 -1
//   resize 1024 768
//   pan 10 -5
//   save drawing.pxf
//
// Coordinates are device pixels (origin bottom-left), exactly as a window
// would report them.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use image::Rgba;

use crate::app::Editor;
use crate::canvas::MAX_CANVAS_DIM;
use crate::components::colors::{Palette, parse_rgba};
use crate::components::tools::{PointerButton, Tool};
use crate::error::PixelFeError;
use crate::io::{export_png, load_palette, load_project, next_export_path, save_project};
use crate::settings::EditorSettings;
use crate::{log_err, log_info};

// ============================================================================
// CLI argument definition (clap Derive)
// ============================================================================

/// PixelFE headless pixel-art renderer.
///
/// Replays recorded pointer events against a blank (or loaded) canvas and
/// exports the result as PNG.
#[derive(Parser, Debug)]
#[command(
    name = "pixelfe",
    about = "PixelFE headless pointer-event replay",
    long_about = "Replay a pointer-event script against a canvas and export the\n\
                  committed drawing as PNG.\n\n\
                  Example:\n  \
                  pixelfe --replay strokes.txt --output drawing.png"
)]
pub struct CliArgs {
    /// Event script to replay.
    #[arg(short, long, value_name = "SCRIPT")]
    pub replay: PathBuf,

    /// Output PNG path. Defaults to the next free image{n}.png in the
    /// current directory.
    #[arg(short, long, value_name = "FILE.png")]
    pub output: Option<PathBuf>,

    /// Settings file (key=value). Defaults to the platform config location.
    #[arg(short, long, value_name = "FILE")]
    pub settings: Option<PathBuf>,

    /// `.hex` palette file; overrides the settings' palette_path.
    #[arg(short, long, value_name = "FILE.hex")]
    pub palette: Option<PathBuf>,

    /// Canvas width in cells (1-4096); overrides settings.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=MAX_CANVAS_DIM as i64))]
    pub width: Option<u32>,

    /// Canvas height in cells (1-4096); overrides settings.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=MAX_CANVAS_DIM as i64))]
    pub height: Option<u32>,

    /// Start from a saved `.pxf` project instead of a blank canvas. The
    /// canvas takes the project's size.
    #[arg(long, value_name = "FILE.pxf")]
    pub project: Option<PathBuf>,

    /// Print each event and timing information.
    #[arg(short, long)]
    pub verbose: bool,
}

// ============================================================================
// Script events
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub enum ScriptEvent {
    Tool(Tool),
    Color(PointerButton, Rgba<u8>),
    Palette(PointerButton, usize),
    Down(f64, f64, PointerButton),
    Drag(f64, f64, PointerButton),
    Up(PointerButton),
    Scroll(f64, f64, f64),
    Resize(u32, u32),
    Pan(f64, f64),
    Save(PathBuf),
}

/// Parse a whole script. Errors carry the 1-based line number.
pub fn parse_script(text: &str) -> Result<Vec<ScriptEvent>, PixelFeError> {
    let mut events = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        let event = parse_line(line).map_err(|message| PixelFeError::InvalidScript {
            line: idx + 1,
            message,
        })?;
        events.push(event);
    }
    Ok(events)
}

fn parse_line(line: &str) -> Result<ScriptEvent, String> {
    let mut words = line.split_whitespace();
    let verb = words.next().unwrap_or("");
    let args: Vec<&str> = words.collect();

    let expect = |n: usize| -> Result<(), String> {
        if args.len() == n {
            Ok(())
        } else {
            Err(format!("'{}' takes {} argument(s), got {}", verb, n, args.len()))
        }
    };

    match verb {
        "tool" => {
            expect(1)?;
            Tool::from_name(args[0])
                .map(ScriptEvent::Tool)
                .ok_or_else(|| format!("unknown tool '{}'", args[0]))
        }
        "color" => {
            expect(2)?;
            let slot = parse_button(args[0])?;
            let color = parse_rgba(args[1]).ok_or_else(|| format!("bad colour '{}'", args[1]))?;
            Ok(ScriptEvent::Color(slot, color))
        }
        "palette" => {
            expect(2)?;
            Ok(ScriptEvent::Palette(parse_button(args[0])?, parse_num(args[1])?))
        }
        "down" | "drag" => {
            expect(3)?;
            let (x, y) = (parse_num(args[0])?, parse_num(args[1])?);
            let button = parse_button(args[2])?;
            Ok(if verb == "down" {
                ScriptEvent::Down(x, y, button)
            } else {
                ScriptEvent::Drag(x, y, button)
            })
        }
        "up" => {
            expect(1)?;
            Ok(ScriptEvent::Up(parse_button(args[0])?))
        }
        "scroll" => {
            expect(3)?;
            Ok(ScriptEvent::Scroll(parse_num(args[0])?, parse_num(args[1])?, parse_num(args[2])?))
        }
        "resize" => {
            expect(2)?;
            Ok(ScriptEvent::Resize(parse_num(args[0])?, parse_num(args[1])?))
        }
        "pan" => {
            expect(2)?;
            Ok(ScriptEvent::Pan(parse_num(args[0])?, parse_num(args[1])?))
        }
        "save" => {
            expect(1)?;
            Ok(ScriptEvent::Save(PathBuf::from(args[0])))
        }
        other => Err(format!("unknown event '{}'", other)),
    }
}

fn parse_button(word: &str) -> Result<PointerButton, String> {
    PointerButton::from_name(word).ok_or_else(|| format!("unknown button '{}'", word))
}

fn parse_num<T: std::str::FromStr>(word: &str) -> Result<T, String> {
    word.parse::<T>().map_err(|_| format!("bad number '{}'", word))
}

/// Feed one event to the editor.
pub fn apply_event(editor: &mut Editor, event: &ScriptEvent) -> Result<(), PixelFeError> {
    match event {
        ScriptEvent::Tool(tool) => editor.set_active_tool(*tool),
        ScriptEvent::Color(button, color) => editor.colors_mut().set_color(*button, *color),
        ScriptEvent::Palette(button, index) => {
            if !editor.select_swatch(*index, *button) {
                log_info!("Palette index {} out of range, ignored", index);
            }
        }
        ScriptEvent::Down(x, y, button) => editor.on_pointer_down(*x, *y, *button),
        ScriptEvent::Drag(x, y, button) => editor.on_pointer_drag(*x, *y, *button),
        ScriptEvent::Up(button) => editor.on_pointer_up(*button),
        ScriptEvent::Scroll(x, y, delta) => {
            editor.on_scroll(*x, *y, *delta);
        }
        ScriptEvent::Resize(w, h) => editor.on_resize(*w, *h),
        ScriptEvent::Pan(dx, dy) => {
            editor.pan(*dx, *dy);
        }
        ScriptEvent::Save(path) => save_project(editor.canvas(), path)?,
    }
    Ok(())
}

// ============================================================================
// Public entry point
// ============================================================================

/// Build the editor described by `args`, replay the script and export.
/// `0` = success, `1` = any failure (reported on stderr).
pub fn run(args: CliArgs) -> ExitCode {
    crate::logger::set_echo(args.verbose);
    match run_inner(&args) {
        Ok(path) => {
            println!("{}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            log_err!("CLI failed: {}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_inner(args: &CliArgs) -> Result<PathBuf, PixelFeError> {
    let started = Instant::now();

    let mut settings = match &args.settings {
        Some(path) => EditorSettings::load_from(path),
        None => EditorSettings::load(),
    };
    if let Some(w) = args.width {
        settings.canvas_width = w.clamp(1, MAX_CANVAS_DIM);
    }
    if let Some(h) = args.height {
        settings.canvas_height = h.clamp(1, MAX_CANVAS_DIM);
    }

    let project = args.project.as_deref().map(load_project).transpose()?;
    if let Some(data) = &project {
        settings.canvas_width = data.width;
        settings.canvas_height = data.height;
    }

    let palette = match args.palette.as_ref().or(settings.palette_path.as_ref()) {
        Some(path) => load_palette(path)?,
        None => Palette::default(),
    };

    let mut editor = Editor::with_palette(&settings, palette);
    if let Some(data) = &project {
        editor.canvas_mut().load_committed(&data.pixels);
    }

    let script = std::fs::read_to_string(&args.replay)?;
    let events = parse_script(&script)?;
    for event in &events {
        if args.verbose {
            println!("  {:?}", event);
        }
        apply_event(&mut editor, event)?;
    }

    let output = match &args.output {
        Some(path) => path.clone(),
        None => next_export_path(Path::new(".")),
    };
    export_png(editor.canvas(), &output)?;

    if args.verbose {
        println!(
            "{} events, {} in {:.1} ms",
            events.len(),
            editor.status_line(),
            started.elapsed().as_secs_f64() * 1000.0
        );
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{Layer, Pixel};

    #[test]
    fn test_parse_script() {
        let events = parse_script(
            "# rectangle then a dot\n\
             tool rect\n\
             color secondary 0,0,255,255\n\
             \n\
             down 10 20 left   # press\n\
             drag 12.5 22 left\n\
             up left\n\
             palette right 3\n\
             scroll 5 5 -1\n\
             resize 800 600\n\
             pan -4 2\n\
             save out.pxf\n",
        )
        .unwrap();
        assert_eq!(
            events,
            vec![
                ScriptEvent::Tool(Tool::Rectangle),
                ScriptEvent::Color(PointerButton::Right, Rgba([0, 0, 255, 255])),
                ScriptEvent::Down(10.0, 20.0, PointerButton::Left),
                ScriptEvent::Drag(12.5, 22.0, PointerButton::Left),
                ScriptEvent::Up(PointerButton::Left),
                ScriptEvent::Palette(PointerButton::Right, 3),
                ScriptEvent::Scroll(5.0, 5.0, -1.0),
                ScriptEvent::Resize(800, 600),
                ScriptEvent::Pan(-4.0, 2.0),
                ScriptEvent::Save(PathBuf::from("out.pxf")),
            ]
        );
    }

    #[test]
    fn test_parse_errors_report_line() {
        let err = parse_script("tool pencil\n\ndown 1 2 middle\n").unwrap_err();
        assert!(matches!(err, PixelFeError::InvalidScript { line: 3, .. }));

        for bad in ["tool brush", "up", "resize -1 5", "color primary red", "wiggle 1 2"] {
            assert!(
                matches!(parse_script(bad), Err(PixelFeError::InvalidScript { line: 1, .. })),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_canvas_size_flags_are_bounded() {
        let parse = |flag: &str, val: &str| {
            CliArgs::try_parse_from(["pixelfe", "--replay", "s.txt", flag, val])
        };
        assert!(parse("--width", "4000000000").is_err());
        assert!(parse("--height", "4097").is_err());
        assert!(parse("--width", "0").is_err());
        let args = parse("--width", "4096").unwrap();
        assert_eq!(args.width, Some(MAX_CANVAS_DIM));
    }

    #[test]
    fn test_apply_events() {
        let settings = EditorSettings {
            canvas_width: 8,
            canvas_height: 8,
            window_width: 100,
            window_height: 100,
            ..EditorSettings::default()
        };
        let mut editor = Editor::new(&settings);
        // Canvas origin is world (46, 46).
        let events = parse_script(
            "tool line\n\
             color primary 9,9,9,255\n\
             down 46.5 46.5 left\n\
             drag 53.5 46.5 left\n\
             up left\n",
        )
        .unwrap();
        for event in &events {
            apply_event(&mut editor, event).unwrap();
        }
        assert_eq!(editor.active_tool(), Tool::Line);
        assert_eq!(editor.canvas().batch(Layer::Committed).len(), 8);
        assert_eq!(
            editor.canvas().pixel((7, 0), Layer::Committed),
            Pixel::Color(Rgba([9, 9, 9, 255]))
        );
    }

    #[test]
    fn test_run_end_to_end() {
        let dir = std::env::temp_dir().join(format!("pixelfe_cli_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();

        let settings_path = dir.join("settings.cfg");
        std::fs::write(&settings_path, "window_width=100\nwindow_height=100\n").unwrap();
        let script_path = dir.join("events.txt");
        let project_path = dir.join("saved.pxf");
        std::fs::write(
            &script_path,
            format!(
                "tool fill\ndown 49 49 left\nup left\nsave {}\n",
                project_path.display()
            ),
        )
        .unwrap();
        let output = dir.join("out.png");

        let args = CliArgs {
            replay: script_path,
            output: Some(output.clone()),
            settings: Some(settings_path),
            palette: None,
            width: Some(4),
            height: Some(4),
            project: None,
            verbose: false,
        };
        let path = run_inner(&args).unwrap();
        assert_eq!(path, output);

        let img = image::open(&output).unwrap().to_rgba8();
        assert_eq!(img.dimensions(), (4, 4));
        assert!(img.pixels().all(|p| *p == Rgba([0, 0, 0, 255])));

        let data = load_project(&project_path).unwrap();
        assert_eq!(data.pixels.len(), 16);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
