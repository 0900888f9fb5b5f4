//! scene-editor - drive the scene editor without a window.
//!
//! Builds the demo scene, replays pointer input given on the command line and
//! prints what the editor would show.

use anyhow::{Context, Result};
use canvas::{DrawCommand, HeadlessRenderer, Mesh};
use clap::{Parser, Subcommand};
use editor::{demo, log_section, ButtonAction, Editor, EditorConfig, EditorLogger, MouseButton};
use glam::Vec2;
use std::path::PathBuf;

/// Headless driver for the scene graph editor
#[derive(Parser)]
#[command(name = "scene-editor")]
#[command(about = "Inspect and manipulate the demo scene from the command line")]
struct Cli {
    /// JSON config file (defaults are used for missing fields)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level override: off, error, warn, info, debug, trace
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the scene hierarchy
    Tree,

    /// Hit-test a point given in scene units
    Hit {
        #[arg(allow_negative_numbers = true)]
        x: f32,
        #[arg(allow_negative_numbers = true)]
        y: f32,
    },

    /// Click at a window pixel and report the selection
    Click { x: f32, y: f32 },

    /// Drag between two window pixels and print the resulting hierarchy
    Drag {
        /// Start pixel as `x,y`
        #[arg(long, value_parser = parse_pixel)]
        from: Vec2,
        /// End pixel as `x,y`
        #[arg(long, value_parser = parse_pixel)]
        to: Vec2,
    },

    /// Render one headless frame and summarize the draw calls
    Render {
        /// Hide the tree view panel
        #[arg(long)]
        no_tree: bool,
    },
}

fn parse_pixel(value: &str) -> Result<Vec2, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got `{value}`"))?;
    let parse = |part: &str| {
        part.trim()
            .parse::<f32>()
            .map_err(|e| format!("invalid coordinate `{part}`: {e}"))
    };
    Ok(Vec2::new(parse(x)?, parse(y)?))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => EditorConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => EditorConfig::default(),
    };
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    let level = config.log_level_filter()?;
    EditorLogger::init(level, &config.log_dir()).context("Failed to initialize logging")?;

    let mut editor = Editor::new(config, HeadlessRenderer::new())
        .context("Failed to build the demo scene")?;

    match cli.command {
        Commands::Tree => print_tree(&editor),
        Commands::Hit { x, y } => hit(&editor, Vec2::new(x, y)),
        Commands::Click { x, y } => click(&mut editor, Vec2::new(x, y)),
        Commands::Drag { from, to } => drag(&mut editor, from, to),
        Commands::Render { no_tree } => render(&mut editor, no_tree),
    }
}

fn node_name(editor: &Editor<HeadlessRenderer>, id: scene_graph::NodeId) -> &str {
    editor
        .scene()
        .node(id)
        .map(|node| node.name())
        .unwrap_or("<removed>")
}

fn print_tree(editor: &Editor<HeadlessRenderer>) -> Result<()> {
    println!("Scene hierarchy:");
    for line in demo::hierarchy_lines(editor.scene(), editor.root()) {
        println!("{line}");
    }
    Ok(())
}

fn hit(editor: &Editor<HeadlessRenderer>, point: Vec2) -> Result<()> {
    match editor.canvas().hit_test(editor.scene(), point) {
        Some(id) => println!("hit {} at ({}, {})", node_name(editor, id), point.x, point.y),
        None => println!("no hit at ({}, {})", point.x, point.y),
    }
    Ok(())
}

fn click(editor: &mut Editor<HeadlessRenderer>, pixel: Vec2) -> Result<()> {
    let scene_point = editor.window_to_scene(pixel.x, pixel.y);
    println!(
        "window ({}, {}) -> scene ({}, {})",
        pixel.x, pixel.y, scene_point.x, scene_point.y
    );

    editor.handle_mouse_move(pixel.x, pixel.y);
    editor.handle_mouse_button(MouseButton::Left, ButtonAction::Press);
    editor.handle_mouse_button(MouseButton::Left, ButtonAction::Release);

    match editor.selected_node() {
        Some(id) => println!("selected {}", node_name(editor, id)),
        None => println!("nothing selected"),
    }
    Ok(())
}

fn drag(editor: &mut Editor<HeadlessRenderer>, from: Vec2, to: Vec2) -> Result<()> {
    log_section("drag");
    editor.handle_mouse_move(from.x, from.y);
    editor.handle_mouse_button(MouseButton::Left, ButtonAction::Press);
    let grabbed = editor.is_dragging();
    editor.handle_mouse_move(to.x, to.y);
    editor.handle_mouse_button(MouseButton::Left, ButtonAction::Release);

    match editor.selected_node() {
        Some(id) if grabbed => println!("dragged {}", node_name(editor, id)),
        _ => println!("nothing to drag"),
    }
    print_tree(editor)
}

fn render(editor: &mut Editor<HeadlessRenderer>, no_tree: bool) -> Result<()> {
    if no_tree {
        editor.toggle_tree_view();
    }
    editor.render_frame();

    let segments = editor.config().circle_segments;
    let renderer = editor
        .canvas()
        .renderer()
        .context("The canvas has no renderer")?;
    let frame = renderer.last_frame();
    let (width, height) = renderer.viewport();
    println!("{}", editor.config().window.title);
    println!("frame {} at {width}x{height}: {} draw calls", renderer.frames_completed(), frame.len());

    for command in frame {
        match command {
            DrawCommand::Shape {
                name,
                kind,
                model,
                selected,
                ..
            } => {
                let mesh = Mesh::for_kind(*kind, segments);
                let marker = if *selected { " [selected]" } else { "" };
                match mesh.bounds(model) {
                    Some((min, max)) => println!(
                        "  {kind} {name}: {} triangles, bounds ({:.2}, {:.2})..({:.2}, {:.2}){marker}",
                        mesh.triangle_count(),
                        min.x,
                        min.y,
                        max.x,
                        max.y
                    ),
                    None => println!("  {kind} {name}: empty mesh{marker}"),
                }
            }
            DrawCommand::Text { text, .. } => println!("  text \"{text}\""),
            DrawCommand::Rectangle { .. } | DrawCommand::Line { .. } => {}
        }
    }
    Ok(())
}
