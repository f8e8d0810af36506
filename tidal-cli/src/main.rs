//! Tidal CLI
//!
//! Lays out a JSON scene headlessly and prints the resulting boxes.
//!
//! A scene is a viewport, optional engine configuration, optional extra
//! breakpoints and media queries, and a tree of styled nodes:
//!
//! ```json
//! {
//!   "viewport": { "width": 800, "height": 600 },
//!   "root": {
//!     "tag": "div",
//!     "style": { "display": "flex", "gap": 8 },
//!     "children": [{ "tag": "span", "text": "hello" }]
//!   }
//! }
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use owo_colors::OwoColorize;
use serde::Deserialize;
use tidal_css::{
    AuthoredStyle, Breakpoint, EngineConfig, LayoutEngine, LayoutResult, MediaCondition, NodeId,
    Viewport,
};

/// Tidal: lay out a scene file and print boxes, paint order and hits
#[derive(Parser, Debug)]
#[command(name = "tidal")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Paint list of a scene
    tidal demos/card.json

    # Full box tree at a phone-sized viewport
    tidal demos/card.json --width 375 --height 667 --tree

    # Which node is at (120, 40)?
    tidal demos/card.json --hit 120,40
"#)]
struct Cli {
    /// Scene file (JSON)
    #[arg(value_name = "SCENE")]
    scene: PathBuf,

    /// Override the scene's viewport width
    #[arg(long)]
    width: Option<f32>,

    /// Override the scene's viewport height
    #[arg(long)]
    height: Option<f32>,

    /// Override the scene's device pixel ratio
    #[arg(long)]
    dpr: Option<f32>,

    /// Print the laid-out box tree
    #[arg(long)]
    tree: bool,

    /// Hit-test a point, given as X,Y
    #[arg(long, value_name = "X,Y", value_parser = parse_point)]
    hit: Option<(f32, f32)>,

    /// Print the scene's style and layout passes as they run
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Scene {
    #[serde(default)]
    viewport: Viewport,
    #[serde(default)]
    config: EngineConfig,
    #[serde(default)]
    breakpoints: BTreeMap<String, Breakpoint>,
    #[serde(default)]
    media: Vec<SceneQuery>,
    root: SceneNode,
}

/// A media query patching the node with the matching `id`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SceneQuery {
    name: String,
    breakpoint: String,
    target: String,
    style: AuthoredStyle,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SceneNode {
    #[serde(default = "default_tag")]
    tag: String,
    /// Handle for media queries.
    id: Option<String>,
    text: Option<String>,
    #[serde(default)]
    style: AuthoredStyle,
    #[serde(default)]
    children: Vec<SceneNode>,
}

fn default_tag() -> String {
    "div".to_string()
}

fn parse_point(src: &str) -> Result<(f32, f32), String> {
    let (x, y) = src
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got '{src}'"))?;
    let x = x.trim().parse().map_err(|e| format!("bad x '{x}': {e}"))?;
    let y = y.trim().parse().map_err(|e| format!("bad y '{y}': {e}"))?;
    Ok((x, y))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(if cli.verbose {
        "debug"
    } else {
        "info"
    }))
    .init();

    let source = fs::read_to_string(&cli.scene)
        .with_context(|| format!("reading {}", cli.scene.display()))?;
    let scene: Scene = serde_json::from_str(&source)
        .with_context(|| format!("parsing {}", cli.scene.display()))?;

    let mut viewport = scene.viewport;
    if let Some(width) = cli.width {
        viewport.width = width;
    }
    if let Some(height) = cli.height {
        viewport.height = height;
    }
    if let Some(dpr) = cli.dpr {
        viewport.device_pixel_ratio = dpr;
    }
    if viewport.width <= 0.0 || viewport.height <= 0.0 {
        bail!("viewport must have a positive size, got {}x{}", viewport.width, viewport.height);
    }

    let mut engine = LayoutEngine::with_config(scene.config, viewport);
    for (name, breakpoint) in scene.breakpoints {
        engine.add_breakpoint(&name, breakpoint);
    }
    let mut ids = HashMap::new();
    let root = build(&mut engine, &scene.root, &mut ids)?;
    engine.set_root(root)?;
    for query in scene.media {
        let target = *ids
            .get(&query.target)
            .with_context(|| format!("media query '{}': no node with id '{}'", query.name, query.target))?;
        let active = engine.add_media_query(
            &query.name,
            MediaCondition::breakpoint(&query.breakpoint),
            query.style,
            target,
        )?;
        log::debug!("media query '{}' active: {active}", query.name);
    }

    log::info!("laying out {} at {}x{}", cli.scene.display(), viewport.width, viewport.height);
    let result = engine
        .force_layout()?
        .cloned()
        .context("layout pass did not run")?;

    print_summary(&engine);
    if cli.tree {
        println!("\n{}", "=== Box Tree ===".bold());
        print_box(&engine, &result, 0);
    }
    print_paint_list(&engine);
    if let Some((x, y)) = cli.hit {
        println!();
        match engine.hit_test(x, y) {
            Some(node) => println!("hit ({x}, {y}): {} {}", node.green(), describe(&engine, node)),
            None => println!("hit ({x}, {y}): {}", "nothing".dimmed()),
        }
    }
    Ok(())
}

/// Create the engine nodes for `node` and its subtree.
fn build(
    engine: &mut LayoutEngine,
    node: &SceneNode,
    ids: &mut HashMap<String, NodeId>,
) -> Result<NodeId> {
    let id = if node.tag == tidal_dom::TEXT_TAG {
        engine.create_text(node.text.as_deref().unwrap_or_default())
    } else {
        let id = engine.create_element(&node.tag);
        if let Some(text) = &node.text {
            engine.set_text(id, text)?;
        }
        id
    };
    engine.replace_style(id, node.style.clone())?;
    if let Some(name) = &node.id
        && ids.insert(name.clone(), id).is_some()
    {
        bail!("duplicate node id '{name}'");
    }
    for child in &node.children {
        let child = build(engine, child, ids)?;
        engine.append_child(id, child)?;
    }
    Ok(id)
}

fn describe(engine: &LayoutEngine, node: NodeId) -> String {
    let tag = engine.tree().tag_name(node).unwrap_or("?");
    match engine.tree().text(node) {
        Some(text) if !text.is_empty() => {
            let preview: String = text.chars().take(24).collect();
            let suffix = if text.chars().count() > 24 { "..." } else { "" };
            format!("<{tag}> \"{}{suffix}\"", preview.replace('\n', "\\n"))
        }
        _ => format!("<{tag}>"),
    }
}

fn print_summary(engine: &LayoutEngine) {
    let viewport = engine.viewport();
    let stats = engine.stats();
    println!(
        "{} {}x{} @{}x",
        "viewport".bold(),
        viewport.width,
        viewport.height,
        viewport.device_pixel_ratio
    );
    println!(
        "{} {} styled, {} laid out, {} painted in {:.2?}",
        "pass".bold(),
        stats.styled_nodes,
        stats.laid_out_nodes,
        stats.paint_entries,
        stats.last_pass
    );
    for query in engine.responsive().media_queries() {
        let state = if query.is_active() {
            "active".green().to_string()
        } else {
            "inactive".dimmed().to_string()
        };
        println!("{} {} -> {} ({state})", "media".bold(), query.name(), query.target());
    }
}

fn print_box(engine: &LayoutEngine, result: &LayoutResult, depth: usize) {
    let indent = "  ".repeat(depth);
    let b = result.bounds;
    let order = result
        .paint_order
        .map_or_else(|| "-".to_string(), |o| o.to_string());
    println!(
        "{indent}{} {} x={:.1} y={:.1} w={:.1} h={:.1} paint={}",
        result.node.cyan(),
        describe(engine, result.node),
        b.x,
        b.y,
        b.width,
        b.height,
        order.yellow()
    );
    for child in &result.children {
        print_box(engine, child, depth + 1);
    }
}

fn print_paint_list(engine: &LayoutEngine) {
    println!("\n{}", "=== Paint List ===".bold());
    println!(
        "{}",
        "   #     z node   tag                             x        y        w        h".dimmed()
    );
    for (i, entry) in engine.paint_list().iter().enumerate() {
        let b = entry.bounds;
        println!(
            "{i:>4} {:>5} {:<6} {:<24} {:>8.1} {:>8.1} {:>8.1} {:>8.1}",
            entry.z_index,
            entry.node.to_string(),
            describe(engine, entry.node),
            b.x,
            b.y,
            b.width,
            b.height
        );
    }
}
