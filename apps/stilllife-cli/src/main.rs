use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use stilllife_assets::TextureImage;
use stilllife_input::Action;
use stilllife_render::{RecordingBackend, RenderContext};
use stilllife_scene::{PrepareReport, SceneManager, presets};
use stilllife_tools::SceneInspector;
use stilllife_view::ViewManager;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stilllife-cli", about = "CLI tool for the still-life scene")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Directory the Textures/ folder is resolved against
    #[arg(long, default_value = ".", global = true)]
    asset_root: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Prepare the scene and record one frame of backend calls
    Script {
        /// Emit the calls as JSON instead of the text transcript
        #[arg(long)]
        json: bool,
        /// Render with the orthographic camera preset
        #[arg(long)]
        orthographic: bool,
    },
    /// Decode every manifest texture and report its size or the error
    Textures,
    /// List the material presets
    Materials,
    /// List the tableau objects
    Tableau {
        /// Emit the tableau as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Prepare against a recording backend, then issue one frame.
fn record_frame(asset_root: &Path, orthographic: bool) -> (RecordingBackend, PrepareReport) {
    let mut backend = RecordingBackend::new();
    let mut scene = SceneManager::new(asset_root);
    let mut view = ViewManager::new();
    if orthographic {
        view.apply(Action::UseOrthographic, 0.0);
    }

    let mut ctx = RenderContext::new(&mut backend);
    let report = scene.prepare_scene(&mut ctx);
    view.prepare_scene_view(&mut ctx);
    scene.render_scene(&mut ctx);
    tracing::info!("{}", SceneInspector::summary(&scene));
    (backend, report)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Info => {
            println!("stilllife-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", stilllife_common::crate_info());
            println!("geometry: {}", stilllife_geometry::crate_info());
            println!("render: {}", stilllife_render::crate_info());
            println!("assets: {}", stilllife_assets::crate_info());
            println!("scene: {}", stilllife_scene::crate_info());
            println!("input: {}", stilllife_input::crate_info());
            println!("view: {}", stilllife_view::crate_info());
            println!("tools: {}", stilllife_tools::crate_info());
        }
        Commands::Script { json, orthographic } => {
            let (backend, report) = record_frame(&cli.asset_root, orthographic);
            if json {
                println!("{}", serde_json::to_string_pretty(backend.calls())?);
            } else {
                print!("{}", backend.transcript());
                println!(
                    "textures loaded: {}, failed: {}, materials: {}, meshes: {}",
                    report.textures_loaded,
                    report.texture_failures.len(),
                    report.materials_defined,
                    report.meshes_loaded
                );
            }
        }
        Commands::Textures => {
            let mut failures = 0;
            for source in &presets::TEXTURE_MANIFEST {
                let path = cli.asset_root.join(source.path);
                match TextureImage::open(&path) {
                    Ok(image) => println!(
                        "{:<12} {}x{} {} channels  {}",
                        source.tag,
                        image.width,
                        image.height,
                        image.format.channels(),
                        path.display()
                    ),
                    Err(e) => {
                        failures += 1;
                        println!("{:<12} FAILED {}: {e}", source.tag, path.display());
                    }
                }
            }
            println!(
                "{} of {} textures decoded",
                presets::TEXTURE_MANIFEST.len() - failures,
                presets::TEXTURE_MANIFEST.len()
            );
        }
        Commands::Materials => {
            for preset in &presets::MATERIAL_PRESETS {
                println!(
                    "{:<10} diffuse ({:.2}, {:.2}, {:.2})  specular ({:.2}, {:.2}, {:.2})  shininess {:.0}",
                    preset.tag,
                    preset.diffuse_color.x,
                    preset.diffuse_color.y,
                    preset.diffuse_color.z,
                    preset.specular_color.x,
                    preset.specular_color.y,
                    preset.specular_color.z,
                    preset.shininess
                );
            }
        }
        Commands::Tableau { json } => {
            let scene = SceneManager::new(&cli.asset_root);
            if json {
                println!("{}", serde_json::to_string_pretty(scene.tableau())?);
            } else {
                for label in SceneInspector::list_objects(&scene) {
                    if let Some(info) = SceneInspector::inspect_object(&scene, &label) {
                        println!("{info}");
                    }
                }
            }
        }
    }

    Ok(())
}
