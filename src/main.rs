use std::error::Error;
use std::fs;
use std::time::Instant;

use clap::{Parser, ValueEnum};
use log::{error, info, LevelFilter};

use raytracing_engine::raytracing::camera::Camera;
use raytracing_engine::raytracing::demo;
use raytracing_engine::raytracing::parser::{ImageData, SceneParser};
use raytracing_engine::raytracing::scene::SceneQuery;
use raytracing_engine::raytracing::shader::ShaderConfig;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DemoScene {
    Refraction,
    Mirror,
    AllInOne,
}

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// the input path to the scene file
    #[arg(required_unless_present = "demo", conflicts_with = "demo")]
    scene: Option<String>,
    /// render one of the built in scenes instead of a file
    #[arg(long)]
    demo: Option<DemoScene>,
    /// the path where the rendered image is saved, the extension picks the format
    #[arg(short, long, default_value = "output.png")]
    output: String,
    /// override the image width
    #[arg(long)]
    width: Option<u32>,
    /// override the image height
    #[arg(long)]
    height: Option<u32>,
    /// the number of rendering threads
    #[arg(short, long)]
    workers: Option<usize>,
    /// the deepest reflection or refraction bounce
    #[arg(long, default_value_t = 6)]
    max_depth: u32,
    /// apply gamma correction to the final image
    #[arg(long, default_value = "false")]
    gamma_correction: bool,
    #[arg(long, default_value = "info")]
    log_level: LogLevel,
}

fn load_scene(args: &Args) -> Result<ImageData, Box<dyn Error>> {
    if let Some(demo_scene) = args.demo {
        return Ok(match demo_scene {
            DemoScene::Refraction => demo::refraction(),
            DemoScene::Mirror => demo::mirror(),
            DemoScene::AllInOne => demo::all_in_one(),
        });
    }
    let path = args.scene.as_deref().ok_or("no scene file given")?;
    let content = fs::read_to_string(path)?;
    let mut parser = SceneParser::new(&content);
    parser.parse_scene().map_err(|parser_error| {
        error!("{}", parser_error);
        if let Some(location) = parser_error.error_location(&content) {
            error!("\n{}", location);
        }
        Box::<dyn Error>::from(parser_error)
    })
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    env_logger::Builder::from_default_env()
        .filter_level(args.log_level.into())
        .init();

    let ImageData {
        camera: mut camera_config,
        scene,
    } = load_scene(&args)?;
    if let Some(width) = args.width {
        camera_config.width = width;
    }
    if let Some(height) = args.height {
        camera_config.height = height;
    }
    if let Some(workers) = args.workers {
        camera_config.workers = workers;
    }
    info!(
        "scene with {} objects and {} lights",
        scene.objects().len(),
        scene.lights().len()
    );

    let mut camera = Camera::new(camera_config)?;
    camera.set_shader_config(ShaderConfig {
        max_depth: args.max_depth,
        ..Default::default()
    });

    let start = Instant::now();
    camera.render(&scene);
    info!("rendered {} in {:?}", args.output, start.elapsed());

    camera.to_image(args.gamma_correction).save(&args.output)?;
    Ok(())
}
