use anyhow::{Context, Result};
use clap::Parser;

use neuik::cli::{CliArgs, OutputFormat};
use neuik::config::WidgetConfig;
use neuik::metrics::{FontdueMetrics, GlyphMetrics, MonospaceMetrics};
use neuik::replay::ReplayScript;

fn main() -> Result<()> {
    let args = CliArgs::parse();
    neuik::tracing::init(args.log_dir().as_deref());

    let config = match &args.config {
        Some(path) => WidgetConfig::load(path)?,
        None => WidgetConfig::load_or_default(),
    };

    let metrics: Box<dyn GlyphMetrics> = match &args.font {
        Some(path) => {
            let mut fonts = FontdueMetrics::from_file(path)
                .with_context(|| format!("Failed to load font {}", path.display()))?;
            for (style, face) in args.extra_faces() {
                fonts = fonts
                    .with_face_file(style, face)
                    .with_context(|| format!("Failed to load font {}", face.display()))?;
            }
            Box::new(fonts)
        }
        None => Box::new(MonospaceMetrics::new(args.advance, args.line_height)),
    };

    let script = ReplayScript::load(&args.script)?;
    tracing::info!(
        steps = script.steps.len(),
        widget = ?script.widget,
        "Replaying {}",
        args.script.display()
    );

    let report = script.run(&config, metrics.as_ref());
    let output = match args.format {
        OutputFormat::Json => report.to_json()?,
        OutputFormat::Yaml => report.to_yaml()?,
    };
    println!("{}", output);
    Ok(())
}
