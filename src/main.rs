use anyhow::Result;
use clap::Parser;
use icon64::app::App;
use icon64::models::Config;
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "icon64")]
#[command(about = "Resize images to 64x64 JPEG icons and bundle them for download")]
struct CliArgs {
    /// Image files to convert. Non-image files are skipped.
    #[arg(value_name = "FILES", required = true)]
    files: Vec<PathBuf>,

    /// Directory to write the exported icon or archive into.
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Write every icon as its own file instead of one archive.
    #[arg(long)]
    each: bool,

    /// Drop the icon with this output name before exporting (repeatable).
    #[arg(long, value_name = "NAME")]
    exclude: Vec<String>,

    /// Print previews as JSON.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "icon64=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();

    let mut config = Config::from_env()?;
    if let Some(output_dir) = args.output_dir.clone() {
        config = config.with_output_dir(output_dir);
    }

    let mut app = App::new(config);
    let report = app.add_files(&args.files).await;

    for name in &args.exclude {
        if !app.remove_by_name(name) {
            warn!("--exclude {} matched nothing", name);
        }
    }

    if args.json {
        let output = serde_json::json!({
            "thumbnails": app.previews()?,
            "skipped": report.skipped,
            "failed": report.failed,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        for preview in app.previews()? {
            println!("{}", preview);
        }
        for failed in &report.failed {
            println!("failed: {} ({})", failed.name, failed.reason);
        }
    }

    let exported = if args.each {
        app.download_each()
            .await
            .map(|artifacts| artifacts.into_iter().map(|a| a.path).collect::<Vec<_>>())
    } else {
        app.download_all()
            .await
            .map(|artifact| artifact.into_iter().map(|a| a.path).collect())
    };

    match exported {
        Ok(paths) if paths.is_empty() => {
            info!("No icons to export");
            Ok(())
        }
        Ok(paths) => {
            for path in paths {
                info!("Wrote {}", path.display());
            }
            Ok(())
        }
        Err(e) => {
            error!("Export failed: {}", e);
            std::process::exit(1);
        }
    }
}
