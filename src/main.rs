//! `instaicon`: render an icon description to a file.

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use instaicon_renderer::{ExportFormat, ExportSettings, IconDescription, IconRenderer};

#[derive(Debug, Parser)]
#[command(name = "instaicon", version, about = "Render square text icons to PNG, JPG, WebP or SVG")]
struct Cli {
    /// Icon description as JSON. Defaults are used when omitted.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Replaces the description's text. `\n` starts a new line.
    #[arg(short, long)]
    text: Option<String>,

    /// Font file to install. The last one becomes the text font.
    #[arg(long = "font", value_name = "FILE")]
    fonts: Vec<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = ExportFormat::Png)]
    format: ExportFormat,

    /// Edge length in pixels, clamped to 128..=4096.
    #[arg(short, long, default_value_t = 512)]
    size: u32,

    /// Output directory, or the exact file path to write.
    #[arg(short, long, default_value = ".")]
    output: PathBuf,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match run(cli) {
        Ok(path) => {
            println!("{}", path.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("instaicon: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<PathBuf, Box<dyn Error>> {
    let mut description = match &cli.input {
        Some(path) => IconDescription::from_json(&fs::read_to_string(path)?)?.normalized(),
        None => IconDescription::new(),
    };
    if let Some(text) = cli.text {
        description.text.content = text.replace("\\n", "\n");
    }

    let mut renderer = IconRenderer::new();
    for path in &cli.fonts {
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let registration = renderer.install_font(fs::read(path)?, &name)?;
        log::info!("installed {} as {}", path.display(), registration.family);
        description.set_custom_font(registration.family);
    }

    let settings = ExportSettings::new(cli.format, cli.size);
    let file = renderer.export(&description, &settings)?;
    let target = output_path(&cli.output, &file.filename);
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(&target, &file.bytes)?;
    Ok(target)
}

/// Existing directories and extension-less paths receive the conventional
/// file name; anything else is written as given.
fn output_path(output: &Path, filename: &str) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(filename)
    } else {
        output.to_path_buf()
    }
}
