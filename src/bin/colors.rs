use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use image::GenericImageView;
use image_colors_wasm::frame::rgb_to_bgr_bytes;
use image_colors_wasm::image_input::{load_pixels, resize_percent};
use image_colors_wasm::{
    BgrFrame, ColorClassifier, Config, PaletteExtractor, PaletteModel, extract_feature, pick_color,
};
use std::fs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Color picking, palette extraction and color detection for images.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// JSON configuration file; defaults are used when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a color palette from an image
    Palette {
        input: PathBuf,

        /// 1 = fixed number of colors, 2 = one color per hue family
        #[arg(short, long, default_value_t = 1)]
        model: u8,

        /// Number of colors for model 1
        #[arg(short = 'k', long, default_value_t = 5)]
        n_colors: usize,

        /// Write a PNG strip of the palette here
        #[arg(short, long)]
        swatch: Option<PathBuf>,

        /// Print JSON instead of plain text
        #[arg(long)]
        json: bool,
    },

    /// Print the color of one pixel
    Pick {
        input: PathBuf,
        x: u32,
        y: u32,

        /// Scale the image to this percentage first (1-100)
        #[arg(short, long, default_value_t = 100)]
        percent: u32,
    },

    /// Name the dominant color of each image, treating it as a video frame
    Detect {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Training data, overriding the configured path
        #[arg(short, long)]
        training: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => Config::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default(),
    };

    match args.command {
        Command::Palette {
            input,
            model,
            n_colors,
            swatch,
            json,
        } => {
            let model = match model {
                1 => PaletteModel::FixedK(n_colors),
                2 => PaletteModel::Auto,
                other => bail!("unknown palette model {other}, expected 1 or 2"),
            };
            let bytes = fs::read(&input).with_context(|| format!("reading {}", input.display()))?;
            let pixels = load_pixels(&bytes, config.image.thumbnail)?;
            let extractor = PaletteExtractor::new(config.clustering.clone(), &config.cache);
            let palette = extractor.extract(&pixels, model).context("palette extraction failed")?;

            if json {
                let rgb: Vec<[u8; 3]> = palette.colors.iter().map(|c| [c.red, c.green, c.blue]).collect();
                let out = serde_json::json!({ "rgb": rgb, "hex": palette.hex() });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                let rgb: Vec<String> = palette
                    .colors
                    .iter()
                    .map(|c| format!("({}, {}, {})", c.red, c.green, c.blue))
                    .collect();
                println!("RGB values:  {}", rgb.join(", "));
                println!("HEX values:  {}", palette.hex().join(", "));
            }

            if let Some(path) = swatch {
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)?;
                }
                palette.swatch(100).save(&path)?;
                info!(path = %path.display(), "saved palette swatch");
            }
        }

        Command::Pick {
            input,
            x,
            y,
            percent,
        } => {
            let img = image::open(&input).with_context(|| format!("opening {}", input.display()))?;
            let img = resize_percent(&img, percent);
            match pick_color(&img, x, y) {
                Some(picked) => {
                    println!("RGB:  {}", picked.rgb.map(|c| c.to_string()).join(","));
                    println!("HEX:  {}", picked.hex);
                }
                None => {
                    let (w, h) = img.dimensions();
                    eprintln!("({x}, {y}) is outside the {w}x{h} image, nothing picked");
                }
            }
        }

        Command::Detect { inputs, training } => {
            let path = training.unwrap_or(config.classifier.training_data);
            let classifier = ColorClassifier::from_csv_path(&path, config.classifier.neighbors)
                .with_context(|| format!("training from {}", path.display()))?;

            for input in &inputs {
                let img = image::open(input)
                    .with_context(|| format!("opening {}", input.display()))?
                    .to_rgb8();
                let bgr = rgb_to_bgr_bytes(&img);
                let frame = BgrFrame::new(img.width(), img.height(), &bgr)?;
                let feature = extract_feature(&frame);
                let label = classifier.classify_rgb(feature);
                println!("{}: prediction: {label} (feature {:?})", input.display(), feature);
            }
        }
    }

    Ok(())
}
