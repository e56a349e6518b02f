use clap::{Args, Parser, Subcommand};
use nnraw_core::constants::RAW_ROOT_ENV_VAR;
use nnraw_core::{convert_dataset, presets, resolve_raw_root, ConvertConfig, DatasetId};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "nnraw")]
#[command(about = "Convert downloaded segmentation datasets into the nnU-Net raw layout")]
struct Cli {
    /// Directory to create Dataset<NNN>_<TaskName> in (default: $nnUNet_raw, then ./nnUNet_raw)
    #[arg(long, global = true)]
    raw_root: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the built-in dataset presets
    List,
    /// Convert ImageCAS (expects extracted 'training' and 'testing' folders)
    Imagecas(ConvertArgs),
    /// Convert AortaSeg24 (expects 'images' and 'masks' folders)
    #[command(name = "aortaseg24")]
    Aortaseg24(ConvertArgs),
}

#[derive(Args)]
struct ConvertArgs {
    /// The downloaded dataset directory
    #[arg(short = 'i', long = "input_folder", alias = "input-folder")]
    input_folder: PathBuf,
    /// nnU-Net dataset id (defaults to the preset's id)
    #[arg(short = 'd', long = "dataset_id", alias = "dataset-id")]
    dataset_id: Option<u32>,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("nnraw_cli=info".parse()?)
                .add_directive("nnraw_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let (preset, args) = match cli.command {
        Some(Commands::List) => {
            for preset in presets::all()? {
                println!(
                    "{}: Dataset{}_{} ({}, {} channel(s), {} labels)",
                    preset.key,
                    preset.default_dataset_id,
                    preset.task_name,
                    preset.file_ending,
                    preset.channel_names.len(),
                    preset.labels.len()
                );
            }
            return Ok(());
        }
        Some(Commands::Imagecas(args)) => (presets::image_cas()?, args),
        Some(Commands::Aortaseg24(args)) => (presets::aorta_seg24()?, args),
        None => {
            println!("Use 'nnraw --help' for commands");
            return Ok(());
        }
    };

    let dataset_id = match args.dataset_id {
        Some(id) => DatasetId::new(id)?,
        None => preset.default_dataset_id,
    };
    let raw_root = resolve_raw_root(cli.raw_root, std::env::var(RAW_ROOT_ENV_VAR).ok());
    let config = ConvertConfig::new(raw_root)?;

    println!("Converting...");
    let summary = convert_dataset(&preset, &args.input_folder, dataset_id, &config)?;
    tracing::info!(
        "++ {} ready ({} training cases)",
        summary.layout.root().display(),
        summary.report.training_cases
    );
    println!("Done!");

    Ok(())
}
