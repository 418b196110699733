//! `sfx` — command-line client: generate, render and store UI sounds.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use clap::{Args, Parser, Subcommand};
use serde::de::DeserializeOwned;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sfx_core::dsp::renderer::render_wav;
use sfx_core::error::SfxError;
use sfx_core::generate_variations_seeded;
use sfx_core::sound::SoundParameters;
use sfx_core::store::{SoundRecord, SoundStore};
use sfx_core::variation::{VariationParameters, VariationPreset};

#[derive(Parser, Debug)]
#[command(name = "sfx", version, about = "Generate, render and store short UI sounds")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the built-in variation presets as JSON
    Presets,
    /// Generate variants of a sound parameter file
    Vary {
        /// Base sound parameters (JSON)
        #[arg(long, value_name = "FILE")]
        base: PathBuf,
        #[command(flatten)]
        batch: BatchArgs,
        /// Write variant-NN.json and variant-NN.wav here instead of printing JSON
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
        /// Sample rate for WAV output
        #[arg(long, value_name = "HZ", default_value = "44100")]
        sample_rate: u32,
    },
    /// Render a sound parameter file to WAV
    Render {
        /// Sound parameters (JSON)
        #[arg(long, value_name = "FILE")]
        sound: PathBuf,
        /// Output WAV path
        #[arg(long, value_name = "FILE")]
        out: PathBuf,
        #[arg(long, value_name = "HZ", default_value = "44100")]
        sample_rate: u32,
    },
    /// Manage the sound store
    Store {
        /// Store directory (defaults to the platform data directory)
        #[arg(long, value_name = "DIR")]
        store: Option<PathBuf>,
        #[command(subcommand)]
        action: StoreAction,
    },
}

#[derive(Subcommand, Debug)]
enum StoreAction {
    /// Add a sound parameter file
    Add {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        #[arg(long)]
        name: String,
        /// Tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// List stored sounds
    List,
    /// Print one stored sound
    Get { id: String },
    /// Delete a stored sound
    Remove { id: String },
    /// Generate variants of a stored sound and store them
    Vary {
        id: String,
        #[command(flatten)]
        batch: BatchArgs,
    },
}

#[derive(Args, Debug)]
struct BatchArgs {
    /// Built-in preset: subtle, moderate, wild, shorterVariants, longerVariants
    #[arg(long, default_value = "moderate", conflicts_with = "config")]
    preset: String,
    /// Variation parameters (JSON) instead of a preset
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Number of variants
    #[arg(long, default_value = "5")]
    count: i64,
    /// Random seed (defaults to the clock; logged for reproduction)
    #[arg(long)]
    seed: Option<u64>,
}

impl BatchArgs {
    fn profile(&self) -> Result<VariationParameters, SfxError> {
        match &self.config {
            Some(path) => read_json(path),
            None => Ok(self.preset.parse::<VariationPreset>()?.params()),
        }
    }

    fn seed(&self) -> u64 {
        let seed = self.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(0)
        });
        info!(seed, "variation seed");
        seed
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(command: Command) -> Result<(), SfxError> {
    match command {
        Command::Presets => {
            let presets: Vec<_> = VariationPreset::ALL
                .iter()
                .map(|p| serde_json::json!({ "name": p.name(), "params": p.params() }))
                .collect();
            print_json(&presets)
        }
        Command::Vary {
            base,
            batch,
            out,
            sample_rate,
        } => {
            let base: SoundParameters = read_json(&base)?;
            let variants =
                generate_variations_seeded(&base, &batch.profile()?, batch.count, batch.seed())?;
            match out {
                Some(dir) => write_variants(&dir, &variants, sample_rate),
                None => print_json(&variants),
            }
        }
        Command::Render {
            sound,
            out,
            sample_rate,
        } => {
            let params: SoundParameters = read_json(&sound)?;
            fs::write(&out, render_wav(&params, sample_rate)?)?;
            info!(path = %out.display(), "wrote WAV");
            Ok(())
        }
        Command::Store { store, action } => {
            let root = store.unwrap_or_else(default_store_dir);
            run_store(&SoundStore::open(root)?, action)
        }
    }
}

fn run_store(store: &SoundStore, action: StoreAction) -> Result<(), SfxError> {
    match action {
        StoreAction::Add { file, name, tags } => {
            let mut record = SoundRecord::new(name, read_json(&file)?);
            record.tags = tags;
            println!("{}", store.add(record)?);
            Ok(())
        }
        StoreAction::List => print_json(&store.list()?),
        StoreAction::Get { id } => print_json(&store.get(&id)?),
        StoreAction::Remove { id } => store.remove(&id),
        StoreAction::Vary { id, batch } => {
            let parent = store.get(&id)?;
            let seed = batch.seed();
            let variants =
                generate_variations_seeded(&parent.parameters, &batch.profile()?, batch.count, seed)?;
            for new_id in store.add_variants(&id, variants, Some(seed))? {
                println!("{new_id}");
            }
            Ok(())
        }
    }
}

fn write_variants(dir: &Path, variants: &[SoundParameters], sample_rate: u32) -> Result<(), SfxError> {
    fs::create_dir_all(dir)?;
    for (i, variant) in variants.iter().enumerate() {
        let stem = format!("variant-{:02}", i + 1);
        let wav = render_wav(variant, sample_rate)?;
        fs::write(
            dir.join(format!("{stem}.json")),
            serde_json::to_string_pretty(variant)?,
        )?;
        fs::write(dir.join(format!("{stem}.wav")), wav)?;
    }
    info!(count = variants.len(), dir = %dir.display(), "wrote variants");
    Ok(())
}

fn default_store_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "sfx")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".sfx-store"))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, SfxError> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<(), SfxError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
