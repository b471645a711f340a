//! Headless runner: evolves cars for a number of generations and optionally
//! keeps the best controller in a file between runs.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use evo_drive::simulation::storage::BrainStore;
use evo_drive::{Params, Simulation};

#[derive(Parser)]
#[command(name = "evo-drive")]
#[command(version)]
#[command(about = "Neuro-evolved cars learning to drive through traffic")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evolve for a number of generations
    Run {
        /// Configuration file (JSON); defaults are used if it does not exist
        #[arg(short, long, default_value = "evo-drive.json")]
        config: PathBuf,

        /// Number of generations to run
        #[arg(short, long, default_value = "20")]
        generations: u32,

        /// Random seed for reproducibility (overrides the config)
        #[arg(long)]
        seed: Option<u64>,

        /// Controller file to start from and save to
        #[arg(short, long, default_value = "best-brain.json")]
        brain: PathBuf,

        /// Start from the built-in pretrained controller
        #[arg(long)]
        pretrained: bool,

        /// Save the best controller to the brain file when done
        #[arg(short, long)]
        save: bool,
    },

    /// Write the default configuration file
    Init {
        /// Output path
        #[arg(short, long, default_value = "evo-drive.json")]
        output: PathBuf,
    },

    /// Print the layer shapes of a saved controller
    Inspect {
        /// Controller file
        #[arg(default_value = "best-brain.json")]
        brain: PathBuf,
    },

    /// Delete a saved controller
    Delete {
        /// Controller file
        #[arg(default_value = "best-brain.json")]
        brain: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            generations,
            seed,
            brain,
            pretrained,
            save,
        } => run(config, generations, seed, brain, pretrained, save),
        Commands::Init { output } => {
            Params::default().save_to_file(&output)?;
            println!("Wrote default configuration to {}", output.display());
            Ok(())
        }
        Commands::Inspect { brain } => inspect(brain),
        Commands::Delete { brain } => {
            if BrainStore::new(&brain).delete()? {
                println!("Deleted {}", brain.display());
            } else {
                println!("No controller saved at {}", brain.display());
            }
            Ok(())
        }
    }
}

fn run(
    config: PathBuf,
    generations: u32,
    seed: Option<u64>,
    brain: PathBuf,
    pretrained: bool,
    save: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut params = if config.exists() {
        log::info!("loading config from {}", config.display());
        Params::from_file(&config)?
    } else {
        log::info!("using default configuration");
        Params::default()
    };
    if seed.is_some() {
        params.seed = seed;
    }

    let store = BrainStore::new(brain);
    let mut sim = Simulation::new(params)?;

    if pretrained {
        sim.use_pretrained()?;
    } else if let Some(controller) = store.load()? {
        sim.load_controller(controller)?;
    }

    for _ in 0..generations {
        let summary = sim.run_generation()?;
        println!(
            "generation {:>4}  ticks {:>5}  progress {:>8.1}  best {:>8.1}  survivors {}",
            summary.generation,
            summary.ticks,
            summary.progress,
            summary.best_distance,
            summary.survivors
        );
    }

    if save {
        if sim.save_controller(&store)? {
            println!("Saved best controller to {}", store.path().display());
        } else {
            println!("No controller to save");
        }
    }

    Ok(())
}

fn inspect(brain: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let store = BrainStore::new(&brain);
    let Some(controller) = store.load()? else {
        println!("No controller saved at {}", brain.display());
        return Ok(());
    };

    println!("Layer sizes: {:?}", controller.layer_sizes());
    for (i, level) in controller.levels().iter().enumerate() {
        println!(
            "  level {}: {} -> {}, biases {:?}",
            i,
            level.input_count(),
            level.output_count(),
            level.biases().to_vec()
        );
    }
    Ok(())
}
