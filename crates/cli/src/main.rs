#![deny(unsafe_code)]
//! CLI binary for the seis flow-field generator.
//!
//! Subcommands:
//! - `generate` — run one pass and write the paths as JSON
//! - `schema` — print the parameter schema and available noise kinds

mod error;
mod output;

use clap::{Parser, Subcommand};
use error::CliError;
use seis_core::{GenerationConfig, NoiseField, NoiseKind, Recipe, Xorshift64};
use seis_flow::FlowFieldEngine;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "seis", about = "Noise-driven flow-field polyline generator")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a set of paths and write them as JSON.
    Generate {
        /// Generation parameters as a JSON string.
        #[arg(long, default_value = "{}")]
        params: String,

        /// Replay a saved recipe instead of --params and seeds.
        #[arg(long, conflicts_with_all = ["params", "noise_seed", "origin_seed"])]
        recipe: Option<PathBuf>,

        /// Noise seed. Taken from the clock when omitted.
        #[arg(long)]
        noise_seed: Option<u32>,

        /// Seed for origin placement.
        #[arg(long, default_value_t = 42)]
        origin_seed: u64,

        /// Output file path. Writes to stdout when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Walk paths on the rayon pool when intersections are allowed.
        #[cfg(feature = "parallel")]
        #[arg(long)]
        parallel: bool,
    },
    /// Print the parameter schema and available noise kinds.
    Schema,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("seis=info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Resolves the recipe for a run: either loaded from disk or assembled
/// from `--params` and the seed flags.
fn resolve_recipe(
    params: &str,
    recipe: Option<PathBuf>,
    noise_seed: Option<u32>,
    origin_seed: u64,
) -> Result<Recipe, CliError> {
    if let Some(path) = recipe {
        let recipe = output::read_recipe(&path)?;
        recipe.validate()?;
        return Ok(recipe);
    }

    let params: serde_json::Value = serde_json::from_str(params)
        .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
    let config = GenerationConfig::from_json(&params)?;
    config.validate()?;
    let noise_seed = match noise_seed {
        Some(seed) => seed,
        None => {
            let seed = NoiseField::from_entropy(config.noise)?.seed();
            tracing::info!(target: "seis::cli", noise_seed = seed, "cli.noise_seed_from_clock");
            seed
        }
    };
    Ok(Recipe::new(config, noise_seed, origin_seed))
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Schema => {
            let info = serde_json::json!({
                "params": GenerationConfig::param_schema(),
                "noise": NoiseKind::list_names(),
            });
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        Command::Generate {
            params,
            recipe,
            noise_seed,
            origin_seed,
            output,
            #[cfg(feature = "parallel")]
            parallel,
        } => {
            let recipe = resolve_recipe(&params, recipe, noise_seed, origin_seed)?;
            let engine = FlowFieldEngine::from_recipe(&recipe)?;
            let mut rng = Xorshift64::new(recipe.origin_seed);

            #[cfg(feature = "parallel")]
            let set = if parallel {
                engine.generate_parallel(&mut rng)
            } else {
                engine.generate(&mut rng)
            };
            #[cfg(not(feature = "parallel"))]
            let set = engine.generate(&mut rng);

            let doc = output::document(&recipe, &set);
            output::write_document(&doc, output.as_deref())?;

            if let Some(path) = &output {
                if cli.json {
                    let info = serde_json::json!({
                        "output": path.display().to_string(),
                        "noise_seed": recipe.noise_seed,
                        "origin_seed": recipe.origin_seed,
                        "stats": doc["stats"],
                    });
                    println!("{}", serde_json::to_string_pretty(&info)?);
                } else {
                    eprintln!(
                        "generated {} paths ({} vertices, noise seed {}, origin seed {}) -> {}",
                        set.len(),
                        set.total_vertices(),
                        recipe.noise_seed,
                        recipe.origin_seed,
                        path.display()
                    );
                }
            }
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_tracing();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn explicit_seeds_build_recipe_from_params() {
        let recipe = resolve_recipe(r#"{"path_count": 7, "radius": 50}"#, None, Some(3), 9).unwrap();
        assert_eq!(recipe.config.path_count, 7);
        assert_eq!(recipe.config.radius, 50.0);
        assert_eq!(recipe.noise_seed, 3);
        assert_eq!(recipe.origin_seed, 9);
    }

    #[test]
    fn bad_params_json_is_input_error() {
        let err = resolve_recipe("{nope", None, Some(1), 1).unwrap_err();
        assert_eq!(err.exit_code(), 12);
    }

    #[test]
    fn invalid_config_is_flow_error() {
        let err = resolve_recipe(r#"{"step_length": 0}"#, None, Some(1), 1).unwrap_err();
        assert_eq!(err.exit_code(), 10);
    }

    #[test]
    fn recipe_file_wins_and_is_validated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recipe.json");
        let saved = Recipe::new(GenerationConfig::default(), 11, 12);
        std::fs::write(&path, serde_json::to_string(&saved).unwrap()).unwrap();
        let loaded = resolve_recipe("{}", Some(path), None, 42).unwrap();
        assert_eq!(loaded, saved);

        let bad_path = dir.path().join("bad.json");
        let mut bad = saved.clone();
        bad.config.max_steps = 0;
        std::fs::write(&bad_path, serde_json::to_string(&bad).unwrap()).unwrap();
        let err = resolve_recipe("{}", Some(bad_path), None, 42).unwrap_err();
        assert_eq!(err.exit_code(), 10);
    }

    #[test]
    fn parses_generate_flags() {
        let cli = Cli::try_parse_from([
            "seis",
            "--json",
            "generate",
            "--params",
            r#"{"path_count": 2}"#,
            "--noise-seed",
            "5",
            "-o",
            "out.json",
        ])
        .unwrap();
        assert!(cli.json);
        match cli.command {
            Command::Generate {
                noise_seed, output, origin_seed, ..
            } => {
                assert_eq!(noise_seed, Some(5));
                assert_eq!(origin_seed, 42);
                assert_eq!(output, Some(PathBuf::from("out.json")));
            }
            Command::Schema => panic!("expected generate"),
        }
    }

    #[test]
    fn recipe_conflicts_with_params() {
        let parsed = Cli::try_parse_from([
            "seis", "generate", "--recipe", "r.json", "--params", "{}",
        ]);
        assert!(parsed.is_err());
    }
}
