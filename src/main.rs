use anyhow::{anyhow, bail, Context};
use clap::{Args as ClapArgs, Parser, Subcommand};
use dotenv::dotenv;
use kinetic_condition::{
    evaluate_condition, substitute_variables, ConditionEvaluationError, EvaluationOptions,
};
use serde_json::{Map, Value};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate a condition and print true or false
    Eval {
        /// The condition expression
        #[arg(short, long)]
        condition: String,

        #[command(flatten)]
        vars: VarArgs,

        /// Treat unbound variables as undefined instead of failing
        #[arg(long)]
        lenient: bool,

        /// Print false instead of failing when evaluation errors
        #[arg(long)]
        no_throw: bool,

        /// Maximum parenthesis / `!` nesting (at most 128)
        #[arg(long)]
        max_depth: Option<usize>,

        /// YAML or JSON file with evaluation options
        #[arg(long)]
        options: Option<PathBuf>,
    },
    /// Substitute variables into a condition for display
    Substitute {
        /// The condition expression
        #[arg(short, long)]
        condition: String,

        #[command(flatten)]
        vars: VarArgs,

        /// Render unbound variables as undefined instead of failing
        #[arg(long)]
        lenient: bool,
    },
}

#[derive(ClapArgs, Debug)]
struct VarArgs {
    /// Variable binding NAME=VALUE; VALUE is JSON if it parses, else a string
    #[arg(short, long = "var", value_name = "NAME=VALUE")]
    var: Vec<String>,

    /// YAML or JSON file with a mapping of variables
    #[arg(long = "vars", value_name = "FILE")]
    vars_file: Option<PathBuf>,
}

impl VarArgs {
    /// File bindings first, then `--var` flags on top
    fn load(&self) -> anyhow::Result<Map<String, Value>> {
        let mut bindings = match &self.vars_file {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read variables file {}", path.display()))?;
                serde_yaml::from_str::<Map<String, Value>>(&text).with_context(|| {
                    format!("Variables file {} is not a mapping", path.display())
                })?
            }
            None => Map::new(),
        };

        for pair in &self.var {
            let Some((name, raw)) = pair.split_once('=') else {
                bail!("Invalid --var '{}', expected NAME=VALUE", pair);
            };
            let value =
                serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
            bindings.insert(name.to_string(), value);
        }

        log::debug!("Loaded {} variable bindings", bindings.len());
        Ok(bindings)
    }
}

fn load_options(path: Option<&PathBuf>) -> anyhow::Result<EvaluationOptions> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read options file {}", path.display()))?;
            serde_yaml::from_str(&text)
                .with_context(|| format!("Invalid options file {}", path.display()))
        }
        None => Ok(EvaluationOptions::default()),
    }
}

/// Tag a condition failure with its kind, e.g. `Variable not found: X [variable not found]`
fn describe(err: ConditionEvaluationError) -> anyhow::Error {
    anyhow!("{} [{}]", err, err.kind())
}

fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();

    match args.command {
        Commands::Eval {
            condition,
            vars,
            lenient,
            no_throw,
            max_depth,
            options,
        } => {
            let bindings = vars.load()?;
            let mut options = load_options(options.as_ref())?;
            if lenient {
                options = options.with_strict_mode(false);
            }
            if no_throw {
                options = options.with_throw_on_error(false);
            }
            if let Some(depth) = max_depth {
                options = options.with_max_depth(depth);
            }

            log::info!("Evaluating '{}' with {:?}", condition, options);
            let result = evaluate_condition(&condition, &bindings, options).map_err(describe)?;
            println!("{}", result);
        }
        Commands::Substitute {
            condition,
            vars,
            lenient,
        } => {
            let bindings = vars.load()?;
            let substituted =
                substitute_variables(&condition, &bindings, !lenient).map_err(describe)?;
            println!("{}", substituted);
        }
    }

    Ok(())
}
