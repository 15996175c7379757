use std::path::{Path, PathBuf};

mod form;
mod generate;
mod list;
mod show;
mod terminal;

use anyhow::Context;
use brewmate::{
    Equipment, FileBackend, RecipeStore, ValidationErrors, domain::validation::validate_equipment,
};
use clap::ArgAction;
use dialoguer::{Confirm, theme::ColorfulTheme};
use form::{Edit, New};
use generate::Generate;
use list::List;
use show::Show;
use terminal::Colorize;
use tracing::instrument;

/// Name of the configuration file inside the data directory.
const CONFIG_FILE: &str = "config.toml";

fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

fn open_store(root: &Path) -> anyhow::Result<RecipeStore<FileBackend>> {
    RecipeStore::open(FileBackend::new(root.to_path_buf()))
        .with_context(|| format!("failed to open recipe store in {}", root.display()))
}

/// Print each failing field, then fail.
fn ensure_valid(result: Result<(), ValidationErrors>) -> anyhow::Result<()> {
    let Err(errors) = result else {
        return Ok(());
    };
    for error in errors.iter() {
        eprintln!("{}", format!("  • {error}").warning());
    }
    anyhow::bail!("recipe is invalid ({} field(s))", errors.len())
}

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global=true)]
    verbose: u8,

    /// The directory recipes and configuration are stored in
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command
            .unwrap_or_else(|| Command::List(List::default()))
            .run(self.root)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false)
            .with_writer(std::io::stderr);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Initialize a data directory with a default configuration
    Init,

    /// List stored recipes (default)
    List(List),

    /// Show the full contents of a recipe
    Show(Show),

    /// Create a new recipe
    New(New),

    /// Edit an existing recipe
    ///
    /// The recipe keeps its id and creation date.
    Edit(Edit),

    /// Delete a recipe
    Delete(Delete),

    /// Ask a language model for a recipe draft
    ///
    /// Requires an API key in the environment variable named by the
    /// configuration (GEMINI_API_KEY by default).
    Generate(Generate),

    /// Show or replace the description of your brewing equipment
    Equipment(EquipmentCommand),

    /// Show or modify configuration settings
    Config(Config),
}

impl Command {
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        match self {
            Self::Init => Init::run(&root)?,
            Self::List(command) => command.run(root)?,
            Self::Show(command) => command.run(root)?,
            Self::New(command) => command.run(root)?,
            Self::Edit(command) => command.run(root)?,
            Self::Delete(command) => command.run(root)?,
            Self::Generate(command) => command.run(root)?,
            Self::Equipment(command) => command.run(root)?,
            Self::Config(command) => command.run(&root)?,
        }
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Init {}

impl Init {
    #[instrument]
    fn run(root: &Path) -> anyhow::Result<()> {
        let config_path = config_path(root);
        if config_path.exists() {
            anyhow::bail!(
                "Data directory already initialized (found existing {})",
                config_path.display()
            );
        }

        std::fs::create_dir_all(root)
            .map_err(|e| anyhow::anyhow!("Failed to create data directory: {e}"))?;

        brewmate::Config::default()
            .save(&config_path)
            .map_err(|e| anyhow::anyhow!("Failed to create {CONFIG_FILE}: {e}"))?;

        println!("Initialized recipe directory in {}", root.display());
        println!("  Created: {CONFIG_FILE}");
        println!();
        println!("Next steps:");
        println!("  brew equipment --set \"Describe your brewing setup\"");
        println!("  brew new --name \"My First Brew\" --style \"Pale Ale\" --grain \"Pale Malt:5000\" --hop \"Cascade:40:pellets:6.5\"");

        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Delete {
    /// The recipe id, or an unambiguous prefix of it
    id: String,

    /// Skip confirmation prompts
    #[arg(long, short)]
    yes: bool,
}

impl Delete {
    #[instrument]
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let mut store = open_store(&root)?;
        let recipe = store.resolve(&self.id)?;
        let (id, name) = (recipe.id(), recipe.data.name.clone());

        if !self.yes {
            let proceed = Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt(format!("Delete '{name}'?"))
                .default(false)
                .interact()?;
            if !proceed {
                println!("Cancelled");
                return Ok(());
            }
        }

        if store.delete(id)?.is_some() {
            println!("{}", format!("✅ Deleted recipe '{name}'").success());
        }
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct EquipmentCommand {
    /// Replace the description with this text
    #[arg(long, value_name = "TEXT")]
    set: Option<String>,
}

impl EquipmentCommand {
    #[instrument]
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let mut store = open_store(&root)?;

        let Some(description) = self.set else {
            let equipment = store.equipment();
            if equipment.is_blank() {
                println!("No equipment described yet.");
                println!(
                    "{}",
                    "Describe it with `brew equipment --set \"...\"`; it is used as context for \
                     generated recipes."
                        .dim()
                );
            } else {
                println!("{}", equipment.description);
            }
            return Ok(());
        };

        let equipment = Equipment::new(description.trim());
        if let Err(errors) = validate_equipment(&equipment) {
            for error in errors.iter() {
                eprintln!("{}", format!("  • {error}").warning());
            }
            anyhow::bail!("Equipment description is too short");
        }

        store.set_equipment(equipment)?;
        println!("{}", "✅ Equipment saved".success());
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Config {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Debug, clap::Parser)]
enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key to set
        key: String,

        /// Value to set
        value: String,
    },
}

impl Config {
    #[instrument]
    fn run(self, root: &Path) -> anyhow::Result<()> {
        let config_path = config_path(root);
        let mut config = if config_path.exists() {
            brewmate::Config::load(&config_path).map_err(|e| anyhow::anyhow!("{e}"))?
        } else {
            brewmate::Config::default()
        };

        match self.command {
            ConfigCommand::Show => {
                println!("Configuration:");
                println!("  model: {}", config.model());
                println!("  api_base_url: {}", config.api_base_url());
                println!(
                    "  api_key_env: {} ({})",
                    config.api_key_env(),
                    if std::env::var_os(config.api_key_env()).is_some() {
                        "set".dim()
                    } else {
                        "not set".warning()
                    }
                );
                println!("  default_volume: {} L", config.default_volume());
                println!("  timeout: {}s", config.timeout().as_secs());
            }
            ConfigCommand::Set { key, value } => match key.as_str() {
                "model" => {
                    config.set_model(value.clone());
                    config
                        .save(&config_path)
                        .map_err(|e| anyhow::anyhow!("{e}"))?;
                    println!("{}", format!("Model: {value}").success());
                }
                _ => {
                    return Err(anyhow::anyhow!(
                        "Unknown configuration key: '{key}'\nSupported keys: model",
                    ));
                }
            },
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use brewmate::{Grain, Hop, HopFormat, RecipeData};
    use tempfile::tempdir;

    use super::*;

    fn data(name: &str) -> RecipeData {
        RecipeData {
            name: name.to_string(),
            style: "Pale Ale".to_string(),
            volume: 20.0,
            grains: vec![Grain::new("Pale Malt", 5000.0)],
            hops: vec![Hop::new("Citra", 50.0, HopFormat::Pellets, 12.5)],
            ..RecipeData::default()
        }
    }

    #[test]
    fn init_run_writes_default_config() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().join("brews");

        Init::run(&root).expect("init command should succeed");

        let config = brewmate::Config::load(&root.join(CONFIG_FILE)).unwrap();
        assert_eq!(config, brewmate::Config::default());
    }

    #[test]
    fn init_run_refuses_to_overwrite() {
        let tmp = tempdir().unwrap();
        Init::run(tmp.path()).unwrap();

        assert!(Init::run(tmp.path()).is_err());
    }

    #[test]
    fn delete_run_removes_only_the_target() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().to_path_buf();
        let mut store = open_store(&root).unwrap();
        let keep = store.add(data("Keep")).unwrap();
        let doomed = store.add(data("Doomed")).unwrap();

        let delete = Delete {
            id: doomed.id().to_string(),
            yes: true,
        };
        delete.run(root.clone()).expect("delete command should succeed");

        let store = open_store(&root).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.recipes()[0].id(), keep.id());
    }

    #[test]
    fn delete_run_reports_unknown_recipe() {
        let tmp = tempdir().unwrap();
        let delete = Delete {
            id: "ffffffff".to_string(),
            yes: true,
        };

        assert!(delete.run(tmp.path().to_path_buf()).is_err());
    }

    #[test]
    fn equipment_run_saves_description() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().to_path_buf();

        EquipmentCommand {
            set: Some("  50 L electric kettle and conical fermenter ".to_string()),
        }
        .run(root.clone())
        .expect("equipment command should succeed");

        let store = open_store(&root).unwrap();
        assert_eq!(
            store.equipment().description,
            "50 L electric kettle and conical fermenter"
        );
    }

    #[test]
    fn equipment_run_rejects_short_description() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().to_path_buf();

        let result = EquipmentCommand {
            set: Some("pot".to_string()),
        }
        .run(root.clone());

        assert!(result.is_err());
        assert!(open_store(&root).unwrap().equipment().is_blank());
    }

    #[test]
    fn config_set_model_persists() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().to_path_buf();

        Config {
            command: ConfigCommand::Set {
                key: "model".to_string(),
                value: "gemini-1.5-pro".to_string(),
            },
        }
        .run(&root)
        .expect("config command should succeed");

        let config = brewmate::Config::load(&config_path(&root)).unwrap();
        assert_eq!(config.model(), "gemini-1.5-pro");
    }

    #[test]
    fn config_set_rejects_unknown_key() {
        let tmp = tempdir().unwrap();
        let result = Config {
            command: ConfigCommand::Set {
                key: "colour".to_string(),
                value: "red".to_string(),
            },
        }
        .run(tmp.path());

        assert!(result.is_err());
    }

    #[test]
    fn ensure_valid_passes_through_ok() {
        assert!(ensure_valid(Ok(())).is_ok());
    }
}
