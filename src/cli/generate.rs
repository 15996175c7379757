use std::{io::Write, path::PathBuf, time::Duration};

use anyhow::Context;
use brewmate::{
    BrewRequest, Config, GeminiBackend, RecipeData, RecipeGenerator,
    domain::validation::validate_draft, generator::CompletionBackend,
};
use clap::{Parser, ValueEnum};
use dialoguer::{Confirm, theme::ColorfulTheme};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::instrument;

use super::{show, terminal::Colorize};

#[derive(Debug, Parser)]
#[command(about = "Ask a language model for a recipe draft")]
pub struct Generate {
    /// What you'd like to brew, in your own words
    #[arg(conflicts_with_all = ["style", "ingredients"])]
    query: Option<String>,

    /// The style to brew; left to the model if omitted
    #[arg(long, requires = "ingredients")]
    style: Option<String>,

    /// The ingredients you have at hand
    #[arg(long)]
    ingredients: Option<String>,

    /// Your brewing equipment; defaults to the stored equipment description
    #[arg(long, requires = "ingredients")]
    equipment: Option<String>,

    /// Save the draft without asking
    #[arg(long)]
    save: bool,

    /// Output format for the draft
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
    #[default]
    Pretty,
    Json,
}

impl Generate {
    #[instrument(skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let config = Config::load_or_default(&super::config_path(&root));
        let backend = GeminiBackend::from_config(&config)?;
        tracing::info!("Using model {}", backend.model());
        self.run_with(root, &config, backend, &mut std::io::stdout().lock())
    }

    /// Run against any completion backend, writing the draft preview to `out`.
    fn run_with<C: CompletionBackend>(
        self,
        root: PathBuf,
        config: &Config,
        backend: C,
        out: &mut impl Write,
    ) -> anyhow::Result<()> {
        let mut store = super::open_store(&root)?;
        let request = self.request(&store.equipment().description)?;

        let generator = RecipeGenerator::new(backend);
        let draft = with_spinner("Brewing up a recipe...", || generator.generate(&request));
        let draft = draft.context("failed to generate a recipe")?;

        let notes = draft.provenance(&request);
        let preview = match self.output {
            OutputFormat::Pretty => None,
            OutputFormat::Json => Some(
                serde_json::to_string_pretty(&draft).context("failed to render json output")?
                    + "\n",
            ),
        };
        let data = draft.into_recipe_data(config.default_volume(), Some(notes));
        let preview = preview.unwrap_or_else(|| show::render_data(&data));
        out.write_all(preview.as_bytes())?;
        out.flush()?;

        // Checked before asking, so a draft that cannot be stored is never offered.
        super::ensure_valid(validate_draft(&data))?;

        if !self.save && !confirm_save()? {
            println!("{}", "Draft discarded".dim());
            return Ok(());
        }

        save(&mut store, data)
    }

    fn request(&self, stored_equipment: &str) -> anyhow::Result<BrewRequest> {
        if let Some(ingredients) = &self.ingredients {
            return Ok(BrewRequest::Structured {
                style: self.style.clone().unwrap_or_default(),
                ingredients: ingredients.clone(),
                equipment: self
                    .equipment
                    .clone()
                    .unwrap_or_else(|| stored_equipment.to_string()),
            });
        }
        match &self.query {
            Some(query) => Ok(BrewRequest::Query(query.clone())),
            None => anyhow::bail!("Describe the beer you'd like, or pass --ingredients"),
        }
    }
}

fn with_spinner<T>(message: &'static str, task: impl FnOnce() -> T) -> T {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = task();

    spinner.finish_and_clear();
    result
}

fn confirm_save() -> anyhow::Result<bool> {
    Ok(Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("Save this recipe?")
        .default(true)
        .interact()?)
}

fn save<B: brewmate::storage::Backend>(
    store: &mut brewmate::RecipeStore<B>,
    data: RecipeData,
) -> anyhow::Result<()> {
    let recipe = store.add(data)?;
    println!(
        "{}",
        format!("✅ Saved recipe {} ({})", recipe.data.name, recipe.id()).success()
    );
    Ok(())
}
