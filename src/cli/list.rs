use std::path::PathBuf;

use anyhow::Context;
use brewmate::Recipe;
use clap::{Parser, ValueEnum};
use tracing::instrument;

use super::terminal::{self, Colorize};

/// Shown instead of a table when no recipes are stored.
pub const EMPTY_STATE: &str = "No recipes yet.";
const EMPTY_STATE_HINT: &str =
    "Create one with `brew new`, or ask for a draft with `brew generate \"<what you'd like>\"`.";

/// Command arguments for `brew list`.
#[derive(Debug, Default, Parser)]
#[command(about = "List stored recipes")]
pub struct List {
    /// Sort order (default: newest first).
    #[arg(long, value_enum, default_value_t)]
    sort: SortOrder,

    /// Output format (default: table).
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

/// Supported output formats.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Sort orders.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Default)]
pub enum SortOrder {
    /// Most recently created first; recipes without a date last.
    #[default]
    Newest,
    /// Least recently created first; recipes without a date last.
    Oldest,
    /// Alphabetical by name, ignoring case.
    Name,
    /// The order recipes were added in.
    Insertion,
}

impl List {
    #[instrument(level = "debug", skip_all)]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let store = super::open_store(&root)?;
        let recipes = sorted(store.recipes(), self.sort);

        print!("{}", render(&recipes, self.output, terminal::is_narrow())?);
        Ok(())
    }
}

fn render(recipes: &[&Recipe], output: OutputFormat, narrow: bool) -> anyhow::Result<String> {
    match output {
        OutputFormat::Table if recipes.is_empty() => {
            Ok(format!("{EMPTY_STATE}\n{}\n", EMPTY_STATE_HINT.dim()))
        }
        OutputFormat::Table => Ok(render_table(recipes, narrow)),
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(recipes).context("failed to render json output")?;
            Ok(format!("{json}\n"))
        }
    }
}

fn sorted(recipes: &[Recipe], order: SortOrder) -> Vec<&Recipe> {
    let mut rows: Vec<&Recipe> = recipes.iter().collect();
    match order {
        SortOrder::Insertion => {}
        SortOrder::Newest => rows.sort_by(|a, b| Recipe::newest_first(a, b)),
        SortOrder::Oldest => rows.sort_by(|a, b| Recipe::oldest_first(a, b)),
        SortOrder::Name => rows.sort_by_cached_key(|recipe| recipe.data.name.to_lowercase()),
    }
    rows
}

fn render_table(recipes: &[&Recipe], narrow: bool) -> String {
    let headers: &[&str] = if narrow {
        &["ID", "NAME", "ABV"]
    } else {
        &["ID", "NAME", "STYLE", "ABV", "COLOUR", "CREATED"]
    };

    let data: Vec<Vec<String>> = recipes
        .iter()
        .map(|recipe| {
            let id = recipe.id().to_string()[..8].to_string();
            let abv = recipe
                .data
                .alcohol_abv
                .map_or_else(|| "-".to_string(), |abv| format!("{abv}%"));
            if narrow {
                return vec![id, recipe.data.name.clone(), abv];
            }
            let colour = if recipe.data.color_ebc.is_some() {
                recipe.beer_color().name().to_string()
            } else {
                "-".to_string()
            };
            let created = recipe
                .created_at()
                .map_or_else(|| "-".to_string(), |c| c.format("%Y-%m-%d").to_string());
            vec![
                id,
                recipe.data.name.clone(),
                recipe.data.style.clone(),
                abv,
                colour,
                created,
            ]
        })
        .collect();

    // Determine column widths for alignment.
    let widths = headers
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            data.iter()
                .map(|row| row[idx].chars().count())
                .max()
                .unwrap_or(0)
                .max(header.len())
        })
        .collect::<Vec<_>>();

    let mut out = pad_row(headers.iter().map(ToString::to_string), &widths);
    out.push_str(&pad_row(widths.iter().map(|width| "-".repeat(*width)), &widths));
    for row in data {
        out.push_str(&pad_row(row, &widths));
    }
    out
}

fn pad_row(cells: impl IntoIterator<Item = String>, widths: &[usize]) -> String {
    let line = cells
        .into_iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    format!("{}\n", line.trim_end())
}
