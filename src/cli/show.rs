use std::path::PathBuf;

use anyhow::Context;
use brewmate::{Recipe, RecipeData, domain::ingredient_list::render_rows};
use chrono::{DateTime, Utc};
use clap::{Parser, ValueEnum};
use tracing::instrument;

use super::terminal::{Colorize, swatch};

#[derive(Debug, Parser)]
#[command(about = "Display the full contents of a recipe")]
pub struct Show {
    /// The recipe id, or an unambiguous prefix of it
    id: String,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
    #[default]
    Pretty,
    Json,
}

impl Show {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let store = super::open_store(&root)?;
        let recipe = store.resolve(&self.id)?;

        match self.output {
            OutputFormat::Pretty => print!("{}", render(recipe)),
            OutputFormat::Json => {
                let json =
                    serde_json::to_string_pretty(recipe).context("failed to render json output")?;
                println!("{json}");
            }
        }

        Ok(())
    }
}

/// The detail view of a stored recipe.
pub fn render(recipe: &Recipe) -> String {
    let mut out = render_data(&recipe.data);

    out.push_str(&format!("\n{}\n", "Record".dim()));
    out.push_str(&format!("  ID:       {}\n", recipe.id()));
    if let Some(created) = recipe.created_at() {
        out.push_str(&format!(
            "  Created:  {}\n",
            created.format("%Y-%m-%d %H:%M UTC")
        ));
    }

    out
}

/// The detail view of recipe contents, stored or not.
pub fn render_data(data: &RecipeData) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}\n", format!("# {}", data.name).heading()));
    out.push_str(&format!("{} · {} L\n", data.style, data.volume));

    out.push_str(&format!("\n{}\n", "Statistics".dim()));
    let stats = [
        ("OG", data.initial_gravity.map(|g| format!("{g:.3}"))),
        ("FG", data.final_gravity.map(|g| format!("{g:.3}"))),
        ("EBC", data.color_ebc.map(|c| c.to_string())),
        ("IBU", data.bitterness_ibu.map(|b| b.to_string())),
        ("ABV", data.alcohol_abv.map(|a| format!("{a}%"))),
    ];
    for (label, value) in stats {
        let value = value.unwrap_or_else(|| "-".to_string());
        out.push_str(&format!("  {label:<9} {value}\n"));
    }
    let color = brewmate::BeerColor::from_ebc(data.color_ebc.map(f64::from));
    out.push_str(&format!("  {:<9} {}\n", "Colour", swatch(color)));

    let milestones = [
        ("Fermentation", data.fermentation_start_date),
        ("Bottling", data.bottling_date),
        ("Conditioning", data.conditioning_start_date),
        ("Tasting", data.tasting_date),
    ];
    if milestones.iter().any(|(_, date)| date.is_some()) {
        out.push_str(&format!("\n{}\n", "Milestones".dim()));
        for (label, date) in milestones {
            if let Some(date) = date {
                out.push_str(&format!("  {label:<13} {}\n", format_date(date)));
            }
        }
    }

    section(
        &mut out,
        "Grains",
        render_rows(&data.grains, |i, grain| {
            format!("{}. {} - {} g  [{}]", i + 1, grain.name, grain.weight, grain.id)
        }),
    );
    section(
        &mut out,
        "Hops",
        render_rows(&data.hops, |i, hop| {
            format!(
                "{}. {} - {} g, {}, {}% AA  [{}]",
                i + 1,
                hop.name,
                hop.weight,
                hop.format,
                hop.alpha_acid,
                hop.id
            )
        }),
    );
    section(
        &mut out,
        "Yeast",
        data.yeast
            .iter()
            .map(|yeast| {
                format!(
                    "{} ({}) - {}  [{}]",
                    yeast.name, yeast.kind, yeast.weight, yeast.id
                )
            })
            .collect(),
    );
    section(
        &mut out,
        "Additional ingredients",
        render_rows(&data.additional_ingredients, |i, extra| {
            let description = extra
                .description
                .as_deref()
                .map(|d| format!(" ({d})"))
                .unwrap_or_default();
            format!(
                "{}. {} - {}{description}  [{}]",
                i + 1,
                extra.name,
                extra.weight,
                extra.id
            )
        }),
    );

    for (title, text) in [("Notes", &data.notes), ("Instructions", &data.instructions)] {
        if let Some(text) = text.as_deref().filter(|t| !t.trim().is_empty()) {
            out.push_str(&format!("\n{}\n", title.dim()));
            for line in text.lines() {
                out.push_str(&format!("  {line}\n"));
            }
        }
    }

    out
}

fn section(out: &mut String, title: &str, lines: Vec<String>) {
    if lines.is_empty() {
        return;
    }
    out.push_str(&format!("\n{}\n", title.dim()));
    for line in lines {
        out.push_str(&format!("  {line}\n"));
    }
}

fn format_date(date: DateTime<Utc>) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use brewmate::{Grain, Hop, HopFormat, Yeast, YeastType};
    use chrono::TimeZone;
    use tempfile::tempdir;

    use super::*;

    fn data() -> RecipeData {
        RecipeData {
            name: "Dark Matter".to_string(),
            style: "Brown Ale".to_string(),
            volume: 20.0,
            color_ebc: Some(50),
            alcohol_abv: Some(5.2),
            grains: vec![Grain::new("Maris Otter", 4000.0)],
            hops: vec![Hop::new("Fuggles", 40.0, HopFormat::Cones, 4.5)],
            yeast: Some(Yeast::new("S-04", YeastType::Ale, 11.5)),
            bottling_date: Some(Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()),
            instructions: Some("Mash at 67C.\nBoil 60 minutes.".to_string()),
            ..RecipeData::default()
        }
    }

    #[test]
    fn render_data_shows_every_section() {
        let text = render_data(&data());

        assert!(text.contains("# Dark Matter"));
        assert!(text.contains("Brown Ale · 20 L"));
        assert!(text.contains("brown (#8B422A)"));
        assert!(text.contains("1. Maris Otter - 4000 g"));
        assert!(text.contains("1. Fuggles - 40 g, Cones, 4.5% AA"));
        assert!(text.contains("S-04 (Ale) - 11.5"));
        assert!(text.contains("Bottling      2025-03-01"));
        assert!(text.contains("  Boil 60 minutes."));
        assert!(!text.contains("Additional ingredients"));
        assert!(!text.contains("Notes"));
    }

    #[test]
    fn missing_statistics_render_as_dashes() {
        let mut data = data();
        data.color_ebc = None;

        let text = render_data(&data);

        assert!(text.contains("OG        -"));
        assert!(text.contains("pale straw (#F8F753)"));
    }

    #[test]
    fn show_run_resolves_prefix() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().to_path_buf();
        let mut store = crate::cli::open_store(&root).unwrap();
        let recipe = store.add(data()).unwrap();

        let show = Show {
            id: recipe.id().to_string()[..8].to_string(),
            output: OutputFormat::Json,
        };

        show.run(root).expect("show command should succeed");
    }

    #[test]
    fn show_run_reports_unknown_id() {
        let tmp = tempdir().unwrap();

        let show = Show {
            id: "deadbeef".to_string(),
            output: OutputFormat::Pretty,
        };

        let error = show.run(tmp.path().to_path_buf()).unwrap_err();
        assert!(error.to_string().contains("not found"));
    }
}
