use clap::{Parser, Subcommand};
use rehab_core::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rehab")]
#[command(about = "Rehabilitation exercise recommendation engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override catalog CSV path
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend a dosed exercise plan for a clinical profile
    Recommend {
        /// Injury area, e.g. knee, shoulder, spine/core
        #[arg(long)]
        area: String,

        /// Pain severity, 1 (mild) to 10 (worst)
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=10))]
        severity: u8,

        /// Pain character (sharp, dull, throbbing, burning, stiffness,
        /// aching, radiating, cramping, tingling)
        #[arg(long)]
        pain_type: PainType,

        /// Available equipment; repeat for multiple items
        #[arg(long = "equipment")]
        equipment: Vec<String>,

        /// Number of exercises to aim for (defaults by severity)
        #[arg(long)]
        count: Option<usize>,

        /// Seed reserved for sampling variants
        #[arg(long)]
        seed: Option<u64>,

        /// Emit the plan as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Load the catalog and report per-area coverage and advisory issues
    Validate,

    /// Write a full default config file for editing
    InitConfig {
        /// Destination path (defaults to the standard config location)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    rehab_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let catalog_path = cli
        .catalog
        .unwrap_or_else(|| config.catalog.path.clone());

    match cli.command {
        Commands::Recommend {
            area,
            severity,
            pain_type,
            equipment,
            count,
            seed,
            json,
        } => cmd_recommend(
            &catalog_path,
            &config,
            area,
            severity,
            pain_type,
            equipment,
            count,
            seed,
            json,
        ),
        Commands::Validate => cmd_validate(&catalog_path),
        Commands::InitConfig { path } => cmd_init_config(&config, path),
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_recommend(
    catalog_path: &PathBuf,
    config: &Config,
    area: String,
    severity: u8,
    pain_type: PainType,
    equipment: Vec<String>,
    count: Option<usize>,
    seed: Option<u64>,
    json: bool,
) -> Result<()> {
    let catalog = Catalog::load_csv(catalog_path)?;

    // config equipment plus anything passed on the command line
    let mut available_equipment = config.equipment.available.clone();
    available_equipment.extend(equipment);

    let request = RecommendationRequest {
        injury_area: area,
        severity,
        pain_type,
        available_equipment,
        desired_count: count,
        seed,
        patient_history: None,
    };

    let engine = Recommender::new(&catalog, &config.knowledge);
    let plan = engine.recommend(&request);

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    if plan.is_empty() {
        println!("No suitable exercises found for this profile.");
        return Ok(());
    }

    display_plan(&request, &plan);
    Ok(())
}

fn cmd_validate(catalog_path: &PathBuf) -> Result<()> {
    let catalog = Catalog::load_csv(catalog_path)?;

    println!("Catalog: {}", catalog_path.display());
    println!("  {} exercise definitions", catalog.len());
    for (area, count) in catalog.area_counts() {
        println!("    {area}: {count}");
    }

    let issues = catalog.validate();
    if issues.is_empty() {
        println!("✓ No advisory issues found");
    } else {
        println!("{} advisory issue(s):", issues.len());
        for issue in &issues {
            println!("  - {issue}");
        }
    }

    Ok(())
}

fn cmd_init_config(config: &Config, path: Option<PathBuf>) -> Result<()> {
    let path = path.unwrap_or_else(Config::default_config_path);
    config.save_to(&path)?;
    println!("✓ Wrote config to {}", path.display());
    Ok(())
}

fn display_plan(request: &RecommendationRequest, plan: &[Recommendation]) {
    println!("\n╭─────────────────────────────────────────╮");
    println!(
        "│  PLAN — {}, severity {}/10, {} pain",
        request.injury_area, request.severity, request.pain_type
    );
    println!("╰─────────────────────────────────────────╯");

    for (i, rec) in plan.iter().enumerate() {
        println!();
        println!("  {}. {}  [{}]", i + 1, rec.exercise_name, rec.kind);

        match rec.dosage {
            Dosage::Repetition { sets, reps } => {
                println!("     {} sets × {} reps", sets, reps);
            }
            Dosage::Hold { sets, hold_seconds } => {
                println!("     {} sets × {} second hold", sets, hold_seconds);
            }
        }

        println!(
            "     area: {}   difficulty: {}   confidence: {:.3}",
            rec.target_area, rec.difficulty, rec.confidence
        );

        if rec.equipment != "none" {
            println!("     equipment: {}", rec.equipment);
        }

        if !rec.description.is_empty() {
            println!("     {}", rec.description);
        }

        if !rec.rationale.is_empty() {
            println!("     why: {}", rec.rationale.join("; "));
        }

        if !rec.progressions.is_empty() {
            println!("     progress to: {}", rec.progressions.join(", "));
        }
    }

    println!();
}
