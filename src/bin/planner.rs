//! Smart Agriculture Planner CLI
//!
//! Usage:
//!     planner plan --image samples/soil_clay.jpg --area 2 --water-budget 300
//!     planner soil --soil-type sandy --moisture 15 --ph 7.0 --format text

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use smart_planner_rust::error::{parse_number, parse_optional_number};
use smart_planner_rust::report::render_text;
use smart_planner_rust::{PlannerConfig, RecommendationRequest, RecommendationResult, Recommender, SoilParams};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Image name used when `plan` runs without an image
const PLACEHOLDER_IMAGE: &str = "placeholder.jpg";

#[derive(Parser, Debug)]
#[command(name = "planner", about = "Smart Agriculture Planner")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Alternative crop knowledge base (JSON)
    #[arg(long, global = true, env = "CROP_DB_PATH")]
    crop_db: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Infer soil from an image filename and suggest crops
    Plan {
        /// Path to soil image (optional)
        #[arg(long)]
        image: Option<String>,

        #[command(flatten)]
        plot: PlotArgs,
    },
    /// Suggest crops from manually entered soil properties
    Soil {
        /// Soil type (loam, sandy, clay, silty); anything else is treated as loam
        #[arg(long, default_value = "loam")]
        soil_type: String,

        /// Texture (fine, balanced, coarse)
        #[arg(long)]
        texture: Option<String>,

        /// Moisture percentage
        #[arg(long)]
        moisture: Option<String>,

        /// Soil pH
        #[arg(long)]
        ph: Option<String>,

        #[command(flatten)]
        plot: PlotArgs,
    },
}

#[derive(Args, Debug)]
struct PlotArgs {
    /// Area in acres
    #[arg(long, default_value = "1")]
    area: String,

    /// Max water budget in L/day
    #[arg(long)]
    water_budget: Option<String>,

    /// Number of crops to suggest
    #[arg(long, env = "DEFAULT_TOP_N")]
    top_n: Option<usize>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Json,
    Text,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "smart_planner_rust=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = PlannerConfig {
        crop_db_path: cli.crop_db.clone(),
        ..PlannerConfig::default()
    };
    let recommender = Recommender::new(Arc::new(config.load_knowledge_base()?));

    let request = match cli.command {
        Command::Plan { image, plot } => {
            let image = image.unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string());
            plot.apply(RecommendationRequest::from_image(image), config.default_top_n)?
        }
        Command::Soil {
            soil_type,
            texture,
            moisture,
            ph,
            plot,
        } => {
            let params = SoilParams::from_raw(
                &soil_type,
                texture.as_deref(),
                moisture.as_deref(),
                ph.as_deref(),
            )?;
            plot.apply(RecommendationRequest::from_params(params), config.default_top_n)?
        }
    };

    let result = recommender.recommend(&request);
    print_result(&result, cli.format)?;

    Ok(())
}

impl PlotArgs {
    fn apply(&self, request: RecommendationRequest, default_top_n: usize) -> Result<RecommendationRequest> {
        let area = parse_number("area", &self.area)?;
        let water_budget = parse_optional_number("water_budget", self.water_budget.as_deref())?;
        Ok(request
            .with_area(area)
            .with_water_budget(water_budget)
            .with_top_n(self.top_n.unwrap_or(default_top_n)))
    }
}

fn print_result(result: &RecommendationResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(result)?),
        OutputFormat::Text => print!("{}", render_text(result)),
    }
    Ok(())
}
