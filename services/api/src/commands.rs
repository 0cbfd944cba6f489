use crate::infra::{build_advisor, open_catalog};
use clap::Args;
use std::path::PathBuf;
use uni_directory::ai::{AdvisorRequest, RecommendationSource};
use uni_directory::config::AppConfig;
use uni_directory::error::AppError;
use uni_directory::seed::CatalogSeeder;
use uni_directory::telemetry;

#[derive(Args, Debug)]
pub(crate) struct SeedArgs {
    /// JSON file holding an array of universities with nested programs and admission
    #[arg(long)]
    pub(crate) file: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct RecommendArgs {
    /// Applicant ENT score (0-140)
    #[arg(long)]
    pub(crate) ent_score: i64,
    /// Profile subjects, e.g. "Math, Physics"
    #[arg(long, default_value = "")]
    pub(crate) profile_subjects: String,
    #[arg(long, default_value = "")]
    pub(crate) interests: String,
    #[arg(long, default_value = "")]
    pub(crate) preferred_city: String,
    #[arg(long, default_value = "")]
    pub(crate) career_goal: String,
}

impl From<RecommendArgs> for AdvisorRequest {
    fn from(args: RecommendArgs) -> Self {
        AdvisorRequest {
            ent_score: args.ent_score,
            profile_subjects: args.profile_subjects,
            interests: args.interests,
            preferred_city: args.preferred_city,
            career_goal: args.career_goal,
        }
    }
}

pub(crate) fn run_seed(args: SeedArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let catalog = open_catalog(&config)?;
    let summary = CatalogSeeder::from_path(&args.file, catalog.as_ref())?;

    println!(
        "Seeded {} universities, {} programs, {} admission records into {}",
        summary.universities,
        summary.programs,
        summary.admissions,
        config.database.path.display()
    );
    Ok(())
}

pub(crate) async fn run_recommend(args: RecommendArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let catalog = open_catalog(&config)?;
    let advisor = build_advisor(&config, catalog)?;
    let (recommendation, source) = advisor.recommend_with_source(args.into()).await?;

    println!("Recommended university: {}", recommendation.university_name);
    println!("Reason: {}", recommendation.short_reason);
    println!("Source: {}", source_label(source));
    Ok(())
}

fn source_label(source: RecommendationSource) -> &'static str {
    match source {
        RecommendationSource::Model => "model",
        RecommendationSource::CityMatch => "fallback (preferred city)",
        RecommendationSource::FirstAvailable => "fallback (first available)",
    }
}
