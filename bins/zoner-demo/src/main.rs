mod model;

use clap::Parser;
use zoner_api::Value;
use zoner_engine::{Mapper, MapperConfig, ProvenanceProcessor};

use crate::model::CompanyWire;

#[derive(Parser)]
#[command(name = "zoner-demo", about = "Convert a sample company graph into its wire model")]
struct Cli {
    /// Path to TOML mapper configuration.
    #[arg(long, env = "ZONER_CONFIG")]
    config: Option<String>,

    /// Id of the generated company.
    #[arg(long, default_value = "C1")]
    company_id: String,

    /// Number of generated staff members.
    #[arg(long, default_value_t = 2)]
    employees: usize,

    /// Log every value the mapper reads and writes.
    #[arg(long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "info,zoner=trace" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!(config = %path, "loading configuration");
            match MapperConfig::load(path) {
                Ok(c) => c,
                Err(e) => {
                    tracing::error!(error = %e, "failed to load config");
                    std::process::exit(1);
                }
            }
        }
        None => MapperConfig::default(),
    };
    if cli.verbose {
        config.logging.verbose = true;
    }

    let source = model::sample(&cli.company_id, cli.employees);
    tracing::info!(
        company = %cli.company_id,
        employees = cli.employees,
        descend = ?config.descend,
        overrides = config.fields.len(),
        "converting company"
    );

    let mut provenance = ProvenanceProcessor::new();
    let mut mapper = match Mapper::builder()
        .with_config(&config)
        .processor(&mut provenance)
        .build_from(&source)
    {
        Ok(m) => m,
        Err(e) => {
            tracing::error!(error = %e, "failed to bind mapper");
            std::process::exit(1);
        }
    };

    let target = match mapper.convert_into::<CompanyWire>() {
        Ok(t) => t,
        Err(e) => {
            tracing::error!(error = %e, "conversion failed");
            std::process::exit(1);
        }
    };
    let cached = mapper.cache().len();
    drop(mapper);

    tracing::info!(
        fields = provenance.records().len(),
        cached,
        "conversion finished"
    );
    for record in provenance.records() {
        tracing::debug!(path = %record.path, owner = record.owner, "processed");
    }

    let json = Value::Object(target.to_object()).to_json();
    match serde_json::to_string_pretty(&json) {
        Ok(s) => println!("{s}"),
        Err(e) => {
            tracing::error!(error = %e, "failed to render target");
            std::process::exit(1);
        }
    }
}
