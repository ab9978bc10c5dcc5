// Released under MIT License.
// Copyright (c) 2026 AtomicJ developers

//! This module contains the implementation of the `atomicj` binary.

mod config;

use atomicj::errors::ApplicationError;
use atomicj::presentation::{BatchSummary, ProcessingSummary};
use atomicj::prelude::ProcessingModel;
use atomicj::ATOMICJ_VERSION;
use clap::Parser;
use colored::Colorize;
use indexmap::IndexMap;

use config::Config;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = "Prepare batches of AFM force curves for processing: resolve the contact model and calibration, estimate contact points and average the curves."
)]
pub struct Args {
    #[arg(
        help = "Config yaml file",
        long_help = "Configuration yaml file specifying the batches and their settings."
    )]
    pub config: String,

    #[arg(
        long = "silent",
        help = "Only print errors",
        long_help = "Do not print the header and informative messages. Equivalent to 'silent: true' in the configuration file."
    )]
    pub silent: bool,

    #[arg(
        long = "overwrite",
        help = "Overwrite the output file",
        long_help = "Overwrite an existing output file instead of backing it up. Equivalent to 'overwrite: true' in the configuration file."
    )]
    pub overwrite: bool,
}

pub(crate) fn run() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    let config_str = std::fs::read_to_string(&args.config)
        .map_err(|_| ApplicationError::CouldNotReadConfig(args.config.clone()))?;
    let mut config: Config = serde_yaml::from_str(&config_str)
        .map_err(|e| ApplicationError::CouldNotParseConfig(args.config.clone(), e))?;
    config.silent |= args.silent;
    config.overwrite |= args.overwrite;

    if config.silent {
        colog::basic_builder()
            .filter(None, log::LevelFilter::Error)
            .init();
    } else {
        colog::init();
        let header = format!(">>> ATOMICJ v{} <<<", ATOMICJ_VERSION).bold();
        println!("\n{}\n", header);
        log::info!("Read config file '{}'.", args.config);
    }

    let result = prepare(&config, &args.config);

    if !config.silent {
        match &result {
            Ok(_) => {
                let prefix = format!(
                    "{}{}{}",
                    "[".to_string().blue().bold(),
                    "✔".to_string().bright_green().bold(),
                    "]".to_string().blue().bold()
                );
                let message = "BATCHES PREPARED".to_string().bright_green().bold();
                println!("{} {}", prefix, message);
            }
            Err(e) => {
                log::error!("{}", e);

                let prefix = format!(
                    "{}{}{}",
                    "[".to_string().blue().bold(),
                    "✖".to_string().red().bold(),
                    "]".to_string().blue().bold()
                );
                let message = "PREPARATION FAILED".to_string().red().bold();
                println!("{} {}", prefix, message);
            }
        }
    }

    result
}

/// Build all batches of the configuration and write their summary.
fn prepare(config: &Config, config_path: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let defaults = config.processing_defaults()?;

    let mut model = ProcessingModel::new();
    let mut selectors = IndexMap::new();
    for batch_config in &config.batches {
        if model
            .add_batch(batch_config.to_batch(&defaults)?)
            .is_some()
        {
            log::warn!(
                "Batch '{}' is specified more than once. Only the last specification is used.",
                batch_config.name
            );
        }
        selectors.insert(batch_config.name.clone(), batch_config.selector());
    }

    if !model.all_settings_specified() {
        for batch in model.batches().filter(|b| !b.is_settings_specified()) {
            log::warn!("Settings of batch '{}' are not completely specified.", batch.name());
        }
    }

    let mut summary = ProcessingSummary::new();
    for (name, selector) in selectors.iter_mut() {
        let batch = model.batch(name)?;
        let packs = batch.build_processing_batch(selector)?;
        summary.add_batch(
            batch.name(),
            BatchSummary::new(batch.name(), &packs, defaults.averaging())?,
        );
    }

    summary.write_yaml(&config.output, config_path, config.overwrite)?;
    Ok(())
}
