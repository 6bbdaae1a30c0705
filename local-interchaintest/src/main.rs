use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use covenant_ictest::{
    tests::{ibc_paths::ibc_paths::test_ibc_paths_on, scenario, Scenario, SCENARIOS},
    utils::{
        constants::{
            API_URL, ASTROPORT_PATH, CHAIN_CONFIG_PATH, GAIA_CHAIN, LOCAL_CODE_ID_CACHE_PATH,
            NEUTRON_CHAIN, NEUTRON_GAIA_PATH, VALENCE_PATH,
        },
        file_system::{read_chains_config, write_chains_config},
        genesis::patch_known_chains,
        polling::{PollConfig, DEFAULT_POLL_ATTEMPTS},
        test_context::{ArtifactPaths, TestContext},
    },
};
use localic_std::polling::poll_for_start;
use log::{error, info};
use reqwest::blocking::Client;

// local-ic start neutron_gaia_stride --api-port 42069
#[derive(Parser, Debug)]
#[command(name = "covenant-ictest")]
#[command(about = "End-to-end covenant scenarios against a running local-interchain")]
struct Args {
    /// local-interchain API
    #[arg(long, default_value = API_URL)]
    api: String,

    /// Chain configuration the chains were started with
    #[arg(long, default_value = CHAIN_CONFIG_PATH)]
    config: String,

    /// Directory with the covenant contract artifacts
    #[arg(long, default_value = VALENCE_PATH)]
    artifacts: String,

    #[arg(long, default_value = ASTROPORT_PATH)]
    astroport_artifacts: String,

    #[arg(long, default_value = LOCAL_CODE_ID_CACHE_PATH)]
    code_id_cache: String,

    /// Scenario to run; repeat to run several. Runs all when omitted
    #[arg(long = "suite")]
    suites: Vec<String>,

    #[arg(long, default_value_t = DEFAULT_POLL_ATTEMPTS)]
    poll_attempts: u32,

    /// Seconds between two polls
    #[arg(long, default_value_t = 1)]
    poll_interval: u64,

    /// Relayer path the ibc_paths scenario opens a new channel on
    #[arg(long, default_value = NEUTRON_GAIA_PATH)]
    relayer_path: String,

    /// Write `--config` with the genesis patches applied to this path and exit
    #[arg(long)]
    write_config: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut configured_chains = read_chains_config(&args.config)
        .with_context(|| format!("failed to read chain config {}", args.config))?;

    if let Some(path) = &args.write_config {
        patch_known_chains(&mut configured_chains)?;
        write_chains_config(path, &configured_chains)
            .with_context(|| format!("failed to write chain config {path}"))?;
        return Ok(());
    }

    let selected = select_scenarios(&args.suites)?;
    let poll = PollConfig::new(args.poll_attempts, Duration::from_secs(args.poll_interval));

    let client = Client::new();
    poll_for_start(&client, &args.api, args.poll_attempts);

    let mut test_ctx = TestContext::new(&args.api, &configured_chains)
        .context("failed to set up the test context")?
        .with_artifacts(ArtifactPaths {
            valence: args.artifacts.clone(),
            astroport: args.astroport_artifacts.clone(),
            code_id_cache: args.code_id_cache.clone(),
        });

    let mut failed = vec![];
    for &(name, run) in &selected {
        info!("=== {name} ===");
        let outcome = if name == "ibc_paths" {
            test_ibc_paths_on(
                &mut test_ctx,
                &poll,
                NEUTRON_CHAIN,
                GAIA_CHAIN,
                &args.relayer_path,
            )
        } else {
            run(&mut test_ctx, &poll)
        };

        match outcome {
            Ok(()) => info!("{name}: passed"),
            Err(e) => {
                error!("{name}: failed: {e}");
                failed.push(name);
            }
        }
    }

    info!(
        "{} of {} scenarios passed",
        selected.len() - failed.len(),
        selected.len()
    );
    if !failed.is_empty() {
        bail!("failed scenarios: {}", failed.join(", "));
    }

    Ok(())
}

/// Requested scenarios in run order; all of them when none is requested.
fn select_scenarios(requested: &[String]) -> Result<Vec<(&'static str, Scenario)>> {
    if let Some(unknown) = requested.iter().find(|name| scenario(name).is_none()) {
        let known: Vec<&str> = SCENARIOS.iter().map(|(n, _)| *n).collect();
        bail!("unknown scenario {unknown}, expected one of {}", known.join(", "));
    }

    Ok(SCENARIOS
        .iter()
        .filter(|(name, _)| {
            requested.is_empty() || requested.iter().any(|r| r.as_str() == *name)
        })
        .copied()
        .collect())
}
