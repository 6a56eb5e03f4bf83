use anyhow::Result;

use nfl_gamelog::config::PipelineConfig;
use nfl_gamelog::logging::init_logging;
use nfl_gamelog::pipeline::{
    print_harvest_summary, print_normalize_summary, run_harvest, run_normalize,
};

fn main() -> Result<()> {
    init_logging()?;
    let cfg = PipelineConfig::load()?;

    let harvest = run_harvest(&cfg)?;
    print_harvest_summary(&cfg, &harvest);

    let normalize = run_normalize(&cfg)?;
    print_normalize_summary(&normalize);
    Ok(())
}
