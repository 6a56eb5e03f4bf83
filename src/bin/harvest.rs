use anyhow::Result;

use nfl_gamelog::config::PipelineConfig;
use nfl_gamelog::logging::init_logging;
use nfl_gamelog::pipeline::{print_harvest_summary, run_harvest};

fn main() -> Result<()> {
    init_logging()?;
    let cfg = PipelineConfig::load()?;
    let summary = run_harvest(&cfg)?;
    print_harvest_summary(&cfg, &summary);
    Ok(())
}
