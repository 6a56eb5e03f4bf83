use anyhow::{Result, anyhow};

use nfl_gamelog::config::PipelineConfig;
use nfl_gamelog::logging::init_logging;
use nfl_gamelog::pipeline::{print_normalize_summary, run_normalize};

fn main() -> Result<()> {
    init_logging()?;
    let cfg = PipelineConfig::load()?;
    if !cfg.raw_path.exists() {
        return Err(anyhow!(
            "raw table {} not found; run `harvest` first or pass --raw <path>",
            cfg.raw_path.display()
        ));
    }
    let summary = run_normalize(&cfg)?;
    print_normalize_summary(&summary);
    Ok(())
}
