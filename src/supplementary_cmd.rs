//! Supplementary command: sample sizes and mean household figures per
//! segment.

use anyhow::{Context, Result};
use tracing::{info, info_span};

use meterstat_context::supplementary_rows;
use meterstat_sdc::write_supplementary_csv;

use crate::cli::SupplementaryArgs;
use crate::config::MeterstatConfig;
use crate::convert;
use crate::inputs::load_context;

/// Build and write the supplementary table for one year's context.
pub fn run(args: SupplementaryArgs) -> Result<()> {
    let _cmd = info_span!("supplementary", year = args.year).entered();
    let config = MeterstatConfig::load(&args.config)?;
    let names = convert::build_file_names(&config.io.files);
    let segmentation = convert::build_segmentation_config(&config.segmentation)?;

    let context = load_context(&config.io.input_dir, &names, args.year)?;
    let rows = supplementary_rows(&context, segmentation.variables(), segmentation.bands());

    std::fs::create_dir_all(&config.io.output_dir)
        .with_context(|| format!("failed to create {}", config.io.output_dir.display()))?;
    let path = config.io.output_dir.join(&names.supplementary);
    write_supplementary_csv(&path, &rows)?;
    info!(path = %path.display(), n_rows = rows.len(), "supplementary table written");
    Ok(())
}
