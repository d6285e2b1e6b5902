//! Pure conversion functions: TOML config structs -> crate API config types.

use anyhow::{Context, Result, bail};

use crate::config::*;

use meterstat_context::SegmentVariable;
use meterstat_household::{ProfileConfig, TemperatureBand};
use meterstat_io::{Compression, FileNames, Granularity, WriterConfig};
use meterstat_sdc::{HistogramConfig, Resolution, SdcConfig, SegmentationConfig};
use meterstat_stats::NearestQuantile;

/// Parses a compression algorithm name string into the corresponding enum variant.
pub fn parse_compression(s: &str) -> Result<Compression> {
    match s.to_lowercase().as_str() {
        "none" => Ok(Compression::None),
        "snappy" => Ok(Compression::Snappy),
        "zstd" => Ok(Compression::Zstd),
        other => bail!("unknown compression: {other:?}"),
    }
}

/// Parses a granularity name (`daily` or `half-hourly`).
pub fn parse_granularity(s: &str) -> Result<Granularity> {
    match s.to_lowercase().as_str() {
        "daily" => Ok(Granularity::Daily),
        "half-hourly" | "half_hourly" | "hh" => Ok(Granularity::HalfHourly),
        other => bail!("unknown granularity: {other:?}"),
    }
}

/// Parses the configured granularities, keeping their order and dropping
/// repeats.
pub fn parse_granularities(io: &IoConfig) -> Result<Vec<Granularity>> {
    let mut out = Vec::new();
    for s in &io.granularities {
        let g = parse_granularity(s)?;
        if !out.contains(&g) {
            out.push(g);
        }
    }
    Ok(out)
}

/// Parses the configured statistics resolutions.
pub fn parse_resolutions(seg: &SegmentationToml) -> Result<Vec<Resolution>> {
    seg.resolutions
        .iter()
        .map(|s| s.parse::<Resolution>().context("in [segmentation].resolutions"))
        .collect()
}

/// Years from the command line, falling back to `[io].years`.
pub fn resolve_years(cli: &[i32], io: &IoConfig) -> Result<Vec<i32>> {
    let mut years = if cli.is_empty() {
        io.years.clone()
    } else {
        cli.to_vec()
    };
    if years.is_empty() {
        bail!("no years to process: set [io].years in config or pass --year");
    }
    years.sort_unstable();
    years.dedup();
    Ok(years)
}

/// Builds [`FileNames`] from the defaults and any `[io.files]` overrides.
pub fn build_file_names(files: &FilesToml) -> FileNames {
    let mut names = FileNames::default();
    let overrides: [(&Option<String>, &mut String); 20] = [
        (&files.monthly_daily, &mut names.monthly_daily),
        (&files.monthly_hh, &mut names.monthly_hh),
        (&files.annual_daily, &mut names.annual_daily),
        (&files.annual_hh, &mut names.annual_hh),
        (&files.heating_season_daily, &mut names.heating_season_daily),
        (&files.heating_season_hh, &mut names.heating_season_hh),
        (&files.banded_daily, &mut names.banded_daily),
        (&files.banded_hh, &mut names.banded_hh),
        (&files.daily_readings, &mut names.daily_readings),
        (&files.hh_readings, &mut names.hh_readings),
        (&files.exporters, &mut names.exporters),
        (&files.survey, &mut names.survey),
        (&files.epc, &mut names.epc),
        (&files.participants, &mut names.participants),
        (&files.read_types, &mut names.read_types),
        (&files.stats_output, &mut names.stats_output),
        (&files.histogram, &mut names.histogram),
        (
            &files.histogram_same_participants,
            &mut names.histogram_same_participants,
        ),
        (
            &files.summary_same_participants,
            &mut names.summary_same_participants,
        ),
        (&files.supplementary, &mut names.supplementary),
    ];
    for (value, slot) in overrides {
        if let Some(v) = value {
            slot.clone_from(v);
        }
    }
    names
}

/// Builds a [`WriterConfig`] from the TOML I/O configuration.
pub fn build_writer_config(io: &IoConfig) -> Result<WriterConfig> {
    let compression = parse_compression(&io.compression)?;
    Ok(WriterConfig::default()
        .with_compression(compression)
        .with_row_group_size(io.row_group_size))
}

/// Builds a validated [`SdcConfig`] from the TOML disclosure configuration.
pub fn build_sdc_config(sdc: &SdcToml) -> Result<SdcConfig> {
    let quantile = NearestQuantile::default()
        .with_neighbours(sdc.neighbours)
        .with_min_count(sdc.min_count)
        .with_decimals(sdc.decimals);
    let cfg = SdcConfig::default()
        .with_quantile(quantile)
        .with_decimals(sdc.decimals)
        .with_floor_moments(sdc.floor_moments)
        .with_suppress_zero(sdc.suppress_zero);
    cfg.validate().context("invalid [sdc] configuration")?;
    Ok(cfg)
}

/// Builds a validated [`SegmentationConfig`] from the TOML segmentation
/// configuration.
pub fn build_segmentation_config(seg: &SegmentationToml) -> Result<SegmentationConfig> {
    let mut cfg = SegmentationConfig::default()
        .with_weekday_weekend(seg.weekday_weekend)
        .with_heating_season(seg.heating_season);
    if let Some(ref names) = seg.variables {
        let variables = names
            .iter()
            .map(|n| n.parse::<SegmentVariable>())
            .collect::<Result<Vec<_>, _>>()
            .context("in [segmentation].variables")?;
        cfg = cfg.with_variables(variables);
    }
    if let Some(ref bands) = seg.bands {
        cfg = cfg.with_bands(bands.clone());
    }
    cfg.validate().context("invalid [segmentation] configuration")?;
    Ok(cfg)
}

/// Builds a validated [`ProfileConfig`] from the TOML profile configuration.
pub fn build_profile_config(profile: &ProfileToml) -> Result<ProfileConfig> {
    let mut cfg = ProfileConfig::new().with_missing_threshold(profile.missing_threshold);
    if let Some(ref pairs) = profile.bands {
        let bands = pairs
            .iter()
            .map(|&[low, high]| TemperatureBand::new(low, high))
            .collect::<Result<Vec<_>, _>>()
            .context("in [profile].bands")?;
        cfg = cfg.with_bands(bands);
    }
    cfg.validate().context("invalid [profile] configuration")?;
    Ok(cfg)
}

/// Builds a validated [`HistogramConfig`] from the TOML histogram
/// configuration.
pub fn build_histogram_config(hist: &HistogramToml) -> Result<HistogramConfig> {
    let cfg = HistogramConfig::default()
        .with_annual_bins(hist.annual_bins)
        .with_sparse_threshold(hist.sparse_threshold);
    cfg.validate().context("invalid [histogram] configuration")?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_and_enums_parse() {
        assert_eq!(parse_compression("ZSTD").unwrap(), Compression::Zstd);
        assert!(parse_compression("gzip").is_err());
        assert_eq!(parse_granularity("half-hourly").unwrap(), Granularity::HalfHourly);
        assert!(parse_granularity("weekly").is_err());

        let seg = SegmentationToml {
            resolutions: vec!["annual".to_string(), "diurnal".to_string()],
            ..SegmentationToml::default()
        };
        assert_eq!(
            parse_resolutions(&seg).unwrap(),
            vec![Resolution::Annual, Resolution::Diurnal]
        );
    }

    #[test]
    fn years_prefer_command_line() {
        let io = IoConfig {
            years: vec![2021, 2022],
            ..IoConfig::default()
        };
        assert_eq!(resolve_years(&[], &io).unwrap(), vec![2021, 2022]);
        assert_eq!(resolve_years(&[2023, 2023], &io).unwrap(), vec![2023]);
        assert!(resolve_years(&[], &IoConfig::default()).is_err());
    }

    #[test]
    fn file_name_overrides() {
        let files = FilesToml {
            survey: Some("survey.csv".to_string()),
            ..FilesToml::default()
        };
        let names = build_file_names(&files);
        assert_eq!(names.survey, "survey.csv");
        assert_eq!(names.epc, FileNames::default().epc);
    }

    #[test]
    fn segmentation_from_names() {
        let seg = SegmentationToml {
            variables: Some(vec!["Region".to_string(), "tenure".to_string()]),
            ..SegmentationToml::default()
        };
        let cfg = build_segmentation_config(&seg).unwrap();
        assert_eq!(
            cfg.variables(),
            &[SegmentVariable::Region, SegmentVariable::Tenure]
        );

        let seg = SegmentationToml {
            variables: Some(vec!["postcode".to_string()]),
            ..SegmentationToml::default()
        };
        assert!(build_segmentation_config(&seg).is_err());
    }

    #[test]
    fn sdc_and_profile_validate() {
        let sdc = SdcToml {
            neighbours: 0,
            ..SdcToml::default()
        };
        assert!(build_sdc_config(&sdc).is_err());
        assert_eq!(build_sdc_config(&SdcToml::default()).unwrap(), SdcConfig::default());

        let profile = ProfileToml {
            missing_threshold: 0.5,
            bands: Some(vec![[5.0, 0.0]]),
        };
        assert!(build_profile_config(&profile).is_err());
    }
}
