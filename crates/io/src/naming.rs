//! Input and output file names.
//!
//! Every name is a template. `{year}` is replaced by a calendar year,
//! `{period}` by a rollup period label such as `2020_2021`, and `{y1}` /
//! `{y2}` by the two years of a comparison.

use crate::energy::{Granularity, Layout, TableKind};

/// The energy summary tables the pipeline exchanges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnergyFile {
    /// Per month and day type.
    Monthly,
    /// Per calendar year and day type.
    Annual,
    /// Per heating season and day type.
    HeatingSeason,
    /// Per temperature band.
    TemperatureBanded,
}

impl EnergyFile {
    /// Table kind at the given granularity.
    pub fn kind(self, granularity: Granularity) -> TableKind {
        let layout = match self {
            EnergyFile::Monthly => Layout::Monthly,
            EnergyFile::Annual | EnergyFile::HeatingSeason => Layout::Period,
            EnergyFile::TemperatureBanded => Layout::TemperatureBanded,
        };
        TableKind::new(granularity, layout)
    }

    /// Short name used in log and error messages.
    pub fn describe(self, granularity: Granularity) -> String {
        let g = match granularity {
            Granularity::Daily => "daily",
            Granularity::HalfHourly => "half-hourly",
        };
        let f = match self {
            EnergyFile::Monthly => "monthly",
            EnergyFile::Annual => "annual",
            EnergyFile::HeatingSeason => "heating-season",
            EnergyFile::TemperatureBanded => "temperature-banded",
        };
        format!("{f} {g}")
    }
}

/// File name templates, defaulting to the published naming scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNames {
    pub monthly_daily: String,
    pub monthly_hh: String,
    pub annual_daily: String,
    pub annual_hh: String,
    pub heating_season_daily: String,
    pub heating_season_hh: String,
    pub banded_daily: String,
    pub banded_hh: String,
    pub daily_readings: String,
    pub hh_readings: String,
    pub exporters: String,
    pub survey: String,
    pub epc: String,
    pub participants: String,
    pub read_types: String,
    pub stats_output: String,
    pub histogram: String,
    pub histogram_same_participants: String,
    pub summary_same_participants: String,
    pub supplementary: String,
}

impl Default for FileNames {
    fn default() -> Self {
        Self {
            monthly_daily: "Annual_report_sm_monthly_mean_daily_consumption_{year}.csv".into(),
            monthly_hh: "Annual_report_sm_monthly_mean_hh_profiles_{year}.csv".into(),
            annual_daily: "Annual_report_sm_annual_mean_daily_consumption_{year}.csv".into(),
            annual_hh: "Annual_report_sm_annual_mean_hh_profiles_{year}.csv".into(),
            heating_season_daily:
                "Annual_report_sm_heating_season_mean_daily_consumption_{period}.csv".into(),
            heating_season_hh: "Annual_report_sm_heating_season_mean_hh_profiles_{period}.csv"
                .into(),
            banded_daily: "Annual_report_sm_temp_banded_mean_daily_consumption_{year}.csv".into(),
            banded_hh: "Annual_report_sm_temperature_banded_hh_profiles_{year}.csv".into(),
            daily_readings: "Clean_daily_readings_{year}.csv".into(),
            hh_readings: "Clean_hh_readings_{year}.csv".into(),
            exporters: "Elec_{year}_list_of_exporter_puprns.csv".into(),
            survey: "serl_survey_data_edition04.csv".into(),
            epc: "serl_epc_data_edition04.csv".into(),
            participants: "serl_participant_summary_edition04.csv".into(),
            read_types: "serl_smart_meter_rt_summary_edition04.csv".into(),
            stats_output: "m3_outputs{year}".into(),
            histogram: "hist_values_{year}.csv".into(),
            histogram_same_participants: "hist_values_same_participants{y2}_{y1}.csv".into(),
            summary_same_participants: "summary_stats_same_participants{y2}_{y1}.csv".into(),
            supplementary: "supplementary_AR_info.csv".into(),
        }
    }
}

impl FileNames {
    /// Name of an energy table. `tag` is a year, or a period label for
    /// heating-season tables.
    pub fn energy(&self, file: EnergyFile, granularity: Granularity, tag: &str) -> String {
        let template = match (file, granularity) {
            (EnergyFile::Monthly, Granularity::Daily) => &self.monthly_daily,
            (EnergyFile::Monthly, Granularity::HalfHourly) => &self.monthly_hh,
            (EnergyFile::Annual, Granularity::Daily) => &self.annual_daily,
            (EnergyFile::Annual, Granularity::HalfHourly) => &self.annual_hh,
            (EnergyFile::HeatingSeason, Granularity::Daily) => &self.heating_season_daily,
            (EnergyFile::HeatingSeason, Granularity::HalfHourly) => &self.heating_season_hh,
            (EnergyFile::TemperatureBanded, Granularity::Daily) => &self.banded_daily,
            (EnergyFile::TemperatureBanded, Granularity::HalfHourly) => &self.banded_hh,
        };
        render(template, &[("year", tag), ("period", tag)])
    }

    /// Name of the cleaned readings for `year`.
    pub fn readings(&self, granularity: Granularity, year: i32) -> String {
        let template = match granularity {
            Granularity::Daily => &self.daily_readings,
            Granularity::HalfHourly => &self.hh_readings,
        };
        render(template, &[("year", &year.to_string())])
    }

    /// Name of the exporter list for `year`.
    pub fn exporters(&self, year: i32) -> String {
        render(&self.exporters, &[("year", &year.to_string())])
    }

    /// Stem of the statistics output for `year`; the writer adds the
    /// extension.
    pub fn stats_output(&self, year: i32) -> String {
        render(&self.stats_output, &[("year", &year.to_string())])
    }

    /// Name of the annual histogram table for `year`.
    pub fn histogram(&self, year: i32) -> String {
        render(&self.histogram, &[("year", &year.to_string())])
    }

    /// Name of the two-year histogram table.
    pub fn histogram_same_participants(&self, y1: i32, y2: i32) -> String {
        render(&self.histogram_same_participants, &years(y1, y2))
    }

    /// Name of the two-year summary statistics table.
    pub fn summary_same_participants(&self, y1: i32, y2: i32) -> String {
        render(&self.summary_same_participants, &years(y1, y2))
    }
}

fn years(y1: i32, y2: i32) -> [(&'static str, String); 2] {
    [("y1", y1.to_string()), ("y2", y2.to_string())]
}

/// Replaces each `{key}` in `template` with its value.
fn render<K, V>(template: &str, vars: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    vars.iter().fold(template.to_string(), |acc, (k, v)| {
        acc.replace(&format!("{{{}}}", k.as_ref()), v.as_ref())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_energy_names() {
        let names = FileNames::default();
        assert_eq!(
            names.energy(EnergyFile::Annual, Granularity::Daily, "2021"),
            "Annual_report_sm_annual_mean_daily_consumption_2021.csv"
        );
        assert_eq!(
            names.energy(EnergyFile::HeatingSeason, Granularity::HalfHourly, "2020_2021"),
            "Annual_report_sm_heating_season_mean_hh_profiles_2020_2021.csv"
        );
        assert_eq!(
            names.energy(EnergyFile::TemperatureBanded, Granularity::HalfHourly, "2022"),
            "Annual_report_sm_temperature_banded_hh_profiles_2022.csv"
        );
    }

    #[test]
    fn comparison_names_put_later_year_first() {
        let names = FileNames::default();
        assert_eq!(
            names.histogram_same_participants(2021, 2022),
            "hist_values_same_participants2022_2021.csv"
        );
        assert_eq!(
            names.summary_same_participants(2021, 2022),
            "summary_stats_same_participants2022_2021.csv"
        );
    }

    #[test]
    fn yearly_names() {
        let names = FileNames::default();
        assert_eq!(names.exporters(2023), "Elec_2023_list_of_exporter_puprns.csv");
        assert_eq!(names.stats_output(2023), "m3_outputs2023");
        assert_eq!(names.histogram(2023), "hist_values_2023.csv");
        assert_eq!(
            names.readings(Granularity::HalfHourly, 2023),
            "Clean_hh_readings_2023.csv"
        );
    }

    #[test]
    fn energy_file_kinds() {
        let kind = EnergyFile::HeatingSeason.kind(Granularity::Daily);
        assert_eq!(kind.layout, Layout::Period);
        assert_eq!(
            EnergyFile::TemperatureBanded.describe(Granularity::HalfHourly),
            "temperature-banded half-hourly"
        );
    }
}
