use chrono::NaiveDate;
use meterstat_calendar::{
    CalendarError, DayType, RollupPeriod, YearMonth, days_of_type_in_month, half_hour_label,
    month_label,
};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn annual_day_counts_match_month_sums() {
    for year in [2019, 2020, 2021] {
        let p = RollupPeriod::annual(year).unwrap();
        for dt in DayType::ALL {
            let by_month: u32 = (1..=12)
                .map(|m| days_of_type_in_month(year, m, dt).unwrap())
                .sum();
            assert_eq!(
                by_month,
                p.days_of_type(dt),
                "year {year}, day type {dt}: month sum differs from period count"
            );
        }
    }
}

#[test]
fn leap_year_has_366_days() {
    let p = RollupPeriod::annual(2020).unwrap();
    assert_eq!(p.days_of_type(DayType::Both), 366);
    assert_eq!(
        p.days_of_type(DayType::Weekday) + p.days_of_type(DayType::Weekend),
        366
    );
}

#[test]
fn heating_season_weekend_weights() {
    let p = RollupPeriod::heating_season(2020).unwrap();
    let total = p.days_of_type(DayType::Weekend);
    for ym in p.months() {
        let expected =
            f64::from(days_of_type_in_month(ym.year, ym.month, DayType::Weekend).unwrap())
                / f64::from(total);
        assert_eq!(p.weight(ym, DayType::Weekend).unwrap(), expected);
    }
}

#[test]
fn custom_period_months() {
    let p = RollupPeriod::custom(d(2021, 11, 1), d(2022, 2, 1)).unwrap();
    assert_eq!(
        p.months(),
        vec![
            YearMonth { year: 2021, month: 11 },
            YearMonth { year: 2021, month: 12 },
            YearMonth { year: 2022, month: 1 },
        ]
    );
    assert_eq!(p.label(), "2021-11-01_2022-02-01");
}

#[test]
fn diurnal_labels_cover_the_day() {
    let labels: Vec<String> = (1..=48).map(|i| half_hour_label(i).unwrap()).collect();
    assert_eq!(labels[0], "00:30");
    assert_eq!(labels[23], "12:00");
    assert_eq!(labels[47], "00:00");
}

#[test]
fn monthly_labels_for_a_year() {
    let labels: Vec<String> = (1..=12).map(|m| month_label(2021, m).unwrap()).collect();
    assert_eq!(labels[0], "Jan-21");
    assert_eq!(labels[11], "Dec-21");
}

#[test]
fn errors_surface_through_public_api() {
    assert!(matches!(
        "Both".parse::<DayType>(),
        Err(CalendarError::UnknownDayType { .. })
    ));
    assert!(matches!(
        RollupPeriod::custom(d(2021, 1, 15), d(2021, 3, 1)),
        Err(CalendarError::NotMonthAligned { .. })
    ));
}
