// src/analytics/series.rs

use std::collections::BTreeMap;

use crate::{
    analytics::range_sum::DatedQuantity,
    common::dates::{month_abbrev, parse_date_parts, week_of_month, MONTH_ABBREVIATIONS},
    models::dashboard::{FilterType, Granularity, NamedSeries, TimeSeries},
};

const WEEK_BUCKETS: usize = 5;

/// Série temporal do gráfico principal.
///
/// `yearly` e `monthly` comparam sub-períodos sobre TODO o histórico
/// (`all_rows`), ignorando o intervalo ativo. Os demais tipos agrupam por dia
/// somente as linhas já filtradas (`filtered_rows`).
pub fn build_time_series<F, A>(
    filter_type: FilterType,
    year: Option<i32>,
    filtered_rows: &[F],
    all_rows: &[A],
    available_years: &[i32],
) -> TimeSeries
where
    F: DatedQuantity,
    A: DatedQuantity,
{
    match (filter_type, year) {
        (FilterType::Yearly, _) if !available_years.is_empty() => {
            yearly_series(all_rows, available_years)
        }
        (FilterType::Monthly, Some(year)) => weekly_series(all_rows, year),
        _ => daily_series(filtered_rows),
    }
}

fn yearly_series<A: DatedQuantity>(all_rows: &[A], available_years: &[i32]) -> TimeSeries {
    let mut years: Vec<i32> = available_years.to_vec();
    years.sort_unstable();
    years.dedup();

    let mut buckets: BTreeMap<i32, [f64; 12]> = years.iter().map(|y| (*y, [0.0; 12])).collect();
    for row in all_rows {
        let Some(parts) = parse_date_parts(row.date()) else { continue };
        if let Some(months) = buckets.get_mut(&parts.year) {
            if let Some(slot) = months.get_mut(parts.month_index0 as usize) {
                *slot += row.quantity();
            }
        }
    }

    TimeSeries {
        granularity: Granularity::Month,
        labels: MONTH_ABBREVIATIONS.iter().map(|m| m.to_string()).collect(),
        is_multiple_series: true,
        series: buckets
            .into_iter()
            .map(|(year, data)| NamedSeries {
                name: year.to_string(),
                data: data.to_vec(),
            })
            .collect(),
    }
}

// Semanas fora de 1..=5 (meses que tocam 6 semanas) ficam de fora.
fn weekly_series<A: DatedQuantity>(all_rows: &[A], year: i32) -> TimeSeries {
    let mut buckets: BTreeMap<u32, [f64; WEEK_BUCKETS]> = BTreeMap::new();
    for row in all_rows {
        let Some(parts) = parse_date_parts(row.date()) else { continue };
        if parts.year != year || parts.month_index0 > 11 {
            continue;
        }
        let weeks = buckets.entry(parts.month_index0).or_insert([0.0; WEEK_BUCKETS]);
        if let Some(week @ 1..=5) = week_of_month(parts.year, parts.month_index0, parts.day) {
            weeks[(week - 1) as usize] += row.quantity();
        }
    }

    TimeSeries {
        granularity: Granularity::Week,
        labels: (1..=WEEK_BUCKETS).map(|w| format!("Week {w}")).collect(),
        is_multiple_series: true,
        series: buckets
            .into_iter()
            .map(|(month, data)| NamedSeries {
                name: month_abbrev(month).unwrap_or_default().to_string(),
                data: data.to_vec(),
            })
            .collect(),
    }
}

fn daily_series<F: DatedQuantity>(filtered_rows: &[F]) -> TimeSeries {
    let mut by_date: BTreeMap<&str, f64> = BTreeMap::new();
    for row in filtered_rows {
        *by_date.entry(row.date()).or_insert(0.0) += row.quantity();
    }

    let labels: Vec<String> = by_date.keys().map(|d| d.to_string()).collect();
    let series = if by_date.is_empty() {
        Vec::new()
    } else {
        vec![NamedSeries {
            name: "Sales".to_string(),
            data: by_date.into_values().collect(),
        }]
    };

    TimeSeries {
        granularity: Granularity::Day,
        labels,
        is_multiple_series: false,
        series,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::dashboard::SaleSummary;

    fn row(date: &str, quantity: f64) -> SaleSummary {
        SaleSummary { id: 0, date: date.to_string(), quantity, store_id: None }
    }

    fn series_total(ts: &TimeSeries) -> f64 {
        ts.series.iter().flat_map(|s| s.data.iter()).sum()
    }

    #[test]
    fn yearly_buckets_every_available_year_by_month() {
        let all = vec![row("2024-01-05", 10.0), row("2024-06-15", 5.0)];
        let ts = build_time_series(FilterType::Yearly, Some(2024), &all, &all, &[2024]);

        assert_eq!(ts.granularity, Granularity::Month);
        assert!(ts.is_multiple_series);
        assert_eq!(ts.labels.len(), 12);
        assert_eq!(ts.labels[0], "Jan");
        assert_eq!(ts.series.len(), 1);
        assert_eq!(ts.series[0].name, "2024");
        let mut expected = vec![0.0; 12];
        expected[0] = 10.0;
        expected[5] = 5.0;
        assert_eq!(ts.series[0].data, expected);
    }

    #[test]
    fn yearly_ignores_active_range_and_orders_years_ascending() {
        let all = vec![row("2023-03-01", 2.0), row("2024-03-01", 4.0), row("2023-12-31", 1.0)];
        let filtered: Vec<SaleSummary> = Vec::new();
        let ts = build_time_series(FilterType::Yearly, Some(2024), &filtered, &all, &[2024, 2023]);

        let names: Vec<_> = ts.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["2023", "2024"]);
        assert_eq!(ts.series[0].data.iter().sum::<f64>(), 3.0);
        assert_eq!(series_total(&ts), 7.0);
    }

    #[test]
    fn yearly_without_years_falls_back_to_daily() {
        let empty: Vec<SaleSummary> = Vec::new();
        let ts = build_time_series(FilterType::Yearly, None, &empty, &empty, &[]);
        assert_eq!(ts.granularity, Granularity::Day);
        assert!(ts.labels.is_empty());
        assert!(ts.series.is_empty());
    }

    #[test]
    fn monthly_buckets_weeks_for_every_month_of_the_year() {
        let all = vec![
            row("2024-03-01", 1.0),
            row("2024-03-08", 1.0),
            row("2024-03-15", 1.0),
            row("2024-03-22", 1.0),
            row("2024-03-29", 1.0),
            row("2024-01-10", 2.0),
            row("2023-03-01", 99.0),
        ];
        let ts = build_time_series(FilterType::Monthly, Some(2024), &all, &all, &[2024, 2023]);

        assert_eq!(ts.granularity, Granularity::Week);
        assert_eq!(ts.labels, vec!["Week 1", "Week 2", "Week 3", "Week 4", "Week 5"]);
        let names: Vec<_> = ts.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Jan", "Mar"]);

        let march = &ts.series[1];
        assert_eq!(march.data, vec![1.0, 1.0, 1.0, 1.0, 1.0]);
        assert_eq!(march.data.iter().sum::<f64>(), 5.0);
    }

    #[test]
    fn monthly_drops_sixth_week() {
        // 31/03/2024 cai na semana 6
        let all = vec![row("2024-03-30", 1.0), row("2024-03-31", 7.0)];
        let ts = build_time_series(FilterType::Monthly, Some(2024), &all, &all, &[2024]);
        assert_eq!(ts.series.len(), 1);
        assert_eq!(ts.series[0].data.iter().sum::<f64>(), 1.0);
    }

    #[test]
    fn other_filters_group_filtered_rows_by_day() {
        let filtered = vec![row("2024-07-02", 1.0), row("2024-07-01", 2.0), row("2024-07-02", 3.0)];
        let all = vec![row("2020-01-01", 100.0)];
        let ts = build_time_series(FilterType::Weekly, None, &filtered, &all, &[2020]);

        assert_eq!(ts.granularity, Granularity::Day);
        assert!(!ts.is_multiple_series);
        assert_eq!(ts.labels, vec!["2024-07-01", "2024-07-02"]);
        assert_eq!(ts.series.len(), 1);
        assert_eq!(ts.series[0].name, "Sales");
        assert_eq!(ts.series[0].data, vec![2.0, 4.0]);
    }

    #[test]
    fn monthly_without_year_falls_back_to_daily() {
        let filtered = vec![row("2024-07-02", 1.0)];
        let ts = build_time_series(FilterType::Monthly, None, &filtered, &filtered, &[]);
        assert_eq!(ts.granularity, Granularity::Day);
    }
}
