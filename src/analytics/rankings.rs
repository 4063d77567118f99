// src/analytics/rankings.rs

use std::collections::HashMap;

use crate::{
    common::dates::month_index_of,
    models::dashboard::{ChartData, MonthlySeries, RankingEntry},
};

/// Acumulador rótulo -> quantidade que lembra a ordem de inserção.
/// Empates no ranking respeitam essa ordem (o sort é estável).
#[derive(Debug, Clone, Default)]
pub struct LabelTotals {
    index: HashMap<String, usize>,
    entries: Vec<(String, f64)>,
}

impl LabelTotals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, label: &str, quantity: f64) {
        match self.index.get(label) {
            Some(&pos) => self.entries[pos].1 += quantity,
            None => {
                self.index.insert(label.to_string(), self.entries.len());
                self.entries.push((label.to_string(), quantity));
            }
        }
    }

    #[cfg(test)]
    pub fn get(&self, label: &str) -> Option<f64> {
        self.index.get(label).map(|&pos| self.entries[pos].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, qty)| qty).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(label, qty)| (label.as_str(), *qty))
    }
}

impl<S: AsRef<str>> FromIterator<(S, f64)> for LabelTotals {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut totals = LabelTotals::new();
        for (label, qty) in iter {
            totals.add(label.as_ref(), qty);
        }
        totals
    }
}

/// Ranking decrescente por quantidade; rótulos vazios são descartados.
pub fn build_rankings(totals: &LabelTotals, limit: Option<usize>) -> Vec<RankingEntry> {
    let mut ranked: Vec<RankingEntry> = totals
        .iter()
        .filter(|(label, _)| !label.trim().is_empty())
        .map(|(label, sales)| RankingEntry {
            label: label.to_string(),
            sales,
        })
        .collect();

    ranked.sort_by(|a, b| b.sales.total_cmp(&a.sales));

    if let Some(limit) = limit {
        ranked.truncate(limit);
    }
    ranked
}

pub fn build_chart_data(totals: &LabelTotals) -> ChartData {
    let (labels, values) = build_rankings(totals, None)
        .into_iter()
        .map(|entry| (entry.label, entry.sales))
        .unzip();
    ChartData { labels, values }
}

pub fn build_chart_data_limited(totals: &LabelTotals, limit: usize) -> ChartData {
    let (labels, values) = build_rankings(totals, Some(limit))
        .into_iter()
        .map(|entry| (entry.label, entry.sales))
        .unzip();
    ChartData { labels, values }
}

/// Série mensal em ordem de calendário (Jan..Dec), independente da ordem de inserção.
pub fn build_monthly_series(totals: &LabelTotals) -> MonthlySeries {
    let mut months: Vec<(usize, &str, f64)> = totals
        .iter()
        .filter_map(|(label, qty)| month_index_of(label).map(|idx| (idx, label, qty)))
        .collect();
    months.sort_by_key(|(idx, _, _)| *idx);

    MonthlySeries {
        months: months.iter().map(|(_, label, _)| label.to_string()).collect(),
        sales: months.iter().map(|(_, _, qty)| *qty).collect(),
    }
}

/// Rótulo do primeiro colocado, se houver.
pub fn top_label(totals: &LabelTotals) -> Option<String> {
    if totals.is_empty() {
        return None;
    }
    build_rankings(totals, Some(1)).into_iter().next().map(|entry| entry.label)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totals(pairs: &[(&str, f64)]) -> LabelTotals {
        pairs.iter().map(|(l, q)| (*l, *q)).collect()
    }

    #[test]
    fn accumulates_per_label() {
        let mut t = LabelTotals::new();
        t.add("Bebidas", 2.0);
        t.add("Doces", 1.0);
        t.add("Bebidas", 3.0);
        assert_eq!(t.get("Bebidas"), Some(5.0));
        assert_eq!(t.len(), 2);
        assert_eq!(t.total(), 6.0);
    }

    #[test]
    fn rankings_sort_descending_and_keep_insertion_order_on_ties() {
        let ranked = build_rankings(&totals(&[("A", 5.0), ("B", 9.0), ("C", 5.0), ("D", 1.0)]), None);
        let labels: Vec<_> = ranked.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["B", "A", "C", "D"]);
    }

    #[test]
    fn rankings_drop_empty_labels_and_truncate() {
        let t = totals(&[("", 100.0), ("  ", 50.0), ("X", 3.0), ("Y", 4.0), ("Z", 1.0)]);
        let ranked = build_rankings(&t, Some(2));
        assert_eq!(
            ranked,
            vec![
                RankingEntry { label: "Y".into(), sales: 4.0 },
                RankingEntry { label: "X".into(), sales: 3.0 },
            ]
        );
    }

    #[test]
    fn unlimited_ranking_preserves_quantity_of_labelled_entries() {
        let t = totals(&[("a", 1.5), ("b", 2.5), ("c", 0.0), ("d", 7.0)]);
        let sum: f64 = build_rankings(&t, None).iter().map(|e| e.sales).sum();
        assert_eq!(sum, t.total());
    }

    #[test]
    fn chart_data_is_parallel_arrays() {
        let chart = build_chart_data(&totals(&[("x", 1.0), ("y", 2.0)]));
        assert_eq!(chart.labels, vec!["y", "x"]);
        assert_eq!(chart.values, vec![2.0, 1.0]);

        let limited = build_chart_data_limited(&totals(&[("x", 1.0), ("y", 2.0)]), 1);
        assert_eq!(limited.labels, vec!["y"]);
    }

    #[test]
    fn monthly_series_is_in_calendar_order() {
        let series = build_monthly_series(&totals(&[("Jun", 5.0), ("Jan", 10.0), ("Dec", 1.0)]));
        assert_eq!(series.months, vec!["Jan", "Jun", "Dec"]);
        assert_eq!(series.sales, vec![10.0, 5.0, 1.0]);
    }

    #[test]
    fn top_label_of_empty_totals_is_none() {
        assert_eq!(top_label(&LabelTotals::new()), None);
        assert_eq!(top_label(&totals(&[("a", 1.0), ("b", 2.0)])).as_deref(), Some("b"));
    }
}
