// src/analytics/filters.rs
//
// Ponto único onde os parâmetros "soltos" da query string viram um FilterSpec
// validado. Nada abaixo desta camada enxerga o mapa cru.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, Duration, NaiveDate};

use crate::{
    analytics::range_sum::DatedQuantity,
    common::{
        dates::{days_in_month, format_date, format_naive, parse_date_parts, sanitize_date_string},
        error::AppError,
    },
    models::dashboard::FilterType,
};

const YEAR_KEYS: [&str; 2] = ["year", "selectedYear"];
const MONTH_KEYS: [&str; 2] = ["month", "selectedMonth"];
const FROM_KEYS: [&str; 2] = ["fromDate", "startDate"];
const TO_KEYS: [&str; 2] = ["toDate", "endDate"];
const STORE_KEYS: [&str; 3] = ["storeIds", "storeId", "stores"];

// ---
// Parâmetros crus
// ---

/// Pares chave/valor da query string, na ordem em que chegaram.
/// Chaves repetidas (`storeIds=1&storeIds=2`) são preservadas.
#[derive(Debug, Clone, Default)]
pub struct RawFilterParams {
    pairs: Vec<(String, String)>,
}

impl From<Vec<(String, String)>> for RawFilterParams {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }
}

impl RawFilterParams {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pairs
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Primeiro alias presente.
    pub fn first_of(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|key| self.get(key))
    }
}

// ---
// Metadados (sempre derivados do conjunto SEM filtro de data)
// ---

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalesMetadata {
    pub available_years: Vec<i32>,               // decrescente
    pub months_by_year: BTreeMap<i32, Vec<u32>>, // meses base 0, crescente
}

impl SalesMetadata {
    pub fn from_rows<R: DatedQuantity>(rows: &[R]) -> Self {
        let mut months: BTreeMap<i32, BTreeSet<u32>> = BTreeMap::new();
        for row in rows {
            if let Some(parts) = parse_date_parts(row.date()) {
                months.entry(parts.year).or_default().insert(parts.month_index0);
            }
        }

        let available_years = months.keys().rev().copied().collect();
        let months_by_year = months
            .into_iter()
            .map(|(year, set)| (year, set.into_iter().collect()))
            .collect();

        Self { available_years, months_by_year }
    }

    pub fn latest_year(&self) -> Option<i32> {
        self.available_years.first().copied()
    }

    pub fn months_for(&self, year: i32) -> Vec<u32> {
        self.months_by_year.get(&year).cloned().unwrap_or_default()
    }

    pub fn earliest_month(&self, year: i32) -> Option<u32> {
        self.months_by_year.get(&year).and_then(|m| m.first().copied())
    }
}

// ---
// Intervalo de datas
// ---

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl DateRange {
    pub fn bounded(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start_date: Some(start.into()),
            end_date: Some(end.into()),
        }
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn single_day(day: NaiveDate) -> Self {
        let iso = format_naive(day);
        Self::bounded(iso.clone(), iso)
    }

    /// Comparação de strings ISO (equivalente à de datas por causa do zero-padding).
    pub fn contains(&self, date: &str) -> bool {
        let after_start = self.start_date.as_deref().is_none_or(|start| date >= start);
        let before_end = self.end_date.as_deref().is_none_or(|end| date <= end);
        after_start && before_end
    }
}

// ---
// Filtro normalizado
// ---

#[derive(Debug, Clone, PartialEq)]
pub struct FilterDefaults {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    pub filter_type: FilterType,
    pub year: Option<i32>,
    pub month: Option<u32>, // base 0
    pub range: DateRange,
    pub store_ids: Vec<i64>,
    pub defaults: FilterDefaults,
}

fn parse_finite(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Primeiro alias cujo valor é um número finito (não apenas o primeiro presente).
fn first_number(raw: &RawFilterParams, keys: &[&str]) -> Option<f64> {
    keys.iter()
        .filter_map(|key| raw.get(key))
        .find_map(parse_finite)
}

// Anos fora do calendário suportado pelo chrono contam como ausentes.
fn parse_year(raw: &RawFilterParams) -> Option<i32> {
    let supported = f64::from(NaiveDate::MIN.year())..=f64::from(NaiveDate::MAX.year());
    first_number(raw, &YEAR_KEYS)
        .map(f64::trunc)
        .filter(|n| supported.contains(n))
        .map(|n| n as i32)
}

// Mês chega em base 0 (0 = janeiro); fora de 0..=11 é ignorado.
fn parse_month(raw: &RawFilterParams) -> Option<u32> {
    first_number(raw, &MONTH_KEYS)
        .filter(|n| n.fract() == 0.0 && (0.0..=11.0).contains(n))
        .map(|n| n as u32)
}

/// Aceita "1,2,3", valores repetidos ou um escalar. Tokens não inteiros somem.
pub fn parse_store_ids(raw: &RawFilterParams) -> Vec<i64> {
    let Some(key) = STORE_KEYS.iter().find(|key| raw.get(key).is_some()) else {
        return Vec::new();
    };

    let mut seen = BTreeSet::new();
    raw.get_all(key)
        .flat_map(|value| value.split(','))
        .filter_map(|token| token.trim().parse::<i64>().ok())
        .filter(|id| seen.insert(*id))
        .collect()
}

pub fn validate_custom_range(raw: &RawFilterParams) -> Result<DateRange, AppError> {
    let from = sanitize_date_string(raw.first_of(&FROM_KEYS));
    let to = sanitize_date_string(raw.first_of(&TO_KEYS));

    let (Some(from), Some(to)) = (from, to) else {
        return Err(AppError::InvalidRange(
            "Filtro custom exige fromDate e toDate no formato YYYY-MM-DD.".to_string(),
        ));
    };

    if from > to {
        return Err(AppError::InvalidRange(format!(
            "fromDate ({from}) não pode ser posterior a toDate ({to})."
        )));
    }

    Ok(DateRange::bounded(from, to))
}

/// Intervalo concreto para os tipos não-custom.
pub fn resolve_range(
    filter_type: FilterType,
    year: Option<i32>,
    month: Option<u32>,
    today: NaiveDate,
) -> DateRange {
    match filter_type {
        FilterType::Yearly => match year {
            Some(y) => DateRange::bounded(format_date(y, 0, 1), format_date(y, 11, 31)),
            None => DateRange::unbounded(),
        },
        FilterType::Monthly => match (year, month) {
            (Some(y), Some(m)) => {
                DateRange::bounded(format_date(y, m, 1), format_date(y, m, days_in_month(y, m)))
            }
            _ => DateRange::unbounded(),
        },
        FilterType::Weekly => {
            // semana começando no domingo
            let offset = today.weekday().num_days_from_sunday() as i64;
            let start = today - Duration::days(offset);
            let end = start + Duration::days(6);
            DateRange::bounded(format_naive(start), format_naive(end))
        }
        FilterType::Daily => DateRange::single_day(today),
        FilterType::Tomorrow => DateRange::single_day(today + Duration::days(1)),
        FilterType::Custom | FilterType::All => DateRange::unbounded(),
    }
}

pub fn normalize_filter(
    raw: &RawFilterParams,
    metadata: &SalesMetadata,
    today: NaiveDate,
) -> Result<FilterSpec, AppError> {
    let filter_type = FilterType::parse(raw.get("filterType"));

    let default_year = metadata.latest_year();
    let default_month = default_year.and_then(|y| metadata.earliest_month(y));

    let mut year = parse_year(raw);
    if year.is_none() && filter_type.requires_year() {
        year = default_year;
    }

    let month = match filter_type {
        FilterType::Monthly => parse_month(raw).or_else(|| year.and_then(|y| metadata.earliest_month(y))),
        _ => None,
    };

    let range = match filter_type {
        FilterType::Custom => validate_custom_range(raw)?,
        other => resolve_range(other, year, month, today),
    };

    Ok(FilterSpec {
        filter_type,
        year,
        month,
        range,
        store_ids: parse_store_ids(raw),
        defaults: FilterDefaults {
            year: default_year,
            month: default_month,
        },
    })
}

fn shift_back_one_year(date: &str) -> Option<String> {
    let parts = parse_date_parts(date)?;
    let year = parts.year.checked_sub(1)?;
    // 29/02 vira 28/02 em ano não bissexto
    let day = parts.day.min(days_in_month(year, parts.month_index0));
    Some(format_date(year, parts.month_index0, day))
}

/// Período de comparação: mesmo intervalo um ano antes (yearly) ou o mês
/// anterior (monthly). Para os demais tipos não existe comparação.
pub fn previous_range(spec: &FilterSpec) -> Option<DateRange> {
    match spec.filter_type {
        FilterType::Yearly => {
            let start = shift_back_one_year(spec.range.start_date.as_deref()?)?;
            let end = shift_back_one_year(spec.range.end_date.as_deref()?)?;
            Some(DateRange::bounded(start, end))
        }
        FilterType::Monthly => {
            let (year, month) = (spec.year?, spec.month?);
            let (prev_year, prev_month) = if month == 0 { (year.checked_sub(1)?, 11) } else { (year, month - 1) };
            Some(DateRange::bounded(
                format_date(prev_year, prev_month, 1),
                format_date(prev_year, prev_month, days_in_month(prev_year, prev_month)),
            ))
        }
        _ => None,
    }
}
