// src/common/dates.rs

use chrono::{Datelike, NaiveDate};

pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Componentes de uma data `YYYY-MM-DD`, com o mês indexado a partir de 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateParts {
    pub year: i32,
    pub month_index0: u32,
    pub day: u32,
}

/// Monta uma data ISO com mês e dia sempre com zero à esquerda,
/// para que a comparação de strings equivalha à comparação de datas.
pub fn format_date(year: i32, month_index0: u32, day: u32) -> String {
    format!("{:04}-{:02}-{:02}", year, month_index0 + 1, day)
}

pub fn format_naive(date: NaiveDate) -> String {
    format_date(date.year(), date.month0(), date.day())
}

/// Quantidade de dias do mês (0 para um mês fora de 0..=11).
pub fn days_in_month(year: i32, month_index0: u32) -> u32 {
    if month_index0 > 11 {
        return 0;
    }
    // "Dia 0" do mês seguinte = último dia deste mês
    let (next_year, next_month) = if month_index0 == 11 {
        match year.checked_add(1) {
            Some(next) => (next, 1),
            None => return 0,
        }
    } else {
        (year, month_index0 + 2)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(0)
}

/// Semana do mês (1..=6), contando a partir do domingo.
/// `None` quando ano/mês não formam uma data válida.
pub fn week_of_month(year: i32, month_index0: u32, day: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month_index0 + 1, 1)?;
    let first_weekday = first.weekday().num_days_from_sunday();
    Some((day + first_weekday).div_ceil(7))
}

/// Aceita apenas `YYYY-MM-DD` (após trim). Não tenta corrigir nada.
pub fn sanitize_date_string(value: Option<&str>) -> Option<String> {
    let trimmed = value?.trim();
    let bytes = trimmed.as_bytes();
    if bytes.len() != 10 {
        return None;
    }
    let well_formed = bytes.iter().enumerate().all(|(i, b)| match i {
        4 | 7 => *b == b'-',
        _ => b.is_ascii_digit(),
    });
    well_formed.then(|| trimmed.to_string())
}

pub fn parse_date_parts(date: &str) -> Option<DateParts> {
    let mut parts = date.split('-');
    let year = parts.next()?.trim().parse::<i32>().ok()?;
    let month = parts.next()?.trim().parse::<u32>().ok()?;
    let day = parts.next()?.trim().parse::<u32>().ok()?;
    if parts.next().is_some() || month == 0 {
        return None;
    }
    Some(DateParts {
        year,
        month_index0: month - 1,
        day,
    })
}

pub fn month_abbrev(month_index0: u32) -> Option<&'static str> {
    MONTH_ABBREVIATIONS.get(month_index0 as usize).copied()
}

pub fn month_index_of(abbrev: &str) -> Option<usize> {
    MONTH_ABBREVIATIONS.iter().position(|m| *m == abbrev)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_date_pads_month_and_day() {
        assert_eq!(format_date(2024, 0, 5), "2024-01-05");
        assert_eq!(format_date(2024, 11, 31), "2024-12-31");
        assert_eq!(format_date(987, 8, 9), "0987-09-09");
    }

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(days_in_month(2024, 1), 29);
        assert_eq!(days_in_month(2023, 1), 28);
        assert_eq!(days_in_month(1900, 1), 28);
        assert_eq!(days_in_month(2000, 1), 29);
        assert_eq!(days_in_month(2024, 0), 31);
        assert_eq!(days_in_month(2024, 3), 30);
        assert_eq!(days_in_month(2024, 11), 31);
        assert_eq!(days_in_month(2024, 12), 0);
    }

    #[test]
    fn days_in_month_at_extreme_years_does_not_overflow() {
        assert_eq!(days_in_month(i32::MAX, 11), 0);
        assert_eq!(days_in_month(i32::MIN, 0), 0);
    }

    #[test]
    fn week_of_month_starts_on_sunday() {
        // 1 de março de 2024 é uma sexta-feira (weekday 5)
        assert_eq!(week_of_month(2024, 2, 1), Some(1));
        assert_eq!(week_of_month(2024, 2, 2), Some(1));
        assert_eq!(week_of_month(2024, 2, 3), Some(2));
        assert_eq!(week_of_month(2024, 2, 29), Some(5));
        assert_eq!(week_of_month(2024, 2, 31), Some(6));
        // setembro de 2024 começa num domingo
        assert_eq!(week_of_month(2024, 8, 7), Some(1));
        assert_eq!(week_of_month(2024, 8, 8), Some(2));
        assert_eq!(week_of_month(2024, 13, 1), None);
    }

    #[test]
    fn sanitize_accepts_only_strict_iso_dates() {
        assert_eq!(sanitize_date_string(Some(" 2024-03-01 ")), Some("2024-03-01".to_string()));
        assert_eq!(sanitize_date_string(Some("2024-3-1")), None);
        assert_eq!(sanitize_date_string(Some("2024/03/01")), None);
        assert_eq!(sanitize_date_string(Some("2024-03-01T00:00")), None);
        assert_eq!(sanitize_date_string(Some("")), None);
        assert_eq!(sanitize_date_string(None), None);
        // formato apenas, sem validar o calendário
        assert_eq!(sanitize_date_string(Some("2024-13-45")), Some("2024-13-45".to_string()));
    }

    #[test]
    fn sanitize_is_idempotent() {
        for input in ["2024-01-01", "  1999-12-31", "bad", "2024-1-01", "", "0000-00-00 "] {
            let once = sanitize_date_string(Some(input));
            let twice = sanitize_date_string(once.as_deref());
            assert_eq!(once, twice, "input {input:?}");
        }
    }

    #[test]
    fn parse_date_parts_round_trips_format_date() {
        for (y, m, d) in [(2024, 0, 1), (2023, 1, 28), (2024, 11, 31), (1999, 6, 15)] {
            let parsed = parse_date_parts(&format_date(y, m, d));
            assert_eq!(parsed, Some(DateParts { year: y, month_index0: m, day: d }));
        }
    }

    #[test]
    fn parse_date_parts_rejects_garbage() {
        assert_eq!(parse_date_parts("2024-xx-01"), None);
        assert_eq!(parse_date_parts("2024-05"), None);
        assert_eq!(parse_date_parts("2024-00-10"), None);
        assert_eq!(parse_date_parts("2024-01-01-01"), None);
    }

    #[test]
    fn month_abbrev_lookup() {
        assert_eq!(month_abbrev(0), Some("Jan"));
        assert_eq!(month_abbrev(11), Some("Dec"));
        assert_eq!(month_abbrev(12), None);
        assert_eq!(month_index_of("Jun"), Some(5));
        assert_eq!(month_index_of("June"), None);
    }
}
