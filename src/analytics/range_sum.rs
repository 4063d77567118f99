// src/analytics/range_sum.rs

use crate::{
    analytics::filters::DateRange,
    models::dashboard::{SaleRecord, SaleSummary},
};

/// Quantidade inválida (NaN, infinito) conta como zero.
pub fn coerce_quantity(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// O mínimo que as agregações por data precisam de uma linha.
pub trait DatedQuantity {
    fn date(&self) -> &str;
    fn raw_quantity(&self) -> f64;

    fn quantity(&self) -> f64 {
        coerce_quantity(self.raw_quantity())
    }
}

impl DatedQuantity for SaleSummary {
    fn date(&self) -> &str {
        &self.date
    }

    fn raw_quantity(&self) -> f64 {
        self.quantity
    }
}

impl DatedQuantity for SaleRecord {
    fn date(&self) -> &str {
        &self.date
    }

    fn raw_quantity(&self) -> f64 {
        self.quantity
    }
}

/// Soma as quantidades das linhas dentro do intervalo (inclusivo).
/// Sem intervalo (`None`) não há comparação possível e o resultado é 0.
pub fn sum_in_range<R: DatedQuantity>(rows: &[R], range: Option<&DateRange>) -> f64 {
    let Some(range) = range else {
        return 0.0;
    };
    rows.iter()
        .filter(|row| range.contains(row.date()))
        .map(DatedQuantity::quantity)
        .sum()
}
