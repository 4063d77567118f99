// src/analytics/store_performance.rs

use std::collections::HashMap;

use crate::{
    analytics::{range_sum::DatedQuantity, rankings::LabelTotals},
    common::dates::{month_abbrev, parse_date_parts},
    models::dashboard::{NamedRef, SaleRecord},
};

pub const UNKNOWN_STORE: &str = "Unknown Store";

// Id numérico quando existir; senão o nome de exibição.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum StoreKey {
    Id(i64),
    Name(String),
}

#[derive(Debug, Clone)]
pub struct StoreAggregate {
    pub store_id: Option<i64>,
    pub name: String,
    pub slug: Option<String>,
    pub total: f64,
    pub today_total: f64,
    pub categories: LabelTotals,
    pub products: LabelTotals,
    pub months: LabelTotals,
}

impl StoreAggregate {
    fn new(store_id: Option<i64>, name: String, slug: Option<String>) -> Self {
        Self {
            store_id,
            name,
            slug,
            total: 0.0,
            today_total: 0.0,
            categories: LabelTotals::new(),
            products: LabelTotals::new(),
            months: LabelTotals::new(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StorePerformance {
    pub grand_total: f64,
    pub today_total: f64,
    pub categories: LabelTotals,
    pub products: LabelTotals,
    pub months: LabelTotals,
    pub stores: Vec<StoreAggregate>, // total decrescente
    pub rows_seen: usize,
}

fn ref_label(reference: Option<&NamedRef>) -> Option<&str> {
    reference
        .and_then(|r| r.name.as_deref())
        .map(str::trim)
        .filter(|name| !name.is_empty())
}

/// Uma única passada pelas linhas detalhadas já filtradas.
pub fn aggregate_store_performance(rows: &[SaleRecord], today: &str) -> StorePerformance {
    let mut perf = StorePerformance::default();
    let mut index: HashMap<StoreKey, usize> = HashMap::new();

    for row in rows {
        let quantity = row.quantity();
        let is_today = row.date == today;

        let store_id = row.store.as_ref().and_then(|s| s.id);
        let name = row
            .store
            .as_ref()
            .and_then(|s| s.name.as_deref())
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(UNKNOWN_STORE)
            .to_string();
        let key = match store_id {
            Some(id) => StoreKey::Id(id),
            None => StoreKey::Name(name.clone()),
        };

        let pos = *index.entry(key).or_insert_with(|| {
            let slug = row.store.as_ref().and_then(|s| s.slug.clone());
            perf.stores.push(StoreAggregate::new(store_id, name, slug));
            perf.stores.len() - 1
        });
        let store = &mut perf.stores[pos];

        store.total += quantity;
        perf.grand_total += quantity;
        if is_today {
            store.today_total += quantity;
            perf.today_total += quantity;
        }

        if let Some(category) = ref_label(row.category.as_ref()) {
            store.categories.add(category, quantity);
            perf.categories.add(category, quantity);
        }
        if let Some(product) = ref_label(row.product.as_ref()) {
            store.products.add(product, quantity);
            perf.products.add(product, quantity);
        }
        if let Some(month) = parse_date_parts(&row.date).and_then(|p| month_abbrev(p.month_index0)) {
            store.months.add(month, quantity);
            perf.months.add(month, quantity);
        }

        perf.rows_seen += 1;
    }

    perf.stores.sort_by(|a, b| b.total.total_cmp(&a.total));
    perf
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::dashboard::StoreRef;

    fn sale(date: &str, qty: f64, store: Option<(Option<i64>, &str)>, category: &str, product: &str) -> SaleRecord {
        SaleRecord {
            id: 0,
            date: date.to_string(),
            quantity: qty,
            store: store.map(|(id, name)| StoreRef {
                id,
                name: Some(name.to_string()),
                slug: Some(name.to_lowercase()),
            }),
            category: Some(NamedRef { id: None, name: Some(category.to_string()) }),
            product: Some(NamedRef { id: None, name: Some(product.to_string()) }),
        }
    }

    #[test]
    fn aggregates_per_store_and_globally_in_one_pass() {
        let rows = vec![
            sale("2024-07-17", 2.0, Some((Some(1), "Centro")), "Bebidas", "Suco"),
            sale("2024-07-16", 5.0, Some((Some(2), "Norte")), "Doces", "Bolo"),
            sale("2024-06-01", 3.0, Some((Some(1), "Centro")), "Doces", "Bolo"),
            sale("2024-07-17", 4.0, Some((Some(2), "Norte")), "Bebidas", "Café"),
        ];
        let perf = aggregate_store_performance(&rows, "2024-07-17");

        assert_eq!(perf.rows_seen, 4);
        assert_eq!(perf.grand_total, 14.0);
        assert_eq!(perf.today_total, 6.0);
        assert_eq!(perf.categories.get("Doces"), Some(8.0));
        assert_eq!(perf.months.get("Jul"), Some(11.0));
        assert_eq!(perf.months.get("Jun"), Some(3.0));

        assert_eq!(perf.stores.len(), 2);
        let norte = &perf.stores[0];
        assert_eq!(norte.store_id, Some(2));
        assert_eq!(norte.total, 9.0);
        assert_eq!(norte.today_total, 4.0);
        assert_eq!(norte.slug.as_deref(), Some("norte"));
        let centro = &perf.stores[1];
        assert_eq!(centro.total, 5.0);
        assert_eq!(centro.products.get("Bolo"), Some(3.0));
        assert_eq!(centro.months.get("Jun"), Some(3.0));
    }

    #[test]
    fn stores_without_id_are_keyed_by_name() {
        let rows = vec![
            sale("2024-01-01", 1.0, Some((None, "Quiosque")), "A", "a"),
            sale("2024-01-02", 1.0, Some((None, "Quiosque")), "A", "a"),
            sale("2024-01-03", 2.0, None, "A", "a"),
        ];
        let perf = aggregate_store_performance(&rows, "2000-01-01");

        assert_eq!(perf.stores.len(), 2);
        assert_eq!(perf.stores[0].name, "Quiosque");
        assert_eq!(perf.stores[0].total, 2.0);
        assert_eq!(perf.stores[1].name, UNKNOWN_STORE);
        assert_eq!(perf.stores[1].store_id, None);
        assert_eq!(perf.today_total, 0.0);
    }

    #[test]
    fn skips_blank_labels_and_invalid_quantities() {
        let mut row = sale("2024-01-01", f64::NAN, Some((Some(1), "Centro")), " ", "p");
        row.product = None;
        let perf = aggregate_store_performance(&[row], "2024-01-01");
        assert_eq!(perf.grand_total, 0.0);
        assert!(perf.categories.is_empty());
        assert!(perf.products.is_empty());
        assert_eq!(perf.stores[0].total, 0.0);
    }

    #[test]
    fn empty_input_yields_empty_performance() {
        let perf = aggregate_store_performance(&[], "2024-01-01");
        assert_eq!(perf.grand_total, 0.0);
        assert!(perf.stores.is_empty());
    }
}
