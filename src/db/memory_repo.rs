// src/db/memory_repo.rs
//
// SalesSource em memória para os testes de serviço e de handler.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::{
    analytics::filters::DateRange,
    common::error::AppError,
    db::SalesSource,
    models::dashboard::{SaleRecord, SaleSummary, StoreInfo, StoreTotal},
};

#[derive(Debug, Clone, Default)]
pub struct InMemorySalesSource {
    stores: Vec<StoreInfo>,
    records: Vec<SaleRecord>,
}

impl InMemorySalesSource {
    pub fn new(stores: Vec<StoreInfo>, records: Vec<SaleRecord>) -> Self {
        Self { stores, records }
    }
}

#[async_trait]
impl SalesSource for InMemorySalesSource {
    async fn summary_rows(&self) -> Result<Vec<SaleSummary>, AppError> {
        Ok(self
            .records
            .iter()
            .map(|r| SaleSummary {
                id: r.id,
                date: r.date.clone(),
                quantity: r.quantity,
                store_id: r.store.as_ref().and_then(|s| s.id),
            })
            .collect())
    }

    async fn detailed_rows(
        &self,
        range: &DateRange,
        store_ids: &[i64],
    ) -> Result<Vec<SaleRecord>, AppError> {
        Ok(self
            .records
            .iter()
            .filter(|r| range.contains(&r.date))
            .filter(|r| {
                store_ids.is_empty()
                    || r.store.as_ref().and_then(|s| s.id).is_some_and(|id| store_ids.contains(&id))
            })
            .cloned()
            .collect())
    }

    async fn store_totals(&self) -> Result<Vec<StoreTotal>, AppError> {
        let mut by_store: HashMap<i64, f64> = HashMap::new();
        for record in &self.records {
            if let Some(id) = record.store.as_ref().and_then(|s| s.id) {
                *by_store.entry(id).or_insert(0.0) += record.quantity;
            }
        }

        let mut totals: Vec<StoreTotal> = self
            .stores
            .iter()
            .map(|s| StoreTotal {
                store_id: s.id,
                name: s.name.clone(),
                slug: Some(s.slug.clone()),
                total_quantity: by_store.get(&s.id).copied().unwrap_or(0.0),
            })
            .collect();
        totals.sort_by(|a, b| b.total_quantity.total_cmp(&a.total_quantity));
        Ok(totals)
    }

    async fn find_store_by_slug(&self, slug: &str) -> Result<Option<StoreInfo>, AppError> {
        Ok(self.stores.iter().find(|s| s.slug == slug).cloned())
    }
}
