// src/services/dashboard_service.rs

use std::{borrow::Cow, sync::Arc};

use chrono::{Local, NaiveDate};

use crate::{
    analytics::{
        filters::{normalize_filter, RawFilterParams, SalesMetadata},
        overview::{build_global_overview, build_store_overview, OverviewInput},
    },
    common::error::AppError,
    db::SalesSource,
    models::dashboard::{GlobalOverview, SaleSummary, StoreOverview},
};

#[derive(Clone)]
pub struct DashboardService {
    source: Arc<dyn SalesSource>,
}

fn scope_to_stores<'a>(rows: &'a [SaleSummary], store_ids: &[i64]) -> Cow<'a, [SaleSummary]> {
    if store_ids.is_empty() {
        return Cow::Borrowed(rows);
    }
    Cow::Owned(
        rows.iter()
            .filter(|row| row.store_id.is_some_and(|id| store_ids.contains(&id)))
            .cloned()
            .collect(),
    )
}

impl DashboardService {
    pub fn new(source: Arc<dyn SalesSource>) -> Self {
        Self { source }
    }

    // "Hoje" é lido uma única vez por requisição, à meia-noite local.
    pub async fn get_overview(&self, raw: &RawFilterParams) -> Result<GlobalOverview, AppError> {
        self.get_overview_at(raw, Local::now().date_naive()).await
    }

    pub async fn get_store_overview(
        &self,
        store_slug: &str,
        raw: &RawFilterParams,
    ) -> Result<StoreOverview, AppError> {
        self.get_store_overview_at(store_slug, raw, Local::now().date_naive())
            .await
    }

    pub async fn get_overview_at(
        &self,
        raw: &RawFilterParams,
        today: NaiveDate,
    ) -> Result<GlobalOverview, AppError> {
        let (all_rows, store_totals) =
            tokio::try_join!(self.source.summary_rows(), self.source.store_totals())?;

        let metadata = SalesMetadata::from_rows(&all_rows);
        let filter = normalize_filter(raw, &metadata, today)?;

        let detailed_rows = self
            .source
            .detailed_rows(&filter.range, &filter.store_ids)
            .await?;
        let scoped_rows = scope_to_stores(&all_rows, &filter.store_ids);

        tracing::debug!(
            filter_type = ?filter.filter_type,
            start = ?filter.range.start_date,
            end = ?filter.range.end_date,
            stores = ?filter.store_ids,
            rows = detailed_rows.len(),
            "Montando visão geral de vendas"
        );

        let input = OverviewInput {
            metadata: &metadata,
            scoped_rows: &scoped_rows,
            detailed_rows: &detailed_rows,
            filter: &filter,
            today,
        };
        Ok(build_global_overview(&input, &store_totals))
    }

    pub async fn get_store_overview_at(
        &self,
        store_slug: &str,
        raw: &RawFilterParams,
        today: NaiveDate,
    ) -> Result<StoreOverview, AppError> {
        let slug = store_slug.trim();
        if slug.is_empty() {
            return Err(AppError::MissingParameter("storeSlug".to_string()));
        }

        let store = self
            .source
            .find_store_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::StoreNotFound(slug.to_string()))?;

        let all_rows = self.source.summary_rows().await?;
        let store_ids = [store.id];
        let scoped_rows = scope_to_stores(&all_rows, &store_ids);

        let metadata = SalesMetadata::from_rows(&scoped_rows);
        let mut filter = normalize_filter(raw, &metadata, today)?;
        // O filtro de lojas do chamador é ignorado aqui
        filter.store_ids = store_ids.to_vec();

        let detailed_rows = self
            .source
            .detailed_rows(&filter.range, &filter.store_ids)
            .await?;

        tracing::debug!(
            store = %store.slug,
            filter_type = ?filter.filter_type,
            rows = detailed_rows.len(),
            "Montando visão da loja"
        );

        let input = OverviewInput {
            metadata: &metadata,
            scoped_rows: &scoped_rows,
            detailed_rows: &detailed_rows,
            filter: &filter,
            today,
        };
        Ok(build_store_overview(store, &input))
    }
}
