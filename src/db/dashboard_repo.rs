// src/db/dashboard_repo.rs

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    analytics::filters::DateRange,
    common::error::AppError,
    models::dashboard::{DetailedSaleRow, SaleRecord, SaleSummary, StoreInfo, StoreTotal},
};

/// De onde o dashboard lê as vendas. O motor de agregação só consome os
/// vetores devolvidos aqui; quem monta as queries é a implementação.
#[async_trait]
pub trait SalesSource: Send + Sync {
    /// Todas as vendas, sem filtro (id, data, quantidade, loja).
    async fn summary_rows(&self) -> Result<Vec<SaleSummary>, AppError>;

    /// Vendas com loja/categoria/produto, restritas ao intervalo e às lojas
    /// (lista vazia = todas as lojas).
    async fn detailed_rows(
        &self,
        range: &DateRange,
        store_ids: &[i64],
    ) -> Result<Vec<SaleRecord>, AppError>;

    /// Total histórico por loja, decrescente.
    async fn store_totals(&self) -> Result<Vec<StoreTotal>, AppError>;

    async fn find_store_by_slug(&self, slug: &str) -> Result<Option<StoreInfo>, AppError>;
}

#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SalesSource for DashboardRepository {
    async fn summary_rows(&self) -> Result<Vec<SaleSummary>, AppError> {
        let rows = sqlx::query_as::<_, SaleSummary>(
            r#"
            SELECT
                s.id,
                to_char(s.sale_date, 'YYYY-MM-DD') AS date,
                COALESCE(s.quantity, 0)::float8 AS quantity,
                s.store_id
            FROM sales s
            ORDER BY s.sale_date ASC, s.id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn detailed_rows(
        &self,
        range: &DateRange,
        store_ids: &[i64],
    ) -> Result<Vec<SaleRecord>, AppError> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
            r#"
            SELECT
                s.id,
                to_char(s.sale_date, 'YYYY-MM-DD') AS date,
                s.quantity::float8 AS quantity,
                st.id AS store_id,
                st.name AS store_name,
                st.slug AS store_slug,
                c.id AS category_id,
                c.name AS category_name,
                p.id AS product_id,
                p.name AS product_name
            FROM sales s
            LEFT JOIN stores st ON st.id = s.store_id
            LEFT JOIN categories c ON c.id = s.category_id
            LEFT JOIN products p ON p.id = s.product_id
            WHERE TRUE
            "#,
        );

        // Comparação como texto ISO, igual à do motor em memória
        if let Some(start) = &range.start_date {
            qb.push(" AND to_char(s.sale_date, 'YYYY-MM-DD') >= ")
                .push_bind(start.clone());
        }
        if let Some(end) = &range.end_date {
            qb.push(" AND to_char(s.sale_date, 'YYYY-MM-DD') <= ")
                .push_bind(end.clone());
        }
        if !store_ids.is_empty() {
            qb.push(" AND s.store_id = ANY(")
                .push_bind(store_ids.to_vec())
                .push(")");
        }
        qb.push(" ORDER BY s.sale_date ASC, s.id ASC");

        let rows = qb
            .build_query_as::<DetailedSaleRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(SaleRecord::from).collect())
    }

    async fn store_totals(&self) -> Result<Vec<StoreTotal>, AppError> {
        let rows = sqlx::query_as::<_, StoreTotal>(
            r#"
            SELECT
                st.id AS store_id,
                st.name,
                st.slug,
                COALESCE(SUM(s.quantity), 0)::float8 AS total_quantity
            FROM stores st
            LEFT JOIN sales s ON s.store_id = st.id
            GROUP BY st.id, st.name, st.slug
            ORDER BY total_quantity DESC, st.id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn find_store_by_slug(&self, slug: &str) -> Result<Option<StoreInfo>, AppError> {
        let store = sqlx::query_as::<_, StoreInfo>("SELECT id, name, slug FROM stores WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;

        Ok(store)
    }
}
