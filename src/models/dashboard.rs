// src/models/dashboard.rs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

// =============================================================================
//  LINHAS DE ENTRADA (vindas do SalesSource)
// =============================================================================

// Variante "resumo": só data + quantidade, usada para metadados e somas por período.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SaleSummary {
    pub id: i64,
    pub date: String, // sempre YYYY-MM-DD
    pub quantity: f64,
    pub store_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreRef {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub slug: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedRef {
    pub id: Option<i64>,
    pub name: Option<String>,
}

// Variante "detalhada": com loja, categoria e produto populados.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRecord {
    pub id: i64,
    pub date: String,
    pub quantity: f64,
    pub store: Option<StoreRef>,
    pub category: Option<NamedRef>,
    pub product: Option<NamedRef>,
}

// Linha achatada do JOIN; convertida em SaleRecord logo após o fetch.
#[derive(Debug, Clone, FromRow)]
pub struct DetailedSaleRow {
    pub id: i64,
    pub date: String,
    pub quantity: Option<f64>,
    pub store_id: Option<i64>,
    pub store_name: Option<String>,
    pub store_slug: Option<String>,
    pub category_id: Option<i64>,
    pub category_name: Option<String>,
    pub product_id: Option<i64>,
    pub product_name: Option<String>,
}

impl From<DetailedSaleRow> for SaleRecord {
    fn from(row: DetailedSaleRow) -> Self {
        let store = (row.store_id.is_some() || row.store_name.is_some()).then(|| StoreRef {
            id: row.store_id,
            name: row.store_name,
            slug: row.store_slug,
        });
        let category = (row.category_id.is_some() || row.category_name.is_some()).then(|| NamedRef {
            id: row.category_id,
            name: row.category_name,
        });
        let product = (row.product_id.is_some() || row.product_name.is_some()).then(|| NamedRef {
            id: row.product_id,
            name: row.product_name,
        });

        Self {
            id: row.id,
            date: row.date,
            quantity: row.quantity.unwrap_or(0.0),
            store,
            category,
            product,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoreTotal {
    pub store_id: i64,
    pub name: String,
    pub slug: Option<String>,
    pub total_quantity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoreInfo {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

// =============================================================================
//  TIPOS DO FILTRO
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    Yearly,
    Monthly,
    Weekly,
    Daily,
    Tomorrow,
    Custom,
    All,
}

impl FilterType {
    /// Valor desconhecido (ou ausente) cai para `yearly`.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_lowercase()).as_deref() {
            Some("monthly") => FilterType::Monthly,
            Some("weekly") => FilterType::Weekly,
            Some("daily") => FilterType::Daily,
            Some("tomorrow") => FilterType::Tomorrow,
            Some("custom") => FilterType::Custom,
            Some("all") => FilterType::All,
            _ => FilterType::Yearly,
        }
    }

    pub fn requires_year(self) -> bool {
        matches!(self, FilterType::Yearly | FilterType::Monthly)
    }
}

// =============================================================================
//  BLOCOS DA RESPOSTA
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RankingEntry {
    pub label: String,
    pub sales: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySeries {
    pub months: Vec<String>,
    pub sales: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Month,
    Week,
    Day,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NamedSeries {
    pub name: String,
    pub data: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeries {
    pub granularity: Granularity,
    pub labels: Vec<String>,
    pub is_multiple_series: bool,
    pub series: Vec<NamedSeries>,
}

// O filtro efetivamente aplicado, devolvido ao cliente
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FilterEcho {
    pub filter_type: FilterType,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub store_ids: Vec<i64>,
    pub previous_start_date: Option<String>,
    pub previous_end_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DefaultsBlock {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub store_ids: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoreOption {
    pub id: i64,
    pub name: String,
    pub slug: Option<String>,
    pub total_sales: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MetadataBlock {
    pub available_years: Vec<i32>,
    pub available_months: Vec<u32>, // meses (base 0) do ano resolvido
    pub months_by_year: BTreeMap<i32, Vec<u32>>,
    pub defaults: DefaultsBlock,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stores: Option<Vec<StoreOption>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TotalsBlock {
    pub total_quantity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_count: Option<usize>,
    pub today_quantity: f64,
    pub previous_period_quantity: f64,
    pub percentage_change: f64,
    pub current_target: f64,
    pub target_progress: f64,
    pub remaining_target: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HighlightsBlock {
    pub top_categories: Vec<RankingEntry>,
    pub top_products: Vec<RankingEntry>,
    pub top10_categories: Vec<RankingEntry>,
    pub top10_products: Vec<RankingEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GlobalCharts {
    pub time_series: TimeSeries,
    pub category_distribution: ChartData,
    pub product_distribution: ChartData, // limitado ao top 10
    pub store_distribution: ChartData,
    pub store_totals: Vec<RankingEntry>,
    pub monthly_sales: MonthlySeries,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoreCharts {
    pub time_series: TimeSeries,
    pub category_distribution: ChartData,
    pub product_distribution: ChartData,
    pub monthly_sales: MonthlySeries,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoreRankingEntry {
    pub store_id: Option<i64>,
    pub name: String,
    pub slug: Option<String>,
    pub total_sales: f64,
    pub today_sales: f64,
    pub top_category: Option<String>,
    pub top_product: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoreBreakdown {
    pub store_id: Option<i64>,
    pub name: String,
    pub slug: Option<String>,
    pub total_sales: f64,
    pub today_sales: f64,
    pub top_category: Option<String>,
    pub top_product: Option<String>,
    pub categories: Vec<RankingEntry>,
    pub products: Vec<RankingEntry>,
    pub monthly_sales: MonthlySeries,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoresBlock {
    pub ranking: Vec<StoreRankingEntry>,
    pub breakdown: Vec<StoreBreakdown>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CountsBlock {
    pub sales_records: usize,
    pub stores: usize,
    pub categories: usize,
    pub products: usize,
}

// GET /api/dashboard/sales/overview
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GlobalOverview {
    pub filter: FilterEcho,
    pub metadata: MetadataBlock,
    pub totals: TotalsBlock,
    pub highlights: HighlightsBlock,
    pub charts: GlobalCharts,
    pub stores: StoresBlock,
    pub counts: CountsBlock,
}

// GET /api/dashboard/sales/store/{storeSlug}
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoreOverview {
    pub store: StoreInfo,
    pub filter: FilterEcho,
    pub metadata: MetadataBlock,
    pub totals: TotalsBlock,
    pub highlights: HighlightsBlock,
    pub charts: StoreCharts,
    pub counts: CountsBlock,
}
