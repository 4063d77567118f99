// src/docs.rs

use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Dashboard de vendas ---
        handlers::dashboard::get_sales_overview,
        handlers::dashboard::get_store_overview,
    ),
    components(
        schemas(
            models::dashboard::GlobalOverview,
            models::dashboard::StoreOverview,
            models::dashboard::FilterEcho,
            models::dashboard::FilterType,
            models::dashboard::MetadataBlock,
            models::dashboard::DefaultsBlock,
            models::dashboard::StoreOption,
            models::dashboard::TotalsBlock,
            models::dashboard::HighlightsBlock,
            models::dashboard::GlobalCharts,
            models::dashboard::StoreCharts,
            models::dashboard::TimeSeries,
            models::dashboard::NamedSeries,
            models::dashboard::Granularity,
            models::dashboard::ChartData,
            models::dashboard::MonthlySeries,
            models::dashboard::RankingEntry,
            models::dashboard::StoresBlock,
            models::dashboard::StoreRankingEntry,
            models::dashboard::StoreBreakdown,
            models::dashboard::CountsBlock,
            models::dashboard::StoreInfo,
        )
    ),
    tags(
        (name = "Dashboard", description = "Agregações de vendas por período, loja, categoria e produto")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_both_dashboard_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/dashboard/sales/overview"));
        assert!(doc.paths.paths.contains_key("/api/dashboard/sales/store/{store_slug}"));
    }
}
