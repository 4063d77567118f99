// src/handlers/dashboard.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use crate::{
    analytics::filters::RawFilterParams,
    common::error::AppError,
    config::AppState,
    models::dashboard::{GlobalOverview, StoreOverview},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/overview", get(get_sales_overview))
        .route("/store", get(missing_store_slug))
        .route("/store/", get(missing_store_slug))
        .route("/store/{store_slug}", get(get_store_overview))
}

// GET /api/dashboard/sales/overview
#[utoipa::path(
    get,
    path = "/api/dashboard/sales/overview",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Visão geral de vendas de todas as lojas", body = GlobalOverview),
        (status = 400, description = "Intervalo custom inválido")
    ),
    params(
        ("filterType" = Option<String>, Query, description = "yearly | monthly | weekly | daily | tomorrow | custom | all"),
        ("year" = Option<i32>, Query, description = "Ano (alias: selectedYear)"),
        ("month" = Option<u32>, Query, description = "Mês base 0 (alias: selectedMonth)"),
        ("fromDate" = Option<String>, Query, description = "YYYY-MM-DD (alias: startDate)"),
        ("toDate" = Option<String>, Query, description = "YYYY-MM-DD (alias: endDate)"),
        ("storeIds" = Option<String>, Query, description = "Ids separados por vírgula ou repetidos (alias: storeId, stores)")
    )
)]
pub async fn get_sales_overview(
    State(app_state): State<AppState>,
    Query(query): Query<Vec<(String, String)>>,
) -> Result<impl IntoResponse, AppError> {
    let raw = RawFilterParams::from(query);

    let overview = app_state.dashboard_service.get_overview(&raw).await?;

    Ok((StatusCode::OK, Json(overview)))
}

// GET /api/dashboard/sales/store/{store_slug}
#[utoipa::path(
    get,
    path = "/api/dashboard/sales/store/{store_slug}",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Visão de vendas de uma loja", body = StoreOverview),
        (status = 400, description = "Intervalo custom inválido ou slug ausente"),
        (status = 404, description = "Loja não encontrada")
    ),
    params(
        ("store_slug" = String, Path, description = "Slug da loja"),
        ("filterType" = Option<String>, Query, description = "yearly | monthly | weekly | daily | tomorrow | custom | all"),
        ("year" = Option<i32>, Query, description = "Ano (alias: selectedYear)"),
        ("month" = Option<u32>, Query, description = "Mês base 0 (alias: selectedMonth)"),
        ("fromDate" = Option<String>, Query, description = "YYYY-MM-DD (alias: startDate)"),
        ("toDate" = Option<String>, Query, description = "YYYY-MM-DD (alias: endDate)")
    )
)]
pub async fn get_store_overview(
    State(app_state): State<AppState>,
    Path(store_slug): Path<String>,
    Query(query): Query<Vec<(String, String)>>,
) -> Result<impl IntoResponse, AppError> {
    let raw = RawFilterParams::from(query);

    let overview = app_state
        .dashboard_service
        .get_store_overview(&store_slug, &raw)
        .await?;

    Ok((StatusCode::OK, Json(overview)))
}

async fn missing_store_slug() -> AppError {
    AppError::MissingParameter("storeSlug".to_string())
}
