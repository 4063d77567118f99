// src/analytics/overview.rs

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::{
    analytics::{
        filters::{previous_range, FilterSpec, SalesMetadata},
        range_sum::sum_in_range,
        rankings::{
            build_chart_data, build_chart_data_limited, build_monthly_series, build_rankings, top_label,
            LabelTotals,
        },
        series::build_time_series,
        store_performance::{aggregate_store_performance, StoreAggregate, StorePerformance},
    },
    common::dates::format_naive,
    models::dashboard::{
        CountsBlock, DefaultsBlock, FilterEcho, GlobalCharts, GlobalOverview, HighlightsBlock,
        MetadataBlock, RankingEntry, SaleRecord, SaleSummary, StoreBreakdown, StoreCharts, StoreInfo,
        StoreOption, StoreOverview, StoreRankingEntry, StoreTotal, StoresBlock, TotalsBlock,
    },
};

const HIGHLIGHT_LIMIT: usize = 3;
const TOP_LIMIT: usize = 10;
const BREAKDOWN_LIMIT: usize = 5;
const DEFAULT_STORE_SELECTION: usize = 3;

const TARGET_STEP: f64 = 1000.0;
const TARGET_GROWTH: f64 = 1.8;

/// Tudo que o montador precisa, já buscado e normalizado.
pub struct OverviewInput<'a> {
    /// Linhas resumo sem filtro de data: base dos metadados.
    pub metadata: &'a SalesMetadata,
    /// Linhas resumo restritas às lojas selecionadas (sem filtro de data):
    /// série temporal yearly/monthly e soma do período anterior.
    pub scoped_rows: &'a [SaleSummary],
    /// Linhas detalhadas dentro do intervalo ativo.
    pub detailed_rows: &'a [SaleRecord],
    pub filter: &'a FilterSpec,
    pub today: NaiveDate,
}

// ---
// Métricas derivadas
// ---

/// Duas casas, metade sempre para cima (-3.125 -> -3.12).
pub fn round2(value: f64) -> f64 {
    (value * 100.0 + 0.5).floor() / 100.0
}

pub fn percentage_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return 0.0;
    }
    round2((current - previous) / previous * 100.0)
}

/// Próximo múltiplo de 1000 pelo menos 80% acima do total atual, mínimo 1000.
pub fn dynamic_target(current: f64) -> f64 {
    if current == 0.0 {
        return 0.0;
    }
    let stepped = (current * TARGET_GROWTH / TARGET_STEP).ceil() * TARGET_STEP;
    stepped.max(TARGET_STEP)
}

pub fn target_progress(current: f64, target: f64) -> f64 {
    if target == 0.0 {
        return 0.0;
    }
    round2((current / target * 100.0).clamp(0.0, 100.0))
}

pub fn remaining_target(current: f64, target: f64) -> f64 {
    if target == 0.0 {
        return 0.0;
    }
    (target - current).max(0.0)
}

fn totals_block(current: f64, today: f64, previous: f64, store_count: Option<usize>) -> TotalsBlock {
    let target = dynamic_target(current);
    TotalsBlock {
        total_quantity: current,
        store_count,
        today_quantity: today,
        previous_period_quantity: previous,
        percentage_change: percentage_change(current, previous),
        current_target: target,
        target_progress: target_progress(current, target),
        remaining_target: remaining_target(current, target),
    }
}

// ---
// Blocos compartilhados
// ---

struct Shared {
    filter: FilterEcho,
    previous_quantity: f64,
    performance: StorePerformance,
}

fn compute_shared(input: &OverviewInput<'_>) -> Shared {
    let previous = previous_range(input.filter);
    let previous_quantity = sum_in_range(input.scoped_rows, previous.as_ref());
    let performance = aggregate_store_performance(input.detailed_rows, &format_naive(input.today));

    let (previous_start_date, previous_end_date) = match previous {
        Some(range) => (range.start_date, range.end_date),
        None => (None, None),
    };

    Shared {
        filter: FilterEcho {
            filter_type: input.filter.filter_type,
            year: input.filter.year,
            month: input.filter.month,
            start_date: input.filter.range.start_date.clone(),
            end_date: input.filter.range.end_date.clone(),
            store_ids: input.filter.store_ids.clone(),
            previous_start_date,
            previous_end_date,
        },
        previous_quantity,
        performance,
    }
}

fn metadata_block(
    input: &OverviewInput<'_>,
    default_store_ids: Vec<i64>,
    stores: Option<Vec<StoreOption>>,
) -> MetadataBlock {
    let available_months = input
        .filter
        .year
        .or(input.filter.defaults.year)
        .map(|y| input.metadata.months_for(y))
        .unwrap_or_default();

    MetadataBlock {
        available_years: input.metadata.available_years.clone(),
        available_months,
        months_by_year: input.metadata.months_by_year.clone(),
        defaults: DefaultsBlock {
            year: input.filter.defaults.year,
            month: input.filter.defaults.month,
            store_ids: default_store_ids,
        },
        stores,
    }
}

fn highlights_block(perf: &StorePerformance) -> HighlightsBlock {
    HighlightsBlock {
        top_categories: build_rankings(&perf.categories, Some(HIGHLIGHT_LIMIT)),
        top_products: build_rankings(&perf.products, Some(HIGHLIGHT_LIMIT)),
        top10_categories: build_rankings(&perf.categories, Some(TOP_LIMIT)),
        top10_products: build_rankings(&perf.products, Some(TOP_LIMIT)),
    }
}

fn counts_block(perf: &StorePerformance) -> CountsBlock {
    CountsBlock {
        sales_records: perf.rows_seen,
        stores: perf.stores.len(),
        categories: perf.categories.len(),
        products: perf.products.len(),
    }
}

fn store_ranking_entry(store: &StoreAggregate) -> StoreRankingEntry {
    StoreRankingEntry {
        store_id: store.store_id,
        name: store.name.clone(),
        slug: store.slug.clone(),
        total_sales: store.total,
        today_sales: store.today_total,
        top_category: top_label(&store.categories),
        top_product: top_label(&store.products),
    }
}

fn store_breakdown(store: &StoreAggregate) -> StoreBreakdown {
    StoreBreakdown {
        store_id: store.store_id,
        name: store.name.clone(),
        slug: store.slug.clone(),
        total_sales: store.total,
        today_sales: store.today_total,
        top_category: top_label(&store.categories),
        top_product: top_label(&store.products),
        categories: build_rankings(&store.categories, None),
        products: build_rankings(&store.products, None),
        monthly_sales: build_monthly_series(&store.months),
    }
}

/// Rótulos do gráfico por loja. Lojas distintas com o mesmo nome ganham
/// o id (ou o slug) no rótulo para não serem somadas juntas.
fn store_distribution_labels(stores: &[StoreAggregate]) -> LabelTotals {
    let mut name_counts: HashMap<&str, usize> = HashMap::new();
    for store in stores {
        *name_counts.entry(store.name.as_str()).or_insert(0) += 1;
    }

    stores
        .iter()
        .map(|store| {
            let label = if name_counts[store.name.as_str()] > 1 {
                match (store.store_id, store.slug.as_deref()) {
                    (Some(id), _) => format!("{} #{}", store.name, id),
                    (None, Some(slug)) => format!("{} ({})", store.name, slug),
                    (None, None) => store.name.clone(),
                }
            } else {
                store.name.clone()
            };
            (label, store.total)
        })
        .collect()
}

// ---
// Pontos de entrada
// ---

/// Visão geral (todas as lojas ou as selecionadas).
/// `store_totals` são os totais de todo o histórico, usados na lista de lojas
/// e na seleção padrão (top 3).
pub fn build_global_overview(input: &OverviewInput<'_>, store_totals: &[StoreTotal]) -> GlobalOverview {
    let Shared { filter, previous_quantity, performance: perf } = compute_shared(input);

    let mut all_time = store_totals.to_vec();
    all_time.sort_by(|a, b| b.total_quantity.total_cmp(&a.total_quantity));
    let default_store_ids = all_time
        .iter()
        .take(DEFAULT_STORE_SELECTION)
        .map(|s| s.store_id)
        .collect();
    let store_options = all_time
        .into_iter()
        .map(|s| StoreOption {
            id: s.store_id,
            name: s.name,
            slug: s.slug,
            total_sales: s.total_quantity,
        })
        .collect();

    let store_labels = store_distribution_labels(&perf.stores);
    let store_totals_top: Vec<RankingEntry> = perf
        .stores
        .iter()
        .take(TOP_LIMIT)
        .map(|s| RankingEntry { label: s.name.clone(), sales: s.total })
        .collect();

    GlobalOverview {
        metadata: metadata_block(input, default_store_ids, Some(store_options)),
        totals: totals_block(perf.grand_total, perf.today_total, previous_quantity, Some(perf.stores.len())),
        highlights: highlights_block(&perf),
        charts: GlobalCharts {
            time_series: build_time_series(
                input.filter.filter_type,
                input.filter.year,
                input.detailed_rows,
                input.scoped_rows,
                &input.metadata.available_years,
            ),
            category_distribution: build_chart_data(&perf.categories),
            product_distribution: build_chart_data_limited(&perf.products, TOP_LIMIT),
            store_distribution: build_chart_data(&store_labels),
            store_totals: store_totals_top,
            monthly_sales: build_monthly_series(&perf.months),
        },
        stores: StoresBlock {
            ranking: perf.stores.iter().take(TOP_LIMIT).map(store_ranking_entry).collect(),
            breakdown: perf.stores.iter().take(BREAKDOWN_LIMIT).map(store_breakdown).collect(),
        },
        counts: counts_block(&perf),
        filter,
    }
}

/// Visão de uma única loja. O filtro de lojas já chega forçado para `store.id`.
pub fn build_store_overview(store: StoreInfo, input: &OverviewInput<'_>) -> StoreOverview {
    let Shared { filter, previous_quantity, performance: perf } = compute_shared(input);

    StoreOverview {
        metadata: metadata_block(input, vec![store.id], None),
        totals: totals_block(perf.grand_total, perf.today_total, previous_quantity, None),
        highlights: highlights_block(&perf),
        charts: StoreCharts {
            time_series: build_time_series(
                input.filter.filter_type,
                input.filter.year,
                input.detailed_rows,
                input.scoped_rows,
                &input.metadata.available_years,
            ),
            category_distribution: build_chart_data(&perf.categories),
            product_distribution: build_chart_data(&perf.products),
            monthly_sales: build_monthly_series(&perf.months),
        },
        counts: counts_block(&perf),
        store,
        filter,
    }
}
