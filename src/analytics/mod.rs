// src/analytics/mod.rs
//
// Motor de agregação do dashboard de vendas. Tudo aqui é puro e síncrono:
// recebe linhas já carregadas + filtro normalizado e devolve o payload.

pub mod filters;
pub mod overview;
pub mod range_sum;
pub mod rankings;
pub mod series;
pub mod store_performance;
