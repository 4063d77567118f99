use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    // Filtro `custom` sem datas, com data malformada ou início > fim
    #[error("{0}")]
    InvalidRange(String),

    #[error("Parâmetro obrigatório ausente: {0}")]
    MissingParameter(String),

    #[error("Loja não encontrada: {0}")]
    StoreNotFound(String),

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    /// Código curto exposto no campo `error` da resposta.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::InvalidRange(_) => "InvalidRange",
            AppError::MissingParameter(_) => "MissingParameter",
            AppError::StoreNotFound(_) => "NotFound",
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => "InternalServerError",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidRange(_) | AppError::MissingParameter(_) => StatusCode::BAD_REQUEST,
            AppError::StoreNotFound(_) => StatusCode::NOT_FOUND,
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::InvalidRange(_) | AppError::MissingParameter(_) | AppError::StoreNotFound(_) => {
                tracing::warn!("Requisição rejeitada: {}", self);
                self.to_string()
            }
            // Detalhes de erros internos só vão para o log.
            AppError::DatabaseError(e) => {
                tracing::error!("Erro de banco de dados: {:?}", e);
                "Ocorreu um erro inesperado.".to_string()
            }
            AppError::InternalServerError(e) => {
                tracing::error!("Erro Interno do Servidor: {:?}", e);
                "Ocorreu um erro inesperado.".to_string()
            }
        };

        let body = Json(json!({
            "error": self.kind(),
            "message": message,
        }));
        (status, body).into_response()
    }
}
