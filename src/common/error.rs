// src/common/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::common::i18n::I18nStore;
use crate::middleware::i18n::Locale;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia. As mensagens do
// Display são o texto padrão (pt); a tradução acontece em `to_api_error`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("O usuário não pertence a esta empresa")]
    NotATenantMember,

    #[error("Permissão insuficiente: {0}")]
    Forbidden(String),

    // --- Domínio de estoque ---
    #[error("A quantidade deve ser um inteiro positivo (recebido: {0})")]
    InvalidQuantity(i32),

    #[error("Estoque insuficiente: disponível {available}, solicitado {requested}")]
    InsufficientStock { available: i32, requested: i32 },

    #[error("A sucursal de destino não pode ser a mesma de origem")]
    SameBranchTransfer,

    #[error("Traslado já confirmado")]
    TransferAlreadyConfirmed,

    #[error("Quantidade recebida ({received}) maior que a enviada ({delivered})")]
    ReceivedExceedsDelivered { delivered: i32, received: i32 },

    // --- Catálogo / referências ---
    #[error("Recurso não encontrado: {0}")]
    NotFound(&'static str),

    #[error("Código duplicado: {0}")]
    DuplicateCode(String),

    #[error("Referência inválida: {0}")]
    InvalidReference(&'static str),

    #[error("Violação de unicidade: {0}")]
    UniqueConstraintViolation(String),

    // --- Integrações ---
    #[error("Falha ao consultar o registro tributário")]
    TaxRegistryUnavailable,

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

// O erro "pronto para o cliente": status + mensagem já traduzida.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => Json(json!({ "error": self.error, "details": details })),
            None => Json(json!({ "error": self.error })),
        };
        (self.status, body).into_response()
    }
}

impl AppError {
    /// Chave de tradução + status HTTP de cada variante.
    fn status_and_key(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::ValidationError(_) => (StatusCode::BAD_REQUEST, "error.validation"),
            AppError::EmailAlreadyExists => (StatusCode::CONFLICT, "error.email_exists"),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "error.invalid_credentials"),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "error.invalid_token"),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "error.user_not_found"),
            AppError::NotATenantMember => (StatusCode::FORBIDDEN, "error.not_member"),
            AppError::Forbidden(_) => (StatusCode::FORBIDDEN, "error.forbidden"),
            AppError::InvalidQuantity(_) => (StatusCode::BAD_REQUEST, "error.invalid_quantity"),
            AppError::InsufficientStock { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "error.insufficient_stock")
            }
            AppError::SameBranchTransfer => (StatusCode::BAD_REQUEST, "error.same_branch"),
            AppError::TransferAlreadyConfirmed => (StatusCode::CONFLICT, "error.already_confirmed"),
            AppError::ReceivedExceedsDelivered { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "error.received_exceeds")
            }
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "error.not_found"),
            AppError::DuplicateCode(_) => (StatusCode::CONFLICT, "error.duplicate_code"),
            AppError::InvalidReference(_) => (StatusCode::BAD_REQUEST, "error.invalid_reference"),
            AppError::UniqueConstraintViolation(_) => (StatusCode::CONFLICT, "error.duplicate_code"),
            AppError::TaxRegistryUnavailable => (StatusCode::BAD_GATEWAY, "error.tax_registry"),
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "error.internal"),
        }
    }

    /// Converte o erro de domínio em resposta HTTP já traduzida.
    pub fn to_api_error(self, locale: &Locale, i18n: &I18nStore) -> ApiError {
        let (status, key) = self.status_and_key();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            // O tracing loga a mensagem detalhada que o thiserror nos deu;
            // o cliente recebe só o genérico.
            tracing::error!("Erro interno do servidor: {}", self);
        }

        let template = i18n.translate(&locale.0, key).to_string();

        match self {
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                ApiError {
                    status,
                    error: template,
                    details: Some(json!(details)),
                }
            }
            AppError::InsufficientStock {
                available,
                requested,
            } => ApiError {
                status,
                error: template
                    .replace("{available}", &available.to_string())
                    .replace("{requested}", &requested.to_string()),
                details: None,
            },
            AppError::ReceivedExceedsDelivered {
                delivered,
                received,
            } => ApiError {
                status,
                error: template
                    .replace("{delivered}", &delivered.to_string())
                    .replace("{received}", &received.to_string()),
                details: None,
            },
            AppError::NotFound(resource) | AppError::InvalidReference(resource) => ApiError {
                status,
                error: template.replace("{resource}", resource),
                details: None,
            },
            AppError::DuplicateCode(code) => ApiError {
                status,
                error: template.replace("{code}", &code),
                details: None,
            },
            AppError::UniqueConstraintViolation(constraint) => ApiError {
                status,
                error: template.replace("{code}", &constraint),
                details: None,
            },
            _ => ApiError {
                status,
                error: template,
                details: None,
            },
        }
    }
}

// Para os middlewares que devolvem AppError direto (sem Locale em mãos):
// resposta com a mensagem padrão do Display.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, _) = self.status_and_key();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Erro interno do servidor: {}", self);
            let body = Json(json!({ "error": "Ocorreu um erro inesperado." }));
            return (status, body).into_response();
        }
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
