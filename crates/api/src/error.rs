//! Error-to-response mapping.
//!
//! Repository and core errors are folded into the shared `AppError`
//! taxonomy, which already knows its HTTP status and error code; the
//! wrapper here turns that into an Axum response body.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

use atelier_core::payment::PaymentError;
use atelier_core::pricing::PricingError;
use atelier_db::repositories::{
    BankAccountError, BoqError, ClientError, InvoiceError, QuotationError, SettingsError,
};
use atelier_shared::AppError;

/// API error wrapper that renders as a JSON error response.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            error!(error = %self.0, "Request failed");
        }

        let body = Json(json!({
            "error": self.0.error_code(),
            "message": self.0.to_string(),
        }));
        (status, body).into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(error: AppError) -> Self {
        Self(error)
    }
}

impl From<ClientError> for ApiError {
    fn from(error: ClientError) -> Self {
        let app = match error {
            ClientError::NotFound(id) => AppError::NotFound(format!("client {id}")),
            ClientError::HasDocuments(_) => AppError::Conflict(error.to_string()),
            ClientError::Database(e) => AppError::Database(e.to_string()),
        };
        Self(app)
    }
}

impl From<BankAccountError> for ApiError {
    fn from(error: BankAccountError) -> Self {
        let app = match error {
            BankAccountError::NotFound(id) => AppError::NotFound(format!("bank account {id}")),
            BankAccountError::Database(e) => AppError::Database(e.to_string()),
        };
        Self(app)
    }
}

impl From<InvoiceError> for ApiError {
    fn from(error: InvoiceError) -> Self {
        let app = match error {
            InvoiceError::NotFound(id) => AppError::NotFound(format!("invoice {id}")),
            InvoiceError::ClientNotFound(id) => AppError::NotFound(format!("client {id}")),
            InvoiceError::Encode(e) => AppError::Internal(e.to_string()),
            InvoiceError::Database(e) => AppError::Database(e.to_string()),
        };
        Self(app)
    }
}

impl From<BoqError> for ApiError {
    fn from(error: BoqError) -> Self {
        let app = match error {
            BoqError::NotFound(id) => AppError::NotFound(format!("BOQ {id}")),
            BoqError::ClientNotFound(id) => AppError::NotFound(format!("client {id}")),
            BoqError::Lifecycle(e) => AppError::BusinessRule(e.to_string()),
            BoqError::ConcurrentModification(_) => AppError::Conflict(error.to_string()),
            BoqError::Encode(e) => AppError::Internal(e.to_string()),
            BoqError::Database(e) => AppError::Database(e.to_string()),
        };
        Self(app)
    }
}

impl From<QuotationError> for ApiError {
    fn from(error: QuotationError) -> Self {
        let app = match error {
            QuotationError::NotFound(id) => AppError::NotFound(format!("quotation {id}")),
            QuotationError::ClientNotFound(id) => AppError::NotFound(format!("client {id}")),
            QuotationError::Payment(e) => AppError::Validation(e.to_string()),
            QuotationError::Lifecycle(e) => AppError::BusinessRule(e.to_string()),
            QuotationError::ConcurrentModification(_) => AppError::Conflict(error.to_string()),
            QuotationError::CorruptDocument { .. } => AppError::Internal(error.to_string()),
            QuotationError::Encode(e) => AppError::Internal(e.to_string()),
            QuotationError::Database(e) => AppError::Database(e.to_string()),
        };
        Self(app)
    }
}

impl From<SettingsError> for ApiError {
    fn from(error: SettingsError) -> Self {
        let app = match error {
            SettingsError::InvalidValue { .. } => AppError::Internal(error.to_string()),
            SettingsError::Encode(e) => AppError::Internal(e.to_string()),
            SettingsError::Database(e) => AppError::Database(e.to_string()),
        };
        Self(app)
    }
}

impl From<PricingError> for ApiError {
    fn from(error: PricingError) -> Self {
        Self(AppError::Validation(error.to_string()))
    }
}

impl From<PaymentError> for ApiError {
    fn from(error: PaymentError) -> Self {
        Self(AppError::Validation(error.to_string()))
    }
}

/// Result alias for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_errors_map_to_validation() {
        let api: ApiError = PaymentError::AlreadyFullyPaid.into();
        assert_eq!(api.0.status_code(), 400);
        assert_eq!(api.0.error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_lifecycle_errors_map_to_business_rule() {
        let api: ApiError = BoqError::Lifecycle(
            atelier_core::lifecycle::LifecycleError::EditLocked { status: "approved" },
        )
        .into();
        assert_eq!(api.0.status_code(), 422);
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let api: ApiError = ClientError::NotFound(uuid::Uuid::nil()).into();
        assert_eq!(api.0.status_code(), 404);
    }
}
