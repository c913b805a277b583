//! OpenAPI schema wrappers for domain types.
//!
//! Domain types stay framework-agnostic by not deriving `ToSchema`; the
//! wrappers here mirror their wire shape for documentation purposes only.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    #[schema(rename = "unauthorized")]
    Unauthorized,
    #[schema(rename = "forbidden")]
    Forbidden,
    #[schema(rename = "not_found")]
    NotFound,
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`], the JSON error envelope.
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[allow(dead_code)] // schema generation only
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "forbidden")]
    code: ErrorCodeSchema,
    /// Human-readable message.
    #[schema(example = "You can only delete your own listings")]
    message: String,
    /// Supplementary structured details.
    details: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::PartialSchema;

    #[test]
    fn error_schema_lists_the_envelope_fields() {
        let json = serde_json::to_string(&ErrorSchema::schema()).expect("schema serialises");
        assert!(json.contains("message"));
        assert!(json.contains("details"));
    }

    #[test]
    fn error_code_schema_lists_every_code() {
        let json = serde_json::to_string(&ErrorCodeSchema::schema()).expect("schema serialises");
        for code in [
            "invalid_request",
            "unauthorized",
            "forbidden",
            "not_found",
            "service_unavailable",
            "internal_error",
        ] {
            assert!(json.contains(code), "missing {code}");
        }
    }
}
