use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Value};

/// Page math for the list endpoints.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

impl Pagination {
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        let pages = if limit > 0 {
            (total + limit - 1) / limit
        } else {
            0
        };
        Self {
            page,
            limit,
            total,
            pages,
        }
    }
}

/// Wrapper for API responses that adds the `{success: true, data}` envelope,
/// plus the optional `message` and `pagination` blocks the mutation and list
/// endpoints carry.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub message: Option<&'static str>,
    pub pagination: Option<Pagination>,
    pub status_code: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    /// Successful 200 response
    pub fn success(data: T) -> Self {
        Self {
            data,
            message: None,
            pagination: None,
            status_code: StatusCode::OK,
        }
    }

    /// 201 Created response
    pub fn created(data: T) -> Self {
        Self {
            status_code: StatusCode::CREATED,
            ..Self::success(data)
        }
    }

    pub fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let data_value = match serde_json::to_value(&self.data) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "success": false,
                        "error": "Failed to serialize response data"
                    })),
                )
                    .into_response();
            }
        };

        let mut envelope = json!({
            "success": true,
            "data": data_value
        });
        if let Some(message) = self.message {
            envelope["message"] = Value::String(message.to_string());
        }
        if let Some(pagination) = self.pagination {
            match serde_json::to_value(pagination) {
                Ok(value) => envelope["pagination"] = value,
                Err(e) => tracing::error!("Failed to serialize pagination: {}", e),
            }
        }

        (self.status_code, Json(envelope)).into_response()
    }
}

/// Handler result alias: envelope on success, taxonomy error otherwise.
pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_rounds_up() {
        let p = Pagination::new(1, 10, 25);
        assert_eq!(p.pages, 3);
        let p = Pagination::new(1, 10, 30);
        assert_eq!(p.pages, 3);
        let p = Pagination::new(1, 10, 0);
        assert_eq!(p.pages, 0);
    }
}
