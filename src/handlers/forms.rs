use axum::extract::Form;
use axum::http::StatusCode;
use axum::response::Response;
use serde::Deserialize;
use tera::Context;

use crate::render::render_with_status;
use crate::services::LeadService;

#[derive(Debug, Deserialize)]
pub struct FeedbackForm {
    #[serde(rename = "feedback-name", default)]
    pub name: String,
    #[serde(rename = "feedback-email", default)]
    pub email: String,
    #[serde(rename = "feedback-text", default)]
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct RequestForm {
    #[serde(rename = "request-name", default)]
    pub name: String,
    #[serde(rename = "request-email", default)]
    pub email: String,
    #[serde(rename = "request-text", default)]
    pub text: String,
}

fn form_page(
    template: &str,
    message: Option<&str>,
    error: Option<&str>,
    status: StatusCode,
) -> Response {
    let mut context = Context::new();
    context.insert("message", &message);
    context.insert("error", &error);
    render_with_status(template, &context, status)
}

/// POST /feedback-form - store a feedback lead and re-render the home page
pub async fn submit_feedback(Form(form): Form<FeedbackForm>) -> Response {
    if form.name.trim().is_empty() || form.email.trim().is_empty() || form.text.trim().is_empty() {
        return form_page(
            "index.html",
            None,
            Some("All fields are required"),
            StatusCode::BAD_REQUEST,
        );
    }

    let saved = match LeadService::new().await {
        Ok(service) => {
            service
                .save_feedback(form.name.trim(), form.email.trim(), form.text.trim())
                .await
        }
        Err(e) => Err(e),
    };

    match saved {
        Ok(()) => form_page(
            "index.html",
            Some("Feedback submitted successfully!"),
            None,
            StatusCode::OK,
        ),
        Err(e) => {
            tracing::error!("Error saving feedback: {}", e);
            form_page(
                "index.html",
                None,
                Some("Error saving user data"),
                StatusCode::INTERNAL_SERVER_ERROR,
            )
        }
    }
}

/// POST /request-form - store a story-request lead and re-render the form page
pub async fn submit_request(Form(form): Form<RequestForm>) -> Response {
    if form.name.trim().is_empty() || form.email.trim().is_empty() || form.text.trim().is_empty() {
        return form_page(
            "request.html",
            None,
            Some("All fields are required"),
            StatusCode::BAD_REQUEST,
        );
    }

    let saved = match LeadService::new().await {
        Ok(service) => {
            service
                .save_request(form.name.trim(), form.email.trim(), form.text.trim())
                .await
        }
        Err(e) => Err(e),
    };

    match saved {
        Ok(()) => form_page(
            "request.html",
            Some("Request submitted successfully!"),
            None,
            StatusCode::OK,
        ),
        Err(e) => {
            tracing::error!("Error saving request: {}", e);
            form_page(
                "request.html",
                None,
                Some("Error saving request data"),
                StatusCode::INTERNAL_SERVER_ERROR,
            )
        }
    }
}
