use axum::response::Html;

const FORM_PAGE: &str = include_str!("index.html");

/// The single page: form fields, output box and the two buttons
pub async fn handle_form() -> Html<&'static str> {
    Html(FORM_PAGE)
}
