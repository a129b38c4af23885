use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

pub async fn get_404_not_found() -> Response {
    get_404_not_found_response()
}

pub fn get_404_not_found_response() -> Response {
    let page = error_view(
        "Not Found",
        "404",
        "Something's missing.",
        "Sorry, we can't find that page. You'll find lots to explore on the home page.",
    );

    (StatusCode::NOT_FOUND, Html(page.into_string())).into_response()
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use scraper::{Html, Selector};

    use crate::test_utils::{assert_valid_html, parse_html_document};

    use super::get_404_not_found;

    #[tokio::test]
    async fn renders_not_found_page() {
        let response = get_404_not_found().await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let document: Html = parse_html_document(response).await;
        assert_valid_html(&document);

        let h1 = Selector::parse("h1").unwrap();
        let header = document
            .select(&h1)
            .next()
            .expect("No h1 found")
            .text()
            .collect::<String>();
        assert_eq!(header.trim(), "404");
    }
}
