use axum::{body::Body, response::Response};
use scraper::{Html, Selector};

async fn body_text(response: Response<Body>) -> String {
    let body = response.into_body();
    let body = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Could not get response body");

    String::from_utf8_lossy(&body).to_string()
}

pub(crate) async fn parse_html_document(response: Response<Body>) -> Html {
    Html::parse_document(&body_text(response).await)
}

pub(crate) async fn parse_html_fragment(response: Response<Body>) -> Html {
    Html::parse_fragment(&body_text(response).await)
}

#[track_caller]
pub(crate) fn assert_valid_html(html: &Html) {
    assert!(
        html.errors.is_empty(),
        "Got HTML parsing errors: {:?}",
        html.errors
    );
}

#[track_caller]
pub(crate) fn assert_element_exists(html: &Html, selector: &str) {
    let parsed = Selector::parse(selector).unwrap();
    assert!(
        html.select(&parsed).next().is_some(),
        "No element matching '{selector}' in {}",
        html.html()
    );
}

/// The trimmed text of every element matching `selector`.
pub(crate) fn select_text(html: &Html, selector: &str) -> Vec<String> {
    let parsed = Selector::parse(selector).unwrap();

    html.select(&parsed)
        .map(|element| element.text().collect::<String>().trim().to_owned())
        .collect()
}
