#![allow(missing_docs)]

pub(crate) mod html;
pub(crate) mod mock_api;

pub(crate) use html::{
    assert_element_exists, assert_valid_html, parse_html_document, parse_html_fragment,
    select_text,
};
pub(crate) use mock_api::{TEST_TOKEN, dashboard_state, records_router, spawn_mock_api};
