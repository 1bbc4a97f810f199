#![allow(missing_docs)]

pub(crate) mod html;
pub(crate) mod http;

pub(crate) use html::{assert_valid_html, parse_html_document, select_text};
pub(crate) use http::{assert_content_type, assert_json_error, assert_status_ok};
