#![allow(missing_docs)]

pub(crate) mod db;
pub(crate) mod http;

pub(crate) use db::{get_test_connection, get_test_state};
pub(crate) use http::{assert_json_error, parse_json_body, serve_json};
