#![allow(missing_docs)]

pub(crate) mod db;
pub(crate) mod form;
pub(crate) mod html;
pub(crate) mod http;

pub(crate) use db::{
    TEST_TIMEZONE, create_test_user, get_flash, get_shared_test_connection, get_test_connection,
    get_test_cookie_key, get_test_jar,
};
pub(crate) use form::{
    assert_field_error, assert_form_input, assert_form_input_with_value,
    assert_form_submit_button_with_text, assert_hx_endpoint, assert_select_options,
    get_selected_option, must_get_form,
};
pub(crate) use html::{assert_valid_html, get_response_text, parse_html_document};
pub(crate) use http::{
    assert_content_type, assert_hx_redirect, assert_redirect, assert_status_ok, get_header,
    jar_from_response,
};
