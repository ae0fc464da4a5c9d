use scraper::{ElementRef, Html, Selector};

#[track_caller]
pub(crate) fn must_get_form<'a>(html: &'a Html, id: &str) -> ElementRef<'a> {
    html.select(&Selector::parse(&format!("form#{id}")).unwrap())
        .next()
        .unwrap_or_else(|| panic!("No form found with id \"{id}\""))
}

#[track_caller]
pub(crate) fn assert_hx_endpoint(form: &ElementRef<'_>, endpoint: &str, attribute: &str) {
    let hx_post = form
        .value()
        .attr(attribute)
        .unwrap_or_else(|| panic!("{attribute} attribute missing"));

    assert_eq!(
        hx_post, endpoint,
        "want form with attribute {attribute}=\"{endpoint}\", got {hx_post:?}"
    );
}

#[track_caller]
fn must_get_input<'a>(form: &ElementRef<'a>, name: &str) -> ElementRef<'a> {
    form.select(&Selector::parse("input").unwrap())
        .find(|input| input.value().attr("name") == Some(name))
        .unwrap_or_else(|| panic!("No input found with name \"{name}\""))
}

/// Assert that `form` has a required input called `name` of type `type_`.
#[track_caller]
pub(crate) fn assert_form_input(form: &ElementRef<'_>, name: &str, type_: &str) {
    let input = must_get_input(form, name);
    let input_type = input.value().attr("type").unwrap_or_default();

    assert_eq!(
        input_type, type_,
        "want input with type \"{type_}\", got {input_type:?}"
    );
    assert!(
        input.value().attr("required").is_some(),
        "want input with name {name} to have the required attribute but got none"
    );
}

#[track_caller]
pub(crate) fn assert_form_input_with_value(
    form: &ElementRef<'_>,
    name: &str,
    type_: &str,
    value: &str,
) {
    let input = must_get_input(form, name);
    let input_type = input.value().attr("type").unwrap_or_default();
    let input_value = input.value().attr("value").unwrap_or_default();

    assert_eq!(
        input_type, type_,
        "want input with type \"{type_}\", got {input_type:?}"
    );
    assert_eq!(
        input_value, value,
        "want input {name} with value \"{value}\", got {input_value:?}"
    );
}

/// Assert that the select called `name` offers exactly `want_values`, in
/// order, ignoring the empty placeholder option.
#[track_caller]
pub(crate) fn assert_select_options(form: &ElementRef<'_>, name: &str, want_values: &[&str]) {
    let select = form
        .select(&Selector::parse(&format!("select[name=\"{name}\"]")).unwrap())
        .next()
        .unwrap_or_else(|| panic!("No select found with name \"{name}\""));

    let got_values: Vec<&str> = select
        .select(&Selector::parse("option").unwrap())
        .filter_map(|option| option.value().attr("value"))
        .filter(|value| !value.is_empty())
        .collect();

    assert_eq!(got_values, want_values);
}

/// The value of the selected option of the select called `name`, if any.
#[track_caller]
pub(crate) fn get_selected_option<'a>(form: &ElementRef<'a>, name: &str) -> Option<&'a str> {
    form.select(&Selector::parse(&format!("select[name=\"{name}\"] option[selected]")).unwrap())
        .next()
        .and_then(|option| option.value().attr("value"))
}

#[track_caller]
pub(crate) fn assert_form_submit_button_with_text(form: &ElementRef<'_>, text: &str) {
    let submit_button = form
        .select(&Selector::parse("button").unwrap())
        .next()
        .expect("No button found");

    assert_eq!(
        submit_button.value().attr("type").unwrap_or_default(),
        "submit",
        "want submit button with type=\"submit\""
    );
    let got_text = submit_button.text().collect::<Vec<_>>().join("");
    let got_text = got_text.trim();
    assert_eq!(text, got_text);
}

/// Assert that the error message rendered for `field` is `want_error_message`.
#[track_caller]
pub(crate) fn assert_field_error(form: &ElementRef<'_>, field: &str, want_error_message: &str) {
    let selector = Selector::parse(&format!("p#{field}-error")).unwrap();
    let error_message = form
        .select(&selector)
        .next()
        .unwrap_or_else(|| panic!("No error message found for {field}"))
        .text()
        .collect::<Vec<_>>()
        .join("");
    let got_error_message = error_message.trim();

    assert_eq!(want_error_message, got_error_message);
}
