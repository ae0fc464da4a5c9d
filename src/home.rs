//! The public landing page.

use axum::response::{IntoResponse, Response};
use axum_extra::extract::PrivateCookieJar;
use maud::{Markup, html};

use crate::{
    auth::cookie::get_token_from_cookies,
    endpoints,
    flash::{Flash, take_flash},
    html::{BUTTON_PRIMARY_STYLE, PAGE_CONTAINER_STYLE, base, link},
};

/// Display the home page.
///
/// Visitors with a valid session get a link to their dashboard, everyone
/// else gets links to log in or register.
pub async fn get_home_page(jar: PrivateCookieJar) -> Response {
    let is_logged_in = get_token_from_cookies(&jar).is_ok();
    let (jar, flash) = take_flash(jar);

    (jar, home_view(is_logged_in, flash.as_ref())).into_response()
}

fn home_view(is_logged_in: bool, flash: Option<&Flash>) -> Markup {
    let content = html! {
        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-xl space-y-6 text-center"
            {
                @if let Some(flash) = flash {
                    (flash.into_html())
                }

                h1 class="text-4xl font-extrabold tracking-tight" { "Wallet" }

                p class="text-lg text-gray-600 dark:text-gray-400"
                {
                    "Keep track of where your money comes from and where it goes. \
                    Record your incomes and expenses, see how this month compares \
                    to your all-time totals, and download monthly reports as CSV."
                }

                @if is_logged_in {
                    a
                        id="dashboard-link"
                        href=(endpoints::DASHBOARD_VIEW)
                        class={"inline-block " (BUTTON_PRIMARY_STYLE)}
                    {
                        "Go to your dashboard"
                    }
                } @else {
                    div id="account-links" class="flex justify-center gap-6"
                    {
                        (link(endpoints::LOG_IN_VIEW, "Log in"))
                        (link(endpoints::REGISTER_VIEW, "Register"))
                    }
                }
            }
        }
    };

    base("Home", &content)
}

#[cfg(test)]
mod home_page_tests {
    use scraper::Selector;

    use crate::{
        auth::{DEFAULT_COOKIE_DURATION, UserID, invalidate_auth_cookie, set_auth_cookie},
        endpoints,
        flash::{Flash, set_flash},
        test_utils::{assert_status_ok, assert_valid_html, get_test_jar, parse_html_document},
    };

    use super::get_home_page;

    #[tokio::test]
    async fn anonymous_visitor_sees_account_links() {
        let response = get_home_page(get_test_jar()).await;

        assert_status_ok(&response);
        let document = parse_html_document(response).await;
        assert_valid_html(&document);
        for endpoint in [endpoints::LOG_IN_VIEW, endpoints::REGISTER_VIEW] {
            let selector = Selector::parse(&format!("#account-links a[href=\"{endpoint}\"]"))
                .unwrap();
            assert!(
                document.select(&selector).next().is_some(),
                "no link to {endpoint}"
            );
        }
        assert!(
            document
                .select(&Selector::parse("#dashboard-link").unwrap())
                .next()
                .is_none()
        );
    }

    #[tokio::test]
    async fn logged_in_user_sees_dashboard_link() {
        let jar = set_auth_cookie(get_test_jar(), UserID::new(1), DEFAULT_COOKIE_DURATION)
            .unwrap();

        let response = get_home_page(jar).await;

        let document = parse_html_document(response).await;
        let selector =
            Selector::parse(&format!("a#dashboard-link[href=\"{}\"]", endpoints::DASHBOARD_VIEW))
                .unwrap();
        assert!(document.select(&selector).next().is_some());
    }

    #[tokio::test]
    async fn logged_out_user_sees_flash() {
        let jar = invalidate_auth_cookie(get_test_jar());
        let jar = set_flash(jar, &Flash::info("You have been logged out."));

        let response = get_home_page(jar).await;

        let document = parse_html_document(response).await;
        assert!(
            document
                .root_element()
                .text()
                .any(|text| text.contains("You have been logged out."))
        );
        assert!(
            document
                .select(&Selector::parse("#account-links").unwrap())
                .next()
                .is_some()
        );
    }
}
