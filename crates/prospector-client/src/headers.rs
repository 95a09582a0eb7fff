//! Static headers shared by login and API requests.

use prospector_session::SessionStore;
use reqwest::header;
use reqwest::RequestBuilder;
use url::Url;

/// Attach the static identity headers plus the current session cookies for
/// `target` to a request.
pub(crate) async fn apply(
    builder: RequestBuilder,
    user_agent: &str,
    base_url: &Url,
    session: &SessionStore,
    target: &Url,
) -> RequestBuilder {
    let mut builder = builder
        .header(header::USER_AGENT, user_agent)
        .header(header::ACCEPT, "application/json")
        .header(header::ORIGIN, base_url.origin().ascii_serialization())
        .header(header::REFERER, base_url.as_str());

    let cookies = session.cookie_string(target).await;
    if !cookies.is_empty() {
        builder = builder.header(header::COOKIE, cookies);
    }
    builder
}

/// Collect the `Set-Cookie` header values of a response.
pub(crate) fn set_cookie_values(response: &reqwest::Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok().map(String::from))
        .collect()
}
