// Link-header pagination helpers.
// GitHub advertises further pages as `Link: <url>; rel="next", <url>; rel="last"`.

use reqwest::header::{HeaderMap, LINK};

/// URL of the first page of a resource.
pub fn first_page_url(origin: &str, path: &str, per_page: u32) -> String {
    format!(
        "{}/{}?simple=yes&per_page={}&page=1",
        origin.trim_end_matches('/'),
        path.trim_start_matches('/'),
        per_page
    )
}

/// Extract the `rel="next"` target from the response's `Link` headers.
pub fn next_link(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(LINK)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .find_map(parse_next)
}

fn parse_next(link: &str) -> Option<String> {
    let mut parts = link.split(';');
    let target = parts.next()?.trim();
    let url = target.strip_prefix('<')?.strip_suffix('>')?;

    let is_next = parts.any(|param| {
        let Some((name, value)) = param.split_once('=') else {
            return false;
        };
        name.trim().eq_ignore_ascii_case("rel")
            && value
                .trim()
                .trim_matches('"')
                .split_ascii_whitespace()
                .any(|rel| rel.eq_ignore_ascii_case("next"))
    });

    is_next.then(|| url.to_string())
}
