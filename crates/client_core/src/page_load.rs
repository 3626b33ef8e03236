use url::Url;

/// Deep-link parameters supplied when the index page opens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLoadParams {
    pub code: Option<String>,
    pub gist: Option<String>,
    pub version: Option<String>,
    pub mode: Option<String>,
}

impl PageLoadParams {
    /// Reads `code`, `gist`, `version` and `mode` from the query string.
    /// Empty values count as absent; the last occurrence of a key wins.
    pub fn from_url(url: &Url) -> Self {
        let mut params = Self::default();
        for (key, value) in url.query_pairs() {
            if value.is_empty() {
                continue;
            }
            let slot = match key.as_ref() {
                "code" => &mut params.code,
                "gist" => &mut params.gist,
                "version" => &mut params.version,
                "mode" => &mut params.mode,
                _ => continue,
            };
            *slot = Some(value.into_owned());
        }
        params
    }
}

#[cfg(test)]
#[path = "tests/page_load_tests.rs"]
mod tests;
