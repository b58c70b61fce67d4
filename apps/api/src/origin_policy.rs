use std::sync::Arc;

use url::Url;

/// Browser origins allowed to call the API.
///
/// An origin is allowed when it uses `https`, carries no explicit port and its
/// host ends with one of the configured suffixes. A suffix with a leading dot
/// only matches subdomains; one without also matches the bare host.
#[derive(Debug, Clone)]
pub struct OriginPolicy {
    suffixes: Arc<[String]>,
}

impl OriginPolicy {
    pub fn new(suffixes: &[String]) -> Self {
        Self {
            suffixes: suffixes
                .iter()
                .map(|suffix| suffix.trim().to_ascii_lowercase())
                .filter(|suffix| !suffix.is_empty() && suffix != ".")
                .collect(),
        }
    }

    pub fn allows(&self, origin: &str) -> bool {
        let Ok(url) = Url::parse(origin) else {
            return false;
        };
        if url.scheme() != "https" || url.port().is_some() {
            return false;
        }
        let Some(host) = url.host_str() else {
            return false;
        };

        self.suffixes.iter().any(|suffix| {
            if suffix.starts_with('.') {
                host.len() > suffix.len() && host.ends_with(suffix.as_str())
            } else {
                host == suffix.as_str() || host.ends_with(format!(".{suffix}").as_str())
            }
        })
    }
}
