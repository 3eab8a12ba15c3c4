use crate::error::{Error, Result};
use url::Url;

/// Resolve `reference` against the article's canonical URI and return the
/// percent-encoded absolute form.
pub fn resolve(reference: &str, base: &str) -> Result<String> {
    let base = Url::parse(base)
        .map_err(|e| Error::UriEncoding(format!("base {}: {}", base, e)))?;

    let resolved = base
        .join(reference.trim())
        .map_err(|e| Error::UriEncoding(format!("{}: {}", reference, e)))?;

    if !resolved.has_host() {
        return Err(Error::UriEncoding(format!("{}: no host", resolved)));
    }

    Ok(resolved.to_string())
}

/// Scheme of an absolute reference, `None` for relative ones.
pub fn scheme(reference: &str) -> Option<String> {
    match Url::parse(reference.trim()) {
        Ok(url) => Some(url.scheme().to_string()),
        Err(_) => None,
    }
}
