use crate::{PinError, Result};

/// Joins `endpoint` onto `base` with exactly one `/` between them.
pub fn urljoin(base: &str, endpoint: &str) -> Result<String> {
    let endpoint = endpoint.trim_start_matches('/');
    if endpoint.is_empty() {
        return Err(PinError::EmptyEndpoint);
    }

    Ok(format!("{}/{}", base.trim_end_matches('/'), endpoint))
}
