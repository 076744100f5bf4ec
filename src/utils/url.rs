//! URL helpers for building completion endpoints.
//!
//! Base URLs come from user config and may carry trailing slashes; these
//! helpers keep the joined URL free of doubled separators.

/// Normalize a base URL by removing trailing slashes
///
/// # Examples
///
/// ```
/// use syllabot::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("https://example.com/v1beta/"), "https://example.com/v1beta");
/// assert_eq!(normalize_base_url("https://example.com/v1beta"), "https://example.com/v1beta");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Join a base URL and an endpoint path with exactly one slash.
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let normalized_base = normalize_base_url(base_url);
    let endpoint = endpoint.trim_start_matches('/');
    format!("{}/{}", normalized_base, endpoint)
}

/// `generateContent` endpoint for a model.
///
/// A `models/` prefix on the model name is tolerated, since the models list
/// endpoint reports names in that form.
///
/// ```
/// use syllabot::utils::url::generate_content_url;
///
/// assert_eq!(
///     generate_content_url("https://example.com/v1beta/", "gemini-2.5-flash"),
///     "https://example.com/v1beta/models/gemini-2.5-flash:generateContent"
/// );
/// ```
pub fn generate_content_url(base_url: &str, model: &str) -> String {
    let model = model.trim().trim_start_matches("models/");
    construct_api_url(base_url, &format!("models/{model}:generateContent"))
}
