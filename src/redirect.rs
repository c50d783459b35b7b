//! Redirect destination validation and page rendering.
//!
//! A destination is accepted when it parses as an absolute URL with a host
//! and its scheme passes the configured allow-list. The accepted string is
//! embedded into the page exactly as the caller sent it; escaping per
//! context happens in the template filters.

use tera::Tera;
use url::Url;

use crate::config::{RedirectConfig, REDIRECT_FALLBACK_DELAY_MS, REDIRECT_TEMPLATE_NAME};
use crate::error::ApiError;

/// A redirect destination that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectTarget {
    raw: String,
    scheme: String,
}

impl RedirectTarget {
    /// Validate the raw `redirectUrl` parameter.
    ///
    /// Missing and empty values are both reported as a missing parameter.
    pub fn parse(raw: Option<&str>, policy: &RedirectConfig) -> Result<Self, ApiError> {
        let raw = match raw {
            Some(raw) if !raw.is_empty() => raw,
            _ => return Err(ApiError::MissingParameter),
        };

        let url = Url::parse(raw)?;
        // Rejects opaque forms such as `javascript:` and `mailto:`
        if !url.has_host() {
            return Err(ApiError::MissingHost);
        }

        let scheme = url.scheme().to_string();
        if !policy.allows_scheme(&scheme) {
            return Err(ApiError::SchemeNotAllowed(scheme));
        }

        Ok(Self {
            raw: raw.to_string(),
            scheme,
        })
    }

    /// The destination as supplied by the caller.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Render the auto-redirect page for this destination.
    pub fn render_page(&self, tera: &Tera) -> Result<String, ApiError> {
        let mut context = tera::Context::new();
        context.insert("redirect_url", &self.raw);
        context.insert("fallback_delay_ms", &REDIRECT_FALLBACK_DELAY_MS);

        Ok(tera.render(REDIRECT_TEMPLATE_NAME, &context)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::init_templates;

    fn any_scheme() -> RedirectConfig {
        RedirectConfig::default()
    }

    #[test]
    fn test_missing_and_empty_are_missing_parameter() {
        assert!(matches!(
            RedirectTarget::parse(None, &any_scheme()),
            Err(ApiError::MissingParameter)
        ));
        assert!(matches!(
            RedirectTarget::parse(Some(""), &any_scheme()),
            Err(ApiError::MissingParameter)
        ));
    }

    #[test]
    fn test_unparseable_is_invalid_url() {
        for raw in ["not a url", "example.com", "/relative/path", "http://"] {
            assert!(
                matches!(
                    RedirectTarget::parse(Some(raw), &any_scheme()),
                    Err(ApiError::InvalidUrl(_))
                ),
                "{raw} should be invalid"
            );
        }
    }

    #[test]
    fn test_hostless_urls_rejected() {
        for raw in ["javascript:alert(1)", "mailto:someone@example.com", "data:text/html,hi"] {
            assert!(
                matches!(
                    RedirectTarget::parse(Some(raw), &any_scheme()),
                    Err(ApiError::MissingHost)
                ),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn test_valid_url_kept_verbatim() {
        let target = RedirectTarget::parse(Some("HTTPS://Instagram.com"), &any_scheme()).unwrap();
        assert_eq!(target.as_str(), "HTTPS://Instagram.com");
        assert_eq!(target.scheme(), "https");
    }

    #[test]
    fn test_scheme_allow_list() {
        let policy = RedirectConfig {
            allowed_schemes: vec!["https".to_string()],
        };
        assert!(RedirectTarget::parse(Some("https://example.com"), &policy).is_ok());
        assert!(matches!(
            RedirectTarget::parse(Some("ftp://example.com/file"), &policy),
            Err(ApiError::SchemeNotAllowed(scheme)) if scheme == "ftp"
        ));
    }

    #[test]
    fn test_page_embeds_url_in_script_and_link() {
        let tera = init_templates().unwrap();
        let url = "https://instagram.com/p/abc";
        let page = RedirectTarget::parse(Some(url), &any_scheme())
            .unwrap()
            .render_page(&tera)
            .unwrap();

        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains(&format!("window.location.href = \"{}\";", url)));
        assert!(page.contains(&format!("<a href=\"{}\">click here</a>", url)));
        assert!(page.contains("}, 2000);"));
        assert!(page.contains("class=\"spinner\""));
    }

    #[test]
    fn test_page_escapes_injection() {
        let tera = init_templates().unwrap();
        let url = "https://example.com/?q=\"</script><img src=x onerror=alert(1)>&'";
        let page = RedirectTarget::parse(Some(url), &any_scheme())
            .unwrap()
            .render_page(&tera)
            .unwrap();

        assert!(!page.contains(url));
        assert!(!page.contains("<img"));
        assert_eq!(page.matches("</script>").count(), 1);
        assert!(page.contains(
            "href=\"https://example.com/?q=&quot;&lt;/script&gt;&lt;img src=x onerror=alert(1)&gt;&amp;&#x27;\""
        ));
    }

    #[test]
    fn test_render_is_deterministic() {
        let tera = init_templates().unwrap();
        let target = RedirectTarget::parse(Some("https://example.com"), &any_scheme()).unwrap();
        assert_eq!(
            target.render_page(&tera).unwrap(),
            target.render_page(&tera).unwrap()
        );
    }
}
