//! Locale routing table.
//!
//! A path is considered localized when its first segment is one of the
//! configured locale codes. Matching is exact and case-sensitive: `/en` and
//! `/en/posts` are localized, `/english` and `/EN` are not.

use crate::error::{AppError, AppResult};

/// Supported locales with one designated default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleRouting {
    locales: Vec<String>,
    default_locale: String,
}

impl LocaleRouting {
    /// Build a routing table.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ConfigError` if `locales` is empty or does not
    /// contain `default_locale`.
    pub fn new(locales: Vec<String>, default_locale: impl Into<String>) -> AppResult<Self> {
        let default_locale = default_locale.into();

        if locales.is_empty() {
            return Err(AppError::ConfigError(
                "at least one locale is required".to_string(),
            ));
        }
        if !locales.contains(&default_locale) {
            return Err(AppError::ConfigError(format!(
                "default locale '{default_locale}' is not a supported locale"
            )));
        }

        Ok(Self {
            locales,
            default_locale,
        })
    }

    pub fn locales(&self) -> &[String] {
        &self.locales
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    pub fn is_supported(&self, locale: &str) -> bool {
        self.locales.iter().any(|l| l == locale)
    }

    /// Split a path into its locale prefix and the remainder.
    ///
    /// The remainder always starts with `/`; `/en` yields `("en", "/")`.
    pub fn split_locale<'a>(&self, path: &'a str) -> Option<(&'a str, &'a str)> {
        let trimmed = path.strip_prefix('/')?;
        let (segment, rest) = match trimmed.find('/') {
            Some(idx) => trimmed.split_at(idx),
            None => (trimmed, "/"),
        };

        self.is_supported(segment).then_some((segment, rest))
    }

    pub fn has_locale_prefix(&self, path: &str) -> bool {
        self.split_locale(path).is_some()
    }

    /// Compute the locale redirect for `path`.
    ///
    /// Returns `None` when the path already carries a supported prefix,
    /// otherwise `/<default><path>` (`/` maps to `/<default>`).
    pub fn redirect_target(&self, path: &str) -> Option<String> {
        if self.has_locale_prefix(path) {
            return None;
        }

        let target = match path {
            "" | "/" => format!("/{}", self.default_locale),
            p if p.starts_with('/') => format!("/{}{}", self.default_locale, p),
            p => format!("/{}/{}", self.default_locale, p),
        };
        Some(target)
    }

    /// Rewrite a localized path to the same page in `target` locale.
    ///
    /// Paths without a supported prefix are treated as default-locale pages.
    pub fn switch_locale_path(&self, path: &str, target: &str) -> String {
        let rest = self
            .split_locale(path)
            .map(|(_, rest)| rest)
            .unwrap_or(path);

        match rest {
            "" | "/" => format!("/{target}"),
            rest => format!("/{target}{rest}"),
        }
    }
}

impl Default for LocaleRouting {
    fn default() -> Self {
        Self {
            locales: vec!["en".to_string(), "zh".to_string()],
            default_locale: "en".to_string(),
        }
    }
}
