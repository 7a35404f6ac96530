//! Site configuration.
//!
//! Branding text the presentation layer renders (site name, the about
//! blurb on the landing page) is an explicit immutable value constructed
//! once at startup and passed down — never ambient state a handler reaches
//! for.

/// Immutable site-wide presentation values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    site_name: String,
    about: String,
}

impl SiteConfig {
    /// Creates the configuration. Called once at startup.
    pub fn new(site_name: impl Into<String>, about: impl Into<String>) -> Self {
        Self {
            site_name: site_name.into(),
            about: about.into(),
        }
    }

    /// The site's display name.
    pub fn site_name(&self) -> &str {
        &self.site_name
    }

    /// The about/company blurb shown on the landing page.
    pub fn about(&self) -> &str {
        &self.about
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_exposes_what_it_was_built_with() {
        let config = SiteConfig::new("Game Center", "Accessories and furniture for gamers.");
        assert_eq!(config.site_name(), "Game Center");
        assert_eq!(config.about(), "Accessories and furniture for gamers.");
    }
}
