//! Preview configuration: selector, attribute names and API base.

use hq_core::PreviewError;
use hq_core::PreviewResult;
use hq_dom::Selector;
use hq_net::ApiRoutes;
use serde::Deserialize;

const DEFAULT_SELECTOR: &str = "a[data-topic], a[data-board]";
const DEFAULT_API_BASE: &str = "http://localhost/api/1.0/";

/// Attribute names carrying the reference descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReferenceAttributes {
    pub board: String,
    pub topic: String,
    pub number: String,
}

impl Default for ReferenceAttributes {
    fn default() -> Self {
        Self {
            board: "data-board".to_owned(),
            topic: "data-topic".to_owned(),
            number: "data-number".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    pub selector: String,
    pub attributes: ReferenceAttributes,
    pub api_base: String,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            selector: DEFAULT_SELECTOR.to_owned(),
            attributes: ReferenceAttributes::default(),
            api_base: DEFAULT_API_BASE.to_owned(),
        }
    }
}

impl PreviewConfig {
    /// Parses a JSON document; omitted fields keep their defaults.
    pub fn from_json_str(input: &str) -> PreviewResult<Self> {
        serde_json::from_str(input).map_err(|error| {
            PreviewError::new(
                "config.invalid",
                format!("failed to parse preview config: {error}"),
            )
        })
    }

    /// Applies `HOVERQUOTE_API_BASE` and `HOVERQUOTE_SELECTOR` when set.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(api_base) = lookup("HOVERQUOTE_API_BASE").filter(|value| !value.is_empty()) {
            self.api_base = api_base;
        }
        if let Some(selector) = lookup("HOVERQUOTE_SELECTOR").filter(|value| !value.is_empty()) {
            self.selector = selector;
        }
        self
    }

    pub fn validate(&self) -> PreviewResult<()> {
        self.selector()?;
        self.routes()?;
        Ok(())
    }

    /// Parses the selector. The error message keeps the parser's own code.
    pub fn selector(&self) -> PreviewResult<Selector> {
        Selector::parse(&self.selector)
            .map_err(|error| PreviewError::new("config.invalid_selector", error.to_string()))
    }

    pub fn routes(&self) -> PreviewResult<ApiRoutes> {
        ApiRoutes::new(&self.api_base)
            .map_err(|error| PreviewError::new("config.invalid_api_base", error.to_string()))
    }
}
