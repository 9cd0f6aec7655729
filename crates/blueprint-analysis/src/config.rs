//! Analysis configuration.
//!
//! Hosts usually derive an [`AnalysisConfig`] from client capabilities and then overlay user
//! options (LSP `initializationOptions`), which deserialize into [`AnalysisOptions`] with camelCase
//! keys:
//!
//! ```json
//! { "snippetSupport": false, "diagnosticsEnabled": true }
//! ```

use serde::Deserialize;

/// Tunables for completion and validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisConfig {
    /// Emit declaration candidates as snippet templates (`${1:Name}` placeholders).
    ///
    /// When disabled, declarations insert plain text with the placeholder name.
    pub snippet_support: bool,
    /// Publish naming-convention diagnostics. When disabled, validation passes publish empty sets.
    pub diagnostics_enabled: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            snippet_support: true,
            diagnostics_enabled: true,
        }
    }
}

impl AnalysisConfig {
    /// Builder-style override for [`AnalysisConfig::snippet_support`].
    pub fn with_snippet_support(mut self, enabled: bool) -> Self {
        self.snippet_support = enabled;
        self
    }

    /// Builder-style override for [`AnalysisConfig::diagnostics_enabled`].
    pub fn with_diagnostics(mut self, enabled: bool) -> Self {
        self.diagnostics_enabled = enabled;
        self
    }

    /// Apply user options on top of this config. Absent options keep the current value.
    pub fn merged(self, options: &AnalysisOptions) -> Self {
        Self {
            snippet_support: options.snippet_support.unwrap_or(self.snippet_support),
            diagnostics_enabled: options
                .diagnostics_enabled
                .unwrap_or(self.diagnostics_enabled),
        }
    }
}

/// Partial, user-supplied configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalysisOptions {
    /// Overrides [`AnalysisConfig::snippet_support`].
    pub snippet_support: Option<bool>,
    /// Overrides [`AnalysisConfig::diagnostics_enabled`].
    pub diagnostics_enabled: Option<bool>,
}
