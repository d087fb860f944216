//! Active-locale registry.
//!
//! The message catalogs themselves live in the UI layer; this module only
//! tracks which locale tag is active and applies the identity's
//! preference with a fallback chain: a supported preferred tag wins, an
//! unrecognized tag falls back to `en`, an absent preference falls back
//! to the configured default.

use std::sync::RwLock;

use tracing::debug;

/// Locale tags the console ships catalogs for.
pub const SUPPORTED_LOCALES: [&str; 4] = ["zh-CN", "zh-TW", "en", "ja"];

/// Tag used when a preferred tag exists but is not supported.
pub const FALLBACK_LOCALE: &str = "en";

pub struct Locales {
    default_tag: String,
    active: RwLock<String>,
}

impl Locales {
    /// Creates a registry with the given default tag active. An
    /// unsupported default is itself replaced by the fallback tag.
    pub fn new(default_tag: &str) -> Self {
        let default_tag = if is_supported(default_tag) {
            default_tag.to_string()
        } else {
            FALLBACK_LOCALE.to_string()
        };

        Self {
            active: RwLock::new(default_tag.clone()),
            default_tag,
        }
    }

    pub fn active(&self) -> String {
        self.active.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Activates a locale tag directly, falling back when unsupported.
    pub fn set_active(&self, tag: &str) {
        let resolved = if is_supported(tag) { tag } else { FALLBACK_LOCALE };

        let mut active = self.active.write().unwrap_or_else(|e| e.into_inner());
        if *active != resolved {
            debug!(from = %active.as_str(), to = %resolved, "switching active locale");
            *active = resolved.to_string();
        }
    }

    /// Applies an identity's locale preference: the tag itself when
    /// supported, the fallback tag when unrecognized, the default tag
    /// when absent.
    pub fn apply_preference(&self, preference: Option<&str>) {
        match preference {
            Some(tag) => self.set_active(tag),
            None => {
                let default_tag = self.default_tag.clone();
                self.set_active(&default_tag);
            }
        }
    }
}

fn is_supported(tag: &str) -> bool {
    SUPPORTED_LOCALES.contains(&tag)
}
