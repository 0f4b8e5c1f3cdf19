//! # Localization
//!
//! User-visible messages (error notices, report headings) in English and
//! French, backed by Fluent resources embedded in the binary. Unsupported
//! languages fall back to English.

use anyhow::{anyhow, Result};
use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::{FluentArgs, FluentResource};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use unic_langid::LanguageIdentifier;

/// Language used when the requested one is not supported
pub const FALLBACK_LANGUAGE: &str = "en";

const RESOURCES: &[(&str, &str)] = &[
    ("en", include_str!("../locales/en/main.ftl")),
    ("fr", include_str!("../locales/fr/main.ftl")),
];

/// Localization manager holding one Fluent bundle per supported language
pub struct LocalizationManager {
    bundles: HashMap<String, FluentBundle<FluentResource>>,
}

impl std::fmt::Debug for LocalizationManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut languages: Vec<&String> = self.bundles.keys().collect();
        languages.sort();
        f.debug_struct("LocalizationManager")
            .field("languages", &languages)
            .finish()
    }
}

impl LocalizationManager {
    /// Create a manager with every embedded language loaded
    pub fn new() -> Result<Self> {
        let mut bundles = HashMap::new();
        for (language, source) in RESOURCES {
            let locale: LanguageIdentifier = language.parse()?;
            bundles.insert(language.to_string(), Self::create_bundle(locale, source)?);
        }
        Ok(Self { bundles })
    }

    fn create_bundle(locale: LanguageIdentifier, source: &str) -> Result<FluentBundle<FluentResource>> {
        let resource = FluentResource::try_new(source.to_string())
            .map_err(|(_, errors)| anyhow!("Invalid Fluent resource for {}: {:?}", locale, errors))?;

        let mut bundle = FluentBundle::new_concurrent(vec![locale.clone()]);
        // Plain terminal output, no bidi isolation marks around arguments
        bundle.set_use_isolating(false);
        bundle
            .add_resource(resource)
            .map_err(|errors| anyhow!("Duplicate Fluent messages for {}: {:?}", locale, errors))?;
        Ok(bundle)
    }

    /// Whether `language` has its own bundle
    pub fn is_supported(&self, language: &str) -> bool {
        self.bundles.contains_key(language)
    }

    /// Get a message in `language`, falling back to English
    pub fn get_message_in_language(
        &self,
        key: &str,
        language: &str,
        args: Option<&HashMap<&str, &str>>,
    ) -> String {
        let bundle = match self
            .bundles
            .get(language)
            .or_else(|| self.bundles.get(FALLBACK_LANGUAGE))
        {
            Some(bundle) => bundle,
            None => return format!("Missing translation: {}", key),
        };

        let Some(pattern) = bundle.get_message(key).and_then(|msg| msg.value()) else {
            return format!("Missing translation: {}", key);
        };

        let fluent_args = args.map(|args| {
            args.iter()
                .map(|(name, value)| (*name, *value))
                .collect::<FluentArgs>()
        });

        let mut errors = vec![];
        let value = bundle.format_pattern(pattern, fluent_args.as_ref(), &mut errors);
        if !errors.is_empty() {
            log::debug!("Formatting '{}' in {}: {:?}", key, language, errors);
        }
        value.into_owned()
    }

    /// Get a message with simple string arguments
    pub fn get_message_with_args(&self, key: &str, language: &str, args: &[(&str, &str)]) -> String {
        let args_map: HashMap<&str, &str> = args.iter().cloned().collect();
        self.get_message_in_language(key, language, Some(&args_map))
    }
}

/// Lower-cased primary subtag of a locale tag (`fr-CA` -> `fr`)
pub fn primary_language(tag: &str) -> String {
    tag.split(['-', '_'])
        .next()
        .map(|primary| primary.trim().to_lowercase())
        .unwrap_or_default()
}

/// Map a locale tag (`fr-CA`, `en_US`) to a supported language, English otherwise
pub fn detect_language(tag: Option<&str>) -> String {
    let primary = tag.map(primary_language).unwrap_or_default();

    if RESOURCES.iter().any(|(language, _)| *language == primary) {
        primary
    } else {
        FALLBACK_LANGUAGE.to_string()
    }
}

static LOCALIZATION_MANAGER: OnceLock<Arc<LocalizationManager>> = OnceLock::new();

/// Initialize the process-wide localization manager and return it
pub fn init_localization() -> Result<Arc<LocalizationManager>> {
    if let Some(manager) = LOCALIZATION_MANAGER.get() {
        return Ok(Arc::clone(manager));
    }
    let manager = Arc::new(LocalizationManager::new()?);
    Ok(Arc::clone(LOCALIZATION_MANAGER.get_or_init(|| manager)))
}

/// The process-wide localization manager, if initialized
pub fn get_localization_manager() -> Option<&'static Arc<LocalizationManager>> {
    LOCALIZATION_MANAGER.get()
}

/// Localized message for a locale tag
pub fn t_lang(key: &str, tag: Option<&str>) -> String {
    t_args_lang(key, &[], tag)
}

/// Localized message with arguments for a locale tag
pub fn t_args_lang(key: &str, args: &[(&str, &str)], tag: Option<&str>) -> String {
    match get_localization_manager() {
        Some(manager) => manager.get_message_with_args(key, &detect_language(tag), args),
        None => format!("Missing translation: {}", key),
    }
}
