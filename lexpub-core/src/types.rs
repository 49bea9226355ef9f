//! Domain types for the content catalog.
//!
//! All types are serializable/deserializable via serde + serde_yaml.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Site prefix used for canonical URLs when the catalog does not set one.
pub const DEFAULT_SITE_URL: &str = "https://creativecommons.org";

/// Language assumed for legal codes without a jurisdiction entry.
pub const DEFAULT_LANGUAGE: &str = "en";

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed name for a translation branch in the data repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BranchName(pub String);

impl fmt::Display for BranchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for BranchName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for BranchName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Top-level URL namespace a legal code is published under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Licenses,
    PublicDomain,
}

impl Category {
    /// `by*` units are licenses; everything else (CC0, PDM, …) is public domain.
    pub fn for_unit(unit: &str) -> Self {
        if unit.starts_with("by") {
            Category::Licenses
        } else {
            Category::PublicDomain
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Licenses => "licenses",
            Category::PublicDomain => "publicdomain",
        }
    }

    /// Human label used in validity group names.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Licenses => "Licenses",
            Category::PublicDomain => "Public Domain",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two HTML documents published for every legal code entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Deed,
    LegalCode,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Deed => "deed",
            DocumentKind::LegalCode => "legalcode",
        }
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// A unit of in-progress translation work for one locale and version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationBranch {
    pub id: u64,
    pub branch_name: BranchName,
    pub language_code: String,
    pub version: String,
    #[serde(default)]
    pub complete: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_transifex_update: Option<DateTime<Utc>>,
}

impl TranslationBranch {
    pub fn is_open(&self) -> bool {
        !self.complete
    }
}

/// A single license or public-domain tool in one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalCode {
    /// License unit, e.g. `by-sa` or `zero`.
    pub unit: String,
    pub version: String,
    /// `None` for unported/international legal codes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jurisdiction_code: Option<String>,
    pub language_code: String,
    pub title: String,
    /// Trusted HTML fragment containing the legal text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl LegalCode {
    pub fn category(&self) -> Category {
        Category::for_unit(&self.unit)
    }

    /// `<category>/<unit>/<version>[/<jurisdiction>]`, no leading or trailing slash.
    pub fn base_path(&self) -> String {
        let mut path = format!("{}/{}/{}", self.category(), self.unit, self.version);
        if let Some(jurisdiction) = &self.jurisdiction_code {
            path.push('/');
            path.push_str(jurisdiction);
        }
        path
    }

    pub fn deed_url(&self) -> String {
        format!("/{}/deed.{}", self.base_path(), self.language_code)
    }

    pub fn legal_code_url(&self) -> String {
        format!("/{}/legalcode.{}", self.base_path(), self.language_code)
    }

    pub fn canonical_url(&self, site_url: &str) -> String {
        format!("{}/{}/", site_url.trim_end_matches('/'), self.base_path())
    }

    /// Name of the validity group this entry is listed under, e.g. `4.0 Licenses`.
    pub fn validity_group(&self) -> String {
        format!("{} {}", self.version, self.category().label())
    }
}

/// Root of the YAML content catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default = "default_site_url")]
    pub site_url: String,
    /// Languages deeds are translated into. `None` means every language.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deed_languages: Option<Vec<String>>,
    /// Jurisdiction code → default language of that jurisdiction.
    #[serde(default)]
    pub jurisdiction_languages: BTreeMap<String, String>,
    #[serde(default)]
    pub translation_branches: Vec<TranslationBranch>,
    #[serde(default)]
    pub legal_codes: Vec<LegalCode>,
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog {
            site_url: default_site_url(),
            deed_languages: None,
            jurisdiction_languages: BTreeMap::new(),
            translation_branches: Vec::new(),
            legal_codes: Vec::new(),
        }
    }
}

fn default_site_url() -> String {
    DEFAULT_SITE_URL.to_string()
}

impl Catalog {
    /// Default language for a jurisdiction; unported entries default to English.
    pub fn default_language(&self, jurisdiction_code: Option<&str>) -> &str {
        jurisdiction_code
            .and_then(|code| self.jurisdiction_languages.get(code))
            .map(String::as_str)
            .unwrap_or(DEFAULT_LANGUAGE)
    }

    pub fn has_deed_translation(&self, language_code: &str) -> bool {
        match &self.deed_languages {
            Some(languages) => languages.iter().any(|l| l == language_code),
            None => true,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn legal_code(unit: &str, version: &str, jurisdiction: Option<&str>, lang: &str) -> LegalCode {
        LegalCode {
            unit: unit.to_string(),
            version: version.to_string(),
            jurisdiction_code: jurisdiction.map(str::to_string),
            language_code: lang.to_string(),
            title: format!("{unit} {version}"),
            body: None,
        }
    }

    #[test]
    fn newtype_display() {
        assert_eq!(BranchName::from("nl-4.0").to_string(), "nl-4.0");
    }

    #[test]
    fn category_follows_unit_prefix() {
        assert_eq!(Category::for_unit("by-nc-sa"), Category::Licenses);
        assert_eq!(Category::for_unit("zero"), Category::PublicDomain);
        assert_eq!(Category::for_unit("mark"), Category::PublicDomain);
    }

    #[test]
    fn urls_for_unported_entry() {
        let lc = legal_code("by", "4.0", None, "nl");
        assert_eq!(lc.deed_url(), "/licenses/by/4.0/deed.nl");
        assert_eq!(lc.legal_code_url(), "/licenses/by/4.0/legalcode.nl");
        assert_eq!(
            lc.canonical_url("https://creativecommons.org/"),
            "https://creativecommons.org/licenses/by/4.0/"
        );
    }

    #[test]
    fn urls_for_ported_entry() {
        let lc = legal_code("zero", "1.0", Some("fi"), "fi");
        assert_eq!(lc.deed_url(), "/publicdomain/zero/1.0/fi/deed.fi");
        assert_eq!(lc.validity_group(), "1.0 Public Domain");
    }

    #[test]
    fn default_language_falls_back_to_english() {
        let mut catalog = Catalog::default();
        catalog
            .jurisdiction_languages
            .insert("fr".to_string(), "fr".to_string());
        assert_eq!(catalog.default_language(Some("fr")), "fr");
        assert_eq!(catalog.default_language(Some("de")), "en");
        assert_eq!(catalog.default_language(None), "en");
    }

    #[test]
    fn deed_languages_restrict_only_when_present() {
        let mut catalog = Catalog::default();
        assert!(catalog.has_deed_translation("xx"));
        catalog.deed_languages = Some(vec!["en".to_string()]);
        assert!(catalog.has_deed_translation("en"));
        assert!(!catalog.has_deed_translation("xx"));
    }

    #[test]
    fn catalog_serde_roundtrip() {
        let catalog = Catalog {
            legal_codes: vec![legal_code("by-sa", "4.0", None, "en")],
            ..Catalog::default()
        };
        let yaml = serde_yaml::to_string(&catalog).expect("serialize");
        let back: Catalog = serde_yaml::from_str(&yaml).expect("deserialize");
        assert_eq!(back, catalog);
    }
}
