//! Template contexts: serializable rendering payloads built from the catalog.
//!
//! Links inside pages are relative so the output tree can be served from any
//! prefix.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use lexpub_core::{
    catalog,
    types::{Catalog, LegalCode, TranslationBranch, DEFAULT_LANGUAGE},
};

use crate::error::RenderError;

/// One translation branch row on the status pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchCtx {
    pub id: u64,
    pub branch_name: String,
    pub language_code: String,
    pub version: String,
    pub last_transifex_update: Option<String>,
    /// Link to the branch page, relative to `status/`.
    pub status_href: String,
}

impl BranchCtx {
    pub fn from_branch(branch: &TranslationBranch) -> Self {
        BranchCtx {
            id: branch.id,
            branch_name: branch.branch_name.0.clone(),
            language_code: branch.language_code.clone(),
            version: branch.version.clone(),
            last_transifex_update: branch
                .last_transifex_update
                .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string()),
            status_href: format!("{}.html", branch.id),
        }
    }
}

/// One legal code row on the status pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegalCodeRowCtx {
    pub title: String,
    pub unit: String,
    pub version: String,
    pub jurisdiction_code: Option<String>,
    pub language_code: String,
    /// Relative to `status/`; `None` when the deed is not translated.
    pub deed_href: Option<String>,
    pub legal_code_href: String,
}

impl LegalCodeRowCtx {
    pub fn from_legal_code(catalog: &Catalog, lc: &LegalCode) -> Self {
        let base = lc.base_path();
        let deed_href = catalog
            .has_deed_translation(&lc.language_code)
            .then(|| format!("../{base}/deed.{}.html", lc.language_code));
        LegalCodeRowCtx {
            title: lc.title.clone(),
            unit: lc.unit.clone(),
            version: lc.version.clone(),
            jurisdiction_code: lc.jurisdiction_code.clone(),
            language_code: lc.language_code.clone(),
            deed_href,
            legal_code_href: format!("../{base}/legalcode.{}.html", lc.language_code),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupCtx {
    pub name: String,
    pub legal_codes: Vec<LegalCodeRowCtx>,
}

/// `status/index.html`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusIndexCtx {
    pub branches: Vec<BranchCtx>,
    pub groups: Vec<GroupCtx>,
}

impl StatusIndexCtx {
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let branches = catalog::open_branches(catalog)
            .map(BranchCtx::from_branch)
            .collect();
        let groups = catalog::valid_groups(catalog)
            .into_iter()
            .map(|(name, legal_codes)| GroupCtx {
                name,
                legal_codes: legal_codes
                    .into_iter()
                    .map(|lc| LegalCodeRowCtx::from_legal_code(catalog, lc))
                    .collect(),
            })
            .collect();
        StatusIndexCtx { branches, groups }
    }
}

/// `status/<id>.html`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchStatusCtx {
    pub branch: BranchCtx,
    pub legal_codes: Vec<LegalCodeRowCtx>,
}

impl BranchStatusCtx {
    pub fn new(catalog: &Catalog, branch: &TranslationBranch) -> Self {
        BranchStatusCtx {
            branch: BranchCtx::from_branch(branch),
            legal_codes: catalog::legal_codes_for_branch(catalog, branch)
                .into_iter()
                .map(|lc| LegalCodeRowCtx::from_legal_code(catalog, lc))
                .collect(),
        }
    }
}

/// Deed and legal code pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegalCodeCtx {
    pub title: String,
    pub unit: String,
    pub version: String,
    pub category: String,
    pub jurisdiction_code: Option<String>,
    pub language_code: String,
    pub canonical_url: String,
    /// Sibling file names, relative to the page itself.
    pub deed_href: Option<String>,
    pub legal_code_href: String,
    pub body: Option<String>,
}

impl LegalCodeCtx {
    pub fn new(catalog: &Catalog, lc: &LegalCode) -> Self {
        LegalCodeCtx {
            title: lc.title.clone(),
            unit: lc.unit.clone(),
            version: lc.version.clone(),
            category: lc.category().to_string(),
            jurisdiction_code: lc.jurisdiction_code.clone(),
            language_code: lc.language_code.clone(),
            canonical_url: lc.canonical_url(&catalog.site_url),
            deed_href: catalog
                .has_deed_translation(&lc.language_code)
                .then(|| format!("deed.{}.html", lc.language_code)),
            legal_code_href: format!("legalcode.{}.html", lc.language_code),
            body: lc.body.clone(),
        }
    }
}

/// Convert any context to a [`tera::Context`] for rendering.
pub fn to_tera_context<T: Serialize>(ctx: &T) -> Result<tera::Context, RenderError> {
    tera::Context::from_serialize(ctx).map_err(RenderError::from)
}

// ---------------------------------------------------------------------------
// Metadata document
// ---------------------------------------------------------------------------

/// `licenses/metadata.yaml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataDoc {
    pub licenses: Vec<MetadataEntry>,
}

/// One license or tool, all languages folded together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataEntry {
    pub unit: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jurisdiction_code: Option<String>,
    pub category: String,
    pub canonical_url: String,
    pub title: String,
    pub legal_code_languages: Vec<String>,
    pub deed_languages: Vec<String>,
}

impl MetadataDoc {
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let mut grouped: BTreeMap<(String, String, Option<String>), Vec<&LegalCode>> =
            BTreeMap::new();
        for lc in &catalog.legal_codes {
            grouped
                .entry((lc.unit.clone(), lc.version.clone(), lc.jurisdiction_code.clone()))
                .or_default()
                .push(lc);
        }

        let licenses = grouped
            .into_iter()
            .map(|((unit, version, jurisdiction_code), variants)| {
                let first = variants[0];
                // English title, else the jurisdiction's default language.
                let default_language = catalog.default_language(jurisdiction_code.as_deref());
                let title = variants
                    .iter()
                    .find(|lc| lc.language_code == DEFAULT_LANGUAGE)
                    .or_else(|| variants.iter().find(|lc| lc.language_code == default_language))
                    .unwrap_or(&first)
                    .title
                    .clone();
                let legal_code_languages: BTreeSet<String> =
                    variants.iter().map(|lc| lc.language_code.clone()).collect();
                let deed_languages = legal_code_languages
                    .iter()
                    .filter(|lang| catalog.has_deed_translation(lang))
                    .cloned()
                    .collect();
                MetadataEntry {
                    category: first.category().to_string(),
                    canonical_url: first.canonical_url(&catalog.site_url),
                    unit,
                    version,
                    jurisdiction_code,
                    title,
                    legal_code_languages: legal_code_languages.into_iter().collect(),
                    deed_languages,
                }
            })
            .collect();
        MetadataDoc { licenses }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use lexpub_core::types::BranchName;

    fn legal_code(unit: &str, lang: &str, title: &str) -> LegalCode {
        LegalCode {
            unit: unit.to_string(),
            version: "4.0".to_string(),
            jurisdiction_code: None,
            language_code: lang.to_string(),
            title: title.to_string(),
            body: None,
        }
    }

    fn catalog() -> Catalog {
        Catalog {
            deed_languages: Some(vec!["en".to_string()]),
            translation_branches: vec![
                TranslationBranch {
                    id: 3,
                    branch_name: BranchName::from("nl-4.0"),
                    language_code: "nl".to_string(),
                    version: "4.0".to_string(),
                    complete: false,
                    last_transifex_update: Some(Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap()),
                },
                TranslationBranch {
                    id: 4,
                    branch_name: BranchName::from("fr-4.0"),
                    language_code: "fr".to_string(),
                    version: "4.0".to_string(),
                    complete: true,
                    last_transifex_update: None,
                },
            ],
            legal_codes: vec![
                legal_code("by", "nl", "Naamsvermelding"),
                legal_code("by", "en", "Attribution"),
                legal_code("by-sa", "en", "Attribution-ShareAlike"),
            ],
            ..Catalog::default()
        }
    }

    #[test]
    fn status_index_lists_only_open_branches() {
        let ctx = StatusIndexCtx::from_catalog(&catalog());
        assert_eq!(ctx.branches.len(), 1);
        assert_eq!(ctx.branches[0].status_href, "3.html");
        assert_eq!(
            ctx.branches[0].last_transifex_update.as_deref(),
            Some("2024-05-01 09:30 UTC")
        );
        assert_eq!(ctx.groups.len(), 1);
        assert_eq!(ctx.groups[0].name, "4.0 Licenses");
    }

    #[test]
    fn untranslated_deed_has_no_link() {
        let cat = catalog();
        let row = LegalCodeRowCtx::from_legal_code(&cat, &cat.legal_codes[0]);
        assert!(row.deed_href.is_none());
        assert_eq!(row.legal_code_href, "../licenses/by/4.0/legalcode.nl.html");
    }

    #[test]
    fn metadata_folds_languages_and_prefers_default_title() {
        let doc = MetadataDoc::from_catalog(&catalog());
        assert_eq!(doc.licenses.len(), 2);
        let by = &doc.licenses[0];
        assert_eq!(by.unit, "by");
        assert_eq!(by.title, "Attribution");
        assert_eq!(by.legal_code_languages, vec!["en", "nl"]);
        assert_eq!(by.deed_languages, vec!["en"]);
        assert_eq!(by.canonical_url, "https://creativecommons.org/licenses/by/4.0/");
    }

    #[test]
    fn metadata_title_prefers_english_for_ported_jurisdiction() {
        let ported = |lang: &str, title: &str, version: &str| LegalCode {
            unit: "by".to_string(),
            version: version.to_string(),
            jurisdiction_code: Some("fr".to_string()),
            language_code: lang.to_string(),
            title: title.to_string(),
            body: None,
        };
        let mut cat = Catalog {
            legal_codes: vec![
                ported("fr", "Paternité 2.0 France", "2.0"),
                ported("en", "Attribution 2.0 France", "2.0"),
                ported("de", "Namensnennung 3.0 Frankreich", "3.0"),
                ported("fr", "Paternité 3.0 France", "3.0"),
            ],
            ..Catalog::default()
        };
        cat.jurisdiction_languages
            .insert("fr".to_string(), "fr".to_string());

        let doc = MetadataDoc::from_catalog(&cat);
        assert_eq!(doc.licenses.len(), 2);
        assert_eq!(doc.licenses[0].title, "Attribution 2.0 France");
        assert_eq!(doc.licenses[0].legal_code_languages, vec!["en", "fr"]);
        // No English variant: the jurisdiction default wins over catalog order.
        assert_eq!(doc.licenses[1].title, "Paternité 3.0 France");
        assert_eq!(
            doc.licenses[1].canonical_url,
            "https://creativecommons.org/licenses/by/3.0/fr/"
        );
    }
}
