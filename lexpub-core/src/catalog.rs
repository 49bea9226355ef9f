//! YAML content catalog.
//!
//! # Storage layout
//!
//! ```text
//! catalog.yaml
//!   site_url: https://creativecommons.org
//!   deed_languages: [en, nl, ...]        (optional)
//!   jurisdiction_languages: {fr: fr}     (optional)
//!   translation_branches: [...]
//!   legal_codes: [...]
//! ```
//!
//! The catalog is read-only from the publisher's point of view. It usually
//! lives inside the data repository, so it is loaded again after every
//! branch checkout.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::CatalogError;
use crate::types::{BranchName, Catalog, LegalCode, TranslationBranch};

// ---------------------------------------------------------------------------
// 1. Load
// ---------------------------------------------------------------------------

/// Load the catalog at `path`.
///
/// Returns `CatalogError::CatalogNotFound` if absent,
/// `CatalogError::Parse` (with path + line context) if malformed YAML.
pub fn load_at(path: &Path) -> Result<Catalog, CatalogError> {
    if !path.exists() {
        return Err(CatalogError::CatalogNotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&contents).map_err(|source| CatalogError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// 2. Queries
// ---------------------------------------------------------------------------

/// Names of translation branches that still need publishing, in catalog order.
pub fn list_open_branches(catalog: &Catalog) -> Vec<BranchName> {
    open_branches(catalog)
        .map(|branch| branch.branch_name.clone())
        .collect()
}

/// Translation branches whose completion flag is false.
pub fn open_branches(catalog: &Catalog) -> impl Iterator<Item = &TranslationBranch> {
    catalog.translation_branches.iter().filter(|b| b.is_open())
}

/// Legal codes grouped by validity group (`"4.0 Licenses"`, `"1.0 Public Domain"`, …).
///
/// Groups are ordered by name; entries keep catalog order within a group.
pub fn valid_groups(catalog: &Catalog) -> BTreeMap<String, Vec<&LegalCode>> {
    let mut groups: BTreeMap<String, Vec<&LegalCode>> = BTreeMap::new();
    for legal_code in &catalog.legal_codes {
        groups
            .entry(legal_code.validity_group())
            .or_default()
            .push(legal_code);
    }
    groups
}

/// Legal codes a translation branch covers: same language, same version.
pub fn legal_codes_for_branch<'a>(
    catalog: &'a Catalog,
    branch: &TranslationBranch,
) -> Vec<&'a LegalCode> {
    catalog
        .legal_codes
        .iter()
        .filter(|lc| lc.language_code == branch.language_code && lc.version == branch.version)
        .collect()
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn branch(id: u64, name: &str, complete: bool) -> TranslationBranch {
        TranslationBranch {
            id,
            branch_name: BranchName::from(name),
            language_code: "nl".to_string(),
            version: "4.0".to_string(),
            complete,
            last_transifex_update: None,
        }
    }

    fn legal_code(unit: &str, version: &str, lang: &str) -> LegalCode {
        LegalCode {
            unit: unit.to_string(),
            version: version.to_string(),
            jurisdiction_code: None,
            language_code: lang.to_string(),
            title: unit.to_string(),
            body: None,
        }
    }

    #[test]
    fn load_missing_catalog_returns_not_found() {
        let dir = TempDir::new().unwrap();
        let err = load_at(&dir.path().join("catalog.yaml")).unwrap_err();
        assert!(matches!(err, CatalogError::CatalogNotFound { .. }));
    }

    #[test]
    fn open_branches_exclude_complete_ones() {
        let catalog = Catalog {
            translation_branches: vec![
                branch(1, "nl-4.0", false),
                branch(2, "fr-4.0", true),
                branch(3, "de-4.0", false),
            ],
            ..Catalog::default()
        };
        let names = list_open_branches(&catalog);
        assert_eq!(
            names,
            vec![BranchName::from("nl-4.0"), BranchName::from("de-4.0")]
        );
    }

    #[test]
    fn valid_groups_are_keyed_by_version_and_category() {
        let catalog = Catalog {
            legal_codes: vec![
                legal_code("by", "4.0", "en"),
                legal_code("zero", "1.0", "en"),
                legal_code("by-sa", "4.0", "nl"),
            ],
            ..Catalog::default()
        };
        let groups = valid_groups(&catalog);
        let keys: Vec<_> = groups.keys().cloned().collect();
        assert_eq!(keys, vec!["1.0 Public Domain", "4.0 Licenses"]);
        assert_eq!(groups["4.0 Licenses"].len(), 2);
        assert_eq!(groups["4.0 Licenses"][1].unit, "by-sa");
    }

    #[test]
    fn branch_covers_matching_language_and_version() {
        let catalog = Catalog {
            legal_codes: vec![
                legal_code("by", "4.0", "nl"),
                legal_code("by", "3.0", "nl"),
                legal_code("by", "4.0", "en"),
            ],
            ..Catalog::default()
        };
        let covered = legal_codes_for_branch(&catalog, &branch(1, "nl-4.0", false));
        assert_eq!(covered.len(), 1);
        assert_eq!(covered[0].version, "4.0");
    }
}
