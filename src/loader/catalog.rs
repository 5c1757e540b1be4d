//! Parse `catalog.yaml` / `catalog.json`: the crop groups.
//!
//! Both a wrapped document (`groups: [...]`) and a bare list of groups are
//! accepted. YAML is tried first when both files exist.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::loader::error::{read_optional, LoadError};
use crate::model::{CropCatalog, CropGroup};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCatalog {
    Bare(Vec<CropGroup>),
    Wrapped(CropCatalog),
}

impl From<RawCatalog> for CropCatalog {
    fn from(raw: RawCatalog) -> Self {
        match raw {
            RawCatalog::Bare(groups) => CropCatalog::new(groups),
            RawCatalog::Wrapped(catalog) => catalog,
        }
    }
}

const CANDIDATES: [&str; 3] = ["catalog.yaml", "catalog.yml", "catalog.json"];

/// Load the catalog from a farm data directory.
pub fn parse_catalog(data_dir: &Path) -> Result<CropCatalog, LoadError> {
    for name in CANDIDATES {
        let path = data_dir.join(name);
        let Some(content) = read_optional(&path)? else {
            continue;
        };

        let catalog = if name.ends_with(".json") {
            parse_catalog_json(&content, &path)?
        } else {
            parse_catalog_yaml(&content, &path)?
        };

        if catalog.is_empty() {
            return Err(LoadError::EmptyCatalog(path));
        }
        tracing::debug!(path = %path.display(), groups = catalog.groups().len(), "loaded catalog");
        return Ok(catalog);
    }

    Err(LoadError::CatalogNotFound(data_dir.to_path_buf()))
}

pub fn parse_catalog_yaml(content: &str, path: &Path) -> Result<CropCatalog, LoadError> {
    serde_yaml::from_str::<RawCatalog>(content)
        .map(Into::into)
        .map_err(|e| LoadError::invalid(path, e))
}

pub fn parse_catalog_json(content: &str, path: &Path) -> Result<CropCatalog, LoadError> {
    serde_json::from_str::<RawCatalog>(content)
        .map(Into::into)
        .map_err(|e| LoadError::invalid(path, e))
}

/// The catalog file that would be read for `data_dir`, if any exists.
pub fn catalog_path(data_dir: &Path) -> Option<PathBuf> {
    CANDIDATES
        .iter()
        .map(|name| data_dir.join(name))
        .find(|p| p.exists())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p() -> PathBuf {
        PathBuf::from("catalog.yaml")
    }

    #[test]
    fn test_wrapped_yaml() {
        let yaml = r#"
groups:
  - name: Vegetables
    items: [Potato, Onion, Tomato]
  - name: Fibres
    items:
      - Cotton
      - Jute
"#;
        let catalog = parse_catalog_yaml(yaml, &p()).unwrap();
        assert_eq!(catalog.groups().len(), 2);
        assert_eq!(catalog.groups()[0].items[2].as_str(), "Tomato");
        assert_eq!(catalog.item_count(), 5);
    }

    #[test]
    fn test_bare_yaml_list() {
        let yaml = r#"
- name: Spices
  items: [Chilli, Cumin]
"#;
        let catalog = parse_catalog_yaml(yaml, &p()).unwrap();
        assert_eq!(catalog.groups()[0].name, "Spices");
    }

    #[test]
    fn test_json_catalog() {
        let json = r#"{"groups": [{"name": "Fruits", "items": ["Mango", "Banana"]}]}"#;
        let catalog = parse_catalog_json(json, Path::new("catalog.json")).unwrap();
        assert!(catalog.contains("Banana"));
    }

    #[test]
    fn test_group_without_items_parses_empty() {
        let catalog = parse_catalog_yaml("groups:\n  - name: Empty\n", &p()).unwrap();
        assert!(catalog.groups()[0].items.is_empty());
    }

    #[test]
    fn test_garbage_is_invalid() {
        let err = parse_catalog_yaml("groups: 42", &p()).unwrap_err();
        assert!(matches!(err, LoadError::Invalid { .. }));
    }
}
