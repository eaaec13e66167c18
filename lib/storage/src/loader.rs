use std::path::{Path, PathBuf};
use tracing::{error, info};
use vmatch_core::{Catalog, Error, Result};

/// Reads a catalog from a static JSON file (an array of products)
#[derive(Debug, Clone)]
pub struct CatalogLoader {
    path: PathBuf,
}

impl CatalogLoader {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Catalog> {
        let bytes = std::fs::read(&self.path)?;
        let catalog = Catalog::from_json_slice(&bytes).map_err(|e| match e {
            Error::Serialization(msg) => {
                Error::Catalog(format!("{}: {}", self.path.display(), msg))
            }
            other => other,
        })?;
        info!("Loaded {} products from {:?}", catalog.len(), self.path);
        Ok(catalog)
    }

    /// Load the catalog, falling back to an empty one on any failure
    pub fn load_or_empty(&self) -> Catalog {
        match self.load() {
            Ok(catalog) => catalog,
            Err(e) => {
                error!("Error loading products from {:?}: {}", self.path, e);
                Catalog::empty()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use vmatch_core::{ProductId, Scorer};

    fn write_catalog(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_valid_file() {
        let file = write_catalog(
            r#"[{"id": 1, "category": "home", "name": "Desk Lamp", "price": 29.0, "image": "lamp.jpg"}]"#,
        );
        let catalog = CatalogLoader::new(file.path()).load().unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.products()[0].name(), "Desk Lamp");
    }

    #[test]
    fn test_load_negative_and_fractional_ids() {
        let file = write_catalog(
            r#"[
                {"id": 1, "category": "electronics"},
                {"id": -2, "category": "home"},
                {"id": 1.5, "category": "toys"}
            ]"#,
        );
        let catalog = CatalogLoader::new(file.path()).load().unwrap();
        assert_eq!(catalog.len(), 3);

        let ids: Vec<String> = catalog.products().iter().map(|p| p.id.to_string()).collect();
        assert_eq!(ids, vec!["1", "-2", "1.5"]);
        assert!(catalog.get(&ProductId::parse_path("-2")).is_some());
        assert!(catalog.get(&ProductId::parse_path("1.5")).is_some());

        let negative = &catalog.products()[1];
        let key = Scorer::combination_key("photo.jpg", &negative.id, &negative.category);
        assert_eq!(key, "photo.jpg--2-home");
        assert_eq!(vmatch_core::rank("photo.jpg", catalog.products()).len(), 3);
    }

    #[test]
    fn test_missing_file_falls_back_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let loader = CatalogLoader::new(dir.path().join("missing.json"));
        assert!(matches!(loader.load(), Err(Error::Io(_))));
        assert!(loader.load_or_empty().is_empty());
    }

    #[test]
    fn test_malformed_file_reports_path() {
        let file = write_catalog("[{\"id\": 1,");
        let err = CatalogLoader::new(file.path()).load().unwrap_err();
        match err {
            Error::Catalog(msg) => assert!(msg.contains(&file.path().display().to_string())),
            other => panic!("unexpected error: {}", other),
        }
        assert!(CatalogLoader::new(file.path()).load_or_empty().is_empty());
    }

    #[test]
    fn test_duplicate_ids_fall_back_to_empty() {
        let file = write_catalog(
            r#"[{"id": 1, "category": "home"}, {"id": 1, "category": "sports"}]"#,
        );
        let loader = CatalogLoader::new(file.path());
        assert!(matches!(loader.load(), Err(Error::DuplicateProduct(_))));
        assert!(loader.load_or_empty().is_empty());
    }
}
