//! Static object catalog.
//!
//! A catalog is plain data: loaded once (built in, from a TOML file, or from
//! caller-supplied objects) and shared read-only between requests.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::angles::parse_sexagesimal;
use crate::error::{Result, VisibilityError};
use crate::types::{CelestialObject, EquatorialCoord};

const BUILTIN_CONSTELLATIONS: &str = include_str!("../data/constellations.toml");

/// Either a decimal number or sexagesimal text such as `"05:55"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum AngleField {
    Decimal(f64),
    Text(String),
}

impl AngleField {
    fn value(&self) -> Result<f64> {
        match self {
            AngleField::Decimal(v) => Ok(*v),
            AngleField::Text(s) => parse_sexagesimal(s),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CatalogEntry {
    name: String,
    #[serde(default)]
    label: Option<String>,
    /// Hours.
    ra: AngleField,
    /// Degrees.
    dec: AngleField,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    object: Vec<CatalogEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    objects: Vec<CelestialObject>,
}

impl Catalog {
    /// Names must be unique (case-insensitive).
    pub fn from_objects(objects: Vec<CelestialObject>) -> Result<Self> {
        let mut seen = HashSet::new();
        for obj in &objects {
            if !seen.insert(obj.name.to_lowercase()) {
                return Err(VisibilityError::Catalog(format!(
                    "duplicate object name '{}'",
                    obj.name
                )));
            }
        }
        Ok(Self { objects })
    }

    /// The 88 constellations, each represented by one bright star.
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_CONSTELLATIONS)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let file: CatalogFile =
            toml::from_str(text).map_err(|e| VisibilityError::Catalog(e.to_string()))?;
        let objects = file
            .object
            .into_iter()
            .map(|entry| {
                let coord = EquatorialCoord::new(entry.ra.value()?, entry.dec.value()?)
                    .map_err(|e| VisibilityError::Catalog(format!("{}: {e}", entry.name)))?;
                Ok(CelestialObject {
                    label: entry.label.unwrap_or_else(|| entry.name.clone()),
                    name: entry.name,
                    coord,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::from_objects(objects)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let catalog = Self::from_toml_str(&text)?;
        log::info!("loaded {} objects from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn objects(&self) -> &[CelestialObject] {
        &self.objects
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CelestialObject> {
        self.objects.iter()
    }

    pub fn find(&self, name: &str) -> Option<&CelestialObject> {
        self.objects
            .iter()
            .find(|o| o.name.eq_ignore_ascii_case(name) || o.label.eq_ignore_ascii_case(name))
    }
}
