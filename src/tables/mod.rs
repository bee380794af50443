//! Reference tables: the round catalogue and classification tables.
//!
//! Built-in tables are embedded in the binary. Files named in the config
//! are merged over them; entries with the same id or category replace the
//! built-in ones.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::classification::{CategoryKey, ClassificationFile, ClassificationTables};
use crate::config::Config;
use crate::handicap::Handicapper;
use crate::round::{validate_catalogue, RoundCatalogue};

const BUILTIN_ROUNDS: &str = include_str!("../../data/rounds.yaml");
const BUILTIN_CLASSIFICATIONS: &str = include_str!("../../data/classifications.yaml");

/// Everything the engine looks up, loaded once per run.
#[derive(Debug, Clone)]
pub struct Tables {
    pub rounds: RoundCatalogue,
    pub classifications: ClassificationTables,
}

impl Tables {
    /// Category key for a round as it will be shot: the round id is made
    /// canonical and a missing sub-type becomes the round's default.
    pub fn category_key(
        &self,
        bow: &str,
        gender: &str,
        age: &str,
        round: &str,
        subtype: Option<&str>,
    ) -> crate::Result<CategoryKey> {
        let definition = self.rounds.get(round)?;
        let subtype = definition.resolve_subtype(subtype)?;
        Ok(CategoryKey::new(bow, gender, age, &definition.id, subtype))
    }
}

pub fn builtin_rounds() -> Result<RoundCatalogue> {
    serde_saphyr::from_str(BUILTIN_ROUNDS).context("Failed to parse built-in round catalogue")
}

pub fn builtin_classifications() -> Result<ClassificationFile> {
    serde_saphyr::from_str(BUILTIN_CLASSIFICATIONS)
        .context("Failed to parse built-in classification tables")
}

/// Read a round catalogue from a YAML file.
pub fn load_rounds_file(path: &Path) -> Result<RoundCatalogue> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read rounds file at {}", path.display()))?;
    serde_saphyr::from_str(&content)
        .with_context(|| format!("Failed to parse rounds: invalid YAML in {}", path.display()))
}

/// Read classification tables from a YAML file.
pub fn load_classifications_file(path: &Path) -> Result<ClassificationFile> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read classifications file at {}", path.display()))?;
    serde_saphyr::from_str(&content).with_context(|| {
        format!(
            "Failed to parse classifications: invalid YAML in {}",
            path.display()
        )
    })
}

/// Load the built-in tables merged with any files named in `config`.
///
/// Classification tiers given as handicaps are resolved under the
/// configured rating system.
pub fn load_tables(config: &Config) -> Result<Tables> {
    let mut rounds = builtin_rounds()?;
    if let Some(path) = &config.rounds_file {
        let extra = load_rounds_file(path)?;
        debug!(path = %path.display(), rounds = extra.len(), "merging rounds file");
        rounds.merge(extra);
    }

    if let Err(errors) = validate_catalogue(&rounds) {
        anyhow::bail!("Invalid round catalogue:\n  {}", errors.join("\n  "));
    }

    let mut file = builtin_classifications()?;
    if let Some(path) = &config.classifications_file {
        file.merge(load_classifications_file(path)?);
    }

    let handicapper = Handicapper::for_system(config.system).inner_ten(config.inner_ten);
    let classifications = file
        .resolve(&rounds, &handicapper)
        .context("Invalid classification tables")?;

    debug!(
        rounds = rounds.len(),
        classifications = classifications.len(),
        system = %config.system,
        "reference tables loaded"
    );
    Ok(Tables { rounds, classifications })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handicap::RatingSystem;
    use crate::scoring::FaceScoring;

    #[test]
    fn test_builtin_tables_load() {
        let tables = load_tables(&Config::default()).unwrap();
        assert!(tables.rounds.len() >= 10);
        assert!(!tables.classifications.is_empty());

        let york = tables.rounds.structure("york", None).unwrap();
        assert_eq!(york.total_arrows(), 144);
        assert_eq!(york.face(), FaceScoring::FiveZone);
        assert!(!york.is_metric());

        let wa70 = tables.rounds.structure("WA1440", Some("70")).unwrap();
        assert_eq!(wa70.distances()[0].distance, 70.0);
    }

    #[test]
    fn test_builtin_tables_load_under_legacy() {
        let config = Config {
            system: RatingSystem::Legacy,
            ..Config::default()
        };
        assert!(load_tables(&config).is_ok());
    }

    #[test]
    fn test_builtin_classification_lookup() {
        let tables = load_tables(&Config::default()).unwrap();
        let key = CategoryKey::new("recurve", "male", "adult", "portsmouth", None);
        let table = tables.classifications.get(&key).unwrap();
        assert_eq!(table.tiers().first().unwrap().name, "H");
        assert!(tables.classifications.classify(600, &key).unwrap().is_some());
        assert!(tables.classifications.classify(0, &key).unwrap().is_none());
    }

    #[test]
    fn test_category_key_uses_default_subtype() {
        let tables = load_tables(&Config::default()).unwrap();
        let key = tables
            .category_key("recurve", "male", "adult", "WA1440", None)
            .unwrap();
        assert_eq!(key.round, "wa1440");
        assert_eq!(key.subtype.as_deref(), Some("90"));
        assert!(tables.classifications.get(&key).is_ok());
        assert!(tables.classifications.classify(1200, &key).unwrap().is_some());

        let explicit = tables
            .category_key("recurve", "female", "adult", "wa1440", Some("70"))
            .unwrap();
        assert!(tables.classifications.get(&explicit).is_ok());

        let plain = tables
            .category_key("recurve", "male", "adult", "portsmouth", None)
            .unwrap();
        assert_eq!(plain.subtype, None);
        assert!(tables.classifications.get(&plain).is_ok());

        assert!(matches!(
            tables.category_key("recurve", "male", "adult", "wa1440", Some("50")),
            Err(crate::Error::UnknownSubtype { .. })
        ));
    }

    #[test]
    fn test_rounds_file_overrides_builtin() {
        let path = std::env::temp_dir().join(format!("quiver-rounds-{}.yaml", std::process::id()));
        fs::write(
            &path,
            r#"
rounds:
  - id: york
    name: Short York
    unit: yards
    face: five_zone
    legs:
      - { arrows: 12, face_cm: 122 }
    distances: [100]
"#,
        )
        .unwrap();
        let config = Config {
            rounds_file: Some(path.clone()),
            ..Config::default()
        };
        let result = load_tables(&config);
        fs::remove_file(&path).unwrap();

        let tables = result.unwrap();
        let york = tables.rounds.structure("york", None).unwrap();
        assert_eq!(york.name(), "Short York");
        assert_eq!(york.total_arrows(), 12);
    }

    #[test]
    fn test_bad_rounds_file_is_error() {
        let path = std::env::temp_dir()
            .join(format!("quiver-bad-rounds-{}.yaml", std::process::id()));
        fs::write(
            &path,
            r#"
rounds:
  - id: uphill
    name: Uphill
    legs:
      - { arrows: 36, face_cm: 122 }
      - { arrows: 36, face_cm: 122 }
    distances: [30, 50]
"#,
        )
        .unwrap();
        let config = Config {
            rounds_file: Some(path.clone()),
            ..Config::default()
        };
        let result = load_tables(&config);
        fs::remove_file(&path).unwrap();

        let err = result.unwrap_err();
        assert!(err.to_string().contains("Invalid round catalogue"));
    }
}
