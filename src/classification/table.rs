use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::error::{Error, Result};
use crate::handicap::Handicapper;
use crate::round::RoundCatalogue;

/// Resolved archer category for one round.
///
/// Resolving bow style, gender and age bracket for an archer is the
/// caller's job; the engine only matches keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct CategoryKey {
    pub bow: String,
    pub gender: String,
    pub age: String,
    pub round: String,
    #[serde(default)]
    pub subtype: Option<String>,
}

impl CategoryKey {
    pub fn new(bow: &str, gender: &str, age: &str, round: &str, subtype: Option<&str>) -> Self {
        Self {
            bow: bow.to_string(),
            gender: gender.to_string(),
            age: age.to_string(),
            round: round.to_string(),
            subtype: subtype.map(str::to_string),
        }
    }

    /// Case-insensitive match on every field.
    pub fn matches(&self, other: &CategoryKey) -> bool {
        let eq = |a: &str, b: &str| a.eq_ignore_ascii_case(b);
        eq(&self.bow, &other.bow)
            && eq(&self.gender, &other.gender)
            && eq(&self.age, &other.age)
            && eq(&self.round, &other.round)
            && match (&self.subtype, &other.subtype) {
                (None, None) => true,
                (Some(a), Some(b)) => eq(a, b),
                _ => false,
            }
    }
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}/{}", self.bow, self.gender, self.age, self.round)?;
        if let Some(sub) = &self.subtype {
            write!(f, "[{}]", sub)?;
        }
        Ok(())
    }
}

/// One achievement band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tier {
    pub name: String,
    /// 1 for the lowest tier.
    pub rank: usize,
    pub min_score: u32,
    pub handicap: Option<i32>,
}

/// Ordered tiers for one category, lowest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationTable {
    pub key: CategoryKey,
    tiers: Vec<Tier>,
}

impl ClassificationTable {
    /// Build a table, checking thresholds never decrease with rank.
    pub fn new(key: CategoryKey, tiers: Vec<Tier>) -> Result<Self> {
        if tiers.is_empty() {
            return Err(Error::MalformedTable {
                key: key.to_string(),
                reason: "no tiers".to_string(),
            });
        }
        for pair in tiers.windows(2) {
            if pair[1].min_score < pair[0].min_score {
                return Err(Error::MalformedTable {
                    key: key.to_string(),
                    reason: format!(
                        "'{}' ({}) is below '{}' ({})",
                        pair[1].name, pair[1].min_score, pair[0].name, pair[0].min_score
                    ),
                });
            }
        }
        let tiers = tiers
            .into_iter()
            .enumerate()
            .map(|(i, t)| Tier { rank: i + 1, ..t })
            .collect();
        Ok(Self { key, tiers })
    }

    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }
}

/// Tier as written in the reference file: a minimum score, a reference
/// handicap, or both.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TierDefinition {
    pub name: String,
    #[serde(default)]
    pub min_score: Option<u32>,
    #[serde(default)]
    pub handicap: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TableDefinition {
    pub bow: String,
    pub gender: String,
    pub age: String,
    pub round: String,
    #[serde(default)]
    pub subtype: Option<String>,
    /// Lowest tier first.
    pub tiers: Vec<TierDefinition>,
}

impl TableDefinition {
    pub fn key(&self) -> CategoryKey {
        CategoryKey::new(&self.bow, &self.gender, &self.age, &self.round, self.subtype.as_deref())
    }
}

/// The classification reference file.
///
/// Example YAML:
/// ```yaml
/// tables:
///   - bow: recurve
///     gender: female
///     age: adult
///     round: portsmouth
///     tiers:
///       - { name: "Archer 3rd Class", handicap: 72 }
///       - { name: "Archer 2nd Class", min_score: 390 }
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ClassificationFile {
    pub tables: Vec<TableDefinition>,
}

impl ClassificationFile {
    /// Merge another file in; tables for the same category are replaced.
    pub fn merge(&mut self, other: ClassificationFile) {
        for table in other.tables {
            let key = table.key();
            match self.tables.iter_mut().find(|t| t.key().matches(&key)) {
                Some(existing) => *existing = table,
                None => self.tables.push(table),
            }
        }
    }

    /// Turn definitions into tables, resolving handicap-only tiers to
    /// minimum scores with `handicapper` on each table's round.
    pub fn resolve(
        &self,
        catalogue: &RoundCatalogue,
        handicapper: &Handicapper<'_>,
    ) -> Result<ClassificationTables> {
        let mut tables = Vec::with_capacity(self.tables.len());
        for def in &self.tables {
            let key = def.key();
            let round = catalogue.structure(&def.round, def.subtype.as_deref())?;
            let tiers = def
                .tiers
                .iter()
                .map(|t| {
                    let min_score = match (t.min_score, t.handicap) {
                        (Some(score), _) => score,
                        (None, Some(h)) => handicapper.score_for_handicap(&round, h),
                        (None, None) => {
                            return Err(Error::MalformedTable {
                                key: key.to_string(),
                                reason: format!(
                                    "tier '{}' has neither min_score nor handicap",
                                    t.name
                                ),
                            })
                        }
                    };
                    Ok(Tier {
                        name: t.name.clone(),
                        rank: 0,
                        min_score,
                        handicap: t.handicap,
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            debug!(category = %key, tiers = tiers.len(), "classification table resolved");
            tables.push(ClassificationTable::new(key, tiers)?);
        }
        Ok(ClassificationTables { tables })
    }
}

/// Every resolved classification table, immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClassificationTables {
    tables: Vec<ClassificationTable>,
}

impl ClassificationTables {
    pub fn new(tables: Vec<ClassificationTable>) -> Self {
        Self { tables }
    }

    pub fn get(&self, key: &CategoryKey) -> Result<&ClassificationTable> {
        self.tables
            .iter()
            .find(|t| t.key.matches(key))
            .ok_or_else(|| Error::UnknownCategory(key.to_string()))
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassificationTable> {
        self.tables.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handicap::RatingSystem;

    fn tier(name: &str, min_score: u32) -> Tier {
        Tier {
            name: name.to_string(),
            rank: 0,
            min_score,
            handicap: None,
        }
    }

    fn key() -> CategoryKey {
        CategoryKey::new("recurve", "female", "adult", "portsmouth", None)
    }

    #[test]
    fn test_ranks_assigned_in_order() {
        let tiers = vec![tier("A3", 300), tier("A2", 300), tier("A1", 420)];
        let table = ClassificationTable::new(key(), tiers).unwrap();
        let ranks: Vec<_> = table.tiers().iter().map(|t| t.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
    }

    #[test]
    fn test_rejects_decreasing_thresholds() {
        let err =
            ClassificationTable::new(key(), vec![tier("A3", 400), tier("A2", 300)]).unwrap_err();
        assert!(matches!(err, Error::MalformedTable { .. }));
        assert!(ClassificationTable::new(key(), vec![]).is_err());
    }

    #[test]
    fn test_key_matching_ignores_case() {
        let a = key();
        let b = CategoryKey::new("Recurve", "FEMALE", "Adult", "Portsmouth", None);
        assert!(a.matches(&b));
        let c = CategoryKey::new("recurve", "female", "adult", "portsmouth", Some("x"));
        assert!(!a.matches(&c));
        assert_eq!(c.to_string(), "recurve/female/adult/portsmouth[x]");
    }

    #[test]
    fn test_resolve_handicap_tiers() {
        let catalogue: RoundCatalogue = serde_saphyr::from_str(
            r#"
rounds:
  - id: portsmouth
    name: Portsmouth
    indoor: true
    unit: yards
    legs:
      - { arrows: 60, face_cm: 60 }
    distances: [20]
"#,
        )
        .unwrap();
        let file: ClassificationFile = serde_saphyr::from_str(
            r#"
tables:
  - bow: recurve
    gender: female
    age: adult
    round: portsmouth
    tiers:
      - { name: "A3", handicap: 70 }
      - { name: "A2", handicap: 60 }
      - { name: "A1", min_score: 590 }
"#,
        )
        .unwrap();

        let hc = Handicapper::for_system(RatingSystem::Current);
        let tables = file.resolve(&catalogue, &hc).unwrap();
        let table = tables.get(&key()).unwrap();
        let round = catalogue.structure("portsmouth", None).unwrap();
        assert_eq!(table.tiers()[0].min_score, hc.score_for_handicap(&round, 70));
        assert_eq!(table.tiers()[1].min_score, hc.score_for_handicap(&round, 60));
        assert_eq!(table.tiers()[2].min_score, 590);
        assert_eq!(table.tiers()[1].handicap, Some(60));
    }

    #[test]
    fn test_resolve_rejects_empty_tier() {
        let catalogue: RoundCatalogue = serde_saphyr::from_str(
            r#"
rounds:
  - id: portsmouth
    name: Portsmouth
    legs:
      - { arrows: 60, face_cm: 60 }
    distances: [20]
"#,
        )
        .unwrap();
        let file = ClassificationFile {
            tables: vec![TableDefinition {
                bow: "recurve".to_string(),
                gender: "female".to_string(),
                age: "adult".to_string(),
                round: "portsmouth".to_string(),
                subtype: None,
                tiers: vec![TierDefinition {
                    name: "Nothing".to_string(),
                    min_score: None,
                    handicap: None,
                }],
            }],
        };
        let hc = Handicapper::for_system(RatingSystem::Current);
        assert!(matches!(file.resolve(&catalogue, &hc), Err(Error::MalformedTable { .. })));
    }

    #[test]
    fn test_unknown_category() {
        let tables = ClassificationTables::default();
        assert!(matches!(tables.get(&key()), Err(Error::UnknownCategory(_))));
    }
}
