//! The question catalog: static set-id → question-set mapping.
//!
//! Loaded once at process start from a TOML file and passed by reference
//! into the validator; never mutated afterwards. The file holds only
//! encrypted reference answers (generated with `answer-seal encrypt`).

use serde::Deserialize;
use std::collections::{HashMap, HashSet};

use wicket_common::{QuestionSet, QuestionType, WicketError};

/// On-disk catalog shape
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    sets: HashMap<String, QuestionSet>,
}

/// Immutable question catalog
#[derive(Debug)]
pub struct QuestionCatalog {
    sets: HashMap<String, QuestionSet>,
}

impl QuestionCatalog {
    /// Load and validate the catalog from a TOML file.
    pub fn load(path: &str) -> Result<Self, WicketError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()
            .map_err(|e| WicketError::Config(format!("failed to load catalog {path}: {e}")))?;

        let file: CatalogFile = settings
            .try_deserialize()
            .map_err(|e| WicketError::Config(format!("failed to parse catalog {path}: {e}")))?;

        Self::from_sets(file.sets)
    }

    /// Build a catalog from already-parsed sets, enforcing the invariants.
    pub fn from_sets(sets: HashMap<String, QuestionSet>) -> Result<Self, WicketError> {
        for (set_id, set) in &sets {
            validate_set(set_id, set)?;
        }
        Ok(Self { sets })
    }

    pub fn get(&self, set_id: &str) -> Option<&QuestionSet> {
        self.sets.get(set_id)
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

fn validate_set(set_id: &str, set: &QuestionSet) -> Result<(), WicketError> {
    if set.questions.is_empty() {
        return Err(WicketError::Config(format!(
            "question set '{set_id}' has no questions"
        )));
    }

    let mut seen = HashSet::new();
    for q in &set.questions {
        if !seen.insert(q.id.as_str()) {
            return Err(WicketError::Config(format!(
                "question set '{set_id}' has duplicate question id '{}'",
                q.id
            )));
        }

        // Options are required iff the question is a choice
        match q.kind {
            QuestionType::Choice => {
                if q.options.as_ref().is_none_or(|o| o.is_empty()) {
                    return Err(WicketError::Config(format!(
                        "choice question '{}' in set '{set_id}' has no options",
                        q.id
                    )));
                }
            }
            QuestionType::Text | QuestionType::Password => {
                if q.options.is_some() {
                    return Err(WicketError::Config(format!(
                        "question '{}' in set '{set_id}' is not a choice but has options",
                        q.id
                    )));
                }
            }
        }

        // Cheap shape check; a full decrypt needs the key and happens at
        // validation time.
        let looks_like_token = q
            .encrypted_answer
            .split_once(':')
            .is_some_and(|(iv, ct)| !iv.is_empty() && !ct.is_empty());
        if !looks_like_token {
            return Err(WicketError::Config(format!(
                "question '{}' in set '{set_id}' has a malformed encrypted_answer (expected \"iv:cipher\")",
                q.id
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wicket_common::Question;

    fn question(id: &str, kind: QuestionType, options: Option<Vec<String>>) -> Question {
        Question {
            id: id.to_string(),
            prompt: format!("prompt for {id}"),
            image_url: None,
            kind,
            options,
            encrypted_answer: "aabbccdd:eeff0011".to_string(),
            case_sensitive: false,
        }
    }

    fn catalog_with(questions: Vec<Question>) -> Result<QuestionCatalog, WicketError> {
        let mut sets = HashMap::new();
        sets.insert("demo".to_string(), QuestionSet { questions });
        QuestionCatalog::from_sets(sets)
    }

    #[test]
    fn test_valid_catalog() {
        let catalog = catalog_with(vec![
            question("q1", QuestionType::Text, None),
            question("q2", QuestionType::Choice, Some(vec!["a".into(), "b".into()])),
            question("q3", QuestionType::Password, None),
        ])
        .unwrap();

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("demo").unwrap().questions.len(), 3);
        assert!(catalog.get("missing").is_none());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let err = catalog_with(vec![
            question("q1", QuestionType::Text, None),
            question("q1", QuestionType::Password, None),
        ])
        .unwrap_err();
        assert!(matches!(err, WicketError::Config(_)));
    }

    #[test]
    fn test_choice_requires_options() {
        let err = catalog_with(vec![question("q1", QuestionType::Choice, None)]).unwrap_err();
        assert!(matches!(err, WicketError::Config(_)));

        let err = catalog_with(vec![question("q1", QuestionType::Choice, Some(vec![]))])
            .unwrap_err();
        assert!(matches!(err, WicketError::Config(_)));
    }

    #[test]
    fn test_options_forbidden_elsewhere() {
        let err = catalog_with(vec![question(
            "q1",
            QuestionType::Text,
            Some(vec!["a".into()]),
        )])
        .unwrap_err();
        assert!(matches!(err, WicketError::Config(_)));
    }

    #[test]
    fn test_malformed_answer_token_rejected() {
        let mut q = question("q1", QuestionType::Text, None);
        q.encrypted_answer = "no-separator".to_string();
        let err = catalog_with(vec![q]).unwrap_err();
        assert!(matches!(err, WicketError::Config(_)));
    }

    #[test]
    fn test_empty_set_rejected() {
        let err = catalog_with(vec![]).unwrap_err();
        assert!(matches!(err, WicketError::Config(_)));
    }
}
