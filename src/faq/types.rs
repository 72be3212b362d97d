use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

// The knowledge base file is either a list of entries or a plain
// question -> answer mapping.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum FaqFileRepr {
    List(Vec<FaqEntry>),
    Mapping(BTreeMap<String, String>),
}

impl From<FaqFileRepr> for Vec<FaqEntry> {
    fn from(repr: FaqFileRepr) -> Self {
        match repr {
            FaqFileRepr::List(entries) => entries,
            FaqFileRepr::Mapping(map) => map
                .into_iter()
                .map(|(question, answer)| FaqEntry { question, answer })
                .collect(),
        }
    }
}

/// The loaded FAQ entries and one vector per question, index-aligned.
#[derive(Debug, Default)]
pub struct KnowledgeBase {
    pub entries: Vec<FaqEntry>,
    pub question_vectors: Vec<Vec<f64>>,
}

impl KnowledgeBase {
    pub fn new() -> Self {
        Self::default()
    }
}

/// The outcome of matching one query against the knowledge base.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Answer {
        text: String,
        score: f64,
        index: usize,
    },
    /// Nothing scored at or above the threshold. `best_score` is `None` when the
    /// knowledge base is empty.
    Fallback {
        text: String,
        best_score: Option<f64>,
    },
}

impl Reply {
    pub fn text(&self) -> &str {
        match self {
            Reply::Answer { text, .. } | Reply::Fallback { text, .. } => text,
        }
    }

    /// Position of the matched entry in the knowledge base.
    pub fn matched_index(&self) -> Option<usize> {
        match self {
            Reply::Answer { index, .. } => Some(*index),
            Reply::Fallback { .. } => None,
        }
    }

    /// Similarity of a matched answer, scaled to a whole percentage.
    pub fn confidence_percent(&self) -> Option<u32> {
        match self {
            Reply::Answer { score, .. } => Some((score.clamp(0.0, 1.0) * 100.0).round() as u32),
            Reply::Fallback { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_and_mapping_files_both_parse() {
        let list: FaqFileRepr =
            serde_json::from_str(r#"[{"question": "q1", "answer": "a1"}]"#).unwrap();
        let mapping: FaqFileRepr = serde_json::from_str(r#"{"q2": "a2", "q1": "a1"}"#).unwrap();

        let list: Vec<FaqEntry> = list.into();
        let mapping: Vec<FaqEntry> = mapping.into();

        assert_eq!(list.len(), 1);
        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping[0].question, "q1");
        assert_eq!(mapping[1].answer, "a2");
    }

    #[test]
    fn confidence_is_only_reported_for_answers() {
        let answer = Reply::Answer {
            text: "a".to_string(),
            score: 0.8666,
            index: 0,
        };
        let fallback = Reply::Fallback {
            text: "f".to_string(),
            best_score: Some(0.1),
        };

        assert_eq!(answer.confidence_percent(), Some(87));
        assert_eq!(answer.matched_index(), Some(0));
        assert_eq!(fallback.confidence_percent(), None);
        assert_eq!(fallback.matched_index(), None);
        assert_eq!(fallback.text(), "f");
    }
}
