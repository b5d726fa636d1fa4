//! Raw challenge payloads as delivered by the upstream data source.
//!
//! Optional fields that are present but malformed are treated as absent,
//! so one bad representation never prevents using another.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::graph::{SolutionGraph, Vertex};
use crate::locale::Locale;
use crate::solution::{ChallengeMeta, ParsedSolutions, SolutionError, SolutionList};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPayload {
    #[serde(default)]
    locale: Option<Value>,
    #[serde(default)]
    target_language: Option<Value>,
    #[serde(default)]
    whitespace_delimited: Option<Value>,
    #[serde(default)]
    graph: Option<Value>,
    #[serde(default)]
    compact_translations: Option<Value>,
    #[serde(default)]
    correct_solutions: Option<Value>,
    #[serde(default)]
    correct_tokens: Option<Value>,
}

/// The representations a challenge may carry, already validated.
#[derive(Debug, Clone)]
pub struct ChallengePayload {
    pub meta: ChallengeMeta,
    pub graph: Option<SolutionGraph>,
    pub compact_translations: Option<Vec<String>>,
    pub correct_solutions: Option<Vec<String>>,
    pub correct_tokens: Option<Vec<Vec<String>>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawGraph {
    Layers(Vec<Vec<Vertex>>),
    Object {
        #[serde(alias = "vertices")]
        layers: Vec<Vec<Vertex>>,
        #[serde(default, alias = "whitespaceDelimited")]
        whitespace_delimited: Option<bool>,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTokens {
    Many(Vec<Vec<String>>),
    One(Vec<String>),
}

/// Decode an optional field, logging and dropping it when malformed.
fn lenient<T: DeserializeOwned>(field: &str, value: Option<Value>) -> Option<T> {
    let value = value?;
    if value.is_null() {
        return None;
    }
    match serde_json::from_value(value) {
        Ok(v) => Some(v),
        Err(e) => {
            warn!(field, error = %e, "ignoring malformed payload field");
            None
        }
    }
}

impl ChallengePayload {
    pub fn from_json(json: &str) -> Result<Self, SolutionError> {
        let raw: RawPayload =
            serde_json::from_str(json).map_err(|e| SolutionError::Payload(e.to_string()))?;
        Ok(Self::from_raw(raw))
    }

    pub fn from_value(value: Value) -> Result<Self, SolutionError> {
        let raw: RawPayload =
            serde_json::from_value(value).map_err(|e| SolutionError::Payload(e.to_string()))?;
        Ok(Self::from_raw(raw))
    }

    fn from_raw(raw: RawPayload) -> Self {
        let locale: Option<String> = lenient("locale", raw.locale)
            .or_else(|| lenient("targetLanguage", raw.target_language));
        let locale = Locale::new(locale.as_deref().unwrap_or(""));
        let declared_ws: Option<bool> = lenient("whitespaceDelimited", raw.whitespace_delimited);

        let graph = lenient::<RawGraph>("graph", raw.graph).map(|g| match g {
            RawGraph::Layers(layers) => (layers, None),
            RawGraph::Object {
                layers,
                whitespace_delimited,
            } => (layers, whitespace_delimited),
        });
        let whitespace_delimited = declared_ws
            .or_else(|| graph.as_ref().and_then(|(_, ws)| *ws))
            .unwrap_or_else(|| locale.is_word_based());
        let graph = graph.map(|(layers, ws)| {
            SolutionGraph::new(layers, ws.unwrap_or(whitespace_delimited))
        });

        let correct_tokens = lenient::<RawTokens>("correctTokens", raw.correct_tokens)
            .map(|t| match t {
                RawTokens::Many(many) => many,
                RawTokens::One(one) => vec![one],
            })
            .filter(|t| !t.is_empty());

        Self {
            meta: ChallengeMeta {
                locale,
                whitespace_delimited,
            },
            graph,
            compact_translations: lenient("compactTranslations", raw.compact_translations),
            correct_solutions: lenient("correctSolutions", raw.correct_solutions),
            correct_tokens,
        }
    }

    /// Solution list for this challenge. Graphs and patterns stay unparsed;
    /// flat sentences and word-bank tokens are parsed right away.
    pub fn into_solution_list(self) -> SolutionList {
        if self.graph.is_some() || self.compact_translations.is_some() {
            return SolutionList::unparsed(self.graph, self.compact_translations, self.meta);
        }
        if let Some(sentences) = self.correct_solutions {
            return SolutionList::Parsed(ParsedSolutions::from_sentences(
                sentences,
                &self.meta.locale,
            ));
        }
        if let Some(tokens) = self.correct_tokens {
            return SolutionList::Parsed(ParsedSolutions::from_word_bank(
                tokens,
                &self.meta.locale,
                self.meta.whitespace_delimited,
            ));
        }
        SolutionList::unparsed(None, None, self.meta)
    }
}

impl SolutionList {
    pub fn from_payload(json: &str) -> Result<Self, SolutionError> {
        Ok(ChallengePayload::from_json(json)?.into_solution_list())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solution::ListKind;

    #[test]
    fn test_graph_payload_stays_unparsed() {
        let json = r#"{
            "locale": "en",
            "graph": [[ "a", "b" ], [ "x" ]]
        }"#;
        let mut list = SolutionList::from_payload(json).unwrap();
        assert!(!list.is_parsed());
        let parsed = list.ensure_parsed(ListKind::Expanded).unwrap();
        let texts: Vec<String> = parsed.solutions().iter().map(|s| s.text()).collect();
        assert_eq!(texts, vec!["a x", "b x"]);
    }

    #[test]
    fn test_graph_object_with_vertices_alias() {
        let json = r#"{
            "targetLanguage": "zh-CN",
            "graph": { "vertices": [["我"], ["爱", "喜欢"], ["猫"]], "whitespaceDelimited": false }
        }"#;
        let payload = ChallengePayload::from_json(json).unwrap();
        assert_eq!(payload.meta.locale.as_str(), "zh-cn");
        assert!(!payload.meta.whitespace_delimited);
        assert_eq!(payload.graph.unwrap().expand().unwrap(), vec!["我爱猫", "我喜欢猫"]);
    }

    #[test]
    fn test_malformed_graph_falls_back_to_patterns() {
        let json = r#"{
            "locale": "en",
            "graph": "not a graph",
            "compactTranslations": ["I [am/'m] happy"]
        }"#;
        let mut list = SolutionList::from_payload(json).unwrap();
        let parsed = list.ensure_parsed(ListKind::Expanded).unwrap();
        assert_eq!(parsed.kind(), ListKind::Compact);
        assert_eq!(parsed.solutions()[0].text(), "I [am/'m] happy");
    }

    #[test]
    fn test_flat_solutions_are_parsed() {
        let json = r#"{"locale": "es", "correctSolutions": ["Hola.", "Buenas."]}"#;
        let list = SolutionList::from_payload(json).unwrap();
        let parsed = list.parsed().unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed.solutions()[1].reference, 1);
    }

    #[test]
    fn test_word_bank_tokens_joined() {
        let json = r#"{"locale": "fr", "correctTokens": ["Je", "suis", "là"]}"#;
        let list = SolutionList::from_payload(json).unwrap();
        assert_eq!(list.parsed().unwrap().solutions()[0].text(), "Je suis là");

        let json = r#"{"locale": "ja", "correctTokens": [["私", "は"], ["僕", "は"]]}"#;
        let list = SolutionList::from_payload(json).unwrap();
        let texts: Vec<String> = list.parsed().unwrap().solutions().iter().map(|s| s.text()).collect();
        assert_eq!(texts, vec!["私は", "僕は"]);
    }

    #[test]
    fn test_wrongly_typed_fields_are_ignored() {
        let json = r#"{"locale": 5, "whitespaceDelimited": "yes", "correctSolutions": ["ok"]}"#;
        let payload = ChallengePayload::from_json(json).unwrap();
        assert_eq!(payload.meta.locale.as_str(), "");
        assert!(payload.meta.whitespace_delimited);
        assert_eq!(payload.correct_solutions.unwrap(), vec!["ok"]);
    }

    #[test]
    fn test_non_json_is_payload_error() {
        let err = ChallengePayload::from_json("<html>").unwrap_err();
        assert!(matches!(err, SolutionError::Payload(_)));
    }

    #[test]
    fn test_empty_payload_parses_to_empty_list() {
        let mut list = SolutionList::from_payload("{}").unwrap();
        let parsed = list.ensure_parsed(ListKind::Compact).unwrap();
        assert!(parsed.is_empty());
        assert_eq!(parsed.kind(), ListKind::Compact);
    }
}
