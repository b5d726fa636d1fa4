//! Layered solution graphs and their expansion into sentences.
//!
//! `layers[i]` holds the alternatives for token position `i`. Each
//! alternative names the alternatives of layer `i + 1` it may continue to;
//! a sentence is any path from layer 0 to a terminal alternative.

use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span};

use crate::solution::SolutionError;

/// One alternative at a position of the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawVertex")]
pub struct Vertex {
    pub token: String,
    /// Indices into the next layer. `None` connects to every alternative
    /// of the next layer (and is terminal in the last layer). `Some([])`
    /// is terminal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<Vec<usize>>,
}

impl Vertex {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            next: None,
        }
    }

    pub fn with_next(token: impl Into<String>, next: Vec<usize>) -> Self {
        Self {
            token: token.into(),
            next: Some(next),
        }
    }

    pub fn terminal(token: impl Into<String>) -> Self {
        Self::with_next(token, Vec::new())
    }
}

/// Payload shape: either a bare token string or an object.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawVertex {
    Token(String),
    Full {
        #[serde(alias = "lenient", alias = "text")]
        token: String,
        #[serde(default, alias = "to")]
        next: Option<Vec<usize>>,
        #[serde(default)]
        terminal: bool,
    },
}

impl From<RawVertex> for Vertex {
    fn from(raw: RawVertex) -> Self {
        match raw {
            RawVertex::Token(token) => Vertex::new(token),
            RawVertex::Full {
                token,
                next,
                terminal,
            } => Vertex {
                token,
                next: if terminal { Some(Vec::new()) } else { next },
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionGraph {
    pub layers: Vec<Vec<Vertex>>,
    #[serde(default = "default_whitespace_delimited")]
    pub whitespace_delimited: bool,
}

fn default_whitespace_delimited() -> bool {
    true
}

/// A sentence together with the alternative chosen at each layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandedPath {
    pub alternatives: Vec<usize>,
    pub text: String,
}

impl SolutionGraph {
    pub fn new(layers: Vec<Vec<Vertex>>, whitespace_delimited: bool) -> Self {
        Self {
            layers,
            whitespace_delimited,
        }
    }

    /// Reject dangling references before any traversal, so that expansion
    /// either yields every path or nothing.
    pub fn validate(&self) -> Result<(), SolutionError> {
        for (layer, alternatives) in self.layers.iter().enumerate() {
            let next_len = self.layers.get(layer + 1).map(Vec::len);
            for (alternative, vertex) in alternatives.iter().enumerate() {
                let Some(next) = &vertex.next else {
                    // Implicit edges into an empty layer lead nowhere.
                    if next_len == Some(0) {
                        return Err(SolutionError::MalformedGraph {
                            layer,
                            alternative,
                            target: 0,
                        });
                    }
                    continue;
                };
                for &target in next {
                    if next_len.map_or(true, |len| target >= len) {
                        return Err(SolutionError::MalformedGraph {
                            layer,
                            alternative,
                            target,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Successors of `(layer, alternative)`; `None` when terminal.
    fn successors(&self, layer: usize, alternative: usize) -> Option<Vec<usize>> {
        let vertex = &self.layers[layer][alternative];
        match &vertex.next {
            Some(next) if next.is_empty() => None,
            Some(next) => Some(next.clone()),
            None => match self.layers.get(layer + 1) {
                Some(next_layer) => Some((0..next_layer.len()).collect()),
                None => None,
            },
        }
    }

    /// Number of complete paths, computed without expanding them.
    pub fn path_count(&self) -> Result<u128, SolutionError> {
        self.validate()?;
        let Some(first) = self.layers.first() else {
            return Ok(0);
        };
        // counts[j] = paths starting at alternative j of the current layer.
        let mut counts: Vec<u128> = Vec::new();
        for layer in (0..self.layers.len()).rev() {
            let mut current = vec![0u128; self.layers[layer].len()];
            for (alternative, count) in current.iter_mut().enumerate() {
                *count = match self.successors(layer, alternative) {
                    None => 1,
                    Some(next) => next
                        .iter()
                        .fold(0u128, |acc, &t| acc.saturating_add(counts[t])),
                };
            }
            counts = current;
        }
        debug_assert_eq!(counts.len(), first.len());
        Ok(counts.iter().fold(0u128, |acc, &c| acc.saturating_add(c)))
    }

    /// Expand every path into a sentence.
    pub fn expand(&self) -> Result<Vec<String>, SolutionError> {
        Ok(self
            .expand_paths()?
            .into_iter()
            .map(|p| p.text)
            .collect())
    }

    /// Depth-first expansion keeping the chosen alternatives of each path.
    pub fn expand_paths(&self) -> Result<Vec<ExpandedPath>, SolutionError> {
        let _span = debug_span!("expand_graph", layers = self.layers.len()).entered();
        self.validate()?;
        let mut out = Vec::new();
        let Some(first) = self.layers.first() else {
            return Ok(out);
        };
        let mut text = String::new();
        let mut chosen = Vec::with_capacity(self.layers.len());
        for alternative in 0..first.len() {
            self.walk(0, alternative, &mut text, &mut chosen, &mut out);
        }
        debug!(sentences = out.len());
        Ok(out)
    }

    fn walk(
        &self,
        layer: usize,
        alternative: usize,
        text: &mut String,
        chosen: &mut Vec<usize>,
        out: &mut Vec<ExpandedPath>,
    ) {
        let mark = text.len();
        append_token(text, &self.layers[layer][alternative].token, self.whitespace_delimited);
        chosen.push(alternative);
        match self.successors(layer, alternative) {
            None => out.push(ExpandedPath {
                alternatives: chosen.clone(),
                text: text.clone(),
            }),
            Some(next) => {
                for target in next {
                    self.walk(layer + 1, target, text, chosen, out);
                }
            }
        }
        chosen.pop();
        text.truncate(mark);
    }
}

/// Append `token`, inserting a single space between tokens of
/// whitespace-delimited text unless the junction already has whitespace.
pub(crate) fn append_token(text: &mut String, token: &str, whitespace_delimited: bool) {
    if whitespace_delimited
        && !token.is_empty()
        && !text.is_empty()
        && !text.ends_with(char::is_whitespace)
        && !token.starts_with(char::is_whitespace)
    {
        text.push(' ');
    }
    text.push_str(token);
}
