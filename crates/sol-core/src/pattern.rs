//! Compact translation patterns: sentences with inline `[a/b/c]` groups.
//!
//! A parsed pattern is a sequence of `Token`s. It renders either folded
//! (groups kept in brackets) or unfolded (the cartesian product of every
//! group, one concrete sentence per combination).

use serde::{Deserialize, Serialize};

use crate::unicode::normalize;

/// A piece of a solution: literal text, or a group of alternatives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Token {
    Text(String),
    Choice(Vec<String>),
}

/// Parse a pattern string. Unbalanced brackets are kept as literal text.
pub fn parse_pattern(pattern: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut rest = pattern;

    while let Some(open) = rest.find('[') {
        let after = &rest[open + 1..];
        let Some(close) = after.find(']') else { break };
        let inner = &after[..close];
        if inner.contains('[') {
            // "[a [b/c]": the first bracket is literal.
            literal.push_str(&rest[..open + 1]);
            rest = after;
            continue;
        }
        literal.push_str(&rest[..open]);
        if !literal.is_empty() {
            tokens.push(Token::Text(std::mem::take(&mut literal)));
        }
        let alternatives: Vec<String> = inner.split('/').map(str::to_string).collect();
        if alternatives.len() == 1 {
            tokens.push(Token::Text(alternatives.into_iter().next().unwrap_or_default()));
        } else {
            tokens.push(Token::Choice(alternatives));
        }
        rest = &after[close + 1..];
    }
    literal.push_str(rest);
    if !literal.is_empty() {
        tokens.push(Token::Text(literal));
    }
    merge_text(tokens)
}

/// Adjacent literal tokens are merged so that `Text` never follows `Text`.
fn merge_text(tokens: Vec<Token>) -> Vec<Token> {
    let mut out: Vec<Token> = Vec::with_capacity(tokens.len());
    for token in tokens {
        match (out.last_mut(), token) {
            (Some(Token::Text(prev)), Token::Text(t)) => prev.push_str(&t),
            (_, token) => out.push(token),
        }
    }
    out
}

pub fn is_folded(tokens: &[Token]) -> bool {
    tokens.iter().any(|t| matches!(t, Token::Choice(_)))
}

/// Reader-friendly form: groups shown bracketed in place.
pub fn render_folded(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        match token {
            Token::Text(t) => out.push_str(t),
            Token::Choice(alternatives) => {
                out.push('[');
                out.push_str(&alternatives.join("/"));
                out.push(']');
            }
        }
    }
    out
}

/// Number of concrete variations, without materializing them.
pub fn variation_count(tokens: &[Token]) -> u128 {
    tokens.iter().fold(1u128, |acc, token| match token {
        Token::Text(_) => acc,
        Token::Choice(alternatives) => acc.saturating_mul(alternatives.len() as u128),
    })
}

/// Every concrete variation, whitespace-normalized, in pattern order.
pub fn unfold(tokens: &[Token]) -> Vec<String> {
    let groups: Vec<Vec<&str>> = tokens
        .iter()
        .map(|token| match token {
            Token::Text(t) => vec![t.as_str()],
            Token::Choice(alternatives) => alternatives.iter().map(String::as_str).collect(),
        })
        .collect();
    unfold_groups(&groups)
}

/// Cartesian product over per-token alternative lists.
pub(crate) fn unfold_groups(groups: &[Vec<&str>]) -> Vec<String> {
    let mut partial: Vec<String> = vec![String::new()];
    for group in groups {
        let mut next = Vec::with_capacity(partial.len() * group.len().max(1));
        for prefix in &partial {
            for piece in group {
                let mut s = String::with_capacity(prefix.len() + piece.len());
                s.push_str(prefix);
                s.push_str(piece);
                next.push(s);
            }
        }
        partial = next;
    }
    partial
        .into_iter()
        .map(|s| normalize(&s, true, false))
        .collect()
}
