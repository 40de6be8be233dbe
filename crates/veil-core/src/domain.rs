//! The `name<real|fake>` domain mini-language.
//!
//! A client sends a list of display domains such as
//! `veil.example<real>x.com<fake>`. Each entry is a host name followed by a
//! flag in angle brackets; `real` hosts serve the object themselves, `fake`
//! hosts are only shown in front of the cloaked retrieval link. Whitespace is
//! ignored anywhere in the input.

use crate::error::CoreError;
use std::str::FromStr;

/// One display domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainEntry {
    pub name: String,
    pub is_real: bool,
}

/// An ordered, validated list of display domains.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainSpec {
    entries: Vec<DomainEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Text(String),
    Open,
    Close,
}

fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut text = String::new();

    for c in input.chars().filter(|c| !c.is_whitespace()) {
        match c {
            '<' | '>' => {
                if !text.is_empty() {
                    tokens.push(Token::Text(std::mem::take(&mut text)));
                }
                tokens.push(if c == '<' { Token::Open } else { Token::Close });
            }
            _ => text.push(c),
        }
    }
    if !text.is_empty() {
        tokens.push(Token::Text(text));
    }

    tokens
}

impl DomainSpec {
    /// Parses a domain list. An empty (or all-whitespace) input yields an
    /// empty spec; every other input must consist solely of complete
    /// `name<flag>` entries.
    pub fn parse(input: &str) -> Result<Self, CoreError> {
        let mut tokens = tokenize(input).into_iter();
        let mut entries = Vec::new();

        while let Some(token) = tokens.next() {
            let name = match token {
                Token::Text(name) => name,
                other => {
                    return Err(CoreError::InvalidDomainSpec(format!(
                        "expected a domain name, found {}",
                        describe(&other)
                    )))
                }
            };

            match tokens.next() {
                Some(Token::Open) => {}
                other => {
                    return Err(CoreError::InvalidDomainSpec(format!(
                        "expected '<' after '{name}', found {}",
                        describe_opt(other.as_ref())
                    )))
                }
            }

            let is_real = match tokens.next() {
                Some(Token::Text(flag)) if flag == "real" => true,
                Some(Token::Text(flag)) if flag == "fake" => false,
                Some(Token::Text(flag)) => {
                    return Err(CoreError::InvalidDomainSpec(format!(
                        "flag for '{name}' must be 'real' or 'fake', got '{flag}'"
                    )))
                }
                other => {
                    return Err(CoreError::InvalidDomainSpec(format!(
                        "expected a flag for '{name}', found {}",
                        describe_opt(other.as_ref())
                    )))
                }
            };

            match tokens.next() {
                Some(Token::Close) => {}
                other => {
                    return Err(CoreError::InvalidDomainSpec(format!(
                        "expected '>' to close '{name}', found {}",
                        describe_opt(other.as_ref())
                    )))
                }
            }

            entries.push(DomainEntry { name, is_real });
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[DomainEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl FromStr for DomainSpec {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn describe(token: &Token) -> String {
    match token {
        Token::Text(text) => format!("'{text}'"),
        Token::Open => "'<'".to_string(),
        Token::Close => "'>'".to_string(),
    }
}

fn describe_opt(token: Option<&Token>) -> String {
    token.map_or_else(|| "end of input".to_string(), describe)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, is_real: bool) -> DomainEntry {
        DomainEntry {
            name: name.to_string(),
            is_real,
        }
    }

    #[test]
    fn parses_single_real_domain() {
        let spec = DomainSpec::parse("x.com<real>").unwrap();
        assert_eq!(spec.entries(), &[entry("x.com", true)]);
    }

    #[test]
    fn parses_sequence_in_order() {
        let spec: DomainSpec = "a.com<real>b.net<fake>c.org<real>".parse().unwrap();
        assert_eq!(
            spec.entries(),
            &[
                entry("a.com", true),
                entry("b.net", false),
                entry("c.org", true)
            ]
        );
    }

    #[test]
    fn ignores_whitespace() {
        let spec = DomainSpec::parse(" y.com < fake >\n z.io<real> ").unwrap();
        assert_eq!(spec.entries(), &[entry("y.com", false), entry("z.io", true)]);
    }

    #[test]
    fn empty_input_is_empty_spec() {
        assert!(DomainSpec::parse("").unwrap().is_empty());
        assert!(DomainSpec::parse("   ").unwrap().is_empty());
    }

    #[test]
    fn rejects_unknown_flag() {
        let err = DomainSpec::parse("x.com<maybe>").unwrap_err();
        assert!(matches!(err, CoreError::InvalidDomainSpec(_)));
    }

    #[test]
    fn rejects_unterminated_entry() {
        assert!(DomainSpec::parse("x.com<real").is_err());
        assert!(DomainSpec::parse("x.com<real>y.com").is_err());
    }

    #[test]
    fn rejects_missing_name() {
        assert!(DomainSpec::parse("<real>").is_err());
        assert!(DomainSpec::parse(">").is_err());
    }

    #[test]
    fn rejects_missing_flag() {
        assert!(DomainSpec::parse("x.com<>").is_err());
    }
}
