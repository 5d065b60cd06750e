use super::QueryError;

const NAME_PREFIX: &str = "Name=";
const VALUE_PREFIX: &str = "Value=";

/// A single `(name, value)` filter on a metric.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dimension {
    name: String,
    value: String,
}

impl Dimension {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Parse a dimension filter written in the CloudWatch CLI shorthand syntax.
///
/// The input is one or more pairs separated by a single space, each pair being
/// `Name=<name>,Value=<value>` with the two tokens in either order. The first
/// malformed pair fails the whole parse.
pub fn parse_dimensions(shorthand: &str) -> Result<Vec<Dimension>, QueryError> {
    shorthand.split(' ').map(parse_pair).collect()
}

fn parse_pair(pair: &str) -> Result<Dimension, QueryError> {
    let malformed = || QueryError::MalformedDimension(pair.to_string());

    let mut tokens = pair.split(',');
    let (Some(first), Some(second), None) = (tokens.next(), tokens.next(), tokens.next()) else {
        return Err(malformed());
    };

    let (name, value) = match (classify_token(first), classify_token(second)) {
        (Some(Token::Name(name)), Some(Token::Value(value))) | (Some(Token::Value(value)), Some(Token::Name(name))) => {
            (name, value)
        }
        _ => return Err(malformed()),
    };

    if name.is_empty() || value.is_empty() {
        return Err(malformed());
    }

    Ok(Dimension::new(name, value))
}

enum Token<'a> {
    Name(&'a str),
    Value(&'a str),
}

fn classify_token(token: &str) -> Option<Token<'_>> {
    token
        .strip_prefix(NAME_PREFIX)
        .map(Token::Name)
        .or_else(|| token.strip_prefix(VALUE_PREFIX).map(Token::Value))
}
