use thiserror::Error;

pub type Result<T> = std::result::Result<T, PolicyParseError>;

#[derive(Debug, Error)]
pub enum PolicyParseError {
    /// An element was found where a differently named one was required.
    #[error("Invalid root element! Provided name: {provided} expected: {expected}")]
    InvalidRootElement {
        provided: String,
        expected: &'static str,
    },
    #[error("invalid URL `{url}`: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("malformed policy document: {0}")]
    MalformedXml(String),
    #[error("policy document has no root element")]
    EmptyDocument,
}

/// Returned when a property is derived from a hosted server that was declared
/// without a `URL` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("hosted server has no URL")]
pub struct MissingServerUrl;
