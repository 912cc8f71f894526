use crate::{errors::PathError, parser::Parser, path::FieldPath};

/// Converts between a [`FieldPath`] and its canonical text.
///
/// Decoding uses the [`Parser`] the codec was built with, and only accepts
/// text that parses to a bare field path.
pub struct PathCodec {
    parser: Parser,
}

impl Default for PathCodec {
    fn default() -> Self {
        PathCodec::new(Parser::default())
    }
}

impl PathCodec {
    pub fn new(parser: Parser) -> Self {
        PathCodec { parser }
    }

    pub fn parser(&self) -> &Parser {
        &self.parser
    }

    /// The canonical text for `path`. [`PathCodec::decode`] turns it back
    /// into an equal path.
    pub fn encode(&self, path: &FieldPath) -> String {
        path.to_canonical_text()
    }

    pub fn decode(&self, text: &str) -> Result<FieldPath, PathError> {
        if text.is_empty() {
            return Err(PathError::EmptyInput);
        }

        log::debug!("parsing field path {:?}", text);

        let expr = self.parser.parse(text).map_err(|source| PathError::Parse {
            text: text.to_owned(),
            source,
        })?;

        expr.into_field_path().map_err(|other| {
            PathError::MalformedPath(format!(
                "{:?} is a {}, not a field path",
                text,
                other.kind_name()
            ))
        })
    }
}
