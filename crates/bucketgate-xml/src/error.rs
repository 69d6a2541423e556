//! XML error type and the S3 error envelope.

use std::io;

use quick_xml::escape::escape;

use crate::serialize::XML_DECLARATION;

/// Errors that can occur during S3 XML serialization or deserialization.
#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    /// An I/O error during XML writing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// An error from the underlying quick-xml library.
    #[error("XML processing error: {0}")]
    QuickXml(#[from] quick_xml::Error),

    /// An error from quick-xml attribute handling.
    #[error("XML attribute error: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    /// A required XML element was missing.
    #[error("missing required XML element: {0}")]
    MissingElement(String),

    /// An unexpected XML element was encountered.
    #[error("unexpected XML element: {0}")]
    UnexpectedElement(String),

    /// An error parsing a value from XML text content.
    #[error("failed to parse value: {0}")]
    ParseError(String),
}

/// Format an S3 error envelope.
///
/// S3 does not wrap errors, so this is a flat `<Error>` element. Children
/// are indented by four spaces and every text value is XML-escaped.
///
/// ```xml
/// <?xml version="1.0" encoding="UTF-8"?>
/// <Error>
///     <Code>NoSuchBucket</Code>
///     <Message>The specified bucket does not exist</Message>
///     <Resource>/mybucket</Resource>
///     <RequestId>4442587FB7D0A2F9</RequestId>
/// </Error>
/// ```
#[must_use]
pub fn error_to_xml(code: &str, message: &str, resource: &str, request_id: &str) -> Vec<u8> {
    let mut out = String::with_capacity(256);
    out.push_str(XML_DECLARATION);
    out.push_str("\n<Error>\n");
    for (tag, value) in [
        ("Code", code),
        ("Message", message),
        ("Resource", resource),
        ("RequestId", request_id),
    ] {
        out.push_str(&format!("    <{tag}>{}</{tag}>\n", escape(value)));
    }
    out.push_str("</Error>\n");
    out.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_format_error_envelope() {
        let xml = error_to_xml(
            "NoSuchBucket",
            "The specified bucket does not exist",
            "/mybucket",
            "tx000001",
        );
        let xml_str = std::str::from_utf8(&xml).expect("valid UTF-8");

        assert_eq!(
            xml_str,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <Error>\n    \
             <Code>NoSuchBucket</Code>\n    \
             <Message>The specified bucket does not exist</Message>\n    \
             <Resource>/mybucket</Resource>\n    \
             <RequestId>tx000001</RequestId>\n\
             </Error>\n"
        );
    }

    #[test]
    fn test_should_escape_special_characters() {
        let xml = error_to_xml(
            "InternalError",
            "Value must be < 1024 & > 0",
            "/my&bucket",
            "tx000003",
        );
        let xml_str = std::str::from_utf8(&xml).expect("valid UTF-8");

        assert!(xml_str.contains("Value must be &lt; 1024 &amp; &gt; 0"));
        assert!(xml_str.contains("<Resource>/my&amp;bucket</Resource>"));
    }
}
