use std::fmt;

use crate::error::{RestError, RestResult};

/// Output format selected for a response.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Format {
    Text,
    Json,
    Xml,
    Html,
    /// A sub-format requested through the path extension under `text/plain`.
    Custom(String),
}

impl Format {
    /// Map a format token to its variant. Unknown tokens become `Custom`.
    pub fn from_token(token: &str) -> Self {
        match token {
            "text" => Self::Text,
            "json" => Self::Json,
            "xml" => Self::Xml,
            "html" => Self::Html,
            other => Self::Custom(other.to_owned()),
        }
    }

    pub fn token(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
            Self::Xml => "xml",
            Self::Html => "html",
            Self::Custom(token) => token,
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Xml => "application/xml; charset=utf-8",
            Self::Html => "text/html; charset=utf-8",
            Self::Text | Self::Custom(_) => "text/plain; charset=utf-8",
        }
    }
}

impl Default for Format {
    fn default() -> Self {
        Self::Json
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Pick the response format from `Accept` header values.
///
/// Each value may hold a comma-separated list. Media types are tried in
/// order and the first recognised one wins; a `q=0` parameter refuses a type. With no header values at all the
/// format is JSON; if values were given but none matched, the last rejected
/// media type is reported.
pub fn negotiate<'a, I>(values: I, extension: Option<&str>) -> RestResult<Format>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut rejected = None;

    for value in values {
        for media_type in value.split(',') {
            match match_media_type(media_type, extension) {
                Some(format) => return Ok(format),
                None => rejected = Some(media_type.trim().to_owned()),
            }
        }
    }

    match rejected {
        Some(media_type) => Err(RestError::NotAcceptable { media_type }),
        None => Ok(Format::Json),
    }
}

fn match_media_type(raw: &str, extension: Option<&str>) -> Option<Format> {
    let mut parts = raw.split(';');
    let essence = parts.next().unwrap_or_default().trim();
    if parts.any(is_refusal) {
        return None;
    }

    if essence.eq_ignore_ascii_case("text/plain") {
        return Some(match extension {
            Some(ext) if ext != "txt" => Format::from_token(ext),
            _ => Format::Text,
        });
    }

    match essence.to_ascii_lowercase().as_str() {
        "application/json" | "*/*" => Some(Format::Json),
        "application/xml" | "text/xml" => Some(Format::Xml),
        "text/html" => Some(Format::Html),
        _ => None,
    }
}

/// `q=0` marks a media type as not acceptable.
fn is_refusal(param: &str) -> bool {
    match param.split_once('=') {
        Some((name, value)) => {
            name.trim().eq_ignore_ascii_case("q")
                && value.trim().parse::<f32>().is_ok_and(|q| q == 0.0)
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_header_defaults_to_json() {
        assert_eq!(negotiate(Vec::<&str>::new(), None).unwrap(), Format::Json);
        assert_eq!(negotiate(Vec::<&str>::new(), Some("xml")).unwrap(), Format::Json);
    }

    #[test]
    fn first_match_wins_across_values() {
        let format = negotiate(["text/html", "application/json"], None).unwrap();
        assert_eq!(format, Format::Html);
    }

    #[test]
    fn first_match_wins_within_list() {
        let format = negotiate(["image/png, application/xml,text/html"], None).unwrap();
        assert_eq!(format, Format::Xml);
    }

    #[test]
    fn wildcard_is_json() {
        assert_eq!(negotiate(["*/*"], Some("xml")).unwrap(), Format::Json);
    }

    #[test]
    fn text_xml_is_xml() {
        assert_eq!(negotiate(["text/xml"], None).unwrap(), Format::Xml);
    }

    #[test]
    fn text_plain_defers_to_extension() {
        assert_eq!(negotiate(["text/plain"], Some("csv")).unwrap(), Format::Custom("csv".into()));
        assert_eq!(negotiate(["text/plain"], Some("json")).unwrap(), Format::Json);
        assert_eq!(negotiate(["text/plain"], Some("txt")).unwrap(), Format::Text);
        assert_eq!(negotiate(["text/plain"], None).unwrap(), Format::Text);
    }

    #[test]
    fn parameters_are_ignored() {
        let format = negotiate(["text/html;q=0.9"], None).unwrap();
        assert_eq!(format, Format::Html);
    }

    #[test]
    fn zero_quality_is_a_refusal() {
        let err = negotiate(["text/html;q=0"], None).unwrap_err();
        assert!(matches!(err, RestError::NotAcceptable { media_type } if media_type == "text/html;q=0"));

        let format = negotiate(["text/html; q=0.0, application/xml;q=0.5"], None).unwrap();
        assert_eq!(format, Format::Xml);
    }

    #[test]
    fn unmatched_reports_last_rejected() {
        let err = negotiate(["image/png", "audio/ogg, video/mp4"], None).unwrap_err();
        assert!(matches!(err, RestError::NotAcceptable { media_type } if media_type == "video/mp4"));
    }

    #[test]
    fn empty_header_value_is_not_acceptable() {
        let err = negotiate([""], None).unwrap_err();
        assert!(matches!(err, RestError::NotAcceptable { .. }));
    }

    #[test]
    fn format_tokens() {
        assert_eq!(Format::from_token("html"), Format::Html);
        assert_eq!(Format::from_token("yaml").token(), "yaml");
        assert_eq!(Format::Json.to_string(), "json");
        assert_eq!(Format::default(), Format::Json);
    }
}
