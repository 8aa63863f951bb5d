use std::collections::BTreeMap;

use axum::http::header::{ACCEPT, CONTENT_TYPE};
use axum::http::{HeaderMap, Method, Uri};
use percent_encoding::percent_decode_str;

use crate::accept::{negotiate, Format};
use crate::error::{RestError, RestResult};
use crate::path::{tokenize, Tokens};

/// Form parameters, keyed by name, in the order each value appeared.
pub type FormValues = BTreeMap<String, Vec<String>>;

/// Everything the read API needs from an inbound request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedRequest {
    pub method: Method,
    pub segments: Vec<String>,
    pub extension: Option<String>,
    pub format: Format,
    pub form: FormValues,
}

/// Tokenize the path, negotiate the output format, and collect form values
/// from the query string and any form-encoded body.
pub fn parse_request(
    method: &Method,
    uri: &Uri,
    headers: &HeaderMap,
    body: &[u8],
) -> RestResult<ParsedRequest> {
    let tokens = tokenize_uri(uri);
    let format = negotiate_headers(headers, tokens.extension.as_deref())?;

    let mut form = FormValues::new();
    if let Some(query) = uri.query() {
        merge_form(&mut form, query.as_bytes())?;
    }
    if carries_form_body(method, headers) {
        merge_form(&mut form, body)?;
    }

    Ok(ParsedRequest {
        method: method.clone(),
        segments: tokens.segments,
        extension: tokens.extension,
        format,
        form,
    })
}

/// Negotiate the response format for a request without parsing the rest of
/// it. Used to pick an error representation when parsing fails.
pub fn negotiate_format(uri: &Uri, headers: &HeaderMap) -> RestResult<Format> {
    negotiate_headers(headers, tokenize_uri(uri).extension.as_deref())
}

fn tokenize_uri(uri: &Uri) -> Tokens {
    let path = percent_decode_str(uri.path()).decode_utf8_lossy();
    tokenize(&path)
}

fn negotiate_headers(headers: &HeaderMap, extension: Option<&str>) -> RestResult<Format> {
    let accept: Vec<String> = headers
        .get_all(ACCEPT)
        .iter()
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .collect();
    negotiate(accept.iter().map(String::as_str), extension)
}

fn carries_form_body(method: &Method, headers: &HeaderMap) -> bool {
    let is_form = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|v| v.trim().eq_ignore_ascii_case("application/x-www-form-urlencoded"));
    is_form && matches!(*method, Method::POST | Method::PUT | Method::PATCH)
}

/// Parse `application/x-www-form-urlencoded` data into `form`.
///
/// Rejects percent signs not followed by two hex digits and data that is not
/// UTF-8.
pub fn merge_form(form: &mut FormValues, data: &[u8]) -> RestResult<()> {
    check_escapes(data)?;
    std::str::from_utf8(data)
        .map_err(|e| RestError::BadPostData(format!("form data is not UTF-8: {e}")))?;

    let pairs: Vec<(String, String)> =
        serde_urlencoded::from_bytes(data).map_err(|e| RestError::BadPostData(e.to_string()))?;
    for (key, value) in pairs {
        form.entry(key).or_default().push(value);
    }
    Ok(())
}

fn check_escapes(data: &[u8]) -> RestResult<()> {
    let mut i = 0;
    while i < data.len() {
        if data[i] == b'%' {
            let valid = data
                .get(i + 1..i + 3)
                .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
            if !valid {
                let end = (i + 3).min(data.len());
                return Err(RestError::BadPostData(format!(
                    "invalid URL escape \"{}\"",
                    String::from_utf8_lossy(&data[i..end])
                )));
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    Ok(())
}
