/// A request path split into address segments plus an optional format
/// extension taken from the last segment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tokens {
    pub segments: Vec<String>,
    pub extension: Option<String>,
}

/// Split a raw path into segments.
///
/// The last segment loses everything from its final `.` onward, which becomes
/// the extension candidate. One leading and one trailing empty segment are
/// dropped; empty segments in the middle are kept. Never fails.
pub fn tokenize(path: &str) -> Tokens {
    let mut segments: Vec<String> = path.trim().split('/').map(str::to_owned).collect();

    let mut extension = None;
    if let Some(last) = segments.last_mut() {
        if let Some(dot) = last.rfind('.') {
            extension = Some(last[dot + 1..].to_owned());
            last.truncate(dot);
        }
    }

    if segments.first().is_some_and(String::is_empty) {
        segments.remove(0);
    }
    if segments.last().is_some_and(String::is_empty) {
        segments.pop();
    }

    Tokens {
        segments,
        extension,
    }
}
