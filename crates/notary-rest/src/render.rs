//! Rendering of resolved objects and errors in the negotiated format.

use std::fmt::Write as _;

use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use notary_types::{Block, Entry};
use quick_xml::escape::escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::accept::Format;
use crate::error::{ErrorBody, RestError, RestResult};
use crate::resolve::Resolved;

/// A response body ready to send.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rendered {
    pub status: StatusCode,
    pub content_type: &'static str,
    pub body: String,
}

impl IntoResponse for Rendered {
    fn into_response(self) -> Response {
        (self.status, [(CONTENT_TYPE, self.content_type)], self.body).into_response()
    }
}

/// Render a resolved object. `Unmatched` renders as an empty 404.
pub fn render(resolved: &Resolved<'_>, format: &Format) -> RestResult<Rendered> {
    let body = match format {
        Format::Json => json(resolved)?,
        Format::Xml => xml(resolved)?,
        Format::Html => html(resolved),
        Format::Text => text(resolved),
        Format::Custom(token) => {
            return Err(RestError::NotAcceptable {
                media_type: token.clone(),
            })
        }
    };
    let status = if resolved.is_unmatched() {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::OK
    };
    Ok(Rendered {
        status,
        content_type: format.content_type(),
        body,
    })
}

/// Render an error. Formats without an error representation fall back to
/// JSON.
pub fn render_error(err: &RestError, format: &Format) -> Rendered {
    let body = ErrorBody::from(err);
    let rendered = match format {
        Format::Xml => xml_error(&body).ok().map(|b| (Format::Xml, b)),
        Format::Html => Some((Format::Html, html_error(&body))),
        Format::Text => Some((Format::Text, format!("{}: {}\n", body.kind, body.error))),
        Format::Json | Format::Custom(_) => None,
    };
    let (format, body) = rendered.unwrap_or_else(|| (Format::Json, json_error(&body)));
    Rendered {
        status: err.status_code(),
        content_type: format.content_type(),
        body,
    }
}

fn json(resolved: &Resolved<'_>) -> RestResult<String> {
    let rendered = match resolved {
        Resolved::Blocks(blocks) => serde_json::to_string_pretty(blocks),
        Resolved::Block(block) => serde_json::to_string_pretty(block),
        Resolved::Entries(entries) => serde_json::to_string_pretty(entries),
        Resolved::Entry(entry) => serde_json::to_string_pretty(entry),
        Resolved::Unmatched => Ok("null".to_owned()),
    };
    rendered.map_err(|e| RestError::Render(e.to_string()))
}

fn json_error(body: &ErrorBody) -> String {
    serde_json::json!({
        "error": body.error,
        "kind": body.kind,
        "status": body.status,
    })
    .to_string()
}

fn xml_err(e: impl std::fmt::Display) -> RestError {
    RestError::Render(format!("xml: {e}"))
}

fn xml(resolved: &Resolved<'_>) -> RestResult<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml_err)?;

    match resolved {
        Resolved::Blocks(blocks) => {
            writer.write_event(Event::Start(BytesStart::new("blocks"))).map_err(xml_err)?;
            for block in blocks.iter() {
                xml_block(&mut writer, block)?;
            }
            writer.write_event(Event::End(BytesEnd::new("blocks"))).map_err(xml_err)?;
        }
        Resolved::Block(block) => xml_block(&mut writer, block)?,
        Resolved::Entries(entries) => xml_entries(&mut writer, entries)?,
        Resolved::Entry(entry) => xml_entry(&mut writer, None, entry)?,
        Resolved::Unmatched => {
            writer.write_event(Event::Empty(BytesStart::new("none"))).map_err(xml_err)?;
        }
    }

    String::from_utf8(writer.into_inner()).map_err(xml_err)
}

fn xml_block(writer: &mut Writer<Vec<u8>>, block: &Block) -> RestResult<()> {
    let id = block.block_id.to_string();
    let mut start = BytesStart::new("block");
    start.push_attribute(("id", id.as_str()));
    writer.write_event(Event::Start(start)).map_err(xml_err)?;
    xml_entries(writer, &block.entries)?;
    writer.write_event(Event::End(BytesEnd::new("block"))).map_err(xml_err)?;
    Ok(())
}

fn xml_entries(writer: &mut Writer<Vec<u8>>, entries: &[Entry]) -> RestResult<()> {
    writer.write_event(Event::Start(BytesStart::new("entries"))).map_err(xml_err)?;
    for (index, entry) in entries.iter().enumerate() {
        xml_entry(writer, Some(index), entry)?;
    }
    writer.write_event(Event::End(BytesEnd::new("entries"))).map_err(xml_err)?;
    Ok(())
}

fn xml_entry(writer: &mut Writer<Vec<u8>>, index: Option<usize>, entry: &Entry) -> RestResult<()> {
    let index = index.map(|i| i.to_string());
    let mut start = BytesStart::new("entry");
    if let Some(index) = &index {
        start.push_attribute(("index", index.as_str()));
    }
    writer.write_event(Event::Start(start)).map_err(xml_err)?;
    xml_text(writer, "type", &entry.entry_type.to_string())?;
    xml_text(writer, "value", &entry.value.to_string())?;
    xml_text(writer, "data", &hex::encode(&entry.data))?;
    writer.write_event(Event::End(BytesEnd::new("entry"))).map_err(xml_err)?;
    Ok(())
}

fn xml_text(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> RestResult<()> {
    writer.write_event(Event::Start(BytesStart::new(name))).map_err(xml_err)?;
    writer.write_event(Event::Text(BytesText::new(text))).map_err(xml_err)?;
    writer.write_event(Event::End(BytesEnd::new(name))).map_err(xml_err)?;
    Ok(())
}

fn xml_error(body: &ErrorBody) -> RestResult<String> {
    let mut writer = Writer::new(Vec::new());
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml_err)?;
    let status = body.status.to_string();
    let mut start = BytesStart::new("error");
    start.push_attribute(("kind", body.kind));
    start.push_attribute(("status", status.as_str()));
    writer.write_event(Event::Start(start)).map_err(xml_err)?;
    writer.write_event(Event::Text(BytesText::new(&body.error))).map_err(xml_err)?;
    writer.write_event(Event::End(BytesEnd::new("error"))).map_err(xml_err)?;
    String::from_utf8(writer.into_inner()).map_err(xml_err)
}

fn html_page(title: &str, content: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n\
         <body>\n<h1>{title}</h1>\n{content}</body>\n</html>\n",
        title = escape(title),
    )
}

fn html_entries_table(entries: &[Entry]) -> String {
    let mut out = String::from("<table>\n<tr><th>Index</th><th>Type</th><th>Value</th><th>Data</th></tr>\n");
    for (index, entry) in entries.iter().enumerate() {
        let _ = writeln!(
            out,
            "<tr><td>{index}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            entry.entry_type,
            entry.value,
            hex::encode(&entry.data)
        );
    }
    out.push_str("</table>\n");
    out
}

fn html(resolved: &Resolved<'_>) -> String {
    match resolved {
        Resolved::Blocks(blocks) => {
            let mut table = String::from("<table>\n<tr><th>Block</th><th>Entries</th></tr>\n");
            for block in blocks.iter() {
                let _ = writeln!(
                    table,
                    "<tr><td>{}</td><td>{}</td></tr>",
                    block.block_id,
                    block.entries.len()
                );
            }
            table.push_str("</table>\n");
            html_page("Blocks", &table)
        }
        Resolved::Block(block) => html_page(
            &format!("Block {}", block.block_id),
            &html_entries_table(&block.entries),
        ),
        Resolved::Entries(entries) => html_page("Entries", &html_entries_table(entries)),
        Resolved::Entry(entry) => html_page(
            "Entry",
            &format!(
                "<dl>\n<dt>Type</dt><dd>{}</dd>\n<dt>Value</dt><dd>{}</dd>\n<dt>Data</dt><dd>{}</dd>\n</dl>\n",
                entry.entry_type,
                entry.value,
                hex::encode(&entry.data)
            ),
        ),
        Resolved::Unmatched => html_page("Not Found", ""),
    }
}

fn html_error(body: &ErrorBody) -> String {
    html_page(
        &format!("{} {}", body.status, body.kind),
        &format!("<p>{}</p>\n", escape(body.error.as_str())),
    )
}

fn text_entry(out: &mut String, prefix: &str, entry: &Entry) {
    let _ = writeln!(
        out,
        "{prefix}type={} value={} data={}",
        entry.entry_type,
        entry.value,
        hex::encode(&entry.data)
    );
}

fn text(resolved: &Resolved<'_>) -> String {
    let mut out = String::new();
    match resolved {
        Resolved::Blocks(blocks) => {
            for block in blocks.iter() {
                let _ = writeln!(out, "block {} ({} entries)", block.block_id, block.entries.len());
            }
        }
        Resolved::Block(block) => {
            let _ = writeln!(out, "block {}", block.block_id);
            for (index, entry) in block.entries.iter().enumerate() {
                text_entry(&mut out, &format!("  [{index}] "), entry);
            }
        }
        Resolved::Entries(entries) => {
            for (index, entry) in entries.iter().enumerate() {
                text_entry(&mut out, &format!("[{index}] "), entry);
            }
        }
        Resolved::Entry(entry) => text_entry(&mut out, "", entry),
        Resolved::Unmatched => {}
    }
    out
}
