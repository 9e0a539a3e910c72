//! DOCX extraction.
//!
//! Reads `word/document.xml` out of the OOXML container and rebuilds it as
//! an intermediate HTML document: paragraph styles `Heading1`..`Heading6`
//! and `Title` become heading tags, tables become `<table>` markup with the
//! first row as header cells, and everything else becomes `<p>` paragraphs.
//! The result is finished by the shared Markdown renderer, so formatting
//! quirks are handled in exactly one place.

use std::io::Read;
use std::path::Path;

use roxmltree::{Document, Node};
use zip::ZipArchive;

use crate::Result;
use crate::error::DocsmithError;
use crate::extraction::escape_html;

const W_NAMESPACE: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Read a `.docx` file and produce its intermediate HTML document.
pub fn extract_html(path: &Path) -> Result<String> {
    // IO errors stay Io; only malformed archives become Parsing.
    let file = std::fs::File::open(path)?;

    let mut archive = match ZipArchive::new(file) {
        Ok(archive) => archive,
        Err(zip::result::ZipError::Io(io_err)) => return Err(io_err.into()),
        Err(e) => {
            return Err(DocsmithError::parsing(format!(
                "Failed to open DOCX archive: {}",
                e
            )));
        }
    };

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| DocsmithError::parsing(format!("DOCX is missing word/document.xml: {}", e)))?
        .read_to_string(&mut xml)
        .map_err(|e| {
            DocsmithError::parsing(format!("Invalid UTF-8 in DOCX document XML: {}", e))
        })?;

    document_to_html(&xml)
}

fn document_to_html(xml: &str) -> Result<String> {
    let doc = Document::parse(xml)
        .map_err(|e| DocsmithError::parsing(format!("Failed to parse DOCX document XML: {}", e)))?;

    let body = doc
        .root_element()
        .children()
        .find(|n| n.has_tag_name((W_NAMESPACE, "body")))
        .ok_or_else(|| DocsmithError::parsing("No <w:body> tag found".to_string()))?;

    let mut html = String::from("<html><body>");
    for node in body.children().filter(|n| n.is_element()) {
        if node.has_tag_name((W_NAMESPACE, "p")) {
            render_paragraph(&node, &mut html);
        } else if node.has_tag_name((W_NAMESPACE, "tbl")) {
            render_table(&node, &mut html);
        }
    }
    html.push_str("</body></html>");

    Ok(html)
}

fn render_paragraph(p_node: &Node, html: &mut String) {
    let inner = paragraph_inner_html(p_node);
    if inner.trim().is_empty() {
        return;
    }

    let tag = heading_tag(p_node).unwrap_or("p");
    html.push('<');
    html.push_str(tag);
    html.push('>');
    html.push_str(&inner);
    html.push_str("</");
    html.push_str(tag);
    html.push('>');
}

/// Inline content of a paragraph: run text, explicit line breaks, and tabs,
/// in document order.
fn paragraph_inner_html(p_node: &Node) -> String {
    let mut inner = String::new();
    for node in p_node.descendants() {
        if node.has_tag_name((W_NAMESPACE, "t")) {
            if let Some(text) = node.text() {
                inner.push_str(&escape_html(text));
            }
        } else if node.has_tag_name((W_NAMESPACE, "br")) {
            inner.push_str("<br/>");
        } else if node.has_tag_name((W_NAMESPACE, "tab")) {
            inner.push('\t');
        }
    }
    inner
}

fn heading_tag(p_node: &Node) -> Option<&'static str> {
    let style = p_node
        .children()
        .find(|n| n.has_tag_name((W_NAMESPACE, "pPr")))?
        .children()
        .find(|n| n.has_tag_name((W_NAMESPACE, "pStyle")))?
        .attribute((W_NAMESPACE, "val"))?;

    match style {
        "Title" | "Heading1" => Some("h1"),
        "Heading2" => Some("h2"),
        "Heading3" => Some("h3"),
        "Heading4" => Some("h4"),
        "Heading5" => Some("h5"),
        "Heading6" => Some("h6"),
        _ => None,
    }
}

fn render_table(tbl_node: &Node, html: &mut String) {
    html.push_str("<table>");
    let mut first_row = true;
    for tr_node in tbl_node
        .children()
        .filter(|n| n.has_tag_name((W_NAMESPACE, "tr")))
    {
        let cell_tag = if first_row { "th" } else { "td" };
        html.push_str("<tr>");
        for tc_node in tr_node
            .children()
            .filter(|n| n.has_tag_name((W_NAMESPACE, "tc")))
        {
            html.push('<');
            html.push_str(cell_tag);
            html.push('>');
            html.push_str(&escape_html(&cell_text(&tc_node)));
            html.push_str("</");
            html.push_str(cell_tag);
            html.push('>');
        }
        html.push_str("</tr>");
        first_row = false;
    }
    html.push_str("</table>");
}

fn cell_text(tc_node: &Node) -> String {
    let mut parts = Vec::new();
    for node in tc_node.descendants() {
        if node.has_tag_name((W_NAMESPACE, "t"))
            && let Some(text) = node.text()
        {
            parts.push(text);
        }
    }
    parts.join(" ")
}
