//! PPTX extraction.
//!
//! Slides are read straight out of the OOXML container, in numeric slide
//! order. Each slide renders as a `<!-- Slide number: N -->` comment
//! followed by its shapes: title placeholders become `# ` headings,
//! pictures become placeholder image links, embedded tables go through the
//! shared HTML-to-Markdown renderer, and remaining text frames contribute
//! plain paragraphs. Speaker notes from the matching `notesSlideN.xml`
//! part are appended as a `### Notes:` section.

use std::fmt::Write as FmtWrite;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use roxmltree::{Document, Node};
use zip::ZipArchive;

use crate::Result;
use crate::error::DocsmithError;
use crate::extraction::escape_html;
use crate::extraction::html::render_markdown;

const P_NAMESPACE: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
const A_NAMESPACE: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const TABLE_GRAPHIC_URI: &str = "http://schemas.openxmlformats.org/drawingml/2006/table";

static SLIDE_PATH_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^ppt/slides/slide(\d+)\.xml$")
        .expect("slide path regex pattern is valid and should compile")
});
static NON_WORD_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\W").expect("non-word regex pattern is valid and should compile"));

/// Read a `.pptx` file and render all slides to Markdown.
pub fn extract_markdown(path: &Path) -> Result<String> {
    let mut container = PptxContainer::open(path)?;
    let slide_paths = container.slide_paths.clone();

    let mut markdown = String::new();
    for (index, slide_path) in slide_paths.iter().enumerate() {
        let slide_xml = container.read_file(slide_path)?;
        let _ = write!(markdown, "\n\n<!-- Slide number: {} -->\n", index + 1);
        render_slide(&slide_xml, &mut markdown)?;

        let notes_path = slide_path.replace("slides/slide", "notesSlides/notesSlide");
        if let Ok(notes_xml) = container.read_file(&notes_path)
            && let Ok(notes) = notes_text(&notes_xml)
            && !notes.trim().is_empty()
        {
            markdown.truncate(markdown.trim_end().len());
            markdown.push_str("\n\n### Notes:\n");
            markdown.push_str(notes.trim());
        }
    }

    Ok(markdown.trim().to_string())
}

struct PptxContainer {
    archive: ZipArchive<File>,
    slide_paths: Vec<String>,
}

impl PptxContainer {
    fn open(path: &Path) -> Result<Self> {
        // IO errors stay Io; only malformed archives become Parsing.
        let file = File::open(path)?;

        let mut archive = match ZipArchive::new(file) {
            Ok(archive) => archive,
            Err(zip::result::ZipError::Io(io_err)) => return Err(io_err.into()),
            Err(e) => {
                return Err(DocsmithError::parsing(format!(
                    "Failed to read PPTX archive (invalid format): {}",
                    e
                )));
            }
        };

        let slide_paths = Self::find_slide_paths(&mut archive);

        Ok(Self {
            archive,
            slide_paths,
        })
    }

    /// Slide part names sorted by slide index, so `slide10.xml` follows
    /// `slide9.xml` rather than `slide1.xml`.
    fn find_slide_paths(archive: &mut ZipArchive<File>) -> Vec<String> {
        let mut numbered: Vec<(u32, String)> = Vec::new();
        for i in 0..archive.len() {
            if let Ok(file) = archive.by_index(i)
                && let Some(captures) = SLIDE_PATH_REGEX.captures(file.name())
                && let Ok(number) = captures[1].parse::<u32>()
            {
                numbered.push((number, file.name().to_string()));
            }
        }
        numbered.sort_by_key(|(number, _)| *number);
        numbered.into_iter().map(|(_, name)| name).collect()
    }

    fn read_file(&mut self, path: &str) -> Result<Vec<u8>> {
        match self.archive.by_name(path) {
            Ok(mut file) => {
                let mut contents = Vec::new();
                file.read_to_end(&mut contents)?;
                Ok(contents)
            }
            Err(zip::result::ZipError::FileNotFound) => Err(DocsmithError::parsing(format!(
                "File not found in archive: {}",
                path
            ))),
            Err(zip::result::ZipError::Io(io_err)) => Err(io_err.into()),
            Err(e) => Err(DocsmithError::parsing(format!("Zip error: {}", e))),
        }
    }
}

fn render_slide(xml_data: &[u8], markdown: &mut String) -> Result<()> {
    let xml_str = std::str::from_utf8(xml_data)
        .map_err(|_| DocsmithError::parsing("Invalid UTF-8 in slide XML".to_string()))?;

    let doc = Document::parse(xml_str)
        .map_err(|e| DocsmithError::parsing(format!("Failed to parse slide XML: {}", e)))?;

    let sp_tree = doc
        .root_element()
        .descendants()
        .find(|n| n.has_tag_name((P_NAMESPACE, "spTree")))
        .ok_or_else(|| DocsmithError::parsing("No <p:spTree> tag found".to_string()))?;

    render_group(&sp_tree, markdown)
}

fn render_group(group: &Node, markdown: &mut String) -> Result<()> {
    for node in group.children().filter(|n| n.is_element()) {
        if node.tag_name().namespace() != Some(P_NAMESPACE) {
            continue;
        }
        match node.tag_name().name() {
            "sp" => render_shape(&node, markdown),
            "pic" => render_picture(&node, markdown),
            "graphicFrame" => render_graphic_frame(&node, markdown)?,
            "grpSp" => render_group(&node, markdown)?,
            _ => {}
        }
    }
    Ok(())
}

fn render_shape(sp_node: &Node, markdown: &mut String) {
    let Some(text) = shape_text(sp_node) else {
        return;
    };
    if text.trim().is_empty() {
        return;
    }

    if is_title_shape(sp_node) {
        markdown.push_str("# ");
        markdown.push_str(text.trim());
    } else {
        markdown.push_str(text.trim_end());
    }
    markdown.push('\n');
}

fn render_picture(pic_node: &Node, markdown: &mut String) {
    let c_nv_pr = pic_node
        .descendants()
        .find(|n| n.has_tag_name((P_NAMESPACE, "cNvPr")));

    let name = c_nv_pr
        .and_then(|n| n.attribute("name"))
        .unwrap_or("image");
    let alt_text = c_nv_pr.and_then(|n| n.attribute("descr")).unwrap_or("");

    // No image bytes are exported, so the link target is a placeholder
    // derived from the shape name.
    let label = if alt_text.is_empty() { name } else { alt_text };
    let filename = format!("{}.jpg", NON_WORD_REGEX.replace_all(name, ""));

    let _ = write!(markdown, "\n![{}]({})\n", label, filename);
}

fn render_graphic_frame(frame_node: &Node, markdown: &mut String) -> Result<()> {
    let table_node = frame_node
        .descendants()
        .find(|n| {
            n.has_tag_name((A_NAMESPACE, "graphicData"))
                && n.attribute("uri") == Some(TABLE_GRAPHIC_URI)
        })
        .and_then(|graphic_data| {
            graphic_data
                .children()
                .find(|n| n.has_tag_name((A_NAMESPACE, "tbl")))
        });

    let Some(tbl_node) = table_node else {
        return Ok(());
    };

    let mut html = String::from("<html><body><table>");
    let mut first_row = true;
    for tr_node in tbl_node
        .children()
        .filter(|n| n.has_tag_name((A_NAMESPACE, "tr")))
    {
        let cell_tag = if first_row { "th" } else { "td" };
        html.push_str("<tr>");
        for tc_node in tr_node
            .children()
            .filter(|n| n.has_tag_name((A_NAMESPACE, "tc")))
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
    html.push_str("</table></body></html>");

    let table_markdown = render_markdown(&html)?;
    let _ = write!(markdown, "\n{}\n", table_markdown.trim());
    Ok(())
}

fn shape_text(sp_node: &Node) -> Option<String> {
    let tx_body = sp_node
        .children()
        .find(|n| n.has_tag_name((P_NAMESPACE, "txBody")))?;

    let mut paragraphs = Vec::new();
    for p_node in tx_body
        .children()
        .filter(|n| n.has_tag_name((A_NAMESPACE, "p")))
    {
        paragraphs.push(paragraph_text(&p_node));
    }
    Some(paragraphs.join("\n"))
}

fn paragraph_text(p_node: &Node) -> String {
    let mut text = String::new();
    for node in p_node.descendants() {
        if node.has_tag_name((A_NAMESPACE, "t")) {
            if let Some(t) = node.text() {
                text.push_str(t);
            }
        } else if node.has_tag_name((A_NAMESPACE, "br")) {
            text.push('\n');
        }
    }
    text
}

fn is_title_shape(sp_node: &Node) -> bool {
    sp_node
        .descendants()
        .find(|n| n.has_tag_name((P_NAMESPACE, "ph")))
        .and_then(|ph| ph.attribute("type"))
        .is_some_and(|kind| kind == "title" || kind == "ctrTitle")
}

fn cell_text(tc_node: &Node) -> String {
    let mut parts = Vec::new();
    for node in tc_node.descendants() {
        if node.has_tag_name((A_NAMESPACE, "t"))
            && let Some(text) = node.text()
        {
            parts.push(text);
        }
    }
    parts.join(" ")
}

fn notes_text(notes_xml: &[u8]) -> Result<String> {
    let xml_str = std::str::from_utf8(notes_xml)
        .map_err(|e| DocsmithError::parsing(format!("Invalid UTF-8 in notes XML: {}", e)))?;

    let doc = Document::parse(xml_str)
        .map_err(|e| DocsmithError::parsing(format!("Failed to parse notes XML: {}", e)))?;

    let mut parts = Vec::new();
    for node in doc.descendants() {
        if node.has_tag_name((A_NAMESPACE, "t"))
            && let Some(text) = node.text()
        {
            parts.push(text);
        }
    }

    Ok(parts.join(" "))
}
