//! Plain text → single-page PDF export.
//!
//! The embedded font is the built-in Times-Roman, which only covers Latin-1, so text is
//! sanitized first: `•` becomes `"- "` and everything outside U+0000–U+00FF is dropped.
//! Lines are greedily word-wrapped at the page's text width; anything below the bottom
//! margin is cut.
//! Rendering is CPU-bound and runs inside `tokio::task::spawn_blocking`.

use printpdf::{BuiltinFont, Mm, PdfDocument, Pt};
use thiserror::Error;
use tracing::{debug, warn};

pub mod font_metrics;
pub mod handlers;

use font_metrics::{FontMetricTable, PageConfig, RESUME_PAGE, TIMES_ROMAN};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("Render task failed: {0}")]
    Task(String),
}

impl From<printpdf::Error> for RenderError {
    fn from(e: printpdf::Error) -> Self {
        RenderError::Pdf(e.to_string())
    }
}

/// Replaces bullets with a dash and strips characters the embedded font cannot draw.
pub fn sanitize_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{2022}' => out.push_str("- "),
            c if (c as u32) <= 0xFF => out.push(c),
            _ => {}
        }
    }
    out
}

/// Greedy word wrap. Explicit newlines start a new line; blank input lines are kept.
/// A line's leading indentation is kept on its first output line (tabs count as four
/// spaces). A single word wider than the line is split across lines.
pub fn wrap_lines(text: &str, metrics: &FontMetricTable, max_width_em: f32) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let paragraph = paragraph.trim_end_matches('\r');
        let indent: String = paragraph
            .chars()
            .take_while(|c| c.is_whitespace())
            .map(|c| if c == '\t' { "    " } else { " " })
            .collect();
        let indent_width = metrics.measure_str(&indent);

        let mut current = String::new();
        let mut current_width = 0.0_f32;
        let mut first_chunk = true;

        for word in paragraph.split_whitespace() {
            for chunk in split_long_word(word, metrics, max_width_em) {
                let chunk_w = metrics.measure_str(&chunk);
                if first_chunk {
                    first_chunk = false;
                    // Indentation is dropped when it would push the first word past the margin.
                    if indent_width + chunk_w <= max_width_em {
                        current = format!("{indent}{chunk}");
                        current_width = indent_width + chunk_w;
                    } else {
                        current = chunk;
                        current_width = chunk_w;
                    }
                } else if current_width + metrics.space_width + chunk_w > max_width_em {
                    lines.push(std::mem::take(&mut current));
                    current = chunk;
                    current_width = chunk_w;
                } else {
                    current.push(' ');
                    current.push_str(&chunk);
                    current_width += metrics.space_width + chunk_w;
                }
            }
        }
        lines.push(current);
    }

    lines
}

fn split_long_word(word: &str, metrics: &FontMetricTable, max_width_em: f32) -> Vec<String> {
    if metrics.measure_str(word) <= max_width_em {
        return vec![word.to_string()];
    }

    let mut chunks = Vec::new();
    let mut chunk = String::new();
    let mut width = 0.0_f32;
    for c in word.chars() {
        let w = metrics.char_width(c);
        if !chunk.is_empty() && width + w > max_width_em {
            chunks.push(std::mem::take(&mut chunk));
            width = 0.0;
        }
        chunk.push(c);
        width += w;
    }
    if !chunk.is_empty() {
        chunks.push(chunk);
    }
    chunks
}

/// Lays out `text` on one page and returns the PDF bytes.
pub fn render_text_pdf(text: &str, page: &PageConfig) -> Result<Vec<u8>, RenderError> {
    let safe = sanitize_text(text);
    let mut lines = wrap_lines(&safe, &TIMES_ROMAN, page.text_width_em());

    let max_lines = page.max_lines();
    if lines.len() > max_lines {
        warn!(
            "PDF text needs {} lines, page holds {max_lines}; truncating",
            lines.len()
        );
        lines.truncate(max_lines);
    }

    let (doc, page_index, layer_index) = PdfDocument::new(
        "Tailored Resume",
        Mm::from(Pt(page.width_pt)),
        Mm::from(Pt(page.height_pt)),
        "Layer 1",
    );
    let font = doc.add_builtin_font(BuiltinFont::TimesRoman)?;
    let layer = doc.get_page(page_index).get_layer(layer_index);

    let top_baseline = page.height_pt - page.margin_pt;
    for (i, line) in lines.iter().enumerate() {
        if line.is_empty() {
            continue;
        }
        let y = top_baseline - i as f32 * page.line_height_pt;
        layer.use_text(
            line.as_str(),
            page.font_size_pt,
            Mm::from(Pt(page.margin_pt)),
            Mm::from(Pt(y)),
            &font,
        );
    }

    let bytes = doc.save_to_bytes()?;
    debug!("Rendered {} line(s) into {} byte PDF", lines.len(), bytes.len());
    Ok(bytes)
}

/// Renders the resume page layout off the async executor.
pub async fn render_resume_pdf(text: String) -> Result<Vec<u8>, RenderError> {
    tokio::task::spawn_blocking(move || render_text_pdf(&text, &RESUME_PAGE))
        .await
        .map_err(|e| RenderError::Task(e.to_string()))?
}
