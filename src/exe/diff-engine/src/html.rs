use crate::{DiffKind, DiffOperation};

pub const INSERT_STYLE: &str = "background:#e6ffe6;";
pub const DELETE_STYLE: &str = "background:#ffe6e6;";

/// Escape text for inclusion in HTML element content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Equalities are plain `<span>`s, insertions `<ins>` and deletions `<del>`,
/// each line break shown as a pilcrow followed by `<br>`.
pub fn pretty_html(ops: &[DiffOperation]) -> String {
    let mut html = String::new();
    for op in ops {
        let text = escape_html(&op.text).replace('\n', "&para;<br>");
        match op.kind {
            DiffKind::Insert => {
                html.push_str(&format!("<ins style=\"{INSERT_STYLE}\">{text}</ins>"));
            }
            DiffKind::Delete => {
                html.push_str(&format!("<del style=\"{DELETE_STYLE}\">{text}</del>"));
            }
            DiffKind::Equal => {
                html.push_str(&format!("<span>{text}</span>"));
            }
        }
    }
    html
}
