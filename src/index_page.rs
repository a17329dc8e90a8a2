//! Static HTML index of a zets tree.

use crate::tree::DirectoryNode;
use anyhow::anyhow;
use log::info;
use std::fmt::Write as _;
use std::path::Path;

const STYLE: &str = "body{font-family:sans-serif;max-width:48rem;margin:2rem auto;}\
ul{list-style:none;padding-left:1.2rem;}\
.dir{font-weight:bold;}";

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Renders `tree` as a self-contained page with links relative to its root.
pub fn render(tree: &DirectoryNode) -> String {
    let title = escape(&tree.name());
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(html, "<title>{}</title>", title);
    let _ = writeln!(html, "<style>{}</style>", STYLE);
    html.push_str("</head>\n<body>\n");
    let _ = writeln!(html, "<h1>{}</h1>", title);
    render_children(tree, &tree.path, &mut html);
    html.push_str("</body>\n</html>\n");
    html
}

fn render_children(node: &DirectoryNode, root: &Path, html: &mut String) {
    if node.dirs.is_empty() && node.files.is_empty() {
        return;
    }
    html.push_str("<ul>\n");
    for dir in &node.dirs {
        let _ = writeln!(html, "<li><span class=\"dir\">{}/</span>", escape(&dir.name()));
        render_children(dir, root, html);
        html.push_str("</li>\n");
    }
    for file in &node.files {
        let href = file
            .path
            .strip_prefix(root)
            .unwrap_or(&file.path)
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");
        let _ = writeln!(
            html,
            "<li><a href=\"{}\">{}</a></li>",
            escape(&href),
            escape(&file.name)
        );
    }
    html.push_str("</ul>\n");
}

/// Renders `tree` and writes it to `output`.
pub fn write(tree: &DirectoryNode, output: &Path) -> anyhow::Result<()> {
    std::fs::write(output, render(tree))
        .map_err(|e| anyhow!("Failed to write index page {}: {}", output.display(), e))?;
    info!("Wrote index page {}", output.display());
    Ok(())
}
