use anyhow::anyhow;
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::process::Command;
use zets::WalkOptions;

/// Name of the file created inside every new note directory.
pub const NOTE_FILE: &str = "README.md";

fn validate_component(kind: &str, value: &str, options: &WalkOptions) -> anyhow::Result<()> {
    if value.trim().is_empty() {
        return Err(anyhow!("The {} name cannot be empty.", kind));
    }
    if value.contains('/') || value.contains('\\') {
        return Err(anyhow!(
            "The {} name '{}' must be a single directory name.",
            kind,
            value
        ));
    }
    if !options.is_visible(value) {
        return Err(anyhow!(
            "The {} name '{}' is hidden or excluded, so the note would never be searched.",
            kind,
            value
        ));
    }
    Ok(())
}

/// Creates `root/topic/year/note/README.md` and returns the note file path.
///
/// Names that a walk with `options` would skip are rejected. An existing note
/// file is left untouched.
pub fn create_note(
    root: &Path,
    topic: &str,
    note: &str,
    year: i32,
    options: &WalkOptions,
) -> anyhow::Result<PathBuf> {
    validate_component("topic", topic, options)?;
    validate_component("note", note, options)?;

    let dir = root.join(topic).join(year.to_string()).join(note);
    std::fs::create_dir_all(&dir)
        .map_err(|e| anyhow!("Failed to create {}: {}", dir.display(), e))?;

    let file = dir.join(NOTE_FILE);
    if file.exists() {
        debug!("{} already exists, leaving it as is", file.display());
    } else {
        std::fs::File::create(&file)
            .map_err(|e| anyhow!("Failed to create {}: {}", file.display(), e))?;
        info!("Created {}", file.display());
    }
    Ok(file)
}

/// Runs `editor` on `path` with the terminal attached.
///
/// `editor` may carry arguments, e.g. `code --wait`.
pub fn open_in_editor(editor: &str, path: &Path) -> anyhow::Result<()> {
    let mut parts = editor.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| anyhow!("No editor configured."))?;
    let status = Command::new(program)
        .args(parts)
        .arg(path)
        .status()
        .map_err(|e| anyhow!("Failed to launch editor '{}': {}", program, e))?;
    if !status.success() {
        return Err(anyhow!("Editor '{}' exited with {}", program, status));
    }
    Ok(())
}

/// Clones the zets repository at `url` into `root` and records the URL in
/// `root/url`.
pub fn clone_repository(url: &str, root: &Path) -> anyhow::Result<()> {
    if root.exists() {
        return Err(anyhow!(
            "{} already exists. Remove it or pass a different --root.",
            root.display()
        ));
    }
    info!("Cloning {} into {}", url, root.display());
    let status = Command::new("git")
        .arg("clone")
        .arg(url)
        .arg(root)
        .status()
        .map_err(|e| anyhow!("Failed to run git: {}", e))?;
    if !status.success() {
        return Err(anyhow!("git clone {} exited with {}", url, status));
    }

    let url_file = root.join("url");
    std::fs::write(&url_file, url)
        .map_err(|e| anyhow!("Failed to write {}: {}", url_file.display(), e))?;
    Ok(())
}
