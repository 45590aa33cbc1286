use std::path::Path;

pub fn display_path(path: &Path, base: Option<&Path>) -> String {
    if let Some(base) = base {
        if let Ok(relative) = path.strip_prefix(base) {
            return relative.display().to_string();
        }
    }
    path.display().to_string()
}

/// Reduce free text to `[a-z0-9_-]` so it can be embedded in a file name.
pub fn file_name_component(text: &str) -> String {
    let mut component = String::with_capacity(text.len());
    for ch in text.trim().chars() {
        let ch = ch.to_ascii_lowercase();
        if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
            component.push(ch);
        } else if !component.ends_with('_') {
            component.push('_');
        }
    }
    let component = component.trim_matches('_');
    if component.is_empty() {
        "crop".to_string()
    } else {
        component.to_string()
    }
}
