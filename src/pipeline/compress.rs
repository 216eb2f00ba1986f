//! Lossy reduction of Python sources to their declarations.
//!
//! Pattern based, not a parser: output feeds a summarizer that tolerates
//! partial information.

use once_cell::sync::Lazy;
use regex::Regex;

/// Extension of the one source language that gets compressed.
pub const COMPRESSED_EXTENSION: &str = ".py";

/// Maximum number of docstrings kept.
pub const MAX_DOCSTRINGS: usize = 3;

static IMPORT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^(?:from\s+\S+\s+import\s+\S+|import\s+\S+)").expect("valid import regex")
});
static CLASS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"class\s+\w+(?:\([^)]*\))?:").expect("valid class regex"));
static FUNCTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"def\s+\w+\s*\([^)]*\):").expect("valid function regex"));
static DOCSTRING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?s)"""(.*?)""""#).expect("valid docstring regex"));

/// Reduces Python source to labeled sections of imports, class headers,
/// function headers and the first [`MAX_DOCSTRINGS`] docstrings.
///
/// Sections keep that fixed order, are separated by a blank line, and are
/// omitted entirely when nothing of their kind was found.
#[must_use]
pub fn compress_python(code: &str) -> String {
    let imports: Vec<&str> = IMPORT_RE.find_iter(code).map(|m| m.as_str()).collect();
    let classes: Vec<&str> = CLASS_RE.find_iter(code).map(|m| m.as_str()).collect();
    let functions: Vec<&str> = FUNCTION_RE.find_iter(code).map(|m| m.as_str()).collect();
    let docstrings: Vec<&str> = DOCSTRING_RE
        .captures_iter(code)
        .take(MAX_DOCSTRINGS)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect();

    [("IMPORTS", imports), ("CLASSES", classes), ("FUNCTIONS", functions), ("DOCSTRINGS", docstrings)]
        .into_iter()
        .filter(|(_, items)| !items.is_empty())
        .map(|(label, items)| format!("### {label}:\n{}", items.join("\n")))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Applies [`compress_python`] when `path` has the compressed extension;
/// returns the content unchanged otherwise.
#[must_use]
pub fn compress_for_path(path: &str, content: String) -> String {
    let name = path.rsplit('/').next().unwrap_or(path);
    if super::filter::extension(name).as_deref() == Some(COMPRESSED_EXTENSION) {
        compress_python(&content)
    } else {
        content
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
"""Module docstring."""
import os
from typing import List

class Loader(Base):
    """Loads things."""

    def load(self, path):
        """Read a file."""
        return open(path).read()

def main():
    """Entry point."""
    Loader().load("x")
"#;

    #[test]
    fn sections_appear_in_fixed_order() {
        let out = compress_python(SAMPLE);
        let imports = out.find("### IMPORTS:").unwrap();
        let classes = out.find("### CLASSES:").unwrap();
        let functions = out.find("### FUNCTIONS:").unwrap();
        let docs = out.find("### DOCSTRINGS:").unwrap();
        assert!(imports < classes && classes < functions && functions < docs);
        assert!(out.contains("import os\nfrom typing import List"));
        assert!(out.contains("class Loader(Base):"));
        assert!(out.contains("def load(self, path):\ndef main():"));
        assert!(!out.contains("return open"));
    }

    #[test]
    fn keeps_at_most_three_docstrings() {
        let out = compress_python(SAMPLE);
        let docs = out.split("### DOCSTRINGS:\n").nth(1).unwrap();
        assert_eq!(docs, "Module docstring.\nLoads things.\nRead a file.");
        assert!(!out.contains("Entry point."));
    }

    #[test]
    fn empty_sections_are_omitted() {
        let out = compress_python("def run(x):\n    return x\n");
        assert_eq!(out, "### FUNCTIONS:\ndef run(x):");
        assert!(!out.contains("IMPORTS"));
        assert!(!out.contains("CLASSES"));
        assert!(!out.contains("DOCSTRINGS"));
    }

    #[test]
    fn no_declarations_compresses_to_empty() {
        assert_eq!(compress_python("x = 1\nprint(x)\n"), "");
    }

    #[test]
    fn indented_imports_are_not_collected() {
        let out = compress_python("def f():\n    import json\n");
        assert!(!out.contains("IMPORTS"));
    }

    #[test]
    fn multiline_docstring_is_kept_whole() {
        let out = compress_python("\"\"\"line one\nline two\"\"\"\n");
        assert_eq!(out, "### DOCSTRINGS:\nline one\nline two");
    }

    #[test]
    fn only_python_paths_are_compressed() {
        let js = "import x from 'y';\nfunction f() {}".to_string();
        assert_eq!(compress_for_path("web/app.js", js.clone()), js);
        assert_eq!(compress_for_path("pkg/mod.py", "import os\n".into()), "### IMPORTS:\nimport os");
    }
}
