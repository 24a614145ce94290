//! Render a markdown file to HTML

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::markdown;

pub fn run<P: AsRef<Path>>(path: P) -> Result<String> {
    let source = fs::read_to_string(path.as_ref())?;
    Ok(markdown::render(&source))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("about.md");
        fs::write(&path, "# About\n\nHello *there*").unwrap();
        assert_eq!(
            run(&path).unwrap(),
            "<h1>About</h1>\n<p>Hello <em>there</em></p>"
        );
    }

    #[test]
    fn test_missing_file() {
        assert!(run("/definitely/not/here.md").is_err());
    }
}
