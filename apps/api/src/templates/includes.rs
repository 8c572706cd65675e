use std::path::{Component, Path};

use tracing::{debug, warn};

const INCLUDE_MARKER: &str = "%INCLUDE:";

/// Splices `%INCLUDE:<file>` directives with the named file from `styles_dir`.
///
/// Only bare file names are honored; a name with directory components is
/// treated like an unreadable fragment.
///
/// The directive line is replaced by the fragment wrapped in marker comments.
/// A fragment that cannot be read leaves its directive line in place and
/// logs a warning. Every other line is kept verbatim.
pub fn splice_style_includes(source: &str, styles_dir: &Path) -> String {
    if !styles_dir.is_dir() {
        return source.to_string();
    }

    let mut lines: Vec<String> = Vec::new();
    for line in source.split('\n') {
        let Some(file) = line.trim().strip_prefix(INCLUDE_MARKER) else {
            lines.push(line.to_string());
            continue;
        };
        let file = file.trim();

        let mut components = Path::new(file).components();
        let plain_name = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        if !plain_name {
            warn!("Style include {file:?} is not a file name inside styles/; skipped");
            lines.push(line.to_string());
            continue;
        }

        match std::fs::read_to_string(styles_dir.join(file)) {
            Ok(fragment) => {
                debug!("Included style file: {file}");
                lines.push(format!("% Included from {file}"));
                lines.push(fragment);
                lines.push(format!("% End include {file}"));
            }
            Err(e) => {
                warn!("Style file {file} could not be included: {e}");
                lines.push(line.to_string());
            }
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splices_fragment_between_markers() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("colors.tex"), "\\definecolor{accent}{HTML}{1F4E79}").unwrap();

        let out = splice_style_includes("before\n  %INCLUDE: colors.tex\nafter", dir.path());
        assert_eq!(
            out,
            "before\n% Included from colors.tex\n\\definecolor{accent}{HTML}{1F4E79}\n% End include colors.tex\nafter"
        );
    }

    #[test]
    fn test_missing_fragment_leaves_directive() {
        let dir = tempfile::tempdir().unwrap();
        let source = "before\n%INCLUDE:missing.tex\nafter";
        assert_eq!(splice_style_includes(source, dir.path()), source);
    }

    #[test]
    fn test_no_styles_dir_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let source = "%INCLUDE:colors.tex";
        assert_eq!(
            splice_style_includes(source, &dir.path().join("styles")),
            source
        );
    }

    #[test]
    fn test_rejects_paths_outside_styles_dir() {
        let root = tempfile::tempdir().unwrap();
        let styles = root.path().join("styles");
        std::fs::create_dir_all(&styles).unwrap();
        std::fs::write(root.path().join("secret.tex"), "SECRET").unwrap();
        std::fs::write(styles.join("ok.tex"), "OK").unwrap();

        for directive in [
            "%INCLUDE: ../secret.tex",
            "%INCLUDE:sub/ok.tex",
            "%INCLUDE:/etc/hostname",
        ] {
            assert_eq!(splice_style_includes(directive, &styles), directive);
        }
        assert!(splice_style_includes("%INCLUDE: ok.tex", &styles).contains("OK"));
    }

    #[test]
    fn test_marker_must_start_the_line() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.tex"), "X").unwrap();
        let source = "text %INCLUDE:a.tex";
        assert_eq!(splice_style_includes(source, dir.path()), source);
    }
}
