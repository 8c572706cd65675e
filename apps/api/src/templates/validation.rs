use tracing::{debug, warn};

const REQUIRED_ELEMENTS: &[&str] = &["\\documentclass", "\\begin{document}", "\\end{document}"];

/// Structural check run on every template before it is cached.
///
/// Returns the reason for rejection. Declared variables that do not appear as
/// `{{VAR}}` are only logged.
pub fn validate_template_source(source: &str, declared_variables: &[String]) -> Result<(), String> {
    for element in REQUIRED_ELEMENTS {
        if !source.contains(element) {
            return Err(format!("Template missing required element: {element}"));
        }
    }

    for var in declared_variables {
        if !source.contains(&format!("{{{{{var}}}}}")) {
            warn!("Declared variable {var} not found in template");
        }
    }

    let open = source.matches('{').count();
    let close = source.matches('}').count();
    if open != close {
        return Err(format!("Mismatched braces: {open} open, {close} close"));
    }

    debug!("Template validation passed");
    Ok(())
}
