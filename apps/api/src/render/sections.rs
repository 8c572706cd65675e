//! Section renderers: one LaTeX fragment per content category.
//!
//! Each renderer sanitizes every field it emits and returns an empty string
//! for an empty section. Entry order is kept exactly as given.

use crate::models::content::{Certification, Education, Experience};
use crate::render::sanitize::escape_latex;

/// `\experienceitem{title}{company}{duration}` per role, followed by an
/// itemize block when the role has bullets, then a blank separator line.
pub fn render_experience(entries: &[Experience]) -> String {
    if entries.is_empty() {
        return String::new();
    }

    let mut lines = Vec::new();
    for exp in entries {
        lines.push(format!(
            "\\experienceitem{{{}}}{{{}}}{{{}}}",
            escape_latex(&exp.title),
            escape_latex(&exp.company),
            escape_latex(&exp.duration)
        ));

        if !exp.bullets.is_empty() {
            lines.push("\\begin{itemize}".to_string());
            for bullet in &exp.bullets {
                lines.push(format!("    \\item {}", escape_latex(bullet)));
            }
            lines.push("\\end{itemize}".to_string());
        }

        lines.push(String::new());
    }

    lines.join("\n")
}

pub fn render_education(entries: &[Education]) -> String {
    entries
        .iter()
        .map(|edu| {
            format!(
                "\\educationitem{{{}}}{{{}}}{{{}}}",
                escape_latex(&edu.degree),
                escape_latex(&edu.school),
                escape_latex(&edu.year)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_skills(skills: &[String]) -> String {
    skills
        .iter()
        .map(|s| escape_latex(s))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn render_certifications(certs: &[Certification]) -> String {
    certs
        .iter()
        .map(|cert| match cert {
            Certification::Simple(text) => format!("\\item {}", escape_latex(text)),
            Certification::Detailed { name, issuer, date } => format!(
                "\\certificationitem{{{}}}{{{}}}{{{}}}",
                escape_latex(name),
                escape_latex(issuer),
                escape_latex(date)
            ),
        })
        .collect::<Vec<_>>()
        .join("\n")
}
