//! Document assembly: placeholder substitution over a loaded template.
//!
//! Styling tokens are filled from customizations first, then content tokens
//! are filled unconditionally. All tokens are `{{UPPER_SNAKE}}` and none is a
//! substring of another, so substitution order does not matter.

use crate::models::content::ResumeContent;
use crate::models::customization::Customizations;
use crate::render::sanitize::escape_latex;
use crate::render::sections::{
    render_certifications, render_education, render_experience, render_skills,
};

pub const NAME: &str = "{{NAME}}";
pub const EMAIL: &str = "{{EMAIL}}";
pub const PHONE: &str = "{{PHONE}}";
pub const LOCATION: &str = "{{LOCATION}}";
pub const SUMMARY: &str = "{{SUMMARY}}";
pub const EXPERIENCE_SECTION: &str = "{{EXPERIENCE_SECTION}}";
pub const EDUCATION_SECTION: &str = "{{EDUCATION_SECTION}}";
pub const SKILLS_SECTION: &str = "{{SKILLS_SECTION}}";
pub const CERTIFICATIONS_SECTION: &str = "{{CERTIFICATIONS_SECTION}}";
pub const PRIMARY_COLOR: &str = "{{PRIMARY_COLOR}}";
pub const FONT_FAMILY: &str = "{{FONT_FAMILY}}";

/// Builds the final compilable source.
pub fn assemble(
    template_source: &str,
    content: &ResumeContent,
    customizations: Option<&Customizations>,
) -> String {
    let mut source = template_source.to_string();
    if let Some(custom) = customizations {
        source = apply_customizations(&source, custom);
    }
    substitute(&source, &content_values(content))
}

/// Fills the styling tokens. A selector left unset keeps its token.
pub fn apply_customizations(source: &str, custom: &Customizations) -> String {
    let mut values = Vec::new();
    if let Some(color) = custom.color_scheme {
        values.push((PRIMARY_COLOR, color.as_str().to_string()));
    }
    if let Some(font) = custom.font_family {
        values.push((FONT_FAMILY, font.as_str().to_string()));
    }
    substitute(source, &values)
}

/// Sanitized replacement text for every content token.
fn content_values(content: &ResumeContent) -> Vec<(&'static str, String)> {
    let info = &content.personal_info;
    vec![
        (NAME, escape_latex(&info.name)),
        (EMAIL, escape_latex(&info.email)),
        (PHONE, escape_latex(&info.phone)),
        (LOCATION, escape_latex(&info.location)),
        (SUMMARY, escape_latex(&content.summary)),
        (EXPERIENCE_SECTION, render_experience(&content.experience)),
        (EDUCATION_SECTION, render_education(&content.education)),
        (SKILLS_SECTION, render_skills(&content.skills)),
        (
            CERTIFICATIONS_SECTION,
            render_certifications(&content.certifications),
        ),
    ]
}

fn substitute(source: &str, values: &[(&str, String)]) -> String {
    values
        .iter()
        .fold(source.to_string(), |acc, (token, value)| acc.replace(token, value))
}
