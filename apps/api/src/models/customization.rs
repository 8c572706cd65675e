use serde::{Deserialize, Serialize};

/// Optional styling overrides applied before content substitution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Customizations {
    pub color_scheme: Option<ColorScheme>,
    pub font_family: Option<FontFamily>,
    pub sections: Option<Vec<SectionName>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    Blue,
    Green,
    Red,
    Purple,
    Orange,
    Gray,
    Black,
}

impl ColorScheme {
    pub const ALLOWED: &'static [&'static str] =
        &["blue", "green", "red", "purple", "orange", "gray", "black"];

    /// The color name as written into the template (an xcolor name).
    pub fn as_str(self) -> &'static str {
        match self {
            ColorScheme::Blue => "blue",
            ColorScheme::Green => "green",
            ColorScheme::Red => "red",
            ColorScheme::Purple => "purple",
            ColorScheme::Orange => "orange",
            ColorScheme::Gray => "gray",
            ColorScheme::Black => "black",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontFamily {
    Arial,
    Helvetica,
    #[serde(rename = "Times New Roman")]
    TimesNewRoman,
    Calibri,
    Georgia,
}

impl FontFamily {
    pub const ALLOWED: &'static [&'static str] =
        &["Arial", "Helvetica", "Times New Roman", "Calibri", "Georgia"];

    pub fn as_str(self) -> &'static str {
        match self {
            FontFamily::Arial => "Arial",
            FontFamily::Helvetica => "Helvetica",
            FontFamily::TimesNewRoman => "Times New Roman",
            FontFamily::Calibri => "Calibri",
            FontFamily::Georgia => "Georgia",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionName {
    Summary,
    Experience,
    Education,
    Skills,
    Certifications,
    Projects,
}

impl SectionName {
    pub const ALLOWED: &'static [&'static str] = &[
        "summary",
        "experience",
        "education",
        "skills",
        "certifications",
        "projects",
    ];
}
