//! Language tag helpers backed by the ISO 639 tables of `isolang`

use isolang::Language;

/// ISO 639-3 code for English
pub const ENGLISH: &str = "eng";

/// Split a tag such as "en-US" or "pt_BR" into language and optional region
fn split_tag(tag: &str) -> (&str, Option<&str>) {
    let mut parts = tag.trim().splitn(2, |c: char| c == '-' || c == '_');
    let language = parts.next().unwrap_or("");
    let region = parts.next().filter(|r| !r.is_empty());
    (language, region)
}

fn language(tag: &str) -> Option<Language> {
    let (code, _) = split_tag(tag);
    let code = code.to_ascii_lowercase();
    match code.len() {
        2 => Language::from_639_1(&code),
        3 => Language::from_639_3(&code),
        _ => None,
    }
}

/// Three letter language code of a tag: "en-US" -> "eng", "de" -> "deu"
pub fn iso3_language(tag: &str) -> Option<&'static str> {
    language(tag).map(|l| l.to_639_3())
}

/// Human readable name of a tag, e.g. "English" or "Portuguese (BR)"
///
/// Unknown languages are shown as the raw tag.
pub fn display_name(tag: &str) -> String {
    let (_, region) = split_tag(tag);
    match (language(tag), region) {
        (Some(lang), Some(region)) => format!("{} ({})", lang.to_name(), region.to_ascii_uppercase()),
        (Some(lang), None) => lang.to_name().to_string(),
        (None, _) => tag.to_string(),
    }
}
