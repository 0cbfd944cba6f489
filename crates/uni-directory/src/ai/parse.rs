use serde::Deserialize;

use crate::catalog::UniversityView;

/// The object the advisor prompt asks the model to produce.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawRecommendation {
    pub university_name: String,
    #[serde(default)]
    pub short_reason: String,
}

/// How a fallback candidate was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackKind {
    CityMatch,
    FirstAvailable,
}

/// Parse raw model output into a recommendation. Returns `None` when no usable
/// JSON object can be recovered.
pub fn parse_recommendation(raw: &str) -> Option<RawRecommendation> {
    let unfenced = strip_code_fences(raw);
    let json = extract_json_object(unfenced)?;
    let parsed: RawRecommendation = serde_json::from_str(json).ok()?;
    if parsed.university_name.trim().is_empty() {
        return None;
    }
    Some(parsed)
}

/// Remove a leading ```` ``` ```` / ```` ```json ```` line and a trailing fence.
pub fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```") {
        text = match rest.find('\n') {
            Some(newline) => &rest[newline + 1..],
            None => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
        };
    }
    if let Some(rest) = text.trim_end().strip_suffix("```") {
        text = rest;
    }

    text.trim()
}

/// Slice from the first `{` to the last `}`.
pub fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(&raw[start..=end])
}

/// Match a model-supplied name against the stored universities: exact first,
/// then trimmed and case-insensitive.
pub fn resolve_university<'a>(
    name: &str,
    candidates: &'a [UniversityView],
) -> Option<&'a UniversityView> {
    if let Some(exact) = candidates
        .iter()
        .find(|view| view.university.name == name)
    {
        return Some(exact);
    }

    let wanted = name.trim().to_lowercase();
    candidates
        .iter()
        .find(|view| view.university.name.trim().to_lowercase() == wanted)
}

/// First university in the preferred city, otherwise the first stored one.
pub fn fallback_university<'a>(
    preferred_city: &str,
    candidates: &'a [UniversityView],
) -> Option<(&'a UniversityView, FallbackKind)> {
    let city = preferred_city.trim().to_lowercase();
    if !city.is_empty() {
        if let Some(view) = candidates
            .iter()
            .find(|view| view.university.city.trim().to_lowercase() == city)
        {
            return Some((view, FallbackKind::CityMatch));
        }
    }

    candidates
        .first()
        .map(|view| (view, FallbackKind::FirstAvailable))
}
