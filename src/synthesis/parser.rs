//! Strict parser for the model's structured response.
//!
//! The response must contain exactly the four schema sections, in order,
//! with non-empty bodies, and every inline citation marker must refer to
//! a supplied source number. Anything else is a
//! [`ResearchError::SynthesisParse`]; partially-matching output is never
//! accepted.

use crate::synthesis::prompt::SECTION_HEADINGS;
use crate::types::{RankedSource, ReportSection, ResearchError, Result, SynthesisResult};
use std::collections::{BTreeMap, BTreeSet};

/// Parse and validate a raw model response.
pub fn parse_response(raw: &str, sources: &[RankedSource]) -> Result<SynthesisResult> {
    let sections = split_sections(raw)?;
    validate_schema(&sections)?;

    let supplied: BTreeMap<usize, &RankedSource> =
        sources.iter().map(|s| (s.citation_id, s)).collect();

    let mut used = BTreeSet::new();
    for section in &sections {
        for marker in citation_markers(&section.body) {
            if !supplied.contains_key(&marker) {
                return Err(ResearchError::SynthesisParse(format!(
                    "citation marker [{marker}] in section \"{}\" does not match any supplied source (valid: 1..={})",
                    section.heading,
                    sources.len(),
                )));
            }
            used.insert(marker);
        }
    }

    let citations = used
        .into_iter()
        .map(|id| (id, supplied[&id].source.url.clone()))
        .collect();

    Ok(SynthesisResult { sections, citations })
}

/// Split the response into heading/body pairs.
///
/// Text before the first heading (a model preamble) is discarded; text
/// with no headings at all is a parse error.
fn split_sections(raw: &str) -> Result<Vec<ReportSection>> {
    let mut sections: Vec<ReportSection> = Vec::new();
    let mut current: Option<(String, Vec<String>)> = None;

    for line in raw.lines() {
        if let Some(heading) = heading_text(line) {
            if let Some((title, body)) = current.take() {
                sections.push(ReportSection {
                    heading: title,
                    body: body.join("\n").trim().to_string(),
                });
            }
            current = Some((heading, Vec::new()));
        } else if let Some((_, body)) = current.as_mut() {
            body.push(line.to_string());
        }
    }

    if let Some((title, body)) = current {
        sections.push(ReportSection {
            heading: title,
            body: body.join("\n").trim().to_string(),
        });
    }

    if sections.is_empty() {
        return Err(ResearchError::SynthesisParse(
            "response contains no section headings".to_string(),
        ));
    }

    Ok(sections)
}

/// Extract a normalised heading from a markdown heading line.
fn heading_text(line: &str) -> Option<String> {
    let trimmed = line.trim();
    let stripped = trimmed.strip_prefix("##")?;
    // Deeper levels (###) belong to section bodies.
    if stripped.starts_with('#') {
        return None;
    }
    let text = stripped
        .trim()
        .trim_start_matches("**")
        .trim_end_matches("**")
        .trim_end_matches(':')
        .trim();
    if text.is_empty() {
        return None;
    }
    Some(text.to_string())
}

/// Check sections match the expected schema: same headings, same order,
/// non-empty bodies, nothing extra.
fn validate_schema(sections: &[ReportSection]) -> Result<()> {
    if sections.len() != SECTION_HEADINGS.len() {
        let found: Vec<&str> = sections.iter().map(|s| s.heading.as_str()).collect();
        return Err(ResearchError::SynthesisParse(format!(
            "expected {} sections {:?}, found {} {:?}",
            SECTION_HEADINGS.len(),
            SECTION_HEADINGS,
            sections.len(),
            found,
        )));
    }

    for (section, expected) in sections.iter().zip(SECTION_HEADINGS) {
        if !section.heading.eq_ignore_ascii_case(expected) {
            return Err(ResearchError::SynthesisParse(format!(
                "unexpected section heading \"{}\", expected \"{expected}\"",
                section.heading,
            )));
        }
        if section.body.is_empty() {
            return Err(ResearchError::SynthesisParse(format!(
                "section \"{}\" has an empty body",
                section.heading,
            )));
        }
    }

    Ok(())
}

/// All `[n]` citation markers appearing in a body, in occurrence order.
pub(crate) fn citation_markers(body: &str) -> Vec<usize> {
    let mut markers = Vec::new();
    let bytes = body.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'[' {
            let mut j = i + 1;
            while j < bytes.len() && bytes[j].is_ascii_digit() {
                j += 1;
            }
            if j > i + 1 && j < bytes.len() && bytes[j] == b']' {
                // Safe: the span is all ASCII digits.
                if let Ok(id) = body[i + 1..j].parse::<usize>() {
                    markers.push(id);
                }
                i = j + 1;
                continue;
            }
        }
        i += 1;
    }
    markers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ExtractedSource;

    fn sources(n: usize) -> Vec<RankedSource> {
        (1..=n)
            .map(|id| RankedSource {
                source: ExtractedSource::ok(
                    format!("https://s{id}.example.com"),
                    format!("Source {id}"),
                    "body".into(),
                ),
                relevance_score: 1.0,
                citation_id: id,
            })
            .collect()
    }

    fn valid_response() -> &'static str {
        "## Summary\nKey findings here [1].\n\n\
         ## Detailed Analysis\nDeeper discussion [1][2].\n\n\
         ## Applications\nPractical uses [2].\n\n\
         ## Future Outlook\nWhat comes next [1]."
    }

    #[test]
    fn parses_valid_response() {
        let result = parse_response(valid_response(), &sources(2)).unwrap();
        assert_eq!(result.sections.len(), 4);
        assert_eq!(result.sections[0].heading, "Summary");
        assert_eq!(result.sections[3].heading, "Future Outlook");
        assert_eq!(result.citations.len(), 2);
        assert_eq!(result.citations[&1], "https://s1.example.com");
    }

    #[test]
    fn preamble_before_first_heading_is_dropped() {
        let raw = format!("Here is your report:\n\n{}", valid_response());
        let result = parse_response(&raw, &sources(2)).unwrap();
        assert_eq!(result.sections.len(), 4);
        assert!(!result.sections[0].body.contains("Here is your report"));
    }

    #[test]
    fn heading_case_is_insensitive() {
        let raw = valid_response().replace("## Summary", "## SUMMARY");
        let result = parse_response(&raw, &sources(2)).unwrap();
        assert_eq!(result.sections[0].heading, "SUMMARY");
    }

    #[test]
    fn bold_and_colon_decorations_are_tolerated() {
        let raw = valid_response().replace("## Summary", "## **Summary:**");
        assert!(parse_response(&raw, &sources(2)).is_ok());
    }

    #[test]
    fn missing_section_is_a_parse_error() {
        let raw = "## Summary\nText [1].\n## Detailed Analysis\nText [1].";
        let err = parse_response(raw, &sources(1)).unwrap_err();
        assert!(matches!(err, ResearchError::SynthesisParse(_)));
        assert!(err.to_string().contains("expected 4 sections"));
    }

    #[test]
    fn wrong_heading_order_is_a_parse_error() {
        let raw = "## Detailed Analysis\nA [1].\n## Summary\nB [1].\n\
                   ## Applications\nC [1].\n## Future Outlook\nD [1].";
        let err = parse_response(raw, &sources(1)).unwrap_err();
        assert!(matches!(err, ResearchError::SynthesisParse(_)));
    }

    #[test]
    fn extra_section_is_a_parse_error() {
        let raw = format!("{}\n## Sources\nStuff.", valid_response());
        let err = parse_response(&raw, &sources(2)).unwrap_err();
        assert!(matches!(err, ResearchError::SynthesisParse(_)));
    }

    #[test]
    fn empty_body_is_a_parse_error() {
        let raw = "## Summary\n\n## Detailed Analysis\nText [1].\n\
                   ## Applications\nText [1].\n## Future Outlook\nText [1].";
        let err = parse_response(raw, &sources(1)).unwrap_err();
        assert!(err.to_string().contains("empty body"));
    }

    #[test]
    fn unresolved_citation_marker_is_a_parse_error() {
        let raw = valid_response().replace("[2]", "[9]");
        let err = parse_response(&raw, &sources(2)).unwrap_err();
        assert!(matches!(err, ResearchError::SynthesisParse(_)));
        assert!(err.to_string().contains("[9]"));
    }

    #[test]
    fn no_headings_at_all_is_a_parse_error() {
        let err = parse_response("just some prose with no structure", &sources(1)).unwrap_err();
        assert!(err.to_string().contains("no section headings"));
    }

    #[test]
    fn subsection_headings_stay_in_the_body() {
        let raw = valid_response().replace(
            "Deeper discussion [1][2].",
            "### Methods\nDeeper discussion [1][2].",
        );
        let result = parse_response(&raw, &sources(2)).unwrap();
        assert_eq!(result.sections.len(), 4);
        assert!(result.sections[1].body.contains("### Methods"));
    }

    #[test]
    fn citations_map_only_contains_used_ids() {
        let result = parse_response(valid_response(), &sources(5)).unwrap();
        // Sources 3..5 were supplied but never cited.
        assert_eq!(result.citations.len(), 2);
        assert!(!result.citations.contains_key(&3));
    }

    #[test]
    fn marker_extraction_ignores_non_numeric_brackets() {
        let markers = citation_markers("see [1], [note], [12] and [3a]");
        assert_eq!(markers, vec![1, 12]);
    }
}
