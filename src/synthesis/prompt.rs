//! Prompt assembly for report synthesis.
//!
//! One structured prompt embeds the topic and every selected source,
//! tagged with its citation number in ranked order, followed by the fixed
//! section schema the model must produce.

use crate::types::{RankedSource, SynthesisRequest, Topic};

/// The fixed report schema, in required order.
pub const SECTION_HEADINGS: [&str; 4] = [
    "Summary",
    "Detailed Analysis",
    "Applications",
    "Future Outlook",
];

/// Build the immutable synthesis request for a run.
pub fn build_request(topic: &Topic, sources: Vec<RankedSource>) -> SynthesisRequest {
    let prompt = build_prompt(topic, &sources);
    SynthesisRequest {
        topic: topic.clone(),
        sources,
        prompt,
    }
}

fn build_prompt(topic: &Topic, sources: &[RankedSource]) -> String {
    let mut prompt = String::new();
    prompt.push_str(&format!("RESEARCH TOPIC: {topic}\n\n"));
    prompt.push_str(&format!(
        "SOURCE MATERIAL ({} sources, numbered for citation):\n\n",
        sources.len()
    ));

    for ranked in sources {
        prompt.push_str(&format!(
            "SOURCE [{id}]\nTITLE: {title}\nURL: {url}\nCONTENT:\n{body}\n{rule}\n",
            id = ranked.citation_id,
            title = ranked.source.title,
            url = ranked.source.url,
            body = ranked.source.body_text,
            rule = "=".repeat(80),
        ));
    }

    prompt.push_str(&format!(
        r#"
INSTRUCTIONS:
Write a structured research report on the topic above, based ONLY on the
numbered source material. Produce exactly these four sections, in this
order, each introduced by a markdown heading line:

## Summary
## Detailed Analysis
## Applications
## Future Outlook

Requirements:
- Every factual claim must carry an inline citation marker such as [1] or
  [2][4], where the number is the source number it came from.
- Use only source numbers 1 through {max_id}. Never invent a number.
- Do not add any other sections, preamble, or closing remarks.
- Do not make assumptions beyond what the sources state; if the sources
  conflict, present both positions with their citations.
- Write in clear prose with markdown formatting inside sections.
"#,
        max_id = sources.len()
    ));

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ExtractedSource;

    fn ranked(id: usize, url: &str, title: &str, body: &str) -> RankedSource {
        RankedSource {
            source: ExtractedSource::ok(url.into(), title.into(), body.into()),
            relevance_score: 1.0,
            citation_id: id,
        }
    }

    #[test]
    fn prompt_contains_topic_and_sources() {
        let topic = Topic::new("desalination technology").unwrap();
        let sources = vec![
            ranked(1, "https://a.example.com", "First Source", "Body one."),
            ranked(2, "https://b.example.com", "Second Source", "Body two."),
        ];
        let request = build_request(&topic, sources);

        assert!(request.prompt.contains("RESEARCH TOPIC: desalination technology"));
        assert!(request.prompt.contains("SOURCE [1]"));
        assert!(request.prompt.contains("SOURCE [2]"));
        assert!(request.prompt.contains("TITLE: First Source"));
        assert!(request.prompt.contains("URL: https://b.example.com"));
        assert!(request.prompt.contains("Body one."));
    }

    #[test]
    fn prompt_lists_schema_headings() {
        let topic = Topic::new("desalination technology").unwrap();
        let request = build_request(&topic, vec![ranked(1, "https://a.example.com", "T", "B")]);
        for heading in SECTION_HEADINGS {
            assert!(request.prompt.contains(&format!("## {heading}")));
        }
    }

    #[test]
    fn prompt_bounds_citation_numbers() {
        let topic = Topic::new("desalination technology").unwrap();
        let sources = vec![
            ranked(1, "https://a.example.com", "T", "B"),
            ranked(2, "https://b.example.com", "T", "B"),
            ranked(3, "https://c.example.com", "T", "B"),
        ];
        let request = build_request(&topic, sources);
        assert!(request.prompt.contains("source numbers 1 through 3"));
    }

    #[test]
    fn sources_appear_in_citation_order() {
        let topic = Topic::new("desalination technology").unwrap();
        let sources = vec![
            ranked(1, "https://first.example.com", "T", "B"),
            ranked(2, "https://second.example.com", "T", "B"),
        ];
        let request = build_request(&topic, sources);
        let first = request.prompt.find("https://first.example.com").unwrap();
        let second = request.prompt.find("https://second.example.com").unwrap();
        assert!(first < second);
    }
}
