//! Report assembly: the final, pure merge of synthesis output and source
//! metadata.
//!
//! No I/O happens here. Assembly re-verifies the citation invariant so a
//! defect upstream surfaces as [`ResearchError::AssemblyInvariant`]
//! instead of a report with dangling citations.

use crate::synthesis::parser::citation_markers;
use crate::types::{RankedSource, Report, ResearchError, Result, SynthesisResult, Topic};
use chrono::Utc;

/// Merge the synthesis result and ranked sources into a [`Report`].
///
/// The bibliography keeps exactly the ranked order used during synthesis,
/// so citation numbers in rendered output match bibliography positions.
pub fn assemble(
    topic: &Topic,
    synthesis: SynthesisResult,
    ranked_sources: Vec<RankedSource>,
) -> Result<Report> {
    verify_invariants(&synthesis, &ranked_sources)?;

    Ok(Report {
        topic: topic.clone(),
        generated_at: Utc::now(),
        synthesis,
        bibliography: ranked_sources,
    })
}

fn verify_invariants(synthesis: &SynthesisResult, sources: &[RankedSource]) -> Result<()> {
    // Bibliography entries must be 1..=n in order; citation numbers in the
    // rendered document index directly into it.
    for (position, source) in sources.iter().enumerate() {
        if source.citation_id != position + 1 {
            return Err(ResearchError::AssemblyInvariant(format!(
                "bibliography entry at position {} has citation id {}",
                position + 1,
                source.citation_id,
            )));
        }
        if !source.source.is_ok() {
            return Err(ResearchError::AssemblyInvariant(format!(
                "bibliography entry [{}] has status {:?}",
                source.citation_id, source.source.status,
            )));
        }
    }

    // Every marker in the section bodies must resolve through the citation
    // map to a bibliography entry.
    for section in &synthesis.sections {
        for marker in citation_markers(&section.body) {
            if !synthesis.citations.contains_key(&marker) {
                return Err(ResearchError::AssemblyInvariant(format!(
                    "section \"{}\" cites [{marker}] which is missing from the citation map",
                    section.heading,
                )));
            }
            if marker == 0 || marker > sources.len() {
                return Err(ResearchError::AssemblyInvariant(format!(
                    "citation [{marker}] has no bibliography entry (bibliography has {})",
                    sources.len(),
                )));
            }
        }
    }

    // The citation map itself must agree with the bibliography.
    for (&id, url) in &synthesis.citations {
        match sources.get(id.wrapping_sub(1)) {
            Some(entry) if entry.source.url == *url => {}
            Some(entry) => {
                return Err(ResearchError::AssemblyInvariant(format!(
                    "citation [{id}] maps to {url} but bibliography entry [{id}] is {}",
                    entry.source.url,
                )));
            }
            None => {
                return Err(ResearchError::AssemblyInvariant(format!(
                    "citation [{id}] has no bibliography entry",
                )));
            }
        }
    }

    Ok(())
}
