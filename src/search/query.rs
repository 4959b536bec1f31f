//! Topic categorisation and query-plan construction.
//!
//! A topic is classified into a coarse category, which selects the
//! authoritative domains and enrichment keywords used to diversify search
//! queries. Classification is keyword-based and deterministic.

use crate::types::Topic;

/// Coarse research-topic categories with specialised search strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicCategory {
    Politics,
    History,
    Geography,
    CurrentAffairs,
    Technology,
    War,
    Economics,
    Science,
    General,
}

impl TopicCategory {
    /// Classify a topic by keyword lists, first match wins.
    pub fn detect(topic: &Topic) -> Self {
        let lower = topic.as_str().to_lowercase();
        let contains_any = |keywords: &[&str]| keywords.iter().any(|k| lower.contains(k));

        if contains_any(&[
            "politic", "government", "policy", "election", "democracy", "parliament",
            "congress", "senate", "president", "minister", "geopolitic", "diplomacy",
            "foreign policy", "international relations",
        ]) {
            Self::Politics
        } else if contains_any(&[
            "history", "historical", "ancient", "medieval", "world war", "civilization",
            "empire", "dynasty", "revolution", "century", " era", "heritage",
        ]) {
            Self::History
        } else if contains_any(&[
            "geography", "continent", "ocean", "mountain", "river", "population",
            "capital", "border", "territory",
        ]) {
            Self::Geography
        } else if contains_any(&[
            "current", "news", "today", "recent", "latest", "breaking", "happening",
            "this year", "now",
        ]) {
            Self::CurrentAffairs
        } else if contains_any(&[
            "technology", "tech", " ai", "artificial intelligence", "machine learning",
            "software", "hardware", "computer", "digital", "programming", "algorithm",
            "data science", "cybersecurity",
        ]) {
            Self::Technology
        } else if contains_any(&[
            "war", "warfare", "conflict", "battle", "military", "army", "defense",
            "weapon", "combat", "invasion", "siege",
        ]) {
            Self::War
        } else if contains_any(&[
            "economy", "economic", "finance", "financial", "market", "trade",
            "business", "industry", "gdp", "inflation", "recession",
        ]) {
            Self::Economics
        } else if contains_any(&[
            "science", "scientific", "research", "experiment", "discovery", "physics",
            "chemistry", "biology", "medicine", "health",
        ]) {
            Self::Science
        } else {
            Self::General
        }
    }

    /// Authoritative domains searched directly and boosted during ranking.
    pub fn priority_domains(&self) -> &'static [&'static str] {
        match self {
            Self::Politics => &[
                "reuters.com", "bbc.com", "politico.com", "foreignaffairs.com",
                "cfr.org", "brookings.edu", "apnews.com",
            ],
            Self::History => &[
                "britannica.com", "history.com", "nationalgeographic.com",
                "smithsonianmag.com", "worldhistory.org",
            ],
            Self::Geography => &[
                "nationalgeographic.com", "worldatlas.com", "britannica.com",
                "cia.gov", "worldbank.org", "un.org",
            ],
            Self::CurrentAffairs => &[
                "reuters.com", "bbc.com", "apnews.com", "npr.org",
                "theguardian.com", "aljazeera.com",
            ],
            Self::Technology => &[
                "techcrunch.com", "wired.com", "arstechnica.com", "ieee.org",
                "nature.com", "mit.edu",
            ],
            Self::War => &[
                "janes.com", "defensenews.com", "csis.org", "rand.org", "cfr.org",
            ],
            Self::Economics => &[
                "reuters.com", "bloomberg.com", "economist.com", "ft.com",
                "worldbank.org", "imf.org",
            ],
            Self::Science => &[
                "nature.com", "sciencemag.org", "scientificamerican.com",
                "newscientist.com", "pnas.org",
            ],
            Self::General => &[
                "wikipedia.org", "britannica.com", "reuters.com", "bbc.com",
            ],
        }
    }

    /// Enrichment keywords appended to the topic to diversify queries.
    pub fn enrichment_keywords(&self) -> &'static [&'static str] {
        match self {
            Self::Politics => &["analysis", "policy", "official", "report", "legislation"],
            Self::History => &["timeline", "chronology", "primary source", "evidence", "context"],
            Self::Geography => &["facts", "statistics", "demographic", "survey", "census"],
            Self::CurrentAffairs => &["latest", "developing", "update", "headlines", "report"],
            Self::Technology => &["innovation", "development", "research", "emerging", "application"],
            Self::War => &["analysis", "strategy", "intelligence", "assessment", "briefing"],
            Self::Economics => &["analysis", "forecast", "statistics", "outlook", "indicator"],
            Self::Science => &["research", "study", "peer-reviewed", "findings", "evidence"],
            Self::General => &["overview", "guide", "explanation", "analysis", "background"],
        }
    }

    /// Whether queries benefit from recency modifiers.
    pub fn is_time_sensitive(&self) -> bool {
        matches!(self, Self::CurrentAffairs | Self::Politics | Self::Technology)
    }
}

/// An ordered sequence of search queries for one topic.
///
/// Strategies are tried in order until enough candidates are gathered:
/// exact phrase, priority-domain restriction, keyword enrichment, recency
/// modifiers (time-sensitive categories), then the plain topic as a
/// fallback.
#[derive(Debug, Clone)]
pub struct QueryPlan {
    pub category: TopicCategory,
    pub queries: Vec<PlannedQuery>,
}

/// One query in a plan, with its own result allocation.
#[derive(Debug, Clone)]
pub struct PlannedQuery {
    pub query: String,
    pub limit: usize,
}

impl QueryPlan {
    /// Build the query plan for a topic.
    pub fn build(topic: &Topic, max_results: usize) -> Self {
        let category = TopicCategory::detect(topic);
        let text = topic.as_str();
        let mut queries = Vec::new();

        // Exact phrase first: highest precision.
        queries.push(PlannedQuery {
            query: format!("\"{text}\""),
            limit: (max_results / 3).max(3),
        });

        for domain in category.priority_domains().iter().take(4) {
            queries.push(PlannedQuery {
                query: format!("{text} site:{domain}"),
                limit: 2,
            });
        }

        for keyword in category.enrichment_keywords().iter().take(3) {
            queries.push(PlannedQuery {
                query: format!("{text} {keyword}"),
                limit: 2,
            });
        }

        if category.is_time_sensitive() {
            for modifier in ["latest", "recent"] {
                queries.push(PlannedQuery {
                    query: format!("{text} {modifier}"),
                    limit: 2,
                });
            }
        }

        // Plain query last, sized to fill whatever the targeted strategies
        // missed.
        queries.push(PlannedQuery {
            query: text.to_string(),
            limit: max_results,
        });

        Self { category, queries }
    }
}
