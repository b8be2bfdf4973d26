//! Static catalog of known methodology agents
//!
//! Each profile carries a display name and the template set the mock
//! generator substitutes topics into. Unknown agent ids fall back to the
//! default profile, so a batch never fails on an unrecognized slug.

use crate::types::AgentId;

/// Topic tokens substituted into insight templates
pub(crate) const TOPICS: &[&str] = &[
    "participant trust",
    "workflow friction",
    "data privacy concerns",
    "team communication",
    "tool adoption",
    "onboarding experience",
    "decision-making authority",
    "informal knowledge sharing",
];

/// A catalog entry for one methodology agent
#[derive(Debug, Clone, Copy)]
pub struct AgentProfile {
    /// The agent slug this profile answers to
    pub slug: &'static str,
    /// Human-readable methodology name
    pub display_name: &'static str,
    /// Insight templates; `{topic}` is replaced per generated result
    pub templates: &'static [&'static str],
}

const GROUNDED_THEORY: AgentProfile = AgentProfile {
    slug: "grounded-theory",
    display_name: "Grounded Theory",
    templates: &[
        "Open coding surfaces {topic} as a recurring concept across responses",
        "An emerging category around {topic} is grounded in repeated participant references",
        "Axial coding links {topic} to the core phenomenon described by participants",
    ],
};

const THEMATIC_ANALYSIS: AgentProfile = AgentProfile {
    slug: "thematic-analysis",
    display_name: "Thematic Analysis",
    templates: &[
        "A candidate theme of {topic} appears with consistent supporting extracts",
        "Participants frame {topic} in strongly contrasting ways across the dataset",
        "The theme of {topic} cuts across otherwise unrelated interview sections",
    ],
};

const DISCOURSE_ANALYSIS: AgentProfile = AgentProfile {
    slug: "discourse-analysis",
    display_name: "Discourse Analysis",
    templates: &[
        "Speakers position themselves defensively when {topic} is raised",
        "The language around {topic} shifts between institutional and personal registers",
        "Hedging intensifies whenever {topic} intersects with accountability",
    ],
};

const NARRATIVE_ANALYSIS: AgentProfile = AgentProfile {
    slug: "narrative-analysis",
    display_name: "Narrative Analysis",
    templates: &[
        "Accounts of {topic} follow a disruption-and-repair story arc",
        "Participants cast themselves as protagonists when recounting {topic}",
        "Turning points in the narratives cluster around {topic}",
    ],
};

const PHENOMENOLOGY: AgentProfile = AgentProfile {
    slug: "phenomenology",
    display_name: "Phenomenology",
    templates: &[
        "The lived experience of {topic} is described in strongly embodied terms",
        "Participants return to {topic} when articulating what the change felt like",
        "Descriptions of {topic} converge on a shared essential structure",
    ],
};

const CONTENT_ANALYSIS: AgentProfile = AgentProfile {
    slug: "content-analysis",
    display_name: "Content Analysis",
    templates: &[
        "References to {topic} occur at a notably high frequency in this passage",
        "Mentions of {topic} co-occur with negative sentiment markers",
        "The distribution of {topic} references is uneven across respondents",
    ],
};

const DEFAULT: AgentProfile = AgentProfile {
    slug: "general",
    display_name: "General Analysis",
    templates: &[
        "This passage foregrounds {topic} as salient to participants",
        "There is a notable pattern involving {topic} in this segment",
    ],
};

const KNOWN: &[AgentProfile] = &[
    GROUNDED_THEORY,
    THEMATIC_ANALYSIS,
    DISCOURSE_ANALYSIS,
    NARRATIVE_ANALYSIS,
    PHENOMENOLOGY,
    CONTENT_ANALYSIS,
];

/// The static methodology catalog
#[derive(Debug, Clone, Copy, Default)]
pub struct AgentCatalog;

impl AgentCatalog {
    /// All known methodology profiles
    #[inline]
    #[must_use]
    pub fn all() -> &'static [AgentProfile] {
        KNOWN
    }

    /// Profile for an agent id, falling back to the default profile
    #[must_use]
    pub fn profile(agent_id: &AgentId) -> &'static AgentProfile {
        KNOWN
            .iter()
            .find(|profile| profile.slug == agent_id.as_str())
            .unwrap_or(&DEFAULT)
    }

    /// Display name for an agent id
    ///
    /// Catalog entries use their curated name; unknown slugs fall back to
    /// the title-cased methodology label.
    #[must_use]
    pub fn display_name(agent_id: &AgentId) -> String {
        KNOWN
            .iter()
            .find(|profile| profile.slug == agent_id.as_str())
            .map_or_else(|| agent_id.methodology(), |p| p.display_name.to_string())
    }
}
