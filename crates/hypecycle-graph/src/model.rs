use std::collections::HashMap;

use chrono::{DateTime, Utc};
use hypecycle_core::DocType;
use serde::{Deserialize, Serialize};

/// `Technology` node (spec §3.2).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnologyNode {
    pub id: String,
    pub name: String,
    pub domain: String,
    pub aliases: Vec<String>,
    pub quality_score: f64,
    pub pagerank: Option<f64>,
    /// `community_v0` .. `community_v5`, keyed by version label.
    pub community_membership: HashMap<String, String>,
    pub embedding: Option<Vec<f32>>,
}

impl TechnologyNode {
    /// `pagerank` defaults to 0 when absent (spec §4.A edge-case policy).
    pub fn pagerank_or_default(&self) -> f64 {
        self.pagerank.unwrap_or(0.0)
    }
}

/// `Company` node (spec §3.2).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyNode {
    pub id: String,
    pub name: String,
    pub pagerank: Option<f64>,
    pub aliases: Vec<String>,
    pub embedding: Option<Vec<f32>>,
}

/// `Document` node (spec §3.2). Type-specific fields are optional because
/// they only apply to some `doc_type`s.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentNode {
    pub doc_id: String,
    pub doc_type: DocType,
    /// `None` only permitted for `doc_type == Github` (spec §3.2 invariant).
    pub published_at: Option<DateTime<Utc>>,
    pub title: String,
    pub summary: String,
    pub value_usd: Option<f64>,
    pub citation_count: Option<u64>,
    pub outlet_tier: Option<u8>,
    pub quality_score: f64,
    pub pagerank: Option<f64>,
    pub embedding: Option<Vec<f32>>,
}

impl DocumentNode {
    pub fn pagerank_or_default(&self) -> f64 {
        self.pagerank.unwrap_or(0.0)
    }
}

/// `Community` node (spec §3.2).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunityNode {
    pub id: String,
    pub version: String,
    pub algorithm: String,
    pub resolution: f64,
    pub member_count: usize,
    pub top_technologies: Vec<String>,
    pub top_companies: Vec<String>,
    pub doc_type_distribution: HashMap<DocType, usize>,
    pub summary: String,
    pub embedding: Option<Vec<f32>>,
}

/// Relationship role on a `MENTIONED_IN` edge (spec §3.2).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MentionedInEdge {
    pub subject_id: String,
    pub doc_id: String,
    pub role: String,
    pub evidence_confidence: f64,
    pub evidence_text: String,
}

/// Closed vocabulary for `RELATED_TO_TECH` edges (spec §3.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompanyTechRelation {
    Develops,
    Uses,
    InvestsIn,
    Researches,
    OwnsIp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelatedToTechEdge {
    pub company_id: String,
    pub tech_id: String,
    pub relation_type: CompanyTechRelation,
}

/// Membership edge into a community (spec §3.2).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BelongsToCommunityEdge {
    pub subject_id: String,
    pub community_id: String,
}

/// Closed vocabulary for `TECH_TO_TECH` edges (spec §3.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TechRelation {
    Develops,
    Enables,
    Requires,
    Supersedes,
    Competes,
    Complements,
}

/// A directed relationship between two technologies (spec §3.2).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechToTechEdge {
    pub source_tech_id: String,
    pub target_tech_id: String,
    pub relation_type: TechRelation,
    pub confidence: f64,
}
