use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hypecycle_core::{DocType, GraphError, NetPosition, TemporalTrend};
use serde::{Deserialize, Serialize};

pub type GraphResult<T> = Result<T, GraphError>;

/// A small, typed summary of a document, returned by top-K accessors
/// (spec §4.A, §4.H "citation record").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocSummary {
    pub doc_id: String,
    pub doc_type: DocType,
    pub title: String,
    pub url: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub score: f64,
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanySummary {
    pub id: String,
    pub name: String,
    pub pagerank: f64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PatentActivity {
    pub patent_count: u64,
    pub citation_sum: u64,
    pub pagerank_weighted_count: f64,
    pub avg_pagerank: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatentActivityDetail {
    pub activity: PatentActivity,
    pub top_patents: Vec<DocSummary>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PaperActivity {
    pub paper_count: u64,
    pub citation_sum: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommunityContext {
    pub community_id: Option<String>,
    pub community_patent_count: u64,
    pub community_paper_count: u64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ContractActivity {
    pub contract_count: u64,
    pub total_value_usd: f64,
    pub avg_value: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContractActivityDetail {
    pub activity: ContractActivity,
    pub top_contracts: Vec<DocSummary>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RegulationActivity {
    pub approval_count: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompaniesDeveloping {
    pub company_count: u64,
    pub top_companies: Vec<CompanySummary>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct NewsActivity {
    pub news_count: u64,
    pub tier1_count: u64,
    pub tier2_count: u64,
    pub tier3_count: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewsActivityDetail {
    pub activity: NewsActivity,
    pub top_articles: Vec<DocSummary>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct InsiderTrading {
    pub buy_count: u64,
    pub sell_count: u64,
    pub net_position: NetPosition,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunitySummary {
    pub id: String,
    pub member_count: usize,
    pub doc_type_distribution: HashMap<DocType, usize>,
    pub top_technologies: Vec<String>,
    pub top_companies: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnologySummary {
    pub id: String,
    pub name: String,
    pub domain: String,
    pub quality_score: f64,
    pub pagerank: f64,
    pub document_count: usize,
    pub doc_type_diversity: usize,
    /// `community_<version>` membership, keyed by version label ("v0".."v5").
    pub community_membership: HashMap<String, String>,
}

/// Typed, parameterized accessors grouped by intelligence layer
/// (spec §4.A). Implementations never leak raw query fragments to callers;
/// every return value is an owned, `serde`-friendly record (Design Note
/// "graph as external sum type").
#[async_trait]
pub trait GraphAccessors: Send + Sync {
    async fn patent_activity(
        &self,
        tech_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> GraphResult<PatentActivityDetail>;

    async fn paper_activity(
        &self,
        tech_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> GraphResult<PaperActivity>;

    async fn community_context(&self, tech_id: &str, version: &str) -> GraphResult<CommunityContext>;

    async fn temporal_trend(
        &self,
        tech_id: &str,
        window_end: DateTime<Utc>,
        bucket_span_days: i64,
    ) -> GraphResult<TemporalTrend>;

    async fn contract_activity(
        &self,
        tech_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> GraphResult<ContractActivityDetail>;

    async fn regulation_activity(
        &self,
        tech_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> GraphResult<RegulationActivity>;

    async fn companies_developing(&self, tech_id: &str) -> GraphResult<CompaniesDeveloping>;

    async fn revenue_mentions(
        &self,
        tech_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> GraphResult<u64>;

    async fn news_activity(
        &self,
        tech_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> GraphResult<NewsActivityDetail>;

    async fn sec_risk_mentions(
        &self,
        tech_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> GraphResult<u64>;

    async fn insider_trading(
        &self,
        tech_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> GraphResult<InsiderTrading>;

    async fn institutional_holdings_pct(&self, tech_id: &str) -> GraphResult<f64>;

    async fn all_communities(
        &self,
        version: &str,
        min_member_count: usize,
    ) -> GraphResult<Vec<CommunitySummary>>;

    async fn top_technologies(&self, quality_threshold: f64) -> GraphResult<Vec<TechnologySummary>>;
}

/// Ratio-of-counts helper shared by several accessors: `count / max(other, 1)`
/// (spec §4.A edge-case policy "division by zero -> 0").
pub fn safe_ratio(numerator: u64, denominator: u64) -> f64 {
    numerator as f64 / denominator.max(1) as f64
}
