//! An in-memory, deterministic implementation of [`GraphAccessors`] used by
//! tests, the CLI's `--offline` demo mode, and as a fixture for the
//! orchestrator's own tests. A production deployment backs `GraphAccessors`
//! with a real graph driver instead — that driver is an external
//! collaborator (spec §6.3) and is intentionally not implemented here.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hypecycle_core::{DocType, GraphError, NetPosition, TemporalTrend};

use crate::accessors::{
    safe_ratio, CommunitySummary, CompaniesDeveloping, CompanySummary, CommunityContext,
    ContractActivity, ContractActivityDetail, DocSummary, GraphAccessors, GraphResult,
    InsiderTrading, NewsActivity, NewsActivityDetail, PaperActivity, PatentActivity,
    PatentActivityDetail, RegulationActivity, TechnologySummary,
};
use crate::model::{
    CommunityNode, CompanyNode, DocumentNode, MentionedInEdge, RelatedToTechEdge, TechToTechEdge,
};

const TOP_K: usize = 5;

#[derive(Debug, Clone, Default)]
pub struct InsiderTradingRecord {
    pub buy_count: u64,
    pub sell_count: u64,
}

/// In-memory property graph fixture.
#[derive(Debug, Default)]
pub struct MemoryGraphStore {
    pub technologies: HashMap<String, crate::model::TechnologyNode>,
    pub companies: HashMap<String, CompanyNode>,
    pub documents: HashMap<String, DocumentNode>,
    pub communities: HashMap<String, CommunityNode>,
    /// `MENTIONED_IN` edges, keyed by subject (technology or company) id.
    pub mentions: Vec<MentionedInEdge>,
    pub related_to_tech: Vec<RelatedToTechEdge>,
    pub tech_to_tech: Vec<TechToTechEdge>,
    /// External tabular-store stand-ins (spec §9 Open Question 3).
    pub insider_trading: HashMap<String, InsiderTradingRecord>,
    pub institutional_holdings: HashMap<String, f64>,
}

impl MemoryGraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn doc(&self, doc_id: &str) -> Option<&DocumentNode> {
        self.documents.get(doc_id)
    }

    fn mentions_for(&self, subject_id: &str) -> impl Iterator<Item = &MentionedInEdge> {
        self.mentions.iter().filter(move |m| m.subject_id == subject_id)
    }

    fn docs_of_type_in_window(
        &self,
        tech_id: &str,
        doc_type: DocType,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<&DocumentNode> {
        self.mentions_for(tech_id)
            .filter_map(|m| self.doc(&m.doc_id))
            .filter(|d| d.doc_type == doc_type)
            .filter(|d| in_window(d.published_at, start, end))
            .collect()
    }

    fn to_summary(&self, d: &DocumentNode) -> DocSummary {
        DocSummary {
            doc_id: d.doc_id.clone(),
            doc_type: d.doc_type,
            title: d.title.clone(),
            url: None,
            published_at: d.published_at,
            score: d.pagerank_or_default(),
            metadata: HashMap::new(),
        }
    }
}

/// `Document.published_at` may be `None` only for `github` docs, which are
/// then excluded from every temporal window (spec §3.2 invariant, §4.A
/// edge-case policy).
fn in_window(published_at: Option<DateTime<Utc>>, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
    match published_at {
        Some(ts) => ts >= start && ts < end,
        None => false,
    }
}

#[async_trait]
impl GraphAccessors for MemoryGraphStore {
    async fn patent_activity(
        &self,
        tech_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> GraphResult<PatentActivityDetail> {
        let mut patents = self.docs_of_type_in_window(tech_id, DocType::Patent, start, end);
        let patent_count = patents.len() as u64;
        let citation_sum: u64 = patents.iter().filter_map(|d| d.citation_count).sum();
        let pagerank_weighted_count: f64 = patents
            .iter()
            .map(|d| 1.0 + 100.0 * d.pagerank_or_default())
            .sum();
        let avg_pagerank = if patent_count > 0 {
            pagerank_weighted_count / patent_count as f64
        } else {
            0.0
        };

        patents.sort_by(|a, b| {
            b.pagerank_or_default()
                .partial_cmp(&a.pagerank_or_default())
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.doc_id.cmp(&b.doc_id))
        });
        let top_patents = patents.iter().take(TOP_K).map(|d| self.to_summary(d)).collect();

        Ok(PatentActivityDetail {
            activity: PatentActivity {
                patent_count,
                citation_sum,
                pagerank_weighted_count,
                avg_pagerank,
            },
            top_patents,
        })
    }

    async fn paper_activity(
        &self,
        tech_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> GraphResult<PaperActivity> {
        let papers = self.docs_of_type_in_window(tech_id, DocType::TechnicalPaper, start, end);
        Ok(PaperActivity {
            paper_count: papers.len() as u64,
            citation_sum: papers.iter().filter_map(|d| d.citation_count).sum(),
        })
    }

    async fn community_context(&self, tech_id: &str, version: &str) -> GraphResult<CommunityContext> {
        let Some(tech) = self.technologies.get(tech_id) else {
            return Ok(CommunityContext::default());
        };
        let Some(community_id) = tech.community_membership.get(version).cloned() else {
            return Ok(CommunityContext::default());
        };

        let members: Vec<&str> = self
            .technologies
            .values()
            .filter(|t| t.community_membership.get(version) == Some(&community_id))
            .map(|t| t.id.as_str())
            .collect();

        let mut patent_count = 0u64;
        let mut paper_count = 0u64;
        for member in &members {
            for m in self.mentions_for(member) {
                if let Some(d) = self.doc(&m.doc_id) {
                    match d.doc_type {
                        DocType::Patent => patent_count += 1,
                        DocType::TechnicalPaper => paper_count += 1,
                        _ => {}
                    }
                }
            }
        }

        Ok(CommunityContext {
            community_id: Some(community_id),
            community_patent_count: patent_count,
            community_paper_count: paper_count,
        })
    }

    async fn temporal_trend(
        &self,
        tech_id: &str,
        window_end: DateTime<Utc>,
        bucket_span_days: i64,
    ) -> GraphResult<TemporalTrend> {
        let span = chrono::Duration::days(bucket_span_days);
        let recent_start = window_end - span;
        let preceding_start = recent_start - span;

        let count_in = |start: DateTime<Utc>, end: DateTime<Utc>| -> u64 {
            self.mentions_for(tech_id)
                .filter_map(|m| self.doc(&m.doc_id))
                .filter(|d| in_window(d.published_at, start, end))
                .count() as u64
        };

        let recent = count_in(recent_start, window_end);
        let preceding = count_in(preceding_start, recent_start);
        let ratio = safe_ratio(recent, preceding);

        Ok(if ratio > 1.25 {
            TemporalTrend::Growing
        } else if ratio < 0.8 {
            TemporalTrend::Declining
        } else {
            TemporalTrend::Stable
        })
    }

    async fn contract_activity(
        &self,
        tech_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> GraphResult<ContractActivityDetail> {
        let mut contracts =
            self.docs_of_type_in_window(tech_id, DocType::GovernmentContract, start, end);
        let contract_count = contracts.len() as u64;
        let total_value_usd: f64 = contracts.iter().filter_map(|d| d.value_usd).sum();
        let avg_value = if contract_count > 0 {
            total_value_usd / contract_count as f64
        } else {
            0.0
        };

        contracts.sort_by(|a, b| {
            b.value_usd
                .unwrap_or(0.0)
                .partial_cmp(&a.value_usd.unwrap_or(0.0))
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.doc_id.cmp(&b.doc_id))
        });
        let top_contracts = contracts.iter().take(TOP_K).map(|d| self.to_summary(d)).collect();

        Ok(ContractActivityDetail {
            activity: ContractActivity {
                contract_count,
                total_value_usd,
                avg_value,
            },
            top_contracts,
        })
    }

    async fn regulation_activity(
        &self,
        tech_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> GraphResult<RegulationActivity> {
        let approvals = self.docs_of_type_in_window(tech_id, DocType::Regulation, start, end);
        Ok(RegulationActivity {
            approval_count: approvals.len() as u64,
        })
    }

    async fn companies_developing(&self, tech_id: &str) -> GraphResult<CompaniesDeveloping> {
        let mut companies: Vec<&CompanyNode> = self
            .related_to_tech
            .iter()
            .filter(|e| e.tech_id == tech_id)
            .filter_map(|e| self.companies.get(&e.company_id))
            .collect();
        companies.sort_by(|a, b| {
            b.pagerank
                .unwrap_or(0.0)
                .partial_cmp(&a.pagerank.unwrap_or(0.0))
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });
        companies.dedup_by(|a, b| a.id == b.id);

        Ok(CompaniesDeveloping {
            company_count: companies.len() as u64,
            top_companies: companies
                .iter()
                .take(TOP_K)
                .map(|c| CompanySummary {
                    id: c.id.clone(),
                    name: c.name.clone(),
                    pagerank: c.pagerank.unwrap_or(0.0),
                })
                .collect(),
        })
    }

    async fn revenue_mentions(
        &self,
        tech_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> GraphResult<u64> {
        let count = self
            .mentions_for(tech_id)
            .filter(|m| {
                let text = m.evidence_text.to_lowercase();
                text.contains("revenue") || text.contains("sales")
            })
            .filter_map(|m| self.doc(&m.doc_id))
            .filter(|d| d.doc_type == DocType::SecFiling)
            .filter(|d| in_window(d.published_at, start, end))
            .count();
        Ok(count as u64)
    }

    async fn news_activity(
        &self,
        tech_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> GraphResult<NewsActivityDetail> {
        let mut news = self.docs_of_type_in_window(tech_id, DocType::News, start, end);
        let tier1_count = news.iter().filter(|d| d.outlet_tier == Some(1)).count() as u64;
        let tier2_count = news.iter().filter(|d| d.outlet_tier == Some(2)).count() as u64;
        let tier3_count = news.iter().filter(|d| d.outlet_tier == Some(3)).count() as u64;

        news.sort_by(|a, b| {
            b.pagerank_or_default()
                .partial_cmp(&a.pagerank_or_default())
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.doc_id.cmp(&b.doc_id))
        });
        let top_articles = news.iter().take(TOP_K).map(|d| self.to_summary(d)).collect();

        Ok(NewsActivityDetail {
            activity: NewsActivity {
                news_count: news.len() as u64,
                tier1_count,
                tier2_count,
                tier3_count,
            },
            top_articles,
        })
    }

    async fn sec_risk_mentions(
        &self,
        tech_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> GraphResult<u64> {
        const RISK_KEYWORDS: [&str; 4] = ["risk", "litigation", "uncertain", "adverse"];
        let count = self
            .mentions_for(tech_id)
            .filter(|m| {
                let text = m.evidence_text.to_lowercase();
                RISK_KEYWORDS.iter().any(|kw| text.contains(kw))
            })
            .filter_map(|m| self.doc(&m.doc_id))
            .filter(|d| d.doc_type == DocType::SecFiling)
            .filter(|d| in_window(d.published_at, start, end))
            .count();
        Ok(count as u64)
    }

    async fn insider_trading(
        &self,
        tech_id: &str,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
    ) -> GraphResult<InsiderTrading> {
        let record = self.insider_trading.get(tech_id).cloned().unwrap_or_default();
        let net_position = if record.buy_count as f64 > 1.5 * record.sell_count as f64 {
            NetPosition::Buying
        } else if record.sell_count as f64 > 1.5 * record.buy_count as f64 {
            NetPosition::Selling
        } else {
            NetPosition::Neutral
        };
        Ok(InsiderTrading {
            buy_count: record.buy_count,
            sell_count: record.sell_count,
            net_position,
        })
    }

    async fn institutional_holdings_pct(&self, tech_id: &str) -> GraphResult<f64> {
        Ok(self.institutional_holdings.get(tech_id).copied().unwrap_or(0.0))
    }

    async fn all_communities(
        &self,
        version: &str,
        min_member_count: usize,
    ) -> GraphResult<Vec<CommunitySummary>> {
        let mut out: Vec<CommunitySummary> = self
            .communities
            .values()
            .filter(|c| c.version == version && c.member_count >= min_member_count)
            .map(|c| CommunitySummary {
                id: c.id.clone(),
                member_count: c.member_count,
                doc_type_distribution: c.doc_type_distribution.clone(),
                top_technologies: c.top_technologies.clone(),
                top_companies: c.top_companies.clone(),
            })
            .collect();
        out.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(out)
    }

    async fn top_technologies(&self, quality_threshold: f64) -> GraphResult<Vec<TechnologySummary>> {
        let mut out: Vec<TechnologySummary> = self
            .technologies
            .values()
            .filter(|t| t.quality_score >= quality_threshold)
            .map(|t| {
                let mentions: Vec<&DocumentNode> =
                    self.mentions_for(&t.id).filter_map(|m| self.doc(&m.doc_id)).collect();
                let document_count = mentions.len();
                let doc_type_diversity = mentions
                    .iter()
                    .map(|d| d.doc_type)
                    .collect::<std::collections::HashSet<_>>()
                    .len();
                TechnologySummary {
                    id: t.id.clone(),
                    name: t.name.clone(),
                    domain: t.domain.clone(),
                    quality_score: t.quality_score,
                    pagerank: t.pagerank_or_default(),
                    document_count,
                    doc_type_diversity,
                    community_membership: t.community_membership.clone(),
                }
            })
            .collect();

        out.sort_by(|a, b| {
            b.pagerank
                .partial_cmp(&a.pagerank)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.doc_type_diversity.cmp(&a.doc_type_diversity))
                .then_with(|| b.document_count.cmp(&a.document_count))
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TechnologyNode;
    use chrono::TimeZone;

    fn ts(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn fixture() -> MemoryGraphStore {
        let mut store = MemoryGraphStore::new();
        store.technologies.insert(
            "tech-1".into(),
            TechnologyNode {
                id: "tech-1".into(),
                name: "Quantum Widgets".into(),
                domain: "hardware".into(),
                aliases: vec![],
                quality_score: 0.9,
                pagerank: Some(0.02),
                community_membership: HashMap::new(),
                embedding: None,
            },
        );
        store.documents.insert(
            "doc-1".into(),
            DocumentNode {
                doc_id: "doc-1".into(),
                doc_type: DocType::Patent,
                published_at: Some(ts(2025, 6, 1)),
                title: "Widget patent".into(),
                summary: String::new(),
                value_usd: None,
                citation_count: Some(4),
                outlet_tier: None,
                quality_score: 0.8,
                pagerank: Some(0.01),
                embedding: None,
            },
        );
        store.documents.insert(
            "doc-2".into(),
            DocumentNode {
                doc_id: "doc-2".into(),
                doc_type: DocType::Patent,
                published_at: Some(ts(2023, 1, 1)),
                title: "Old widget patent".into(),
                summary: String::new(),
                value_usd: None,
                citation_count: Some(1),
                outlet_tier: None,
                quality_score: 0.5,
                pagerank: Some(0.001),
                embedding: None,
            },
        );
        store.mentions.push(MentionedInEdge {
            subject_id: "tech-1".into(),
            doc_id: "doc-1".into(),
            role: "cites".into(),
            evidence_confidence: 0.9,
            evidence_text: "Widget patent discloses revenue impact".into(),
        });
        store.mentions.push(MentionedInEdge {
            subject_id: "tech-1".into(),
            doc_id: "doc-2".into(),
            role: "cites".into(),
            evidence_confidence: 0.9,
            evidence_text: "Old widget patent".into(),
        });
        store
    }

    #[tokio::test]
    async fn patent_activity_aggregates_window() {
        let store = fixture();
        let detail = store
            .patent_activity("tech-1", ts(2025, 1, 1), ts(2025, 12, 31))
            .await
            .unwrap();
        assert_eq!(detail.activity.patent_count, 1);
        assert_eq!(detail.activity.citation_sum, 4);
        assert_eq!(detail.top_patents.len(), 1);
        assert_eq!(detail.top_patents[0].doc_id, "doc-1");
    }

    #[tokio::test]
    async fn missing_technology_returns_empty_community_context() {
        let store = fixture();
        let ctx = store.community_context("no-such-tech", "v0").await.unwrap();
        assert!(ctx.community_id.is_none());
        assert_eq!(ctx.community_patent_count, 0);
    }

    #[tokio::test]
    async fn github_docs_never_enter_a_temporal_window() {
        let mut store = fixture();
        store.documents.insert(
            "doc-3".into(),
            DocumentNode {
                doc_id: "doc-3".into(),
                doc_type: DocType::Github,
                published_at: None,
                title: "repo".into(),
                summary: String::new(),
                value_usd: None,
                citation_count: None,
                outlet_tier: None,
                quality_score: 0.5,
                pagerank: None,
                embedding: None,
            },
        );
        store.mentions.push(MentionedInEdge {
            subject_id: "tech-1".into(),
            doc_id: "doc-3".into(),
            role: "implements".into(),
            evidence_confidence: 0.9,
            evidence_text: String::new(),
        });
        let detail = store
            .patent_activity("tech-1", ts(2000, 1, 1), ts(2030, 1, 1))
            .await
            .unwrap();
        // still only the two patent docs; the github doc has no doc_type match
        // here, but the in_window() guard is what matters for accessors that
        // would otherwise scan it.
        assert_eq!(detail.activity.patent_count, 2);
    }
}
