//! Stratified sampler (component B, spec §4.B): selects `tech_count`
//! technologies distributed across four community-maturity strata in a
//! configurable proportion.

use std::collections::HashSet;

use hypecycle_core::{CommunityMaturityClass, PipelineError, StratumProportions};
use hypecycle_graph::{CommunitySummary, GraphAccessors, TechnologySummary};
use tracing::{instrument, warn};

/// Classifies a community from its document-type distribution (spec §4.B
/// step 3, first-match-wins).
pub fn classify_community(summary: &CommunitySummary) -> CommunityMaturityClass {
    let p = *summary
        .doc_type_distribution
        .get(&hypecycle_core::DocType::Patent)
        .unwrap_or(&0) as f64;
    let n = *summary
        .doc_type_distribution
        .get(&hypecycle_core::DocType::News)
        .unwrap_or(&0) as f64;
    let c = *summary
        .doc_type_distribution
        .get(&hypecycle_core::DocType::GovernmentContract)
        .unwrap_or(&0);

    let patent_news_ratio = p / n.max(1.0);
    let news_patent_ratio = n / p.max(1.0);

    if patent_news_ratio > 2.0 && c > 5 {
        CommunityMaturityClass::LateStage
    } else if news_patent_ratio > 2.0 && c <= 2 {
        CommunityMaturityClass::HypeStage
    } else if patent_news_ratio > 1.5 && c <= 2 {
        CommunityMaturityClass::EarlyStage
    } else {
        CommunityMaturityClass::MidStage
    }
}

fn target_for(class: CommunityMaturityClass, proportions: &StratumProportions, n: usize) -> usize {
    let p = match class {
        CommunityMaturityClass::EarlyStage => proportions.early,
        CommunityMaturityClass::MidStage => proportions.mid,
        CommunityMaturityClass::LateStage => proportions.late,
        CommunityMaturityClass::HypeStage => proportions.hype,
    };
    (n as f64 * p).round() as usize
}

/// Total order over candidates within a stratum: `(pagerank desc,
/// doc_type_diversity desc, total_docs desc, id asc)` (spec §4.B step 4).
fn candidate_cmp(a: &TechnologySummary, b: &TechnologySummary) -> std::cmp::Ordering {
    b.pagerank
        .partial_cmp(&a.pagerank)
        .unwrap_or(std::cmp::Ordering::Equal)
        .then_with(|| b.doc_type_diversity.cmp(&a.doc_type_diversity))
        .then_with(|| b.document_count.cmp(&a.document_count))
        .then_with(|| a.id.cmp(&b.id))
}

/// Select `tech_count` technologies for analysis (spec §4.B). `graph` is
/// queried for communities and the global qualifying-technology list;
/// everything else is pure.
#[instrument(skip(graph))]
pub async fn select_technologies(
    graph: &dyn GraphAccessors,
    community_version: &str,
    min_community_members: usize,
    tech_count: usize,
    min_document_count: usize,
    proportions: &StratumProportions,
) -> Result<Vec<TechnologySummary>, PipelineError> {
    if tech_count == 0 {
        return Ok(Vec::new());
    }

    let communities = graph
        .all_communities(community_version, min_community_members)
        .await
        .map_err(PipelineError::from)?;

    let mut all_qualifying = graph
        .top_technologies(0.75)
        .await
        .map_err(PipelineError::from)?;
    all_qualifying.retain(|t| t.document_count >= min_document_count);
    all_qualifying.sort_by(candidate_cmp);

    let community_of_tech: std::collections::HashMap<&str, CommunityMaturityClass> = all_qualifying
        .iter()
        .filter_map(|t| {
            let community_id = t.community_membership.get(community_version)?;
            let community = communities.iter().find(|c| &c.id == community_id)?;
            Some((t.id.as_str(), classify_community(community)))
        })
        .collect();

    let mut selected: Vec<TechnologySummary> = Vec::new();
    let mut selected_ids: HashSet<String> = HashSet::new();

    for class in [
        CommunityMaturityClass::EarlyStage,
        CommunityMaturityClass::MidStage,
        CommunityMaturityClass::LateStage,
        CommunityMaturityClass::HypeStage,
    ] {
        let target = target_for(class, proportions, tech_count);
        if target == 0 {
            continue;
        }
        let mut candidates: Vec<&TechnologySummary> = all_qualifying
            .iter()
            .filter(|t| community_of_tech.get(t.id.as_str()) == Some(&class))
            .filter(|t| !selected_ids.contains(&t.id))
            .take(2 * target)
            .collect();
        candidates.truncate(target);
        for tech in candidates {
            selected_ids.insert(tech.id.clone());
            selected.push(tech.clone());
        }
    }

    if selected.len() < tech_count {
        let shortfall = tech_count - selected.len();
        let fallback: Vec<&TechnologySummary> = all_qualifying
            .iter()
            .filter(|t| !selected_ids.contains(&t.id))
            .take(shortfall)
            .collect();
        for tech in fallback {
            selected_ids.insert(tech.id.clone());
            selected.push(tech.clone());
        }
    }

    if selected.len() < tech_count {
        warn!(
            requested = tech_count,
            found = selected.len(),
            "fewer qualifying technologies than requested; returning all available"
        );
    }

    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hypecycle_core::DocType;
    use std::collections::HashMap;

    fn community(id: &str, patents: usize, news: usize, contracts: usize) -> CommunitySummary {
        let mut dist = HashMap::new();
        dist.insert(DocType::Patent, patents);
        dist.insert(DocType::News, news);
        dist.insert(DocType::GovernmentContract, contracts);
        CommunitySummary {
            id: id.to_string(),
            member_count: 10,
            doc_type_distribution: dist,
            top_technologies: vec![],
            top_companies: vec![],
        }
    }

    #[test]
    fn classifies_late_stage() {
        let c = community("c1", 20, 5, 6);
        assert_eq!(classify_community(&c), CommunityMaturityClass::LateStage);
    }

    #[test]
    fn classifies_hype_stage() {
        let c = community("c2", 2, 10, 1);
        assert_eq!(classify_community(&c), CommunityMaturityClass::HypeStage);
    }

    #[test]
    fn classifies_early_stage() {
        let c = community("c3", 10, 5, 1);
        assert_eq!(classify_community(&c), CommunityMaturityClass::EarlyStage);
    }

    #[test]
    fn classifies_mid_stage_by_default() {
        let c = community("c4", 5, 5, 5);
        assert_eq!(classify_community(&c), CommunityMaturityClass::MidStage);
    }

    #[tokio::test]
    async fn zero_tech_count_returns_empty() {
        let store = hypecycle_graph::MemoryGraphStore::new();
        let selected = select_technologies(&store, "v1", 3, 0, 5, &StratumProportions::default())
            .await
            .unwrap();
        assert!(selected.is_empty());
    }
}
