//! Evidence compiler (component H, spec §4.H): assembles each layer's
//! citation list from documents already retrieved by the graph accessors.
//! No new graph queries; pure aggregation, capped at five citations per
//! layer.

use std::collections::HashMap;

use hypecycle_core::{Citation, DocType, EvidenceBlock};
use hypecycle_graph::DocSummary;

const MAX_CITATIONS_PER_LAYER: usize = 5;

fn to_citations(docs: &[DocSummary]) -> Vec<Citation> {
    docs.iter()
        .take(MAX_CITATIONS_PER_LAYER)
        .map(|d| Citation {
            doc_id: d.doc_id.clone(),
            doc_type: d.doc_type,
            title: d.title.clone(),
            url: d.url.clone(),
            date: d.published_at,
            score: d.score,
            metadata: d.metadata.clone(),
        })
        .collect()
}

/// Compiles the four-layer evidence block from each layer's top-K document
/// lists (spec §4.H).
pub fn compile_evidence(
    top_patents: &[DocSummary],
    top_contracts: &[DocSummary],
    top_articles: &[DocSummary],
) -> EvidenceBlock {
    EvidenceBlock {
        innovation: to_citations(top_patents),
        adoption: to_citations(top_contracts),
        narrative: to_citations(top_articles),
        risk: Vec::new(),
    }
}

/// Tallies the same top-K document lists by doc type (spec §3.1 "document
/// counts"), feeding the chart record's `evidence_counts` map (spec §6.1).
pub fn count_document_types(
    top_patents: &[DocSummary],
    top_contracts: &[DocSummary],
    top_articles: &[DocSummary],
) -> HashMap<DocType, usize> {
    let mut counts = HashMap::new();
    for doc in top_patents.iter().chain(top_contracts).chain(top_articles) {
        *counts.entry(doc.doc_type).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: &str) -> DocSummary {
        DocSummary {
            doc_id: id.to_string(),
            doc_type: DocType::Patent,
            title: id.to_string(),
            url: None,
            published_at: None,
            score: 0.5,
            metadata: HashMap::new(),
        }
    }

    #[test]
    fn caps_at_five_citations_per_layer() {
        let docs: Vec<DocSummary> = (0..10).map(|i| doc(&format!("doc-{i}"))).collect();
        let evidence = compile_evidence(&docs, &[], &[]);
        assert_eq!(evidence.innovation.len(), 5);
    }

    #[test]
    fn counts_documents_by_doc_type_not_by_layer() {
        let patents = vec![doc("p1"), doc("p2")];
        let mut contract = doc("c1");
        contract.doc_type = DocType::GovernmentContract;
        let counts = count_document_types(&patents, &[contract], &[]);
        assert_eq!(counts.get(&DocType::Patent), Some(&2));
        assert_eq!(counts.get(&DocType::GovernmentContract), Some(&1));
        assert_eq!(counts.get(&DocType::News), None);
    }
}
