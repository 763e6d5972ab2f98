//! Pipeline orchestrator (component K, spec §4.K): executes the
//! per-technology twelve-stage DAG and the batch-level bounded fan-out.
//!
//! Stage order (spec §4.K): `1 -> {2,3,4,5} -> 6 -> 7 -> 8 -> 9 -> {10,11}
//! -> 12`. Stages 2-5 are the four layer scorers; 6 is the hype deriver; 7
//! is the phase classifier; 8 is the narrative generator; 9 is the
//! ensemble positioner; 10 is the evidence compiler; 11 is left for a
//! future per-tech side output (audit log) and is a no-op here; 12 is the
//! output validator. Chart formatting (component I) runs once per
//! technology after validation, and again at the batch level to build the
//! chart document.

use std::sync::Arc;

use chrono::NaiveDate;
use futures::stream::{self, StreamExt};
use hypecycle_ai::LlmProvider;
use hypecycle_core::{PipelineConfig, TechAnalysisState};
use hypecycle_graph::GraphAccessors;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use crate::external_search::ExternalSearchProvider;
use crate::scorers::{AdoptionScorer, InnovationScorer, LayerScorer, NarrativeScorer, RiskScorer, ScoringInput};
use crate::{chart_formatter, ensemble, evidence, hype, narrative_gen, phase, validate};

/// A technology selected for analysis: id, display name, and domain (spec
/// §6.2 `analyze_one`/`analyze_many` arguments).
#[derive(Debug, Clone)]
pub struct TechRef {
    pub id: String,
    pub name: String,
    pub domain: String,
}

pub struct Pipeline {
    graph: Arc<dyn GraphAccessors>,
    llm: Arc<dyn LlmProvider>,
    external_search: Arc<dyn ExternalSearchProvider>,
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(
        graph: Arc<dyn GraphAccessors>,
        llm: Arc<dyn LlmProvider>,
        external_search: Arc<dyn ExternalSearchProvider>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            graph,
            llm,
            external_search,
            config,
        }
    }

    fn anchor_date(&self) -> NaiveDate {
        self.config.analysis_anchor_date.unwrap_or_else(|| {
            warn!("no analysis_anchor_date configured; pipeline core must not read the system clock outside this one entry point");
            chrono::Utc::now().date_naive()
        })
    }

    /// Runs the full per-technology DAG for one technology (spec §6.2
    /// `analyze_one`). Every stage catches its own errors and degrades
    /// gracefully (spec §4.K "Error containment") — this function itself
    /// never returns an `Err`.
    #[instrument(skip(self), fields(tech_id = %tech.id))]
    pub async fn analyze_one(&self, tech: &TechRef) -> TechAnalysisState {
        let anchor_date = self.anchor_date();
        let mut state = TechAnalysisState::new(
            &tech.id,
            &tech.name,
            &tech.domain,
            self.config.enable_external_search,
            &self.config.community_version,
            self.config.min_document_count,
        );
        let mut errors: Vec<String> = Vec::new();

        let input = ScoringInput {
            graph: self.graph.as_ref(),
            llm: self.llm.as_ref(),
            external_search: self.external_search.as_ref(),
            enable_external_search: self.config.enable_external_search,
            tech_id: &tech.id,
            tech_name: &tech.name,
            community_version: &self.config.community_version,
            anchor_date,
            temperature: 0.0,
        };

        // Stages 2-5: layer scorers. Spec allows interleaved concurrency
        // here; run sequentially for a simpler, still-correct state machine
        // (spec §4.K: "optional; serial execution is valid").
        let innovation_input = ScoringInput {
            temperature: self.config.temperatures.innovation,
            ..clone_input(&input)
        };
        let mut innovation_errors = Vec::new();
        let innovation_block = InnovationScorer.score(&innovation_input, &mut innovation_errors).await;
        errors.extend(innovation_errors);
        state.set_layer_block(hypecycle_core::Layer::Innovation, innovation_block);

        let adoption_input = ScoringInput {
            temperature: self.config.temperatures.adoption,
            ..clone_input(&input)
        };
        let mut adoption_errors = Vec::new();
        let adoption_block = AdoptionScorer.score(&adoption_input, &mut adoption_errors).await;
        errors.extend(adoption_errors);
        state.set_layer_block(hypecycle_core::Layer::Adoption, adoption_block);

        let narrative_input = ScoringInput {
            temperature: self.config.temperatures.narrative,
            ..clone_input(&input)
        };
        let mut narrative_errors = Vec::new();
        let narrative_block = NarrativeScorer.score(&narrative_input, &mut narrative_errors).await;
        errors.extend(narrative_errors);
        state.set_layer_block(hypecycle_core::Layer::Narrative, narrative_block);

        let risk_input = ScoringInput {
            temperature: self.config.temperatures.risk,
            ..clone_input(&input)
        };
        let mut risk_errors = Vec::new();
        let risk_block = RiskScorer.score(&risk_input, &mut risk_errors).await;
        errors.extend(risk_errors);
        state.set_layer_block(hypecycle_core::Layer::Risk, risk_block);

        let innovation_score = state.layer_block(hypecycle_core::Layer::Innovation).score;
        let adoption_score = state.layer_block(hypecycle_core::Layer::Adoption).score;
        let narrative_score = state.layer_block(hypecycle_core::Layer::Narrative).score;
        let risk_score = state.layer_block(hypecycle_core::Layer::Risk).score;

        // Stage 6: hype deriver.
        let hype_block = hype::derive_hype(innovation_score, adoption_score, narrative_score, risk_score);
        let hype_score = hype_block.hype_score;
        state.set_hype(hype_block);

        // Stage 7: phase classifier.
        let phase_code = phase::classify_phase(innovation_score, adoption_score, narrative_score, risk_score, hype_score);
        let phase_confidence = phase::phase_confidence(innovation_score, adoption_score, narrative_score);
        state.set_phase(hypecycle_core::PhaseBlock {
            hype_cycle_phase: phase_code,
            phase_reasoning: format!("rule-based classification into {phase_code:?}"),
            phase_confidence,
            phase_position: hypecycle_core::PhasePosition::Early,
        });

        // Stage 8: narrative generator.
        let narrative_block = narrative_gen::generate_narrative(
            self.llm.as_ref(),
            &tech.name,
            innovation_score,
            adoption_score,
            narrative_score,
            risk_score,
            hype_score,
            phase_code,
            state.hype.as_ref().unwrap().layer_divergence,
            self.config.temperatures.narrative_generator,
        )
        .await;
        state.set_narrative_gen(narrative_block);

        // Stage 9: ensemble positioner.
        let chart_position = ensemble::position(phase_code, innovation_score, adoption_score, narrative_score, hype_score);
        let weighted = ensemble::weighted_score(
            innovation_score,
            adoption_score,
            narrative_score,
            risk_score,
            &self.config.layer_weights,
        );
        // Phase position was a placeholder above; correct it now that the
        // ensemble positioner has computed the real sub-classification.
        state.set_phase_position(chart_position.position);
        state.set_chart(hypecycle_core::ChartBlock {
            chart_x: chart_position.chart_x,
            chart_y: chart_position.chart_y,
            weighted_score: weighted,
            hype_cycle_phase_display: phase_code.display_name().to_string(),
        });

        // Stage 10: evidence compiler. Re-fetches the same top-K document
        // lists the scorers already retrieved (accessors are idempotent and
        // side-effect free, spec §4.A) rather than threading them through
        // the scorer's metrics payload.
        let end = anchor_date.and_hms_opt(0, 0, 0).unwrap().and_utc();
        let patents = hypecycle_graph::retry_graph_call(3, || {
            self.graph.patent_activity(
                &tech.id,
                end - chrono::Duration::days(hypecycle_core::Layer::Innovation.temporal_window_days()),
                end,
            )
        })
        .await
        .unwrap_or_default();
        let contracts = hypecycle_graph::retry_graph_call(3, || {
            self.graph.contract_activity(
                &tech.id,
                end - chrono::Duration::days(hypecycle_core::Layer::Adoption.temporal_window_days()),
                end,
            )
        })
        .await
        .unwrap_or_default();
        let news = hypecycle_graph::retry_graph_call(3, || {
            self.graph.news_activity(
                &tech.id,
                end - chrono::Duration::days(hypecycle_core::Layer::Narrative.temporal_window_days()),
                end,
            )
        })
        .await
        .unwrap_or_default();
        state.set_document_counts(evidence::count_document_types(
            &patents.top_patents,
            &contracts.top_contracts,
            &news.top_articles,
        ));
        state.set_evidence(evidence::compile_evidence(
            &patents.top_patents,
            &contracts.top_contracts,
            &news.top_articles,
        ));

        // Stage 12: output validator (stage 11, a per-tech audit-log side
        // output, is a deliberate no-op in this implementation).
        let validation_block = validate::validate(&state, &errors);
        state.set_validation(validation_block);

        state
    }

    /// Runs `analyze_one` across many technologies with bounded
    /// cross-technology concurrency `C` (spec §6.2 `analyze_many`, §4.K
    /// "Cross-tech parallelism"). Honors `cancel`: in-flight technologies
    /// complete, no new ones start once cancellation is requested (spec
    /// §5.4).
    #[instrument(skip(self, techs, cancel))]
    pub async fn analyze_many(&self, techs: &[TechRef], cancel: CancellationToken) -> Vec<TechAnalysisState> {
        let semaphore = Arc::new(Semaphore::new(self.config.concurrency));
        let cancel = cancel.clone();

        let results: Vec<Option<TechAnalysisState>> = stream::iter(techs.iter().cloned())
            .map(|tech| {
                let semaphore = Arc::clone(&semaphore);
                let cancel = cancel.clone();
                async move {
                    if cancel.is_cancelled() {
                        return None;
                    }
                    let _permit = semaphore.acquire().await.expect("semaphore is never closed");
                    if cancel.is_cancelled() {
                        return None;
                    }
                    Some(self.analyze_one(&tech).await)
                }
            })
            .buffer_unordered(self.config.concurrency)
            .collect()
            .await;

        let completed: Vec<TechAnalysisState> = results.into_iter().flatten().collect();
        info!(requested = techs.len(), completed = completed.len(), "batch analysis complete");
        completed
    }

    /// Samples technologies, runs the batch, and assembles the chart
    /// document (spec §6.2 `generate_chart`).
    pub async fn generate_chart(&self, cancel: CancellationToken) -> hypecycle_core::ChartDocument {
        let samples = crate::sampler::select_technologies(
            self.graph.as_ref(),
            &self.config.community_version,
            self.config.min_community_members,
            self.config.tech_count,
            self.config.min_document_count,
            &self.config.stratum_proportions,
        )
        .await
        .unwrap_or_default();

        let techs: Vec<TechRef> = samples
            .into_iter()
            .map(|t| TechRef {
                id: t.id,
                name: t.name,
                domain: t.domain,
            })
            .collect();

        let states = self.analyze_many(&techs, cancel).await;
        let records: Vec<hypecycle_core::TechChartRecord> =
            states.iter().map(chart_formatter::format_tech_record).collect();

        let mut sorted = records;
        sorted.sort_by(|a, b| a.id.cmp(&b.id));

        chart_formatter::format_chart_document(
            sorted,
            &self.config.community_version,
            &self.config.layer_weights,
            self.anchor_date(),
            chrono::Utc::now(),
        )
    }
}

fn clone_input<'a>(input: &ScoringInput<'a>) -> ScoringInput<'a> {
    ScoringInput {
        graph: input.graph,
        llm: input.llm,
        external_search: input.external_search,
        enable_external_search: input.enable_external_search,
        tech_id: input.tech_id,
        tech_name: input.tech_name,
        community_version: input.community_version,
        anchor_date: input.anchor_date,
        temperature: input.temperature,
    }
}
