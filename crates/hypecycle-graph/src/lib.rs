//! Graph query layer (component A): a typed, read-only accessor surface over
//! the intelligence property graph. Callers never see raw query fragments or
//! graph handles — only the owned, serde-friendly records defined here.

pub mod accessors;
pub mod memory_store;
pub mod model;
pub mod retry;

pub use accessors::{
    safe_ratio, CommunityContext, CommunitySummary, CompaniesDeveloping, CompanySummary,
    ContractActivity, ContractActivityDetail, DocSummary, GraphAccessors, GraphResult,
    InsiderTrading, NewsActivity, NewsActivityDetail, PaperActivity, PatentActivity,
    PatentActivityDetail, RegulationActivity, TechnologySummary,
};
pub use memory_store::{InsiderTradingRecord, MemoryGraphStore};
pub use model::{
    BelongsToCommunityEdge, CommunityNode, CompanyNode, CompanyTechRelation, DocumentNode,
    MentionedInEdge, RelatedToTechEdge, TechRelation, TechToTechEdge, TechnologyNode,
};
pub use retry::retry_graph_call;
