pub mod catalog;
pub mod compatibility;
pub mod resolver;
pub mod selector;

pub use catalog::{CatalogQuery, ImageCatalog};
pub use resolver::{find_candidates, resolve, CandidateSet, MatchStage};
