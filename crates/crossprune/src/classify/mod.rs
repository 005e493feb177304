pub mod engine;
pub mod policy;

pub use engine::{
    classify_records, is_externally_linked, Classification, Classifier, PartialAccessPolicy,
    Partition,
};
pub use policy::{ExclusionPolicy, ExclusionReason};
