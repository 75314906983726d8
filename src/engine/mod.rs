mod matcher;
pub mod policy;
mod registry;

pub use matcher::DomainList;
pub use policy::{compute_icon_state, evaluate_policy, IconState, TabPolicy};
pub use registry::{ListKind, ListRegistry};
