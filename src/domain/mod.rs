// Domain layer - Feed data models and pure rules
pub mod category;
pub mod earthquake;
pub mod geo;
pub mod layer;
pub mod orbit;
pub mod snapshot;
pub mod storm;
