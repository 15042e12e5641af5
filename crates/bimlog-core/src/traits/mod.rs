mod live_model;

pub use live_model::{ElementBlueprint, ElementPatch, Flip, LiveModel, LookupKey, Placement};
