mod element;
mod geometry;
mod inverse_entry;
mod log_entry;
mod remap_table;
mod rollback_request;
mod session;

pub use element::{ElementCategory, ElementId, LiveId, SlotId};
pub use geometry::{Curve, Plane, Xyz, GEOMETRY_TOLERANCE};
pub use inverse_entry::{InverseLogEntry, InversePayload, ModifiedCommon, SparsePatch};
pub use log_entry::{
    AttributeValue, CommandType, CommonInfo, EntryInfo, LogEntry, ParameterSection,
    ParameterValue, Section, StorageKind,
};
pub use remap_table::{RemapTable, Resolution};
pub use rollback_request::{RollbackRequest, RollbackScope, ScopeTarget};
pub use session::{SessionDocument, SessionInfo};
