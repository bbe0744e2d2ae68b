pub mod inventory;
pub mod outcome;
pub mod record;

pub use inventory::{
    Credentials, GroupRef, HostHandle, InterfaceSpec, ProxyRef, SessionToken, TemplateRef,
};
pub use outcome::{HostOutcome, RunSummary, SyncOutcome};
pub use record::{HostRecord, ParsedFile};
