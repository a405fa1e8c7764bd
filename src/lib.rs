#![forbid(unsafe_code)]
#![warn(clippy::wildcard_enum_match_arm)]

pub mod collections;
pub mod queue;

pub use queue::{
    Direction,
    Element,
    Group,
    GroupEntry,
    Queue,
    QueueContext,
    QueueError,
    QueueResult,
    SortOrder,
    VerifyError,
};
