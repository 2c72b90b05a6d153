//! proposal
//!
//! The write path: proposing new items and moderating the resulting change
//! requests. All host calls here are sequential.

pub mod moderation;
pub mod writer;

pub use moderation::{approve, list_proposals, reject, ModerationResult, ModerationStatus};
pub use writer::{
    create_proposal, default_branch_name, item_label, ProposalReceipt, ProposalRequest,
    DEFAULT_BASE_BRANCH,
};
