use serde::{Deserialize, Serialize};

use khata_core::{AccountNature, Entity, GroupId, Statement};

/// Hierarchical chart-of-accounts node. Groups never receive postings; they
/// organize ledgers for reporting and display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoaGroup {
    pub id: GroupId,
    pub name: String,
    pub nature: AccountNature,
    /// None means top-level.
    pub parent_id: Option<GroupId>,
    /// Depth in the hierarchy, root = 0. Invariant: `level = parent.level + 1`.
    pub level: u32,
    /// Dot-delimited slug ancestry, unique across the chart.
    /// Invariant: `path = parent.path + "." + slug(name)`.
    pub path: String,
    pub is_system: bool,
    pub is_active: bool,
}

impl CoaGroup {
    pub fn statement(&self) -> Statement {
        self.nature.statement()
    }
}

impl Entity for CoaGroup {
    type Id = GroupId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Path segment for a group name: lowercased, non-alphanumerics collapsed to
/// single dashes.
pub(crate) fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut dash_pending = false;
    for ch in name.trim().chars() {
        if ch.is_alphanumeric() {
            if dash_pending && !out.is_empty() {
                out.push('-');
            }
            dash_pending = false;
            out.extend(ch.to_lowercase());
        } else {
            dash_pending = true;
        }
    }
    out
}
