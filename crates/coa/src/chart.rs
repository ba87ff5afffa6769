use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use khata_core::{AccountNature, DomainError, DomainResult, GroupId, LedgerId};

use crate::group::{CoaGroup, slug};
use crate::ledger::{CoaLedger, LedgerDraft, LedgerStatus, OpeningBalance, PostingRules};

/// The chart of accounts: owns groups and ledgers, exposes hierarchy lookups
/// and the create/delete guards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    groups: BTreeMap<GroupId, CoaGroup>,
    ledgers: BTreeMap<LedgerId, CoaLedger>,
}

/// One row of the rendered tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeNode<'a> {
    pub depth: u32,
    pub node: NodeRef<'a>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeRef<'a> {
    Group(&'a CoaGroup),
    Ledger(&'a CoaLedger),
}

impl Chart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a group under `parent_id` (None = top-level). Level and path
    /// are computed from the parent; a child group must share the parent's
    /// nature so the whole subtree reports under one statement.
    pub fn create_group(
        &mut self,
        name: impl Into<String>,
        nature: AccountNature,
        parent_id: Option<GroupId>,
    ) -> DomainResult<GroupId> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("group name is required"));
        }

        let (level, path) = match parent_id {
            None => (0, slug(&name)),
            Some(pid) => {
                let parent = self.require_group(pid)?;
                if parent.nature != nature {
                    return Err(DomainError::validation(format!(
                        "group nature {nature:?} does not match parent nature {:?}",
                        parent.nature
                    )));
                }
                (parent.level + 1, format!("{}.{}", parent.path, slug(&name)))
            }
        };

        if self.groups.values().any(|g| g.path == path) {
            return Err(DomainError::conflict(format!(
                "a group with path '{path}' already exists"
            )));
        }

        let id = GroupId::new();
        self.groups.insert(
            id,
            CoaGroup {
                id,
                name,
                nature,
                parent_id,
                level,
                path,
                is_system: false,
                is_active: true,
            },
        );
        Ok(id)
    }

    /// Create a leaf ledger from a draft. The opening side defaults from the
    /// nature; posting rules default to posting-enabled with the nature's
    /// normal balance.
    pub fn create_ledger(&mut self, draft: LedgerDraft) -> DomainResult<LedgerId> {
        if draft.name.trim().is_empty() {
            return Err(DomainError::validation("ledger name is required"));
        }
        let group = self.require_group(draft.group_id)?;
        if group.nature != draft.nature {
            return Err(DomainError::validation(format!(
                "ledger nature {:?} does not match group nature {:?}",
                draft.nature, group.nature
            )));
        }

        let drcr = draft
            .opening_drcr
            .unwrap_or_else(|| draft.nature.normal_balance());
        let opening = OpeningBalance::new(draft.opening_amount, drcr, draft.opening_as_of)?;

        let id = LedgerId::new();
        self.ledgers.insert(
            id,
            CoaLedger {
                id,
                name: draft.name,
                group_id: draft.group_id,
                nature: draft.nature,
                ledger_type: draft.ledger_type,
                posting: PostingRules::for_nature(draft.nature),
                opening,
                status: LedgerStatus::Active,
                bank: draft.bank,
                tags: draft.tags,
            },
        );
        Ok(id)
    }

    /// Delete a group. Rejected while any child group or ledger still hangs
    /// off it, and for system groups.
    pub fn delete_group(&mut self, id: GroupId) -> DomainResult<()> {
        let group = self.require_group(id)?;
        if group.is_system {
            return Err(DomainError::conflict("system groups cannot be deleted"));
        }
        if self.groups.values().any(|g| g.parent_id == Some(id)) {
            return Err(DomainError::conflict("group has child groups"));
        }
        if self.ledgers.values().any(|l| l.group_id == id) {
            return Err(DomainError::conflict("group has ledgers"));
        }
        self.groups.remove(&id);
        Ok(())
    }

    /// Delete a ledger. `is_referenced` reports whether any journal entry
    /// posts to it; the caller supplies it from the voucher log. This guard
    /// is a hard invariant, not a UI nicety.
    pub fn delete_ledger(
        &mut self,
        id: LedgerId,
        is_referenced: impl FnOnce(LedgerId) -> bool,
    ) -> DomainResult<()> {
        self.require_ledger(id)?;
        if is_referenced(id) {
            return Err(DomainError::conflict(
                "ledger is referenced by journal entries",
            ));
        }
        self.ledgers.remove(&id);
        Ok(())
    }

    pub fn set_ledger_status(&mut self, id: LedgerId, status: LedgerStatus) -> DomainResult<()> {
        match self.ledgers.get_mut(&id) {
            Some(l) => {
                l.status = status;
                Ok(())
            }
            None => Err(DomainError::not_found()),
        }
    }

    pub fn group(&self, id: GroupId) -> Option<&CoaGroup> {
        self.groups.get(&id)
    }

    pub fn ledger(&self, id: LedgerId) -> Option<&CoaLedger> {
        self.ledgers.get(&id)
    }

    pub fn require_group(&self, id: GroupId) -> DomainResult<&CoaGroup> {
        self.groups.get(&id).ok_or(DomainError::NotFound)
    }

    pub fn require_ledger(&self, id: LedgerId) -> DomainResult<&CoaLedger> {
        self.ledgers.get(&id).ok_or(DomainError::NotFound)
    }

    /// Ledger that exists, is active, and accepts postings. The shared
    /// precondition for every voucher entry.
    pub fn active_posting_ledger(&self, id: LedgerId) -> DomainResult<&CoaLedger> {
        let ledger = self.require_ledger(id)?;
        if !ledger.is_active() {
            return Err(DomainError::validation(format!(
                "ledger '{}' is inactive",
                ledger.name
            )));
        }
        if !ledger.posting.is_posting {
            return Err(DomainError::validation(format!(
                "ledger '{}' is not posting-enabled",
                ledger.name
            )));
        }
        Ok(ledger)
    }

    pub fn ledgers(&self) -> impl Iterator<Item = &CoaLedger> {
        self.ledgers.values()
    }

    pub fn ledgers_in_group(&self, id: GroupId) -> impl Iterator<Item = &CoaLedger> {
        self.ledgers.values().filter(move |l| l.group_id == id)
    }

    pub fn child_groups(&self, id: GroupId) -> impl Iterator<Item = &CoaGroup> {
        self.groups.values().filter(move |g| g.parent_id == Some(id))
    }

    /// First ledger carrying `tag` (e.g. the designated stock-adjustment
    /// ledger). Name-ordered so the result is deterministic when several
    /// ledgers share a tag.
    pub fn find_ledger_by_tag(&self, tag: &str) -> Option<&CoaLedger> {
        let mut tagged: Vec<&CoaLedger> = self.ledgers.values().filter(|l| l.has_tag(tag)).collect();
        tagged.sort_by(|a, b| a.name.cmp(&b.name));
        tagged.into_iter().next()
    }

    /// Lazy depth-first rendering of the hierarchy: each group, then its
    /// child groups recursively, then its ledgers, siblings name-sorted.
    /// The iterator borrows the chart and can be restarted by calling
    /// `render_tree` again.
    pub fn render_tree(&self) -> TreeIter<'_> {
        let mut roots: Vec<&CoaGroup> =
            self.groups.values().filter(|g| g.parent_id.is_none()).collect();
        roots.sort_by(|a, b| a.name.cmp(&b.name));
        let stack = roots
            .into_iter()
            .rev()
            .map(|g| TreeNode {
                depth: 0,
                node: NodeRef::Group(g),
            })
            .collect();
        TreeIter { chart: self, stack }
    }
}

/// Depth-first tree walker over a `Chart`.
pub struct TreeIter<'a> {
    chart: &'a Chart,
    stack: Vec<TreeNode<'a>>,
}

impl<'a> Iterator for TreeIter<'a> {
    type Item = TreeNode<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.stack.pop()?;
        if let NodeRef::Group(group) = item.node {
            let depth = item.depth + 1;

            // LIFO stack: push ledgers first so child groups come out first.
            let mut ledgers: Vec<&CoaLedger> =
                self.chart.ledgers_in_group(group.id).collect();
            ledgers.sort_by(|a, b| a.name.cmp(&b.name));
            for ledger in ledgers.into_iter().rev() {
                self.stack.push(TreeNode {
                    depth,
                    node: NodeRef::Ledger(ledger),
                });
            }

            let mut children: Vec<&CoaGroup> = self.chart.child_groups(group.id).collect();
            children.sort_by(|a, b| a.name.cmp(&b.name));
            for child in children.into_iter().rev() {
                self.stack.push(TreeNode {
                    depth,
                    node: NodeRef::Group(child),
                });
            }
        }
        Some(item)
    }
}
