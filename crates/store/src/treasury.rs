use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, warn};

use khata_coa::{Chart, LedgerDraft, LedgerStatus};
use khata_core::{AccountNature, DomainError, GroupId, LedgerId, RequestId};
use khata_journal::{
    JournalVoucher, TrialBalance, VoucherEntry, compute_balance, compute_balances, trial_balance,
};
use khata_requests::{PaymentRequest, PaymentRequestStatus, Referral, ReferralStatus};
use khata_tax::TaxBreakup;
use khata_treasury::{
    CreditNoteRequest, DocumentMutation, InternalTransfer, Posting, PaymentSettlement,
    QualifyingOrder, StockReconciliation, build_credit_note, build_internal_transfer,
    build_payment, build_referral_commission, build_stock_adjustment,
};

use crate::collection::Collection;
use crate::error::{StoreError, StoreResult};
use crate::journal_log::JournalLog;

/// The treasury facade: chart, voucher log, and request documents behind one
/// lock, so a posting's voucher and document writes land atomically.
///
/// Every balance read runs the pure projection over the current log; there
/// is no cached figure to go stale.
#[derive(Debug, Default)]
pub struct Treasury {
    state: RwLock<State>,
}

#[derive(Debug, Default)]
struct State {
    chart: Chart,
    journal: JournalLog,
    payments: Collection<PaymentRequest>,
    referrals: Collection<Referral>,
}

impl Treasury {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chart(chart: Chart) -> Self {
        Self {
            state: RwLock::new(State {
                chart,
                journal: JournalLog::new(),
                payments: Collection::new(),
                referrals: Collection::new(),
            }),
        }
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, State>> {
        self.state.read().map_err(|_| StoreError::LockPoisoned)
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, State>> {
        self.state.write().map_err(|_| StoreError::LockPoisoned)
    }

    // --- chart management -------------------------------------------------

    pub fn create_group(
        &self,
        name: impl Into<String>,
        nature: AccountNature,
        parent_id: Option<GroupId>,
    ) -> StoreResult<GroupId> {
        Ok(self.write()?.chart.create_group(name, nature, parent_id)?)
    }

    pub fn create_ledger(&self, draft: LedgerDraft) -> StoreResult<LedgerId> {
        Ok(self.write()?.chart.create_ledger(draft)?)
    }

    pub fn delete_group(&self, id: GroupId) -> StoreResult<()> {
        Ok(self.write()?.chart.delete_group(id)?)
    }

    /// Delete a ledger; rejected while any committed voucher references it.
    pub fn delete_ledger(&self, id: LedgerId) -> StoreResult<()> {
        let mut state = self.write()?;
        let State { chart, journal, .. } = &mut *state;
        Ok(chart.delete_ledger(id, |ledger_id| journal.references(ledger_id))?)
    }

    pub fn set_ledger_status(&self, id: LedgerId, status: LedgerStatus) -> StoreResult<()> {
        Ok(self.write()?.chart.set_ledger_status(id, status)?)
    }

    pub fn chart(&self) -> StoreResult<Chart> {
        Ok(self.read()?.chart.clone())
    }

    pub fn vouchers(&self) -> StoreResult<Vec<JournalVoucher>> {
        Ok(self.read()?.journal.vouchers().to_vec())
    }

    // --- request documents ------------------------------------------------

    pub fn add_payment_request(&self, request: PaymentRequest) -> StoreResult<RequestId> {
        let id = request.id;
        self.write()?.payments.insert(request);
        Ok(id)
    }

    pub fn payment_request(&self, id: RequestId) -> StoreResult<PaymentRequest> {
        self.read()?
            .payments
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::MissingDocument(id.to_string()))
    }

    /// Status change at the write boundary: transition table + version bump
    /// under the write lock.
    pub fn update_payment_status(
        &self,
        id: RequestId,
        to: PaymentRequestStatus,
    ) -> StoreResult<()> {
        let mut state = self.write()?;
        let current = state
            .payments
            .get(&id)
            .map(|d| d.version)
            .ok_or_else(|| StoreError::MissingDocument(id.to_string()))?;
        state
            .payments
            .update_versioned(&id, current, |doc| Ok(doc.set_status(to)?))
    }

    pub fn add_referral(&self, referral: Referral) -> StoreResult<RequestId> {
        let id = referral.id;
        self.write()?.referrals.insert(referral);
        Ok(id)
    }

    pub fn referral(&self, id: RequestId) -> StoreResult<Referral> {
        self.read()?
            .referrals
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::MissingDocument(id.to_string()))
    }

    // --- posting ----------------------------------------------------------

    /// Manual journal entry: validate every line against the chart (ledger
    /// exists, active, posting-enabled, open to manual journals), then
    /// append.
    pub fn post_voucher(
        &self,
        date: NaiveDate,
        narration: impl Into<String>,
        entries: Vec<VoucherEntry>,
        now: DateTime<Utc>,
    ) -> StoreResult<u64> {
        let mut state = self.write()?;
        for entry in &entries {
            let ledger = state.chart.active_posting_ledger(entry.ledger_id)?;
            if !ledger.posting.allow_manual_journal {
                return Err(StoreError::Domain(DomainError::validation(format!(
                    "ledger '{}' does not accept manual journal entries",
                    ledger.name
                ))));
            }
        }
        let voucher = JournalVoucher::balanced(date, narration, entries, now)?;
        let sequence = state.journal.append(voucher);
        debug!(sequence, "posted manual voucher");
        Ok(sequence)
    }

    /// Execute a builder's posting atomically: guards, then mutation
    /// preconditions, then the voucher append and document writes. Nothing
    /// is applied unless everything validates.
    pub fn commit(&self, posting: Posting) -> StoreResult<Option<u64>> {
        let mut state = self.write()?;

        for guard in &posting.guards {
            let actual = state.journal.touching_count(guard.ledger_id);
            if !guard.expected.matches(actual) {
                warn!(
                    ledger = %guard.ledger_id,
                    expected = ?guard.expected,
                    actual,
                    "rejecting posting: ledger history moved since the snapshot"
                );
                return Err(StoreError::Concurrency(format!(
                    "ledger {} history moved (expected {:?}, found {actual})",
                    guard.ledger_id, guard.expected
                )));
            }
        }

        // Validate every mutation before applying anything.
        for mutation in &posting.mutations {
            match mutation {
                DocumentMutation::PaymentStatus {
                    request_id,
                    to,
                    expected_version,
                } => {
                    let doc = state.payments.check_version(request_id, *expected_version)?;
                    doc.status.transition(*to)?;
                }
                DocumentMutation::ReferralCredited {
                    referral_id,
                    expected_version,
                    ..
                } => {
                    let doc = state.referrals.check_version(referral_id, *expected_version)?;
                    doc.status.transition(ReferralStatus::Credited)?;
                }
            }
        }

        let sequence = match posting.voucher {
            Some(voucher) => Some(state.journal.append(voucher)),
            None => None,
        };

        for mutation in posting.mutations {
            match mutation {
                DocumentMutation::PaymentStatus {
                    request_id,
                    to,
                    expected_version,
                } => {
                    state
                        .payments
                        .update_versioned(&request_id, expected_version, |doc| {
                            Ok(doc.set_status(to)?)
                        })?;
                }
                DocumentMutation::ReferralCredited {
                    referral_id,
                    commission,
                    expected_version,
                } => {
                    state
                        .referrals
                        .update_versioned(&referral_id, expected_version, |doc| {
                            Ok(doc.credit(commission)?)
                        })?;
                }
            }
        }

        debug!(?sequence, "committed posting");
        Ok(sequence)
    }

    // --- builder entry points --------------------------------------------

    /// Internal transfer. The balance precondition is validated against a
    /// snapshot; the optimistic guard makes a stale snapshot fail the
    /// commit instead of double-spending.
    pub fn transfer(&self, event: InternalTransfer) -> StoreResult<Option<u64>> {
        let posting = {
            let state = self.read()?;
            build_internal_transfer(&event, &state.chart, state.journal.vouchers())?
        };
        self.commit(posting)
    }

    /// Settle an approved payment request from a bank/cash ledger.
    pub fn settle_payment(
        &self,
        request_id: RequestId,
        paying_ledger: LedgerId,
        date: NaiveDate,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<u64>> {
        let posting = {
            let state = self.read()?;
            let request = state
                .payments
                .get(&request_id)
                .cloned()
                .ok_or_else(|| StoreError::MissingDocument(request_id.to_string()))?;
            build_payment(
                &PaymentSettlement {
                    request,
                    paying_ledger,
                    date,
                    now,
                },
                &state.chart,
            )?
        };
        self.commit(posting)
    }

    pub fn reconcile_stock(&self, event: StockReconciliation) -> StoreResult<Option<u64>> {
        let posting = {
            let state = self.read()?;
            build_stock_adjustment(&event, &state.chart)?
        };
        self.commit(posting)
    }

    pub fn issue_credit_note(
        &self,
        event: CreditNoteRequest,
    ) -> StoreResult<(TaxBreakup, Option<u64>)> {
        let outcome = {
            let state = self.read()?;
            build_credit_note(&event, &state.chart)?
        };
        let sequence = self.commit(outcome.posting)?;
        Ok((outcome.breakup, sequence))
    }

    pub fn credit_referral(&self, order: QualifyingOrder) -> StoreResult<()> {
        let posting = {
            let state = self.read()?;
            build_referral_commission(&order, &state.referrals.list())?
        };
        self.commit(posting)?;
        Ok(())
    }

    // --- balance reads ----------------------------------------------------

    /// Signed balance for every ledger, recomputed from scratch.
    pub fn balances(&self) -> StoreResult<BTreeMap<LedgerId, i64>> {
        let state = self.read()?;
        let ledgers: Vec<_> = state.chart.ledgers().cloned().collect();
        Ok(compute_balances(&ledgers, state.journal.vouchers()))
    }

    pub fn balance_of(&self, id: LedgerId) -> StoreResult<i64> {
        let state = self.read()?;
        let ledger = state.chart.require_ledger(id)?;
        Ok(compute_balance(ledger, state.journal.vouchers()))
    }

    pub fn trial_balance(&self) -> StoreResult<TrialBalance> {
        let state = self.read()?;
        let ledgers: Vec<_> = state.chart.ledgers().cloned().collect();
        Ok(trial_balance(&ledgers, state.journal.vouchers()))
    }
}
