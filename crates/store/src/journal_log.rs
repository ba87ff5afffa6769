use khata_core::LedgerId;
use khata_journal::JournalVoucher;

/// Append-only voucher log.
///
/// Vouchers are never mutated or removed once appended; each gets a
/// monotonically increasing sequence number in commit order, the final
/// tie-breaker behind (date, created_at).
#[derive(Debug, Clone, Default)]
pub struct JournalLog {
    vouchers: Vec<JournalVoucher>,
}

impl JournalLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a voucher, returning its sequence number (1-based).
    pub fn append(&mut self, voucher: JournalVoucher) -> u64 {
        self.vouchers.push(voucher);
        self.vouchers.len() as u64
    }

    pub fn len(&self) -> usize {
        self.vouchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vouchers.is_empty()
    }

    /// Snapshot in commit order.
    pub fn vouchers(&self) -> &[JournalVoucher] {
        &self.vouchers
    }

    /// Number of committed vouchers touching `ledger_id`: the per-ledger
    /// version the optimistic transfer guard checks.
    pub fn touching_count(&self, ledger_id: LedgerId) -> u64 {
        self.vouchers.iter().filter(|v| v.touches(ledger_id)).count() as u64
    }

    /// Whether any entry references `ledger_id` (ledger-deletion guard).
    pub fn references(&self, ledger_id: LedgerId) -> bool {
        self.vouchers.iter().any(|v| v.touches(ledger_id))
    }
}
