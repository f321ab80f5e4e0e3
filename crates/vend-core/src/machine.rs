//! # Machine
//!
//! The transactional aggregate: balance, sales total, catalog and log.
//!
//! ## Purchase Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   ┌────────┐ insert_funds / credit_card ┌────────┐                      │
//! │   │  Idle  │ ─────────────────────────► │ Funded │ ◄──┐ more funds      │
//! │   │ bal ≥0 │ ◄───────────────────────── │ bal >0 │ ───┘                 │
//! │   └────────┘   cancel (eject balance)   └───┬────┘                      │
//! │        ▲                                    │ purchase(code)            │
//! │        │                                    ▼                           │
//! │        │        ┌──────────────────────────────────────────┐           │
//! │        │        │ 1. code in catalog?     else InvalidProduct│          │
//! │        │        │ 2. quantity > 0?        else OutOfStock    │          │
//! │        │        │ 3. balance ≥ price?     else Insufficient  │          │
//! │        │        │ 4. qty -1, sales +price, log, balance      │          │
//! │        │        └──────────────────┬───────────────────────┘           │
//! │        └─────────── remainder 0 ───┘ remainder > 0 stays Funded         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every operation runs to completion synchronously. Failed operations
//! return a [`MachineError`] and leave every field exactly as it was.
//! The machine is not `Sync`-safe by itself: an adapter serving concurrent
//! clients must put it behind a single lock.

use crate::catalog::Catalog;
use crate::error::{LoadError, MachineError, MachineResult};
use crate::ledger::{self, TransactionLog};
use crate::money::Money;
use crate::snapshot::{Snapshot, SnapshotSink, SnapshotSource};
use crate::types::{BalancePolicy, GridLayout, MachineConfig, PurchaseReceipt, SlotView};

#[derive(Debug, Clone)]
pub struct Machine {
    catalog: Catalog,
    balance: Money,
    total_sales: Money,
    transactions: TransactionLog,
    config: MachineConfig,
}

impl Machine {
    /// Creates a machine around `catalog` with zero balance and sales.
    pub fn new(catalog: Catalog, config: MachineConfig) -> Self {
        Machine {
            catalog,
            balance: Money::zero(),
            total_sales: Money::zero(),
            transactions: TransactionLog::new(),
            config,
        }
    }

    /// Default catalog, default configuration.
    pub fn with_defaults() -> Self {
        Machine::new(Catalog::with_defaults(), MachineConfig::default())
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn balance(&self) -> Money {
        self.balance
    }

    pub fn total_sales(&self) -> Money {
        self.total_sales
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn transactions(&self) -> &TransactionLog {
        &self.transactions
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    /// Slots in layout order with availability and affordability against
    /// the current balance.
    pub fn product_grid(&self, layout: &GridLayout) -> Vec<SlotView> {
        self.catalog
            .in_grid_order(layout)
            .into_iter()
            .map(|product| SlotView::of(product, self.balance))
            .collect()
    }

    /// The last `k` log entries, formatted, oldest first.
    pub fn recent_transactions(&self, k: usize) -> Vec<String> {
        self.transactions.tail_strings(k)
    }

    // -------------------------------------------------------------------------
    // Funding
    // -------------------------------------------------------------------------

    /// Credits inserted cash. Returns the new balance.
    ///
    /// ## Errors
    /// - `InvalidAmount` if `amount <= 0`
    /// - `BalanceOverflow` if the balance cannot hold the sum
    pub fn insert_funds(&mut self, amount: Money) -> MachineResult<Money> {
        self.credit(amount, ledger::cash_inserted(amount))
    }

    /// Credits a card payment. Always authorized; same rules as cash.
    pub fn credit_card(&mut self, amount: Money) -> MachineResult<Money> {
        self.credit(amount, ledger::card_payment(amount))
    }

    fn credit(&mut self, amount: Money, description: String) -> MachineResult<Money> {
        if !amount.is_positive() {
            return Err(MachineError::InvalidAmount { amount });
        }

        let balance = self
            .balance
            .checked_add(amount)
            .ok_or(MachineError::BalanceOverflow)?;

        self.balance = balance;
        self.transactions.append(description);
        Ok(self.balance)
    }

    // -------------------------------------------------------------------------
    // Purchase
    // -------------------------------------------------------------------------

    /// Dispenses one unit of `code`.
    ///
    /// All checks run before anything is mutated; on success the stock
    /// decrement, sales update, log entry and balance update happen together.
    ///
    /// ## Errors
    /// - `InvalidProduct` for an unknown code
    /// - `OutOfStock` when the slot is empty (checked before funds)
    /// - `InsufficientFunds` with the shortfall when `balance < price`
    pub fn purchase(&mut self, code: &str) -> MachineResult<PurchaseReceipt> {
        let product = self
            .catalog
            .get(code)
            .map_err(|_| MachineError::InvalidProduct(code.to_string()))?;

        if !product.is_available() {
            return Err(MachineError::OutOfStock {
                code: product.code().to_string(),
                name: product.name().to_string(),
            });
        }

        let price = product.price();
        if self.balance < price {
            return Err(MachineError::InsufficientFunds {
                code: product.code().to_string(),
                name: product.name().to_string(),
                price,
                balance: self.balance,
                shortfall: price - self.balance,
            });
        }

        let total_sales = self
            .total_sales
            .checked_add(price)
            .ok_or(MachineError::BalanceOverflow)?;
        let name = product.name().to_string();
        let code = product.code().to_string();
        let remainder = self.balance - price;

        let product = self
            .catalog
            .get_mut(&code)
            .map_err(|_| MachineError::InvalidProduct(code.clone()))?;
        if !product.dispense_one() {
            return Err(MachineError::OutOfStock { code, name });
        }

        self.total_sales = total_sales;
        self.transactions.append(ledger::purchased(&name, &code, price));

        let change = match self.config.balance_policy {
            BalancePolicy::RetainRemainder => {
                self.balance = remainder;
                Money::zero()
            }
            BalancePolicy::ResetToZero => {
                self.balance = Money::zero();
                remainder
            }
        };

        Ok(PurchaseReceipt {
            code,
            product_name: name,
            price,
            change,
            balance: self.balance,
        })
    }

    // -------------------------------------------------------------------------
    // Cancel / Refund
    // -------------------------------------------------------------------------

    /// Ejects the whole balance and returns it (zero if nothing was pending).
    pub fn cancel(&mut self) -> Money {
        let change = self.balance;
        self.balance = Money::zero();

        if change.is_positive() {
            self.transactions.append(ledger::change_returned(change));
        }
        change
    }

    /// Alias of [`Machine::cancel`].
    pub fn refund(&mut self) -> Money {
        self.cancel()
    }

    // -------------------------------------------------------------------------
    // Administration
    // -------------------------------------------------------------------------

    /// Sets every slot to `quantity` units.
    pub fn restock_all(&mut self, quantity: u32) {
        self.catalog.restock_all(quantity);
        self.transactions.append(ledger::restocked(quantity));
    }

    /// Restocks to the configured default quantity.
    pub fn restock_default(&mut self) {
        self.restock_all(self.config.restock_quantity);
    }

    /// Returns to factory state: default catalog, zero sales, a fresh log.
    /// The configuration is kept.
    ///
    /// Credit still held is ejected first, like [`Machine::cancel`], and
    /// returned. Its `Change returned` entry is carried into the new log
    /// ahead of the reset entry.
    pub fn reset(&mut self) -> Money {
        let change = self.cancel();

        let mut transactions = TransactionLog::new();
        if change.is_positive() {
            if let Some(entry) = self.transactions.last() {
                transactions.append_at(entry.timestamp, entry.description.clone());
            }
        }
        transactions.append(ledger::machine_reset());

        self.catalog = Catalog::with_defaults();
        self.balance = Money::zero();
        self.total_sales = Money::zero();
        self.transactions = transactions;
        change
    }

    // -------------------------------------------------------------------------
    // Persistence
    // -------------------------------------------------------------------------

    /// Persistable state: catalog, sales total and the bounded log tail.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            products: self.catalog.serialize(),
            total_sales: self.total_sales,
            transactions: self
                .transactions
                .tail_strings(self.config.snapshot_transaction_limit),
        }
    }

    /// Replaces catalog, sales total and log from `snapshot`.
    ///
    /// Everything is parsed before anything is assigned; on error the
    /// machine is unchanged. The balance is not part of a snapshot and is
    /// left as it is.
    pub fn restore(&mut self, snapshot: Snapshot) -> Result<(), LoadError> {
        if snapshot.total_sales.is_negative() {
            return Err(LoadError::Corrupt(format!(
                "negative total sales {}",
                snapshot.total_sales
            )));
        }

        let catalog = Catalog::from_records(snapshot.products)?;
        let transactions = TransactionLog::from_lines(&snapshot.transactions)?;

        self.catalog = catalog;
        self.total_sales = snapshot.total_sales;
        self.transactions = transactions;
        Ok(())
    }

    /// Writes the current snapshot to `sink`.
    pub fn save<S: SnapshotSink>(&self, sink: &mut S) -> Result<(), S::Error> {
        sink.write_snapshot(&self.snapshot())
    }

    /// Restores from `source`.
    ///
    /// A missing or malformed source is reported, never fatal: the machine
    /// keeps its current state (normally the defaults).
    pub fn load<S: SnapshotSource + ?Sized>(&mut self, source: &S) -> Result<(), LoadError> {
        let snapshot = source.read_snapshot()?;
        self.restore(snapshot)
    }
}

impl Default for Machine {
    fn default() -> Self {
        Machine::with_defaults()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::MemorySnapshot;
    use crate::types::Product;

    fn cents(c: i64) -> Money {
        Money::from_cents(c)
    }

    fn single_coke_machine(policy: BalancePolicy) -> Machine {
        let mut catalog = Catalog::new();
        catalog.add(Product::new("A1", "Coke", cents(175), 1).unwrap());
        Machine::new(
            catalog,
            MachineConfig {
                balance_policy: policy,
                ..MachineConfig::default()
            },
        )
    }

    #[test]
    fn test_coke_scenario_retains_remainder() {
        let mut machine = single_coke_machine(BalancePolicy::RetainRemainder);

        assert_eq!(machine.insert_funds(cents(200)), Ok(cents(200)));

        let receipt = machine.purchase("A1").unwrap();
        assert_eq!(receipt.product_name, "Coke");
        assert_eq!(receipt.change, Money::zero());
        assert_eq!(receipt.balance, cents(25));
        assert_eq!(machine.catalog().get("A1").unwrap().quantity(), 0);
        assert_eq!(machine.balance(), cents(25));
        assert_eq!(machine.total_sales(), cents(175));

        let err = machine.purchase("A1").unwrap_err();
        assert!(matches!(err, MachineError::OutOfStock { .. }));
        assert_eq!(machine.balance(), cents(25));
    }

    #[test]
    fn test_reset_to_zero_policy_ejects_change() {
        let mut machine = single_coke_machine(BalancePolicy::ResetToZero);
        machine.insert_funds(cents(200)).unwrap();

        let receipt = machine.purchase("A1").unwrap();
        assert_eq!(receipt.change, cents(25));
        assert_eq!(receipt.balance, Money::zero());
        assert_eq!(machine.balance(), Money::zero());
        assert_eq!(machine.total_sales(), cents(175));
        assert_eq!(machine.transactions().len(), 2);
    }

    #[test]
    fn test_unknown_code_changes_nothing() {
        let mut machine = Machine::with_defaults();
        let before = machine.snapshot();

        assert_eq!(
            machine.purchase("Z9"),
            Err(MachineError::InvalidProduct("Z9".to_string()))
        );
        assert_eq!(machine.snapshot(), before);
        assert_eq!(machine.balance(), Money::zero());
        assert!(machine.transactions().is_empty());
    }

    #[test]
    fn test_insufficient_funds_reports_shortfall() {
        let mut machine = Machine::with_defaults();
        machine.insert_funds(cents(100)).unwrap();

        match machine.purchase("A1") {
            Err(MachineError::InsufficientFunds { shortfall, price, balance, .. }) => {
                assert_eq!(shortfall, cents(75));
                assert_eq!(price, cents(175));
                assert_eq!(balance, cents(100));
            }
            other => panic!("expected InsufficientFunds, got {:?}", other),
        }
        assert_eq!(machine.balance(), cents(100));
        assert_eq!(machine.catalog().get("A1").unwrap().quantity(), 9);
    }

    #[test]
    fn test_out_of_stock_checked_before_funds() {
        let mut machine = single_coke_machine(BalancePolicy::RetainRemainder);
        machine.insert_funds(cents(500)).unwrap();
        machine.purchase("A1").unwrap();
        machine.cancel();

        assert!(matches!(
            machine.purchase("A1"),
            Err(MachineError::OutOfStock { .. })
        ));
    }

    #[test]
    fn test_invalid_amounts_rejected() {
        let mut machine = Machine::with_defaults();
        assert_eq!(
            machine.insert_funds(Money::zero()),
            Err(MachineError::InvalidAmount { amount: Money::zero() })
        );
        assert!(machine.credit_card(cents(-100)).is_err());
        assert_eq!(machine.balance(), Money::zero());
        assert!(machine.transactions().is_empty());
    }

    #[test]
    fn test_balance_overflow_rejected() {
        let mut machine = Machine::with_defaults();
        machine.insert_funds(cents(i64::MAX)).unwrap();
        assert_eq!(
            machine.insert_funds(cents(1)),
            Err(MachineError::BalanceOverflow)
        );
        assert_eq!(machine.balance(), cents(i64::MAX));
    }

    #[test]
    fn test_funding_log_descriptions() {
        let mut machine = Machine::with_defaults();
        machine.insert_funds(cents(100)).unwrap();
        machine.credit_card(cents(500)).unwrap();

        let descriptions: Vec<&str> = machine
            .transactions()
            .iter()
            .map(|e| e.description.as_str())
            .collect();
        assert_eq!(descriptions, vec!["Cash inserted: $1.00", "Card payment: $5.00"]);
    }

    #[test]
    fn test_cancel_twice() {
        let mut machine = Machine::with_defaults();
        machine.insert_funds(cents(300)).unwrap();

        assert_eq!(machine.cancel(), cents(300));
        assert_eq!(machine.refund(), Money::zero());
        assert_eq!(machine.balance(), Money::zero());
        // Only the insert and the first cancel are logged
        assert_eq!(machine.transactions().len(), 2);
        assert_eq!(
            machine.transactions().last().unwrap().description,
            "Change returned: $3.00"
        );
    }

    #[test]
    fn test_restock_logs_and_resets_quantities() {
        let mut machine = Machine::with_defaults();
        machine.restock_default();
        assert!(machine.catalog().iter().all(|p| p.quantity() == 10));
        assert_eq!(
            machine.transactions().last().unwrap().description,
            "Restocked all products to 10"
        );

        machine.restock_all(3);
        assert!(machine.catalog().iter().all(|p| p.quantity() == 3));
    }

    #[test]
    fn test_product_grid_affordability() {
        let mut machine = Machine::with_defaults();
        machine.insert_funds(cents(150)).unwrap();

        let grid = machine.product_grid(&GridLayout::standard());
        assert_eq!(grid.len(), 24);

        let coke = &grid[0];
        assert_eq!(coke.code, "A1");
        assert!(coke.available);
        assert!(!coke.affordable);

        let water = grid.iter().find(|s| s.code == "B1").unwrap();
        assert!(water.affordable);
    }

    #[test]
    fn test_reset_restores_factory_state() {
        let mut machine = Machine::with_defaults();
        machine.insert_funds(cents(500)).unwrap();
        machine.purchase("D3").unwrap();
        machine.restock_all(1);

        // $5.00 - $4.50 leaves $0.50 of credit
        assert_eq!(machine.reset(), cents(50));
        assert_eq!(machine.balance(), Money::zero());
        assert_eq!(machine.total_sales(), Money::zero());
        assert_eq!(machine.catalog(), &Catalog::with_defaults());

        let log: Vec<_> = machine
            .transactions()
            .iter()
            .map(|e| e.description.as_str())
            .collect();
        assert_eq!(log, vec!["Change returned: $0.50", "Machine reset to defaults"]);
    }

    #[test]
    fn test_reset_with_no_credit_logs_only_reset() {
        let mut machine = Machine::with_defaults();
        machine.insert_funds(cents(175)).unwrap();
        machine.purchase("A1").unwrap();

        assert_eq!(machine.reset(), Money::zero());
        assert_eq!(machine.transactions().len(), 1);
        assert_eq!(
            machine.transactions().last().unwrap().description,
            "Machine reset to defaults"
        );
    }

    #[test]
    fn test_save_load_round_trip() {
        let mut machine = Machine::with_defaults();
        machine.insert_funds(cents(1000)).unwrap();
        machine.purchase("A1").unwrap();
        machine.purchase("F4").unwrap();

        let mut memory = MemorySnapshot::new();
        machine.save(&mut memory).unwrap();

        let mut restored = Machine::with_defaults();
        restored.load(&memory).unwrap();

        assert_eq!(restored.catalog(), machine.catalog());
        assert_eq!(restored.total_sales(), cents(250));
        assert_eq!(restored.recent_transactions(10), machine.recent_transactions(10));
        // Credit is not carried across a restart
        assert_eq!(restored.balance(), Money::zero());
    }

    #[test]
    fn test_load_missing_keeps_defaults() {
        let mut machine = Machine::with_defaults();
        assert_eq!(machine.load(&MemorySnapshot::new()), Err(LoadError::Missing));
        assert_eq!(machine.catalog(), &Catalog::with_defaults());
    }

    #[test]
    fn test_restore_is_atomic() {
        let mut machine = Machine::with_defaults();
        machine.insert_funds(cents(200)).unwrap();
        machine.purchase("A1").unwrap();
        let before = machine.snapshot();

        let mut corrupt = before.clone();
        corrupt.products.truncate(2);
        corrupt.total_sales = cents(9999);
        corrupt.transactions.push("not a log line".to_string());

        assert!(matches!(machine.restore(corrupt), Err(LoadError::Corrupt(_))));
        assert_eq!(machine.snapshot(), before);
    }

    #[test]
    fn test_restore_rejects_negative_sales() {
        let mut machine = Machine::with_defaults();
        let mut snapshot = machine.snapshot();
        snapshot.total_sales = cents(-1);
        assert!(matches!(machine.restore(snapshot), Err(LoadError::Corrupt(_))));
    }

    #[test]
    fn test_snapshot_caps_transactions() {
        let mut machine = Machine::new(
            Catalog::with_defaults(),
            MachineConfig {
                snapshot_transaction_limit: 3,
                ..MachineConfig::default()
            },
        );
        for _ in 0..5 {
            machine.insert_funds(cents(25)).unwrap();
        }

        let snapshot = machine.snapshot();
        assert_eq!(snapshot.transactions.len(), 3);
        assert_eq!(machine.transactions().len(), 5);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::snapshot::MemorySnapshot;
    use crate::types::Product;
    use proptest::prelude::*;

    fn machine_with(price: i64, quantity: u32, balance: i64) -> Machine {
        let mut catalog = Catalog::new();
        catalog.add(Product::new("A1", "Coke", Money::from_cents(price), quantity).unwrap());
        let mut machine = Machine::new(catalog, MachineConfig::default());
        if balance > 0 {
            machine.insert_funds(Money::from_cents(balance)).unwrap();
        }
        machine
    }

    proptest! {
        #[test]
        fn insert_funds_adds_exact_amount(start in 0i64..100_000, amount in 1i64..100_000) {
            let mut machine = machine_with(175, 1, start);
            let log_before = machine.transactions().len();

            let balance = machine.insert_funds(Money::from_cents(amount)).unwrap();

            prop_assert_eq!(balance.cents(), start + amount);
            prop_assert_eq!(machine.transactions().len(), log_before + 1);
        }

        #[test]
        fn non_positive_amount_changes_nothing(start in 0i64..100_000, amount in -100_000i64..=0) {
            let mut machine = machine_with(175, 1, start);
            let log_before = machine.transactions().len();

            let result = machine.insert_funds(Money::from_cents(amount));

            prop_assert!(
                matches!(result, Err(MachineError::InvalidAmount { .. })),
                "expected InvalidAmount, got {:?}",
                result
            );
            prop_assert_eq!(machine.balance().cents(), start);
            prop_assert_eq!(machine.transactions().len(), log_before);
        }

        #[test]
        fn empty_slot_is_out_of_stock(price in 0i64..10_000, balance in 0i64..100_000) {
            let mut machine = machine_with(price, 0, balance);

            let result = machine.purchase("A1");

            prop_assert!(
                matches!(result, Err(MachineError::OutOfStock { .. })),
                "expected OutOfStock, got {:?}",
                result
            );
            prop_assert_eq!(machine.balance().cents(), balance);
            prop_assert_eq!(machine.total_sales(), Money::zero());
            prop_assert_eq!(machine.catalog().get("A1").unwrap().quantity(), 0);
        }

        #[test]
        fn short_balance_changes_nothing(price in 1i64..10_000, quantity in 1u32..20, gap in 1i64..10_000) {
            let balance = (price - gap).max(0);
            let mut machine = machine_with(price, quantity, balance);
            let before = machine.snapshot();

            let result = machine.purchase("A1");

            prop_assert!(
                matches!(result, Err(MachineError::InsufficientFunds { .. })),
                "expected InsufficientFunds, got {:?}",
                result
            );
            prop_assert_eq!(machine.balance().cents(), balance);
            prop_assert_eq!(machine.snapshot(), before);
        }

        #[test]
        fn purchase_applies_exactly_once(price in 0i64..10_000, quantity in 1u32..20, extra in 0i64..10_000) {
            let balance = price + extra;
            let mut machine = machine_with(price, quantity, balance);
            let log_before = machine.transactions().len();

            let receipt = machine.purchase("A1").unwrap();

            prop_assert_eq!(machine.catalog().get("A1").unwrap().quantity(), quantity - 1);
            prop_assert_eq!(machine.total_sales().cents(), price);
            prop_assert_eq!(machine.transactions().len(), log_before + 1);
            prop_assert_eq!(machine.balance().cents(), extra);
            prop_assert_eq!(receipt.balance.cents(), extra);
            prop_assert_eq!(receipt.change, Money::zero());
        }

        #[test]
        fn cancel_returns_balance_then_zero(balance in 0i64..100_000) {
            let mut machine = machine_with(175, 1, balance);

            prop_assert_eq!(machine.cancel().cents(), balance);
            prop_assert_eq!(machine.balance(), Money::zero());
            prop_assert_eq!(machine.cancel(), Money::zero());
        }

        #[test]
        fn total_sales_never_decreases(codes in prop::collection::vec("[A-F][1-4]|Z9", 1..30), funds in prop::collection::vec(0i64..500, 1..30)) {
            let mut machine = Machine::with_defaults();
            let mut last_sales = machine.total_sales();

            for (code, amount) in codes.iter().zip(funds.iter().cycle()) {
                let _ = machine.insert_funds(Money::from_cents(*amount));
                let _ = machine.purchase(code);
                prop_assert!(machine.total_sales() >= last_sales);
                prop_assert!(!machine.balance().is_negative());
                last_sales = machine.total_sales();
            }
        }

        #[test]
        fn save_then_load_reproduces_catalog(purchases in prop::collection::vec(0usize..24, 0..20)) {
            let mut machine = Machine::with_defaults();
            machine.insert_funds(Money::from_cents(100_000)).unwrap();
            let codes: Vec<String> = machine.catalog().iter().map(|p| p.code().to_string()).collect();
            for index in purchases {
                let _ = machine.purchase(&codes[index]);
            }

            let mut memory = MemorySnapshot::new();
            machine.save(&mut memory).unwrap();
            let mut restored = Machine::with_defaults();
            restored.load(&memory).unwrap();

            prop_assert_eq!(restored.catalog(), machine.catalog());
            prop_assert_eq!(restored.total_sales(), machine.total_sales());
        }
    }
}
