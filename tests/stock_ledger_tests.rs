//! Stock ledger invariants, checked against an in-memory model that
//! applies the same rule as the database: a decrement only applies when
//! the conditional check and the write happen as one step, and every
//! applied change appends exactly one signed movement.

use proptest::prelude::*;
use rust_decimal::Decimal;

use pharmahub::models::sales::sale_total;

/// Minimal model of one inventory row plus its movement ledger.
struct LedgerModel {
    quantity: i32,
    movements: Vec<i32>,
}

impl LedgerModel {
    fn new(initial: i32) -> Self {
        Self {
            quantity: initial,
            movements: vec![initial],
        }
    }

    /// Mirrors `UPDATE .. SET quantity = quantity - $n WHERE quantity >= $n`:
    /// the check and the write are indivisible, and failure changes nothing.
    fn decrement(&mut self, amount: i32) -> bool {
        if self.quantity >= amount {
            self.quantity -= amount;
            self.movements.push(-amount);
            true
        } else {
            false
        }
    }

    fn restock(&mut self, amount: i32) {
        self.quantity += amount;
        self.movements.push(amount);
    }

    /// Mirrors a manual edit under a row lock: the absolute overwrite and
    /// the delta it logs are computed against the quantity at write time.
    fn adjust_to(&mut self, new_quantity: i32) {
        let delta = new_quantity - self.quantity;
        self.quantity = new_quantity;
        if delta != 0 {
            self.movements.push(delta);
        }
    }

    fn movement_sum(&self) -> i32 {
        self.movements.iter().sum()
    }
}

#[test]
fn failed_decrement_leaves_quantity_untouched() {
    let mut ledger = LedgerModel::new(3);
    assert!(!ledger.decrement(5));
    assert_eq!(ledger.quantity, 3);
    assert_eq!(ledger.movements.len(), 1);
}

#[test]
fn two_overlapping_decrements_cannot_both_win() {
    // quantity=10, two callers each want 6: whichever statement lands
    // first wins, the other sees 4 < 6 and fails.
    let mut ledger = LedgerModel::new(10);
    let first = ledger.decrement(6);
    let second = ledger.decrement(6);

    assert!(first);
    assert!(!second);
    assert_eq!(ledger.quantity, 4);
}

#[test]
fn sale_scenario_updates_ledger_and_total() {
    // Inventory at 100, sale of 5 at 10.00.
    let mut ledger = LedgerModel::new(100);
    assert!(ledger.decrement(5));
    assert_eq!(ledger.quantity, 95);
    assert_eq!(*ledger.movements.last().unwrap(), -5);
    assert_eq!(sale_total(5, Decimal::new(1000, 2)), Decimal::new(5000, 2));
}

#[test]
fn manual_edit_delta_reflects_a_sale_that_landed_mid_edit() {
    // The edit form was opened at 10, a sale of 4 commits before the
    // save; the locked read means the logged delta is against 6, not 10.
    let mut ledger = LedgerModel::new(10);
    assert!(ledger.decrement(4));

    ledger.adjust_to(20);
    assert_eq!(*ledger.movements.last().unwrap(), 14);
    assert_eq!(ledger.movement_sum(), ledger.quantity);
}

#[derive(Debug, Clone)]
enum Op {
    Restock(i32),
    Decrement(i32),
    SetTo(i32),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (1..50i32).prop_map(Op::Restock),
        (1..50i32).prop_map(Op::Decrement),
        (0..100i32).prop_map(Op::SetTo),
    ]
}

proptest! {
    /// Quantity never goes below zero, no matter the operation sequence.
    #[test]
    fn quantity_is_never_negative(initial in 0..100i32, ops in prop::collection::vec(op_strategy(), 0..50)) {
        let mut ledger = LedgerModel::new(initial);
        for op in ops {
            match op {
                Op::Restock(n) => ledger.restock(n),
                Op::Decrement(n) => {
                    ledger.decrement(n);
                }
                Op::SetTo(n) => ledger.adjust_to(n),
            }
            prop_assert!(ledger.quantity >= 0);
        }
    }

    /// The current quantity always equals the sum of the recorded
    /// movement deltas: the ledger fully explains the stock level.
    #[test]
    fn movements_reconcile_with_quantity(initial in 0..100i32, ops in prop::collection::vec(op_strategy(), 0..50)) {
        let mut ledger = LedgerModel::new(initial);
        for op in ops {
            match op {
                Op::Restock(n) => ledger.restock(n),
                Op::Decrement(n) => {
                    ledger.decrement(n);
                }
                Op::SetTo(n) => ledger.adjust_to(n),
            }
        }
        prop_assert_eq!(ledger.movement_sum(), ledger.quantity);
    }

    /// Sale totals are exact decimal arithmetic.
    #[test]
    fn sale_total_matches_sum_of_units(quantity in 1..1000i32, cents in 1..100_000i64) {
        let unit_price = Decimal::new(cents, 2);
        let total = sale_total(quantity, unit_price);

        let mut summed = Decimal::ZERO;
        for _ in 0..quantity {
            summed += unit_price;
        }
        prop_assert_eq!(total, summed);
    }
}
