//! In-memory stock bookkeeping for departures, returns and reinforcements
//!
//! The repository loads the event's material lines and the involved
//! equipment rows (locked), runs the requested movement through the ledger,
//! then writes back only what changed. Any error leaves the database
//! untouched because nothing is persisted before the ledger succeeds.

use std::collections::{BTreeMap, BTreeSet};

use super::add_units;
use crate::{
    error::{AppError, AppResult},
    models::{
        enums::ReturnCondition,
        workflow::{DepartureItem, ReinforcementItem, ReturnItem},
    },
};

/// Counters of one material line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineSnapshot {
    pub id: i32,
    pub equipment_id: Option<i32>,
    pub label: String,
    pub planned: i32,
    pub out: i32,
    pub returned: i32,
}

impl LineSnapshot {
    /// Planned units not yet checked out
    pub fn remaining(&self) -> i32 {
        self.planned - self.out
    }

    /// Checked-out units not yet returned
    pub fn outstanding(&self) -> i32 {
        self.out - self.returned
    }
}

/// Counters of one equipment row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockSnapshot {
    pub equipment_id: i32,
    pub model: String,
    pub in_stock: i32,
    pub in_maintenance: i32,
}

/// Return accepted by the ledger, to be stored as a returned item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub material_id: i32,
    pub equipment_id: Option<i32>,
    pub quantity: i32,
    pub condition: ReturnCondition,
    pub note: Option<String>,
}

impl Receipt {
    /// Units that must be opened as maintenance records
    pub fn maintenance_units(&self) -> i32 {
        match (self.equipment_id, self.condition) {
            (Some(_), condition) if condition != ReturnCondition::Good => self.quantity,
            _ => 0,
        }
    }
}

#[derive(Debug, Default)]
pub struct StockLedger {
    lines: Vec<LineSnapshot>,
    stock: BTreeMap<i32, StockSnapshot>,
    touched_lines: BTreeSet<i32>,
    touched_stock: BTreeSet<i32>,
    receipts: Vec<Receipt>,
    /// Reinforcement quantities for equipment without a line yet
    new_lines: BTreeMap<i32, i32>,
}

impl StockLedger {
    pub fn new(mut lines: Vec<LineSnapshot>, stock: Vec<StockSnapshot>) -> Self {
        lines.sort_by_key(|l| l.id);
        Self {
            lines,
            stock: stock.into_iter().map(|s| (s.equipment_id, s)).collect(),
            ..Default::default()
        }
    }

    fn line_index(&self, material_id: i32) -> AppResult<usize> {
        self.lines
            .iter()
            .position(|l| l.id == material_id)
            .ok_or_else(|| {
                AppError::NotFound(format!("Material line {} not found in this event", material_id))
            })
    }

    fn stock_mut(&mut self, equipment_id: i32) -> AppResult<&mut StockSnapshot> {
        self.stock
            .get_mut(&equipment_id)
            .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", equipment_id)))
    }

    /// Check material out of the warehouse
    pub fn depart(&mut self, items: &[DepartureItem]) -> AppResult<()> {
        if items.is_empty() {
            return Err(AppError::Validation("No material was specified for departure".to_string()));
        }

        for item in items {
            let idx = self.line_index(item.material_id)?;
            let line = &self.lines[idx];

            if item.quantity <= 0 {
                return Err(AppError::BusinessRule(format!(
                    "Departure quantity for '{}' must be positive",
                    line.label
                )));
            }
            if item.quantity > line.remaining() {
                return Err(AppError::BusinessRule(format!(
                    "Departure quantity for '{}' exceeds the planned quantity ({} remaining)",
                    line.label,
                    line.remaining()
                )));
            }

            if let Some(equipment_id) = line.equipment_id {
                let stock = self.stock_mut(equipment_id)?;
                if item.quantity > stock.in_stock {
                    return Err(AppError::BusinessRule(format!(
                        "Insufficient stock for '{}' ({} available)",
                        stock.model, stock.in_stock
                    )));
                }
                stock.in_stock -= item.quantity;
                self.touched_stock.insert(equipment_id);
            }

            self.lines[idx].out += item.quantity;
            self.touched_lines.insert(item.material_id);
        }
        Ok(())
    }

    /// Check material back in with its condition
    pub fn receive(&mut self, items: &[ReturnItem]) -> AppResult<()> {
        if items.is_empty() {
            return Err(AppError::Validation("No returned item was specified".to_string()));
        }

        for item in items {
            let idx = self.line_index(item.material_id)?;
            let line = &self.lines[idx];

            if item.quantity <= 0 {
                return Err(AppError::BusinessRule(format!(
                    "Return quantity for '{}' must be positive",
                    line.label
                )));
            }
            if item.quantity > line.outstanding() {
                return Err(AppError::BusinessRule(format!(
                    "Return quantity for '{}' exceeds the outstanding quantity ({} outstanding)",
                    line.label,
                    line.outstanding()
                )));
            }

            let equipment_id = line.equipment_id;
            if let Some(equipment_id) = equipment_id {
                let stock = self.stock_mut(equipment_id)?;
                if item.condition == ReturnCondition::Good {
                    stock.in_stock = add_units(stock.in_stock, item.quantity)?;
                } else {
                    stock.in_maintenance = add_units(stock.in_maintenance, item.quantity)?;
                }
                self.touched_stock.insert(equipment_id);
            }

            self.lines[idx].returned += item.quantity;
            self.receipts.push(Receipt {
                material_id: item.material_id,
                equipment_id,
                quantity: item.quantity,
                condition: item.condition,
                note: item.note.clone(),
            });
        }
        Ok(())
    }

    /// Add material to a running event, checked out immediately
    pub fn reinforce(&mut self, items: &[ReinforcementItem]) -> AppResult<()> {
        if items.is_empty() {
            return Err(AppError::Validation(
                "No reinforcement material was specified".to_string(),
            ));
        }

        for item in items.iter().filter(|i| i.quantity > 0) {
            let stock = self.stock_mut(item.equipment_id)?;
            if item.quantity > stock.in_stock {
                return Err(AppError::BusinessRule(format!(
                    "Insufficient stock for the reinforcement of '{}' ({} available)",
                    stock.model, stock.in_stock
                )));
            }
            stock.in_stock -= item.quantity;
            self.touched_stock.insert(item.equipment_id);

            match self
                .lines
                .iter_mut()
                .find(|l| l.equipment_id == Some(item.equipment_id))
            {
                Some(line) => {
                    line.planned = add_units(line.planned, item.quantity)?;
                    line.out = add_units(line.out, item.quantity)?;
                    self.touched_lines.insert(line.id);
                }
                None => {
                    let pending = self.new_lines.entry(item.equipment_id).or_insert(0);
                    *pending = add_units(*pending, item.quantity)?;
                }
            }
        }
        Ok(())
    }

    /// No line has checked-out units still away
    pub fn all_returned(&self) -> bool {
        self.lines.iter().all(|l| l.outstanding() <= 0)
    }

    pub fn line(&self, material_id: i32) -> Option<&LineSnapshot> {
        self.lines.iter().find(|l| l.id == material_id)
    }

    pub fn stock(&self, equipment_id: i32) -> Option<&StockSnapshot> {
        self.stock.get(&equipment_id)
    }

    pub fn changed_lines(&self) -> impl Iterator<Item = &LineSnapshot> {
        self.lines
            .iter()
            .filter(|l| self.touched_lines.contains(&l.id))
    }

    pub fn changed_stock(&self) -> impl Iterator<Item = &StockSnapshot> {
        self.touched_stock.iter().filter_map(|id| self.stock.get(id))
    }

    pub fn receipts(&self) -> &[Receipt] {
        &self.receipts
    }

    /// Lines to create as `(equipment_id, quantity)`, planned and checked out
    pub fn new_lines(&self) -> Vec<(i32, i32)> {
        self.new_lines.iter().map(|(e, q)| (*e, *q)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    fn line(id: i32, equipment_id: Option<i32>, planned: i32, out: i32, returned: i32) -> LineSnapshot {
        LineSnapshot {
            id,
            equipment_id,
            label: format!("line {}", id),
            planned,
            out,
            returned,
        }
    }

    fn stock(equipment_id: i32, in_stock: i32) -> StockSnapshot {
        StockSnapshot {
            equipment_id,
            model: format!("model {}", equipment_id),
            in_stock,
            in_maintenance: 0,
        }
    }

    fn out(material_id: i32, quantity: i32) -> DepartureItem {
        DepartureItem { material_id, quantity }
    }

    fn back(material_id: i32, quantity: i32, condition: ReturnCondition) -> ReturnItem {
        ReturnItem {
            material_id,
            quantity,
            condition,
            note: None,
        }
    }

    #[test]
    fn test_full_cycle_restores_stock() {
        let mut ledger = StockLedger::new(vec![line(1, Some(7), 10, 0, 0)], vec![stock(7, 12)]);

        assert_ok!(ledger.depart(&[out(1, 10)]));
        assert_eq!(ledger.stock(7).map(|s| s.in_stock), Some(2));
        assert!(!ledger.all_returned());

        assert_ok!(ledger.receive(&[back(1, 10, ReturnCondition::Good)]));
        assert_eq!(ledger.stock(7).map(|s| s.in_stock), Some(12));
        assert!(ledger.all_returned());
        assert_eq!(ledger.receipts().len(), 1);
        assert_eq!(ledger.receipts()[0].maintenance_units(), 0);
    }

    #[test]
    fn test_departure_bounded_by_plan_and_stock() {
        let mut ledger = StockLedger::new(vec![line(1, Some(7), 10, 6, 0)], vec![stock(7, 20)]);
        let err = assert_err!(ledger.depart(&[out(1, 5)]));
        assert!(matches!(err, AppError::BusinessRule(_)));

        let mut ledger = StockLedger::new(vec![line(1, Some(7), 10, 0, 0)], vec![stock(7, 3)]);
        assert_err!(ledger.depart(&[out(1, 4)]));
        assert_ok!(ledger.depart(&[out(1, 3)]));
        assert_eq!(ledger.line(1).map(|l| l.out), Some(3));
    }

    #[test]
    fn test_departure_counts_repeated_items() {
        let mut ledger = StockLedger::new(vec![line(1, Some(7), 4, 0, 0)], vec![stock(7, 10)]);
        assert_err!(ledger.depart(&[out(1, 3), out(1, 2)]));
    }

    #[test]
    fn test_departure_rejects_empty_and_unknown() {
        let mut ledger = StockLedger::new(vec![line(1, Some(7), 4, 0, 0)], vec![stock(7, 10)]);
        assert!(matches!(ledger.depart(&[]), Err(AppError::Validation(_))));
        assert!(matches!(ledger.depart(&[out(99, 1)]), Err(AppError::NotFound(_))));
        assert_err!(ledger.depart(&[out(1, 0)]));
    }

    #[test]
    fn test_free_text_line_skips_stock() {
        let mut ledger = StockLedger::new(vec![line(1, None, 5, 0, 0)], vec![]);
        assert_ok!(ledger.depart(&[out(1, 5)]));
        assert_eq!(ledger.changed_stock().count(), 0);
        assert_ok!(ledger.receive(&[back(1, 5, ReturnCondition::Lost)]));
        assert_eq!(ledger.receipts()[0].maintenance_units(), 0);
    }

    #[test]
    fn test_return_bounded_by_outstanding() {
        let mut ledger = StockLedger::new(vec![line(1, Some(7), 10, 8, 5)], vec![stock(7, 2)]);
        let err = assert_err!(ledger.receive(&[back(1, 4, ReturnCondition::Good)]));
        assert!(err.to_string().contains("3 outstanding"));
        assert_ok!(ledger.receive(&[back(1, 3, ReturnCondition::Good)]));
    }

    #[test]
    fn test_damaged_return_goes_to_maintenance() {
        let mut ledger = StockLedger::new(
            vec![line(1, Some(7), 4, 4, 0), line(2, Some(8), 1, 1, 0)],
            vec![stock(7, 0), stock(8, 0)],
        );
        assert_ok!(ledger.receive(&[back(1, 3, ReturnCondition::Broken)]));

        let counters = ledger.stock(7).cloned();
        assert_eq!(counters.as_ref().map(|s| s.in_stock), Some(0));
        assert_eq!(counters.as_ref().map(|s| s.in_maintenance), Some(3));
        assert_eq!(ledger.receipts()[0].maintenance_units(), 3);
        assert!(!ledger.all_returned());
    }

    #[test]
    fn test_reinforcement_extends_existing_line() {
        let mut ledger = StockLedger::new(
            vec![line(1, Some(7), 4, 4, 0), line(2, Some(7), 1, 1, 0)],
            vec![stock(7, 5), stock(9, 2)],
        );
        let items = [
            ReinforcementItem { equipment_id: 7, quantity: 2 },
            ReinforcementItem { equipment_id: 9, quantity: 0 },
        ];
        assert_ok!(ledger.reinforce(&items));

        let first = ledger.line(1).cloned();
        assert_eq!(first.map(|l| (l.planned, l.out)), Some((6, 6)));
        assert_eq!(ledger.line(2).map(|l| l.planned), Some(1));
        assert_eq!(ledger.stock(7).map(|s| s.in_stock), Some(3));
        assert_eq!(ledger.stock(9).map(|s| s.in_stock), Some(2));
        assert!(ledger.new_lines().is_empty());
    }

    #[test]
    fn test_reinforcement_creates_pending_line() {
        let mut ledger = StockLedger::new(vec![line(1, Some(7), 4, 4, 0)], vec![stock(9, 5)]);
        let items = [
            ReinforcementItem { equipment_id: 9, quantity: 2 },
            ReinforcementItem { equipment_id: 9, quantity: 1 },
        ];
        assert_ok!(ledger.reinforce(&items));
        assert_eq!(ledger.new_lines(), vec![(9, 3)]);
        assert_eq!(ledger.stock(9).map(|s| s.in_stock), Some(2));

        let too_many = [ReinforcementItem { equipment_id: 9, quantity: 3 }];
        assert!(matches!(ledger.reinforce(&too_many), Err(AppError::BusinessRule(_))));
    }

    #[test]
    fn test_reinforcement_rejects_overflowing_counters() {
        let mut ledger = StockLedger::new(vec![line(1, Some(7), 5, 5, 0)], vec![stock(7, i32::MAX)]);
        let items = [ReinforcementItem { equipment_id: 7, quantity: i32::MAX }];
        let err = assert_err!(ledger.reinforce(&items));
        assert!(matches!(err, AppError::BusinessRule(_)));
    }

    #[test]
    fn test_return_rejects_overflowing_stock() {
        let mut ledger = StockLedger::new(vec![line(1, Some(7), 2, 2, 0)], vec![stock(7, i32::MAX)]);
        let err = assert_err!(ledger.receive(&[back(1, 2, ReturnCondition::Good)]));
        assert!(matches!(err, AppError::BusinessRule(_)));
    }

    #[test]
    fn test_changed_lines_only_lists_touched() {
        let mut ledger = StockLedger::new(
            vec![line(2, Some(7), 4, 0, 0), line(1, Some(8), 4, 0, 0)],
            vec![stock(7, 5), stock(8, 5)],
        );
        assert_ok!(ledger.depart(&[out(2, 1)]));
        let ids: Vec<i32> = ledger.changed_lines().map(|l| l.id).collect();
        assert_eq!(ids, vec![2]);
        let stock_ids: Vec<i32> = ledger.changed_stock().map(|s| s.equipment_id).collect();
        assert_eq!(stock_ids, vec![7]);
    }
}
