//! Event workflow rules
//!
//! Guards and derived values shared by the event handlers. Everything here
//! is pure: the repository loads rows, applies these rules, then persists
//! the outcome inside a single transaction.

pub mod ledger;

pub use ledger::{LineSnapshot, Receipt, StockLedger, StockSnapshot};

use chrono::NaiveDate;

use crate::{
    error::{AppError, AppResult},
    models::enums::{EventStatus, MaintenanceStatus, ReturnCondition, SupplyStatus},
};

/// Statuses from which an event can still be cancelled
pub const CANCELLABLE: &[EventStatus] = &[
    EventStatus::Planning,
    EventStatus::AwaitingReview,
    EventStatus::AwaitingDeparture,
];

/// Statuses in which material can be checked out
pub const DEPARTURE_ALLOWED: &[EventStatus] =
    &[EventStatus::AwaitingDeparture, EventStatus::InProgress];

/// Statuses in which an addendum is accepted
pub const ADDENDUM_ALLOWED: &[EventStatus] = &[
    EventStatus::Planning,
    EventStatus::AwaitingReview,
    EventStatus::AwaitingDeparture,
    EventStatus::InProgress,
];

/// Reject an action when the event is not in one of the allowed statuses
pub fn ensure_status(current: EventStatus, allowed: &[EventStatus], action: &str) -> AppResult<()> {
    if allowed.contains(&current) {
        return Ok(());
    }
    tracing::warn!("Refused to {} while event is {}", action, current);
    Err(AppError::InvalidState(format!(
        "Cannot {} while the event is '{}'",
        action,
        current.label()
    )))
}

/// Trimmed, non-blank text or a validation error naming the field
pub fn require_text(value: Option<&str>, field: &str) -> AppResult<String> {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text.to_string()),
        _ => Err(AppError::Validation(format!("{} is required", field))),
    }
}

/// Supply tag of a material line at save time.
///
/// Resolution tags are kept as chosen; computed tags follow the current stock.
pub fn supply_status_on_save(current: SupplyStatus, planned: i32, stock: Option<i32>) -> SupplyStatus {
    if !current.is_computed() {
        return current;
    }
    match stock {
        Some(in_stock) if planned > in_stock => SupplyStatus::Pending,
        _ => SupplyStatus::Sufficient,
    }
}

/// Validate the solution chosen for a shortage
pub fn resolve_shortage(current: SupplyStatus, solution: Option<SupplyStatus>) -> AppResult<SupplyStatus> {
    if current != SupplyStatus::Pending {
        return Err(AppError::InvalidState(
            "Only pending lines can be resolved".to_string(),
        ));
    }
    match solution {
        Some(solution) if solution.is_resolution() => Ok(solution),
        _ => Err(AppError::Validation(
            "Solution must be one of SUBLEASED, LOANED or PURCHASED".to_string(),
        )),
    }
}

/// Material line as seen by the list approval
#[derive(Debug, Clone)]
pub struct ApprovalLine {
    pub label: String,
    pub reviewed: bool,
    pub planned: i32,
    /// Current stock of the linked equipment, `None` for free-text lines
    pub stock: Option<i32>,
}

/// Every line reviewed and every equipment line covered by the stock
pub fn check_approval(lines: &[ApprovalLine]) -> AppResult<()> {
    let unreviewed = lines.iter().filter(|l| !l.reviewed).count();
    if unreviewed > 0 {
        return Err(AppError::BusinessRule(format!(
            "There are still {} item(s) awaiting review",
            unreviewed
        )));
    }

    for line in lines {
        if let Some(stock) = line.stock {
            if line.planned > stock {
                return Err(AppError::BusinessRule(format!(
                    "Insufficient stock for '{}'. The list must be corrected",
                    line.label
                )));
            }
        }
    }
    Ok(())
}

/// Name given to a cloned event
pub fn clone_name(requested: Option<&str>, source: Option<&str>) -> String {
    if let Some(name) = requested.map(str::trim).filter(|n| !n.is_empty()) {
        return name.to_string();
    }
    let source = source.map(str::trim).filter(|n| !n.is_empty()).unwrap_or("Operation");
    format!("Copy of - {}", source)
}

/// Problem description of a maintenance record opened by a return
pub fn return_problem_description(event_name: &str, condition: ReturnCondition, note: Option<&str>) -> String {
    format!(
        "Returned from operation '{}' as '{}'. Note: {}",
        event_name,
        condition.label(),
        note.unwrap_or("")
    )
}

/// An event cannot end before it starts
pub fn check_dates(start: NaiveDate, end: Option<NaiveDate>) -> AppResult<()> {
    match end {
        Some(end) if end < start => Err(AppError::Validation(
            "The end date cannot be before the start date".to_string(),
        )),
        _ => Ok(()),
    }
}

/// Add units to a counter, rejecting totals that do not fit the column
pub fn add_units(current: i32, quantity: i32) -> AppResult<i32> {
    current
        .checked_add(quantity)
        .ok_or_else(|| AppError::BusinessRule("Quantity too large".to_string()))
}

/// Equipment counters after a maintenance record status change.
///
/// Marking a record repaired moves one unit back to stock when the
/// maintenance counter allows it. A record already repaired moves nothing.
pub fn counters_after_status(
    previous: MaintenanceStatus,
    status: MaintenanceStatus,
    in_stock: i32,
    in_maintenance: i32,
) -> AppResult<(i32, i32)> {
    let repaired_now = status == MaintenanceStatus::Repaired && previous != MaintenanceStatus::Repaired;
    if repaired_now && in_maintenance > 0 {
        Ok((add_units(in_stock, 1)?, in_maintenance - 1))
    } else {
        Ok((in_stock, in_maintenance))
    }
}

/// Check a transfer of units from stock to maintenance
pub fn check_send_to_maintenance(model: &str, quantity: i32, in_stock: i32) -> AppResult<()> {
    if quantity <= 0 {
        return Err(AppError::BusinessRule("Quantity must be positive".to_string()));
    }
    if quantity > in_stock {
        return Err(AppError::BusinessRule(format!(
            "Insufficient stock for '{}': {} requested, {} available",
            model, quantity, in_stock
        )));
    }
    Ok(())
}

/// Check a transfer of units from maintenance back to stock
pub fn check_return_from_maintenance(model: &str, quantity: i32, in_maintenance: i32) -> AppResult<()> {
    if quantity <= 0 {
        return Err(AppError::BusinessRule("Quantity must be positive".to_string()));
    }
    if quantity > in_maintenance {
        return Err(AppError::BusinessRule(format!(
            "Only {} unit(s) of '{}' are in maintenance",
            in_maintenance, model
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    fn line(label: &str, reviewed: bool, planned: i32, stock: Option<i32>) -> ApprovalLine {
        ApprovalLine {
            label: label.to_string(),
            reviewed,
            planned,
            stock,
        }
    }

    #[test]
    fn test_ensure_status() {
        assert_ok!(ensure_status(EventStatus::Planning, &[EventStatus::Planning], "submit"));
        let err = assert_err!(ensure_status(EventStatus::Finished, CANCELLABLE, "cancel"));
        assert!(matches!(err, AppError::InvalidState(ref m) if m.contains("Finished")));
    }

    #[test]
    fn test_require_text() {
        assert_eq!(assert_ok!(require_text(Some("  fix cables "), "Note")), "fix cables");
        assert_err!(require_text(Some("   "), "Note"));
        assert_err!(require_text(None, "Note"));
    }

    #[test]
    fn test_supply_status_follows_stock() {
        assert_eq!(
            supply_status_on_save(SupplyStatus::Sufficient, 10, Some(5)),
            SupplyStatus::Pending
        );
        assert_eq!(
            supply_status_on_save(SupplyStatus::Pending, 5, Some(5)),
            SupplyStatus::Sufficient
        );
        assert_eq!(
            supply_status_on_save(SupplyStatus::Pending, 500, None),
            SupplyStatus::Sufficient
        );
    }

    #[test]
    fn test_supply_resolution_is_sticky() {
        for tag in [SupplyStatus::Subleased, SupplyStatus::Loaned, SupplyStatus::Purchased] {
            assert_eq!(supply_status_on_save(tag, 100, Some(0)), tag);
        }
    }

    #[test]
    fn test_resolve_shortage() {
        assert_eq!(
            assert_ok!(resolve_shortage(SupplyStatus::Pending, Some(SupplyStatus::Loaned))),
            SupplyStatus::Loaned
        );
        assert!(matches!(
            resolve_shortage(SupplyStatus::Sufficient, Some(SupplyStatus::Loaned)),
            Err(AppError::InvalidState(_))
        ));
        assert!(matches!(
            resolve_shortage(SupplyStatus::Pending, Some(SupplyStatus::Substituted)),
            Err(AppError::Validation(_))
        ));
        assert_err!(resolve_shortage(SupplyStatus::Pending, None));
    }

    #[test]
    fn test_approval_rejects_unreviewed_lines() {
        let lines = vec![
            line("Moving head", true, 4, Some(10)),
            line("PAR LED", false, 2, Some(10)),
            line("Gaffer", false, 1, None),
        ];
        let err = assert_err!(check_approval(&lines));
        assert!(err.to_string().contains("2 item(s)"));
    }

    #[test]
    fn test_approval_checks_stock() {
        let short = vec![line("Moving head", true, 11, Some(10))];
        let err = assert_err!(check_approval(&short));
        assert!(err.to_string().contains("Moving head"));

        let ok = vec![line("Moving head", true, 10, Some(12)), line("Rope", true, 99, None)];
        assert_ok!(check_approval(&ok));
    }

    #[test]
    fn test_clone_name() {
        assert_eq!(clone_name(None, Some("Festival")), "Copy of - Festival");
        assert_eq!(clone_name(Some(" "), None), "Copy of - Operation");
        assert_eq!(clone_name(Some("Festival 2027"), Some("Festival")), "Festival 2027");
    }

    #[test]
    fn test_return_problem_description() {
        let text = return_problem_description("Festival", ReturnCondition::Broken, Some("lens"));
        assert_eq!(text, "Returned from operation 'Festival' as 'Broken'. Note: lens");
    }

    #[test]
    fn test_check_dates() {
        let start = NaiveDate::from_ymd_opt(2026, 5, 10).unwrap();
        assert_ok!(check_dates(start, None));
        assert_ok!(check_dates(start, Some(start)));
        let err = assert_err!(check_dates(start, NaiveDate::from_ymd_opt(2026, 5, 9)));
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_repaired_moves_one_unit() {
        use MaintenanceStatus::*;
        assert_eq!(counters_after_status(InRepair, Repaired, 3, 2).ok(), Some((4, 1)));
        assert_eq!(counters_after_status(AwaitingEvaluation, Repaired, 3, 0).ok(), Some((3, 0)));
        assert_eq!(counters_after_status(AwaitingEvaluation, InRepair, 3, 2).ok(), Some((3, 2)));
        assert_eq!(counters_after_status(Repaired, Repaired, 3, 2).ok(), Some((3, 2)));
    }

    #[test]
    fn test_add_units_rejects_overflow() {
        assert_eq!(add_units(5, 3).ok(), Some(8));
        let err = assert_err!(add_units(i32::MAX, 1));
        assert!(matches!(err, AppError::BusinessRule(_)));
        assert_err!(counters_after_status(MaintenanceStatus::InRepair, MaintenanceStatus::Repaired, i32::MAX, 1));
    }

    #[test]
    fn test_maintenance_transfers() {
        assert_ok!(check_send_to_maintenance("Fresnel", 2, 2));
        assert_err!(check_send_to_maintenance("Fresnel", 3, 2));
        assert_err!(check_send_to_maintenance("Fresnel", 0, 2));
        assert_ok!(check_return_from_maintenance("Fresnel", 1, 1));
        assert_err!(check_return_from_maintenance("Fresnel", 2, 1));
    }
}
