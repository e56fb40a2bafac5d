#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::*;
use crate::analytics::AnalyticsFilter;
use crate::error::Error;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn month(s: &str) -> Month {
    Month::parse(s).unwrap()
}

fn empty_store() -> RecordStore {
    RecordStore::open_in_memory(false).unwrap()
}

fn food(amount: Decimal, day: &str) -> NewExpense {
    NewExpense::new(amount, Category::Food, date(day))
}

// ── Bootstrap ─────────────────────────────────────────────────

#[test]
fn test_fresh_store_is_seeded() {
    let store = RecordStore::open_in_memory(true).unwrap();
    assert_eq!(store.expenses().len(), 12);
    assert_eq!(store.expenses()[0].description, "Groceries");
    assert_eq!(store.expenses()[0].amount, dec!(45.50));

    let jan = month("2026-01");
    assert_eq!(store.budgets().len(), 6);
    assert_eq!(store.get_budget(Category::Food, jan), Some(dec!(400)));
    assert_eq!(store.get_budget(Category::Bills, jan), Some(dec!(300)));
    assert_eq!(store.get_budget(Category::Travel, jan), Some(dec!(200)));
    assert_eq!(store.get_budget(Category::Health, jan), Some(dec!(150)));
}

#[test]
fn test_seed_can_be_disabled() {
    let store = empty_store();
    assert!(store.expenses().is_empty());
    assert!(store.budgets().is_empty());
}

#[test]
fn test_never_reseeds_existing_data() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::in_dir(dir.path()).unwrap();
    {
        let mut store = RecordStore::open(&config).unwrap();
        let ids: Vec<ExpenseId> = store.expenses().iter().map(|e| e.id).collect();
        for id in ids {
            store.delete_expense(id).unwrap();
        }
        assert!(store.expenses().is_empty());
    }

    let store = RecordStore::open(&config).unwrap();
    assert!(store.expenses().is_empty());
    assert_eq!(store.budgets().len(), 6);
}

#[test]
fn test_corrupt_snapshot_is_not_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::in_dir(dir.path()).unwrap();
    drop(RecordStore::open(&config).unwrap());

    let conn = rusqlite::Connection::open(&config.db_path).unwrap();
    conn.execute("UPDATE expenses SET amount = 'NaN?' WHERE id = 1", [])
        .unwrap();
    drop(conn);

    let err = RecordStore::open(&config).err().unwrap();
    assert!(matches!(err, Error::CorruptSnapshot { .. }));

    // The bad row is still there; nothing was reseeded over it.
    let conn = rusqlite::Connection::open(&config.db_path).unwrap();
    let amount: String = conn
        .query_row("SELECT amount FROM expenses WHERE id = 1", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(amount, "NaN?");
}

#[test]
fn test_fresh_open_writes_both_snapshots() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::in_dir(dir.path()).unwrap();
    drop(RecordStore::open(&config).unwrap());

    let conn = rusqlite::Connection::open(&config.db_path).unwrap();
    let markers: i64 = conn
        .query_row("SELECT COUNT(*) FROM snapshots", [], |row| row.get(0))
        .unwrap();
    assert_eq!(markers, 2);
}

#[test]
fn test_missing_budget_snapshot_seeds_budgets_only() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::in_dir(dir.path()).unwrap();
    {
        let mut store = RecordStore::open(&config).unwrap();
        let first = store.expenses()[0].id;
        store.delete_expense(first).unwrap();
    }
    let conn = rusqlite::Connection::open(&config.db_path).unwrap();
    conn.execute_batch("DELETE FROM snapshots WHERE name = 'budgets'; DELETE FROM budgets;")
        .unwrap();
    drop(conn);

    let store = RecordStore::open(&config).unwrap();
    assert_eq!(store.expenses().len(), 11);
    assert_eq!(store.budgets().len(), 6);
}

// ── Expenses ──────────────────────────────────────────────────

#[test]
fn test_add_expense_goes_to_head() {
    let mut store = empty_store();
    let first = store.add_expense(food(dec!(10), "2026-01-01")).unwrap();
    let second = store
        .add_expense(
            NewExpense::new(dec!(20), Category::Bills, date("2026-01-02"))
                .with_description("Water"),
        )
        .unwrap();

    assert_ne!(first.id, second.id);
    assert_eq!(store.expenses()[0].id, second.id);
    assert_eq!(store.expenses()[1].id, first.id);
    assert_eq!(second.description, "Water");
    assert!(first.description.is_empty());
}

#[test]
fn test_add_expense_rejects_non_positive_amount() {
    let mut store = empty_store();
    assert!(matches!(
        store.add_expense(food(dec!(0), "2026-01-01")),
        Err(Error::Validation(_))
    ));
    assert!(matches!(
        store.add_expense(food(dec!(-3), "2026-01-01")),
        Err(Error::Validation(_))
    ));
    assert!(store.expenses().is_empty());
}

#[test]
fn test_add_expense_rejects_amount_above_maximum() {
    let mut store = empty_store();
    assert!(matches!(
        store.add_expense(food(Decimal::MAX, "2026-01-05")),
        Err(Error::Validation(_))
    ));
    assert!(store.expenses().is_empty());
}

#[test]
fn test_analyze_with_largest_amounts() {
    let mut store = empty_store();
    store.add_expense(food(MAX_AMOUNT, "2026-01-05")).unwrap();
    store.add_expense(food(MAX_AMOUNT, "2026-01-06")).unwrap();

    let a = store.analyze(&AnalyticsFilter::default(), date("2026-01-20"));
    assert_eq!(a.stats.total_spending, MAX_AMOUNT * dec!(2));
    assert_eq!(a.monthly_trend[0].amount, MAX_AMOUNT * dec!(2));
}

#[test]
fn test_ids_are_never_reused() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::in_dir(dir.path()).unwrap().with_demo_data(false);
    let deleted = {
        let mut store = RecordStore::open(&config).unwrap();
        store.add_expense(food(dec!(1), "2026-01-01")).unwrap();
        let newest = store.add_expense(food(dec!(2), "2026-01-02")).unwrap();
        store.delete_expense(newest.id).unwrap();
        newest.id
    };

    let mut store = RecordStore::open(&config).unwrap();
    let added = store.add_expense(food(dec!(3), "2026-01-03")).unwrap();
    assert!(added.id > deleted);
}

#[test]
fn test_update_expense_merges_fields() {
    let mut store = empty_store();
    let original = store
        .add_expense(food(dec!(10), "2026-01-01").with_description("Lunch"))
        .unwrap();

    let update = ExpenseUpdate {
        category: Some(Category::Travel),
        date: Some(date("2026-01-04")),
        ..ExpenseUpdate::default()
    };
    let updated = store.update_expense(original.id, &update).unwrap().unwrap();

    assert_eq!(updated.id, original.id);
    assert_eq!(updated.created_at, original.created_at);
    assert_eq!(updated.amount, dec!(10));
    assert_eq!(updated.description, "Lunch");
    assert_eq!(updated.category, Category::Travel);
    assert_eq!(updated.date, date("2026-01-04"));
    assert_eq!(store.expense(original.id), Some(&updated));
}

#[test]
fn test_update_unknown_expense_is_none() {
    let mut store = empty_store();
    store.add_expense(food(dec!(10), "2026-01-01")).unwrap();
    let before = store.expenses().to_vec();

    let update = ExpenseUpdate {
        amount: Some(dec!(99)),
        ..ExpenseUpdate::default()
    };
    let result = store
        .update_expense(ExpenseId::from_raw(4242), &update)
        .unwrap();
    assert!(result.is_none());
    assert_eq!(store.expenses(), before.as_slice());
}

#[test]
fn test_update_rejects_invalid_amount() {
    let mut store = empty_store();
    let e = store.add_expense(food(dec!(10), "2026-01-01")).unwrap();
    let update = ExpenseUpdate {
        amount: Some(dec!(0)),
        ..ExpenseUpdate::default()
    };
    assert!(store.update_expense(e.id, &update).is_err());
    assert_eq!(store.expense(e.id).unwrap().amount, dec!(10));
}

#[test]
fn test_delete_is_idempotent() {
    let mut store = empty_store();
    let a = store.add_expense(food(dec!(10), "2026-01-01")).unwrap();
    let b = store.add_expense(food(dec!(20), "2026-01-02")).unwrap();

    assert!(store.delete_expense(a.id).unwrap());
    let after_once = store.expenses().to_vec();
    assert!(!store.delete_expense(a.id).unwrap());
    assert_eq!(store.expenses(), after_once.as_slice());
    assert_eq!(store.expenses().len(), 1);
    assert_eq!(store.expenses()[0].id, b.id);
}

#[test]
fn test_mutations_are_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::in_dir(dir.path()).unwrap().with_demo_data(false);
    let kept = {
        let mut store = RecordStore::open(&config).unwrap();
        let kept = store.add_expense(food(dec!(10), "2026-01-01")).unwrap();
        let gone = store.add_expense(food(dec!(20), "2026-01-02")).unwrap();
        store.delete_expense(gone.id).unwrap();
        let update = ExpenseUpdate {
            description: Some("Bakery".into()),
            ..ExpenseUpdate::default()
        };
        store.update_expense(kept.id, &update).unwrap();
        store
            .update_budget(Category::Food, dec!(250), month("2026-01"))
            .unwrap();
        kept
    };

    let store = RecordStore::open(&config).unwrap();
    assert_eq!(store.expenses().len(), 1);
    assert_eq!(store.expenses()[0].id, kept.id);
    assert_eq!(store.expenses()[0].description, "Bakery");
    assert_eq!(
        store.get_budget(Category::Food, month("2026-01")),
        Some(dec!(250))
    );
}

// ── Import ────────────────────────────────────────────────────

#[test]
fn test_import_inserts_ahead_in_order() {
    let mut store = empty_store();
    let existing = store.add_expense(food(dec!(5), "2026-01-01")).unwrap();

    let count = store
        .import_expenses(vec![
            food(dec!(1), "2026-01-02").with_description("first"),
            food(dec!(2), "2026-01-03").with_description("second"),
        ])
        .unwrap();

    assert_eq!(count, 2);
    let descriptions: Vec<&str> = store
        .expenses()
        .iter()
        .map(|e| e.description.as_str())
        .collect();
    assert_eq!(descriptions, ["first", "second", ""]);
    assert_eq!(store.expenses()[2].id, existing.id);

    let mut ids: Vec<ExpenseId> = store.expenses().iter().map(|e| e.id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 3);
}

#[test]
fn test_import_is_all_or_nothing() {
    let mut store = empty_store();
    let result = store.import_expenses(vec![
        food(dec!(1), "2026-01-02"),
        food(dec!(0), "2026-01-03"),
    ]);
    assert!(matches!(result, Err(Error::Validation(_))));
    assert!(store.expenses().is_empty());
}

#[test]
fn test_import_nothing() {
    let mut store = empty_store();
    assert_eq!(store.import_expenses(Vec::new()).unwrap(), 0);
}

// ── Budgets ───────────────────────────────────────────────────

#[test]
fn test_update_budget_replaces_existing_entry() {
    let mut store = empty_store();
    let jan = month("2026-01");
    store.update_budget(Category::Food, dec!(200), jan).unwrap();
    store.update_budget(Category::Food, dec!(350), jan).unwrap();

    let entries: Vec<&Budget> = store
        .budgets()
        .iter()
        .filter(|b| b.matches(Category::Food, jan))
        .collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].limit, dec!(350));
}

#[test]
fn test_update_budget_appends_new_keys() {
    let mut store = empty_store();
    let jan = month("2026-01");
    store.update_budget(Category::Food, dec!(200), jan).unwrap();
    store
        .update_budget(Category::Food, dec!(180), jan.previous())
        .unwrap();
    store.update_budget(Category::Travel, dec!(90), jan).unwrap();

    assert_eq!(store.budgets().len(), 3);
    assert_eq!(store.get_budget(Category::Food, jan), Some(dec!(200)));
    assert_eq!(
        store.get_budget(Category::Food, jan.previous()),
        Some(dec!(180))
    );
    assert_eq!(store.get_budget(Category::Bills, jan), None);
}

#[test]
fn test_update_budget_rejects_non_positive_limit() {
    let mut store = empty_store();
    let jan = month("2026-01");
    assert!(matches!(
        store.update_budget(Category::Food, dec!(0), jan),
        Err(Error::Validation(_))
    ));
    assert!(store.update_budget(Category::Food, dec!(-10), jan).is_err());
    assert!(matches!(
        store.update_budget(Category::Food, Decimal::MAX, jan),
        Err(Error::Validation(_))
    ));
    assert!(store.budgets().is_empty());
}

// ── Analytics ─────────────────────────────────────────────────

#[test]
fn test_analyze_seeded_january() {
    let store = RecordStore::open_in_memory(true).unwrap();
    let filter = AnalyticsFilter::default().with_month(month("2026-01"));
    let a = store.analyze(&filter, date("2026-01-20"));

    assert_eq!(a.filtered_expenses.len(), 9);
    assert_eq!(a.stats.total_spending, dec!(620.49));
    assert_eq!(a.stats.highest_category, Category::Shopping);
    assert_eq!(a.total_budget, dec!(1350));
    assert_eq!(a.monthly_trend.len(), 2);
    assert!(a.insights.len() <= 4);
    // December had 295 of spending, January 620.49.
    assert_eq!(
        a.insights[0].message,
        "Spending is up 110% compared to last month"
    );
    assert!(a
        .insights
        .iter()
        .any(|i| i.message == "Shopping is 60% over budget"));
}
