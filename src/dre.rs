use std::collections::BTreeMap;

use crate::taxonomy::{GroupSign, Taxonomy};

/// A transaction amount already resolved to a taxonomy leaf group and
/// category. Uncategorized transactions never reach the aggregator.
#[derive(Debug, Clone)]
pub struct CategorizedAmount {
    pub group_key: String,
    pub category: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Default)]
pub struct GroupResult {
    pub categories: BTreeMap<String, f64>,
    pub total: f64,
}

/// Derived DRE for one period. Never stored; recomputed from the source
/// transactions and mappings on every report.
#[derive(Debug, Clone, Default)]
pub struct DreSnapshot {
    groups: BTreeMap<String, GroupResult>,
}

impl DreSnapshot {
    pub fn group(&self, key: &str) -> Option<&GroupResult> {
        self.groups.get(key)
    }

    pub fn total(&self, key: &str) -> f64 {
        self.groups.get(key).map(|g| g.total).unwrap_or(0.0)
    }
}

/// Aggregate categorized amounts into a DRE snapshot.
///
/// Leaf groups get per-category sums: revenue groups accumulate raw
/// signed amounts, every other group accumulates absolute values. This
/// means a refund recorded as a negative amount inside an expense group
/// still increases that group's total; observed behavior, kept on
/// purpose. Total groups are then evaluated in taxonomy order over the
/// totals of their dependencies.
pub fn build_snapshot(taxonomy: &Taxonomy, items: &[CategorizedAmount]) -> DreSnapshot {
    let mut groups: BTreeMap<String, GroupResult> = BTreeMap::new();
    for group in taxonomy.leaf_groups() {
        groups.insert(group.key().to_string(), GroupResult::default());
    }

    for item in items {
        let Some(def) = taxonomy.by_key(&item.group_key) else {
            continue;
        };
        let Some(sign) = def.sign() else {
            continue;
        };
        let entry = groups
            .entry(item.group_key.clone())
            .or_default()
            .categories
            .entry(item.category.clone())
            .or_insert(0.0);
        match sign {
            GroupSign::Revenue => *entry += item.amount,
            GroupSign::Expense => *entry += item.amount.abs(),
        }
    }

    for result in groups.values_mut() {
        result.total = result.categories.values().sum();
    }

    let mut snapshot = DreSnapshot { groups };
    for group in taxonomy.groups() {
        if let crate::taxonomy::GroupDef::Total {
            key,
            dependencies,
            combine,
            ..
        } = group
        {
            let values: Vec<f64> = dependencies.iter().map(|d| snapshot.total(d)).collect();
            snapshot.groups.insert(
                key.to_string(),
                GroupResult {
                    categories: BTreeMap::new(),
                    total: combine(&values),
                },
            );
        }
    }
    snapshot
}

#[derive(Debug, Clone)]
pub struct GroupComparison {
    pub group_key: String,
    pub current: f64,
    pub previous: f64,
    pub difference: f64,
    /// Relative variation `(current - previous) / |previous|`; defined as
    /// 0 when the previous total is 0.
    pub variation: f64,
}

/// Diff two period snapshots group by group, in taxonomy order. Groups
/// absent from either snapshot are skipped.
pub fn compare_periods(
    taxonomy: &Taxonomy,
    current: &DreSnapshot,
    previous: &DreSnapshot,
) -> Vec<GroupComparison> {
    let mut comparisons = Vec::new();
    for group in taxonomy.groups() {
        let key = group.key();
        let (Some(cur), Some(prev)) = (current.group(key), previous.group(key)) else {
            continue;
        };
        let difference = cur.total - prev.total;
        let variation = if prev.total != 0.0 {
            difference / prev.total.abs()
        } else {
            0.0
        };
        comparisons.push(GroupComparison {
            group_key: key.to_string(),
            current: cur.total,
            previous: prev.total,
            difference,
            variation,
        });
    }
    comparisons
}

/// Input row for monthly trend totals: amount plus the resolved group, if
/// any. Uncategorized rows still count as expenses when negative.
#[derive(Debug, Clone)]
pub struct TrendInput {
    pub amount: f64,
    pub group_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TrendPoint {
    pub period: String,
    pub revenue: f64,
    pub expenses: f64,
    pub profit: f64,
}

/// Collapse one period's transactions into revenue/expenses/profit.
pub fn trend_point(taxonomy: &Taxonomy, period: &str, inputs: &[TrendInput]) -> TrendPoint {
    let mut revenue = 0.0f64;
    let mut expenses = 0.0f64;
    for input in inputs {
        let sign = input
            .group_key
            .as_deref()
            .and_then(|k| taxonomy.by_key(k))
            .and_then(|g| g.sign());
        match sign {
            Some(GroupSign::Revenue) => revenue += input.amount,
            Some(GroupSign::Expense) => expenses += input.amount.abs(),
            None if input.amount < 0.0 => expenses += input.amount.abs(),
            None => {}
        }
    }
    TrendPoint {
        period: period.to_string(),
        revenue,
        expenses,
        profit: revenue - expenses,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(group_key: &str, category: &str, amount: f64) -> CategorizedAmount {
        CategorizedAmount {
            group_key: group_key.to_string(),
            category: category.to_string(),
            amount,
        }
    }

    #[test]
    fn test_revenue_groups_sum_signed() {
        let tax = Taxonomy::standard();
        let snapshot = build_snapshot(
            &tax,
            &[
                item("1. RECEITA", "PIX", 100.0),
                item("1. RECEITA", "PIX", -20.0),
            ],
        );
        assert_eq!(snapshot.total("1. RECEITA"), 80.0);
    }

    #[test]
    fn test_expense_groups_sum_absolute_values() {
        let tax = Taxonomy::standard();
        let snapshot = build_snapshot(
            &tax,
            &[
                item("7. (-) DESPESAS OPERACIONAIS", "Aluguel", -150.0),
                item("7. (-) DESPESAS OPERACIONAIS", "Aluguel", -50.0),
            ],
        );
        assert_eq!(snapshot.total("7. (-) DESPESAS OPERACIONAIS"), 200.0);
    }

    #[test]
    fn test_expense_refund_increases_group_total() {
        // A credit inside an expense category is folded in as an absolute
        // value, so the group total grows. Kept as observed behavior.
        let tax = Taxonomy::standard();
        let snapshot = build_snapshot(
            &tax,
            &[
                item("7. (-) DESPESAS OPERACIONAIS", "Energia Elétrica", -100.0),
                item("7. (-) DESPESAS OPERACIONAIS", "Energia Elétrica", 30.0),
            ],
        );
        assert_eq!(snapshot.total("7. (-) DESPESAS OPERACIONAIS"), 130.0);
    }

    #[test]
    fn test_formula_groups_evaluated_in_order() {
        let tax = Taxonomy::standard();
        let snapshot = build_snapshot(
            &tax,
            &[
                item("1. RECEITA", "Dinheiro", 1000.0),
                item("2. (-) DEDUÇÕES DA RECEITA", "ISS", -50.0),
                item(
                    "4. (+) OUTRAS RECEITAS OPERACIONAIS E NÃO OPERACIONAIS",
                    "Empréstimo",
                    200.0,
                ),
                item("5. (-) CUSTOS DAS MERCADORIAS VENDIDAS (CMV)", "Bebidas", -300.0),
                item("7. (-) DESPESAS OPERACIONAIS", "Aluguel", -150.0),
                item("8. (-) DESPESAS COM SÓCIOS", "Pró-labore", -100.0),
                item("9. (-) INVESTIMENTOS", "Obras e Instalações", -80.0),
            ],
        );
        // receita líquida = 1000 - 50
        assert_eq!(snapshot.total("3. (=) RECEITA LÍQUIDA"), 950.0);
        // lucro bruto = 950 + 200 - 300
        assert_eq!(snapshot.total("6. (=) LUCRO BRUTO"), 850.0);
        // lucro líquido = 850 - 150 - 100 - 80
        assert_eq!(snapshot.total("10. (=) LUCRO LÍQUIDO"), 520.0);
    }

    #[test]
    fn test_unknown_group_keys_are_ignored() {
        let tax = Taxonomy::standard();
        let snapshot = build_snapshot(&tax, &[item("GRUPO INEXISTENTE", "X", 500.0)]);
        assert_eq!(snapshot.total("1. RECEITA"), 0.0);
        assert_eq!(snapshot.total("10. (=) LUCRO LÍQUIDO"), 0.0);
    }

    #[test]
    fn test_per_category_sums() {
        let tax = Taxonomy::standard();
        let snapshot = build_snapshot(
            &tax,
            &[
                item("1. RECEITA", "PIX", 100.0),
                item("1. RECEITA", "Dinheiro", 40.0),
                item("1. RECEITA", "PIX", 60.0),
            ],
        );
        let group = snapshot.group("1. RECEITA").unwrap();
        assert_eq!(group.categories["PIX"], 160.0);
        assert_eq!(group.categories["Dinheiro"], 40.0);
        assert_eq!(group.total, 200.0);
    }

    #[test]
    fn test_compare_identical_periods_is_all_zero() {
        let tax = Taxonomy::standard();
        let snapshot = build_snapshot(
            &tax,
            &[
                item("1. RECEITA", "PIX", 100.0),
                item("7. (-) DESPESAS OPERACIONAIS", "Aluguel", -150.0),
            ],
        );
        let comparisons = compare_periods(&tax, &snapshot, &snapshot);
        assert_eq!(comparisons.len(), tax.groups().len());
        for c in comparisons {
            assert_eq!(c.difference, 0.0, "group {}", c.group_key);
            assert_eq!(c.variation, 0.0, "group {}", c.group_key);
        }
    }

    #[test]
    fn test_compare_zero_previous_guards_division() {
        let tax = Taxonomy::standard();
        let current = build_snapshot(&tax, &[item("1. RECEITA", "PIX", 100.0)]);
        let previous = build_snapshot(&tax, &[]);
        let comparisons = compare_periods(&tax, &current, &previous);
        let receita = comparisons
            .iter()
            .find(|c| c.group_key == "1. RECEITA")
            .unwrap();
        assert_eq!(receita.difference, 100.0);
        assert_eq!(receita.variation, 0.0);
    }

    #[test]
    fn test_compare_variation_uses_abs_previous() {
        let tax = Taxonomy::standard();
        let current = build_snapshot(&tax, &[item("1. RECEITA", "PIX", 150.0)]);
        let previous = build_snapshot(&tax, &[item("1. RECEITA", "PIX", 100.0)]);
        let comparisons = compare_periods(&tax, &current, &previous);
        let receita = comparisons
            .iter()
            .find(|c| c.group_key == "1. RECEITA")
            .unwrap();
        assert_eq!(receita.difference, 50.0);
        assert!((receita.variation - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_trend_point_totals() {
        let tax = Taxonomy::standard();
        let inputs = vec![
            TrendInput {
                amount: 500.0,
                group_key: Some("1. RECEITA".to_string()),
            },
            TrendInput {
                amount: -120.0,
                group_key: Some("7. (-) DESPESAS OPERACIONAIS".to_string()),
            },
            // Uncategorized but negative: counted as an expense.
            TrendInput {
                amount: -30.0,
                group_key: None,
            },
            // Uncategorized positive: not counted.
            TrendInput {
                amount: 99.0,
                group_key: None,
            },
        ];
        let point = trend_point(&tax, "2024-01", &inputs);
        assert_eq!(point.revenue, 500.0);
        assert_eq!(point.expenses, 150.0);
        assert_eq!(point.profit, 350.0);
    }
}
