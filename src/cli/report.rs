use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::categorizer::{uncategorized, UncategorizedTransaction};
use crate::cli::parse_period_opt;
use crate::db::get_connection;
use crate::dre::{DreSnapshot, GroupComparison, TrendPoint};
use crate::error::Result;
use crate::fmt::{money, percent};
use crate::ofx::period_label;
use crate::reports;
use crate::settings::{db_path, load_settings};
use crate::taxonomy::Taxonomy;

/// Prepend company name as a header line if non-empty.
fn with_header(company_name: &str, body: String) -> String {
    if company_name.is_empty() {
        body
    } else {
        format!("{company_name}\n{body}")
    }
}

pub fn dre(period: Option<String>) -> Result<()> {
    let conn = get_connection(&db_path())?;
    let settings = load_settings();
    let period = parse_period_opt(&period)?;
    let taxonomy = Taxonomy::standard();
    let snapshot = reports::get_dre(&conn, &taxonomy, &period)?;
    println!(
        "{}",
        with_header(&settings.company_name, format_dre(&taxonomy, &period, &snapshot))
    );
    Ok(())
}

pub fn compare(period: &str, previous: &str) -> Result<()> {
    let conn = get_connection(&db_path())?;
    let settings = load_settings();
    let period = parse_period_opt(&Some(period.to_string()))?;
    let previous = parse_period_opt(&Some(previous.to_string()))?;
    let taxonomy = Taxonomy::standard();
    let comparisons = reports::get_comparison(&conn, &taxonomy, &period, &previous)?;
    println!(
        "{}",
        with_header(
            &settings.company_name,
            format_compare(&taxonomy, &period, &previous, &comparisons),
        )
    );
    Ok(())
}

pub fn trends(months: usize) -> Result<()> {
    let conn = get_connection(&db_path())?;
    let settings = load_settings();
    let taxonomy = Taxonomy::standard();
    let points = reports::get_trends(&conn, &taxonomy, months)?;
    println!(
        "{}",
        with_header(&settings.company_name, format_trends(&points))
    );
    Ok(())
}

pub fn uncategorized_report(period: Option<String>) -> Result<()> {
    let conn = get_connection(&db_path())?;
    let settings = load_settings();
    let period = match period {
        Some(_) => Some(parse_period_opt(&period)?),
        None => None,
    };
    let rows = uncategorized(&conn, period.as_deref())?;
    println!(
        "{}",
        with_header(
            &settings.company_name,
            format_uncategorized(period.as_deref(), &rows),
        )
    );
    Ok(())
}

pub fn format_dre(taxonomy: &Taxonomy, period: &str, snapshot: &DreSnapshot) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Grupo", "Valor"]);

    for group in taxonomy.groups() {
        let key = group.key();
        let total = snapshot.total(key);
        if group.is_total() {
            let label = if total >= 0.0 {
                key.green().bold()
            } else {
                key.red().bold()
            };
            table.add_row(vec![Cell::new(label), Cell::new(money(total).bold())]);
            continue;
        }
        table.add_row(vec![Cell::new(key.bold()), Cell::new(money(total))]);
        if let Some(result) = snapshot.group(key) {
            for (category, amount) in &result.categories {
                table.add_row(vec![
                    Cell::new(format!("  {category}")),
                    Cell::new(money(*amount)),
                ]);
            }
        }
    }

    format!("DRE \u{2013} {}\n{table}", period_label(period))
}

pub fn format_compare(
    taxonomy: &Taxonomy,
    period: &str,
    previous: &str,
    comparisons: &[GroupComparison],
) -> String {
    let mut table = Table::new();
    table.set_header(vec![
        "Grupo",
        period_label(previous).as_str(),
        period_label(period).as_str(),
        "Diferença",
        "Variação",
    ]);
    for c in comparisons {
        let is_total = taxonomy.by_key(&c.group_key).is_some_and(|g| g.is_total());
        let label = if is_total {
            Cell::new(c.group_key.bold())
        } else {
            Cell::new(&c.group_key)
        };
        table.add_row(vec![
            label,
            Cell::new(money(c.previous)),
            Cell::new(money(c.current)),
            Cell::new(money(c.difference)),
            Cell::new(percent(c.variation)),
        ]);
    }
    format!("Comparativo de períodos\n{table}")
}

pub fn format_trends(points: &[TrendPoint]) -> String {
    if points.is_empty() {
        return "No transactions imported yet.".to_string();
    }
    let mut table = Table::new();
    table.set_header(vec!["Mês", "Receitas", "Despesas", "Resultado"]);
    for p in points {
        let profit = if p.profit >= 0.0 {
            money(p.profit).green()
        } else {
            money(p.profit).red()
        };
        table.add_row(vec![
            Cell::new(period_label(&p.period)),
            Cell::new(money(p.revenue)),
            Cell::new(money(p.expenses)),
            Cell::new(profit),
        ]);
    }
    format!("Evolução mensal\n{table}")
}

pub fn format_uncategorized(period: Option<&str>, rows: &[UncategorizedTransaction]) -> String {
    let title = match period {
        Some(p) => format!("Uncategorized \u{2013} {}", period_label(p)),
        None => "Uncategorized (all periods)".to_string(),
    };
    if rows.is_empty() {
        return format!("{title}\nAll transactions are categorized.");
    }
    let mut table = Table::new();
    table.set_header(vec!["ID", "Date", "Description", "Amount"]);
    let mut net = 0.0f64;
    for t in rows {
        net += t.amount;
        table.add_row(vec![
            Cell::new(t.id),
            Cell::new(&t.date),
            Cell::new(&t.description),
            Cell::new(money(t.amount)),
        ]);
    }
    format!(
        "{title}\n{table}\n{} transaction(s), net {}\nAssign with: drebook assign --category 'GROUP.Category' --ids <id> ...",
        rows.len(),
        money(net)
    )
}
