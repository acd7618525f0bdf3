// src/metrics/mod.rs
//
// Metrics Engine: pure projections from a SheetTable to one KPI value.
// Every function returns Option<f64>; None means "not computable" (empty
// table, missing column, zero denominator) and is distinct from 0.0. Nothing
// here does I/O or keeps state between calls.

use crate::models::{columns, KpiKind, KpiReport, SheetTable};

/// Parse one raw cell into a number. Sheet exports carry currency formatting:
/// "$1,234.56", "(50)" for negatives, stray "%" and whitespace. Anything that
/// still fails to parse is missing, not an error.
pub fn parse_cell(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let negative = trimmed.starts_with('(') && trimmed.ends_with(')');
    let cleaned: String = trimmed
        .trim_start_matches('(')
        .trim_end_matches(')')
        .chars()
        .filter(|c| !matches!(*c, '$' | ',' | '%' | ' '))
        .collect();
    let value: f64 = cleaned.parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Sum one named column. None when the column is absent; cells that do not
/// parse are skipped, so a column of blanks sums to 0.0.
fn sum_column(table: &SheetTable, name: &str) -> Option<f64> {
    let col = table.column(name)?;
    Some(
        table
            .rows
            .iter()
            .filter_map(|row| row.get(col))
            .filter_map(|cell| parse_cell(cell))
            .sum(),
    )
}

/// Net production: gross plus the adjustment columns (which the tabs record
/// as negative amounts). Tabs without adjustment columns count them as zero.
pub fn production_total(table: &SheetTable) -> Option<f64> {
    if table.is_empty() {
        return None;
    }
    let gross = sum_column(table, columns::GROSS_PRODUCTION)?;
    let adjustments = sum_column(table, columns::ADJUSTMENTS).unwrap_or(0.0);
    let write_offs = sum_column(table, columns::WRITE_OFFS).unwrap_or(0.0);
    Some(gross + adjustments + write_offs)
}

/// Collections as a percentage of gross production.
pub fn collection_rate(table: &SheetTable) -> Option<f64> {
    if table.is_empty() {
        return None;
    }
    let collected = sum_column(table, columns::COLLECTIONS)?;
    let produced = sum_column(table, columns::GROSS_PRODUCTION)?;
    if produced == 0.0 {
        return None;
    }
    Some(collected / produced * 100.0)
}

pub fn new_patients(table: &SheetTable) -> Option<f64> {
    if table.is_empty() {
        return None;
    }
    sum_column(table, columns::NEW_PATIENTS)
}

/// Accepted treatment value as a percentage of presented value.
pub fn treatment_acceptance(table: &SheetTable) -> Option<f64> {
    if table.is_empty() {
        return None;
    }
    let accepted = sum_column(table, columns::TREATMENTS_ACCEPTED)?;
    let presented = sum_column(table, columns::TREATMENTS_PRESENTED)?;
    if presented == 0.0 {
        return None;
    }
    Some(accepted / presented * 100.0)
}

/// Share of hygiene patients who left with their next appointment booked.
pub fn hygiene_reappointment(table: &SheetTable) -> Option<f64> {
    if table.is_empty() {
        return None;
    }
    let total = sum_column(table, columns::HYGIENE_TOTAL)?;
    let missed = sum_column(table, columns::NOT_REAPPOINTED)?;
    if total == 0.0 {
        return None;
    }
    Some((total - missed) / total * 100.0)
}

pub fn compute(kind: KpiKind, table: &SheetTable) -> Option<f64> {
    match kind {
        KpiKind::ProductionTotal => production_total(table),
        KpiKind::CollectionRate => collection_rate(table),
        KpiKind::NewPatients => new_patients(table),
        KpiKind::TreatmentAcceptance => treatment_acceptance(table),
        KpiKind::HygieneReappointment => hygiene_reappointment(table),
    }
}

/// Card values for one location: both tabs in, all five KPIs out.
pub fn card_report(eod: &SheetTable, front: &SheetTable) -> KpiReport {
    KpiReport {
        production_total: production_total(eod),
        collection_rate: collection_rate(eod),
        new_patients: new_patients(front),
        treatment_acceptance: treatment_acceptance(front),
        hygiene_reappointment: hygiene_reappointment(front),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], rows: &[&[&str]]) -> SheetTable {
        SheetTable {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        }
    }

    fn hygiene_table(rows: &[&[&str]]) -> SheetTable {
        table(
            &["Date", "Total Hygiene Appointments", "Patients Not Reappointed"],
            rows,
        )
    }

    #[test]
    fn parses_currency_and_count_cells() {
        assert_eq!(parse_cell("$1,234.56"), Some(1234.56));
        assert_eq!(parse_cell(" 12 "), Some(12.0));
        assert_eq!(parse_cell("(50)"), Some(-50.0));
        assert_eq!(parse_cell("87.5%"), Some(87.5));
        assert_eq!(parse_cell(""), None);
        assert_eq!(parse_cell("n/a"), None);
        assert_eq!(parse_cell("-"), None);
    }

    #[test]
    fn empty_table_is_unavailable_for_every_kpi() {
        let no_rows = table(&["Date", "Total Production"], &[]);
        for kind in KpiKind::ALL {
            assert_eq!(compute(kind, &SheetTable::empty()), None);
            assert_eq!(compute(kind, &no_rows), None);
        }
    }

    #[test]
    fn missing_column_is_unavailable() {
        let t = table(&["Date", "Something Else"], &[&["2026-03-02", "5"]]);
        assert_eq!(new_patients(&t), None);
        assert_eq!(production_total(&t), None);
        assert_eq!(hygiene_reappointment(&t), None);
    }

    #[test]
    fn zero_denominator_is_unavailable_not_infinite() {
        let eod = table(
            &["Date", "Total Production", "Total Collections"],
            &[&["2026-03-02", "$0.00", "$150.00"]],
        );
        assert_eq!(collection_rate(&eod), None);

        let front = table(
            &["Date", "Treatments Presented", "Treatments Accepted"],
            &[&["2026-03-02", "0", "0"]],
        );
        assert_eq!(treatment_acceptance(&front), None);

        let hygiene = hygiene_table(&[&["2026-03-02", "0", "0"]]);
        assert_eq!(hygiene_reappointment(&hygiene), None);
    }

    #[test]
    fn production_total_nets_out_adjustments() {
        let t = table(
            &["Date", "Total Production", "Adjustments", "Write-Offs"],
            &[
                &["2026-03-02", "$1,000.00", "(100)", "$0.00"],
                &["2026-03-03", "$2,500.00", "0", "(250)"],
            ],
        );
        let total = production_total(&t).unwrap();
        assert!((total - 3150.0).abs() < 0.001);
    }

    #[test]
    fn hygiene_reappointment_matches_known_sample() {
        let t = hygiene_table(&[
            &["2026-03-02", "20", "1"],
            &["2026-03-03", "25", "2"],
            &["2026-03-04", "30", "1"],
        ]);
        let rate = hygiene_reappointment(&t).unwrap();
        assert!((rate - 94.67).abs() < 0.01);
    }

    #[test]
    fn hygiene_reappointment_threshold_scenarios() {
        let good = hygiene_table(&[&["2026-03-02", "20", "1"]]);
        assert!(hygiene_reappointment(&good).unwrap() >= 95.0);

        let poor = hygiene_table(&[&["2026-03-02", "20", "3"]]);
        assert!(hygiene_reappointment(&poor).unwrap() < 90.0);
    }

    #[test]
    fn unparsable_cells_are_skipped_not_fatal() {
        let t = table(
            &["Date", "New Patients"],
            &[
                &["2026-03-02", "3"],
                &["2026-03-03", "n/a"],
                &["2026-03-04", "2"],
            ],
        );
        assert_eq!(new_patients(&t), Some(5.0));
    }

    #[test]
    fn recomputation_is_bit_identical() {
        let t = table(
            &["Date", "Total Production", "Total Collections"],
            &[
                &["2026-03-02", "$1,234.56", "$1,000.10"],
                &["2026-03-03", "$987.65", "$876.54"],
            ],
        );
        for kind in KpiKind::ALL {
            let first = compute(kind, &t);
            let second = compute(kind, &t);
            assert_eq!(first.map(f64::to_bits), second.map(f64::to_bits));
        }
    }

    #[test]
    fn card_report_carries_exactly_the_five_kpis() {
        let eod = table(
            &["Date", "Total Production", "Total Collections"],
            &[&["2026-03-02", "$1,000.00", "$900.00"]],
        );
        let front = table(
            &[
                "Date",
                "New Patients",
                "Treatments Presented",
                "Treatments Accepted",
                "Total Hygiene Appointments",
                "Patients Not Reappointed",
            ],
            &[&["2026-03-02", "2", "10", "7", "20", "1"]],
        );

        let report = card_report(&eod, &front);
        let json = serde_json::to_value(&report).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 5);
        for kind in KpiKind::ALL {
            assert!(obj.contains_key(kind.as_str()), "missing {}", kind.as_str());
        }
        assert_eq!(report.new_patients, Some(2.0));
        assert!((report.collection_rate.unwrap() - 90.0).abs() < 0.001);
    }
}
