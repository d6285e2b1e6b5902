//! Total consumption for households without gas.

use std::collections::BTreeSet;

use meterstat_io::EnergyTable;
use tracing::info;

/// Sets `total` to `elec` on every row of a household in `no_gas`.
///
/// Profiles compute the total as electricity plus gas, which is null for a
/// household with no gas meter; for these homes electricity is the whole
/// of their metered energy. Returns the number of rows changed.
pub fn apply_no_gas_total(table: &mut EnergyTable, no_gas: &BTreeSet<String>) -> usize {
    let mut n_rows = 0;
    for row in table.rows_mut() {
        if no_gas.contains(&row.puprn) {
            row.total = row.elec;
            n_rows += 1;
        }
    }
    info!(kind = %table.kind(), n_rows, "set total to electricity for households without gas");
    n_rows
}

#[cfg(test)]
mod tests {
    use meterstat_io::{EnergyRow, Granularity, Layout, TableKind};

    use super::*;

    #[test]
    fn only_no_gas_rows_change() {
        let rows = vec![
            EnergyRow {
                elec: Some(4.0),
                gas: None,
                total: None,
                ..EnergyRow::new("NOGAS")
            },
            EnergyRow {
                elec: Some(4.0),
                gas: Some(6.0),
                total: Some(10.0),
                ..EnergyRow::new("GAS")
            },
        ];
        let mut table = EnergyTable::new(TableKind::new(Granularity::Daily, Layout::Period), rows);
        let no_gas = BTreeSet::from(["NOGAS".to_string()]);

        assert_eq!(apply_no_gas_total(&mut table, &no_gas), 1);
        assert_eq!(table.rows()[0].total, Some(4.0));
        assert_eq!(table.rows()[1].total, Some(10.0));
    }
}
