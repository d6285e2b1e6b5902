//! Solar PV detection from EPC records and observed export.

use std::collections::BTreeSet;

use meterstat_io::EpcRecord;

const ENGLAND_AND_WALES: &str = "England and Wales";
const SCOTLAND: &str = "Scotland";

/// Households inferred to have PV.
///
/// An English or Welsh certificate counts when `photoSupply` parses as a
/// positive number. Scottish certificates record free text, so the first
/// run of digits is read instead; it is either peak power or a percentage
/// of roof area. Every household in `exporters` also counts.
pub fn pv_households<'a>(
    epc: &'a [EpcRecord],
    exporters: &'a [String],
) -> BTreeSet<&'a str> {
    let from_epc = epc
        .iter()
        .filter(|rec| {
            let Some(supply) = rec.photo_supply.as_deref() else {
                return false;
            };
            match rec.epc_version.as_deref() {
                Some(ENGLAND_AND_WALES) => supply.trim().parse::<f64>().is_ok_and(|v| v > 0.0),
                Some(SCOTLAND) => first_number(supply).is_some_and(|v| v > 0),
                _ => false,
            }
        })
        .map(|rec| rec.puprn.as_str());

    from_epc.chain(exporters.iter().map(String::as_str)).collect()
}

/// First run of ASCII digits in `s`.
fn first_number(s: &str) -> Option<u64> {
    let start = s.find(|c: char| c.is_ascii_digit())?;
    let digits: String = s[start..]
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

/// `True` or `False` per participant, in participant order.
pub(crate) fn pv_label(has_pv: bool) -> &'static str {
    if has_pv { "True" } else { "False" }
}
