//! Which households have a gas supply.

use std::collections::BTreeSet;

use meterstat_io::{EpcRecord, ParticipantRecord, ReadTypeRecord, SurveyRecord};

/// EPC `mainFuel` descriptions that mean mains gas.
pub const MAINS_GAS_FUELS: [&str; 4] = [
    "mains gas - this is for backwards compatibility only and should not be used",
    "mains gas (not community)",
    "mains gas (community)",
    "Gas: mains gas",
];

/// Device type of a gas proxy function, which implies a gas meter.
pub const GAS_PROXY_DEVICE: &str = "GPF";

/// Households with evidence of gas heating: a gas boiler ticked in the
/// survey or a mains-gas main fuel on the EPC.
pub fn gas_households<'a>(survey: &'a [SurveyRecord], epc: &'a [EpcRecord]) -> BTreeSet<&'a str> {
    let from_survey = survey
        .iter()
        .filter(|s| s.a3_option(2) == Some(1))
        .map(|s| s.puprn.as_str());
    let from_epc = epc
        .iter()
        .filter(|e| {
            e.main_fuel
                .as_deref()
                .is_some_and(|f| MAINS_GAS_FUELS.contains(&f))
        })
        .map(|e| e.puprn.as_str());
    from_survey.chain(from_epc).collect()
}

/// Participants confirmed to have no gas: not in the gas set and without a
/// gas proxy meter.
pub fn no_gas_households(
    participants: &[ParticipantRecord],
    survey: &[SurveyRecord],
    epc: &[EpcRecord],
    read_types: &[ReadTypeRecord],
) -> BTreeSet<String> {
    let gas = gas_households(survey, epc);
    let proxied: BTreeSet<&str> = read_types
        .iter()
        .filter(|r| r.device_type.as_deref() == Some(GAS_PROXY_DEVICE))
        .map(|r| r.puprn.as_str())
        .collect();

    participants
        .iter()
        .map(|p| p.puprn.as_str())
        .filter(|p| !gas.contains(p) && !proxied.contains(p))
        .map(str::to_string)
        .collect()
}
