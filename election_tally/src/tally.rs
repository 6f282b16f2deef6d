use std::collections::BTreeMap;

use crate::model::{
    Constituency, ConstituencyParty, ConstituencyView, PartyResult, PartyTotals, TotalsView,
    WinningParty,
};
use crate::registry::PartyRegistry;

/// The party with the most votes; ties go to the lexicographically
/// smallest party code. The same rule credits seats in the totals, so a
/// tie never produces a different winner in different views.
pub fn winning_party(results: &[PartyResult]) -> Option<&PartyResult> {
    results.iter().min_by(|a, b| {
        b.votes
            .cmp(&a.votes)
            .then_with(|| a.party_code.cmp(&b.party_code))
    })
}

/// Share of the total as a percentage, rounded to one decimal place.
/// Every party reports 0 when the constituency total is 0.
fn share_percent(votes: u64, total_votes: u64) -> f64 {
    if total_votes == 0 {
        return 0.0;
    }
    (votes as f64 / total_votes as f64 * 1000.0).round() / 10.0
}

/// Builds the read model for one constituency: per-party vote shares and
/// the winning party.
pub fn constituency_view(c: &Constituency, registry: &PartyRegistry) -> ConstituencyView {
    let total_votes: u64 = c.party_results.iter().map(|r| r.votes).sum();
    let parties: Vec<ConstituencyParty> = c
        .party_results
        .iter()
        .map(|r| ConstituencyParty {
            party_code: r.party_code.clone(),
            party_name: registry.party_name(&r.party_code),
            votes: r.votes,
            share_percent: share_percent(r.votes, total_votes),
        })
        .collect();
    let winning_party = winning_party(&c.party_results).map(|r| WinningParty {
        code: r.party_code.clone(),
        name: registry.party_name(&r.party_code),
    });
    ConstituencyView {
        id: c.id,
        name: c.name.clone(),
        parties,
        winning_party,
    }
}

/// Sums votes per party across every constituency and credits one seat per
/// constituency to its winner. A constituency with no party results
/// contributes no seat. The result lists the union of all codes seen in
/// either accumulation, sorted by code, with 0 defaults.
pub fn compute_totals(all: &[Constituency], registry: &PartyRegistry) -> TotalsView {
    let mut votes: BTreeMap<String, u64> = BTreeMap::new();
    let mut seats: BTreeMap<String, u64> = BTreeMap::new();
    for c in all {
        for r in &c.party_results {
            *votes.entry(r.party_code.clone()).or_insert(0) += r.votes;
        }
        if let Some(winner) = winning_party(&c.party_results) {
            *seats.entry(winner.party_code.clone()).or_insert(0) += 1;
        }
    }

    let mut codes: Vec<&String> = votes.keys().chain(seats.keys()).collect();
    codes.sort();
    codes.dedup();

    let parties: Vec<PartyTotals> = codes
        .into_iter()
        .map(|code| PartyTotals {
            party_code: code.clone(),
            party_name: registry.party_name(code),
            total_votes: votes.get(code).copied().unwrap_or(0),
            seats: seats.get(code).copied().unwrap_or(0),
        })
        .collect();
    TotalsView { parties }
}
