// Assembly of the JSON summary document out of the core view types.

use serde_json::{json, Map as JSMap, Value as JSValue};

use election_tally::{ConstituencyView, ImportOutcome, ParseError, TotalsView};

fn parse_errors_to_json(errors: &[ParseError]) -> Vec<JSValue> {
    errors
        .iter()
        .map(|e| {
            json!({
                "lineNumber": e.line_number,
                "line": e.line,
                "message": e.message(),
            })
        })
        .collect()
}

pub fn constituency_to_js(view: &ConstituencyView) -> JSValue {
    let parties: Vec<JSValue> = view
        .parties
        .iter()
        .map(|p| {
            json!({
                "partyCode": p.party_code,
                "partyName": p.party_name,
                "votes": p.votes,
                "sharePercent": p.share_percent,
            })
        })
        .collect();
    let winning_party = match &view.winning_party {
        Some(w) => json!({ "code": w.code, "name": w.name }),
        None => JSValue::Null,
    };
    json!({
        "id": view.id.0,
        "name": view.name,
        "parties": parties,
        "winningParty": winning_party,
    })
}

fn totals_to_js(totals: &TotalsView) -> JSValue {
    let by_party: Vec<JSValue> = totals
        .parties
        .iter()
        .map(|p| {
            json!({
                "partyCode": p.party_code,
                "partyName": p.party_name,
                "totalVotes": p.total_votes,
                "seats": p.seats,
            })
        })
        .collect();
    // Only the parties that actually won a seat appear in the map.
    let mut seats_by_party: JSMap<String, JSValue> = JSMap::new();
    for p in totals.parties.iter() {
        if p.seats > 0 {
            seats_by_party.insert(p.party_code.clone(), json!(p.seats));
        }
    }
    json!({
        "totalVotesByParty": by_party,
        "seatsByParty": seats_by_party,
    })
}

pub fn build_summary_js(
    outcome: &ImportOutcome,
    views: &[ConstituencyView],
    totals: &TotalsView,
) -> JSValue {
    let constituencies: Vec<JSValue> = views.iter().map(constituency_to_js).collect();
    json!({
        "imported": outcome.imported,
        "errors": parse_errors_to_json(&outcome.errors),
        "constituencies": constituencies,
        "totals": totals_to_js(totals),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use election_tally::{
        compute_totals, constituency_view, Constituency, ConstituencyId, LineError, PartyRegistry,
        PartyResult,
    };

    fn pair(code: &str, votes: u64) -> PartyResult {
        PartyResult {
            party_code: code.to_string(),
            votes,
        }
    }

    fn fixture() -> (ImportOutcome, Vec<Constituency>) {
        let outcome = ImportOutcome {
            imported: 2,
            errors: vec![ParseError {
                line_number: 3,
                line: "BadLine".to_string(),
                error: LineError::NoPartyResults,
            }],
        };
        let all = vec![
            Constituency {
                id: ConstituencyId(1),
                name: "Bedford".to_string(),
                party_results: vec![pair("C", 6643), pair("L", 5276)],
            },
            Constituency {
                id: ConstituencyId(2),
                name: "Braintree".to_string(),
                party_results: vec![pair("C", 13146), pair("L", 2543)],
            },
        ];
        (outcome, all)
    }

    #[test]
    fn the_summary_carries_import_views_and_totals() {
        let registry = PartyRegistry::uk_default();
        let (outcome, all) = fixture();
        let views: Vec<_> = all.iter().map(|c| constituency_view(c, &registry)).collect();
        let totals = compute_totals(&all, &registry);
        let js = build_summary_js(&outcome, &views, &totals);

        assert_eq!(js["imported"], json!(2));
        assert_eq!(js["errors"][0]["lineNumber"], json!(3));
        assert_eq!(js["errors"][0]["line"], json!("BadLine"));
        assert_eq!(
            js["errors"][0]["message"],
            json!("At least one party result required")
        );
        assert_eq!(js["constituencies"][0]["name"], json!("Bedford"));
        assert_eq!(
            js["constituencies"][0]["winningParty"]["code"],
            json!("C")
        );
        assert_eq!(js["totals"]["seatsByParty"]["C"], json!(2));
        assert!(js["totals"]["seatsByParty"].get("L").is_none());
        assert_eq!(
            js["totals"]["totalVotesByParty"][0]["totalVotes"],
            json!(6643 + 13146)
        );
    }

    #[test]
    fn a_constituency_with_no_results_has_a_null_winner() {
        let registry = PartyRegistry::uk_default();
        let empty = Constituency {
            id: ConstituencyId(9),
            name: "Ghost".to_string(),
            party_results: Vec::new(),
        };
        let js = constituency_to_js(&constituency_view(&empty, &registry));
        assert_eq!(js["winningParty"], JSValue::Null);
        assert_eq!(js["parties"], json!([]));
    }

    #[test]
    fn share_percent_is_rendered_with_one_decimal() {
        let registry = PartyRegistry::uk_default();
        let c = Constituency {
            id: ConstituencyId(1),
            name: "Split".to_string(),
            party_results: vec![pair("C", 1), pair("L", 2)],
        };
        let js = constituency_to_js(&constituency_view(&c, &registry));
        assert_eq!(js["parties"][0]["sharePercent"], json!(33.3));
        assert_eq!(js["parties"][1]["sharePercent"], json!(66.7));
    }
}
