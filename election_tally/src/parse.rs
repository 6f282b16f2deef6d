use log::debug;

use crate::model::{LineError, ParseError, ParseOutcome, ParsedRow, PartyResult};

/// Splits a line into comma-delimited fields.
///
/// A backslash immediately followed by a comma stands for a literal comma
/// and does not separate fields; both characters are consumed as one. A
/// lone backslash is copied verbatim. Every field is trimmed. A line
/// ending exactly on a separator does not produce a trailing empty field.
pub fn tokenize(s: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' && chars.peek() == Some(&',') {
            current.push(',');
            chars.next();
        } else if c == ',' {
            tokens.push(current.trim().to_string());
            current.clear();
        } else {
            current.push(c);
        }
    }
    // The emptiness check happens before trimming, so text after the last
    // separator is always emitted, even when it trims down to nothing.
    if !current.is_empty() {
        tokens.push(current.trim().to_string());
    }
    tokens
}

/// Scans the constituency name up to the first unescaped comma and returns
/// it together with the remainder of the line. Both halves are trimmed.
fn split_name(line: &str) -> (String, &str) {
    let mut name = String::new();
    let mut rest = "";
    let mut chars = line.char_indices().peekable();
    while let Some((idx, c)) = chars.next() {
        if c == '\\' && matches!(chars.peek(), Some((_, ','))) {
            name.push(',');
            chars.next();
        } else if c == ',' {
            rest = &line[idx + 1..];
            break;
        } else {
            name.push(c);
        }
    }
    (name.trim().to_string(), rest.trim())
}

fn parse_pairs(rest: &str) -> Result<Vec<PartyResult>, LineError> {
    if rest.is_empty() {
        return Ok(Vec::new());
    }
    let tokens = tokenize(rest);
    if tokens.len() % 2 != 0 {
        return Err(LineError::OddTokenCount {
            tokens: tokens.len(),
        });
    }
    let mut results: Vec<PartyResult> = Vec::new();
    for pair in tokens.chunks(2) {
        let votes = pair[0]
            .parse::<u64>()
            .map_err(|_| LineError::InvalidVotes {
                text: pair[0].clone(),
            })?;
        if pair[1].is_empty() {
            return Err(LineError::EmptyPartyCode);
        }
        results.push(PartyResult {
            party_code: pair[1].clone(),
            votes,
        });
    }
    Ok(results)
}

/// Parses one trimmed, non-empty result line into a row.
///
/// The name runs up to the first unescaped comma; the rest of the line
/// must be vote,party-code pairs. Duplicate codes are kept in line order.
pub fn parse_line(line: &str) -> Result<ParsedRow, LineError> {
    let (name, rest) = split_name(line);
    if name.is_empty() {
        return Err(LineError::EmptyName);
    }
    let party_results = parse_pairs(rest)?;
    if party_results.is_empty() {
        return Err(LineError::NoPartyResults);
    }
    Ok(ParsedRow {
        constituency_name: name,
        party_results,
    })
}

/// Parses a whole results file, partitioning its lines into parsed rows
/// and per-line rejections. One line's failure never affects another.
///
/// Lines are split on `\r\n` or `\n` and trimmed; blank lines produce
/// neither a row nor an error. Line numbers are the 1-based positions in
/// the full split, so skipped blanks do not shift the numbering of the
/// lines after them.
pub fn parse_file(text: &str) -> ParseOutcome {
    let mut outcome = ParseOutcome::default();
    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let line_number = idx + 1;
        match parse_line(line) {
            Ok(row) => outcome.ok.push(row),
            Err(error) => {
                debug!("line {} rejected: {}", line_number, error);
                outcome.errors.push(ParseError {
                    line_number,
                    line: line.to_string(),
                    error,
                });
            }
        }
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(outcome: &ParseOutcome, idx: usize) -> &ParsedRow {
        &outcome.ok[idx]
    }

    #[test]
    fn tokenize_splits_and_trims() {
        assert_eq!(tokenize("a, b ,c"), vec!["a", "b", "c"]);
        assert_eq!(tokenize(""), Vec::<String>::new());
    }

    #[test]
    fn tokenize_honors_escaped_commas() {
        assert_eq!(tokenize("a\\,b,c"), vec!["a,b", "c"]);
        // A lone backslash is ordinary text.
        assert_eq!(tokenize("a\\b,c"), vec!["a\\b", "c"]);
    }

    #[test]
    fn tokenize_drops_empty_trailing_field_only() {
        assert_eq!(tokenize("a,b,"), vec!["a", "b"]);
        // Interior empty fields are kept.
        assert_eq!(tokenize("a,,b"), vec!["a", "", "b"]);
    }

    #[test]
    fn parses_a_simple_line() {
        let input = "Basildon and Billericay,6898,C,11608,L,2008,LD,937,Ind,612,UKIP,1521,G";
        let outcome = parse_file(input);
        assert!(outcome.errors.is_empty());
        assert_eq!(outcome.ok.len(), 1);
        assert_eq!(row(&outcome, 0).constituency_name, "Basildon and Billericay");
        assert_eq!(
            row(&outcome, 0).party_results,
            vec![
                PartyResult { party_code: "C".to_string(), votes: 6898 },
                PartyResult { party_code: "L".to_string(), votes: 11608 },
                PartyResult { party_code: "LD".to_string(), votes: 2008 },
                PartyResult { party_code: "Ind".to_string(), votes: 937 },
                PartyResult { party_code: "UKIP".to_string(), votes: 612 },
                PartyResult { party_code: "G".to_string(), votes: 1521 },
            ]
        );
    }

    #[test]
    fn handles_escaped_comma_in_name() {
        let parsed = parse_line("A\\,B,10,X").unwrap();
        assert_eq!(parsed.constituency_name, "A,B");
        assert_eq!(
            parsed.party_results,
            vec![PartyResult { party_code: "X".to_string(), votes: 10 }]
        );
    }

    #[test]
    fn handles_multiple_escaped_commas_in_name() {
        let input = "Inverness\\, Nairn\\, Badenoch and Strathspey,2719,C,5187,L,2297,SNP";
        let parsed = parse_line(input).unwrap();
        assert_eq!(
            parsed.constituency_name,
            "Inverness, Nairn, Badenoch and Strathspey"
        );
        assert!(parsed
            .party_results
            .iter()
            .any(|r| r.party_code == "SNP" && r.votes == 2297));
    }

    #[test]
    fn keeps_duplicate_codes_in_line_order() {
        let parsed = parse_line("Dupes,10,C,20,C").unwrap();
        assert_eq!(
            parsed.party_results,
            vec![
                PartyResult { party_code: "C".to_string(), votes: 10 },
                PartyResult { party_code: "C".to_string(), votes: 20 },
            ]
        );
    }

    #[test]
    fn rejects_empty_name() {
        assert_eq!(parse_line(",10,C"), Err(LineError::EmptyName));
    }

    #[test]
    fn rejects_odd_token_count_with_the_count() {
        let err = parse_line("Test,100,C,200,L,TrailingCode").unwrap_err();
        assert_eq!(err, LineError::OddTokenCount { tokens: 5 });
        assert_eq!(
            err.to_string(),
            "Expected even number of vote,party-code pairs (got 5 token(s))"
        );
        assert_eq!(
            parse_line("N,10,C,20"),
            Err(LineError::OddTokenCount { tokens: 3 })
        );
    }

    #[test]
    fn rejects_votes_that_are_not_plain_integers() {
        assert_eq!(
            parse_line("N,12a,C"),
            Err(LineError::InvalidVotes { text: "12a".to_string() })
        );
        assert_eq!(
            parse_line("N,-1,C"),
            Err(LineError::InvalidVotes { text: "-1".to_string() })
        );
        assert_eq!(
            parse_line("N,1.5,C"),
            Err(LineError::InvalidVotes { text: "1.5".to_string() })
        );
        // Zero votes are a legal tally.
        assert!(parse_line("N,0,C").is_ok());
    }

    #[test]
    fn rejects_empty_party_code() {
        assert_eq!(parse_line("N,10,,20,C"), Err(LineError::EmptyPartyCode));
    }

    #[test]
    fn rejects_a_line_with_no_pairs_at_all() {
        assert_eq!(parse_line("JustAName"), Err(LineError::NoPartyResults));
        assert_eq!(parse_line("Name,"), Err(LineError::NoPartyResults));
    }

    #[test]
    fn skips_blank_lines() {
        let input = "Bedford,6643,C,5276,L\n\n\nBraintree,13146,C,2543,L";
        let outcome = parse_file(input);
        assert!(outcome.errors.is_empty());
        assert_eq!(outcome.ok.len(), 2);
        assert_eq!(row(&outcome, 0).constituency_name, "Bedford");
        assert_eq!(row(&outcome, 1).constituency_name, "Braintree");
    }

    #[test]
    fn blank_lines_do_not_shift_line_numbers() {
        let outcome = parse_file("Good,1,C\n\nBadLine\n\nAlso,2,L");
        assert_eq!(outcome.ok.len(), 2);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].line_number, 3);
        assert_eq!(outcome.errors[0].line, "BadLine");
    }

    #[test]
    fn reports_malformed_lines_without_failing_the_file() {
        let outcome = parse_file("Good,100,C,200,L\nBadLineNoNumbers\nAnother,50,C");
        assert_eq!(outcome.ok.len(), 2);
        assert_eq!(row(&outcome, 0).constituency_name, "Good");
        assert_eq!(row(&outcome, 1).constituency_name, "Another");
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].line_number, 2);
        assert_eq!(outcome.errors[0].line, "BadLineNoNumbers");
    }

    #[test]
    fn every_non_blank_line_lands_in_exactly_one_bucket() {
        let input = "One,1,C\n\nTwo,2\nThree,3,L\n  \nFour";
        let outcome = parse_file(input);
        let non_blank = input.lines().filter(|l| !l.trim().is_empty()).count();
        assert_eq!(outcome.ok.len() + outcome.errors.len(), non_blank);
    }

    #[test]
    fn handles_crlf_line_endings() {
        let outcome = parse_file("Bedford,6643,C\r\nBraintree,13146,C\r\n");
        assert!(outcome.errors.is_empty());
        assert_eq!(outcome.ok.len(), 2);
    }
}
