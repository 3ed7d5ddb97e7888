//! Narrowing a candidate set down to a single location.
//!
//! Zero candidates is a distinct outcome rather than an error, one candidate is
//! taken as-is, and several are listed and then either rejected (when there is
//! nobody to ask) or offered through a numbered prompt.

use std::io::{BufRead, Write};

use tracing::debug;

use crate::{error::SelectionError, model::Location};

/// Most candidates ever listed or selectable.
pub const MAX_CANDIDATES: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    NoMatch,
    Resolved(Location),
}

/// Selection prompt states. Invalid input, including lines that are not
/// UTF-8, loops back to `Prompting` forever; only a stream failure leaves
/// through `Faulted`.
#[derive(Debug)]
enum Selection {
    Prompting,
    Validating(Vec<u8>),
    Resolved(usize),
    Faulted(SelectionError),
}

pub fn decide<R, W>(
    candidates: &[Location],
    interactive: bool,
    input: &mut R,
    output: &mut W,
) -> Result<Resolution, SelectionError>
where
    R: BufRead,
    W: Write,
{
    let shown = &candidates[..candidates.len().min(MAX_CANDIDATES)];

    match shown {
        [] => Ok(Resolution::NoMatch),
        [only] => Ok(Resolution::Resolved(only.clone())),
        _ => {
            list_candidates(shown, output)
                .map_err(SelectionError::OutputFault)?;

            if !interactive {
                return Err(SelectionError::AmbiguousNonInteractive);
            }

            let index = prompt(shown.len(), input, output)?;
            debug!(index, "candidate selected");
            Ok(Resolution::Resolved(shown[index].clone()))
        }
    }
}

fn list_candidates<W: Write>(candidates: &[Location], output: &mut W) -> std::io::Result<()> {
    writeln!(output, "Multiple locations found:")?;
    for (n, loc) in candidates.iter().enumerate() {
        writeln!(output, "{}. {}", n + 1, loc.label())?;
    }
    Ok(())
}

/// Runs the selection prompt and returns a zero-based index below `count`.
fn prompt<R, W>(count: usize, input: &mut R, output: &mut W) -> Result<usize, SelectionError>
where
    R: BufRead,
    W: Write,
{
    let mut state = Selection::Prompting;

    loop {
        state = match state {
            Selection::Prompting => read_choice(count, input, output),
            Selection::Validating(line) => match parse_choice(&line, count) {
                Some(index) => Selection::Resolved(index),
                None => match writeln!(
                    output,
                    "Invalid selection. Please enter a number between 1 and {count}."
                ) {
                    Ok(()) => Selection::Prompting,
                    Err(e) => Selection::Faulted(SelectionError::OutputFault(e)),
                },
            },
            Selection::Resolved(index) => return Ok(index),
            Selection::Faulted(err) => return Err(err),
        };
    }
}

fn read_choice<R: BufRead, W: Write>(count: usize, input: &mut R, output: &mut W) -> Selection {
    if let Err(e) = write_prompt(count, output) {
        return Selection::Faulted(SelectionError::OutputFault(e));
    }

    let mut line = Vec::new();
    match input.read_until(b'\n', &mut line) {
        Ok(0) => Selection::Faulted(SelectionError::InputExhausted),
        Ok(_) => Selection::Validating(line),
        Err(e) => Selection::Faulted(SelectionError::InputFault(e)),
    }
}

fn write_prompt<W: Write>(count: usize, output: &mut W) -> std::io::Result<()> {
    write!(output, "Select location [1-{count}]: ")?;
    output.flush()
}

/// 1-based choice in `[1, count]` to a zero-based index. Bytes that are not
/// UTF-8 are an invalid choice like any other.
fn parse_choice(line: &[u8], count: usize) -> Option<usize> {
    let text = std::str::from_utf8(line).ok()?;
    match text.trim().parse::<usize>() {
        Ok(n) if (1..=count).contains(&n) => Some(n - 1),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::io::{self, Cursor, Read};

    use super::*;

    const INVALID_OF_TWO: &str = "Invalid selection. Please enter a number between 1 and 2.\n";

    type Decided = (Result<Resolution, SelectionError>, String);

    fn loc(id: i64, name: &str, country: &str, region: &str) -> Location {
        Location {
            id,
            name: name.into(),
            latitude: 0.0,
            longitude: 0.0,
            country: country.into(),
            region: region.into(),
        }
    }

    fn londons() -> Vec<Location> {
        vec![
            loc(1, "London", "UK", "Greater London"),
            loc(2, "London", "Canada", "Ontario"),
        ]
    }

    fn numbered(n: i64) -> Vec<Location> {
        (0..n)
            .map(|i| loc(i, &format!("Loc{i}"), "X", ""))
            .collect()
    }

    fn run(candidates: &[Location], interactive: bool, input: &str) -> Decided {
        run_bytes(candidates, interactive, input.as_bytes())
    }

    fn run_bytes(candidates: &[Location], interactive: bool, input: &[u8]) -> Decided {
        let mut input = Cursor::new(input.to_vec());
        let mut out = Vec::new();
        let res = decide(candidates, interactive, &mut input, &mut out);
        (res, String::from_utf8(out).unwrap())
    }

    #[test]
    fn zero_candidates_is_no_match() {
        let (res, out) = run(&[], true, "");
        assert_eq!(res.unwrap(), Resolution::NoMatch);
        assert!(out.is_empty());
    }

    #[test]
    fn single_candidate_needs_no_io() {
        let only = loc(9, "Reykjavik", "Iceland", "Capital Region");
        let (res, out) = run(std::slice::from_ref(&only), true, "");
        assert_eq!(res.unwrap(), Resolution::Resolved(only));
        assert!(out.is_empty());
    }

    #[test]
    fn interactive_selection_picks_numbered_entry() {
        let (res, out) = run(&londons(), true, "2\n");

        assert_eq!(res.unwrap(), Resolution::Resolved(londons()[1].clone()));
        assert!(out.contains("Multiple locations found:"));
        assert!(out.contains("1. London, UK (Greater London)"));
        assert!(out.contains("2. London, Canada (Ontario)"));
        assert!(out.contains("Select location [1-2]: "));
    }

    #[test]
    fn invalid_inputs_reprompt_until_valid() {
        let (res, out) = run(&londons(), true, "0\n11\nabc\n\n3\n1\n");

        assert_eq!(res.unwrap(), Resolution::Resolved(londons()[0].clone()));
        assert_eq!(out.matches(INVALID_OF_TWO).count(), 5);
        assert_eq!(out.matches("Select location [1-2]: ").count(), 6);
    }

    #[test]
    fn invalid_utf8_line_reprompts() {
        let (res, out) = run_bytes(&londons(), true, b"\xff\xfe\n2\n");

        assert_eq!(res.unwrap(), Resolution::Resolved(londons()[1].clone()));
        assert_eq!(out.matches(INVALID_OF_TWO).count(), 1);
        assert_eq!(out.matches("Select location [1-2]: ").count(), 2);
    }

    #[test]
    fn surrounding_whitespace_is_accepted() {
        let (res, _) = run(&londons(), true, "  2  \r\n");
        assert_eq!(res.unwrap(), Resolution::Resolved(londons()[1].clone()));
    }

    #[test]
    fn non_interactive_lists_then_rejects() {
        let (res, out) = run(&londons(), false, "1\n");

        let err = res.unwrap_err();
        assert!(matches!(err, SelectionError::AmbiguousNonInteractive));
        assert_eq!(
            err.to_string(),
            "multiple locations found, please be more specific"
        );
        assert!(out.contains("1. London, UK (Greater London)"));
        assert!(!out.contains("Select location"));
    }

    #[test]
    fn listing_is_capped_at_ten() {
        let many = numbered(12);

        let (res, out) = run(&many, false, "");
        assert!(res.is_err());
        assert!(out.contains("10. Loc9, X ()"));
        assert!(!out.contains("11."));
    }

    #[test]
    fn selection_beyond_cap_is_rejected() {
        let many = numbered(12);
        let invalid = "Invalid selection. Please enter a number between 1 and 10.";

        let (res, out) = run(&many, true, "11\n10\n");
        assert_eq!(res.unwrap(), Resolution::Resolved(many[9].clone()));
        assert!(out.contains("Select location [1-10]: "));
        assert!(out.contains(invalid));
    }

    #[test]
    fn exhausted_input_is_fatal() {
        let (res, _) = run(&londons(), true, "abc\n");
        let err = res.unwrap_err();
        assert!(matches!(err, SelectionError::InputExhausted));
        assert!(err.to_string().contains("failed to read input"));
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("simulated read error"))
        }
    }

    #[test]
    fn read_error_is_fatal() {
        let mut input = io::BufReader::new(FailingReader);
        let mut out = Vec::new();

        let err = decide(&londons(), true, &mut input, &mut out).unwrap_err();
        assert!(matches!(err, SelectionError::InputFault(_)));
        assert!(err.to_string().contains("failed to read input"));
    }
}
