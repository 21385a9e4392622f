//! Nom-based line scanner.
//!
//! Splits one protocol line into its raw tag block, prefix, command token and
//! parameters without allocating.

use nom::{
    bytes::complete::{take_until, take_while1},
    character::complete::{char, space0},
    combinator::opt,
    error::ErrorKind,
    sequence::preceded,
    IResult,
};
use smallvec::SmallVec;

/// RFC 2812 parameter cap.
const MAX_PARAMS: usize = 15;

/// Parse the tag block (after `@`, before the first space).
fn parse_tags(input: &str) -> IResult<&str, &str> {
    preceded(char('@'), take_until(" "))(input)
}

/// Parse the prefix (after `:`, before the first space).
fn parse_prefix(input: &str) -> IResult<&str, &str> {
    preceded(char(':'), take_while1(|c| c != ' '))(input)
}

/// Parse the command token (1*letter or 3digit).
fn parse_command(input: &str) -> IResult<&str, &str> {
    let (rest, cmd) = take_while1(|c: char| c.is_ascii_alphanumeric())(input)?;

    let is_all_letters = cmd.chars().all(|c| c.is_ascii_alphabetic());
    let is_three_digits = cmd.len() == 3 && cmd.chars().all(|c| c.is_ascii_digit());

    if is_all_letters || is_three_digits {
        Ok((rest, cmd))
    } else {
        Err(nom::Err::Error(nom::error::Error::new(
            input,
            ErrorKind::AlphaNumeric,
        )))
    }
}

/// Parse parameters after the command.
///
/// Middle parameters are space separated; a parameter starting with `:` is the
/// trailing one and runs to the end of the line. Runs of spaces collapse.
fn parse_params(input: &str) -> (&str, SmallVec<[&str; MAX_PARAMS]>, bool) {
    let mut params: SmallVec<[&str; MAX_PARAMS]> = SmallVec::new();
    let mut has_trailing = false;
    let mut rest = input;

    while rest.as_bytes().first() == Some(&b' ') {
        if params.len() >= MAX_PARAMS {
            break;
        }

        rest = rest.trim_start_matches(' ');

        if rest.is_empty() || rest.starts_with(['\r', '\n']) {
            break;
        }

        if let Some(after_colon) = rest.strip_prefix(':') {
            let end = after_colon.find(['\r', '\n']).unwrap_or(after_colon.len());
            params.push(&after_colon[..end]);
            has_trailing = true;
            rest = &after_colon[end..];
            break;
        }

        let end = rest.find([' ', '\r', '\n']).unwrap_or(rest.len());
        params.push(&rest[..end]);
        rest = &rest[end..];
    }

    (rest, params, has_trailing)
}

/// Scanner output with slices borrowed from the input line.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ScannedLine<'a> {
    pub tags: Option<&'a str>,
    pub prefix: Option<&'a str>,
    pub command: &'a str,
    pub params: SmallVec<[&'a str; MAX_PARAMS]>,
    /// Whether the last parameter was introduced with `:`.
    pub has_trailing: bool,
}

fn scan_line(input: &str) -> IResult<&str, ScannedLine<'_>> {
    let (input, tags) = opt(parse_tags)(input)?;
    let (input, _) = space0(input)?;

    let (input, prefix) = opt(parse_prefix)(input)?;
    let (input, _) = space0(input)?;

    let (input, command) = parse_command(input)?;
    let (rest, params, has_trailing) = parse_params(input);

    Ok((
        rest,
        ScannedLine {
            tags,
            prefix,
            command,
            params,
            has_trailing,
        },
    ))
}

impl<'a> ScannedLine<'a> {
    /// Scan a line, returning the byte offset where scanning failed on error.
    pub fn scan(input: &'a str) -> Result<Self, usize> {
        match scan_line(input) {
            Ok((_rest, line)) => Ok(line),
            Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(input.len() - e.input.len()),
            Err(nom::Err::Incomplete(_)) => Err(input.len()),
        }
    }
}
