// Field splitter for CSV data lines

use nom::{
    branch::alt,
    bytes::complete::{is_not, take_till},
    character::complete::char,
    combinator::{all_consuming, map, opt},
    multi::{many0, separated_list1},
    sequence::{preceded, terminated},
    IResult,
};

/// Quoted segment: `"..."`. The closing quote is optional so an
/// unterminated quote runs to the end of the line.
fn quoted(input: &str) -> IResult<&str, &str> {
    preceded(char('"'), terminated(take_till(|c| c == '"'), opt(char('"'))))(input)
}

/// Bare segment: anything up to the next comma or quote
fn bare(input: &str) -> IResult<&str, &str> {
    is_not(",\"")(input)
}

/// One field: any mix of bare and quoted segments, quotes dropped
fn field(input: &str) -> IResult<&str, String> {
    map(many0(alt((quoted, bare))), |parts: Vec<&str>| parts.concat())(input)
}

fn fields(input: &str) -> IResult<&str, Vec<String>> {
    all_consuming(separated_list1(char(','), field))(input)
}

/// Split a data line into raw (untrimmed) fields.
///
/// A `"` toggles quoting and never appears in the output. Commas inside
/// quotes do not split. Every line splits: `field` accepts any prefix,
/// including the empty one, so a line that fails to parse is kept whole.
pub fn split_fields(line: &str) -> Vec<String> {
    match fields(line) {
        Ok((_, values)) => values,
        Err(_) => vec![line.to_string()],
    }
}
