use nom::branch::alt;
use nom::bytes::complete::tag_no_case;
use nom::character::complete::{digit1, multispace0, multispace1};
use nom::combinator::opt;
use nom::{IResult, InputTakeAtPosition};

use crate::ngram::{MAX_NGRAM_SIZE, MIN_NGRAM_SIZE};

/// A parsed dashboard statement.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Statement {
    /// Household and unique-transaction counts
    Overview,
    /// Transaction history span per household
    Span,
    /// Categorisation coverage, overall and per household
    Coverage,
    /// `NGRAMS n` - top n-grams in uncategorised descriptions
    Ngrams(usize),
    /// `ACCURACY household [SHUFFLE]` - categorised transactions of one household
    Accuracy { household_id: String, shuffle: bool },
    /// List known household ids
    Households,
    Help,
}

pub(crate) fn parse(line: &str) -> Result<Statement, String> {
    let result = alt((overview, span, coverage, ngrams, accuracy, households, help))(line.trim());
    match result {
        Ok((_, Statement::Ngrams(n))) if !(MIN_NGRAM_SIZE..=MAX_NGRAM_SIZE).contains(&n) => {
            Err(format!("n-gram size must be between {} and {}, got {}", MIN_NGRAM_SIZE, MAX_NGRAM_SIZE, n))
        }
        Ok((_, statement)) => Ok(statement),
        Err(_) => Err(format!("unrecognised statement '{}', try 'help'", line.trim())),
    }
}

fn overview(input: &str) -> IResult<&str, Statement> {
    let (input, _) = tag_no_case("OVERVIEW")(input)?;
    Ok((input, Statement::Overview))
}

fn span(input: &str) -> IResult<&str, Statement> {
    let (input, _) = tag_no_case("SPAN")(input)?;
    Ok((input, Statement::Span))
}

fn coverage(input: &str) -> IResult<&str, Statement> {
    let (input, _) = tag_no_case("COVERAGE")(input)?;
    Ok((input, Statement::Coverage))
}

fn ngrams(input: &str) -> IResult<&str, Statement> {
    let (input, _) = tag_no_case("NGRAMS")(input)?;
    let (input, _) = multispace1(input)?;
    let (input, n) = digit1(input)?;
    // Range is checked in parse(), at the parameter boundary
    let n = n.parse::<usize>().unwrap_or(0);
    Ok((input, Statement::Ngrams(n)))
}

fn accuracy(input: &str) -> IResult<&str, Statement> {
    let (input, _) = tag_no_case("ACCURACY")(input)?;
    let (input, _) = multispace1(input)?;
    let (input, household_id) = non_space(input)?;
    let (input, _) = multispace0(input)?;
    let (input, shuffle) = opt(tag_no_case("SHUFFLE"))(input)?;
    Ok((
        input,
        Statement::Accuracy {
            household_id: household_id.to_string(),
            shuffle: shuffle.is_some(),
        },
    ))
}

fn households(input: &str) -> IResult<&str, Statement> {
    let (input, _) = tag_no_case("HOUSEHOLDS")(input)?;
    Ok((input, Statement::Households))
}

fn help(input: &str) -> IResult<&str, Statement> {
    let (input, _) = tag_no_case("HELP")(input)?;
    Ok((input, Statement::Help))
}

fn non_space(input: &str) -> IResult<&str, &str> {
    input.split_at_position_complete(char::is_whitespace)
}
