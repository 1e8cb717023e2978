//! This module provides the parser for machine description files, utilizing
//! the `pest` crate. It defines functions to parse `.tm` text into a
//! `Description` struct.

use crate::types::{
    Description, DescriptionError, Direction, Transition, DEFAULT_BLANK_SYMBOL,
    INPUT_BLANK_SYMBOL,
};
use pest::{
    error::{Error, ErrorVariant},
    iterators::Pair,
    Parser as PestParser, Span,
};
use pest_derive::Parser as PestParser;
use std::collections::HashSet;

/// Derives a `PestParser` for the description grammar defined in `grammar.pest`.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct DescriptionParser;

/// Parses the given text into a machine [`Description`].
///
/// Only `name:` and `rules:` are mandatory. The remaining sections default
/// the way a hand-written description expects: the blank symbol defaults to
/// a space, the start state to the first rule block, the accept set to
/// empty, and omitted state/alphabet sections are inferred from the rules.
/// `_` in rule symbols stands for the blank symbol and is rewritten during
/// parsing.
///
/// Nothing beyond section-level structure is checked. In particular,
/// duplicate transitions for the same (state, symbol) pair are kept in
/// declaration order; which one fires is the machine's concern.
pub fn parse(input: &str) -> Result<Description<char>, DescriptionError> {
    let root = DescriptionParser::parse(Rule::machine, input.trim())
        .map_err(|e| DescriptionError::Parse(e.into()))? //
        .next()
        .unwrap();

    build_description(root)
}

/// Assembles a `Description` from a parsed `Pair<Rule::machine>`, applying
/// section defaults, inference, and the `_` rewrite.
fn build_description(pair: Pair<Rule>) -> Result<Description<char>, DescriptionError> {
    let mut name: Option<String> = None;
    let mut states: Option<Vec<String>> = None;
    let mut input_alphabet: Option<Vec<char>> = None;
    let mut tape_alphabet: Option<Vec<char>> = None;
    let mut blank: Option<char> = None;
    let mut start: Option<String> = None;
    let mut accept: Option<Vec<String>> = None;
    let mut rules: Option<(Vec<Transition<char>>, Vec<String>)> = None;
    let mut seen = HashSet::new();

    for p in pair.into_inner() {
        let span = p.as_span();
        let rule = p.as_rule();

        check_unique_rule(rule, span, &mut seen)?;

        match rule {
            Rule::name => name = Some(parse_inner_text(p)),
            Rule::states => states = Some(parse_idents(p)),
            Rule::input => input_alphabet = Some(parse_symbol_list(p)),
            Rule::alphabet => tape_alphabet = Some(parse_symbol_list(p)),
            Rule::blank => blank = Some(parse_symbol(p.into_inner().next().unwrap().as_str())),
            Rule::start => start = Some(p.into_inner().next().unwrap().as_str().to_string()),
            Rule::accept => accept = Some(parse_idents(p)),
            Rule::rules => rules = Some(parse_rules(p)?),
            _ => {} // Skip EOI
        }
    }

    let name = check_required(name, "name")?;
    let (mut delta, block_order) = check_required(rules, "rules")?;
    let blank = blank.unwrap_or(DEFAULT_BLANK_SYMBOL);

    // Rewrite the `_` placeholder wherever symbols occur.
    for transition in &mut delta {
        rewrite_blank(&mut transition.read, blank);
        rewrite_blank(&mut transition.write, blank);
    }
    if let Some(symbols) = input_alphabet.as_mut() {
        symbols.iter_mut().for_each(|s| rewrite_blank(s, blank));
    }
    if let Some(symbols) = tape_alphabet.as_mut() {
        symbols.iter_mut().for_each(|s| rewrite_blank(s, blank));
    }

    let start_state = check_required(
        start.or_else(|| block_order.first().cloned()),
        "start",
    )?;
    let states = states.unwrap_or_else(|| infer_states(&block_order, &delta));
    let tape_alphabet = tape_alphabet.unwrap_or_else(|| infer_tape_alphabet(&delta, blank));
    let input_alphabet = input_alphabet.unwrap_or_else(|| {
        tape_alphabet.iter().copied().filter(|s| *s != blank).collect()
    });

    Ok(Description {
        name,
        states,
        input_alphabet,
        tape_alphabet,
        delta,
        start_state,
        blank,
        accept_states: accept.unwrap_or_default(),
    })
}

/// Parses the transitions section, returning the flattened transition list
/// and the block states in declaration order.
fn parse_rules(
    pair: Pair<Rule>,
) -> Result<(Vec<Transition<char>>, Vec<String>), DescriptionError> {
    let mut delta = Vec::new();
    let mut block_order = Vec::new();

    for block in pair.into_inner() {
        if block.as_rule() != Rule::block {
            continue;
        }

        let mut pairs = block.into_inner();
        let state = pairs.next().unwrap().as_str().to_string();
        block_order.push(state.clone());

        for action in pairs {
            if action.as_rule() == Rule::action {
                delta.push(parse_action(&state, action)?);
            }
        }
    }

    Ok((delta, block_order))
}

/// Parses a single action line into a transition fired from `state`.
fn parse_action(state: &str, pair: Pair<Rule>) -> Result<Transition<char>, DescriptionError> {
    let mut pairs = pair.into_inner();
    let read = parse_symbol(pairs.next().unwrap().as_str());

    // If `write` is omitted, the transition writes back what it read.
    let write = match pairs.peek().unwrap().as_rule() {
        Rule::direction => read,
        _ => parse_symbol(pairs.next().unwrap().as_str()),
    };

    let direction = parse_direction(pairs.next().unwrap())?;
    let next = pairs.next().unwrap().as_str();

    Ok(Transition::new(state, read, write, next, direction))
}

/// Parses a single direction token.
///
/// Supports '<' or 'L' for Left, '>' or 'R' for Right, and '-' or 'S' for
/// Stay.
fn parse_direction(pair: Pair<Rule>) -> Result<Direction, DescriptionError> {
    let span = pair.as_span();
    match pair.as_str() {
        "<" | "L" => Ok(Direction::Left),
        ">" | "R" => Ok(Direction::Right),
        "-" | "S" => Ok(Direction::Stay),
        _ => Err(parse_error(
            &format!("Unsupported direction: {}", pair.as_str()),
            span,
        )),
    }
}

/// States in declaration order: rule blocks first, then states that only
/// ever appear as transition endpoints.
fn infer_states(block_order: &[String], delta: &[Transition<char>]) -> Vec<String> {
    let mut states = Vec::new();
    let mut seen = HashSet::new();

    let names = block_order
        .iter()
        .chain(delta.iter().flat_map(|t| [&t.from, &t.to]));
    for name in names {
        if seen.insert(name.clone()) {
            states.push(name.clone());
        }
    }

    states
}

/// Every symbol the rules mention, in order of appearance, plus the blank.
fn infer_tape_alphabet(delta: &[Transition<char>], blank: char) -> Vec<char> {
    let mut symbols = Vec::new();

    for transition in delta {
        for symbol in [transition.read, transition.write] {
            if !symbols.contains(&symbol) {
                symbols.push(symbol);
            }
        }
    }
    if !symbols.contains(&blank) {
        symbols.push(blank);
    }

    symbols
}

/// Parses a single character symbol from a string, handling quoted and
/// unquoted symbols.
fn parse_symbol(input: &str) -> char {
    input
        .trim_matches('\'')
        .chars()
        .next()
        .unwrap_or(DEFAULT_BLANK_SYMBOL)
}

fn rewrite_blank(symbol: &mut char, blank: char) {
    if *symbol == INPUT_BLANK_SYMBOL {
        *symbol = blank;
    }
}

/// Extracts the identifiers of a section such as `states:` or `accept:`.
fn parse_idents(pair: Pair<Rule>) -> Vec<String> {
    pair.into_inner()
        .filter(|p| p.as_rule() == Rule::ident)
        .map(|p| p.as_str().to_string())
        .collect()
}

/// Extracts the symbols of a section such as `input:` or `alphabet:`.
fn parse_symbol_list(pair: Pair<Rule>) -> Vec<char> {
    pair.into_inner()
        .filter(|p| p.as_rule() == Rule::symbol)
        .map(|p| parse_symbol(p.as_str()))
        .collect()
}

/// Extracts the inner free-text content from a `Pair`.
fn parse_inner_text(pair: Pair<Rule>) -> String {
    pair.into_inner().next().unwrap().as_str().trim().to_string()
}

/// Creates a `DescriptionError::Parse` from a message and a `Span`.
fn parse_error(msg: &str, span: Span) -> DescriptionError {
    DescriptionError::Parse(Box::new(Error::new_from_span(
        ErrorVariant::CustomError {
            message: msg.to_string(),
        },
        span,
    )))
}

/// Checks that a top-level section is declared at most once.
fn check_unique_rule(
    rule: Rule,
    span: Span,
    seen: &mut HashSet<Rule>,
) -> Result<(), DescriptionError> {
    if !matches!(
        rule,
        Rule::name
            | Rule::states
            | Rule::input
            | Rule::alphabet
            | Rule::blank
            | Rule::start
            | Rule::accept
            | Rule::rules
    ) {
        return Ok(());
    }

    if seen.contains(&rule) {
        return Err(parse_error(
            &format!("Duplicate \"{rule:?}:\" declaration"),
            span,
        ));
    }

    seen.insert(rule);

    Ok(())
}

/// Checks that a required section is present.
fn check_required<T>(value: Option<T>, name: &str) -> Result<T, DescriptionError> {
    value.ok_or_else(|| DescriptionError::Validation(format!("Missing '{name}' section")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_description() {
        let input = r#"
name: Simple Test
rules:
  start:
    a -> b, R, halt
  halt:
"#;

        let result = parse(input);
        assert!(result.is_ok());

        let description = result.unwrap();
        assert_eq!(description.name, "Simple Test");
        assert_eq!(description.start_state, "start");
        assert_eq!(description.delta.len(), 1);
        assert_eq!(
            description.delta[0],
            Transition::new("start", 'a', 'b', "halt", Direction::Right)
        );
    }

    #[test]
    fn test_parse_all_sections() {
        let input = r#"
name: Full
states: q0, q1
input: 0, 1
alphabet: 0, 1, B
blank: B
start: q0
accept: q1
rules:
  q0:
    0 -> 1, R, q1
"#;

        let description = parse(input).unwrap();
        assert_eq!(description.states, vec!["q0", "q1"]);
        assert_eq!(description.input_alphabet, vec!['0', '1']);
        assert_eq!(description.tape_alphabet, vec!['0', '1', 'B']);
        assert_eq!(description.blank, 'B');
        assert_eq!(description.start_state, "q0");
        assert_eq!(description.accept_states, vec!["q1"]);
    }

    #[test]
    fn test_parse_infers_omitted_sections() {
        let input = r#"
name: Minimal
rules:
  start:
    a -> b, R, halt
  halt:
"#;

        let description = parse(input).unwrap();
        assert_eq!(description.states, vec!["start", "halt"]);
        assert_eq!(description.blank, DEFAULT_BLANK_SYMBOL);
        assert_eq!(description.tape_alphabet, vec!['a', 'b', DEFAULT_BLANK_SYMBOL]);
        assert_eq!(description.input_alphabet, vec!['a', 'b']);
        assert!(description.accept_states.is_empty());
    }

    #[test]
    fn test_parse_infers_states_from_transition_targets() {
        let input = r#"
name: Targets
rules:
  start:
    a -> a, R, elsewhere
"#;

        let description = parse(input).unwrap();
        assert_eq!(description.states, vec!["start", "elsewhere"]);
    }

    #[test]
    fn test_parse_omitted_write_symbol() {
        let input = r#"
name: Omitted Write
rules:
  start:
    a, R, halt
"#;

        let description = parse(input).unwrap();
        let transition = &description.delta[0];
        assert_eq!(transition.read, 'a');
        assert_eq!(transition.write, 'a'); // Should write what it read
        assert_eq!(transition.direction, Direction::Right);
        assert_eq!(transition.to, "halt");
    }

    #[test]
    fn test_parse_direction_tokens() {
        let input = r#"
name: Directions
rules:
  s:
    a -> a, L, s
    b -> b, <, s
    c -> c, R, s
    d -> d, >, s
    e -> e, S, s
    f -> f, -, s
"#;

        let description = parse(input).unwrap();
        let directions: Vec<Direction> =
            description.delta.iter().map(|t| t.direction).collect();
        assert_eq!(
            directions,
            vec![
                Direction::Left,
                Direction::Left,
                Direction::Right,
                Direction::Right,
                Direction::Stay,
                Direction::Stay,
            ]
        );
    }

    #[test]
    fn test_parse_unsupported_direction() {
        let input = r#"
name: Bad Direction
rules:
  start:
    a -> b, X, halt
"#;

        let result = parse(input);
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), DescriptionError::Parse(_)));
    }

    #[test]
    fn test_parse_with_custom_blank() {
        let input = r#"
name: Custom Blank
blank: B
rules:
  start:
    _ -> _, R, halt
"#;

        let description = parse(input).unwrap();
        assert_eq!(description.blank, 'B');
        // `_` denotes the blank symbol and is rewritten at parse time.
        assert_eq!(description.delta[0].read, 'B');
        assert_eq!(description.delta[0].write, 'B');
    }

    #[test]
    fn test_parse_with_quoted_symbols() {
        let input = r#"
name: Quoted
blank: '_'
rules:
  start:
    '0' -> ' ', R, halt
"#;

        let description = parse(input).unwrap();
        assert_eq!(description.blank, '_');
        assert_eq!(description.delta[0].read, '0');
        assert_eq!(description.delta[0].write, ' ');
    }

    #[test]
    fn test_parse_duplicate_section() {
        let input = r#"
name: First Name
name: Second Name
rules:
  start:
    a -> b, R, halt
"#;

        let result = parse(input);
        assert!(result.is_err());
        let error = result.unwrap_err();
        assert!(matches!(error, DescriptionError::Parse(_)));
        assert!(error.to_string().contains("Duplicate \"name:\" declaration"));
    }

    #[test]
    fn test_parse_missing_name() {
        let input = r#"
rules:
  start:
    a -> b, R, halt
"#;

        let result = parse(input);
        assert!(result.is_err());
        let error = result.unwrap_err();
        assert!(matches!(error, DescriptionError::Validation(_)));
        assert_eq!(
            error.to_string(),
            "Description validation error: Missing 'name' section"
        );
    }

    #[test]
    fn test_parse_missing_rules() {
        let input = r#"
name: Missing Rules
"#;

        let result = parse(input);
        assert!(result.is_err());
        let error = result.unwrap_err();
        assert!(matches!(error, DescriptionError::Validation(_)));
        assert_eq!(
            error.to_string(),
            "Description validation error: Missing 'rules' section"
        );
    }

    #[test]
    fn test_parse_keeps_duplicate_transitions_in_declaration_order() {
        let input = r#"
name: Duplicates
rules:
  s:
    0 -> 0, R, win
    0 -> 0, R, lose
  s:
    0 -> 0, R, also-lose
"#;

        let description = parse(input).unwrap();
        let targets: Vec<&str> = description.delta.iter().map(|t| t.to.as_str()).collect();
        assert_eq!(targets, vec!["win", "lose", "also-lose"]);
    }

    #[test]
    fn test_parse_tolerates_comments_and_blank_lines() {
        let input = r#"
# A machine with commentary.
name: Commented

# Transitions below.
rules:

  start:
    # flip and halt
    a -> b, R, halt

  halt:
"#;

        let description = parse(input).unwrap();
        assert_eq!(description.name, "Commented");
        assert_eq!(description.delta.len(), 1);
    }

    #[test]
    fn test_parsed_description_runs() {
        let input = r#"
name: Flip Once
accept: halt
rules:
  start:
    0 -> 1, R, halt
"#;

        let machine = crate::machine::Machine::new(parse(input).unwrap());
        assert!(machine.simulate_str("0"));
        assert!(!machine.simulate_str("1"));
    }
}
