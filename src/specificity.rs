//! Selector specificity scoring.
//!
//! One canonical model: the standard id/class/element triple, computed by
//! tokenizing the selector. Ids weigh 100, classes (including attribute
//! selectors and pseudo-classes) weigh 10, type selectors and
//! pseudo-elements weigh 1. `:not()`, `:is()` and `:has()` take the
//! specificity of their most specific argument; `:where()` contributes
//! nothing. For a selector list the highest-scoring alternative wins.
//!
//! A coarse character-counting fallback is kept for preludes the canonical
//! tokenizer cannot treat as a selector (keyframe steps like `0%`, raw
//! fragments recovered from broken input). The fallback is intentionally
//! approximate and is only reached when the canonical pass fails.

use std::cmp::Ordering;

use cssparser::{Parser, ParserInput, Token};
use log::debug;
use serde::{Deserialize, Serialize};

/// Specificity of one selector, as a weighted total plus its breakdown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecificityScore {
    /// Weighted total: `ids * 100 + (classes + pseudo_classes) * 10 + elements`
    pub total: u32,

    /// Number of id selectors
    pub ids: u32,

    /// Number of class and attribute selectors
    pub classes: u32,

    /// Number of pseudo-classes
    pub pseudo_classes: u32,

    /// Number of type selectors and pseudo-elements
    pub elements: u32,
}

impl SpecificityScore {
    /// Build a score from its breakdown, computing the weighted total
    pub fn from_parts(ids: u32, classes: u32, pseudo_classes: u32, elements: u32) -> Self {
        Self {
            total: ids * 100 + (classes + pseudo_classes) * 10 + elements,
            ids,
            classes,
            pseudo_classes,
            elements,
        }
    }
}

/// Compare two scores by weighted total.
///
/// Equal totals are equal regardless of breakdown; callers that need a
/// deterministic order among ties rely on source order.
pub fn compare(a: &SpecificityScore, b: &SpecificityScore) -> Ordering {
    a.total.cmp(&b.total)
}

/// Score a selector.
///
/// Uses the canonical tokenizing model, falling back to the coarse
/// heuristic when the selector does not tokenize as one.
pub fn calculate(selector: &str) -> SpecificityScore {
    match canonical(selector) {
        Ok(score) => score,
        Err(()) => {
            debug!(
                "specificity: canonical pass failed for {:?}, using fallback",
                selector
            );
            fallback(selector)
        }
    }
}

/// Running breakdown for one selector alternative
#[derive(Debug, Clone, Copy, Default)]
struct Counts {
    ids: u32,
    classes: u32,
    pseudo_classes: u32,
    elements: u32,
}

impl Counts {
    fn total(&self) -> u32 {
        self.ids * 100 + (self.classes + self.pseudo_classes) * 10 + self.elements
    }

    fn add(&mut self, other: Counts) {
        self.ids += other.ids;
        self.classes += other.classes;
        self.pseudo_classes += other.pseudo_classes;
        self.elements += other.elements;
    }
}

/// Pseudo-elements that are still valid with single-colon syntax
const LEGACY_PSEUDO_ELEMENTS: [&str; 4] = ["before", "after", "first-line", "first-letter"];

fn canonical(selector: &str) -> Result<SpecificityScore, ()> {
    let mut input = ParserInput::new(selector);
    let mut parser = Parser::new(&mut input);
    let counts = selector_list_counts(&mut parser)?;
    Ok(SpecificityScore::from_parts(
        counts.ids,
        counts.classes,
        counts.pseudo_classes,
        counts.elements,
    ))
}

/// Count a comma-separated selector list, keeping the highest-total
/// alternative. The first alternative wins ties.
fn selector_list_counts<'i>(input: &mut Parser<'i, '_>) -> Result<Counts, ()> {
    let mut best: Option<Counts> = None;
    let mut current = Counts::default();

    loop {
        let token = match input.next() {
            Ok(t) => t.clone(),
            Err(_) => break,
        };

        match token {
            Token::Comma => {
                best = Some(pick_higher(best, current));
                current = Counts::default();
            }
            Token::IDHash(_) => current.ids += 1,
            Token::Delim('.') => {
                let next = match input.next() {
                    Ok(t) => t.clone(),
                    Err(_) => return Err(()),
                };
                match next {
                    Token::Ident(_) => current.classes += 1,
                    _ => return Err(()),
                }
            }
            Token::SquareBracketBlock => current.classes += 1,
            Token::Colon => consume_pseudo(input, &mut current)?,
            Token::Ident(_) => current.elements += 1,
            // Universal selector, combinators and the nesting selector
            // carry no weight
            Token::Delim('*' | '>' | '+' | '~' | '&') => {}
            Token::Delim('|') => {
                // Namespace separator; the following name was already
                // counted by the prefix ident, swallow the local name
                let _ = input.try_parse(|p| p.expect_ident().map(|_| ()));
            }
            _ => return Err(()),
        }
    }

    Ok(pick_higher(best, current))
}

fn pick_higher(best: Option<Counts>, candidate: Counts) -> Counts {
    match best {
        Some(b) if b.total() >= candidate.total() => b,
        _ => candidate,
    }
}

fn consume_pseudo<'i>(input: &mut Parser<'i, '_>, current: &mut Counts) -> Result<(), ()> {
    let token = match input.next() {
        Ok(t) => t.clone(),
        Err(_) => return Err(()),
    };

    match token {
        // Double colon: pseudo-element
        Token::Colon => {
            let next = match input.next() {
                Ok(t) => t.clone(),
                Err(_) => return Err(()),
            };
            match next {
                Token::Ident(_) | Token::Function(_) => {
                    current.elements += 1;
                    Ok(())
                }
                _ => Err(()),
            }
        }
        Token::Ident(name) => {
            if LEGACY_PSEUDO_ELEMENTS
                .iter()
                .any(|p| name.eq_ignore_ascii_case(p))
            {
                current.elements += 1;
            } else {
                current.pseudo_classes += 1;
            }
            Ok(())
        }
        Token::Function(name) => {
            let name = name.to_ascii_lowercase();
            match name.as_str() {
                // Zero-specificity wrapper; arguments skipped
                "where" => Ok(()),
                // Takes the specificity of its most specific argument
                "not" | "is" | "has" | "matches" | "any" => {
                    let inner: Result<Counts, cssparser::ParseError<'i, ()>> = input
                        .parse_nested_block(|p| {
                            selector_list_counts(p).map_err(|()| p.new_custom_error(()))
                        });
                    match inner {
                        Ok(counts) => {
                            current.add(counts);
                            Ok(())
                        }
                        Err(_) => Err(()),
                    }
                }
                // Other functional pseudo-classes count once;
                // arguments skipped
                _ => {
                    current.pseudo_classes += 1;
                    Ok(())
                }
            }
        }
        _ => Err(()),
    }
}

/// Coarse character-counting heuristic, used only when the canonical
/// pass fails. Counts `#` as ids, `.` and `[` as classes, `:` as
/// pseudo-classes, and combinator-separated chunks not starting with a
/// simple-selector sigil as elements.
fn fallback(selector: &str) -> SpecificityScore {
    let ids = selector.matches('#').count() as u32;
    let classes = selector.matches('.').count() as u32;
    let attributes = selector.matches('[').count() as u32;
    let pseudo_classes = selector.matches(':').count() as u32;

    let elements = selector
        .split(|c: char| c.is_whitespace() || c == '>' || c == '+' || c == '~')
        .filter(|chunk| {
            !chunk.is_empty()
                && !chunk.starts_with('#')
                && !chunk.starts_with('.')
                && !chunk.starts_with('[')
        })
        .count() as u32;

    SpecificityScore::from_parts(ids, classes + attributes, pseudo_classes, elements)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_class_element_triple() {
        let score = calculate("#a .b span");
        assert_eq!(score.ids, 1);
        assert_eq!(score.classes, 1);
        assert_eq!(score.elements, 1);
        assert_eq!(score.total, 111);
    }

    #[test]
    fn multiple_ids_stack() {
        let score = calculate("#a#b");
        assert_eq!(score.ids, 2);
        assert_eq!(score.total, 200);
    }

    #[test]
    fn attribute_counts_as_class() {
        let score = calculate("input[type=\"text\"]");
        assert_eq!(score.classes, 1);
        assert_eq!(score.elements, 1);
        assert_eq!(score.total, 11);
    }

    #[test]
    fn pseudo_class_and_pseudo_element() {
        let hover = calculate("a:hover");
        assert_eq!(hover.pseudo_classes, 1);
        assert_eq!(hover.elements, 1);
        assert_eq!(hover.total, 11);

        let before = calculate("p::before");
        assert_eq!(before.elements, 2);
        assert_eq!(before.total, 2);

        // Legacy single-colon pseudo-element
        let legacy = calculate("p:before");
        assert_eq!(legacy.elements, 2);
        assert_eq!(legacy.total, 2);
    }

    #[test]
    fn where_is_zero_and_not_takes_argument() {
        assert_eq!(calculate(":where(.a, #b)").total, 0);
        assert_eq!(calculate(":not(.a)").total, 10);
        assert_eq!(calculate(":not(.a, #b)").total, 100);
    }

    #[test]
    fn selector_list_takes_highest_alternative() {
        let score = calculate("div, #main, .card");
        assert_eq!(score.total, 100);
        assert_eq!(score.ids, 1);
    }

    #[test]
    fn universal_and_combinators_are_free() {
        assert_eq!(calculate("*").total, 0);
        assert_eq!(calculate("div > p + span").total, 3);
    }

    #[test]
    fn keyframe_prelude_uses_fallback() {
        // `0%` is not a selector; the fallback counts it as one chunk
        let score = calculate("0%");
        assert_eq!(score.elements, 1);
        assert_eq!(score.total, 1);
    }

    #[test]
    fn fallback_counts_sigils() {
        let score = fallback("#nav .item > li:hover");
        assert_eq!(score.ids, 1);
        assert_eq!(score.classes, 1);
        assert_eq!(score.pseudo_classes, 1);
        // `.item` and `#nav` excluded, `li:hover` counted once
        assert_eq!(score.elements, 1);
        assert_eq!(score.total, 121);
    }

    #[test]
    fn compare_orders_by_total() {
        let low = calculate(".a");
        let high = calculate("#a");
        assert_eq!(compare(&low, &high), Ordering::Less);
        assert_eq!(compare(&high, &high), Ordering::Equal);
    }

    #[test]
    fn deterministic_for_same_selector() {
        let first = calculate("#main .nav a:hover");
        let second = calculate("#main .nav a:hover");
        assert_eq!(first, second);
    }
}
