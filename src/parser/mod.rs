//! Stylesheet parsing.
//!
//! Builds the rule model on top of the `cssparser` tokenizer. Rules nested
//! inside at-rules (`@media`, `@supports`, `@keyframes`, ...) are flattened
//! into one sequence with their at-rule context recorded; at-rules whose
//! body holds declarations rather than rules (`@font-face`, `@page`)
//! contribute nothing to the model.
//!
//! # Error Recovery
//!
//! [`parse_lenient`] recovers from malformed declarations and rules,
//! collecting one [`SyntaxError`] per problem while keeping the valid
//! parts of the model. [`parse`] is the strict wrapper: any syntax error
//! fails the parse, carrying both the error list and the partial model so
//! callers can still report degraded metrics.
//!
//! Selector and value text are raw source slices (trimmed), so the
//! author's spelling survives into the model and any later rewriting.

use cssparser::{Delimiter, Parser, ParserInput, SourceLocation, Token};
use log::debug;

use crate::errors::{ParseFailure, SyntaxError};
use crate::models::{Declaration, Rule, Stylesheet};

/// At-rules whose block contains rules, which we flatten into the model
const RULE_LIST_AT_RULES: [&str; 8] = [
    "media",
    "supports",
    "document",
    "layer",
    "container",
    "scope",
    "starting-style",
    "keyframes",
];

/// Parse a stylesheet, failing when any syntax error is found.
///
/// The returned [`ParseFailure`] carries every error plus the partial
/// model recovered from the valid portions.
pub fn parse(source: &str) -> Result<Stylesheet, ParseFailure> {
    let (stylesheet, errors) = parse_lenient(source);
    if errors.is_empty() {
        Ok(stylesheet)
    } else {
        Err(ParseFailure {
            errors,
            partial: stylesheet,
        })
    }
}

/// Parse a stylesheet, recovering from syntax errors.
///
/// Returns the model built from the valid parts together with every
/// syntax error found, sorted by position.
pub fn parse_lenient(source: &str) -> (Stylesheet, Vec<SyntaxError>) {
    let mut builder = ModelBuilder::default();
    builder.errors = scan_unbalanced_braces(source);

    {
        let mut input = ParserInput::new(source);
        let mut parser = Parser::new(&mut input);
        consume_rule_list(&mut parser, &mut builder);
    }

    let mut errors = builder.errors;
    errors.sort_by_key(|e| (e.line, e.column));

    let stylesheet = Stylesheet {
        rules: builder.rules,
        source_bytes: source.len(),
    };

    debug!(
        "parsed {} rules, {} declarations, {} syntax errors",
        stylesheet.rules.len(),
        stylesheet.declaration_count(),
        errors.len()
    );

    (stylesheet, errors)
}

/// Accumulates rules and errors while walking the token stream
#[derive(Default)]
struct ModelBuilder {
    rules: Vec<Rule>,
    errors: Vec<SyntaxError>,
    at_stack: Vec<String>,
}

impl ModelBuilder {
    fn error(&mut self, message: impl Into<String>, location: SourceLocation) {
        self.errors.push(SyntaxError::new(
            message,
            location.line as usize + 1,
            location.column as usize,
        ));
    }

    fn push_rule(
        &mut self,
        selector: String,
        declarations: Vec<Declaration>,
        location: SourceLocation,
    ) {
        let at_context = if self.at_stack.is_empty() {
            None
        } else {
            Some(self.at_stack.join(" "))
        };
        self.rules.push(Rule {
            selector,
            declarations,
            line: location.line as usize + 1,
            column: location.column as usize,
            at_context,
        });
    }
}

/// Walk a rule list (the top level, or the inside of a grouping at-rule)
fn consume_rule_list<'i>(input: &mut Parser<'i, '_>, builder: &mut ModelBuilder) {
    loop {
        let state = input.state();
        let token = match input.next_including_whitespace_and_comments() {
            Ok(t) => t.clone(),
            Err(_) => break,
        };

        match token {
            Token::WhiteSpace(_) | Token::Comment(_) | Token::Semicolon => continue,
            Token::CDO | Token::CDC => continue,
            Token::AtKeyword(name) => consume_at_rule(input, builder, &name),
            // The unmatched-brace scan reports stray closers
            Token::CloseCurlyBracket => continue,
            _ => {
                input.reset(&state);
                consume_qualified_rule(input, builder);
            }
        }
    }
}

/// Consume one qualified rule: prelude text up to the block, then the
/// declaration list inside it.
///
/// Bracket and function blocks in the prelude are drained as they appear
/// so the captured parser states always sit between complete tokens.
fn consume_qualified_rule<'i>(input: &mut Parser<'i, '_>, builder: &mut ModelBuilder) {
    let rule_location = input.current_source_location();
    let prelude_start = input.position();

    loop {
        let state = input.state();
        let token = match input.next() {
            Ok(t) => t.clone(),
            Err(_) => {
                // EOF before any block; the prelude text is dangling
                let prelude = input.slice_from(prelude_start).trim();
                if !prelude.is_empty() {
                    builder.error(
                        format!(
                            "unexpected end of stylesheet, expected '{{' after '{}'",
                            prelude
                        ),
                        rule_location,
                    );
                }
                return;
            }
        };

        match token {
            Token::CurlyBracketBlock => {
                // Rewind so the raw slice stops before the brace, then
                // re-consume the block token and descend
                input.reset(&state);
                let selector = input.slice_from(prelude_start).trim().to_string();
                let _ = input.next();

                if selector.is_empty() {
                    builder.error("rule is missing a selector", rule_location);
                    return;
                }

                let declarations = input
                    .parse_nested_block(|p| {
                        Ok::<_, cssparser::ParseError<'i, ()>>(consume_declaration_list(p, builder))
                    })
                    .unwrap_or_default();

                builder.push_rule(selector, declarations, rule_location);
                return;
            }
            // Stray closer ends the attempt; the brace scan reports it
            Token::CloseCurlyBracket => return,
            Token::Function(_) | Token::ParenthesisBlock | Token::SquareBracketBlock => {
                drain_block(input);
            }
            _ => continue,
        }
    }
}

/// Consume one at-rule after its `@keyword` token.
///
/// Grouping at-rules recurse into [`consume_rule_list`] with their prelude
/// pushed onto the context stack; declaration-bodied and unknown at-rules
/// have their block skipped; blockless at-rules end at the semicolon.
fn consume_at_rule<'i>(input: &mut Parser<'i, '_>, builder: &mut ModelBuilder, name: &str) {
    let prelude_start = input.position();

    loop {
        let state = input.state();
        let token = match input.next() {
            Ok(t) => t.clone(),
            // EOF without block or semicolon is tolerated
            Err(_) => return,
        };

        match token {
            Token::Semicolon => return,
            Token::CurlyBracketBlock => {
                input.reset(&state);
                let prelude = input.slice_from(prelude_start).trim().to_string();
                let _ = input.next();

                let family = name.to_ascii_lowercase();
                let family = family
                    .strip_prefix("-webkit-")
                    .or_else(|| family.strip_prefix("-moz-"))
                    .unwrap_or(&family);

                if RULE_LIST_AT_RULES.contains(&family) {
                    let context = if prelude.is_empty() {
                        format!("@{}", name)
                    } else {
                        format!("@{} {}", name, prelude)
                    };
                    builder.at_stack.push(context);
                    let _ = input.parse_nested_block(|p| {
                        consume_rule_list(p, builder);
                        Ok::<_, cssparser::ParseError<'i, ()>>(())
                    });
                    builder.at_stack.pop();
                }
                // Not descending into other blocks skips them

                return;
            }
            Token::CloseCurlyBracket => return,
            Token::Function(_) | Token::ParenthesisBlock | Token::SquareBracketBlock => {
                drain_block(input);
            }
            _ => continue,
        }
    }
}

/// Consume the inside of a declaration block
fn consume_declaration_list<'i>(
    input: &mut Parser<'i, '_>,
    builder: &mut ModelBuilder,
) -> Vec<Declaration> {
    let mut declarations = Vec::new();

    loop {
        let location = input.current_source_location();
        let token = match input.next_including_whitespace_and_comments() {
            Ok(t) => t.clone(),
            Err(_) => break,
        };

        match token {
            Token::WhiteSpace(_) | Token::Comment(_) | Token::Semicolon => continue,
            Token::Ident(name) => {
                if let Some(declaration) = consume_declaration_value(input, builder, &name, location)
                {
                    declarations.push(declaration);
                }
            }
            Token::AtKeyword(name) => {
                builder.error(
                    format!("unexpected at-rule '@{}' inside a declaration block", name),
                    location,
                );
                recover_to_semicolon(input);
            }
            other => {
                builder.error(
                    format!("expected a property name, found '{}'", describe_token(&other)),
                    location,
                );
                recover_to_semicolon(input);
            }
        }
    }

    declarations
}

/// Consume `: value [!important] [;]` after a property name
fn consume_declaration_value<'i>(
    input: &mut Parser<'i, '_>,
    builder: &mut ModelBuilder,
    property: &str,
    location: SourceLocation,
) -> Option<Declaration> {
    if input.expect_colon().is_err() {
        builder.error(
            format!("expected ':' after property '{}'", property),
            location,
        );
        recover_to_semicolon(input);
        return None;
    }

    let value_start = input.position();
    let mut important = false;
    let raw_value;

    loop {
        let state = input.state();
        let token = match input.next_including_whitespace_and_comments() {
            Ok(t) => t.clone(),
            Err(_) => {
                // End of block ends the declaration
                raw_value = input.slice_from(value_start);
                break;
            }
        };

        match token {
            Token::Semicolon => {
                input.reset(&state);
                raw_value = input.slice_from(value_start);
                let _ = input.next();
                break;
            }
            Token::Delim('!') => {
                input.reset(&state);
                raw_value = input.slice_from(value_start);
                let _ = input.next();

                let next = match input.next() {
                    Ok(t) => t.clone(),
                    Err(_) => {
                        builder.error("expected 'important' after '!'", location);
                        return None;
                    }
                };
                match next {
                    Token::Ident(word) if word.eq_ignore_ascii_case("important") => {
                        important = true;
                    }
                    _ => {
                        builder.error("expected 'important' after '!'", location);
                        recover_to_semicolon(input);
                        return None;
                    }
                }

                // Only a semicolon or the end of the block may follow
                let trailing = match input.next() {
                    Ok(t) => t.clone(),
                    Err(_) => break,
                };
                match trailing {
                    Token::Semicolon => break,
                    _ => {
                        builder.error("unexpected token after '!important'", location);
                        recover_to_semicolon(input);
                        return None;
                    }
                }
            }
            Token::Function(_)
            | Token::ParenthesisBlock
            | Token::SquareBracketBlock
            | Token::CurlyBracketBlock => {
                drain_block(input);
            }
            _ => continue,
        }
    }

    let value = raw_value.trim();
    if value.is_empty() {
        builder.error(
            format!("declaration value for '{}' is empty", property),
            location,
        );
        return None;
    }

    Some(Declaration {
        property: property.to_string(),
        value: value.to_string(),
        important,
        line: location.line as usize + 1,
        column: location.column as usize,
    })
}

/// Consume a just-opened block through its matching closer
fn drain_block<'i>(input: &mut Parser<'i, '_>) {
    let _ = input.parse_nested_block(|p| {
        while p.next().is_ok() {}
        Ok::<_, cssparser::ParseError<'i, ()>>(())
    });
}

/// Skip ahead to just past the next semicolon at this nesting level
fn recover_to_semicolon<'i>(input: &mut Parser<'i, '_>) {
    let _: Result<(), cssparser::ParseError<'i, ()>> =
        input.parse_until_after(Delimiter::Semicolon, |p| {
            while p.next().is_ok() {}
            Ok(())
        });
}

fn describe_token(token: &Token) -> String {
    match token {
        Token::Ident(name) => name.to_string(),
        Token::QuotedString(s) => format!("\"{}\"", s),
        Token::Number { value, .. } => value.to_string(),
        Token::Percentage { unit_value, .. } => format!("{}%", unit_value * 100.0),
        Token::Dimension { value, unit, .. } => format!("{}{}", value, unit),
        Token::Hash(name) | Token::IDHash(name) => format!("#{}", name),
        Token::Delim(c) => c.to_string(),
        Token::Colon => ":".to_string(),
        Token::Comma => ",".to_string(),
        Token::CurlyBracketBlock => "{".to_string(),
        Token::SquareBracketBlock => "[".to_string(),
        Token::ParenthesisBlock => "(".to_string(),
        other => format!("{:?}", other),
    }
}

/// Report unmatched `{` and `}` outside strings and comments.
///
/// The tokenizer silently closes blocks at end of input, so unterminated
/// blocks need their own scan to surface as syntax errors.
fn scan_unbalanced_braces(source: &str) -> Vec<SyntaxError> {
    #[derive(PartialEq)]
    enum State {
        Normal,
        Comment,
        Single,
        Double,
    }

    let mut errors = Vec::new();
    let mut opens: Vec<(usize, usize)> = Vec::new();
    let mut state = State::Normal;
    let mut line = 1usize;
    let mut column = 0usize;
    let mut chars = source.chars().peekable();

    while let Some(c) = chars.next() {
        column += 1;

        match state {
            State::Normal => match c {
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    column += 1;
                    state = State::Comment;
                }
                '\'' => state = State::Single,
                '"' => state = State::Double,
                '{' => opens.push((line, column)),
                '}' => {
                    if opens.pop().is_none() {
                        errors.push(SyntaxError::new("unexpected '}'", line, column));
                    }
                }
                _ => {}
            },
            State::Comment => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    column += 1;
                    state = State::Normal;
                }
            }
            State::Single | State::Double => {
                let quote = if state == State::Single { '\'' } else { '"' };
                if c == '\\' {
                    if let Some(escaped) = chars.next() {
                        column += 1;
                        if escaped == '\n' {
                            line += 1;
                            column = 0;
                        }
                    }
                } else if c == quote || c == '\n' {
                    // An unescaped newline ends a (bad) string
                    state = State::Normal;
                }
            }
        }

        if c == '\n' {
            line += 1;
            column = 0;
        }
    }

    for (line, column) in opens {
        errors.push(SyntaxError::new("unclosed block", line, column));
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_simple_rule() {
        let sheet = parse(".card { color: red; padding: 4px 8px; }").unwrap();

        assert_eq!(sheet.rules.len(), 1);
        let rule = &sheet.rules[0];
        assert_eq!(rule.selector, ".card");
        assert_eq!(rule.line, 1);
        assert_eq!(rule.column, 1);
        assert_eq!(rule.declarations.len(), 2);
        assert_eq!(rule.declarations[0].property, "color");
        assert_eq!(rule.declarations[0].value, "red");
        assert_eq!(rule.declarations[1].property, "padding");
        assert_eq!(rule.declarations[1].value, "4px 8px");
    }

    #[test]
    fn keeps_function_values_intact() {
        let sheet =
            parse(".g { grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); }").unwrap();

        assert_eq!(
            sheet.rules[0].declarations[0].value,
            "repeat(auto-fit, minmax(200px, 1fr))"
        );
    }

    #[test]
    fn keeps_attribute_selectors_intact() {
        let sheet = parse("input[type=\"text\"]:hover { color: red; }").unwrap();

        assert_eq!(sheet.rules[0].selector, "input[type=\"text\"]:hover");
    }

    #[test]
    fn splits_off_important() {
        let sheet = parse(".a { color: red !important; margin: 0; }").unwrap();

        let decls = &sheet.rules[0].declarations;
        assert_eq!(decls[0].value, "red");
        assert!(decls[0].important);
        assert!(!decls[1].important);
    }

    #[test]
    fn records_positions() {
        let css = ".a { color: red; }\n.b {\n  margin: 0;\n}";
        let sheet = parse(css).unwrap();

        assert_eq!(sheet.rules[1].line, 2);
        assert_eq!(sheet.rules[1].declarations[0].line, 3);
        assert_eq!(sheet.rules[1].declarations[0].column, 3);
    }

    #[test]
    fn flattens_media_rules_with_context() {
        let css = "@media (max-width: 600px) { .a { color: red; } }\n.b { margin: 0; }";
        let sheet = parse(css).unwrap();

        assert_eq!(sheet.rules.len(), 2);
        assert_eq!(
            sheet.rules[0].at_context.as_deref(),
            Some("@media (max-width: 600px)")
        );
        assert_eq!(sheet.rules[0].selector, ".a");
        assert_eq!(sheet.rules[1].at_context, None);
    }

    #[test]
    fn nested_at_rules_chain_their_context() {
        let css = "@supports (display: grid) { @media screen { .a { color: red; } } }";
        let sheet = parse(css).unwrap();

        assert_eq!(
            sheet.rules[0].at_context.as_deref(),
            Some("@supports (display: grid) @media screen")
        );
    }

    #[test]
    fn keyframe_steps_become_rules() {
        let css =
            "@keyframes spin { 0% { transform: rotate(0deg); } 100% { transform: rotate(360deg); } }";
        let sheet = parse(css).unwrap();

        assert_eq!(sheet.rules.len(), 2);
        assert_eq!(sheet.rules[0].selector, "0%");
        assert_eq!(sheet.rules[0].at_context.as_deref(), Some("@keyframes spin"));
        assert_eq!(sheet.rules[1].declarations[0].value, "rotate(360deg)");
    }

    #[test]
    fn font_face_contributes_no_rules() {
        let css = "@font-face { font-family: Test; src: url(test.woff2); }\n.a { color: red; }";
        let sheet = parse(css).unwrap();

        assert_eq!(sheet.rules.len(), 1);
        assert_eq!(sheet.rules[0].selector, ".a");
    }

    #[test]
    fn import_and_charset_are_skipped() {
        let css = "@charset \"utf-8\";\n@import url(\"other.css\");\n.a { color: red; }";
        let sheet = parse(css).unwrap();

        assert_eq!(sheet.rules.len(), 1);
    }

    #[test]
    fn empty_value_is_a_syntax_error() {
        let (sheet, errors) = parse_lenient(".test { color: ; }");

        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("empty"));
        assert_eq!(errors[0].line, 1);
        // The rule survives without the bad declaration
        assert_eq!(sheet.rules.len(), 1);
        assert!(sheet.rules[0].declarations.is_empty());
    }

    #[test]
    fn missing_colon_is_a_syntax_error() {
        let (_, errors) = parse_lenient(".test { color red; margin: 0; }");

        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("expected ':'"));
    }

    #[test]
    fn unclosed_block_is_a_syntax_error() {
        let (_, errors) = parse_lenient(".test { color: red;");

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "unclosed block");
        assert_eq!(errors[0].line, 1);
        assert_eq!(errors[0].column, 7);
    }

    #[test]
    fn stray_close_brace_is_a_syntax_error() {
        let (sheet, errors) = parse_lenient("}\n.a { color: red; }");

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "unexpected '}'");
        assert_eq!(sheet.rules.len(), 1);
    }

    #[test]
    fn braces_inside_strings_do_not_confuse_the_scan() {
        let css = "a[title=\"{\"] { color: red; }";
        let sheet = parse(css).unwrap();

        assert_eq!(sheet.rules.len(), 1);
        assert_eq!(sheet.rules[0].selector, "a[title=\"{\"]");
    }

    #[test]
    fn strict_parse_carries_partial_model() {
        let failure = parse(".ok { color: red; }\n.bad { color: ; }").unwrap_err();

        assert_eq!(failure.errors.len(), 1);
        assert_eq!(failure.partial.rules.len(), 2);
        assert_eq!(failure.partial.rules[0].declarations.len(), 1);
    }

    #[test]
    fn recovery_continues_after_bad_declaration() {
        let (sheet, errors) = parse_lenient(".a { 4px; color: red; }");

        assert_eq!(errors.len(), 1);
        assert_eq!(sheet.rules[0].declarations.len(), 1);
        assert_eq!(sheet.rules[0].declarations[0].property, "color");
    }

    #[test]
    fn multiple_errors_are_all_reported() {
        let (_, errors) = parse_lenient(".a { color: ; }\n.b { margin ; }");

        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].line, 1);
        assert_eq!(errors[1].line, 2);
    }
}
