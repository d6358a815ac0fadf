use mincss::{
    Combinator, ParseError, ParserContext, PValuePayload, Separator, TokenKind,
};

fn parse(css: &str) -> mincss::ParseOutcome {
    ParserContext::new().parse_unicode(css.chars())
}

#[test]
fn simple_rule() {
    let outcome = parse("p { color: red; }");
    assert!(outcome.errors.is_empty());
    assert_eq!(outcome.stylesheet.rule_groups.len(), 1);

    let group = &outcome.stylesheet.rule_groups[0];
    assert_eq!(group.selectors.len(), 1);
    assert_eq!(group.selectors[0].elements.len(), 1);
    assert_eq!(group.selectors[0].elements[0].element.as_deref(), Some("p"));

    assert_eq!(group.declarations.len(), 1);
    let decl = &group.declarations[0];
    assert_eq!(decl.property, "color");
    assert!(!decl.important);
    assert_eq!(decl.values.len(), 1);
    assert_eq!(decl.values[0].payload, PValuePayload::Ident("red".to_string()));
}

#[test]
fn multiple_selectors_and_important() {
    let outcome = parse("h1, h2.big { font-size: 12pt !important }");
    assert!(outcome.errors.is_empty());
    assert_eq!(outcome.stylesheet.rule_groups.len(), 1);

    let group = &outcome.stylesheet.rule_groups[0];
    assert_eq!(group.selectors.len(), 2);
    assert_eq!(group.selectors[0].elements[0].element.as_deref(), Some("h1"));
    assert_eq!(group.selectors[1].elements[0].element.as_deref(), Some("h2"));
    assert_eq!(group.selectors[1].elements[0].classes, vec!["big".to_string()]);

    let decl = &group.declarations[0];
    assert_eq!(decl.property, "font-size");
    assert!(decl.important);
    match &decl.values[0].payload {
        PValuePayload::Dimension { text, div } => {
            assert_eq!(&text[..*div], "12");
            assert_eq!(&text[*div..], "pt");
        }
        other => panic!("expected Dimension, got {:?}", other),
    }
}

#[test]
fn combinator_chain() {
    let outcome = parse("a b > c { x: 1 }");
    assert!(outcome.errors.is_empty());
    let selector = &outcome.stylesheet.rule_groups[0].selectors[0];
    assert_eq!(selector.elements.len(), 3);
    assert_eq!(selector.elements[0].combinator, Combinator::None);
    assert_eq!(selector.elements[1].combinator, Combinator::Descendant);
    assert_eq!(selector.elements[2].combinator, Combinator::Child);
}

#[test]
fn class_selector_and_uri_quotes_retained() {
    let outcome = parse(".foo { color: #fff; background: url(\"a.png\") }");
    assert!(outcome.errors.is_empty());
    let group = &outcome.stylesheet.rule_groups[0];
    assert_eq!(group.selectors[0].elements[0].classes, vec!["foo".to_string()]);
    assert_eq!(group.declarations.len(), 2);

    // Known source quirk (spec §9): the quoted form's delimiters are not
    // stripped, so the URI term's text still carries its quote marks.
    match &group.declarations[1].values[0].payload {
        PValuePayload::Uri(text) => assert_eq!(text, "\"a.png\""),
        other => panic!("expected Uri, got {:?}", other),
    }
}

#[test]
fn comment_between_terms_is_dropped() {
    let outcome = parse("x { a: /* c */ 1 2 3 }");
    assert!(outcome.errors.is_empty());
    let decl = &outcome.stylesheet.rule_groups[0].declarations[0];
    assert_eq!(decl.values.len(), 3);
    for v in &decl.values {
        assert_eq!(v.separator, Separator::None);
        assert!(matches!(v.payload, PValuePayload::Number(_)));
    }
}

#[test]
fn charset_ignored_but_rest_parses() {
    let outcome = parse("@charset \"x\"; p{q:1}");
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].0, ParseError::CharsetIgnored);
    assert_eq!(outcome.stylesheet.rule_groups.len(), 1);
    assert_eq!(outcome.stylesheet.rule_groups[0].declarations[0].property, "q");
}

#[test]
fn block_missing_selectors_recovers() {
    let outcome = parse("{ } x { y: 1 }");
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].0, ParseError::BlockMissingSelectors);
    assert_eq!(outcome.stylesheet.rule_groups.len(), 1);
    assert_eq!(outcome.stylesheet.rule_groups[0].declarations[0].property, "y");
}

#[test]
fn empty_value_drops_only_that_declaration() {
    let outcome = parse("p { q: ; r: 2 }");
    assert!(outcome.errors.iter().any(|(e, _)| *e == ParseError::MissingDeclarationValue));
    let decls = &outcome.stylesheet.rule_groups[0].declarations;
    assert_eq!(decls.len(), 1);
    assert_eq!(decls[0].property, "r");
}

#[test]
fn empty_input_yields_empty_stylesheet() {
    let outcome = parse("");
    assert!(outcome.errors.is_empty());
    assert!(outcome.stylesheet.rule_groups.is_empty());
}

#[test]
fn whitespace_and_comments_only() {
    let outcome = parse("   /* nothing here */  \n\t ");
    assert!(outcome.errors.is_empty());
    assert!(outcome.stylesheet.rule_groups.is_empty());
}

#[test]
fn unterminated_string_closes_at_eof() {
    let outcome = parse("p { q: \"abc");
    assert!(outcome.errors.iter().any(|(e, _)| *e == ParseError::UnterminatedString));
}

#[test]
fn leading_separator_is_rejected() {
    // Spec §9's acknowledged source bug: a leading `/`/`,` before any
    // term. This implementation resolves it by rejecting the whole
    // expression rather than silently accepting it.
    let outcome = parse("p { q: , 1 }");
    assert!(outcome.errors.iter().any(|(e, _)| *e == ParseError::UnexpectedLeadingSeparator));
}

#[test]
fn function_value_parses_nested_args() {
    let outcome = parse("p { color: rgb(1, 2, 3) }");
    assert!(outcome.errors.is_empty());
    let decl = &outcome.stylesheet.rule_groups[0].declarations[0];
    match &decl.values[0].payload {
        PValuePayload::Function { name, args } => {
            assert_eq!(name, "rgb");
            assert_eq!(args.len(), 3);
            assert_eq!(args[1].separator, Separator::Comma);
        }
        other => panic!("expected Function, got {:?}", other),
    }
}

#[test]
fn pseudo_class_and_id_selector() {
    let outcome = parse("#p2:first-child { color: red }");
    assert!(outcome.errors.is_empty());
    let elem = &outcome.stylesheet.rule_groups[0].selectors[0].elements[0];
    assert_eq!(elem.ids, vec!["p2".to_string()]);
    assert_eq!(elem.pseudo, vec!["first-child".to_string()]);
}

#[test]
fn lexer_reports_token_kinds_for_basic_tokens() {
    let mut chars = "p{}".chars();
    let (tokens, errors) = ParserContext::new()
        .lex_bytes_utf8(std::iter::from_fn(move || chars.next().map(|c| c as u8)));
    assert!(errors.is_empty());
    let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![TokenKind::Ident, TokenKind::LBrace, TokenKind::RBrace, TokenKind::Eof]
    );
}
