//! Walks the untyped tree and builds the typed [`Stylesheet`](crate::ast::Stylesheet).
//!
//! Grounded on mincss's `csscons.c` (`construct_atrule`, `construct_selector`,
//! `construct_declaration`, `construct_expr`) for the algorithms, and on
//! simplecss's `consume_rule_set`/`consume_declaration`
//! (`lib.rs`) for the idiomatic-Rust shape (slice splitting instead of
//! manual index bookkeeping).

use crate::ast::{
    Combinator, Declaration, PValue, PValuePayload, RuleGroup, Selector, SelectorElement,
    Separator, Stylesheet, UnarySign,
};
use crate::error::ParseError;
use crate::token::TokenKind;
use crate::tree::{Node, NodeKind};

pub struct Constructor {
    errors: Vec<(ParseError, u32)>,
}

impl Constructor {
    pub fn construct(sheet: &Node) -> (Stylesheet, Vec<(ParseError, u32)>) {
        let mut ctor = Constructor { errors: Vec::new() };
        let mut out = Stylesheet::new();

        for child in &sheet.children {
            match child.kind {
                NodeKind::AtRule => ctor.construct_atrule(child),
                NodeKind::TopLevel => ctor.construct_rulesets(child, &mut out.rule_groups),
                _ => {}
            }
        }

        (out, ctor.errors)
    }

    fn error(&mut self, err: ParseError, line: u32) {
        self.errors.push((err, line));
    }

    fn construct_atrule(&mut self, node: &Node) {
        let name = node.text.as_deref().unwrap_or("");
        match name.to_ascii_lowercase().as_str() {
            "charset" => self.error(ParseError::CharsetIgnored, node.line),
            "import" => self.error(ParseError::ImportIgnored, node.line),
            "page" => self.error(ParseError::PageIgnored, node.line),
            "media" => {
                // Accepted at recognition stage; its body is not expanded
                // into rule-groups (Non-goal: media-query evaluation).
            }
            _ => {}
        }
    }

    fn construct_rulesets(&mut self, top: &Node, out: &mut Vec<RuleGroup>) {
        let children = &top.children;
        let mut range_start = 0usize;

        for (i, child) in children.iter().enumerate() {
            if child.kind != NodeKind::Block {
                continue;
            }

            let selector_range = &children[range_start..i];
            if selector_range.is_empty() {
                self.error(ParseError::BlockMissingSelectors, child.line);
                range_start = i + 1;
                continue;
            }

            let selectors = self.construct_selectors(selector_range);
            let declarations = self.construct_declarations(child);
            if !selectors.is_empty() && !declarations.is_empty() {
                out.push(RuleGroup { selectors, declarations });
            }
            range_start = i + 1;
        }

        if range_start < children.len() {
            let line = children[range_start].line;
            self.error(ParseError::SelectorMissingBlock, line);
        }
    }

    fn construct_selectors(&mut self, range: &[Node]) -> Vec<Selector> {
        let mut selectors = Vec::new();
        let mut start = 0usize;

        for (i, node) in range.iter().enumerate() {
            if is_delim(node, ",") {
                self.construct_one_selector(&range[start..i], node.line, &mut selectors);
                start = i + 1;
            }
        }
        let tail_line = range.last().map(|n| n.line).unwrap_or(0);
        self.construct_one_selector(&range[start..], tail_line, &mut selectors);

        selectors
    }

    fn construct_one_selector(&mut self, sub_range: &[Node], empty_line: u32, out: &mut Vec<Selector>) {
        if sub_range.is_empty() {
            self.error(ParseError::BlockHasEmptySelector, empty_line);
            return;
        }
        if let (Some(selector), consumed) = self.construct_selector(sub_range) {
            if consumed < sub_range.len() {
                self.error(ParseError::UnrecognizedTextInSelector, sub_range[consumed].line);
            }
            out.push(selector);
        }
    }

    /// Returns the parsed selector (if any) and how many leading nodes of
    /// `range` were consumed, per spec §4.5.
    fn construct_selector(&mut self, range: &[Node]) -> (Option<Selector>, usize) {
        let mut selector = Selector::default();
        let mut pos = 0usize;
        let mut pending = Combinator::None;
        let mut pending_explicit = false;

        loop {
            match parse_simple_selector(range, pos) {
                None => {
                    if selector.elements.is_empty() {
                        let line = range.get(pos).map(|n| n.line).unwrap_or(0);
                        self.error(ParseError::NoSelectorFound, line);
                        return (None, pos);
                    }
                    if pending_explicit {
                        let line = range.get(pos).map(|n| n.line).unwrap_or_else(|| {
                            range.last().map(|n| n.line).unwrap_or(0)
                        });
                        self.error(ParseError::CombinatorNotFollowedBySelector, line);
                        return (Some(selector), range.len());
                    }
                    return (Some(selector), pos);
                }
                Some((mut elem, new_pos)) => {
                    elem.combinator = pending;
                    selector.elements.push(elem);
                    pos = new_pos;
                    pending = Combinator::None;
                    pending_explicit = false;

                    if pos >= range.len() {
                        return (Some(selector), pos);
                    }

                    let mut saw_space = false;
                    while pos < range.len() && is_kind(&range[pos], TokenKind::Space) {
                        saw_space = true;
                        pos += 1;
                    }
                    if pos >= range.len() {
                        return (Some(selector), pos);
                    }

                    let is_gt = is_delim(&range[pos], ">");
                    let is_plus = is_delim(&range[pos], "+");

                    if is_gt || is_plus {
                        pending = if is_gt { Combinator::Child } else { Combinator::AdjacentSibling };
                        pending_explicit = true;
                        pos += 1;
                        while pos < range.len() && is_kind(&range[pos], TokenKind::Space) {
                            pos += 1;
                        }
                        continue;
                    }

                    if saw_space {
                        pending = Combinator::Descendant;
                        pending_explicit = false;
                        continue;
                    }

                    // Adjacent, non-whitespace, non-combinator text: stop here.
                    return (Some(selector), pos);
                }
            }
        }
    }

    fn construct_declarations(&mut self, block: &Node) -> Vec<Declaration> {
        let mut out = Vec::new();
        let mut start = 0usize;

        for (i, node) in block.children.iter().enumerate() {
            if is_kind(node, TokenKind::Semicolon) {
                self.construct_one_declaration(&block.children[start..i], &mut out);
                start = i + 1;
            }
        }
        self.construct_one_declaration(&block.children[start..], &mut out);

        out
    }

    fn construct_one_declaration(&mut self, segment: &[Node], out: &mut Vec<Declaration>) {
        let trimmed = trim_space(segment);
        if trimmed.is_empty() {
            return;
        }

        let colon_idx = trimmed.iter().position(|n| is_kind(n, TokenKind::Colon));
        let colon_idx = match colon_idx {
            Some(idx) => idx,
            None => {
                self.error(ParseError::DeclarationLacksColon, trimmed[0].line);
                return;
            }
        };

        let prop_range = trim_space(&trimmed[..colon_idx]);
        let mut value_range = &trimmed[colon_idx + 1..];
        while !value_range.is_empty() && is_kind(&value_range[0], TokenKind::Space) {
            value_range = &value_range[1..];
        }

        if let Some(decl) = self.construct_declaration(prop_range, value_range) {
            out.push(decl);
        }
    }

    fn construct_declaration(&mut self, prop_range: &[Node], value_range: &[Node]) -> Option<Declaration> {
        if prop_range.len() != 1 || !is_kind(&prop_range[0], TokenKind::Ident) {
            let line = prop_range.first().or(value_range.first()).map(|n| n.line).unwrap_or(0);
            self.error(ParseError::DeclarationPropertyNotIdent, line);
            return None;
        }
        let property = prop_range[0].token.as_ref().unwrap().text.clone();

        let (value_range, important) = extract_important(value_range);

        let values = self.construct_expr(value_range, true)?;

        Some(Declaration { property, important, values })
    }

    fn construct_expr(&mut self, range: &[Node], top_level: bool) -> Option<Vec<PValue>> {
        let mut terms = Vec::new();
        let mut sep = Separator::None;
        let mut sign = UnarySign::None;

        for node in range {
            if is_kind(node, TokenKind::Space) {
                continue;
            }

            if is_delim(node, "/") || is_delim(node, ",") {
                if sep == Separator::None && sign == UnarySign::None {
                    sep = if is_delim(node, "/") { Separator::Slash } else { Separator::Comma };
                    continue;
                }
                self.error(ParseError::InvalidDeclarationValue, node.line);
                return None;
            }

            if is_delim(node, "+") || is_delim(node, "-") {
                if sign == UnarySign::None {
                    sign = if is_delim(node, "+") { UnarySign::Plus } else { UnarySign::Minus };
                    continue;
                }
                self.error(ParseError::InvalidDeclarationValue, node.line);
                return None;
            }

            if node.kind == NodeKind::Function {
                if sign != UnarySign::None {
                    self.error(ParseError::FunctionCannotHaveSign, node.line);
                    return None;
                }
                if terms.is_empty() && sep != Separator::None {
                    self.error(ParseError::UnexpectedLeadingSeparator, node.line);
                    return None;
                }
                let args = self.construct_expr(&node.children, false)?;
                let name = node.text.clone().unwrap_or_default();
                Self::push_term(&mut terms, &mut sep, &mut sign, PValuePayload::Function { name, args });
                continue;
            }

            let tok = match &node.token {
                Some(t) => t,
                None => {
                    self.error(ParseError::InvalidDeclarationValue, node.line);
                    return None;
                }
            };

            let payload = match tok.kind {
                TokenKind::Number => PValuePayload::Number(tok.text.clone()),
                TokenKind::Percentage => PValuePayload::Percentage(tok.text.clone()),
                TokenKind::Dimension => {
                    PValuePayload::Dimension { text: tok.text.clone(), div: tok.div.unwrap_or(tok.text.len()) }
                }
                TokenKind::String => {
                    if sign != UnarySign::None {
                        self.error(ParseError::ValueCannotHaveSign, node.line);
                        return None;
                    }
                    PValuePayload::String(tok.text.clone())
                }
                TokenKind::Ident => {
                    if sign != UnarySign::None {
                        self.error(ParseError::ValueCannotHaveSign, node.line);
                        return None;
                    }
                    PValuePayload::Ident(tok.text.clone())
                }
                TokenKind::Uri => {
                    if sign != UnarySign::None {
                        self.error(ParseError::ValueCannotHaveSign, node.line);
                        return None;
                    }
                    PValuePayload::Uri(tok.text.clone())
                }
                _ => {
                    self.error(ParseError::InvalidDeclarationValue, node.line);
                    return None;
                }
            };

            if terms.is_empty() && sep != Separator::None {
                self.error(ParseError::UnexpectedLeadingSeparator, node.line);
                return None;
            }
            Self::push_term(&mut terms, &mut sep, &mut sign, payload);
        }

        if sep != Separator::None {
            let line = range.last().map(|n| n.line).unwrap_or(0);
            self.error(ParseError::UnexpectedTrailingSeparator, line);
            return None;
        }
        if sign != UnarySign::None {
            let line = range.last().map(|n| n.line).unwrap_or(0);
            self.error(ParseError::UnexpectedTrailingSign, line);
            return None;
        }
        if terms.is_empty() && top_level {
            let line = range.last().map(|n| n.line).unwrap_or(0);
            self.error(ParseError::MissingDeclarationValue, line);
            return None;
        }

        Some(terms)
    }

    fn push_term(
        terms: &mut Vec<PValue>,
        sep: &mut Separator,
        sign: &mut UnarySign,
        payload: PValuePayload,
    ) {
        terms.push(PValue { separator: *sep, sign: *sign, payload });
        *sep = Separator::None;
        *sign = UnarySign::None;
    }
}

fn is_kind(node: &Node, kind: TokenKind) -> bool {
    node.token.as_ref().map(|t| t.kind == kind).unwrap_or(false)
}

fn is_delim(node: &Node, text: &str) -> bool {
    node.token
        .as_ref()
        .map(|t| t.kind == TokenKind::Delim && t.text == text)
        .unwrap_or(false)
}

fn trim_space(range: &[Node]) -> &[Node] {
    let mut start = 0;
    let mut end = range.len();
    while start < end && is_kind(&range[start], TokenKind::Space) {
        start += 1;
    }
    while end > start && is_kind(&range[end - 1], TokenKind::Space) {
        end -= 1;
    }
    &range[start..end]
}

/// Parses one simple selector (element name plus hash/class/pseudo/
/// attribute suffixes) starting at `pos`. Returns the element and the
/// position just past it, or `None` (no pushback needed -- slices don't
/// mutate) if nothing selector-shaped starts there.
fn parse_simple_selector(range: &[Node], mut pos: usize) -> Option<(SelectorElement, usize)> {
    let mut elem = SelectorElement::default();
    let mut consumed_any = false;

    if pos < range.len() {
        if let Some(tok) = &range[pos].token {
            if tok.kind == TokenKind::Delim && tok.text == "*" {
                elem.element = Some("*".to_string());
                consumed_any = true;
                pos += 1;
            } else if tok.kind == TokenKind::Ident {
                elem.element = Some(tok.text.clone());
                consumed_any = true;
                pos += 1;
            }
        }
    }

    loop {
        if pos >= range.len() {
            break;
        }
        let node = &range[pos];
        if let Some(tok) = &node.token {
            match tok.kind {
                TokenKind::Hash => {
                    elem.ids.push(tok.text.clone());
                    consumed_any = true;
                    pos += 1;
                    continue;
                }
                TokenKind::Delim if tok.text == "." => {
                    if let Some(next) = range.get(pos + 1) {
                        if let Some(t2) = &next.token {
                            if t2.kind == TokenKind::Ident {
                                elem.classes.push(t2.text.clone());
                                consumed_any = true;
                                pos += 2;
                                continue;
                            }
                        }
                    }
                    break;
                }
                TokenKind::Colon => {
                    if let Some(next) = range.get(pos + 1) {
                        if let Some(t2) = &next.token {
                            if t2.kind == TokenKind::Ident {
                                elem.pseudo.push(t2.text.clone());
                                consumed_any = true;
                                pos += 2;
                                continue;
                            }
                        }
                    }
                    break;
                }
                _ => break,
            }
        } else if node.kind == NodeKind::Brackets {
            let raw: String = node
                .children
                .iter()
                .filter_map(|c| c.token.as_ref())
                .map(|t| t.text.as_str())
                .collect::<Vec<_>>()
                .join("");
            elem.attribute.push(raw);
            consumed_any = true;
            pos += 1;
            continue;
        } else {
            break;
        }
    }

    if consumed_any {
        Some((elem, pos))
    } else {
        None
    }
}

/// Back-scans for a trailing `! important` (case-insensitive), per spec
/// §4.5. Returns the value range with the suffix stripped, and whether it
/// was found.
fn extract_important(value_range: &[Node]) -> (&[Node], bool) {
    let mut i = value_range.len();
    while i > 0 && is_kind(&value_range[i - 1], TokenKind::Space) {
        i -= 1;
    }
    if i == 0 {
        return (value_range, false);
    }
    let is_important = matches!(
        &value_range[i - 1].token,
        Some(t) if t.kind == TokenKind::Ident && t.text.eq_ignore_ascii_case("important")
    );
    if !is_important {
        return (value_range, false);
    }

    let mut j = i - 1;
    while j > 0 && is_kind(&value_range[j - 1], TokenKind::Space) {
        j -= 1;
    }
    if j == 0 {
        return (value_range, false);
    }
    if !is_delim(&value_range[j - 1], "!") {
        return (value_range, false);
    }

    (&value_range[..j - 1], true)
}
