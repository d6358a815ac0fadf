//! The typed stylesheet model produced by the [`constructor`](crate::constructor).
//!
//! Shaped after simplecss's `Rule`/`Declaration`/`StyleSheet` (`lib.rs`),
//! generalized to the richer selector/value model spec §3 calls for
//! (combinators, multiple selectors per rule-group, structured
//! expression terms instead of an opaque value string).

/// A complete parsed stylesheet: an ordered list of rule-groups.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Stylesheet {
    pub rule_groups: Vec<RuleGroup>,
}

impl Stylesheet {
    pub fn new() -> Stylesheet {
        Stylesheet::default()
    }
}

/// One `selector, selector { declarations }` group. Construction discards
/// any rule-group that ends up with zero selectors or zero declarations.
#[derive(Clone, Debug, PartialEq)]
pub struct RuleGroup {
    pub selectors: Vec<Selector>,
    pub declarations: Vec<Declaration>,
}

/// How a [`SelectorElement`] relates to the one before it in the same
/// [`Selector`]. The first element of a selector always carries `None`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Combinator {
    #[default]
    None,
    /// Whitespace between simple selectors: "ancestor descendant".
    Descendant,
    /// `>`: "parent > child".
    Child,
    /// `+`: "element + adjacent-sibling".
    AdjacentSibling,
}

/// A single comma-separated selector: an ordered chain of simple
/// selectors joined by combinators.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selector {
    pub elements: Vec<SelectorElement>,
}

/// One simple selector in a [`Selector`] chain: an optional element name
/// plus any number of class/id/pseudo suffixes.
///
/// `attribute` and `pseudo` are placeholder collections per spec §3 --
/// attribute selector *contents* (`[foo=bar]`) are not parsed, only
/// recognized and skipped (Design Notes: unimplemented); pseudo-classes
/// are recorded by name but `:func(...)` argument lists are not parsed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SelectorElement {
    pub combinator: Combinator,
    /// `None` for no type constraint; `Some("*")` for the universal
    /// selector; `Some(name)` for a type selector.
    pub element: Option<String>,
    pub classes: Vec<String>,
    pub ids: Vec<String>,
    pub pseudo: Vec<String>,
    /// Raw, unparsed `[...]` contents. Placeholder per spec §3/§9:
    /// attribute selector syntax is recognized but not interpreted.
    pub attribute: Vec<String>,
}

impl SelectorElement {
    pub fn is_empty(&self) -> bool {
        self.element.is_none()
            && self.classes.is_empty()
            && self.ids.is_empty()
            && self.pseudo.is_empty()
            && self.attribute.is_empty()
    }
}

/// A `property: value [!important]` pair.
#[derive(Clone, Debug, PartialEq)]
pub struct Declaration {
    pub property: String,
    pub important: bool,
    pub values: Vec<PValue>,
}

/// What separated this value term from the previous one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Separator {
    None,
    Slash,
    Comma,
}

/// A unary sign applied to a numeric term.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnarySign {
    None,
    Plus,
    Minus,
}

/// One term in a declaration's value expression.
#[derive(Clone, Debug, PartialEq)]
pub struct PValue {
    pub separator: Separator,
    pub sign: UnarySign,
    pub payload: PValuePayload,
}

/// The value carried by a [`PValue`]: either a leaf token's text, or (for
/// a function call like `rgb(1,2,3)`) a nested list of argument terms.
#[derive(Clone, Debug, PartialEq)]
pub enum PValuePayload {
    Number(String),
    Percentage(String),
    Dimension { text: String, div: usize },
    String(String),
    Ident(String),
    Uri(String),
    Function { name: String, args: Vec<PValue> },
}
