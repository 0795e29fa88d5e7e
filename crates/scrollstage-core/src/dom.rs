//! # Document Module
//!
//! In-memory model of the page elements the timeline and counters write to.
//! The host mirrors `Style` and `text` into its real UI each frame.
//!
//! ## Selectors
//! A small subset parsed with `nom`: comma-separated groups of compounds
//! (`#id`, `.class`, `*`) joined by descendant (whitespace) or child (`>`)
//! combinators, e.g. `#design .split-side.left, #cta > .reveal`.

use crate::errors::EngineError;
use crate::types::ElementId;
use nom::{
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{char, multispace0, multispace1},
    combinator::{all_consuming, cut, map, opt, value, verify},
    error::{context, VerboseError, VerboseErrorKind},
    multi::{many0, separated_list1},
    sequence::{delimited, pair, preceded},
    IResult,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Style properties a transition can drive.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleProperty {
    Opacity,
    TranslateX,
    TranslateY,
    Scale,
}

impl StyleProperty {
    /// Parses the names used in scripts (`opacity`, `x`, `y`, `translate_x`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "opacity" | "alpha" => Some(StyleProperty::Opacity),
            "x" | "translate_x" | "translatex" => Some(StyleProperty::TranslateX),
            "y" | "translate_y" | "translatey" => Some(StyleProperty::TranslateY),
            "scale" => Some(StyleProperty::Scale),
            _ => None,
        }
    }
}

/// Visual state of an element: opacity and a 2D offset/scale.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub opacity: f32,
    pub translate_x: f32,
    pub translate_y: f32,
    pub scale: f32,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            translate_x: 0.0,
            translate_y: 0.0,
            scale: 1.0,
        }
    }
}

impl Style {
    pub fn get(&self, property: StyleProperty) -> f32 {
        match property {
            StyleProperty::Opacity => self.opacity,
            StyleProperty::TranslateX => self.translate_x,
            StyleProperty::TranslateY => self.translate_y,
            StyleProperty::Scale => self.scale,
        }
    }

    pub fn set(&mut self, property: StyleProperty, value: f32) {
        match property {
            StyleProperty::Opacity => self.opacity = value,
            StyleProperty::TranslateX => self.translate_x = value,
            StyleProperty::TranslateY => self.translate_y = value,
            StyleProperty::Scale => self.scale = value,
        }
    }
}

/// A node of the document tree.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Element {
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub parent: Option<ElementId>,
    pub style: Style,
    pub text: String,
    /// `data-*` attributes, keyed without the `data-` prefix.
    pub data: BTreeMap<String, String>,
}

impl Element {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an element from a compound such as `#features` or `.split-side.left`.
    pub fn compound(spec: &str) -> Result<Self, EngineError> {
        let compound = Compound::parse(spec)?;
        Ok(Self {
            id: compound.id,
            classes: compound.classes,
            ..Default::default()
        })
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn with_data(mut self, key: &str, value: &str) -> Self {
        self.data.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// Arena of elements in document order.
#[derive(Clone, Debug, Default)]
pub struct Document {
    elements: Vec<Element>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a top-level element.
    pub fn add_element(&mut self, element: Element) -> ElementId {
        let id = self.elements.len();
        self.elements.push(element);
        id
    }

    /// Appends `element` as a child of `parent`.
    pub fn add_child(&mut self, parent: ElementId, mut element: Element) -> ElementId {
        element.parent = Some(parent);
        self.add_element(element)
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(id)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &Element)> {
        self.elements.iter().enumerate()
    }

    /// All elements matching `selector`, in document order.
    pub fn query(&self, selector: &str) -> Result<Vec<ElementId>, EngineError> {
        let selector = Selector::parse(selector)?;
        Ok(self
            .iter()
            .filter(|(id, _)| selector.matches(self, *id))
            .map(|(id, _)| id)
            .collect())
    }

    /// Like [`Document::query`], but an empty match is `MissingTrackTarget`.
    pub fn query_required(&self, selector: &str) -> Result<Vec<ElementId>, EngineError> {
        let ids = self.query(selector)?;
        if ids.is_empty() {
            return Err(EngineError::MissingTrackTarget(selector.to_string()));
        }
        Ok(ids)
    }

    pub fn style(&self, id: ElementId) -> Option<Style> {
        self.element(id).map(|e| e.style)
    }

    pub fn set_style(&mut self, id: ElementId, property: StyleProperty, value: f32) {
        if let Some(element) = self.elements.get_mut(id) {
            element.style.set(property, value);
        }
    }

    pub fn text(&self, id: ElementId) -> Option<&str> {
        self.element(id).map(|e| e.text.as_str())
    }

    pub fn set_text(&mut self, id: ElementId, text: &str) {
        if let Some(element) = self.elements.get_mut(id) {
            element.text.clear();
            element.text.push_str(text);
        }
    }

    /// Reads a `data-*` attribute.
    pub fn data(&self, id: ElementId, key: &str) -> Option<&str> {
        self.element(id)
            .and_then(|e| e.data.get(key))
            .map(|v| v.as_str())
    }
}

type ParseResult<'a, O> = IResult<&'a str, O, VerboseError<&'a str>>;

#[derive(Clone, Debug, PartialEq)]
enum SimpleSelector {
    Id(String),
    Class(String),
}

#[derive(Clone, Debug, Default, PartialEq)]
struct Compound {
    id: Option<String>,
    classes: Vec<String>,
}

impl Compound {
    fn parse(token: &str) -> Result<Self, EngineError> {
        all_consuming(compound)(token)
            .map(|(_, compound)| compound)
            .map_err(|e| invalid_selector(token, e))
    }

    fn matches(&self, element: &Element) -> bool {
        if let Some(id) = &self.id {
            if element.id.as_deref() != Some(id.as_str()) {
                return false;
            }
        }
        self.classes.iter().all(|c| element.has_class(c))
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Clone, Debug)]
struct ComplexSelector {
    /// Compounds left to right; the combinator links a part to the one before it.
    parts: Vec<(Combinator, Compound)>,
}

impl ComplexSelector {
    fn matches(&self, document: &Document, id: ElementId) -> bool {
        self.matches_part(document, self.parts.len() - 1, id)
    }

    fn matches_part(&self, document: &Document, index: usize, id: ElementId) -> bool {
        let Some(element) = document.element(id) else {
            return false;
        };
        let (combinator, compound) = &self.parts[index];
        if !compound.matches(element) {
            return false;
        }
        if index == 0 {
            return true;
        }
        match combinator {
            Combinator::Child => element
                .parent
                .is_some_and(|p| self.matches_part(document, index - 1, p)),
            Combinator::Descendant => {
                let mut ancestor = element.parent;
                while let Some(a) = ancestor {
                    if self.matches_part(document, index - 1, a) {
                        return true;
                    }
                    ancestor = document.element(a).and_then(|e| e.parent);
                }
                false
            }
        }
    }
}

/// Parse an identifier (alphanumeric, hyphen, underscore)
fn identifier(input: &str) -> ParseResult<&str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '-' || c == '_')(input)
}

/// Parse `#id` or `.class`
fn simple_selector(input: &str) -> ParseResult<SimpleSelector> {
    alt((
        map(preceded(char('#'), cut(context("id", identifier))), |id: &str| {
            SimpleSelector::Id(id.to_string())
        }),
        map(
            preceded(char('.'), cut(context("class name", identifier))),
            |class: &str| SimpleSelector::Class(class.to_string()),
        ),
    ))(input)
}

/// Parse a compound: optional `*` followed by `#id` / `.class` parts, at most one id.
fn compound(input: &str) -> ParseResult<Compound> {
    let (input, (_, parts)) = context(
        "compound selector",
        verify(
            pair(opt(char('*')), many0(simple_selector)),
            |(universal, parts): &(Option<char>, Vec<SimpleSelector>)| {
                let ids = parts
                    .iter()
                    .filter(|p| matches!(p, SimpleSelector::Id(_)))
                    .count();
                (universal.is_some() || !parts.is_empty()) && ids <= 1
            },
        ),
    )(input)?;

    let mut compound = Compound::default();
    for part in parts {
        match part {
            SimpleSelector::Id(id) => compound.id = Some(id),
            SimpleSelector::Class(class) => compound.classes.push(class),
        }
    }
    Ok((input, compound))
}

/// Parse `>` (with optional surrounding whitespace) or bare whitespace
fn combinator(input: &str) -> ParseResult<Combinator> {
    alt((
        value(
            Combinator::Child,
            delimited(multispace0, char('>'), multispace0),
        ),
        value(Combinator::Descendant, multispace1),
    ))(input)
}

/// Parse compounds joined by combinators, e.g. `#features > .card .reveal`
fn complex_selector(input: &str) -> ParseResult<ComplexSelector> {
    let (input, first) = compound(input)?;
    let (input, rest) = many0(pair(combinator, compound))(input)?;
    let mut parts = vec![(Combinator::Descendant, first)];
    parts.extend(rest);
    Ok((input, ComplexSelector { parts }))
}

/// Parse a comma-separated selector list
fn selector_list(input: &str) -> ParseResult<Vec<ComplexSelector>> {
    all_consuming(delimited(
        multispace0,
        separated_list1(
            delimited(multispace0, char(','), multispace0),
            complex_selector,
        ),
        multispace0,
    ))(input)
}

fn invalid_selector(selector: &str, err: nom::Err<VerboseError<&str>>) -> EngineError {
    let reason = match err {
        nom::Err::Error(e) | nom::Err::Failure(e) => format_verbose_error(&e),
        nom::Err::Incomplete(_) => "unexpected end of selector".to_string(),
    };
    EngineError::InvalidSelector {
        selector: selector.to_string(),
        reason,
    }
}

fn format_verbose_error(err: &VerboseError<&str>) -> String {
    let mut parts = Vec::new();
    for (input, kind) in &err.errors {
        let near: String = input.chars().take(20).collect();
        match kind {
            VerboseErrorKind::Context(ctx) => parts.push(format!("in {}", ctx)),
            VerboseErrorKind::Char(c) => parts.push(format!("expected '{}' near \"{}\"", c, near)),
            VerboseErrorKind::Nom(kind) => parts.push(format!("{:?} near \"{}\"", kind, near)),
        }
    }
    if parts.is_empty() {
        "unknown parse error".to_string()
    } else {
        parts.join(", ")
    }
}

/// A parsed selector list.
#[derive(Clone, Debug)]
pub struct Selector {
    groups: Vec<ComplexSelector>,
}

impl Selector {
    pub fn parse(selector: &str) -> Result<Self, EngineError> {
        let (_, groups) = selector_list(selector).map_err(|e| invalid_selector(selector, e))?;
        Ok(Self { groups })
    }

    pub fn matches(&self, document: &Document, id: ElementId) -> bool {
        self.groups.iter().any(|g| g.matches(document, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> (Document, Vec<ElementId>) {
        let mut doc = Document::new();
        let features = doc.add_element(Element::new().with_id("features"));
        let a = doc.add_child(features, Element::new().with_class("reveal"));
        let card = doc.add_child(features, Element::new().with_class("card"));
        let b = doc.add_child(card, Element::new().with_class("reveal"));
        let design = doc.add_element(Element::new().with_id("design"));
        let left = doc.add_child(
            design,
            Element::new().with_class("split-side").with_class("left"),
        );
        let right = doc.add_child(
            design,
            Element::new().with_class("split-side").with_class("right"),
        );
        (doc, vec![features, a, card, b, design, left, right])
    }

    #[test]
    fn descendant_and_child_combinators() {
        let (doc, ids) = page();
        assert_eq!(doc.query("#features .reveal").unwrap(), vec![ids[1], ids[3]]);
        assert_eq!(doc.query("#features > .reveal").unwrap(), vec![ids[1]]);
        assert_eq!(doc.query("#features>.card>.reveal").unwrap(), vec![ids[3]]);
    }

    #[test]
    fn compound_and_groups() {
        let (doc, ids) = page();
        assert_eq!(doc.query("#design .split-side.left").unwrap(), vec![ids[5]]);
        assert_eq!(
            doc.query(".split-side.right, #features > .reveal").unwrap(),
            vec![ids[1], ids[6]]
        );
        assert_eq!(doc.query("#design > *").unwrap(), vec![ids[5], ids[6]]);
    }

    #[test]
    fn empty_match_is_missing_target() {
        let (doc, _) = page();
        assert!(doc.query(".nope").unwrap().is_empty());
        assert!(matches!(
            doc.query_required(".nope"),
            Err(EngineError::MissingTrackTarget(_))
        ));
    }

    #[test]
    fn malformed_selectors_are_rejected() {
        let doc = Document::new();
        for bad in ["", "#a >", "> .b", "#a,,.b", ".", "div", "#a#b"] {
            assert!(
                matches!(doc.query(bad), Err(EngineError::InvalidSelector { .. })),
                "{:?} should be invalid",
                bad
            );
        }
    }

    #[test]
    fn selector_errors_name_the_failing_part() {
        let doc = Document::new();
        match doc.query("#features .") {
            Err(EngineError::InvalidSelector { selector, reason }) => {
                assert_eq!(selector, "#features .");
                assert!(reason.contains("class name"), "{}", reason);
            }
            other => panic!("expected invalid selector, got {:?}", other),
        }
    }

    #[test]
    fn whitespace_around_groups_and_combinators() {
        let (doc, ids) = page();
        assert_eq!(
            doc.query("  #features  >  .reveal ,\n.split-side.left ").unwrap(),
            vec![ids[1], ids[5]]
        );
    }

    #[test]
    fn element_from_compound() {
        let e = Element::compound("#cta.reveal.big").unwrap();
        assert_eq!(e.id.as_deref(), Some("cta"));
        assert_eq!(e.classes, vec!["reveal".to_string(), "big".to_string()]);
    }

    #[test]
    fn style_accessors() {
        let mut doc = Document::new();
        let id = doc.add_element(Element::new());
        doc.set_style(id, StyleProperty::TranslateY, -50.0);
        doc.set_style(id, StyleProperty::Opacity, 0.25);
        let style = doc.style(id).unwrap();
        assert_eq!(style.get(StyleProperty::TranslateY), -50.0);
        assert_eq!(style.opacity, 0.25);
        assert_eq!(style.scale, 1.0);
    }
}
