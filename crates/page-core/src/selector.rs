//! CSS selector subset used by the page.
//!
//! Supports type, class, id and attribute selectors (`[a]`, `[a="v"]`,
//! `[a^="v"]`), the descendant combinator and selector lists.

use crate::{ElementId, PageError, PageResult};

/// Read access to the element data a selector can test.
pub trait ElementView {
    fn view_tag(&self, el: ElementId) -> String;
    fn view_has_class(&self, el: ElementId, class: &str) -> bool;
    fn view_attr(&self, el: ElementId, name: &str) -> Option<String>;
    fn view_parent(&self, el: ElementId) -> Option<ElementId>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum AttrOp {
    Exists,
    Equals(String),
    Prefix(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttrMatch {
    name: String,
    op: AttrOp,
}

/// One compound selector, e.g. `img.hero[data-src]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrMatch>,
}

/// Compounds joined by descendant combinators; the last one is the subject.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Complex {
    compounds: Vec<Compound>,
}

/// A parsed, comma-separated selector list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList {
    selectors: Vec<Complex>,
}

impl SelectorList {
    /// Parse a selector list.
    pub fn parse(input: &str) -> PageResult<Self> {
        let mut selectors = Vec::new();
        for part in input.split(',') {
            let part = part.trim();
            if part.is_empty() {
                return Err(PageError::UnsupportedSelector(input.to_string()));
            }
            let compounds = part
                .split_whitespace()
                .map(|c| parse_compound(c).map_err(|_| PageError::UnsupportedSelector(input.to_string())))
                .collect::<PageResult<Vec<_>>>()?;
            selectors.push(Complex { compounds });
        }
        Ok(Self { selectors })
    }

    /// Whether `el` matches any selector in the list.
    pub fn matches<V: ElementView + ?Sized>(&self, view: &V, el: ElementId) -> bool {
        self.selectors.iter().any(|s| s.matches(view, el))
    }
}

impl Complex {
    fn matches<V: ElementView + ?Sized>(&self, view: &V, el: ElementId) -> bool {
        let Some((subject, ancestors)) = self.compounds.split_last() else {
            return false;
        };
        if !subject.matches(view, el) {
            return false;
        }

        let mut current = view.view_parent(el);
        for compound in ancestors.iter().rev() {
            loop {
                match current {
                    Some(candidate) => {
                        current = view.view_parent(candidate);
                        if compound.matches(view, candidate) {
                            break;
                        }
                    }
                    None => return false,
                }
            }
        }
        true
    }
}

impl Compound {
    fn matches<V: ElementView + ?Sized>(&self, view: &V, el: ElementId) -> bool {
        if let Some(tag) = &self.tag {
            if !view.view_tag(el).eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if view.view_attr(el, "id").as_deref() != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|c| view.view_has_class(el, c)) {
            return false;
        }
        self.attrs.iter().all(|a| {
            let value = view.view_attr(el, &a.name);
            match (&a.op, value) {
                (_, None) => false,
                (AttrOp::Exists, Some(_)) => true,
                (AttrOp::Equals(expected), Some(v)) => v == *expected,
                (AttrOp::Prefix(prefix), Some(v)) => v.starts_with(prefix.as_str()),
            }
        })
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn read_ident(chars: &[char], start: usize) -> (String, usize) {
    let mut end = start;
    while end < chars.len() && is_ident_char(chars[end]) {
        end += 1;
    }
    (chars[start..end].iter().collect(), end)
}

fn parse_compound(input: &str) -> Result<Compound, ()> {
    let chars: Vec<char> = input.chars().collect();
    let mut compound = Compound::default();

    let mut i = if chars.first() == Some(&'*') {
        1
    } else {
        let (tag, next) = read_ident(&chars, 0);
        if !tag.is_empty() {
            compound.tag = Some(tag.to_ascii_lowercase());
        }
        next
    };

    while i < chars.len() {
        match chars[i] {
            '.' => {
                let (name, next) = read_ident(&chars, i + 1);
                if name.is_empty() {
                    return Err(());
                }
                compound.classes.push(name);
                i = next;
            }
            '#' => {
                let (name, next) = read_ident(&chars, i + 1);
                if name.is_empty() {
                    return Err(());
                }
                compound.id = Some(name);
                i = next;
            }
            '[' => {
                let close = chars[i..].iter().position(|c| *c == ']').ok_or(())? + i;
                let inner: String = chars[i + 1..close].iter().collect();
                compound.attrs.push(parse_attr(&inner)?);
                i = close + 1;
            }
            _ => return Err(()),
        }
    }

    Ok(compound)
}

fn parse_attr(inner: &str) -> Result<AttrMatch, ()> {
    let unquote = |v: &str| v.trim().trim_matches('"').trim_matches('\'').to_string();

    if let Some((name, value)) = inner.split_once("^=") {
        return Ok(AttrMatch {
            name: valid_name(name)?,
            op: AttrOp::Prefix(unquote(value)),
        });
    }
    if let Some((name, value)) = inner.split_once('=') {
        // `~=`, `|=`, `$=` and `*=` are not supported
        if name.ends_with(|c| matches!(c, '~' | '|' | '$' | '*')) {
            return Err(());
        }
        return Ok(AttrMatch {
            name: valid_name(name)?,
            op: AttrOp::Equals(unquote(value)),
        });
    }
    Ok(AttrMatch {
        name: valid_name(inner)?,
        op: AttrOp::Exists,
    })
}

fn valid_name(name: &str) -> Result<String, ()> {
    let name = name.trim();
    if name.is_empty() || !name.chars().all(is_ident_char) {
        return Err(());
    }
    Ok(name.to_ascii_lowercase())
}
