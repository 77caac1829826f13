//! Minimal RDF statement model.
//!
//! The store treats graph data as opaque: it never reasons over statements,
//! it only groups, merges, and filters them by graph name. [`Dataset`] is an
//! ordered set, so inserting an equal [`Quad`] twice keeps one copy.

use std::collections::btree_set;
use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::identifier::Identifier;

/// Subject or object position of a statement.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Term {
    Iri { value: Identifier },
    BlankNode { label: String },
    Literal {
        value: String,
        datatype: Option<Identifier>,
        language: Option<String>,
    },
}

impl Term {
    pub fn iri(value: Identifier) -> Self {
        Term::Iri { value }
    }

    pub fn blank(label: impl Into<String>) -> Self {
        Term::BlankNode {
            label: label.into(),
        }
    }

    /// A plain string literal.
    pub fn literal(value: impl Into<String>) -> Self {
        Term::Literal {
            value: value.into(),
            datatype: None,
            language: None,
        }
    }

    pub fn typed_literal(value: impl Into<String>, datatype: Identifier) -> Self {
        Term::Literal {
            value: value.into(),
            datatype: Some(datatype),
            language: None,
        }
    }

    pub fn lang_literal(value: impl Into<String>, language: impl Into<String>) -> Self {
        Term::Literal {
            value: value.into(),
            datatype: None,
            language: Some(language.into()),
        }
    }

    /// The IRI, if this term is one.
    pub fn as_iri(&self) -> Option<&Identifier> {
        match self {
            Term::Iri { value } => Some(value),
            _ => None,
        }
    }
}

impl From<Identifier> for Term {
    fn from(value: Identifier) -> Self {
        Term::Iri { value }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri { value } => write!(f, "<{value}>"),
            Term::BlankNode { label } => write!(f, "_:{label}"),
            Term::Literal {
                value,
                datatype,
                language,
            } => {
                write!(f, "{value:?}")?;
                if let Some(lang) = language {
                    write!(f, "@{lang}")?;
                } else if let Some(dt) = datatype {
                    write!(f, "^^<{dt}>")?;
                }
                Ok(())
            }
        }
    }
}

/// A statement: (graph, subject, predicate, object).
///
/// `graph` is `None` for the default graph.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Quad {
    pub graph: Option<Identifier>,
    pub subject: Term,
    pub predicate: Identifier,
    pub object: Term,
}

impl Quad {
    pub fn new(
        graph: Option<Identifier>,
        subject: impl Into<Term>,
        predicate: Identifier,
        object: impl Into<Term>,
    ) -> Self {
        Self {
            graph,
            subject: subject.into(),
            predicate,
            object: object.into(),
        }
    }

    /// A quad in the named graph `graph`.
    pub fn in_graph(
        graph: Identifier,
        subject: impl Into<Term>,
        predicate: Identifier,
        object: impl Into<Term>,
    ) -> Self {
        Self::new(Some(graph), subject, predicate, object)
    }

    /// Returns `true` if this quad belongs to the named graph `name`.
    pub fn is_in(&self, name: &Identifier) -> bool {
        self.graph.as_ref() == Some(name)
    }
}

impl fmt::Display for Quad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}> {}", self.subject, self.predicate, self.object)?;
        if let Some(g) = &self.graph {
            write!(f, " <{g}>")?;
        }
        write!(f, " .")
    }
}

/// An ordered set of quads.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    quads: BTreeSet<Quad>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a quad. Returns `false` if an equal quad was already present.
    pub fn insert(&mut self, quad: Quad) -> bool {
        self.quads.insert(quad)
    }

    pub fn contains(&self, quad: &Quad) -> bool {
        self.quads.contains(quad)
    }

    pub fn len(&self) -> usize {
        self.quads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }

    pub fn iter(&self) -> btree_set::Iter<'_, Quad> {
        self.quads.iter()
    }

    /// Move every quad of `other` into this dataset.
    pub fn merge(&mut self, other: Dataset) {
        self.quads.extend(other.quads);
    }

    /// A new dataset holding the quads of both.
    pub fn union(&self, other: &Dataset) -> Dataset {
        Dataset {
            quads: self.quads.union(&other.quads).cloned().collect(),
        }
    }

    /// Quads of the named graph `name`.
    pub fn graph<'a>(&'a self, name: &Identifier) -> impl Iterator<Item = &'a Quad> + 'a {
        let name = name.clone();
        self.quads.iter().filter(move |q| q.is_in(&name))
    }

    /// Distinct named graphs present in the dataset.
    pub fn graph_names(&self) -> BTreeSet<Identifier> {
        self.quads.iter().filter_map(|q| q.graph.clone()).collect()
    }
}

impl FromIterator<Quad> for Dataset {
    fn from_iter<I: IntoIterator<Item = Quad>>(iter: I) -> Self {
        Dataset {
            quads: iter.into_iter().collect(),
        }
    }
}

impl Extend<Quad> for Dataset {
    fn extend<I: IntoIterator<Item = Quad>>(&mut self, iter: I) {
        self.quads.extend(iter);
    }
}

impl IntoIterator for Dataset {
    type Item = Quad;
    type IntoIter = btree_set::IntoIter<Quad>;

    fn into_iter(self) -> Self::IntoIter {
        self.quads.into_iter()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Quad;
    type IntoIter = btree_set::Iter<'a, Quad>;

    fn into_iter(self) -> Self::IntoIter {
        self.quads.iter()
    }
}
