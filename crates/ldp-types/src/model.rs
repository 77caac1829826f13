use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::vocab;

/// Classification of a resource, which decides how clients interact with it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InteractionModel {
    /// A resource whose state is an RDF graph.
    RdfSource,
    /// A binary-described resource.
    NonRdfSource,
    /// Generic container.
    Container,
    BasicContainer,
    DirectContainer,
    IndirectContainer,
}

impl InteractionModel {
    /// All interaction models, in declaration order.
    pub const ALL: [InteractionModel; 6] = [
        InteractionModel::RdfSource,
        InteractionModel::NonRdfSource,
        InteractionModel::Container,
        InteractionModel::BasicContainer,
        InteractionModel::DirectContainer,
        InteractionModel::IndirectContainer,
    ];

    /// The LDP IRI naming this model.
    pub fn iri(&self) -> &'static str {
        match self {
            InteractionModel::RdfSource => vocab::LDP_RDF_SOURCE,
            InteractionModel::NonRdfSource => vocab::LDP_NON_RDF_SOURCE,
            InteractionModel::Container => vocab::LDP_CONTAINER,
            InteractionModel::BasicContainer => vocab::LDP_BASIC_CONTAINER,
            InteractionModel::DirectContainer => vocab::LDP_DIRECT_CONTAINER,
            InteractionModel::IndirectContainer => vocab::LDP_INDIRECT_CONTAINER,
        }
    }

    /// Parse a model from its full LDP IRI.
    pub fn from_iri(iri: &str) -> Result<Self, TypeError> {
        Self::ALL
            .into_iter()
            .find(|m| m.iri() == iri)
            .ok_or_else(|| TypeError::UnknownInteractionModel(iri.to_string()))
    }

    /// Returns `true` for every kind of container.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            InteractionModel::Container
                | InteractionModel::BasicContainer
                | InteractionModel::DirectContainer
                | InteractionModel::IndirectContainer
        )
    }

    /// Short local name, e.g. `BasicContainer`.
    pub fn local_name(&self) -> &'static str {
        &self.iri()[vocab::LDP_NS.len()..]
    }
}

impl fmt::Display for InteractionModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ldp:{}", self.local_name())
    }
}

impl FromStr for InteractionModel {
    type Err = TypeError;

    /// Accepts the full IRI, the `ldp:` prefixed name, or the bare local name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let local = s
            .strip_prefix(vocab::LDP_NS)
            .or_else(|| s.strip_prefix("ldp:"))
            .unwrap_or(s);
        Self::ALL
            .into_iter()
            .find(|m| m.local_name() == local)
            .ok_or_else(|| TypeError::UnknownInteractionModel(s.to_string()))
    }
}
