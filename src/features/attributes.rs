//! Declarative attribute lookup for boundary records.
//!
//! Each output column is resolved through an ordered list of candidate
//! property keys, first match wins, ending in a fallback so every region
//! gets an identity even when the source columns are missing.

use crate::domain::{GeoRegion, Level};

/// What a chain yields when no candidate key is present
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fallback {
    /// `{prefix}{index}`, using the region's input position
    Placeholder(&'static str),
    /// Reuse the already resolved code
    Code,
    /// A fixed value
    Literal(&'static str),
    /// No value at all
    Absent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeChain {
    pub candidates: Vec<String>,
    pub fallback: Fallback,
}

impl AttributeChain {
    pub fn new<I, S>(candidates: I, fallback: Fallback) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            candidates: candidates.into_iter().map(Into::into).collect(),
            fallback,
        }
    }

    /// First present candidate, without applying the fallback
    pub fn lookup(&self, region: &GeoRegion) -> Option<String> {
        self.candidates.iter().find_map(|key| region.attribute(key))
    }

    fn resolve(&self, region: &GeoRegion, code: Option<&str>) -> Option<String> {
        self.lookup(region).or_else(|| match &self.fallback {
            Fallback::Placeholder(prefix) => Some(format!("{prefix}{}", region.index)),
            Fallback::Code => code.map(str::to_string),
            Fallback::Literal(value) => Some((*value).to_string()),
            Fallback::Absent => None,
        })
    }
}

/// Resolved identity of a region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attributes {
    pub code: String,
    pub name: String,
    pub state: String,
    pub parent_code: Option<String>,
}

/// The full set of chains for one administrative level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSchema {
    pub code: AttributeChain,
    pub name: AttributeChain,
    pub state: AttributeChain,
    /// Only levels that nest inside a coarser one have a parent chain
    pub parent: Option<AttributeChain>,
}

impl AttributeSchema {
    /// ASGS 2021 column names, with generic `code`/`name`/`state` fallbacks
    pub fn for_level(level: Level) -> Self {
        let prefix = level.code();
        Self {
            code: AttributeChain::new(
                [format!("{prefix}_CODE_2021"), "code".to_string()],
                Fallback::Placeholder("UNKNOWN_"),
            ),
            name: AttributeChain::new(
                [format!("{prefix}_NAME_2021"), "name".to_string()],
                Fallback::Code,
            ),
            state: AttributeChain::new(["STE_CODE_2021", "state"], Fallback::Literal("UNKNOWN")),
            parent: level
                .has_parent()
                .then(|| AttributeChain::new(["SA4_CODE_2021"], Fallback::Absent)),
        }
    }

    /// Resolve every column through its chain alone.
    ///
    /// `None` when code, name or state has no value and its chain ends in
    /// [`Fallback::Absent`].
    pub fn extract(&self, region: &GeoRegion) -> Option<Attributes> {
        let code = self.code.resolve(region, None)?;
        let name = self.name.resolve(region, Some(&code))?;
        let state = self.state.resolve(region, Some(&code))?;
        let parent_code = self
            .parent
            .as_ref()
            .and_then(|chain| chain.resolve(region, Some(&code)));

        Some(Attributes {
            code,
            name,
            state,
            parent_code,
        })
    }
}
