//! Fact tuples and the ordered store one detection run appends to.
//!
//! Insertion order is part of the output contract. The only mutation of an
//! existing fact is `replace`, used by the serial sanitizer.

use serde::{Deserialize, Serialize};

/// One discovered property: `(category, resource, attribute, value)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fact {
    pub category: String,
    pub resource: String,
    pub attribute: String,
    pub value: String,
}

impl Fact {
    pub fn new(
        category: impl Into<String>,
        resource: impl Into<String>,
        attribute: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            resource: resource.into(),
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    pub fn as_tuple(&self) -> (&str, &str, &str, &str) {
        (&self.category, &self.resource, &self.attribute, &self.value)
    }

    fn matches(&self, category: &str, resource: &str, attribute: &str) -> bool {
        self.category == category && self.resource == resource && self.attribute == attribute
    }
}

impl<A, B, C, D> From<(A, B, C, D)> for Fact
where
    A: Into<String>,
    B: Into<String>,
    C: Into<String>,
    D: Into<String>,
{
    fn from((category, resource, attribute, value): (A, B, C, D)) -> Self {
        Fact::new(category, resource, attribute, value)
    }
}

/// Ordered fact collection for a single detection run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FactStore {
    facts: Vec<Fact>,
}

impl FactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, fact: impl Into<Fact>) {
        self.facts.push(fact.into());
    }

    /// Append a whole record at once.
    pub fn extend<I>(&mut self, facts: I)
    where
        I: IntoIterator<Item = Fact>,
    {
        self.facts.extend(facts);
    }

    /// Value of the first fact matching the key, `None` when not found.
    pub fn find(&self, category: &str, resource: &str, attribute: &str) -> Option<&str> {
        self.facts
            .iter()
            .find(|f| f.matches(category, resource, attribute))
            .map(|f| f.value.as_str())
    }

    /// Patch the value of the first matching fact in place.
    /// Returns false (and adds nothing) when no fact matches.
    pub fn replace(
        &mut self,
        category: &str,
        resource: &str,
        attribute: &str,
        value: impl Into<String>,
    ) -> bool {
        match self
            .facts
            .iter_mut()
            .find(|f| f.matches(category, resource, attribute))
        {
            Some(fact) => {
                fact.value = value.into();
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Fact> {
        self.facts.iter()
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    pub fn as_slice(&self) -> &[Fact] {
        &self.facts
    }

    pub fn into_vec(self) -> Vec<Fact> {
        self.facts
    }
}

impl<'a> IntoIterator for &'a FactStore {
    type Item = &'a Fact;
    type IntoIter = std::slice::Iter<'a, Fact>;

    fn into_iter(self) -> Self::IntoIter {
        self.facts.iter()
    }
}

impl From<Vec<Fact>> for FactStore {
    fn from(facts: Vec<Fact>) -> Self {
        Self { facts }
    }
}
