//! Path segments: the steps that make up a [`FieldPath`](crate::FieldPath).
//!
//! A [`PathSegment`] is one [`Step`] plus an optional owned `next`
//! segment, so a chain runs from the root of a path to its leaf and ends
//! where `next` is `None`. Chains are never shared between segments.
//! Operations that extend a chain deep-copy it first.
use std::iter::FusedIterator;

use crate::errors::PathError;

/// A single step of a path, either a field name or an array element index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Step {
    Name(String),
    Index(usize),
}

impl Step {
    fn kind(&self) -> &'static str {
        match self {
            Step::Name(_) => "named",
            Step::Index(_) => "indexed",
        }
    }
}

impl From<&str> for Step {
    fn from(name: &str) -> Self {
        Step::Name(name.to_owned())
    }
}

impl From<String> for Step {
    fn from(name: String) -> Self {
        Step::Name(name)
    }
}

impl From<usize> for Step {
    fn from(index: usize) -> Self {
        Step::Index(index)
    }
}

/// Check that `name` can be used as a named segment.
pub fn validate_name(name: &str) -> Result<(), PathError> {
    if name.is_empty() {
        Err(PathError::invalid_name(name, "field names must not be empty"))
    } else if name.contains(['.', '[']) {
        Err(PathError::invalid_name(
            name,
            "field names must not contain '.' or '['",
        ))
    } else {
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathSegment {
    step: Step,
    next: Option<Box<PathSegment>>,
}

impl PathSegment {
    /// A terminal field name segment.
    pub fn named(name: impl Into<String>) -> Result<Self, PathError> {
        let name = name.into();
        validate_name(&name)?;
        Ok(PathSegment {
            step: Step::Name(name),
            next: None,
        })
    }

    /// A terminal array element segment.
    pub fn indexed(index: usize) -> Self {
        PathSegment {
            step: Step::Index(index),
            next: None,
        }
    }

    pub fn from_step(step: Step) -> Result<Self, PathError> {
        match step {
            Step::Name(name) => PathSegment::named(name),
            Step::Index(index) => Ok(PathSegment::indexed(index)),
        }
    }

    /// Build a chain root-first from `steps`.
    ///
    /// Fails with [`PathError::MalformedPath`] if `steps` is empty, or
    /// [`PathError::InvalidName`] if any name is not a valid field name.
    pub fn from_steps<I, S>(steps: I) -> Result<Self, PathError>
    where
        I: IntoIterator<Item = S>,
        S: Into<Step>,
    {
        let steps = steps.into_iter().map(Into::into).collect::<Vec<Step>>();
        let mut chain: Option<PathSegment> = None;

        for step in steps.into_iter().rev() {
            let mut segment = PathSegment::from_step(step)?;
            segment.next = chain.map(Box::new);
            chain = Some(segment);
        }

        chain.ok_or_else(|| {
            PathError::MalformedPath(String::from("a path needs at least one segment"))
        })
    }

    pub fn step(&self) -> &Step {
        &self.step
    }

    pub fn is_named(&self) -> bool {
        matches!(self.step, Step::Name(_))
    }

    pub fn is_indexed(&self) -> bool {
        matches!(self.step, Step::Index(_))
    }

    pub(crate) fn as_named(&self) -> Result<&str, PathError> {
        match &self.step {
            Step::Name(name) => Ok(name),
            step => Err(PathError::TypeMismatch {
                expected: "named",
                found: step.kind(),
            }),
        }
    }

    pub(crate) fn as_indexed(&self) -> Result<usize, PathError> {
        match self.step {
            Step::Index(index) => Ok(index),
            ref step => Err(PathError::TypeMismatch {
                expected: "indexed",
                found: step.kind(),
            }),
        }
    }

    /// The next segment, or `None` if this segment ends the chain.
    pub fn child(&self) -> Option<&PathSegment> {
        self.next.as_deref()
    }

    /// A copy of this chain with `segment` (and its own chain) attached to
    /// the terminal end. `self` is left untouched.
    pub fn with_appended_child(&self, segment: PathSegment) -> PathSegment {
        let steps = self.iter().map(PathSegment::step).collect::<Vec<&Step>>();

        steps.into_iter().rev().fold(segment, |tail, step| PathSegment {
            step: step.clone(),
            next: Some(Box::new(tail)),
        })
    }

    /// Iterate over this segment and every segment after it.
    pub fn iter(&self) -> Segments<'_> {
        Segments {
            current: Some(self),
        }
    }

    /// The terminal segment of this chain.
    pub fn last(&self) -> &PathSegment {
        let mut segment = self;
        while let Some(next) = segment.child() {
            segment = next;
        }
        segment
    }
}

impl<'a> IntoIterator for &'a PathSegment {
    type Item = &'a PathSegment;
    type IntoIter = Segments<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct Segments<'a> {
    current: Option<&'a PathSegment>,
}

impl<'a> Iterator for Segments<'a> {
    type Item = &'a PathSegment;

    fn next(&mut self) -> Option<Self::Item> {
        let segment = self.current?;
        self.current = segment.child();
        Some(segment)
    }
}

impl FusedIterator for Segments<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    fn hash_of(segment: &PathSegment) -> u64 {
        let mut hasher = DefaultHasher::new();
        segment.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn chain_is_root_first() {
        let root =
            PathSegment::from_steps([Step::from("a"), Step::from(2usize), Step::from("c")])
                .unwrap();
        let steps = root.iter().map(|s| s.step().clone()).collect::<Vec<Step>>();
        assert_eq!(
            steps,
            vec![
                Step::Name(String::from("a")),
                Step::Index(2),
                Step::Name(String::from("c"))
            ]
        );
        assert_eq!(root.last().as_named().unwrap(), "c");
    }

    #[test]
    fn variant_discrimination() {
        let named = PathSegment::named("a").unwrap();
        let indexed = PathSegment::indexed(3);
        assert!(named.is_named() && !named.is_indexed());
        assert!(indexed.is_indexed() && !indexed.is_named());
        assert_eq!(indexed.as_indexed().unwrap(), 3);
        assert_eq!(
            named.as_indexed(),
            Err(PathError::TypeMismatch {
                expected: "indexed",
                found: "named"
            })
        );
        assert!(indexed.as_named().is_err());
    }

    #[test]
    fn invalid_names() {
        assert!(matches!(
            PathSegment::named(""),
            Err(PathError::InvalidName { .. })
        ));
        assert!(PathSegment::named("a.b").is_err());
        assert!(PathSegment::named("a[0").is_err());
        assert!(PathSegment::from_steps(Vec::<Step>::new()).is_err());
    }

    #[test]
    fn equality_covers_the_whole_chain() {
        let a = PathSegment::from_steps(["a", "b"]).unwrap();
        let b = PathSegment::from_steps(["a", "b"]).unwrap();
        let c = PathSegment::from_steps(["a", "c"]).unwrap();
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
        assert_ne!(a, c);
        assert_ne!(hash_of(&a), hash_of(&c));
    }

    #[test]
    fn append_copies_the_receiver() {
        let root = PathSegment::from_steps(["a", "b"]).unwrap();
        let extended = root.with_appended_child(PathSegment::indexed(1));

        assert_eq!(root.iter().count(), 2);
        assert!(root.last().child().is_none());
        assert_eq!(extended.iter().count(), 3);
        assert_eq!(extended.last().as_indexed().unwrap(), 1);
        assert_eq!(extended.child().and_then(|s| s.as_named().ok()), Some("b"));
    }

    #[test]
    fn append_a_chain() {
        let root = PathSegment::named("a").unwrap();
        let tail = PathSegment::from_steps([Step::from("b"), Step::from(0usize)]).unwrap();
        let extended = root.with_appended_child(tail.clone());
        assert_eq!(
            extended,
            PathSegment::from_steps([Step::from("a"), Step::from("b"), Step::from(0usize)]).unwrap()
        );
        assert_eq!(extended.child(), Some(&tail));
    }
}
