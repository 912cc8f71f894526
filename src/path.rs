use std::{
    fmt,
    hash::{Hash, Hasher},
};

use crate::{
    errors::PathError,
    expression::{ExprVisitor, ExpressionPosition, LogicalExpression},
    segment::{PathSegment, Segments, Step},
};

/// A reference to a possibly nested field of a record, such as `a.b[2].c`.
///
/// A `FieldPath` owns a chain of [`PathSegment`]s and is always a leaf of
/// a [`LogicalExpression`] tree. It is immutable: the `with_child_*`
/// methods return a new path and leave the receiver as it was.
///
/// Equality and hashing cover every segment of the chain. The position a
/// path was parsed at is ignored by both.
///
/// ```
/// use field_path::FieldPath;
///
/// let path = FieldPath::compound(["a", "b"])?.with_child_index(2)?;
/// assert_eq!(path.as_unescaped_dotted_string()?, "a.b[2]");
/// assert_eq!(path.to_canonical_text(), "`a`.`b`[2]");
/// # Ok::<(), field_path::PathError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FieldPath {
    root: PathSegment,
    position: ExpressionPosition,
}

impl FieldPath {
    pub fn new(root: PathSegment) -> Self {
        FieldPath {
            root,
            position: ExpressionPosition::Unknown,
        }
    }

    /// Build a path root-first from a sequence of names and indices.
    pub fn from_segments<I, S>(steps: I) -> Result<Self, PathError>
    where
        I: IntoIterator<Item = S>,
        S: Into<Step>,
    {
        PathSegment::from_steps(steps).map(FieldPath::new)
    }

    /// A path naming a single top level field.
    pub fn simple(name: &str) -> Result<Self, PathError> {
        PathSegment::named(name).map(FieldPath::new)
    }

    /// A path made only of field names.
    pub fn compound<I, S>(names: I) -> Result<Self, PathError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        FieldPath::from_segments(names.into_iter().map(|n| Step::from(n.as_ref())))
    }

    pub fn with_position(self, position: ExpressionPosition) -> Self {
        FieldPath { position, ..self }
    }

    pub fn position(&self) -> ExpressionPosition {
        self.position
    }

    pub fn with_child_field(&self, name: &str) -> Result<Self, PathError> {
        let child = PathSegment::named(name)?;
        Ok(FieldPath::new(self.root.with_appended_child(child)))
    }

    /// Fails with [`PathError::OutOfRange`] if `index` is negative.
    pub fn with_child_index(&self, index: i64) -> Result<Self, PathError> {
        let i = usize::try_from(index).map_err(|_| PathError::OutOfRange { index })?;
        Ok(FieldPath::new(
            self.root.with_appended_child(PathSegment::indexed(i)),
        ))
    }

    pub fn root_segment(&self) -> &PathSegment {
        &self.root
    }

    pub fn last_segment(&self) -> &PathSegment {
        self.root.last()
    }

    pub fn segments(&self) -> Segments<'_> {
        self.root.iter()
    }

    /// The number of segments in this path.
    pub fn depth(&self) -> usize {
        self.segments().count()
    }

    /// Render the path with `.` between names and `[n]` for indices, with
    /// no quoting or escaping. The result is for display and may not parse.
    ///
    /// Paths that start with an array index have no dotted form and fail
    /// with [`PathError::UnsupportedShape`].
    pub fn as_unescaped_dotted_string(&self) -> Result<String, PathError> {
        if self.root.is_indexed() {
            return Err(PathError::UnsupportedShape(String::from(
                "top level arrays have no dotted form",
            )));
        }

        let mut rv = String::from(self.root.as_named()?);

        for segment in self.root.iter().skip(1) {
            if segment.is_named() {
                rv.push('.');
                rv.push_str(segment.as_named()?);
            } else {
                rv.push('[');
                rv.push_str(&segment.as_indexed()?.to_string());
                rv.push(']');
            }
        }

        Ok(rv)
    }

    /// Dispatch to the visitor's field path method.
    pub fn accept<V, X>(&self, visitor: &mut X, value: V) -> Result<X::Output, X::Error>
    where
        X: ExprVisitor<V> + ?Sized,
    {
        visitor.visit_field_path(self, value)
    }

    /// The escaped form of this path, which parses back to an equal path.
    pub fn to_canonical_text(&self) -> String {
        self.to_string()
    }

    pub fn into_expression(self) -> LogicalExpression {
        LogicalExpression::FieldPath(self)
    }
}

impl PartialEq for FieldPath {
    fn eq(&self, other: &Self) -> bool {
        self.root == other.root
    }
}

impl Eq for FieldPath {}

impl Hash for FieldPath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.root.hash(state);
    }
}

impl From<PathSegment> for FieldPath {
    fn from(root: PathSegment) -> Self {
        FieldPath::new(root)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::render::write_path(f, self)
    }
}
