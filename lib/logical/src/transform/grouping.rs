use crate::Constraint;
use rustc_hash::FxHashMap;
use std::hash::{Hash, Hasher};
use triad_model::{ConstraintElement, NamedNode, NamedNodeRef};

/// A map that iterates in the order in which keys were first inserted.
#[derive(Debug, Clone)]
pub(crate) struct OrderedGroups<K, V> {
    index: FxHashMap<K, usize>,
    entries: Vec<(K, V)>,
}

impl<K, V> Default for OrderedGroups<K, V> {
    fn default() -> Self {
        Self {
            index: FxHashMap::default(),
            entries: Vec::new(),
        }
    }
}

impl<K: Eq + Hash + Clone, V> OrderedGroups<K, V> {
    /// Returns the value for `key`, inserting `create()` if the key is new.
    pub(crate) fn get_or_insert_with(&mut self, key: K, create: impl FnOnce() -> V) -> &mut V {
        let next = self.entries.len();
        let index = *self.index.entry(key.clone()).or_insert(next);
        if index == next {
            self.entries.push((key, create()));
        }
        &mut self.entries[index].1
    }

    pub(crate) fn get(&self, key: &K) -> Option<&V> {
        self.index.get(key).map(|index| &self.entries[*index].1)
    }

    pub(crate) fn entries(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|(key, value)| (key, value))
    }

    pub(crate) fn into_values(self) -> impl Iterator<Item = V> {
        self.entries.into_iter().map(|(_, value)| value)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for OrderedGroups<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<K: Eq, V: Eq> Eq for OrderedGroups<K, V> {}

impl<K: Hash, V: Hash> Hash for OrderedGroups<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.entries.hash(state);
    }
}

/// The objects of a single subject, grouped by predicate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PredicateGroups {
    predicates: OrderedGroups<ConstraintElement, Vec<ConstraintElement>>,
}

impl PredicateGroups {
    /// Iterates over the predicates and their objects in order of first occurrence.
    pub fn predicates(&self) -> impl Iterator<Item = (&ConstraintElement, &[ConstraintElement])> {
        self.predicates
            .entries()
            .map(|(predicate, objects)| (predicate, objects.as_slice()))
    }

    /// Returns the objects of `predicate`.
    pub fn objects(&self, predicate: &ConstraintElement) -> Option<&[ConstraintElement]> {
        self.predicates.get(predicate).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

/// Constraints of one model, grouped by subject and predicate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SubjectGroups {
    subjects: OrderedGroups<ConstraintElement, PredicateGroups>,
}

impl SubjectGroups {
    fn push(&mut self, constraint: &Constraint) {
        self.subjects
            .get_or_insert_with(constraint.subject().clone(), PredicateGroups::default)
            .predicates
            .get_or_insert_with(constraint.predicate().clone(), Vec::new)
            .push(constraint.object().clone());
    }

    /// Iterates over the subjects in order of first occurrence.
    pub fn subjects(&self) -> impl Iterator<Item = (&ConstraintElement, &PredicateGroups)> {
        self.subjects.entries()
    }

    pub fn get(&self, subject: &ConstraintElement) -> Option<&PredicateGroups> {
        self.subjects.get(subject)
    }

    /// The number of constraints in this group.
    pub fn constraint_count(&self) -> usize {
        self.subjects()
            .flat_map(|(_, predicates)| predicates.predicates())
            .map(|(_, objects)| objects.len())
            .sum()
    }

    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }
}

/// All constraints of a single model that a [ConjunctiveTransformer](crate::ConjunctiveTransformer)
/// has collected from a conjunction.
///
/// Constraints with a variable subject and constraints with a fixed subject are kept in separate
/// groups.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelGrouping {
    model: NamedNode,
    by_variable_subject: SubjectGroups,
    by_fixed_subject: SubjectGroups,
}

impl ModelGrouping {
    /// Creates an empty grouping for `model`.
    pub fn new(model: NamedNode) -> Self {
        Self {
            model,
            by_variable_subject: SubjectGroups::default(),
            by_fixed_subject: SubjectGroups::default(),
        }
    }

    /// Adds `constraint` to the grouping. The model of the constraint is not checked.
    pub fn push(&mut self, constraint: &Constraint) {
        if constraint.subject().is_variable() {
            self.by_variable_subject.push(constraint);
        } else {
            self.by_fixed_subject.push(constraint);
        }
    }

    pub fn model(&self) -> NamedNodeRef<'_> {
        self.model.as_ref()
    }

    pub fn by_variable_subject(&self) -> &SubjectGroups {
        &self.by_variable_subject
    }

    pub fn by_fixed_subject(&self) -> &SubjectGroups {
        &self.by_fixed_subject
    }

    pub fn is_empty(&self) -> bool {
        self.by_variable_subject.is_empty() && self.by_fixed_subject.is_empty()
    }

    /// Recreates the atomic constraints of this grouping. Constraints with a variable subject come
    /// first.
    pub fn constraints(&self) -> impl Iterator<Item = Constraint> + '_ {
        self.by_variable_subject
            .subjects()
            .chain(self.by_fixed_subject.subjects())
            .flat_map(move |(subject, predicates)| {
                predicates.predicates().flat_map(move |(predicate, objects)| {
                    objects.iter().map(move |object| {
                        Constraint::new(
                            subject.clone(),
                            predicate.clone(),
                            object.clone(),
                            self.model.clone(),
                        )
                    })
                })
            })
    }
}
