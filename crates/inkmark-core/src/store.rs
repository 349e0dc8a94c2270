//! Ordered annotation sequence.

use crate::annotation::{Annotation, AnnotationPatch};

/// Append/remove-only ordered sequence of annotations.
///
/// Order is z-order: later entries are drawn on top. Indices handed out by
/// [`AnnotationStore::append`] shift down when an earlier entry is removed;
/// holders of an index are responsible for discarding it in that case.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationStore {
    annotations: Vec<Annotation>,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an annotation on top and return its index.
    pub fn append(&mut self, annotation: Annotation) -> usize {
        self.annotations.push(annotation);
        self.annotations.len() - 1
    }

    /// Remove the annotation at `index`. Later entries shift down by one.
    pub fn remove_at(&mut self, index: usize) -> Option<Annotation> {
        (index < self.annotations.len()).then(|| self.annotations.remove(index))
    }

    /// Remove every annotation.
    pub fn remove_all(&mut self) {
        self.annotations.clear();
    }

    /// Merge `patch` into the annotation at `index`.
    ///
    /// Returns false when the index is out of range or names a freehand
    /// snapshot, which is never edited.
    pub fn update_at(&mut self, index: usize, patch: AnnotationPatch) -> bool {
        self.annotations
            .get_mut(index)
            .is_some_and(|annotation| annotation.apply(&patch))
    }

    /// Remove and return the last annotation. No-op on an empty store.
    pub fn undo(&mut self) -> Option<Annotation> {
        self.annotations.pop()
    }

    pub fn get(&self, index: usize) -> Option<&Annotation> {
        self.annotations.get(index)
    }

    pub fn last(&self) -> Option<&Annotation> {
        self.annotations.last()
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    /// Annotations in z-order (back to front).
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Annotation> {
        self.annotations.iter()
    }

    pub fn as_slice(&self) -> &[Annotation] {
        &self.annotations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{PaletteColor, ShapeKind, Snapshot};
    use kurbo::Point;

    fn line(x: f64) -> Annotation {
        Annotation::shape(
            ShapeKind::Line,
            Point::new(x, 0.0),
            Point::new(x, 10.0),
            PaletteColor::Black,
        )
    }

    #[test]
    fn test_append_returns_index() {
        let mut store = AnnotationStore::new();
        assert_eq!(store.append(line(1.0)), 0);
        assert_eq!(store.append(line(2.0)), 1);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_remove_at_shifts_later_entries() {
        let mut store = AnnotationStore::new();
        store.append(line(1.0));
        store.append(line(2.0));
        store.append(line(3.0));

        assert_eq!(store.remove_at(0), Some(line(1.0)));
        assert_eq!(store.get(0), Some(&line(2.0)));
        assert_eq!(store.get(1), Some(&line(3.0)));
        assert!(store.remove_at(5).is_none());
    }

    #[test]
    fn test_undo_on_empty_store_is_noop() {
        let mut store = AnnotationStore::new();
        assert!(store.undo().is_none());
        assert!(store.undo().is_none());
        assert_eq!(store, AnnotationStore::new());
    }

    #[test]
    fn test_undo_removes_last_only() {
        let mut store = AnnotationStore::new();
        store.append(line(1.0));
        store.append(line(2.0));
        assert_eq!(store.undo(), Some(line(2.0)));
        assert_eq!(store.as_slice(), &[line(1.0)]);
    }

    #[test]
    fn test_update_at() {
        let mut store = AnnotationStore::new();
        store.append(line(1.0));
        store.append(Annotation::FreehandSnapshot(Snapshot::new(vec![0u8])));

        assert!(store.update_at(0, AnnotationPatch::color(PaletteColor::Blue)));
        assert_eq!(store.get(0).and_then(Annotation::color), Some(PaletteColor::Blue));

        assert!(!store.update_at(1, AnnotationPatch::color(PaletteColor::Blue)));
        assert!(!store.update_at(7, AnnotationPatch::color(PaletteColor::Blue)));
    }

    #[test]
    fn test_remove_all() {
        let mut store = AnnotationStore::new();
        store.append(line(1.0));
        store.remove_all();
        assert!(store.is_empty());
        assert!(store.last().is_none());
    }
}
