// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`StrokeCollection`]: an ordered, identity-unique set of strokes.
//!
//! ## Change notifications
//!
//! Every successful membership change produces exactly one
//! [`StrokeCollectionChanged`] record. Observers register with
//! [`StrokeCollection::subscribe`] and pull their records with
//! [`StrokeCollection::take_changes`]; each subscriber has its own queue, so
//! draining one never hides changes from another. Subscribers detach with
//! [`StrokeCollection::unsubscribe`].
//!
//! Mutations of a stroke in place (through [`StrokeCollection::stroke_mut`])
//! are not membership changes; they are visible through
//! [`Stroke::revision`].
//!
//! ## Geometry operations
//!
//! Collection-wide clip and erase operations compute every stroke's result
//! first and then apply the replacements, one change record per affected
//! stroke.

use alloc::vec::Vec;
use core::cell::RefCell;
use core::sync::atomic::{AtomicU64, Ordering};

use hashbrown::HashSet;
use kurbo::{Affine, Point, Rect};

use crate::InkError;
use crate::erasing::ErasingStroke;
use crate::findices::{StrokeFIndices, hit_segments, in_segments};
use crate::lasso::Lasso;
use crate::shape::StylusShape;
use crate::stroke::{Stroke, StrokeId, lasso_from, selection_lasso_from};
use crate::util::{is_invertible, rects_overlap};
use crate::weights::check_percent;

static NEXT_COLLECTION_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a [`StrokeCollection`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CollectionId(u64);

/// Handle for one change subscriber.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// One membership change.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StrokeCollectionChanged {
    /// Strokes that joined the collection.
    pub added: Vec<StrokeId>,
    /// Strokes that left the collection.
    pub removed: Vec<StrokeId>,
    /// Position of the change, when it happened at one place.
    pub index: Option<usize>,
}

#[derive(Debug)]
struct Subscriber {
    id: SubscriptionId,
    pending: Vec<StrokeCollectionChanged>,
}

/// Ordered strokes with identity-based set semantics.
#[derive(Debug)]
pub struct StrokeCollection {
    id: CollectionId,
    strokes: Vec<Stroke>,
    members: HashSet<StrokeId>,
    subscribers: RefCell<Vec<Subscriber>>,
    next_subscription: u64,
}

impl Default for StrokeCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for StrokeCollection {
    /// Clones the strokes under a new collection identity without subscribers.
    ///
    /// Like [`Stroke::clone`], the copy is a snapshot: its strokes keep their
    /// [`StrokeId`]s, so the same identity is a member of both collections.
    /// Use [`StrokeCollection::duplicate`] for strokes with fresh identities.
    fn clone(&self) -> Self {
        Self {
            id: CollectionId::next(),
            strokes: self.strokes.clone(),
            members: self.members.clone(),
            subscribers: RefCell::new(Vec::new()),
            next_subscription: 0,
        }
    }
}

impl CollectionId {
    fn next() -> Self {
        Self(NEXT_COLLECTION_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl StrokeCollection {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: CollectionId::next(),
            strokes: Vec::new(),
            members: HashSet::new(),
            subscribers: RefCell::new(Vec::new()),
            next_subscription: 0,
        }
    }

    /// Creates a collection holding `strokes`, which must be distinct.
    pub fn from_strokes(strokes: Vec<Stroke>) -> Result<Self, InkError> {
        let mut collection = Self::new();
        collection.extend_strokes(strokes)?;
        Ok(collection)
    }

    /// Copies every stroke under a fresh identity into a new collection.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        let strokes: Vec<Stroke> = self.strokes.iter().map(Stroke::duplicate).collect();
        let members = strokes.iter().map(Stroke::id).collect();
        Self {
            strokes,
            members,
            ..Self::new()
        }
    }

    /// Identity of this collection.
    #[must_use]
    pub fn id(&self) -> CollectionId {
        self.id
    }

    /// Number of strokes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    /// Returns `true` if the collection holds no strokes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    /// Strokes in order.
    pub fn iter(&self) -> core::slice::Iter<'_, Stroke> {
        self.strokes.iter()
    }

    /// Stroke at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Stroke> {
        self.strokes.get(index)
    }

    /// Stroke with identity `id`.
    #[must_use]
    pub fn get_by_id(&self, id: StrokeId) -> Option<&Stroke> {
        self.index_of(id).map(|i| &self.strokes[i])
    }

    /// Mutable access to the stroke with identity `id`.
    pub fn stroke_mut(&mut self, id: StrokeId) -> Option<&mut Stroke> {
        let index = self.index_of(id)?;
        Some(&mut self.strokes[index])
    }

    /// Position of the stroke with identity `id`.
    #[must_use]
    pub fn index_of(&self, id: StrokeId) -> Option<usize> {
        if !self.members.contains(&id) {
            return None;
        }
        self.strokes.iter().position(|s| s.id() == id)
    }

    /// Returns `true` if a stroke with identity `id` is a member.
    #[must_use]
    pub fn contains(&self, id: StrokeId) -> bool {
        self.members.contains(&id)
    }

    /// Identities of all strokes, in order.
    #[must_use]
    pub fn ids(&self) -> Vec<StrokeId> {
        self.strokes.iter().map(Stroke::id).collect()
    }

    /// Union of all stroke bounds, or `None` when empty.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        self.strokes
            .iter()
            .map(Stroke::bounds)
            .reduce(|a, b| a.union(b))
    }

    // --- membership ---

    /// Appends `stroke`.
    pub fn push(&mut self, stroke: Stroke) -> Result<(), InkError> {
        self.insert(self.strokes.len(), stroke)
    }

    /// Inserts `stroke` at `index`.
    pub fn insert(&mut self, index: usize, stroke: Stroke) -> Result<(), InkError> {
        if index > self.strokes.len() {
            return Err(InkError::IndexOutOfRange(index));
        }
        let id = stroke.id();
        if !self.members.insert(id) {
            return Err(InkError::DuplicateStroke(id));
        }
        self.strokes.insert(index, stroke);
        self.notify(StrokeCollectionChanged {
            added: alloc::vec![id],
            removed: Vec::new(),
            index: Some(index),
        });
        Ok(())
    }

    /// Appends all `strokes`, or none of them if any is already present or
    /// repeated.
    pub fn extend_strokes(
        &mut self,
        strokes: impl IntoIterator<Item = Stroke>,
    ) -> Result<(), InkError> {
        let strokes: Vec<Stroke> = strokes.into_iter().collect();
        self.check_new(&strokes, None)?;
        if strokes.is_empty() {
            return Ok(());
        }
        let index = self.strokes.len();
        let added: Vec<StrokeId> = strokes.iter().map(Stroke::id).collect();
        self.members.extend(added.iter().copied());
        self.strokes.extend(strokes);
        self.notify(StrokeCollectionChanged {
            added,
            removed: Vec::new(),
            index: Some(index),
        });
        Ok(())
    }

    /// Rejects strokes that are already members (other than `replacing`) or
    /// repeated within `strokes`.
    fn check_new(&self, strokes: &[Stroke], replacing: Option<StrokeId>) -> Result<(), InkError> {
        let mut seen = HashSet::with_capacity(strokes.len());
        for stroke in strokes {
            let id = stroke.id();
            let member = self.members.contains(&id) && Some(id) != replacing;
            if member || !seen.insert(id) {
                return Err(InkError::DuplicateStroke(id));
            }
        }
        Ok(())
    }

    /// Removes and returns the stroke with identity `id`.
    pub fn remove(&mut self, id: StrokeId) -> Result<Stroke, InkError> {
        let index = self.index_of(id).ok_or(InkError::StrokeNotFound(id))?;
        self.members.remove(&id);
        let stroke = self.strokes.remove(index);
        self.notify(StrokeCollectionChanged {
            added: Vec::new(),
            removed: alloc::vec![id],
            index: Some(index),
        });
        Ok(stroke)
    }

    /// Removes all strokes in `ids`, or none of them if any is missing.
    pub fn remove_strokes(&mut self, ids: &[StrokeId]) -> Result<Vec<Stroke>, InkError> {
        let mut targets = HashSet::with_capacity(ids.len());
        for &id in ids {
            if !self.members.contains(&id) {
                return Err(InkError::StrokeNotFound(id));
            }
            targets.insert(id);
        }
        if targets.is_empty() {
            return Ok(Vec::new());
        }
        let (removed, kept): (Vec<Stroke>, Vec<Stroke>) = core::mem::take(&mut self.strokes)
            .into_iter()
            .partition(|s| targets.contains(&s.id()));
        self.strokes = kept;
        for stroke in &removed {
            self.members.remove(&stroke.id());
        }
        self.notify(StrokeCollectionChanged {
            added: Vec::new(),
            removed: removed.iter().map(Stroke::id).collect(),
            index: None,
        });
        Ok(removed)
    }

    /// Replaces the stroke `id` with `replacement`, in place.
    ///
    /// `replacement` may be empty, which removes the stroke. Returns the
    /// replaced stroke.
    pub fn replace(&mut self, id: StrokeId, replacement: Vec<Stroke>) -> Result<Stroke, InkError> {
        let index = self.index_of(id).ok_or(InkError::StrokeNotFound(id))?;
        self.check_new(&replacement, Some(id))?;
        self.members.remove(&id);
        let added: Vec<StrokeId> = replacement.iter().map(Stroke::id).collect();
        self.members.extend(added.iter().copied());
        let old = self
            .strokes
            .splice(index..=index, replacement)
            .next()
            .ok_or(InkError::StrokeNotFound(id))?;
        self.notify(StrokeCollectionChanged {
            added,
            removed: alloc::vec![id],
            index: Some(index),
        });
        Ok(old)
    }

    /// Removes every stroke.
    pub fn clear(&mut self) {
        if self.strokes.is_empty() {
            return;
        }
        let removed = self.ids();
        self.strokes.clear();
        self.members.clear();
        self.notify(StrokeCollectionChanged {
            added: Vec::new(),
            removed,
            index: None,
        });
    }

    // --- observers ---

    /// Registers a change subscriber with an empty queue.
    pub fn subscribe(&mut self) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.get_mut().push(Subscriber {
            id,
            pending: Vec::new(),
        });
        id
    }

    /// Detaches a subscriber and drops its queue.
    ///
    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let subscribers = self.subscribers.get_mut();
        let before = subscribers.len();
        subscribers.retain(|s| s.id != id);
        subscribers.len() != before
    }

    /// Returns `true` if `id` is subscribed.
    #[must_use]
    pub fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.subscribers.borrow().iter().any(|s| s.id == id)
    }

    /// Drains the changes queued for subscriber `id`, oldest first.
    ///
    /// Unknown subscribers get nothing.
    pub fn take_changes(&self, id: SubscriptionId) -> Vec<StrokeCollectionChanged> {
        self.subscribers
            .borrow_mut()
            .iter_mut()
            .find(|s| s.id == id)
            .map(|s| core::mem::take(&mut s.pending))
            .unwrap_or_default()
    }

    fn notify(&mut self, change: StrokeCollectionChanged) {
        for subscriber in self.subscribers.get_mut() {
            subscriber.pending.push(change.clone());
        }
    }

    // --- geometry ---

    /// Transforms every stroke.
    ///
    /// The transform is validated once, before any stroke changes.
    pub fn transform(&mut self, transform: Affine, apply_to_tip: bool) -> Result<(), InkError> {
        if !is_invertible(&transform) {
            return Err(InkError::NonInvertibleTransform);
        }
        for stroke in &mut self.strokes {
            stroke.transform(transform, apply_to_tip)?;
        }
        Ok(())
    }

    /// Strokes touched by a [`TAP_HIT_POINT_SIZE`](crate::TAP_HIT_POINT_SIZE) tap at `point`.
    #[must_use]
    pub fn hit_test_point(&self, point: Point) -> Vec<StrokeId> {
        self.strokes
            .iter()
            .filter(|s| s.hit_test_point(point))
            .map(Stroke::id)
            .collect()
    }

    /// Strokes touched by a circular tap of `diameter` at `point`.
    pub fn hit_test_point_with_diameter(
        &self,
        point: Point,
        diameter: f64,
    ) -> Result<Vec<StrokeId>, InkError> {
        let mut hits = Vec::new();
        for stroke in &self.strokes {
            if stroke.hit_test_point_with_diameter(point, diameter)? {
                hits.push(stroke.id());
            }
        }
        Ok(hits)
    }

    /// Strokes with at least `percent` of their weight inside the lasso
    /// through `lasso_points`.
    ///
    /// See [`Stroke::hit_test_lasso`] for how the lasso is built.
    pub fn hit_test_lasso(
        &self,
        lasso_points: &[Point],
        percent: u32,
    ) -> Result<Vec<StrokeId>, InkError> {
        check_percent(percent)?;
        let lasso = selection_lasso_from(lasso_points)?;
        let mut hits = Vec::new();
        for stroke in &self.strokes {
            if stroke.hit_test_lasso_region(&lasso, percent)? {
                hits.push(stroke.id());
            }
        }
        Ok(hits)
    }

    /// Strokes with at least `percent` of their weight inside `rect`.
    pub fn hit_test_rect(&self, rect: Rect, percent: u32) -> Result<Vec<StrokeId>, InkError> {
        check_percent(percent)?;
        let mut hits = Vec::new();
        for stroke in &self.strokes {
            if stroke.hit_test_rect(rect, percent)? {
                hits.push(stroke.id());
            }
        }
        Ok(hits)
    }

    /// Strokes touched by `shape` swept along `path`.
    pub fn hit_test_path(
        &self,
        path: &[Point],
        shape: &StylusShape,
    ) -> Result<Vec<StrokeId>, InkError> {
        if path.is_empty() {
            return Err(InkError::EmptyPoints);
        }
        let eraser = ErasingStroke::new(shape, path.iter().copied());
        let Some(bounds) = eraser.bounds() else {
            return Ok(Vec::new());
        };
        Ok(self
            .strokes
            .iter()
            .filter(|s| rects_overlap(bounds, s.bounds()) && eraser.hit_test(s.nodes()))
            .map(Stroke::id)
            .collect())
    }

    /// Keeps only the parts of strokes inside the lasso through `lasso_points`.
    pub fn clip_lasso(&mut self, lasso_points: &[Point]) -> Result<(), InkError> {
        let lasso = lasso_from(lasso_points)?;
        self.apply_fragments(|s| Cut::Clip(in_segments(&s.lasso_intersections(&lasso))))
    }

    /// Keeps only the parts of strokes inside `rect`.
    pub fn clip_rect(&mut self, rect: Rect) -> Result<(), InkError> {
        let lasso = Lasso::from_rect(rect);
        self.apply_fragments(|s| Cut::Clip(in_segments(&s.lasso_intersections(&lasso))))
    }

    /// Removes the parts of strokes inside the lasso through `lasso_points`.
    pub fn erase_lasso(&mut self, lasso_points: &[Point]) -> Result<(), InkError> {
        let lasso = lasso_from(lasso_points)?;
        self.apply_fragments(|s| Cut::Erase(in_segments(&s.lasso_intersections(&lasso))))
    }

    /// Removes the parts of strokes inside `rect`.
    pub fn erase_rect(&mut self, rect: Rect) -> Result<(), InkError> {
        let lasso = Lasso::from_rect(rect);
        self.apply_fragments(|s| Cut::Erase(in_segments(&s.lasso_intersections(&lasso))))
    }

    /// Removes the parts of strokes covered by `shape` swept along `path`.
    pub fn erase_path(&mut self, path: &[Point], shape: &StylusShape) -> Result<(), InkError> {
        if path.is_empty() {
            return Err(InkError::EmptyPoints);
        }
        let eraser = ErasingStroke::new(shape, path.iter().copied());
        self.apply_fragments(|s| Cut::Erase(hit_segments(&s.erase_test(&eraser))))
    }

    /// Computes every stroke's cut first, then replaces the affected strokes.
    fn apply_fragments(&mut self, mut cut: impl FnMut(&Stroke) -> Cut) -> Result<(), InkError> {
        let mut replacements: Vec<(StrokeId, Vec<Stroke>)> = Vec::new();
        for stroke in &self.strokes {
            let fragments = match cut(stroke) {
                Cut::Clip(ranges) => {
                    if matches!(ranges.as_slice(), [only] if only.is_full()) {
                        continue;
                    }
                    stroke.clip_at(&ranges)
                }
                Cut::Erase(ranges) => {
                    if ranges.is_empty() {
                        continue;
                    }
                    stroke.erase_at(&ranges)
                }
            };
            replacements.push((stroke.id(), fragments));
        }
        for (id, fragments) in replacements {
            self.replace(id, fragments)?;
        }
        Ok(())
    }
}

/// Ranges to keep (clip) or drop (erase) for one stroke.
enum Cut {
    Clip(Vec<StrokeFIndices>),
    Erase(Vec<StrokeFIndices>),
}

impl<'a> IntoIterator for &'a StrokeCollection {
    type Item = &'a Stroke;
    type IntoIter = core::slice::Iter<'a, Stroke>;

    fn into_iter(self) -> Self::IntoIter {
        self.strokes.iter()
    }
}
