// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bookkeeping shared by the incremental hit testers.

use alloc::vec::Vec;

use hashbrown::HashMap;
use understory_ink::{CollectionId, InkError, StrokeCollection, StrokeId, SubscriptionId};

use crate::info::StrokeInfo;

/// A cache entry while queued changes are replayed.
enum Slot {
    Cached(StrokeInfo),
    Added(StrokeId),
}

impl Slot {
    fn id(&self) -> StrokeId {
        match self {
            Self::Cached(info) => info.id(),
            Self::Added(id) => *id,
        }
    }
}

/// A [`StrokeInfo`] list kept parallel to a collection.
///
/// The list follows the collection through its change queue. Each change is
/// replayed in order: removals are dropped by identity, then additions are
/// inserted at the position the change reports. If the result no longer
/// lines up with the collection the list is rebuilt from scratch.
#[derive(Debug)]
pub(crate) struct StrokeInfoCache {
    collection: CollectionId,
    subscription: Option<SubscriptionId>,
    infos: Vec<StrokeInfo>,
}

impl StrokeInfoCache {
    pub(crate) fn new(collection: &mut StrokeCollection) -> Self {
        let subscription = collection.subscribe();
        Self {
            collection: collection.id(),
            subscription: Some(subscription),
            infos: collection.iter().map(StrokeInfo::new).collect(),
        }
    }

    pub(crate) fn is_valid(&self) -> bool {
        self.subscription.is_some()
    }

    pub(crate) fn infos(&self) -> &[StrokeInfo] {
        &self.infos
    }

    /// Validates a batch and brings the cache up to date with `collection`.
    pub(crate) fn begin_batch(
        &mut self,
        collection: &StrokeCollection,
        batch_len: usize,
    ) -> Result<(), InkError> {
        let subscription = self.subscription.ok_or(InkError::HitTesterEnded)?;
        if collection.id() != self.collection {
            return Err(InkError::ForeignCollection);
        }
        if batch_len == 0 {
            return Err(InkError::EmptyPoints);
        }
        self.sync(collection, subscription);
        Ok(())
    }

    /// Cached entries in collection order.
    ///
    /// Lines up with the collection right after [`begin_batch`](Self::begin_batch).
    pub(crate) fn entries_mut(&mut self) -> &mut [StrokeInfo] {
        &mut self.infos
    }

    fn sync(&mut self, collection: &StrokeCollection, subscription: SubscriptionId) {
        let changes = collection.take_changes(subscription);
        if changes.is_empty() {
            if self.in_step(collection) {
                for (info, stroke) in self.infos.iter_mut().zip(collection) {
                    info.refresh(stroke);
                }
                return;
            }
        } else {
            let mut slots: Vec<Slot> = core::mem::take(&mut self.infos)
                .into_iter()
                .map(Slot::Cached)
                .collect();
            for change in changes {
                if !change.removed.is_empty() {
                    slots.retain(|slot| !change.removed.contains(&slot.id()));
                }
                let at = change.index.unwrap_or(slots.len()).min(slots.len());
                let tail = slots.split_off(at);
                slots.extend(change.added.iter().map(|&id| Slot::Added(id)));
                slots.extend(tail);
            }
            let replayed = slots.len() == collection.len()
                && slots
                    .iter()
                    .zip(collection)
                    .all(|(slot, stroke)| slot.id() == stroke.id());
            if replayed {
                self.infos = slots
                    .into_iter()
                    .zip(collection)
                    .map(|(slot, stroke)| match slot {
                        Slot::Cached(mut info) => {
                            info.refresh(stroke);
                            info
                        }
                        Slot::Added(_) => StrokeInfo::new(stroke),
                    })
                    .collect();
                return;
            }
            self.infos = slots
                .into_iter()
                .filter_map(|slot| match slot {
                    Slot::Cached(info) => Some(info),
                    Slot::Added(_) => None,
                })
                .collect();
        }

        log::debug!(
            "hit tester cache out of step with collection {:?}, rebuilding {} entries",
            self.collection,
            collection.len()
        );
        self.rebuild(collection);
    }

    fn in_step(&self, collection: &StrokeCollection) -> bool {
        self.infos.len() == collection.len()
            && self
                .infos
                .iter()
                .zip(collection)
                .all(|(info, stroke)| info.id() == stroke.id())
    }

    /// Retakes every entry from `collection`.
    ///
    /// Strokes that were cached before keep their hit state, so callers see
    /// no flips for them. Every entry comes back dirty.
    fn rebuild(&mut self, collection: &StrokeCollection) {
        let was_hit: HashMap<StrokeId, bool> = self
            .infos
            .iter()
            .map(|info| (info.id(), info.is_hit))
            .collect();
        self.infos = collection
            .iter()
            .map(|stroke| {
                let mut info = StrokeInfo::new(stroke);
                info.is_hit = was_hit.get(&stroke.id()).copied().unwrap_or(false);
                info
            })
            .collect();
    }

    /// Detaches from `collection` and drops the cache.
    pub(crate) fn end(&mut self, collection: &mut StrokeCollection) -> Result<(), InkError> {
        let subscription = self.subscription.ok_or(InkError::HitTesterEnded)?;
        if collection.id() != self.collection {
            return Err(InkError::ForeignCollection);
        }
        collection.unsubscribe(subscription);
        self.subscription = None;
        self.infos = Vec::new();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use understory_ink::{Stroke, stylus_points_from};

    fn stroke(y: f64) -> Stroke {
        Stroke::new(stylus_points_from([(0.0, y), (10.0, y)])).unwrap()
    }

    fn ids(cache: &StrokeInfoCache) -> Vec<StrokeId> {
        cache.infos().iter().map(StrokeInfo::id).collect()
    }

    #[test]
    fn follows_inserts_and_removals() {
        let mut c = StrokeCollection::from_strokes(vec![stroke(0.0), stroke(1.0)]).unwrap();
        let mut cache = StrokeInfoCache::new(&mut c);
        assert_eq!(ids(&cache), c.ids());

        c.insert(1, stroke(2.0)).unwrap();
        let first = c.ids()[0];
        c.remove(first).unwrap();
        c.push(stroke(3.0)).unwrap();
        cache.begin_batch(&c, 1).unwrap();
        assert_eq!(ids(&cache), c.ids());
    }

    #[test]
    fn follows_replacement_and_clear() {
        let mut c = StrokeCollection::from_strokes(vec![stroke(0.0), stroke(1.0)]).unwrap();
        let mut cache = StrokeInfoCache::new(&mut c);
        let second = c.ids()[1];
        c.replace(second, vec![stroke(5.0), stroke(6.0)]).unwrap();
        cache.begin_batch(&c, 1).unwrap();
        assert_eq!(ids(&cache), c.ids());

        c.clear();
        c.push(stroke(7.0)).unwrap();
        cache.begin_batch(&c, 1).unwrap();
        assert_eq!(ids(&cache), c.ids());
    }

    #[test]
    fn replay_keeps_entries_of_untouched_strokes() {
        let a = stroke(0.0);
        let a_id = a.id();
        let mut c = StrokeCollection::from_strokes(vec![a, stroke(1.0)]).unwrap();
        let mut cache = StrokeInfoCache::new(&mut c);
        cache.infos[1].is_hit = true;
        cache.infos[1].dirty = false;

        c.push(stroke(2.0)).unwrap();
        let a = c.remove(a_id).unwrap();
        c.push(a).unwrap();
        cache.begin_batch(&c, 1).unwrap();
        assert_eq!(ids(&cache), c.ids());
        assert!(cache.infos()[0].is_hit());
        assert!(!cache.infos()[0].is_dirty());
        assert!(cache.infos()[2].is_dirty());
    }

    #[test]
    fn rebuild_keeps_hit_state() {
        let mut c = StrokeCollection::from_strokes(vec![stroke(0.0), stroke(1.0)]).unwrap();
        let mut cache = StrokeInfoCache::new(&mut c);
        for info in &mut cache.infos {
            info.dirty = false;
        }
        cache.infos[1].is_hit = true;
        let hit = cache.infos[1].id();
        cache.infos.swap(0, 1);

        cache.begin_batch(&c, 1).unwrap();
        assert_eq!(ids(&cache), c.ids());
        assert!(cache.infos().iter().all(StrokeInfo::is_dirty));
        let still_hit: Vec<StrokeId> = cache
            .infos()
            .iter()
            .filter(|info| info.is_hit())
            .map(StrokeInfo::id)
            .collect();
        assert_eq!(still_hit, [hit]);
    }

    #[test]
    fn batch_preconditions() {
        let mut c = StrokeCollection::from_strokes(vec![stroke(0.0)]).unwrap();
        let mut other = StrokeCollection::new();
        let mut cache = StrokeInfoCache::new(&mut c);
        assert_eq!(cache.begin_batch(&c, 0), Err(InkError::EmptyPoints));
        assert_eq!(cache.begin_batch(&other, 1), Err(InkError::ForeignCollection));
        assert_eq!(cache.end(&mut other), Err(InkError::ForeignCollection));

        cache.end(&mut c).unwrap();
        assert!(!cache.is_valid());
        assert_eq!(cache.begin_batch(&c, 1), Err(InkError::HitTesterEnded));
        assert_eq!(cache.end(&mut c), Err(InkError::HitTesterEnded));
    }
}
