//! A collection of samples for one item at one timestep.
//!
//! A [`SeriesBuilder`] accumulates pages in whatever order the API hands them
//! out. [`SeriesBuilder::finish`] is the only way to obtain a [`Series`], and
//! it guarantees ascending, duplicate-free timestamps.

use indexmap::IndexMap;

use crate::models::{item::ItemId, sample::Sample, timestep::Timestep};

/// Ordered, read-only set of samples for a single item.
///
/// Timestamps are strictly increasing, so lookups by timestamp are a binary
/// search.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    item_id: ItemId,
    timestep: Timestep,
    samples: Vec<Sample>,
}

impl Series {
    /// Builds a series from samples in any order.
    pub fn from_samples(
        item_id: ItemId,
        timestep: Timestep,
        samples: impl IntoIterator<Item = Sample>,
    ) -> Self {
        let mut builder = SeriesBuilder::new(item_id, timestep);
        builder.extend(samples);
        builder.finish()
    }

    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    pub fn timestep(&self) -> Timestep {
        self.timestep
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    pub fn first(&self) -> Option<&Sample> {
        self.samples.first()
    }

    pub fn last(&self) -> Option<&Sample> {
        self.samples.last()
    }

    /// The sample whose bucket starts exactly at `timestamp`.
    pub fn get(&self, timestamp: i64) -> Option<&Sample> {
        self.samples
            .binary_search_by_key(&timestamp, |s| s.timestamp)
            .ok()
            .map(|idx| &self.samples[idx])
    }

    pub fn timestamps(&self) -> impl Iterator<Item = i64> + '_ {
        self.samples.iter().map(|s| s.timestamp)
    }
}

impl<'a> IntoIterator for &'a Series {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

/// In-progress series, exclusively owned by whoever is assembling it.
#[derive(Debug)]
pub struct SeriesBuilder {
    item_id: ItemId,
    timestep: Timestep,
    // first copy of each timestamp wins; pages may overlap at their edges
    by_timestamp: IndexMap<i64, Sample>,
}

impl SeriesBuilder {
    pub fn new(item_id: ItemId, timestep: Timestep) -> Self {
        Self {
            item_id,
            timestep,
            by_timestamp: IndexMap::new(),
        }
    }

    /// Appends one page. Returns how many of its samples were new.
    pub fn push_page(&mut self, page: Vec<Sample>) -> usize {
        let before = self.by_timestamp.len();
        self.extend(page);
        self.by_timestamp.len() - before
    }

    /// Number of distinct buckets collected so far.
    pub fn len(&self) -> usize {
        self.by_timestamp.len()
    }

    pub fn finish(mut self) -> Series {
        self.by_timestamp.sort_keys();
        Series {
            item_id: self.item_id,
            timestep: self.timestep,
            samples: self.by_timestamp.into_values().collect(),
        }
    }
}

impl Extend<Sample> for SeriesBuilder {
    fn extend<T: IntoIterator<Item = Sample>>(&mut self, iter: T) {
        for sample in iter {
            self.by_timestamp.entry(sample.timestamp).or_insert(sample);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> ItemId {
        ItemId::from_u32(565).unwrap()
    }

    fn priced(ts: i64, high: f64) -> Sample {
        Sample {
            avg_high_price: Some(high),
            ..Sample::empty(ts)
        }
    }

    #[test]
    fn finish_sorts_backward_pages_ascending() {
        let mut b = SeriesBuilder::new(item(), Timestep::FiveMinutes);
        b.push_page(vec![priced(900, 4.0), priced(600, 3.0)]);
        b.push_page(vec![priced(300, 2.0), priced(0, 1.0)]);
        let series = b.finish();
        assert_eq!(series.timestamps().collect::<Vec<_>>(), vec![0, 300, 600, 900]);
    }

    #[test]
    fn overlapping_page_edges_keep_first_copy() {
        let mut b = SeriesBuilder::new(item(), Timestep::FiveMinutes);
        assert_eq!(b.push_page(vec![priced(0, 1.0), priced(300, 2.0)]), 2);
        assert_eq!(b.push_page(vec![priced(300, 99.0), priced(600, 3.0)]), 1);
        assert_eq!(b.len(), 3);

        let series = b.finish();
        assert_eq!(series.get(300).unwrap().avg_high_price, Some(2.0));
    }

    #[test]
    fn lookup_by_timestamp() {
        let series = Series::from_samples(
            item(),
            Timestep::FiveMinutes,
            vec![priced(600, 3.0), priced(0, 1.0)],
        );
        assert_eq!(series.get(600).unwrap().avg_high_price, Some(3.0));
        assert!(series.get(300).is_none());
        assert_eq!(series.first().unwrap().timestamp, 0);
        assert_eq!(series.last().unwrap().timestamp, 600);
    }
}
