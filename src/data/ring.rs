//! Fixed-capacity circular history of samples, one ring per series.
//!
//! The ring keeps one slot per visible plot column. Slots start out unset
//! and are filled as records arrive; once the ring has wrapped, every new
//! record overwrites the oldest one.

use crate::error::{Error, Result};

/// Largest number of columns the history can ever hold.
pub const MAX_CAPACITY: usize = 1024;

/// Summary over the live window of a ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Statistics {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    /// Number of set slots the summary was computed from (always > 0).
    pub count: usize,
}

/// Circular array of optional samples.
///
/// `write_index` always points at the newest slot. A fresh ring starts one
/// before slot 0, so the first write lands at index 0.
#[derive(Debug, Clone)]
pub struct SampleRing {
    slots: Vec<Option<f64>>,
    write_index: usize,
    total_written: u64,
    /// Set slots; they always run backwards from `write_index`.
    filled: usize,
}

impl SampleRing {
    /// A zero capacity is bumped to a single slot.
    pub fn new(capacity: usize) -> Result<Self> {
        check_capacity(capacity)?;
        let capacity = capacity.max(1);
        Ok(Self {
            slots: vec![None; capacity],
            write_index: capacity - 1,
            total_written: 0,
            filled: 0,
        })
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn write_index(&self) -> usize {
        self.write_index
    }

    /// Count of records ever accepted, not clamped by capacity.
    #[inline]
    pub fn total_written(&self) -> u64 {
        self.total_written
    }

    /// True once every slot holds a sample, so the next push overwrites one.
    ///
    /// Growing the ring adds unset slots and clears this again.
    pub fn has_wrapped(&self) -> bool {
        self.filled == self.capacity()
    }

    /// Number of set slots. Equals `min(capacity, total_written)` until the
    /// ring is resized.
    pub fn window_len(&self) -> usize {
        self.filled
    }

    pub fn push(&mut self, value: f64) {
        self.write_index = (self.write_index + 1) % self.capacity();
        if self.slots[self.write_index].replace(value).is_none() {
            self.filled += 1;
        }
        self.total_written += 1;
    }

    /// Raw slot access by physical index.
    pub fn slot(&self, index: usize) -> Option<f64> {
        self.slots.get(index).copied().flatten()
    }

    /// Value `offset` records back from the newest one (0 = newest).
    pub fn value_at(&self, offset: usize) -> Option<f64> {
        if offset >= self.window_len() {
            return None;
        }
        let cap = self.capacity();
        let index = (self.write_index + cap - offset) % cap;
        self.slots[index]
    }

    pub fn latest(&self) -> Option<f64> {
        self.value_at(0)
    }

    /// All slots from oldest to newest, including unset ones.
    ///
    /// Yields exactly `capacity` items, which is what the plot walks column
    /// by column.
    pub fn iter_chronological(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        let cap = self.capacity();
        let start = (self.write_index + 1) % cap;
        (0..cap).map(move |i| self.slots[(start + i) % cap])
    }

    /// Min/max/average over the most recent `window_len()` slots.
    ///
    /// Unset slots are skipped. Returns `None` when nothing is set, so no
    /// caller ever divides by zero.
    pub fn statistics(&self) -> Option<Statistics> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut total = 0.0;
        let mut count = 0usize;
        for v in (0..self.window_len()).filter_map(|off| self.value_at(off)) {
            min = min.min(v);
            max = max.max(v);
            total += v;
            count += 1;
        }
        if count == 0 {
            return None;
        }
        Some(Statistics {
            min,
            max,
            avg: total / count as f64,
            count,
        })
    }

    /// Change the number of slots, keeping the newest samples.
    ///
    /// Up to `new_capacity` of the most recent set values survive, in order.
    /// `total_written` is left untouched.
    pub fn resize(&mut self, new_capacity: usize) -> Result<()> {
        check_capacity(new_capacity)?;
        let new_capacity = new_capacity.max(1);
        if new_capacity == self.capacity() {
            return Ok(());
        }
        let mut kept: Vec<f64> = (0..self.window_len())
            .filter_map(|off| self.value_at(off))
            .take(new_capacity)
            .collect();
        kept.reverse();

        let mut slots = vec![None; new_capacity];
        for (slot, v) in slots.iter_mut().zip(kept.iter()) {
            *slot = Some(*v);
        }
        self.write_index = if kept.is_empty() {
            new_capacity - 1
        } else {
            kept.len() - 1
        };
        self.filled = kept.len();
        self.slots = slots;
        Ok(())
    }
}

fn check_capacity(capacity: usize) -> Result<()> {
    if capacity > MAX_CAPACITY {
        return Err(Error::CapacityExceeded {
            requested: capacity,
            limit: MAX_CAPACITY,
        });
    }
    Ok(())
}

/// One or two parallel series sharing a capacity.
#[derive(Debug, Clone)]
pub struct SampleStore {
    series1: SampleRing,
    series2: Option<SampleRing>,
}

/// Selects one of the two series.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Series {
    First,
    Second,
}

impl SampleStore {
    pub fn new(capacity: usize, two_series: bool) -> Result<Self> {
        Ok(Self {
            series1: SampleRing::new(capacity)?,
            series2: if two_series {
                Some(SampleRing::new(capacity)?)
            } else {
                None
            },
        })
    }

    pub fn capacity(&self) -> usize {
        self.series1.capacity()
    }

    pub fn is_two_series(&self) -> bool {
        self.series2.is_some()
    }

    pub fn series(&self, which: Series) -> Option<&SampleRing> {
        match which {
            Series::First => Some(&self.series1),
            Series::Second => self.series2.as_ref(),
        }
    }

    pub fn total_written(&self) -> u64 {
        self.series1.total_written()
    }

    /// Store one record. Negative values are stored as 0.
    ///
    /// `v2` is ignored in single-series mode; in two-series mode a missing
    /// `v2` is stored as 0 so both rings stay in lockstep.
    pub fn record(&mut self, v1: f64, v2: Option<f64>) {
        self.series1.push(clamp_non_negative(v1));
        if let Some(ring) = self.series2.as_mut() {
            ring.push(clamp_non_negative(v2.unwrap_or(0.0)));
        }
    }

    pub fn statistics(&self, which: Series) -> Option<Statistics> {
        self.series(which).and_then(SampleRing::statistics)
    }

    pub fn value_at(&self, which: Series, offset: usize) -> Option<f64> {
        self.series(which).and_then(|r| r.value_at(offset))
    }

    /// Smallest and largest set value across both series' windows.
    pub fn observed_range(&self) -> Option<(f64, f64)> {
        let s1 = self.series1.statistics();
        let s2 = self.series2.as_ref().and_then(SampleRing::statistics);
        match (s1, s2) {
            (Some(a), Some(b)) => Some((a.min.min(b.min), a.max.max(b.max))),
            (Some(a), None) | (None, Some(a)) => Some((a.min, a.max)),
            (None, None) => None,
        }
    }

    pub fn resize(&mut self, capacity: usize) -> Result<()> {
        self.series1.resize(capacity)?;
        if let Some(ring) = self.series2.as_mut() {
            ring.resize(capacity)?;
        }
        Ok(())
    }
}

#[inline]
pub fn clamp_non_negative(v: f64) -> f64 {
    if v < 0.0 {
        0.0
    } else {
        v
    }
}
