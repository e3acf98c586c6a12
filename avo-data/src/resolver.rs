//! Region label -> US state resolution and state-keyed fan-out.

use avo_core::record::Record;
use avo_core::region::{RegionEntry, StateCode, REGION_STATES};
use log::warn;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// How a region label resolves against the table.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize)]
pub enum RegionKind {
    /// Whole-country aggregate (`ALL` only).
    National,
    /// Exactly one real state.
    SingleState,
    /// Two or more real states.
    MultiState,
    /// Not in the table.
    Unknown,
}

/// Records bucketed by state.
///
/// `single_state` holds records of regions covering exactly one state; each
/// such record is in one bucket. `multi_state` holds records of regions
/// covering several states; each such record is repeated, unchanged, in the
/// bucket of every state it covers. Records of unknown or national regions
/// are in neither map.
#[derive(Debug, Clone, Default)]
pub struct FanOut<'a> {
    pub single_state: BTreeMap<StateCode, Vec<&'a Record>>,
    pub multi_state: BTreeMap<StateCode, Vec<&'a Record>>,
    /// Unknown region label -> number of records dropped for it.
    pub unresolved: BTreeMap<String, usize>,
    /// Records dropped because their region is the national aggregate.
    pub national: usize,
}

impl<'a> FanOut<'a> {
    /// `(state, record)` pairs over the single-state buckets, state-ordered.
    pub fn single_state_pairs(&self) -> impl Iterator<Item = (StateCode, &'a Record)> + '_ {
        flatten_buckets(&self.single_state)
    }

    /// `(state, record)` pairs over the multi-state buckets, state-ordered.
    pub fn multi_state_pairs(&self) -> impl Iterator<Item = (StateCode, &'a Record)> + '_ {
        flatten_buckets(&self.multi_state)
    }

    pub fn unresolved_count(&self) -> usize {
        self.unresolved.values().sum()
    }
}

fn flatten_buckets<'m, 'a>(
    buckets: &'m BTreeMap<StateCode, Vec<&'a Record>>,
) -> impl Iterator<Item = (StateCode, &'a Record)> + 'm {
    buckets
        .iter()
        .flat_map(|(state, records)| records.iter().map(move |record| (*state, *record)))
}

/// Lookup over a static region table. Never fails: unknown labels resolve to
/// nothing.
#[derive(Debug, Clone)]
pub struct RegionResolver {
    table: &'static [RegionEntry],
    index: HashMap<&'static str, &'static [StateCode]>,
}

impl Default for RegionResolver {
    fn default() -> Self {
        RegionResolver::new(REGION_STATES)
    }
}

impl RegionResolver {
    pub fn new(table: &'static [RegionEntry]) -> Self {
        let index = table.iter().map(|(label, states)| (*label, *states)).collect();
        RegionResolver { table, index }
    }

    /// Every region label in the table, in table order.
    pub fn labels(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.table.iter().map(|(label, _)| *label)
    }

    /// States covered by a region label, or `None` for an unknown label.
    pub fn states_for(&self, region: &str) -> Option<&'static [StateCode]> {
        self.index.get(region).copied()
    }

    pub fn kind(&self, region: &str) -> RegionKind {
        match self.states_for(region) {
            None => RegionKind::Unknown,
            Some(states) => match states.iter().filter(|s| !s.is_all()).count() {
                0 => RegionKind::National,
                1 => RegionKind::SingleState,
                _ => RegionKind::MultiState,
            },
        }
    }

    /// Sorted, de-duplicated union of the states covered by `regions`.
    /// The `ALL` sentinel and unknown labels contribute nothing.
    pub fn states_for_regions<'r, I>(&self, regions: I) -> Vec<StateCode>
    where
        I: IntoIterator<Item = &'r str>,
    {
        regions
            .into_iter()
            .filter_map(|region| self.states_for(region))
            .flatten()
            .filter(|state| !state.is_all())
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Every region label whose coverage includes `state`, sorted.
    pub fn regions_for_state(&self, state: StateCode) -> Vec<&'static str> {
        let mut regions: Vec<&'static str> = self
            .table
            .iter()
            .filter(|(_, states)| states.contains(&state))
            .map(|(label, _)| *label)
            .collect();
        regions.sort_unstable();
        regions
    }

    /// Region labels of the given kind, sorted.
    pub fn regions_of_kind(&self, kind: RegionKind) -> Vec<&'static str> {
        let mut regions: Vec<&'static str> = self
            .labels()
            .filter(|label| self.kind(label) == kind)
            .collect();
        regions.sort_unstable();
        regions
    }

    /// Bucket records by the states their region covers.
    ///
    /// Unknown labels are counted in [`FanOut::unresolved`] and logged once
    /// per label; they are never an error.
    pub fn fan_out_to_states<'a, I>(&self, records: I) -> FanOut<'a>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let mut fan_out = FanOut::default();
        for record in records {
            let Some(states) = self.states_for(&record.region) else {
                let dropped = fan_out.unresolved.entry(record.region.clone()).or_insert(0);
                if *dropped == 0 {
                    warn!(
                        "[avo] resolver: region '{}' has no state mapping; its records are excluded from state views",
                        record.region
                    );
                }
                *dropped += 1;
                continue;
            };
            let mut covered = states.iter().filter(|s| !s.is_all()).peekable();
            let Some(first) = covered.next() else {
                fan_out.national += 1;
                continue;
            };
            if covered.peek().is_none() {
                fan_out.single_state.entry(*first).or_default().push(record);
            } else {
                fan_out.multi_state.entry(*first).or_default().push(record);
                for state in covered {
                    fan_out.multi_state.entry(*state).or_default().push(record);
                }
            }
        }
        fan_out
    }
}
