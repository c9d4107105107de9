use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use xxhash_rust::xxh3::xxh3_64;

use crate::error::{MeridianError, Result};
use crate::types::PartitionId;

/// Hard cap on partitions per definition, either strategy.
pub const MAX_PARTITIONS: usize = 65_536;

/// One end of a key range. `Min` sorts below every key and `Max` above, so
/// a resolved partition map always covers the whole key domain. Keys are
/// raw byte strings compared lexicographically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyBound {
    Min,
    Key(Vec<u8>),
    Max,
}

impl KeyBound {
    /// Compare this bound against a concrete key.
    pub fn cmp_key(&self, key: &[u8]) -> Ordering {
        match self {
            KeyBound::Min => Ordering::Less,
            KeyBound::Key(bytes) => bytes.as_slice().cmp(key),
            KeyBound::Max => Ordering::Greater,
        }
    }
}

/// Start-inclusive, end-exclusive span of the key domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyRange {
    pub start: KeyBound,
    pub end: KeyBound,
}

impl KeyRange {
    pub fn new(start: KeyBound, end: KeyBound) -> Self {
        Self { start, end }
    }

    /// Whether `key` falls inside this range.
    pub fn contains(&self, key: &[u8]) -> bool {
        self.start.cmp_key(key) != Ordering::Greater && self.end.cmp_key(key) == Ordering::Greater
    }
}

/// One hash bucket: keys route here when `xxh3(key) % modulus == index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashBucket {
    pub index: u32,
    pub modulus: u32,
}

/// The slice of key space a partition owns. Externally tagged so the wire
/// form is `{"bounds": {...}}` or `{"bucket": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartitionSpan {
    #[serde(rename = "bounds")]
    Range(KeyRange),
    #[serde(rename = "bucket")]
    Hash(HashBucket),
}

/// One resolved partition. Ids are ordinals assigned in ascending span
/// order and are stable for the lifetime of the definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    pub id: PartitionId,
    #[serde(flatten)]
    pub span: PartitionSpan,
}

/// Client-declared partition rule for an index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum PartitionStrategy {
    /// Explicit key ranges, ascending and contiguous. The outermost declared
    /// bounds are widened to the domain sentinels at resolution so the
    /// edge partitions absorb keys beyond the declared split points.
    Range { ranges: Vec<KeyRange> },
    /// Fixed number of hash buckets over the whole key space.
    Hash { buckets: u32 },
}

impl PartitionStrategy {
    /// Resolve the rule into its concrete partition map.
    ///
    /// Resolution is a pure function of the strategy: the same declaration
    /// always produces the same partitions, in ascending key/bucket order,
    /// so every catalog replica derives identical routing.
    pub fn resolve(&self) -> Result<Vec<Partition>> {
        match self {
            PartitionStrategy::Range { ranges } => resolve_ranges(ranges),
            PartitionStrategy::Hash { buckets } => resolve_buckets(*buckets),
        }
    }
}

fn resolve_ranges(ranges: &[KeyRange]) -> Result<Vec<Partition>> {
    if ranges.is_empty() {
        return Err(MeridianError::InvalidPartitionBounds {
            detail: "no ranges declared".to_string(),
        });
    }
    if ranges.len() > MAX_PARTITIONS {
        return Err(MeridianError::InvalidPartitionBounds {
            detail: format!("{} ranges exceed the {MAX_PARTITIONS} partition cap", ranges.len()),
        });
    }

    for (i, range) in ranges.iter().enumerate() {
        if range.start >= range.end {
            return Err(MeridianError::InvalidPartitionBounds {
                detail: format!("range {i} is empty or inverted"),
            });
        }
    }
    for (i, pair) in ranges.windows(2).enumerate() {
        match pair[1].start.cmp(&pair[0].end) {
            Ordering::Less => {
                return Err(MeridianError::InvalidPartitionBounds {
                    detail: format!("ranges {i} and {} overlap", i + 1),
                });
            }
            Ordering::Greater => {
                return Err(MeridianError::InvalidPartitionBounds {
                    detail: format!("gap between ranges {i} and {}", i + 1),
                });
            }
            Ordering::Equal => {}
        }
    }

    let last = ranges.len() - 1;
    let partitions = ranges
        .iter()
        .enumerate()
        .map(|(i, range)| {
            let start = if i == 0 { KeyBound::Min } else { range.start.clone() };
            let end = if i == last { KeyBound::Max } else { range.end.clone() };
            Partition {
                id: i as PartitionId,
                span: PartitionSpan::Range(KeyRange { start, end }),
            }
        })
        .collect();
    Ok(partitions)
}

fn resolve_buckets(buckets: u32) -> Result<Vec<Partition>> {
    if buckets == 0 || buckets as usize > MAX_PARTITIONS {
        return Err(MeridianError::InvalidBucketCount { count: buckets });
    }
    let partitions = (0..buckets)
        .map(|i| Partition {
            id: i,
            span: PartitionSpan::Hash(HashBucket {
                index: i,
                modulus: buckets,
            }),
        })
        .collect();
    Ok(partitions)
}

/// Check that `partitions` form a map [`PartitionStrategy::resolve`] could
/// have produced: non-empty, ordinal ids, one span kind, and exhaustive
/// coverage. Decoded records pass through here so routing never sees a
/// malformed map.
pub(crate) fn check_partition_map(partitions: &[Partition]) -> Result<()> {
    if partitions.is_empty() {
        return Err(MeridianError::InvalidPartitionBounds {
            detail: "no partitions".to_string(),
        });
    }
    if partitions.len() > MAX_PARTITIONS {
        return Err(MeridianError::InvalidPartitionBounds {
            detail: format!(
                "{} partitions exceed the {MAX_PARTITIONS} partition cap",
                partitions.len()
            ),
        });
    }
    let ordinal = partitions
        .iter()
        .enumerate()
        .all(|(i, p)| p.id == i as PartitionId);
    if !ordinal {
        return Err(MeridianError::InvalidPartitionBounds {
            detail: "partition ids are not ascending ordinals".to_string(),
        });
    }
    match &partitions[0].span {
        PartitionSpan::Range(_) => check_range_map(partitions),
        PartitionSpan::Hash(_) => check_hash_map(partitions),
    }
}

fn check_range_map(partitions: &[Partition]) -> Result<()> {
    let ranges = partitions
        .iter()
        .map(|p| match &p.span {
            PartitionSpan::Range(range) => Ok(range),
            PartitionSpan::Hash(_) => Err(MeridianError::InvalidPartitionBounds {
                detail: format!("partition {} mixes a hash bucket into a range map", p.id),
            }),
        })
        .collect::<Result<Vec<&KeyRange>>>()?;

    for (i, range) in ranges.iter().enumerate() {
        if range.start >= range.end {
            return Err(MeridianError::InvalidPartitionBounds {
                detail: format!("partition {i} span is empty or inverted"),
            });
        }
    }
    for (i, pair) in ranges.windows(2).enumerate() {
        if pair[1].start != pair[0].end {
            return Err(MeridianError::InvalidPartitionBounds {
                detail: format!("partitions {i} and {} are not contiguous", i + 1),
            });
        }
    }
    if ranges[0].start != KeyBound::Min {
        return Err(MeridianError::InvalidPartitionBounds {
            detail: "first partition does not start at the domain minimum".to_string(),
        });
    }
    if ranges[ranges.len() - 1].end != KeyBound::Max {
        return Err(MeridianError::InvalidPartitionBounds {
            detail: "last partition does not end at the domain maximum".to_string(),
        });
    }
    Ok(())
}

fn check_hash_map(partitions: &[Partition]) -> Result<()> {
    let modulus = partitions.len() as u32;
    for partition in partitions {
        let bucket = match &partition.span {
            PartitionSpan::Hash(bucket) => bucket,
            PartitionSpan::Range(_) => {
                return Err(MeridianError::InvalidPartitionBounds {
                    detail: format!("partition {} mixes a range into a hash map", partition.id),
                });
            }
        };
        if bucket.index != partition.id || bucket.modulus != modulus {
            return Err(MeridianError::InvalidPartitionBounds {
                detail: format!(
                    "hash bucket {}/{} does not match partition {} of {modulus}",
                    bucket.index, bucket.modulus, partition.id
                ),
            });
        }
    }
    Ok(())
}

/// Map a key to its owning partition.
///
/// Range maps are binary-searched on their end bounds; hash maps route by
/// `xxh3(key) % modulus`. Returns `None` only for slices that did not come
/// out of [`PartitionStrategy::resolve`] (empty or non-exhaustive).
pub fn locate<'a>(partitions: &'a [Partition], key: &[u8]) -> Option<&'a Partition> {
    let first = partitions.first()?;
    match &first.span {
        PartitionSpan::Hash(bucket) => {
            if bucket.modulus == 0 {
                return None;
            }
            let slot = (xxh3_64(key) % u64::from(bucket.modulus)) as usize;
            partitions.get(slot)
        }
        PartitionSpan::Range(_) => {
            let idx = partitions.partition_point(|p| match &p.span {
                PartitionSpan::Range(range) => range.end.cmp_key(key) != Ordering::Greater,
                PartitionSpan::Hash(_) => false,
            });
            partitions.get(idx).filter(|p| match &p.span {
                PartitionSpan::Range(range) => range.contains(key),
                PartitionSpan::Hash(_) => false,
            })
        }
    }
}
