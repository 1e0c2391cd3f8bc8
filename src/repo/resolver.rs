//! Collapse scan candidates into exactly one dotfile per home path.
//!
//! Precedence within a group sharing a home path:
//!
//! 1. an entry for the current host,
//! 2. a generic entry,
//! 3. entries for other hosts are never part of the working set.
//!
//! Ties inside a tier prefer a regular file over an alias, a plain entry over
//! a forced copy, and finally the lexicographically smallest stored path.
use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::path::PathBuf;

use crate::dotfile::DotFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Tier {
    Generic,
    ThisHost,
}

type Rank = (Tier, bool, bool, Reverse<PathBuf>);

/// Reduces candidates by host specificity.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConflictResolver;

impl ConflictResolver {
    /// Reduce `candidates` to the working set, ordered by home path.
    pub fn resolve(self, candidates: impl IntoIterator<Item = DotFile>) -> Vec<DotFile> {
        let mut winners: BTreeMap<PathBuf, (Rank, DotFile)> = BTreeMap::new();

        for candidate in candidates {
            let Some(rank) = rank(&candidate) else {
                tracing::debug!("ignoring {}: belongs to another host", candidate.id());
                continue;
            };

            match winners.entry(candidate.original_path().to_path_buf()) {
                Entry::Vacant(slot) => {
                    slot.insert((rank, candidate));
                }
                Entry::Occupied(mut slot) => {
                    let (current_rank, current) = slot.get();
                    if rank > *current_rank {
                        tracing::debug!(
                            "{} takes precedence over {}",
                            candidate.id(),
                            current.id()
                        );
                        slot.insert((rank, candidate));
                    } else {
                        tracing::debug!(
                            "{} takes precedence over {}",
                            current.id(),
                            candidate.id()
                        );
                    }
                }
            }
        }

        winners.into_values().map(|(_, df)| df).collect()
    }
}

fn rank(df: &DotFile) -> Option<Rank> {
    let tier = if df.is_from_this_host() {
        Tier::ThisHost
    } else if df.is_generic() {
        Tier::Generic
    } else {
        return None;
    };
    Some((
        tier,
        !df.is_alias(),
        !df.must_be_copied(),
        Reverse(df.stored_path().to_path_buf()),
    ))
}
