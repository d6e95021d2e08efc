// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::collections::{HashMap, HashSet};

pub(crate) type SetHasher = core::hash::BuildHasherDefault<rustc_hash::FxHasher>;

pub(crate) type FxHashMap<K, V> = HashMap<K, V, SetHasher>;
pub(crate) type FxHashSet<K> = HashSet<K, SetHasher>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_maps_are_usable() {
        let mut map = FxHashMap::default();
        map.insert(7u64, "seven");
        assert_eq!(Some(&"seven"), map.get(&7));

        let mut set = FxHashSet::default();
        assert!(set.insert(3u64));
        assert!(!set.insert(3u64));
    }
}
