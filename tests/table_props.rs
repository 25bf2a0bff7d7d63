use std::collections::BTreeMap;

use proptest::prelude::*;

use qint_rs::table::{OrderedTable, Put, PutFlags, Visit};

#[derive(Debug, Clone)]
enum Op {
    Put(u32, u32),
    Preserve(u32, u32),
    Delete(u32),
}

fn op() -> impl Strategy<Value = Op> {
    // Small key space so that overwrites and deletes hit existing keys.
    let key = 0u32..64;
    prop_oneof![
        (key.clone(), any::<u32>()).prop_map(|(k, v)| Op::Put(k, v)),
        (key.clone(), any::<u32>()).prop_map(|(k, v)| Op::Preserve(k, v)),
        key.prop_map(Op::Delete),
    ]
}

proptest! {
    #[test]
    fn prop_matches_btreemap(ops in prop::collection::vec(op(), 0..300)) {
        let mut table = OrderedTable::direct();
        let mut model = BTreeMap::new();

        for op in ops {
            match op {
                Op::Put(k, v) => {
                    table.direct_put(k, v);
                    model.insert(k, v);
                }
                Op::Preserve(k, v) => {
                    let put = table.direct_put_ex(PutFlags::PRESERVE, k, v);
                    match model.get(&k) {
                        Some(old) => prop_assert_eq!(put, Put::Preserved(old)),
                        None => {
                            prop_assert_eq!(put, Put::Inserted);
                            model.insert(k, v);
                        }
                    }
                }
                Op::Delete(k) => {
                    prop_assert_eq!(table.direct_delete(k, true), model.remove(&k).is_some());
                }
            }
        }

        prop_assert_eq!(table.len(), model.len());
        prop_assert!(table.len() < table.capacity());
        let forward: Vec<(u32, u32)> = table.iter().map(|(&k, &v)| (k, v)).collect();
        let expected: Vec<(u32, u32)> = model.iter().map(|(&k, &v)| (k, v)).collect();
        prop_assert_eq!(&forward, &expected);

        let mut backward: Vec<(u32, u32)> = table.iter().rev().map(|(&k, &v)| (k, v)).collect();
        backward.reverse();
        prop_assert_eq!(&backward, &expected);

        for (k, v) in &model {
            prop_assert_eq!(table.direct_get(*k), Some(v));
        }
    }

    #[test]
    fn prop_resize_keeps_entries(keys in prop::collection::btree_set(any::<u32>(), 0..500)) {
        let mut table = OrderedTable::direct();
        for &k in &keys {
            prop_assert!(table.direct_put(k, ()));
        }
        prop_assert!(table.capacity() > keys.len());
        prop_assert!(table.capacity().is_power_of_two());
        let collected: Vec<u32> = table.iter().map(|(&k, _)| k).collect();
        let expected: Vec<u32> = keys.iter().copied().collect();
        prop_assert_eq!(collected, expected);
    }

    #[test]
    fn prop_foreach_delete(keys in prop::collection::btree_set(0u32..1000, 0..100)) {
        let mut table = OrderedTable::direct();
        for &k in &keys {
            table.direct_put(k, k);
        }
        table.foreach(|&k, _| if k % 2 == 0 { Visit::DELETE } else { Visit::CONTINUE });
        let odd: Vec<u32> = keys.iter().copied().filter(|k| k % 2 == 1).collect();
        let left: Vec<u32> = table.iter().map(|(&k, _)| k).collect();
        prop_assert_eq!(left, odd);
    }

    #[test]
    fn prop_string_keys_sorted(keys in prop::collection::vec("[a-zA-Z]{0,8}", 0..50)) {
        let mut table = OrderedTable::ascii_cs();
        for k in &keys {
            table.put(k.clone(), ());
        }
        let mut expected = keys.clone();
        expected.sort();
        expected.dedup();
        let collected: Vec<String> = table.iter().map(|(k, _)| k.clone()).collect();
        prop_assert_eq!(collected, expected);
    }
}
