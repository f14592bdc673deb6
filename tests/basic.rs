mod common;

use common::initialize_logger;
use quadmap_rs::{HashTable, MapError, RemovalPolicy, TableConfig};

#[test]
fn test_put_get_remove_string() {
    initialize_logger();
    let mut m: HashTable<String, String> = HashTable::with_capacity(16);
    assert!(m.is_empty());

    // insert new
    m.put("a".to_string(), "1".to_string()).unwrap();
    assert_eq!(m.len(), 1);
    assert_eq!(m.get(&"a".to_string()).unwrap(), Some(&"1".to_string()));

    // insert another
    m.put("b".to_string(), "2".to_string()).unwrap();
    assert_eq!(m.len(), 2);
    assert_eq!(m.get(&"b".to_string()).unwrap(), Some(&"2".to_string()));

    // update existing
    m.put("a".to_string(), "10".to_string()).unwrap();
    assert_eq!(m.len(), 2);
    assert_eq!(m.get(&"a".to_string()).unwrap(), Some(&"10".to_string()));

    // remove existing
    let old = m.remove(&"b".to_string()).unwrap();
    assert_eq!(old, Some("2".to_string()));
    assert_eq!(m.len(), 1);
    assert_eq!(m.get(&"b".to_string()).unwrap(), None);
}

#[test]
fn test_default_capacity_scenario() {
    initialize_logger();
    let mut m: HashTable<&str, i32> = HashTable::new();
    assert_eq!(m.capacity(), 9999);

    m.put("a", 1).unwrap();
    m.put("b", 2).unwrap();
    assert_eq!(m.get(&"a").unwrap(), Some(&1));
    assert_eq!(m.size(), 2);

    assert_eq!(m.remove(&"a").unwrap(), Some(1));
    assert_eq!(m.size(), 1);
    assert_eq!(m.get(&"a").unwrap(), None);
    assert_eq!(m.replace("a", 99), Err(MapError::NotFound));
}

#[test]
fn test_basic_integer_keys() {
    let mut m: HashTable<i32, i32> = HashTable::new();
    assert_eq!(m.get(&1).unwrap(), None);
    m.put(1, 7).unwrap();
    assert_eq!(m.get(&1).unwrap(), Some(&7));
    m.put(1, 9).unwrap();
    assert_eq!(m.get(&1).unwrap(), Some(&9));
    assert_eq!(m.len(), 1);
    assert_eq!(m.remove(&1).unwrap(), Some(9));
    assert_eq!(m.get(&1).unwrap(), None);
}

#[test]
fn test_remove_absent_key_is_noop() {
    let mut m: HashTable<i32, &str> = HashTable::new();
    m.put(1, "one").unwrap();

    assert_eq!(m.remove(&2).unwrap(), None);
    assert_eq!(m.len(), 1);
    assert_eq!(m.remove(&1).unwrap(), Some("one"));
    assert_eq!(m.remove(&1).unwrap(), None);
    assert!(m.is_empty());
}

#[test]
fn test_edge_cases_strings() {
    let mut m: HashTable<String, String> = HashTable::new();

    // Empty string key
    m.put(String::new(), "empty_key_value".to_string()).unwrap();
    assert_eq!(m.get(&String::new()).unwrap(), Some(&"empty_key_value".to_string()));

    // Very long key
    let long_key = "a".repeat(1000);
    m.put(long_key.clone(), "long_key_value".to_string()).unwrap();
    assert_eq!(m.get(&long_key).unwrap(), Some(&"long_key_value".to_string()));

    // Ensure previous data intact
    assert_eq!(m.get(&String::new()).unwrap(), Some(&"empty_key_value".to_string()));
}

#[test]
fn test_get_or_default() {
    let mut m: HashTable<u32, String> = HashTable::new();
    m.put(7, "seven".to_string()).unwrap();

    assert_eq!(m.get_or_default(&7, "none".to_string()).unwrap(), "seven");
    assert_eq!(m.get_or_default(&8, "none".to_string()).unwrap(), "none");
}

#[test]
fn test_contains_key_and_value() {
    let mut m: HashTable<u32, &str> = HashTable::new();
    m.put(1, "x").unwrap();
    m.put(2, "y").unwrap();

    assert!(m.contains_key(&1).unwrap());
    assert!(!m.contains_key(&3).unwrap());
    assert!(m.contains_value(&"y"));
    assert!(!m.contains_value(&"z"));

    m.remove(&2).unwrap();
    assert!(!m.contains_value(&"y"));
}

#[test]
fn test_replace_present_key() {
    let mut m: HashTable<&str, i32> = HashTable::new();
    m.put("k", 1).unwrap();

    assert_eq!(m.replace("k", 2), Ok(true));
    assert_eq!(m.get(&"k").unwrap(), Some(&2));
    assert_eq!(m.len(), 1);
}

#[test]
fn test_multiple_keys_and_deletions() {
    // Tombstones keep survivors reachable whatever order keys are removed in.
    let config = TableConfig::new().with_removal_policy(RemovalPolicy::Tombstone);
    let mut m: HashTable<i32, String> = HashTable::with_config(config);

    for i in 0..100 {
        m.put(i, format!("value_{}", i)).unwrap();
    }
    for i in 0..100 {
        assert_eq!(m.get(&i).unwrap(), Some(&format!("value_{}", i)));
    }

    for i in (0..100).step_by(2) {
        assert_eq!(m.remove(&i).unwrap(), Some(format!("value_{}", i)));
    }
    assert_eq!(m.len(), 50);

    for i in 0..100 {
        if i % 2 == 0 {
            assert_eq!(m.get(&i).unwrap(), None);
        } else {
            assert_eq!(m.get(&i).unwrap(), Some(&format!("value_{}", i)));
        }
    }
}

#[test]
fn test_size_and_is_empty_semantics() {
    let mut m: HashTable<i32, String> = HashTable::new();

    assert!(m.is_empty());
    assert_eq!(m.len(), 0);

    for i in 0..10 {
        m.put(i, format!("value_{}", i)).unwrap();
        assert_eq!(m.len(), (i + 1) as usize);
        assert!(!m.is_empty());
    }

    // Newest first, so no removal cuts the walk of a key still present.
    for i in (0..10).rev() {
        assert!(m.remove(&i).unwrap().is_some());
        assert_eq!(m.len(), i as usize);
    }
    assert!(m.is_empty());
}

#[test]
fn test_iter_consistency() {
    let mut m: HashTable<i32, String> = HashTable::new();
    for i in 0..10 {
        m.put(i, format!("v{}", i)).unwrap();
    }

    assert_eq!(m.iter().len(), 10);
    let mut collected = m
        .iter()
        .map(|(k, v)| (*k, v.clone()))
        .collect::<Vec<(i32, String)>>();
    collected.sort_by_key(|(k, _)| *k);
    for i in 0..10 {
        assert_eq!(collected[i as usize].0, i);
        assert_eq!(collected[i as usize].1, format!("v{}", i));
    }

    let mut values: Vec<&String> = m.values().collect();
    values.sort();
    assert_eq!(values.len(), 10);
    assert_eq!(values[0], "v0");
}

#[test]
fn test_values_follow_slot_order() {
    let mut m: HashTable<u64, u64> = HashTable::with_capacity(64);
    for i in 0..20 {
        m.put(i, i * 100).unwrap();
    }

    let from_iter: Vec<u64> = m.iter().map(|(_, v)| *v).collect();
    let from_values: Vec<u64> = m.values().copied().collect();
    assert_eq!(from_iter, from_values);
}

#[test]
fn test_display_dump() {
    let mut m: HashTable<&str, i32> = HashTable::with_capacity(32);
    assert_eq!(m.to_string(), "");

    m.put("alpha", 1).unwrap();
    m.put("beta", 2).unwrap();

    let dump = m.to_string();
    let mut lines: Vec<&str> = dump.lines().collect();
    lines.sort_unstable();
    assert_eq!(lines, vec!["alpha : 1", "beta : 2"]);
    assert!(dump.ends_with('\n'));
}

#[test]
fn test_collect_and_extend() {
    let mut m: HashTable<u32, u32> = (0..50).map(|i| (i, i + 1)).collect();
    assert_eq!(m.len(), 50);

    m.extend((50..60).map(|i| (i, i + 1)));
    assert_eq!(m.len(), 60);
    for i in 0..60 {
        assert_eq!(m.get(&i).unwrap(), Some(&(i + 1)));
    }

    let debug = format!("{:?}", HashTable::<u8, u8>::with_capacity(4));
    assert_eq!(debug, "{}");
}
