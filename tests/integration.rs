//! Scenario tests mirroring `original_source/test/test.c`'s suite: single
//! insertion, bulk insertion with forced rehashing, removal, overwrite
//! notification, and destruction notification. Adapted to both the
//! closure-backed `FnPolicy` (literal parity with the C DJB2 example) and
//! the default `StdPolicy` (idiomatic-Rust coverage), plus a resize-retry
//! cap scenario the original source doesn't defend against.

use std::cell::RefCell;
use std::rc::Rc;

use hopscotch_map::HopscotchMap;

fn djb2(s: &str) -> u64 {
    let mut hash: u64 = 5381;
    for byte in s.bytes() {
        hash = hash.wrapping_mul(33) ^ byte as u64;
    }
    hash
}

fn djb2_hash(k: &String) -> u64 {
    djb2(k)
}

fn djb2_eq(a: &String, b: &String) -> bool {
    a == b
}

type DjbPolicy = hopscotch_map::FnPolicy<String, fn(&String) -> u64, fn(&String, &String) -> bool>;

fn djb2_map() -> HopscotchMap<String, String, DjbPolicy> {
    HopscotchMap::with_policy(
        djb2_hash as fn(&String) -> u64,
        djb2_eq as fn(&String, &String) -> bool,
    )
}

#[test]
fn empty_table() {
    let map: HopscotchMap<String, String> = HopscotchMap::new();
    assert_eq!(map.len(), 0);
    assert!(map.is_empty());
    assert_eq!(map.get(&"x".to_string()), None);
}

#[test]
fn single_element_insertion() {
    let mut map = djb2_map();
    let key = "This is a test key".to_string();
    let value = "This is a test value".to_string();
    assert_eq!(map.len(), 0);
    map.put(key.clone(), value.clone());
    assert_eq!(map.len(), 1);
    assert_eq!(map.get(&key), Some(&value));
}

#[test]
fn multiple_element_insertion_with_rehash() {
    let mut map = djb2_map();
    for i in 0..4096 {
        let key = format!("key-{i:04}");
        let value = format!("value-{i:04}");
        map.put(key, value);
        assert_eq!(map.len(), i + 1);
    }
    for i in 0..4096 {
        let key = format!("key-{i:04}");
        let value = format!("value-{i:04}");
        assert_eq!(map.get(&key), Some(&value));
    }
}

#[test]
fn removal() {
    let mut map = djb2_map();
    for i in 0..2048 {
        map.put(format!("key-{i:04}"), format!("value-{i:04}"));
    }
    assert!(map.remove(&"key-0004".to_string()));
    assert_eq!(map.len(), 2047);
    assert!(!map.contains_key(&"key-0004".to_string()));
    for i in 0..2048 {
        if i == 4 {
            continue;
        }
        let key = format!("key-{i:04}");
        assert_eq!(map.get(&key), Some(&format!("value-{i:04}")));
    }
}

#[test]
fn overwrite_notify_marks_flag() {
    let flag = Rc::new(RefCell::new(false));
    let flag_clone = Rc::clone(&flag);
    let mut map = HopscotchMap::new().with_value_removed_notify(move |_old: String| {
        *flag_clone.borrow_mut() = true;
    });

    map.put("a".to_string(), "first".to_string());
    assert!(!*flag.borrow());
    map.put("a".to_string(), "second".to_string());
    assert!(*flag.borrow());
    assert_eq!(map.get(&"a".to_string()), Some(&"second".to_string()));
}

#[test]
fn destruction_notify_reports_every_pair_exactly_once() {
    let seen: Rc<RefCell<Vec<(u32, u32)>>> = Rc::new(RefCell::new(Vec::new()));
    let seen_key = Rc::clone(&seen);
    let seen_value = Rc::clone(&seen);

    {
        let mut map = HopscotchMap::new()
            .with_key_removed_notify(move |k: u32| seen_key.borrow_mut().push((k, 0)))
            .with_value_removed_notify(move |v: u32| {
                let mut log = seen_value.borrow_mut();
                let last = log.last_mut().expect("key notify always fires first");
                last.1 = v;
            });

        for i in 0..300u32 {
            map.put(i, i * 10);
        }
        // table dropped at the end of this block
    }

    let mut log = seen.borrow().clone();
    log.sort();
    let expected: Vec<(u32, u32)> = (0..300u32).map(|i| (i, i * 10)).collect();
    assert_eq!(log, expected);
}

#[test]
fn resize_retry_cap_surfaces_as_put_failure() {
    let mut map = HopscotchMap::with_policy(|_: &u32| 7u64, |a: &u32, b: &u32| a == b);
    let mut inserted = 0u32;
    for i in 0..(hopscotch_map::H as u32 * 2) {
        if map.put(i, i) {
            inserted += 1;
        } else {
            break;
        }
    }
    assert_eq!(inserted as usize, hopscotch_map::H);
    assert_eq!(map.len(), hopscotch_map::H);
    // The table must still be fully usable after the failed resize.
    for i in 0..inserted {
        assert_eq!(map.get(&i), Some(&i));
    }
}

#[test]
fn into_iter_yields_every_live_entry_once() {
    let mut map = HopscotchMap::new();
    for i in 0..512 {
        map.put(i, i.to_string());
    }
    map.remove(&10);
    map.remove(&200);

    let mut collected: Vec<(i32, String)> = map.into_iter().collect();
    collected.sort();

    let mut expected: Vec<(i32, String)> =
        (0..512).filter(|i| *i != 10 && *i != 200).map(|i| (i, i.to_string())).collect();
    expected.sort();
    assert_eq!(collected, expected);
}
