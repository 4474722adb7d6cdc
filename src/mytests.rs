use crate::*;

/// Visit 0..n in a scrambled but deterministic order ( p must be coprime with n ).
fn scrambled(n: usize, p: usize) -> impl Iterator<Item = usize> {
    (0..n).map(move |i| (i * p + 7) % n)
}

#[test]
fn test_insert_fwd() {
    for degree in [2, 3, 4, 16, 32] {
        let mut t = BTree::<usize, usize>::with_degree(degree);
        let n = 10000;
        for i in 0..n {
            assert_eq!(t.insert(i, i), Ok(None));
        }
        t.check();
        assert_eq!(t.len(), n);
        for i in 0..n {
            assert_eq!(t.get(&i), Ok(Some(&i)));
        }
    }
}

#[test]
fn test_insert_rev() {
    for degree in [2, 3, 7] {
        let mut t = BTree::<usize, usize>::with_degree(degree);
        let n = 10000;
        for i in (0..n).rev() {
            t.insert(i, i).unwrap();
        }
        t.check();
        assert!(t.keys().copied().eq(0..n));
    }
}

#[test]
fn test_sorted_after_scrambled_inserts() {
    let mut t = BTree::with_degree(3);
    let mut model = std::collections::BTreeMap::new();
    for k in scrambled(5003, 101) {
        t.insert(k, k * 3).unwrap();
        model.insert(k, k * 3);
    }
    t.check();
    assert!(t.iter().eq(model.iter()));
}

#[test]
fn test_upsert() {
    let mut t = BTree::with_degree(2);
    for i in 0..50 {
        t.insert(i, "x").unwrap();
    }
    let len = t.len();
    assert_eq!(t.insert(1000, "v1"), Ok(None));
    assert_eq!(t.insert(1000, "v2"), Ok(Some("v1")));
    assert_eq!(t.get(&1000), Ok(Some(&"v2")));
    assert_eq!(t.len(), len + 1);
    // Replacing a key from the middle of the map.
    let root_key = *t.keys().nth(t.len() / 2).unwrap();
    assert_eq!(t.insert(root_key, "y"), Ok(Some("x")));
    t.check();
}

#[test]
fn test_delete() {
    let mut t = BTree::with_degree(4);
    for i in 0..200 {
        t.insert(i, i + 1).unwrap();
    }
    assert_eq!(t.remove(&150), Ok(Some(151)));
    assert_eq!(t.get(&150), Ok(None));
    assert_eq!(t.len(), 199);
    assert_eq!(t.remove(&150), Ok(None));
    assert_eq!(t.len(), 199);
    assert_eq!(t.remove_entry(&0), Ok(Some((0, 1))));
    t.check();
}

#[test]
fn test_delete_all_scrambled() {
    for degree in [2, 3, 5] {
        let mut t = BTree::with_degree(degree);
        let n = 2000;
        for k in scrambled(n, 7) {
            t.insert(k, k).unwrap();
        }
        for (j, k) in scrambled(n, 13).enumerate() {
            assert_eq!(t.remove(&k), Ok(Some(k)));
            assert_eq!(t.len(), n - j - 1);
            if j % 97 == 0 {
                t.check();
            }
        }
        t.check();
        assert!(t.is_empty());
        assert_eq!(t.height(), 0);
        assert_eq!(t.first_key_value(), None);
    }
}

#[test]
fn test_pop_first_last() {
    let mut t = BTree::with_degree(2);
    assert_eq!(t.pop_first(), None);
    assert_eq!(t.pop_last(), None);
    for i in 0..100 {
        t.insert(i, -i).unwrap();
    }
    assert_eq!(t.first_key_value(), Some((&0, &0)));
    assert_eq!(t.last_key_value(), Some((&99, &-99)));
    for i in 0..50 {
        assert_eq!(t.pop_first(), Some((i, -i)));
        assert_eq!(t.pop_last(), Some((99 - i, i - 99)));
        t.check();
    }
    assert!(t.is_empty());
    assert_eq!(t.pop_last(), None);
}

#[test]
fn test_get_mut_and_contains() {
    let mut t = BTree::new();
    for i in 0..1000u32 {
        t.insert(i, i).unwrap();
    }
    for i in 0..1000u32 {
        *t.get_mut(&i).unwrap().unwrap() *= 2;
    }
    assert_eq!(t.get_mut(&5000), Ok(None));
    assert_eq!(t.contains_key(&999), Ok(true));
    assert_eq!(t.contains_key(&1000), Ok(false));
    assert!(t.iter().all(|(k, v)| *v == k * 2));
    assert_eq!(t.get_key_value(&10), Ok(Some((&10, &20))));
}

#[test]
fn test_degree_coercion() {
    assert_eq!(BTree::<u8, u8>::with_degree(0).degree(), 32);
    assert_eq!(BTree::<u8, u8>::with_degree(-1).max_items(), 63);
    assert_eq!(BTree::<u8, u8>::with_degree(1).degree(), 2);
    assert_eq!(BTree::<u8, u8>::new().min_items(), 31);
    assert!(matches!(
        BTree::<u8, u8>::try_with_degree(1),
        Err(Error::InvalidDegree(1))
    ));
    assert!(BTree::<u8, u8>::try_with_degree(2).is_ok());
    assert_eq!(BTree::<u8, u8>::new().degree() as i64, DEFAULT_DEGREE);
    assert_eq!(
        BTree::<u8, u8>::with_degree(1).degree() as i64,
        MIN_DEGREE
    );

    let mut t = BTree::with_degree(1);
    for i in 0..100 {
        t.insert(i, ()).unwrap();
    }
    t.check();
    assert_eq!(t.max_items(), 3);
}

#[test]
fn test_custom_comparator() {
    let mut t = BTree::with_comparator(2, FnComparator(|a: &String, b: &String| {
        a.len().cmp(&b.len()).then_with(|| a.cmp(b))
    }));
    for w in ["pear", "fig", "banana", "kiwi", "apple", "date"] {
        t.insert(w.to_string(), w.len()).unwrap();
    }
    t.check();
    let words: Vec<&str> = t.keys().map(String::as_str).collect();
    assert_eq!(words, ["fig", "date", "kiwi", "pear", "apple", "banana"]);
    assert_eq!(t.remove(&"kiwi".to_string()), Ok(Some(4)));
    t.check();
    let (a, b) = ("zz".to_string(), "aaa".to_string());
    assert_eq!(t.comparator().compare(&a, &b), Some(std::cmp::Ordering::Less));
}

#[test]
fn test_clear_and_reuse() {
    let mut t = BTree::with_degree(3);
    for i in 0..100 {
        t.insert(i, i).unwrap();
    }
    t.clear();
    t.check();
    assert_eq!(t.get(&5), Ok(None));
    t.insert(5, 5).unwrap();
    assert_eq!(t.len(), 1);
    assert_eq!(t.height(), 1);
}

#[test]
fn test_debug_format() {
    let mut t = BTree::with_degree(2);
    t.insert(2, 'b').unwrap();
    t.insert(1, 'a').unwrap();
    assert_eq!(format!("{:?}", t), "{1: 'a', 2: 'b'}");
}

#[test]
fn test_height_is_logarithmic() {
    let mut t = BTree::with_degree(2);
    let n = 1 << 14;
    for i in 0..n {
        t.insert(i, ()).unwrap();
    }
    // Every node holds at least one item, so height <= log2(n + 1).
    assert!(t.height() <= 15);
    let mut t = BTree::with_degree(32);
    for i in 0..n {
        t.insert(i, ()).unwrap();
    }
    assert!(t.height() <= 3);
}

#[test]
fn test_default_map() {
    let mut t: BTree<u32, u32> = BTree::default();
    assert!(t.is_empty());
    assert_eq!(t.degree(), 32);
    assert_eq!(t.height(), 0);
    t.insert(1, 2).unwrap();
    assert_eq!(t.get(&1), Ok(Some(&2)));
}
