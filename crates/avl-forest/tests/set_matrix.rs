use avl_forest::{AvlSet, TraverseOrder};

#[test]
fn avl_set_smoke_matrix() {
    let mut set = AvlSet::<i32>::new();
    set.add(1);
    set.add(24);
    set.add(42);
    set.add(42);
    assert_eq!(set.size(), 3);
    assert!(set.has(&1));
    assert!(set.has(&24));
    assert!(set.has(&42));
    assert!(!set.has(&25));

    let mut keys = Vec::new();
    set.for_each(|_i, k| keys.push(*k));
    assert_eq!(keys, vec![1, 24, 42]);
    set.assert_valid().unwrap();
}

#[test]
fn avl_set_iteration_matrix() {
    let mut set = AvlSet::<String>::new();
    assert_eq!(set.first(), None);
    assert_eq!(set.iter().next(), None);

    set.add("b".to_string());
    set.add("a".to_string());
    set.add("c".to_string());

    let list: Vec<String> = set.iter().map(|i| set.key(i).clone()).collect();
    assert_eq!(
        list,
        vec!["a".to_string(), "b".to_string(), "c".to_string()]
    );

    // Restartable: a second pass sees the same sequence.
    let again: Vec<String> = set.iter().map(|i| set.key(i).clone()).collect();
    assert_eq!(again, list);

    let in_order: Vec<String> = set
        .traverse(TraverseOrder::InOrder)
        .into_iter()
        .map(|i| set.key(i).clone())
        .collect();
    assert_eq!(in_order, list);
}

#[test]
fn avl_set_ladder_insert_delete_matrix() {
    let mut set = AvlSet::<i32>::new();

    for i in 0..300 {
        set.add(i);
        set.assert_valid().unwrap();
    }
    assert_eq!(set.size(), 300);
    assert_eq!(set.count_nodes(), 300);

    for i in (0..300).step_by(3) {
        assert!(set.del(&i));
        set.assert_valid().unwrap();
    }

    for i in 0..300 {
        assert_eq!(set.has(&i), i % 3 != 0);
    }
    assert_eq!(set.size(), 200);
    assert_eq!(set.count_nodes(), 200);
}

#[test]
fn avl_set_duplicate_idempotence_matrix() {
    let mut set: AvlSet<i32> = [50, 25, 75, 10, 30].into_iter().collect();
    let before: Vec<i32> = set.iter().map(|i| *set.key(i)).collect();
    let height = set.height();

    let slot = set.find(&30).unwrap();
    assert_eq!(set.add(30), slot);

    assert_eq!(set.size(), 5);
    assert_eq!(set.height(), height);
    let after: Vec<i32> = set.iter().map(|i| *set.key(i)).collect();
    assert_eq!(after, before);
    assert!(set.has(&30));
}

#[test]
fn avl_set_insert_delete_inverse_matrix() {
    let mut set: AvlSet<i32> = [50, 25, 75, 10, 30, 60, 80].into_iter().collect();
    let before: Vec<i32> = set.iter().map(|i| *set.key(i)).collect();

    assert!(!set.has(&99));
    set.add(99);
    assert!(set.has(&99));
    assert!(set.del(&99));

    let after: Vec<i32> = set.iter().map(|i| *set.key(i)).collect();
    assert_eq!(after, before);
    set.assert_valid().unwrap();
}

#[test]
fn avl_set_slot_reuse_matrix() {
    let mut set = AvlSet::<i32>::new();
    for i in 0..64 {
        set.add(i);
    }
    assert_eq!(set.slots(), 64);

    for i in 0..32 {
        assert!(set.del(&i));
    }
    // Freed slots are recycled before the arena grows.
    for i in 100..132 {
        set.add(i);
    }
    assert_eq!(set.slots(), 64);
    assert_eq!(set.size(), 64);
    set.assert_valid().unwrap();
}

#[test]
fn avl_set_misc_api_matrix() {
    let mut set = AvlSet::<i32>::new();
    assert!(set.is_empty());
    assert_eq!(set.size(), 0);
    assert_eq!(set.height(), 0);
    assert_eq!(set.min_key(), None);
    assert_eq!(set.max_key(), None);
    assert_eq!(set.predecessor(&10), None);
    assert_eq!(set.successor(&10), None);
    assert!(!set.del(&10));
    assert!(set.is_valid_avl());
    set.assert_valid().unwrap();

    set.extend([10, 5, 20]);
    assert!(!set.is_empty());
    assert_eq!(set.size(), 3);
    assert_eq!(set.min_key(), Some(&5));
    assert_eq!(set.max_key(), Some(&20));
    assert_eq!(set.first().map(|i| *set.key(i)), Some(5));
    assert_eq!(set.last().map(|i| *set.key(i)), Some(20));

    assert!(set.del(&10));
    assert!(!set.del(&10));

    set.clear();
    assert!(set.is_empty());
    assert_eq!(set.size(), 0);
    assert_eq!(set.slots(), 0);
    assert_eq!(set.first(), None);
}

#[test]
fn avl_set_custom_comparator_matrix() {
    // Descending order through the comparator seam.
    let mut set = AvlSet::with_comparator(|a: &i32, b: &i32| {
        if a == b {
            0
        } else if a > b {
            -1
        } else {
            1
        }
    });
    for k in [3, 1, 4, 1, 5, 9, 2, 6] {
        set.add(k);
    }
    let keys: Vec<i32> = set.iter().map(|i| *set.key(i)).collect();
    assert_eq!(keys, vec![9, 6, 5, 4, 3, 2, 1]);
    set.assert_valid().unwrap();
}

#[test]
fn avl_set_height_bound_matrix() {
    // AVL guarantee: height <= ceil(1.44 * log2(n + 2)), even for the
    // worst-case ascending load.
    let mut set = AvlSet::<i32>::new();
    for n in 1..=512 {
        set.add(n);
        let bound = (1.44 * ((n + 2) as f64).log2()).ceil() as usize;
        assert!(
            set.height() <= bound,
            "n={} height={} bound={}",
            n,
            set.height(),
            bound
        );
    }
}
