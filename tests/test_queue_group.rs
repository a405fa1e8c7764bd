use common::{assert_sound, queue_of, queue_of_strings, random_values, snapshot};
use rand::{rngs::StdRng, Rng, SeedableRng};
use ringq::{Group, Queue, QueueContext, QueueError, SortOrder, VerifyError};

mod common;

#[test]
fn test_merge_all_basic() {
    let mut ctx = QueueContext::new();
    let group = Group::new(&mut ctx).unwrap();

    let queues = [
        queue_of(&mut ctx, &["1", "4", "7"]),
        queue_of(&mut ctx, &["2", "5", "8"]),
        queue_of(&mut ctx, &["3", "6", "9"]),
    ];
    for queue in queues {
        group.push(&mut ctx, queue).unwrap();
    }
    assert_eq!(group.len(&ctx), 3);

    let size = group.merge_all(&mut ctx, SortOrder::Ascending);

    assert_eq!(size, 9);
    assert_eq!(
        queues[0].values(&ctx),
        vec!["1", "2", "3", "4", "5", "6", "7", "8", "9"]
    );
    assert!(queues[1].is_empty(&ctx));
    assert!(queues[2].is_empty(&ctx));

    let sizes: Vec<usize> = group.entries(&ctx).map(|e| e.size(&ctx)).collect();
    assert_eq!(sizes, vec![9, 0, 0]);
    group.verify(&ctx).unwrap();
    assert_sound(&ctx, queues[0]);
}

#[test]
fn test_merge_all_skips_empty_queues() {
    let mut ctx = QueueContext::new();
    let group = Group::new(&mut ctx).unwrap();

    let queues = [
        Queue::new(&mut ctx).unwrap(),
        queue_of(&mut ctx, &["b", "d"]),
        Queue::new(&mut ctx).unwrap(),
        queue_of(&mut ctx, &["a", "c", "e"]),
        Queue::new(&mut ctx).unwrap(),
    ];
    for queue in queues {
        group.push(&mut ctx, queue).unwrap();
    }

    let size = group.merge_all(&mut ctx, SortOrder::Ascending);

    // the first entry survives even though it started empty
    assert_eq!(size, 5);
    assert_eq!(queues[0].values(&ctx), vec!["a", "b", "c", "d", "e"]);
    for queue in &queues[1..] {
        assert!(queue.is_empty(&ctx));
    }
    let first = group.entries(&ctx).next().unwrap();
    assert_eq!(first.size(&ctx), 5);
    group.verify(&ctx).unwrap();
}

#[test]
fn test_merge_all_descending() {
    let mut ctx = QueueContext::new();
    let group = Group::new(&mut ctx).unwrap();

    for values in [&["z", "m", "a"][..], &["y", "b"], &["x", "x"], &["n"]] {
        let queue = queue_of(&mut ctx, values);
        group.push(&mut ctx, queue).unwrap();
    }

    let size = group.merge_all(&mut ctx, SortOrder::Descending);

    let survivor = group.entries(&ctx).next().unwrap().queue(&ctx).unwrap();
    assert_eq!(size, 8);
    assert_eq!(
        survivor.values(&ctx),
        vec!["z", "y", "x", "x", "n", "m", "b", "a"]
    );
}

#[test]
fn test_merge_all_trivial_groups() {
    let mut ctx = QueueContext::new();

    let group = Group::new(&mut ctx).unwrap();
    assert!(group.is_empty(&ctx));
    assert_eq!(group.merge_all(&mut ctx, SortOrder::Ascending), 0);

    let queue = Queue::new(&mut ctx).unwrap();
    group.push(&mut ctx, queue).unwrap();
    assert_eq!(group.merge_all(&mut ctx, SortOrder::Ascending), 0);

    let single = queue_of(&mut ctx, &["q"]);
    let other = Group::new(&mut ctx).unwrap();
    other.push(&mut ctx, single).unwrap();
    assert_eq!(other.merge_all(&mut ctx, SortOrder::Ascending), 1);

    group.free(&mut ctx).unwrap();
    assert!(!group.is_valid(&ctx));
    assert!(!queue.is_valid(&ctx));
    assert_eq!(group.merge_all(&mut ctx, SortOrder::Ascending), 0);
    assert_eq!(group.len(&ctx), 0);
}

#[test]
fn test_merge_all_skips_absent_queues() {
    let mut ctx = QueueContext::new();
    let group = Group::new(&mut ctx).unwrap();

    let gone = queue_of(&mut ctx, &["0"]);
    let first = queue_of(&mut ctx, &["1", "3"]);
    let second = queue_of(&mut ctx, &["2"]);
    for queue in [gone, first, second] {
        group.push(&mut ctx, queue).unwrap();
    }
    gone.free(&mut ctx).unwrap();

    assert_eq!(group.merge_all(&mut ctx, SortOrder::Ascending), 3);
    assert_eq!(first.values(&ctx), vec!["1", "2", "3"]);
    assert!(second.is_empty(&ctx));
    // only the survivor keeps a cached size
    let sizes: Vec<usize> = group.entries(&ctx).map(|e| e.size(&ctx)).collect();
    assert_eq!(sizes, vec![0, 3, 0]);
    group.verify(&ctx).unwrap();
}

#[test]
fn test_merge_all_clears_sizes_before_survivor() {
    let mut ctx = QueueContext::new();
    let group = Group::new(&mut ctx).unwrap();

    let gone = queue_of(&mut ctx, &["z"]);
    let only = queue_of(&mut ctx, &["a"]);
    group.push(&mut ctx, gone).unwrap();
    group.push(&mut ctx, only).unwrap();
    gone.free(&mut ctx).unwrap();

    assert_eq!(group.merge_all(&mut ctx, SortOrder::Ascending), 1);
    let sizes: Vec<usize> = group.entries(&ctx).map(|e| e.size(&ctx)).collect();
    assert_eq!(sizes, vec![0, 1]);
}

#[test]
fn test_merge_all_without_live_queues_clears_sizes() {
    let mut ctx = QueueContext::new();
    let group = Group::new(&mut ctx).unwrap();
    for values in [&["a"][..], &["b", "c"]] {
        let queue = queue_of(&mut ctx, values);
        group.push(&mut ctx, queue).unwrap();
        queue.free(&mut ctx).unwrap();
    }

    assert_eq!(group.merge_all(&mut ctx, SortOrder::Ascending), 0);
    assert!(group.entries(&ctx).all(|e| e.size(&ctx) == 0));
}

#[test]
fn test_push_and_find() {
    let mut ctx = QueueContext::new();
    let group = Group::new(&mut ctx).unwrap();

    let first = queue_of(&mut ctx, &["a"]);
    let second = queue_of(&mut ctx, &["b", "c"]);
    let entry1 = group.push(&mut ctx, first).unwrap();
    let entry2 = group.push(&mut ctx, second).unwrap();

    assert_ne!(entry1.id(&ctx), entry2.id(&ctx));
    assert_eq!(entry2.size(&ctx), 2);
    assert_eq!(group.find(&ctx, entry2.id(&ctx).unwrap()), Some(entry2));
    assert_eq!(group.find(&ctx, usize::MAX), None);
    assert_eq!(entry1.queue(&ctx), Some(first));

    assert!(matches!(
        group.push(&mut ctx, first),
        Err(QueueError::AlreadyGrouped)
    ));
    assert_eq!(group.len(&ctx), 2);

    let freed = Queue::new(&mut ctx).unwrap();
    freed.free(&mut ctx).unwrap();
    assert!(matches!(
        group.push(&mut ctx, freed),
        Err(QueueError::Absent)
    ));
}

#[test]
fn test_group_free_releases_everything() {
    let mut ctx = QueueContext::new();
    let group = Group::new(&mut ctx).unwrap();
    for values in [&["a", "b"][..], &["c"], &[]] {
        let queue = queue_of(&mut ctx, values);
        group.push(&mut ctx, queue).unwrap();
    }
    assert_eq!(ctx.node_count(), 6);

    group.free(&mut ctx).unwrap();
    assert_eq!(ctx.node_count(), 0);
    assert!(matches!(group.verify(&ctx), Err(VerifyError::Absent)));
    assert!(matches!(group.free(&mut ctx), Err(QueueError::Absent)));
}

#[test]
fn test_group_free_skips_freed_queues() {
    let mut ctx = QueueContext::new();
    let group = Group::new(&mut ctx).unwrap();
    let kept = queue_of(&mut ctx, &["a"]);
    let gone = queue_of(&mut ctx, &["b", "c"]);
    group.push(&mut ctx, kept).unwrap();
    group.push(&mut ctx, gone).unwrap();
    gone.free(&mut ctx).unwrap();

    group.free(&mut ctx).unwrap();
    assert!(!kept.is_valid(&ctx));
    assert_eq!(ctx.node_count(), 0);
}

#[test]
fn test_freed_group_handle_stays_absent() {
    let mut ctx = QueueContext::new();
    let old = Group::new(&mut ctx).unwrap();
    let queue = queue_of(&mut ctx, &["a"]);
    let old_entry = old.push(&mut ctx, queue).unwrap();
    old.free(&mut ctx).unwrap();

    // the new group and entry land in the slots just released
    let fresh = Group::new(&mut ctx).unwrap();
    let queue = queue_of(&mut ctx, &["b", "c"]);
    let fresh_entry = fresh.push(&mut ctx, queue).unwrap();
    assert_ne!(old, fresh);
    assert_ne!(old_entry, fresh_entry);

    assert!(!old.is_valid(&ctx));
    let other = queue_of(&mut ctx, &["d"]);
    assert!(matches!(
        old.push(&mut ctx, other),
        Err(QueueError::Absent)
    ));
    assert_eq!(old.len(&ctx), 0);
    assert_eq!(old.merge_all(&mut ctx, SortOrder::Ascending), 0);
    assert_eq!(old_entry.queue(&ctx), None);
    assert_eq!(old_entry.size(&ctx), 0);
    assert_eq!(old_entry.id(&ctx), None);

    assert_eq!(fresh.len(&ctx), 1);
    assert_eq!(fresh_entry.size(&ctx), 2);
    assert_eq!(queue.values(&ctx), vec!["b", "c"]);
}

#[test]
fn test_merge_all_against_std() {
    let mut rng = StdRng::seed_from_u64(0x6e0);
    let alphabet = ["ant", "bee", "cat", "dog", "eel", "fox"];

    for _ in 0..100 {
        let mut ctx = QueueContext::new();
        let group = Group::new(&mut ctx).unwrap();
        let order = if rng.random_bool(0.5) {
            SortOrder::Ascending
        } else {
            SortOrder::Descending
        };

        let count = rng.random_range(1..=8);
        let mut expected = Vec::new();
        let mut queues = Vec::new();
        for _ in 0..count {
            let values = random_values(&mut rng, 10, &alphabet);
            expected.extend(values.iter().cloned());
            let queue = queue_of_strings(&mut ctx, &values);
            queue.sort(&mut ctx, order).unwrap();
            group.push(&mut ctx, queue).unwrap();
            queues.push(queue);
        }
        expected.sort();
        if order == SortOrder::Descending {
            expected.reverse();
        }

        let size = group.merge_all(&mut ctx, order);

        assert_eq!(size, expected.len());
        assert_eq!(snapshot(&ctx, queues[0]), expected);
        for queue in &queues[1..] {
            assert!(queue.is_empty(&ctx));
        }
        group.verify(&ctx).unwrap();
        for entry in group.entries(&ctx).skip(1) {
            assert_eq!(entry.size(&ctx), 0);
        }
    }
}
