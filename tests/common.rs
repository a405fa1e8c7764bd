#![allow(dead_code)]

use rand::{rngs::StdRng, Rng};
use ringq::{collections::ring::RingNodePtr, queue::Node, Queue, QueueContext};

pub fn queue_of(ctx: &mut QueueContext, values: &[&str]) -> Queue {
    let queue = Queue::new(ctx).unwrap();
    for value in values {
        queue.insert_tail(ctx, value).unwrap();
    }
    queue
}

pub fn queue_of_strings(ctx: &mut QueueContext, values: &[String]) -> Queue {
    let values: Vec<&str> = values.iter().map(String::as_str).collect();
    queue_of(ctx, &values)
}

pub fn snapshot(ctx: &QueueContext, queue: Queue) -> Vec<String> {
    queue.iter(ctx).map(str::to_string).collect()
}

pub fn nodes(ctx: &QueueContext, queue: Queue) -> Vec<Node> { queue.sentinel().iter(ctx).collect() }

/// Verify the ring, and that both directions agree.
pub fn assert_sound(ctx: &QueueContext, queue: Queue) {
    queue.verify(ctx).unwrap();
    let forward = snapshot(ctx, queue);
    let mut backward: Vec<String> = queue.iter(ctx).rev().map(str::to_string).collect();
    backward.reverse();
    assert_eq!(forward, backward);
    assert_eq!(queue.size(ctx), forward.len());
}

pub fn random_values(rng: &mut StdRng, max_len: usize, alphabet: &[&str]) -> Vec<String> {
    let len = rng.random_range(0..=max_len);
    (0..len)
        .map(|_| alphabet[rng.random_range(0..alphabet.len())].to_string())
        .collect()
}

pub fn oracle_delete_mid(values: &[String]) -> Vec<String> {
    let mut values = values.to_vec();
    if !values.is_empty() {
        values.remove(values.len() / 2);
    }
    values
}

pub fn oracle_delete_dup(values: &[String]) -> Vec<String> {
    values
        .iter()
        .enumerate()
        .filter(|(i, value)| {
            let left = *i > 0 && values[i - 1] == **value;
            let right = i + 1 < values.len() && values[i + 1] == **value;
            !left && !right
        })
        .map(|(_, value)| value.clone())
        .collect()
}

/// Keep the elements with no strictly smaller value anywhere to their right.
pub fn oracle_ascend(values: &[String]) -> Vec<String> {
    values
        .iter()
        .enumerate()
        .filter(|(i, value)| values[i + 1..].iter().all(|right| right >= *value))
        .map(|(_, value)| value.clone())
        .collect()
}

/// Keep the elements with no strictly greater value anywhere to their right.
pub fn oracle_descend(values: &[String]) -> Vec<String> {
    values
        .iter()
        .enumerate()
        .filter(|(i, value)| values[i + 1..].iter().all(|right| right <= *value))
        .map(|(_, value)| value.clone())
        .collect()
}

pub fn oracle_reverse_k(values: &[String], k: usize) -> Vec<String> {
    let mut out = Vec::with_capacity(values.len());
    for chunk in values.chunks(k) {
        if chunk.len() == k {
            out.extend(chunk.iter().rev().cloned());
        } else {
            out.extend(chunk.iter().cloned());
        }
    }
    out
}
