//! Comparator-driven sorting routines applied to store snapshots.

use std::cmp::Ordering;

/// In-place quicksort using the Lomuto partition scheme with the last
/// element of each range as pivot. Not stable; quadratic on input that is
/// already sorted.
pub fn quick_sort<T, F>(items: &mut [T], mut cmp: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    quick_sort_range(items, &mut cmp);
}

fn quick_sort_range<T, F>(items: &mut [T], cmp: &mut F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    // Recurse into the smaller side, loop on the larger one.
    let mut range = items;
    while range.len() > 1 {
        let pivot = partition(range, cmp);
        let (left, rest) = std::mem::take(&mut range).split_at_mut(pivot);
        let right = &mut rest[1..];

        if left.len() < right.len() {
            quick_sort_range(left, cmp);
            range = right;
        } else {
            quick_sort_range(right, cmp);
            range = left;
        }
    }
}

fn partition<T, F>(items: &mut [T], cmp: &mut F) -> usize
where
    F: FnMut(&T, &T) -> Ordering,
{
    let high = items.len() - 1;
    let mut store = 0;

    for j in 0..high {
        if cmp(&items[j], &items[high]) != Ordering::Greater {
            items.swap(store, j);
            store += 1;
        }
    }

    items.swap(store, high);
    store
}

/// Top-down merge sort. Stable: on ties the element from the left half wins.
pub fn merge_sort<T, F>(items: &mut Vec<T>, mut cmp: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    let input = std::mem::take(items);
    *items = merge_sort_owned(input, &mut cmp);
}

fn merge_sort_owned<T, F>(mut items: Vec<T>, cmp: &mut F) -> Vec<T>
where
    F: FnMut(&T, &T) -> Ordering,
{
    if items.len() < 2 {
        return items;
    }

    let right = items.split_off(items.len() / 2);
    let left = merge_sort_owned(items, cmp);
    let right = merge_sort_owned(right, cmp);
    merge(left, right, cmp)
}

fn merge<T, F>(left: Vec<T>, right: Vec<T>, cmp: &mut F) -> Vec<T>
where
    F: FnMut(&T, &T) -> Ordering,
{
    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();

    loop {
        let take_left = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => cmp(l, r) != Ordering::Greater,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => break,
        };
        let next = if take_left { left.next() } else { right.next() };
        merged.extend(next);
    }

    merged
}
