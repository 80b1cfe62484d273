//! Row helpers shared by every list section of the project form.
//!
//! Both helpers return a new `Vec` and leave the input untouched, so a
//! section can never alias rows handed in by the caller.

pub fn append<T: Clone>(items: &[T], item: T) -> Vec<T> {
    let mut rows = Vec::with_capacity(items.len() + 1);
    rows.extend_from_slice(items);
    rows.push(item);
    rows
}

/// Returns `items` without the row at `index`. `None` when `index` is out
/// of range.
pub fn remove_at<T: Clone>(items: &[T], index: usize) -> Option<Vec<T>> {
    if index >= items.len() {
        return None;
    }

    Some(
        items
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, item)| item.clone())
            .collect(),
    )
}
