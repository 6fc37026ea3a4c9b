//! One-dimensional gap-based clustering.
//!
//! Both routines sort items by a key and scan once, breaking clusters at
//! gaps. They differ only in what a candidate is compared against:
//! [`cluster_by_key`] uses the previous element's key, [`cluster_by_mean`]
//! uses the running mean of the open cluster, letting the cluster's
//! effective center drift with its members.

/// Default clustering tolerance.
pub const DEFAULT_TOLERANCE: f32 = 3.0;

/// Cluster items by key with a fixed gap rule.
///
/// Items are sorted by key ascending; a new cluster starts whenever the gap
/// to the **previous element's** key exceeds `tolerance`. Returns clusters
/// in ascending key order, each cluster sorted internally.
///
/// # Examples
///
/// ```
/// use layout_oxide::geometry::clustering::cluster_by_key;
///
/// let values = vec![1.0_f32, 2.0, 3.0, 10.0, 11.0];
/// let clusters = cluster_by_key(&values, |v| *v, 2.0);
/// assert_eq!(clusters.len(), 2);
/// assert_eq!(clusters[0], vec![1.0, 2.0, 3.0]);
/// assert_eq!(clusters[1], vec![10.0, 11.0]);
/// ```
pub fn cluster_by_key<T, F>(items: &[T], key: F, tolerance: f32) -> Vec<Vec<T>>
where
    T: Clone,
    F: Fn(&T) -> f32,
{
    if items.is_empty() {
        return vec![];
    }

    let mut sorted: Vec<T> = items.to_vec();
    sorted.sort_by(|a, b| key(a).total_cmp(&key(b)));

    let mut clusters: Vec<Vec<T>> = Vec::new();
    let mut current: Vec<T> = vec![sorted[0].clone()];
    let mut prev_key = key(&sorted[0]);

    for item in sorted.into_iter().skip(1) {
        let k = key(&item);
        if k - prev_key > tolerance {
            clusters.push(std::mem::take(&mut current));
        }
        current.push(item);
        prev_key = k;
    }
    clusters.push(current);
    clusters
}

/// Cluster items by key against the running cluster mean.
///
/// Identical scan to [`cluster_by_key`], but each candidate is compared to
/// the **mean** key of the open cluster rather than the previous element,
/// so the cluster's effective center drifts as members accumulate. The
/// mean is updated incrementally.
///
/// # Examples
///
/// ```
/// use layout_oxide::geometry::clustering::cluster_by_mean;
///
/// // 0, 2, 4: the value 4 is within 3 of the previous element (2) but
/// // more than 3 from the running mean (1), so it opens a new cluster.
/// let values = vec![0.0_f32, 2.0, 4.1];
/// let clusters = cluster_by_mean(&values, |v| *v, 3.0);
/// assert_eq!(clusters.len(), 2);
/// ```
pub fn cluster_by_mean<T, F>(items: &[T], key: F, tolerance: f32) -> Vec<Vec<T>>
where
    T: Clone,
    F: Fn(&T) -> f32,
{
    if items.is_empty() {
        return vec![];
    }

    let mut sorted: Vec<T> = items.to_vec();
    sorted.sort_by(|a, b| key(a).total_cmp(&key(b)));

    let mut clusters: Vec<Vec<T>> = Vec::new();
    let mut current: Vec<T> = Vec::new();
    let mut sum = 0.0_f32;

    for item in sorted {
        let k = key(&item);
        if !current.is_empty() {
            let mean = sum / current.len() as f32;
            if k - mean > tolerance {
                clusters.push(std::mem::take(&mut current));
                sum = 0.0;
            }
        }
        sum += k;
        current.push(item);
    }
    clusters.push(current);
    clusters
}
