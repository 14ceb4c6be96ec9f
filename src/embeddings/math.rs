// Vector math shared by the embedding-backed metrics.
//
// Embedding tables store f32 (the word2vec convention), but every
// accumulation happens in f64 so long sums over a full vocabulary don't
// drift.

/// Cosine similarity between two vectors, in [-1.0, 1.0].
///
/// Returns 0.0 for mismatched or empty inputs and whenever either vector
/// has zero magnitude, so a degenerate centroid never produces NaN.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let mag_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let mag_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    if mag_a == 0.0 || mag_b == 0.0 {
        0.0
    } else {
        // Divide twice so tiny norms don't underflow in their product
        (dot / mag_a / mag_b).clamp(-1.0, 1.0)
    }
}

/// Cosine similarity between two raw f32 embedding rows.
pub fn cosine_similarity_f32(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0_f64;
    let mut mag_a = 0.0_f64;
    let mut mag_b = 0.0_f64;
    for (&x, &y) in a.iter().zip(b.iter()) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        mag_a += x * x;
        mag_b += y * y;
    }

    if mag_a == 0.0 || mag_b == 0.0 {
        0.0
    } else {
        (dot / mag_a.sqrt() / mag_b.sqrt()).clamp(-1.0, 1.0)
    }
}

/// Cosine distance, `1 - cosine_similarity`, in [0.0, 2.0].
pub fn cosine_distance(a: &[f64], b: &[f64]) -> f64 {
    1.0 - cosine_similarity(a, b)
}

/// Add `weight * row` into `acc` element-wise.
pub fn accumulate(acc: &mut [f64], row: &[f32], weight: f64) {
    for (slot, &val) in acc.iter_mut().zip(row.iter()) {
        *slot += f64::from(val) * weight;
    }
}

/// Divide every element of `acc` by `denom` in place.
///
/// Returns false (leaving `acc` untouched) when `denom` is zero, so the
/// caller can treat the vector as undefined instead of filling it with NaN.
pub fn normalize_by(acc: &mut [f64], denom: f64) -> bool {
    if denom == 0.0 {
        return false;
    }
    for val in acc.iter_mut() {
        *val /= denom;
    }
    true
}
