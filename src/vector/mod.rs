//! Vector similarity for profile embeddings

use ndarray::ArrayView1;

/// Cosine similarity of two vectors, in `[-1, 1]`.
///
/// Returns 0 when the lengths differ or either vector has zero norm, so a
/// neutral (all-zero) embedding never contributes to a score.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let va = ArrayView1::from(a);
    let vb = ArrayView1::from(b);

    let dot = va.dot(&vb) as f64;
    let norm_a = (va.dot(&va) as f64).sqrt();
    let norm_b = (vb.dot(&vb) as f64).sqrt();

    if norm_a <= 0.0 || norm_b <= 0.0 {
        return 0.0;
    }

    (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

/// Cosine similarity of two optional embeddings; absent on either side is 0.
pub fn optional_cosine_similarity(a: Option<&[f32]>, b: Option<&[f32]>) -> f64 {
    match (a, b) {
        (Some(a), Some(b)) => cosine_similarity(a, b),
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_basic() {
        let v1 = [1.0, 0.0];
        let v2 = [0.0, 1.0];
        let v3 = [2.0, 0.0];

        assert!((cosine_similarity(&v1, &v2) - 0.0).abs() < 1e-9);
        assert!((cosine_similarity(&v1, &v3) - 1.0).abs() < 1e-9);
        assert!((cosine_similarity(&v1, &[-1.0, 0.0]) + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_inputs_score_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(optional_cosine_similarity(None, Some(&[1.0f32][..])), 0.0);

        let v = [1.0f32, 1.0];
        assert!((optional_cosine_similarity(Some(&v[..]), Some(&v[..])) - 1.0).abs() < 1e-9);
    }
}
