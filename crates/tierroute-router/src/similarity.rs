// SPDX-FileCopyrightText: 2026 TierRoute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cosine similarity in double precision.

/// `dot(a, b) / (|a| * |b|)`, accumulated in `f64`.
///
/// A zero-norm input or a length mismatch yields 0.0, so such a vector never
/// matches anything.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 || !denom.is_finite() {
        return 0.0;
    }
    dot / denom
}
