//! Dense weight vectors over a fitted vocabulary.

use std::ops::Index;

use serde::{Deserialize, Serialize};

/// Dense term-weight vector, one component per vocabulary term.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector(Vec<f64>);

impl Vector {
    #[must_use]
    pub fn zeros(len: usize) -> Self {
        Self(vec![0.0; len])
    }

    #[must_use]
    pub fn from_weights(weights: Vec<f64>) -> Self {
        Self(weights)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn weights(&self) -> &[f64] {
        &self.0
    }

    /// True when every component is exactly zero (including the empty vector).
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|w| *w == 0.0)
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|w| w.is_finite())
    }

    #[must_use]
    pub fn dot(&self, other: &Self) -> f64 {
        self.0.iter().zip(&other.0).map(|(a, b)| a * b).sum()
    }

    #[must_use]
    pub fn norm(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Scale to unit length in place. A zero vector is left untouched.
    pub fn normalize(&mut self) {
        let norm = self.norm();
        if norm > 0.0 {
            for w in &mut self.0 {
                *w /= norm;
            }
        }
    }

    /// Largest absolute component, 0.0 for the empty vector.
    #[must_use]
    pub fn max_abs(&self) -> f64 {
        self.0.iter().fold(0.0, |max, w| max.max(w.abs()))
    }

    /// Cosine of the angle between two vectors.
    ///
    /// Defined as 0.0 when either vector has zero magnitude. Each side is
    /// scaled by its largest component first, so huge weights cannot
    /// overflow the norms. Callers are expected to have checked that the
    /// lengths match.
    #[must_use]
    pub fn cosine(&self, other: &Self) -> f64 {
        let (sa, sb) = (self.max_abs(), other.max_abs());
        if sa == 0.0 || sb == 0.0 {
            return 0.0;
        }

        let (mut dot, mut na, mut nb) = (0.0, 0.0, 0.0);
        for (a, b) in self.0.iter().zip(&other.0) {
            let (a, b) = (a / sa, b / sb);
            dot += a * b;
            na += a * a;
            nb += b * b;
        }
        dot / (na.sqrt() * nb.sqrt())
    }

    /// Componentwise arithmetic mean of `vectors`, each of length `len`.
    ///
    /// An empty input yields a zero vector of length `len`.
    #[must_use]
    pub fn mean<'a, I>(vectors: I, len: usize) -> Self
    where
        I: IntoIterator<Item = &'a Self>,
    {
        let mut sum = vec![0.0; len];
        let mut count = 0usize;
        for vector in vectors {
            for (acc, w) in sum.iter_mut().zip(&vector.0) {
                *acc += w;
            }
            count += 1;
        }
        if count > 0 {
            let n = count as f64;
            for acc in &mut sum {
                *acc /= n;
            }
        }
        Self(sum)
    }
}

impl Index<usize> for Vector {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.0[index]
    }
}

impl From<Vec<f64>> for Vector {
    fn from(weights: Vec<f64>) -> Self {
        Self(weights)
    }
}
