//! The sampling capability consumed by caches and generators

use std::sync::Arc;

/// A deterministic noise function over 2-D or 3-D space.
///
/// Implementations must return the same value for the same `(seed, coords)`
/// every time and must be callable from many threads at once. Wrappers such as
/// caches rely on this and never re-check it.
pub trait Sampler: Send + Sync {
    /// Sample a horizontal plane
    fn sample_2d(&self, seed: i64, x: f64, z: f64) -> f64;

    /// Sample a volume
    fn sample_3d(&self, seed: i64, x: f64, y: f64, z: f64) -> f64;
}

impl<S: Sampler + ?Sized> Sampler for &S {
    #[inline]
    fn sample_2d(&self, seed: i64, x: f64, z: f64) -> f64 {
        (**self).sample_2d(seed, x, z)
    }

    #[inline]
    fn sample_3d(&self, seed: i64, x: f64, y: f64, z: f64) -> f64 {
        (**self).sample_3d(seed, x, y, z)
    }
}

impl<S: Sampler + ?Sized> Sampler for Box<S> {
    #[inline]
    fn sample_2d(&self, seed: i64, x: f64, z: f64) -> f64 {
        (**self).sample_2d(seed, x, z)
    }

    #[inline]
    fn sample_3d(&self, seed: i64, x: f64, y: f64, z: f64) -> f64 {
        (**self).sample_3d(seed, x, y, z)
    }
}

impl<S: Sampler + ?Sized> Sampler for Arc<S> {
    #[inline]
    fn sample_2d(&self, seed: i64, x: f64, z: f64) -> f64 {
        (**self).sample_2d(seed, x, z)
    }

    #[inline]
    fn sample_3d(&self, seed: i64, x: f64, y: f64, z: f64) -> f64 {
        (**self).sample_3d(seed, x, y, z)
    }
}

/// Sampler built from a pair of plain functions
pub struct FnSampler<F2, F3> {
    f2: F2,
    f3: F3,
}

impl<F2, F3> FnSampler<F2, F3>
where
    F2: Fn(i64, f64, f64) -> f64 + Send + Sync,
    F3: Fn(i64, f64, f64, f64) -> f64 + Send + Sync,
{
    pub fn new(f2: F2, f3: F3) -> Self {
        Self { f2, f3 }
    }
}

impl<F2, F3> Sampler for FnSampler<F2, F3>
where
    F2: Fn(i64, f64, f64) -> f64 + Send + Sync,
    F3: Fn(i64, f64, f64, f64) -> f64 + Send + Sync,
{
    #[inline]
    fn sample_2d(&self, seed: i64, x: f64, z: f64) -> f64 {
        (self.f2)(seed, x, z)
    }

    #[inline]
    fn sample_3d(&self, seed: i64, x: f64, y: f64, z: f64) -> f64 {
        (self.f3)(seed, x, y, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear() -> FnSampler<impl Fn(i64, f64, f64) -> f64 + Send + Sync, impl Fn(i64, f64, f64, f64) -> f64 + Send + Sync> {
        FnSampler::new(
            |seed, x, z| seed as f64 + x * 2.0 + z * 3.0,
            |seed, x, y, z| seed as f64 + x * 2.0 + y * 5.0 + z * 3.0,
        )
    }

    #[test]
    fn test_fn_sampler() {
        let s = linear();
        assert_eq!(s.sample_2d(1, 1.0, 1.0), 6.0);
        assert_eq!(s.sample_3d(1, 1.0, 1.0, 1.0), 11.0);
    }

    #[test]
    fn test_forwarding_impls() {
        let shared: Arc<dyn Sampler> = Arc::new(linear());
        assert_eq!(shared.sample_2d(0, 2.0, 0.0), 4.0);

        let boxed: Box<dyn Sampler> = Box::new(linear());
        assert_eq!(boxed.sample_3d(0, 0.0, 1.0, 0.0), 5.0);

        let s = linear();
        let by_ref = &s;
        assert_eq!(Sampler::sample_2d(&by_ref, 0, 0.0, 1.0), 3.0);
    }
}
