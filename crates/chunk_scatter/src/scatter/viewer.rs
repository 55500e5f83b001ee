//! Sources of the viewer position polled once per tick.
//!
//! Besides closures, glam and `mint` vectors act as fixed viewers, so positions can
//! come from any math library that converts to `mint`.
use glam::{Vec2, Vec3};

/// Provides the world position the visible window is centered on.
pub trait ViewerSource {
    fn current_position(&self) -> Vec3;
}

impl ViewerSource for Vec3 {
    fn current_position(&self) -> Vec3 {
        *self
    }
}

impl ViewerSource for Vec2 {
    fn current_position(&self) -> Vec3 {
        self.extend(0.0)
    }
}

impl ViewerSource for mint::Vector3<f32> {
    fn current_position(&self) -> Vec3 {
        Vec3::from(*self)
    }
}

impl ViewerSource for mint::Vector2<f32> {
    fn current_position(&self) -> Vec3 {
        Vec2::from(*self).extend(0.0)
    }
}

impl<T: ViewerSource + ?Sized> ViewerSource for &T {
    fn current_position(&self) -> Vec3 {
        (**self).current_position()
    }
}

/// A viewer backed by a closure.
pub struct FnViewer<F>
where
    F: Fn() -> Vec3,
{
    f: F,
}

impl<F> FnViewer<F>
where
    F: Fn() -> Vec3,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> ViewerSource for FnViewer<F>
where
    F: Fn() -> Vec3,
{
    #[inline]
    fn current_position(&self) -> Vec3 {
        (self.f)()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn vectors_report_themselves() {
        assert_eq!(Vec3::new(1.0, 2.0, 3.0).current_position(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(Vec2::new(4.0, 5.0).current_position(), Vec3::new(4.0, 5.0, 0.0));
        let v = Vec2::ONE;
        assert_eq!((&v).current_position(), Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn mint_vectors_convert() {
        let v3 = mint::Vector3 { x: 1.0, y: -2.0, z: 0.5 };
        assert_eq!(v3.current_position(), Vec3::new(1.0, -2.0, 0.5));
        let v2 = mint::Vector2 { x: 7.0, y: 8.0 };
        assert_eq!(v2.current_position(), Vec3::new(7.0, 8.0, 0.0));
    }

    #[test]
    fn fn_viewer_polls_closure() {
        let x = Cell::new(0.0f32);
        let viewer = FnViewer::new(|| Vec3::new(x.get(), 0.0, 0.0));
        assert_eq!(viewer.current_position().x, 0.0);
        x.set(12.5);
        assert_eq!(viewer.current_position().x, 12.5);
    }
}
