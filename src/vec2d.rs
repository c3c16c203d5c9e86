// Generic 2D vector shared by the motor kinematics and the vision frames

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Sub, SubAssign};

/// Plain 2D value type, compared component-wise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Vector2D<T> {
    pub x: T,
    pub y: T,
}

/// Float vector used for velocity intents
pub type V2Float = Vector2D<f32>;
/// Signed integer vector
pub type V2Int = Vector2D<i32>;

impl<T> Vector2D<T> {
    pub const fn new(x: T, y: T) -> Self {
        Self { x, y }
    }
}

impl<T: Copy> Vector2D<T> {
    /// Returns the components as [x, y]
    pub fn as_array(&self) -> [T; 2] {
        [self.x, self.y]
    }
}

impl<T> Vector2D<T>
where
    T: Copy + Add<Output = T> + Mul<Output = T>,
{
    pub fn dot(&self, other: &Self) -> T {
        self.x * other.x + self.y * other.y
    }
}

impl<T: Copy + Into<f64>> Vector2D<T> {
    /// Angle from the positive x axis in radians, `atan2(y, x)`
    pub fn angle(&self) -> f32 {
        let (x, y): (f64, f64) = (self.x.into(), self.y.into());
        y.atan2(x) as f32
    }

    /// Euclidean length
    pub fn mag(&self) -> f32 {
        let (x, y): (f64, f64) = (self.x.into(), self.y.into());
        x.hypot(y) as f32
    }
}

impl Vector2D<f32> {
    /// Build a vector from a heading (radians) and a length
    pub fn from_polar(angle: f32, magnitude: f32) -> Self {
        Self::new(magnitude * angle.cos(), magnitude * angle.sin())
    }
}

impl Vector2D<f64> {
    pub fn from_polar(angle: f64, magnitude: f64) -> Self {
        Self::new(magnitude * angle.cos(), magnitude * angle.sin())
    }
}

impl<T> From<[T; 2]> for Vector2D<T> {
    fn from([x, y]: [T; 2]) -> Self {
        Self { x, y }
    }
}

impl<T> From<(T, T)> for Vector2D<T> {
    fn from((x, y): (T, T)) -> Self {
        Self { x, y }
    }
}

// Renders as "(x, y)"; a precision (e.g. `{:.2}`) applies to both components
impl<T: fmt::Display> fmt::Display for Vector2D<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match f.precision() {
            Some(p) => write!(f, "({:.*}, {:.*})", p, self.x, p, self.y),
            None => write!(f, "({}, {})", self.x, self.y),
        }
    }
}

macro_rules! impl_componentwise {
    ($trait:ident, $method:ident, $assign_trait:ident, $assign_method:ident, $op:tt) => {
        impl<T: $trait<Output = T>> $trait for Vector2D<T> {
            type Output = Self;

            fn $method(self, rhs: Self) -> Self {
                Self::new(self.x $op rhs.x, self.y $op rhs.y)
            }
        }

        impl<T: $trait<Output = T> + Copy> $assign_trait for Vector2D<T> {
            fn $assign_method(&mut self, rhs: Self) {
                self.x = self.x $op rhs.x;
                self.y = self.y $op rhs.y;
            }
        }
    };
}

impl_componentwise!(Add, add, AddAssign, add_assign, +);
impl_componentwise!(Sub, sub, SubAssign, sub_assign, -);
impl_componentwise!(Mul, mul, MulAssign, mul_assign, *);
impl_componentwise!(Div, div, DivAssign, div_assign, /);

impl<T: Mul<Output = T> + Copy> Vector2D<T> {
    /// Multiply both components by a scalar
    pub fn scale(self, factor: T) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_componentwise_arithmetic() {
        let a = V2Int::new(3, -4);
        let b = V2Int::new(1, 2);

        assert_eq!(a + b, V2Int::new(4, -2));
        assert_eq!(a - b, V2Int::new(2, -6));
        assert_eq!(a * b, V2Int::new(3, -8));
        assert_eq!(a / b, V2Int::new(3, -2));

        let mut c = a;
        c += b;
        c *= V2Int::new(2, 2);
        assert_eq!(c, V2Int::new(8, -4));
        c -= b;
        c /= V2Int::new(7, 3);
        assert_eq!(c, V2Int::new(1, -2));
    }

    #[test]
    fn test_dot_mag_angle() {
        let v = V2Int::new(3, 4);
        assert_eq!(v.dot(&V2Int::new(2, -1)), 2);
        assert!(close(v.mag(), 5.0));
        assert!(close(V2Float::new(0.0, 2.0).angle(), FRAC_PI_2));
        assert!(close(V2Float::new(-1.0, 0.0).angle(), PI));
    }

    #[test]
    fn test_from_polar() {
        let v = V2Float::from_polar(FRAC_PI_2, 10.0);
        assert!(close(v.x, 0.0), "x was {}", v.x);
        assert!(close(v.y, 10.0), "y was {}", v.y);

        let w = V2Float::from_polar(PI / 4.0, 2.0_f32.sqrt());
        assert!(close(w.x, 1.0) && close(w.y, 1.0));
    }

    #[test]
    fn test_display() {
        assert_eq!(Vector2D::<u16>::new(90, 70).to_string(), "(90, 70)");
        assert_eq!(V2Int::new(-3, 5).to_string(), "(-3, 5)");
        assert_eq!(format!("{:.2}", V2Float::new(1.0, -0.5)), "(1.00, -0.50)");
    }

    #[test]
    fn test_conversions() {
        assert_eq!(V2Int::from([1, 2]), V2Int::new(1, 2));
        assert_eq!(V2Int::from((5, 6)).as_array(), [5, 6]);
        assert_eq!(V2Int::new(2, -3).scale(3), V2Int::new(6, -9));
    }
}
