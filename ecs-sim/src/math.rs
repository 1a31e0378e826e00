// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! 2D vector math
//!
//! Single-precision to match the renderer's coordinate space.

use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// A 2D vector in screen units
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    /// Horizontal component
    pub x: f32,
    /// Vertical component (grows downwards, as on screen)
    pub y: f32,
}

impl Vec2 {
    /// The zero vector
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    /// Create a new vector
    pub const fn new(x: f32, y: f32) -> Self {
        Vec2 { x, y }
    }

    /// Dot product
    pub fn dot(self, other: Vec2) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// Multiply both components by a scalar
    pub fn scale(self, scalar: f32) -> Vec2 {
        Vec2::new(self.x * scalar, self.y * scalar)
    }

    /// Component-wise negation
    pub fn invert(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }

    /// Component-wise square
    pub fn square(self) -> Vec2 {
        Vec2::new(self.x * self.x, self.y * self.y)
    }

    /// Euclidean length
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Check if both components are finite (not NaN or infinite)
    pub fn is_valid(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        self.scale(rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;

    fn neg(self) -> Vec2 {
        self.invert()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec2_arithmetic() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(3.0, -4.0);

        assert_eq!(a + b, Vec2::new(4.0, -2.0));
        assert_eq!(a - b, Vec2::new(-2.0, 6.0));
        assert_eq!(a * 2.0, Vec2::new(2.0, 4.0));
        assert_eq!(-a, Vec2::new(-1.0, -2.0));
    }

    #[test]
    fn test_vec2_dot_and_length() {
        let v = Vec2::new(3.0, 4.0);
        assert_eq!(v.dot(v), 25.0);
        assert_eq!(v.length(), 5.0);
        assert_eq!(v.square(), Vec2::new(9.0, 16.0));
    }

    #[test]
    fn test_vec2_validation() {
        assert!(Vec2::new(1.0, 2.0).is_valid());
        assert!(!Vec2::new(f32::NAN, 0.0).is_valid());
        assert!(!Vec2::new(0.0, f32::INFINITY).is_valid());
    }
}
