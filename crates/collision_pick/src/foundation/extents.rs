//! Axis-aligned extents accumulated from point sets

use super::math::Vec3;

/// Axis-aligned bounding box grown one point at a time
///
/// Starts empty (inverted bounds); an empty box reports a zero size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extents {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl Default for Extents {
    fn default() -> Self {
        Self::empty()
    }
}

impl Extents {
    /// Create an empty box that any point will grow
    pub fn empty() -> Self {
        Self {
            min: Vec3::repeat(f32::MAX),
            max: Vec3::repeat(-f32::MAX),
        }
    }

    /// Build extents covering every point in `points`
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Vec3>) -> Self {
        let mut extents = Self::empty();
        for point in points {
            extents.add_point(point);
        }
        extents
    }

    /// True until a point has been added
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x
    }

    /// Grow the box to contain `point`
    pub fn add_point(&mut self, point: &Vec3) {
        self.min = self.min.inf(point);
        self.max = self.max.sup(point);
    }

    /// Size of the box on each axis
    pub fn size(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::zeros()
        } else {
            self.max - self.min
        }
    }
}
