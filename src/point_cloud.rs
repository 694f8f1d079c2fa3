//! Flat position/color buffers for point primitives.

use glam::Vec3;

use crate::util::color::Color;

/// Two parallel flat buffers, one `(x, y, z)` and one linear-light
/// `(r, g, b)` triple per point.
///
/// Both buffers always hold exactly `3 * len()` values. They never share
/// storage.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PointCloud {
    positions: Vec<f32>,
    colors: Vec<f32>,
}

impl PointCloud {
    /// Empty cloud.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty cloud with room for `count` points.
    #[must_use]
    pub fn with_capacity(count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(count * 3),
            colors: Vec::with_capacity(count * 3),
        }
    }

    /// Append one point.
    pub fn push(&mut self, position: Vec3, color: Color) {
        self.positions.extend_from_slice(&position.to_array());
        self.colors.extend_from_slice(&color.to_array());
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len() / 3
    }

    /// Whether the cloud holds no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Flat position buffer, `3 * len()` values.
    #[must_use]
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// Flat color buffer, `3 * len()` values.
    #[must_use]
    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    /// Mutable position buffer for in-place animation. The length cannot
    /// change through this slice.
    pub fn positions_mut(&mut self) -> &mut [f32] {
        &mut self.positions
    }

    /// Iterate `(position, color)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Vec3, Color)> + '_ {
        self.positions
            .chunks_exact(3)
            .zip(self.colors.chunks_exact(3))
            .map(|(p, c)| (Vec3::from_slice(p), Color::new(c[0], c[1], c[2])))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_keeps_buffers_parallel() {
        let mut cloud = PointCloud::with_capacity(2);
        cloud.push(Vec3::new(1.0, 2.0, 3.0), Color::new(0.1, 0.2, 0.3));
        cloud.push(Vec3::new(-1.0, 0.0, 4.0), Color::WHITE);

        assert_eq!(cloud.len(), 2);
        assert_eq!(cloud.positions().len(), 6);
        assert_eq!(cloud.colors().len(), 6);
        assert_eq!(&cloud.positions()[3..], &[-1.0, 0.0, 4.0]);
        assert_eq!(&cloud.colors()[..3], &[0.1, 0.2, 0.3]);

        let pairs: Vec<_> = cloud.iter().collect();
        assert_eq!(pairs[1], (Vec3::new(-1.0, 0.0, 4.0), Color::WHITE));
    }

    #[test]
    fn new_cloud_is_empty() {
        let cloud = PointCloud::new();
        assert!(cloud.is_empty());
        assert_eq!(cloud.len(), 0);
        assert_eq!(cloud.iter().count(), 0);
    }
}
