//! Pinhole camera for primary ray generation.

use kiln_math::{is_zero, MathError, Point3, Ray, Vector};
use thiserror::Error;

/// Errors raised while building or turning a camera.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum CameraError {
    #[error(transparent)]
    Math(#[from] MathError),

    #[error("camera `to` and `up` vectors must be orthogonal")]
    NotOrthogonal,
}

/// Result alias for camera construction.
pub type CameraResult<T> = Result<T, CameraError>;

/// Something that maps pixels of an `nx` by `ny` image to primary rays.
pub trait RaySource: Sync {
    fn ray_through_pixel(&self, nx: u32, ny: u32, col: u32, row: u32) -> Ray;
}

/// Camera with an orthonormal `to`/`up`/`right` frame and a view plane at
/// `distance` in front of the location.
#[derive(Debug, Clone)]
pub struct Camera {
    location: Point3,
    to: Vector,
    up: Vector,
    right: Vector,
    width: f64,
    height: f64,
    distance: f64,
}

impl Camera {
    /// Create a camera. `right` is derived as `to x up`.
    pub fn new(location: Point3, to: Vector, up: Vector) -> CameraResult<Self> {
        if !is_zero(to.dot(&up)) {
            return Err(CameraError::NotOrthogonal);
        }
        let to = to.normalized();
        let up = up.normalized();
        let right = to.cross(&up)?.normalized();

        Ok(Self {
            location,
            to,
            up,
            right,
            width: 1.0,
            height: 1.0,
            distance: 1.0,
        })
    }

    /// Set the view plane size in scene units.
    pub fn with_view_plane(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the distance from the location to the view plane.
    pub fn with_distance(mut self, distance: f64) -> Self {
        self.distance = distance;
        self
    }

    /// Camera position.
    pub fn location(&self) -> Point3 {
        self.location
    }

    /// Unit forward direction.
    pub fn to(&self) -> Vector {
        self.to
    }

    /// Unit up direction.
    pub fn up(&self) -> Vector {
        self.up
    }

    /// Unit right direction (`to x up`).
    pub fn right(&self) -> Vector {
        self.right
    }

    /// Translate along the camera's own right, up and forward axes.
    pub fn move_by(mut self, right: f64, up: f64, forward: f64) -> Self {
        let offset = self.right.as_dvec() * right + self.up.as_dvec() * up + self.to.as_dvec() * forward;
        self.location = self.location.translate(offset);
        self
    }

    /// Rotate about `right`; positive angles tilt the view up.
    pub fn pitch(mut self, degrees: f64) -> CameraResult<Self> {
        self.to = self.to.rotate(&self.right, degrees)?;
        self.up = self.up.rotate(&self.right, degrees)?;
        Ok(self)
    }

    /// Rotate about `up`; positive angles turn the view left.
    pub fn yaw(mut self, degrees: f64) -> CameraResult<Self> {
        self.to = self.to.rotate(&self.up, degrees)?;
        self.right = self.right.rotate(&self.up, degrees)?;
        Ok(self)
    }

    /// Rotate about `to`; positive angles roll the up vector toward the right.
    pub fn roll(mut self, degrees: f64) -> CameraResult<Self> {
        self.up = self.up.rotate(&self.to, degrees)?;
        self.right = self.right.rotate(&self.to, degrees)?;
        Ok(self)
    }
}

impl RaySource for Camera {
    fn ray_through_pixel(&self, nx: u32, ny: u32, col: u32, row: u32) -> Ray {
        let rx = self.width / nx as f64;
        let ry = self.height / ny as f64;
        let xj = (col as f64 - (nx as f64 - 1.0) / 2.0) * rx;
        let yi = -(row as f64 - (ny as f64 - 1.0) / 2.0) * ry;

        let through = self.to.as_dvec() * self.distance
            + self.right.as_dvec() * xj
            + self.up.as_dvec() * yi;
        Ray::new(self.location, Vector::from_dvec(through).unwrap_or(self.to))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        Camera::new(Point3::ZERO, -Vector::Z, Vector::Y)
            .unwrap()
            .with_view_plane(3.0, 3.0)
            .with_distance(10.0)
    }

    #[test]
    fn test_right_hand_frame() {
        assert_eq!(camera().right(), Vector::X);
    }

    #[test]
    fn test_rejects_non_orthogonal() {
        let err = Camera::new(Point3::ZERO, -Vector::Z, Vector::new(0.0, 1.0, 1.0).unwrap()).unwrap_err();
        assert_eq!(err, CameraError::NotOrthogonal);
    }

    #[test]
    fn test_center_pixel_looks_forward() {
        let ray = camera().ray_through_pixel(3, 3, 1, 1);
        assert_eq!(ray.origin(), Point3::ZERO);
        assert_eq!(ray.direction(), -Vector::Z);
    }

    #[test]
    fn test_corner_pixels() {
        let c = camera();
        assert_eq!(
            c.ray_through_pixel(3, 3, 0, 0).direction(),
            Vector::new(-1.0, 1.0, -10.0).unwrap().normalized()
        );
        assert_eq!(
            c.ray_through_pixel(3, 3, 2, 2).direction(),
            Vector::new(1.0, -1.0, -10.0).unwrap().normalized()
        );
        // even resolution: the view plane centre falls between pixels
        assert_eq!(
            c.ray_through_pixel(4, 4, 1, 1).direction(),
            Vector::new(-0.375, 0.375, -10.0).unwrap().normalized()
        );
    }

    #[test]
    fn test_move_by() {
        let c = camera().move_by(1.0, 2.0, 3.0);
        assert_eq!(c.location(), Point3::new(1.0, 2.0, -3.0));
    }

    #[test]
    fn test_yaw_turns_left() {
        let c = camera().yaw(90.0).unwrap();
        assert_eq!(c.to(), -Vector::X);
        assert_eq!(c.right(), -Vector::Z);
        assert_eq!(c.up(), Vector::Y);
    }

    #[test]
    fn test_pitch_tilts_up() {
        let c = camera().pitch(90.0).unwrap();
        assert_eq!(c.to(), Vector::Y);
        assert_eq!(c.up(), Vector::Z);
        assert_eq!(c.right(), Vector::X);
    }

    #[test]
    fn test_roll() {
        let c = camera().roll(90.0).unwrap();
        assert_eq!(c.to(), -Vector::Z);
        assert_eq!(c.up(), Vector::X);
        assert_eq!(c.right(), -Vector::Y);
    }
}
