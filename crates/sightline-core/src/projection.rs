//! World-to-screen projection.

use glam::{Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::memory::{FromRemote, ReadMemory, RemoteAddr};

/// Clip-space `w` below this is behind or on the camera plane.
pub const W_EPSILON: f32 = 0.01;

/// Row-major 4x4 world-to-clip transform, as stored by the target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewMatrix(pub [[f32; 4]; 4]);

impl ViewMatrix {
    pub const IDENTITY: Self = Self([
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]);

    pub fn row(&self, index: usize) -> Vec4 {
        Vec4::from_array(self.0[index])
    }
}

impl Default for ViewMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl FromRemote for ViewMatrix {
    const SIZE: usize = 64;

    fn from_le_slice(bytes: &[u8]) -> Self {
        let mut rows = [[0.0f32; 4]; 4];
        for (i, value) in rows.iter_mut().flatten().enumerate() {
            *value = f32::from_le_slice(&bytes[i * 4..i * 4 + 4]);
        }
        Self(rows)
    }
}

/// Supplies the view matrix for a cycle.
pub trait ViewMatrixSource {
    fn capture(&self) -> Result<ViewMatrix>;
}

/// Reads the view matrix stored at a fixed address in the target.
pub struct RemoteViewMatrix<'a, R: ReadMemory + ?Sized> {
    reader: &'a R,
    address: RemoteAddr,
}

impl<'a, R: ReadMemory + ?Sized> RemoteViewMatrix<'a, R> {
    pub fn new(reader: &'a R, address: RemoteAddr) -> Self {
        Self { reader, address }
    }
}

impl<R: ReadMemory + ?Sized> ViewMatrixSource for RemoteViewMatrix<'_, R> {
    fn capture(&self) -> Result<ViewMatrix> {
        self.reader.read(self.address)
    }
}

/// Screen size in pixels; origin is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Size of the primary display.
    #[cfg(target_os = "windows")]
    pub fn primary_screen() -> Option<Self> {
        use windows::Win32::UI::WindowsAndMessaging::{GetSystemMetrics, SM_CXSCREEN, SM_CYSCREEN};

        // SAFETY: GetSystemMetrics has no preconditions.
        let (width, height) = unsafe { (GetSystemMetrics(SM_CXSCREEN), GetSystemMetrics(SM_CYSCREEN)) };
        (width > 0 && height > 0).then(|| Self::new(width as f32, height as f32))
    }

    #[cfg(not(target_os = "windows"))]
    pub fn primary_screen() -> Option<Self> {
        None
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Inclusive bounds check against `[0, width] x [0, height]`.
    pub fn contains(&self, point: Vec2) -> bool {
        (0.0..=self.width).contains(&point.x) && (0.0..=self.height).contains(&point.y)
    }
}

/// Projects world points using one view matrix snapshot.
///
/// A projector is built once per cycle, so every point of a frame shares the
/// same matrix.
#[derive(Debug, Clone, Copy)]
pub struct ScreenProjector {
    matrix: ViewMatrix,
    viewport: Viewport,
}

impl ScreenProjector {
    pub fn new(matrix: ViewMatrix, viewport: Viewport) -> Self {
        Self { matrix, viewport }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Screen position of `point`, or `None` when the point is behind or on
    /// the camera plane. `None` is a hard exclusion, never a clamp.
    pub fn project(&self, point: Vec3) -> Option<Vec2> {
        let p = point.extend(1.0);
        let w = self.matrix.row(3).dot(p);
        if w < W_EPSILON {
            return None;
        }

        let ndc = Vec2::new(self.matrix.row(0).dot(p), self.matrix.row(1).dot(p)) / w;
        let Viewport { width, height } = self.viewport;
        Some(Vec2::new(
            width / 2.0 + 0.5 * ndc.x * width,
            height / 2.0 - 0.5 * ndc.y * height,
        ))
    }

    /// Like [`project`](Self::project), but also `None` outside the viewport.
    pub fn project_on_screen(&self, point: Vec3) -> Option<Vec2> {
        self.project(point).filter(|p| self.viewport.contains(*p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MockMemoryBuilder;

    fn viewport() -> Viewport {
        Viewport::new(1920.0, 1080.0)
    }

    #[test]
    fn test_origin_projects_to_center() {
        for (w, h) in [(1920.0, 1080.0), (800.0, 600.0), (1.0, 1.0)] {
            let vp = Viewport::new(w, h);
            let projector = ScreenProjector::new(ViewMatrix::IDENTITY, vp);
            assert_eq!(projector.project(Vec3::new(0.0, 0.0, 5.0)), Some(vp.center()));
        }
    }

    #[test]
    fn test_y_axis_is_inverted() {
        let projector = ScreenProjector::new(ViewMatrix::IDENTITY, viewport());
        let p = projector.project(Vec3::new(0.5, 0.5, 0.0)).unwrap();
        assert_eq!(p, Vec2::new(1440.0, 270.0));
    }

    #[test]
    fn test_perspective_divide() {
        let mut m = ViewMatrix::IDENTITY;
        // w = z
        m.0[3] = [0.0, 0.0, 1.0, 0.0];
        let projector = ScreenProjector::new(m, viewport());

        let near = projector.project(Vec3::new(1.0, 0.0, 2.0)).unwrap();
        let far = projector.project(Vec3::new(1.0, 0.0, 4.0)).unwrap();
        assert_eq!(near.x, 960.0 + 0.5 * 0.5 * 1920.0);
        assert_eq!(far.x, 960.0 + 0.5 * 0.25 * 1920.0);
    }

    #[test]
    fn test_behind_camera_is_rejected() {
        let mut m = ViewMatrix::IDENTITY;
        m.0[3] = [0.0, 0.0, 1.0, 0.0];
        let projector = ScreenProjector::new(m, viewport());

        assert_eq!(projector.project(Vec3::new(0.0, 0.0, -1.0)), None);
        assert_eq!(projector.project(Vec3::new(0.0, 0.0, 0.0)), None);
        assert_eq!(projector.project(Vec3::new(0.0, 0.0, 0.009)), None);
        assert!(projector.project(Vec3::new(0.0, 0.0, W_EPSILON)).is_some());
    }

    #[test]
    fn test_projection_is_deterministic() {
        let m = ViewMatrix([
            [0.5, 0.1, 0.0, 3.0],
            [0.0, 0.7, 0.2, -1.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.01, 0.0, 0.02, 1.5],
        ]);
        let projector = ScreenProjector::new(m, viewport());
        let point = Vec3::new(120.0, -40.0, 64.0);
        let first = projector.project(point);
        assert!(first.is_some());
        for _ in 0..10 {
            assert_eq!(projector.project(point), first);
        }
    }

    #[test]
    fn test_project_on_screen_bounds() {
        let projector = ScreenProjector::new(ViewMatrix::IDENTITY, viewport());
        assert!(projector.project_on_screen(Vec3::new(1.0, -1.0, 0.0)).is_some());
        assert!(projector.project_on_screen(Vec3::new(1.5, 0.0, 0.0)).is_none());
        assert!(projector.project_on_screen(Vec3::new(0.0, 1.01, 0.0)).is_none());
    }

    #[test]
    fn test_remote_view_matrix_reads_row_major() {
        let values: Vec<f32> = (0..16).map(|i| i as f32).collect();
        let reader = MockMemoryBuilder::new()
            .write_f32_array(0x4000, &values)
            .build();

        let source = RemoteViewMatrix::new(&reader, RemoteAddr::new(0x4000));
        let m = source.capture().unwrap();
        assert_eq!(m.0[0], [0.0, 1.0, 2.0, 3.0]);
        assert_eq!(m.0[3], [12.0, 13.0, 14.0, 15.0]);
        assert_eq!(m.row(1), Vec4::new(4.0, 5.0, 6.0, 7.0));
    }
}
