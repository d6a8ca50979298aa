use glam::Vec3;
use ripple_waves::WaveField;

/// Field inspector for developer tooling.
///
/// Provides read-only queries against a wave field for debugging,
/// profiling, and development UI.
pub struct FieldInspector;

impl FieldInspector {
    /// Produce summary statistics of the current displacement.
    pub fn summary(field: &WaveField) -> FieldSummary {
        let heights = field.heights();
        let mut min_height = f32::INFINITY;
        let mut max_height = f32::NEG_INFINITY;
        let mut abs_sum = 0.0_f64;
        let mut sq_sum = 0.0_f64;
        for &y in heights {
            min_height = min_height.min(y);
            max_height = max_height.max(y);
            abs_sum += y.abs() as f64;
            sq_sum += (y as f64) * (y as f64);
        }
        FieldSummary {
            steps: field.step_count(),
            rows: field.row_count(),
            cols: field.column_count(),
            min_height,
            max_height,
            mean_abs_height: (abs_sum / heights.len() as f64) as f32,
            energy: 0.5 * sq_sum,
        }
    }

    /// Vertex data of one grid cell, `None` when the cell is off the grid.
    pub fn inspect_cell(field: &WaveField, row: usize, col: usize) -> Option<CellInfo> {
        let index = field.index_of(row, col).ok()?;
        Some(CellInfo {
            row,
            col,
            position: field.position(index).ok()?,
            normal: field.normal(index).ok()?,
            interior: field.is_interior(row, col),
        })
    }

    /// Cell with the largest absolute displacement.
    pub fn peak(field: &WaveField) -> Option<(usize, usize, f32)> {
        let cols = field.column_count();
        field
            .heights()
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.abs().total_cmp(&b.1.abs()))
            .map(|(i, &y)| (i / cols, i % cols, y))
    }
}

/// Summary of field state for the inspector.
#[derive(Debug, Clone)]
pub struct FieldSummary {
    pub steps: u64,
    pub rows: usize,
    pub cols: usize,
    pub min_height: f32,
    pub max_height: f32,
    pub mean_abs_height: f32,
    /// Half the sum of squared displacements.
    pub energy: f64,
}

impl std::fmt::Display for FieldSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Field: {}x{} step={} height=[{:.4}, {:.4}] mean|y|={:.5} energy={:.5}",
            self.rows,
            self.cols,
            self.steps,
            self.min_height,
            self.max_height,
            self.mean_abs_height,
            self.energy
        )
    }
}

/// Detailed info about a single grid cell.
#[derive(Debug, Clone)]
pub struct CellInfo {
    pub row: usize,
    pub col: usize,
    pub position: Vec3,
    pub normal: Vec3,
    pub interior: bool,
}

impl std::fmt::Display for CellInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cell ({}, {}) pos=({:.2}, {:.4}, {:.2}) normal=({:.3}, {:.3}, {:.3}){}",
            self.row,
            self.col,
            self.position.x,
            self.position.y,
            self.position.z,
            self.normal.x,
            self.normal.y,
            self.normal.z,
            if self.interior { "" } else { " [border]" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> WaveField {
        WaveField::with_dimensions(8, 8, 1.0, 1.0 / 30.0, 3.25, 0.4).unwrap()
    }

    #[test]
    fn summary_flat_field() {
        let summary = FieldInspector::summary(&field());
        assert_eq!(summary.steps, 0);
        assert_eq!(summary.min_height, 0.0);
        assert_eq!(summary.max_height, 0.0);
        assert_eq!(summary.energy, 0.0);
    }

    #[test]
    fn summary_after_disturb() {
        let mut f = field();
        f.disturb(3, 3, 1.0).unwrap();
        let summary = FieldInspector::summary(&f);
        assert_eq!(summary.max_height, 0.5);
        assert_eq!(summary.min_height, 0.0);
        // 0.5 + 4 * 0.25 over 64 cells.
        assert!((summary.mean_abs_height - 1.5 / 64.0).abs() < 1e-7);
        assert!((summary.energy - 0.5 * (0.25 + 4.0 * 0.0625)).abs() < 1e-9);

        f.step();
        assert_eq!(FieldInspector::summary(&f).steps, 1);
    }

    #[test]
    fn inspect_cell_found() {
        let mut f = field();
        f.disturb(2, 5, -0.4).unwrap();
        let info = FieldInspector::inspect_cell(&f, 2, 5).unwrap();
        assert_eq!(info.position.y, -0.2);
        assert!(info.interior);
        assert!(!FieldInspector::inspect_cell(&f, 0, 5).unwrap().interior);
    }

    #[test]
    fn inspect_cell_off_grid() {
        assert!(FieldInspector::inspect_cell(&field(), 8, 0).is_none());
    }

    #[test]
    fn peak_finds_largest_magnitude() {
        let mut f = field();
        f.disturb(2, 2, 0.2).unwrap();
        f.disturb(5, 4, -1.0).unwrap();
        assert_eq!(FieldInspector::peak(&f), Some((5, 4, -0.5)));
    }

    #[test]
    fn summary_display() {
        let s = format!("{}", FieldInspector::summary(&field()));
        assert!(s.contains("step=0"));
        assert!(s.contains("8x8"));
    }
}
