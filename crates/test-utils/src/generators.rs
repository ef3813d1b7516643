//! Synthetic grids with predictable values.
//!
//! All grids are row-major, row 0 first.

/// Each cell value is `col * 1000 + row`, so any sample can be traced back
/// to its source cell.
///
/// ```
/// use test_utils::create_test_grid;
///
/// let grid = create_test_grid(10, 5);
/// assert_eq!(grid.len(), 50);
/// assert_eq!(grid[1], 1000.0); // col=1, row=0
/// assert_eq!(grid[10], 1.0);   // col=0, row=1
/// ```
pub fn create_test_grid(width: usize, height: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            data.push((col * 1000 + row) as f32);
        }
    }
    data
}

/// Temperature-like values in Kelvin, 250K top-left rising toward 310K
/// bottom-right.
pub fn create_temperature_grid(width: usize, height: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            let x_factor = col as f32 / width.max(1) as f32;
            let y_factor = row as f32 / height.max(1) as f32;
            data.push(250.0 + x_factor * 30.0 + y_factor * 30.0);
        }
    }
    data
}

/// Values rising linearly from `min` at index 0 toward `max`, one step per
/// cell (the last cell is `min + (max - min) * (n - 1) / n`).
pub fn create_ramp_grid(width: usize, height: usize, min: f32, max: f32) -> Vec<f32> {
    let n = width * height;
    (0..n)
        .map(|i| min + (max - min) * (i as f32 / n as f32))
        .collect()
}

/// Anomaly-like field spanning `-amplitude..=amplitude` across columns.
pub fn create_anomaly_grid(width: usize, height: usize, amplitude: f32) -> Vec<f32> {
    let mut data = Vec::with_capacity(width * height);
    let span = (width.max(2) - 1) as f32;
    for _row in 0..height {
        for col in 0..width {
            data.push(amplitude * (2.0 * col as f32 / span - 1.0));
        }
    }
    data
}

pub fn create_constant_grid(width: usize, height: usize, value: f32) -> Vec<f32> {
    vec![value; width * height]
}

/// Ramp grid with NaN at the given (col, row) positions.
pub fn create_grid_with_nans(width: usize, height: usize, nan_positions: &[(usize, usize)]) -> Vec<f32> {
    let mut data = create_ramp_grid(width, height, 0.0, (width * height) as f32);
    for &(col, row) in nan_positions {
        if col < width && row < height {
            data[row * width + col] = f32::NAN;
        }
    }
    data
}
