//! Integer rasterisation of the shapes the level generator carves.

/// Round half up, so `-0.5` goes to `0` and `2.5` goes to `3`.
pub fn round_half_up(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}

/// Points along the vector `(run, rise)` starting at the origin, one per unit
/// step of the dominant axis. Both ends are always included, even when the
/// dominant length is fractional.
pub fn vector_steps(run: f64, rise: f64) -> Vec<(f64, f64)> {
    let swap = rise.abs() > run.abs();
    let (major, minor) = if swap { (rise, run) } else { (run, rise) };

    let length = major.abs();
    if length == 0.0 {
        return vec![(0.0, 0.0)];
    }

    let gradient = minor / length;
    let direction = major.signum();
    let steps = length.ceil() as u32;

    (0..=steps)
        .map(|step| {
            let t = (step as f64).min(length);
            let along = t * direction;
            let across = t * gradient;
            if swap {
                (across, along)
            } else {
                (along, across)
            }
        })
        .collect()
}

/// Cells covered by a line from `(x0, y0)` to `(x1, y1)` where every stepped
/// point is rounded and stamped with a `(2r+1)` square.
pub fn line_points(x0: f64, y0: f64, x1: f64, y1: f64, radius: i32) -> Vec<(i32, i32)> {
    let radius = radius.max(0);
    let side = (2 * radius + 1) as usize;
    let steps = vector_steps(x1 - x0, y1 - y0);
    let mut points = Vec::with_capacity(steps.len() * side * side);

    for (dx, dy) in steps {
        let x = round_half_up(x0 + dx);
        let y = round_half_up(y0 + dy);
        for j in -radius..=radius {
            for i in -radius..=radius {
                points.push((x + i, y + j));
            }
        }
    }
    points
}

/// Cells strictly inside the axis-aligned ellipse centred on `(mid_x, mid_y)`.
pub fn ellipse_points(mid_x: f64, mid_y: f64, radius_x: f64, radius_y: f64) -> Vec<(i32, i32)> {
    if radius_x <= 0.0 || radius_y <= 0.0 {
        return Vec::new();
    }

    let x_min = (mid_x - radius_x).ceil() as i32;
    let x_max = (mid_x + radius_x).floor() as i32;
    let y_min = (mid_y - radius_y).ceil() as i32;
    let y_max = (mid_y + radius_y).floor() as i32;

    let mut points = Vec::new();
    for y in y_min..=y_max {
        for x in x_min..=x_max {
            let dx = (x as f64 - mid_x) / radius_x;
            let dy = (y as f64 - mid_y) / radius_y;
            if dx.hypot(dy) < 1.0 {
                points.push((x, y));
            }
        }
    }
    points
}
