// ============================================================================
// SHAPE RASTERIZATION: lines, ellipse outlines, rectangle outlines
// ============================================================================
//
// All functions are pure and work in canvas cell space (y-up, signed so that
// drags which leave the canvas still produce sensible geometry). Callers clip
// against the grid when applying the cells.

/// Integer Bresenham line from `origin` to `end`, both endpoints included.
///
/// Exactly one cell is emitted per step along the major axis, so the result
/// has no gaps and no doubled diagonal corners. `origin == end` yields a
/// single cell.
pub fn bresenham_line(origin: (i32, i32), end: (i32, i32)) -> Vec<(i32, i32)> {
    let (x0, y0) = origin;
    let (x1, y1) = end;

    // Spans are taken in i64 so opposite extremes of i32 cannot overflow.
    let dx = (x1 as i64 - x0 as i64).abs();
    let dy = (y1 as i64 - y0 as i64).abs();
    let sx = if x0 > x1 { -1 } else { 1 };
    let sy = if y0 > y1 { -1 } else { 1 };

    let mut line = Vec::with_capacity(dx.max(dy) as usize + 1);
    let (mut x, mut y) = (x0, y0);

    // Error terms are kept doubled so the half-step threshold stays integral.
    if dx > dy {
        let mut err = dx;
        while x != x1 {
            line.push((x, y));
            err -= 2 * dy;
            if err < 0 {
                y += sy;
                err += 2 * dx;
            }
            x += sx;
        }
    } else {
        let mut err = dy;
        while y != y1 {
            line.push((x, y));
            err -= 2 * dx;
            if err < 0 {
                x += sx;
                err += 2 * dy;
            }
            y += sy;
        }
    }
    line.push((x, y));

    line
}

/// Midpoint ellipse outline inscribed in the box spanned by two corners.
///
/// Centre is `origin + round(half extent)`, radii are the absolute rounded
/// half extents. Points are emitted four at a time (one per quadrant), so
/// cells on the axes may appear twice; applying them is idempotent.
///
/// A zero vertical radius degenerates to a horizontal run between the two
/// corners' x coordinates (right corner excluded).
pub fn ellipse_outline(origin: (i32, i32), end: (i32, i32)) -> Vec<(i32, i32)> {
    let mid_x = round_half(end.0 as i64 - origin.0 as i64);
    let mid_y = round_half(end.1 as i64 - origin.1 as i64);

    // Decision terms grow with the fourth power of the radius; i128 keeps
    // them exact for any i32 corners.
    let rx = mid_x.abs() as i128;
    let ry = mid_y.abs() as i128;
    let xc = origin.0 as i64 + mid_x;
    let yc = origin.1 as i64 + mid_y;

    let mut path = Vec::new();

    if ry == 0 {
        let left = origin.0.min(end.0);
        let right = origin.0.max(end.0);
        for x in left..right {
            path.push((x, to_i32(yc)));
        }
        return path;
    }

    let push_quadrants = |path: &mut Vec<(i32, i32)>, x: i128, y: i128| {
        let (x, y) = (x as i64, y as i64);
        path.push((to_i32(xc + x), to_i32(yc + y)));
        path.push((to_i32(xc - x), to_i32(yc + y)));
        path.push((to_i32(xc + x), to_i32(yc - y)));
        path.push((to_i32(xc - x), to_i32(yc - y)));
    };

    let rx2 = rx * rx;
    let ry2 = ry * ry;

    // Decision variables are scaled by 4 to stay in integers:
    // d1 = 4*ry² - 4*rx²*ry + rx², d2 = ry²*(2x+1)² + 4*rx²*(y-1)² - 4*rx²*ry².
    let mut x: i128 = 0;
    let mut y: i128 = ry;
    let mut dx = 2 * ry2 * x;
    let mut dy = 2 * rx2 * y;
    let mut d1 = 4 * ry2 - 4 * rx2 * ry + rx2;

    // Region 1: slope shallower than -1.
    while dx < dy {
        push_quadrants(&mut path, x, y);
        x += 1;
        dx += 2 * ry2;
        if d1 < 0 {
            d1 += 4 * (dx + ry2);
        } else {
            y -= 1;
            dy -= 2 * rx2;
            d1 += 4 * (dx - dy + ry2);
        }
    }

    let mut d2 = ry2 * (2 * x + 1) * (2 * x + 1) + 4 * rx2 * (y - 1) * (y - 1) - 4 * rx2 * ry2;

    // Region 2: steeper part down to the horizontal axis.
    while y >= 0 {
        push_quadrants(&mut path, x, y);
        y -= 1;
        dy -= 2 * rx2;
        if d2 > 0 {
            d2 += 4 * (rx2 - dy);
        } else {
            x += 1;
            dx += 2 * ry2;
            d2 += 4 * (dx - dy + rx2);
        }
    }

    path
}

/// Border cells of the axis-aligned rectangle spanned by two corners.
///
/// Full top and bottom rows first, then the left and right columns strictly
/// between them, so no corner is emitted twice.
pub fn rectangle_outline(origin: (i32, i32), end: (i32, i32)) -> Vec<(i32, i32)> {
    let x0 = origin.0.min(end.0);
    let x1 = origin.0.max(end.0);
    let y0 = origin.1.max(end.1);
    let y1 = origin.1.min(end.1);

    let mut path = Vec::new();

    for x in x0..=x1 {
        path.push((x, y0));
        if y1 != y0 {
            path.push((x, y1));
        }
    }

    for y in (y1 + 1)..y0 {
        path.push((x0, y));
        if x1 != x0 {
            path.push((x1, y));
        }
    }

    path
}

/// Half of `v`, rounded to nearest with ties to even.
/// Saturating narrowing back to cell coordinates.
fn to_i32(v: i64) -> i32 {
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

fn round_half(v: i64) -> i64 {
    let half = v / 2;
    if v % 2 == 0 {
        half
    } else if half % 2 == 0 {
        // v = 2*half ± 1: the tie resolves towards the even neighbour.
        half
    } else {
        half + v.signum()
    }
}
