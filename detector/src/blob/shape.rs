//! Shape descriptors of a closed contour polygon.

use imageproc::point::Point;

const AREA_EPSILON: f64 = 1e-7;
const INERTIA_EPSILON: f64 = 1e-2;

/// Geometry of one traced border, all in pixel units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shape {
    pub area: f64,
    pub perimeter: f64,
    pub centroid: (f64, f64),
    /// `4*pi*area / perimeter^2`, 1 for a perfect circle.
    pub circularity: f64,
    /// `area / convex hull area`.
    pub convexity: f64,
    /// Ratio of the minor to the major principal moment of inertia.
    pub inertia_ratio: f64,
}

/// Raw and central second-order moments of a polygon.
#[derive(Debug, Clone, Copy, Default)]
struct Moments {
    m00: f64,
    m10: f64,
    m01: f64,
    mu20: f64,
    mu11: f64,
    mu02: f64,
}

/// Describe a closed contour. Returns `None` for borders that enclose no area
/// (isolated pixels, one-pixel-wide lines).
pub fn describe(points: &[Point<i32>]) -> Option<Shape> {
    let moments = polygon_moments(points)?;
    let area = moments.m00;
    let perimeter = perimeter(points);
    let hull_area = polygon_area(&convex_hull(points));

    let circularity = if perimeter > 0.0 {
        4.0 * std::f64::consts::PI * area / (perimeter * perimeter)
    } else {
        0.0
    };
    let convexity = if hull_area > AREA_EPSILON {
        area / hull_area
    } else {
        0.0
    };

    Some(Shape {
        area,
        perimeter,
        centroid: (moments.m10 / area, moments.m01 / area),
        circularity,
        convexity,
        inertia_ratio: inertia_ratio(&moments),
    })
}

/// Green's theorem moments over the polygon, normalised so the area is positive
/// whatever the winding direction.
fn polygon_moments(points: &[Point<i32>]) -> Option<Moments> {
    if points.len() < 3 {
        return None;
    }
    let (mut a00, mut a10, mut a01, mut a20, mut a11, mut a02) = (0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
    let last = points[points.len() - 1];
    let (mut xp, mut yp) = (f64::from(last.x), f64::from(last.y));

    for p in points {
        let (x, y) = (f64::from(p.x), f64::from(p.y));
        let dxy = xp * y - x * yp;
        let xs = xp + x;
        let ys = yp + y;
        a00 += dxy;
        a10 += dxy * xs;
        a01 += dxy * ys;
        a20 += dxy * (xp * xs + x * x);
        a11 += dxy * (xp * (ys + yp) + x * (ys + y));
        a02 += dxy * (yp * ys + y * y);
        xp = x;
        yp = y;
    }

    if a00.abs() <= AREA_EPSILON {
        return None;
    }
    let sign = a00.signum();
    let m00 = sign * a00 / 2.0;
    let m10 = sign * a10 / 6.0;
    let m01 = sign * a01 / 6.0;
    let m20 = sign * a20 / 12.0;
    let m11 = sign * a11 / 24.0;
    let m02 = sign * a02 / 12.0;

    let cx = m10 / m00;
    let cy = m01 / m00;
    Some(Moments {
        m00,
        m10,
        m01,
        mu20: m20 - cx * m10,
        mu11: m11 - cx * m01,
        mu02: m02 - cy * m01,
    })
}

fn inertia_ratio(m: &Moments) -> f64 {
    let denominator = ((2.0 * m.mu11).powi(2) + (m.mu20 - m.mu02).powi(2)).sqrt();
    if denominator <= INERTIA_EPSILON {
        return 1.0;
    }
    let cos = (m.mu20 - m.mu02) / denominator;
    let sin = 2.0 * m.mu11 / denominator;
    let half_sum = 0.5 * (m.mu20 + m.mu02);
    let half_diff = 0.5 * (m.mu20 - m.mu02);
    let i_min = half_sum - half_diff * cos - m.mu11 * sin;
    let i_max = half_sum + half_diff * cos + m.mu11 * sin;
    if i_max <= 0.0 {
        return 0.0;
    }
    i_min / i_max
}

/// Length of the closed polyline.
fn perimeter(points: &[Point<i32>]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| f64::from(a.x - b.x).hypot(f64::from(a.y - b.y)))
        .sum()
}

/// Absolute shoelace area.
fn polygon_area(points: &[Point<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let twice: i64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| i64::from(a.x) * i64::from(b.y) - i64::from(b.x) * i64::from(a.y))
        .sum();
    twice.abs() as f64 / 2.0
}

/// Monotone chain hull, counter-clockwise, without collinear points.
fn convex_hull(points: &[Point<i32>]) -> Vec<Point<i32>> {
    let mut pts: Vec<(i64, i64)> = points
        .iter()
        .map(|p| (i64::from(p.x), i64::from(p.y)))
        .collect();
    pts.sort_unstable();
    pts.dedup();
    if pts.len() < 3 {
        return pts
            .into_iter()
            .map(|(x, y)| Point::new(x as i32, y as i32))
            .collect();
    }

    let cross = |o: (i64, i64), a: (i64, i64), b: (i64, i64)| {
        (a.0 - o.0) * (b.1 - o.1) - (a.1 - o.1) * (b.0 - o.0)
    };
    let mut hull: Vec<(i64, i64)> = Vec::with_capacity(pts.len() * 2);
    for pass in [pts.clone(), pts.iter().rev().copied().collect()] {
        let start = hull.len();
        for p in pass {
            while hull.len() >= start + 2
                && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0
            {
                hull.pop();
            }
            hull.push(p);
        }
        hull.pop();
    }
    hull.into_iter()
        .map(|(x, y)| Point::new(x as i32, y as i32))
        .collect()
}
