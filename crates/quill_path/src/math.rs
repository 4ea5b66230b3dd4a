//! Small numeric helpers shared by the pipeline stages

/// Normalize `(x, y)` in place and return its original length.
///
/// Vectors shorter than 1e-6 are left untouched.
pub fn normalize(x: &mut f32, y: &mut f32) -> f32 {
    let d = (*x * *x + *y * *y).sqrt();
    if d > 1e-6 {
        let id = 1.0 / d;
        *x *= id;
        *y *= id;
    }
    d
}

/// 2D cross product in the pipeline's turn convention; positive is a left turn
pub fn cross(dx0: f32, dy0: f32, dx1: f32, dy1: f32) -> f32 {
    dx1 * dy0 - dx0 * dy1
}

pub fn pt_equals(x1: f32, y1: f32, x2: f32, y2: f32, tol: f32) -> bool {
    let dx = x2 - x1;
    let dy = y2 - y1;
    dx * dx + dy * dy < tol * tol
}

/// Squared distance from `(x, y)` to the segment `p`-`q`
pub fn dist_pt_seg(x: f32, y: f32, px: f32, py: f32, qx: f32, qy: f32) -> f32 {
    let pqx = qx - px;
    let pqy = qy - py;
    let mut dx = x - px;
    let mut dy = y - py;
    let d = pqx * pqx + pqy * pqy;
    let mut t = pqx * dx + pqy * dy;
    if d > 0.0 {
        t /= d;
    }
    let t = t.clamp(0.0, 1.0);
    dx = px + t * pqx - x;
    dy = py + t * pqy - y;
    dx * dx + dy * dy
}

/// Twice the signed area of triangle `abc`
pub fn triarea2(ax: f32, ay: f32, bx: f32, by: f32, cx: f32, cy: f32) -> f32 {
    let abx = bx - ax;
    let aby = by - ay;
    let acx = cx - ax;
    let acy = cy - ay;
    acx * aby - abx * acy
}

/// Number of segments needed so an arc of radius `r` spanning `arc`
/// radians deviates at most `tol` from the true circle. Never below 2.
pub fn curve_divs(r: f32, arc: f32, tol: f32) -> usize {
    let da = (r / (r + tol)).acos() * 2.0;
    let divs = (arc / da).ceil();
    if divs.is_finite() && divs > 2.0 {
        divs as usize
    } else {
        2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_leaves_tiny_vectors() {
        let (mut x, mut y) = (1e-8, 0.0);
        let len = normalize(&mut x, &mut y);
        assert!(len < 1e-6);
        assert_eq!((x, y), (1e-8, 0.0));

        let (mut x, mut y) = (3.0, 4.0);
        assert_eq!(normalize(&mut x, &mut y), 5.0);
        assert!((x - 0.6).abs() < 1e-6 && (y - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_dist_pt_seg_clamps_to_endpoints() {
        assert_eq!(dist_pt_seg(5.0, 3.0, 0.0, 0.0, 10.0, 0.0), 9.0);
        assert_eq!(dist_pt_seg(-3.0, 0.0, 0.0, 0.0, 10.0, 0.0), 9.0);
        // Degenerate segment
        assert_eq!(dist_pt_seg(1.0, 1.0, 0.0, 0.0, 0.0, 0.0), 2.0);
    }

    #[test]
    fn test_curve_divs_minimum_and_growth() {
        assert_eq!(curve_divs(0.0, std::f32::consts::PI, 0.25), 2);
        assert_eq!(curve_divs(1.0, std::f32::consts::PI, 0.25), 3);
        let small = curve_divs(2.0, std::f32::consts::PI, 0.25);
        let large = curve_divs(50.0, std::f32::consts::PI, 0.25);
        assert!(large > small);
    }
}
