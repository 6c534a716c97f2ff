use crate::Float;

/// Compute the Euclidean distance between two colors.
///
/// For `[L, u, v]` coordinates, this is the CIE 1976 color difference.
#[inline]
pub fn color_distance(color1: &[Float; 3], color2: &[Float; 3]) -> Float {
    let [l1, u1, v1] = *color1;
    let [l2, u2, v2] = *color2;
    let (dl, du, dv) = (l1 - l2, u1 - u2, v1 - v2);
    dl.mul_add(dl, du.mul_add(du, dv * dv)).sqrt()
}

/// Find the position of the color closest to the origin color.
///
/// Ties resolve to the earliest candidate. An empty candidate list yields
/// `None`.
pub(crate) fn find_closest<'c, C>(origin: &[Float; 3], candidates: C) -> Option<usize>
where
    C: IntoIterator<Item = &'c [Float; 3]>,
{
    let mut min_distance = Float::INFINITY;
    let mut min_index = None;

    for (index, candidate) in candidates.into_iter().enumerate() {
        let distance = color_distance(origin, candidate);
        if distance < min_distance {
            min_distance = distance;
            min_index = Some(index);
        }
    }

    min_index
}
