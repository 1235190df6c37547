use crate::normalize::Candidate;

/// Pick the largest candidate; on equal sizes the earliest wins. An empty
/// input yields [`Candidate::NONE`].
pub fn biggest(candidates: &[Candidate]) -> Candidate {
    candidates
        .iter()
        .fold(Candidate::NONE, |best, c| if c.size > best.size { *c } else { best })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: f64, size: f64) -> Candidate {
        Candidate { x, y: 0.0, size }
    }

    #[test]
    fn empty_yields_sentinel() {
        assert_eq!(biggest(&[]), Candidate::NONE);
    }

    #[test]
    fn largest_wins_regardless_of_order() {
        let a = [c(0.1, 0.2), c(0.5, 0.4), c(-0.3, 0.1)];
        let b = [c(-0.3, 0.1), c(0.1, 0.2), c(0.5, 0.4)];
        assert_eq!(biggest(&a), c(0.5, 0.4));
        assert_eq!(biggest(&b), c(0.5, 0.4));
    }

    #[test]
    fn ties_keep_first_seen() {
        let list = [c(0.7, 0.3), c(-0.7, 0.3)];
        assert_eq!(biggest(&list).x, 0.7);
    }
}
