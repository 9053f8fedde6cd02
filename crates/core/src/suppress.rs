//! Interval suppression: invalidate candidate boundaries that fall inside
//! protected regions.

use crate::span::Span;

/// Invalidate every boundary of `candidates` that falls inside any of
/// `protectors`. Order and length of `candidates` are preserved.
///
/// Overlap is inclusive: a boundary equal to a protector boundary counts as
/// inside. A candidate whose start and end are both covered ends up fully
/// suppressed. Invalidated boundaries are never restored.
pub fn suppress(candidates: &mut [Span], protectors: &[Span]) {
    for candidate in candidates.iter_mut() {
        for protector in protectors {
            if let Some(start) = candidate.start()
                && protector.covers(start)
            {
                candidate.invalidate_start();
            }
            if let Some(end) = candidate.end()
                && protector.covers(end)
            {
                candidate.invalidate_end();
            }
        }
    }
}

/// Owned variant of [`suppress`].
pub fn suppressed(mut candidates: Vec<Span>, protectors: &[Span]) -> Vec<Span> {
    suppress(&mut candidates, protectors);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(candidate: Span, protector: Span) -> String {
        suppressed(vec![candidate], &[protector])[0].to_string()
    }

    #[test]
    fn no_overlap_leaves_candidate_untouched() {
        assert_eq!(run(Span::new(0, 20), Span::new(30, 60)), "[0,20]");
    }

    #[test]
    fn end_inside_protector_invalidates_end() {
        assert_eq!(run(Span::new(0, 20), Span::new(20, 60)), "[0,-1]");
    }

    #[test]
    fn start_inside_protector_invalidates_start() {
        assert_eq!(run(Span::new(50, 70), Span::new(20, 60)), "[-1,70]");
    }

    #[test]
    fn protector_with_invalidated_end_only_guards_its_start() {
        let protector = Span::from_parts(Some(20), None);
        assert_eq!(run(Span::new(50, 70), protector), "[50,70]");
        assert_eq!(run(Span::new(0, 20), protector), "[0,-1]");
    }

    #[test]
    fn enclosed_candidate_is_fully_suppressed() {
        assert_eq!(run(Span::new(40, 48), Span::new(20, 50)), "[-1,-1]");
        assert_eq!(run(Span::new(40, 50), Span::new(20, 50)), "[-1,-1]");
        assert_eq!(run(Span::new(22, 48), Span::new(20, 50)), "[-1,-1]");
    }

    #[test]
    fn every_enclosed_candidate_is_suppressed() {
        let mut candidates = vec![Span::new(22, 30), Span::new(32, 40)];
        suppress(&mut candidates, &[Span::new(20, 50)]);
        assert!(candidates.iter().all(Span::is_suppressed));
    }

    #[test]
    fn invalidation_is_sticky_across_protectors() {
        let mut candidates = vec![Span::new(10, 30)];
        suppress(&mut candidates, &[Span::new(0, 10), Span::new(40, 50)]);
        assert_eq!(candidates[0].to_string(), "[-1,30]");
        suppress(&mut candidates, &[Span::from_parts(None, None)]);
        assert_eq!(candidates[0].to_string(), "[-1,30]");
    }
}
