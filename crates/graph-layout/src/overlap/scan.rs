use super::{separated, OverlapAxis, OverlapError, OverlapParameters, OverlapRemovalAlgorithm};
use crate::Rect;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::Hash;
use tracing::debug;

/// Removes overlaps with a single monotone scan
///
/// Rectangles are visited from left to right (then top to bottom, then by
/// key). Each one is pushed right or down past every already visited
/// rectangle it conflicts with, so a rectangle is pushed at most once per
/// predecessor and the pass always terminates. With [`OverlapAxis::Both`]
/// the push goes in whichever direction is shorter.
#[derive(Debug, Clone)]
pub struct ScanOverlapRemoval<K> {
    rectangles: HashMap<K, Rect>,
    parameters: Option<OverlapParameters>,
}

impl<K> Default for ScanOverlapRemoval<K> {
    fn default() -> Self {
        Self {
            rectangles: HashMap::new(),
            parameters: None,
        }
    }
}

impl<K> ScanOverlapRemoval<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_rectangles(self) -> HashMap<K, Rect> {
        self.rectangles
    }
}

impl<K: Clone + Eq + Hash + Ord> OverlapRemovalAlgorithm<K> for ScanOverlapRemoval<K> {
    fn initialize(
        &mut self,
        rectangles: HashMap<K, Rect>,
        parameters: OverlapParameters,
    ) -> Result<(), OverlapError> {
        parameters.validate()?;
        if let Some(invalid) = rectangles
            .values()
            .find(|r| !r.is_finite() || r.width < 0.0 || r.height < 0.0)
        {
            return Err(OverlapError::InvalidRectangle(*invalid));
        }

        self.rectangles = rectangles;
        self.parameters = Some(parameters);
        Ok(())
    }

    fn compute(&mut self) -> Result<(), OverlapError> {
        let parameters = self.parameters.as_ref().ok_or(OverlapError::NotInitialized)?;
        let (h_gap, v_gap) = (parameters.horizontal_gap(), parameters.vertical_gap());

        let mut order: Vec<(K, Rect)> = self
            .rectangles
            .iter()
            .map(|(key, rect)| (key.clone(), *rect))
            .collect();
        order.sort_by(|(ka, a), (kb, b)| {
            a.x.partial_cmp(&b.x)
                .unwrap_or(Ordering::Equal)
                .then(a.y.partial_cmp(&b.y).unwrap_or(Ordering::Equal))
                .then_with(|| ka.cmp(kb))
        });

        let mut placed: Vec<Rect> = Vec::with_capacity(order.len());
        let mut pushes = 0;
        for (key, mut rect) in order {
            if !rect.has_area() {
                continue;
            }

            loop {
                let Some(blocker) = placed
                    .iter()
                    .find(|other| !separated(&rect, other, h_gap, v_gap))
                    .copied()
                else {
                    break;
                };
                let dx = blocker.right() + h_gap - rect.left();
                let dy = blocker.bottom() + v_gap - rect.top();
                match parameters.axis() {
                    OverlapAxis::Both if dx <= dy => rect.x += dx,
                    OverlapAxis::Both => rect.y += dy,
                    OverlapAxis::Horizontal => rect.x += dx,
                    OverlapAxis::Vertical => rect.y += dy,
                }
                pushes += 1;
            }

            placed.push(rect);
            self.rectangles.insert(key, rect);
        }

        debug!(
            "Removed overlaps between {} rectangles with {pushes} pushes",
            self.rectangles.len()
        );
        Ok(())
    }

    fn rectangles(&self) -> &HashMap<K, Rect> {
        &self.rectangles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use test_log::test;

    fn assert_overlap_free(rectangles: &HashMap<u32, Rect>, h_gap: f64, v_gap: f64) {
        let rects: Vec<_> = rectangles.iter().collect();
        for (i, (ka, a)) in rects.iter().enumerate() {
            for (kb, b) in &rects[i + 1..] {
                assert!(
                    separated(a, b, h_gap, v_gap),
                    "{ka} {a:?} and {kb} {b:?} are too close"
                );
            }
        }
    }

    fn run(
        rectangles: HashMap<u32, Rect>,
        parameters: OverlapParameters,
    ) -> HashMap<u32, Rect> {
        let mut algorithm = ScanOverlapRemoval::new();
        algorithm.initialize(rectangles, parameters).unwrap();
        algorithm.compute().unwrap();
        algorithm.into_rectangles()
    }

    #[test]
    fn empty_input() {
        let result = run(HashMap::new(), OverlapParameters::default());
        assert!(result.is_empty());
    }

    #[test]
    fn separates_stacked_rectangles() {
        let input: HashMap<u32, Rect> = (0..5)
            .map(|i| (i, Rect::new(i as f64, 0.0, 20.0, 10.0)))
            .collect();
        let parameters = OverlapParameters::new(5.0, 3.0).unwrap();

        let result = run(input.clone(), parameters);

        assert_overlap_free(&result, 5.0, 3.0);
        let mut keys: Vec<_> = result.keys().copied().collect();
        keys.sort();
        assert_eq!(keys, vec![0, 1, 2, 3, 4]);
        for (key, rect) in &result {
            assert_eq!(rect.size(), input[key].size());
        }
    }

    #[test]
    fn random_rectangles_end_up_overlap_free() {
        let mut rng = StdRng::seed_from_u64(17);
        for axis in [OverlapAxis::Both, OverlapAxis::Horizontal, OverlapAxis::Vertical] {
            let input: HashMap<u32, Rect> = (0..60)
                .map(|i| {
                    let rect = Rect::new(
                        rng.gen_range(0.0..200.0),
                        rng.gen_range(0.0..200.0),
                        rng.gen_range(1.0..40.0),
                        rng.gen_range(1.0..40.0),
                    );
                    (i, rect)
                })
                .collect();
            let parameters = OverlapParameters::new(4.0, 2.0).unwrap().with_axis(axis);

            let result = run(input, parameters);

            assert_eq!(result.len(), 60);
            assert_overlap_free(&result, 4.0, 2.0);
        }
    }

    #[test]
    fn one_way_passes_move_along_their_axis_only() {
        let input = HashMap::from([
            (1, Rect::new(0.0, 0.0, 10.0, 10.0)),
            (2, Rect::new(5.0, 5.0, 10.0, 10.0)),
        ]);

        let horizontal = run(
            input.clone(),
            OverlapParameters::new(0.0, 0.0)
                .unwrap()
                .with_axis(OverlapAxis::Horizontal),
        );
        assert_eq!(horizontal[&2], Rect::new(10.0, 5.0, 10.0, 10.0));

        let vertical = run(
            input,
            OverlapParameters::new(0.0, 0.0)
                .unwrap()
                .with_axis(OverlapAxis::Vertical),
        );
        assert_eq!(vertical[&2], Rect::new(5.0, 10.0, 10.0, 10.0));
    }

    #[test]
    fn zero_area_rectangles_stay_put() {
        let input = HashMap::from([
            (1, Rect::new(0.0, 0.0, 10.0, 10.0)),
            (2, Rect::new(2.0, 2.0, 0.0, 10.0)),
        ]);
        let result = run(input.clone(), OverlapParameters::default());
        assert_eq!(result, input);
    }

    #[test]
    fn rejects_negative_gaps_and_bad_rectangles() {
        assert!(matches!(
            OverlapParameters::new(-1.0, 0.0),
            Err(OverlapError::InvalidGap { .. })
        ));
        let mut parameters = OverlapParameters::default();
        assert!(parameters.set_vertical_gap(f64::INFINITY).is_err());
        assert_eq!(parameters.set_vertical_gap(10.0), Ok(None));

        let mut algorithm = ScanOverlapRemoval::<u32>::new();
        assert_eq!(algorithm.compute(), Err(OverlapError::NotInitialized));
        assert!(matches!(
            algorithm.initialize(
                HashMap::from([(1, Rect::new(f64::NAN, 0.0, 1.0, 1.0))]),
                OverlapParameters::default()
            ),
            Err(OverlapError::InvalidRectangle(_))
        ));
    }
}
