//! Seeded Sampler.
//!
//! Deterministic selection of population rows driven by a small linear
//! congruential generator. Identical `(seed, frame, count)` inputs always
//! yield the identical ordered sequence of row indices on every platform:
//! the generator state stays below 2^18 so all arithmetic is exact in u64.
//!
//! Within one pass selection is without replacement. When `count` exceeds
//! the frame size the pool is refilled and selection continues, so rows
//! may repeat across passes.

use sampling_core::constants::{LCG_INCREMENT, LCG_MODULUS, LCG_MULTIPLIER};
use sampling_core::models::{AuditSampleItem, PopulationRow};

/// `state' = (state * 9301 + 49297) mod 233280`, draw = `state' / 233280`.
#[derive(Debug, Clone)]
pub struct Lcg {
    state: u64,
}

impl Lcg {
    pub fn new(seed: u64) -> Self {
        // Reducing first keeps the product exact; the sequence is unchanged.
        Self {
            state: seed % LCG_MODULUS,
        }
    }

    /// Next draw in `[0, 1)`.
    pub fn next_draw(&mut self) -> f64 {
        self.state = (self.state * LCG_MULTIPLIER + LCG_INCREMENT) % LCG_MODULUS;
        self.state as f64 / LCG_MODULUS as f64
    }

    /// Next index in `0..len`. `len` must be nonzero.
    pub fn next_index(&mut self, len: usize) -> usize {
        let idx = (self.next_draw() * len as f64).floor() as usize;
        idx.min(len - 1)
    }
}

/// A single draw handed to the per-item decorator.
#[derive(Debug, Clone, Copy)]
pub struct Draw<'a> {
    /// Position of this draw in the selection, starting at 0.
    pub ordinal: usize,
    /// Index of the row in the full population.
    pub index: usize,
    pub row: &'a PopulationRow,
}

/// Select `count` frame positions from a frame of `frame_len` entries.
///
/// The pool keeps its order as entries are removed, so the draw sequence
/// matches a splice-from-array implementation exactly.
pub fn select_indices(count: usize, seed: u64, frame_len: usize) -> Vec<usize> {
    if frame_len == 0 || count == 0 {
        return Vec::new();
    }

    let mut rng = Lcg::new(seed);
    let mut pool: Vec<usize> = (0..frame_len).collect();
    let mut selected = Vec::with_capacity(count);
    let mut refills = 0usize;

    for _ in 0..count {
        if pool.is_empty() {
            pool.extend(0..frame_len);
            refills += 1;
        }
        let pick = rng.next_index(pool.len());
        selected.push(pool.remove(pick));
    }

    if refills > 0 {
        tracing::warn!(
            requested = count,
            frame = frame_len,
            refills,
            "sample request exceeds frame size; pool refilled with replacement"
        );
    }

    selected
}

/// Select `count` items from the subset of `rows` named by `frame`.
///
/// `frame` holds indices into `rows`; items keep the row's own id or fall
/// back to `ROW-<index>` using the full-population index.
pub fn select_from_frame<F>(
    count: usize,
    seed: u64,
    rows: &[PopulationRow],
    frame: &[usize],
    mut decorate: F,
) -> Vec<AuditSampleItem>
where
    F: FnMut(&Draw<'_>, &mut AuditSampleItem),
{
    select_indices(count, seed, frame.len())
        .into_iter()
        .enumerate()
        .filter_map(|(ordinal, pos)| {
            let index = *frame.get(pos)?;
            let row = rows.get(index)?;
            let draw = Draw {
                ordinal,
                index,
                row,
            };
            let mut item = AuditSampleItem::new(row.display_id(index), row.value);
            decorate(&draw, &mut item);
            Some(item)
        })
        .collect()
}

/// Select `count` items from the whole population.
pub fn select_items<F>(
    count: usize,
    seed: u64,
    rows: &[PopulationRow],
    decorate: F,
) -> Vec<AuditSampleItem>
where
    F: FnMut(&Draw<'_>, &mut AuditSampleItem),
{
    let frame: Vec<usize> = (0..rows.len()).collect();
    select_from_frame(count, seed, rows, &frame, decorate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(n: usize) -> Vec<PopulationRow> {
        (0..n)
            .map(|i| PopulationRow::new(format!("R{i}"), i as f64))
            .collect()
    }

    #[test]
    fn test_lcg_first_draws() {
        let mut rng = Lcg::new(12_345);
        // (12345 * 9301 + 49297) % 233280 = 96382
        assert_eq!(rng.next_draw(), 96_382.0 / 233_280.0);
        // (96382 * 9301 + 49297) % 233280 = 3239
        assert_eq!(rng.next_draw(), 3_239.0 / 233_280.0);
    }

    #[test]
    fn test_large_seed_matches_reduced_seed() {
        let mut a = Lcg::new(233_280 * 7 + 99);
        let mut b = Lcg::new(99);
        for _ in 0..50 {
            assert_eq!(a.next_draw(), b.next_draw());
        }
    }

    #[test]
    fn test_selection_is_deterministic() {
        let population = rows(500);
        let a = select_items(40, 777, &population, |_, _| {});
        let b = select_items(40, 777, &population, |_, _| {});
        let ids_a: Vec<_> = a.iter().map(|i| i.id.clone()).collect();
        let ids_b: Vec<_> = b.iter().map(|i| i.id.clone()).collect();
        assert_eq!(ids_a, ids_b);
    }

    #[test]
    fn test_single_pass_has_no_duplicates() {
        let mut idx = select_indices(100, 42, 100);
        idx.sort_unstable();
        idx.dedup();
        assert_eq!(idx.len(), 100);
    }

    #[test]
    fn test_over_request_refills_pool() {
        let idx = select_indices(25, 1, 10);
        assert_eq!(idx.len(), 25);
        assert!(idx.iter().all(|&i| i < 10));
    }

    #[test]
    fn test_empty_population_yields_nothing() {
        assert!(select_items(10, 1, &[], |_, _| {}).is_empty());
    }

    #[test]
    fn test_decorator_sees_population_index() {
        let mut population = rows(5);
        population[3].id = String::new();
        let frame = vec![3];
        let items = select_from_frame(1, 9, &population, &frame, |draw, item| {
            assert_eq!(draw.index, 3);
            item.risk_score = Some(draw.ordinal as f64);
        });
        assert_eq!(items[0].id, "ROW-3");
        assert_eq!(items[0].risk_score, Some(0.0));
    }
}
