use enginebench_common::{Concurrency, Page};

/// Expand the weighted page mixture into the ordered task list for one engine.
///
/// The mixture is repeated `iterations × concurrency` times; within one repetition
/// each page appears `weight` times, in declaration order. Each entry is an index
/// into `pages`.
///
/// | pages (weight)       | iterations | concurrency | tasks |
/// |----------------------|------------|-------------|-------|
/// | main(3), search(1)   |     2      |      1      |   8   |
/// | main(3), search(1)   |     2      |      4      |  32   |
pub fn expand(pages: &[Page], iterations: u32, concurrency: Concurrency) -> Vec<usize> {
    let repetitions = iterations as usize * concurrency.get();
    let mut tasks = Vec::with_capacity(task_count(pages, iterations, concurrency) as usize);
    for _ in 0..repetitions {
        for (idx, page) in pages.iter().enumerate() {
            tasks.extend(std::iter::repeat(idx).take(page.weight as usize));
        }
    }
    tasks
}

/// Number of tasks [`expand`] produces: `iterations × concurrency × Σ weight`.
pub fn task_count(pages: &[Page], iterations: u32, concurrency: Concurrency) -> u64 {
    let weight: u64 = pages.iter().map(|p| p.weight as u64).sum();
    iterations as u64 * concurrency.get() as u64 * weight
}
