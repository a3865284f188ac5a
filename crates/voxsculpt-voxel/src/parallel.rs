//! Slab-partitioned parallel writes over row-major 3D buffers.

/// Runs `f(x, slab)` for every X slab of `data` across scoped worker threads.
///
/// `slab_len` is the number of elements per X index (`height * depth`). Each
/// worker owns a disjoint run of whole slabs, so no locking is needed.
pub fn for_each_slab_mut<T, F>(data: &mut [T], slab_len: usize, f: F)
where
    T: Send,
    F: Fn(usize, &mut [T]) + Sync,
{
    if slab_len == 0 || data.is_empty() {
        return;
    }
    let slabs = data.len() / slab_len;
    if slabs == 0 {
        return;
    }
    let threads = num_cpus::get().clamp(1, slabs);
    let slabs_per_worker = slabs.div_ceil(threads);

    std::thread::scope(|scope| {
        for (worker, run) in data.chunks_mut(slabs_per_worker * slab_len).enumerate() {
            let f = &f;
            scope.spawn(move || {
                let first = worker * slabs_per_worker;
                for (offset, slab) in run.chunks_mut(slab_len).enumerate() {
                    f(first + offset, slab);
                }
            });
        }
    });
}
