use criterion::{Criterion, black_box, criterion_group, criterion_main};
use glam::{IVec3, UVec3};
use voxsculpt_occlusion::{DEFAULT_BLOCK_SIZE, OcclusionField};
use voxsculpt_sculpt::sculpt;
use voxsculpt_voxel::VoxelGrid;

const GRID: u32 = 128;

fn half_filled_grid() -> VoxelGrid<f32> {
    VoxelGrid::from_fn_parallel(UVec3::splat(GRID), |p| {
        if p.y < GRID as i32 / 2 { 0.6 } else { 0.0 }
    })
}

fn bench_full_bake(c: &mut Criterion) {
    let grid = half_filled_grid();
    let mut field = OcclusionField::new(grid.size(), DEFAULT_BLOCK_SIZE);
    c.bench_function("occlusion_bake_full_128", |bencher| {
        bencher.iter(|| field.bake_full(black_box(&grid)))
    });
}

fn bench_incremental_after_stroke(c: &mut Criterion) {
    let mut grid = half_filled_grid();
    let mut field = OcclusionField::baked(&grid, DEFAULT_BLOCK_SIZE);
    let center = IVec3::new(GRID as i32 / 2, GRID as i32 / 2, GRID as i32 / 2);
    let edit = sculpt(&mut grid, center, 32, 0.6);
    c.bench_function("occlusion_incremental_stroke_r32", |bencher| {
        bencher.iter(|| {
            black_box(field.update_incremental(&grid, black_box(&edit.changed), edit.corner))
        })
    });
}

criterion_group!(benches, bench_full_bake, bench_incremental_after_stroke);
criterion_main!(benches);
