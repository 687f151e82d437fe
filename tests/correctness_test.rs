use jacobi_laplace::device::DevicePool;
use jacobi_laplace::grid::{Grid, DT_SENTINEL, V_MAX};
use jacobi_laplace::solver::solve;

const EPSILON: f64 = 1e-10;

/// グリッドの全要素が一致するかチェック
fn grids_are_equal(grid1: &Grid, grid2: &Grid) -> bool {
    if grid1.data.len() != grid2.data.len() {
        return false;
    }

    for i in 0..grid1.data.len() {
        let diff = (grid1.data[i] - grid2.data[i]).abs();
        if diff > EPSILON {
            eprintln!(
                "Mismatch at index {}: {} vs {} (diff: {})",
                i, grid1.data[i], grid2.data[i], diff
            );
            return false;
        }
    }

    true
}

/// 初期化済みグリッドを指定ワーカー数で回すヘルパー
fn run(rows: usize, cols: usize, workers: usize, max_iterations: usize) -> (Grid, f64, usize) {
    let mut grid = Grid::new(rows, cols);
    grid.initialize();

    let devices = DevicePool::with_devices(2).unwrap();
    let report = solve(&mut grid, &devices, workers, max_iterations).unwrap();

    (grid, report.dt, report.iterations)
}

#[test]
fn test_boundary_initialization() {
    let rows = 4;
    let cols = 8;
    let mut grid = Grid::new(rows, cols);
    grid.initialize();

    // 左列0、右列は(V_MAX/R)*iの線形勾配
    for i in 0..=rows + 1 {
        assert_eq!(grid.at(i, 0), 0.0, "Left boundary at ({}, 0) should be 0.0", i);
        assert_eq!(
            grid.at(i, cols + 1),
            (V_MAX / rows as f64) * i as f64,
            "Right boundary at ({}, {}) has wrong ramp value",
            i,
            cols + 1
        );
    }

    // 上行0、下行は(V_MAX/C)*jの線形勾配
    for j in 0..=cols + 1 {
        assert_eq!(grid.at(0, j), 0.0, "Top boundary at (0, {}) should be 0.0", j);
        assert_eq!(
            grid.at(rows + 1, j),
            (V_MAX / cols as f64) * j as f64,
            "Bottom boundary at ({}, {}) has wrong ramp value",
            rows + 1,
            j
        );
    }

    // 内部セルはすべて0
    for i in 1..=rows {
        for j in 1..=cols {
            assert_eq!(grid.at(i, j), 0.0, "Interior cell ({}, {}) should be 0.0", i, j);
        }
    }

    println!("✓ Boundary initialization: All values match!");
}

#[test]
fn test_single_vs_multi_worker() {
    const STEPS: usize = 50;

    // シングルワーカー版（正解データ）
    let (single, single_dt, _) = run(32, 32, 1, STEPS);

    // ワーカー数を変えても結果はビット単位で一致するはず
    for workers in [2, 3, 5, 8] {
        let (multi, multi_dt, _) = run(32, 32, workers, STEPS);

        assert!(
            grids_are_equal(&single, &multi),
            "1 worker and {} workers produce different grids",
            workers
        );
        assert_eq!(
            single_dt, multi_dt,
            "1 worker and {} workers report different dt",
            workers
        );
    }

    println!("✓ Single vs Multi worker: Results match!");
}

#[test]
fn test_single_row_partitions() {
    const STEPS: usize = 20;

    // R = W なので全バンドが1行になり、中間バンドは上下2つの
    // 異なる隣から両方のハロー行を受け取ることになる
    let (single, _, _) = run(6, 10, 1, STEPS);
    let (multi, _, _) = run(6, 10, 6, STEPS);

    assert!(
        grids_are_equal(&single, &multi),
        "Single-row partitions produce different results"
    );

    println!("✓ Single-row partitions: Results match!");
}

#[test]
fn test_more_workers_than_rows() {
    const STEPS: usize = 20;

    // W > R: 余ったワーカーは空レンジでもクラッシュせず、
    // dt = 0 の寄与としてリダクションに参加する
    let (single, single_dt, _) = run(4, 6, 1, STEPS);
    let (multi, multi_dt, _) = run(4, 6, 7, STEPS);

    assert!(
        grids_are_equal(&single, &multi),
        "Empty partitions change the numeric result"
    );
    assert_eq!(single_dt, multi_dt);

    println!("✓ More workers than rows: Results match!");
}

#[test]
fn test_one_iteration_arithmetic() {
    // R = C = 4, V_MAX = 128, 1イテレーションの厳密な算術結果を検証する
    //
    // 初期状態: T[i][5] = 32*i, T[5][j] = 32*j, それ以外は0
    let (grid, dt, iterations) = run(4, 4, 1, 1);

    assert_eq!(iterations, 1);

    // next[1][1] = 0.25 * (T[2][1] + T[0][1] + T[1][2] + T[1][0]) = 0
    assert_eq!(grid.at(1, 1), 0.0);

    // 右列・下行に接するセルだけ境界の勾配が流れ込む
    assert_eq!(grid.at(1, 4), 0.25 * 32.0); // 8
    assert_eq!(grid.at(2, 4), 0.25 * 64.0); // 16
    assert_eq!(grid.at(3, 4), 0.25 * 96.0); // 24
    assert_eq!(grid.at(4, 1), 0.25 * 32.0); // 8
    assert_eq!(grid.at(4, 2), 0.25 * 64.0); // 16
    assert_eq!(grid.at(4, 3), 0.25 * 96.0); // 24

    // 角のセルは両側から: 0.25 * (T[5][4] + T[3][4] + T[4][5] + T[4][3]) = 64
    assert_eq!(grid.at(4, 4), 0.25 * (128.0 + 0.0 + 128.0 + 0.0));

    // 最大変化は角の64
    assert_eq!(dt, 64.0);

    println!("✓ One iteration arithmetic: Exact values match!");
}

#[test]
fn test_zero_iteration_budget() {
    let mut grid = Grid::new(8, 8);
    grid.initialize();
    let before = grid.clone();

    let devices = DevicePool::with_devices(1).unwrap();
    let report = solve(&mut grid, &devices, 4, 0).unwrap();

    // ループ未突入: イテレーション数0、dtは初期値のまま、グリッドは無変更
    assert_eq!(report.iterations, 0);
    assert_eq!(report.dt, DT_SENTINEL);
    assert!(grids_are_equal(&before, &grid), "Grid was mutated with a zero budget");

    println!("✓ Zero iteration budget: Grid untouched!");
}

#[test]
fn test_converged_fixed_point() {
    use jacobi_laplace::grid::MAX_TEMP_ERROR;

    // 収束するまで回す
    let mut grid = Grid::new(8, 8);
    grid.initialize();
    let devices = DevicePool::with_devices(2).unwrap();
    let report = solve(&mut grid, &devices, 2, 100_000).unwrap();

    assert!(
        report.dt <= MAX_TEMP_ERROR,
        "Solver did not converge within the budget (dt = {})",
        report.dt
    );

    // 収束状態から1イテレーション追加しても dt はほぼ変わらない（不動点）
    let extra = solve(&mut grid, &devices, 2, 1).unwrap();
    assert!(
        extra.dt <= report.dt + 1e-6,
        "Converged state is not a fixed point: dt {} -> {}",
        report.dt,
        extra.dt
    );

    println!("✓ Converged fixed point: dt stays at {}!", extra.dt);
}
