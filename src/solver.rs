use std::sync::{Arc, Barrier};
use std::thread;

use tracing::debug;

use crate::device::{Device, DevicePool};
use crate::error::SolverError;
use crate::grid::{Grid, DT_SENTINEL, MAX_TEMP_ERROR};
use crate::halo::{build_ports, HaloPorts};
use crate::partition::{decompose, Partition};
use crate::reduce::MaxReducer;

// 状況表示の間隔（イテレーション数）
const LOG_EVERY: usize = 100;

/*
  イテレーションドライバ

  バンドごとに1ワーカースレッドを立ち上げ、全員をロックステップで回す。
  1イテレーションの流れ:

    緩和 → 受理(local_dt計測 + curへ書き戻し) → 境界行のpublish
      → バリア → ハローのpull → 最大値リダクション(バリアを兼ねる) → 終了判定

  publishは必ず受理後に行う（隣が読むのは受理済みのcur）。
  リダクションの解放は全員のpull完了後なので、次イテレーションの
  publishが未読の境界行を上書きすることはない。
*/

#[derive(Clone, Copy, Debug)]
pub struct SolveReport {
    /// 完走したイテレーション数
    pub iterations: usize,
    /// 最後に確定したグローバルdt（ループ未突入なら初期値のまま）
    pub dt: f64,
}

struct WorkerResult {
    part: Partition,
    band: Vec<f64>,
    iterations: usize,
    dt: f64,
}

pub fn solve(
    grid: &mut Grid,
    devices: &DevicePool,
    workers: usize,
    max_iterations: usize,
) -> Result<SolveReport, SolverError> {
    if workers == 0 {
        return Err(SolverError::WorkerCount);
    }
    if grid.rows() == 0 || grid.cols() == 0 {
        return Err(SolverError::EmptyGrid);
    }

    let cols = grid.cols();
    let stride = grid.stride();

    debug!(
        rows = grid.rows(),
        cols,
        workers,
        devices = devices.len(),
        max_iterations,
        "ソルバー開始"
    );

    let partitions = decompose(grid.rows(), workers);
    let ports = build_ports(&partitions, stride);
    let barrier = Arc::new(Barrier::new(workers));
    let reducer = Arc::new(MaxReducer::new(workers));

    let results: Vec<WorkerResult> = thread::scope(|scope| {
        let mut handles = Vec::with_capacity(workers);

        for (part, ports) in partitions.iter().copied().zip(ports.into_iter()) {
            // 担当行 + 上下ハロー行のコピーを切り出して所有させる
            let band: Vec<f64> =
                grid.data[(part.row_start - 1) * stride..(part.row_end + 2) * stride].to_vec();
            let device = devices.device_for(part.worker_id);
            let barrier = Arc::clone(&barrier);
            let reducer = Arc::clone(&reducer);

            handles.push(scope.spawn(move || {
                worker_loop(part, band, device, ports, &barrier, &reducer, cols, max_iterations)
            }));
        }

        // ワーカーのpanicは走行全体の失敗として伝播させる
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    // 各バンドの担当行をグリッドへ書き戻す
    for result in &results {
        if result.part.is_empty() {
            continue;
        }
        let rows = result.part.num_rows();
        grid.data[result.part.row_start * stride..(result.part.row_end + 1) * stride]
            .copy_from_slice(&result.band[stride..(rows + 1) * stride]);
    }

    // iterationとdt_globalは全ワーカーでロックステップに一致する
    let report = SolveReport {
        iterations: results[0].iterations,
        dt: results[0].dt,
    };

    debug!(iterations = report.iterations, dt = report.dt, "ソルバー終了");
    Ok(report)
}

#[allow(clippy::too_many_arguments)]
fn worker_loop(
    part: Partition,
    mut cur: Vec<f64>,
    device: Arc<Device>,
    ports: HaloPorts,
    barrier: &Barrier,
    reducer: &MaxReducer,
    cols: usize,
    max_iterations: usize,
) -> WorkerResult {
    let stride = cols + 2;
    let rows = part.num_rows();
    let mut next = vec![0.0; cur.len()];

    let mut iteration = 1usize;
    let mut dt_global = DT_SENTINEL;

    while dt_global > MAX_TEMP_ERROR && iteration <= max_iterations {
        // 緩和: cur から next を計算（前イテレーションで取り込んだハロー行を読む）
        device.relax(&cur, &mut next, rows, cols);

        // 受理: dtを測りながら next を cur に書き戻す（空レンジなら dt = 0）
        let local_dt = device.accept(&mut cur, &next, rows, cols);

        // 受理済みの境界行を公開し、全員が公開し終えてから取り込む
        ports.publish(&cur, rows, stride);
        barrier.wait();
        ports.pull(&mut cur, rows, stride);

        // 全ワーカーのlocal_dtの最大値（解放がバリアを兼ねる）
        dt_global = reducer.reduce(local_dt);

        // 状況表示はワーカー0のみ（制御フローには影響しない）
        if part.worker_id == 0 && iteration % LOG_EVERY == 0 {
            println!("Iteration {:4}, dt {:.6}", iteration, dt_global);
        }

        iteration += 1;
    }

    WorkerResult {
        part,
        band: cur,
        iterations: iteration - 1,
        dt: dt_global,
    }
}
