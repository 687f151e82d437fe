use std::thread;
use std::time::Instant;

use jacobi_laplace::device::DevicePool;
use jacobi_laplace::grid::Grid;
use jacobi_laplace::solver::solve;

// グリッドの内部サイズ
const GRIDX: usize = 1000;
const GRIDY: usize = 1000;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // コマンドライン引数は最大イテレーション数の1つだけ
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 2 {
        println!("Usage: {} number_of_iterations", args[0]);
        std::process::exit(1);
    }
    let max_iterations: usize = args[1].parse().unwrap_or_else(|_| {
        println!("Usage: {} number_of_iterations", args[0]);
        std::process::exit(1);
    });

    let start = Instant::now();

    let mut grid = Grid::new(GRIDX, GRIDY);
    grid.initialize();

    let devices = DevicePool::discover().unwrap_or_else(|e| {
        eprintln!("エラー: {}", e);
        std::process::exit(1);
    });

    // ワーカー数は論理コア数（1バンド = 1ワーカースレッド）
    let workers = thread::available_parallelism().map(|n| n.get()).unwrap_or(1);

    if let Err(e) = solve(&mut grid, &devices, workers, max_iterations) {
        eprintln!("エラー: {}", e);
        std::process::exit(1);
    }

    println!("Total time was {:.6} seconds.", start.elapsed().as_secs_f64());
}
