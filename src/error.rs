use thiserror::Error;

#[derive(Debug, Error)]
pub enum SolverError {
    #[error("ワーカー数は1以上である必要があります")]
    WorkerCount,

    #[error("グリッドの内部サイズは1x1以上である必要があります")]
    EmptyGrid,

    #[error("デバイス数は1以上である必要があります")]
    DeviceCount,

    #[error("デバイス用スレッドプールの構築に失敗しました: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
