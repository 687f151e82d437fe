use std::sync::Arc;
use std::thread;

use tracing::debug;

use crate::error::SolverError;
use crate::kernel;

/*
  アクセラレータデバイスの抽象

  元の実装ではスレッドごとに thread_id % num_devices でGPUを選んでいた。
  ここではデバイスを明示的なケイパビリティオブジェクトにして、
  ワーカー生成時に Arc<Device> として渡す。
  カーネル投入は同期的な dispatch-and-wait（pool.installで完了まで待つ）。
*/

pub struct Device {
    id: usize,
    // デバイス内のセル並列計算を担うレーン群
    pool: rayon::ThreadPool,
}

impl Device {
    fn new(id: usize, lanes: usize) -> Result<Self, SolverError> {
        let pool = rayon::ThreadPoolBuilder::new().num_threads(lanes).build()?;
        Ok(Device { id, pool })
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// 緩和カーネルをデバイスに投入して完了を待つ
    pub fn relax(&self, cur: &[f64], next: &mut [f64], rows: usize, cols: usize) {
        self.pool.install(|| kernel::relax_band(cur, next, rows, cols));
    }

    /// 受理カーネル（dt計測 + コピー）をデバイスに投入して完了を待つ
    pub fn accept(&self, cur: &mut [f64], next: &[f64], rows: usize, cols: usize) -> f64 {
        self.pool.install(|| kernel::accept_band(cur, next, rows, cols))
    }
}

pub struct DevicePool {
    devices: Vec<Arc<Device>>,
}

impl DevicePool {
    /// 利用可能なデバイスを検出する
    ///
    /// CPU実行ではホスト全体が1台のアクセラレータに相当し、
    /// 全レーン（論理コア数）を1デバイスに割り当てる。
    pub fn discover() -> Result<Self, SolverError> {
        let pool = Self::with_devices(1)?;
        debug!(devices = pool.len(), "アクセラレータデバイスを検出");
        Ok(pool)
    }

    /// デバイス数を指定して構築する（レーンは均等割り）
    pub fn with_devices(count: usize) -> Result<Self, SolverError> {
        if count == 0 {
            return Err(SolverError::DeviceCount);
        }

        let total_lanes = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let lanes = (total_lanes / count).max(1);

        let devices = (0..count)
            .map(|id| Device::new(id, lanes).map(Arc::new))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(DevicePool { devices })
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// ワーカーへのデバイス割り当て: worker_id % デバイス数（実行中は固定）
    pub fn device_for(&self, worker_id: usize) -> Arc<Device> {
        let device = &self.devices[worker_id % self.devices.len()];
        debug!(worker = worker_id, device = device.id(), "ワーカーをデバイスに割り当て");
        Arc::clone(device)
    }
}
