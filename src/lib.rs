/*
  2次元定常熱方程式のヤコビ法ソルバー（マルチデバイス版）

  グリッドを連続した行バンドに分割し、バンドごとに1ワーカーを
  専用デバイスに割り当てて緩和計算を行う。イテレーションごとに
  ハロー行の交換と収束値のリダクションをロックステップで実行する。
*/

pub mod device;
pub mod error;
pub mod grid;
pub mod halo;
pub mod kernel;
pub mod partition;
pub mod reduce;
pub mod solver;

pub use device::{Device, DevicePool};
pub use error::SolverError;
pub use grid::{Grid, DT_SENTINEL, MAX_TEMP_ERROR, V_MAX};
pub use partition::{decompose, Partition};
pub use solver::{solve, SolveReport};
