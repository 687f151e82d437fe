use std::sync::{Arc, Mutex};

use crate::partition::Partition;

/*
  ハロー行の交換

  隣接する2つのバンドの間に HaloLink を1本張る。
  - upper_row: 上側バンドが公開する最終担当行（下側がローカル行0に取り込む）
  - lower_row: 下側バンドが公開する先頭担当行（上側がローカル行rows+1に取り込む）

  ハロー行は所有者だけが書き、隣は読み取り専用のコピーを受け取る。
  publish → バリア → pull の順序は呼び出し側（ソルバー）が保証する。
  端のバンドの欠けた側は固定境界行そのものなので、誰とも交換しない。
*/

struct HaloLink {
    upper_row: Mutex<Vec<f64>>,
    lower_row: Mutex<Vec<f64>>,
}

impl HaloLink {
    fn new(stride: usize) -> Self {
        HaloLink {
            upper_row: Mutex::new(vec![0.0; stride]),
            lower_row: Mutex::new(vec![0.0; stride]),
        }
    }
}

/// 1ワーカー分の接続口（上下それぞれ、隣がいなければ None）
#[derive(Clone)]
pub struct HaloPorts {
    up: Option<Arc<HaloLink>>,
    down: Option<Arc<HaloLink>>,
}

impl HaloPorts {
    /// 受理済みの自分の境界行を共有バッファに書き出す
    pub fn publish(&self, band: &[f64], rows: usize, stride: usize) {
        if let Some(link) = &self.up {
            // 自分は下側: 先頭担当行（ローカル行1）を公開
            let mut row = link.lower_row.lock().unwrap();
            row.copy_from_slice(&band[stride..2 * stride]);
        }
        if let Some(link) = &self.down {
            // 自分は上側: 最終担当行（ローカル行rows）を公開
            let mut row = link.upper_row.lock().unwrap();
            row.copy_from_slice(&band[rows * stride..(rows + 1) * stride]);
        }
    }

    /// 隣の境界行を自分のハロー行に取り込む
    pub fn pull(&self, band: &mut [f64], rows: usize, stride: usize) {
        if let Some(link) = &self.up {
            let row = link.upper_row.lock().unwrap();
            band[0..stride].copy_from_slice(&row);
        }
        if let Some(link) = &self.down {
            let row = link.lower_row.lock().unwrap();
            band[(rows + 1) * stride..(rows + 2) * stride].copy_from_slice(&row);
        }
    }
}

/// 連続する非空バンドの組ごとにリンクを張り、ワーカーごとの接続口を返す
pub fn build_ports(partitions: &[Partition], stride: usize) -> Vec<HaloPorts> {
    let mut ports: Vec<HaloPorts> = partitions
        .iter()
        .map(|_| HaloPorts { up: None, down: None })
        .collect();

    for k in 0..partitions.len().saturating_sub(1) {
        // 空レンジは末尾にしか現れないので、隣接ペアは (k, k+1) だけ見ればよい
        if partitions[k].is_empty() || partitions[k + 1].is_empty() {
            continue;
        }
        let link = Arc::new(HaloLink::new(stride));
        ports[k].down = Some(Arc::clone(&link));
        ports[k + 1].up = Some(link);
    }

    ports
}
