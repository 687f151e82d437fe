/*
  行バンド分割

  グリッドの内部行 [1, R] をワーカー数 W で連続した帯に分割する。
  chunk = ceil(R / W) として、ワーカー k は [k*chunk + 1, min((k+1)*chunk, R)] を担当。
  W > R の場合、余ったワーカーは空レンジ（計算なし）になるが、
  バリアと収束リダクションには参加し続ける必要がある。
*/

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Partition {
    pub worker_id: usize,
    pub row_start: usize, // グローバル行番号（両端含む）
    pub row_end: usize,
}

impl Partition {
    /// 担当する内部行の本数（空レンジなら0）
    pub fn num_rows(&self) -> usize {
        if self.row_start > self.row_end {
            0
        } else {
            self.row_end + 1 - self.row_start
        }
    }

    pub fn is_empty(&self) -> bool {
        self.num_rows() == 0
    }
}

/// 内部行 [1, rows] を workers 本の帯に分割する
pub fn decompose(rows: usize, workers: usize) -> Vec<Partition> {
    let chunk = rows.div_ceil(workers);

    (0..workers)
        .map(|k| {
            let start = k * chunk + 1;
            if start > rows {
                // 空レンジは正規形 [rows+1, rows] に寄せる
                // （バンド切り出しが範囲外アクセスにならないように）
                Partition {
                    worker_id: k,
                    row_start: rows + 1,
                    row_end: rows,
                }
            } else {
                Partition {
                    worker_id: k,
                    row_start: start,
                    row_end: ((k + 1) * chunk).min(rows),
                }
            }
        })
        .collect()
}
